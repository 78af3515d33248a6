use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info, warn};
use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    figment::Figment,
    tokio::{sync::Mutex, time::Duration},
    Build, Orbit, Rocket,
};
use serde::Deserialize;

use crate::{
    assistant::{Assistant, GeminiAssistant, NoopAssistant},
    error::Result,
    model::{
        demo,
        election::{ElectionController, SharedElection},
        learning::{LearningController, SharedLearning},
    },
    periodic_task::PeriodicTask,
    store::{MemoryStore, MongoStore, StateStore},
};

/// Which backend holds controller state.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Lost on restart. The default.
    #[default]
    Memory,
    Mongodb,
}

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Deserialize)]
pub struct Config {
    // non-secrets
    #[serde(default)]
    store: StoreKind,
    #[serde(default)]
    seed_demo_data: bool,
    #[serde(default = "Config::default_sweep_interval")]
    quiz_sweep_interval: u64,
    #[serde(default = "Config::default_gemini_model")]
    gemini_model: String,
    // secrets
    #[serde(default)]
    gemini_api_key: Option<String>,
}

impl Config {
    pub fn store(&self) -> StoreKind {
        self.store
    }

    /// Install the sample roster and course content into an empty store?
    pub fn seed_demo_data(&self) -> bool {
        self.seed_demo_data
    }

    /// How often active quizzes are checked for expiry.
    pub fn quiz_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.quiz_sweep_interval.max(1))
    }

    pub fn gemini_model(&self) -> &str {
        &self.gemini_model
    }

    /// The Gemini API key, if one is set and non-blank.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    fn default_sweep_interval() -> u64 {
        60
    }

    fn default_gemini_model() -> String {
        "gemini-2.5-flash".to_string()
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with the other fairings and control over error
/// messages.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded config, using {:?} state store", config.store());

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the database.
#[derive(Deserialize)]
struct DbConfig {
    #[serde(default = "DbConfig::default_db_name")]
    db_name: String,
    // secrets
    db_uri: String,
}

impl DbConfig {
    fn default_db_name() -> String {
        "baobab".to_string()
    }
}

/// A fairing that opens the state store, loads both controllers from it,
/// and places them into managed state as [`SharedElection`] and
/// [`SharedLearning`]. Depends on the config being in managed state, so must
/// be attached after [`ConfigFairing`].
#[derive(Default)]
pub struct StateFairing {
    store: Option<Arc<dyn StateStore>>,
}

impl StateFairing {
    /// Use the given store instead of the configured one.
    pub fn with_store(store: Arc<dyn StateStore>) -> Self {
        Self { store: Some(store) }
    }

    async fn open_store(&self, figment: &Figment, kind: StoreKind) -> Option<Arc<dyn StateStore>> {
        if let Some(store) = &self.store {
            return Some(store.clone());
        }
        match kind {
            StoreKind::Memory => {
                warn!("Using in-memory state; nothing will survive a restart");
                Some(Arc::new(MemoryStore::default()))
            }
            StoreKind::Mongodb => {
                let config = match figment.extract::<DbConfig>() {
                    Ok(config) => config,
                    Err(e) => {
                        error!("Failed to load database config");
                        rocket::config::pretty_print_error(e);
                        return None;
                    }
                };
                info!("Loaded database config, connecting...");
                let client = match MongoClient::with_uri_str(config.db_uri).await {
                    Ok(client) => client,
                    Err(e) => {
                        error!("Failed to connect to database: {e}");
                        return None;
                    }
                };
                info!("...database connection online!");
                Some(Arc::new(MongoStore::from_db(&client.database(&config.db_name))))
            }
        }
    }
}

/// Load both controllers, seeding them with demo data if asked.
async fn load_controllers(
    store: Arc<dyn StateStore>,
    seed: bool,
) -> Result<(ElectionController, LearningController)> {
    let mut election = ElectionController::load(store.clone()).await?;
    let mut learning = LearningController::load(store).await?;
    if seed {
        election
            .seed_roster(demo::positions(), demo::candidates())
            .await?;
        learning
            .seed_content(demo::learning_content(Utc::now()))
            .await?;
    }
    Ok((election, learning))
}

#[rocket::async_trait]
impl Fairing for StateFairing {
    fn info(&self) -> Info {
        Info {
            name: "State Store",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        let (kind, seed) = match rocket.state::<Config>() {
            Some(config) => (config.store(), config.seed_demo_data()),
            None => {
                error!("Config was not available when opening the state store");
                return Err(rocket);
            }
        };
        let store = match self.open_store(rocket.figment(), kind).await {
            Some(store) => store,
            None => return Err(rocket),
        };

        let (election, learning) = match load_controllers(store, seed).await {
            Ok(controllers) => controllers,
            Err(e) => {
                error!("Failed to load state: {e}");
                return Err(rocket);
            }
        };
        info!("Election is {}", election.phase());

        // Manage the state.
        let election: SharedElection = Arc::new(Mutex::new(election));
        let learning: SharedLearning = Arc::new(Mutex::new(learning));
        rocket = rocket.manage(election).manage(learning);
        Ok(rocket)
    }
}

/// A fairing that places an [`Assistant`] into managed state: Gemini when an
/// API key is configured, otherwise a stand-in that generates nothing.
#[derive(Default)]
pub struct AssistantFairing {
    assistant: Option<Arc<dyn Assistant>>,
}

impl AssistantFairing {
    /// Use the given assistant regardless of configuration.
    pub fn with_assistant(assistant: Arc<dyn Assistant>) -> Self {
        Self {
            assistant: Some(assistant),
        }
    }
}

#[rocket::async_trait]
impl Fairing for AssistantFairing {
    fn info(&self) -> Info {
        Info {
            name: "Assistant",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        let assistant: Arc<dyn Assistant> = match (&self.assistant, rocket.state::<Config>()) {
            (Some(assistant), _) => assistant.clone(),
            (None, Some(config)) => match config.gemini_api_key() {
                Some(key) => {
                    info!("Using Gemini model {}", config.gemini_model());
                    Arc::new(GeminiAssistant::new(key, config.gemini_model()))
                }
                None => {
                    warn!("No Gemini API key configured, assistant disabled");
                    Arc::new(NoopAssistant)
                }
            },
            (None, None) => {
                error!("Config was not available when configuring the assistant");
                return Err(rocket);
            }
        };

        rocket = rocket.manage(assistant);
        Ok(rocket)
    }
}

/// A fairing that closes expired quizzes in the background once the server
/// is running, and stops doing so on shutdown. Depends on [`StateFairing`].
#[derive(Default)]
pub struct QuizSweeperFairing {
    task: Mutex<Option<PeriodicTask>>,
}

#[rocket::async_trait]
impl Fairing for QuizSweeperFairing {
    fn info(&self) -> Info {
        Info {
            name: "Quiz Expiry Sweep",
            kind: Kind::Liftoff | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let (Some(config), Some(learning)) =
            (rocket.state::<Config>(), rocket.state::<SharedLearning>())
        else {
            error!("State was not available when starting the quiz sweep");
            return;
        };
        let period = config.quiz_sweep_interval();
        let learning = learning.clone();

        let task = PeriodicTask::new(period, move || {
            let learning = learning.clone();
            async move {
                let mut learning = learning.lock().await;
                if let Err(e) = learning.sweep_expired(Utc::now()).await {
                    error!("Quiz expiry sweep failed: {e}");
                }
            }
        });
        *self.task.lock().await = Some(task);
        info!("Sweeping expired quizzes every {}s", period.as_secs());
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        if let Some(task) = self.task.lock().await.take() {
            task.cancel().await;
            debug!("Quiz sweep stopped");
        }
    }
}
