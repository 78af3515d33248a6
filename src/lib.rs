#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use std::sync::Arc;

use rocket::{Build, Rocket};

use crate::config::{AssistantFairing, ConfigFairing, QuizSweeperFairing, StateFairing};
use crate::logging::LoggerFairing;
use crate::store::StateStore;

pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod periodic_task;
pub mod store;

pub use config::Config;

/// Build a server over the configured state store.
pub fn build() -> Rocket<Build> {
    assemble(
        rocket::build(),
        StateFairing::default(),
        AssistantFairing::default(),
    )
}

/// Build a server over the given store, with the demo data if `seed` is set.
/// The assistant is always disabled.
pub fn rocket_for_store(store: Arc<dyn StateStore>, seed: bool) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("seed_demo_data", seed))
        .merge(("gemini_api_key", ""));
    assemble(
        rocket::custom(figment),
        StateFairing::with_store(store),
        AssistantFairing::default(),
    )
}

fn assemble(rocket: Rocket<Build>, state: StateFairing, assistant: AssistantFairing) -> Rocket<Build> {
    rocket
        .mount("/", api::routes())
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(state)
        .attach(assistant)
        .attach(QuizSweeperFairing::default())
}
