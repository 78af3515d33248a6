use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

pub mod accounting;
pub mod demo;
pub mod election;
pub mod learning;
mod rejection;

pub use rejection::Rejection;

/// Generate a fresh identifier of the form `<prefix>_<unix millis>_<9 random chars>`.
pub fn generate_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("{prefix}_{}_{suffix}", Utc::now().timestamp_millis())
}
