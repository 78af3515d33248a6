use std::fmt::Display;

use log::{debug, error};
use mongodb::error::Error as DbError;
use rocket::{http::Status, response::Responder, serde::json::serde_json};
use thiserror::Error;

use crate::model::Rejection;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    /// A 404 for the named entity.
    pub fn not_found(what: impl Display) -> Self {
        Self::Status(Status::NotFound, format!("{what} not found"))
    }

    /// A 400 with the given explanation.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::Status(Status::BadRequest, msg.into())
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> Status {
        match self {
            Self::Db(_) | Self::Json(_) => Status::InternalServerError,
            Self::Rejected(rejection) => rejection.status(),
            Self::Status(status, _) => *status,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        if status.class().is_server_error() {
            error!("{self}");
        } else {
            debug!("{self}");
        }
        Err(status)
    }
}
