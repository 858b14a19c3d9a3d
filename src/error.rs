use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use log::{debug, error};
use mongodb::error::Error as DbError;
use rocket::{
    http::Status,
    response::{self, status::Custom, Responder},
    serde::json::Json,
    Request,
};
use thiserror::Error;

use crate::model::api::error::ErrorMessage;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    pub fn not_found(what: impl AsRef<str>) -> Self {
        Self::Status(Status::NotFound, format!("{} not found", what.as_ref()))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Status(Status::BadRequest, message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Status(Status::Conflict, message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Status(Status::Unauthorized, message.into())
    }

    /// The status code and user-facing message for this error.
    pub fn status_and_message(&self) -> (Status, String) {
        match self {
            Self::Db(_) => (
                Status::InternalServerError,
                "Failed to access voting storage".to_string(),
            ),
            Self::Jwt(err) => match err.kind() {
                JwtErrorKind::ExpiredSignature | JwtErrorKind::ImmatureSignature => {
                    (Status::Unauthorized, "Admin login has expired".to_string())
                }
                _ => (Status::Unauthorized, "Invalid admin login".to_string()),
            },
            Self::Status(status, message) => (*status, message.clone()),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let (status, message) = self.status_and_message();
        if status.code >= 500 {
            error!("{self}");
        } else {
            debug!("{self}");
        }
        Custom(status, Json(ErrorMessage::new(message))).respond_to(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_statuses() {
        assert_eq!(
            Error::not_found("Candidate 42").status_and_message(),
            (Status::NotFound, "Candidate 42 not found".to_string())
        );
        assert_eq!(
            Error::conflict("nope").status_and_message().0,
            Status::Conflict
        );
        assert_eq!(
            Error::bad_request("bad").status_and_message().0,
            Status::BadRequest
        );
    }

    #[test]
    fn expired_login_message() {
        let expired = Error::from(JwtError::from(JwtErrorKind::ExpiredSignature));
        assert_eq!(
            expired.status_and_message(),
            (Status::Unauthorized, "Admin login has expired".to_string())
        );
    }
}
