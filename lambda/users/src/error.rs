use lambda_http::http::StatusCode;
use thiserror::Error;

use crate::record::RecordError;
use crate::store::StoreError;

/// What could not be decoded.
#[derive(Debug, Error)]
pub enum Malformed {
    #[error("request body")]
    Body(#[source] serde_json::Error),
    #[error("stored record")]
    Record(#[source] RecordError),
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("failed to fetch record")]
    FetchFailed(#[source] StoreError),
    #[error("failed to unmarshal record")]
    UnmarshalFailed(#[source] Malformed),
    #[error("could not marshal record")]
    MarshalFailed(#[source] RecordError),
    #[error("invalid user data")]
    InvalidUserData(#[source] serde_json::Error),
    #[error("invalid email")]
    InvalidEmail,
    #[error("could not put item")]
    PutFailed(#[source] StoreError),
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("user does not exist")]
    UserDoesNotExist,
    #[error("could not update record")]
    UpdateFailed(#[source] StoreError),
    #[error("could not delete record")]
    DeleteFailed(#[source] StoreError),
}

impl UserError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::InvalidUserData(_)
            | UserError::InvalidEmail
            | UserError::UnmarshalFailed(Malformed::Body(_)) => StatusCode::BAD_REQUEST,
            UserError::UserAlreadyExists => StatusCode::CONFLICT,
            UserError::UserDoesNotExist => StatusCode::NOT_FOUND,
            UserError::FetchFailed(_)
            | UserError::UnmarshalFailed(Malformed::Record(_))
            | UserError::MarshalFailed(_)
            | UserError::PutFailed(_)
            | UserError::UpdateFailed(_)
            | UserError::DeleteFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn client_mistakes_map_to_4xx() {
        assert_eq!(UserError::InvalidEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            UserError::InvalidUserData(json_error()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            UserError::UnmarshalFailed(Malformed::Body(json_error())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(UserError::UserAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(UserError::UserDoesNotExist.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failures_map_to_500() {
        let backend = || StoreError::Backend("boom".to_string());
        for err in [
            UserError::FetchFailed(backend()),
            UserError::PutFailed(backend()),
            UserError::UpdateFailed(backend()),
            UserError::DeleteFailed(backend()),
            UserError::MarshalFailed(RecordError::NotAMap),
            UserError::UnmarshalFailed(Malformed::Record(RecordError::NotAMap)),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR, "{err}");
        }
    }

    #[test]
    fn decode_cause_appears_once_in_chain() {
        let err = UserError::UnmarshalFailed(Malformed::Body(json_error()));
        let malformed = std::error::Error::source(&err).unwrap();
        assert_eq!(malformed.to_string(), "request body");
        let cause = malformed.source().unwrap();
        assert_eq!(cause.to_string(), json_error().to_string());
        assert!(cause.source().is_none());
    }

    #[test]
    fn messages_hide_the_cause() {
        let err = UserError::FetchFailed(StoreError::Backend("secret detail".to_string()));
        assert_eq!(err.to_string(), "failed to fetch record");
    }
}
