use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Conflict(String),
}

impl Error {
    pub fn person_not_found(id: u64) -> Self {
        Error::NotFound {
            entity: "person",
            id,
        }
    }

    pub fn leave_not_found(id: u64) -> Self {
        Error::NotFound {
            entity: "leave request",
            id,
        }
    }
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            // The review endpoints answer "not found or already processed"
            // style failures with 400, so InvalidState maps there too.
            Error::InvalidInput(_) | Error::InvalidState(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string()
        }))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
