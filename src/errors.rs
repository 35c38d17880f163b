use crate::models::ErrorCorrection;
use actix::MailboxError;
use actix_web::http::StatusCode;
use actix_web::{error::ResponseError, HttpResponse};
use failure::Fail;

#[derive(Fail, Debug)]
pub enum Error {
    #[fail(display = "Invalid {}: {}", field, reason)]
    Validation { field: &'static str, reason: String },

    #[fail(
        display = "Payload of {} bytes does not fit in version 40 at error correction {}",
        len, level
    )]
    EncodingOverflow { len: usize, level: ErrorCorrection },

    #[fail(display = "Cannot render image: {}", _0)]
    Render(String),

    #[fail(display = "Encoder error: {}", _0)]
    Encoding(String),

    #[fail(display = "No QR code has been generated yet")]
    NoArtifact,

    #[fail(display = "Template error: {}", _0)]
    Template(String),

    #[fail(display = "Config error: {}", _0)]
    Config(String),

    #[fail(display = "IO error: {}", _0)]
    Io(String),

    #[fail(display = "General error: {}", _0)]
    General(String),
}

impl Error {
    pub fn validation<S: Into<String>>(field: &'static str, reason: S) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Errors the user can fix by changing the form.
    pub fn is_user_error(&self) -> bool {
        match *self {
            Error::Validation { .. } | Error::EncodingOverflow { .. } | Error::Render(_) => true,
            _ => false,
        }
    }

    pub fn status(&self) -> StatusCode {
        match *self {
            Error::Validation { .. } | Error::Render(_) => StatusCode::BAD_REQUEST,
            Error::EncodingOverflow { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NoArtifact => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MailboxError> for Error {
    fn from(error: MailboxError) -> Self {
        Error::General(s!(error))
    }
}

impl From<askama::Error> for Error {
    fn from(error: askama::Error) -> Self {
        Error::Template(format!("{:?}", error))
    }
}

impl From<serde_json::error::Error> for Error {
    fn from(error: serde_json::error::Error) -> Self {
        Error::General(format!("{:?}", error))
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(s!(error))
    }
}

// impl ResponseError trait allows to convert our errors into http responses with appropriate data
impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        if self.is_user_error() {
            return HttpResponse::build(self.status()).json(s!(self));
        }
        match *self {
            Error::NoArtifact => HttpResponse::NotFound().json(s!(self)),
            Error::Template(ref message) | Error::Io(ref message) => {
                HttpResponse::InternalServerError().json(message)
            }
            _ => HttpResponse::InternalServerError().json("general error".to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::validation("box_size", "must be at least 1").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::Render(s!("bad color")).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::EncodingOverflow {
                len: 5000,
                level: ErrorCorrection::High
            }
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(Error::NoArtifact.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Io(s!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_names_field() {
        let e = Error::validation("version", "must be between 1 and 40, got 41");
        assert_eq!(s!(e), "Invalid version: must be between 1 and 40, got 41");
        let e = Error::EncodingOverflow {
            len: 1274,
            level: ErrorCorrection::High,
        };
        assert_eq!(
            s!(e),
            "Payload of 1274 bytes does not fit in version 40 at error correction HIGH"
        );
    }
}
