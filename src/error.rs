use std::fmt;

#[derive(Debug)]
pub enum Error {
    Connection(String),
    BadRequest { status: u16, body: String },
    Authentication { status: u16, body: String },
    Forbidden { status: u16, body: String },
    Service { status: u16, body: String },
    Protocol(String),
    NotAuthenticated,
    Http(reqwest::Error),
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(msg) => write!(f, "Connection error: {}", msg),
            Error::BadRequest { status, body } => {
                write!(f, "Bad request ({}): {}", status, body)
            }
            Error::Authentication { status, body } => {
                write!(f, "Authentication error ({}): {}", status, body)
            }
            Error::Forbidden { status, body } => write!(f, "Forbidden ({}): {}", status, body),
            Error::Service { status, body } => write!(f, "Service error ({}): {}", status, body),
            Error::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            Error::NotAuthenticated => write!(f, "Not authenticated. Call login() first."),
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Json(err) => write!(f, "JSON parsing error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Translate a non-2xx response into the matching error, keeping the
    /// status and body for diagnosis.
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => Error::BadRequest { status, body },
            401 => Error::Authentication { status, body },
            403 => Error::Forbidden { status, body },
            _ => Error::Service { status, body },
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Error::Connection(err.to_string())
        } else {
            Error::Http(err)
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
