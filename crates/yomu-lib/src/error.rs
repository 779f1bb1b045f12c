use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("http error{}: {message}", fmt_status(.status))]
    Http {
        status: Option<u16>,
        message: String,
    },
    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" {s}")).unwrap_or_default()
}

impl Error {
    /// Errors that should send the user back to the login screen
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_) | Error::Unauthorized)
    }
}
