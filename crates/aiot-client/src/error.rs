//! ---
//! aiot_section: "05-networking-external-interfaces"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Failure modes of a prediction request."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
use reqwest::StatusCode;
use thiserror::Error;

const BODY_EXCERPT_LIMIT: usize = 256;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised while talking to the prediction service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid prediction endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("unable to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("prediction request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("prediction service answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed prediction response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub(crate) fn status(status: StatusCode, body: &str) -> Self {
        let body = if body.len() > BODY_EXCERPT_LIMIT {
            let mut cut = BODY_EXCERPT_LIMIT;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}...", &body[..cut])
        } else {
            body.to_owned()
        };
        ClientError::Status { status, body }
    }
}
