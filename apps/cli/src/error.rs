use serde_json::Value;
use thiserror::Error;

/// Everything a client call can fail with. None of these are retried.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response at all: connection refused, DNS, reset.
    #[error("Cannot reach the backend at {url}. Is it running?")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{detail}")]
    Api { status: u16, detail: String },

    /// 401. The local session has already been cleared.
    #[error("{detail}")]
    Unauthorized { detail: String },

    /// Refused locally before any request was sent.
    #[error("{0}")]
    Precondition(String),

    #[error("Unexpected response from the backend: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Human-readable message from an error body.
///
/// `detail` is used verbatim when it is a string; a list of `{msg}` entries
/// is joined with ". ". Anything else falls back to the status line.
pub fn extract_detail(status: u16, body: &str) -> String {
    let fallback = || format!("Request failed with status {status}");

    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };
    match json.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                fallback()
            } else {
                messages.join(". ")
            }
        }
        _ => fallback(),
    }
}
