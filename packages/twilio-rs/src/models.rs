use serde::{Deserialize, Serialize};

/// Subset of the Message resource returned by `POST /Messages.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub sid: String,
    pub status: String,
    pub to: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Error payload Twilio sends with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
}
