// Minimal client for the Twilio Programmable Messaging API.
// https://www.twilio.com/docs/messaging/api/message-resource

use std::collections::HashMap;
use std::fmt;

pub mod models;
use reqwest::Client;

use crate::models::{MessageResponse, TwilioErrorBody};

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number in E.164 form, e.g. `+15005550006`.
    pub from_number: String,
}

/// Failure talking to Twilio.
#[derive(Debug, Clone)]
pub struct TwilioError {
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for TwilioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "Twilio returned {}: {}", status, self.message),
            None => write!(f, "Twilio request failed: {}", self.message),
        }
    }
}

impl std::error::Error for TwilioError {}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    client: Client,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{base}/Accounts/{sid}/Messages.json",
            base = API_BASE,
            sid = self.options.account_sid
        )
    }

    /// Send a plain SMS from the configured sender number.
    pub async fn send_sms(&self, to: &str, body: &str) -> Result<MessageResponse, TwilioError> {
        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", to);
        form_body.insert("From", &self.options.from_number);
        form_body.insert("Body", body);

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .form(&form_body)
            .send()
            .await
            .map_err(|e| TwilioError {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TwilioErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            return Err(TwilioError {
                status: Some(status.as_u16()),
                message,
            });
        }

        response
            .json::<MessageResponse>()
            .await
            .map_err(|e| TwilioError {
                status: Some(status.as_u16()),
                message: format!("Error parsing message response: {}", e),
            })
    }
}
