//! Outbound Mail
//!
//! Mail is handed to an HTTP relay (any service accepting a JSON
//! `{from, to, subject, text}` POST). Without a relay the mailer only logs
//! the dispatch, which is what development builds use.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// A plain-text message
#[derive(Clone, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl std::fmt::Debug for MailMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Bodies carry one-time codes
        f.debug_struct("MailMessage")
            .field("to", &self.to)
            .field("subject", &self.subject)
            .field("text", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail relay unreachable: {0}")]
    Unreachable(String),

    #[error("Mail relay rejected message with status {0}")]
    Rejected(u16),
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    #[serde(flatten)]
    message: &'a MailMessage,
}

#[derive(Clone)]
enum Transport {
    Log,
    Relay { client: reqwest::Client, url: String },
    Outbox(Arc<Mutex<Vec<MailMessage>>>),
}

/// Mail dispatcher
#[derive(Clone)]
pub struct Mailer {
    from: String,
    transport: Transport,
}

impl Mailer {
    /// Mailer that only logs recipients and subjects
    pub fn log_only(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            transport: Transport::Log,
        }
    }

    /// Mailer that POSTs every message to `url`
    pub fn relay(url: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            transport: Transport::Relay {
                client: reqwest::Client::new(),
                url: url.into(),
            },
        }
    }

    /// Mailer that keeps messages in memory, for inspecting what was sent
    pub fn outbox(from: impl Into<String>) -> (Self, MailOutbox) {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let mailer = Self {
            from: from.into(),
            transport: Transport::Outbox(messages.clone()),
        };
        (mailer, MailOutbox { messages })
    }

    /// Dispatch one message
    pub async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        match &self.transport {
            Transport::Log => {
                tracing::info!(
                    to = %message.to,
                    subject = %message.subject,
                    "Mail relay not configured, message not delivered"
                );
                Ok(())
            }
            Transport::Relay { client, url } => {
                let response = client
                    .post(url)
                    .json(&RelayPayload {
                        from: &self.from,
                        message,
                    })
                    .send()
                    .await
                    .map_err(|e| MailError::Unreachable(e.to_string()))?;

                if !response.status().is_success() {
                    return Err(MailError::Rejected(response.status().as_u16()));
                }

                tracing::debug!(to = %message.to, "Mail handed to relay");
                Ok(())
            }
            Transport::Outbox(messages) => {
                messages.lock().await.push(message.clone());
                Ok(())
            }
        }
    }
}

/// Read side of [`Mailer::outbox`]
#[derive(Clone)]
pub struct MailOutbox {
    messages: Arc<Mutex<Vec<MailMessage>>>,
}

impl MailOutbox {
    pub async fn messages(&self) -> Vec<MailMessage> {
        self.messages.lock().await.clone()
    }

    pub async fn last_to(&self, to: &str) -> Option<MailMessage> {
        self.messages
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.to == to)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> MailMessage {
        MailMessage {
            to: to.to_string(),
            subject: "Hello".to_string(),
            text: "code 123456".to_string(),
        }
    }

    #[tokio::test]
    async fn test_log_only_always_succeeds() {
        let mailer = Mailer::log_only("noreply@example.com");
        assert!(mailer.send(&message("a@x.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_outbox_records_messages() {
        let (mailer, outbox) = Mailer::outbox("noreply@example.com");
        mailer.send(&message("a@x.com")).await.unwrap();
        mailer.send(&message("b@x.com")).await.unwrap();

        assert_eq!(outbox.messages().await.len(), 2);
        assert_eq!(outbox.last_to("b@x.com").await.unwrap().to, "b@x.com");
        assert!(outbox.last_to("c@x.com").await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_an_error() {
        let mailer = Mailer::relay("http://127.0.0.1:1/send", "noreply@example.com");
        let result = mailer.send(&message("a@x.com")).await;
        assert!(matches!(result, Err(MailError::Unreachable(_))));
    }

    #[test]
    fn test_debug_hides_body() {
        let debug = format!("{:?}", message("a@x.com"));
        assert!(!debug.contains("123456"));
    }
}
