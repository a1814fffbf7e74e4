use super::{IMessenger, SessionStatus};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

#[derive(Debug, Deserialize)]
struct SessionStatusResponse {
    state: String,
    #[serde(default)]
    qr: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    to: String,
    body: &'a str,
}

/// Client for the WhatsApp bridge sidecar that holds the paired session.
pub struct WhatsAppRestApi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WhatsAppRestApi {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        let client = Client::new();

        Self {
            client,
            base_url,
            api_key,
        }
    }

    fn request(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("x-api-key", key),
            None => req,
        }
    }
}

/// Recipient identifiers are dialed as `<digits>@c.us` on the wire.
fn to_jid(recipient: &str) -> String {
    let digits: String = recipient.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("{}@c.us", digits)
}

#[async_trait::async_trait]
impl IMessenger for WhatsAppRestApi {
    async fn session_status(&self) -> SessionStatus {
        let url = format!("{}/session/status", self.base_url);
        let res = match self.request(self.client.get(&url)).send().await {
            Ok(res) => res,
            Err(e) => {
                // An unreachable bridge and a disconnected session look the
                // same to the scheduler
                warn!("Could not reach the WhatsApp bridge: {:?}", e);
                return SessionStatus::Disconnected;
            }
        };
        match res.json::<SessionStatusResponse>().await {
            Ok(status) => match status.state.as_str() {
                "ready" => SessionStatus::Ready,
                "qr" | "pairing" => SessionStatus::WaitingForPairing { qr: status.qr },
                _ => SessionStatus::Disconnected,
            },
            Err(e) => {
                warn!("Unexpected WhatsApp bridge status response: {:?}", e);
                SessionStatus::Disconnected
            }
        }
    }

    async fn send_text(&self, recipient: &str, body: &str) -> anyhow::Result<()> {
        let url = format!("{}/messages", self.base_url);
        let req = SendMessageRequest {
            to: to_jid(recipient),
            body,
        };
        match self.request(self.client.post(&url)).json(&req).send().await {
            Ok(res) => {
                res.error_for_status().map_err(|e| {
                    error!(
                        "[Unexpected Response] WhatsApp bridge send error for recipient: {}. Error message: {:?}",
                        recipient, e
                    );
                    anyhow::Error::new(e)
                })?;
                Ok(())
            }
            Err(e) => {
                error!(
                    "[Network Error] WhatsApp bridge send error for recipient: {}. Error message: {:?}",
                    recipient, e
                );
                Err(anyhow::Error::new(e))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_dials_recipients_as_jids() {
        assert_eq!(to_jid("+34612345678"), "34612345678@c.us");
        assert_eq!(to_jid("34612345678"), "34612345678@c.us");
    }
}
