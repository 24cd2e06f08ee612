//! Telegram Bot API adapter.
//!
//! Long polling over `getUpdates` for inbound text, `sendMessage` for
//! replies. Only the handful of fields the bot reads are modelled.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{ChatId, Dispatcher, Inbound, Keyboard, Outbox, Reply, UserId};
use crate::collector::Collector;
use crate::config::TelegramConfig;
use crate::error::{ChatError, Error, Result};

/// Pause before polling again after a failed poll.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Slack on top of the long-poll timeout before the HTTP request gives up.
const HTTP_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i32>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T> {
        match self {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                error_code,
                description,
                ..
            } => Err(ChatError::Api {
                code: error_code,
                description: description.unwrap_or_else(|| "no description".to_string()),
            }
            .into()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub is_bot: bool,
}

impl Update {
    /// The text message carried by this update, if it is one from a person.
    pub fn into_inbound(self) -> Option<Inbound> {
        let message = self.message?;
        let from = message.from.filter(|user| !user.is_bot)?;
        Some(Inbound {
            chat: message.chat.id,
            user: from.id,
            text: message.text?,
        })
    }
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: ChatId,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyMarkup>,
}

#[derive(Debug, Serialize)]
struct KeyboardButton {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ReplyMarkup {
    Keyboard {
        keyboard: Vec<Vec<KeyboardButton>>,
        one_time_keyboard: bool,
        resize_keyboard: bool,
    },
    Remove {
        remove_keyboard: bool,
    },
}

impl ReplyMarkup {
    fn from_keyboard(keyboard: &Keyboard) -> Option<Self> {
        match keyboard {
            Keyboard::None => None,
            Keyboard::Choice(options) => Some(Self::Keyboard {
                keyboard: vec![
                    options
                        .iter()
                        .map(|text| KeyboardButton { text: text.clone() })
                        .collect(),
                ],
                one_time_keyboard: true,
                resize_keyboard: true,
            }),
            Keyboard::Remove => Some(Self::Remove {
                remove_keyboard: true,
            }),
        }
    }
}

/// Bot API client.
pub struct TelegramClient {
    http: reqwest::Client,
    api_url: String,
    token: SecretString,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.poll_timeout + HTTP_GRACE)
            .build()
            .map_err(ChatError::Http)?;

        Ok(Self {
            http,
            api_url: config.api_url,
            token: config.token,
            poll_timeout: config.poll_timeout,
        })
    }

    async fn call<P, T>(&self, method: &str, params: &P) -> Result<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!(
            "{}/bot{}/{}",
            self.api_url,
            self.token.expose_secret(),
            method
        );

        // Error messages carry the URL, and with it the token
        let response: ApiResponse<T> = self
            .http
            .post(url)
            .json(params)
            .send()
            .await
            .map_err(|e| ChatError::Http(e.without_url()))?
            .json()
            .await
            .map_err(|e| ChatError::Http(e.without_url()))?;

        response.into_result()
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: self.poll_timeout.as_secs(),
                allowed_updates: &["message"],
            },
        )
        .await
    }

    pub async fn send_message(&self, chat: ChatId, reply: &Reply) -> Result<()> {
        let _sent: serde_json::Value = self
            .call(
                "sendMessage",
                &SendMessage {
                    chat_id: chat,
                    text: &reply.text,
                    reply_markup: ReplyMarkup::from_keyboard(&reply.keyboard),
                },
            )
            .await?;
        Ok(())
    }
}

impl Outbox for TelegramClient {
    async fn send(&self, chat: ChatId, reply: Reply) -> Result<()> {
        self.send_message(chat, &reply).await
    }
}

/// Whether a poll error will not go away by retrying.
fn is_fatal(error: &Error) -> bool {
    matches!(
        error,
        Error::Chat(ChatError::Api {
            code: Some(401 | 404),
            ..
        })
    )
}

/// Poll for updates and dispatch them until `shutdown` completes.
///
/// Transient failures are logged and retried after a pause. A rejected
/// token ends polling with an error. Running conversations are drained
/// before this returns.
pub async fn run_polling<C: Collector + 'static>(
    client: Arc<TelegramClient>,
    mut dispatcher: Dispatcher<C, TelegramClient>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    tokio::pin!(shutdown);
    let mut offset = None;
    info!("polling for updates");

    let outcome = loop {
        let polled = tokio::select! {
            _ = &mut shutdown => break Ok(()),
            polled = client.get_updates(offset) => polled,
        };

        match polled {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    match update.into_inbound() {
                        Some(message) => dispatcher.dispatch(message),
                        None => debug!("skipping non-text update"),
                    }
                }
            }
            Err(e) if is_fatal(&e) => break Err(e),
            Err(e) => {
                warn!("polling failed, retrying in {:?}: {}", RETRY_DELAY, e);
                tokio::select! {
                    _ = &mut shutdown => break Ok(()),
                    _ = tokio::time::sleep(RETRY_DELAY) => {}
                }
            }
        }
    };

    info!("stopping, waiting for running conversations");
    dispatcher.shutdown().await;
    outcome
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_updates_fixture() {
        let body = json!({
            "ok": true,
            "result": [
                {
                    "update_id": 900001,
                    "message": {
                        "message_id": 11,
                        "from": {"id": 5551, "is_bot": false, "first_name": "Ana"},
                        "chat": {"id": 5551, "type": "private"},
                        "date": 1700000000,
                        "text": "/start"
                    }
                },
                {
                    "update_id": 900002,
                    "message": {
                        "message_id": 12,
                        "from": {"id": 5551, "is_bot": false, "first_name": "Ana"},
                        "chat": {"id": 5551, "type": "private"},
                        "date": 1700000005,
                        "sticker": {"file_id": "abc"}
                    }
                },
                {
                    "update_id": 900003,
                    "message": {
                        "message_id": 13,
                        "from": {"id": 777, "is_bot": true, "first_name": "other"},
                        "chat": {"id": -100123, "type": "supergroup"},
                        "date": 1700000006,
                        "text": "done"
                    }
                },
                {"update_id": 900004, "edited_message": {"message_id": 1}}
            ]
        });

        let response: ApiResponse<Vec<Update>> = serde_json::from_value(body).unwrap();
        let updates = response.into_result().unwrap();
        assert_eq!(updates.len(), 4);
        assert_eq!(updates[3].update_id, 900004);

        let inbound: Vec<_> = updates.into_iter().filter_map(Update::into_inbound).collect();
        assert_eq!(
            inbound,
            [Inbound {
                chat: ChatId(5551),
                user: UserId(5551),
                text: "/start".to_string(),
            }]
        );
    }

    #[test]
    fn test_api_error() {
        let body = json!({"ok": false, "error_code": 401, "description": "Unauthorized"});
        let response: ApiResponse<Vec<Update>> = serde_json::from_value(body).unwrap();
        let err = response.into_result().unwrap_err();

        assert!(is_fatal(&err));
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_conflict_is_not_fatal() {
        let body = json!({
            "ok": false,
            "error_code": 409,
            "description": "Conflict: terminated by other getUpdates request"
        });
        let response: ApiResponse<Vec<Update>> = serde_json::from_value(body).unwrap();
        assert!(!is_fatal(&response.into_result().unwrap_err()));
    }

    #[test]
    fn test_send_message_with_choice() {
        let reply = Reply::with_choice("Pick one", ["Facts", "Interfaces"]);
        let body = SendMessage {
            chat_id: ChatId(42),
            text: &reply.text,
            reply_markup: ReplyMarkup::from_keyboard(&reply.keyboard),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "chat_id": 42,
                "text": "Pick one",
                "reply_markup": {
                    "keyboard": [[{"text": "Facts"}, {"text": "Interfaces"}]],
                    "one_time_keyboard": true,
                    "resize_keyboard": true
                }
            })
        );
    }

    #[test]
    fn test_send_message_markup_variants() {
        let plain = SendMessage {
            chat_id: ChatId(1),
            text: "hi",
            reply_markup: ReplyMarkup::from_keyboard(&Keyboard::None),
        };
        assert_eq!(
            serde_json::to_value(&plain).unwrap(),
            json!({"chat_id": 1, "text": "hi"})
        );

        let remove = SendMessage {
            chat_id: ChatId(1),
            text: "bye",
            reply_markup: ReplyMarkup::from_keyboard(&Keyboard::Remove),
        };
        assert_eq!(
            serde_json::to_value(&remove).unwrap()["reply_markup"],
            json!({"remove_keyboard": true})
        );
    }

    #[test]
    fn test_get_updates_params() {
        let first = GetUpdates {
            offset: None,
            timeout: 30,
            allowed_updates: &["message"],
        };
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            json!({"timeout": 30, "allowed_updates": ["message"]})
        );
    }

    #[tokio::test]
    async fn test_client_from_config() {
        let config = TelegramConfig {
            token: SecretString::from("123:abc".to_string()),
            api_url: "http://127.0.0.1:9".to_string(),
            poll_timeout: Duration::from_secs(1),
        };
        let client = TelegramClient::new(config).unwrap();
        assert_eq!(client.poll_timeout, Duration::from_secs(1));

        // Nothing listens on the discard port
        let err = client.get_updates(None).await.unwrap_err();
        assert!(!err.to_string().contains("123:abc"));
        assert!(!is_fatal(&err));
    }
}
