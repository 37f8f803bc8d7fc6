//! Task-tracker webhook envelope handling.
//!
//! Maps an inbound JSON envelope onto a [`WebhookEvent`] and turns that into a
//! [`WebhookOutcome`]. Only task-creation events reach the classifier.

use crate::classifier::{ClassificationResult, Classifier};
use crate::error::{ReqdeskError, Result};
use crate::questions::bot_prompt;
use serde::Serialize;
use serde_json::{json, Value};

pub const URL_VERIFICATION: &str = "url_verification";
pub const TASK_CREATED_EVENTS: &[&str] = &["task.created", "task.v1.created"];
pub const COMMENT_CREATED_EVENTS: &[&str] = &["task.comment.created", "comment.created"];

/// Title used when a task event carries neither `summary` nor `title`.
pub const UNTITLED_TASK: &str = "タイトルなし";

// ---------------------------------------------------------------------------
// WebhookTaskEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookTaskEvent {
    pub event_type: String,
    pub task_id: Option<String>,
    pub title: String,
    pub description: String,
}

impl WebhookTaskEvent {
    /// Text handed to the classifier: title and description joined by a space.
    pub fn request_text(&self) -> String {
        format!("{} {}", self.title, self.description)
            .trim()
            .to_string()
    }
}

// ---------------------------------------------------------------------------
// WebhookEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// Transport handshake; the challenge is echoed back untouched.
    UrlVerification { challenge: Value },
    TaskCreated(WebhookTaskEvent),
    CommentCreated {
        event_type: String,
        task_id: Option<String>,
        content: String,
    },
    Unsupported { event_type: Option<String> },
}

impl WebhookEvent {
    pub fn parse(body: &Value) -> Result<Self> {
        let envelope = body.as_object().ok_or_else(|| {
            ReqdeskError::MalformedPayload("webhook body must be a JSON object".to_string())
        })?;

        if envelope.get("type").and_then(Value::as_str) == Some(URL_VERIFICATION) {
            let challenge = envelope.get("challenge").cloned().unwrap_or(Value::Null);
            return Ok(WebhookEvent::UrlVerification { challenge });
        }

        let event_type = body
            .pointer("/header/event_type")
            .and_then(Value::as_str)
            .map(str::to_string);

        let Some(kind) = event_type.as_deref() else {
            return Ok(WebhookEvent::Unsupported { event_type: None });
        };

        if TASK_CREATED_EVENTS.contains(&kind) {
            let event = event_object(body, kind)?;
            let title = first_str(event, &["summary", "title"]).unwrap_or(UNTITLED_TASK);
            return Ok(WebhookEvent::TaskCreated(WebhookTaskEvent {
                event_type: kind.to_string(),
                task_id: first_str(event, &["task_id", "guid"]).map(str::to_string),
                title: title.to_string(),
                description: first_str(event, &["description"])
                    .unwrap_or_default()
                    .to_string(),
            }));
        }

        if COMMENT_CREATED_EVENTS.contains(&kind) {
            let event = event_object(body, kind)?;
            return Ok(WebhookEvent::CommentCreated {
                event_type: kind.to_string(),
                task_id: first_str(event, &["task_id", "resource_id"]).map(str::to_string),
                content: first_str(event, &["content"])
                    .unwrap_or_default()
                    .to_string(),
            });
        }

        Ok(WebhookEvent::Unsupported { event_type })
    }

    pub fn event_type(&self) -> Option<&str> {
        match self {
            WebhookEvent::UrlVerification { .. } => Some(URL_VERIFICATION),
            WebhookEvent::TaskCreated(task) => Some(&task.event_type),
            WebhookEvent::CommentCreated { event_type, .. } => Some(event_type),
            WebhookEvent::Unsupported { event_type } => event_type.as_deref(),
        }
    }
}

fn event_object<'a>(body: &'a Value, kind: &str) -> Result<&'a serde_json::Map<String, Value>> {
    body.get("event").and_then(Value::as_object).ok_or_else(|| {
        ReqdeskError::MalformedPayload(format!("'{kind}' event is missing the `event` object"))
    })
}

fn first_str<'a>(obj: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str).filter(|s| !s.is_empty()))
}

// ---------------------------------------------------------------------------
// WebhookOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Challenge(Value),
    TaskClassified {
        task_id: Option<String>,
        classification: ClassificationResult,
        /// Message intended for the task thread. Posting it is out of scope.
        bot_message: String,
    },
    CommentAcknowledged { task_id: Option<String> },
    Unsupported { event_type: Option<String> },
}

impl WebhookOutcome {
    /// JSON body returned to the webhook caller.
    pub fn to_response(&self) -> Value {
        match self {
            WebhookOutcome::Challenge(challenge) => json!({ "challenge": challenge }),
            WebhookOutcome::TaskClassified {
                task_id,
                classification,
                ..
            } => json!({
                "success": true,
                "message": "タスク作成イベントを処理しました",
                "taskId": task_id,
                "product": classification.product,
            }),
            WebhookOutcome::CommentAcknowledged { task_id } => json!({
                "success": true,
                "message": "コメントを受信しました",
                "taskId": task_id,
            }),
            WebhookOutcome::Unsupported { event_type } => json!({
                "success": true,
                "message": format!(
                    "イベントタイプ {} は未対応です",
                    event_type.as_deref().unwrap_or("(none)")
                ),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Dispatcher {
    classifier: Classifier,
}

impl Dispatcher {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn dispatch(&self, event: WebhookEvent) -> WebhookOutcome {
        match event {
            WebhookEvent::UrlVerification { challenge } => WebhookOutcome::Challenge(challenge),
            WebhookEvent::TaskCreated(task) => {
                let classification = self.classifier.classify(&task.request_text());
                let bot_message = bot_prompt(&classification.product);
                WebhookOutcome::TaskClassified {
                    task_id: task.task_id,
                    classification,
                    bot_message,
                }
            }
            // Turning comment replies into clarification answers is not
            // implemented; the event is only acknowledged.
            WebhookEvent::CommentCreated { task_id, .. } => {
                WebhookOutcome::CommentAcknowledged { task_id }
            }
            WebhookEvent::Unsupported { event_type } => WebhookOutcome::Unsupported { event_type },
        }
    }

    /// Parse and dispatch a raw envelope in one step.
    pub fn handle(&self, body: &Value) -> Result<WebhookOutcome> {
        Ok(self.dispatch(WebhookEvent::parse(body)?))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Classifier::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
