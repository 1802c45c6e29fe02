//! Slash-command reply payloads
//!
//! Every reply is a single mrkdwn section block.

use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid message type: {0}")]
    UnknownKind(String),

    #[error("missing '{field}' for {kind} message")]
    MissingField { kind: &'static str, field: &'static str },
}

/// Build the reply payload for the event named `kind`.
///
/// `start` reads the `minutes` field from `data`; the other kinds ignore it.
pub fn message(kind: &str, data: &Value) -> Result<Value, FormatError> {
    let text = match kind {
        "start" => {
            let minutes = data.get("minutes").ok_or(FormatError::MissingField {
                kind: "start",
                field: "minutes",
            })?;
            let minutes = match minutes {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("Time to focus! You've got *{}* minutes.", minutes)
        }
        "pause" => "Timer is paused. Type /gomato_resume to resume the timer or /gomato_stop to delete the timer.".to_string(),
        "resume" => "Resuming the timer!".to_string(),
        "stop" => "The time has stopped. Use /gomato_start to start a new timer.".to_string(),
        other => return Err(FormatError::UnknownKind(other.to_string())),
    };

    Ok(section(&text))
}

fn section(text: &str) -> Value {
    json!({
        "blocks": [
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": text,
                }
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_text(payload: &Value) -> &str {
        payload["blocks"][0]["text"]["text"].as_str().unwrap()
    }

    #[test]
    fn start_interpolates_minutes() {
        let payload = message("start", &json!({ "minutes": 25 })).unwrap();
        assert_eq!(block_text(&payload), "Time to focus! You've got *25* minutes.");
        assert_eq!(payload["blocks"][0]["type"], "section");
        assert_eq!(payload["blocks"][0]["text"]["type"], "mrkdwn");

        let payload = message("start", &json!({ "minutes": "1.5" })).unwrap();
        assert_eq!(block_text(&payload), "Time to focus! You've got *1.5* minutes.");
    }

    #[test]
    fn start_without_minutes_fails() {
        assert_eq!(
            message("start", &Value::Null),
            Err(FormatError::MissingField { kind: "start", field: "minutes" })
        );
    }

    #[test]
    fn fixed_messages_ignore_data() {
        assert_eq!(block_text(&message("resume", &Value::Null).unwrap()), "Resuming the timer!");
        assert!(block_text(&message("pause", &json!({ "x": 1 })).unwrap()).starts_with("Timer is paused."));
        assert!(block_text(&message("stop", &Value::Null).unwrap()).contains("/gomato_start"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_eq!(
            message("snooze", &Value::Null),
            Err(FormatError::UnknownKind("snooze".to_string()))
        );
    }
}
