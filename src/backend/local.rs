//! Local demo backend.
//!
//! Serves the message form in-process: it owns the form's declarative
//! state (label, validity, button decoration) and reacts to client
//! traffic with minimal diffs. Accepting a submission clears the
//! editor by pushing `text: ""` — the client never clears itself.

use std::collections::HashMap;

use async_trait::async_trait;
use log::{info, warn};
use serde_json::{Value, json};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::backend::{Backend, BackendError};
use crate::protocol::{Inbound, MESSAGE_INPUT_ID, Outbound, SEND_BUTTON_ID};

pub struct LocalFormBackend {
    label: String,
    max_message_len: usize,
}

impl LocalFormBackend {
    pub fn new(label: &str, max_message_len: usize) -> Self {
        Self {
            label: label.to_string(),
            max_message_len,
        }
    }

    /// A message is acceptable when it has visible content and fits the
    /// configured length limit.
    fn validate(&self, text: &str) -> bool {
        !text.trim().is_empty() && text.chars().count() <= self.max_message_len
    }

    /// The form's initial state. The server owns the declarative tree;
    /// everything the client renders on startup comes from this batch.
    fn initial_batch(&self) -> Inbound {
        Inbound::UpdateComponentStates {
            delta_states: HashMap::from([
                (
                    MESSAGE_INPUT_ID,
                    json!({ "label": self.label, "is_valid": true, "min_height": 3 }),
                ),
                (
                    SEND_BUTTON_ID,
                    json!({ "icon": "send", "style": "major", "is_sensitive": true }),
                ),
            ]),
        }
    }

    /// Builds the minimal reply to a submission: a clearing `text` when
    /// accepted, an `is_valid` flip when validity changed, nothing when
    /// an already-marked-invalid draft is submitted again. Returns
    /// whether the submission was accepted alongside the delta.
    fn submission_delta(
        &self,
        text: &str,
        marked_valid: &mut bool,
        accepted: &mut u32,
    ) -> (bool, serde_json::Map<String, Value>) {
        let valid = self.validate(text);
        let mut delta = serde_json::Map::new();
        if valid {
            *accepted += 1;
            info!(
                "Accepted submission #{} ({} chars)",
                accepted,
                text.chars().count()
            );
            delta.insert("text".to_string(), json!(""));
        }
        if valid != *marked_valid {
            *marked_valid = valid;
            delta.insert("is_valid".to_string(), json!(valid));
        }
        (valid, delta)
    }
}

fn deliver(push: &UnboundedSender<Inbound>, message: Inbound) -> Result<(), BackendError> {
    push.send(message).map_err(|_| BackendError::ChannelClosed)
}

#[async_trait]
impl Backend for LocalFormBackend {
    fn name(&self) -> &str {
        "local"
    }

    async fn serve(
        &self,
        mut client: UnboundedReceiver<Outbound>,
        push: UnboundedSender<Inbound>,
    ) -> Result<(), BackendError> {
        deliver(&push, self.initial_batch())?;

        // Session state: the last synced draft and what validity the
        // client was last told about.
        let mut draft = String::new();
        let mut marked_valid = true;
        let mut accepted: u32 = 0;

        while let Some(message) = client.recv().await {
            // A submission comes from the editor's chord (carrying its
            // text) or the send button (submitting the synced draft).
            let submitted = match message {
                Outbound::ComponentStateUpdate {
                    component_id,
                    delta,
                } if component_id == MESSAGE_INPUT_ID => {
                    if let Some(text) = delta.get("text").and_then(Value::as_str) {
                        draft = text.to_string();
                        let valid = self.validate(&draft);
                        if valid != marked_valid {
                            marked_valid = valid;
                            deliver(
                                &push,
                                Inbound::single_delta(
                                    MESSAGE_INPUT_ID,
                                    json!({ "is_valid": valid }),
                                ),
                            )?;
                        }
                    }
                    None
                }
                Outbound::ComponentMessage {
                    component_id,
                    payload,
                } if component_id == MESSAGE_INPUT_ID => payload
                    .get("text")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                Outbound::ComponentMessage {
                    component_id,
                    payload,
                } if component_id == SEND_BUTTON_ID => {
                    (payload.get("pressed").and_then(Value::as_bool) == Some(true))
                        .then(|| draft.clone())
                }
                other => {
                    warn!(
                        "Local backend ignoring message for component {}",
                        other.component_id()
                    );
                    None
                }
            };

            if let Some(text) = submitted {
                draft = text;
                let (ok, delta) =
                    self.submission_delta(&draft, &mut marked_valid, &mut accepted);
                if ok {
                    draft.clear();
                }
                if !delta.is_empty() {
                    deliver(
                        &push,
                        Inbound::single_delta(MESSAGE_INPUT_ID, Value::Object(delta)),
                    )?;
                }
            }
        }

        info!(
            "Client hung up, {} message{} accepted",
            accepted,
            if accepted == 1 { "" } else { "s" }
        );
        Ok(())
    }
}
