use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Identifies one component instance in the form tree.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ComponentId(pub u64);

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Backend → client.
///
/// Delta states are kept as raw JSON per component: each widget owns a
/// typed diff and deserializes its own entry, so the envelope does not
/// need to know every widget shape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    UpdateComponentStates {
        #[serde(deserialize_with = "deserialize_delta_states")]
        delta_states: HashMap<ComponentId, Value>,
    },
}

/// JSON object keys are always strings, and the `type`-tag buffering
/// serde uses for internally tagged enums does not convert them back
/// to integers the way serde_json does natively, so the delta map's
/// keys are parsed by hand.
fn deserialize_delta_states<'de, D>(
    deserializer: D,
) -> Result<HashMap<ComponentId, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = HashMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            key.parse::<u64>()
                .map(|id| (ComponentId(id), value))
                .map_err(|_| {
                    serde::de::Error::custom(format!("invalid component id key: {key:?}"))
                })
        })
        .collect()
}

impl Inbound {
    /// Convenience for building a single-component batch.
    pub fn single_delta(id: ComponentId, delta: Value) -> Self {
        Inbound::UpdateComponentStates {
            delta_states: HashMap::from([(id, delta)]),
        }
    }
}

/// Client → backend.
///
/// Two shapes only: a state sync (the "set state and notify" path,
/// fired when an editor loses focus) and a component message (a
/// deliberate user action such as the submit chord or a button press).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    ComponentStateUpdate {
        component_id: ComponentId,
        delta: Value,
    },
    ComponentMessage {
        component_id: ComponentId,
        payload: Value,
    },
}

impl Outbound {
    /// Blur-triggered sync of an editor's text.
    pub fn text_sync(component_id: ComponentId, text: &str) -> Self {
        Outbound::ComponentStateUpdate {
            component_id,
            delta: json!({ "text": text }),
        }
    }

    /// Submit message carrying the editor's current text.
    pub fn text_message(component_id: ComponentId, text: &str) -> Self {
        Outbound::ComponentMessage {
            component_id,
            payload: json!({ "text": text }),
        }
    }

    /// Button press message.
    pub fn press_message(component_id: ComponentId) -> Self {
        Outbound::ComponentMessage {
            component_id,
            payload: json!({ "pressed": true }),
        }
    }

    pub fn component_id(&self) -> ComponentId {
        match self {
            Outbound::ComponentStateUpdate { component_id, .. } => *component_id,
            Outbound::ComponentMessage { component_id, .. } => *component_id,
        }
    }

    /// Short human-readable form for the on-screen traffic log.
    pub fn describe(&self) -> String {
        match self {
            Outbound::ComponentStateUpdate {
                component_id,
                delta,
            } => format!("state_update {} {}", component_id, delta),
            Outbound::ComponentMessage {
                component_id,
                payload,
            } => format!("message {} {}", component_id, payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_update_wire_shape() {
        let msg = Outbound::text_sync(ComponentId(7), "draft text");
        let value = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(
            value,
            json!({
                "type": "component_state_update",
                "component_id": 7,
                "delta": { "text": "draft text" }
            })
        );
    }

    #[test]
    fn test_component_message_wire_shape() {
        let msg = Outbound::text_message(ComponentId(1), "hello!");
        let value = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(
            value,
            json!({
                "type": "component_message",
                "component_id": 1,
                "payload": { "text": "hello!" }
            })
        );
    }

    #[test]
    fn test_press_message_wire_shape() {
        let msg = Outbound::press_message(ComponentId(2));
        let value = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(
            value,
            json!({
                "type": "component_message",
                "component_id": 2,
                "payload": { "pressed": true }
            })
        );
    }

    #[test]
    fn test_inbound_batch_parses_integer_keyed_map() {
        let raw = r#"{
            "type": "update_component_states",
            "delta_states": {
                "1": { "text": "hello" },
                "2": { "is_sensitive": false }
            }
        }"#;
        let msg: Inbound = serde_json::from_str(raw).expect("parse");
        let Inbound::UpdateComponentStates { delta_states } = msg;
        assert_eq!(delta_states.len(), 2);
        assert_eq!(
            delta_states.get(&ComponentId(1)),
            Some(&json!({ "text": "hello" }))
        );
        assert_eq!(
            delta_states.get(&ComponentId(2)),
            Some(&json!({ "is_sensitive": false }))
        );
    }

    #[test]
    fn test_inbound_round_trip() {
        let msg = Inbound::single_delta(ComponentId(4), json!({ "label": "Subject" }));
        let encoded = serde_json::to_string(&msg).expect("serialize");
        let decoded: Inbound = serde_json::from_str(&encoded).expect("parse");
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_unknown_message_type_rejected() {
        let raw = r#"{ "type": "reticulate_splines", "count": 3 }"#;
        assert!(serde_json::from_str::<Inbound>(raw).is_err());
        assert!(serde_json::from_str::<Outbound>(raw).is_err());
    }
}
