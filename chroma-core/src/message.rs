//! Messages exchanged with the extension popup.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Settings;

pub const UPDATE_SETTINGS_ACTION: &str = "updateSettings";

/// Parsed inbound runtime message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// `{action: "updateSettings", settings}`; `None` when the payload is
    /// missing or malformed, which is a no-op that is still acknowledged.
    UpdateSettings(Option<Settings>),
    /// Any other message. Not answered.
    Ignored,
}

impl InboundMessage {
    pub fn parse(message: &Value) -> Self {
        if message.get("action").and_then(Value::as_str) != Some(UPDATE_SETTINGS_ACTION) {
            return InboundMessage::Ignored;
        }

        let settings = message
            .get("settings")
            .filter(|value| value.is_object())
            .and_then(|value| serde_json::from_value::<Settings>(value.clone()).ok());

        InboundMessage::UpdateSettings(settings)
    }
}

/// Reply sent once an update has been applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorMode;
    use serde_json::json;

    #[test]
    fn parses_update_payload() {
        let message = json!({
            "action": "updateSettings",
            "settings": { "colorMode": "border", "showLegend": false, "removeCss": false }
        });

        let InboundMessage::UpdateSettings(Some(settings)) = InboundMessage::parse(&message) else {
            panic!("expected a settings update");
        };
        assert_eq!(settings.color_mode, ColorMode::Border);
        assert!(!settings.show_legend);
    }

    #[test]
    fn malformed_payload_is_an_empty_update() {
        for message in [
            json!({ "action": "updateSettings" }),
            json!({ "action": "updateSettings", "settings": 42 }),
            json!({ "action": "updateSettings", "settings": { "colorMode": "rainbow" } }),
        ] {
            assert_eq!(
                InboundMessage::parse(&message),
                InboundMessage::UpdateSettings(None)
            );
        }
    }

    #[test]
    fn other_actions_are_ignored() {
        assert_eq!(
            InboundMessage::parse(&json!({ "action": "ping" })),
            InboundMessage::Ignored
        );
        assert_eq!(InboundMessage::parse(&json!("updateSettings")), InboundMessage::Ignored);
    }

    #[test]
    fn ack_serializes_as_success_flag() {
        assert_eq!(serde_json::to_value(Ack::ok()).unwrap(), json!({ "success": true }));
    }
}
