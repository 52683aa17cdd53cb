/// Messages sent from the popup and settings pages to the background
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum FocusMessage {
    #[serde(rename = "enableFocusMode")]
    Enable { mode: String },
    #[serde(rename = "disableFocusMode")]
    Disable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let enable = FocusMessage::Enable {
            mode: "Work".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&enable).unwrap(),
            json!({ "action": "enableFocusMode", "mode": "Work" })
        );
        assert_eq!(
            serde_json::to_value(&FocusMessage::Disable).unwrap(),
            json!({ "action": "disableFocusMode" })
        );
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let parsed = serde_json::from_value::<FocusMessage>(json!({ "action": "reload" }));
        assert!(parsed.is_err());
    }
}
