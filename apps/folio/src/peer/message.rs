use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graffiti::Stroke;

/// Payloads this site understands. The transport itself carries any JSON;
/// anything that does not decode here is ignored by the consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PeerMessage {
    Stroke(Stroke),
}

impl PeerMessage {
    pub fn decode(payload: &Value) -> Option<Self> {
        Self::deserialize(payload).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peer::PeerId;
    use serde_json::json;

    #[test]
    fn test_stroke_wire_shape() {
        let author = PeerId::generate();
        let message = PeerMessage::Stroke(Stroke {
            id: "abc".to_string(),
            points: vec![[0.0, 1.0, 0.0]],
            color: "#00ff88".to_string(),
            user_id: author.to_string(),
        });
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "stroke");
        assert_eq!(value["data"]["userId"], author.to_string());
        assert_eq!(value["data"]["points"], json!([[0.0, 1.0, 0.0]]));
    }

    #[test]
    fn test_unknown_payloads_do_not_decode() {
        assert!(PeerMessage::decode(&json!({"type": "cursor", "data": [1, 2]})).is_none());
        assert!(PeerMessage::decode(&json!("plain text")).is_none());
    }
}
