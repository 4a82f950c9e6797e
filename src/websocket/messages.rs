//! Inbound WebSocket payloads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::ApiResponse;

/// A text frame received from the server, delivered verbatim to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    text: String,
}

impl InboundMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw frame payload.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parse the payload as a `{code, data, msg}` envelope.
    pub fn envelope<T: DeserializeOwned>(&self) -> Result<ApiResponse<T>, serde_json::Error> {
        serde_json::from_str(&self.text)
    }

    /// Parse the payload as a typed [`WsEvent`].
    pub fn event(&self) -> Result<WsEvent, serde_json::Error> {
        serde_json::from_str(&self.text)
    }
}

impl From<String> for InboundMessage {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WsEventType {
    Connect,
    Disconnect,
    Message,
    Error,
}

/// Structured event pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsEvent {
    #[serde(rename = "type")]
    pub kind: WsEventType,
    #[serde(default)]
    pub data: Value,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl WsEvent {
    /// Deserialize the event data into a concrete type.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_is_kept_verbatim() {
        let message = InboundMessage::new("  not json  ");
        assert_eq!(message.text(), "  not json  ");
        assert!(message.event().is_err());
    }

    #[test]
    fn test_event_parses_type_and_data() {
        let message = InboundMessage::new(
            r#"{"type":"message","data":{"sessionId":"s1","content":"hi"},"timestamp":1700000000000}"#,
        );
        let event = message.event().unwrap();
        assert_eq!(event.kind, WsEventType::Message);
        assert_eq!(event.timestamp, 1_700_000_000_000);
        assert_eq!(event.data["content"], "hi");
    }

    #[test]
    fn test_event_data_as_struct() {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ChatPush {
            session_id: String,
        }

        let event = WsEvent {
            kind: WsEventType::Message,
            data: json!({"sessionId": "abc"}),
            timestamp: 0,
        };
        let push: ChatPush = event.data_as().unwrap();
        assert_eq!(push.session_id, "abc");
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let message = InboundMessage::new(r#"{"type":"typing","data":null,"timestamp":1}"#);
        assert!(message.event().is_err());
    }

    #[test]
    fn test_envelope_parses_business_payload() {
        let message = InboundMessage::new(r#"{"code":0,"data":"hello","msg":"ok"}"#);
        let envelope = message.envelope::<String>().unwrap();
        assert_eq!(envelope.code, 0);
        assert_eq!(envelope.data.as_deref(), Some("hello"));
    }
}
