//! Envelope codec - bytes <-> `Envelope`
//!
//! # デコードフロー
//! 1. bytes を JSON として parse（失敗 → `DecodeError::Malformed`）
//! 2. `id` と `type` の存在を確認（欠落 → `DecodeError::MissingAttribute`）
//! 3. `Envelope` にデシリアライズ
//!
//! The payload stays an untyped JSON value here; it is decoded into a handler's
//! own structure only after the router found a binding (`Envelope::data_as`).

use serde_json::Value;

use crate::domain::{DecodeError, Envelope};

/// Content type of a structured-mode envelope on the wire.
pub const STRUCTURED_CONTENT_TYPE: &str = "application/cloudevents+json";

const REQUIRED_ATTRIBUTES: [&str; 2] = ["id", "type"];

pub fn decode(raw: &[u8]) -> Result<Envelope, DecodeError> {
    let value: Value = serde_json::from_slice(raw)?;
    let object = value.as_object().ok_or(DecodeError::NotAnObject)?;

    for attribute in REQUIRED_ATTRIBUTES {
        match object.get(attribute) {
            None => return Err(DecodeError::MissingAttribute(attribute)),
            Some(Value::String(s)) if !s.is_empty() => {}
            Some(_) => return Err(DecodeError::InvalidAttribute(attribute)),
        }
    }

    Ok(serde_json::from_value(value)?)
}

pub fn encode(envelope: &Envelope) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventId;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn decodes_keptn_triggered_event() {
        let raw = json!({
            "specversion": "1.0",
            "id": "f2b878d3-03c0-4e8f-bc3f-454bc1b3d79d",
            "type": "sh.keptn.event.monaco.triggered",
            "source": "shipyard-controller",
            "datacontenttype": "application/json",
            "time": "2021-03-01T10:00:00Z",
            "shkeptncontext": "a3e5f16d-8888-4720-82c7-6995062905c1",
            "data": {"project": "sockshop", "stage": "dev", "service": "carts"}
        });

        let envelope = decode(raw.to_string().as_bytes()).unwrap();
        assert_eq!(envelope.id().as_str(), "f2b878d3-03c0-4e8f-bc3f-454bc1b3d79d");
        assert_eq!(envelope.event_type(), "sh.keptn.event.monaco.triggered");
        assert_eq!(envelope.source(), "shipyard-controller");
        assert_eq!(
            envelope.time(),
            Some(Utc.with_ymd_and_hms(2021, 3, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(
            envelope.extension("shkeptncontext"),
            Some(&json!("a3e5f16d-8888-4720-82c7-6995062905c1"))
        );
        assert_eq!(envelope.data().unwrap()["project"], "sockshop");
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = decode(b"{not json").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = decode(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject));
    }

    #[rstest]
    #[case(json!({"type": "x.event.a.triggered"}), "id")]
    #[case(json!({"id": "1"}), "type")]
    fn missing_required_attribute_is_rejected(#[case] raw: Value, #[case] attribute: &str) {
        let err = decode(raw.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::MissingAttribute(a) if a == attribute));
    }

    #[rstest]
    #[case(json!({"id": "", "type": "x.event.a.triggered"}), "id")]
    #[case(json!({"id": "1", "type": 7}), "type")]
    fn invalid_required_attribute_is_rejected(#[case] raw: Value, #[case] attribute: &str) {
        let err = decode(raw.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidAttribute(a) if a == attribute));
    }

    #[test]
    fn missing_source_and_specversion_default() {
        let envelope = decode(br#"{"id":"1","type":"x.event.a.triggered"}"#).unwrap();
        assert_eq!(envelope.source(), "");
        assert_eq!(envelope.specversion(), "1.0");
        assert!(envelope.data().is_none());
    }

    #[test]
    fn encode_then_decode_preserves_envelope() {
        let envelope = Envelope::new(EventId::new("42"), "x.event.monaco.finished", "monaco-service")
            .with_time(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
            .with_extension("shkeptncontext", "ctx-1")
            .with_extension("triggeredid", "41")
            .with_data(json!({"project": "p1", "status": "succeeded"}));

        let bytes = encode(&envelope).unwrap();
        let back = decode(&bytes).unwrap();
        assert_eq!(back, envelope);
    }
}
