//! Envelope - the structured event exchanged over the bus.
//!
//! CloudEvents 1.0 attributes in structured JSON mode. Every top-level member
//! that is not a context attribute is kept in `extensions`, so an envelope
//! survives a decode/encode round trip unchanged.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::errors::PayloadMismatch;
use super::ids::EventId;

pub const SPEC_VERSION: &str = "1.0";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Context attributes that can never be used as extension names.
pub const RESERVED_ATTRIBUTES: [&str; 8] = [
    "specversion",
    "id",
    "type",
    "source",
    "datacontenttype",
    "time",
    "data",
    "data_base64",
];

fn default_spec_version() -> String {
    SPEC_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default = "default_spec_version")]
    specversion: String,

    id: EventId,

    #[serde(rename = "type")]
    event_type: String,

    #[serde(default)]
    source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    datacontenttype: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,

    #[serde(flatten)]
    extensions: BTreeMap<String, Value>,
}

impl Envelope {
    pub fn new(id: EventId, event_type: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            specversion: default_spec_version(),
            id,
            event_type: event_type.into(),
            source: source.into(),
            datacontenttype: None,
            time: None,
            data: None,
            extensions: BTreeMap::new(),
        }
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Attaches a JSON payload and marks the content type accordingly.
    pub fn with_data(mut self, data: Value) -> Self {
        self.datacontenttype = Some(JSON_CONTENT_TYPE.to_string());
        self.data = Some(data);
        self
    }

    /// Sets an extension attribute. Reserved attribute names are ignored.
    pub fn with_extension(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if !RESERVED_ATTRIBUTES.contains(&name.as_str()) {
            self.extensions.insert(name, value.into());
        }
        self
    }

    pub fn specversion(&self) -> &str {
        &self.specversion
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn datacontenttype(&self) -> Option<&str> {
        self.datacontenttype.as_deref()
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.extensions.get(name)
    }

    pub fn extensions(&self) -> &BTreeMap<String, Value> {
        &self.extensions
    }

    /// Decodes `data` into the structure a handler expects.
    ///
    /// An envelope without data decodes as JSON `null`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, PayloadMismatch> {
        let data = self.data.clone().unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|source| PayloadMismatch {
            event_type: self.event_type.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Project {
        project: String,
    }

    #[test]
    fn data_as_decodes_matching_payload() {
        let envelope = Envelope::new(EventId::new("1"), "x.event.monaco.triggered", "test")
            .with_data(json!({"project": "p1"}));

        let project: Project = envelope.data_as().unwrap();
        assert_eq!(project.project, "p1");
        assert_eq!(envelope.datacontenttype(), Some(JSON_CONTENT_TYPE));
    }

    #[test]
    fn data_as_reports_mismatch() {
        let envelope = Envelope::new(EventId::new("1"), "x.event.monaco.triggered", "test")
            .with_data(json!({"project": 42}));

        let err = envelope.data_as::<Project>().unwrap_err();
        assert_eq!(err.event_type, "x.event.monaco.triggered");
    }

    #[test]
    fn missing_data_is_a_mismatch_for_structs() {
        let envelope = Envelope::new(EventId::new("1"), "x.event.monaco.triggered", "test");
        assert!(envelope.data_as::<Project>().is_err());
    }

    #[test]
    fn reserved_names_are_not_extensions() {
        let envelope = Envelope::new(EventId::new("1"), "t", "s")
            .with_extension("id", "other")
            .with_extension("shkeptncontext", "ctx");

        assert_eq!(envelope.id().as_str(), "1");
        assert!(envelope.extension("id").is_none());
        assert_eq!(envelope.extension("shkeptncontext"), Some(&json!("ctx")));
    }
}
