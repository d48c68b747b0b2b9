//! Registry events
//!
//! Facts broadcast after a domain change has been committed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::site_domain::Domain;

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    DomainSaved(DomainSavedEvent),
    DomainDeleted(DomainDeletedEvent),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::DomainSaved(_) => "domain_saved",
            Event::DomainDeleted(_) => "domain_deleted",
        }
    }

    pub fn domain_name(&self) -> &str {
        match self {
            Event::DomainSaved(e) => &e.domain_name,
            Event::DomainDeleted(e) => &e.domain_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainSavedEvent {
    pub domain_id: i32,
    pub domain_name: String,
    pub root_content_id: Option<i32>,
    pub language_iso_code: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<&Domain> for DomainSavedEvent {
    fn from(d: &Domain) -> Self {
        Self {
            domain_id: d.id,
            domain_name: d.name.clone(),
            root_content_id: d.root_content_id,
            language_iso_code: d.language_iso_code.clone(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainDeletedEvent {
    pub domain_id: i32,
    pub domain_name: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&Domain> for DomainDeletedEvent {
    fn from(d: &Domain) -> Self {
        Self {
            domain_id: d.id,
            domain_name: d.name.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Envelope carried on the event bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_event_serializes_with_type_tag() {
        let domain = Domain::new("shop.example.com").with_root_content(42);
        let msg = EventMessage::new(Event::DomainSaved(DomainSavedEvent::from(&domain)));
        let json: serde_json::Value =
            serde_json::from_str(&msg.to_json().expect("serialize")).expect("parse");

        assert_eq!(json["type"], "DomainSaved");
        assert_eq!(json["data"]["domain_name"], "shop.example.com");
        assert_eq!(json["data"]["root_content_id"], 42);
        assert!(json["id"].is_string());
    }

    #[test]
    fn event_accessors() {
        let domain = Domain::new("old.example.com");
        let event = Event::DomainDeleted(DomainDeletedEvent::from(&domain));
        assert_eq!(event.event_type(), "domain_deleted");
        assert_eq!(event.domain_name(), "old.example.com");
    }
}
