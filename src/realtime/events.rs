/**
 * Change Event Envelope
 *
 * This module defines the wire-level envelope broadcast to every connected
 * viewer whenever a record is created, updated, deleted, or restored.
 *
 * # Wire Format
 *
 * ```json
 * {
 *   "type": "data_change",
 *   "change_type": "create" | "update" | "delete" | "restore",
 *   "entity_type": "client" | "case" | "execution" | "compensation_letter" | "all",
 *   "entity_id": "<uuid string>",
 *   "data": { ... } | null,
 *   "timestamp": "<RFC 3339>"
 * }
 * ```
 *
 * Date-valued payload fields are rendered as ISO-8601 calendar dates and
 * datetime fields as RFC 3339 combined date-times; both fall out of the
 * chrono serde representations used by the record types.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of mutation that produced a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Create,
    Update,
    Delete,
    Restore,
}

/// Record kind named in a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Client,
    Case,
    Execution,
    CompensationLetter,
    /// A restore touches every kind at once.
    All,
}

impl EntityType {
    /// Wire name of this entity kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Case => "case",
            Self::Execution => "execution",
            Self::CompensationLetter => "compensation_letter",
            Self::All => "all",
        }
    }
}

/// Envelope broadcast to all registered notification channels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeEvent {
    /// Always `"data_change"`.
    #[serde(rename = "type")]
    pub message_type: String,
    pub change_type: ChangeType,
    pub entity_type: EntityType,
    pub entity_id: String,
    /// Full record snapshot for create/update; `null` for delete/restore.
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    fn new(
        change_type: ChangeType,
        entity_type: EntityType,
        entity_id: String,
        data: serde_json::Value,
    ) -> Self {
        Self {
            message_type: "data_change".to_string(),
            change_type,
            entity_type,
            entity_id,
            data,
            timestamp: Utc::now(),
        }
    }

    /// Event for a newly created record carrying its full snapshot.
    pub fn created(entity_type: EntityType, id: Uuid, data: serde_json::Value) -> Self {
        Self::new(ChangeType::Create, entity_type, id.to_string(), data)
    }

    /// Event for an updated record carrying its full post-update snapshot.
    pub fn updated(entity_type: EntityType, id: Uuid, data: serde_json::Value) -> Self {
        Self::new(ChangeType::Update, entity_type, id.to_string(), data)
    }

    /// Event for a soft-deleted record. Carries no payload beyond the id.
    pub fn deleted(entity_type: EntityType, id: Uuid) -> Self {
        Self::new(
            ChangeType::Delete,
            entity_type,
            id.to_string(),
            serde_json::Value::Null,
        )
    }

    /// Single event covering all entity kinds after a bulk restore.
    pub fn restored() -> Self {
        Self::new(
            ChangeType::Restore,
            EntityType::All,
            "all".to_string(),
            serde_json::Value::Null,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_event_wire_format() {
        let id = Uuid::new_v4();
        let event = ChangeEvent::created(
            EntityType::Client,
            id,
            serde_json::json!({"name": "Ada", "version": 1}),
        );

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "data_change");
        assert_eq!(value["change_type"], "create");
        assert_eq!(value["entity_type"], "client");
        assert_eq!(value["entity_id"], id.to_string());
        assert_eq!(value["data"]["name"], "Ada");

        // Timestamp must round-trip as RFC 3339 text.
        let ts = value["timestamp"].as_str().unwrap();
        assert!(ts.parse::<DateTime<Utc>>().is_ok());
    }

    #[test]
    fn test_delete_event_has_no_data_body() {
        let id = Uuid::new_v4();
        let event = ChangeEvent::deleted(EntityType::Case, id);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["change_type"], "delete");
        assert_eq!(value["entity_type"], "case");
        assert_eq!(value["entity_id"], id.to_string());
        assert!(value["data"].is_null());
    }

    #[test]
    fn test_restore_event_covers_all_kinds() {
        let event = ChangeEvent::restored();
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["change_type"], "restore");
        assert_eq!(value["entity_type"], "all");
    }

    #[test]
    fn test_compensation_letter_wire_name() {
        let event = ChangeEvent::updated(
            EntityType::CompensationLetter,
            Uuid::new_v4(),
            serde_json::json!({}),
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["entity_type"], "compensation_letter");
        assert_eq!(EntityType::CompensationLetter.as_str(), "compensation_letter");
    }

    #[test]
    fn test_envelope_round_trip() {
        let event = ChangeEvent::created(
            EntityType::Execution,
            Uuid::new_v4(),
            serde_json::json!({"status": "Derdest"}),
        );
        let text = serde_json::to_string(&event).unwrap();
        let parsed: ChangeEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, event);
    }
}
