//! Enforcement (execution) file record types.
//!
//! Same versioned soft-deletable shape as the other kinds, with the
//! denormalized `client_name` snapshot refreshed only on reassignment.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// A stored enforcement file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Execution {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub defendant: Option<String>,
    pub execution_office: Option<String>,
    pub execution_number: Option<String>,
    pub status: Option<String>,
    pub execution_type: String,
    pub start_date: Option<NaiveDate>,
    pub office_archive_no: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_text: Option<String>,
    pub notes: Option<String>,
    pub haciz_durumu: Option<String>,
    pub responsible_person: Option<String>,
    #[serde(rename = "görevlendiren")]
    pub gorevlendiren: Option<String>,
    pub version: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionCreate {
    pub client_id: Uuid,
    pub defendant: Option<String>,
    pub execution_office: Option<String>,
    pub execution_number: Option<String>,
    pub status: Option<String>,
    pub execution_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub office_archive_no: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_text: Option<String>,
    pub notes: Option<String>,
    pub haciz_durumu: Option<String>,
    pub responsible_person: Option<String>,
    #[serde(rename = "görevlendiren")]
    pub gorevlendiren: Option<String>,
}

impl ExecutionCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        // No required free-text fields beyond the client reference, which
        // is validated against the live client set by the handler.
        Ok(())
    }

    pub fn into_record(self, client_name: String) -> Execution {
        let now = Utc::now();
        Execution {
            id: Uuid::new_v4(),
            client_id: self.client_id,
            client_name,
            defendant: self.defendant,
            execution_office: self.execution_office,
            execution_number: self.execution_number,
            status: self.status,
            execution_type: self
                .execution_type
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "İcra".to_string()),
            start_date: self.start_date,
            office_archive_no: self.office_archive_no,
            reminder_date: self.reminder_date,
            reminder_text: self.reminder_text,
            notes: self.notes,
            haciz_durumu: self.haciz_durumu,
            responsible_person: self.responsible_person,
            gorevlendiren: self.gorevlendiren,
            version: 1,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionUpdate {
    pub client_id: Option<Uuid>,
    pub defendant: Option<String>,
    pub execution_office: Option<String>,
    pub execution_number: Option<String>,
    pub status: Option<String>,
    pub execution_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub office_archive_no: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_text: Option<String>,
    pub notes: Option<String>,
    pub haciz_durumu: Option<String>,
    pub responsible_person: Option<String>,
    #[serde(rename = "görevlendiren")]
    pub gorevlendiren: Option<String>,
    pub version: Option<i32>,
}

/// Filters for GET /api/executions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionListQuery {
    pub status: Option<String>,
    pub client_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_type_defaults() {
        let create: ExecutionCreate = serde_json::from_value(serde_json::json!({
            "client_id": Uuid::new_v4(),
        }))
        .unwrap();
        let record = create.into_record("Ada".to_string());
        assert_eq!(record.execution_type, "İcra");
        assert_eq!(record.version, 1);
        assert!(!record.is_deleted);
    }

    #[test]
    fn test_patch_defaults_to_all_absent() {
        let update: ExecutionUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.client_id.is_none());
        assert!(update.version.is_none());
    }
}
