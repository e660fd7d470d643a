/**
 * Case Record Types
 *
 * A case references a client and carries a denormalized `client_name`
 * snapshot, copied from the client at write time. The snapshot is
 * refreshed only when the reference changes - a later rename of the
 * client does not propagate.
 */

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// A stored case record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Case {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub case_name: String,
    pub description: Option<String>,
    pub case_type: Option<String>,
    pub status: String,
    pub court: Option<String>,
    pub case_number: Option<String>,
    pub defendant: Option<String>,
    pub notes: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub next_hearing_date: Option<NaiveDate>,
    pub reminder_date: Option<NaiveDate>,
    pub office_archive_no: Option<String>,
    pub responsible_person: Option<String>,
    #[serde(rename = "görevlendiren")]
    pub gorevlendiren: Option<String>,
    pub version: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when opening a case.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseCreate {
    pub client_id: Uuid,
    pub case_name: String,
    pub description: Option<String>,
    pub case_type: Option<String>,
    pub status: Option<String>,
    pub court: Option<String>,
    pub case_number: Option<String>,
    pub defendant: Option<String>,
    pub notes: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub next_hearing_date: Option<NaiveDate>,
    pub reminder_date: Option<NaiveDate>,
    pub office_archive_no: Option<String>,
    pub responsible_person: Option<String>,
    #[serde(rename = "görevlendiren")]
    pub gorevlendiren: Option<String>,
}

impl CaseCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.case_name.trim().is_empty() {
            return Err(AppError::validation("case_name", "case name must not be empty"));
        }
        Ok(())
    }

    /// Build the record; `client_name` comes from the validated live
    /// client, never from the caller.
    pub fn into_record(self, client_name: String) -> Case {
        let now = Utc::now();
        Case {
            id: Uuid::new_v4(),
            client_id: self.client_id,
            client_name,
            case_name: self.case_name,
            description: self.description,
            case_type: self.case_type,
            status: self
                .status
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "Derdest".to_string()),
            court: self.court,
            case_number: self.case_number,
            defendant: self.defendant,
            notes: self.notes,
            start_date: self.start_date,
            next_hearing_date: self.next_hearing_date,
            reminder_date: self.reminder_date,
            office_archive_no: self.office_archive_no,
            responsible_person: self.responsible_person,
            gorevlendiren: self.gorevlendiren,
            version: 1,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; absent fields stay untouched. A supplied `client_id`
/// is re-validated against a live client and refreshes `client_name`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseUpdate {
    pub client_id: Option<Uuid>,
    pub case_name: Option<String>,
    pub description: Option<String>,
    pub case_type: Option<String>,
    pub status: Option<String>,
    pub court: Option<String>,
    pub case_number: Option<String>,
    pub defendant: Option<String>,
    pub notes: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub next_hearing_date: Option<NaiveDate>,
    pub reminder_date: Option<NaiveDate>,
    pub office_archive_no: Option<String>,
    pub responsible_person: Option<String>,
    #[serde(rename = "görevlendiren")]
    pub gorevlendiren: Option<String>,
    pub version: Option<i32>,
}

impl CaseUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.case_name {
            if name.trim().is_empty() {
                return Err(AppError::validation("case_name", "case name must not be empty"));
            }
        }
        Ok(())
    }
}

/// Filters for GET /api/cases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseListQuery {
    pub status: Option<String>,
    pub client_id: Option<Uuid>,
    /// Free-text search over case name/number, defendant and client name.
    pub query: Option<String>,
    pub responsible_person: Option<String>,
    #[serde(rename = "görevlendiren")]
    pub gorevlendiren: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Filters for GET /api/cases/search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseSearchQuery {
    pub case_type: Option<String>,
    pub status: Option<String>,
    pub court: Option<String>,
    pub client_id: Option<Uuid>,
    /// Defendant name fragment.
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_derdest() {
        let create: CaseCreate = serde_json::from_value(serde_json::json!({
            "client_id": Uuid::new_v4(),
            "case_name": "Smith v. Jones",
        }))
        .unwrap();
        let record = create.into_record("Ada".to_string());
        assert_eq!(record.status, "Derdest");
        assert_eq!(record.version, 1);
    }

    #[test]
    fn test_blank_status_falls_back_to_default() {
        let create: CaseCreate = serde_json::from_value(serde_json::json!({
            "client_id": Uuid::new_v4(),
            "case_name": "Smith v. Jones",
            "status": "  ",
        }))
        .unwrap();
        assert_eq!(create.into_record("Ada".to_string()).status, "Derdest");
    }

    #[test]
    fn test_gorevlendiren_wire_name() {
        let update: CaseUpdate =
            serde_json::from_str(r#"{"görevlendiren":"Av. Yılmaz"}"#).unwrap();
        assert_eq!(update.gorevlendiren.as_deref(), Some("Av. Yılmaz"));

        let create: CaseCreate = serde_json::from_value(serde_json::json!({
            "client_id": Uuid::new_v4(),
            "case_name": "X",
            "görevlendiren": "Av. Yılmaz",
        }))
        .unwrap();
        let value = serde_json::to_value(create.into_record("Ada".to_string())).unwrap();
        assert_eq!(value["görevlendiren"], "Av. Yılmaz");
    }

    #[test]
    fn test_dates_serialize_as_calendar_dates() {
        let create: CaseCreate = serde_json::from_value(serde_json::json!({
            "client_id": Uuid::new_v4(),
            "case_name": "X",
            "start_date": "2026-03-01",
        }))
        .unwrap();
        let value = serde_json::to_value(create.into_record("Ada".to_string())).unwrap();
        assert_eq!(value["start_date"], "2026-03-01");
    }

    #[test]
    fn test_create_requires_case_name() {
        let create: CaseCreate = serde_json::from_value(serde_json::json!({
            "client_id": Uuid::new_v4(),
            "case_name": "",
        }))
        .unwrap();
        assert!(create.validate().is_err());
    }
}
