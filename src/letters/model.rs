//! Compensation letter record types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// A stored compensation letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompensationLetter {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub letter_number: Option<String>,
    pub bank: Option<String>,
    pub customer_number: Option<String>,
    pub customer: Option<String>,
    pub court: Option<String>,
    pub case_number: Option<String>,
    pub status: Option<String>,
    pub description_text: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_text: Option<String>,
    pub responsible_person: Option<String>,
    #[serde(rename = "görevlendiren")]
    pub gorevlendiren: Option<String>,
    pub version: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompensationLetterCreate {
    pub client_id: Uuid,
    pub letter_number: Option<String>,
    pub bank: Option<String>,
    pub customer_number: Option<String>,
    pub customer: Option<String>,
    pub court: Option<String>,
    pub case_number: Option<String>,
    pub status: Option<String>,
    pub description_text: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_text: Option<String>,
    pub responsible_person: Option<String>,
    #[serde(rename = "görevlendiren")]
    pub gorevlendiren: Option<String>,
}

impl CompensationLetterCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }

    pub fn into_record(self, client_name: String) -> CompensationLetter {
        let now = Utc::now();
        CompensationLetter {
            id: Uuid::new_v4(),
            client_id: self.client_id,
            client_name,
            letter_number: self.letter_number,
            bank: self.bank,
            customer_number: self.customer_number,
            customer: self.customer,
            court: self.court,
            case_number: self.case_number,
            status: self.status,
            description_text: self.description_text,
            reminder_date: self.reminder_date,
            reminder_text: self.reminder_text,
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
pub struct CompensationLetterUpdate {
    pub client_id: Option<Uuid>,
    pub letter_number: Option<String>,
    pub bank: Option<String>,
    pub customer_number: Option<String>,
    pub customer: Option<String>,
    pub court: Option<String>,
    pub case_number: Option<String>,
    pub status: Option<String>,
    pub description_text: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_text: Option<String>,
    pub responsible_person: Option<String>,
    #[serde(rename = "görevlendiren")]
    pub gorevlendiren: Option<String>,
    pub version: Option<i32>,
}

/// Filters for GET /api/compensation-letters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompensationLetterListQuery {
    pub status: Option<String>,
    pub client_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_letter_shape() {
        let create: CompensationLetterCreate = serde_json::from_value(serde_json::json!({
            "client_id": Uuid::new_v4(),
            "letter_number": "2026/17",
            "bank": "Ziraat",
        }))
        .unwrap();
        let record = create.into_record("Ada".to_string());
        assert_eq!(record.version, 1);
        assert!(!record.is_deleted);
        assert_eq!(record.letter_number.as_deref(), Some("2026/17"));
        assert_eq!(record.client_name, "Ada");
    }
}
