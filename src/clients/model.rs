/**
 * Client Record Types
 *
 * A client is the root record every case, execution, and compensation
 * letter references. Like every record kind it carries the common
 * versioned soft-deletable shape: immutable id and created_at, a version
 * counter starting at 1 and bumped by exactly 1 per mutation, an
 * updated_at touched on every mutation, and an is_deleted flag.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// A stored client record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub tax_id: Option<String>,
    pub vekalet_ofis_no: Option<String>,
    pub version: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a client.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientCreate {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub tax_id: Option<String>,
    pub vekalet_ofis_no: Option<String>,
}

impl ClientCreate {
    /// Required-field validation. Runs before any write.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name", "name must not be empty"));
        }
        Ok(())
    }

    /// Build a fresh record: version 1, both timestamps now, not deleted.
    pub fn into_record(self) -> Client {
        let now = Utc::now();
        Client {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            tax_id: self.tax_id,
            vekalet_ofis_no: self.vekalet_ofis_no,
            version: 1,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update: absent fields are left untouched (patch, not replace).
///
/// `version` is the optimistic lock token; when supplied it must equal the
/// stored version or the update fails with a conflict.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    pub vekalet_ofis_no: Option<String>,
    pub version: Option<i32>,
}

impl ClientUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("name", "name must not be empty"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_create_starts_at_version_one() {
        let record = ClientCreate {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555".to_string(),
            address: "".to_string(),
            tax_id: None,
            vekalet_ofis_no: None,
        }
        .into_record();

        assert_eq!(record.version, 1);
        assert!(!record.is_deleted);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let create = ClientCreate {
            name: "   ".to_string(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            tax_id: None,
            vekalet_ofis_no: None,
        };
        assert_matches!(create.validate(), Err(AppError::Validation { field: "name", .. }));
    }

    #[test]
    fn test_update_defaults_to_all_absent() {
        let update: ClientUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.name.is_none());
        assert!(update.version.is_none());
    }

    #[test]
    fn test_update_rejects_blank_name_patch() {
        let update: ClientUpdate = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_record_serializes_dates_as_iso8601() {
        let record = ClientCreate {
            name: "Ada".to_string(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            tax_id: None,
            vekalet_ofis_no: None,
        }
        .into_record();

        let value = serde_json::to_value(&record).unwrap();
        let ts = value["created_at"].as_str().unwrap();
        assert!(ts.parse::<DateTime<Utc>>().is_ok());
    }
}
