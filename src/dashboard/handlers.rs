/**
 * Dashboard Aggregation
 *
 * One read-only endpoint that feeds the landing view: per-kind live
 * record counts plus the merged list of upcoming reminders drawn from
 * the three reminder-bearing record kinds. Reminders are tagged with
 * their source kind so the consumer can route a click to the right
 * detail view.
 */

use axum::{extract::State, response::Json};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// One upcoming reminder, tagged by the record kind it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reminder {
    Case {
        case_id: Uuid,
        case_name: String,
        case_number: Option<String>,
        court: Option<String>,
        client_name: String,
        defendant: Option<String>,
        description: Option<String>,
        reminder_date: NaiveDate,
        #[serde(rename = "görevlendiren")]
        gorevlendiren: Option<String>,
    },
    Execution {
        execution_id: Uuid,
        execution_number: Option<String>,
        execution_office: Option<String>,
        client_name: String,
        defendant: Option<String>,
        reminder_text: Option<String>,
        reminder_date: NaiveDate,
        #[serde(rename = "görevlendiren")]
        gorevlendiren: Option<String>,
    },
    CompensationLetter {
        compensation_letter_id: Uuid,
        letter_number: Option<String>,
        court: Option<String>,
        case_number: Option<String>,
        customer: Option<String>,
        client_name: String,
        reminder_text: Option<String>,
        reminder_date: NaiveDate,
        #[serde(rename = "görevlendiren")]
        gorevlendiren: Option<String>,
    },
}

impl Reminder {
    fn date(&self) -> NaiveDate {
        match self {
            Reminder::Case { reminder_date, .. }
            | Reminder::Execution { reminder_date, .. }
            | Reminder::CompensationLetter { reminder_date, .. } => *reminder_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub total_clients: i64,
    pub total_cases: i64,
    pub total_executions: i64,
    pub total_compensation_letters: i64,
    pub upcoming_reminders: Vec<Reminder>,
}

#[derive(Debug, sqlx::FromRow)]
struct CaseReminderRow {
    id: Uuid,
    case_name: String,
    case_number: Option<String>,
    court: Option<String>,
    client_name: String,
    defendant: Option<String>,
    description: Option<String>,
    reminder_date: NaiveDate,
    gorevlendiren: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ExecutionReminderRow {
    id: Uuid,
    execution_number: Option<String>,
    execution_office: Option<String>,
    client_name: String,
    defendant: Option<String>,
    reminder_text: Option<String>,
    reminder_date: NaiveDate,
    gorevlendiren: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct LetterReminderRow {
    id: Uuid,
    letter_number: Option<String>,
    court: Option<String>,
    case_number: Option<String>,
    customer: Option<String>,
    client_name: String,
    reminder_text: Option<String>,
    reminder_date: NaiveDate,
    gorevlendiren: Option<String>,
}

async fn count_live(pool: &PgPool, table: &str) -> Result<i64, sqlx::Error> {
    // `table` is one of four fixed names below, never caller input.
    sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {table} WHERE is_deleted = FALSE"
    ))
    .fetch_one(pool)
    .await
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(pool): State<Option<PgPool>>,
) -> Result<Json<DashboardData>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;

    let total_clients = count_live(&pool, "clients").await?;
    let total_cases = count_live(&pool, "cases").await?;
    let total_executions = count_live(&pool, "executions").await?;
    let total_compensation_letters = count_live(&pool, "compensation_letters").await?;

    let case_rows = sqlx::query_as::<_, CaseReminderRow>(
        "SELECT id, case_name, case_number, court, client_name, defendant, description, \
                reminder_date, gorevlendiren \
         FROM cases \
         WHERE is_deleted = FALSE AND reminder_date IS NOT NULL AND reminder_date >= CURRENT_DATE \
         ORDER BY reminder_date ASC",
    )
    .fetch_all(&pool)
    .await?;

    let execution_rows = sqlx::query_as::<_, ExecutionReminderRow>(
        "SELECT id, execution_number, execution_office, client_name, defendant, reminder_text, \
                reminder_date, gorevlendiren \
         FROM executions \
         WHERE is_deleted = FALSE AND reminder_date IS NOT NULL AND reminder_date >= CURRENT_DATE \
         ORDER BY reminder_date ASC",
    )
    .fetch_all(&pool)
    .await?;

    let letter_rows = sqlx::query_as::<_, LetterReminderRow>(
        "SELECT id, letter_number, court, case_number, customer, client_name, reminder_text, \
                reminder_date, gorevlendiren \
         FROM compensation_letters \
         WHERE is_deleted = FALSE AND reminder_date IS NOT NULL AND reminder_date >= CURRENT_DATE \
         ORDER BY reminder_date ASC",
    )
    .fetch_all(&pool)
    .await?;

    let mut upcoming_reminders: Vec<Reminder> = Vec::with_capacity(
        case_rows.len() + execution_rows.len() + letter_rows.len(),
    );
    upcoming_reminders.extend(case_rows.into_iter().map(|row| Reminder::Case {
        case_id: row.id,
        case_name: row.case_name,
        case_number: row.case_number,
        court: row.court,
        client_name: row.client_name,
        defendant: row.defendant,
        description: row.description,
        reminder_date: row.reminder_date,
        gorevlendiren: row.gorevlendiren,
    }));
    upcoming_reminders.extend(execution_rows.into_iter().map(|row| Reminder::Execution {
        execution_id: row.id,
        execution_number: row.execution_number,
        execution_office: row.execution_office,
        client_name: row.client_name,
        defendant: row.defendant,
        reminder_text: row.reminder_text,
        reminder_date: row.reminder_date,
        gorevlendiren: row.gorevlendiren,
    }));
    upcoming_reminders.extend(letter_rows.into_iter().map(|row| Reminder::CompensationLetter {
        compensation_letter_id: row.id,
        letter_number: row.letter_number,
        court: row.court,
        case_number: row.case_number,
        customer: row.customer,
        client_name: row.client_name,
        reminder_text: row.reminder_text,
        reminder_date: row.reminder_date,
        gorevlendiren: row.gorevlendiren,
    }));
    upcoming_reminders.sort_by_key(Reminder::date);

    Ok(Json(DashboardData {
        total_clients,
        total_cases,
        total_executions,
        total_compensation_letters,
        upcoming_reminders,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_reminder_serializes_with_kind_tag() {
        let reminder = Reminder::Case {
            case_id: Uuid::new_v4(),
            case_name: "Tahliye".to_string(),
            case_number: Some("2026/41".to_string()),
            court: None,
            client_name: "Ada".to_string(),
            defendant: None,
            description: None,
            reminder_date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
            gorevlendiren: Some("Deniz".to_string()),
        };
        let value = serde_json::to_value(&reminder).unwrap();
        assert_eq!(value["type"], "case");
        assert_eq!(value["reminder_date"], "2026-09-15");
        assert_eq!(value["görevlendiren"], "Deniz");
        assert!(value.get("execution_id").is_none());
    }

    #[test]
    fn test_letter_reminder_tag_is_snake_case() {
        let reminder = Reminder::CompensationLetter {
            compensation_letter_id: Uuid::new_v4(),
            letter_number: None,
            court: None,
            case_number: None,
            customer: None,
            client_name: "Ada".to_string(),
            reminder_text: None,
            reminder_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            gorevlendiren: None,
        };
        let value = serde_json::to_value(&reminder).unwrap();
        assert_eq!(value["type"], "compensation_letter");
    }

    #[test]
    fn test_reminders_sort_by_date_across_kinds() {
        let later = Reminder::Execution {
            execution_id: Uuid::new_v4(),
            execution_number: None,
            execution_office: None,
            client_name: "Ada".to_string(),
            defendant: None,
            reminder_text: None,
            reminder_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            gorevlendiren: None,
        };
        let sooner = Reminder::Case {
            case_id: Uuid::new_v4(),
            case_name: "Alacak".to_string(),
            case_number: None,
            court: None,
            client_name: "Ada".to_string(),
            defendant: None,
            description: None,
            reminder_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            gorevlendiren: None,
        };
        let mut reminders = vec![later, sooner];
        reminders.sort_by_key(Reminder::date);
        assert!(matches!(reminders[0], Reminder::Case { .. }));
    }
}
