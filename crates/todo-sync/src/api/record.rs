//! Wire record
//!
//! The todo shape as the server sends it (camelCase, ISO-8601 strings).

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::model::{Todo, TodoId, Urgency};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TodoRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// The server's column is nullable; null reads as "no urgency"
    #[serde(default)]
    pub urgency: Option<i32>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl TryFrom<TodoRecord> for Todo {
    type Error = ApiError;

    fn try_from(record: TodoRecord) -> Result<Self, Self::Error> {
        let urgency = match record.urgency {
            Some(level) => Urgency::try_from(level).map_err(|e| ApiError::Decode(e.to_string()))?,
            None => Urgency::None,
        };
        Ok(Todo {
            id: TodoId::Server(record.id),
            title: record.title,
            completed: record.completed,
            urgency,
            created_at: parse_timestamp(&record.created_at)?,
            updated_at: record.updated_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

/// RFC 3339, or a naive ISO-8601 datetime taken as UTC
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| ApiError::Decode(format!("bad timestamp {:?}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(urgency: Option<i32>) -> TodoRecord {
        TodoRecord {
            id: 4,
            title: "Walk dog".to_string(),
            completed: true,
            urgency,
            created_at: "2024-03-01T09:30:00.250000".to_string(),
            updated_at: None,
        }
    }

    #[test]
    fn test_record_conversion() {
        let todo = Todo::try_from(record(Some(3))).unwrap();
        assert_eq!(todo.id, TodoId::Server(4));
        assert_eq!(todo.urgency, Urgency::High);
        assert!(todo.completed);
        assert_eq!(todo.updated_at, None);
    }

    #[test]
    fn test_null_urgency_reads_as_none() {
        let todo = Todo::try_from(record(None)).unwrap();
        assert_eq!(todo.urgency, Urgency::None);
    }

    #[test]
    fn test_out_of_range_urgency_is_decode_error() {
        assert!(matches!(Todo::try_from(record(Some(9))), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T09:30:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01T10:30:00+01:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01T09:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01 09:30:00").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_record_deserializes_camel_case() {
        let json = r#"{"id":1,"title":"Buy milk","completed":false,"urgency":1,"createdAt":"2024-01-01T00:00:00","updatedAt":null}"#;
        let record: TodoRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.updated_at, None);
    }
}
