//! Academic calendar events, travel windows and conflict alerts

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Severity;

/// Date format used for every calendar date on the wire and in storage
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Kind of academic event.
///
/// The client may send types this service does not know about; they are kept
/// verbatim so they round-trip and still show up in conflict reasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcademicEventType {
    Class,
    Deadline,
    Exam,
    Holiday,
    #[serde(untagged)]
    Other(String),
}

impl AcademicEventType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            AcademicEventType::Class => "class",
            AcademicEventType::Deadline => "deadline",
            AcademicEventType::Exam => "exam",
            AcademicEventType::Holiday => "holiday",
            AcademicEventType::Other(other) => other,
        }
    }

    /// Severity of a travel window overlapping an event of this type
    #[must_use]
    pub fn conflict_severity(&self) -> Severity {
        match self {
            AcademicEventType::Exam => Severity::HighRisk,
            AcademicEventType::Deadline => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

impl Default for AcademicEventType {
    fn default() -> Self {
        AcademicEventType::Other(String::new())
    }
}

impl From<&str> for AcademicEventType {
    fn from(value: &str) -> Self {
        match value {
            "class" => AcademicEventType::Class,
            "deadline" => AcademicEventType::Deadline,
            "exam" => AcademicEventType::Exam,
            "holiday" => AcademicEventType::Holiday,
            other => AcademicEventType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AcademicEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry from the student's academic calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub event_type: AcademicEventType,
    #[serde(default)]
    pub title: String,
    /// Start date (`YYYY-MM-DD`)
    #[serde(default)]
    pub start: String,
    /// End date (`YYYY-MM-DD`)
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub priority: i32,
}

/// A candidate date range for travelling, pre-scored for calendar friendliness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelWindow {
    pub id: String,
    pub start_date: String,
    pub end_date: String,
    pub score: i32,
    #[serde(default)]
    pub conflicts: Vec<String>,
}

impl TravelWindow {
    /// Whether the window overlaps the optional `[from, to]` filter.
    ///
    /// Dates are ISO strings so lexical comparison orders them correctly.
    #[must_use]
    pub fn overlaps(&self, from: Option<&str>, to: Option<&str>) -> bool {
        let after_from = from.is_none_or(|from| self.end_date.as_str() >= from);
        let before_to = to.is_none_or(|to| self.start_date.as_str() <= to);
        after_from && before_to
    }
}

/// A calendar event that collides with a travel window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictAlert {
    pub severity: Severity,
    pub reason: String,
    pub related_event_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("\"exam\"", AcademicEventType::Exam)]
    #[case("\"deadline\"", AcademicEventType::Deadline)]
    #[case("\"holiday\"", AcademicEventType::Holiday)]
    #[case("\"workshop\"", AcademicEventType::Other("workshop".to_string()))]
    fn test_event_type_from_json(#[case] raw: &str, #[case] expected: AcademicEventType) {
        let parsed: AcademicEventType = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), raw);
    }

    #[test]
    fn test_event_uses_type_field_name() {
        let event: AcademicEvent = serde_json::from_str(
            r#"{"type":"exam","title":"Test","start":"2026-05-01",
                "end":"2026-05-01","priority":5}"#,
        )
        .unwrap();
        assert!(event.id.is_empty());
        assert_eq!(event.event_type, AcademicEventType::Exam);
        assert_eq!(event.priority, 5);
    }

    #[test]
    fn test_window_overlap_filter() {
        let window = TravelWindow {
            id: "w-1".into(),
            start_date: "2026-03-06".into(),
            end_date: "2026-03-08".into(),
            score: 88,
            conflicts: vec![],
        };
        assert!(window.overlaps(None, None));
        assert!(window.overlaps(Some("2026-03-01"), Some("2026-03-10")));
        assert!(window.overlaps(Some("2026-03-08"), None));
        assert!(!window.overlaps(Some("2026-03-09"), None));
        assert!(!window.overlaps(None, Some("2026-03-05")));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-03-21"), NaiveDate::from_ymd_opt(2026, 3, 21));
        assert!(parse_date("21.03.2026").is_none());
        assert!(parse_date("").is_none());
    }
}
