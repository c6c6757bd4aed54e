//! Cross-references a travel window against the academic calendar

use tracing::{debug, warn};

use crate::models::{AcademicEvent, ConflictAlert, TravelWindow, parse_date};

/// Produce one alert per event whose start date falls inside the window.
///
/// Both window bounds are inclusive. Events are reported in input order.
/// An absent window or one with an unparsable end yields no alerts. An
/// unparsable start leaves the window open below. Events with unparsable
/// start dates are skipped.
#[must_use]
pub fn evaluate_conflicts(
    window: Option<&TravelWindow>,
    events: &[AcademicEvent],
) -> Vec<ConflictAlert> {
    let Some(window) = window else {
        return Vec::new();
    };

    let Some(end) = parse_date(&window.end_date) else {
        warn!("Travel window {} has invalid end {:?}", window.id, window.end_date);
        return Vec::new();
    };
    let start = parse_date(&window.start_date);
    if start.is_none() {
        warn!(
            "Travel window {} has invalid start {:?}, treating it as open",
            window.id, window.start_date
        );
    }

    events
        .iter()
        .filter_map(|event| {
            let Some(event_date) = parse_date(&event.start) else {
                debug!("Skipping event {} with unparsable start {:?}", event.id, event.start);
                return None;
            };
            if start.is_some_and(|start| event_date < start) || event_date > end {
                return None;
            }
            Some(ConflictAlert {
                severity: event.event_type.conflict_severity(),
                reason: format!("{} overlap: {}", event.event_type, event.title),
                related_event_id: event.id.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AcademicEventType, Severity};
    use rstest::rstest;

    fn window(start: &str, end: &str) -> TravelWindow {
        TravelWindow {
            id: "w".to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            score: 50,
            conflicts: vec![],
        }
    }

    fn event(id: &str, event_type: AcademicEventType, title: &str, start: &str) -> AcademicEvent {
        AcademicEvent {
            id: id.to_string(),
            event_type,
            title: title.to_string(),
            start: start.to_string(),
            end: start.to_string(),
            priority: 3,
        }
    }

    #[test]
    fn test_exam_inside_window_is_high_risk() {
        let events = vec![event("ev-9", AcademicEventType::Exam, "Test Exam", "2026-03-21")];
        let alerts = evaluate_conflicts(Some(&window("2026-03-20", "2026-03-22")), &events);
        assert_eq!(
            alerts,
            vec![ConflictAlert {
                severity: Severity::HighRisk,
                reason: "exam overlap: Test Exam".to_string(),
                related_event_id: "ev-9".to_string(),
            }]
        );
    }

    #[test]
    fn test_events_outside_window() {
        let events = vec![
            event("ev-1", AcademicEventType::Exam, "Economics Midterm", "2026-03-18"),
            event("ev-2", AcademicEventType::Deadline, "Group Project", "2026-03-24"),
        ];
        let alerts = evaluate_conflicts(Some(&window("2026-03-06", "2026-03-08")), &events);
        assert!(alerts.is_empty());
    }

    #[rstest]
    #[case("2026-03-20")]
    #[case("2026-03-22")]
    fn test_bounds_are_inclusive(#[case] date: &str) {
        let events = vec![event("ev", AcademicEventType::Class, "Lecture", date)];
        let alerts = evaluate_conflicts(Some(&window("2026-03-20", "2026-03-22")), &events);
        assert_eq!(alerts.len(), 1);
    }

    #[rstest]
    #[case(AcademicEventType::Exam, Severity::HighRisk)]
    #[case(AcademicEventType::Deadline, Severity::Warning)]
    #[case(AcademicEventType::Class, Severity::Info)]
    #[case(AcademicEventType::Holiday, Severity::Info)]
    #[case(AcademicEventType::Other("excursion".into()), Severity::Info)]
    fn test_severity_mapping(#[case] event_type: AcademicEventType, #[case] expected: Severity) {
        let events = vec![event("ev", event_type, "Thing", "2026-03-21")];
        let alerts = evaluate_conflicts(Some(&window("2026-03-20", "2026-03-22")), &events);
        assert_eq!(alerts[0].severity, expected);
    }

    #[test]
    fn test_unparsable_event_is_skipped() {
        let events = vec![
            event("bad", AcademicEventType::Exam, "Broken", "21/03/2026"),
            event("good", AcademicEventType::Deadline, "Essay", "2026-03-21"),
        ];
        let alerts = evaluate_conflicts(Some(&window("2026-03-20", "2026-03-22")), &events);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].related_event_id, "good");
        assert_eq!(alerts[0].reason, "deadline overlap: Essay");
    }

    #[test]
    fn test_preserves_event_order() {
        let events = vec![
            event("late", AcademicEventType::Class, "B", "2026-03-22"),
            event("early", AcademicEventType::Class, "A", "2026-03-20"),
        ];
        let alerts = evaluate_conflicts(Some(&window("2026-03-20", "2026-03-22")), &events);
        let ids: Vec<&str> = alerts.iter().map(|a| a.related_event_id.as_str()).collect();
        assert_eq!(ids, vec!["late", "early"]);
    }

    #[test]
    fn test_absent_window() {
        let events = vec![event("ev", AcademicEventType::Exam, "X", "2026-03-21")];
        assert!(evaluate_conflicts(None, &events).is_empty());
    }

    #[test]
    fn test_unparsable_start_leaves_window_open() {
        let events = vec![
            event("old", AcademicEventType::Class, "Orientation", "2025-09-01"),
            event("ev", AcademicEventType::Exam, "X", "2026-03-21"),
            event("after", AcademicEventType::Exam, "Y", "2026-03-23"),
        ];
        let alerts = evaluate_conflicts(Some(&window("soon", "2026-03-22")), &events);
        let ids: Vec<&str> = alerts.iter().map(|a| a.related_event_id.as_str()).collect();
        assert_eq!(ids, vec!["old", "ev"]);
        assert_eq!(alerts[1].severity, Severity::HighRisk);
    }

    #[test]
    fn test_unparsable_end_yields_nothing() {
        let events = vec![event("ev", AcademicEventType::Exam, "X", "2026-03-21")];
        assert!(evaluate_conflicts(Some(&window("2026-03-20", "later")), &events).is_empty());
        assert!(evaluate_conflicts(Some(&window("soon", "later")), &events).is_empty());
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let events = vec![event("ev", AcademicEventType::Exam, "X", "2026-03-21")];
        let w = window("2026-03-20", "2026-03-22");
        assert_eq!(
            evaluate_conflicts(Some(&w), &events),
            evaluate_conflicts(Some(&w), &events)
        );
    }
}
