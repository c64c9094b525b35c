//! ICS file generation.

use crate::calendar::Calendar;
use crate::error::MergeResult;
use crate::event::{EventRecord, EventTime};
use icalendar::{Component, EventLike, Property, ValueType};

/// Marker comment stamped on every generated event.
pub const PRODUCER_COMMENT: &str = "Processed by icsmerge";

/// Generate .ics content for an output calendar.
///
/// Output is normalized: LF line endings only, no trailing whitespace, no
/// CALSCALE:GREGORIAN, and our own PRODID.
pub fn generate_ics(calendar: &Calendar) -> MergeResult<String> {
    let mut cal = icalendar::Calendar::new();

    for record in &calendar.events {
        cal.push(generate_event(record));
    }

    let cal = cal.done();
    Ok(normalize_ics(&cal.to_string()))
}

fn generate_event(record: &EventRecord) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();

    if let Some(ref uid) = record.uid {
        ics_event.uid(uid);
    }
    ics_event.summary(&record.summary);

    // DTSTAMP - required by RFC 5545; identity comparison never looks at it
    let dtstamp = record
        .stamp
        .unwrap_or_else(chrono::Utc::now)
        .format("%Y%m%dT%H%M%SZ")
        .to_string();
    ics_event.add_property("DTSTAMP", &dtstamp);

    add_datetime_property(&mut ics_event, "DTSTART", &record.start);
    add_datetime_property(&mut ics_event, "DTEND", &record.end);

    if let Some(ref desc) = record.description {
        ics_event.description(desc);
    }

    ics_event.add_property("COMMENT", PRODUCER_COMMENT);

    ics_event.done()
}

/// Add a datetime property with proper formatting based on EventTime variant.
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Date(d) => {
            let mut prop = Property::new(name, d.format("%Y%m%d").to_string());
            prop.append_parameter(ValueType::Date);
            ics_event.append_property(prop);
        }
        EventTime::DateTimeUtc(dt) => {
            ics_event.add_property(name, dt.format("%Y%m%dT%H%M%SZ").to_string());
        }
        EventTime::DateTimeFloating(dt) => {
            ics_event.add_property(name, dt.format("%Y%m%dT%H%M%S").to_string());
        }
        EventTime::DateTimeZoned { datetime, tzid } => {
            let mut prop = Property::new(name, datetime.format("%Y%m%dT%H%M%S").to_string());
            prop.add_parameter("TZID", tzid);
            ics_event.append_property(prop);
        }
    }
}

/// Clean up ICS output from the icalendar crate:
/// - Replace PRODID with our own
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - LF line endings, no trailing whitespace
fn normalize_ics(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:ICSMERGE\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line.trim_end());
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ics::parse_calendar;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn make_record(summary: &str, start: EventTime, end: EventTime) -> EventRecord {
        EventRecord {
            summary: summary.to_string(),
            start,
            end,
            stamp: Some(Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()),
            uid: Some(format!("{}-test@icsmerge", summary.to_lowercase())),
            description: None,
        }
    }

    fn one_event_calendar() -> Calendar {
        Calendar {
            events: vec![make_record(
                "Standup",
                EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
                EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2024, 1, 1, 9, 15, 0).unwrap()),
            )],
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_generate_ics_has_marker_and_prodid() {
        let ics = generate_ics(&one_event_calendar()).unwrap();

        assert!(ics.contains("PRODID:ICSMERGE"), "ICS:\n{}", ics);
        assert!(
            ics.contains(&format!("COMMENT:{}", PRODUCER_COMMENT)),
            "every generated event carries the producer marker. ICS:\n{}",
            ics
        );
        assert!(ics.contains("DTSTART:20240101T090000Z"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_ics_is_normalized() {
        let ics = generate_ics(&one_event_calendar()).unwrap();

        assert!(!ics.contains('\r'), "no carriage returns allowed");
        assert!(!ics.contains("CALSCALE"), "CALSCALE:GREGORIAN is stripped");
        for line in ics.lines() {
            assert_eq!(line, line.trim_end(), "no trailing whitespace: {:?}", line);
        }
    }

    #[test]
    fn test_generate_ics_all_day_has_value_date() {
        let cal = Calendar {
            events: vec![make_record(
                "Holiday",
                EventTime::Date(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()),
                EventTime::Date(NaiveDate::from_ymd_opt(2025, 3, 21).unwrap()),
            )],
            skipped: Vec::new(),
        };

        let ics = generate_ics(&cal).unwrap();
        assert!(
            ics.contains("DTSTART;VALUE=DATE:20250320"),
            "DTSTART should have VALUE=DATE parameter. ICS:\n{}",
            ics
        );
        assert!(
            ics.contains("DTEND;VALUE=DATE:20250321"),
            "DTEND should have VALUE=DATE parameter. ICS:\n{}",
            ics
        );
    }

    #[test]
    fn test_roundtrip_preserves_identities() {
        let cal = Calendar {
            events: vec![
                make_record(
                    "Timed",
                    EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
                    EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()),
                ),
                make_record(
                    "All Day",
                    EventTime::Date(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()),
                    EventTime::Date(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()),
                ),
            ],
            skipped: Vec::new(),
        };

        let ics = generate_ics(&cal).unwrap();
        let reparsed = parse_calendar(&ics).expect("generated output must parse");

        assert_eq!(
            reparsed.identities(),
            cal.identities(),
            "extract(load(serialize(c))) must equal extract(c). ICS:\n{}",
            ics
        );
    }
}
