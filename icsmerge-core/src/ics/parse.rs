//! ICS file parsing using the icalendar crate's parser.

use crate::calendar::Calendar;
use crate::error::{MergeError, MergeResult};
use crate::event::{EventRecord, EventTime};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

/// Parse ICS content into a [`Calendar`].
///
/// Empty (or whitespace-only) input yields an empty calendar rather than an
/// error: that is what a first run with no previous snapshot looks like.
/// A VEVENT whose DTSTART or DTEND is missing or unparseable is skipped and
/// the reason recorded on `Calendar::skipped`; one corrupt event must not
/// abort reconciliation of the whole file.
pub fn parse_calendar(content: &str) -> MergeResult<Calendar> {
    if content.trim().is_empty() {
        return Ok(Calendar::empty());
    }

    let unfolded = unfold(content);
    let parsed = read_calendar(&unfolded).map_err(|e| MergeError::IcsParse(e.to_string()))?;

    let mut calendar = Calendar::empty();
    for component in parsed.components.iter().filter(|c| c.name == "VEVENT") {
        match parse_record(component) {
            Ok(record) => calendar.events.push(record),
            Err(reason) => calendar.skipped.push(reason),
        }
    }

    Ok(calendar)
}

/// Parse one VEVENT into an [`EventRecord`], or a skip reason.
fn parse_record(vevent: &Component) -> Result<EventRecord, String> {
    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| "(No title)".to_string());

    let start = prop_event_time(vevent, "DTSTART")
        .ok_or_else(|| format!("skipped '{summary}': missing or invalid DTSTART"))?;
    let end = prop_event_time(vevent, "DTEND")
        .ok_or_else(|| format!("skipped '{summary}': missing or invalid DTEND"))?;

    let uid = vevent.find_prop("UID").map(|p| p.val.to_string());
    let description = vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string());

    // DTSTAMP is display-only metadata; anything non-UTC is ignored.
    let stamp = vevent
        .find_prop("DTSTAMP")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .and_then(|dpt| match dpt {
            DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => Some(dt),
            _ => None,
        });

    Ok(EventRecord {
        summary,
        start,
        end,
        stamp,
        uid,
        description,
    })
}

/// Read a date/datetime property, preserving the granularity the source used.
fn prop_event_time(vevent: &Component, name: &str) -> Option<EventTime> {
    let prop = vevent.find_prop(name)?;
    DatePerhapsTime::try_from(prop).ok().map(to_event_time)
}

/// Convert icalendar's DatePerhapsTime to our EventTime, preserving timezone info.
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => EventTime::DateTimeUtc(dt),
            CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            CalendarDateTime::WithTimezone { date_time, tzid } => EventTime::DateTimeZoned {
                datetime: date_time,
                tzid,
            },
        },
    }
}
