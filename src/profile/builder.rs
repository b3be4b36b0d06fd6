//! Build a processed profile from recorded output lines.
//!
//! Every line becomes one instant marker on a single main thread. Marker
//! times are relative to the first line, which also becomes
//! `meta.startTime`.

use super::interner::StringTable;
use super::schema::{MarkerPayload, Profile, Thread};
use crate::recorder::LineEvent;
use crate::utils::config::MARKER_TYPE;
use chrono::{DateTime, Local};
use log::debug;

/// Build the profile document for `events`
///
/// **Public** - main entry point for profile construction
///
/// # Arguments
/// * `events` - Recorded lines in arrival order
///
/// # Returns
/// A profile with one thread holding one marker per event. An empty input
/// still produces a thread, with `meta.startTime` set to the current time.
pub fn build_profile(events: &[LineEvent]) -> Profile {
    let mut profile = Profile::empty(epoch_ms(&Local::now()));

    let profile_start_time = match events.first() {
        Some(first) => {
            let start = first.timestamp_ms();
            profile.meta.start_time = start;
            start
        }
        None => 0.0,
    };

    let mut thread = Thread::empty();
    thread.name = MARKER_TYPE.to_string();
    thread.is_main_thread = true;

    let category = profile
        .category_index_map()
        .get(MARKER_TYPE)
        .copied()
        .unwrap_or(0);

    let mut strings = StringTable::new();
    let name = strings.index_for_string(MARKER_TYPE);

    for event in events {
        thread.markers.push_instant(
            event.timestamp_ms() - profile_start_time,
            category,
            name,
            line_payload(event),
        );
    }

    thread.markers.assert_consistent();
    thread.string_array = strings.serialize_to_array();

    debug!(
        "Built profile: {} markers, {} strings",
        thread.markers.len(),
        thread.string_array.len()
    );

    profile.threads.push(thread);
    profile
}

fn line_payload(event: &LineEvent) -> MarkerPayload {
    MarkerPayload {
        marker_type: MARKER_TYPE.to_string(),
        name: MARKER_TYPE.to_string(),
        line: event.text.clone(),
        hour: event.timestamp.format("%H:%M:%S").to_string(),
        date: event.timestamp.format("%Y-%m-%d").to_string(),
    }
}

fn epoch_ms(time: &DateTime<Local>) -> f64 {
    time.timestamp_micros() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::schema::MarkerPhase;
    use chrono::{Duration, TimeZone};

    fn event_at(base: DateTime<Local>, offset_ms: i64, text: &str) -> LineEvent {
        LineEvent::new(base + Duration::milliseconds(offset_ms), text)
    }

    #[test]
    fn test_markers_are_relative_to_first_line() {
        let base = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 30).unwrap();
        let events = vec![
            event_at(base, 0, "a"),
            event_at(base, 250, "b"),
            event_at(base, 250, "c"),
        ];

        let profile = build_profile(&events);
        let markers = &profile.threads[0].markers;

        assert_eq!(profile.meta.start_time, events[0].timestamp_ms());
        assert_eq!(markers.start_times(), &[0.0, 250.0, 250.0]);
        assert!(markers.end_times().iter().all(Option::is_none));
        assert!(markers.phases().iter().all(|p| *p == MarkerPhase::Instant));
    }

    #[test]
    fn test_payload_carries_local_hour_and_date() {
        let base = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 30).unwrap();
        let profile = build_profile(&[event_at(base, 0, "==> Pouring")]);
        let data = &profile.threads[0].markers.data()[0];

        assert_eq!(data.marker_type, "sh-profile");
        assert_eq!(data.name, "sh-profile");
        assert_eq!(data.line, "==> Pouring");
        assert_eq!(data.hour, "14:05:30");
        assert_eq!(data.date, "2024-03-09");
    }

    #[test]
    fn test_marker_name_interned_once() {
        let base = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let events: Vec<_> = (0..5).map(|i| event_at(base, i * 10, "x")).collect();

        let profile = build_profile(&events);
        let thread = &profile.threads[0];

        assert_eq!(thread.string_array, vec!["sh-profile"]);
        assert!(thread.markers.names().iter().all(|&n| n == 0));
        assert!(thread.markers.categories().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_empty_input_still_has_main_thread() {
        let before = epoch_ms(&Local::now());
        let profile = build_profile(&[]);

        assert_eq!(profile.threads.len(), 1);
        assert!(profile.threads[0].is_main_thread);
        assert_eq!(profile.threads[0].name, "sh-profile");
        assert!(profile.threads[0].markers.is_empty());
        assert!(profile.meta.start_time >= before);
    }
}
