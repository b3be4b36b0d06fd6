use chrono::{DateTime, Duration, Local, TimeZone};
use pretty_assertions::assert_eq;
use sh_profile::profile::{build_profile, MarkerPhase, Profile, StringTable};
use sh_profile::recorder::{record_stream, LineEvent};

fn base_time() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
}

fn events(offsets_ms: &[i64]) -> Vec<LineEvent> {
    offsets_ms
        .iter()
        .enumerate()
        .map(|(i, &ms)| LineEvent::new(base_time() + Duration::milliseconds(ms), format!("line {}", i)))
        .collect()
}

#[test]
fn test_marker_columns_have_equal_length() {
    for n in [0usize, 1, 2, 17] {
        let offsets: Vec<i64> = (0..n as i64).map(|i| i * 3).collect();
        let profile = build_profile(&events(&offsets));
        let markers = &profile.threads[0].markers;

        assert_eq!(markers.column_lengths(), [n; 6]);
        assert_eq!(markers.len(), n);
    }
}

#[test]
fn test_start_time_is_first_event() {
    let input = events(&[0, 40, 90]);
    let profile = build_profile(&input);

    assert_eq!(profile.meta.start_time, input[0].timestamp_ms());
    assert_eq!(profile.threads[0].markers.start_times()[0], 0.0);
}

#[test]
fn test_relative_times_preserve_order() {
    let profile = build_profile(&events(&[0, 5, 5, 12, 400]));
    let markers = &profile.threads[0].markers;

    assert_eq!(markers.start_times(), &[0.0, 5.0, 5.0, 12.0, 400.0]);
    assert!(markers.start_times().windows(2).all(|w| w[0] <= w[1]));
    let lines: Vec<_> = markers.data().iter().map(|d| d.line.as_str()).collect();
    assert_eq!(lines, vec!["line 0", "line 1", "line 2", "line 3", "line 4"]);
}

#[test]
fn test_recorded_output_to_markers() {
    // "a" at T0, blank at T1, "b" at T2
    let mut ticks = vec![0i64, 20].into_iter();
    let clock = move || base_time() + Duration::milliseconds(ticks.next().unwrap_or(0));

    let input: &[u8] = b"a\n\nb\n";
    let recorded = record_stream(input, std::io::sink(), clock).unwrap();
    let profile = build_profile(&recorded);
    let markers = &profile.threads[0].markers;

    assert_eq!(markers.len(), 2);
    assert_eq!(markers.data()[0].line, "a");
    assert_eq!(markers.data()[1].line, "b");
    assert_eq!(markers.start_times(), &[0.0, 20.0]);
    assert!(markers.phases().iter().all(|p| *p == MarkerPhase::Instant));
}

#[test]
fn test_profile_json_round_trip() {
    let profile = build_profile(&events(&[0, 1, 2]));

    let json = serde_json::to_string(&profile).unwrap();
    let parsed: Profile = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.meta.start_time, profile.meta.start_time);
    assert_eq!(
        parsed.threads[0].markers.column_lengths(),
        profile.threads[0].markers.column_lengths()
    );
    parsed.threads[0].markers.assert_consistent();
    assert_eq!(parsed, profile);
}

#[test]
fn test_marker_names_resolve_through_string_array() {
    let profile = build_profile(&events(&[0, 10]));
    let thread = profile.thread(0).unwrap();
    let strings = StringTable::from_strings(thread.string_array.clone());

    for &name in thread.markers.names() {
        assert_eq!(strings.get_string(name).unwrap(), "sh-profile");
    }
    assert!(profile.thread(1).is_err());
}

#[test]
fn test_wire_shape() {
    let profile = build_profile(&events(&[0]));
    let value = serde_json::to_value(&profile).unwrap();

    assert_eq!(value["libs"], serde_json::json!([]));
    assert_eq!(value["pages"], serde_json::json!([]));
    assert_eq!(value["meta"]["categories"][0]["name"], "sh-profile");
    assert_eq!(value["meta"]["markerSchema"][0]["name"], "sh-profile");

    let thread = &value["threads"][0];
    assert_eq!(thread["name"], "sh-profile");
    assert_eq!(thread["isMainThread"], true);
    assert_eq!(thread["stringArray"], serde_json::json!(["sh-profile"]));

    let markers = &thread["markers"];
    assert_eq!(markers["length"], 1);
    assert_eq!(markers["endTime"], serde_json::json!([null]));
    assert_eq!(markers["phase"], serde_json::json!([0]));
    assert_eq!(markers["category"], serde_json::json!([0]));
    assert_eq!(markers["name"], serde_json::json!([0]));
    assert_eq!(markers["data"][0]["hour"], "09:30:00");
    assert_eq!(markers["data"][0]["date"], "2024-06-01");
}
