//! Configuration and constants for the CLI.

/// Processed-profile format version understood by the Firefox Profiler
pub const PROFILE_VERSION: u32 = 29;

/// Preprocessed-profile version; must match `PROFILE_VERSION` or the
/// profiler will try to upgrade the document and reject it
pub const PREPROCESSED_PROFILE_VERSION: u32 = 48;

/// Product name shown in the profiler UI
pub const PRODUCT_NAME: &str = "sh-profile";

/// Marker type, marker name, category name and thread name all share this
pub const MARKER_TYPE: &str = "sh-profile";

// Palette names are fixed by the profiler (see its colors.js)
pub const CATEGORY_COLOR: &str = "lightblue";
pub const DEFAULT_SUBCATEGORY: &str = "Other";

/// Where the profile gets opened
pub const DEFAULT_VISUALIZER_ORIGIN: &str = "https://profiler.firefox.com";

/// Interface the one-shot server binds to
pub const DEFAULT_BIND_HOST: &str = "127.0.0.1";

/// Upper bound on the request head we bother reading before replying
pub const MAX_REQUEST_HEAD_BYTES: usize = 16 * 1024;

// Field labels for the marker table. `line` is the only searchable one.
pub const MARKER_FIELDS: &[(&str, &str, &str)] = &[
    ("startTime", "Start time", "string"),
    ("line", "Line", "string"),
    ("hour", "Hour", "string"),
    ("date", "Date", "string"),
    ("time", "Time", "time"),
];

pub const MARKER_DISPLAY_LOCATIONS: &[&str] = &["marker-chart", "marker-table", "timeline-overview"];

pub const MARKER_LABEL: &str = "{marker.data.line}";
