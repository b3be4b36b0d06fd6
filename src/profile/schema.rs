//! Processed-profile document understood by the Firefox Profiler.
//!
//! Field names and nesting follow the profiler's processed format
//! (`src/profile-logic/data-structures.js` upstream). Struct field order is
//! serialization order. Tables are columnar: one `Vec` per column plus a
//! `length` that must equal every column's length.

use crate::utils::config::{
    CATEGORY_COLOR, DEFAULT_SUBCATEGORY, MARKER_DISPLAY_LOCATIONS, MARKER_FIELDS, MARKER_LABEL,
    MARKER_TYPE, PREPROCESSED_PROFILE_VERSION, PRODUCT_NAME, PROFILE_VERSION,
};
use crate::utils::error::ProfileError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Root document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub meta: ProfileMeta,
    pub libs: Vec<serde_json::Value>,
    pub pages: Vec<serde_json::Value>,
    pub threads: Vec<Thread>,
}

impl Profile {
    /// A profile with default meta and no threads
    ///
    /// # Arguments
    /// * `start_time` - Absolute profile start in milliseconds since the Unix epoch
    pub fn empty(start_time: f64) -> Self {
        Self {
            meta: ProfileMeta::new(start_time),
            libs: Vec::new(),
            pages: Vec::new(),
            threads: Vec::new(),
        }
    }

    pub fn thread(&self, index: usize) -> Result<&Thread, ProfileError> {
        self.threads.get(index).ok_or(ProfileError::ThreadNotFound {
            index,
            len: self.threads.len(),
        })
    }

    /// Map each category name to its position in `meta.categories`
    pub fn category_index_map(&self) -> HashMap<String, usize> {
        self.meta
            .categories
            .iter()
            .enumerate()
            .map(|(i, category)| (category.name.clone(), i))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMeta {
    pub interval: f64,
    pub start_time: f64,
    pub abi: String,
    pub misc: String,
    pub oscpu: String,
    pub platform: String,
    pub process_type: u32,
    pub extensions: Extensions,
    pub categories: Vec<Category>,
    pub product: String,
    pub stackwalk: u32,
    pub toolkit: String,
    pub version: u32,
    pub preprocessed_profile_version: u32,
    #[serde(rename = "appBuildID")]
    pub app_build_id: String,
    #[serde(rename = "sourceURL")]
    pub source_url: String,
    #[serde(rename = "physicalCPUs")]
    pub physical_cpus: u32,
    #[serde(rename = "logicalCPUs")]
    pub logical_cpus: u32,
    #[serde(rename = "CPUName")]
    pub cpu_name: String,
    pub symbolicated: bool,
    pub marker_schema: Vec<MarkerSchema>,
}

impl ProfileMeta {
    pub fn new(start_time: f64) -> Self {
        Self {
            interval: 1.0,
            start_time,
            abi: String::new(),
            misc: String::new(),
            oscpu: String::new(),
            platform: String::new(),
            process_type: 0,
            extensions: Extensions::default(),
            categories: vec![Category::sh_profile()],
            product: PRODUCT_NAME.to_string(),
            stackwalk: 0,
            toolkit: String::new(),
            version: PROFILE_VERSION,
            preprocessed_profile_version: PREPROCESSED_PROFILE_VERSION,
            app_build_id: String::new(),
            source_url: String::new(),
            physical_cpus: 0,
            logical_cpus: 0,
            cpu_name: String::new(),
            symbolicated: true,
            marker_schema: vec![MarkerSchema::sh_profile()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extensions {
    pub id: Vec<String>,
    pub name: Vec<String>,
    #[serde(rename = "baseURL")]
    pub base_url: Vec<String>,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub color: String,
    pub subcategories: Vec<String>,
}

impl Category {
    /// The single category every line marker belongs to
    pub fn sh_profile() -> Self {
        Self {
            name: MARKER_TYPE.to_string(),
            color: CATEGORY_COLOR.to_string(),
            subcategories: vec![DEFAULT_SUBCATEGORY.to_string()],
        }
    }
}

/// Tells the profiler how to label and tabulate a marker type's payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSchema {
    pub name: String,
    pub tooltip_label: String,
    pub table_label: String,
    pub chart_label: String,
    pub display: Vec<String>,
    pub data: Vec<MarkerSchemaField>,
}

impl MarkerSchema {
    pub fn sh_profile() -> Self {
        let data = MARKER_FIELDS
            .iter()
            .map(|&(key, label, format)| MarkerSchemaField {
                key: key.to_string(),
                label: label.to_string(),
                format: format.to_string(),
                searchable: key == "line",
            })
            .collect();

        Self {
            name: MARKER_TYPE.to_string(),
            tooltip_label: MARKER_LABEL.to_string(),
            table_label: MARKER_LABEL.to_string(),
            chart_label: MARKER_LABEL.to_string(),
            display: MARKER_DISPLAY_LOCATIONS.iter().map(|s| s.to_string()).collect(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSchemaField {
    pub key: String,
    pub label: String,
    pub format: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub searchable: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One thread's worth of tables. Only `markers` and `string_array` are ever
/// populated here; the rest must be present but stay empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub process_type: String,
    pub process_startup_time: f64,
    pub process_shutdown_time: Option<f64>,
    pub register_time: f64,
    pub unregister_time: Option<f64>,
    pub paused_ranges: Vec<serde_json::Value>,
    pub name: String,
    pub is_main_thread: bool,
    pub pid: String,
    pub tid: u64,
    pub samples: SamplesTable,
    pub markers: MarkerTable,
    pub stack_table: StackTable,
    pub frame_table: FrameTable,
    pub string_array: Vec<String>,
    pub func_table: FuncTable,
    pub resource_table: ResourceTable,
    pub native_symbols: NativeSymbols,
}

impl Thread {
    pub fn empty() -> Self {
        Self {
            process_type: "default".to_string(),
            process_startup_time: 0.0,
            process_shutdown_time: None,
            register_time: 0.0,
            unregister_time: None,
            paused_ranges: Vec::new(),
            name: "Empty".to_string(),
            is_main_thread: true,
            pid: "0".to_string(),
            tid: 0,
            samples: SamplesTable::default(),
            markers: MarkerTable::default(),
            stack_table: StackTable::default(),
            frame_table: FrameTable::default(),
            string_array: Vec::new(),
            func_table: FuncTable::default(),
            resource_table: ResourceTable::default(),
            native_symbols: NativeSymbols::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplesTable {
    pub weight_type: String,
    pub weight: Vec<f64>,
    pub stack: Vec<Option<usize>>,
    pub time: Vec<f64>,
    pub length: usize,
}

impl Default for SamplesTable {
    fn default() -> Self {
        Self {
            weight_type: "tracing-ms".to_string(),
            weight: Vec::new(),
            stack: Vec::new(),
            time: Vec::new(),
            length: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackTable {
    pub frame: Vec<usize>,
    pub prefix: Vec<Option<usize>>,
    pub category: Vec<usize>,
    pub subcategory: Vec<usize>,
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameTable {
    pub address: Vec<i64>,
    pub inline_depth: Vec<u32>,
    pub category: Vec<Option<usize>>,
    pub subcategory: Vec<Option<usize>>,
    pub func: Vec<usize>,
    pub native_symbol: Vec<Option<usize>>,
    #[serde(rename = "innerWindowID")]
    pub inner_window_id: Vec<Option<u64>>,
    pub implementation: Vec<Option<usize>>,
    pub line: Vec<Option<u32>>,
    pub column: Vec<Option<u32>>,
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuncTable {
    #[serde(rename = "isJS")]
    pub is_js: Vec<bool>,
    #[serde(rename = "relevantForJS")]
    pub relevant_for_js: Vec<bool>,
    pub name: Vec<usize>,
    pub resource: Vec<i64>,
    pub file_name: Vec<Option<usize>>,
    pub line_number: Vec<Option<u32>>,
    pub column_number: Vec<Option<u32>>,
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTable {
    pub lib: Vec<Option<usize>>,
    pub name: Vec<usize>,
    pub host: Vec<Option<usize>>,
    #[serde(rename = "type")]
    pub resource_type: Vec<u32>,
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeSymbols {
    pub lib_index: Vec<usize>,
    pub address: Vec<u64>,
    pub name: Vec<usize>,
    pub function_size: Vec<Option<u32>>,
    pub length: usize,
}

/// Marker phase, serialized as its numeric discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MarkerPhase {
    Instant = 0,
    Interval = 1,
}

impl Serialize for MarkerPhase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for MarkerPhase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(MarkerPhase::Instant),
            1 => Ok(MarkerPhase::Interval),
            other => Err(serde::de::Error::custom(format!(
                "invalid marker phase {}",
                other
            ))),
        }
    }
}

/// Per-marker payload, rendered through `MarkerSchema::sh_profile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPayload {
    #[serde(rename = "type")]
    pub marker_type: String,
    pub name: String,
    pub line: String,
    pub hour: String,
    pub date: String,
}

/// Columnar marker storage.
///
/// Columns are private so they can only grow together through
/// `push_instant`. Deserializing rejects tables whose columns disagree
/// with `length`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawMarkerTable")]
pub struct MarkerTable {
    data: Vec<MarkerPayload>,
    name: Vec<usize>,
    start_time: Vec<f64>,
    end_time: Vec<Option<f64>>,
    phase: Vec<MarkerPhase>,
    category: Vec<usize>,
    length: usize,
}

impl MarkerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a marker without duration
    pub fn push_instant(
        &mut self,
        start_time: f64,
        category: usize,
        name: usize,
        data: MarkerPayload,
    ) {
        self.push(start_time, None, MarkerPhase::Instant, category, name, data);
    }

    fn push(
        &mut self,
        start_time: f64,
        end_time: Option<f64>,
        phase: MarkerPhase,
        category: usize,
        name: usize,
        data: MarkerPayload,
    ) {
        self.start_time.push(start_time);
        self.end_time.push(end_time);
        self.phase.push(phase);
        self.category.push(category);
        self.name.push(name);
        self.data.push(data);
        self.length += 1;
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn start_times(&self) -> &[f64] {
        &self.start_time
    }

    pub fn end_times(&self) -> &[Option<f64>] {
        &self.end_time
    }

    pub fn phases(&self) -> &[MarkerPhase] {
        &self.phase
    }

    pub fn categories(&self) -> &[usize] {
        &self.category
    }

    pub fn names(&self) -> &[usize] {
        &self.name
    }

    pub fn data(&self) -> &[MarkerPayload] {
        &self.data
    }

    /// Lengths of `startTime`, `endTime`, `phase`, `category`, `name`, `data`
    pub fn column_lengths(&self) -> [usize; 6] {
        [
            self.start_time.len(),
            self.end_time.len(),
            self.phase.len(),
            self.category.len(),
            self.name.len(),
            self.data.len(),
        ]
    }

    /// First column whose length disagrees with `length`
    pub fn check_consistent(&self) -> Result<(), ProfileError> {
        for (&column, len) in MARKER_COLUMNS.iter().zip(self.column_lengths()) {
            if len != self.length {
                return Err(ProfileError::MarkerColumnMismatch {
                    column,
                    len,
                    expected: self.length,
                });
            }
        }
        Ok(())
    }

    /// Panics if any column disagrees with `length`
    pub fn assert_consistent(&self) {
        if let Err(e) = self.check_consistent() {
            panic!("{}", e);
        }
    }
}

const MARKER_COLUMNS: [&str; 6] = ["startTime", "endTime", "phase", "category", "name", "data"];

/// Wire form of `MarkerTable`, validated before use
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMarkerTable {
    data: Vec<MarkerPayload>,
    name: Vec<usize>,
    start_time: Vec<f64>,
    end_time: Vec<Option<f64>>,
    phase: Vec<MarkerPhase>,
    category: Vec<usize>,
    length: usize,
}

impl TryFrom<RawMarkerTable> for MarkerTable {
    type Error = ProfileError;

    fn try_from(raw: RawMarkerTable) -> Result<Self, Self::Error> {
        let table = MarkerTable {
            data: raw.data,
            name: raw.name,
            start_time: raw.start_time,
            end_time: raw.end_time,
            phase: raw.phase,
            category: raw.category,
            length: raw.length,
        };
        table.check_consistent()?;
        Ok(table)
    }
}
