//! Profile document types and construction.
//!
//! This module handles:
//! - Interning strings into a thread's `stringArray`
//! - Defining the processed-profile schema
//! - Turning recorded lines into markers

pub mod builder;
pub mod interner;
pub mod schema;

// Re-export main types
pub use builder::build_profile;
pub use interner::StringTable;
pub use schema::{
    Category, MarkerPayload, MarkerPhase, MarkerSchema, MarkerTable, Profile, ProfileMeta, Thread,
};
