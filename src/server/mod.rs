//! Publishing a finished profile to the browser-based profiler.
//!
//! This module handles:
//! - Serving the profile once over a local, ephemeral-port HTTP server
//! - Building the profiler's `from-url` address
//! - Opening that address in the default browser

pub mod browser;
pub mod one_shot;
pub mod url;

use crate::profile::Profile;
use crate::utils::config::{DEFAULT_BIND_HOST, DEFAULT_VISUALIZER_ORIGIN};
use crate::utils::error::ServeError;
use log::info;

// Re-export main types and functions
pub use browser::open_in_browser;
pub use one_shot::{OneShotServer, RequestMethod, ServerState};
pub use url::{display_name, visualizer_url};

/// Where and how to publish a profile
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Interface to bind the one-shot server to
    pub host: String,

    /// Origin of the profiler web app
    pub visualizer_origin: String,

    /// Launch a browser, or just print the URL
    pub open_browser: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BIND_HOST.to_string(),
            visualizer_origin: DEFAULT_VISUALIZER_ORIGIN.to_string(),
            open_browser: true,
        }
    }
}

/// Serve `profile` to the profiler and return once it has been fetched.
///
/// **Public** - main entry point for publication
///
/// Blocks until a request arrives; there is no timeout.
pub fn publish(
    profile: &Profile,
    display_name: &str,
    config: &PublishConfig,
) -> Result<(), ServeError> {
    let server = OneShotServer::bind(profile, &config.host)?;
    let url = visualizer_url(&config.visualizer_origin, &server.local_url(), display_name);

    info!("Profiler URL: {}", url);
    if !config.open_browser || !open_in_browser(&url) {
        eprintln!("Open this URL to view the profile:\n  {}", url);
    }

    server.serve()?;
    info!("Profile delivered, shutting down server");
    Ok(())
}
