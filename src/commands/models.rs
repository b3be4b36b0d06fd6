use crate::server::PublishConfig;
use crate::utils::config::{DEFAULT_BIND_HOST, DEFAULT_VISUALIZER_ORIGIN};

/// Arguments for the profile command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ProfileArgs {
    /// Command to run, without the leading `--`
    pub command: Vec<String>,

    /// Launch a browser once the profile is ready
    pub open_browser: bool,

    /// Origin of the profiler web app
    pub visualizer_origin: String,

    /// Interface for the one-shot server
    pub bind_host: String,
}

impl Default for ProfileArgs {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            open_browser: true,
            visualizer_origin: DEFAULT_VISUALIZER_ORIGIN.to_string(),
            bind_host: DEFAULT_BIND_HOST.to_string(),
        }
    }
}

impl ProfileArgs {
    pub fn publish_config(&self) -> PublishConfig {
        PublishConfig {
            host: self.bind_host.clone(),
            visualizer_origin: self.visualizer_origin.clone(),
            open_browser: self.open_browser,
        }
    }
}
