use std::path::PathBuf;

/// Context passed throughout the application containing global configuration
#[derive(Clone)]
pub struct Context {
    /// Enable verbose output (compression details, unlisted source files)
    pub verbose: bool,

    /// Path to the repack config file, if one was given
    pub config_path: Option<PathBuf>,

    /// Directory that relative paths in the config file are resolved against
    pub base_dir: PathBuf,
}

impl Context {
    pub fn new(config_path: Option<PathBuf>, verbose: bool) -> Self {
        let base_dir = config_path
            .as_deref()
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            verbose,
            config_path,
            base_dir,
        }
    }
}
