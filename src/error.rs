use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("No source directory given (use --source or set `source` in the config file)")]
    MissingSource,

    #[error("Cannot write output archive {}: {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {member} from {}: {source}", path.display())]
    SourceRead {
        member: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Source entry {member} is not a regular file: {}", path.display())]
    NotAFile { member: String, path: PathBuf },
}
