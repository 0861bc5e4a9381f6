use thiserror::Error;

pub type HubsyncResult<T> = Result<T, HubsyncError>;

#[derive(Error, Debug)]
pub enum HubsyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote repository could not be listed. Terminates a sync session.
    #[error("Failed to list repository files: {0}")]
    Listing(String),

    /// Authentication probe failed. Non-fatal during sync.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A single file transfer failed.
    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("Integrity error: {0}")]
    Integrity(String),

    /// One or more planned downloads did not complete.
    /// The summary has already been printed; exit with code 1.
    #[error("{0} file(s) failed to download")]
    SyncIncomplete(usize),
}

impl HubsyncError {
    /// Short hint printed under the error in the CLI, if one applies
    pub fn help(&self) -> Option<&'static str> {
        match self {
            HubsyncError::Listing(_) => Some(
                "Check the repository id. Private or gated repositories need a token (--token or HF_TOKEN).",
            ),
            HubsyncError::Auth(_) => {
                Some("Pass --token, set HF_TOKEN, or store a token in the Hugging Face token file.")
            }
            HubsyncError::SyncIncomplete(_) => {
                Some("Re-run the same command to retry; completed files are not fetched again.")
            }
            HubsyncError::Config(_) => Some("Run 'hubsync config path' to locate the config file."),
            _ => None,
        }
    }
}

/// Render an error with its help hint, if any
pub fn format_error_with_help(error: &HubsyncError) -> String {
    match error.help() {
        Some(help) => format!("Error: {}\n\n  help: {}", error, help),
        None => format!("Error: {}", error),
    }
}
