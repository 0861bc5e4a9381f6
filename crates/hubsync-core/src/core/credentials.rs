use crate::core::error::HubsyncResult;
use crate::core::path::hf_token_file;
use std::fmt;
use std::fs;
use std::path::Path;

/// Environment variable checked for an access token
pub const TOKEN_ENV_VAR: &str = "HF_TOKEN";

/// Where a resolved access token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Passed explicitly (`--token`)
    Explicit,
    /// `HF_TOKEN` environment variable
    Environment,
    /// Token file under the Hugging Face home directory
    TokenFile,
    /// `token` key in config.yaml
    Config,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenSource::Explicit => "command line",
            TokenSource::Environment => TOKEN_ENV_VAR,
            TokenSource::TokenFile => "token file",
            TokenSource::Config => "config file",
        };
        f.write_str(name)
    }
}

/// An access token together with its origin
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    source: TokenSource,
}

impl Credentials {
    pub fn new(token: impl Into<String>, source: TokenSource) -> Self {
        Self {
            token: token.into(),
            source,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn source(&self) -> TokenSource {
        self.source
    }
}

// Never print the token itself
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolve the access token to use for Hub requests
///
/// Order: explicit value, `HF_TOKEN`, the stored token file, then the
/// config value. Blank values are skipped. Returns `None` for anonymous
/// access, which is fine for public repositories.
pub fn resolve_token(explicit: Option<&str>, configured: Option<&str>) -> Option<Credentials> {
    if let Some(token) = non_blank(explicit) {
        return Some(Credentials::new(token, TokenSource::Explicit));
    }

    if let Ok(value) = std::env::var(TOKEN_ENV_VAR) {
        if let Some(token) = non_blank(Some(&value)) {
            return Some(Credentials::new(token, TokenSource::Environment));
        }
    }

    match hf_token_file().and_then(|path| read_token_file(&path)) {
        Ok(Some(token)) => return Some(Credentials::new(token, TokenSource::TokenFile)),
        Ok(None) => {}
        Err(e) => tracing::debug!("Could not read stored token: {}", e),
    }

    non_blank(configured).map(|token| Credentials::new(token, TokenSource::Config))
}

/// Read a token file, returning `None` if it does not exist or is blank
pub fn read_token_file(path: &Path) -> HubsyncResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(non_blank(Some(&content)).map(str::to_string))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
