pub mod credentials;
pub mod error;
pub mod path;

pub use credentials::{resolve_token, Credentials, TokenSource};
pub use error::{format_error_with_help, HubsyncError, HubsyncResult};
