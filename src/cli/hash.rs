use hubsync::core::HubsyncResult;
use hubsync::sync::file_sha256;
use std::path::PathBuf;

/// Print `<sha256>  <file>` per file, like `sha256sum`
///
/// Unreadable files print `unknown` instead of failing the command.
pub fn run(files: Vec<PathBuf>) -> HubsyncResult<()> {
    for file in files {
        let digest = file_sha256(&file).unwrap_or_else(|| "unknown".to_string());
        println!("{}  {}", digest, file.display());
    }
    Ok(())
}
