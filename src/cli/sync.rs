use super::SelectionArgs;
use hubsync::core::{HubsyncError, HubsyncResult};
use hubsync::di::ServiceContainer;
use hubsync::sync::{SessionSummary, SyncSession};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct SyncArgs {
    pub selection: SelectionArgs,
    pub no_auth: bool,
    pub jobs: usize,
    pub quiet: bool,
}

pub async fn run(config_path: Option<&Path>, args: SyncArgs) -> HubsyncResult<()> {
    let config = args.selection.load_config(config_path)?;
    let options = args
        .selection
        .sync_options(&config)?
        .with_skip_auth(args.no_auth)
        .with_jobs(args.jobs)
        .with_quiet(args.quiet);
    let container = ServiceContainer::from_config(config, args.selection.token.as_deref())?;

    let abort = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(Arc::clone(&abort));

    let mut session = SyncSession::new(options, container.hub()).with_abort_flag(abort);
    let summary = session.run().await?;

    finish(&summary)
}

/// Print the summary and turn failed downloads into an error
pub fn finish(summary: &SessionSummary) -> HubsyncResult<()> {
    println!("\n{}", summary);

    if summary.is_success() {
        Ok(())
    } else {
        Err(HubsyncError::SyncIncomplete(summary.failed_count()))
    }
}

/// First Ctrl-C stops after the current file; a second one exits at once
fn install_interrupt_handler(abort: Arc<AtomicBool>) {
    let result = ctrlc::set_handler(move || {
        if abort.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        eprintln!("\nInterrupted: finishing the current file, then stopping");
    });

    if let Err(e) = result {
        tracing::warn!("Could not install Ctrl-C handler: {}", e);
    }
}
