use super::SelectionArgs;
use hubsync::core::HubsyncResult;
use hubsync::di::ServiceContainer;
use hubsync::sync::{DownloadPlan, SyncSession};
use std::path::Path;

pub async fn run(config_path: Option<&Path>, selection: SelectionArgs) -> HubsyncResult<()> {
    let config = selection.load_config(config_path)?;
    let options = selection.sync_options(&config)?;
    let container = ServiceContainer::from_config(config, selection.token.as_deref())?;

    let mut session = SyncSession::new(options, container.hub());
    let plan = session.plan().await?;

    print_plan(&plan);
    Ok(())
}

fn print_plan(plan: &DownloadPlan) {
    if plan.is_empty() {
        println!("✓ All files are already downloaded and valid!");
        return;
    }

    println!("\nWould download:");
    for item in plan.items() {
        println!("  {} -> {}", item.remote_path, item.local_path.display());
    }
    println!(
        "\n{} of {} filtered file(s) need downloading ({} already valid)",
        plan.len(),
        plan.filtered_in(),
        plan.already_valid()
    );
}
