//! Sync session state machine
//!
//! A session walks `Listing -> Planning -> Fetching -> Done`. Only a
//! listing failure ends it early (in `Failed`); failed downloads are
//! collected in the [`SessionSummary`] and never stop the loop.

use crate::config::SyncOptions;
use crate::core::path::ensure_dir;
use crate::core::HubsyncResult;
use crate::di::HubProvider;
use crate::sync::fetcher::{FetchError, FetchExecutor};
use crate::sync::planner::{build_plan, DownloadPlan, PlanItem};
use crate::sync::prober::IntegrityProber;
use crate::sync::summary::SessionSummary;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};

/// Lifecycle of a sync session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Listing,
    Planning,
    Fetching,
    Done,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Listing => "listing",
            SessionState::Planning => "planning",
            SessionState::Fetching => "fetching",
            SessionState::Done => "done",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

type Outcome = Result<PathBuf, FetchError>;

/// One synchronization of a repository into a local directory
pub struct SyncSession {
    options: SyncOptions,
    hub: Arc<dyn HubProvider>,
    abort: Option<Arc<AtomicBool>>,
    state: SessionState,
}

impl SyncSession {
    pub fn new(options: SyncOptions, hub: Arc<dyn HubProvider>) -> Self {
        Self {
            options,
            hub,
            abort: None,
            state: SessionState::Listing,
        }
    }

    /// Stop fetching once this flag is set; checked between items
    pub fn with_abort_flag(mut self, abort: Arc<AtomicBool>) -> Self {
        self.abort = Some(abort);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Run the full session and return its summary
    ///
    /// Fails only when the local directory cannot be created or the
    /// repository listing fails.
    pub async fn run(&mut self) -> HubsyncResult<SessionSummary> {
        if !self.options.skip_auth() {
            self.check_auth().await;
        }

        ensure_dir(self.options.local_dir())?;

        let plan = self.list_and_plan().await?;

        let summary = if plan.is_empty() {
            self.say("✓ All files are already downloaded and valid!");
            SessionSummary::from_plan(&plan)
        } else {
            self.say("\nDownloading files:");
            self.fetch(&plan).await
        };

        self.transition(SessionState::Done);
        Ok(summary)
    }

    /// List and plan without downloading anything
    pub async fn plan(&mut self) -> HubsyncResult<DownloadPlan> {
        let plan = self.list_and_plan().await?;
        self.transition(SessionState::Done);
        Ok(plan)
    }

    async fn check_auth(&self) {
        match self.hub.whoami().await {
            Ok(identity) => {
                tracing::info!("Authenticated as {}", identity.name);
                self.say("✓ Authentication successful");
            }
            Err(e) => {
                tracing::warn!("Authentication check failed: {}", e);
                self.say(
                    "⚠️ Authentication failed or not provided. This might be okay for public repositories.",
                );
                self.say(&format!("Error: {}", e));
                self.say("Continuing anyway...");
            }
        }
    }

    async fn list_and_plan(&mut self) -> HubsyncResult<DownloadPlan> {
        self.transition(SessionState::Listing);
        let repo_id = self.options.repo_id().to_string();
        let manifest = match self.hub.list_files(&repo_id).await {
            Ok(files) => files,
            Err(e) => {
                self.transition(SessionState::Failed);
                return Err(e);
            }
        };
        self.say(&format!(
            "Found {} files in repository '{}'",
            manifest.len(),
            repo_id
        ));

        self.transition(SessionState::Planning);
        let local_root = self.options.local_dir();
        let prober = IntegrityProber::new(Arc::clone(&self.hub), &repo_id, local_root);
        let plan = build_plan(&manifest, self.options.rules(), local_root, &prober).await;

        self.say(&format!(
            "Checking {} files after filtering",
            plan.filtered_in()
        ));
        self.say(&format!("Found {} files to download", plan.len()));
        Ok(plan)
    }

    async fn fetch(&mut self, plan: &DownloadPlan) -> SessionSummary {
        self.transition(SessionState::Fetching);

        let executor = FetchExecutor::new(
            Arc::clone(&self.hub),
            self.options.repo_id(),
            self.options.local_dir(),
        );
        let pb = self.progress_bar(plan.len());

        let outcomes = if self.options.jobs() > 1 {
            self.fetch_concurrent(&executor, plan.items(), &pb).await
        } else {
            self.fetch_sequential(&executor, plan.items(), &pb).await
        };
        pb.finish_and_clear();

        let mut summary = SessionSummary::from_plan(plan);
        for (item, outcome) in plan.items().iter().zip(outcomes) {
            match outcome {
                Some(outcome) => summary.record(&item.remote_path, outcome),
                None => summary.record(
                    &item.remote_path,
                    Err(FetchError::cancelled(&item.remote_path)),
                ),
            }
        }
        if self.aborted() {
            summary.mark_cancelled();
        }
        summary
    }

    async fn fetch_sequential(
        &self,
        executor: &FetchExecutor,
        items: &[PlanItem],
        pb: &ProgressBar,
    ) -> Vec<Option<Outcome>> {
        let mut outcomes = Vec::with_capacity(items.len());

        for item in items {
            if self.aborted() {
                tracing::info!("Abort requested, skipping remaining downloads");
                break;
            }
            let outcome = executor.fetch(item).await;
            self.report(pb, item, &outcome);
            outcomes.push(Some(outcome));
        }

        outcomes.resize(items.len(), None);
        outcomes
    }

    async fn fetch_concurrent(
        &self,
        executor: &FetchExecutor,
        items: &[PlanItem],
        pb: &ProgressBar,
    ) -> Vec<Option<Outcome>> {
        let mut outcomes: Vec<Option<Outcome>> = vec![None; items.len()];
        let mut join_set = JoinSet::new();
        let mut spawned = 0;

        for (index, item) in items.iter().enumerate() {
            if join_set.len() >= self.options.jobs() {
                if let Some(joined) = join_set.join_next().await {
                    self.collect(pb, items, &mut outcomes, joined);
                }
            }

            if self.aborted() {
                tracing::info!("Abort requested, skipping remaining downloads");
                break;
            }

            let executor = executor.clone();
            let item = item.clone();
            join_set.spawn(async move { (index, executor.fetch(&item).await) });
            spawned = index + 1;
        }

        while let Some(joined) = join_set.join_next().await {
            self.collect(pb, items, &mut outcomes, joined);
        }

        // Started tasks that never reported back failed; unstarted ones stay cancelled
        for (item, slot) in items.iter().zip(outcomes.iter_mut()).take(spawned) {
            if slot.is_none() {
                *slot = Some(Err(FetchError::new(
                    &item.remote_path,
                    "download task did not complete",
                )));
            }
        }

        outcomes
    }

    fn collect(
        &self,
        pb: &ProgressBar,
        items: &[PlanItem],
        outcomes: &mut [Option<Outcome>],
        joined: Result<(usize, Outcome), JoinError>,
    ) {
        match joined {
            Ok((done, outcome)) => {
                self.report(pb, &items[done], &outcome);
                outcomes[done] = Some(outcome);
            }
            Err(e) => tracing::warn!("Download task did not complete: {}", e),
        }
    }

    fn report(&self, pb: &ProgressBar, item: &PlanItem, outcome: &Outcome) {
        pb.inc(1);
        let line = match outcome {
            Ok(path) => format!("✓ Downloaded: {} -> {}", item.remote_path, path.display()),
            Err(e) => format!("✗ Failed to download {}: {}", item.remote_path, e),
        };
        if pb.is_hidden() {
            self.say(&line);
        } else {
            pb.println(line);
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if self.options.quiet() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    fn aborted(&self) -> bool {
        self.abort
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    fn transition(&mut self, next: SessionState) {
        tracing::info!("Sync session {} -> {}", self.state, next);
        self.state = next;
    }

    fn say(&self, line: &str) {
        if !self.options.quiet() {
            println!("{}", line);
        }
    }
}
