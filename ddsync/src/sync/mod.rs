pub mod diff;
pub mod engine;
#[cfg(test)]
pub(crate) mod fake;
pub mod kind;
pub mod links;
pub mod lock;
mod prune;
pub mod remote_state;
pub mod stats;

use std::path::Path;

use tracing::{info, warn};

use crate::app::Application;
use crate::remote::RemoteApi;
use engine::{Reconciler, SyncError};
use lock::Lock;
use remote_state::{Ownership, fetch_remote_state};
use stats::PushStats;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub ownership: Ownership,
    pub alert_graph_tag: String,
    /// Restricts the run to one application and disables pruning.
    pub name_filter: Option<String>,
}

/// Loads the lock, reconciles, and persists the lock only if every remote call succeeded.
pub async fn run_push<A: RemoteApi>(
    api: &A,
    apps: &[Application],
    options: &SyncOptions,
    lock_path: &Path,
) -> Result<PushStats, SyncError> {
    let mut lock = Lock::load(lock_path).await?;
    let stats = reconcile(api, apps, options, &mut lock).await?;
    lock.persist(lock_path).await?;
    Ok(stats)
}

pub async fn reconcile<A: RemoteApi>(
    api: &A,
    apps: &[Application],
    options: &SyncOptions,
    lock: &mut Lock,
) -> Result<PushStats, SyncError> {
    let remote = fetch_remote_state(api, &options.ownership).await?;
    let mut reconciler = Reconciler::new(api, lock, remote, options);

    let mut pushed = 0usize;
    for app in apps.iter().filter(|app| {
        options
            .name_filter
            .as_deref()
            .is_none_or(|filter| app.matches_filter(filter))
    }) {
        info!(app = %app.name, "pushing application");
        reconciler.push_application(app).await?;
        pushed += 1;
    }

    match &options.name_filter {
        Some(filter) if pushed == 0 => {
            warn!(filter = %filter, "no application dashboard matches the name filter");
        }
        Some(_) => {}
        None => {
            reconciler.prune().await?;
            reconciler.collect_lock_garbage();
        }
    }

    Ok(reconciler.finish())
}
