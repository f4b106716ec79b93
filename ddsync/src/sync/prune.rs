use tracing::{debug, info};

use super::engine::{Reconciler, SyncError};
use super::kind::ResourceKind;
use super::links::is_synthetic_monitor;
use crate::remote::{RemoteApi, RemoteObject};

impl<A: RemoteApi> Reconciler<'_, A> {
    /// Deletes every fetched resource no declaration claimed this run. Companion
    /// monitors of synthetics are left to their parent check.
    pub async fn prune(&mut self) -> Result<(), SyncError> {
        for kind in ResourceKind::ALL {
            let doomed: Vec<RemoteObject> = self
                .remote
                .set(kind)
                .unseen()
                .filter(|object| {
                    !(kind == ResourceKind::Monitor && is_synthetic_monitor(&object.key))
                })
                .cloned()
                .collect();
            for object in doomed {
                info!(kind = %kind, name = %object.key, id = %object.id, "deleting");
                self.api.delete(kind, &object.id).await?;
                self.lock.forget(kind, &object.id);
                self.stats.deleted += 1;
            }
        }
        Ok(())
    }

    pub fn collect_lock_garbage(&mut self) {
        for kind in ResourceKind::ALL {
            let dropped = self.lock.retain_ids(kind, self.remote.set(kind).reconciled());
            if dropped > 0 {
                debug!(kind = %kind, dropped, "dropped stale lock entries");
            }
        }
    }
}
