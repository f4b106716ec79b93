use ddsync_core::DatadogError;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::SyncOptions;
use super::diff::{Decision, decide};
use super::kind::Declared;
use super::links::{
    alert_graph_widget, build_slo, find_synthetic_monitor, owned_dashboard, owned_monitor,
    owned_synthetic, slo_widget, wants_alert_graph,
};
use super::lock::{Lock, LockError};
use super::remote_state::RemoteState;
use super::stats::PushStats;
use crate::app::Application;
use crate::remote::RemoteApi;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("api error: {0}")]
    Api(#[from] DatadogError),
    #[error("lock error: {0}")]
    Lock(#[from] LockError),
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("monitor id is not numeric: {0}")]
    InvalidMonitorId(String),
}

pub struct Reconciler<'a, A> {
    pub(super) api: &'a A,
    pub(super) lock: &'a mut Lock,
    pub(super) remote: RemoteState,
    pub(super) options: &'a SyncOptions,
    pub(super) stats: PushStats,
}

impl<'a, A: RemoteApi> Reconciler<'a, A> {
    pub fn new(
        api: &'a A,
        lock: &'a mut Lock,
        remote: RemoteState,
        options: &'a SyncOptions,
    ) -> Self {
        Self {
            api,
            lock,
            remote,
            options,
            stats: PushStats::default(),
        }
    }

    /// The lock receives the payload exactly as sent, never the service's echo.
    pub async fn push<R: Declared>(&mut self, desired: &R) -> Result<String, SyncError> {
        let kind = R::KIND;
        let name = desired.natural_key();
        let payload = serde_json::to_value(desired)?;
        let decision = decide(kind, &payload, self.remote.set(kind).find(name), &*self.lock);

        let id = match decision {
            Decision::Skip { id } => {
                debug!(kind = %kind, name, id = %id, "unchanged");
                self.remote.set_mut(kind).mark_reconciled(&id);
                self.stats.skipped += 1;
                return Ok(id);
            }
            Decision::Update { id } => {
                info!(kind = %kind, name, id = %id, "updating");
                self.api.update(kind, &id, &payload).await?;
                self.stats.updated += 1;
                id
            }
            Decision::Create => {
                info!(kind = %kind, name, "creating");
                let id = self.api.create(kind, &payload).await?;
                self.stats.created += 1;
                id
            }
        };

        self.lock.record(kind, &id, payload);
        self.remote.set_mut(kind).mark_reconciled(&id);
        Ok(id)
    }

    pub async fn push_application(&mut self, app: &Application) -> Result<(), SyncError> {
        let options = self.options;
        let ownership = &options.ownership;
        let mut outage_ids = Vec::new();
        let mut alert_graphs = Vec::new();

        for synthetic in &app.synthetics {
            self.push(&owned_synthetic(synthetic, ownership)).await?;
            match find_synthetic_monitor(self.api, ownership, &synthetic.name).await? {
                Some(id) => outage_ids.push(id),
                None => warn!(
                    app = %app.name,
                    synthetic = %synthetic.name,
                    "synthetic monitor not found yet, leaving it out of the SLO"
                ),
            }
        }

        for monitor in &app.warning_monitors {
            let id = self.push(&owned_monitor(monitor, ownership)).await?;
            if wants_alert_graph(monitor, &options.alert_graph_tag) {
                alert_graphs.push(alert_graph_widget(monitor, &id));
            }
        }

        for monitor in &app.outage_monitors {
            let id = self.push(&owned_monitor(monitor, ownership)).await?;
            if wants_alert_graph(monitor, &options.alert_graph_tag) {
                alert_graphs.push(alert_graph_widget(monitor, &id));
            }
            outage_ids.push(id);
        }

        let mut board = owned_dashboard(&app.board, ownership);
        board.widgets.extend(alert_graphs);

        if !outage_ids.is_empty() {
            let monitor_ids = outage_ids
                .iter()
                .map(|id| {
                    id.parse::<i64>()
                        .map_err(|_| SyncError::InvalidMonitorId(id.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let slo = build_slo(app, monitor_ids, &ownership.owner_tag);
            let slo_id = self.push(&slo).await?;
            board.widgets.insert(0, slo_widget(app, &slo_id));
        }

        self.push(&board).await?;
        Ok(())
    }

    pub fn finish(self) -> PushStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
