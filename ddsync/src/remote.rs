use ddsync_core::{
    DashboardSummary, DatadogClient, DatadogError, MonitorSummary, SloSummary, SyntheticSummary,
};
use serde_json::Value;

use crate::sync::kind::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub id: String,
    pub key: String,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait RemoteApi {
    /// `name` narrows the listing where the service supports it; callers must not rely on it.
    async fn list(
        &self,
        kind: ResourceKind,
        name: Option<&str>,
    ) -> Result<Vec<RemoteObject>, DatadogError>;

    async fn create(&self, kind: ResourceKind, payload: &Value) -> Result<String, DatadogError>;

    async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        payload: &Value,
    ) -> Result<(), DatadogError>;

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), DatadogError>;
}

impl RemoteApi for DatadogClient {
    async fn list(
        &self,
        kind: ResourceKind,
        name: Option<&str>,
    ) -> Result<Vec<RemoteObject>, DatadogError> {
        Ok(match kind {
            ResourceKind::Dashboard => self
                .list_dashboards()
                .await?
                .into_iter()
                .map(RemoteObject::from)
                .collect(),
            ResourceKind::Monitor => self
                .list_monitors(name)
                .await?
                .into_iter()
                .map(RemoteObject::from)
                .collect(),
            ResourceKind::Synthetic => self
                .list_synthetics()
                .await?
                .into_iter()
                .map(RemoteObject::from)
                .collect(),
            ResourceKind::Slo => self
                .list_slos()
                .await?
                .into_iter()
                .map(RemoteObject::from)
                .collect(),
        })
    }

    async fn create(&self, kind: ResourceKind, payload: &Value) -> Result<String, DatadogError> {
        Ok(match kind {
            ResourceKind::Dashboard => self.create_dashboard(payload).await?.id,
            ResourceKind::Monitor => self.create_monitor(payload).await?.id.to_string(),
            ResourceKind::Synthetic => self.create_synthetic(payload).await?.public_id,
            ResourceKind::Slo => self.create_slo(payload).await?.id,
        })
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        payload: &Value,
    ) -> Result<(), DatadogError> {
        match kind {
            ResourceKind::Dashboard => {
                self.update_dashboard(id, payload).await?;
            }
            ResourceKind::Monitor => {
                self.update_monitor(id, payload).await?;
            }
            ResourceKind::Synthetic => {
                self.update_synthetic(id, payload).await?;
            }
            ResourceKind::Slo => self.update_slo(id, payload).await?,
        }
        Ok(())
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), DatadogError> {
        match kind {
            ResourceKind::Dashboard => self.delete_dashboard(id).await,
            ResourceKind::Monitor => self.delete_monitor(id).await,
            ResourceKind::Synthetic => self.delete_synthetic(id).await,
            ResourceKind::Slo => self.delete_slo(id).await,
        }
    }
}

impl From<DashboardSummary> for RemoteObject {
    fn from(value: DashboardSummary) -> Self {
        Self {
            id: value.id,
            key: value.title,
            tags: Vec::new(),
            description: value.description,
        }
    }
}

impl From<MonitorSummary> for RemoteObject {
    fn from(value: MonitorSummary) -> Self {
        Self {
            id: value.id.to_string(),
            key: value.name,
            tags: value.tags,
            description: None,
        }
    }
}

impl From<SyntheticSummary> for RemoteObject {
    fn from(value: SyntheticSummary) -> Self {
        Self {
            id: value.public_id,
            key: value.name,
            tags: value.tags,
            description: None,
        }
    }
}

impl From<SloSummary> for RemoteObject {
    fn from(value: SloSummary) -> Self {
        Self {
            id: value.id,
            key: value.name,
            tags: value.tags,
            description: None,
        }
    }
}
