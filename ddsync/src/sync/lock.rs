use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::kind::ResourceKind;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid lock file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Lock {
    #[serde(default)]
    dashboards: BTreeMap<String, Value>,
    #[serde(default)]
    monitors: BTreeMap<String, Value>,
    #[serde(default)]
    synthetics: BTreeMap<String, Value>,
    #[serde(default)]
    slos: BTreeMap<String, Value>,
}

impl Lock {
    pub async fn load(path: &Path) -> Result<Self, LockError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Written to `<path>.tmp` and renamed over.
    pub async fn persist(&self, path: &Path) -> Result<(), LockError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let bytes = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    pub fn get(&self, kind: ResourceKind, id: &str) -> Option<&Value> {
        self.entries(kind).get(id)
    }

    pub fn record(&mut self, kind: ResourceKind, id: &str, payload: Value) {
        self.entries_mut(kind).insert(id.to_string(), payload);
    }

    pub fn forget(&mut self, kind: ResourceKind, id: &str) -> Option<Value> {
        self.entries_mut(kind).remove(id)
    }

    pub fn retain_ids(&mut self, kind: ResourceKind, keep: &HashSet<String>) -> usize {
        let entries = self.entries_mut(kind);
        let before = entries.len();
        entries.retain(|id, _| keep.contains(id));
        before - entries.len()
    }

    pub fn len(&self, kind: ResourceKind) -> usize {
        self.entries(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        ResourceKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    fn entries(&self, kind: ResourceKind) -> &BTreeMap<String, Value> {
        match kind {
            ResourceKind::Dashboard => &self.dashboards,
            ResourceKind::Monitor => &self.monitors,
            ResourceKind::Synthetic => &self.synthetics,
            ResourceKind::Slo => &self.slos,
        }
    }

    fn entries_mut(&mut self, kind: ResourceKind) -> &mut BTreeMap<String, Value> {
        match kind {
            ResourceKind::Dashboard => &mut self.dashboards,
            ResourceKind::Monitor => &mut self.monitors,
            ResourceKind::Synthetic => &mut self.synthetics,
            ResourceKind::Slo => &mut self.slos,
        }
    }
}
