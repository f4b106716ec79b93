use std::collections::HashSet;

use ddsync_core::DatadogError;
use tracing::debug;

use super::kind::ResourceKind;
use crate::remote::{RemoteApi, RemoteObject};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    pub owner_tag: String,
    pub description_tag: String,
}

impl Ownership {
    pub fn owns(&self, kind: ResourceKind, object: &RemoteObject) -> bool {
        match kind {
            ResourceKind::Dashboard => object
                .description
                .as_deref()
                .is_some_and(|d| d.contains(&self.description_tag)),
            _ => object.tags.iter().any(|t| *t == self.owner_tag),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RemoteSet {
    entries: Vec<RemoteObject>,
    reconciled: HashSet<String>,
}

impl RemoteSet {
    pub fn new(entries: Vec<RemoteObject>) -> Self {
        Self {
            entries,
            reconciled: HashSet::new(),
        }
    }

    pub fn find(&self, key: &str) -> Option<&RemoteObject> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn mark_reconciled(&mut self, id: &str) {
        self.reconciled.insert(id.to_string());
    }

    pub fn reconciled(&self) -> &HashSet<String> {
        &self.reconciled
    }

    pub fn unseen(&self) -> impl Iterator<Item = &RemoteObject> {
        self.entries
            .iter()
            .filter(|entry| !self.reconciled.contains(&entry.id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RemoteState {
    dashboards: RemoteSet,
    monitors: RemoteSet,
    synthetics: RemoteSet,
    slos: RemoteSet,
}

impl RemoteState {
    pub fn set(&self, kind: ResourceKind) -> &RemoteSet {
        match kind {
            ResourceKind::Dashboard => &self.dashboards,
            ResourceKind::Monitor => &self.monitors,
            ResourceKind::Synthetic => &self.synthetics,
            ResourceKind::Slo => &self.slos,
        }
    }

    pub fn set_mut(&mut self, kind: ResourceKind) -> &mut RemoteSet {
        match kind {
            ResourceKind::Dashboard => &mut self.dashboards,
            ResourceKind::Monitor => &mut self.monitors,
            ResourceKind::Synthetic => &mut self.synthetics,
            ResourceKind::Slo => &mut self.slos,
        }
    }
}

pub async fn fetch_owned<A: RemoteApi>(
    api: &A,
    ownership: &Ownership,
    kind: ResourceKind,
) -> Result<Vec<RemoteObject>, DatadogError> {
    let all = api.list(kind, None).await?;
    let total = all.len();
    let owned: Vec<_> = all
        .into_iter()
        .filter(|object| ownership.owns(kind, object))
        .collect();
    debug!(kind = %kind, total, owned = owned.len(), "fetched remote resources");
    Ok(owned)
}

pub async fn fetch_remote_state<A: RemoteApi>(
    api: &A,
    ownership: &Ownership,
) -> Result<RemoteState, DatadogError> {
    let mut state = RemoteState::default();
    for kind in ResourceKind::ALL {
        *state.set_mut(kind) = RemoteSet::new(fetch_owned(api, ownership, kind).await?);
    }
    Ok(state)
}
