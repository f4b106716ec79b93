use std::fmt;

use ddsync_core::{Dashboard, Monitor, Slo, Synthetic};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Dashboard,
    Monitor,
    Synthetic,
    Slo,
}

impl ResourceKind {
    // pruning order
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Dashboard,
        ResourceKind::Monitor,
        ResourceKind::Slo,
        ResourceKind::Synthetic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Dashboard => "dashboard",
            ResourceKind::Monitor => "monitor",
            ResourceKind::Synthetic => "synthetic",
            ResourceKind::Slo => "slo",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Declared: Serialize {
    const KIND: ResourceKind;

    fn natural_key(&self) -> &str;
}

impl Declared for Dashboard {
    const KIND: ResourceKind = ResourceKind::Dashboard;

    fn natural_key(&self) -> &str {
        &self.title
    }
}

impl Declared for Monitor {
    const KIND: ResourceKind = ResourceKind::Monitor;

    fn natural_key(&self) -> &str {
        &self.name
    }
}

impl Declared for Synthetic {
    const KIND: ResourceKind = ResourceKind::Synthetic;

    fn natural_key(&self) -> &str {
        &self.name
    }
}

impl Declared for Slo {
    const KIND: ResourceKind = ResourceKind::Slo;

    fn natural_key(&self) -> &str {
        &self.name
    }
}
