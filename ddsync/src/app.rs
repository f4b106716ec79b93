use std::collections::HashSet;
use std::path::Path;

use ddsync_core::{Dashboard, Monitor, Synthetic};
use serde::Deserialize;
use thiserror::Error;

use crate::sync::kind::ResourceKind;
use crate::sync::links::slo_name;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to read application descriptors: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid application descriptors: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {kind} name {name:?} in application descriptors")]
    Duplicate { kind: ResourceKind, name: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: String,
    #[serde(default, alias = "slack_group")]
    pub slack_group: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub name: String,
    pub team: Team,
    pub board: Dashboard,
    #[serde(default, alias = "warning_monitors")]
    pub warning_monitors: Vec<Monitor>,
    #[serde(default, alias = "outage_monitors")]
    pub outage_monitors: Vec<Monitor>,
    #[serde(default)]
    pub synthetics: Vec<Synthetic>,
}

impl Application {
    pub fn matches_filter(&self, filter: &str) -> bool {
        self.board.title.to_lowercase() == filter.to_lowercase()
    }
}

pub async fn load_applications(path: &Path) -> Result<Vec<Application>, DescriptorError> {
    let bytes = tokio::fs::read(path).await?;
    let apps: Vec<Application> = serde_json::from_slice(&bytes)?;
    validate(&apps)?;
    Ok(apps)
}

/// Natural keys must be unique per kind across all applications.
pub fn validate(apps: &[Application]) -> Result<(), DescriptorError> {
    let mut boards = HashSet::new();
    let mut monitors = HashSet::new();
    let mut synthetics = HashSet::new();
    let slos: Vec<String> = apps.iter().map(slo_name).collect();
    let mut seen_slos = HashSet::new();
    for (app, slo) in apps.iter().zip(&slos) {
        claim(&mut boards, ResourceKind::Dashboard, &app.board.title)?;
        // SLOs are keyed by application name.
        claim(&mut seen_slos, ResourceKind::Slo, slo)?;
        for monitor in app.warning_monitors.iter().chain(&app.outage_monitors) {
            claim(&mut monitors, ResourceKind::Monitor, &monitor.name)?;
        }
        for synthetic in &app.synthetics {
            claim(&mut synthetics, ResourceKind::Synthetic, &synthetic.name)?;
        }
    }
    Ok(())
}

fn claim<'a>(
    seen: &mut HashSet<&'a str>,
    kind: ResourceKind,
    name: &'a str,
) -> Result<(), DescriptorError> {
    if seen.insert(name) {
        Ok(())
    } else {
        Err(DescriptorError::Duplicate {
            kind,
            name: name.to_string(),
        })
    }
}
