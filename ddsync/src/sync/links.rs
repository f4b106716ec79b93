use ddsync_core::{Dashboard, DatadogError, Monitor, Slo, SloThreshold, Synthetic};
use serde_json::{Value, json};

use super::kind::ResourceKind;
use super::remote_state::Ownership;
use crate::app::Application;
use crate::remote::RemoteApi;

pub const SYNTHETIC_MONITOR_PREFIX: &str = "[Synthetics] ";
const SYNTHETIC_MONITOR_MARKER: &str = "[Synthetics]";

const SLO_TYPE: &str = "monitor";
const SLO_TIMEFRAME: &str = "30d";
const SLO_TARGET: f64 = 99.9;
const SLO_WARNING: f64 = 99.95;

pub fn synthetic_monitor_name(synthetic: &str) -> String {
    format!("{SYNTHETIC_MONITOR_PREFIX}{synthetic}")
}

pub fn is_synthetic_monitor(name: &str) -> bool {
    name.contains(SYNTHETIC_MONITOR_MARKER)
}

/// Single lookup of a synthetic's companion monitor; zero or several matches are `None`.
pub async fn find_synthetic_monitor<A: RemoteApi>(
    api: &A,
    ownership: &Ownership,
    synthetic: &str,
) -> Result<Option<String>, DatadogError> {
    let name = synthetic_monitor_name(synthetic);
    // The service's name filter is loose, so exact name and ownership are re-checked here.
    let mut matches = api
        .list(ResourceKind::Monitor, Some(&name))
        .await?
        .into_iter()
        .filter(|m| m.key == name && ownership.owns(ResourceKind::Monitor, m));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(Some(only.id)),
        _ => Ok(None),
    }
}

pub fn build_slo(app: &Application, monitor_ids: Vec<i64>, owner_tag: &str) -> Slo {
    Slo {
        slo_type: SLO_TYPE.to_string(),
        name: slo_name(app),
        description: Some(format!(
            "Track the uptime of {} {}",
            app.name, app.team.slack_group
        )),
        monitor_ids,
        thresholds: vec![SloThreshold {
            timeframe: SLO_TIMEFRAME.to_string(),
            target: SLO_TARGET,
            warning: Some(SLO_WARNING),
        }],
        tags: vec![format!("service:{}", app.name), owner_tag.to_string()],
    }
}

pub fn slo_name(app: &Application) -> String {
    format!("{} SLO", app.name)
}

pub fn slo_widget(app: &Application, slo_id: &str) -> Value {
    json!({
        "definition": {
            "viz": "slo",
            "type": "slo",
            "slo_id": slo_id,
            "title": slo_name(app),
            "time_windows": [SLO_TIMEFRAME],
            "show_error_budget": true,
            "view_type": "detail",
            "view_mode": "overall"
        }
    })
}

pub fn alert_graph_widget(monitor: &Monitor, monitor_id: &str) -> Value {
    json!({
        "definition": {
            "type": "alert_graph",
            "title": format!("Alert: {}", monitor.name),
            "alert_id": monitor_id,
            "viz_type": "timeseries"
        }
    })
}

pub fn wants_alert_graph(monitor: &Monitor, alert_graph_tag: &str) -> bool {
    monitor.tags.iter().any(|t| t == alert_graph_tag)
}

pub fn with_owner_tag(mut tags: Vec<String>, owner_tag: &str) -> Vec<String> {
    if !tags.iter().any(|t| t == owner_tag) {
        tags.push(owner_tag.to_string());
    }
    tags
}

pub fn owned_monitor(monitor: &Monitor, ownership: &Ownership) -> Monitor {
    let mut monitor = monitor.clone();
    monitor.tags = with_owner_tag(monitor.tags, &ownership.owner_tag);
    monitor
}

pub fn owned_synthetic(synthetic: &Synthetic, ownership: &Ownership) -> Synthetic {
    let mut synthetic = synthetic.clone();
    synthetic.tags = with_owner_tag(synthetic.tags, &ownership.owner_tag);
    synthetic
}

pub fn owned_dashboard(board: &Dashboard, ownership: &Ownership) -> Dashboard {
    let mut board = board.clone();
    let tag = &ownership.description_tag;
    board.description = Some(match board.description.take() {
        Some(d) if d.contains(tag.as_str()) => d,
        Some(d) if d.trim().is_empty() => tag.clone(),
        Some(d) => format!("{d} {tag}"),
        None => tag.clone(),
    });
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteObject;
    use crate::sync::fake::FakeRemote;

    fn ownership() -> Ownership {
        Ownership {
            owner_tag: "created_by:ddsync".into(),
            description_tag: "[managed by ddsync]".into(),
        }
    }

    fn app() -> Application {
        serde_json::from_value(json!({
            "name": "checkout",
            "team": {"name": "payments", "slackGroup": "@payments-team"},
            "board": {"title": "Checkout", "description": "Checkout overview"}
        }))
        .unwrap()
    }

    fn monitor(id: &str, name: &str, tags: &[&str]) -> RemoteObject {
        RemoteObject {
            id: id.into(),
            key: name.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: None,
        }
    }

    #[tokio::test]
    async fn synthetic_monitor_needs_exact_owned_single_match() {
        let remote = FakeRemote::default();
        remote.seed(
            ResourceKind::Monitor,
            monitor("1", "[Synthetics] Checkout up", &["created_by:ddsync"]),
        );
        remote.seed(
            ResourceKind::Monitor,
            monitor("2", "[Synthetics] Checkout up (eu)", &["created_by:ddsync"]),
        );
        remote.seed(
            ResourceKind::Monitor,
            monitor("3", "[Synthetics] Search up", &[]),
        );

        let found = find_synthetic_monitor(&remote, &ownership(), "Checkout up")
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("1"));

        let untagged = find_synthetic_monitor(&remote, &ownership(), "Search up")
            .await
            .unwrap();
        assert!(untagged.is_none());
    }

    #[tokio::test]
    async fn ambiguous_synthetic_monitor_is_not_found() {
        let remote = FakeRemote::default();
        for id in ["1", "2"] {
            remote.seed(
                ResourceKind::Monitor,
                monitor(id, "[Synthetics] Checkout up", &["created_by:ddsync"]),
            );
        }

        let found = find_synthetic_monitor(&remote, &ownership(), "Checkout up")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn slo_uses_fixed_window_and_thresholds() {
        let slo = build_slo(&app(), vec![7, 8], "created_by:ddsync");

        assert_eq!(slo.name, "checkout SLO");
        assert_eq!(slo.slo_type, "monitor");
        assert_eq!(slo.monitor_ids, vec![7, 8]);
        assert_eq!(slo.thresholds[0].timeframe, "30d");
        assert_eq!(slo.thresholds[0].target, 99.9);
        assert_eq!(slo.thresholds[0].warning, Some(99.95));
        assert_eq!(
            slo.description.as_deref(),
            Some("Track the uptime of checkout @payments-team")
        );
        assert_eq!(slo.tags, vec!["service:checkout", "created_by:ddsync"]);
    }

    #[test]
    fn slo_widget_references_slo_id() {
        let widget = slo_widget(&app(), "slo-1");
        assert_eq!(widget["definition"]["slo_id"], "slo-1");
        assert_eq!(widget["definition"]["title"], "checkout SLO");
        assert_eq!(widget["definition"]["time_windows"], json!(["30d"]));
    }

    #[test]
    fn companion_monitor_names_are_detected() {
        assert_eq!(synthetic_monitor_name("X"), "[Synthetics] X");
        assert!(is_synthetic_monitor("[Synthetics] X"));
        assert!(!is_synthetic_monitor("Synthetics X"));
    }

    #[test]
    fn ownership_stamping_is_idempotent() {
        let board = owned_dashboard(&app().board, &ownership());
        assert_eq!(
            board.description.as_deref(),
            Some("Checkout overview [managed by ddsync]")
        );
        let again = owned_dashboard(&board, &ownership());
        assert_eq!(again, board);

        let tags = with_owner_tag(vec!["team:payments".into()], "created_by:ddsync");
        assert_eq!(tags, vec!["team:payments", "created_by:ddsync"]);
        assert_eq!(with_owner_tag(tags.clone(), "created_by:ddsync"), tags);
    }
}
