use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

fn default_layout_type() -> String {
    "ordered".to_string()
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Dashboard {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_layout_type")]
    pub layout_type: String,
    #[serde(default)]
    pub widgets: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Monitor {
    pub name: String,
    #[serde(rename = "type")]
    pub monitor_type: String,
    pub query: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Synthetic {
    pub name: String,
    #[serde(rename = "type")]
    pub test_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub config: Value,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Slo {
    #[serde(rename = "type")]
    pub slo_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub monitor_ids: Vec<i64>,
    pub thresholds: Vec<SloThreshold>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SloThreshold {
    pub timeframe: String,
    pub target: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DashboardSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct MonitorSummary {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SloSummary {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SyntheticSummary {
    pub public_id: String,
    pub name: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dashboard_keeps_unknown_fields() {
        let board: Dashboard = serde_json::from_value(json!({
            "title": "Checkout",
            "widgets": [{"definition": {"type": "note", "content": "hi"}}],
            "template_variables": [{"name": "env", "default": "prod"}]
        }))
        .unwrap();

        assert_eq!(board.layout_type, "ordered");
        assert!(board.description.is_none());
        let value = serde_json::to_value(&board).unwrap();
        assert_eq!(value["template_variables"][0]["name"], "env");
        assert!(value.get("description").is_none());
    }

    #[test]
    fn null_tags_decode_as_empty() {
        let summary: MonitorSummary =
            serde_json::from_value(json!({"id": 7, "name": "Errors", "tags": null})).unwrap();
        assert!(summary.tags.is_empty());

        let summary: SloSummary =
            serde_json::from_value(json!({"id": "abc", "name": "Checkout SLO"})).unwrap();
        assert!(summary.tags.is_empty());
    }
}
