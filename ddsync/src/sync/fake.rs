use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use ddsync_core::DatadogError;
use serde_json::Value;

use super::kind::ResourceKind;
use super::links::synthetic_monitor_name;
use crate::remote::{RemoteApi, RemoteObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
pub struct FakeRemote {
    objects: RefCell<BTreeMap<ResourceKind, Vec<(RemoteObject, Value)>>>,
    calls: RefCell<Vec<(Call, ResourceKind, String)>>,
    next_id: Cell<u64>,
    synthetic_monitors: bool,
    fail_on: Option<(Call, ResourceKind)>,
}

impl FakeRemote {
    pub fn with_synthetic_monitors() -> Self {
        Self {
            synthetic_monitors: true,
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, call: Call, kind: ResourceKind) -> Self {
        self.fail_on = Some((call, kind));
        self
    }

    pub fn seed(&self, kind: ResourceKind, object: RemoteObject) {
        self.objects
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push((object, Value::Null));
    }

    pub fn objects(&self, kind: ResourceKind) -> Vec<RemoteObject> {
        self.objects
            .borrow()
            .get(&kind)
            .map(|items| items.iter().map(|(o, _)| o.clone()).collect())
            .unwrap_or_default()
    }

    pub fn payload(&self, kind: ResourceKind, id: &str) -> Option<Value> {
        self.objects
            .borrow()
            .get(&kind)?
            .iter()
            .find(|(o, _)| o.id == id)
            .map(|(_, p)| p.clone())
    }

    pub fn find_id(&self, kind: ResourceKind, key: &str) -> Option<String> {
        self.objects(kind)
            .into_iter()
            .find(|o| o.key == key)
            .map(|o| o.id)
    }

    pub fn calls(&self, call: Call) -> Vec<(ResourceKind, String)> {
        self.calls
            .borrow()
            .iter()
            .filter(|(c, _, _)| *c == call)
            .map(|(_, kind, id)| (*kind, id.clone()))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn check(&self, call: Call, kind: ResourceKind, id: &str) -> Result<(), DatadogError> {
        self.calls.borrow_mut().push((call, kind, id.to_string()));
        if self.fail_on == Some((call, kind)) {
            return Err(DatadogError::MissingData);
        }
        Ok(())
    }

    fn allocate_id(&self, kind: ResourceKind) -> String {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        match kind {
            ResourceKind::Monitor => (1000 + n).to_string(),
            other => format!("{other}-{n}"),
        }
    }

    fn insert(&self, kind: ResourceKind, object: RemoteObject, payload: Value) {
        self.objects
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push((object, payload));
    }
}

fn object_from_payload(id: &str, kind: ResourceKind, payload: &Value) -> RemoteObject {
    let key_field = if kind == ResourceKind::Dashboard {
        "title"
    } else {
        "name"
    };
    RemoteObject {
        id: id.to_string(),
        key: payload[key_field].as_str().unwrap_or_default().to_string(),
        tags: payload["tags"]
            .as_array()
            .map(|tags| {
                tags.iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
        description: payload["description"].as_str().map(str::to_string),
    }
}

impl RemoteApi for FakeRemote {
    async fn list(
        &self,
        kind: ResourceKind,
        name: Option<&str>,
    ) -> Result<Vec<RemoteObject>, DatadogError> {
        self.check(Call::List, kind, name.unwrap_or_default())?;
        Ok(self
            .objects(kind)
            .into_iter()
            .filter(|o| name.is_none_or(|n| o.key.contains(n)))
            .collect())
    }

    async fn create(&self, kind: ResourceKind, payload: &Value) -> Result<String, DatadogError> {
        let id = self.allocate_id(kind);
        self.check(Call::Create, kind, &id)?;
        let object = object_from_payload(&id, kind, payload);
        if kind == ResourceKind::Synthetic && self.synthetic_monitors {
            let companion = RemoteObject {
                id: self.allocate_id(ResourceKind::Monitor),
                key: synthetic_monitor_name(&object.key),
                tags: object.tags.clone(),
                description: None,
            };
            self.insert(ResourceKind::Monitor, companion, Value::Null);
        }
        // Echoed server-side fields must never reach the lock.
        let mut stored = payload.clone();
        if let Some(map) = stored.as_object_mut() {
            map.insert("created_at".into(), Value::from("2024-01-01T00:00:00Z"));
        }
        self.insert(kind, object, stored);
        Ok(id)
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        payload: &Value,
    ) -> Result<(), DatadogError> {
        self.check(Call::Update, kind, id)?;
        let mut objects = self.objects.borrow_mut();
        let slot = objects
            .get_mut(&kind)
            .and_then(|items| items.iter_mut().find(|(o, _)| o.id == id))
            .ok_or(DatadogError::MissingData)?;
        *slot = (object_from_payload(id, kind, payload), payload.clone());
        Ok(())
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), DatadogError> {
        self.check(Call::Delete, kind, id)?;
        if let Some(items) = self.objects.borrow_mut().get_mut(&kind) {
            items.retain(|(o, _)| o.id != id);
        }
        Ok(())
    }
}
