use serde_json::Value;

use super::kind::ResourceKind;
use super::lock::Lock;
use crate::remote::RemoteObject;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Create,
    Update { id: String },
    Skip { id: String },
}

/// Compares against the lock entry, never the live payload, so server-added
/// fields do not register as changes. Object keys compare without regard to
/// order; arrays compare element by element.
pub fn decide(
    kind: ResourceKind,
    desired: &Value,
    matched: Option<&RemoteObject>,
    lock: &Lock,
) -> Decision {
    let Some(remote) = matched else {
        return Decision::Create;
    };
    let id = remote.id.clone();
    match lock.get(kind, &id) {
        Some(recorded) if recorded == desired => Decision::Skip { id },
        _ => Decision::Update { id },
    }
}
