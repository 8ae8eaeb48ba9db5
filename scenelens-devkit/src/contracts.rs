/*!
Wire contracts for the SceneLens channel

A table of the nine message kinds with their direction and the fields each
payload must carry, plus a validator for raw JSON payloads. Lets tests check
that whatever goes over the channel still matches what the other side reads.
*/

use anyhow::{bail, Result};
use scenelens_protocol::Direction;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy)]
pub struct WireContract {
    pub kind: &'static str,
    pub direction: Direction,
    pub required_fields: &'static [&'static str],
    pub optional_fields: &'static [&'static str],
}

pub const CONTRACTS: &[WireContract] = &[
    WireContract {
        kind: "get-hierarchy",
        direction: Direction::InspectorToTarget,
        required_fields: &[],
        optional_fields: &[],
    },
    WireContract {
        kind: "set-property",
        direction: Direction::InspectorToTarget,
        required_fields: &["id", "property"],
        optional_fields: &["value"],
    },
    WireContract {
        kind: "highlight",
        direction: Direction::InspectorToTarget,
        required_fields: &[],
        optional_fields: &["id", "showChildren"],
    },
    WireContract {
        kind: "get-layout",
        direction: Direction::InspectorToTarget,
        required_fields: &["id"],
        optional_fields: &[],
    },
    WireContract {
        kind: "set-filter-uniform",
        direction: Direction::InspectorToTarget,
        required_fields: &["id", "filterIndex", "groupName", "uniformName", "value"],
        optional_fields: &[],
    },
    WireContract {
        kind: "hierarchy",
        direction: Direction::TargetToInspector,
        required_fields: &["data"],
        optional_fields: &[],
    },
    WireContract {
        kind: "updated",
        direction: Direction::TargetToInspector,
        required_fields: &["id", "layout", "transform"],
        optional_fields: &["layoutEnabled"],
    },
    WireContract {
        kind: "layout-config",
        direction: Direction::TargetToInspector,
        required_fields: &["id", "config"],
        optional_fields: &[],
    },
    WireContract {
        kind: "filter-updated",
        direction: Direction::TargetToInspector,
        required_fields: &["id", "filterIndex", "uniforms"],
        optional_fields: &[],
    },
];

pub fn contract(kind: &str) -> Option<&'static WireContract> {
    CONTRACTS.iter().find(|c| c.kind == kind)
}

/// Checks a raw payload against its contract: known `type`, every required
/// field present, no field outside the contract.
pub fn validate(payload: &Value) -> Result<&'static WireContract> {
    let Some(object) = payload.as_object() else {
        bail!("payload is not a JSON object");
    };
    let Some(kind) = object.get("type").and_then(Value::as_str) else {
        bail!("payload has no string 'type'");
    };
    let Some(contract) = contract(kind) else {
        bail!("unknown message type: {kind}");
    };
    for field in contract.required_fields {
        if !object.contains_key(*field) {
            bail!("'{kind}' is missing required field '{field}'");
        }
    }
    for key in object.keys().filter(|k| k.as_str() != "type") {
        let known = contract.required_fields.contains(&key.as_str()) || contract.optional_fields.contains(&key.as_str());
        if !known {
            bail!("'{kind}' carries unexpected field '{key}'");
        }
    }
    log::debug!("✅ [CONTRACT] {kind} payload is valid");
    Ok(contract)
}

/// A minimal conforming payload for `kind`.
pub fn example_payload(kind: &str) -> Option<Value> {
    let payload = match kind {
        "get-hierarchy" => json!({ "type": kind }),
        "set-property" => json!({ "type": kind, "id": "Board", "property": "gap", "value": 16 }),
        "highlight" => json!({ "type": kind, "id": "Board", "showChildren": true }),
        "get-layout" => json!({ "type": kind, "id": "Board" }),
        "set-filter-uniform" => json!({
            "type": kind,
            "id": "Card0",
            "filterIndex": 0,
            "groupName": "glowUniforms",
            "uniformName": "uStrength",
            "value": 2.5
        }),
        "hierarchy" => json!({ "type": kind, "data": [] }),
        "updated" => json!({
            "type": kind,
            "id": "Board",
            "layout": { "gap": 16 },
            "transform": {
                "x": 0, "y": 0, "scaleX": 1, "scaleY": 1, "rotation": 0,
                "pivotX": 0, "pivotY": 0, "alpha": 1, "hasAnchor": false
            }
        }),
        "layout-config" => json!({ "type": kind, "id": "Board", "config": { "gap": 16 } }),
        "filter-updated" => json!({ "type": kind, "id": "Card0", "filterIndex": 0, "uniforms": [] }),
        _ => return None,
    };
    Some(payload)
}
