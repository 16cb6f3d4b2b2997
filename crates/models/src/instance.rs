use serde::{Deserialize, Serialize};

use crate::parameters::Parameters;

pub const STATE_IN_PROGRESS: &str = "in progress";

/// Broker-protocol progress report for asynchronous provisioning.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastOperation {
    pub state: String,
    pub description: String,
    pub async_poll_interval_seconds: u32,
}

impl LastOperation {
    pub fn in_progress(description: impl Into<String>, poll_interval_secs: u32) -> Self {
        Self {
            state: STATE_IN_PROGRESS.to_string(),
            description: description.into(),
            async_poll_interval_seconds: poll_interval_secs,
        }
    }
}

/// A provisioned share, keyed by `id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstance {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dashboard_url: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub organization_guid: String,
    #[serde(default)]
    pub space_guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_operation: Option<LastOperation>,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub parameters: Parameters,
}

impl ServiceInstance {
    /// True when `other` describes the same provision request: plan, space,
    /// organization and a structurally equal parameter mapping.
    pub fn same_request_as(&self, other: &ServiceInstance) -> bool {
        self.plan_id == other.plan_id
            && self.space_guid == other.space_guid
            && self.organization_guid == other.organization_guid
            && self.parameters == other.parameters
    }
}

/// Body returned to the front end after a provision call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceInstanceResponse {
    pub dashboard_url: String,
    pub last_operation: LastOperation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn instance() -> ServiceInstance {
        ServiceInstance {
            plan_id: "p".into(),
            organization_guid: "o".into(),
            space_guid: "s".into(),
            ..Default::default()
        }
    }

    #[test]
    fn same_request_checks_each_identity_field() {
        let base = instance();
        assert!(base.same_request_as(&base.clone()));

        let mut other = base.clone();
        other.plan_id = "q".into();
        assert!(!base.same_request_as(&other));

        let mut other = base.clone();
        other.organization_guid = "o2".into();
        assert!(!base.same_request_as(&other));

        let mut other = base.clone();
        other.space_guid = "s2".into();
        assert!(!base.same_request_as(&other));

        let mut other = base.clone();
        other.parameters.insert("k".into(), json!("v"));
        assert!(!base.same_request_as(&other));
    }

    #[test]
    fn dashboard_and_service_id_are_not_identity() {
        let base = instance();
        let mut other = base.clone();
        other.dashboard_url = "http://elsewhere".into();
        other.service_id = "svc".into();
        other.last_operation = Some(LastOperation::in_progress("x", 5));
        assert!(base.same_request_as(&other));
    }

    #[test]
    fn decodes_protocol_field_names() {
        let raw = json!({
            "service_id": "svc",
            "plan_id": "p",
            "organization_guid": "o",
            "space_guid": "s",
            "parameters": {"size": 10}
        });
        let inst: ServiceInstance = serde_json::from_value(raw).unwrap();
        assert_eq!(inst.plan_id, "p");
        assert_eq!(inst.parameters.get("size"), Some(&json!(10)));
        assert!(inst.last_operation.is_none());
    }
}
