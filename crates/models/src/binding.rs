use serde::{Deserialize, Serialize};

use crate::parameters::Parameters;

/// A grant of access to one instance, keyed globally by `id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceBinding {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default, rename = "plan_id")]
    pub service_plan_id: String,
    #[serde(default)]
    pub service_instance_id: String,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub parameters: Parameters,
}

impl ServiceBinding {
    /// True when `other` names the same binding request. Parameters are
    /// deliberately left out of the comparison.
    pub fn same_request_as(&self, other: &ServiceBinding) -> bool {
        self.app_id == other.app_id
            && self.service_plan_id == other.service_plan_id
            && self.service_id == other.service_id
            && self.service_instance_id == other.service_instance_id
            && self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn binding() -> ServiceBinding {
        ServiceBinding {
            id: "b1".into(),
            service_id: "svc".into(),
            app_id: "app".into(),
            service_plan_id: "p".into(),
            service_instance_id: "i1".into(),
            parameters: Parameters::new(),
        }
    }

    #[test]
    fn parameters_do_not_affect_identity() {
        let a = binding();
        let mut b = binding();
        b.parameters.insert("path".into(), json!("/elsewhere"));
        assert!(a.same_request_as(&b));
    }

    #[test]
    fn any_identity_field_breaks_match() {
        let a = binding();
        let edits: [fn(&mut ServiceBinding); 5] = [
            |b| b.id = "b2".into(),
            |b| b.service_id = "svc2".into(),
            |b| b.app_id = "app2".into(),
            |b| b.service_plan_id = "p2".into(),
            |b| b.service_instance_id = "i2".into(),
        ];
        for edit in edits {
            let mut b = binding();
            edit(&mut b);
            assert!(!a.same_request_as(&b));
        }
    }

    #[test]
    fn plan_id_uses_protocol_name() {
        let v = serde_json::to_value(binding()).unwrap();
        assert_eq!(v["plan_id"], json!("p"));
        assert!(v.get("service_plan_id").is_none());
        assert!(v.get("parameters").is_none());
    }
}
