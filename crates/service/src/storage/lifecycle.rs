use std::collections::HashMap;

use models::{ServiceBinding, ServiceInstance};

/// Instance and binding maps, the source of truth for existence and
/// duplicate-request checks.
///
/// Not synchronized on its own: the controller keeps it behind a single lock
/// so both maps move together.
#[derive(Debug, Default, Clone)]
pub struct LifecycleStore {
    instances: HashMap<String, ServiceInstance>,
    bindings: HashMap<String, ServiceBinding>,
}

impl LifecycleStore {
    pub fn new(
        instances: HashMap<String, ServiceInstance>,
        bindings: HashMap<String, ServiceBinding>,
    ) -> Self {
        Self { instances, bindings }
    }

    pub fn instance_exists(&self, instance_id: &str) -> bool {
        self.instances.contains_key(instance_id)
    }

    /// False when the id is unknown; otherwise compares plan, space,
    /// organization and parameters of the stored record with `candidate`.
    pub fn instance_properties_match(&self, instance_id: &str, candidate: &ServiceInstance) -> bool {
        self.instances
            .get(instance_id)
            .map(|existing| existing.same_request_as(candidate))
            .unwrap_or(false)
    }

    pub fn instance(&self, instance_id: &str) -> Option<&ServiceInstance> {
        self.instances.get(instance_id)
    }

    /// Replaces any previous record for the id.
    pub fn insert_instance(&mut self, instance_id: &str, instance: ServiceInstance) {
        self.instances.insert(instance_id.to_string(), instance);
    }

    pub fn remove_instance(&mut self, instance_id: &str) -> Option<ServiceInstance> {
        self.instances.remove(instance_id)
    }

    pub fn instances(&self) -> &HashMap<String, ServiceInstance> {
        &self.instances
    }

    // Bindings are keyed globally; the instance id is accepted for symmetry
    // with the broker API but never used to filter.

    pub fn binding_exists(&self, _instance_id: &str, binding_id: &str) -> bool {
        self.bindings.contains_key(binding_id)
    }

    pub fn binding_properties_match(
        &self,
        _instance_id: &str,
        binding_id: &str,
        candidate: &ServiceBinding,
    ) -> bool {
        self.bindings
            .get(binding_id)
            .map(|existing| existing.same_request_as(candidate))
            .unwrap_or(false)
    }

    pub fn binding(&self, binding_id: &str) -> Option<&ServiceBinding> {
        self.bindings.get(binding_id)
    }

    pub fn insert_binding(&mut self, binding_id: &str, binding: ServiceBinding) {
        self.bindings.insert(binding_id.to_string(), binding);
    }

    pub fn remove_binding(&mut self, binding_id: &str) -> Option<ServiceBinding> {
        self.bindings.remove(binding_id)
    }

    pub fn bindings(&self) -> &HashMap<String, ServiceBinding> {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn instance(plan: &str) -> ServiceInstance {
        ServiceInstance {
            id: "i1".into(),
            plan_id: plan.into(),
            organization_guid: "o".into(),
            space_guid: "s".into(),
            ..Default::default()
        }
    }

    fn binding(app: &str) -> ServiceBinding {
        ServiceBinding {
            id: "b1".into(),
            app_id: app.into(),
            service_id: "svc".into(),
            service_plan_id: "p".into(),
            service_instance_id: "i1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn unknown_ids_neither_exist_nor_match() {
        let store = LifecycleStore::default();
        assert!(!store.instance_exists("i1"));
        assert!(!store.instance_properties_match("i1", &instance("p")));
        assert!(!store.binding_exists("i1", "b1"));
        assert!(!store.binding_properties_match("i1", "b1", &binding("app")));
    }

    #[test]
    fn instance_match_compares_parameters_deeply() {
        let mut store = LifecycleStore::default();
        let mut stored = instance("p");
        stored.parameters.insert("opts".into(), json!({"a": [1, 2], "b": {"c": null}}));
        store.insert_instance("i1", stored);

        let mut same = instance("p");
        same.parameters.insert("opts".into(), json!({"b": {"c": null}, "a": [1, 2]}));
        assert!(store.instance_properties_match("i1", &same));

        let mut different = instance("p");
        different.parameters.insert("opts".into(), json!({"a": [1, 2], "b": {"c": 0}}));
        assert!(!store.instance_properties_match("i1", &different));

        assert!(!store.instance_properties_match("i1", &instance("q")));
    }

    #[test]
    fn binding_lookup_ignores_instance_id() {
        let mut store = LifecycleStore::default();
        store.insert_binding("b1", binding("app"));
        assert!(store.binding_exists("some-other-instance", "b1"));
        assert!(store.binding_properties_match("some-other-instance", "b1", &binding("app")));
        assert!(!store.binding_properties_match("i1", "b1", &binding("app2")));

        let removed = store.remove_binding("b1");
        assert_eq!(removed.map(|b| b.app_id), Some("app".to_string()));
        assert!(store.remove_binding("b1").is_none());
    }

    #[test]
    fn insert_replaces_wholesale() {
        let mut store = LifecycleStore::default();
        let mut first = instance("p");
        first.parameters.insert("k".into(), json!(1));
        store.insert_instance("i1", first);
        store.insert_instance("i1", instance("q"));
        let current = store.instance("i1").unwrap();
        assert_eq!(current.plan_id, "q");
        assert!(current.parameters.is_empty());
        assert_eq!(store.instances().len(), 1);
    }
}
