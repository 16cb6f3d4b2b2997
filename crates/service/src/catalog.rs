use models::catalog::{Catalog, Service, ServicePlan};

pub const SERVICE_NAME: &str = "cephfs";
pub const SERVICE_ID: &str = "cephfs-service-guid";
pub const PLAN_NAME: &str = "free";
pub const PLAN_ID: &str = "free-plan-guid";

/// The single offering this broker advertises.
pub fn catalog() -> Catalog {
    let plan = ServicePlan {
        name: PLAN_NAME.to_string(),
        id: PLAN_ID.to_string(),
        description: "free ceph filesystem".to_string(),
        metadata: None,
        free: true,
    };

    let service = Service {
        name: SERVICE_NAME.to_string(),
        id: SERVICE_ID.to_string(),
        description: "Provides the Ceph FS volume service, including volume creation and volume mounts".to_string(),
        bindable: true,
        plan_updateable: false,
        tags: vec!["ceph".to_string()],
        requires: vec!["volume_mount".to_string()],
        metadata: None,
        plans: vec![plan],
        dashboard_client: None,
    };

    Catalog { services: vec![service] }
}
