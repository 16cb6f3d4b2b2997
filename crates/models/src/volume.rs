use serde::{Deserialize, Serialize};

/// Backend coordinates the volume driver needs to attach the share.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CephConfig {
    pub mds: String,
    pub keyring: String,
    pub remote_mountpoint: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMountPrivateDetails {
    pub driver: String,
    pub group_id: String,
    pub config: CephConfig,
}

/// Where and how a binding's share appears inside the consumer container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMount {
    pub container_path: String,
    pub mode: String,
    pub private: VolumeMountPrivateDetails,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub uri: String,
}

/// Body returned to the front end after a bind call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServiceBindingResponse {
    pub credentials: Credentials,
    pub volume_mounts: Vec<VolumeMount>,
}
