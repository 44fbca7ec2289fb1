// ── Status model ──
//
// Canonical snapshot of `juju status`, produced from either generation's
// JSON by `convert`. Every optional field is defaulted, so consumers never
// deal with absence. Two things still differ by generation and are kept
// as-is: relation partners (names on 2.9, records on 3.x) and the
// `series`/`os` fields (2.9 only).

use std::collections::BTreeMap;
use std::fmt;

use jubilant_api::Generation;
use jubilant_api::status::RawStatus;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ── Shared pieces ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusInfo {
    pub current: String,
    pub message: String,
    pub reason: String,
    pub since: String,
    pub version: String,
    pub life: String,
}

impl StatusInfo {
    /// The state used for entities Juju reported a `status-error` for.
    pub(crate) fn failed(message: String) -> Self {
        Self {
            current: "failed".into(),
            message,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedBase {
    pub name: String,
    pub channel: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStatus {
    pub current: String,
    pub message: String,
    pub since: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEndpoint {
    pub interface: String,
    pub role: String,
}

// ── Relations ────────────────────────────────────────────────────────

/// A structured relation record (3.x).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatusRelation {
    pub related_app: String,
    pub interface: String,
    pub scope: String,
}

/// The other side of a relation endpoint.
///
/// 2.9 lists bare application names; 3.x lists records. The shape is
/// preserved rather than guessed, and serializes back the way it came in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationPartner {
    Name(String),
    Record(AppStatusRelation),
}

impl RelationPartner {
    /// Related application name, whichever shape this is.
    pub fn app(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Record(record) => &record.related_app,
        }
    }
}

// ── Model / controller ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub controller: String,
    pub cloud: String,
    /// Controller agent version.
    pub version: String,
    pub region: String,
    pub upgrade_available: String,
    pub model_status: StatusInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStatus {
    pub timestamp: String,
}

// ── Machines ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub ip_addresses: Vec<String>,
    pub mac_address: String,
    pub is_up: bool,
    pub gateway: String,
    pub dns_nameservers: Vec<String>,
    pub space: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LxdProfileContents {
    pub config: BTreeMap<String, String>,
    pub description: String,
    pub devices: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineStatus {
    pub juju_status: StatusInfo,
    pub hostname: String,
    pub dns_name: String,
    pub ip_addresses: Vec<String>,
    pub instance_id: String,
    pub display_name: String,
    pub machine_status: StatusInfo,
    pub modification_status: StatusInfo,
    pub base: Option<FormattedBase>,
    /// 2.9 only.
    pub series: String,
    pub network_interfaces: BTreeMap<String, NetworkInterface>,
    pub containers: BTreeMap<String, MachineStatus>,
    pub constraints: String,
    pub hardware: String,
    pub controller_member_status: String,
    pub ha_primary: bool,
    pub lxd_profiles: BTreeMap<String, LxdProfileContents>,
}

// ── Applications / units ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStatus {
    pub workload_status: StatusInfo,
    pub juju_status: StatusInfo,
    pub leader: bool,
    pub upgrading_from: String,
    pub machine: String,
    pub open_ports: Vec<String>,
    pub public_address: String,
    pub address: String,
    pub provider_id: String,
    pub subordinates: BTreeMap<String, UnitStatus>,
}

impl UnitStatus {
    pub fn is_active(&self) -> bool {
        self.workload_status.current == "active"
    }

    pub fn is_blocked(&self) -> bool {
        self.workload_status.current == "blocked"
    }

    pub fn is_error(&self) -> bool {
        self.workload_status.current == "error"
    }

    pub fn is_maintenance(&self) -> bool {
        self.workload_status.current == "maintenance"
    }

    pub fn is_waiting(&self) -> bool {
        self.workload_status.current == "waiting"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatus {
    pub charm: String,
    pub charm_origin: String,
    pub charm_name: String,
    pub charm_rev: i64,
    pub exposed: bool,
    pub base: Option<FormattedBase>,
    /// 2.9 only.
    pub series: String,
    /// 2.9 only.
    pub os: String,
    pub charm_channel: String,
    pub charm_version: String,
    pub charm_profile: String,
    pub can_upgrade_to: String,
    pub scale: u32,
    pub provider_id: String,
    pub address: String,
    pub life: String,
    pub app_status: StatusInfo,
    pub relations: BTreeMap<String, Vec<RelationPartner>>,
    pub subordinate_to: Vec<String>,
    pub units: BTreeMap<String, UnitStatus>,
    pub version: String,
    pub endpoint_bindings: BTreeMap<String, String>,
}

impl AppStatus {
    pub fn is_active(&self) -> bool {
        self.app_status.current == "active"
    }

    pub fn is_blocked(&self) -> bool {
        self.app_status.current == "blocked"
    }

    pub fn is_error(&self) -> bool {
        self.app_status.current == "error"
    }

    pub fn is_maintenance(&self) -> bool {
        self.app_status.current == "maintenance"
    }

    pub fn is_waiting(&self) -> bool {
        self.app_status.current == "waiting"
    }
}

// ── Cross-model ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferStatus {
    pub app: String,
    pub endpoints: BTreeMap<String, RemoteEndpoint>,
    pub charm: String,
    pub total_connected_count: u32,
    pub active_connected_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAppStatus {
    pub url: String,
    pub endpoints: BTreeMap<String, RemoteEndpoint>,
    pub life: String,
    pub app_status: StatusInfo,
    pub relations: BTreeMap<String, Vec<RelationPartner>>,
}

// ── Storage ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStorageAttachment {
    pub machine: String,
    pub location: String,
    pub life: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageAttachments {
    pub units: BTreeMap<String, UnitStorageAttachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInfo {
    pub kind: String,
    pub status: EntityStatus,
    pub persistent: bool,
    pub life: String,
    pub attachments: Option<StorageAttachments>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemAttachment {
    pub mount_point: String,
    pub read_only: bool,
    pub life: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemAttachments {
    pub machines: BTreeMap<String, FilesystemAttachment>,
    pub containers: BTreeMap<String, FilesystemAttachment>,
    pub units: BTreeMap<String, UnitStorageAttachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemInfo {
    pub size: u64,
    pub provider_id: String,
    pub volume: String,
    pub storage: String,
    pub attachments: FilesystemAttachments,
    pub pool: String,
    pub life: String,
    pub status: EntityStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeAttachment {
    pub read_only: bool,
    pub device: String,
    pub device_link: String,
    pub bus_address: String,
    pub life: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeAttachments {
    pub machines: BTreeMap<String, VolumeAttachment>,
    pub containers: BTreeMap<String, VolumeAttachment>,
    pub units: BTreeMap<String, UnitStorageAttachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub size: u64,
    pub persistent: bool,
    pub provider_id: String,
    pub storage: String,
    pub attachments: VolumeAttachments,
    pub pool: String,
    pub hardware_id: String,
    pub wwn: String,
    pub life: String,
    pub status: EntityStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedStorage {
    pub storage: BTreeMap<String, StorageInfo>,
    pub filesystems: BTreeMap<String, FilesystemInfo>,
    pub volumes: BTreeMap<String, VolumeInfo>,
}

// ── Status ───────────────────────────────────────────────────────────

/// Parsed `juju status --format json` for one model.
///
/// Equality ignores `controller`, whose timestamp changes on every call.
/// `Display` renders the snapshot as YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Status {
    pub model: ModelStatus,
    pub machines: BTreeMap<String, MachineStatus>,
    pub apps: BTreeMap<String, AppStatus>,
    pub app_endpoints: BTreeMap<String, RemoteAppStatus>,
    pub offers: BTreeMap<String, OfferStatus>,
    pub storage: CombinedStorage,
    pub controller: ControllerStatus,
}

impl Status {
    /// Parse the JSON printed by `juju status --format json` (either generation).
    pub fn from_json(body: &str) -> Result<Self, CoreError> {
        Ok(RawStatus::from_json(body)?.into())
    }

    /// Schema generation, from the controller's agent version in `model.version`.
    ///
    /// The status shape follows the controller, not the CLI, so a 3.x client
    /// talking to a 2.9 controller still sees 2.9 status.
    pub fn generation(&self) -> Generation {
        let major = self
            .model
            .version
            .split('.')
            .next()
            .and_then(|m| m.parse().ok())
            .unwrap_or(3);
        Generation::from_major(major)
    }

    /// Units of `app`, including subordinate units found under its principals.
    ///
    /// For a principal app this is `apps[app].units`. For a subordinate it
    /// collects `<app>/N` entries from the units of every app in
    /// `subordinate_to`. Unknown apps give an empty map.
    pub fn get_units(&self, app: &str) -> BTreeMap<&str, &UnitStatus> {
        let Some(info) = self.apps.get(app) else {
            return BTreeMap::new();
        };
        if info.subordinate_to.is_empty() {
            return info.units.iter().map(|(k, v)| (k.as_str(), v)).collect();
        }

        let prefix = format!("{app}/");
        info.subordinate_to
            .iter()
            .filter_map(|principal| self.apps.get(principal))
            .flat_map(|principal| principal.units.values())
            .flat_map(|unit| unit.subordinates.iter())
            .filter(|(name, _)| name.starts_with(&prefix))
            .map(|(name, sub)| (name.as_str(), sub))
            .collect()
    }
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model
            && self.machines == other.machines
            && self.apps == other.apps
            && self.app_endpoints == other.app_endpoints
            && self.offers == other.offers
            && self.storage == other.storage
    }
}

impl Eq for Status {}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yaml = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(yaml.trim_end())
    }
}
