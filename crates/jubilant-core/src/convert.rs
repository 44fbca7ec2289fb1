// ── API-to-domain type conversions ──
//
// Bridges raw `jubilant_api` wire types into canonical `crate::model` types.
// One `From` impl per entity: absent fields default to empty/zero/false, and
// a `{"status-error": ...}` entry becomes a "failed" entity carrying the
// message verbatim.

use jubilant_api::ResultKeys;
use jubilant_api::models::RawTask;
use jubilant_api::status::{
    RawApp, RawBase, RawCombinedStorage, RawEntityStatus, RawFilesystem,
    RawFilesystemAttachment, RawFilesystemAttachments, RawLxdProfile, RawMachine, RawModel,
    RawNetworkInterface, RawOffer, RawRelationPartner, RawRemoteApp, RawRemoteEndpoint,
    RawStatus, RawStatusInfo, RawStorageInfo, RawUnit, RawUnitAttachments,
    RawUnitStorageAttachment, RawVolume, RawVolumeAttachment, RawVolumeAttachments, Reported,
};
use serde_json::Value;

use crate::model::{
    AppStatus, AppStatusRelation, CombinedStorage, ControllerStatus, EntityStatus, ExecTask,
    FilesystemAttachment, FilesystemAttachments, FilesystemInfo, FormattedBase,
    LxdProfileContents, MachineStatus, ModelStatus, NetworkInterface, OfferStatus,
    RelationPartner, RemoteAppStatus, RemoteEndpoint, Status, StatusInfo, StorageAttachments,
    StorageInfo, Task, TaskStatus, UnitStatus, UnitStorageAttachment, VolumeAttachment,
    VolumeAttachments, VolumeInfo,
};

/// Charm-identifying app fields of an entity Juju failed to report on.
pub const FAILED: &str = "<failed>";

// ── Helpers ────────────────────────────────────────────────────────

fn map_values<K: Ord, A, B: From<A>>(
    map: std::collections::BTreeMap<K, A>,
) -> std::collections::BTreeMap<K, B> {
    map.into_iter().map(|(k, v)| (k, v.into())).collect()
}

fn info(raw: Option<RawStatusInfo>) -> StatusInfo {
    raw.map(Into::into).unwrap_or_default()
}

fn entity(raw: Option<RawEntityStatus>) -> EntityStatus {
    raw.map(Into::into).unwrap_or_default()
}

// ── Shared pieces ──────────────────────────────────────────────────

impl From<RawStatusInfo> for StatusInfo {
    fn from(raw: RawStatusInfo) -> Self {
        Self {
            current: raw.current.unwrap_or_default(),
            message: raw.message.unwrap_or_default(),
            reason: raw.reason.unwrap_or_default(),
            since: raw.since.unwrap_or_default(),
            version: raw.version.unwrap_or_default(),
            life: raw.life.unwrap_or_default(),
        }
    }
}

impl From<Reported<RawStatusInfo>> for StatusInfo {
    fn from(raw: Reported<RawStatusInfo>) -> Self {
        match raw {
            Reported::Failed { status_error } => StatusInfo::failed(status_error),
            Reported::Ok(raw) => raw.into(),
        }
    }
}

impl From<RawEntityStatus> for EntityStatus {
    fn from(raw: RawEntityStatus) -> Self {
        Self {
            current: raw.current.unwrap_or_default(),
            message: raw.message.unwrap_or_default(),
            since: raw.since.unwrap_or_default(),
        }
    }
}

impl From<RawBase> for FormattedBase {
    fn from(raw: RawBase) -> Self {
        Self {
            name: raw.name,
            channel: raw.channel,
        }
    }
}

impl From<RawRemoteEndpoint> for RemoteEndpoint {
    fn from(raw: RawRemoteEndpoint) -> Self {
        Self {
            interface: raw.interface,
            role: raw.role,
        }
    }
}

impl From<RawRelationPartner> for RelationPartner {
    fn from(raw: RawRelationPartner) -> Self {
        match raw {
            RawRelationPartner::Name(name) => Self::Name(name),
            RawRelationPartner::Record(rec) => Self::Record(AppStatusRelation {
                related_app: rec.related_application.unwrap_or_default(),
                interface: rec.interface.unwrap_or_default(),
                scope: rec.scope.unwrap_or_default(),
            }),
        }
    }
}

fn relations(
    raw: std::collections::BTreeMap<String, Vec<RawRelationPartner>>,
) -> std::collections::BTreeMap<String, Vec<RelationPartner>> {
    raw.into_iter()
        .map(|(endpoint, partners)| (endpoint, partners.into_iter().map(Into::into).collect()))
        .collect()
}

// ── Model / controller ─────────────────────────────────────────────

impl From<RawModel> for ModelStatus {
    fn from(raw: RawModel) -> Self {
        Self {
            name: raw.name.unwrap_or_default(),
            model_type: raw.model_type.unwrap_or_default(),
            controller: raw.controller.unwrap_or_default(),
            cloud: raw.cloud.unwrap_or_default(),
            version: raw.version.unwrap_or_default(),
            region: raw.region.unwrap_or_default(),
            upgrade_available: raw.upgrade_available.unwrap_or_default(),
            model_status: raw.model_status.map(Into::into).unwrap_or_default(),
        }
    }
}

// ── Machines ───────────────────────────────────────────────────────

impl From<RawNetworkInterface> for NetworkInterface {
    fn from(raw: RawNetworkInterface) -> Self {
        Self {
            ip_addresses: raw.ip_addresses,
            mac_address: raw.mac_address.unwrap_or_default(),
            is_up: raw.is_up.unwrap_or_default(),
            gateway: raw.gateway.unwrap_or_default(),
            dns_nameservers: raw.dns_nameservers,
            space: raw.space.unwrap_or_default(),
        }
    }
}

impl From<RawLxdProfile> for LxdProfileContents {
    fn from(raw: RawLxdProfile) -> Self {
        Self {
            config: raw.config,
            description: raw.description,
            devices: raw.devices,
        }
    }
}

impl From<Reported<RawMachine>> for MachineStatus {
    fn from(raw: Reported<RawMachine>) -> Self {
        let raw = match raw {
            Reported::Failed { status_error } => {
                return Self {
                    juju_status: StatusInfo::failed(status_error.clone()),
                    machine_status: StatusInfo::failed(status_error),
                    ..Self::default()
                };
            }
            Reported::Ok(raw) => raw,
        };
        Self {
            juju_status: info(raw.juju_status),
            hostname: raw.hostname.unwrap_or_default(),
            dns_name: raw.dns_name.unwrap_or_default(),
            ip_addresses: raw.ip_addresses,
            instance_id: raw.instance_id.unwrap_or_default(),
            display_name: raw.display_name.unwrap_or_default(),
            machine_status: info(raw.machine_status),
            modification_status: info(raw.modification_status),
            base: raw.base.map(Into::into),
            series: raw.series.unwrap_or_default(),
            network_interfaces: map_values(raw.network_interfaces),
            containers: map_values(raw.containers),
            constraints: raw.constraints.unwrap_or_default(),
            hardware: raw.hardware.unwrap_or_default(),
            controller_member_status: raw.controller_member_status.unwrap_or_default(),
            ha_primary: raw.ha_primary.unwrap_or_default(),
            lxd_profiles: map_values(raw.lxd_profiles),
        }
    }
}

// ── Applications / units ───────────────────────────────────────────

impl From<Reported<RawUnit>> for UnitStatus {
    fn from(raw: Reported<RawUnit>) -> Self {
        let raw = match raw {
            Reported::Failed { status_error } => {
                return Self {
                    workload_status: StatusInfo::failed(status_error.clone()),
                    juju_status: StatusInfo::failed(status_error),
                    ..Self::default()
                };
            }
            Reported::Ok(raw) => raw,
        };
        Self {
            workload_status: info(raw.workload_status),
            juju_status: info(raw.juju_status),
            leader: raw.leader.unwrap_or_default(),
            upgrading_from: raw.upgrading_from.unwrap_or_default(),
            machine: raw.machine.unwrap_or_default(),
            open_ports: raw.open_ports,
            public_address: raw.public_address.unwrap_or_default(),
            address: raw.address.unwrap_or_default(),
            provider_id: raw.provider_id.unwrap_or_default(),
            subordinates: map_values(raw.subordinates),
        }
    }
}

impl From<Reported<RawApp>> for AppStatus {
    fn from(raw: Reported<RawApp>) -> Self {
        let raw = match raw {
            Reported::Failed { status_error } => {
                return Self {
                    charm: FAILED.into(),
                    charm_origin: FAILED.into(),
                    charm_name: FAILED.into(),
                    charm_rev: -1,
                    exposed: false,
                    app_status: StatusInfo::failed(status_error),
                    ..Self::default()
                };
            }
            Reported::Ok(raw) => raw,
        };
        Self {
            charm: raw.charm.unwrap_or_default(),
            charm_origin: raw.charm_origin.unwrap_or_default(),
            charm_name: raw.charm_name.unwrap_or_default(),
            charm_rev: raw.charm_rev.unwrap_or_default(),
            exposed: raw.exposed.unwrap_or_default(),
            base: raw.base.map(Into::into),
            series: raw.series.unwrap_or_default(),
            os: raw.os.unwrap_or_default(),
            charm_channel: raw.charm_channel.unwrap_or_default(),
            charm_version: raw.charm_version.unwrap_or_default(),
            charm_profile: raw.charm_profile.unwrap_or_default(),
            can_upgrade_to: raw.can_upgrade_to.unwrap_or_default(),
            scale: raw.scale.unwrap_or_default(),
            provider_id: raw.provider_id.unwrap_or_default(),
            address: raw.address.unwrap_or_default(),
            life: raw.life.unwrap_or_default(),
            app_status: info(raw.application_status),
            relations: relations(raw.relations),
            subordinate_to: raw.subordinate_to,
            units: map_values(raw.units),
            version: raw.version.unwrap_or_default(),
            endpoint_bindings: raw.endpoint_bindings,
        }
    }
}

// ── Cross-model ────────────────────────────────────────────────────

impl From<Reported<RawOffer>> for OfferStatus {
    fn from(raw: Reported<RawOffer>) -> Self {
        match raw {
            Reported::Failed { status_error } => Self {
                app: format!("{FAILED} ({status_error})"),
                ..Self::default()
            },
            Reported::Ok(raw) => Self {
                app: raw.application.unwrap_or_default(),
                endpoints: map_values(raw.endpoints),
                charm: raw.charm.unwrap_or_default(),
                total_connected_count: raw.total_connected_count.unwrap_or_default(),
                active_connected_count: raw.active_connected_count.unwrap_or_default(),
            },
        }
    }
}

impl From<Reported<RawRemoteApp>> for RemoteAppStatus {
    fn from(raw: Reported<RawRemoteApp>) -> Self {
        match raw {
            Reported::Failed { status_error } => Self {
                url: FAILED.into(),
                app_status: StatusInfo::failed(status_error),
                ..Self::default()
            },
            Reported::Ok(raw) => Self {
                url: raw.url.unwrap_or_default(),
                endpoints: map_values(raw.endpoints),
                life: raw.life.unwrap_or_default(),
                app_status: info(raw.application_status),
                relations: relations(raw.relations),
            },
        }
    }
}

// ── Storage ────────────────────────────────────────────────────────

impl From<RawUnitStorageAttachment> for UnitStorageAttachment {
    fn from(raw: RawUnitStorageAttachment) -> Self {
        Self {
            machine: raw.machine.unwrap_or_default(),
            location: raw.location.unwrap_or_default(),
            life: raw.life.unwrap_or_default(),
        }
    }
}

impl From<RawUnitAttachments> for StorageAttachments {
    fn from(raw: RawUnitAttachments) -> Self {
        Self {
            units: map_values(raw.units),
        }
    }
}

impl From<RawStorageInfo> for StorageInfo {
    fn from(raw: RawStorageInfo) -> Self {
        Self {
            kind: raw.kind.unwrap_or_default(),
            status: entity(raw.status),
            persistent: raw.persistent.unwrap_or_default(),
            life: raw.life.unwrap_or_default(),
            attachments: raw.attachments.map(Into::into),
        }
    }
}

impl From<RawFilesystemAttachment> for FilesystemAttachment {
    fn from(raw: RawFilesystemAttachment) -> Self {
        Self {
            mount_point: raw.mount_point.unwrap_or_default(),
            read_only: raw.read_only.unwrap_or_default(),
            life: raw.life.unwrap_or_default(),
        }
    }
}

impl From<RawFilesystemAttachments> for FilesystemAttachments {
    fn from(raw: RawFilesystemAttachments) -> Self {
        Self {
            machines: map_values(raw.machines),
            containers: map_values(raw.containers),
            units: map_values(raw.units),
        }
    }
}

impl From<RawFilesystem> for FilesystemInfo {
    fn from(raw: RawFilesystem) -> Self {
        Self {
            size: raw.size.unwrap_or_default(),
            provider_id: raw.provider_id.unwrap_or_default(),
            volume: raw.volume.unwrap_or_default(),
            storage: raw.storage.unwrap_or_default(),
            attachments: raw.attachments.map(Into::into).unwrap_or_default(),
            pool: raw.pool.unwrap_or_default(),
            life: raw.life.unwrap_or_default(),
            status: entity(raw.status),
        }
    }
}

impl From<RawVolumeAttachment> for VolumeAttachment {
    fn from(raw: RawVolumeAttachment) -> Self {
        Self {
            read_only: raw.read_only.unwrap_or_default(),
            device: raw.device.unwrap_or_default(),
            device_link: raw.device_link.unwrap_or_default(),
            bus_address: raw.bus_address.unwrap_or_default(),
            life: raw.life.unwrap_or_default(),
        }
    }
}

impl From<RawVolumeAttachments> for VolumeAttachments {
    fn from(raw: RawVolumeAttachments) -> Self {
        Self {
            machines: map_values(raw.machines),
            containers: map_values(raw.containers),
            units: map_values(raw.units),
        }
    }
}

impl From<RawVolume> for VolumeInfo {
    fn from(raw: RawVolume) -> Self {
        Self {
            size: raw.size.unwrap_or_default(),
            persistent: raw.persistent.unwrap_or_default(),
            provider_id: raw.provider_id.unwrap_or_default(),
            storage: raw.storage.unwrap_or_default(),
            attachments: raw.attachments.map(Into::into).unwrap_or_default(),
            pool: raw.pool.unwrap_or_default(),
            hardware_id: raw.hardware_id.unwrap_or_default(),
            wwn: raw.wwn.unwrap_or_default(),
            life: raw.life.unwrap_or_default(),
            status: entity(raw.status),
        }
    }
}

impl From<RawCombinedStorage> for CombinedStorage {
    fn from(raw: RawCombinedStorage) -> Self {
        Self {
            storage: map_values(raw.storage),
            filesystems: map_values(raw.filesystems),
            volumes: map_values(raw.volumes),
        }
    }
}

// ── Status ─────────────────────────────────────────────────────────

impl From<RawStatus> for Status {
    fn from(raw: RawStatus) -> Self {
        Self {
            model: raw.model.into(),
            machines: map_values(raw.machines),
            apps: map_values(raw.applications),
            app_endpoints: map_values(raw.application_endpoints),
            offers: map_values(raw.offers),
            storage: raw.storage.map(Into::into).unwrap_or_default(),
            controller: ControllerStatus {
                timestamp: raw
                    .controller
                    .and_then(|c| c.timestamp)
                    .unwrap_or_default(),
            },
        }
    }
}

// ── Task ───────────────────────────────────────────────────────────

fn as_code(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Normalize one task entry using the generation's reserved-key table.
///
/// Entries with no id, status, or results map are old-style exec output
/// (flat `ReturnCode`/`Stdout`/`Stderr`) and become a status-less task.
pub fn task_from_raw(raw: RawTask, keys: &ResultKeys) -> Task {
    let return_code = raw.reserved(keys.return_code).map_or(0, as_code);
    let stdout = raw.reserved(keys.stdout).map(as_text).unwrap_or_default();
    let stderr = raw.reserved(keys.stderr).map(as_text).unwrap_or_default();

    if raw.id.is_none() && raw.status.is_none() && raw.results.is_none() {
        return ExecTask {
            return_code,
            stdout,
            stderr,
        }
        .into();
    }

    let mut results = raw.results.unwrap_or_default();
    for key in keys.all() {
        results.remove(key);
    }

    Task {
        id: raw.id.unwrap_or_default(),
        status: raw
            .status
            .map(|s| s.parse().unwrap_or(TaskStatus::Other(s))),
        results,
        return_code,
        stdout,
        stderr,
        message: raw.message.unwrap_or_default(),
        log: raw.log.unwrap_or_default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use jubilant_api::{current, legacy};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn raw_task(value: Value) -> RawTask {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn current_task_strips_reserved_keys() {
        let raw = raw_task(json!({
            "id": "42",
            "status": "completed",
            "results": {"password": "pass", "return-code": 0, "stdout": "OUT", "stderr": "ERR"},
            "log": ["one"]
        }));

        let task = task_from_raw(raw, &current::RESULT_KEYS);

        assert_eq!(task.id, "42");
        assert_eq!(task.status, Some(TaskStatus::Completed));
        assert_eq!(task.results, json!({"password": "pass"}).as_object().cloned().unwrap());
        assert_eq!((task.stdout.as_str(), task.stderr.as_str()), ("OUT", "ERR"));
        assert!(task.success());
    }

    #[test]
    fn legacy_task_reads_capitalized_keys() {
        let raw = raw_task(json!({
            "UnitId": "mysql/0",
            "id": "34",
            "message": "MSG",
            "results": {"ReturnCode": 1, "Stderr": "ERR"},
            "status": "failed"
        }));

        let task = task_from_raw(raw, &legacy::RESULT_KEYS);

        assert_eq!(
            task,
            Task {
                id: "34".into(),
                status: Some(TaskStatus::Failed),
                return_code: 1,
                stderr: "ERR".into(),
                message: "MSG".into(),
                ..Task::default()
            }
        );
        assert!(!task.success());
    }

    #[test]
    fn flat_exec_entry_has_no_status() {
        let raw = raw_task(json!({"UnitId": "a/0", "ReturnCode": 2, "Stdout": "hi"}));
        let task = task_from_raw(raw, &legacy::RESULT_KEYS);
        assert_eq!(task.status, None);
        assert_eq!(task.return_code, 2);
        assert_eq!(task.stdout, "hi");
    }

    #[test]
    fn failed_app_gets_sentinels() {
        let app: AppStatus = Reported::<RawApp>::Failed {
            status_error: "boom".into(),
        }
        .into();
        assert_eq!(app.charm, "<failed>");
        assert_eq!(app.charm_name, "<failed>");
        assert_eq!(app.charm_rev, -1);
        assert_eq!(app.app_status.current, "failed");
        assert_eq!(app.app_status.message, "boom");

        let offer: OfferStatus = Reported::<RawOffer>::Failed {
            status_error: "gone".into(),
        }
        .into();
        assert_eq!(offer.app, "<failed> (gone)");
    }
}
