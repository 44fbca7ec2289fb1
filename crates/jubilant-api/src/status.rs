// Raw `juju status --format json` types
//
// One tolerant schema covers both generations. Only `model`, `machines`
// and `applications` are required; everything else is optional because the
// CLI omits empty fields and the two generations differ (`series`/`os` only
// on 2.9, structured relation records only on 3.x).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::error::Error;

// ── Envelope ─────────────────────────────────────────────────────────

/// Top-level status document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawStatus {
    pub model: RawModel,
    pub machines: BTreeMap<String, Reported<RawMachine>>,
    pub applications: BTreeMap<String, Reported<RawApp>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub application_endpoints: BTreeMap<String, Reported<RawRemoteApp>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offers: BTreeMap<String, Reported<RawOffer>>,
    #[serde(default)]
    pub storage: Option<RawCombinedStorage>,
    #[serde(default)]
    pub controller: Option<RawController>,
}

impl RawStatus {
    pub fn from_json(body: &str) -> Result<Self, Error> {
        serde_json::from_str(body).map_err(|e| Error::deserialization(&e, body))
    }
}

/// An entity Juju could not compute status for: `{"status-error": "..."}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Reported<T> {
    Failed {
        #[serde(rename = "status-error")]
        status_error: String,
    },
    Ok(T),
}

/// Reads an explicit JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Shared pieces ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStatusInfo {
    pub current: Option<String>,
    pub message: Option<String>,
    pub reason: Option<String>,
    pub since: Option<String>,
    pub version: Option<String>,
    pub life: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEntityStatus {
    pub current: Option<String>,
    pub message: Option<String>,
    pub since: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBase {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub channel: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRemoteEndpoint {
    #[serde(deserialize_with = "null_as_default")]
    pub interface: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
}

// ── Model / controller ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawModel {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub model_type: Option<String>,
    pub controller: Option<String>,
    pub cloud: Option<String>,
    /// Controller agent version; decides the status generation.
    pub version: Option<String>,
    pub region: Option<String>,
    pub upgrade_available: Option<String>,
    pub model_status: Option<Reported<RawStatusInfo>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawController {
    pub timestamp: Option<String>,
}

// ── Machines ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawMachine {
    pub juju_status: Option<RawStatusInfo>,
    pub hostname: Option<String>,
    pub dns_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub ip_addresses: Vec<String>,
    pub instance_id: Option<String>,
    pub display_name: Option<String>,
    pub machine_status: Option<RawStatusInfo>,
    pub modification_status: Option<RawStatusInfo>,
    pub base: Option<RawBase>,
    /// 2.9 only.
    pub series: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub network_interfaces: BTreeMap<String, RawNetworkInterface>,
    #[serde(deserialize_with = "null_as_default")]
    pub containers: BTreeMap<String, Reported<RawMachine>>,
    pub constraints: Option<String>,
    pub hardware: Option<String>,
    pub controller_member_status: Option<String>,
    pub ha_primary: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub lxd_profiles: BTreeMap<String, RawLxdProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawNetworkInterface {
    #[serde(deserialize_with = "null_as_default")]
    pub ip_addresses: Vec<String>,
    pub mac_address: Option<String>,
    pub is_up: Option<bool>,
    pub gateway: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub dns_nameservers: Vec<String>,
    pub space: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLxdProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub config: BTreeMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub devices: BTreeMap<String, BTreeMap<String, String>>,
}

// ── Applications / units ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawApp {
    pub charm: Option<String>,
    /// 2.9 only.
    pub series: Option<String>,
    /// 2.9 only.
    pub os: Option<String>,
    pub charm_origin: Option<String>,
    pub charm_name: Option<String>,
    pub charm_rev: Option<i64>,
    pub exposed: Option<bool>,
    pub base: Option<RawBase>,
    pub charm_channel: Option<String>,
    pub charm_version: Option<String>,
    pub charm_profile: Option<String>,
    pub can_upgrade_to: Option<String>,
    pub scale: Option<u32>,
    pub provider_id: Option<String>,
    pub address: Option<String>,
    pub life: Option<String>,
    pub application_status: Option<RawStatusInfo>,
    #[serde(deserialize_with = "null_as_default")]
    pub relations: BTreeMap<String, Vec<RawRelationPartner>>,
    #[serde(deserialize_with = "null_as_default")]
    pub subordinate_to: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub units: BTreeMap<String, Reported<RawUnit>>,
    pub version: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub endpoint_bindings: BTreeMap<String, String>,
}

/// A relation partner: a bare application name (2.9) or a record (3.x).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRelationPartner {
    Name(String),
    Record(RawRelation),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawRelation {
    pub related_application: Option<String>,
    pub interface: Option<String>,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawUnit {
    pub workload_status: Option<RawStatusInfo>,
    pub juju_status: Option<RawStatusInfo>,
    pub leader: Option<bool>,
    pub upgrading_from: Option<String>,
    pub machine: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub open_ports: Vec<String>,
    pub public_address: Option<String>,
    pub address: Option<String>,
    pub provider_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub subordinates: BTreeMap<String, Reported<RawUnit>>,
}

// ── Cross-model ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawOffer {
    pub application: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub endpoints: BTreeMap<String, RawRemoteEndpoint>,
    pub charm: Option<String>,
    pub total_connected_count: Option<u32>,
    pub active_connected_count: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawRemoteApp {
    pub url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub endpoints: BTreeMap<String, RawRemoteEndpoint>,
    pub life: Option<String>,
    pub application_status: Option<RawStatusInfo>,
    #[serde(deserialize_with = "null_as_default")]
    pub relations: BTreeMap<String, Vec<RawRelationPartner>>,
}

// ── Storage ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCombinedStorage {
    #[serde(deserialize_with = "null_as_default")]
    pub storage: BTreeMap<String, RawStorageInfo>,
    #[serde(deserialize_with = "null_as_default")]
    pub filesystems: BTreeMap<String, RawFilesystem>,
    #[serde(deserialize_with = "null_as_default")]
    pub volumes: BTreeMap<String, RawVolume>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStorageInfo {
    pub kind: Option<String>,
    pub status: Option<RawEntityStatus>,
    pub persistent: Option<bool>,
    pub life: Option<String>,
    pub attachments: Option<RawUnitAttachments>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawUnitAttachments {
    #[serde(deserialize_with = "null_as_default")]
    pub units: BTreeMap<String, RawUnitStorageAttachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawUnitStorageAttachment {
    pub machine: Option<String>,
    pub location: Option<String>,
    pub life: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawFilesystem {
    pub size: Option<u64>,
    pub provider_id: Option<String>,
    pub volume: Option<String>,
    pub storage: Option<String>,
    pub attachments: Option<RawFilesystemAttachments>,
    pub pool: Option<String>,
    pub life: Option<String>,
    pub status: Option<RawEntityStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFilesystemAttachments {
    #[serde(deserialize_with = "null_as_default")]
    pub machines: BTreeMap<String, RawFilesystemAttachment>,
    #[serde(deserialize_with = "null_as_default")]
    pub containers: BTreeMap<String, RawFilesystemAttachment>,
    #[serde(deserialize_with = "null_as_default")]
    pub units: BTreeMap<String, RawUnitStorageAttachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawFilesystemAttachment {
    pub mount_point: Option<String>,
    pub read_only: Option<bool>,
    pub life: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawVolume {
    pub size: Option<u64>,
    pub persistent: Option<bool>,
    pub provider_id: Option<String>,
    pub storage: Option<String>,
    pub attachments: Option<RawVolumeAttachments>,
    pub pool: Option<String>,
    pub hardware_id: Option<String>,
    pub wwn: Option<String>,
    pub life: Option<String>,
    pub status: Option<RawEntityStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawVolumeAttachments {
    #[serde(deserialize_with = "null_as_default")]
    pub machines: BTreeMap<String, RawVolumeAttachment>,
    #[serde(deserialize_with = "null_as_default")]
    pub containers: BTreeMap<String, RawVolumeAttachment>,
    #[serde(deserialize_with = "null_as_default")]
    pub units: BTreeMap<String, RawUnitStorageAttachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawVolumeAttachment {
    pub device: Option<String>,
    pub device_link: Option<String>,
    pub bus_address: Option<String>,
    pub read_only: Option<bool>,
    pub life: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_top_level_key_is_rejected() {
        let err = RawStatus::from_json(r#"{"model": {}, "machines": {}}"#).unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
        assert!(RawStatus::from_json("not json").is_err());
    }

    #[test]
    fn null_collections_read_as_empty() {
        let raw = RawStatus::from_json(
            r#"{
                "model": {"name": "m", "version": "3.6.1"},
                "machines": {"0": {"ip-addresses": null, "network-interfaces": null}},
                "applications": {
                    "a": {
                        "charm": "a",
                        "subordinate-to": null,
                        "relations": null,
                        "endpoint-bindings": null,
                        "units": {"a/0": {"open-ports": null, "subordinates": null}}
                    }
                },
                "offers": null
            }"#,
        )
        .unwrap();

        let Reported::Ok(app) = &raw.applications["a"] else {
            panic!("app a should parse");
        };
        assert!(app.subordinate_to.is_empty());
        assert!(app.relations.is_empty());
        let Reported::Ok(unit) = &app.units["a/0"] else {
            panic!("unit a/0 should parse");
        };
        assert!(unit.open_ports.is_empty());
        assert!(unit.subordinates.is_empty());
        assert!(raw.offers.is_empty());
    }

    #[test]
    fn status_error_and_partner_shapes() {
        let raw = RawStatus::from_json(
            r#"{
                "model": {"name": "m", "version": "2.9.52"},
                "machines": {"0": {"status-error": "boom"}},
                "applications": {
                    "a": {"charm": "a", "relations": {"db": ["b"]}},
                    "b": {"relations": {"db": [{"related-application": "a", "interface": "pg", "scope": "global"}]}}
                }
            }"#,
        )
        .unwrap();

        assert!(matches!(&raw.machines["0"], Reported::Failed { status_error } if status_error == "boom"));
        let Reported::Ok(a) = &raw.applications["a"] else {
            panic!("app a should parse");
        };
        assert!(matches!(&a.relations["db"][0], RawRelationPartner::Name(n) if n == "b"));
        let Reported::Ok(b) = &raw.applications["b"] else {
            panic!("app b should parse");
        };
        assert!(matches!(&b.relations["db"][0], RawRelationPartner::Record(r)
            if r.related_application.as_deref() == Some("a")));
    }
}
