// ── Canonical domain model ──
//
// Generation-independent types handed to callers. Raw wire types live in
// `jubilant_api`; `crate::convert` bridges the two.

pub mod secret;
pub mod status;
pub mod task;

pub use secret::SecretUri;
pub use status::{
    AppStatus, AppStatusRelation, CombinedStorage, ControllerStatus, EntityStatus,
    FilesystemAttachment, FilesystemAttachments, FilesystemInfo, FormattedBase,
    LxdProfileContents, MachineStatus, ModelStatus, NetworkInterface, OfferStatus,
    RelationPartner, RemoteAppStatus, RemoteEndpoint, Status, StatusInfo, StorageAttachments,
    StorageInfo, UnitStatus, UnitStorageAttachment, VolumeAttachment, VolumeAttachments,
    VolumeInfo,
};
pub use task::{ExecTask, Task, TaskStatus};
