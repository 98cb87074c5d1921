//! Static description of the four pipeline hops and their mutable status.

use serde::{Deserialize, Serialize};

/// Number of hops in the visualized request path.
pub const STAGE_COUNT: usize = 4;

/// Lifecycle status of a single pipeline stage.
///
/// Within one playback run a status only moves forward along
/// `Pending -> Active -> {Complete | Error}`; a reset returns every stage
/// to `Pending` at once. The registry itself does not validate transitions;
/// the playback controller is the only writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Active,
    Complete,
    Error,
}

impl StageStatus {
    /// String representation for display and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Pending => "pending",
            StageStatus::Active => "active",
            StageStatus::Complete => "complete",
            StageStatus::Error => "error",
        }
    }
}

/// One labeled hop in the request path.
///
/// `label`, `description`, and `icon` are fixed at construction; only
/// `status` changes, and only through [`set_status`] / [`set_all`].
#[derive(Debug, Clone, Serialize)]
pub struct Stage {
    /// Ordinal position, 0-based. Order is the physical request path:
    /// client, proxy, service, database.
    pub id: usize,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub status: StageStatus,
}

/// The four stages in fixed order, all `Pending`.
pub fn initial_stages() -> Vec<Stage> {
    vec![
        Stage {
            id: 0,
            label: "Frontend",
            description: "Browser client issues the request",
            icon: "🖥️",
            status: StageStatus::Pending,
        },
        Stage {
            id: 1,
            label: "Proxy",
            description: "Reverse proxy routes /api traffic",
            icon: "🔀",
            status: StageStatus::Pending,
        },
        Stage {
            id: 2,
            label: "Service",
            description: "Catalog service handles the request",
            icon: "⚙️",
            status: StageStatus::Pending,
        },
        Stage {
            id: 3,
            label: "Store",
            description: "Database returns the product rows",
            icon: "🗄️",
            status: StageStatus::Pending,
        },
    ]
}

/// Return a new stage sequence with only `stages[index]`'s status changed.
/// All other fields and the ordering are preserved.
pub fn set_status(stages: &[Stage], index: usize, status: StageStatus) -> Vec<Stage> {
    stages
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let mut stage = stage.clone();
            if i == index {
                stage.status = status;
            }
            stage
        })
        .collect()
}

/// Return a new stage sequence with every status set to `status`.
/// Used by the controller for uniform failure propagation.
pub fn set_all(stages: &[Stage], status: StageStatus) -> Vec<Stage> {
    stages
        .iter()
        .map(|stage| {
            let mut stage = stage.clone();
            stage.status = status;
            stage
        })
        .collect()
}
