use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state the engine reports for a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Running,
    Exited,
    Paused,
    Restarting,
    Created,
}

impl ContainerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerStatus::Running => "running",
            ContainerStatus::Exited => "exited",
            ContainerStatus::Paused => "paused",
            ContainerStatus::Restarting => "restarting",
            ContainerStatus::Created => "created",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown container status: {0}")]
pub struct UnknownStatus(String);

impl FromStr for ContainerStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(ContainerStatus::Running),
            "exited" => Ok(ContainerStatus::Exited),
            "paused" => Ok(ContainerStatus::Paused),
            "restarting" => Ok(ContainerStatus::Restarting),
            "created" => Ok(ContainerStatus::Created),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Health-check state, if the container defines a health check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Unhealthy,
    Starting,
    #[default]
    None,
}

impl Health {
    /// Derives the health state from the engine's human-readable status text
    /// (e.g. `"Up 5 minutes (healthy)"`, `"Up 2 seconds (health: starting)"`).
    ///
    /// Containers without a health check carry no parenthetical and map to
    /// [`Health::None`].
    pub fn from_status_text(status: &str) -> Self {
        if status.contains("(healthy)") {
            Health::Healthy
        } else if status.contains("(unhealthy)") {
            Health::Unhealthy
        } else if status.contains("health: starting") {
            Health::Starting
        } else {
            Health::None
        }
    }
}

/// One container as reported by the engine. Identity is the name, which is
/// unique per host; `id` is the engine-assigned short id kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub name: String,
    pub status: ContainerStatus,
    #[serde(default)]
    pub health: Health,
    pub id: String,
}

impl ContainerRecord {
    /// The composite status line shown in notifications: the bare lifecycle
    /// status, with an ` (unhealthy)` suffix when the health check fails.
    pub fn status_label(&self) -> String {
        match self.health {
            Health::Unhealthy => format!("{} (unhealthy)", self.status),
            _ => self.status.to_string(),
        }
    }
}
