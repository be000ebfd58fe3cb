//! The queued job entity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// What the polling game server should do with the target user.
///
/// Serialized as a lowercase string so new variants keep the
/// `{action, userId}` wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobAction {
    /// Wipe plot data for a user.
    Clean,
}

impl JobAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            JobAction::Clean => "clean",
        }
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobAction {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clean" => Ok(JobAction::Clean),
            other => Err(BridgeError::malformed(format!(
                "unknown action '{other}'"
            ))),
        }
    }
}

/// A pending unit of work for the external poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub action: JobAction,
    /// External-system entity the action applies to.
    pub user_id: i64,
}

impl Job {
    pub fn new(action: JobAction, user_id: i64) -> Self {
        Self { action, user_id }
    }

    pub fn clean(user_id: i64) -> Self {
        Self::new(JobAction::Clean, user_id)
    }
}
