//! HTTP wire contract shared by the bridge service and its clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, Result};
use crate::job::{Job, JobAction};

/// Header carrying the shared secret on enqueue requests.
pub const SECRET_HEADER: &str = "x-secret";

/// Query parameter carrying the shared secret on drain requests.
pub const DRAIN_KEY_PARAM: &str = "key";

pub const ENQUEUE_PATH: &str = "/enqueue";
pub const JOBS_PATH: &str = "/jobs";
pub const HEALTH_PATH: &str = "/health";

/// Successful enqueue acknowledgment, `{"status":"queued"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnqueueAck {
    pub status: String,
}

impl EnqueueAck {
    pub const QUEUED: &'static str = "queued";

    pub fn queued() -> Self {
        Self {
            status: Self::QUEUED.to_string(),
        }
    }
}

/// Liveness payload for the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub pending: usize,
}

/// Validate a raw enqueue body and build the job it describes.
///
/// `action` must name a known [`JobAction`] and `userId` must be a JSON
/// number with an integral value that fits in an `i64`. Integral floats
/// such as `42.0` are accepted; strings, fractions and `null` are not.
pub fn parse_enqueue_body(body: &[u8]) -> Result<Job> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| BridgeError::malformed(format!("body is not valid JSON: {e}")))?;

    let fields = value
        .as_object()
        .ok_or_else(|| BridgeError::malformed("body must be a JSON object"))?;

    let action = fields
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| BridgeError::malformed("missing string field 'action'"))?
        .parse::<JobAction>()?;

    let user_id = fields
        .get("userId")
        .ok_or_else(|| BridgeError::malformed("missing field 'userId'"))
        .and_then(|v| {
            integral_id(v).ok_or_else(|| BridgeError::malformed("'userId' must be an integer"))
        })?;

    Ok(Job::new(action, user_id))
}

fn integral_id(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(id) = number.as_i64() {
        return Some(id);
    }
    // 2^63 is exactly representable, so `<` keeps the cast in range
    let float = number.as_f64()?;
    if float.is_finite() && float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64
    {
        Some(float as i64)
    } else {
        None
    }
}
