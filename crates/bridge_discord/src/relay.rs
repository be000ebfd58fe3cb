//! Turning one `/clean` invocation into one enqueue call.

use async_trait::async_trait;
use bridge_core::{BridgeClient, Job};
use serenity::model::id::RoleId;

/// Something that can put a job on the bridge.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    async fn submit(&self, job: Job) -> bridge_core::Result<()>;
}

#[async_trait]
impl JobSubmitter for BridgeClient {
    async fn submit(&self, job: Job) -> bridge_core::Result<()> {
        self.enqueue(&job).await
    }
}

/// What the invoking user is told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayReply {
    NotAuthorized,
    Queued { user_id: i64 },
    Failed,
}

impl RelayReply {
    pub fn content(&self) -> String {
        match self {
            RelayReply::NotAuthorized => "❌ You are not authorized.".to_string(),
            RelayReply::Queued { user_id } => format!("✅ Cleanup queued for user {user_id}."),
            RelayReply::Failed => "❌ Failed to queue cleanup.".to_string(),
        }
    }

    /// Only a successful queue is announced to the channel.
    pub fn ephemeral(&self) -> bool {
        !matches!(self, RelayReply::Queued { .. })
    }
}

/// Whether a guild member holds the owner role. No member info (a DM) means no.
pub fn is_owner(member_roles: Option<&[RoleId]>, owner_role: RoleId) -> bool {
    member_roles.is_some_and(|roles| roles.contains(&owner_role))
}

/// Check the caller, submit the job once, and decide the reply.
///
/// Submission failures are logged here and never retried.
pub async fn relay_clean(
    submitter: &dyn JobSubmitter,
    owner_role: RoleId,
    member_roles: Option<&[RoleId]>,
    user_id: Option<i64>,
) -> RelayReply {
    if !is_owner(member_roles, owner_role) {
        return RelayReply::NotAuthorized;
    }

    let Some(user_id) = user_id else {
        tracing::error!("clean invoked without an integer userid option");
        return RelayReply::Failed;
    };

    match submitter.submit(Job::clean(user_id)).await {
        Ok(()) => {
            tracing::info!(user_id, "cleanup queued");
            RelayReply::Queued { user_id }
        }
        Err(e) => {
            tracing::error!(user_id, error = %e, "failed to queue cleanup");
            RelayReply::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::BridgeError;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    /// Records submissions; fails every call when `fail` is set.
    #[derive(Default)]
    struct MockSubmitter {
        submitted: Mutex<Vec<Job>>,
        fail: bool,
    }

    #[async_trait]
    impl JobSubmitter for MockSubmitter {
        async fn submit(&self, job: Job) -> bridge_core::Result<()> {
            self.submitted.lock().push(job);
            if self.fail {
                Err(BridgeError::Upstream {
                    status: 500,
                    body: "boom".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    const OWNER: RoleId = RoleId::new(1001);

    #[tokio::test]
    async fn owner_gets_job_queued() {
        let submitter = MockSubmitter::default();
        let roles = [RoleId::new(5), OWNER];

        let reply = relay_clean(&submitter, OWNER, Some(&roles[..]), Some(42)).await;

        assert_eq!(reply, RelayReply::Queued { user_id: 42 });
        assert_eq!(reply.content(), "✅ Cleanup queued for user 42.");
        assert!(!reply.ephemeral());
        assert_eq!(*submitter.submitted.lock(), vec![Job::clean(42)]);
    }

    #[tokio::test]
    async fn non_owner_is_denied_without_submitting() {
        let submitter = MockSubmitter::default();
        let roles = [RoleId::new(5)];

        let reply = relay_clean(&submitter, OWNER, Some(&roles[..]), Some(42)).await;

        assert_eq!(reply, RelayReply::NotAuthorized);
        assert!(reply.ephemeral());
        assert!(submitter.submitted.lock().is_empty());
    }

    #[tokio::test]
    async fn missing_member_is_denied() {
        let submitter = MockSubmitter::default();
        let reply = relay_clean(&submitter, OWNER, None, Some(42)).await;
        assert_eq!(reply, RelayReply::NotAuthorized);
        assert!(submitter.submitted.lock().is_empty());
    }

    #[tokio::test]
    async fn bridge_failure_is_reported_once() {
        let submitter = MockSubmitter {
            fail: true,
            ..Default::default()
        };
        let roles = [OWNER];

        let reply = relay_clean(&submitter, OWNER, Some(&roles[..]), Some(7)).await;

        assert_eq!(reply, RelayReply::Failed);
        assert_eq!(reply.content(), "❌ Failed to queue cleanup.");
        assert!(reply.ephemeral());
        assert_eq!(submitter.submitted.lock().len(), 1);
    }

    #[tokio::test]
    async fn missing_userid_fails_without_submitting() {
        let submitter = MockSubmitter::default();
        let roles = [OWNER];
        let reply = relay_clean(&submitter, OWNER, Some(&roles[..]), None).await;
        assert_eq!(reply, RelayReply::Failed);
        assert!(submitter.submitted.lock().is_empty());
    }

    #[test]
    fn denial_message() {
        assert_eq!(RelayReply::NotAuthorized.content(), "❌ You are not authorized.");
    }
}
