//! HTTP client for a running bridge.

use std::time::Duration;

use reqwest::{Response, StatusCode};

use crate::config::SharedSecret;
use crate::error::{BridgeError, Result};
use crate::job::Job;
use crate::wire::{DRAIN_KEY_PARAM, ENQUEUE_PATH, JOBS_PATH, SECRET_HEADER};

pub fn bridge_reqwest_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("clean-bridge/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .build()?)
}

/// Talks to the bridge's enqueue and drain endpoints with the shared secret attached.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: String,
    secret: SharedSecret,
}

impl BridgeClient {
    pub fn new(base_url: impl Into<String>, secret: SharedSecret) -> Result<Self> {
        Ok(Self::with_http_client(
            bridge_reqwest_client()?,
            base_url,
            secret,
        ))
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        secret: SharedSecret,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            secret,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit one job. Any non-2xx answer is an error carrying the response text.
    pub async fn enqueue(&self, job: &Job) -> Result<()> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, ENQUEUE_PATH))
            .header(SECRET_HEADER, self.secret.expose())
            .json(job)
            .send()
            .await?;

        check_status(response).await?;
        tracing::debug!(action = %job.action, user_id = job.user_id, "job enqueued on bridge");
        Ok(())
    }

    /// Take every pending job from the bridge. The bridge forgets them as soon as it answers.
    pub async fn drain(&self) -> Result<Vec<Job>> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, JOBS_PATH))
            .query(&[(DRAIN_KEY_PARAM, self.secret.expose())])
            .send()
            .await?;

        let jobs: Vec<Job> = check_status(response).await?.json().await?;
        tracing::debug!(count = jobs.len(), "drained jobs from bridge");
        Ok(jobs)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::FORBIDDEN {
        return Err(BridgeError::Unauthorized);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BridgeError::Upstream {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = BridgeClient::new("http://localhost:3000/", SharedSecret::new("k")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn unreachable_bridge_is_http_error() {
        // Grab a free port, then release it so nothing is listening there
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client =
            BridgeClient::new(format!("http://127.0.0.1:{port}"), SharedSecret::new("k")).unwrap();
        let err = client.enqueue(&Job::clean(1)).await.unwrap_err();
        assert!(matches!(err, BridgeError::Http(_)));
    }
}
