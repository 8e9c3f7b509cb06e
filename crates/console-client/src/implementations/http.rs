//! HTTP implementation of the job service interface.
//!
//! Talks to the backend over its JSON contract: `GET tasks` for the
//! catalog, `POST scan` / `POST job` for submissions and `GET job/{id}`
//! for status polls. A single pooled client is reused for every call.

use crate::{ClientError, JobServiceInterface};
use async_trait::async_trait;
use console_types::{CatalogItem, JobEnvelope, JobStatusEnvelope, SubmissionKind, SubmitRequest};
use std::time::Duration;

/// Job service client over HTTP.
pub struct HttpJobService {
	client: reqwest::Client,
	base_url: String,
}

impl HttpJobService {
	/// Creates a client for the given base URL with a per-request
	/// timeout.
	pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
		let client = reqwest::Client::builder()
			.pool_idle_timeout(Duration::from_secs(90))
			.timeout(timeout)
			.build()
			.map_err(|e| ClientError::Network(e.to_string()))?;

		Ok(Self {
			client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
		})
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path)
	}

	/// The submission endpoint for a request kind.
	fn endpoint(kind: SubmissionKind) -> &'static str {
		match kind {
			SubmissionKind::Scan => "scan",
			SubmissionKind::Send => "job",
		}
	}

	async fn decode<T: serde::de::DeserializeOwned>(
		response: reqwest::Response,
	) -> Result<T, ClientError> {
		let status = response.status();
		if !status.is_success() {
			return Err(ClientError::Backend(format!(
				"Unexpected HTTP status {}",
				status
			)));
		}
		response
			.json::<T>()
			.await
			.map_err(|e| ClientError::Protocol(e.to_string()))
	}
}

#[async_trait]
impl JobServiceInterface for HttpJobService {
	async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, ClientError> {
		let response = self
			.client
			.get(self.url("tasks"))
			.send()
			.await
			.map_err(|e| ClientError::Network(e.to_string()))?;
		Self::decode(response).await
	}

	async fn submit(
		&self,
		kind: SubmissionKind,
		request: &SubmitRequest,
	) -> Result<JobEnvelope, ClientError> {
		let url = self.url(Self::endpoint(kind));
		tracing::debug!(%kind, rows = request.package.len(), "Submitting package");

		let response = self
			.client
			.post(url)
			.json(request)
			.send()
			.await
			.map_err(|e| ClientError::Network(e.to_string()))?;
		Self::decode(response).await
	}

	async fn job_status(&self, job_id: &str) -> Result<JobStatusEnvelope, ClientError> {
		let response = self
			.client
			.get(self.url(&format!("job/{}", job_id)))
			.send()
			.await
			.map_err(|e| ClientError::Network(e.to_string()))?;
		Self::decode(response).await
	}
}
