//! Backend job service client for the order console.
//!
//! This crate handles all communication with the backend job processor.
//! It provides a trait seam so the engine never depends on a concrete
//! transport, an HTTP implementation over that seam, and a mock for
//! tests and development.

use async_trait::async_trait;
use console_types::{CatalogItem, JobEnvelope, JobStatusEnvelope, SubmissionKind, SubmitRequest};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
	pub mod mock;
}

pub use implementations::http::HttpJobService;
pub use implementations::mock::MockJobService;

/// Errors that can occur while talking to the job service.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when a response cannot be decoded.
	#[error("Protocol error: {0}")]
	Protocol(String),
	/// Error that occurs when the backend rejects a request.
	#[error("Backend error: {0}")]
	Backend(String),
}

/// Trait defining the interface to the backend job service.
///
/// Implementations cover the full request contract: the task catalog,
/// the two submission endpoints and the job status poll.
#[async_trait]
pub trait JobServiceInterface: Send + Sync {
	/// Fetches the orderable task catalog.
	async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, ClientError>;

	/// Submits the given request to the endpoint for its kind.
	///
	/// Exactly one call per confirmed submission; the caller correlates
	/// the response to its originating request.
	async fn submit(
		&self,
		kind: SubmissionKind,
		request: &SubmitRequest,
	) -> Result<JobEnvelope, ClientError>;

	/// Polls the status of a previously submitted job.
	async fn job_status(&self, job_id: &str) -> Result<JobStatusEnvelope, ClientError>;
}

/// Service wrapper around the configured job service implementation.
///
/// Adds the envelope-status check on top of the raw transport so
/// callers only see a successful envelope or a typed error.
pub struct BackendService {
	backend: Box<dyn JobServiceInterface>,
}

impl BackendService {
	/// Creates a new BackendService with the given implementation.
	pub fn new(backend: Box<dyn JobServiceInterface>) -> Self {
		Self { backend }
	}

	/// Fetches the orderable task catalog.
	pub async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, ClientError> {
		self.backend.fetch_catalog().await
	}

	/// Submits a scan or send request and returns the accepted envelope.
	pub async fn submit(
		&self,
		kind: SubmissionKind,
		request: &SubmitRequest,
	) -> Result<JobEnvelope, ClientError> {
		let envelope = self.backend.submit(kind, request).await?;
		if envelope.status == console_types::ResponseStatus::Error {
			return Err(ClientError::Backend(format!(
				"{} request rejected",
				kind
			)));
		}
		Ok(envelope)
	}

	/// Polls the status of a previously submitted job.
	pub async fn job_status(&self, job_id: &str) -> Result<JobStatusEnvelope, ClientError> {
		self.backend.job_status(job_id).await
	}
}
