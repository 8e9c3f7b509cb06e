//! Mock job service implementation for testing and development.
//!
//! Answers every call from configured canned data and records the
//! submissions it receives, so engine and workflow tests can assert on
//! exactly what would have gone over the wire.

use crate::{ClientError, JobServiceInterface};
use async_trait::async_trait;
use console_types::{
	CatalogItem, JobData, JobEnvelope, JobStatusData, JobStatusEnvelope, ResponseStatus,
	SubmissionKind, SubmitRequest,
};
use std::sync::Mutex;

/// How the mock answers a submission.
#[derive(Debug, Clone)]
enum SubmitBehavior {
	/// Success envelope carrying the given job id (none = still queuing).
	Accept(Option<String>),
	/// Error envelope from the backend.
	Reject,
	/// Transport failure before any envelope arrives.
	Fail,
}

/// Canned job service for tests.
pub struct MockJobService {
	catalog: Vec<CatalogItem>,
	behavior: SubmitBehavior,
	submissions: Mutex<Vec<(SubmissionKind, SubmitRequest)>>,
}

impl MockJobService {
	/// Creates a mock that accepts submissions without a job id.
	pub fn new() -> Self {
		Self {
			catalog: Vec::new(),
			behavior: SubmitBehavior::Accept(None),
			submissions: Mutex::new(Vec::new()),
		}
	}

	/// Serves the given catalog items.
	pub fn with_catalog(mut self, catalog: Vec<CatalogItem>) -> Self {
		self.catalog = catalog;
		self
	}

	/// Accepts submissions with the given job id.
	pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
		self.behavior = SubmitBehavior::Accept(Some(job_id.into()));
		self
	}

	/// Answers submissions with an error envelope.
	pub fn rejecting(mut self) -> Self {
		self.behavior = SubmitBehavior::Reject;
		self
	}

	/// Fails submissions at the transport level.
	pub fn failing(mut self) -> Self {
		self.behavior = SubmitBehavior::Fail;
		self
	}

	/// Everything submitted so far, in call order.
	pub fn submissions(&self) -> Vec<(SubmissionKind, SubmitRequest)> {
		self.submissions.lock().expect("mock lock poisoned").clone()
	}
}

impl Default for MockJobService {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl JobServiceInterface for MockJobService {
	async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, ClientError> {
		Ok(self.catalog.clone())
	}

	async fn submit(
		&self,
		kind: SubmissionKind,
		request: &SubmitRequest,
	) -> Result<JobEnvelope, ClientError> {
		self.submissions
			.lock()
			.expect("mock lock poisoned")
			.push((kind, request.clone()));

		match &self.behavior {
			SubmitBehavior::Accept(job_id) => Ok(JobEnvelope {
				status: ResponseStatus::Success,
				data: Some(JobData {
					job_id: job_id.clone(),
				}),
			}),
			SubmitBehavior::Reject => Ok(JobEnvelope {
				status: ResponseStatus::Error,
				data: None,
			}),
			SubmitBehavior::Fail => Err(ClientError::Network("connection refused".to_string())),
		}
	}

	async fn job_status(&self, job_id: &str) -> Result<JobStatusEnvelope, ClientError> {
		Ok(JobStatusEnvelope {
			status: ResponseStatus::Success,
			data: Some(JobStatusData {
				job_id: Some(job_id.to_string()),
				job_status: Some("finished".to_string()),
				job_result: None,
			}),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use console_types::{Credentials, OrderRecord, WireCredentials};

	#[tokio::test]
	async fn test_mock_records_submitted_packages() {
		let mock = MockJobService::new().with_job_id("J-1");
		let request = SubmitRequest {
			receipt: "ops@example.com".to_string(),
			credentials: WireCredentials::from(&Credentials::new("u1", "s")),
			package: vec![
				OrderRecord {
					user_id: "u1".to_string(),
					..OrderRecord::default()
				},
				OrderRecord {
					user_id: "u2".to_string(),
					..OrderRecord::default()
				},
			],
		};

		mock.submit(SubmissionKind::Send, &request).await.unwrap();

		let submissions = mock.submissions();
		assert_eq!(submissions.len(), 1);
		assert_eq!(submissions[0].0, SubmissionKind::Send);
		assert_eq!(submissions[0].1.package.len(), 2);
		assert_eq!(submissions[0].1.receipt, "ops@example.com");
	}
}
