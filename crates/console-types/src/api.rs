//! Wire types for the backend job service contract.
//!
//! The backend accepts a submission as `{ receipt, credentials,
//! package }` and answers every request with a status envelope. Job
//! identifiers are minted by the backend; an envelope without one means
//! the job is still being queued.

use crate::{Credentials, OrderRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials in the shape the backend expects.
///
/// Unlike [`Credentials`] this carries the secret in the clear, so it
/// is built immediately before serialization and must never be logged;
/// `Debug` is redacted as a backstop.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCredentials {
	pub user_id: String,
	pub secret: String,
}

impl From<&Credentials> for WireCredentials {
	fn from(credentials: &Credentials) -> Self {
		Self {
			user_id: credentials.user_id.clone(),
			secret: credentials.secret.expose().to_string(),
		}
	}
}

impl fmt::Debug for WireCredentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WireCredentials")
			.field("user_id", &self.user_id)
			.field("secret", &"***")
			.finish()
	}
}

/// Body of a scan or send submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
	/// Free-form notification destination, opaque to the console.
	pub receipt: String,
	/// Requestor identity, passed through unchanged.
	pub credentials: WireCredentials,
	/// The full row store snapshot, never just the visible page.
	pub package: Vec<OrderRecord>,
}

/// Status discriminator used by every backend response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
	Success,
	Error,
}

/// Payload of a submission acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
	/// Identifier of the enqueued job, when already assigned.
	#[serde(default, alias = "job_id")]
	pub job_id: Option<String>,
}

/// Response envelope for `POST scan` and `POST job`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobEnvelope {
	pub status: ResponseStatus,
	#[serde(default)]
	pub data: Option<JobData>,
}

impl JobEnvelope {
	/// The job identifier, if the backend reported one.
	pub fn job_id(&self) -> Option<&str> {
		self.data
			.as_ref()
			.and_then(|data| data.job_id.as_deref())
			.filter(|id| !id.is_empty())
	}
}

/// Payload of a job status poll.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusData {
	#[serde(default, alias = "job_id")]
	pub job_id: Option<String>,
	/// Queue status string as reported by the job processor.
	#[serde(default, alias = "job_status")]
	pub job_status: Option<String>,
	/// Result payload once the job has finished, backend-defined.
	#[serde(default, alias = "job_result")]
	pub job_result: Option<serde_json::Value>,
}

/// Response envelope for `GET job/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobStatusEnvelope {
	pub status: ResponseStatus,
	#[serde(default)]
	pub data: Option<JobStatusData>,
}
