//! Submission lifecycle and notification types.
//!
//! A submission is one scan-or-send request/response cycle. The
//! workflow state tracks the cycle itself; the notification is an
//! independent sub-state for what the user currently sees, so the
//! banner can outlive or lag the workflow without the two interfering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of backend request a submission can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
	/// Look up the current state of the listed orders.
	Scan,
	/// Dispatch the listed orders for execution.
	Send,
}

impl fmt::Display for SubmissionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SubmissionKind::Scan => write!(f, "scan"),
			SubmissionKind::Send => write!(f, "send"),
		}
	}
}

/// Current state of the submission workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SubmissionState {
	/// No submission activity.
	Idle,
	/// A confirmation panel is open for the given kind.
	AwaitingConfirmation { kind: SubmissionKind },
	/// The request has been issued and its response is outstanding.
	InFlight { kind: SubmissionKind },
	/// The backend acknowledged the request with a job identifier.
	Succeeded { job_id: String },
	/// The request failed in transport or was rejected by the backend.
	Failed,
}

impl Default for SubmissionState {
	fn default() -> Self {
		SubmissionState::Idle
	}
}

impl fmt::Display for SubmissionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SubmissionState::Idle => write!(f, "Idle"),
			SubmissionState::AwaitingConfirmation { kind } => {
				write!(f, "AwaitingConfirmation({})", kind)
			}
			SubmissionState::InFlight { kind } => write!(f, "InFlight({})", kind),
			SubmissionState::Succeeded { job_id } => write!(f, "Succeeded({})", job_id),
			SubmissionState::Failed => write!(f, "Failed"),
		}
	}
}

/// What a visible notification reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum NotificationOutcome {
	/// The request was accepted but no job identifier has arrived yet.
	Processing,
	/// The request was accepted under the given job identifier.
	Succeeded { job_id: String },
	/// The request failed; a retry can be attempted.
	Failed,
}

/// User-facing notification sub-state.
///
/// Visibility is independent of whether a job identifier has arrived;
/// dismissing the notification never touches the workflow state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
	pub visible: bool,
	pub outcome: NotificationOutcome,
}

impl Notification {
	/// A visible notification with the given outcome.
	pub fn shown(outcome: NotificationOutcome) -> Self {
		Self {
			visible: true,
			outcome,
		}
	}

	/// Hides the notification, keeping the last outcome for reference.
	pub fn dismiss(&mut self) {
		self.visible = false;
	}
}

impl Default for Notification {
	fn default() -> Self {
		Self {
			visible: false,
			outcome: NotificationOutcome::Processing,
		}
	}
}
