//! Submission workflow state machine.
//!
//! Manages the scan/send request lifecycle with transition validation:
//! `Idle -> AwaitingConfirmation -> InFlight -> Succeeded | Failed`,
//! where the terminal states re-arm on the next confirmation request.
//! Every confirmed submission is stamped with a monotonically
//! increasing sequence number; only the response matching the latest
//! outstanding number may update the state, so a stale response from a
//! superseded request can never clobber a newer submission.

use console_types::{Credentials, SubmissionKind, SubmissionState};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition {
		from: SubmissionState,
		to: SubmissionState,
	},
	#[error(transparent)]
	Credentials(#[from] console_types::CredentialError),
}

/// Handle for one confirmed submission: what to send, and under which
/// correlation number the response must come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
	pub kind: SubmissionKind,
	pub seq: u64,
}

/// What happened when a response was applied to the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	/// The response belonged to the latest submission; the workflow
	/// moved to the contained state.
	Applied(SubmissionState),
	/// The response was superseded or duplicated and was dropped.
	Stale,
}

/// Coarse state kinds used by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StateKind {
	Idle,
	AwaitingConfirmation,
	InFlight,
	Succeeded,
	Failed,
}

fn state_kind(state: &SubmissionState) -> StateKind {
	match state {
		SubmissionState::Idle => StateKind::Idle,
		SubmissionState::AwaitingConfirmation { .. } => StateKind::AwaitingConfirmation,
		SubmissionState::InFlight { .. } => StateKind::InFlight,
		SubmissionState::Succeeded { .. } => StateKind::Succeeded,
		SubmissionState::Failed => StateKind::Failed,
	}
}

// Static transition table - each state maps to allowed next states.
// InFlight -> Idle covers a response that was accepted without a job
// identifier yet: the cycle is over, the notification keeps showing
// the indeterminate outcome.
static TRANSITIONS: Lazy<HashMap<StateKind, HashSet<StateKind>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		StateKind::Idle,
		HashSet::from([StateKind::AwaitingConfirmation]),
	);
	m.insert(
		StateKind::AwaitingConfirmation,
		HashSet::from([StateKind::Idle, StateKind::InFlight]),
	);
	m.insert(
		StateKind::InFlight,
		HashSet::from([StateKind::Succeeded, StateKind::Failed, StateKind::Idle]),
	);
	m.insert(
		StateKind::Succeeded,
		HashSet::from([StateKind::AwaitingConfirmation]),
	);
	m.insert(
		StateKind::Failed,
		HashSet::from([StateKind::AwaitingConfirmation]),
	);
	m
});

fn is_valid_transition(from: &SubmissionState, to: &SubmissionState) -> bool {
	TRANSITIONS
		.get(&state_kind(from))
		.is_some_and(|set| set.contains(&state_kind(to)))
}

/// The scan/send submission lifecycle.
#[derive(Debug, Default)]
pub struct SubmissionWorkflow {
	state: SubmissionState,
	/// Sequence number of the most recently confirmed submission.
	seq: u64,
}

impl SubmissionWorkflow {
	pub fn new() -> Self {
		Self::default()
	}

	/// The current workflow state.
	pub fn state(&self) -> &SubmissionState {
		&self.state
	}

	fn transition(&mut self, to: SubmissionState) -> Result<&SubmissionState, WorkflowError> {
		if !is_valid_transition(&self.state, &to) {
			return Err(WorkflowError::InvalidTransition {
				from: self.state.clone(),
				to,
			});
		}
		self.state = to;
		Ok(&self.state)
	}

	/// Opens the confirmation panel for a scan or send request.
	///
	/// Valid from `Idle` and from the terminal notification states;
	/// rejected while another confirmation is open or a request is in
	/// flight, so only one submission is ever active.
	pub fn request_confirmation(
		&mut self,
		kind: SubmissionKind,
	) -> Result<&SubmissionState, WorkflowError> {
		self.transition(SubmissionState::AwaitingConfirmation { kind })
	}

	/// Closes the confirmation panel, discarding captured credentials.
	pub fn cancel(&mut self) -> Result<&SubmissionState, WorkflowError> {
		self.transition(SubmissionState::Idle)
	}

	/// Confirms the open submission with the captured credentials.
	///
	/// Both credential fields must be non-empty; the UI disables the
	/// confirm affordance until they are, this re-checks as a
	/// precondition. On success the workflow is `InFlight` and the
	/// returned ticket carries the correlation number the caller must
	/// attach to the single outgoing request.
	pub fn confirm(&mut self, credentials: &Credentials) -> Result<SubmissionTicket, WorkflowError> {
		let kind = match &self.state {
			SubmissionState::AwaitingConfirmation { kind } => *kind,
			_ => {
				return Err(WorkflowError::InvalidTransition {
					from: self.state.clone(),
					to: SubmissionState::InFlight {
						kind: SubmissionKind::Scan,
					},
				})
			}
		};
		credentials.validate()?;

		self.transition(SubmissionState::InFlight { kind })?;
		self.seq += 1;
		Ok(SubmissionTicket {
			kind,
			seq: self.seq,
		})
	}

	fn is_current(&self, seq: u64) -> bool {
		seq == self.seq && matches!(self.state, SubmissionState::InFlight { .. })
	}

	/// Applies a successful response for the given correlation number.
	///
	/// With a job identifier the workflow ends in `Succeeded`; without
	/// one the cycle is over but indeterminate, and the workflow
	/// returns to `Idle` while the notification keeps reporting
	/// "processing".
	pub fn resolve_success(&mut self, seq: u64, job_id: Option<String>) -> Resolution {
		if !self.is_current(seq) {
			tracing::warn!(seq, current = self.seq, "Dropping stale submission response");
			return Resolution::Stale;
		}
		let to = match job_id {
			Some(job_id) => SubmissionState::Succeeded { job_id },
			None => SubmissionState::Idle,
		};
		// is_current guarantees the table accepts this transition.
		self.state = to;
		Resolution::Applied(self.state.clone())
	}

	/// Applies a failed response for the given correlation number.
	pub fn resolve_failure(&mut self, seq: u64) -> Resolution {
		if !self.is_current(seq) {
			tracing::warn!(seq, current = self.seq, "Dropping stale submission failure");
			return Resolution::Stale;
		}
		self.state = SubmissionState::Failed;
		Resolution::Applied(self.state.clone())
	}
}
