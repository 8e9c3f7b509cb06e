//! Credential capture types for submission confirmation.

use crate::Secret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when captured credentials fail the confirmation gate.
///
/// The presentation layer is expected to disable the confirm affordance
/// until both fields are present, so these are precondition failures
/// rather than recoverable runtime errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
	#[error("User id must not be empty")]
	MissingUserId,
	#[error("Secret must not be empty")]
	MissingSecret,
}

/// Identity credentials captured by the confirmation panel.
///
/// Both fields are opaque to the console and passed through to the
/// backend unchanged. Cleared after every submit or cancel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
	/// Identity of the requestor.
	pub user_id: String,
	/// Requestor secret; redacted on every formatting path.
	pub secret: Secret,
}

impl Credentials {
	/// Creates credentials from raw captured input.
	pub fn new(user_id: impl Into<String>, secret: impl Into<Secret>) -> Self {
		Self {
			user_id: user_id.into(),
			secret: secret.into(),
		}
	}

	/// Checks the non-empty precondition on both fields.
	pub fn validate(&self) -> Result<(), CredentialError> {
		if self.user_id.is_empty() {
			return Err(CredentialError::MissingUserId);
		}
		if self.secret.is_empty() {
			return Err(CredentialError::MissingSecret);
		}
		Ok(())
	}
}
