//! Secret string wrapper for sensitive credential data.
//!
//! The captured confirmation secret must never show up in logs, debug
//! output or serialized engine snapshots. `Secret` wraps the raw value,
//! zeroes the memory on drop and redacts every formatting path; the
//! actual value is only reachable through [`Secret::expose`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

/// A credential value that is zeroed on drop and redacted everywhere.
#[derive(Clone, Default)]
pub struct Secret(Zeroizing<String>);

impl Secret {
	/// Wraps a raw secret value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(Zeroizing::new(value.into()))
	}

	/// Exposes the raw value.
	///
	/// Use only at the single point the value has to leave the process,
	/// and never hand the result to a logging or formatting call.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns true if no secret has been captured.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Debug for Secret {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Secret(***)")
	}
}

impl fmt::Display for Secret {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("***")
	}
}

impl From<String> for Secret {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for Secret {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl PartialEq for Secret {
	fn eq(&self, other: &Self) -> bool {
		self.0.as_str() == other.0.as_str()
	}
}

impl Eq for Secret {}

// Snapshots of engine state may be serialized for the presentation
// layer; the secret is always redacted on that path. Deserialization
// accepts the raw value so credentials can be read from typed input.
impl Serialize for Secret {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str("***")
	}
}

impl<'de> Deserialize<'de> for Secret {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;
		Ok(Secret::new(value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_debug_and_display_redact() {
		let secret = Secret::new("hunter2");
		assert_eq!(format!("{:?}", secret), "Secret(***)");
		assert_eq!(format!("{}", secret), "***");
	}

	#[test]
	fn test_serialize_redacts() {
		let secret = Secret::new("hunter2");
		let json = serde_json::to_string(&secret).unwrap();
		assert!(!json.contains("hunter2"));
	}

	#[test]
	fn test_expose_returns_value() {
		let secret = Secret::new("hunter2");
		assert_eq!(secret.expose(), "hunter2");
		assert!(!secret.is_empty());
		assert!(Secret::default().is_empty());
	}
}
