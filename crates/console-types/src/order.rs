//! Order record model and column addressing.
//!
//! This module defines the record unit managed by the row store together
//! with the stable row identity handed out at insertion time and the
//! column enumeration used for cell-level addressing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identity of a row in the row store.
///
/// Keys are assigned at insertion time, increase monotonically and are
/// never reused within a session. Selection and edit targeting address
/// rows by key, never by display position, so both stay meaningful
/// across re-sort, re-filter and re-page operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(pub u64);

impl fmt::Display for RowKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "row-{}", self.0)
	}
}

/// One row of the managed dataset.
///
/// All fields are strings; absence is represented as the empty string,
/// never a distinct null. Only `user_id` is required, and only at
/// submission time -- records are freely editable in any intermediate
/// shape before that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
	/// Identity the order is executed on behalf of. Required for submission.
	#[serde(default)]
	pub user_id: String,
	/// Backend order identifier, when already known.
	#[serde(default)]
	pub order_id: String,
	/// Opaque lookup key forwarded to the backend.
	#[serde(default)]
	pub dictionary: String,
	/// Free-form environment tag such as "DEV", "UAT", "SIT" or "PROD".
	#[serde(default)]
	pub environment: String,
	/// Human-readable order label.
	#[serde(default)]
	pub name: String,
}

impl OrderRecord {
	/// Returns the value of the given column.
	pub fn get(&self, column: Column) -> &str {
		match column {
			Column::UserId => &self.user_id,
			Column::OrderId => &self.order_id,
			Column::Dictionary => &self.dictionary,
			Column::Environment => &self.environment,
			Column::Name => &self.name,
		}
	}

	/// Replaces the value of the given column, leaving the others untouched.
	pub fn set(&mut self, column: Column, value: String) {
		match column {
			Column::UserId => self.user_id = value,
			Column::OrderId => self.order_id = value,
			Column::Dictionary => self.dictionary = value,
			Column::Environment => self.environment = value,
			Column::Name => self.name = value,
		}
	}
}

/// Addressable columns of an [`OrderRecord`].
///
/// The declaration order is the canonical column order used by the CSV
/// codec and the default presentation layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
	UserId,
	OrderId,
	Dictionary,
	Environment,
	Name,
}

impl Column {
	/// All columns in canonical order.
	pub const ALL: [Column; 5] = [
		Column::UserId,
		Column::OrderId,
		Column::Dictionary,
		Column::Environment,
		Column::Name,
	];

	/// The wire/CSV name of this column.
	pub fn as_str(&self) -> &'static str {
		match self {
			Column::UserId => "userId",
			Column::OrderId => "orderId",
			Column::Dictionary => "dictionary",
			Column::Environment => "environment",
			Column::Name => "name",
		}
	}
}

impl fmt::Display for Column {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unknown column name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown column: {0}")]
pub struct UnknownColumn(pub String);

impl FromStr for Column {
	type Err = UnknownColumn;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"userId" => Ok(Column::UserId),
			"orderId" => Ok(Column::OrderId),
			"dictionary" => Ok(Column::Dictionary),
			"environment" => Ok(Column::Environment),
			"name" => Ok(Column::Name),
			other => Err(UnknownColumn(other.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_get_set_round_trip() {
		let mut record = OrderRecord::default();
		for column in Column::ALL {
			record.set(column, format!("value-{}", column));
			assert_eq!(record.get(column), format!("value-{}", column));
		}
	}

	#[test]
	fn test_column_parse_matches_as_str() {
		for column in Column::ALL {
			assert_eq!(column.as_str().parse::<Column>().unwrap(), column);
		}
		assert!("usrId".parse::<Column>().is_err());
	}

	#[test]
	fn test_record_serializes_camel_case() {
		let record = OrderRecord {
			user_id: "u1".into(),
			order_id: "o1".into(),
			dictionary: "d".into(),
			environment: "DEV".into(),
			name: "n1".into(),
		};
		let json = serde_json::to_value(&record).unwrap();
		assert_eq!(json["userId"], "u1");
		assert_eq!(json["orderId"], "o1");
		assert_eq!(json["dictionary"], "d");
	}

	#[test]
	fn test_missing_fields_default_to_empty() {
		let record: OrderRecord = serde_json::from_str(r#"{"userId":"u1"}"#).unwrap();
		assert_eq!(record.user_id, "u1");
		assert_eq!(record.order_id, "");
		assert_eq!(record.name, "");
	}
}
