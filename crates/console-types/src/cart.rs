//! Cart and catalog types feeding the cart expander.

use serde::{Deserialize, Serialize};

/// One orderable entry offered for cart selection.
///
/// The catalog is injected at startup from the backend task list; the
/// core carries no embedded catalog constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
	/// Environment the task runs against.
	pub environment: String,
	/// Task name within that environment.
	pub name: String,
}

/// One chosen item inside a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
	pub environment: String,
	pub name: String,
}

impl From<CatalogItem> for CartItem {
	fn from(item: CatalogItem) -> Self {
		Self {
			environment: item.environment,
			name: item.name,
		}
	}
}

/// Transient multi-item input expanded into order records.
///
/// A cart is consumed once per add action and never persisted; the
/// shared fields are inherited by every expanded record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
	/// Identity shared by all expanded records. Must be non-empty.
	pub user_id: String,
	/// Lookup key shared by all expanded records.
	pub dictionary: String,
	/// Chosen items, one expanded record each.
	pub items: Vec<CartItem>,
}
