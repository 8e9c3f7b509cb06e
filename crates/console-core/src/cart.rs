//! Cart expansion into order records.

use console_types::{Cart, OrderRecord};
use thiserror::Error;

/// Errors that can occur while expanding a cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
	/// The cart has no user id. Callers disable the add action while
	/// the field is empty; expansion re-checks it.
	#[error("Cart user id must not be empty")]
	MissingUserId,
}

/// Expands a cart into one order record per chosen item.
///
/// Every record inherits the cart's `user_id` and `dictionary` and
/// takes its item's `environment` and `name`; the order id starts
/// empty and is filled in by editing or a later scan. An empty item
/// list expands to an empty batch, which callers treat as a no-op add.
pub fn expand_cart(cart: &Cart) -> Result<Vec<OrderRecord>, CartError> {
	if cart.user_id.is_empty() {
		return Err(CartError::MissingUserId);
	}

	Ok(cart
		.items
		.iter()
		.map(|item| OrderRecord {
			user_id: cart.user_id.clone(),
			order_id: String::new(),
			dictionary: cart.dictionary.clone(),
			environment: item.environment.clone(),
			name: item.name.clone(),
		})
		.collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use console_types::CartItem;

	fn cart(user_id: &str, items: usize) -> Cart {
		Cart {
			user_id: user_id.to_string(),
			dictionary: "dict-1".to_string(),
			items: (0..items)
				.map(|i| CartItem {
					environment: "DEV".to_string(),
					name: format!("task-{}", i),
				})
				.collect(),
		}
	}

	#[test]
	fn test_expand_produces_one_record_per_item() {
		let records = expand_cart(&cart("u1", 3)).unwrap();
		assert_eq!(records.len(), 3);
		for record in &records {
			assert_eq!(record.user_id, "u1");
			assert_eq!(record.dictionary, "dict-1");
			assert_eq!(record.order_id, "");
		}
		assert_eq!(records[2].name, "task-2");
	}

	#[test]
	fn test_expand_rejects_missing_user_id() {
		assert_eq!(expand_cart(&cart("", 2)), Err(CartError::MissingUserId));
	}

	#[test]
	fn test_expand_empty_items_is_empty_batch() {
		assert_eq!(expand_cart(&cart("u1", 0)).unwrap(), vec![]);
	}
}
