//! The selected-row set, keyed by stable row identity.

use crate::RowStore;
use console_types::RowKey;
use std::collections::HashSet;

/// Tracks which rows are currently marked selected.
///
/// Selection is keyed by [`RowKey`], so it survives re-sort, re-filter
/// and re-page operations untouched. Only deletion of the underlying
/// rows changes it, via [`SelectionTracker::prune`].
#[derive(Debug, Default)]
pub struct SelectionTracker {
	selected: HashSet<RowKey>,
}

impl SelectionTracker {
	/// Creates an empty selection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Flips the selection state of one row.
	pub fn toggle(&mut self, key: RowKey) {
		if !self.selected.remove(&key) {
			self.selected.insert(key);
		}
	}

	/// Toggles a whole page worth of rows.
	///
	/// Acts only on the supplied keys: if every one is already selected
	/// they are all deselected, otherwise the missing ones are added.
	/// Selecting "all" never reaches beyond the current page.
	pub fn toggle_page(&mut self, page_keys: &[RowKey]) {
		if page_keys.is_empty() {
			return;
		}
		if page_keys.iter().all(|key| self.selected.contains(key)) {
			for key in page_keys {
				self.selected.remove(key);
			}
		} else {
			self.selected.extend(page_keys.iter().copied());
		}
	}

	/// Deselects everything.
	pub fn clear(&mut self) {
		self.selected.clear();
	}

	/// Number of selected rows.
	pub fn count(&self) -> usize {
		self.selected.len()
	}

	/// Returns true if the given row is selected.
	pub fn is_selected(&self, key: RowKey) -> bool {
		self.selected.contains(&key)
	}

	/// Drops selected keys that no longer address a live row.
	pub fn prune(&mut self, store: &RowStore) {
		self.selected.retain(|key| store.contains(*key));
	}

	/// The selected keys as a set.
	pub fn as_set(&self) -> &HashSet<RowKey> {
		&self.selected
	}

	/// Selected keys in store order.
	pub fn selected_in_order(&self, store: &RowStore) -> Vec<RowKey> {
		store
			.iter()
			.map(|(key, _)| key)
			.filter(|key| self.selected.contains(key))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use console_types::OrderRecord;

	fn seeded_store(n: usize) -> (RowStore, Vec<RowKey>) {
		let mut store = RowStore::new();
		let keys = (0..n)
			.map(|i| {
				store.add(OrderRecord {
					user_id: format!("u{}", i),
					..OrderRecord::default()
				})
			})
			.collect();
		(store, keys)
	}

	#[test]
	fn test_toggle_flips_state() {
		let (_, keys) = seeded_store(1);
		let mut selection = SelectionTracker::new();

		selection.toggle(keys[0]);
		assert!(selection.is_selected(keys[0]));
		selection.toggle(keys[0]);
		assert!(!selection.is_selected(keys[0]));
	}

	#[test]
	fn test_toggle_page_selects_missing_then_deselects_all() {
		let (_, keys) = seeded_store(3);
		let mut selection = SelectionTracker::new();
		selection.toggle(keys[0]);

		// One of three already selected: the other two get added.
		selection.toggle_page(&keys);
		assert_eq!(selection.count(), 3);

		// All selected: the page toggles off.
		selection.toggle_page(&keys);
		assert_eq!(selection.count(), 0);
	}

	#[test]
	fn test_toggle_page_only_touches_supplied_keys() {
		let (_, keys) = seeded_store(4);
		let mut selection = SelectionTracker::new();
		selection.toggle(keys[3]);

		selection.toggle_page(&keys[..2]);
		assert!(selection.is_selected(keys[0]));
		assert!(selection.is_selected(keys[1]));
		assert!(!selection.is_selected(keys[2]));
		assert!(selection.is_selected(keys[3]));
	}

	#[test]
	fn test_prune_drops_deleted_rows() {
		let (mut store, keys) = seeded_store(3);
		let mut selection = SelectionTracker::new();
		selection.toggle_page(&keys);

		store.delete_by_keys(&[keys[1]]);
		selection.prune(&store);

		assert_eq!(selection.count(), 2);
		assert!(!selection.is_selected(keys[1]));
	}

	#[test]
	fn test_selected_in_order_follows_store_order() {
		let (store, keys) = seeded_store(3);
		let mut selection = SelectionTracker::new();
		selection.toggle(keys[2]);
		selection.toggle(keys[0]);

		assert_eq!(selection.selected_in_order(&store), vec![keys[0], keys[2]]);
	}
}
