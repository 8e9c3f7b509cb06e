//! The ordered, stable-keyed record sequence.

use console_types::{Column, OrderRecord, RowKey};

/// Ordered sequence of order records with stable row keys.
///
/// Insertion order is display order by default; sorting and filtering
/// are view transforms and never reorder the store itself. Keys are
/// assigned from a monotonic counter at insertion time and are never
/// reused, so a key stays valid (or becomes permanently absent) no
/// matter how the view is rearranged.
#[derive(Debug, Default)]
pub struct RowStore {
	rows: Vec<(RowKey, OrderRecord)>,
	next_key: u64,
}

impl RowStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	fn mint_key(&mut self) -> RowKey {
		let key = RowKey(self.next_key);
		self.next_key += 1;
		key
	}

	/// Appends one record, returning its assigned key.
	pub fn add(&mut self, record: OrderRecord) -> RowKey {
		let key = self.mint_key();
		self.rows.push((key, record));
		key
	}

	/// Appends a batch of records in order, without deduplication.
	pub fn add_many(&mut self, records: Vec<OrderRecord>) -> Vec<RowKey> {
		records.into_iter().map(|record| self.add(record)).collect()
	}

	/// Replaces exactly one field of the row with the given key.
	///
	/// Returns whether a row was touched. An absent key is a silent
	/// no-op: a cell commit can arrive after its row was deleted, which
	/// is normal rather than exceptional.
	pub fn update_cell(&mut self, key: RowKey, column: Column, value: String) -> bool {
		match self.rows.iter_mut().find(|(k, _)| *k == key) {
			Some((_, record)) => {
				record.set(column, value);
				true
			}
			None => {
				tracing::debug!(%key, %column, "Dropped cell edit for absent row");
				false
			}
		}
	}

	/// Removes the rows with the given keys, preserving the relative
	/// order of the remainder. Unknown keys are ignored; an empty key
	/// list is a no-op. Returns the number of rows removed.
	pub fn delete_by_keys(&mut self, keys: &[RowKey]) -> usize {
		if keys.is_empty() {
			return 0;
		}
		let before = self.rows.len();
		self.rows.retain(|(key, _)| !keys.contains(key));
		before - self.rows.len()
	}

	/// Empties the store. Row keys are not reused afterwards.
	pub fn clear(&mut self) {
		self.rows.clear();
	}

	/// Replaces the full contents, e.g. from a CSV import. All prior
	/// keys become absent.
	pub fn replace_all(&mut self, records: Vec<OrderRecord>) -> Vec<RowKey> {
		self.rows.clear();
		self.add_many(records)
	}

	/// Number of rows currently in the store.
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	/// Returns true if the store holds no rows.
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Looks up one record by key.
	pub fn get(&self, key: RowKey) -> Option<&OrderRecord> {
		self.rows
			.iter()
			.find(|(k, _)| *k == key)
			.map(|(_, record)| record)
	}

	/// Iterates rows in store order.
	pub fn iter(&self) -> impl Iterator<Item = (RowKey, &OrderRecord)> {
		self.rows.iter().map(|(key, record)| (*key, record))
	}

	/// Returns true if the given key addresses a live row.
	pub fn contains(&self, key: RowKey) -> bool {
		self.rows.iter().any(|(k, _)| *k == key)
	}

	/// Clones the full record sequence, in store order.
	///
	/// This is what a submission or a full export operates on -- the
	/// complete dataset, regardless of filter, sort or pagination.
	pub fn snapshot(&self) -> Vec<OrderRecord> {
		self.rows.iter().map(|(_, record)| record.clone()).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(user_id: &str, name: &str) -> OrderRecord {
		OrderRecord {
			user_id: user_id.to_string(),
			name: name.to_string(),
			..OrderRecord::default()
		}
	}

	#[test]
	fn test_add_preserves_order_and_mints_fresh_keys() {
		let mut store = RowStore::new();
		let a = store.add(record("u1", "a"));
		let b = store.add(record("u1", "b"));
		assert_ne!(a, b);

		let names: Vec<&str> = store.iter().map(|(_, r)| r.name.as_str()).collect();
		assert_eq!(names, vec!["a", "b"]);
	}

	#[test]
	fn test_update_cell_touches_exactly_one_row() {
		let mut store = RowStore::new();
		let a = store.add(record("u1", "a"));
		let b = store.add(record("u2", "b"));

		assert!(store.update_cell(a, Column::Name, "edited".to_string()));
		assert_eq!(store.get(a).unwrap().name, "edited");
		assert_eq!(store.get(b).unwrap().name, "b");
	}

	#[test]
	fn test_update_cell_is_idempotent() {
		let mut store = RowStore::new();
		let key = store.add(record("u1", "a"));

		store.update_cell(key, Column::Environment, "DEV".to_string());
		let once = store.snapshot();
		store.update_cell(key, Column::Environment, "DEV".to_string());
		assert_eq!(store.snapshot(), once);
	}

	#[test]
	fn test_update_cell_absent_key_is_silent_noop() {
		let mut store = RowStore::new();
		store.add(record("u1", "a"));
		let before = store.snapshot();

		assert!(!store.update_cell(RowKey(999), Column::Name, "x".to_string()));
		assert_eq!(store.snapshot(), before);
	}

	#[test]
	fn test_delete_by_keys_keeps_relative_order() {
		let mut store = RowStore::new();
		let a = store.add(record("u1", "a"));
		let _b = store.add(record("u1", "b"));
		let c = store.add(record("u1", "c"));

		assert_eq!(store.delete_by_keys(&[a, c]), 2);
		let names: Vec<&str> = store.iter().map(|(_, r)| r.name.as_str()).collect();
		assert_eq!(names, vec!["b"]);
	}

	#[test]
	fn test_delete_empty_key_list_is_noop() {
		let mut store = RowStore::new();
		store.add(record("u1", "a"));
		assert_eq!(store.delete_by_keys(&[]), 0);
		assert_eq!(store.len(), 1);
	}

	#[test]
	fn test_clear_then_add_yields_single_row_store() {
		let mut store = RowStore::new();
		store.add(record("u1", "a"));
		store.add(record("u2", "b"));
		store.clear();
		assert!(store.is_empty());

		let r = record("u3", "c");
		store.add(r.clone());
		assert_eq!(store.snapshot(), vec![r]);
	}

	#[test]
	fn test_replace_all_invalidates_prior_keys() {
		let mut store = RowStore::new();
		let old = store.add(record("u1", "a"));
		let new_keys = store.replace_all(vec![record("u2", "b"), record("u3", "c")]);

		assert!(!store.contains(old));
		assert_eq!(new_keys.len(), 2);
		assert!(new_keys.iter().all(|key| store.contains(*key)));
	}
}
