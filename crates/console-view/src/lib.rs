//! View pipeline module for the order console.
//!
//! Derives the visible window of the row store as a pure function of
//! the store contents and the view state: filter, then stable sort,
//! then pagination. The pipeline never mutates the store; display
//! positions exist only in its output, everything else in the system
//! addresses rows by key.

use console_store::RowStore;
use console_types::{Column, OrderRecord, RowKey};
use serde::{Deserialize, Serialize};

/// Active sort: which column, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
	pub column: Column,
	pub descending: bool,
}

/// Filter, sort and paging parameters controlling the derived view.
///
/// The page-reset latch is private, one-shot state: a store mutation
/// arms it, the next [`ViewState::project`] call consumes it, and it
/// clears no matter what. It never leaks into snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewState {
	filter_text: String,
	sort: Option<SortSpec>,
	page_index: usize,
	page_size: usize,
	#[serde(skip)]
	skip_next_reset: bool,
}

impl ViewState {
	/// Creates view state with the given page size and no transforms.
	pub fn new(page_size: usize) -> Self {
		Self {
			filter_text: String::new(),
			sort: None,
			page_index: 0,
			page_size: page_size.max(1),
			skip_next_reset: false,
		}
	}

	/// Replaces the filter text.
	pub fn set_filter(&mut self, text: impl Into<String>) {
		self.filter_text = text.into();
	}

	/// Cycles the sort state for a column.
	///
	/// Selecting a new column sorts it ascending; selecting the column
	/// already sorted flips the direction.
	pub fn toggle_sort(&mut self, column: Column) {
		self.sort = match self.sort {
			Some(spec) if spec.column == column => Some(SortSpec {
				column,
				descending: !spec.descending,
			}),
			_ => Some(SortSpec {
				column,
				descending: false,
			}),
		};
	}

	/// Jumps to the given page. Out-of-range indexes are clamped by the
	/// next projection.
	pub fn set_page(&mut self, page_index: usize) {
		self.page_index = page_index;
	}

	/// Changes the page size and returns to the first page. A zero page
	/// size is ignored.
	pub fn set_page_size(&mut self, page_size: usize) {
		if page_size == 0 {
			return;
		}
		self.page_size = page_size;
		self.page_index = 0;
	}

	/// Arms the one-shot page-reset suppression.
	///
	/// Called after store mutations so that e.g. a committed cell edit
	/// does not bounce the user back into clamping while they are in
	/// the middle of a page.
	pub fn suppress_next_reset(&mut self) {
		self.skip_next_reset = true;
	}

	pub fn filter_text(&self) -> &str {
		&self.filter_text
	}

	pub fn sort(&self) -> Option<SortSpec> {
		self.sort
	}

	pub fn page_index(&self) -> usize {
		self.page_index
	}

	pub fn page_size(&self) -> usize {
		self.page_size
	}

	/// Derives the visible window from the store.
	///
	/// Filters case-insensitively over all field values, sorts stably
	/// on the active column, clamps the page index against the
	/// filtered total (unless the one-shot suppression is armed) and
	/// clones out the visible rows.
	pub fn project(&mut self, store: &RowStore) -> ViewPage {
		let skip_reset = std::mem::take(&mut self.skip_next_reset);

		let needle = self.filter_text.to_lowercase();
		let mut rows: Vec<(RowKey, &OrderRecord)> = store
			.iter()
			.filter(|(_, record)| needle.is_empty() || matches_filter(record, &needle))
			.collect();

		if let Some(SortSpec { column, descending }) = self.sort {
			rows.sort_by(|(_, a), (_, b)| {
				let ordering = a.get(column).cmp(b.get(column));
				if descending {
					ordering.reverse()
				} else {
					ordering
				}
			});
		}

		let filtered = rows.len();
		let page_count = filtered.div_ceil(self.page_size);
		if !skip_reset {
			self.page_index = self.page_index.min(page_count.saturating_sub(1));
		}

		let window = rows
			.into_iter()
			.skip(self.page_index * self.page_size)
			.take(self.page_size)
			.map(|(key, record)| (key, record.clone()))
			.collect();

		ViewPage {
			rows: window,
			page_index: self.page_index,
			page_count,
			filtered,
			total: store.len(),
		}
	}
}

/// Case-insensitive substring match over the concatenated field values.
fn matches_filter(record: &OrderRecord, needle_lower: &str) -> bool {
	let haystack = Column::ALL
		.iter()
		.map(|column| record.get(*column))
		.collect::<Vec<_>>()
		.join(" ")
		.to_lowercase();
	haystack.contains(needle_lower)
}

/// One derived visible window of the store.
#[derive(Debug, Clone, Serialize)]
pub struct ViewPage {
	/// Visible rows in display order, with their stable keys.
	pub rows: Vec<(RowKey, OrderRecord)>,
	pub page_index: usize,
	pub page_count: usize,
	/// Row count after filtering, before pagination.
	pub filtered: usize,
	/// Row count of the whole store.
	pub total: usize,
}

impl ViewPage {
	/// Keys of the visible rows, for page-scoped selection.
	pub fn page_keys(&self) -> Vec<RowKey> {
		self.rows.iter().map(|(key, _)| *key).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn store_with(envs_and_names: &[(&str, &str)]) -> RowStore {
		let mut store = RowStore::new();
		for (environment, name) in envs_and_names {
			store.add(OrderRecord {
				user_id: "u1".to_string(),
				environment: environment.to_string(),
				name: name.to_string(),
				..OrderRecord::default()
			});
		}
		store
	}

	#[test]
	fn test_filter_is_case_insensitive() {
		let store = store_with(&[("DEV", "a"), ("UAT", "b")]);
		let mut state = ViewState::new(10);
		state.set_filter("dev");

		let page = state.project(&store);
		assert_eq!(page.filtered, 1);
		assert_eq!(page.rows[0].1.environment, "DEV");
	}

	#[test]
	fn test_empty_filter_matches_everything() {
		let store = store_with(&[("DEV", "a"), ("UAT", "b")]);
		let mut state = ViewState::new(10);
		assert_eq!(state.project(&store).filtered, 2);
	}

	#[test]
	fn test_sort_is_stable_for_equal_keys() {
		let store = store_with(&[("DEV", "first"), ("DEV", "second"), ("UAT", "third")]);
		let mut state = ViewState::new(10);
		state.toggle_sort(Column::Environment);

		let page = state.project(&store);
		let names: Vec<&str> = page.rows.iter().map(|(_, r)| r.name.as_str()).collect();
		assert_eq!(names, vec!["first", "second", "third"]);
	}

	#[test]
	fn test_toggle_sort_flips_then_new_column_resets_ascending() {
		let mut state = ViewState::new(10);
		state.toggle_sort(Column::Name);
		assert_eq!(
			state.sort(),
			Some(SortSpec {
				column: Column::Name,
				descending: false
			})
		);

		state.toggle_sort(Column::Name);
		assert!(state.sort().unwrap().descending);

		state.toggle_sort(Column::Environment);
		let sort = state.sort().unwrap();
		assert_eq!(sort.column, Column::Environment);
		assert!(!sort.descending);
	}

	#[test]
	fn test_pagination_windows_rows() {
		let store = store_with(&[("DEV", "a"), ("DEV", "b"), ("DEV", "c")]);
		let mut state = ViewState::new(2);

		let page = state.project(&store);
		assert_eq!(page.page_count, 2);
		assert_eq!(page.rows.len(), 2);

		state.set_page(1);
		let page = state.project(&store);
		assert_eq!(page.rows.len(), 1);
		assert_eq!(page.rows[0].1.name, "c");
	}

	#[test]
	fn test_page_index_clamped_when_total_shrinks() {
		let mut store = store_with(&[("DEV", "a"), ("DEV", "b"), ("DEV", "c")]);
		let mut state = ViewState::new(2);
		state.set_page(1);
		state.project(&store);

		store.clear();
		store.add(OrderRecord::default());
		let page = state.project(&store);
		assert_eq!(page.page_index, 0);
	}

	#[test]
	fn test_suppression_holds_for_exactly_one_projection() {
		let mut store = store_with(&[("DEV", "a"), ("DEV", "b"), ("DEV", "c")]);
		let mut state = ViewState::new(2);
		state.set_page(1);
		state.project(&store);

		let keys: Vec<RowKey> = store.iter().map(|(key, _)| key).collect();
		store.delete_by_keys(&keys[2..]);
		state.suppress_next_reset();

		// First projection after the mutation leaves the index alone.
		let page = state.project(&store);
		assert_eq!(page.page_index, 1);
		assert!(page.rows.is_empty());

		// The latch is spent: the next projection clamps.
		let page = state.project(&store);
		assert_eq!(page.page_index, 0);
		assert_eq!(page.rows.len(), 2);
	}

	#[test]
	fn test_page_size_change_resets_to_first_page() {
		let store = store_with(&[("DEV", "a"), ("DEV", "b"), ("DEV", "c")]);
		let mut state = ViewState::new(2);
		state.set_page(1);
		state.project(&store);

		state.set_page_size(1);
		assert_eq!(state.page_index(), 0);

		state.set_page_size(0);
		assert_eq!(state.page_size(), 1);
	}
}
