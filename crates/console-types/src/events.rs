//! Change events published to the presentation layer.
//!
//! Every state change in the engine is announced on a broadcast bus so
//! the (external) presentation layer can re-render the affected parts.
//! Events describe what changed, not how to render it.

use crate::{Notification, SubmissionState};
use serde::{Deserialize, Serialize};

/// Main event type published by the console engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ConsoleEvent {
	/// The row store contents changed; the view has been recomputed.
	RowsChanged {
		/// Total number of rows now in the store.
		rows: usize,
	},
	/// Filter, sort or paging state changed; the view has been recomputed.
	ViewChanged {
		page_index: usize,
		/// Row count after filtering, before pagination.
		filtered: usize,
	},
	/// The selected-row set changed.
	SelectionChanged { selected: usize },
	/// The submission workflow moved to a new state.
	SubmissionChanged { state: SubmissionState },
	/// The user-facing notification changed.
	NotificationChanged { notification: Notification },
}
