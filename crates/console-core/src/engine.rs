//! The engine coordinating all components.
//!
//! `ConsoleEngine` owns the row store, selection, view state, workflow
//! and backend client, and exposes every user-facing operation as a
//! typed method. The presentation layer either calls those methods
//! directly or feeds [`ConsoleAction`]s through the channel consumed by
//! [`ConsoleEngine::run`]; either way all state changes happen on one
//! task and are announced on the event bus.

use crate::cart::{expand_cart, CartError};
use crate::event_bus::EventBus;
use crate::workflow::{Resolution, SubmissionWorkflow, WorkflowError};
use console_client::{BackendService, ClientError};
use console_codec::ImportError;
use console_config::Config;
use console_store::{RowStore, SelectionTracker};
use console_types::{
	Cart, CatalogItem, Column, ConsoleEvent, Credentials, Notification, NotificationOutcome,
	OrderRecord, RowKey, SubmissionKind, SubmissionState, SubmitRequest, WireCredentials,
};
use console_view::{ViewPage, ViewState};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, Instant};

/// Errors that can occur while running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Service error: {0}")]
	Service(String),
}

/// Completion of the one network call a submission issues.
///
/// Carries the correlation number of the originating request; the
/// workflow drops it if a newer submission has superseded it.
#[derive(Debug)]
pub struct SubmissionOutcome {
	pub seq: u64,
	/// The accepted job id (if any), or the transport/backend error.
	pub result: Result<Option<String>, ClientError>,
}

/// Typed user input events consumed by the engine loop.
#[derive(Debug)]
pub enum ConsoleAction {
	/// Expand a cart and append its records.
	AddOrder(Cart),
	/// Commit one edited cell (cell blur).
	UpdateCell {
		key: RowKey,
		column: Column,
		value: String,
	},
	/// Flip one row's selection.
	ToggleRow(RowKey),
	/// Toggle the visible page's selection.
	TogglePage,
	/// Deselect everything.
	ClearSelection,
	/// Delete the selected rows.
	DeleteSelected,
	/// Empty the store.
	ClearRows,
	/// Replace the store from CSV text (file selection).
	ImportCsv {
		text: String,
		reply: oneshot::Sender<Result<usize, ImportError>>,
	},
	/// Serialize the store (or just the selection) as CSV.
	ExportCsv {
		selection_only: bool,
		reply: oneshot::Sender<String>,
	},
	/// Replace the filter text.
	SetFilter(String),
	/// Cycle the sort state of a column.
	ToggleSort(Column),
	/// Jump to a page.
	SetPage(usize),
	/// Change the page size.
	SetPageSize(usize),
	/// Update the notification destination.
	SetReceipt(String),
	/// Open the confirmation panel for a scan or send.
	RequestSubmission(SubmissionKind),
	/// Close the confirmation panel.
	CancelSubmission,
	/// Confirm the open submission with captured credentials.
	ConfirmSubmission(Credentials),
	/// Hide the notification.
	DismissNotification,
	/// Stop the engine loop.
	Shutdown,
}

/// Main engine coordinating the editing and submission components.
pub struct ConsoleEngine {
	config: Config,
	store: RowStore,
	selection: SelectionTracker,
	view: ViewState,
	workflow: SubmissionWorkflow,
	notification: Notification,
	catalog: Vec<CatalogItem>,
	receipt: String,
	backend: Arc<BackendService>,
	event_bus: EventBus,
	page: ViewPage,
	outcome_tx: mpsc::UnboundedSender<SubmissionOutcome>,
	outcome_rx: Option<mpsc::UnboundedReceiver<SubmissionOutcome>>,
	dismiss_deadline: Option<Instant>,
}

impl ConsoleEngine {
	/// Creates an engine over the given backend with an injected
	/// catalog.
	pub fn new(config: Config, backend: Arc<BackendService>, catalog: Vec<CatalogItem>) -> Self {
		let store = RowStore::new();
		let mut view = ViewState::new(config.table.page_size);
		let page = view.project(&store);
		let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

		Self {
			config,
			store,
			selection: SelectionTracker::new(),
			view,
			workflow: SubmissionWorkflow::new(),
			notification: Notification::default(),
			catalog,
			receipt: String::new(),
			backend,
			event_bus: EventBus::default(),
			page,
			outcome_tx,
			outcome_rx: Some(outcome_rx),
			dismiss_deadline: None,
		}
	}

	/// The event bus the presentation layer subscribes to.
	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	/// The injected item catalog.
	pub fn catalog(&self) -> &[CatalogItem] {
		&self.catalog
	}

	/// Replaces the item catalog.
	pub fn set_catalog(&mut self, catalog: Vec<CatalogItem>) {
		self.catalog = catalog;
	}

	/// The currently visible window.
	pub fn page(&self) -> &ViewPage {
		&self.page
	}

	/// The row store contents, in order.
	pub fn records(&self) -> Vec<OrderRecord> {
		self.store.snapshot()
	}

	/// Total rows in the store.
	pub fn row_count(&self) -> usize {
		self.store.len()
	}

	/// Number of selected rows.
	pub fn selection_count(&self) -> usize {
		self.selection.count()
	}

	/// The current submission workflow state.
	pub fn submission_state(&self) -> &SubmissionState {
		self.workflow.state()
	}

	/// The current notification sub-state.
	pub fn notification(&self) -> &Notification {
		&self.notification
	}

	/// The captured notification destination.
	pub fn receipt(&self) -> &str {
		&self.receipt
	}

	/// Page sizes offered by the pager.
	pub fn page_size_options(&self) -> &[usize] {
		&self.config.table.page_size_options
	}

	// == Row store operations ==

	/// Expands a cart and appends the resulting records.
	pub fn add_order(&mut self, cart: &Cart) -> Result<Vec<RowKey>, CartError> {
		let records = expand_cart(cart)?;
		if records.is_empty() {
			return Ok(Vec::new());
		}
		let keys = self.store.add_many(records);
		self.refresh_after_rows_change();
		Ok(keys)
	}

	/// Commits one edited cell. Absent keys are a silent no-op.
	pub fn update_cell(&mut self, key: RowKey, column: Column, value: String) {
		if self.store.update_cell(key, column, value) {
			self.refresh_after_rows_change();
		}
	}

	/// Deletes the given rows, returning how many were removed.
	pub fn delete_rows(&mut self, keys: &[RowKey]) -> usize {
		let removed = self.store.delete_by_keys(keys);
		if removed > 0 {
			self.refresh_after_rows_change();
		}
		removed
	}

	/// Deletes the currently selected rows.
	pub fn delete_selected(&mut self) -> usize {
		let keys = self.selection.selected_in_order(&self.store);
		self.delete_rows(&keys)
	}

	/// Empties the store.
	pub fn clear_rows(&mut self) {
		if self.store.is_empty() {
			return;
		}
		self.store.clear();
		self.refresh_after_rows_change();
	}

	/// Replaces the store contents from CSV text.
	///
	/// A parse failure leaves the store and selection exactly as they
	/// were; nothing is imported partially.
	pub fn import_csv(&mut self, text: &str) -> Result<usize, ImportError> {
		let records = console_codec::import(text)?;
		let count = records.len();
		self.store.replace_all(records);
		self.refresh_after_rows_change();
		Ok(count)
	}

	/// Serializes the full store as CSV.
	pub fn export_csv(&self) -> String {
		console_codec::export_all(self.store.iter().map(|(_, record)| record))
	}

	/// Serializes only the selected rows as CSV, store order preserved.
	pub fn export_selection_csv(&self) -> String {
		console_codec::export_selection(self.store.iter(), self.selection.as_set())
	}

	// == View operations ==

	/// Replaces the filter text.
	pub fn set_filter(&mut self, text: impl Into<String>) {
		self.view.set_filter(text);
		self.refresh_after_view_change();
	}

	/// Cycles the sort state of a column.
	pub fn toggle_sort(&mut self, column: Column) {
		self.view.toggle_sort(column);
		self.refresh_after_view_change();
	}

	/// Jumps to a page.
	pub fn set_page(&mut self, page_index: usize) {
		self.view.set_page(page_index);
		self.refresh_after_view_change();
	}

	/// Changes the page size, returning to the first page.
	pub fn set_page_size(&mut self, page_size: usize) {
		self.view.set_page_size(page_size);
		self.refresh_after_view_change();
	}

	// == Selection operations ==

	/// Flips one row's selection. Keys no longer in the store are
	/// ignored.
	pub fn toggle_row(&mut self, key: RowKey) {
		if !self.store.contains(key) {
			tracing::debug!(%key, "Ignoring selection toggle for absent row");
			return;
		}
		self.selection.toggle(key);
		self.publish_selection();
	}

	/// Toggles the visible page's rows.
	pub fn toggle_page(&mut self) {
		self.selection.toggle_page(&self.page.page_keys());
		self.publish_selection();
	}

	/// Deselects everything.
	pub fn clear_selection(&mut self) {
		self.selection.clear();
		self.publish_selection();
	}

	// == Submission operations ==

	/// Updates the notification destination passed through to the
	/// backend.
	pub fn set_receipt(&mut self, receipt: impl Into<String>) {
		self.receipt = receipt.into();
	}

	/// Opens the confirmation panel for a scan or send request.
	pub fn request_submission(&mut self, kind: SubmissionKind) -> Result<(), WorkflowError> {
		self.workflow.request_confirmation(kind)?;
		self.publish_submission();
		Ok(())
	}

	/// Closes the confirmation panel.
	pub fn cancel_submission(&mut self) -> Result<(), WorkflowError> {
		self.workflow.cancel()?;
		self.publish_submission();
		Ok(())
	}

	/// Confirms the open submission and issues its single network call.
	///
	/// The request carries the full store snapshot, never just the
	/// visible page. The call runs as a spawned task; its completion
	/// comes back through the engine loop as a [`SubmissionOutcome`]
	/// stamped with the returned correlation number. The credentials
	/// are consumed and zeroed once the request body is built.
	pub fn confirm_submission(&mut self, credentials: Credentials) -> Result<u64, WorkflowError> {
		let ticket = self.workflow.confirm(&credentials)?;
		let request = SubmitRequest {
			receipt: self.receipt.clone(),
			credentials: WireCredentials::from(&credentials),
			package: self.store.snapshot(),
		};
		drop(credentials);

		tracing::info!(kind = %ticket.kind, rows = request.package.len(), "Submission confirmed");
		self.publish_submission();
		self.show_notification(NotificationOutcome::Processing);

		let backend = Arc::clone(&self.backend);
		let outcome_tx = self.outcome_tx.clone();
		let seq = ticket.seq;
		tokio::spawn(async move {
			let result = backend
				.submit(ticket.kind, &request)
				.await
				.map(|envelope| envelope.job_id().map(str::to_string));
			// The engine may have shut down in the meantime.
			let _ = outcome_tx.send(SubmissionOutcome { seq, result });
		});

		Ok(seq)
	}

	/// Applies the completion of a submission's network call.
	pub fn handle_submission_outcome(&mut self, outcome: SubmissionOutcome) {
		match outcome.result {
			Ok(job_id) => match self.workflow.resolve_success(outcome.seq, job_id) {
				Resolution::Applied(SubmissionState::Succeeded { job_id }) => {
					self.publish_submission();
					self.show_notification(NotificationOutcome::Succeeded { job_id });
				}
				Resolution::Applied(_) => {
					// Accepted without an identifier: the notification
					// keeps reporting the indeterminate outcome.
					self.publish_submission();
				}
				Resolution::Stale => {}
			},
			Err(error) => {
				tracing::error!(seq = outcome.seq, %error, "Submission failed");
				if let Resolution::Applied(_) = self.workflow.resolve_failure(outcome.seq) {
					self.publish_submission();
					self.show_notification(NotificationOutcome::Failed);
				}
			}
		}
	}

	/// Hides the notification without touching the workflow state.
	pub fn dismiss_notification(&mut self) {
		self.notification.dismiss();
		self.dismiss_deadline = None;
		self.event_bus.publish(ConsoleEvent::NotificationChanged {
			notification: self.notification.clone(),
		});
	}

	// == Event loop ==

	/// Runs the engine until shutdown.
	///
	/// Reacts to typed actions from the presentation layer, to
	/// submission completions and to the notification auto-dismiss
	/// timeout. Ends on [`ConsoleAction::Shutdown`], when every action
	/// sender is gone, or on ctrl-c.
	pub async fn run(
		mut self,
		mut actions: mpsc::UnboundedReceiver<ConsoleAction>,
	) -> Result<(), EngineError> {
		let mut outcome_rx = self
			.outcome_rx
			.take()
			.ok_or_else(|| EngineError::Service("Engine is already running".to_string()))?;

		loop {
			let dismiss_at = self.dismiss_deadline;
			tokio::select! {
				maybe_action = actions.recv() => {
					match maybe_action {
						Some(action) => {
							if self.handle_action(action) {
								break;
							}
						}
						None => break,
					}
				}

				Some(outcome) = outcome_rx.recv() => {
					self.handle_submission_outcome(outcome);
				}

				_ = sleep_until_deadline(dismiss_at), if dismiss_at.is_some() => {
					self.dismiss_notification();
				}

				_ = tokio::signal::ctrl_c() => {
					break;
				}
			}
		}

		Ok(())
	}

	/// Dispatches one action. Returns true on shutdown.
	fn handle_action(&mut self, action: ConsoleAction) -> bool {
		match action {
			ConsoleAction::AddOrder(cart) => {
				if let Err(error) = self.add_order(&cart) {
					tracing::warn!(%error, "Rejected cart");
				}
			}
			ConsoleAction::UpdateCell { key, column, value } => {
				self.update_cell(key, column, value);
			}
			ConsoleAction::ToggleRow(key) => self.toggle_row(key),
			ConsoleAction::TogglePage => self.toggle_page(),
			ConsoleAction::ClearSelection => self.clear_selection(),
			ConsoleAction::DeleteSelected => {
				self.delete_selected();
			}
			ConsoleAction::ClearRows => self.clear_rows(),
			ConsoleAction::ImportCsv { text, reply } => {
				let _ = reply.send(self.import_csv(&text));
			}
			ConsoleAction::ExportCsv {
				selection_only,
				reply,
			} => {
				let csv = if selection_only {
					self.export_selection_csv()
				} else {
					self.export_csv()
				};
				let _ = reply.send(csv);
			}
			ConsoleAction::SetFilter(text) => self.set_filter(text),
			ConsoleAction::ToggleSort(column) => self.toggle_sort(column),
			ConsoleAction::SetPage(page_index) => self.set_page(page_index),
			ConsoleAction::SetPageSize(page_size) => self.set_page_size(page_size),
			ConsoleAction::SetReceipt(receipt) => self.set_receipt(receipt),
			ConsoleAction::RequestSubmission(kind) => {
				if let Err(error) = self.request_submission(kind) {
					tracing::warn!(%error, "Rejected submission request");
				}
			}
			ConsoleAction::CancelSubmission => {
				if let Err(error) = self.cancel_submission() {
					tracing::warn!(%error, "Rejected submission cancel");
				}
			}
			ConsoleAction::ConfirmSubmission(credentials) => {
				if let Err(error) = self.confirm_submission(credentials) {
					tracing::warn!(%error, "Rejected submission confirm");
				}
			}
			ConsoleAction::DismissNotification => self.dismiss_notification(),
			ConsoleAction::Shutdown => return true,
		}
		false
	}

	// == Internals ==

	/// Recomputes the view after a store mutation.
	///
	/// The mutation arms the one-shot page-reset suppression, so this
	/// recompute leaves the page index alone; the next view-state
	/// change clamps normally.
	fn refresh_after_rows_change(&mut self) {
		let selected_before = self.selection.count();
		self.selection.prune(&self.store);

		self.view.suppress_next_reset();
		self.page = self.view.project(&self.store);
		self.event_bus.publish(ConsoleEvent::RowsChanged {
			rows: self.store.len(),
		});

		if self.selection.count() != selected_before {
			self.publish_selection();
		}
	}

	fn refresh_after_view_change(&mut self) {
		self.page = self.view.project(&self.store);
		self.event_bus.publish(ConsoleEvent::ViewChanged {
			page_index: self.page.page_index,
			filtered: self.page.filtered,
		});
	}

	fn publish_selection(&self) {
		self.event_bus.publish(ConsoleEvent::SelectionChanged {
			selected: self.selection.count(),
		});
	}

	fn publish_submission(&self) {
		self.event_bus.publish(ConsoleEvent::SubmissionChanged {
			state: self.workflow.state().clone(),
		});
	}

	fn show_notification(&mut self, outcome: NotificationOutcome) {
		self.notification = Notification::shown(outcome);
		self.dismiss_deadline = Some(
			Instant::now() + Duration::from_secs(self.config.notification.auto_dismiss_seconds),
		);
		self.event_bus.publish(ConsoleEvent::NotificationChanged {
			notification: self.notification.clone(),
		});
	}
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
	match deadline {
		Some(deadline) => tokio::time::sleep_until(deadline).await,
		// Guarded out by the select condition; never completes.
		None => std::future::pending::<()>().await,
	}
}
