//! Staged edit → review → commit workflow shared by every configurable module.
//!
//! The dialog keeps two snapshots of the module's values: the *baseline*,
//! frozen when the dialog opens, and the *current* values the operator edits.
//! Review is only reachable while the two differ, and a commit always submits
//! the complete current values through the module's persistence sink.

pub mod session;
pub mod view;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{FieldCatalog, Vocabulary};
use crate::form_data::{
    compute_diff, empty_form_data, form_data_from_config, ChangeItem, ConfigValues, FormData,
};
use crate::modules::ModuleDescriptor;
use crate::options::{AccountSetRecord, OptionIndex};
use crate::sink::{ConfigureModule, SinkError};

pub use session::DialogSession;
pub use view::{EditField, EditSection, ReviewEntry};

/// Which screen of the dialog is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogStep {
    #[default]
    Edit,
    Confirm,
}

impl fmt::Display for DialogStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogStep::Edit => write!(f, "edit"),
            DialogStep::Confirm => write!(f, "confirm"),
        }
    }
}

/// Refused transitions. A refused call never changes dialog state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("The `{module}` dialog is not open")]
    NotOpen { module: &'static str },
    #[error("`{key}` is not a field of the `{module}` module")]
    UnknownField { module: &'static str, key: String },
    #[error("Only available in the {expected} step (currently {actual})")]
    WrongStep {
        expected: DialogStep,
        actual: DialogStep,
    },
    #[error("There are no changes to review")]
    NothingToReview,
    #[error("A save is already in progress")]
    CommitInFlight,
}

/// Proof that a commit was started; hand it back to
/// [`ReconciliationDialog::settle_commit`] once the sink answers.
#[derive(Debug, Clone)]
pub struct CommitTicket {
    session: u64,
    pub payload: FormData,
}

/// What a settled commit did to the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Persisted; the dialog closed and reset.
    Committed { message: &'static str },
    /// The sink refused; the dialog stays on the review step.
    Failed { message: String },
    /// The dialog was closed or reopened while the commit was in flight.
    Ignored,
}

#[derive(Debug, Clone, Default)]
struct DialogState {
    open: bool,
    step: DialogStep,
    baseline: FormData,
    current: FormData,
    commit_error: Option<String>,
    session: u64,
}

/// Generic reconciliation dialog for one module.
pub struct ReconciliationDialog<C: Vocabulary, G: Vocabulary> {
    module: ModuleDescriptor<C, G>,
    sink: Arc<dyn ConfigureModule>,
    options: OptionIndex<C>,
    options_errored: bool,
    state: DialogState,
    /// Session of the commit whose sink call has not been settled yet.
    /// Survives close and reopen.
    in_flight: Option<u64>,
}

impl<C: Vocabulary, G: Vocabulary> ReconciliationDialog<C, G> {
    pub fn new(module: ModuleDescriptor<C, G>, sink: Arc<dyn ConfigureModule>) -> Self {
        let mut dialog = Self {
            module,
            sink,
            options: OptionIndex::default(),
            options_errored: false,
            state: DialogState::default(),
            in_flight: None,
        };
        dialog.reset();
        dialog
    }

    pub fn module(&self) -> &ModuleDescriptor<C, G> {
        &self.module
    }

    pub fn catalog(&self) -> &'static FieldCatalog<C, G> {
        self.module.catalog
    }

    /// Replaces the selectable targets. Presentation only; the workflow state
    /// is never affected.
    pub fn set_options(&mut self, options: OptionIndex<C>) {
        self.options = options;
        self.options_errored = false;
    }

    /// Loads options from the option source, degrading to an empty pool and
    /// the errored flag when the source failed.
    pub fn load_options<E: fmt::Display>(&mut self, source: Result<Vec<AccountSetRecord>, E>) {
        match source {
            Ok(records) => self.set_options(OptionIndex::from_records(&records)),
            Err(err) => {
                warn!(module = self.module.key, error = %err, "account set options unavailable");
                self.options = OptionIndex::default();
                self.options_errored = true;
            }
        }
    }

    pub fn options(&self) -> &OptionIndex<C> {
        &self.options
    }

    pub fn options_errored(&self) -> bool {
        self.options_errored
    }

    /// Opens the dialog, seeding baseline and current from `config`.
    ///
    /// Seeding only happens on the closed → open transition; calling this
    /// while already open (for example after a background refresh of the
    /// configuration) keeps the operator's edits and returns `false`.
    pub fn open<M: ConfigValues + ?Sized>(&mut self, config: Option<&M>) -> bool {
        if self.state.open {
            debug!(module = self.module.key, "dialog already open; keeping edits");
            return false;
        }
        let seeded = form_data_from_config(self.module.catalog, config);
        self.state.baseline = seeded.clone();
        self.state.current = seeded;
        self.state.step = DialogStep::Edit;
        self.state.commit_error = None;
        self.state.open = true;
        self.state.session += 1;
        debug!(
            module = self.module.key,
            configured = config.is_some(),
            "dialog opened"
        );
        true
    }

    pub fn is_open(&self) -> bool {
        self.state.open
    }

    pub fn step(&self) -> DialogStep {
        self.state.step
    }

    pub fn baseline(&self) -> &FormData {
        &self.state.baseline
    }

    pub fn current(&self) -> &FormData {
        &self.state.current
    }

    pub fn commit_error(&self) -> Option<&str> {
        self.state.commit_error.as_deref()
    }

    /// A save started in this session is still waiting for the sink.
    pub fn is_committing(&self) -> bool {
        self.state.open && self.in_flight == Some(self.state.session)
    }

    /// A save is waiting for the sink, whether or not the dialog was closed
    /// since it started.
    pub fn has_commit_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Changes since the dialog opened, in catalog order.
    pub fn changes(&self) -> Vec<ChangeItem<C, G>> {
        compute_diff(
            self.module.catalog,
            &self.state.baseline,
            &self.state.current,
        )
    }

    pub fn has_changes(&self) -> bool {
        self.module.catalog.fields().iter().any(|field| {
            self.state.baseline.value(field.key) != self.state.current.value(field.key)
        })
    }

    /// Whether the review control should be enabled.
    pub fn can_request_review(&self) -> bool {
        self.state.open
            && self.state.step == DialogStep::Edit
            && !self.is_committing()
            && self.has_changes()
    }

    pub fn set_field_value(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), DialogError> {
        self.ensure_idle_in(DialogStep::Edit)?;
        if !self.module.catalog.contains(key) {
            return Err(DialogError::UnknownField {
                module: self.module.key,
                key: key.to_string(),
            });
        }
        self.state.current.assign(key, value);
        Ok(())
    }

    pub fn request_review(&mut self) -> Result<(), DialogError> {
        self.ensure_idle_in(DialogStep::Edit)?;
        if !self.has_changes() {
            return Err(DialogError::NothingToReview);
        }
        self.state.commit_error = None;
        self.state.step = DialogStep::Confirm;
        debug!(
            module = self.module.key,
            changes = self.changes().len(),
            "review requested"
        );
        Ok(())
    }

    pub fn go_back(&mut self) -> Result<(), DialogError> {
        self.ensure_idle_in(DialogStep::Confirm)?;
        self.state.commit_error = None;
        self.state.step = DialogStep::Edit;
        debug!(module = self.module.key, "back to edit");
        Ok(())
    }

    /// Starts a commit of the complete current values.
    ///
    /// At most one commit can be in flight per dialog. Until its ticket is
    /// settled, further commits are refused even across close and reopen;
    /// edits and back navigation are refused while it belongs to the open
    /// session.
    pub fn begin_commit(&mut self) -> Result<CommitTicket, DialogError> {
        self.ensure_idle_in(DialogStep::Confirm)?;
        if self.in_flight.is_some() {
            return Err(DialogError::CommitInFlight);
        }
        if !self.has_changes() {
            return Err(DialogError::NothingToReview);
        }
        let session = self.state.session;
        self.in_flight = Some(session);
        self.state.commit_error = None;
        Ok(CommitTicket {
            session,
            payload: self.state.current.clone(),
        })
    }

    /// Applies the sink's answer for `ticket`. Answers for a dialog that was
    /// closed (or closed and reopened) in the meantime are dropped.
    pub fn settle_commit(
        &mut self,
        ticket: CommitTicket,
        result: Result<(), SinkError>,
    ) -> CommitOutcome {
        if self.in_flight != Some(ticket.session) {
            warn!(module = self.module.key, "ignoring result for a settled commit");
            return CommitOutcome::Ignored;
        }
        self.in_flight = None;
        if !self.state.open || self.state.session != ticket.session {
            warn!(module = self.module.key, "ignoring late commit result");
            return CommitOutcome::Ignored;
        }
        match result {
            Ok(()) => {
                info!(module = self.module.key, "module configuration saved");
                self.reset();
                CommitOutcome::Committed {
                    message: self.module.success_message,
                }
            }
            Err(err) => {
                warn!(module = self.module.key, error = %err, "module configuration rejected");
                self.state.commit_error = Some(err.message.clone());
                CommitOutcome::Failed {
                    message: err.message,
                }
            }
        }
    }

    /// Submits the current values through the module's sink and settles the
    /// result. Dropping the future before it resolves releases the commit.
    pub async fn commit(&mut self) -> Result<CommitOutcome, DialogError> {
        let ticket = self.begin_commit()?;
        let sink = Arc::clone(&self.sink);
        let module = self.module.key;
        let result = {
            let guard = InFlightGuard {
                slot: &mut self.in_flight,
                session: ticket.session,
                armed: true,
            };
            let result = sink.configure(module, &ticket.payload).await;
            guard.disarm();
            result
        };
        Ok(self.settle_commit(ticket, result))
    }

    /// Discards everything and closes. Always allowed; a commit still in
    /// flight will have its result ignored.
    pub fn close(&mut self) {
        if self.in_flight.is_some() {
            warn!(module = self.module.key, "closing with a save in flight");
        }
        self.reset();
        debug!(module = self.module.key, "dialog closed");
    }

    pub fn edit_sections(&self) -> Vec<EditSection<'_, C, G>> {
        view::edit_sections(self.module.catalog, &self.state.current, &self.options)
    }

    pub fn review_entries(&self) -> Vec<ReviewEntry<C, G>> {
        view::review_entries(self.changes(), &self.options)
    }

    fn ensure_idle_in(&self, expected: DialogStep) -> Result<(), DialogError> {
        if !self.state.open {
            return Err(DialogError::NotOpen {
                module: self.module.key,
            });
        }
        if self.is_committing() {
            return Err(DialogError::CommitInFlight);
        }
        if self.state.step != expected {
            return Err(DialogError::WrongStep {
                expected,
                actual: self.state.step,
            });
        }
        Ok(())
    }

    fn reset(&mut self) {
        let empty = empty_form_data(self.module.catalog);
        self.state = DialogState {
            open: false,
            step: DialogStep::Edit,
            baseline: empty.clone(),
            current: empty,
            commit_error: None,
            session: self.state.session + 1,
        };
    }
}

/// Clears the in-flight marker when a `commit` future is dropped before the
/// sink answered.
struct InFlightGuard<'a> {
    slot: &'a mut Option<u64>,
    session: u64,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed && *self.slot == Some(self.session) {
            *self.slot = None;
        }
    }
}

#[cfg(test)]
mod tests;
