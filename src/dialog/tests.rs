use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::executor::block_on;
use futures::FutureExt;
use once_cell::sync::Lazy;

use super::*;
use crate::catalog::test_support::*;
use crate::form_data::ModuleConfig;
use crate::options::AccountSetRecord;

static CATALOG: Lazy<FieldCatalog<TestCategory, TestGroup>> = Lazy::new(catalog_ab);

#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<(String, FormData)>>,
    failure: Option<String>,
}

impl RecordingSink {
    fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    fn calls(&self) -> Vec<(String, FormData)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl ConfigureModule for RecordingSink {
    async fn configure(&self, module: &str, input: &FormData) -> Result<(), SinkError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((module.to_string(), input.clone()));
        match &self.failure {
            Some(message) => Err(SinkError::new(message.clone())),
            None => Ok(()),
        }
    }
}

/// Records the call, then never answers.
#[derive(Default)]
struct StalledSink {
    calls: Mutex<usize>,
}

#[async_trait]
impl ConfigureModule for StalledSink {
    async fn configure(&self, _module: &str, _input: &FormData) -> Result<(), SinkError> {
        *self.calls.lock().expect("calls lock") += 1;
        futures::future::pending::<()>().await;
        Ok(())
    }
}

fn descriptor() -> ModuleDescriptor<TestCategory, TestGroup> {
    ModuleDescriptor {
        key: "test",
        title: "Test",
        catalog: &CATALOG,
        success_message: "Test module configuration updated",
    }
}

fn dialog_with(sink: Arc<RecordingSink>) -> ReconciliationDialog<TestCategory, TestGroup> {
    ReconciliationDialog::new(descriptor(), sink)
}

fn stored(a: &str, b: &str) -> ModuleConfig {
    ModuleConfig::new().with_entry("a", a).with_entry("b", b)
}

#[test]
fn starts_closed_with_empty_values() {
    let dialog = dialog_with(Arc::default());
    assert!(!dialog.is_open());
    assert_eq!(dialog.step(), DialogStep::Edit);
    assert_eq!(dialog.current().value("a"), "");
    assert_eq!(dialog.current().len(), 2);
    assert!(!dialog.can_request_review());
}

#[test]
fn opening_seeds_baseline_and_current() {
    let mut dialog = dialog_with(Arc::default());
    assert!(dialog.open(Some(&stored("1", "2"))));
    assert!(dialog.is_open());
    assert_eq!(dialog.baseline(), dialog.current());
    assert_eq!(dialog.current().value("b"), "2");
    assert!(!dialog.has_changes());
}

#[test]
fn review_requires_a_change() {
    let mut dialog = dialog_with(Arc::default());
    dialog.open(None::<&ModuleConfig>);
    assert_eq!(dialog.request_review(), Err(DialogError::NothingToReview));
    assert_eq!(dialog.step(), DialogStep::Edit);

    dialog.set_field_value("a", "1").expect("edit");
    assert!(dialog.can_request_review());
    dialog.request_review().expect("review");
    assert_eq!(dialog.step(), DialogStep::Confirm);
}

#[test]
fn reverting_an_edit_disables_review_again() {
    let mut dialog = dialog_with(Arc::default());
    dialog.open(Some(&stored("1", "")));
    dialog.set_field_value("a", "9").expect("edit");
    dialog.set_field_value("a", "1").expect("revert");
    assert!(!dialog.can_request_review());
    assert!(dialog.changes().is_empty());
}

#[test]
fn going_back_keeps_edits() {
    let mut dialog = dialog_with(Arc::default());
    dialog.open(Some(&stored("1", "")));
    dialog.set_field_value("b", "2").expect("edit");
    dialog.request_review().expect("review");
    let before = dialog.current().clone();

    dialog.go_back().expect("back");
    assert_eq!(dialog.step(), DialogStep::Edit);
    assert_eq!(dialog.current(), &before);
    assert_eq!(dialog.changes().len(), 1);
}

#[test]
fn edits_are_refused_on_the_confirm_step() {
    let mut dialog = dialog_with(Arc::default());
    dialog.open(None::<&ModuleConfig>);
    dialog.set_field_value("a", "1").expect("edit");
    dialog.request_review().expect("review");
    assert_eq!(
        dialog.set_field_value("a", "2"),
        Err(DialogError::WrongStep {
            expected: DialogStep::Edit,
            actual: DialogStep::Confirm,
        })
    );
    assert_eq!(dialog.current().value("a"), "1");
}

#[test]
fn closing_discards_everything() {
    let mut dialog = dialog_with(Arc::default());
    dialog.open(Some(&stored("1", "2")));
    dialog.set_field_value("a", "3").expect("edit");
    dialog.request_review().expect("review");

    dialog.close();
    assert!(!dialog.is_open());
    assert_eq!(dialog.step(), DialogStep::Edit);
    assert_eq!(dialog.current().value("a"), "");
    assert_eq!(dialog.baseline().value("b"), "");
    assert!(dialog.commit_error().is_none());
}

#[test]
fn commit_submits_every_field() {
    let sink = Arc::new(RecordingSink::default());
    let mut dialog = dialog_with(Arc::clone(&sink));
    dialog.open(Some(&stored("1", "")));
    dialog.set_field_value("b", "2").expect("edit");
    dialog.request_review().expect("review");

    let outcome = block_on(dialog.commit()).expect("commit");
    assert_eq!(
        outcome,
        CommitOutcome::Committed {
            message: "Test module configuration updated"
        }
    );

    let calls = sink.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "test");
    assert_eq!(calls[0].1.value("a"), "1");
    assert_eq!(calls[0].1.value("b"), "2");
    assert_eq!(calls[0].1.len(), 2);

    assert!(!dialog.is_open());
    assert_eq!(dialog.current().value("b"), "");
}

#[test]
fn commit_is_only_available_after_review() {
    let sink = Arc::new(RecordingSink::default());
    let mut dialog = dialog_with(Arc::clone(&sink));
    dialog.open(None::<&ModuleConfig>);
    dialog.set_field_value("a", "1").expect("edit");

    assert!(matches!(
        block_on(dialog.commit()),
        Err(DialogError::WrongStep { .. })
    ));
    assert!(sink.calls().is_empty());
}

#[test]
fn only_one_commit_can_be_in_flight() {
    let mut dialog = dialog_with(Arc::default());
    dialog.open(None::<&ModuleConfig>);
    dialog.set_field_value("a", "1").expect("edit");
    dialog.request_review().expect("review");

    let ticket = dialog.begin_commit().expect("first commit");
    assert!(dialog.is_committing());
    assert!(!dialog.can_request_review());
    assert_eq!(dialog.begin_commit().unwrap_err(), DialogError::CommitInFlight);
    assert_eq!(dialog.go_back(), Err(DialogError::CommitInFlight));

    let outcome = dialog.settle_commit(ticket, Ok(()));
    assert!(matches!(outcome, CommitOutcome::Committed { .. }));
    assert!(!dialog.is_committing());
}

#[test]
fn a_commit_in_flight_blocks_further_sink_calls_across_reopen() {
    let sink = Arc::new(RecordingSink::default());
    let mut dialog = dialog_with(Arc::clone(&sink));
    dialog.open(None::<&ModuleConfig>);
    dialog.set_field_value("a", "1").expect("edit");
    dialog.request_review().expect("review");

    // host-driven commit: the sink has been called but not settled yet
    let ticket = dialog.begin_commit().expect("first commit");
    block_on(sink.configure("test", &ticket.payload)).expect("first call");
    assert_eq!(
        block_on(dialog.commit()).unwrap_err(),
        DialogError::CommitInFlight
    );

    dialog.close();
    assert!(dialog.open(None::<&ModuleConfig>));
    assert!(!dialog.is_committing());
    assert!(dialog.has_commit_in_flight());
    dialog.set_field_value("a", "2").expect("edit after reopen");
    dialog.request_review().expect("review after reopen");
    assert_eq!(
        block_on(dialog.commit()).unwrap_err(),
        DialogError::CommitInFlight
    );
    assert_eq!(sink.calls().len(), 1);

    assert_eq!(dialog.settle_commit(ticket, Ok(())), CommitOutcome::Ignored);
    assert!(!dialog.has_commit_in_flight());
    assert_eq!(dialog.step(), DialogStep::Confirm);
    assert_eq!(dialog.current().value("a"), "2");

    let outcome = block_on(dialog.commit()).expect("second commit");
    assert!(matches!(outcome, CommitOutcome::Committed { .. }));
    let calls = sink.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].1.value("a"), "2");
}

#[test]
fn dropping_an_unfinished_commit_releases_it() {
    let sink = Arc::new(StalledSink::default());
    let mut dialog = ReconciliationDialog::new(descriptor(), sink.clone());
    dialog.open(None::<&ModuleConfig>);
    dialog.set_field_value("a", "1").expect("edit");
    dialog.request_review().expect("review");

    assert!(dialog.commit().now_or_never().is_none());
    assert_eq!(*sink.calls.lock().expect("calls lock"), 1);
    assert!(!dialog.has_commit_in_flight());
    assert_eq!(dialog.step(), DialogStep::Confirm);
    assert!(dialog.begin_commit().is_ok());
}

#[test]
fn failed_commit_stays_on_confirm_with_message() {
    let sink = Arc::new(RecordingSink::failing("chart of accounts not found"));
    let mut dialog = dialog_with(Arc::clone(&sink));
    dialog.open(Some(&stored("1", "")));
    dialog.set_field_value("b", "2").expect("edit");
    dialog.request_review().expect("review");

    let outcome = block_on(dialog.commit()).expect("commit attempt");
    assert_eq!(
        outcome,
        CommitOutcome::Failed {
            message: "chart of accounts not found".to_string()
        }
    );
    assert!(dialog.is_open());
    assert_eq!(dialog.step(), DialogStep::Confirm);
    assert_eq!(dialog.commit_error(), Some("chart of accounts not found"));
    assert_eq!(dialog.current().value("b"), "2");
    assert_eq!(dialog.baseline().value("b"), "");

    // retry is allowed; backing out clears the message
    assert!(!dialog.is_committing());
    dialog.go_back().expect("back");
    assert!(dialog.commit_error().is_none());
}

#[test]
fn results_for_a_closed_dialog_are_ignored() {
    let mut dialog = dialog_with(Arc::default());
    dialog.open(None::<&ModuleConfig>);
    dialog.set_field_value("a", "1").expect("edit");
    dialog.request_review().expect("review");
    let ticket = dialog.begin_commit().expect("commit");

    dialog.close();
    assert_eq!(
        dialog.settle_commit(ticket.clone(), Err(SinkError::new("late"))),
        CommitOutcome::Ignored
    );
    assert!(dialog.commit_error().is_none());

    dialog.open(Some(&stored("7", "")));
    assert_eq!(dialog.settle_commit(ticket, Ok(())), CommitOutcome::Ignored);
    assert!(dialog.is_open());
    assert_eq!(dialog.current().value("a"), "7");
}

#[test]
fn unknown_fields_are_rejected_without_side_effects() {
    let mut dialog = dialog_with(Arc::default());
    dialog.open(None::<&ModuleConfig>);
    let before = dialog.current().clone();
    assert_eq!(
        dialog.set_field_value("zzz", "1"),
        Err(DialogError::UnknownField {
            module: "test",
            key: "zzz".to_string()
        })
    );
    assert_eq!(dialog.current(), &before);
}

#[test]
fn closed_dialogs_refuse_edits() {
    let mut dialog = dialog_with(Arc::default());
    assert_eq!(
        dialog.set_field_value("a", "1"),
        Err(DialogError::NotOpen { module: "test" })
    );
}

#[test]
fn reopening_while_open_keeps_edits() {
    let mut dialog = dialog_with(Arc::default());
    dialog.open(Some(&stored("1", "")));
    dialog.set_field_value("a", "5").expect("edit");

    assert!(!dialog.open(Some(&stored("9", "9"))));
    assert_eq!(dialog.current().value("a"), "5");
    assert_eq!(dialog.baseline().value("a"), "1");
}

#[test]
fn dialogs_do_not_share_state() {
    let mut first = dialog_with(Arc::default());
    let mut second = dialog_with(Arc::default());
    first.open(None::<&ModuleConfig>);
    second.open(None::<&ModuleConfig>);
    first.set_field_value("a", "1").expect("edit");

    assert_eq!(second.current().value("a"), "");
    assert!(!second.has_changes());
}

#[test]
fn option_failures_disable_fields_but_not_the_workflow() {
    let mut dialog = dialog_with(Arc::default());
    dialog.load_options(Err::<Vec<AccountSetRecord>, _>("service unavailable"));
    assert!(dialog.options_errored());
    dialog.open(None::<&ModuleConfig>);

    let sections = dialog.edit_sections();
    assert!(sections
        .iter()
        .flat_map(|section| section.fields.iter())
        .all(|field| field.disabled));

    dialog.set_field_value("a", "1").expect("edit");
    dialog.request_review().expect("review");
}

#[test]
fn edit_sections_follow_group_order() {
    let mut dialog = dialog_with(Arc::default());
    dialog.load_options(Ok::<_, String>(vec![
        AccountSetRecord::new("1141", "Receivables", "asset"),
        AccountSetRecord::new("2110", "Deposits", "liability"),
    ]));
    dialog.open(Some(&stored("1141", "")));

    let sections = dialog.edit_sections();
    let layout: Vec<_> = sections
        .iter()
        .map(|section| {
            (
                section.group.title_key,
                section
                    .fields
                    .iter()
                    .map(|field| (field.descriptor.key, field.value, field.disabled))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    assert_eq!(
        layout,
        vec![
            ("main", vec![("a", "1141", false)]),
            ("extra", vec![("b", "", false)]),
        ]
    );
}

#[test]
fn review_entries_resolve_labels() {
    let mut dialog = dialog_with(Arc::default());
    dialog.load_options(Ok::<_, String>(vec![AccountSetRecord::new(
        "2110", "Deposits", "liability",
    )]));
    dialog.open(Some(&stored("1", "")));
    dialog.set_field_value("a", "9999.00.0001").expect("edit");
    dialog.set_field_value("b", "2110").expect("edit");
    dialog.request_review().expect("review");

    let entries = dialog.review_entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].to_label, "9999.00.0001");
    assert!(entries[1].from_is_empty());
    assert_eq!(entries[1].to_label, "Deposits - 2110");
}

#[test]
fn type_erased_sessions_drive_the_same_workflow() {
    let sink = Arc::new(RecordingSink::default());
    let mut session: Box<dyn DialogSession> = Box::new(dialog_with(Arc::clone(&sink)));
    session.open(None);

    let applied = session
        .apply(&crate::form_data::default_form_data(&CATALOG))
        .expect("apply defaults");
    assert_eq!(applied, 2);
    assert_eq!(session.review().len(), 2);
    assert_eq!(
        session.field("a").expect("field a").category,
        "asset"
    );

    session.request_review().expect("review");
    let outcome = block_on(session.commit()).expect("commit");
    assert!(matches!(outcome, CommitOutcome::Committed { .. }));
    assert_eq!(sink.calls()[0].1.value("b"), "2000");
}
