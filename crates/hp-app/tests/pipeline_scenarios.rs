mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use hp_app::usecases::RestoreOutcome;
use hp_core::content::ContentKind;
use hp_core::error::{ConversionError, MalformedTableError, PipelineError};
use hp_core::pipeline::{PipelineStage, SkipReason};
use hp_core::target::{HostFamily, InsertTarget};
use hp_core::{PipelineResult, TargetApplication};
use support::*;
use tokio::sync::Notify;

#[tokio::test]
async fn scenario_a_markdown_is_inserted_into_word() {
    let h = Harness::new(
        FakeClipboard::with_text("# Title\n\nHello **world**"),
        FakeConverter::default(),
        FakeInspector::running(&[(100, "WINWORD.EXE")], Some(100)),
        |_| {},
    );

    let report = h.coordinator.run_once().await;

    assert_eq!(report.result, PipelineResult::Success("inserted into Word".into()));
    assert_eq!(report.kind, Some(ContentKind::PlainMarkdown));
    assert_eq!(h.converter.requests.lock().unwrap().len(), 1);

    let inserted = h.host.inserted.lock().unwrap();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].0, HostFamily::MsWord);
    assert!(inserted[0].2, "document must exist while the host inserts it");
    assert_eq!(*h.focus.focused.lock().unwrap(), vec![100]);

    // temp document is cleaned up once the run is over
    assert!(!inserted[0].1.exists());
    assert!(Harness::files_in(&h.save_dir).is_empty());
    assert_eq!(h.coordinator.stage(), PipelineStage::Idle);
}

#[tokio::test]
async fn prose_starting_with_pipe_goes_to_the_converter() {
    let h = Harness::new(
        FakeClipboard::with_text("|x| denotes the absolute value of x.\n\nSee the appendix."),
        FakeConverter::default(),
        FakeInspector::running(&[(100, "WINWORD.EXE")], Some(100)),
        |_| {},
    );

    let report = h.coordinator.run_once().await;

    assert_eq!(report.kind, Some(ContentKind::PlainMarkdown));
    assert!(report.result.is_success(), "{:?}", report.result);
    assert_eq!(h.converter.requests.lock().unwrap().len(), 1);
    assert_eq!(h.host.inserted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn scenario_b_table_is_pasted_into_spreadsheet_as_tsv() {
    let h = Harness::new(
        FakeClipboard::with_text("| A | B |\n|---|---|\n| 1 | 2 |"),
        FakeConverter::default(),
        FakeInspector::running(&[(7, "EXCEL.EXE"), (8, "WINWORD.EXE")], None),
        |_| {},
    );

    let report = h.coordinator.run_once().await;

    assert_eq!(report.result, PipelineResult::Success("pasted into Excel".into()));
    assert!(matches!(report.target, Some(TargetApplication::Spreadsheet(ref a)) if a.pid == 7));
    assert!(h.converter.requests.lock().unwrap().is_empty());

    let writes = h.clipboard.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].plain, "A\tB\r\n1\t2\r\n");
    assert!(writes[0].html.is_some());
    assert_eq!(h.keystrokes.pastes.load(Ordering::SeqCst), 1);
    assert_eq!(report.restore, RestoreOutcome::Restored);
}

#[tokio::test]
async fn scenario_b_without_style_preservation_sends_tsv_only() {
    let h = Harness::new(
        FakeClipboard::with_text("| A | B |\n|---|---|\n| 1 | 2 |"),
        FakeConverter::default(),
        FakeInspector::running(&[(7, "et.exe")], Some(7)),
        |s| s.preserve_table_styles = false,
    );

    let report = h.coordinator.run_once().await;

    assert_eq!(
        report.result,
        PipelineResult::Success("pasted into WPS Spreadsheets".into())
    );
    assert!(h.clipboard.writes.lock().unwrap()[0].html.is_none());
}

#[tokio::test]
async fn scenario_c_malformed_table_fails_without_injection() {
    let h = Harness::new(
        FakeClipboard::with_text("| A | B |\nnot a separator"),
        FakeConverter::default(),
        FakeInspector::running(&[(7, "EXCEL.EXE")], Some(7)),
        |_| {},
    );

    let report = h.coordinator.run_once().await;

    assert!(matches!(
        report.result,
        PipelineResult::Failure(PipelineError::MalformedTable(
            MalformedTableError::BadSeparator { .. }
        ))
    ));
    assert!(h.clipboard.writes.lock().unwrap().is_empty());
    assert_eq!(h.keystrokes.pastes.load(Ordering::SeqCst), 0);
    assert_eq!(h.inspector.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.notification_count(), 1);
    assert_eq!(h.coordinator.stage(), PipelineStage::Idle);
}

#[tokio::test]
async fn scenario_d_no_target_opens_document_externally() {
    let h = Harness::new(
        FakeClipboard::with_text("# Report\n\nbody"),
        FakeConverter::default(),
        FakeInspector::running(&[(1, "explorer.exe")], Some(1)),
        |_| {},
    );

    let report = h.coordinator.run_once().await;

    match &report.result {
        PipelineResult::Success(msg) => assert!(msg.starts_with("opened externally")),
        other => panic!("unexpected result {other:?}"),
    }
    let opened = h.opener.opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].starts_with(&h.save_dir));
    assert!(opened[0].exists());
    assert_eq!(opened[0].extension().unwrap(), "docx");
}

#[tokio::test]
async fn scenario_d_table_without_target_writes_csv() {
    let h = Harness::new(
        FakeClipboard::with_text("| A | B |\n|---|---|\n| 1 | 2 |"),
        FakeConverter::default(),
        FakeInspector::running(&[], None),
        |_| {},
    );

    let report = h.coordinator.run_once().await;

    assert!(report.result.is_success());
    let opened = h.opener.opened.lock().unwrap();
    assert_eq!(opened[0].extension().unwrap(), "csv");
    let bytes = std::fs::read(&opened[0]).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBFA,B\r\n1,2\r\n"));
}

#[tokio::test]
async fn insert_target_none_opens_document_even_with_word_running() {
    let h = Harness::new(
        FakeClipboard::with_text("# Generate only"),
        FakeConverter::default(),
        FakeInspector::running(&[(100, "WINWORD.EXE")], Some(100)),
        |s| s.insert_target = InsertTarget::None,
    );

    let report = h.coordinator.run_once().await;

    assert!(report.result.is_success());
    assert_eq!(report.target, Some(TargetApplication::None));
    assert!(h.host.inserted.lock().unwrap().is_empty());
    assert_eq!(h.opener.opened.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn no_target_without_fallback_is_target_unavailable() {
    let h = Harness::new(
        FakeClipboard::with_text("plain text"),
        FakeConverter::default(),
        FakeInspector::running(&[], None),
        |s| s.open_default_app_if_no_target = false,
    );

    let report = h.coordinator.run_once().await;

    assert_eq!(
        report.result,
        PipelineResult::Failure(PipelineError::TargetUnavailable)
    );
    assert!(h.opener.opened.lock().unwrap().is_empty());
    assert!(Harness::files_in(&h.temp_dir).is_empty());
}

#[tokio::test]
async fn empty_clipboard_is_skipped_without_side_effects() {
    let h = Harness::new(
        FakeClipboard::with_text("  \n\t"),
        FakeConverter::default(),
        FakeInspector::running(&[(100, "WINWORD.EXE")], Some(100)),
        |_| {},
    );

    let report = h.coordinator.run_once().await;

    assert_eq!(
        report.result,
        PipelineResult::Skipped(SkipReason::EmptyClipboard)
    );
    assert!(h.converter.requests.lock().unwrap().is_empty());
    assert_eq!(h.inspector.calls.load(Ordering::SeqCst), 0);
    assert!(Harness::files_in(&h.temp_dir).is_empty());
    assert!(Harness::files_in(&h.save_dir).is_empty());
    assert_eq!(h.notification_count(), 1);
}

#[tokio::test]
async fn conversion_failure_is_reported_with_stderr() {
    let h = Harness::new(
        FakeClipboard::with_text("# Title"),
        FakeConverter {
            fail_with: Some(ConversionError::Failed {
                stderr: "Unknown reader".into(),
            }),
            ..Default::default()
        },
        FakeInspector::running(&[(100, "WINWORD.EXE")], Some(100)),
        |_| {},
    );

    let report = h.coordinator.run_once().await;

    let notifications = h.notifier.notifications.lock().unwrap();
    assert!(matches!(
        report.result,
        PipelineResult::Failure(PipelineError::Conversion(_))
    ));
    assert!(notifications[0].body.contains("Unknown reader"));
    assert!(h.host.inserted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_insertion_keeps_document_for_recovery() {
    let h = Harness::new(
        FakeClipboard::with_text("# Draft"),
        FakeConverter::default(),
        FakeInspector::running(&[(100, "WINWORD.EXE")], Some(100)),
        |_| {},
    );
    h.host.refuse.store(true, Ordering::SeqCst);

    let report = h.coordinator.run_once().await;

    assert!(matches!(
        report.result,
        PipelineResult::Failure(PipelineError::Injection(_))
    ));
    let kept = Harness::files_in(&h.save_dir);
    assert_eq!(kept.len(), 1);
    assert_eq!(std::fs::read(&kept[0]).unwrap(), b"PK-stub-docx");
    assert!(Harness::files_in(&h.temp_dir).is_empty());
    assert_eq!(h.coordinator.stage(), PipelineStage::Idle);
}

#[tokio::test]
async fn keep_generated_file_retains_document_in_save_dir() {
    let h = Harness::new(
        FakeClipboard::with_text("# Keep me"),
        FakeConverter::default(),
        FakeInspector::running(&[(100, "WINWORD.EXE")], Some(100)),
        |s| s.keep_generated_file = true,
    );

    let report = h.coordinator.run_once().await;

    assert!(report.result.is_success());
    let kept = Harness::files_in(&h.save_dir);
    assert_eq!(kept.len(), 1);
    assert_eq!(h.host.inserted.lock().unwrap()[0].1, kept[0]);
}

#[tokio::test]
async fn notify_flag_controls_desktop_popup_only() {
    let h = Harness::new(
        FakeClipboard::with_text("| A |\n|---|\n| 1 |"),
        FakeConverter::default(),
        FakeInspector::running(&[(7, "EXCEL.EXE")], Some(7)),
        |s| s.notify = false,
    );

    h.coordinator.run_once().await;

    let notifications = h.notifier.notifications.lock().unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(!notifications[0].show_desktop);
}

#[tokio::test]
async fn repeated_runs_classify_and_resolve_identically() {
    let h = Harness::new(
        FakeClipboard::with_text("| A | B |\n|---|---|\n| 1 | 2 |"),
        FakeConverter::default(),
        FakeInspector::running(&[(9, "wps.exe"), (7, "EXCEL.EXE")], None),
        |_| {},
    );

    let first = h.coordinator.run_once().await;
    let second = h.coordinator.run_once().await;

    assert_eq!(first.kind, second.kind);
    assert_eq!(first.target, second.target);
    assert_eq!(first.result, second.result);
    assert_eq!(h.notification_count(), 2);
}

#[tokio::test]
async fn trigger_while_busy_is_skipped_without_side_effects() {
    let started = Arc::new(Notify::new());
    let gate = Arc::new(Notify::new());
    let h = Harness::new(
        FakeClipboard::with_text("# Slow"),
        FakeConverter {
            started: Some(Arc::clone(&started)),
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        },
        FakeInspector::running(&[(100, "WINWORD.EXE")], Some(100)),
        |_| {},
    );

    let running = h.coordinator.fire().expect("first trigger accepted");
    started.notified().await;
    assert_eq!(h.coordinator.stage(), PipelineStage::Converting);

    let skipped = h.coordinator.run_once().await;
    assert_eq!(skipped.result, PipelineResult::Skipped(SkipReason::Busy));
    assert!(h.coordinator.fire().is_none());
    assert_eq!(h.clipboard.reads.load(Ordering::SeqCst), 1);
    assert_eq!(h.notification_count(), 0);

    gate.notify_one();
    let report = running.await.unwrap();
    assert!(report.result.is_success());
    assert_eq!(h.notification_count(), 1);
    assert!(!h.coordinator.is_busy());
}
