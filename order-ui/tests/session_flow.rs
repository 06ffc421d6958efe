//! End-to-end console flows over an in-memory store and a recording sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use order_core::calculations::CurrencyFormat;
use order_core::db::{DEFAULT_SNAPSHOT_KEY, KeyValueStore, MemoryStore, PersistenceMirror};
use order_core::form::{FixedClock, OrderForm, SubmissionState};
use order_core::models::{KitCatalog, Notification, OrderDraft, SubmissionPayload};
use order_core::sink::{Delivery, OrderSink, SinkError};
use order_ui::console::{Console, ConsoleEvent, Flow};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<SubmissionPayload>>,
    fail: AtomicBool,
}

impl RecordingSink {
    fn sent(&self) -> Vec<SubmissionPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderSink for RecordingSink {
    async fn send(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<Delivery, SinkError> {
        self.sent.lock().unwrap().push(payload.clone());
        if self.fail.load(Ordering::SeqCst) {
            Err(SinkError::Transport("connection reset".to_string()))
        } else {
            Ok(Delivery::Unverified)
        }
    }
}

struct Harness {
    console: Console<Vec<u8>>,
    sink: Arc<RecordingSink>,
    kv: Arc<MemoryStore>,
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn harness() -> Harness {
    let catalog = Arc::new(KitCatalog::default());
    let kv = Arc::new(MemoryStore::new());
    let mirror = PersistenceMirror::new(kv.clone(), DEFAULT_SNAPSHOT_KEY, catalog.clone());
    let form = OrderForm::new(
        catalog,
        Arc::new(mirror),
        Arc::new(FixedClock(today())),
        CurrencyFormat::default(),
    );
    let sink = Arc::new(RecordingSink::default());
    let console = Console::new(form, sink.clone(), Duration::from_secs(3), Vec::new());
    Harness { console, sink, kv }
}

impl Harness {
    async fn type_lines(
        &mut self,
        lines: &[&str],
    ) {
        for line in lines {
            assert_eq!(self.console.handle_line(line).await.unwrap(), Flow::Continue);
        }
    }

    async fn fill_valid_order(&mut self) {
        self.type_lines(&[
            "set company Surya Traders",
            "set gst 27AAPFU0939F1ZV",
            "set mobile 9876543210",
            "set email orders@surya.example",
            "set billing 12 MG Road, Pune",
            "set shipping Plot 4, MIDC, Pune",
            "inc kit3",
            "inc kit3",
            "inc kit4",
        ])
        .await;
    }

    async fn pump_event(&mut self) {
        let event = self.console.next_event().await.expect("event channel open");
        self.console.handle_event(event).await.unwrap();
    }

    fn output(&self) -> String {
        String::from_utf8_lossy(self.console.output()).into_owned()
    }

    fn state(&self) -> SubmissionState {
        self.console.form().submission_state()
    }
}

#[tokio::test(start_paused = true)]
async fn successful_order_is_sent_once_then_cleared_after_delay() {
    let mut h = harness();
    h.fill_valid_order().await;

    h.type_lines(&["submit", "submit"]).await;
    assert_eq!(h.state(), SubmissionState::Submitting);

    h.pump_event().await;
    assert_eq!(h.state(), SubmissionState::Succeeded);
    assert!(h.output().contains("✔ Your order has been submitted successfully!"));

    h.type_lines(&["submit"]).await;
    assert_eq!(h.sink.sent().len(), 1);

    let before = tokio::time::Instant::now();
    h.pump_event().await;
    assert!(before.elapsed() >= Duration::from_secs(3));

    let form = h.console.form();
    assert_eq!(form.draft(), &OrderDraft::blank(form.catalog(), today()));
    assert_eq!(form.notification(), &Notification::None);
    assert_eq!(h.state(), SubmissionState::Idle);
    assert_eq!(h.kv.get(DEFAULT_SNAPSHOT_KEY).await.unwrap(), None);

    let sent = h.sink.sent();
    assert_eq!(sent[0].company_name, "Surya Traders");
    assert_eq!(sent[0].quantities.get("kit3Qty"), Some(&2));
    assert_eq!(sent[0].subtotal, "₹4,04,000");
    assert_eq!(sent[0].tax, "₹48,480");
    assert_eq!(sent[0].grand_total, "₹4,52,480");
    assert_eq!(sent[0].payment_proof_filename, "No file uploaded");
}

#[tokio::test]
async fn invalid_order_is_never_sent() {
    let mut h = harness();
    h.fill_valid_order().await;
    h.type_lines(&["set mobile 12345"]).await;

    h.type_lines(&["submit"]).await;

    assert_eq!(h.state(), SubmissionState::Idle);
    assert!(h.sink.sent().is_empty());
    assert!(
        h.output()
            .contains("Please enter a valid 10-digit Indian mobile number (starts with 6,7,8,9).")
    );
}

#[tokio::test]
async fn failed_send_keeps_form_for_retry() {
    let mut h = harness();
    h.fill_valid_order().await;
    h.sink.fail.store(true, Ordering::SeqCst);

    h.type_lines(&["submit"]).await;
    h.pump_event().await;

    assert_eq!(h.state(), SubmissionState::Failed);
    assert!(
        h.output()
            .contains("✖ There was an error submitting your order. Please try again.")
    );
    assert_eq!(h.console.form().draft().company_name, "Surya Traders");
    assert!(h.kv.get(DEFAULT_SNAPSHOT_KEY).await.unwrap().is_some());

    h.sink.fail.store(false, Ordering::SeqCst);
    h.type_lines(&["submit"]).await;
    h.pump_event().await;

    assert_eq!(h.state(), SubmissionState::Succeeded);
    assert_eq!(h.sink.sent().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn stale_reset_timer_does_not_clear_next_order() {
    let mut h = harness();
    h.fill_valid_order().await;
    h.type_lines(&["submit"]).await;
    h.pump_event().await;
    tokio::time::advance(Duration::from_secs(1)).await;

    h.type_lines(&["reset --yes"]).await;
    h.fill_valid_order().await;
    h.type_lines(&["submit"]).await;
    h.pump_event().await;
    assert_eq!(h.state(), SubmissionState::Succeeded);

    // first timer: belongs to the earlier order
    h.pump_event().await;
    assert_eq!(h.state(), SubmissionState::Succeeded);
    assert_eq!(h.console.form().draft().company_name, "Surya Traders");

    h.pump_event().await;
    assert_eq!(h.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn reset_asks_for_confirmation() {
    let mut h = harness();
    h.type_lines(&["set company Surya Traders", "reset", "n"]).await;
    assert_eq!(h.console.form().draft().company_name, "Surya Traders");

    h.type_lines(&["reset", "y"]).await;
    assert_eq!(h.console.form().draft().company_name, "");
    assert_eq!(h.kv.get(DEFAULT_SNAPSHOT_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn attach_records_file_name_only() {
    let mut h = harness();
    let path = std::env::temp_dir().join(format!("payment-proof-{}.pdf", std::process::id()));
    std::fs::write(&path, b"%PDF").unwrap();

    let line = format!("attach {}", path.display());
    h.type_lines(&[line.as_str()]).await;

    assert_eq!(
        h.console.form().draft().attachment.as_deref(),
        path.file_name().and_then(|n| n.to_str())
    );

    h.type_lines(&["detach", "attach /no/such/proof.pdf"]).await;
    assert_eq!(h.console.form().draft().attachment, None);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn run_processes_script_until_quit() {
    let mut h = harness();
    let script: &[u8] = b"set company Surya Traders\ninc kit5\nshow\nquit\nset company ignored\n";

    h.console.run(script).await.unwrap();

    assert_eq!(h.console.form().draft().company_name, "Surya Traders");
    let output = h.output();
    assert!(output.contains("kit5: 1 × ₹1,94,000 = ₹1,94,000"));
    assert!(output.contains("Grand total   ₹2,17,280"));
}

#[tokio::test]
async fn run_waits_for_pending_send_at_end_of_input() {
    let mut h = harness();
    h.fill_valid_order().await;
    let script: &[u8] = b"submit\n";

    h.console.run(script).await.unwrap();

    assert_eq!(h.sink.sent().len(), 1);
    assert!(h.output().contains("✔ Your order has been submitted successfully!"));
    assert_eq!(h.state(), SubmissionState::Idle);
    assert_eq!(h.kv.get(DEFAULT_SNAPSHOT_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn quit_after_success_does_not_restore_sent_order() {
    let mut h = harness();
    h.fill_valid_order().await;
    let script: &[u8] = b"submit\nquit\n";

    h.console.run(script).await.unwrap();

    assert_eq!(h.sink.sent().len(), 1);
    assert_eq!(h.console.form().draft().company_name, "");
    assert_eq!(h.kv.get(DEFAULT_SNAPSHOT_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn quit_after_failure_keeps_draft_for_next_start() {
    let mut h = harness();
    h.fill_valid_order().await;
    h.sink.fail.store(true, Ordering::SeqCst);
    let script: &[u8] = b"submit\nquit\n";

    h.console.run(script).await.unwrap();

    assert_eq!(h.state(), SubmissionState::Failed);
    assert!(h.kv.get(DEFAULT_SNAPSHOT_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn explicit_event_for_unknown_generation_is_ignored() {
    let mut h = harness();
    h.fill_valid_order().await;

    h.console
        .handle_event(ConsoleEvent::ResetDue { generation: 7 })
        .await
        .unwrap();

    assert_eq!(h.console.form().draft().company_name, "Surya Traders");
}
