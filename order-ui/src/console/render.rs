use std::fmt::Write;

use order_core::form::{FieldName, FieldStore, OrderForm, SubmissionState};
use order_core::models::{NO_FILE_UPLOADED, Notification};
use order_core::validation::FieldState;

const RULE_WIDTH: usize = 56;

fn section(
    out: &mut String,
    title: &str,
) {
    let fill = RULE_WIDTH.saturating_sub(title.chars().count() + 4);
    let _ = writeln!(out, "── {title} {}", "─".repeat(fill));
}

/// The whole form: fields, kit steppers, summary and any banner.
///
/// Fields that failed the last validation are marked with `!`.
pub fn render(form: &OrderForm) -> String {
    let mut out = String::new();
    let draft = form.draft();

    section(&mut out, "Order");
    for field in FieldName::REQUIRED.iter() {
        let marker = match form.field_state(field) {
            FieldState::Invalid => '!',
            FieldState::Normal => ' ',
        };
        let _ = writeln!(
            out,
            "{marker} {:<18}{:<10} {}",
            field.label(),
            format!("[{}]", field.key()),
            draft.get(field)
        );
    }
    let proof = draft
        .attachment()
        .unwrap_or_else(|| NO_FILE_UPLOADED.to_string());
    let _ = writeln!(out, "  {:<18}{:<10} {proof}", FieldName::Attachment.label(), "[proof]");

    section(&mut out, "Kits");
    let text = form.summary_text();
    for kit in form.catalog().kits() {
        let line = text.line(&kit.id).unwrap_or_default();
        let _ = writeln!(out, "  {:<8}{:<12}{line}", kit.id.as_str(), kit.label);
    }

    section(&mut out, "Summary");
    let _ = writeln!(out, "  Total units   {}", text.total_units);
    let _ = writeln!(out, "  Subtotal      {}", text.subtotal);
    let _ = writeln!(out, "  GST (12%)     {}", text.tax);
    let _ = writeln!(out, "  Grand total   {}", text.grand_total);

    if form.submission_state() == SubmissionState::Submitting {
        let _ = writeln!(out, "\n  [ Submitting... ]");
    }
    if let Some(banner) = banner(form.notification()) {
        let _ = writeln!(out, "\n{banner}");
    }
    out
}

/// One-line banner for the visible notification, if any.
pub fn banner(notification: &Notification) -> Option<String> {
    match notification {
        Notification::None => None,
        Notification::Success(text) => Some(format!("✔ {text}")),
        Notification::Error(text) => Some(format!("✖ {text}")),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use order_core::calculations::CurrencyFormat;
    use order_core::db::{DEFAULT_SNAPSHOT_KEY, MemoryStore, PersistenceMirror};
    use order_core::form::FixedClock;
    use order_core::models::{KitCatalog, KitId};
    use pretty_assertions::assert_eq;

    use super::*;

    fn form() -> OrderForm {
        let catalog = Arc::new(KitCatalog::default());
        let mirror = PersistenceMirror::new(
            Arc::new(MemoryStore::new()),
            DEFAULT_SNAPSHOT_KEY,
            catalog.clone(),
        );
        OrderForm::new(
            catalog,
            Arc::new(mirror),
            Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())),
            CurrencyFormat::default(),
        )
    }

    #[tokio::test]
    async fn shows_summary_lines_and_totals() {
        let mut form = form();
        form.increment(&KitId::from("kit3")).await;
        form.increment(&KitId::from("kit3")).await;
        form.increment(&KitId::from("kit4")).await;

        let screen = render(&form);

        assert!(screen.contains("kit3    3 kW Kit    2 × ₹1,21,000 = ₹2,42,000"));
        assert!(screen.contains("Grand total   ₹4,52,480"));
        assert!(screen.contains("No file uploaded"));
    }

    #[tokio::test]
    async fn marks_invalid_fields_and_shows_error_banner() {
        let mut form = form();
        let _ = form.begin_submit();

        let screen = render(&form);

        assert!(screen.contains("! Company name"));
        assert!(screen.contains("  Order date"));
        assert!(screen.contains("✖ Please enter a valid 10-digit Indian mobile number"));
    }

    #[test]
    fn banner_per_notification_kind() {
        assert_eq!(banner(&Notification::None), None);
        assert_eq!(
            banner(&Notification::Success("done".to_string())),
            Some("✔ done".to_string())
        );
    }
}
