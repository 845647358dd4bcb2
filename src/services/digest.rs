use std::fmt::Write;

use crate::services::reminder_job::ReminderCandidate;

pub const DIGEST_SUBJECT: &str = "College application tasks need your attention";
pub const MAX_ITEMS_PER_SECTION: usize = 10;

fn render_section(out: &mut String, heading: &str, items: &[ReminderCandidate]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{} ({}):", heading, items.len());
    for item in items.iter().take(MAX_ITEMS_PER_SECTION) {
        let _ = writeln!(out, "- {} (due {})", item.title, item.due.format("%Y-%m-%d"));
    }
    if items.len() > MAX_ITEMS_PER_SECTION {
        let _ = writeln!(out, "...and {} more", items.len() - MAX_ITEMS_PER_SECTION);
    }
    out.push('\n');
}

/// Plain-text body listing a student's overdue and due-soon tasks.
pub fn render_digest(overdue: &[ReminderCandidate], due_soon: &[ReminderCandidate]) -> String {
    let mut out = String::from("Hi,\n\nHere is a summary of your college application tasks.\n\n");
    render_section(&mut out, "Overdue", overdue);
    render_section(&mut out, "Due soon", due_soon);
    out.push_str("Log in to your dashboard to review and update your tasks.\n");
    out
}
