//! # Rendering Module
//!
//! Turns [`CmdResult`]s into terminal text. Colors come from `colored` and are
//! switched off when stdout is not a terminal. Layout math (column widths,
//! truncation) uses display widths from `unicode-width`, so car ids or
//! descriptions with wide characters keep the table aligned.
//!
//! JSON output bypasses all of this: the `CmdResult` is serialized as is.

use chrono::{DateTime, Utc};
use colored::Colorize;
use servlogapp::commands::{CmdMessage, CmdResult, MessageLevel};
use servlogapp::index::{DisplayDraft, DisplayLog};
use servlogapp::model::{DraftField, SavingStatus, ServiceDraft, ServiceLog};
use servlogapp::validation::DraftErrors;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::setup::OutputFormat;

/// Configuration for list rendering.
pub const DESCRIPTION_WIDTH: usize = 32;
pub const ACTIVE_MARKER: &str = "*";

/// Which shape the listed records take in text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// One line per draft.
    Drafts,
    /// Every field of a single draft, with its errors inline.
    DraftDetail,
    /// The log table.
    Logs,
    /// Every field of a single log.
    LogDetail,
}

/// Renders a full command result: records first, then validation, then notices.
pub fn render_result(result: &CmdResult, view: View, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => render_json(result),
        OutputFormat::Text => render_text(result, view),
    }
}

pub fn render_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}

fn render_text(result: &CmdResult, view: View) -> String {
    let mut out = String::new();
    let mut errors_inline = false;

    match view {
        View::DraftDetail => {
            for shown in &result.listed_drafts {
                out.push_str(&render_draft_detail(shown, &result.validation));
                errors_inline = true;
            }
        }
        View::LogDetail => {
            for shown in &result.listed_logs {
                out.push_str(&render_log_detail(shown));
            }
        }
        View::Drafts | View::Logs => {
            if !result.listed_drafts.is_empty() {
                out.push_str(&render_draft_list(&result.listed_drafts));
            }
            if !result.listed_logs.is_empty() {
                out.push_str(&render_log_table(&result.listed_logs));
            }
        }
    }

    for shown in &result.affected_drafts {
        out.push_str(&render_draft_line(shown));
        out.push('\n');
    }
    for shown in &result.affected_logs {
        out.push_str(&render_log_summary(shown));
        out.push('\n');
    }

    if !errors_inline && !result.validation.is_empty() {
        out.push_str(&render_validation(&result.validation));
    }

    out.push_str(&render_messages(&result.messages));
    out
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for msg in messages {
        let (icon, title) = match msg.level {
            MessageLevel::Success => ("✓".green(), msg.title.green()),
            MessageLevel::Info => ("ℹ".blue(), msg.title.normal()),
            MessageLevel::Warning => ("!".yellow(), msg.title.yellow()),
            MessageLevel::Error => ("✗".red(), msg.title.red().bold()),
        };
        out.push_str(&format!("{} {}\n", icon, title));
        if let Some(desc) = &msg.description {
            out.push_str(&format!("  {}\n", desc.dimmed()));
        }
    }
    out
}

pub fn render_validation(errors: &DraftErrors) -> String {
    let mut out = String::new();
    for (field, message) in errors {
        out.push_str(&format!("  {}: {}\n", field.label(), message.red()));
    }
    out
}

pub fn render_draft_list(drafts: &[DisplayDraft]) -> String {
    if drafts.is_empty() {
        return format!("{}\n", "No drafts. Start one with `servlog draft new`.".dimmed());
    }
    let mut out = String::new();
    for shown in drafts {
        out.push_str(&render_draft_line(shown));
        out.push('\n');
    }
    out
}

/// Empty log list: tells apart "nothing yet" from "nothing matches".
pub fn render_no_logs(filtered: bool) -> String {
    let text = if filtered {
        "No service logs match the current filters."
    } else {
        "No service logs."
    };
    format!("{}\n", text.dimmed())
}

fn render_draft_line(shown: &DisplayDraft) -> String {
    let d = &shown.draft;
    let marker = if shown.active { ACTIVE_MARKER } else { " " };
    let car = if d.car_id.trim().is_empty() {
        "(no car)".dimmed().to_string()
    } else {
        d.car_id.bold().to_string()
    };
    format!(
        "{} {:>3}. {} {} {} {}",
        marker.yellow(),
        shown.index,
        car,
        d.start_date,
        saving_badge(d.saving_status),
        time_ago(d.updated_at).dimmed()
    )
}

fn saving_badge(status: SavingStatus) -> String {
    match status {
        SavingStatus::Saving => "saving…".yellow().to_string(),
        SavingStatus::Saved => "saved".green().to_string(),
        SavingStatus::Idle => "idle".dimmed().to_string(),
    }
}

pub fn render_draft_detail(shown: &DisplayDraft, errors: &DraftErrors) -> String {
    let d = &shown.draft;
    let mut out = format!(
        "Draft {} {}{}\n",
        shown.index,
        short_id(&d.id.to_string()).dimmed(),
        if shown.active { " (active)".yellow().to_string() } else { String::new() }
    );
    for (field, value) in draft_fields(d) {
        let label = format!("{:<20}", field.label());
        match errors.get(&field) {
            Some(err) => out.push_str(&format!(
                "  {} {}  {}\n",
                label,
                value,
                format!("← {}", err).red()
            )),
            None => out.push_str(&format!("  {} {}\n", label, value)),
        }
    }
    out.push_str(&format!(
        "  {:<20} {} ({})\n",
        "Status",
        saving_badge(d.saving_status),
        time_ago(d.updated_at)
    ));
    out
}

fn draft_fields(d: &ServiceDraft) -> Vec<(DraftField, String)> {
    vec![
        (DraftField::ProviderId, d.provider_id.clone()),
        (DraftField::ServiceOrder, d.service_order.clone()),
        (DraftField::CarId, d.car_id.clone()),
        (DraftField::Odometer, format_number(d.odometer)),
        (DraftField::EngineHours, format_number(d.engine_hours)),
        (DraftField::StartDate, d.start_date.clone()),
        (DraftField::EndDate, d.end_date.clone()),
        (
            DraftField::Type,
            d.service_type.map(|t| t.to_string()).unwrap_or_default(),
        ),
        (DraftField::ServiceDescription, d.service_description.clone()),
    ]
}

fn format_number(n: Option<f64>) -> String {
    match n {
        Some(v) if v.is_finite() => v.to_string(),
        Some(_) => "?".to_string(),
        None => String::new(),
    }
}

const LOG_HEADERS: [&str; 9] = [
    "#", "Start", "End", "Type", "Car", "Provider", "Order", "Odometer", "Hours",
];

pub fn render_log_table(logs: &[DisplayLog]) -> String {
    let rows: Vec<[String; 10]> = logs.iter().map(log_row).collect();

    let mut widths = [0usize; 9];
    for (i, h) in LOG_HEADERS.iter().enumerate() {
        widths[i] = h.width();
    }
    for row in &rows {
        for i in 0..9 {
            widths[i] = widths[i].max(row[i].width());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = LOG_HEADERS
        .iter()
        .enumerate()
        .map(|(i, h)| pad_to_width(h, widths[i]))
        .collect();
    out.push_str(&format!("{}  {}\n", header.join("  ").bold(), "Description".bold()));

    for row in &rows {
        let cells: Vec<String> = (0..9).map(|i| pad_to_width(&row[i], widths[i])).collect();
        out.push_str(&format!(
            "{}  {}\n",
            cells.join("  "),
            truncate_to_width(&row[9], DESCRIPTION_WIDTH).dimmed()
        ));
    }
    out
}

fn log_row(shown: &DisplayLog) -> [String; 10] {
    let l = &shown.log;
    [
        shown.index.to_string(),
        l.start_date.clone(),
        l.end_date.clone(),
        l.service_type.to_string(),
        l.car_id.clone(),
        l.provider_id.clone(),
        l.service_order.clone(),
        l.odometer.to_string(),
        l.engine_hours.to_string(),
        single_line(&l.service_description),
    ]
}

fn render_log_summary(shown: &DisplayLog) -> String {
    let l = &shown.log;
    format!(
        "{:>3}. {} {} {} → {} {}",
        shown.index,
        l.car_id.bold(),
        l.service_type,
        l.start_date,
        l.end_date,
        short_id(&l.id.to_string()).dimmed()
    )
}

/// Field-by-field view of one log.
pub fn render_log_detail(shown: &DisplayLog) -> String {
    let l: &ServiceLog = &shown.log;
    let mut out = format!(
        "Service log {} {}\n",
        shown.index,
        short_id(&l.id.to_string()).dimmed()
    );
    for (field, value) in draft_fields(&l.to_draft()) {
        out.push_str(&format!("  {:<20} {}\n", field.label(), value));
    }
    out.push_str(&format!("  {:<20} {}\n", "Created", time_ago(l.created_at)));
    out
}

/// "draft 2 (TRUCK-1)", for confirmation questions.
pub fn draft_label(shown: &DisplayDraft) -> String {
    let car = shown.draft.car_id.trim();
    if car.is_empty() {
        format!("draft {}", shown.index)
    } else {
        format!("draft {} ({})", shown.index, car)
    }
}

/// "service log 1 (TRUCK-1, 2024-01-15)".
pub fn log_label(shown: &DisplayLog) -> String {
    format!(
        "service log {} ({}, {})",
        shown.index, shown.log.car_id, shown.log.start_date
    )
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn time_ago(when: DateTime<Utc>) -> String {
    let elapsed = Utc::now()
        .signed_duration_since(when)
        .to_std()
        .unwrap_or_default();
    timeago::Formatter::new().convert(elapsed)
}

/// Pads with spaces up to `width` display columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let w = s.width();
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

/// Cuts `s` to at most `max` display columns, ending with "…" when cut.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if used + cw + 1 > max {
            break;
        }
        out.push(c);
        used += cw;
    }
    out.push('…');
    out
}
