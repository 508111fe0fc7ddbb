//! Plain-text rendering of the planner views.
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Reverse;
use std::fmt::Write;

use crate::board::{BoardView, FormMode};
use crate::model::ContentPiece;
use crate::router::{Route, APP_TITLE, NAV_LINKS};

pub const EMPTY_BOARD: &str = "No content pieces yet";

/// Header line with the app title and nav links; the active one is bracketed.
pub fn render_header(active: Route) -> String {
    let links: Vec<String> = NAV_LINKS
        .iter()
        .map(|link| {
            if active.active_link().map(|a| a.href) == Some(link.href) {
                format!("[{}]({})", link.label, link.href)
            } else {
                format!("{}({})", link.label, link.href)
            }
        })
        .collect();
    format!("{APP_TITLE} | {}\n", links.join("  "))
}

pub fn render_board(view: &BoardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.title);
    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {error}");
    }
    if view.loading {
        let _ = writeln!(out, "Loading...");
        return out;
    }
    if view.card_count() == 0 {
        let _ = writeln!(out, "{EMPTY_BOARD}");
    }
    for column in &view.columns {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {} ({})", column.title, column.pieces.len());
        for piece in &column.pieces {
            let _ = writeln!(out, "  - #{} {}", piece.id, piece.title);
            if !piece.content_pillar.is_empty() {
                let _ = writeln!(out, "      pillar: {}", piece.content_pillar);
            }
        }
        let _ = writeln!(out, "  [+ add to {}]", column.title);
    }
    if let Some(form) = &view.form {
        let _ = writeln!(out);
        match form.mode {
            FormMode::Create => {
                let _ = writeln!(out, "-- new content piece --");
            }
            FormMode::Edit(id) => {
                let _ = writeln!(out, "-- editing #{id} --");
            }
        }
        let _ = writeln!(out, "  title: {}", form.draft.title.as_deref().unwrap_or(""));
        let _ = writeln!(out, "  format: {}", form.draft.format.as_deref().unwrap_or(""));
        let _ = writeln!(out, "  status: {}", form.draft.status.as_deref().unwrap_or(""));
    }
    out
}

/// Best-effort parse of the date formats the backend emits.
pub fn parse_upload_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Order for the tracking table: parseable dates newest first, then
/// unparseable dates, then undated pieces; ties broken by id.
pub fn tracking_order(pieces: &[ContentPiece]) -> Vec<&ContentPiece> {
    let mut sorted: Vec<&ContentPiece> = pieces.iter().collect();
    sorted.sort_by_key(|p| {
        let parsed = p.upload_date.as_deref().and_then(parse_upload_date);
        let rank = match (&p.upload_date, parsed) {
            (_, Some(_)) => 0,
            (Some(_), None) => 1,
            (None, None) => 2,
        };
        (rank, Reverse(parsed), p.id)
    });
    sorted
}

pub fn render_tracking(pieces: &[ContentPiece]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Tracking ==");
    if pieces.is_empty() {
        let _ = writeln!(out, "{EMPTY_BOARD}");
        return out;
    }
    let _ = writeln!(
        out,
        "{:<6} {:<32} {:<10} {:<12} {:<20} {}",
        "id", "title", "format", "status", "uploaded", "performance"
    );
    for piece in tracking_order(pieces) {
        let _ = writeln!(
            out,
            "{:<6} {:<32} {:<10} {:<12} {:<20} {}",
            piece.id,
            piece.title,
            piece.format,
            piece.status,
            piece.upload_date.as_deref().unwrap_or("-"),
            if piece.performance.is_empty() { "-" } else { piece.performance.as_str() },
        );
    }
    out
}

pub fn render_detail(piece: &ContentPiece) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== #{} {} ==", piece.id, piece.title);
    let fields: [(&str, Option<&str>); 11] = [
        ("Content pillar", Some(piece.content_pillar.as_str())),
        ("Format", Some(piece.format.as_str())),
        ("Status", Some(piece.status.as_str())),
        ("Performance", Some(piece.performance.as_str())),
        ("Upload date", piece.upload_date.as_deref()),
        ("Link", piece.link.as_deref()),
        ("Hook", piece.hook.as_deref()),
        ("Caption", piece.caption.as_deref()),
        ("Script", piece.script.as_deref()),
        ("Shotlist", piece.shotlist.as_deref()),
        ("Notes", piece.notes.as_deref()),
    ];
    for (label, value) in fields {
        let value = value.filter(|v| !v.is_empty()).unwrap_or("-");
        let _ = writeln!(out, "{label:<15} {value}");
    }
    out
}
