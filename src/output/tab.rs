use clap::ValueEnum;
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Modify, Panel, Style, object::Columns, object::Rows, style::LineText},
};

use crate::parse::{ChangeKind, FileChange};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum TabStyle {
    Rounded,
    Modern,
    ModernRounded,
    Ascii,
    AsciiRounded,
    Psql,
    Markdown,
    Extended,
    Sharp,
    Dots,
    ReStructuredText,
    Blank,
    Empty,
}

#[must_use]
pub fn format_tab(records: &[FileChange], style: TabStyle) -> String {
    if records.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["(none)"]);
        let mut table = builder.build();
        apply_style(&mut table, style);
        table.with(Panel::header(" File Changes "));
        return table.to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Commit", "Change", "File", "Hunks", "Added", "Deleted"]);
    for record in records {
        let (added, deleted) = line_counts(record);
        builder.push_record([
            short_commit(record),
            kind_label(record),
            display_path(record),
            record.hunks.len().to_string(),
            added.to_string(),
            deleted.to_string(),
        ]);
    }

    let mut table = builder.build();
    apply_style(&mut table, style);
    table.with(Modify::new(Columns::new(3..4)).with(Alignment::right()));
    table.with(Modify::new(Columns::new(4..5)).with(Alignment::right()));
    table.with(Modify::new(Columns::new(5..6)).with(Alignment::right()));
    apply_title_line(&mut table, "File Changes");

    let noun = if records.len() == 1 { "change" } else { "changes" };
    format!("{table}\n{} file {noun}", records.len())
}

fn short_commit(record: &FileChange) -> String {
    record
        .commit
        .as_deref()
        .map_or_else(|| "-".to_string(), |sha| sha.chars().take(8).collect())
}

fn kind_label(record: &FileChange) -> String {
    let kind = match record.kind {
        ChangeKind::Added => "added",
        ChangeKind::Deleted => "deleted",
        ChangeKind::Modified => "modified",
        ChangeKind::Renamed => "renamed",
    };
    if record.is_binary {
        format!("{kind} (binary)")
    } else {
        kind.to_string()
    }
}

fn display_path(record: &FileChange) -> String {
    match (record.kind, record.old_path.as_deref(), record.new_path.as_deref()) {
        (ChangeKind::Renamed, Some(old), Some(new)) => format!("{old} -> {new}"),
        _ => record.path().unwrap_or("?").to_string(),
    }
}

fn line_counts(record: &FileChange) -> (usize, usize) {
    record.hunks.iter().fold((0, 0), |(a, d), h| {
        (a + h.added.len(), d + h.deleted.len())
    })
}

fn apply_style(table: &mut Table, style: TabStyle) {
    match style {
        TabStyle::Rounded => table.with(Style::rounded()),
        TabStyle::Modern => table.with(Style::modern()),
        TabStyle::ModernRounded => table.with(Style::modern_rounded()),
        TabStyle::Ascii => table.with(Style::ascii()),
        TabStyle::AsciiRounded => table.with(Style::ascii_rounded()),
        TabStyle::Psql => table.with(Style::psql()),
        TabStyle::Markdown => table.with(Style::markdown()),
        TabStyle::Extended => table.with(Style::extended()),
        TabStyle::Sharp => table.with(Style::sharp()),
        TabStyle::Dots => table.with(Style::dots()),
        TabStyle::ReStructuredText => table.with(Style::re_structured_text()),
        TabStyle::Blank => table.with(Style::blank()),
        TabStyle::Empty => table.with(Style::empty()),
    };
}

fn apply_title_line(table: &mut Table, title: &str) {
    table.with(LineText::new(format!(" {title} "), Rows::first()).offset(1));
}
