use std::collections::HashSet;
use crate::core::{
    error::SearchError,
    selection::{DisplaySet, Selection},
};
use crate::models::{ResultRow, SearchCriteria};

/// CSV header, in column order
pub const CSV_HEADERS: [&str; 9] = [
    "School",
    "Sector",
    "Suburb",
    "Postcode",
    "Phone",
    "Distance (km)",
    "Email",
    "Contact Form",
    "Website",
];

/// Which clipboard format was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// `Name <email>` per explicitly selected row
    Selected,
    /// Bare, de-duplicated emails of every display row
    All,
}

impl CopyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyMode::Selected => "selected",
            CopyMode::All => "all",
        }
    }
}

/// Text ready for the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardText {
    pub mode: CopyMode,
    pub lines: Vec<String>,
}

impl ClipboardText {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn count(&self) -> usize {
        self.lines.len()
    }

    /// Status line shown after a successful copy
    pub fn success_message(&self) -> String {
        match self.mode {
            CopyMode::Selected => format!(
                "Copied {} selected address(es) in Name <email> format.",
                self.count()
            ),
            CopyMode::All => format!("Copied {} unique email address(es).", self.count()),
        }
    }
}

/// Format emails for the clipboard
///
/// With a selection: selected rows in ascending index order that have an email,
/// one `Name <email>` per line. Without one: every distinct email of the display
/// rows in first-appearance order.
pub fn format_selection_for_clipboard(
    display: &DisplaySet,
    selection: &Selection,
) -> Result<ClipboardText, SearchError> {
    if !selection.is_empty() {
        let lines: Vec<String> = selection
            .iter()
            .filter_map(|index| display.get(index))
            .filter_map(|row| {
                row.school
                    .email()
                    .map(|email| format!("{} <{}>", row.school.name, email))
            })
            .collect();

        if lines.is_empty() {
            return Err(SearchError::EmptySelection);
        }
        return Ok(ClipboardText {
            mode: CopyMode::Selected,
            lines,
        });
    }

    let mut seen = HashSet::new();
    let lines: Vec<String> = display
        .rows()
        .iter()
        .filter_map(|row| row.school.email())
        .filter(|email| seen.insert(*email))
        .map(str::to_string)
        .collect();

    if lines.is_empty() {
        return Err(SearchError::EmptyResult);
    }
    Ok(ClipboardText {
        mode: CopyMode::All,
        lines,
    })
}

/// Render rows as CSV, every field quoted, rows in display order
pub fn format_as_csv(rows: &[ResultRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(csv_line(CSV_HEADERS.iter().copied()));

    for row in rows {
        let school = &row.school;
        let distance = format!("{:.2}", row.distance_km);
        lines.push(csv_line([
            school.name.as_str(),
            school.sector.as_str(),
            school.suburb.as_str(),
            school.postcode.as_str(),
            school.phone().unwrap_or_default(),
            distance.as_str(),
            school.email().unwrap_or_default(),
            school.contact_form_url().unwrap_or_default(),
            school.website_url().unwrap_or_default(),
        ]));
    }

    lines.join("\n")
}

fn csv_line<'a>(cells: impl IntoIterator<Item = &'a str>) -> String {
    cells
        .into_iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Suggested download name: `schools-<region>-<label>-<radius>km.csv`
pub fn csv_filename(region: &str, criteria: &SearchCriteria) -> String {
    format!(
        "schools-{}-{}-{}km.csv",
        region.to_lowercase(),
        normalize_label(&criteria.center.label),
        criteria.radius_km
    )
}

/// Lowercase and collapse whitespace runs into single hyphens
pub fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_space = false;
    for ch in label.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    out
}
