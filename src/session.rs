//! Per-client search state
//!
//! A [`SearchSession`] owns everything one user works with between actions:
//! the region dataset, the last successful search, the rows on screen and the
//! checked rows. Every action is a plain method call that either succeeds or
//! returns a [`SearchError`]; nothing yields mid-action, so callers never see a
//! half-updated session.

use std::sync::Arc;
use crate::core::{
    apply_secondary_filter, csv_filename, format_as_csv, format_selection_for_clipboard,
    pipeline, resolver::LocationResolver, ClipboardText, DisplaySet, SearchError,
    SecondaryFilter, Selection,
};
use crate::models::{
    Dataset, RowView, SearchCriteria, SearchResult, SearchView, SectorFilter, SelectionState,
};
use crate::services::{Clipboard, ClipboardError, FlavourLookup};

/// Result of a copy action
#[derive(Debug, Clone, PartialEq)]
pub struct CopyReport {
    pub text: ClipboardText,
    pub clipboard: Result<(), ClipboardError>,
}

impl CopyReport {
    pub fn copied(&self) -> bool {
        self.clipboard.is_ok()
    }

    pub fn message(&self) -> String {
        match &self.clipboard {
            Ok(()) => self.text.success_message(),
            Err(e) => format!("Clipboard copy failed: {}", e),
        }
    }
}

/// CSV download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

pub struct SearchSession {
    region: String,
    region_name: String,
    dataset: Arc<Dataset>,
    flavour: Option<Arc<dyn FlavourLookup>>,
    last: Option<SearchResult>,
    last_flavour: Option<String>,
    filter: SecondaryFilter,
    display: DisplaySet,
    selection: Selection,
}

impl SearchSession {
    pub fn new(region_name: impl Into<String>, dataset: Arc<Dataset>) -> Self {
        Self {
            region: dataset.region.clone(),
            region_name: region_name.into(),
            dataset,
            flavour: None,
            last: None,
            last_flavour: None,
            filter: SecondaryFilter::None,
            display: DisplaySet::default(),
            selection: Selection::default(),
        }
    }

    pub fn with_flavour(mut self, flavour: Option<Arc<dyn FlavourLookup>>) -> Self {
        self.flavour = flavour;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn region_name(&self) -> &str {
        &self.region_name
    }

    pub fn school_count(&self) -> usize {
        self.dataset.schools.len()
    }

    /// Resolve `location` and run a radius search
    ///
    /// The previous result is discarded before anything else, so a failed
    /// search leaves the session empty rather than showing stale rows.
    pub fn search(
        &mut self,
        location: &str,
        radius_km: f64,
        sector: SectorFilter,
    ) -> Result<&SearchResult, SearchError> {
        self.reset();

        if !self.dataset.is_loaded() {
            return Err(SearchError::DatasetNotLoaded(self.region_name.clone()));
        }
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(SearchError::Input(
                "Enter a radius greater than 0 km.".to_string(),
            ));
        }

        let center = LocationResolver::new(&self.dataset.postcodes, &self.dataset.suburbs)
            .resolve(location)?;

        let criteria = SearchCriteria {
            center,
            radius_km,
            sector,
        };
        let result = pipeline::search(&self.dataset.schools, criteria);

        tracing::info!(
            "{}: {} schools within {} km of {}",
            self.region,
            result.len(),
            radius_km,
            result.criteria.center.label
        );

        self.last_flavour = self
            .flavour
            .as_ref()
            .and_then(|f| f.flavour(&result.criteria.center.label, &self.region));
        self.last = Some(result);
        self.rebuild_display();

        self.last.as_ref().ok_or(SearchError::NoSearch)
    }

    /// Turn the "emails only" view on or off; always clears the selection
    pub fn set_emails_only(&mut self, emails_only: bool) {
        self.filter = SecondaryFilter::from_emails_only(emails_only);
        self.rebuild_display();
    }

    pub fn toggle_emails_only(&mut self) {
        self.set_emails_only(!self.emails_only());
    }

    pub fn emails_only(&self) -> bool {
        self.filter == SecondaryFilter::EmailsOnly
    }

    pub fn toggle(&mut self, index: usize) -> SelectionState {
        self.selection.toggle(index);
        self.selection_state()
    }

    pub fn select_all(&mut self) -> SelectionState {
        self.selection.select_all();
        self.selection_state()
    }

    pub fn clear_selection(&mut self) -> SelectionState {
        self.selection.clear();
        self.selection_state()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state(&self.display)
    }

    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last.as_ref()
    }

    pub fn display(&self) -> &DisplaySet {
        &self.display
    }

    pub fn flavour(&self) -> Option<&str> {
        self.last_flavour.as_deref()
    }

    /// Text for the clipboard, without writing it anywhere
    pub fn clipboard_text(&self) -> Result<ClipboardText, SearchError> {
        if self.last.is_none() {
            return Err(SearchError::NoSearch);
        }
        format_selection_for_clipboard(&self.display, &self.selection)
    }

    /// Format and write to `clipboard`
    ///
    /// A clipboard failure is reported in the returned [`CopyReport`] and leaves
    /// the session untouched.
    pub fn copy_emails(&self, clipboard: &dyn Clipboard) -> Result<CopyReport, SearchError> {
        let text = self.clipboard_text()?;
        let clipboard = clipboard.write_text(&text.text());

        if let Err(e) = &clipboard {
            tracing::warn!("Clipboard write failed for {} line(s): {}", text.count(), e);
        }

        Ok(CopyReport { text, clipboard })
    }

    pub fn export_csv(&self) -> Result<CsvExport, SearchError> {
        let last = self.last.as_ref().ok_or(SearchError::NoSearch)?;
        if self.display.is_empty() {
            return Err(SearchError::EmptyResult);
        }

        Ok(CsvExport {
            filename: csv_filename(&self.region, &last.criteria),
            body: format_as_csv(self.display.rows()),
        })
    }

    /// Summary line for the current result
    pub fn meta(&self) -> Option<String> {
        let last = self.last.as_ref()?;
        let criteria = &last.criteria;
        let mut meta = format!(
            "{} schools within {} km of {} ({})",
            last.len(),
            criteria.radius_km,
            criteria.center.label,
            criteria.sector
        );
        if self.emails_only() {
            meta.push_str(&format!(
                " — {} of {} have an email",
                self.display.len(),
                last.len()
            ));
        }
        Some(meta)
    }

    /// Everything a client needs to render the current result
    pub fn view(&self) -> Option<SearchView> {
        let last = self.last.as_ref()?;
        let rows = self
            .display
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| RowView::from_row(i, row, self.selection.contains(i)))
            .collect();

        Some(SearchView {
            meta: self.meta().unwrap_or_default(),
            center_label: last.criteria.center.label.clone(),
            radius_km: last.criteria.radius_km,
            total_results: last.len(),
            emails_only: self.emails_only(),
            flavour: self.last_flavour.clone(),
            rows,
            selection: self.selection_state(),
        })
    }

    fn rebuild_display(&mut self) {
        self.display = match &self.last {
            Some(result) => apply_secondary_filter(result, self.filter),
            None => DisplaySet::default(),
        };
        self.selection = Selection::for_display(&self.display);
    }

    /// Drop the last result, its display rows and the selection
    pub fn reset(&mut self) {
        self.last = None;
        self.last_flavour = None;
        self.display = DisplaySet::default();
        self.selection = Selection::default();
    }
}
