//! The dashboard context object: the loaded record set and its current view.

use std::io::Write;

use tracing::{info, warn};

use crate::analyzers::aggregate::summarize;
use crate::analyzers::types::GradeSummary;
use crate::config::DashboardConfig;
use crate::error::GradebookError;
use crate::output::write_csv;
use crate::parser::parse_records;
use crate::record::Record;
use crate::view::{Criteria, project};

/// Owns the full record set and the view derived from it.
///
/// The record set is written once per load. The view is a list of positions
/// into it, replaced wholesale whenever the criteria change.
#[derive(Debug, Default)]
pub struct Dashboard {
    config: DashboardConfig,
    records: Vec<Record>,
    criteria: Criteria,
    view: Vec<usize>,
    loaded: bool,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Dashboard {
            config,
            ..Default::default()
        }
    }

    /// Builds a dashboard and loads `text` into it.
    pub fn from_text(config: DashboardConfig, text: &str) -> Result<Self, GradebookError> {
        let mut dashboard = Dashboard::new(config);
        dashboard.load(text)?;
        Ok(dashboard)
    }

    /// Replaces the record set with the rows parsed from `text` and returns
    /// how many were read.
    ///
    /// On failure the previously loaded data and view are left untouched.
    #[tracing::instrument(skip(self, text))]
    pub fn load(&mut self, text: &str) -> Result<usize, GradebookError> {
        let records = match parse_records(text) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, kept = self.records.len(), "Load failed, keeping previous data");
                return Err(e);
            }
        };

        self.records = records;
        self.loaded = true;
        self.refresh();
        info!(records = self.records.len(), view = self.view.len(), "Grade data loaded");

        Ok(self.records.len())
    }

    /// Sets new criteria and recomputes the view from the full record set.
    pub fn set_criteria(&mut self, criteria: Criteria) {
        self.criteria = criteria;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.view = project(&self.records, &self.criteria);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// The full record set, in input order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The current view, in view order.
    pub fn view(&self) -> impl Iterator<Item = &Record> + '_ {
        self.view.iter().map(|&i| &self.records[i])
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    /// Statistics over the current view.
    pub fn summary(&self) -> GradeSummary {
        summarize(self.view(), &self.config.class_ids)
    }

    /// Writes the current view as CSV, unrounded.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<(), GradebookError> {
        write_csv(writer, self.view())
    }
}
