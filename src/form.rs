//! Form state: the single owner of [`FormValues`] for the page's lifetime.
//!
//! The form decodes its initial state from the page URL once, re-validates
//! on every edit, and mirrors the current state back to the URL through an
//! explicit [`QuerySink`] write. URL writes are gated on the initial query
//! having been loaded so a half-initialized form never clobbers a shared
//! link.

use log::warn;

use crate::capture::ImageExporter;
use crate::codec::{form_to_query_string, query_string_to_form};
use crate::submit::{SubmitOutcome, Submitter};
use crate::validate::{validate_form, ValidationReport};
use crate::{FormValues, Result};

/// Receives the encoded query string after each validation pass.
///
/// In a browser host this pushes history state; tests use [`MemorySink`].
pub trait QuerySink {
    fn write_query(&mut self, query: &str);
}

/// Sink that remembers the last written query string.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    last: Option<String>,
}

impl MemorySink {
    /// The most recently written query string, if any.
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

impl QuerySink for MemorySink {
    fn write_query(&mut self, query: &str) {
        self.last = Some(query.to_string());
    }
}

/// The creation form: values, current validation report, submit guard.
#[derive(Debug, Default)]
pub struct HypercertForm {
    values: FormValues,
    report: ValidationReport,
    submitting: bool,
    initial_query_loaded: bool,
}

impl HypercertForm {
    /// An empty form; URL writes stay suppressed until
    /// [`load_initial_query`](Self::load_initial_query) runs.
    pub fn new() -> Self {
        Self {
            values: FormValues::default(),
            report: ValidationReport::default(),
            submitting: false,
            initial_query_loaded: false,
        }
    }

    /// Build a form with the initial query already applied.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut form = Self::new();
        form.load_initial_query(query);
        form
    }

    /// Merge the page's initial query string under the defaults.
    ///
    /// A decode failure keeps the defaults rather than surfacing an error;
    /// the shared link is best-effort state, not authoritative input.
    pub fn load_initial_query(&mut self, query: Option<&str>) {
        match query {
            Some(q) => match query_string_to_form(q) {
                Ok(values) => self.values = values,
                Err(e) => {
                    warn!("Ignoring undecodable initial query: {e}");
                    self.values = FormValues::default();
                }
            },
            None => self.values = FormValues::default(),
        }
        self.initial_query_loaded = true;
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Mutable access for field edits; callers re-validate afterwards.
    pub fn values_mut(&mut self) -> &mut FormValues {
        &mut self.values
    }

    /// The report from the most recent validation pass.
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Current state as a query string.
    pub fn query_string(&self) -> String {
        form_to_query_string(&self.values)
    }

    /// Validate the current values and mirror them into the URL.
    ///
    /// The sink write is skipped until the initial query has been loaded,
    /// so reinitialization never overwrites a link that was never read.
    pub fn validate(&mut self, sink: &mut dyn QuerySink) -> &ValidationReport {
        self.report = validate_form(&self.values);
        if self.initial_query_loaded {
            sink.write_query(&form_to_query_string(&self.values));
        }
        &self.report
    }

    /// Run the submission pipeline on the current values.
    ///
    /// While a submission is in flight, duplicate invocations return
    /// [`SubmitOutcome::AlreadySubmitting`] without side effects. The guard
    /// clears on every exit path, including dispatch errors.
    pub fn submit(
        &mut self,
        submitter: &Submitter,
        exporter: &dyn ImageExporter,
    ) -> Result<SubmitOutcome> {
        if self.submitting {
            return Ok(SubmitOutcome::AlreadySubmitting);
        }
        self.submitting = true;
        let result = submitter.submit(&self.values, exporter);
        self.submitting = false;

        if let Ok(SubmitOutcome::Invalid(report)) = &result {
            self.report = report.clone();
        }
        result
    }
}
