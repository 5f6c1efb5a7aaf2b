//! Hypercert creation form core
//!
//! This crate implements the logic layer behind a hypercert-creation form:
//! declarative per-field validation, a bidirectional codec between form state
//! and a URL query string, delimited-list parsing, and the submission
//! pipeline that turns validated form values into a metadata payload and
//! dispatches one of two minting operations.
//!
//! # Example
//!
//! ```
//! use hypercert_form::{codec, validate, FormValues};
//!
//! let mut values = FormValues::default();
//! values.name = "Reforestation 2023".to_string();
//! values.description = "Planted 10,000 trees across the valley.".to_string();
//! values.work_scopes = "forestry".to_string();
//! values.contributors = "0xE6a97a2F3d68d1dFCf1d7B4b201a99bd30f4d7d3".to_string();
//! values.agree_contributors_consent = true;
//! values.agree_terms_conditions = true;
//!
//! let report = validate::validate_form(&values);
//! assert!(report.is_valid());
//!
//! let query = codec::form_to_query_string(&values);
//! let decoded = codec::query_string_to_form(&query).unwrap();
//! assert_eq!(decoded.name, values.name);
//! ```

use chrono::NaiveDate;

pub mod error;
pub use error::{Error, Result};

pub mod parsing;

pub mod codec;

pub mod validate;

pub mod metadata;

// Best-effort preview capture (data-URL images, optional CORS proxy)
pub mod capture;

// Submission pipeline and mint collaborator seams
pub mod submit;

// Form state, URL synchronization, submit guard
pub mod form;

// Async-friendly form API (simple worker-backed abstraction)
pub mod async_api;

// Re-export the async facade at the crate root for ergonomic examples
pub use async_api::AsyncForm;

/// Minimum number of characters in the certificate name.
pub const NAME_MIN_LENGTH: usize = 2;
/// Maximum number of characters in the certificate name.
pub const NAME_MAX_LENGTH: usize = 50;

/// Minimum number of characters in the description.
pub const DESCRIPTION_MIN_LENGTH: usize = 20;
/// Maximum number of characters in the description.
pub const DESCRIPTION_MAX_LENGTH: usize = 1500;

/// Fraction count used when minting without an allowlist.
pub const DEFAULT_NUM_FRACTIONS: u64 = 10_000;
/// Metadata schema version stamped into every payload.
pub const DEFAULT_HYPERCERT_VERSION: &str = "0.0.1";

/// Wire representation of [`DateValue::Indefinite`].
pub const DATE_INDEFINITE: &str = "indefinite";

/// Element id of the certificate preview that gets captured on submit.
pub const IMAGE_SELECTOR: &str = "hypercertimage";

/// A calendar date or the explicit "no defined end" marker.
///
/// The original form mixed a formatted date string and the literal
/// `"indefinite"` in the same field; here every consumer pattern-matches
/// instead of probing the value's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    /// No defined end date.
    Indefinite,
    /// A concrete calendar day.
    On(NaiveDate),
}

impl DateValue {
    /// The concrete date, if any.
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            DateValue::Indefinite => None,
            DateValue::On(d) => Some(d),
        }
    }
}

/// Flat snapshot of everything the creation form collects.
///
/// Field names follow Rust conventions; the camelCase names used on the
/// query string live in [`codec`]. The two consent booleans are part of the
/// form state but are never serialized to the URL.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub name: String,
    pub description: String,
    pub external_link: String,
    pub logo_url: String,
    pub banner_url: String,
    /// Selected impact scope tags; at least one is required.
    pub impact_scopes: Vec<String>,
    /// End of the impact timeframe, or indefinite. The impact start is
    /// fixed to the work start and has no field of its own.
    pub impact_time_end: Option<DateValue>,
    /// Comma-delimited work scope tags.
    pub work_scopes: String,
    pub work_time_start: Option<NaiveDate>,
    pub work_time_end: Option<NaiveDate>,
    /// Selected rights tags; at least one is required.
    pub rights: Vec<String>,
    /// Comma-delimited contributor names and addresses.
    pub contributors: String,
    /// When non-empty, minting goes through the allowlist path.
    pub allowlist_url: String,
    pub agree_contributors_consent: bool,
    pub agree_terms_conditions: bool,
    // Hidden styling/property fields driven by the page, not the user
    pub background_color: String,
    pub background_vector_art: String,
    /// Optional free-form JSON array of extra metadata properties.
    pub metadata_properties: String,
}

impl Default for FormValues {
    fn default() -> Self {
        let today = chrono::Utc::now().date_naive();
        Self {
            name: String::new(),
            description: String::new(),
            external_link: String::new(),
            logo_url: String::new(),
            banner_url: String::new(),
            impact_scopes: vec!["all".to_string()],
            impact_time_end: Some(DateValue::On(today)),
            work_scopes: String::new(),
            work_time_start: Some(today),
            work_time_end: Some(today),
            rights: vec!["Public Display".to_string()],
            contributors: String::new(),
            allowlist_url: String::new(),
            agree_contributors_consent: false,
            agree_terms_conditions: false,
            background_color: String::new(),
            background_vector_art: String::new(),
            metadata_properties: String::new(),
        }
    }
}
