//! Metadata payload construction and formatting.
//!
//! [`build_metadata_input`] lowers a validated form snapshot into the raw
//! fields the formatter consumes (Unix-second timeframes, parsed lists),
//! and [`format_hypercert_data`] is the pure formatter that either rejects
//! the input with field-keyed errors or produces the final
//! [`MetadataPayload`] for minting.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::parsing::{parse_list_from_string, ListOptions, Lowercase};
use crate::{DateValue, FormValues, DATE_INDEFINITE, DEFAULT_HYPERCERT_VERSION};

/// Raw submission fields handed to the formatter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataInput {
    pub name: String,
    pub description: String,
    pub external_url: String,
    /// Captured preview as a data URL, or empty when capture failed.
    pub image: String,
    pub contributors: Vec<String>,
    pub work_timeframe_start: i64,
    pub work_timeframe_end: i64,
    pub impact_timeframe_start: i64,
    pub impact_timeframe_end: i64,
    pub work_scope: Vec<String>,
    pub impact_scope: Vec<String>,
    pub rights: Vec<String>,
    pub version: String,
    pub properties: Vec<serde_json::Value>,
    pub excluded_work_scope: Vec<String>,
    pub excluded_impact_scope: Vec<String>,
    pub excluded_rights: Vec<String>,
}

/// One named dimension of the claim (scopes, rights, contributors).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub value: Vec<String>,
    pub display_value: String,
}

impl Dimension {
    fn new(name: &str, value: Vec<String>) -> Self {
        let display_value = value.join(", ");
        Self {
            name: name.to_string(),
            value,
            display_value,
        }
    }
}

/// A `[start, end]` timeframe in Unix seconds; 0 means absent/indefinite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeframe {
    pub name: String,
    pub value: Vec<i64>,
    pub display_value: String,
}

impl Timeframe {
    fn new(name: &str, start: i64, end: i64) -> Self {
        Self {
            name: name.to_string(),
            value: vec![start, end],
            display_value: format!("{} \u{2192} {}", display_day(start), display_day(end)),
        }
    }
}

fn display_day(ts: i64) -> String {
    if ts == 0 {
        return DATE_INDEFINITE.to_string();
    }
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.date_naive().format("%Y-%m-%d").to_string(),
        None => ts.to_string(),
    }
}

/// The claim block embedded in the token metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypercertClaim {
    pub impact_scope: Dimension,
    pub work_scope: Dimension,
    pub work_timeframe: Timeframe,
    pub impact_timeframe: Timeframe,
    pub contributors: Dimension,
    pub rights: Dimension,
}

/// Certificate metadata as submitted to the mint operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataPayload {
    pub name: String,
    pub description: String,
    pub external_url: String,
    pub image: String,
    pub version: String,
    pub properties: Vec<serde_json::Value>,
    pub hypercert: HypercertClaim,
}

/// Outcome of [`format_hypercert_data`].
#[derive(Debug, Clone, Default)]
pub struct FormatResult {
    pub valid: bool,
    /// Field-keyed formatting errors; empty when `valid`.
    pub errors: BTreeMap<String, String>,
    /// The payload, present only when `valid`.
    pub data: Option<MetadataPayload>,
}

fn unix_seconds(date: Option<NaiveDate>) -> i64 {
    match date {
        Some(d) => d.and_time(NaiveTime::MIN).and_utc().timestamp(),
        None => 0,
    }
}

/// Parse the free-form properties field into a JSON array.
///
/// Malformed JSON (or a non-array value) degrades to an empty list with a
/// logged warning; it never blocks submission.
pub fn parse_properties(raw: &str) -> Vec<serde_json::Value> {
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(other) => {
            warn!("metadataProperties is not a JSON array, ignoring: {other}");
            Vec::new()
        }
        Err(e) => {
            warn!("Unable to parse metadataProperties {raw:?}: {e}");
            Vec::new()
        }
    }
}

/// Lower validated form values into formatter input.
///
/// Contributors are parsed address-aware so addresses compare consistently
/// while names keep their typed casing. The impact timeframe start is fixed
/// equal to the work start; there is no independent field for it.
pub fn build_metadata_input(values: &FormValues, image: Option<String>) -> MetadataInput {
    let contributors = parse_list_from_string(
        &values.contributors,
        &ListOptions {
            lowercase: Lowercase::Addresses,
            deduplicate: false,
        },
    );
    let work_scope = parse_list_from_string(&values.work_scopes, &ListOptions::default());

    let work_timeframe_start = unix_seconds(values.work_time_start);
    let work_timeframe_end = unix_seconds(values.work_time_end);
    let impact_timeframe_start = work_timeframe_start;
    let impact_timeframe_end = match values.impact_time_end {
        Some(DateValue::On(d)) => unix_seconds(Some(d)),
        Some(DateValue::Indefinite) | None => 0,
    };

    MetadataInput {
        name: values.name.clone(),
        description: values.description.clone(),
        external_url: values.external_link.clone(),
        image: image.unwrap_or_default(),
        contributors,
        work_timeframe_start,
        work_timeframe_end,
        impact_timeframe_start,
        impact_timeframe_end,
        work_scope,
        impact_scope: values.impact_scopes.clone(),
        rights: values.rights.clone(),
        version: DEFAULT_HYPERCERT_VERSION.to_string(),
        properties: parse_properties(&values.metadata_properties),
        excluded_work_scope: Vec::new(),
        excluded_impact_scope: Vec::new(),
        excluded_rights: Vec::new(),
    }
}

/// Pure formatter: raw fields in, `{valid, errors, data}` out.
pub fn format_hypercert_data(input: MetadataInput) -> FormatResult {
    let mut errors = BTreeMap::new();

    if input.name.is_empty() {
        errors.insert("name".to_string(), "name is required".to_string());
    }
    if input.description.is_empty() {
        errors.insert(
            "description".to_string(),
            "description is required".to_string(),
        );
    }
    if input.work_timeframe_end != 0 && input.work_timeframe_end < input.work_timeframe_start {
        errors.insert(
            "workTimeframe".to_string(),
            "work timeframe ends before it starts".to_string(),
        );
    }
    if input.impact_timeframe_end != 0 && input.impact_timeframe_end < input.impact_timeframe_start
    {
        errors.insert(
            "impactTimeframe".to_string(),
            "impact timeframe ends before it starts".to_string(),
        );
    }

    if !errors.is_empty() {
        return FormatResult {
            valid: false,
            errors,
            data: None,
        };
    }

    let payload = MetadataPayload {
        name: input.name,
        description: input.description,
        external_url: input.external_url,
        image: input.image,
        version: input.version,
        properties: input.properties,
        hypercert: HypercertClaim {
            impact_scope: Dimension::new("Impact Scope", input.impact_scope),
            work_scope: Dimension::new("Work Scope", input.work_scope),
            work_timeframe: Timeframe::new(
                "Work Timeframe",
                input.work_timeframe_start,
                input.work_timeframe_end,
            ),
            impact_timeframe: Timeframe::new(
                "Impact Timeframe",
                input.impact_timeframe_start,
                input.impact_timeframe_end,
            ),
            contributors: Dimension::new("Contributors", input.contributors),
            rights: Dimension::new("Rights", input.rights),
        },
    };

    FormatResult {
        valid: true,
        errors,
        data: Some(payload),
    }
}
