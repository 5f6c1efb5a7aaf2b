//! Bidirectional codec between [`FormValues`] and a URL query string.
//!
//! The form keeps its state mirrored in the page URL so drafts can be
//! shared and reloaded. Encoding drops the two consent booleans and any
//! empty field; dates are rendered as `YYYY-MM-DD` and the indefinite
//! marker as the literal `indefinite`. Multi-valued fields (impact scopes,
//! rights) use repeated keys, the standard urlencoded convention.

use chrono::NaiveDate;
use log::{debug, warn};
use url::form_urlencoded;

use crate::{DateValue, Error, FormValues, Result, DATE_INDEFINITE};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(s, DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(e) => {
            warn!("Dropping unparsable date {s:?}: {e}");
            None
        }
    }
}

/// Encode form values as an `application/x-www-form-urlencoded` query string.
///
/// Empty fields are skipped entirely and the consent checkboxes are never
/// written, so a pasted URL can not pre-accept the terms.
pub fn form_to_query_string(values: &FormValues) -> String {
    let mut ser = form_urlencoded::Serializer::new(String::new());

    let mut text = |key: &str, value: &str| {
        if !value.is_empty() {
            ser.append_pair(key, value);
        }
    };
    text("name", &values.name);
    text("description", &values.description);
    text("externalLink", &values.external_link);
    text("logoUrl", &values.logo_url);
    text("bannerUrl", &values.banner_url);
    for scope in &values.impact_scopes {
        if !scope.is_empty() {
            ser.append_pair("impactScopes", scope);
        }
    }
    match values.impact_time_end {
        Some(DateValue::Indefinite) => {
            ser.append_pair("impactTimeEnd", DATE_INDEFINITE);
        }
        Some(DateValue::On(d)) => {
            ser.append_pair("impactTimeEnd", &format_date(d));
        }
        None => {}
    }
    if !values.work_scopes.is_empty() {
        ser.append_pair("workScopes", &values.work_scopes);
    }
    if let Some(d) = values.work_time_start {
        ser.append_pair("workTimeStart", &format_date(d));
    }
    if let Some(d) = values.work_time_end {
        ser.append_pair("workTimeEnd", &format_date(d));
    }
    for right in &values.rights {
        if !right.is_empty() {
            ser.append_pair("rights", right);
        }
    }
    if !values.contributors.is_empty() {
        ser.append_pair("contributors", &values.contributors);
    }
    if !values.allowlist_url.is_empty() {
        ser.append_pair("allowlistUrl", &values.allowlist_url);
    }
    if !values.background_color.is_empty() {
        ser.append_pair("backgroundColor", &values.background_color);
    }
    if !values.background_vector_art.is_empty() {
        ser.append_pair("backgroundVectorArt", &values.background_vector_art);
    }
    if !values.metadata_properties.is_empty() {
        ser.append_pair("metadataProperties", &values.metadata_properties);
    }

    ser.finish()
}

/// Decode a query string into form values merged over the defaults.
///
/// An empty query yields pure defaults. Unknown keys are ignored; a date
/// that fails to parse leaves its field at the default rather than failing
/// the whole decode.
pub fn query_string_to_form(query: &str) -> Result<FormValues> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut values = FormValues::default();
    if query.is_empty() {
        return Ok(values);
    }
    if query.contains('\u{0}') {
        return Err(Error::DecodeError("query contains NUL bytes".into()));
    }

    let mut impact_scopes: Vec<String> = Vec::new();
    let mut rights: Vec<String> = Vec::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = value.into_owned();
        match key.as_ref() {
            "name" => values.name = value,
            "description" => values.description = value,
            "externalLink" => values.external_link = value,
            "logoUrl" => values.logo_url = value,
            "bannerUrl" => values.banner_url = value,
            "impactScopes" => impact_scopes.push(value),
            "impactTimeEnd" => {
                if value == DATE_INDEFINITE {
                    values.impact_time_end = Some(DateValue::Indefinite);
                } else if let Some(d) = parse_date(&value) {
                    values.impact_time_end = Some(DateValue::On(d));
                }
            }
            "workScopes" => values.work_scopes = value,
            "workTimeStart" => {
                if let Some(d) = parse_date(&value) {
                    values.work_time_start = Some(d);
                }
            }
            "workTimeEnd" => {
                if let Some(d) = parse_date(&value) {
                    values.work_time_end = Some(d);
                }
            }
            "rights" => rights.push(value),
            "contributors" => values.contributors = value,
            "allowlistUrl" => values.allowlist_url = value,
            "backgroundColor" => values.background_color = value,
            "backgroundVectorArt" => values.background_vector_art = value,
            "metadataProperties" => values.metadata_properties = value,
            other => debug!("Ignoring unknown query key {other:?}"),
        }
    }

    // Only replace the non-empty defaults when the query actually carried tags
    if !impact_scopes.is_empty() {
        values.impact_scopes = impact_scopes;
    }
    if !rights.is_empty() {
        values.rights = rights;
    }

    Ok(values)
}
