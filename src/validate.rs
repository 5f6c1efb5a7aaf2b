//! Per-field validation rules for the creation form.
//!
//! Each rule is an explicit predicate over a [`FormValues`] snapshot;
//! [`validate_form`] composes them into a [`ValidationReport`] mapping field
//! names to human-readable messages. Validation is pure: it never mutates
//! the form and never talks to the network.

use std::collections::BTreeMap;

use url::Url;

use crate::parsing::has_duplicates;
use crate::{
    DateValue, FormValues, DESCRIPTION_MAX_LENGTH, DESCRIPTION_MIN_LENGTH, NAME_MAX_LENGTH,
    NAME_MIN_LENGTH,
};

/// Options for [`is_valid_url`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlOptions {
    /// Treat an empty value as valid (for optional fields).
    pub empty_allowed: bool,
    /// Accept the `ipfs://` scheme in addition to web URLs.
    pub ipfs_allowed: bool,
}

/// Check a candidate URL string.
///
/// Web URLs must be absolute with an `http`, `https`, or `ftp` scheme;
/// `ipfs://` is accepted only when `opts.ipfs_allowed` is set.
pub fn is_valid_url(value: &str, opts: UrlOptions) -> bool {
    if value.is_empty() {
        return opts.empty_allowed;
    }
    if let Some(rest) = value.strip_prefix("ipfs://") {
        return opts.ipfs_allowed && !rest.is_empty();
    }
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "ftp") && url.has_host(),
        Err(_) => false,
    }
}

/// Field-scoped validation failures keyed by field name.
///
/// Field names match the camelCase wire names used on the query string so a
/// UI layer can attach messages to its inputs directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationReport {
    /// Overall validity: the AND of every field rule.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error message for one field, if it failed.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Iterate over `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }
}

/// Run every field rule against a form snapshot.
pub fn validate_form(values: &FormValues) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_name(values, &mut report);
    check_description(values, &mut report);
    check_urls(values, &mut report);
    check_impact_scopes(values, &mut report);
    check_impact_time_end(values, &mut report);
    check_work_scopes(values, &mut report);
    check_work_time_end(values, &mut report);
    check_rights(values, &mut report);
    check_contributors(values, &mut report);
    check_consent(values, &mut report);

    report
}

fn check_name(values: &FormValues, report: &mut ValidationReport) {
    let len = values.name.chars().count();
    if len == 0 {
        report.fail("name", "Required");
    } else if len < NAME_MIN_LENGTH {
        report.fail(
            "name",
            format!("Name must be at least {NAME_MIN_LENGTH} characters"),
        );
    } else if len > NAME_MAX_LENGTH {
        report.fail(
            "name",
            format!("Name must be at most {NAME_MAX_LENGTH} characters"),
        );
    }
}

fn check_description(values: &FormValues, report: &mut ValidationReport) {
    let len = values.description.chars().count();
    if len == 0 {
        report.fail("description", "Required");
    } else if len < DESCRIPTION_MIN_LENGTH {
        report.fail(
            "description",
            format!("Description must be at least {DESCRIPTION_MIN_LENGTH} characters"),
        );
    } else if len > DESCRIPTION_MAX_LENGTH {
        report.fail(
            "description",
            format!("Description must be at most {DESCRIPTION_MAX_LENGTH} characters"),
        );
    }
}

fn check_urls(values: &FormValues, report: &mut ValidationReport) {
    // externalLink is the only field that may point into IPFS
    let web_only = UrlOptions {
        empty_allowed: true,
        ipfs_allowed: false,
    };
    if !is_valid_url(
        &values.external_link,
        UrlOptions {
            empty_allowed: true,
            ipfs_allowed: true,
        },
    ) {
        report.fail("externalLink", "Please enter a valid URL");
    }
    if !is_valid_url(&values.logo_url, web_only) {
        report.fail("logoUrl", "Please enter a valid URL");
    }
    if !is_valid_url(&values.banner_url, web_only) {
        report.fail("bannerUrl", "Please enter a valid URL");
    }
    if !is_valid_url(&values.allowlist_url, web_only) {
        report.fail("allowlistUrl", "Please enter a valid URL");
    }
}

fn check_impact_scopes(values: &FormValues, report: &mut ValidationReport) {
    if values.impact_scopes.is_empty() {
        report.fail("impactScopes", "Please choose at least 1 item");
    }
}

fn check_impact_time_end(values: &FormValues, report: &mut ValidationReport) {
    // Indefinite (or absent) is always valid; a concrete end must not
    // precede the work start
    if let (Some(DateValue::On(end)), Some(start)) =
        (values.impact_time_end, values.work_time_start)
    {
        if end < start {
            report.fail("impactTimeEnd", "End date must be after start date");
        }
    }
}

fn check_work_scopes(values: &FormValues, report: &mut ValidationReport) {
    let len = values.work_scopes.chars().count();
    if len == 0 {
        report.fail("workScopes", "Required");
    } else if len < NAME_MIN_LENGTH {
        report.fail(
            "workScopes",
            format!("Work scopes must be at least {NAME_MIN_LENGTH} characters"),
        );
    } else if has_duplicates(&values.work_scopes) {
        report.fail("workScopes", "Please remove duplicate items");
    }
}

fn check_work_time_end(values: &FormValues, report: &mut ValidationReport) {
    if let (Some(end), Some(start)) = (values.work_time_end, values.work_time_start) {
        if end < start {
            report.fail("workTimeEnd", "End date must be after start date");
        }
    }
}

fn check_rights(values: &FormValues, report: &mut ValidationReport) {
    if values.rights.is_empty() {
        report.fail("rights", "Please choose at least 1 item");
    }
}

fn check_contributors(values: &FormValues, report: &mut ValidationReport) {
    if values.contributors.trim().is_empty() {
        report.fail("contributors", "Required");
    } else if has_duplicates(&values.contributors) {
        report.fail("contributors", "Please remove duplicate items");
    }
}

fn check_consent(values: &FormValues, report: &mut ValidationReport) {
    if !values.agree_contributors_consent {
        report.fail(
            "agreeContributorsConsent",
            "You must get the consent of contributors before creating",
        );
    }
    if !values.agree_terms_conditions {
        report.fail(
            "agreeTermsConditions",
            "You must agree to the terms and conditions",
        );
    }
}
