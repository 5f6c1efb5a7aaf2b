//! Integration tests for the decode → validate → encode flow

use chrono::NaiveDate;
use hypercert_form::form::{HypercertForm, MemorySink};
use hypercert_form::{codec, validate, DateValue, FormValues};

fn filled_values() -> FormValues {
    FormValues {
        name: "Community well".to_string(),
        description: "Dug and maintained a well serving three villages.".to_string(),
        external_link: "https://example.org/report".to_string(),
        logo_url: "https://example.org/logo.png".to_string(),
        impact_scopes: vec!["water".to_string(), "health".to_string()],
        impact_time_end: Some(DateValue::Indefinite),
        work_scopes: "drilling, maintenance".to_string(),
        work_time_start: NaiveDate::from_ymd_opt(2022, 3, 1),
        work_time_end: NaiveDate::from_ymd_opt(2023, 3, 1),
        rights: vec!["Public Display".to_string()],
        contributors: "Alice, Bob, 0xE6a97a2F3d68d1dFCf1d7B4b201a99bd30f4d7d3".to_string(),
        agree_contributors_consent: true,
        agree_terms_conditions: true,
        ..FormValues::default()
    }
}

#[test]
fn round_trip_reproduces_all_non_consent_fields() {
    let values = filled_values();
    let query = codec::form_to_query_string(&values);
    let decoded = codec::query_string_to_form(&query).expect("decode failed");

    // Everything except the consent booleans survives the trip
    let mut expected = values.clone();
    expected.agree_contributors_consent = false;
    expected.agree_terms_conditions = false;
    assert_eq!(decoded, expected);
}

#[test]
fn shared_link_populates_a_fresh_form() {
    let query = codec::form_to_query_string(&filled_values());
    let form = HypercertForm::from_query(Some(&query));

    assert_eq!(form.values().name, "Community well");
    assert_eq!(
        form.values().impact_scopes,
        vec!["water".to_string(), "health".to_string()]
    );
    assert_eq!(form.values().impact_time_end, Some(DateValue::Indefinite));
    // Consent must be re-given on every visit
    assert!(!form.values().agree_terms_conditions);
}

#[test]
fn validation_pass_mirrors_state_into_url() {
    let mut sink = MemorySink::default();
    let mut form = HypercertForm::from_query(None);
    form.values_mut().name = "Community well".to_string();
    form.values_mut().work_scopes = "drilling".to_string();

    form.validate(&mut sink);
    let written = sink.last().expect("validate did not write the URL");
    assert!(written.contains("name=Community+well"));
    assert!(written.contains("workScopes=drilling"));
    assert!(!written.contains("agreeTermsConditions"));

    // The written query decodes back to the same state
    let decoded = codec::query_string_to_form(written).unwrap();
    assert_eq!(decoded.name, "Community well");
}

#[test]
fn edits_re_validate_incrementally() {
    let mut sink = MemorySink::default();
    let mut form = HypercertForm::from_query(None);

    assert!(!form.validate(&mut sink).is_valid());

    let values = form.values_mut();
    values.name = "Community well".to_string();
    values.description = "Dug and maintained a well serving villages.".to_string();
    values.work_scopes = "drilling".to_string();
    values.contributors = "Alice".to_string();
    values.agree_contributors_consent = true;
    values.agree_terms_conditions = true;

    assert!(form.validate(&mut sink).is_valid());
}

#[test]
fn decoded_garbage_dates_do_not_poison_validation() {
    let form = HypercertForm::from_query(Some("workTimeEnd=junk&name=Community+well"));
    // The junk date fell back to the default, so ordering still holds
    let report = validate::validate_form(form.values());
    assert!(report.error("workTimeEnd").is_none());
}

#[test]
fn work_time_inversion_via_query_is_caught() {
    let query = "name=Community+well&description=Dug+and+maintained+a+well+serving+villages\
                 &workScopes=drilling&contributors=Alice\
                 &workTimeStart=2023-06-01&workTimeEnd=2023-05-01";
    let form = HypercertForm::from_query(Some(query));
    let report = validate::validate_form(form.values());
    assert_eq!(
        report.error("workTimeEnd"),
        Some("End date must be after start date")
    );
}
