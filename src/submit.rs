//! Submission pipeline: validate, capture, build payload, dispatch a mint.
//!
//! The wallet session and the two mint operations are black boxes behind
//! traits; the pipeline only decides ordering and which path runs. Ordering
//! guarantees: nothing happens without a connected account, no capture or
//! dispatch happens for an invalid form, and a formatting rejection stops
//! the dispatch.

use std::collections::BTreeMap;

use log::{error, info, warn};

use crate::capture::ImageExporter;
use crate::metadata::{build_metadata_input, format_hypercert_data, MetadataPayload};
use crate::validate::{validate_form, ValidationReport};
use crate::{FormValues, Result, DEFAULT_NUM_FRACTIONS, IMAGE_SELECTOR};

/// Current wallet session; addresses are reported lower-cased.
pub trait AccountProvider {
    /// The connected address, or `None` when no wallet is connected.
    fn address(&self) -> Option<String>;
}

/// The two externally-owned minting operations.
pub trait MintClient {
    /// Mint directly, splitting the certificate into `fraction_count` units.
    fn mint(&self, payload: &MetadataPayload, fraction_count: u64) -> Result<()>;

    /// Mint restricted by an externally hosted allowlist.
    fn mint_with_allowlist(&self, payload: &MetadataPayload, allowlist_url: &str) -> Result<()>;
}

/// What the pipeline decided; the caller maps this to user-visible notices
/// and, on the minted variants, navigates away and closes any modal.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// No wallet connected; nothing was built or dispatched.
    NotConnected,
    /// A submission is already in flight; this invocation was ignored.
    AlreadySubmitting,
    /// Field validation failed; errors are per-field.
    Invalid(ValidationReport),
    /// The metadata formatter rejected the submission; no dispatch occurred.
    MetadataInvalid { errors: BTreeMap<String, String> },
    /// The direct mint path completed.
    Minted { fraction_count: u64 },
    /// The allowlist mint path completed.
    MintedWithAllowlist { allowlist_url: String },
}

/// Owns the submission collaborators and runs the pipeline.
pub struct Submitter {
    account: Box<dyn AccountProvider + Send + Sync>,
    mint: Box<dyn MintClient + Send + Sync>,
}

impl Submitter {
    pub fn new(
        account: Box<dyn AccountProvider + Send + Sync>,
        mint: Box<dyn MintClient + Send + Sync>,
    ) -> Self {
        Self { account, mint }
    }

    /// Run the full pipeline for one form snapshot.
    ///
    /// `Err` is reserved for dispatch transport failures; every recoverable
    /// condition is a [`SubmitOutcome`] variant.
    pub fn submit(
        &self,
        values: &FormValues,
        exporter: &dyn ImageExporter,
    ) -> Result<SubmitOutcome> {
        let Some(address) = self.account.address() else {
            warn!("Submit attempted without a connected account");
            return Ok(SubmitOutcome::NotConnected);
        };

        let report = validate_form(values);
        if !report.is_valid() {
            return Ok(SubmitOutcome::Invalid(report));
        }

        // Best-effort: a missing preview or failed capture must not block
        let image = exporter.export_as_image(IMAGE_SELECTOR);
        if image.is_none() {
            info!("No preview image captured; submitting without one");
        }

        let input = build_metadata_input(values, image);
        let result = format_hypercert_data(input);
        if !result.valid {
            error!("Metadata formatting errors: {:?}", result.errors);
            return Ok(SubmitOutcome::MetadataInvalid {
                errors: result.errors,
            });
        }
        let Some(payload) = result.data else {
            error!("Formatter reported valid but returned no payload");
            return Ok(SubmitOutcome::MetadataInvalid {
                errors: BTreeMap::new(),
            });
        };

        info!("Dispatching mint for {address}");
        if values.allowlist_url.is_empty() {
            self.mint.mint(&payload, DEFAULT_NUM_FRACTIONS)?;
            Ok(SubmitOutcome::Minted {
                fraction_count: DEFAULT_NUM_FRACTIONS,
            })
        } else {
            self.mint
                .mint_with_allowlist(&payload, &values.allowlist_url)?;
            Ok(SubmitOutcome::MintedWithAllowlist {
                allowlist_url: values.allowlist_url.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::NullExporter;
    use crate::Error;
    use std::sync::{Arc, Mutex};

    struct FixedAccount(Option<String>);

    impl AccountProvider for FixedAccount {
        fn address(&self) -> Option<String> {
            self.0.clone()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Mint { fraction_count: u64 },
        MintWithAllowlist { allowlist_url: String },
    }

    #[derive(Clone, Default)]
    struct RecordingMint {
        calls: Arc<Mutex<Vec<Call>>>,
        fail: bool,
    }

    impl MintClient for RecordingMint {
        fn mint(&self, _payload: &MetadataPayload, fraction_count: u64) -> Result<()> {
            if self.fail {
                return Err(Error::MintError("boom".into()));
            }
            self.calls
                .lock()
                .unwrap()
                .push(Call::Mint { fraction_count });
            Ok(())
        }

        fn mint_with_allowlist(
            &self,
            _payload: &MetadataPayload,
            allowlist_url: &str,
        ) -> Result<()> {
            if self.fail {
                return Err(Error::MintError("boom".into()));
            }
            self.calls.lock().unwrap().push(Call::MintWithAllowlist {
                allowlist_url: allowlist_url.to_string(),
            });
            Ok(())
        }
    }

    fn valid_values() -> FormValues {
        FormValues {
            name: "Tree planting".to_string(),
            description: "We planted trees for a whole year straight.".to_string(),
            work_scopes: "forestry".to_string(),
            contributors: "Alice, Bob".to_string(),
            agree_contributors_consent: true,
            agree_terms_conditions: true,
            ..FormValues::default()
        }
    }

    fn submitter(address: Option<&str>, mint: RecordingMint) -> Submitter {
        Submitter::new(
            Box::new(FixedAccount(address.map(str::to_string))),
            Box::new(mint),
        )
    }

    #[test]
    fn test_no_account_never_mints() {
        let mint = RecordingMint::default();
        let sub = submitter(None, mint.clone());
        let outcome = sub.submit(&valid_values(), &NullExporter).unwrap();
        assert!(matches!(outcome, SubmitOutcome::NotConnected));
        assert!(mint.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_form_never_mints() {
        let mint = RecordingMint::default();
        let sub = submitter(Some("0xabc"), mint.clone());
        let mut values = valid_values();
        values.name = String::new();
        let outcome = sub.submit(&values, &NullExporter).unwrap();
        match outcome {
            SubmitOutcome::Invalid(report) => assert!(report.error("name").is_some()),
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert!(mint.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_direct_path_uses_default_fractions() {
        let mint = RecordingMint::default();
        let sub = submitter(Some("0xabc"), mint.clone());
        let outcome = sub.submit(&valid_values(), &NullExporter).unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Minted {
                fraction_count: DEFAULT_NUM_FRACTIONS
            }
        ));
        assert_eq!(
            *mint.calls.lock().unwrap(),
            vec![Call::Mint {
                fraction_count: DEFAULT_NUM_FRACTIONS
            }]
        );
    }

    #[test]
    fn test_allowlist_url_routes_to_allowlist_path() {
        let mint = RecordingMint::default();
        let sub = submitter(Some("0xabc"), mint.clone());
        let mut values = valid_values();
        values.allowlist_url = "https://example.com/allowlist.csv".to_string();
        let outcome = sub.submit(&values, &NullExporter).unwrap();
        assert!(matches!(outcome, SubmitOutcome::MintedWithAllowlist { .. }));
        assert_eq!(
            *mint.calls.lock().unwrap(),
            vec![Call::MintWithAllowlist {
                allowlist_url: "https://example.com/allowlist.csv".to_string()
            }]
        );
    }

    #[test]
    fn test_malformed_properties_still_mints() {
        let mint = RecordingMint::default();
        let sub = submitter(Some("0xabc"), mint.clone());
        let mut values = valid_values();
        values.metadata_properties = "{not json".to_string();
        let outcome = sub.submit(&values, &NullExporter).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Minted { .. }));
    }

    #[test]
    fn test_mint_transport_failure_propagates() {
        let mint = RecordingMint {
            fail: true,
            ..RecordingMint::default()
        };
        let sub = submitter(Some("0xabc"), mint);
        let err = sub.submit(&valid_values(), &NullExporter).unwrap_err();
        assert!(matches!(err, Error::MintError(_)));
    }
}
