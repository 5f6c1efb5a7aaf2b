//! Best-effort capture of the certificate preview as a data-URL image.
//!
//! Capture is a collaborator, not a guarantee: every failure path returns
//! `None` so submission proceeds with an empty image. The HTTP exporter can
//! route fetches through a CORS proxy the way the original capture library
//! did for cross-origin content.

use std::collections::HashMap;
use std::time::Duration;

use base64::Engine as Base64Engine;
use log::warn;
use reqwest::blocking::Client;

use crate::{Error, Result};

/// Default CORS proxy used for cross-origin preview assets.
pub const DEFAULT_CORS_PROXY: &str = "https://cors-proxy.hypercerts.workers.dev/";

/// Produces a `data:image/...;base64,` URL for a named preview element.
pub trait ImageExporter {
    /// Capture the element, or `None` when it is missing or capture fails.
    fn export_as_image(&self, element_id: &str) -> Option<String>;
}

/// Exporter that never captures anything (headless and test use).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullExporter;

impl ImageExporter for NullExporter {
    fn export_as_image(&self, _element_id: &str) -> Option<String> {
        None
    }
}

/// HTTP-backed exporter.
///
/// Element ids are registered against source URLs; capture fetches the
/// bytes (optionally via a CORS proxy) and wraps them into a data URL.
pub struct HttpImageExporter {
    client: Client,
    proxy: Option<String>,
    sources: HashMap<String, String>,
}

impl HttpImageExporter {
    /// Build an exporter with the given request timeout.
    pub fn new(timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| Error::CaptureError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            proxy: None,
            sources: HashMap::new(),
        })
    }

    /// Route fetches through a CORS proxy (prepended to the source URL).
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Register the source URL backing a preview element id.
    pub fn register(&mut self, element_id: impl Into<String>, source_url: impl Into<String>) {
        self.sources.insert(element_id.into(), source_url.into());
    }

    fn fetch(&self, source_url: &str) -> Result<(Vec<u8>, String)> {
        let url = match &self.proxy {
            Some(proxy) => format!("{proxy}{source_url}"),
            None => source_url.to_string(),
        };
        let res = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::NetworkError(format!("Capture GET failed: {e}")))?;
        if !res.status().is_success() {
            return Err(Error::CaptureError(format!(
                "Capture GET returned {}",
                res.status()
            )));
        }
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = res
            .bytes()
            .map_err(|e| Error::NetworkError(format!("Failed to read capture body: {e}")))?;
        Ok((bytes.to_vec(), content_type))
    }
}

impl ImageExporter for HttpImageExporter {
    fn export_as_image(&self, element_id: &str) -> Option<String> {
        let Some(source) = self.sources.get(element_id) else {
            // Missing element: degrade silently, same as the DOM lookup miss
            return None;
        };
        match self.fetch(source) {
            Ok((bytes, content_type)) => {
                let b64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
                Some(format!("data:{content_type};base64,{b64}"))
            }
            Err(e) => {
                warn!("Preview capture for {element_id:?} failed: {e}");
                None
            }
        }
    }
}
