//! Integration tests for HTTP-backed preview capture

use hypercert_form::capture::{HttpImageExporter, ImageExporter};
use hypercert_form::IMAGE_SELECTOR;
use tiny_http::{Header, Response, Server};

// Minimal valid PNG header plus a few bytes of body
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n0000";

/// Serve one response on an ephemeral port and return its base URL
fn serve_once(status: u16, body: &'static [u8]) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();

    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let response = Response::from_data(body)
                .with_status_code(status)
                .with_header("Content-Type: image/png".parse::<Header>().unwrap());
            let _ = request.respond(response);
        }
    });

    format!("http://{}", addr)
}

#[test]
fn capture_produces_a_png_data_url() {
    let url = serve_once(200, PNG_BYTES);
    let mut exporter = HttpImageExporter::new(5000).expect("client");
    exporter.register(IMAGE_SELECTOR, url);

    let data_url = exporter
        .export_as_image(IMAGE_SELECTOR)
        .expect("capture failed");
    assert!(data_url.starts_with("data:image/png;base64,"));

    // The payload decodes back to the served bytes
    use base64::Engine as _;
    let b64 = data_url.split(',').nth(1).unwrap();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64)
        .unwrap();
    assert_eq!(bytes, PNG_BYTES);
}

#[test]
fn server_error_degrades_to_none() {
    let url = serve_once(500, b"nope");
    let mut exporter = HttpImageExporter::new(5000).expect("client");
    exporter.register(IMAGE_SELECTOR, url);

    assert_eq!(exporter.export_as_image(IMAGE_SELECTOR), None);
}

#[test]
fn unreachable_host_degrades_to_none() {
    let mut exporter = HttpImageExporter::new(500).expect("client");
    // Nothing listens here
    exporter.register(IMAGE_SELECTOR, "http://127.0.0.1:1/preview.png");

    assert_eq!(exporter.export_as_image(IMAGE_SELECTOR), None);
}

#[test]
fn missing_element_degrades_to_none() {
    let exporter = HttpImageExporter::new(500).expect("client");
    assert_eq!(exporter.export_as_image("no-such-element"), None);
}
