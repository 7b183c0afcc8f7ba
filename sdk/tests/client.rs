//! Client tests against a loopback server that answers one request
//! with a canned HTTP response.

use roi_core::config::AppConfig;
use roi_sdk::{CalculationData, CalculationRequest, CalculatorClient};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

struct Captured {
    request_line: String,
    headers:      Vec<String>,
    body:         String,
}

/// Serve exactly one request, then return what was received.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = v.trim().parse().unwrap_or(0);
            }
            headers.push(line);
        }

        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        Captured {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: String::from_utf8(request_body).unwrap(),
        }
    });

    (base_url, handle)
}

/// A base URL nothing is listening on.
fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn client(base_url: &str) -> CalculatorClient {
    CalculatorClient::new(Some("iw_test_key"), base_url, Duration::from_secs(5)).expect("client")
}

#[test]
fn transport_failure_returns_zeroed_response() {
    let client = client(&dead_base_url());
    let response = client.calculate_roi(&CalculationRequest::new(10_000.0, 500.0, "US"));

    assert!(!response.success);
    assert_eq!(response.data, CalculationData::default());
    assert_eq!(response.data.total_value, 0.0);
    assert_eq!(response.data.roi, 0.0);
    assert_eq!(response.data.breakdown.initial_investment, 0.0);
    assert_eq!(response.data.breakdown.additional_costs, 0.0);
    assert_eq!(response.data.breakdown.returns, 0.0);
    let message = response.error.expect("error message");
    assert!(!message.is_empty());
}

#[test]
fn successful_calculation_is_decoded() {
    let (base_url, server) = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"success":true,"data":{"totalValue":13000,"roi":25.0,"breakdown":{"initialInvestment":10000,"additionalCosts":500,"returns":2500},"meta":{"function":"roi"}}}"#,
    );

    let response = client(&base_url).calculate_roi(&CalculationRequest::new(10_000.0, 500.0, "US"));
    let captured = server.join().unwrap();

    assert!(response.success);
    assert_eq!(response.error, None);
    assert_eq!(response.data.total_value, 13_000.0);
    assert_eq!(response.data.roi, 25.0);
    assert_eq!(response.data.breakdown.returns, 2_500.0);

    assert_eq!(captured.request_line, "POST /v1/calculator/roi HTTP/1.1");
    assert!(captured
        .headers
        .iter()
        .any(|h| h.eq_ignore_ascii_case("authorization: Bearer iw_test_key")));
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent["initialInvestment"], 10_000.0);
    assert_eq!(sent["additionalCosts"], 500.0);
    assert_eq!(sent["countryCode"], "US");
}

#[test]
fn server_error_payload_message_is_surfaced() {
    let (base_url, server) = serve_once(
        "HTTP/1.1 400 Bad Request",
        r#"{"success":false,"error":"Values must be non-negative"}"#,
    );

    let response = client(&base_url).calculate_roi(&CalculationRequest::new(-1.0, 0.0, "US"));
    server.join().unwrap();

    assert!(!response.success);
    assert_eq!(response.data, CalculationData::default());
    assert_eq!(response.error.as_deref(), Some("Values must be non-negative"));
}

/// A 2xx reply that reports failure keeps the server's message.
#[test]
fn failure_reported_with_ok_status_keeps_server_message() {
    let (base_url, server) = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"success":false,"error":"Monthly quota exceeded"}"#,
    );

    let response = client(&base_url).calculate_roi(&CalculationRequest::new(1.0, 0.0, "US"));
    server.join().unwrap();

    assert!(!response.success);
    assert_eq!(response.data, CalculationData::default());
    assert_eq!(response.error.as_deref(), Some("Monthly quota exceeded"));
}

#[test]
fn undecodable_success_body_is_a_failure() {
    let (base_url, server) = serve_once("HTTP/1.1 200 OK", r#"{"unexpected":true}"#);

    let response = client(&base_url).calculate_roi(&CalculationRequest::new(1.0, 0.0, "US"));
    server.join().unwrap();

    assert!(!response.success);
    assert!(response.error.unwrap().starts_with("Invalid response body"));
}

#[test]
fn health_check_passes_payload_through() {
    let (base_url, server) = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"success":true,"data":{"status":"healthy"}}"#,
    );

    let health = client(&base_url).health_check();
    let captured = server.join().unwrap();

    assert!(health.success);
    assert_eq!(health.data["status"], "healthy");
    assert_eq!(captured.request_line, "GET /v1/health HTTP/1.1");
}

#[test]
fn health_check_failure_carries_error() {
    let health = client(&dead_base_url()).health_check();
    assert!(!health.success);
    assert!(health.data["error"].as_str().is_some());
}

#[test]
fn client_builds_from_config() {
    let config = AppConfig::default_test();
    let client = CalculatorClient::from_config(&config.api).expect("client from config");
    assert_eq!(client.base_url(), "http://127.0.0.1:9");
}
