//! Verify transcript formatting against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector gives the exchange metadata, the body as a byte array (or
//! `null` for no body) and the exact expected transcript. Every formatted
//! transcript is also checked to hold only `\n` and 0x20-0x7e.

use transcript_core::{format_request, format_response, Headers, HttpMethod, RequestHead, ResponseHead};

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => HttpMethod::Other(other.to_string()),
    }
}

fn parse_headers(value: &serde_json::Value) -> Headers {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap(), arr[1].as_str().unwrap())
        })
        .collect()
}

fn parse_body(value: &serde_json::Value) -> Option<Vec<u8>> {
    if value.is_null() {
        return None;
    }
    Some(
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|b| u8::try_from(b.as_u64().unwrap()).unwrap())
            .collect(),
    )
}

fn assert_printable(transcript: &str, name: &str) {
    assert!(
        transcript.bytes().all(|b| b == b'\n' || (0x20..=0x7e).contains(&b)),
        "{name}: {transcript:?}"
    );
}

fn vectors() -> serde_json::Value {
    let raw = include_str!("../../test-vectors/transcripts.json");
    serde_json::from_str(raw).unwrap()
}

#[test]
fn request_test_vectors() {
    for case in vectors()["requests"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let head = RequestHead {
            method: parse_method(case["method"].as_str().unwrap()),
            path: case["path"].as_str().unwrap().to_string(),
            headers: parse_headers(&case["headers"]),
        };
        let body = parse_body(&case["body"]);

        let transcript = format_request(&head, body.as_deref());
        assert_eq!(transcript, case["expected"].as_str().unwrap(), "{name}");
        assert_printable(&transcript, name);
    }
}

#[test]
fn response_test_vectors() {
    for case in vectors()["responses"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let head = ResponseHead {
            protocol: case["protocol"].as_str().unwrap().to_string(),
            status: case["status"].as_u64().unwrap() as u16,
            message: case["message"].as_str().unwrap().to_string(),
            headers: parse_headers(&case["headers"]),
        };
        let body = parse_body(&case["body"]);

        let transcript = format_response(&head, body.as_deref());
        assert_eq!(transcript, case["expected"].as_str().unwrap(), "{name}");
        assert_printable(&transcript, name);
    }
}
