use super::*;

#[test]
fn parse_extracts_first_image() {
    let json = serde_json::json!({
        "created": 1_700_000_000,
        "data": [{ "b64_json": "iVBORw0KGgo=" }, { "b64_json": "second" }]
    })
    .to_string();
    assert_eq!(parse_generation_response(&json).unwrap(), "iVBORw0KGgo=");
}

#[test]
fn parse_empty_data_is_empty_image() {
    let json = serde_json::json!({ "created": 1, "data": [] }).to_string();
    assert!(matches!(parse_generation_response(&json), Err(ImageGenError::EmptyImage)));
}

#[test]
fn parse_missing_data_is_empty_image() {
    assert!(matches!(parse_generation_response("{}"), Err(ImageGenError::EmptyImage)));
}

#[test]
fn parse_blank_or_null_payload_is_empty_image() {
    let blank = serde_json::json!({ "data": [{ "b64_json": "" }] }).to_string();
    assert!(matches!(parse_generation_response(&blank), Err(ImageGenError::EmptyImage)));

    let null = serde_json::json!({ "data": [{ "b64_json": null, "url": "https://x" }] }).to_string();
    assert!(matches!(parse_generation_response(&null), Err(ImageGenError::EmptyImage)));
}

#[test]
fn parse_non_json_is_parse_error() {
    assert!(matches!(parse_generation_response("<html>"), Err(ImageGenError::ApiParse(_))));
}

#[test]
fn request_body_carries_fixed_format() {
    let body = GenerationRequest { model: "dall-e-3", prompt: "a cat", n: 1, size: "1024x1024", response_format: "b64_json" };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "model": "dall-e-3",
            "prompt": "a cat",
            "n": 1,
            "size": "1024x1024",
            "response_format": "b64_json"
        })
    );
}
