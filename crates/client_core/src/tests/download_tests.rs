use super::*;

#[test]
fn decodes_base64_data_url() {
    let bytes = decode_data_url("data:application/pdf;base64,JVBERi0xLjc=")
        .expect("data url")
        .expect("decoded");
    assert_eq!(bytes, b"%PDF-1.7");
}

#[test]
fn plain_data_url_payload_is_taken_verbatim() {
    let bytes = decode_data_url("data:text/plain,hello")
        .expect("data url")
        .expect("decoded");
    assert_eq!(bytes, b"hello");
}

#[test]
fn data_url_without_payload_separator_is_malformed() {
    let result = decode_data_url("data:application/pdf;base64").expect("data url");
    assert!(matches!(result, Err(DownloadError::MalformedDataUrl)));
}

#[test]
fn invalid_base64_is_reported() {
    let result = decode_data_url("data:application/pdf;base64,@@@").expect("data url");
    assert!(matches!(result, Err(DownloadError::Base64(_))));
}

#[test]
fn http_links_are_not_data_urls() {
    assert!(decode_data_url("https://example.test/clean.pdf").is_none());
    assert!(decode_data_url("/downloads/clean.pdf").is_none());
}

#[tokio::test]
async fn empty_link_is_rejected_before_any_request() {
    let base = Url::parse("http://127.0.0.1:9").expect("base");
    let result = fetch_download(&Client::new(), &base, "  ").await;
    assert!(matches!(result, Err(DownloadError::EmptyLink)));
}

#[test]
fn suggested_name_prefers_service_name() {
    assert_eq!(suggested_file_name(Some("clean_a.pdf"), "a.pdf"), "clean_a.pdf");
    assert_eq!(suggested_file_name(Some("  "), "a.pdf"), "clean_a.pdf");
    assert_eq!(suggested_file_name(None, "report.pdf"), "clean_report.pdf");
}
