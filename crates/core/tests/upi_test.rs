//! Tests for UPI deep-link construction.

use rubrica_core::upi::build_upi_url;

#[test]
fn test_basic_link() {
    let url = build_upi_url("merchant@upi", 49.0, None);
    assert!(url.starts_with("upi://pay?"));
    assert!(url.contains("pa=merchant%40upi"));
    assert!(url.contains("pn=SignaturePDF"));
    assert!(url.contains("am=49"));
    assert!(url.contains("cu=INR"));
    assert!(url.contains("tn=PDF%20Signature%20Service"));
}

#[test]
fn test_custom_note_is_encoded() {
    let url = build_upi_url("merchant@upi", 12.5, Some("doc #7 & co"));
    assert!(url.contains("am=12.5"));
    assert!(url.contains("tn=doc%20%237%20%26%20co"));
}
