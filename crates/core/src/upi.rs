//! UPI deep-link construction for the payment step.

/// Payee display name embedded in every payment link.
const PAYEE_NAME: &str = "SignaturePDF";

/// Transaction note used when the caller supplies none.
const DEFAULT_NOTE: &str = "PDF Signature Service";

/// Build a `upi://pay` deep link for the given payee VPA and amount in
/// rupees. All parameter values are percent-encoded.
pub fn build_upi_url(upi_id: &str, amount: f64, note: Option<&str>) -> String {
    let note = note.unwrap_or(DEFAULT_NOTE);
    format!(
        "upi://pay?pa={}&pn={}&am={}&cu=INR&tn={}",
        urlencoding::encode(upi_id),
        urlencoding::encode(PAYEE_NAME),
        urlencoding::encode(&amount.to_string()),
        urlencoding::encode(note),
    )
}
