//! Payment slip rules: accepted upload types, stored file naming and the
//! review transition.

use crate::error::CoreError;
use crate::status::PaymentSlipStatus;
use crate::types::DbId;

/// File extensions accepted for uploaded payment slips.
pub const ALLOWED_SLIP_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

/// Extract and validate the lowercase extension of an uploaded file name.
pub fn slip_extension(filename: &str) -> Result<String, CoreError> {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| CoreError::Validation("Payment slip file has no extension".into()))?;

    if !ALLOWED_SLIP_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "Unsupported payment slip format '{ext}'. Allowed: {}",
            ALLOWED_SLIP_EXTENSIONS.join(", ")
        )));
    }
    Ok(ext)
}

/// Stored file name for a slip: `booking_{id}_{millis}.{ext}`.
pub fn slip_file_name(booking_id: DbId, uploaded_at_millis: i64, ext: &str) -> String {
    format!("booking_{booking_id}_{uploaded_at_millis}.{ext}")
}

/// A slip can be reviewed once, from UPLOADED or PENDING to VERIFIED or
/// REJECTED.
pub fn validate_verification(
    current: PaymentSlipStatus,
    target: PaymentSlipStatus,
) -> Result<(), CoreError> {
    if !matches!(target, PaymentSlipStatus::Verified | PaymentSlipStatus::Rejected) {
        return Err(CoreError::Validation(format!(
            "Payment slip can only be marked verified or rejected, not {}",
            target.as_str()
        )));
    }
    if !matches!(current, PaymentSlipStatus::Uploaded | PaymentSlipStatus::Pending) {
        return Err(CoreError::Conflict(format!(
            "Payment slip has already been {}",
            current.as_str()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_known_extensions_case_insensitively() {
        assert_eq!(slip_extension("receipt.PDF").unwrap(), "pdf");
        assert_eq!(slip_extension("scan.final.jpeg").unwrap(), "jpeg");
    }

    #[test]
    fn rejects_unknown_or_missing_extension() {
        assert_matches!(
            slip_extension("payload.exe"),
            Err(CoreError::Validation(msg)) if msg.contains("Unsupported")
        );
        assert!(slip_extension("README").is_err());
    }

    #[test]
    fn file_name_embeds_booking_and_time() {
        assert_eq!(slip_file_name(42, 1_736_500_000_000, "png"), "booking_42_1736500000000.png");
    }

    #[test]
    fn review_only_from_open_states() {
        use PaymentSlipStatus::*;
        assert!(validate_verification(Uploaded, Verified).is_ok());
        assert!(validate_verification(Pending, Rejected).is_ok());
        assert_matches!(
            validate_verification(Verified, Rejected),
            Err(CoreError::Conflict(msg)) if msg == "Payment slip has already been verified"
        );
    }

    #[test]
    fn review_target_must_be_terminal() {
        assert_matches!(
            validate_verification(PaymentSlipStatus::Uploaded, PaymentSlipStatus::Pending),
            Err(CoreError::Validation(_))
        );
    }
}
