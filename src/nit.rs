//! Colombian NIT verification digit (DIAN "dígito de verificación")

use serde::Serialize;
use tracing::warn;

use crate::error::{FormError, Result};
use crate::form::FormField;

/// DIAN document type code for a NIT
pub const NIT_DOCUMENT_TYPE: &str = "31";

/// Longest identifier the DIAN weight table covers
pub const MAX_NIT_DIGITS: usize = 15;

/// DIAN prime weights; the first applies to the rightmost digit
const WEIGHTS: [u32; MAX_NIT_DIGITS] = [3, 7, 13, 17, 19, 23, 29, 37, 41, 43, 47, 53, 59, 67, 71];

/// Label of the transient read-only field shown next to a NIT
pub const VERIFICATION_DIGIT_LABEL: &str = "Dígito de Verificación (DV)";

const NIT_MARKERS: &[&str] = &["nit"];
const DOCUMENT_TYPE_MARKERS: &[&str] = &["tipodocumento", "tipo de documento"];
const VERIFICATION_DIGIT_MARKERS: &[&str] = &[
    "digitoverificacion",
    "digito de verificacion",
    "dígito de verificación",
    "verification digit",
];

/// Compute the verification digit for a NIT
///
/// The NIT is treated as left-padded with zeros to 15 digits; each digit is
/// multiplied by its weight counting from the right, and the weighted sum
/// is reduced mod 11. Remainders 0 and 1 are the digit itself, anything
/// else is `11 - remainder`.
pub fn compute_verification_digit(tax_id: &str) -> Result<u8> {
    let well_formed = !tax_id.is_empty()
        && tax_id.len() <= MAX_NIT_DIGITS
        && tax_id.bytes().all(|b| b.is_ascii_digit());

    if !well_formed {
        warn!(nit = tax_id, "NIT must contain only digits");
        return Err(FormError::InvalidFormat(tax_id.to_string()));
    }

    let sum: u32 = tax_id
        .bytes()
        .rev()
        .zip(WEIGHTS)
        .map(|(b, weight)| u32::from(b - b'0') * weight)
        .sum();

    let remainder = sum % 11;
    let digit = if remainder > 1 { 11 - remainder } else { remainder };
    Ok(digit as u8)
}

/// Outcome of [`validate_nit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NitValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_digit: Option<u8>,
}

/// Validate a NIT for the given document type code
///
/// Only document type `31` is checked; every other type is accepted
/// without computing a digit.
pub fn validate_nit(nit: &str, document_type_code: &str) -> NitValidation {
    if document_type_code != NIT_DOCUMENT_TYPE {
        return NitValidation {
            is_valid: true,
            verification_digit: None,
        };
    }

    match compute_verification_digit(nit) {
        Ok(digit) => NitValidation {
            is_valid: true,
            verification_digit: Some(digit),
        },
        Err(_) => NitValidation {
            is_valid: false,
            verification_digit: None,
        },
    }
}

fn mentions(field: &FormField, markers: &[&str]) -> bool {
    let name = field.name.to_lowercase();
    let label = field.label.to_lowercase();
    markers
        .iter()
        .any(|m| name.contains(m) || label.contains(m))
}

/// First field that holds a NIT
pub fn nit_field(fields: &[FormField]) -> Option<&FormField> {
    fields.iter().find(|f| mentions(f, NIT_MARKERS))
}

/// Whether a field list should show a computed verification digit
///
/// Requires a NIT field and a document type field, and no field that
/// already stores the digit.
pub fn is_dv_eligible(fields: &[FormField]) -> bool {
    nit_field(fields).is_some()
        && fields.iter().any(|f| mentions(f, DOCUMENT_TYPE_MARKERS))
        && !fields.iter().any(|f| mentions(f, VERIFICATION_DIGIT_MARKERS))
}

/// Read-only display row for the verification digit
///
/// Never part of a saved field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDigitField {
    pub label: &'static str,
    /// Name of the field the digit is computed from
    pub source_field: String,
    /// `None` until the NIT value is well formed
    pub value: Option<u8>,
}

/// Build the verification digit row for `fields` from the live NIT value
pub fn verification_digit_field(
    fields: &[FormField],
    nit_value: Option<&str>,
) -> Option<VerificationDigitField> {
    if !is_dv_eligible(fields) {
        return None;
    }

    let source = nit_field(fields)?;
    let value = nit_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| compute_verification_digit(v).ok());

    Some(VerificationDigitField {
        label: VERIFICATION_DIGIT_LABEL,
        source_field: source.name.clone(),
        value,
    })
}
