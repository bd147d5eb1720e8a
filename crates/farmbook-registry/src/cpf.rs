//! CPF (Brazilian tax id) normalization

use crate::error::{RegistryError, Result};

const CPF_DIGITS: usize = 11;

/// Strip everything but digits and format as `DDD.DDD.DDD-DD`.
///
/// Check digits are not verified; any 11 digits are accepted.
pub fn normalize_cpf(raw: &str) -> Result<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != CPF_DIGITS {
        return Err(RegistryError::Validation(
            "CPF must contain 11 digits".to_string(),
        ));
    }

    Ok(format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    ))
}
