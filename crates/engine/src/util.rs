//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so both storage backends see identical rules.

use crate::{EngineError, Money, ResultEngine};

/// Trim a required name and reject blank input.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional text, mapping blank input to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn ensure_in_range(amount: Money, label: &str) -> ResultEngine<()> {
    if !amount.in_range() {
        return Err(EngineError::Validation(format!(
            "{label} must not exceed {}",
            Money::MAX
        )));
    }
    Ok(())
}

pub(crate) fn ensure_positive(amount: Money, label: &str) -> ResultEngine<()> {
    ensure_in_range(amount, label)?;
    if !amount.is_positive() {
        return Err(EngineError::Validation(format!(
            "{label} must be greater than zero"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(amount: Money, label: &str) -> ResultEngine<()> {
    ensure_in_range(amount, label)?;
    if amount.is_negative() {
        return Err(EngineError::Validation(format!(
            "{label} must not be negative"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(
            normalize_required_name("  Groceries ", "budget").unwrap(),
            "Groceries"
        );
        assert_eq!(
            normalize_required_name("   ", "budget").unwrap_err(),
            EngineError::Validation("budget name must not be empty".to_string())
        );
    }

    #[test]
    fn amount_bounds() {
        assert!(ensure_positive(Money::new(1), "amount").is_ok());
        assert!(ensure_positive(Money::ZERO, "amount").is_err());
        assert!(ensure_non_negative(Money::ZERO, "amount").is_ok());
        assert!(ensure_non_negative(Money::new(-1), "amount").is_err());
        assert!(ensure_positive(Money::MAX, "amount").is_ok());
        assert_eq!(
            ensure_positive(Money::new(i64::MAX), "amount").unwrap_err(),
            EngineError::Validation("amount must not exceed 9999999999999.99".to_string())
        );
        assert!(ensure_non_negative(Money::new(i64::MAX), "amount").is_err());
    }
}
