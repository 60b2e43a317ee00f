use crate::core::error::CalcError;

/// Checks a user-supplied base investment amount.
pub fn validate_base_investment(amount: f64) -> Result<f64, CalcError> {
    if !amount.is_finite() {
        return Err(CalcError::InvalidInput(
            "Please enter a valid number".to_string(),
        ));
    }
    if amount <= 0.0 {
        return Err(CalcError::InvalidInput(
            "Amount must be greater than 0".to_string(),
        ));
    }
    Ok(amount)
}

/// Parses and validates a base investment typed in by the user.
pub fn parse_base_investment(raw: &str) -> Result<f64, CalcError> {
    let amount = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| CalcError::InvalidInput("Please enter a valid number".to_string()))?;
    validate_base_investment(amount)
}
