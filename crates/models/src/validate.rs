//! Shallow field checks shared by every record.

use chrono::NaiveDate;

use crate::errors::ModelError;

pub fn required(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::invalid(field, "is required"));
    }
    Ok(())
}

pub fn required_opt(field: &str, value: Option<&String>) -> Result<(), ModelError> {
    match value {
        Some(v) => required(field, v),
        None => Ok(()),
    }
}

pub fn email(field: &str, value: Option<&String>) -> Result<(), ModelError> {
    match value {
        Some(v) if !v.is_empty() && !v.contains('@') => Err(ModelError::invalid(field, "must be an email address")),
        _ => Ok(()),
    }
}

pub fn non_negative(field: &str, value: f64) -> Result<(), ModelError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ModelError::invalid(field, "must be a non-negative number"));
    }
    Ok(())
}

pub fn non_negative_opt(field: &str, value: Option<f64>) -> Result<(), ModelError> {
    value.map_or(Ok(()), |v| non_negative(field, v))
}

pub fn non_negative_int(field: &str, value: i64) -> Result<(), ModelError> {
    if value < 0 {
        return Err(ModelError::invalid(field, "must not be negative"));
    }
    Ok(())
}

pub fn non_negative_int_opt(field: &str, value: Option<i64>) -> Result<(), ModelError> {
    value.map_or(Ok(()), |v| non_negative_int(field, v))
}

pub fn date(field: &str, value: Option<&String>) -> Result<(), ModelError> {
    match value {
        Some(v) if NaiveDate::parse_from_str(v, "%Y-%m-%d").is_err() => {
            Err(ModelError::invalid(field, "must be a YYYY-MM-DD date"))
        }
        _ => Ok(()),
    }
}

/// Payroll periods are calendar months, `YYYY-MM`.
pub fn period(field: &str, value: &str) -> Result<(), ModelError> {
    if value.len() != 7 || NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").is_err() {
        return Err(ModelError::invalid(field, "must be a YYYY-MM period"));
    }
    Ok(())
}

pub fn one_of(field: &str, value: Option<&String>, allowed: &[&str]) -> Result<(), ModelError> {
    match value {
        Some(v) if !allowed.contains(&v.as_str()) => {
            Err(ModelError::Validation(format!("{field} must be one of: {}", allowed.join(", "))))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_accepts_only_year_month() {
        assert!(period("period", "2024-03").is_ok());
        assert!(period("period", "2024-13").is_err());
        assert!(period("period", "2024-3").is_err());
        assert!(period("period", "2024-03-01").is_err());
    }

    #[test]
    fn email_allows_absent_and_empty() {
        assert!(email("email", None).is_ok());
        assert!(email("email", Some(&String::new())).is_ok());
        assert!(email("email", Some(&"nope".to_string())).is_err());
    }

    #[test]
    fn non_negative_rejects_nan() {
        assert!(non_negative("total", f64::NAN).is_err());
        assert!(non_negative("total", 0.0).is_ok());
    }
}
