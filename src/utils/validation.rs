use crate::utils::error::{QualifierError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(QualifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(QualifierError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(QualifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// A dataset location is either an http(s) URL or a local path.
pub fn validate_dataset_location(field_name: &str, location: &str) -> Result<()> {
    validate_non_empty_string(field_name, location)?;
    if location.starts_with("http://") || location.starts_with("https://") {
        return validate_url(field_name, location);
    }
    if location.contains('\0') {
        return Err(QualifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: location.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(QualifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_threshold(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(QualifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Threshold must be a finite, non-negative number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_terms(field_name: &str, terms: &[String]) -> Result<()> {
    if terms.is_empty() {
        return Err(QualifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one term is required".to_string(),
        });
    }
    for term in terms {
        validate_non_empty_string(field_name, term)?;
    }
    Ok(())
}

pub fn validate_required_field<'a>(field_name: &str, value: &'a Option<String>) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() && !is_unresolved_placeholder(v) => Ok(v),
        _ => Err(QualifierError::MissingConfigError {
            field: field_name.to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(QualifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

// `${VAR}` left behind when the variable was not set in the environment.
fn is_unresolved_placeholder(value: &str) -> bool {
    value.starts_with("${") && value.ends_with('}')
}
