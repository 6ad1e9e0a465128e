use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        if let Some(extension) = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            if !allowed_set.contains(extension.to_ascii_lowercase().as_str()) {
                return Err(EtlError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
        } else {
            return Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: file.clone(),
                reason: "File has no extension or invalid filename".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// `#RGB` or `#RRGGBB`.
pub fn validate_hex_color(field_name: &str, value: &str) -> Result<()> {
    let valid = value
        .strip_prefix('#')
        .map(|hex| (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false);

    if !valid {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected a hex color such as #1F77B4".to_string(),
        });
    }
    Ok(())
}

pub fn validate_unique(field_name: &str, values: &[&str]) -> Result<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(*value) {
            return Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.to_string(),
                reason: "Duplicate value".to_string(),
            });
        }
    }
    Ok(())
}
