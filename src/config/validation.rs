use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref name) = config.event_name {
        if name.trim().is_empty() {
            errors.push("event_name: must not be blank".to_string());
        }
    }

    if let Some(ref data_file) = config.data_file {
        let trimmed = data_file.trim();
        if trimmed.is_empty() {
            errors.push("data_file: must not be blank".to_string());
        } else if trimmed.ends_with('/') || trimmed.ends_with('\\') {
            errors.push(format!(
                "data_file: '{}' is a directory, expected a file path",
                data_file
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
