use validator::ValidationError;

pub const MAX_MESSAGE_LENGTH: usize = 500;

/// Validates that the signer name is present and not just whitespace
pub fn validate_entry_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_required");
        err.message = Some("Name is required".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that the message is present, not just whitespace, and within
/// the length limit
pub fn validate_entry_message(message: &str) -> Result<(), ValidationError> {
    if message.trim().is_empty() {
        let mut err = ValidationError::new("message_required");
        err.message = Some("Message is required".into());
        return Err(err);
    }

    // Length is counted in characters, not bytes, so multi-byte messages
    // are not penalized
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        let mut err = ValidationError::new("message_too_long");
        err.message = Some("Message too long (max 500 characters)".into());
        return Err(err);
    }

    Ok(())
}
