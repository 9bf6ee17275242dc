/// Input validation for route parameters and configuration
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Player name cannot be empty")]
    PlayerNameEmpty,

    #[error("Player name too long (max 32 characters, got {0})")]
    PlayerNameTooLong(usize),

    #[error("Player name contains invalid characters (no whitespace, slashes or control characters)")]
    PlayerNameInvalidChars,

    #[error("Server ID cannot be empty")]
    ServerIdEmpty,

    #[error("Server ID contains invalid characters (only alphanumeric allowed)")]
    ServerIdInvalidChars,
}

/// Longest name accepted in a lookup. Java names stop at 16, but proxies such as
/// Floodgate prefix Bedrock gamertags (up to 16 more).
pub const MAX_PLAYER_NAME_LEN: usize = 32;

/// Validates a player name used in a lookup
///
/// Rules:
/// - Cannot be empty
/// - Max 32 characters
/// - No whitespace, path separators or control characters
///
/// Anything else the hosting API reports (e.g. `.BedrockGuy`) is accepted.
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::PlayerNameEmpty);
    }

    let len = name.chars().count();
    if len > MAX_PLAYER_NAME_LEN {
        return Err(ValidationError::PlayerNameTooLong(len));
    }

    if name
        .chars()
        .any(|c| c.is_control() || c.is_whitespace() || c == '/' || c == '\\')
    {
        return Err(ValidationError::PlayerNameInvalidChars);
    }

    Ok(())
}

/// Validates an Exaroton server ID (e.g. "tgkm731xO7GiHt76")
pub fn validate_server_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::ServerIdEmpty);
    }

    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::ServerIdInvalidChars);
    }

    Ok(())
}
