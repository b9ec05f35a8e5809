//! Team name validation
//!
//! Team names are shown on the big screen, so they are trimmed, length
//! limited, filtered for inappropriate content and kept unique within the
//! roster.

use rustrict::CensorStr;
use serde::Serialize;
use thiserror::Error;

use crate::constants::roster::MAX_NAME_LENGTH;

/// Errors that can occur during team name validation
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Another team already uses the name
    #[error("name already in-use")]
    Used,
    /// The name is empty or contains only whitespace
    #[error("name cannot be empty")]
    Empty,
    /// The name contains inappropriate content
    #[error("name is inappropriate")]
    Sinful,
    /// The name exceeds the maximum allowed length
    #[error("name is too long")]
    TooLong,
}

/// Cleans and validates a requested team name
///
/// # Arguments
///
/// * `name` - The requested name (will be trimmed of whitespace)
/// * `taken` - Names currently used by the other teams
///
/// # Returns
///
/// The cleaned name on success.
///
/// # Errors
///
/// * `Error::TooLong` - Name exceeds the maximum length
/// * `Error::Empty` - Name is empty after trimming whitespace
/// * `Error::Sinful` - Name contains inappropriate content
/// * `Error::Used` - Name matches another team's name, ignoring case
pub fn clean<'a, I>(name: &str, mut taken: I) -> Result<String, Error>
where
    I: Iterator<Item = &'a str>,
{
    let name = rustrict::trim_whitespace(name);
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::TooLong);
    }
    if name.is_empty() {
        return Err(Error::Empty);
    }
    if name.is_inappropriate() {
        return Err(Error::Sinful);
    }
    if taken.any(|other| other.eq_ignore_ascii_case(name)) {
        return Err(Error::Used);
    }
    Ok(name.to_owned())
}
