//! JSON Extraction from Free-Form Replies

use crate::OracleError;
use serde::de::DeserializeOwned;

/// Find the outermost brace-delimited span in `text`.
///
/// Takes everything from the first `{` through the last `}`, so prose or
/// markdown fences around the object are ignored.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Extract and deserialize the JSON object embedded in an oracle reply
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, OracleError> {
    let json = extract_json_object(text).ok_or(OracleError::NoJson)?;
    serde_json::from_str(json).map_err(|e| OracleError::Parse(e.to_string()))
}
