//! Encoding helpers for cart item uids and link search strings.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::BTreeMap;

/// Encodes a value as standard base64, as the cart backend expects for item uids.
///
/// ```
/// use cartflow::utils::encode_base64;
///
/// assert_eq!(encode_base64("42"), "NDI=");
/// ```
#[must_use]
pub fn encode_base64(value: impl AsRef<[u8]>) -> String {
    STANDARD.encode(value)
}

/// Builds a `?key=value&...` search string from parameters.
///
/// Returns an empty string when there are no parameters. Keys come out in
/// sorted order; values are not escaped.
#[must_use]
pub fn object_to_uri(params: &BTreeMap<String, String>) -> String {
    if params.is_empty() {
        return String::new();
    }

    let joined = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("?{joined}")
}
