use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

/// Indentation of the state file.
pub const INDENT: &[u8] = b"    ";

/// Top-level keys, in the order they are written.
pub const SECTORS_KEY: &str = "crypto_sectors";
pub const TARGETS_KEY: &str = "targets";

/// Serialize a portfolio to the state-file layout.
///
/// Layout:
/// ```text
/// {
///     "crypto_sectors": {
///         "DeFi": [
///             "uniswap",
///             ...
///         ],
///         ...
///     },
///     "targets": {
///         "uniswap": 100.0,
///         ...
///     }
/// }
/// ```
/// Four-space indentation, no trailing newline, keys in insertion order.
pub fn write_file(portfolio: &Portfolio) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    portfolio
        .serialize(&mut ser)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))?;
    Ok(buf)
}

/// Parse state-file bytes back into a portfolio.
///
/// Both top-level keys are required. Unknown extra keys are ignored.
pub fn read_file(data: &[u8]) -> Result<Portfolio, CoreError> {
    let text = std::str::from_utf8(data)
        .map_err(|_| CoreError::InvalidFileFormat("State file is not valid UTF-8".into()))?;
    if text.trim().is_empty() {
        return Err(CoreError::InvalidFileFormat("State file is empty".into()));
    }

    let value: serde_json::Value = serde_json::from_str(text)?;
    let Some(object) = value.as_object() else {
        return Err(CoreError::InvalidFileFormat(
            "State file must contain a JSON object".into(),
        ));
    };
    for key in [SECTORS_KEY, TARGETS_KEY] {
        if !object.contains_key(key) {
            return Err(CoreError::InvalidFileFormat(format!(
                "State file is missing the '{key}' key"
            )));
        }
    }

    // Re-parse from text rather than from `value`: `serde_json::Value` does not
    // keep key order unless `preserve_order` is on, and sector order matters.
    let portfolio: Portfolio = serde_json::from_str(text)
        .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize portfolio: {e}")))?;
    Ok(portfolio)
}
