use crate::error::{FenceError, Result};

const TRUE_VALUES: [&str; 5] = ["true", "yes", "y", "on", "1"];
const FALSE_VALUES: [&str; 6] = ["false", "no", "n", "off", "0", "none"];

/// Parses a free-form string into a tri-state boolean.
///
/// Matching is case-insensitive. With `preserve_none`, the literal `none`
/// yields `Ok(None)` instead of `Ok(Some(false))`.
///
/// # Errors
///
/// Returns [`FenceError::InvalidBool`] for an unrecognised value when
/// `fail_on_errors` is set. Otherwise an unrecognised value yields `Ok(None)`.
pub fn parse_bool_value(
    value: &str,
    fail_on_errors: bool,
    preserve_none: bool,
) -> Result<Option<bool>> {
    let lowered = value.to_lowercase();

    if preserve_none && lowered == "none" {
        return Ok(None);
    }
    if TRUE_VALUES.contains(&lowered.as_str()) {
        return Ok(Some(true));
    }
    if FALSE_VALUES.contains(&lowered.as_str()) {
        return Ok(Some(false));
    }
    if fail_on_errors {
        return Err(FenceError::InvalidBool(value.to_string()));
    }
    Ok(None)
}
