//! Conversions from raw JSON values into typed Rust values.

use serde_json::Value;

/// Why a JSON value was refused by [`FromJson::from_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The JSON type does not fit the target type at all.
    WrongType,
    /// The JSON type fits but the value cannot be represented.
    OutOfRange,
}

/// Types that can be extracted from a single JSON value.
pub trait FromJson: Sized {
    /// Name used in log messages when a value is rejected.
    const EXPECTED: &'static str;

    /// Converts `value`, or explains why it cannot be converted.
    fn from_json(value: &Value) -> Result<Self, Rejection>;
}

/// JSON type name of a value, as shown in log messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads any JSON number as an integer, accepting floats whose fractional part
/// is zero.
fn integral(value: &Value) -> Result<i128, Rejection> {
    let Value::Number(n) = value else {
        return Err(Rejection::WrongType);
    };
    if let Some(i) = n.as_i64() {
        Ok(i128::from(i))
    } else if let Some(u) = n.as_u64() {
        Ok(i128::from(u))
    } else if let Some(f) = n.as_f64() {
        if f.fract() == 0.0 && f.is_finite() {
            // Saturating float-to-int cast.
            Ok(f as i128)
        } else {
            Err(Rejection::WrongType)
        }
    } else {
        Err(Rejection::WrongType)
    }
}

impl FromJson for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_json(value: &Value) -> Result<Self, Rejection> {
        value.as_bool().ok_or(Rejection::WrongType)
    }
}

impl FromJson for String {
    const EXPECTED: &'static str = "string";

    fn from_json(value: &Value) -> Result<Self, Rejection> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or(Rejection::WrongType)
    }
}

impl FromJson for i32 {
    const EXPECTED: &'static str = "integer";

    /// Values beyond the `i32` range saturate.
    fn from_json(value: &Value) -> Result<Self, Rejection> {
        let i = integral(value)?;
        Ok(i.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32)
    }
}

impl FromJson for u32 {
    const EXPECTED: &'static str = "unsigned integer";

    /// Negative values are refused, values beyond `u32::MAX` saturate.
    fn from_json(value: &Value) -> Result<Self, Rejection> {
        let i = integral(value)?;
        if i < 0 {
            return Err(Rejection::OutOfRange);
        }
        Ok(i.min(i128::from(u32::MAX)) as u32)
    }
}

impl FromJson for f32 {
    const EXPECTED: &'static str = "float";

    fn from_json(value: &Value) -> Result<Self, Rejection> {
        value
            .as_f64()
            .map(|f| f as f32)
            .ok_or(Rejection::WrongType)
    }
}
