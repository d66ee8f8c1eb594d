//! Runtime values

/// A value stored in a variable table
///
/// Expressions themselves always evaluate to a raw `u64`; tagged values only
/// exist in scope tables. `Empty` marks a slot that was created but never
/// given a usable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// 64-bit unsigned integer (printed reinterpreted as signed)
    Integer(u64),
    /// Boolean, printed as 1 or 0
    Boolean(bool),
    /// Immutable-length UTF-8 string
    Str(String),
    /// Fixed-length array; every slot starts as Integer(0)
    Array(Vec<Value>),
    /// Sentinel for a binding with no usable value
    Empty,
}

impl Value {
    /// Coerce to an integer for use in an expression
    ///
    /// Integers pass through, booleans become 1/0, everything else is not
    /// numeric and faults at the use site.
    pub fn as_numeric(&self) -> Option<u64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Boolean(b) => Some(u64::from(*b)),
            Value::Str(_) | Value::Array(_) | Value::Empty => None,
        }
    }
}

/// Render an integer the way `print` does: the u64 bit pattern reinterpreted
/// as a signed 64-bit decimal.
pub fn format_int(value: u64) -> String {
    (value as i64).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_numeric() {
        assert_eq!(Value::Integer(7).as_numeric(), Some(7));
        assert_eq!(Value::Boolean(true).as_numeric(), Some(1));
        assert_eq!(Value::Boolean(false).as_numeric(), Some(0));
        assert_eq!(Value::Str("x".to_string()).as_numeric(), None);
        assert_eq!(Value::Array(vec![]).as_numeric(), None);
        assert_eq!(Value::Empty.as_numeric(), None);
    }

    #[test]
    fn test_format_int_signed_rendering() {
        assert_eq!(format_int(0), "0");
        assert_eq!(format_int(42), "42");
        // 0 - 1 wraps to u64::MAX, which prints as -1
        assert_eq!(format_int(u64::MAX), "-1");
        assert_eq!(format_int(u64::MAX - 9), "-10");
    }
}
