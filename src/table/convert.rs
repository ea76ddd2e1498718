use std::str::FromStr;

use thiserror::Error;

/// Why a cell could not be converted to the requested type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("no digits in {0:?}")]
    NoDigits(String),

    #[error("{0:?} is out of range")]
    OutOfRange(String),

    #[error("negative value {0:?} for unsigned type")]
    Negative(String),

    #[error("invalid float {0:?}")]
    InvalidFloat(String),
}

/// Conversion from a cell's text into a typed value.
///
/// This is the registry used by [`Table::column_as`](crate::Table::column_as):
/// every target type implements it once, and callers add their own targets by
/// implementing it for their types.
///
/// Numeric conversions are prefix-based: leading whitespace is skipped, an
/// optional sign is accepted, and parsing stops at the first character that
/// cannot continue the number. `" 42abc"` converts to `42`; `"abc"` fails.
///
/// ```rust
/// # use csv_table::FromCell;
/// assert_eq!(i32::from_cell(" -17kg").unwrap(), -17);
/// assert_eq!(f64::from_cell("2.5e1x").unwrap(), 25.0);
/// assert!(u32::from_cell("n/a").is_err());
/// ```
pub trait FromCell: Sized {
    /// Name used in conversion error messages
    const TYPE_NAME: &'static str;

    fn from_cell(cell: &str) -> Result<Self, ConvertError>;
}

impl FromCell for String {
    const TYPE_NAME: &'static str = "String";

    fn from_cell(cell: &str) -> Result<Self, ConvertError> {
        Ok(cell.to_string())
    }
}

// C `isspace` set, which includes vertical tab unlike `char::is_ascii_whitespace`
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Longest `[sign]digits` prefix after leading whitespace
fn integer_prefix(cell: &str, signed: bool) -> Result<&str, ConvertError> {
    let s = cell.trim_start_matches(is_space);
    let bytes = s.as_bytes();

    let sign_len = match bytes.first() {
        Some(b'+') => 1,
        Some(b'-') if signed => 1,
        Some(b'-') => return Err(ConvertError::Negative(cell.to_string())),
        _ => 0,
    };

    let digits = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return Err(ConvertError::NoDigits(cell.to_string()));
    }

    Ok(&s[..sign_len + digits])
}

fn parse_integer<T: FromStr>(cell: &str, signed: bool) -> Result<T, ConvertError> {
    // the prefix is well formed, so the only remaining failure is overflow
    integer_prefix(cell, signed)?
        .parse::<T>()
        .map_err(|_| ConvertError::OutOfRange(cell.to_string()))
}

fn parse_float<T: fast_float::FastFloat>(cell: &str) -> Result<T, ConvertError> {
    let s = cell.trim_start_matches(is_space);
    let unsigned = s.strip_prefix('+').unwrap_or(s);
    if unsigned.len() != s.len() && unsigned.starts_with(['+', '-']) {
        return Err(ConvertError::InvalidFloat(cell.to_string()));
    }

    fast_float::parse_partial::<T, _>(unsigned)
        .map(|(value, _consumed)| value)
        .map_err(|_| ConvertError::InvalidFloat(cell.to_string()))
}

macro_rules! integer_from_cell {
    ($signed:expr => $($t:ty),+) => {
        $(
            impl FromCell for $t {
                const TYPE_NAME: &'static str = stringify!($t);

                fn from_cell(cell: &str) -> Result<Self, ConvertError> {
                    parse_integer(cell, $signed)
                }
            }
        )+
    };
}

integer_from_cell!(true => i32, i64);
integer_from_cell!(false => u32, u64, usize);

impl FromCell for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn from_cell(cell: &str) -> Result<Self, ConvertError> {
        parse_float(cell)
    }
}

impl FromCell for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_cell(cell: &str) -> Result<Self, ConvertError> {
        parse_float(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_is_identity() {
        assert_eq!(String::from_cell(" a b ").unwrap(), " a b ");
        assert_eq!(String::from_cell("").unwrap(), "");
    }

    #[test]
    fn test_integer_prefix_semantics() {
        assert_eq!(i32::from_cell("42").unwrap(), 42);
        assert_eq!(i32::from_cell("  \t-7").unwrap(), -7);
        assert_eq!(i32::from_cell("+8").unwrap(), 8);
        assert_eq!(i32::from_cell("12abc").unwrap(), 12);
        assert_eq!(i64::from_cell("3.99").unwrap(), 3);
        assert_eq!(i32::from_cell("0x10").unwrap(), 0);
    }

    #[test]
    fn test_integer_rejects_no_digits() {
        assert_eq!(
            i32::from_cell("abc"),
            Err(ConvertError::NoDigits("abc".into()))
        );
        assert!(i32::from_cell("").is_err());
        assert!(i32::from_cell("-").is_err());
        assert!(i32::from_cell("+-1").is_err());
    }

    #[test]
    fn test_integer_overflow_fails() {
        assert_eq!(
            i32::from_cell("2147483648"),
            Err(ConvertError::OutOfRange("2147483648".into()))
        );
        assert_eq!(i32::from_cell("-2147483648").unwrap(), i32::MIN);
        assert_eq!(u64::from_cell("18446744073709551615").unwrap(), u64::MAX);
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        assert_eq!(u32::from_cell("-1"), Err(ConvertError::Negative("-1".into())));
        assert_eq!(usize::from_cell(" 5 rows").unwrap(), 5);
    }

    #[test]
    fn test_float_prefix_semantics() {
        assert_eq!(f64::from_cell("1.5").unwrap(), 1.5);
        assert_eq!(f64::from_cell("  -2.25xyz").unwrap(), -2.25);
        assert_eq!(f64::from_cell("+3").unwrap(), 3.0);
        assert_eq!(f64::from_cell("1e3").unwrap(), 1000.0);
        assert_eq!(f32::from_cell(".5").unwrap(), 0.5);
        assert!(f64::from_cell("inf").unwrap().is_infinite());
    }

    #[test]
    fn test_float_rejects_garbage() {
        assert_eq!(
            f64::from_cell("x1"),
            Err(ConvertError::InvalidFloat("x1".into()))
        );
        assert!(f64::from_cell("").is_err());
        assert!(f64::from_cell("+-1").is_err());
    }
}
