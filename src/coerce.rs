//! Scalar coercion rules shared by the binder.
//!
//! | node      | destination         | result                                   |
//! |-----------|---------------------|------------------------------------------|
//! | integer   | any integer type    | the value, or `Overflow` if out of range |
//! | integer   | `f32` / `f64`       | widened, precision loss above 2^53 accepted |
//! | float     | `f64`               | the value                                |
//! | float     | `f32`               | narrowed, `Overflow` if finite and out of range |
//! | float     | any integer type    | `TypeMismatch`                           |
//! | string    | `char`              | the character, if there is exactly one   |
//!
//! Everything else only binds to its own kind, see the binder.

use crate::error::{BindErrorKind, Error, Result};
use crate::Value;

/// Converts an integer node to a fixed-width integer type named `target`.
pub(crate) fn integer<T>(value: &Value, target: &'static str) -> Result<T>
where
    T: TryFrom<i64>,
{
    match value {
        Value::Integer(i) => T::try_from(*i).map_err(|_| {
            Error::bind(
                BindErrorKind::Overflow,
                format!("integer {} does not fit in {}", i, target),
            )
        }),
        Value::Float(f) => Err(Error::bind(
            BindErrorKind::TypeMismatch,
            format!("expected {}, found float {}", target, f),
        )),
        other => Err(Error::type_mismatch(target, other.type_name())),
    }
}

/// Integer and float nodes as `f64`.
pub(crate) fn float(value: &Value) -> Result<f64> {
    match value {
        Value::Float(f) => Ok(*f),
        Value::Integer(i) => Ok(*i as f64),
        other => Err(Error::type_mismatch("f64", other.type_name())),
    }
}

/// Integer and float nodes as `f32`. Infinities and NaN carry over.
pub(crate) fn float32(value: &Value) -> Result<f32> {
    let f = match value {
        Value::Float(f) => *f,
        Value::Integer(i) => return Ok(*i as f32),
        other => return Err(Error::type_mismatch("f32", other.type_name())),
    };
    if f.is_finite() && f.abs() > f64::from(f32::MAX) {
        return Err(Error::bind(
            BindErrorKind::Overflow,
            format!("float {} does not fit in f32", f),
        ));
    }
    Ok(f as f32)
}

/// A string node holding exactly one character.
pub(crate) fn character(value: &Value) -> Result<char> {
    match value {
        Value::String(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(Error::bind(
                    BindErrorKind::TypeMismatch,
                    format!("expected a single character, found string {:?}", s),
                )),
            }
        }
        other => Err(Error::type_mismatch("char", other.type_name())),
    }
}

/// Bytes from a string node, or from an array of integers in `0..=255`.
pub(crate) fn bytes(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::String(s) => Ok(s.as_bytes().to_vec()),
        Value::Array(array) => array
            .iter()
            .enumerate()
            .map(|(i, element)| integer::<u8>(element, "u8").map_err(|e| e.in_index(i)))
            .collect(),
        other => Err(Error::type_mismatch("bytes", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn kind<T: std::fmt::Debug>(result: Result<T>) -> BindErrorKind {
        match result.unwrap_err().kind() {
            ErrorKind::Bind(kind) => kind,
            other => panic!("expected a bind error, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(integer::<u8>(&Value::Integer(255), "u8").unwrap(), 255);
        assert_eq!(integer::<i8>(&Value::Integer(-128), "i8").unwrap(), -128);
        assert_eq!(kind(integer::<u8>(&Value::Integer(256), "u8")), BindErrorKind::Overflow);
        assert_eq!(kind(integer::<u64>(&Value::Integer(-1), "u64")), BindErrorKind::Overflow);
        assert_eq!(
            integer::<u64>(&Value::Integer(i64::MAX), "u64").unwrap(),
            i64::MAX as u64
        );
    }

    #[test]
    fn test_floats_never_become_integers() {
        assert_eq!(
            kind(integer::<i64>(&Value::Float(1.0), "i64")),
            BindErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_integer_widens_to_float() {
        assert_eq!(float(&Value::Integer(3)).unwrap(), 3.0);
        assert_eq!(float(&Value::Integer(i64::MAX)).unwrap(), i64::MAX as f64);
        assert_eq!(float32(&Value::Integer(7)).unwrap(), 7.0f32);
        assert_eq!(kind(float(&Value::from("3"))), BindErrorKind::TypeMismatch);
    }

    #[test]
    fn test_f32_range() {
        assert_eq!(float32(&Value::Float(1.5)).unwrap(), 1.5f32);
        assert_eq!(kind(float32(&Value::Float(1e39))), BindErrorKind::Overflow);
        assert_eq!(float32(&Value::Float(f64::INFINITY)).unwrap(), f32::INFINITY);
        assert!(float32(&Value::Float(f64::NAN)).unwrap().is_nan());
    }

    #[test]
    fn test_character() {
        assert_eq!(character(&Value::from("é")).unwrap(), 'é');
        assert_eq!(kind(character(&Value::from("ab"))), BindErrorKind::TypeMismatch);
        assert_eq!(kind(character(&Value::from(""))), BindErrorKind::TypeMismatch);
    }

    #[test]
    fn test_bytes() {
        assert_eq!(bytes(&Value::from("hi")).unwrap(), b"hi".to_vec());
        let array = Value::from(vec![Value::from(1), Value::from(255)]);
        assert_eq!(bytes(&array).unwrap(), vec![1, 255]);
        let bad = Value::from(vec![Value::from(1), Value::from(256)]);
        let err = bytes(&bad).unwrap_err();
        assert_eq!(err.path().map(|p| p.to_string()), Some("[1]".to_string()));
    }
}
