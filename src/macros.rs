/// Builds a [`Value`](crate::Value) from a literal written in inline syntax.
///
/// Tables use `key = value` pairs with string-literal keys. Inside arrays and
/// tables, negative numbers and other compound expressions must be wrapped in
/// parentheses.
///
/// ```rust
/// use serde_toml::{value, Value};
///
/// let server = value!({
///     "host" = "localhost",
///     "ports" = [8001, 8002],
///     "offset" = (-3),
///     "tls" = { "enabled" = true }
/// });
/// assert_eq!(server.pointer(&["tls", "enabled"]), Some(&Value::Boolean(true)));
/// ```
#[macro_export]
macro_rules! value {
    (true) => {
        $crate::Value::Boolean(true)
    };

    (false) => {
        $crate::Value::Boolean(false)
    };

    ([]) => {
        $crate::Value::Array($crate::Array::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(
            ::std::iter::IntoIterator::into_iter([$($crate::value!($elem)),*]).collect()
        )
    };

    ({}) => {
        $crate::Value::Table($crate::Table::new())
    };

    ({ $($key:literal = $value:tt),* $(,)? }) => {{
        let mut table = $crate::Table::new();
        $(
            table.insert($key, $crate::value!($value));
        )*
        $crate::Value::Table(table)
    }};

    // Scalars and anything else with a `From` conversion.
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Array, Table, Value};

    #[test]
    fn test_value_macro_scalars() {
        assert_eq!(value!(true), Value::Boolean(true));
        assert_eq!(value!(false), Value::Boolean(false));
        assert_eq!(value!(42), Value::Integer(42));
        assert_eq!(value!((-42)), Value::Integer(-42));
        assert_eq!(value!(3.5), Value::Float(3.5));
        assert_eq!(value!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_value_macro_arrays() {
        assert_eq!(value!([]), Value::Array(Array::new()));

        let array = value!([1, "two", [3]]);
        let array = array.as_array().unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array.get(1), Some(&Value::from("two")));
        assert_eq!(array.get(2).and_then(|v| v.as_array()).map(Array::len), Some(1));
    }

    #[test]
    fn test_value_macro_tables() {
        assert_eq!(value!({}), Value::Table(Table::new()));

        let table = value!({
            "name" = "Alice",
            "age" = 30,
        });
        let table = table.as_table().unwrap();
        assert_eq!(table.keys().map(String::as_str).collect::<Vec<_>>(), vec!["name", "age"]);
        assert_eq!(table.get("age"), Some(&Value::Integer(30)));
    }
}
