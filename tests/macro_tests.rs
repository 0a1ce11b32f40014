use serde_toml::{from_value, to_string, value, Array, Table, Value};

#[test]
fn test_value_macro_booleans() {
    assert_eq!(value!(true), Value::Boolean(true));
    assert_eq!(value!(false), Value::Boolean(false));
}

#[test]
fn test_value_macro_numbers() {
    assert_eq!(value!(42), Value::Integer(42));
    assert_eq!(value!(3.5), Value::Float(3.5));
    assert_eq!(value!(-123), Value::Integer(-123));
    assert_eq!(value!(u32::MAX), Value::Integer(i64::from(u32::MAX)));
}

#[test]
fn test_value_macro_strings() {
    assert_eq!(value!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(value!(""), Value::String(String::new()));

    let owned = String::from("owned");
    assert_eq!(value!(owned), Value::from("owned"));
}

#[test]
fn test_value_macro_arrays() {
    assert_eq!(value!([]), Value::Array(Array::new()));

    let mixed = value!([1, "a", true, (-2), [2.5]]);
    let mixed = mixed.as_array().unwrap();
    assert_eq!(mixed.len(), 5);
    assert_eq!(mixed.get(3), Some(&Value::Integer(-2)));
    assert_eq!(mixed.get(4).and_then(Value::as_array).map(Array::len), Some(1));
}

#[test]
fn test_value_macro_nested_tables() {
    let config = value!({
        "title" = "demo",
        "database" = {
            "ports" = [8001, 8002],
            "enabled" = true
        },
        "empty" = {}
    });

    assert_eq!(config.pointer(&["database", "enabled"]), Some(&Value::Boolean(true)));
    assert_eq!(config.get("empty"), Some(&Value::Table(Table::new())));
    assert_eq!(
        to_string(&config).unwrap(),
        "title = \"demo\"\n\n[database]\nports = [8001, 8002]\nenabled = true\n\n[empty]\n"
    );
}

#[test]
fn test_value_macro_binds_to_types() {
    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    let point: Point = from_value(value!({ "x" = 1, "y" = (-1) })).unwrap();
    assert_eq!(point, Point { x: 1, y: -1 });
}
