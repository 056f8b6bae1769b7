mod test_support;

use std::{borrow::Cow, collections::HashMap};

use clove_types::{
    ComplexContent, ComplexType, Content, Converter, DefaultConverter, Diagnostic, LiteralKind,
    NativeClass, Record, ResolverConfig, Type, Value,
};
use test_support::*;

#[test]
fn test_schema_lookup() {
    let schema = schema();
    assert_eq!(schema.name(), "Test2");
    assert!(schema.child("list").unwrap().is_list());
    assert!(!schema.child("test").unwrap().is_list());
    assert!(schema.child("nope").is_none());
    assert_eq!(schema.children().len(), 8);
}

#[test]
fn test_type_equality_by_name() {
    assert_eq!(Type::Complex(item_type()), Type::Complex(item_type()));
    assert_ne!(Type::Complex(item_type()), Type::Simple(NativeClass::Content));
    assert_eq!(Type::Complex(item_type()).native_class(), NativeClass::Content);
    assert_eq!(Type::wrap(NativeClass::Long), Type::Simple(NativeClass::Long));
    assert!(Type::wrap(NativeClass::Content).as_complex().is_some_and(|c| c.is_opaque()));
}

#[test]
fn test_type_display() {
    assert_eq!(Type::Complex(item_type()).to_string(), "Test");
    assert_eq!(
        Type::Simple(NativeClass::list_of(NativeClass::Integer)).to_string(),
        "List<Integer>"
    );
}

#[test]
fn test_assignability() {
    assert!(NativeClass::Object.is_assignable_from(&NativeClass::Date));
    assert!(NativeClass::Number.is_assignable_from(&NativeClass::Decimal));
    assert!(!NativeClass::Long.is_assignable_from(&NativeClass::Integer));
    assert!(
        NativeClass::list_of(NativeClass::Number)
            .is_assignable_from(&NativeClass::list_of(NativeClass::Integer))
    );
    assert!(
        !NativeClass::array_of(NativeClass::Number)
            .is_assignable_from(&NativeClass::list_of(NativeClass::Integer))
    );
}

#[test]
fn test_abstract_number_is_not_comparable() {
    assert!(NativeClass::Double.is_comparable());
    assert!(NativeClass::Date.is_comparable());
    assert!(!NativeClass::Number.is_comparable());
    assert!(!NativeClass::Object.is_comparable());
}

#[test]
fn test_default_conversions() {
    let converter = DefaultConverter;
    assert!(converter.can_convert(&NativeClass::Integer, &NativeClass::Double));
    assert!(converter.can_convert(&NativeClass::Date, &NativeClass::String));
    assert!(converter.can_convert(&NativeClass::String, &NativeClass::Boolean));
    assert!(converter.can_convert(&NativeClass::Long, &NativeClass::Date));
    assert!(converter.can_convert(&NativeClass::Content, &NativeClass::Object));
    assert!(converter.can_convert(
        &NativeClass::list_of(NativeClass::Integer),
        &NativeClass::array_of(NativeClass::Double)
    ));

    assert!(!converter.can_convert(&NativeClass::Boolean, &NativeClass::Long));
    assert!(!converter.can_convert(&NativeClass::Long, &NativeClass::Boolean));
    assert!(!converter.can_convert(&NativeClass::Content, &NativeClass::String));
}

#[test]
fn test_permissive_conversions() {
    let converter = PermissiveConverter;
    assert!(converter.can_convert(&NativeClass::Boolean, &NativeClass::Long));
    assert!(converter.can_convert(&NativeClass::Double, &NativeClass::Boolean));
}

#[test]
fn test_complex_content_follows_schema() {
    let mut item = ComplexContent::new(item_type());
    assert!(item.has("myInteger"));
    assert!(!item.has("other"));
    assert_eq!(item.names(), vec!["myInteger".to_string()]);

    item.set("myInteger", Value::Integer(5)).unwrap();
    assert_eq!(item.get("myInteger").as_deref(), Some(&Value::Integer(5)));
    assert!(item.set("other", Value::Integer(1)).is_err());
}

#[test]
fn test_opaque_content_accepts_any_field() {
    let mut payload = ComplexContent::new(Record::opaque("Payload").shared());
    assert!(!payload.has("anything"));
    payload.set("anything", Value::Boolean(true)).unwrap();
    assert!(payload.has("anything"));
    assert_eq!(payload.names(), vec!["anything".to_string()]);
}

#[test]
fn test_map_content() {
    let mut map: HashMap<String, Value> = HashMap::new();
    map.set("a", Value::Integer(1)).unwrap();
    assert!(map.has("a"));
    assert_eq!(Content::get(&map, "a").as_deref(), Some(&Value::Integer(1)));
    assert!(Content::get(&map, "b").is_none());

    let mut json = serde_json::Map::new();
    json.set("a", Value::Float(1.5)).unwrap();
    assert_eq!(Content::get(&json, "a").as_deref(), Some(&Value::Float(1.5)));
    assert_eq!(json.names(), vec!["a".to_string()]);
}

#[test]
fn test_content_lends_stored_values() {
    let nested = Value::Array((0..3).map(Value::Integer).collect());
    let map = object(vec![("items", nested.clone())]);
    assert!(matches!(Content::get(&map, "items"), Some(Cow::Borrowed(v)) if *v == nested));

    let item = ComplexContent::new(item_type())
        .with("myInteger", Value::Integer(7))
        .unwrap();
    assert!(matches!(
        item.get("myInteger"),
        Some(Cow::Borrowed(Value::Integer(7)))
    ));

    // json values are converted on the way out
    let mut json = serde_json::Map::new();
    json.insert("a".to_string(), serde_json::json!(1));
    assert!(matches!(Content::get(&json, "a"), Some(Cow::Owned(Value::Integer(1)))));
}

#[test]
fn test_value_json_conversion() {
    let value = Value::from(serde_json::json!({
        "n": 1,
        "f": 1.5,
        "items": [true, null, "s"],
    }));
    let Value::Object(fields) = &value else {
        panic!("expected an object, got {:?}", value);
    };
    assert_eq!(fields["n"], Value::Integer(1));
    assert_eq!(fields["f"], Value::Float(1.5));
    assert_eq!(
        fields["items"],
        Value::Array(vec![
            Value::Boolean(true),
            Value::Null,
            Value::String("s".to_string()),
        ])
    );

    let item = ComplexContent::new(item_type())
        .with("myInteger", Value::Integer(2))
        .unwrap();
    assert_eq!(
        Value::Content(item).to_json(),
        serde_json::json!({ "myInteger": 2 })
    );
}

#[test]
fn test_value_content_accessor() {
    assert!(Value::Object(HashMap::new()).as_content().is_some());
    assert!(Value::Integer(1).as_content().is_none());
    assert_eq!(Value::Integer(3).as_string(), "3");
    assert!(!Value::Null.as_bool());
}

#[test]
fn test_config_defaults() {
    let config = ResolverConfig::default();
    assert_eq!(config.literal_class(LiteralKind::Integer), NativeClass::Long);
    assert_eq!(config.literal_class(LiteralKind::Decimal), NativeClass::Double);
    assert_eq!(config.literal_class(LiteralKind::Boolean), NativeClass::Boolean);
    assert_eq!(config.max_depth, Some(256));
}

#[test]
fn test_config_from_json() {
    let config = ResolverConfig::from_json(
        r#"{ "integer_literal": "integer", "decimal_literal": "decimal", "max_depth": null }"#,
    )
    .unwrap();
    assert_eq!(config.integer_literal, NativeClass::Integer);
    assert_eq!(config.decimal_literal, NativeClass::Decimal);
    assert_eq!(config.max_depth, None);

    assert_eq!(ResolverConfig::from_json("{}").unwrap(), ResolverConfig::default());
    assert!(ResolverConfig::from_json(r#"{ "integer_literal": "huge" }"#).is_err());
}

#[test]
fn test_diagnostic_serialization() {
    let diagnostic = Diagnostic::error("broken");
    assert_eq!(diagnostic.to_string(), "error: broken");
    assert_eq!(
        serde_json::to_value(&diagnostic).unwrap(),
        serde_json::json!({ "severity": "ERROR", "message": "broken" })
    );
}
