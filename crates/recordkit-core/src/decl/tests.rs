use super::*;
use indexmap::IndexMap;

fn names(fields: &[NormalizedField]) -> Vec<&str> {
    fields.iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn delimited_string_splits_on_commas_and_whitespace() {
    let fields = normalize("a, b  c,d\n e".into()).unwrap();

    assert_eq!(names(&fields), ["a", "b", "c", "d", "e"]);
    assert!(fields.iter().all(|f| f.default.is_none()));
}

#[test]
fn empty_string_yields_no_fields() {
    assert!(normalize("".into()).unwrap().is_empty());
    assert!(normalize(" , ".into()).unwrap().is_empty());
}

#[test]
fn name_sequences_preserve_order() {
    let fields = normalize(["z", "y", "x"].into()).unwrap();

    assert_eq!(names(&fields), ["z", "y", "x"]);
}

#[test]
fn pairs_carry_explicit_defaults_including_the_sentinel() {
    let decl = FieldDecl::from(vec![
        FieldEntry::name("a"),
        FieldEntry::with_default("b", 10),
        FieldEntry::no_default("c"),
    ]);
    let fields = normalize(decl).unwrap();

    assert!(fields[0].default.is_none());
    assert!(matches!(
        fields[1].default,
        Some(DefaultArg::Value(Value::Int(10)))
    ));
    assert!(matches!(fields[2].default, Some(DefaultArg::NoDefault)));
}

#[test]
fn mapping_follows_iteration_order() {
    let mut map = IndexMap::new();
    map.insert("second", DefaultArg::value(2));
    map.insert("first", DefaultArg::NoDefault);

    let fields = normalize(map.into()).unwrap();

    assert_eq!(names(&fields), ["second", "first"]);
    assert!(fields.iter().all(|f| f.default.is_some()));
}

#[test]
fn lazy_sequences_are_consumed_in_yield_order() {
    let decl: FieldDecl = (0..3).map(|i| format!("f{i}")).collect();

    assert_eq!(names(&normalize(decl).unwrap()), ["f0", "f1", "f2"]);
}

#[test]
fn untyped_pairs_and_names_are_accepted() {
    let decl = FieldDecl::from(vec![
        FieldEntry::from(Value::from("x")),
        FieldEntry::from(Value::list(vec!["y".into(), Value::Int(10)])),
    ]);
    let fields = normalize(decl).unwrap();

    assert_eq!(names(&fields), ["x", "y"]);
    assert!(matches!(
        fields[1].default,
        Some(DefaultArg::Value(Value::Int(10)))
    ));
}

#[test]
fn malformed_elements_report_position_and_element() {
    let cases = [
        Value::list(vec!["a".into(), Value::Int(1), Value::Int(2)]),
        Value::list(vec![Value::Int(1), Value::Int(2)]),
        Value::Int(3),
        Value::Null,
    ];

    for bad in cases {
        let decl = FieldDecl::from(vec![FieldEntry::name("ok"), FieldEntry::from(bad.clone())]);
        let err = normalize(decl).unwrap_err();

        assert_eq!(
            err,
            DeclError::MalformedFieldSpec {
                index: 1,
                element: bad.to_string(),
            }
        );
    }
}

#[test]
fn whole_declaration_from_value() {
    let from_text = FieldDecl::from_value("a b".into()).unwrap();
    assert_eq!(names(&normalize(from_text).unwrap()), ["a", "b"]);

    let from_list =
        FieldDecl::from_value(Value::list(vec!["a".into(), "b".into()])).unwrap();
    assert_eq!(names(&normalize(from_list).unwrap()), ["a", "b"]);

    assert_eq!(
        FieldDecl::from_value(Value::Int(1)).unwrap_err(),
        DeclError::UnsupportedShape { found: "int" }
    );
}

#[test]
fn names_are_not_validated_during_normalization() {
    let fields = normalize("_x, for, x, x".into()).unwrap();

    assert_eq!(names(&fields), ["_x", "for", "x", "x"]);
}
