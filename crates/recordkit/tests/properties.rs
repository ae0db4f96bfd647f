use proptest::prelude::*;
use recordkit::{
    core::naming::{NameRole, validate_ident},
    prelude::*,
};
use std::collections::BTreeSet;

fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,6}", 0..8)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_filter("keywords are not field names", |names| {
            names
                .iter()
                .all(|n| validate_ident(n, NameRole::Field).is_ok())
        })
        .prop_shuffle()
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e6..1.0e6f64).prop_map(Value::Float64),
        "[a-zA-Z0-9 ]{0,8}".prop_map(Value::Text),
    ];

    leaf.prop_recursive(2, 8, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Value::list)
    })
}

fn arb_raw_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,4}",
        "_[a-z]{0,3}",
        "[0-9#*][a-z]{0,3}",
        Just("for".to_string()),
        Just("x".to_string()),
    ]
}

proptest! {
    #[test]
    fn valid_names_build_in_input_order(names in arb_names()) {
        let ty = record_type("Point", names.clone()).unwrap();

        prop_assert_eq!(ty.field_names(), names.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn missing_suffix_takes_defaults(
        names in arb_names(),
        given in 0usize..8,
        default in any::<i64>(),
    ) {
        let ty = make_record_type(
            "Point",
            names.clone(),
            Options::default().with_default(DefaultArg::value(default)),
        )
        .unwrap();
        let given = given.min(names.len());
        let supplied: Vec<Value> = (0..given).map(|i| Value::Int(i64::try_from(i).unwrap())).collect();

        let record = ty.call(supplied.clone()).unwrap();

        prop_assert_eq!(&record.values()[..given], supplied.as_slice());
        prop_assert!(record.values()[given..].iter().all(|v| *v == Value::Int(default)));
    }

    #[test]
    fn required_prefix_must_be_supplied(names in arb_names(), given in 0usize..8) {
        prop_assume!(!names.is_empty());
        let ty = record_type("Point", names.clone()).unwrap();
        let given = given.min(names.len());

        let result = ty.call(vec![Value::Null; given]);

        prop_assert_eq!(result.is_ok(), given == names.len());
    }

    #[test]
    fn state_roundtrip_preserves_values(values in prop::collection::vec(arb_value(), 0..6)) {
        let names: Vec<String> = (0..values.len()).map(|i| format!("f{i}")).collect();
        let ty = record_type("Row", names).unwrap();
        let record = ty.call(values.clone()).unwrap();

        let decoded = ty.decode(&record.encode().unwrap()).unwrap();
        let restored = ty.from_state(record.state()).unwrap();

        prop_assert_eq!(&decoded, &record);
        prop_assert_eq!(&restored, &record);
        prop_assert_eq!(decoded.into_values(), values);
    }

    #[test]
    fn equality_is_reflexive_and_symmetric(
        a in prop::collection::vec(arb_value(), 2),
        b in prop::collection::vec(arb_value(), 2),
    ) {
        let ty = record_type("Pair", "left right").unwrap();
        let other = record_type("Pair", "left right").unwrap();
        let ra = ty.call(a.clone()).unwrap();
        let rb = ty.call(b.clone()).unwrap();

        prop_assert_eq!(&ra, &ra);
        prop_assert_eq!(ra == rb, rb == ra);
        prop_assert_eq!(ra == rb, a == b);
        prop_assert_ne!(&ra, &other.call(a).unwrap());
        prop_assert!(!ra.eq_dyn(&Value::Null));
    }

    #[test]
    fn rename_always_yields_valid_unique_names(raw in prop::collection::vec(arb_raw_name(), 0..8)) {
        let ty = make_record_type("Point", raw.clone(), Options::default().with_rename(true)).unwrap();
        let names = ty.field_names();

        let unique: BTreeSet<&str> = names.iter().copied().collect();
        prop_assert_eq!(unique.len(), names.len());

        for (i, (name, original)) in names.iter().zip(&raw).enumerate() {
            let placeholder = format!("_{i}");
            let kept_or_placeholder = *name == original.as_str() || *name == placeholder;
            prop_assert!(kept_or_placeholder, "field {} became {:?}", i, name);
        }
    }
}
