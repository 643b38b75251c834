//! Round-trip integration tests.
//!
//! Every sample type is converted to a representation, encoded to a qualified name, parsed
//! back, serialized through JSON and resolved again; each stage must reproduce the input.

use std::sync::Arc;

use dotrepr::{
    prelude::*,
    representation::codec,
    runtime::{GenericParameter, GenericParameterOwner},
    Result,
};

fn universe() -> TypeUniverse {
    let universe = TypeUniverse::new();

    let corlib = Assembly::new(AssemblyIdentity::new(
        "mscorlib",
        Some(AssemblyVersion::new(4, 0, 0, 0)),
    ));
    for name in ["Int32", "String", "Guid", "DateTime"] {
        corlib.define_type("System", name);
    }
    corlib.define_generic_type("System", "Nullable`1", &["T"]);
    corlib.define_generic_type("System.Collections.Generic", "List`1", &["T"]);
    corlib.define_generic_type(
        "System.Collections.Generic",
        "Dictionary`2",
        &["TKey", "TValue"],
    );
    universe.load(corlib);

    let models = Assembly::new(AssemblyIdentity::new(
        "Shop.Models",
        Some(AssemblyVersion::new(1, 2, 0, 0)),
    ));
    let order = models.define_type("Shop.Models", "Order");
    let line = models.define_nested_type(&order, "Line");
    models.define_nested_type(&line, "Discount");
    models.define_generic_type("Shop.Models", "Page`1", &["TItem"]);
    universe.load(models);

    universe
}

fn lookup(universe: &TypeUniverse, name: &str) -> RuntimeType {
    universe
        .load_type(name, false)
        .unwrap()
        .unwrap_or_else(|| panic!("{name} is not in the sample universe"))
}

fn sample_types(universe: &TypeUniverse) -> Vec<RuntimeType> {
    let int32 = lookup(universe, "System.Int32, mscorlib");
    let string = lookup(universe, "System.String, mscorlib");
    let nullable = lookup(universe, "System.Nullable`1, mscorlib");
    let list = lookup(universe, "System.Collections.Generic.List`1, mscorlib");
    let dictionary = lookup(universe, "System.Collections.Generic.Dictionary`2, mscorlib");
    let order = lookup(universe, "Shop.Models.Order, Shop.Models");
    let discount = lookup(universe, "Shop.Models.Order+Line+Discount, Shop.Models");
    let page = lookup(universe, "Shop.Models.Page`1, Shop.Models");

    let nullable_int = nullable.make_generic_type(vec![int32.clone()]).unwrap();
    let list_of_orders = list.make_generic_type(vec![order.clone()]).unwrap();
    let dictionary_of_lists = dictionary
        .make_generic_type(vec![string.clone(), list_of_orders.clone()])
        .unwrap();

    vec![
        int32.clone(),
        string.clone(),
        nullable_int.clone(),
        nullable_int.make_array_type(1),
        order.clone(),
        discount,
        int32.make_array_type(1),
        int32.make_array_type(2),
        int32.make_array_type(3),
        int32.make_array_type(1).make_array_type(2),
        order.make_array_type(1).make_array_type(1).make_array_type(3),
        list.clone(),
        dictionary.clone(),
        page.clone(),
        list_of_orders.clone(),
        list_of_orders.make_array_type(2),
        dictionary_of_lists.clone(),
        page.make_generic_type(vec![dictionary_of_lists]).unwrap(),
    ]
}

#[test]
fn codec_round_trip() -> Result<()> {
    let universe = universe();
    for ty in sample_types(&universe) {
        let representation = ty.to_representation()?;
        let qualified_name = codec::build(&representation);
        assert_eq!(codec::parse(&qualified_name)?, representation, "{qualified_name}");
    }
    Ok(())
}

#[test]
fn resolve_round_trip() -> Result<()> {
    let universe = Arc::new(universe());
    let resolver = TypeResolver::new(universe.clone());
    for ty in sample_types(&universe) {
        let representation = ty.to_representation()?;
        let resolved = resolver
            .resolve(&representation, AssemblyMatchStrategy::AnySingleVersion, true)?
            .expect("throwing resolution never returns None");
        assert_eq!(resolved, ty, "{representation}");
    }
    Ok(())
}

#[test]
fn json_round_trip() -> Result<()> {
    let universe = universe();
    for ty in sample_types(&universe) {
        let representation = ty.to_representation()?;
        let json = serde_json::to_string(&representation).unwrap();
        let restored: TypeRepresentation = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, representation, "{json}");
    }
    Ok(())
}

#[test]
fn json_uses_camel_case_and_validates() {
    let representation = TypeRepresentation::new(
        "Shop.Models",
        "Order",
        "Shop.Models",
        Some("1.2.0.0"),
        None,
    )
    .unwrap();
    let json = serde_json::to_value(&representation).unwrap();
    assert_eq!(json["assemblyName"], "Shop.Models");
    assert_eq!(json["assemblyVersion"], "1.2.0.0");
    assert!(json["genericArguments"].is_null());

    let blank =
        r#"{"namespace":"Shop","name":" ","assemblyName":"Shop","assemblyVersion":null,"genericArguments":null}"#;
    let error = serde_json::from_str::<TypeRepresentation>(blank).unwrap_err();
    assert!(error.to_string().contains("'name' is empty or white space"));
}

#[test]
fn nullable_int_array_shape() -> Result<()> {
    let universe = universe();
    let int32 = lookup(&universe, "System.Int32, mscorlib");
    let nullable = lookup(&universe, "System.Nullable`1, mscorlib");
    let array = nullable.make_generic_type(vec![int32])?.make_array_type(1);

    let representation = array.to_representation()?;
    assert_eq!(representation.name(), "Nullable`1[]");
    assert_eq!(representation.namespace(), "System");
    let arguments = representation.generic_arguments().unwrap();
    assert_eq!(arguments.len(), 1);
    assert_eq!(arguments[0].name(), "Int32");
    assert_eq!(
        representation.to_string(),
        "System.Nullable`1[[System.Int32, mscorlib, Version=4.0.0.0]][], mscorlib, Version=4.0.0.0"
    );
    Ok(())
}

#[test]
fn nested_type_names() -> Result<()> {
    let universe = universe();
    let discount = lookup(&universe, "Shop.Models.Order+Line+Discount, Shop.Models");

    let representation = discount.to_representation()?;
    assert_eq!(representation.namespace(), "Shop.Models");
    assert_eq!(representation.name(), "Order+Line+Discount");
    Ok(())
}

#[test]
fn open_constructed_types_are_rejected() {
    let universe = universe();
    let list = lookup(&universe, "System.Collections.Generic.List`1, mscorlib");
    let parameter = RuntimeType::GenericParameter(GenericParameter {
        name: "TItem".to_string(),
        position: 0,
        owner: GenericParameterOwner::Method,
    });
    let open = list.make_generic_type(vec![parameter]).unwrap();

    assert!(matches!(
        open.to_representation(),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn versionless_comparison_of_recorded_names() -> Result<()> {
    let recorded: TypeRepresentation =
        "System.Collections.Generic.List`1[[Shop.Models.Order, Shop.Models, Version=1.0.0.0]], mscorlib, Version=2.0.0.0"
            .parse()?;
    let current: TypeRepresentation =
        "System.Collections.Generic.List`1[[Shop.Models.Order, Shop.Models, Version=1.2.0.0]], mscorlib, Version=4.0.0.0"
            .parse()?;

    assert_ne!(recorded, current);
    let comparer = VersionlessTypeRepresentationComparer;
    assert!(comparer.equals(Some(&recorded), Some(&current)));
    assert_eq!(
        comparer.hash_of(Some(&recorded)),
        comparer.hash_of(Some(&current))
    );
    assert_eq!(Versionless(&recorded), Versionless(&current));
    Ok(())
}
