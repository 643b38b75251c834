//! Factory methods for sample runtimes used across unit tests.
//!
//! The sample universe has two loaded assemblies:
//!
//! - `mscorlib, Version=4.0.0.0` - primitives, `Nullable`1`, `List`1`, `Dictionary`2`,
//!   `IDisposable`
//! - `Sample.Models, Version=1.0.0.0` - `Customer` (with overloads, a generic method and a
//!   nested `Address`), `Repository`1` and an interface hierarchy with a diamond-shaped
//!   `Close` ambiguity

use std::sync::Arc;

use crate::runtime::{
    Assembly, AssemblyIdentity, AssemblyVersion, GenericParameter, GenericParameterOwner,
    MemberDefinition, RuntimeType, TypeDefinitionRc, TypeUniverse,
};

/// Identity of the sample core library
pub fn corlib_identity() -> AssemblyIdentity {
    AssemblyIdentity::new("mscorlib", Some(AssemblyVersion::new(4, 0, 0, 0)))
}

/// Identity of the sample models assembly at the given major version
pub fn models_identity(major: u16) -> AssemblyIdentity {
    AssemblyIdentity::new("Sample.Models", Some(AssemblyVersion::new(major, 0, 0, 0)))
}

/// Core library with the handful of system types the samples refer to
pub fn create_corlib() -> Assembly {
    let corlib = Assembly::new(corlib_identity());
    for name in ["Object", "Int32", "String", "Guid", "Boolean", "EventHandler"] {
        corlib.define_type("System", name);
    }

    corlib.define_generic_type("System", "Nullable`1", &["T"]);
    let list = corlib.define_generic_type("System.Collections.Generic", "List`1", &["T"]);
    let t = type_parameter(&list, 0);
    list.add_member(Arc::new(MemberDefinition::method("Add", &[], vec![("item", t)])));
    corlib.define_generic_type(
        "System.Collections.Generic",
        "Dictionary`2",
        &["TKey", "TValue"],
    );

    let disposable = corlib.define_type("System", "IDisposable");
    disposable.add_member(Arc::new(MemberDefinition::method("Dispose", &[], vec![])));

    corlib
}

/// Sample models assembly; types refer to the loaded core library
pub fn create_models(universe: &TypeUniverse, major: u16) -> Assembly {
    let system = |name: &str| system_type(universe, name);
    let models = Assembly::new(models_identity(major));

    let customer = models.define_type("Sample.Models", "Customer");
    customer.add_member(Arc::new(MemberDefinition::constructor(vec![])));
    customer.add_member(Arc::new(MemberDefinition::constructor(vec![(
        "name",
        system("String"),
    )])));
    customer.add_member(Arc::new(MemberDefinition::constructor(vec![
        ("name", system("String")),
        ("id", system("Guid")),
    ])));
    customer.add_member(Arc::new(MemberDefinition::field("name", system("String"))));
    customer.add_member(Arc::new(MemberDefinition::property("Id", system("Guid"))));
    customer.add_member(Arc::new(MemberDefinition::event(
        "Changed",
        system("EventHandler"),
    )));
    customer.add_member(Arc::new(MemberDefinition::method(
        "Rename",
        &[],
        vec![("newName", system("String"))],
    )));
    customer.add_member(Arc::new(MemberDefinition::method(
        "Rename",
        &[],
        vec![("newName", system("String")), ("reason", system("String"))],
    )));
    customer.add_member(Arc::new(MemberDefinition::method(
        "Convert",
        &["TTarget"],
        vec![("value", MemberDefinition::method_parameter("TTarget", 0))],
    )));
    models.define_nested_type(&customer, "Address");

    let repository = models.define_generic_type("Sample.Models", "Repository`1", &["TEntity"]);
    let entity = type_parameter(&repository, 0);
    repository.add_member(Arc::new(MemberDefinition::method(
        "Add",
        &[],
        vec![("entity", entity.clone())],
    )));
    repository.add_member(Arc::new(MemberDefinition::method(
        "Get",
        &[],
        vec![("id", system("Int32"))],
    )));
    repository.add_member(Arc::new(MemberDefinition::property("Current", entity)));

    let reader = models.define_type("Sample.Models", "IReader");
    reader.add_member(Arc::new(MemberDefinition::method("Read", &[], vec![])));
    reader.add_member(Arc::new(MemberDefinition::method("Close", &[], vec![])));
    reader.add_interface(system("IDisposable"));

    let writer = models.define_type("Sample.Models", "IWriter");
    writer.add_member(Arc::new(MemberDefinition::method(
        "Write",
        &[],
        vec![("value", system("String"))],
    )));
    writer.add_member(Arc::new(MemberDefinition::method("Close", &[], vec![])));
    writer.add_interface(system("IDisposable"));

    let store = models.define_type("Sample.Models", "IStore");
    store.add_interface(RuntimeType::Definition(reader));
    store.add_interface(RuntimeType::Definition(writer));

    models
}

/// A loaded system type of the sample core library
pub fn system_type(universe: &TypeUniverse, name: &str) -> RuntimeType {
    universe
        .find_assembly("mscorlib", None)
        .and_then(|corlib| corlib.find_type("System", name))
        .map(RuntimeType::Definition)
        .unwrap_or_else(|| panic!("sample corlib has no System.{name}"))
}

/// Universe with the sample core library and `Sample.Models` 1.0.0.0 loaded
pub fn sample_universe() -> TypeUniverse {
    let universe = TypeUniverse::new();
    universe.load(create_corlib());
    universe.load(create_models(&universe, 1));
    universe
}

/// The `position`-th generic parameter of a generic type definition
pub fn type_parameter(definition: &TypeDefinitionRc, position: usize) -> RuntimeType {
    RuntimeType::GenericParameter(GenericParameter {
        name: definition.generic_parameters[position].clone(),
        position,
        owner: GenericParameterOwner::Type,
    })
}
