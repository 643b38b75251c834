//! Methods, constructors, fields, properties, events and nested types.
//!
//! A [`MemberDefinition`] is what a type declares. [`RuntimeMethod`] and [`RuntimeMember`]
//! are views of a definition through a concrete declaring type: signatures seen through a
//! closed generic type have the type's parameters substituted, and a closed generic method
//! additionally substitutes its own.

use std::sync::Arc;

use crate::{
    reflection::{
        MemberIntrospection, MemberKind, MethodIntrospection, ParameterInfo, TypeIntrospection,
    },
    runtime::types::{GenericParameter, GenericParameterOwner, RuntimeType},
    Error, Result,
};

/// Reference to a `MemberDefinition`
pub type MemberDefinitionRc = Arc<MemberDefinition>;

/// Name of every constructor
pub const CONSTRUCTOR_NAME: &str = ".ctor";

/// A declared parameter; its type may mention generic parameters.
#[derive(Debug, Clone)]
pub struct ParameterDefinition {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub parameter_type: RuntimeType,
}

/// A member as declared on a type definition.
#[derive(Debug, Clone)]
pub struct MemberDefinition {
    /// Member category
    pub kind: MemberKind,
    /// Member name
    pub name: String,
    /// Field, property or event type, or the nested type itself
    pub member_type: Option<RuntimeType>,
    /// Generic parameter names of a generic method
    pub generic_parameters: Vec<String>,
    /// Parameters of a method or constructor
    pub parameters: Vec<ParameterDefinition>,
}

impl MemberDefinition {
    /// A method. Use [`MemberDefinition::method_parameter`] to refer to its generic
    /// parameters in `parameters`.
    #[must_use]
    pub fn method(
        name: &str,
        generic_parameters: &[&str],
        parameters: Vec<(&str, RuntimeType)>,
    ) -> Self {
        MemberDefinition {
            kind: MemberKind::Method,
            name: name.to_string(),
            member_type: None,
            generic_parameters: generic_parameters.iter().map(|p| p.to_string()).collect(),
            parameters: parameters
                .into_iter()
                .map(|(name, parameter_type)| ParameterDefinition {
                    name: name.to_string(),
                    parameter_type,
                })
                .collect(),
        }
    }

    /// A constructor
    #[must_use]
    pub fn constructor(parameters: Vec<(&str, RuntimeType)>) -> Self {
        MemberDefinition {
            kind: MemberKind::Constructor,
            ..Self::method(CONSTRUCTOR_NAME, &[], parameters)
        }
    }

    /// A field
    #[must_use]
    pub fn field(name: &str, field_type: RuntimeType) -> Self {
        Self::typed(MemberKind::Field, name, field_type)
    }

    /// A property
    #[must_use]
    pub fn property(name: &str, property_type: RuntimeType) -> Self {
        Self::typed(MemberKind::Property, name, property_type)
    }

    /// An event
    #[must_use]
    pub fn event(name: &str, handler_type: RuntimeType) -> Self {
        Self::typed(MemberKind::Event, name, handler_type)
    }

    pub(crate) fn nested_type(name: &str, nested: RuntimeType) -> Self {
        Self::typed(MemberKind::NestedType, name, nested)
    }

    fn typed(kind: MemberKind, name: &str, member_type: RuntimeType) -> Self {
        MemberDefinition {
            kind,
            name: name.to_string(),
            member_type: Some(member_type),
            generic_parameters: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// The `position`-th generic parameter of a generic method
    #[must_use]
    pub fn method_parameter(name: &str, position: usize) -> RuntimeType {
        RuntimeType::GenericParameter(GenericParameter {
            name: name.to_string(),
            position,
            owner: GenericParameterOwner::Method,
        })
    }

    fn is_invocable(&self) -> bool {
        matches!(self.kind, MemberKind::Method | MemberKind::Constructor)
    }
}

fn declaring_type_arguments(declaring_type: &RuntimeType) -> Vec<RuntimeType> {
    match declaring_type {
        RuntimeType::GenericInstance { arguments, .. } => arguments.to_vec(),
        _ => Vec::new(),
    }
}

/// A method or constructor seen through its declaring type.
#[derive(Debug, Clone)]
pub struct RuntimeMethod {
    declaring_type: RuntimeType,
    definition: MemberDefinitionRc,
    method_arguments: Vec<RuntimeType>,
}

impl RuntimeMethod {
    pub(crate) fn new(declaring_type: RuntimeType, definition: MemberDefinitionRc) -> Self {
        RuntimeMethod {
            declaring_type,
            definition,
            method_arguments: Vec::new(),
        }
    }

    /// The underlying declaration
    #[must_use]
    pub fn definition(&self) -> &MemberDefinitionRc {
        &self.definition
    }
}

impl PartialEq for RuntimeMethod {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
            && self.declaring_type == other.declaring_type
            && self.method_arguments == other.method_arguments
    }
}

impl MethodIntrospection for RuntimeMethod {
    type Type = RuntimeType;

    fn name(&self) -> String {
        self.definition.name.clone()
    }

    fn declaring_type(&self) -> RuntimeType {
        self.declaring_type.clone()
    }

    fn is_generic_method(&self) -> bool {
        !self.definition.generic_parameters.is_empty()
    }

    fn is_generic_method_definition(&self) -> bool {
        self.is_generic_method() && self.method_arguments.is_empty()
    }

    fn generic_arguments(&self) -> Vec<RuntimeType> {
        if !self.method_arguments.is_empty() {
            return self.method_arguments.clone();
        }

        self.definition
            .generic_parameters
            .iter()
            .enumerate()
            .map(|(position, name)| MemberDefinition::method_parameter(name, position))
            .collect()
    }

    fn parameters(&self) -> Vec<ParameterInfo<RuntimeType>> {
        let type_arguments = declaring_type_arguments(&self.declaring_type);
        self.definition
            .parameters
            .iter()
            .map(|parameter| ParameterInfo {
                name: parameter.name.clone(),
                parameter_type: parameter
                    .parameter_type
                    .substitute(&type_arguments, &self.method_arguments),
            })
            .collect()
    }

    fn make_generic_method(&self, arguments: &[RuntimeType]) -> Result<Self> {
        if !self.is_generic_method_definition()
            || arguments.len() != self.definition.generic_parameters.len()
        {
            return Err(Error::InvalidArgument(format!(
                "'{}' is not a generic method definition taking {} arguments",
                self.definition.name,
                arguments.len()
            )));
        }

        Ok(RuntimeMethod {
            declaring_type: self.declaring_type.clone(),
            definition: self.definition.clone(),
            method_arguments: arguments.to_vec(),
        })
    }
}

/// Any member seen through its declaring type.
#[derive(Debug, Clone)]
pub struct RuntimeMember {
    declaring_type: RuntimeType,
    definition: MemberDefinitionRc,
}

impl RuntimeMember {
    pub(crate) fn new(declaring_type: RuntimeType, definition: MemberDefinitionRc) -> Self {
        RuntimeMember {
            declaring_type,
            definition,
        }
    }
}

impl MemberIntrospection for RuntimeMember {
    type Type = RuntimeType;
    type Method = RuntimeMethod;

    fn name(&self) -> String {
        self.definition.name.clone()
    }

    fn kind(&self) -> MemberKind {
        self.definition.kind
    }

    fn member_type(&self) -> Option<RuntimeType> {
        let member_type = self.definition.member_type.as_ref()?;
        if self.definition.kind == MemberKind::NestedType {
            return Some(member_type.clone());
        }
        Some(member_type.substitute(&declaring_type_arguments(&self.declaring_type), &[]))
    }

    fn declaring_type(&self) -> RuntimeType {
        self.declaring_type.clone()
    }

    fn as_method(&self) -> Option<RuntimeMethod> {
        self.definition
            .is_invocable()
            .then(|| RuntimeMethod::new(self.declaring_type.clone(), self.definition.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{AssemblyIdentity, TypeDefinition};

    fn define(name: &str, parameters: &[&str]) -> Arc<TypeDefinition> {
        Arc::new(TypeDefinition::new(
            "Sample",
            name,
            AssemblyIdentity::new("Sample", None),
            None,
            parameters.iter().map(|p| p.to_string()).collect(),
        ))
    }

    #[test]
    fn test_parameters_substitute_type_arguments() {
        let int32 = RuntimeType::Definition(define("Int32", &[]));
        let holder = define("Holder`1", &["T"]);
        let open = RuntimeType::Definition(holder.clone());
        let t = open.generic_arguments().remove(0);
        holder.add_member(Arc::new(MemberDefinition::method(
            "Put",
            &[],
            vec![("value", t.clone())],
        )));
        holder.add_member(Arc::new(MemberDefinition::field("item", t)));

        let closed = open.make_generic_type(vec![int32.clone()]).unwrap();
        let put = closed.methods().remove(0);
        assert_eq!(put.parameters()[0].parameter_type, int32);

        let open_put = open.methods().remove(0);
        assert!(open_put.parameters()[0].parameter_type.contains_generic_parameters());

        let field = closed
            .members()
            .into_iter()
            .find(|member| member.kind() == MemberKind::Field)
            .unwrap();
        assert_eq!(field.member_type(), Some(int32));
        assert!(field.as_method().is_none());
    }

    #[test]
    fn test_make_generic_method() {
        let int32 = RuntimeType::Definition(define("Int32", &[]));
        let utility = define("Utility", &[]);
        utility.add_member(Arc::new(MemberDefinition::method(
            "Echo",
            &["TValue"],
            vec![("value", MemberDefinition::method_parameter("TValue", 0))],
        )));

        let echo = RuntimeType::Definition(utility).methods().remove(0);
        assert!(echo.is_generic_method_definition());
        assert_eq!(echo.generic_arguments()[0].name(), "TValue");

        let closed = echo.make_generic_method(&[int32.clone()]).unwrap();
        assert!(closed.is_generic_method());
        assert!(!closed.is_generic_method_definition());
        assert_eq!(closed.parameters()[0].parameter_type, int32);

        assert!(closed.make_generic_method(&[int32.clone()]).is_err());
        assert!(echo.make_generic_method(&[int32.clone(), int32]).is_err());
    }

    #[test]
    fn test_constructor_shape() {
        let ctor = MemberDefinition::constructor(vec![]);
        assert_eq!(ctor.kind, MemberKind::Constructor);
        assert_eq!(ctor.name, CONSTRUCTOR_NAME);
        assert!(ctor.is_invocable());
    }
}
