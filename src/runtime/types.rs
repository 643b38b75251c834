//! Type definitions and constructed types of the reference runtime.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{
    reflection::{MemberKind, TypeIntrospection},
    representation::codec,
    runtime::{
        members::{MemberDefinitionRc, RuntimeMember, RuntimeMethod},
        AssemblyIdentity,
    },
    Error, Result,
};

/// Reference to a `TypeDefinition`
pub type TypeDefinitionRc = Arc<TypeDefinition>;

/// A type as declared in an assembly: a plain type or a generic type definition.
///
/// Interfaces and members are append-only so that signatures may refer back to the type
/// being defined.
pub struct TypeDefinition {
    /// Namespace; nested types carry their outermost type's namespace
    pub namespace: String,
    /// Simple name, including the generic arity marker (e.g. "List`1")
    pub name: String,
    /// The declaring assembly
    pub assembly: AssemblyIdentity,
    /// The enclosing type of a nested type
    pub declaring_type: Option<TypeDefinitionRc>,
    /// Names of the generic parameters, empty for non-generic types
    pub generic_parameters: Vec<String>,
    /// Interfaces this type implements directly
    pub interfaces: boxcar::Vec<RuntimeType>,
    /// Members declared on this type
    pub members: boxcar::Vec<MemberDefinitionRc>,
}

impl TypeDefinition {
    /// Create a new, member-less type definition
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        assembly: AssemblyIdentity,
        declaring_type: Option<TypeDefinitionRc>,
        generic_parameters: Vec<String>,
    ) -> Self {
        TypeDefinition {
            namespace: namespace.into(),
            name: name.into(),
            assembly,
            declaring_type,
            generic_parameters,
            interfaces: boxcar::Vec::new(),
            members: boxcar::Vec::new(),
        }
    }

    /// Name prefixed by every enclosing type, joined with `+`
    #[must_use]
    pub fn nested_name(&self) -> String {
        match &self.declaring_type {
            Some(declaring) => format!("{}+{}", declaring.nested_name(), self.name),
            None => self.name.clone(),
        }
    }

    /// Returns the full name (Namespace.Outer+Name) of the definition
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.nested_name()
        } else {
            format!("{}.{}", self.namespace, self.nested_name())
        }
    }

    /// `true` if the definition declares generic parameters
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    /// Record an implemented interface
    pub fn add_interface(&self, interface: RuntimeType) {
        self.interfaces.push(interface);
    }

    /// Record a member
    pub fn add_member(&self, member: MemberDefinitionRc) {
        self.members.push(member);
    }

    fn same_identity(self: &TypeDefinitionRc, other: &TypeDefinitionRc) -> bool {
        Arc::ptr_eq(self, other)
            || (self.assembly == other.assembly
                && self.namespace == other.namespace
                && self.nested_name() == other.nested_name())
    }
}

impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("fullname", &self.fullname())
            .field("assembly", &self.assembly.display_name())
            .field("generic_parameters", &self.generic_parameters)
            .finish()
    }
}

/// Who declares a generic parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericParameterOwner {
    /// A parameter of a generic type definition
    Type,
    /// A parameter of a generic method definition
    Method,
}

/// An unsubstituted generic parameter such as `T`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericParameter {
    /// Parameter name
    pub name: String,
    /// Zero-based position in the owner's parameter list
    pub position: usize,
    /// Owner kind
    pub owner: GenericParameterOwner,
}

/// A type handle of the reference runtime.
///
/// Cloning is cheap; all variants share their definitions.
#[derive(Clone)]
pub enum RuntimeType {
    /// A plain type or an open generic type definition
    Definition(TypeDefinitionRc),
    /// A generic type definition instantiated with arguments
    GenericInstance {
        /// The generic type definition
        definition: TypeDefinitionRc,
        /// Generic arguments in declaration order
        arguments: Arc<[RuntimeType]>,
    },
    /// An array of `element`
    Array {
        /// Element type
        element: Arc<RuntimeType>,
        /// Number of dimensions
        rank: u32,
    },
    /// A generic parameter
    GenericParameter(GenericParameter),
}

impl RuntimeType {
    /// Instantiate a generic type definition.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `self` is not a generic type definition or the
    /// number of arguments differs from its arity.
    pub fn make_generic_type(&self, arguments: Vec<RuntimeType>) -> Result<RuntimeType> {
        match self {
            RuntimeType::Definition(definition)
                if definition.generic_parameters.len() == arguments.len()
                    && !arguments.is_empty() =>
            {
                Ok(RuntimeType::GenericInstance {
                    definition: definition.clone(),
                    arguments: arguments.into(),
                })
            }
            _ => Err(Error::InvalidArgument(format!(
                "'{}' is not a generic type definition taking {} arguments",
                self.name(),
                arguments.len()
            ))),
        }
    }

    /// Array of `self` with the given rank
    #[must_use]
    pub fn make_array_type(&self, rank: u32) -> RuntimeType {
        RuntimeType::Array {
            element: Arc::new(self.clone()),
            rank: rank.max(1),
        }
    }

    /// The underlying definition of a plain type, definition or generic instance
    #[must_use]
    pub fn definition(&self) -> Option<&TypeDefinitionRc> {
        match self {
            RuntimeType::Definition(definition)
            | RuntimeType::GenericInstance { definition, .. } => Some(definition),
            RuntimeType::Array { .. } | RuntimeType::GenericParameter(_) => None,
        }
    }

    /// Declaring assembly; arrays report their element's, generic parameters have none
    #[must_use]
    pub fn assembly(&self) -> Option<&AssemblyIdentity> {
        match self {
            RuntimeType::Definition(definition)
            | RuntimeType::GenericInstance { definition, .. } => Some(&definition.assembly),
            RuntimeType::Array { element, .. } => element.assembly(),
            RuntimeType::GenericParameter(_) => None,
        }
    }

    /// Replace generic parameters with concrete arguments.
    ///
    /// Parameters whose position is outside the supplied argument lists are kept.
    #[must_use]
    pub fn substitute(
        &self,
        type_arguments: &[RuntimeType],
        method_arguments: &[RuntimeType],
    ) -> RuntimeType {
        match self {
            RuntimeType::Definition(_) => self.clone(),
            RuntimeType::GenericInstance {
                definition,
                arguments,
            } => RuntimeType::GenericInstance {
                definition: definition.clone(),
                arguments: arguments
                    .iter()
                    .map(|argument| argument.substitute(type_arguments, method_arguments))
                    .collect(),
            },
            RuntimeType::Array { element, rank } => RuntimeType::Array {
                element: Arc::new(element.substitute(type_arguments, method_arguments)),
                rank: *rank,
            },
            RuntimeType::GenericParameter(parameter) => {
                let arguments = match parameter.owner {
                    GenericParameterOwner::Type => type_arguments,
                    GenericParameterOwner::Method => method_arguments,
                };
                arguments
                    .get(parameter.position)
                    .cloned()
                    .unwrap_or_else(|| self.clone())
            }
        }
    }

    /// Full name followed by the declaring assembly's display name
    #[must_use]
    pub fn assembly_qualified_name(&self) -> Option<String> {
        let full_name = self.full_name()?;
        let assembly = self.assembly()?;
        Some(format!("{}, {}", full_name, assembly.display_name()))
    }

    fn type_arguments(&self) -> &[RuntimeType] {
        match self {
            RuntimeType::GenericInstance { arguments, .. } => arguments,
            _ => &[],
        }
    }
}

impl PartialEq for RuntimeType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RuntimeType::Definition(a), RuntimeType::Definition(b)) => a.same_identity(b),
            (
                RuntimeType::GenericInstance {
                    definition: a,
                    arguments: x,
                },
                RuntimeType::GenericInstance {
                    definition: b,
                    arguments: y,
                },
            ) => a.same_identity(b) && x == y,
            (
                RuntimeType::Array {
                    element: a,
                    rank: r,
                },
                RuntimeType::Array {
                    element: b,
                    rank: s,
                },
            ) => r == s && a == b,
            (RuntimeType::GenericParameter(a), RuntimeType::GenericParameter(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for RuntimeType {}

impl Hash for RuntimeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            RuntimeType::Definition(definition) => {
                definition.assembly.hash(state);
                definition.fullname().hash(state);
            }
            RuntimeType::GenericInstance {
                definition,
                arguments,
            } => {
                definition.assembly.hash(state);
                definition.fullname().hash(state);
                arguments.hash(state);
            }
            RuntimeType::Array { element, rank } => {
                element.hash(state);
                rank.hash(state);
            }
            RuntimeType::GenericParameter(parameter) => parameter.hash(state),
        }
    }
}

impl fmt::Debug for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.assembly_qualified_name() {
            Some(name) => write!(f, "RuntimeType({name})"),
            None => write!(f, "RuntimeType({})", self.name()),
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.full_name() {
            Some(name) => f.write_str(&name),
            None => f.write_str(&self.name()),
        }
    }
}

impl TypeIntrospection for RuntimeType {
    type Method = RuntimeMethod;
    type Member = RuntimeMember;

    fn namespace(&self) -> String {
        match self {
            RuntimeType::Definition(definition)
            | RuntimeType::GenericInstance { definition, .. } => definition.namespace.clone(),
            RuntimeType::Array { element, .. } => element.namespace(),
            RuntimeType::GenericParameter(_) => String::new(),
        }
    }

    fn name(&self) -> String {
        match self {
            RuntimeType::Definition(definition)
            | RuntimeType::GenericInstance { definition, .. } => definition.name.clone(),
            RuntimeType::Array { element, rank } => {
                format!("{}{}", element.name(), codec::rank_suffix(*rank))
            }
            RuntimeType::GenericParameter(parameter) => parameter.name.clone(),
        }
    }

    fn full_name(&self) -> Option<String> {
        match self {
            RuntimeType::Definition(definition) => Some(definition.fullname()),
            RuntimeType::GenericInstance {
                definition,
                arguments,
            } => {
                let arguments = arguments
                    .iter()
                    .map(|argument| {
                        argument
                            .assembly_qualified_name()
                            .map(|name| format!("[{name}]"))
                    })
                    .collect::<Option<Vec<_>>>()?;
                Some(format!("{}[{}]", definition.fullname(), arguments.join(",")))
            }
            RuntimeType::Array { element, rank } => {
                Some(format!("{}{}", element.full_name()?, codec::rank_suffix(*rank)))
            }
            RuntimeType::GenericParameter(_) => None,
        }
    }

    fn is_generic_type(&self) -> bool {
        match self {
            RuntimeType::Definition(definition) => definition.is_generic(),
            RuntimeType::GenericInstance { .. } => true,
            RuntimeType::Array { .. } | RuntimeType::GenericParameter(_) => false,
        }
    }

    fn is_generic_type_definition(&self) -> bool {
        matches!(self, RuntimeType::Definition(definition) if definition.is_generic())
    }

    fn contains_generic_parameters(&self) -> bool {
        match self {
            RuntimeType::Definition(definition) => definition.is_generic(),
            RuntimeType::GenericInstance { arguments, .. } => arguments
                .iter()
                .any(TypeIntrospection::contains_generic_parameters),
            RuntimeType::Array { element, .. } => element.contains_generic_parameters(),
            RuntimeType::GenericParameter(_) => true,
        }
    }

    fn generic_type_definition(&self) -> Option<Self> {
        match self {
            RuntimeType::Definition(definition) if definition.is_generic() => Some(self.clone()),
            RuntimeType::GenericInstance { definition, .. } => {
                Some(RuntimeType::Definition(definition.clone()))
            }
            _ => None,
        }
    }

    fn generic_arguments(&self) -> Vec<Self> {
        match self {
            RuntimeType::Definition(definition) => definition
                .generic_parameters
                .iter()
                .enumerate()
                .map(|(position, name)| {
                    RuntimeType::GenericParameter(GenericParameter {
                        name: name.clone(),
                        position,
                        owner: GenericParameterOwner::Type,
                    })
                })
                .collect(),
            RuntimeType::GenericInstance { arguments, .. } => arguments.to_vec(),
            RuntimeType::Array { .. } | RuntimeType::GenericParameter(_) => Vec::new(),
        }
    }

    fn is_array(&self) -> bool {
        matches!(self, RuntimeType::Array { .. })
    }

    fn array_rank(&self) -> Option<u32> {
        match self {
            RuntimeType::Array { rank, .. } => Some(*rank),
            _ => None,
        }
    }

    fn element_type(&self) -> Option<Self> {
        match self {
            RuntimeType::Array { element, .. } => Some(element.as_ref().clone()),
            _ => None,
        }
    }

    fn is_nested(&self) -> bool {
        self.definition()
            .is_some_and(|definition| definition.declaring_type.is_some())
    }

    fn declaring_type(&self) -> Option<Self> {
        self.definition()
            .and_then(|definition| definition.declaring_type.clone())
            .map(RuntimeType::Definition)
    }

    fn assembly_name(&self) -> String {
        self.assembly()
            .map(|assembly| assembly.name.clone())
            .unwrap_or_default()
    }

    fn assembly_version(&self) -> Option<String> {
        self.assembly().and_then(AssemblyIdentity::version_string)
    }

    fn interfaces(&self) -> Vec<Self> {
        let Some(definition) = self.definition() else {
            return Vec::new();
        };
        let type_arguments = self.type_arguments();
        definition
            .interfaces
            .iter()
            .map(|(_, interface)| interface.substitute(type_arguments, &[]))
            .collect()
    }

    fn methods(&self) -> Vec<Self::Method> {
        self.members_of(|kind| kind == MemberKind::Method)
            .into_iter()
            .map(|member| RuntimeMethod::new(self.clone(), member))
            .collect()
    }

    fn constructors(&self) -> Vec<Self::Method> {
        self.members_of(|kind| kind == MemberKind::Constructor)
            .into_iter()
            .map(|member| RuntimeMethod::new(self.clone(), member))
            .collect()
    }

    fn members(&self) -> Vec<Self::Member> {
        self.members_of(|_| true)
            .into_iter()
            .map(|member| RuntimeMember::new(self.clone(), member))
            .collect()
    }
}

impl RuntimeType {
    fn members_of(&self, filter: impl Fn(MemberKind) -> bool) -> Vec<MemberDefinitionRc> {
        match self.definition() {
            Some(definition) => definition
                .members
                .iter()
                .map(|(_, member)| member.clone())
                .filter(|member| filter(member.kind))
                .collect(),
            None => Vec::new(),
        }
    }
}
