//! Serializable representations of members, constructors and methods.
//!
//! Each representation pairs the declaring type's [`TypeRepresentation`] with the member's
//! signature hash (see [`crate::representation::signature`]). Re-locating a member resolves
//! the declaring type through a [`TypeResolver`] and selects the single member whose hash
//! matches case-insensitively; zero matches and several matches are distinct errors.

use serde::{Deserialize, Serialize};

use crate::{
    reflection::{AssemblyUniverse, MemberIntrospection, MethodIntrospection, TypeIntrospection},
    representation::{
        convert::to_representation,
        signature::{
            hashes_match, member_signature_hash, method_signature_hash,
            methods_including_interfaces,
        },
        typerepr::require_text,
        AssemblyMatchStrategy, TypeRepresentation,
    },
    resolver::TypeResolver,
    Error, Result,
};

type MethodOf<U> = <<U as AssemblyUniverse>::Type as TypeIntrospection>::Method;
type MemberOf<U> = <<U as AssemblyUniverse>::Type as TypeIntrospection>::Member;

/// A field, property, event, nested type, method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "MemberData")]
pub struct MemberRepresentation {
    declaring_type: TypeRepresentation,
    member_hash: String,
}

/// A constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ConstructorData")]
pub struct ConstructorRepresentation {
    declaring_type: TypeRepresentation,
    constructor_hash: String,
}

/// A method; closed generic methods also record their generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "MethodData")]
pub struct MethodRepresentation {
    declaring_type: TypeRepresentation,
    method_hash: String,
    generic_arguments: Vec<TypeRepresentation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberData {
    declaring_type: TypeRepresentation,
    member_hash: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConstructorData {
    declaring_type: TypeRepresentation,
    constructor_hash: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MethodData {
    declaring_type: TypeRepresentation,
    method_hash: String,
    #[serde(default)]
    generic_arguments: Vec<TypeRepresentation>,
}

impl TryFrom<MemberData> for MemberRepresentation {
    type Error = Error;

    fn try_from(data: MemberData) -> Result<Self> {
        MemberRepresentation::new(data.declaring_type, data.member_hash)
    }
}

impl TryFrom<ConstructorData> for ConstructorRepresentation {
    type Error = Error;

    fn try_from(data: ConstructorData) -> Result<Self> {
        ConstructorRepresentation::new(data.declaring_type, data.constructor_hash)
    }
}

impl TryFrom<MethodData> for MethodRepresentation {
    type Error = Error;

    fn try_from(data: MethodData) -> Result<Self> {
        MethodRepresentation::new(data.declaring_type, data.method_hash, data.generic_arguments)
    }
}

/// Resolve a declaring type or generic argument, failing if it cannot be found.
fn resolve_required<U: AssemblyUniverse>(
    resolver: &TypeResolver<U>,
    representation: &TypeRepresentation,
    strategy: AssemblyMatchStrategy,
) -> Result<U::Type> {
    resolver
        .resolve(representation, strategy, true)?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "Unable to resolve the specified TypeRepresentation ({representation})."
            ))
        })
}

/// Pick the single candidate, or report how many matched.
fn select_single<C>(
    mut candidates: Vec<C>,
    kind: &str,
    hash: &str,
    declaring_type: &TypeRepresentation,
    describe: impl Fn(&C) -> String,
) -> Result<C> {
    match candidates.len() {
        0 => Err(Error::NotFound(format!(
            "No {kind} with hash '{hash}' exists on {}.",
            declaring_type.full_name()
        ))),
        1 => Ok(candidates.remove(0)),
        count => {
            let names: Vec<String> = candidates.iter().map(describe).collect();
            Err(Error::AmbiguousMatch(format!(
                "{count} {kind}s with hash '{hash}' exist on {}: {}.",
                declaring_type.full_name(),
                names.join("; ")
            )))
        }
    }
}

fn describe_method<M: MethodIntrospection>(method: &M) -> String {
    let declaring = method.declaring_type();
    format!(
        "{}::{}",
        declaring.full_name().unwrap_or_else(|| declaring.name()),
        method_signature_hash(method)
    )
}

impl MemberRepresentation {
    /// Create a new member representation.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `member_hash` is empty or white space.
    pub fn new(declaring_type: TypeRepresentation, member_hash: impl Into<String>) -> Result<Self> {
        let member_hash = member_hash.into();
        require_text(&member_hash, "memberHash")?;
        Ok(MemberRepresentation {
            declaring_type,
            member_hash,
        })
    }

    /// Describe a runtime member.
    ///
    /// # Errors
    /// Returns an error if the declaring type cannot be represented.
    pub fn from_member<M: MemberIntrospection>(member: &M) -> Result<Self> {
        Self::new(
            to_representation(&member.declaring_type())?,
            member_signature_hash(member),
        )
    }

    /// The declaring type.
    #[must_use]
    pub fn declaring_type(&self) -> &TypeRepresentation {
        &self.declaring_type
    }

    /// The member signature hash.
    #[must_use]
    pub fn member_hash(&self) -> &str {
        &self.member_hash
    }

    /// Re-locate the member among those declared on the resolved declaring type.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if the declaring type or the member cannot be found
    /// - [`Error::AmbiguousMatch`] if several members share the hash
    pub fn to_member<U: AssemblyUniverse>(
        &self,
        resolver: &TypeResolver<U>,
        strategy: AssemblyMatchStrategy,
    ) -> Result<MemberOf<U>> {
        let declaring = resolve_required(resolver, &self.declaring_type, strategy)?;
        let candidates: Vec<MemberOf<U>> = declaring
            .members()
            .into_iter()
            .filter(|member| hashes_match(&member_signature_hash(member), &self.member_hash))
            .collect();

        select_single(
            candidates,
            "member",
            &self.member_hash,
            &self.declaring_type,
            |member| format!("{} {}", member.kind(), member_signature_hash(member)),
        )
    }
}

impl ConstructorRepresentation {
    /// Create a new constructor representation.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `constructor_hash` is empty or white space.
    pub fn new(
        declaring_type: TypeRepresentation,
        constructor_hash: impl Into<String>,
    ) -> Result<Self> {
        let constructor_hash = constructor_hash.into();
        require_text(&constructor_hash, "constructorHash")?;
        Ok(ConstructorRepresentation {
            declaring_type,
            constructor_hash,
        })
    }

    /// Describe a runtime constructor.
    ///
    /// # Errors
    /// Returns an error if the declaring type cannot be represented.
    pub fn from_constructor<M: MethodIntrospection>(constructor: &M) -> Result<Self> {
        Self::new(
            to_representation(&constructor.declaring_type())?,
            method_signature_hash(constructor),
        )
    }

    /// The declaring type.
    #[must_use]
    pub fn declaring_type(&self) -> &TypeRepresentation {
        &self.declaring_type
    }

    /// The constructor signature hash.
    #[must_use]
    pub fn constructor_hash(&self) -> &str {
        &self.constructor_hash
    }

    /// Re-locate the constructor on the resolved declaring type.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if the declaring type or the constructor cannot be found
    /// - [`Error::AmbiguousMatch`] if several constructors share the hash
    pub fn to_constructor<U: AssemblyUniverse>(
        &self,
        resolver: &TypeResolver<U>,
        strategy: AssemblyMatchStrategy,
    ) -> Result<MethodOf<U>> {
        let declaring = resolve_required(resolver, &self.declaring_type, strategy)?;
        let candidates: Vec<MethodOf<U>> = declaring
            .constructors()
            .into_iter()
            .filter(|constructor| {
                hashes_match(&method_signature_hash(constructor), &self.constructor_hash)
            })
            .collect();

        select_single(
            candidates,
            "constructor",
            &self.constructor_hash,
            &self.declaring_type,
            describe_method,
        )
    }
}

impl MethodRepresentation {
    /// Create a new method representation.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `method_hash` is empty or white space.
    pub fn new(
        declaring_type: TypeRepresentation,
        method_hash: impl Into<String>,
        generic_arguments: Vec<TypeRepresentation>,
    ) -> Result<Self> {
        let method_hash = method_hash.into();
        require_text(&method_hash, "methodHash")?;
        Ok(MethodRepresentation {
            declaring_type,
            method_hash,
            generic_arguments,
        })
    }

    /// Describe a runtime method.
    ///
    /// Generic arguments are recorded only for closed generic methods.
    ///
    /// # Errors
    /// Returns an error if the declaring type or a generic argument cannot be represented.
    pub fn from_method<M: MethodIntrospection>(method: &M) -> Result<Self> {
        let generic_arguments = if method.is_generic_method()
            && !method.is_generic_method_definition()
        {
            method
                .generic_arguments()
                .iter()
                .map(to_representation)
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        Self::new(
            to_representation(&method.declaring_type())?,
            method_signature_hash(method),
            generic_arguments,
        )
    }

    /// The declaring type.
    #[must_use]
    pub fn declaring_type(&self) -> &TypeRepresentation {
        &self.declaring_type
    }

    /// The method signature hash.
    #[must_use]
    pub fn method_hash(&self) -> &str {
        &self.method_hash
    }

    /// Generic arguments of a closed generic method, empty otherwise.
    #[must_use]
    pub fn generic_arguments(&self) -> &[TypeRepresentation] {
        &self.generic_arguments
    }

    /// Re-locate the method on the resolved declaring type or any interface it implements.
    ///
    /// Generic method definitions are closed over the recorded generic arguments before
    /// their hash is compared.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if a type or the method cannot be found
    /// - [`Error::AmbiguousMatch`] if several methods share the hash
    pub fn to_method<U: AssemblyUniverse>(
        &self,
        resolver: &TypeResolver<U>,
        strategy: AssemblyMatchStrategy,
    ) -> Result<MethodOf<U>> {
        let declaring = resolve_required(resolver, &self.declaring_type, strategy)?;
        let generic_arguments = self
            .generic_arguments
            .iter()
            .map(|argument| resolve_required(resolver, argument, strategy))
            .collect::<Result<Vec<_>>>()?;

        let mut candidates = Vec::new();
        for method in methods_including_interfaces(&declaring) {
            let method = if method.is_generic_method_definition() && !generic_arguments.is_empty() {
                if method.generic_arguments().len() != generic_arguments.len() {
                    continue;
                }
                method.make_generic_method(&generic_arguments)?
            } else {
                method
            };

            if hashes_match(&method_signature_hash(&method), &self.method_hash) {
                candidates.push(method);
            }
        }

        select_single(
            candidates,
            "method",
            &self.method_hash,
            &self.declaring_type,
            describe_method,
        )
    }
}
