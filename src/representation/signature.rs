//! Textual signature hashes that identify a member within its declaring type.
//!
//! Methods and constructors hash to `Name<G1,G2>(T1-p1,T2-p2)`, where the generic list is
//! present only for generic methods, each type is rendered by its full name (or its simple
//! name for unsubstituted generic parameters) and each parameter ends in its name. Other
//! members hash to `<Kind> <MemberTypeFullName>-<Name>`.
//!
//! ```text
//! Rename(System.String-newName)
//! Convert<System.Int32>(System.Int32-value)
//! .ctor(System.String-name,System.Guid-id)
//! Property System.Guid-Id
//! ```

use std::collections::VecDeque;

use crate::reflection::{MemberIntrospection, MethodIntrospection, TypeIntrospection};

fn type_display_name<T: TypeIntrospection>(ty: &T) -> String {
    ty.full_name().unwrap_or_else(|| ty.name())
}

/// Signature hash of a method or constructor.
#[must_use]
pub fn method_signature_hash<M: MethodIntrospection>(method: &M) -> String {
    let mut hash = method.name();

    if method.is_generic_method() {
        let generics: Vec<String> = method
            .generic_arguments()
            .iter()
            .map(type_display_name)
            .collect();
        hash.push('<');
        hash.push_str(&generics.join(","));
        hash.push('>');
    }

    let parameters: Vec<String> = method
        .parameters()
        .iter()
        .map(|parameter| {
            format!(
                "{}-{}",
                type_display_name(&parameter.parameter_type),
                parameter.name
            )
        })
        .collect();
    hash.push('(');
    hash.push_str(&parameters.join(","));
    hash.push(')');

    hash
}

/// Signature hash of any member; methods and constructors use [`method_signature_hash`].
#[must_use]
pub fn member_signature_hash<M: MemberIntrospection>(member: &M) -> String {
    if let Some(method) = member.as_method() {
        return method_signature_hash(&method);
    }

    let member_type = member
        .member_type()
        .map(|ty| type_display_name(&ty))
        .unwrap_or_default();
    format!("{} {}-{}", member.kind(), member_type, member.name())
}

/// Case-insensitive comparison of two signature hashes.
#[must_use]
pub fn hashes_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Methods declared on `ty` followed by those of every interface it implements,
/// transitively and breadth-first. Each interface contributes once.
pub fn methods_including_interfaces<T: TypeIntrospection>(ty: &T) -> Vec<T::Method> {
    let mut methods = ty.methods();
    let mut visited: Vec<T> = Vec::new();
    let mut pending: VecDeque<T> = ty.interfaces().into();

    while let Some(interface) = pending.pop_front() {
        if visited.contains(&interface) {
            continue;
        }
        methods.extend(interface.methods());
        pending.extend(interface.interfaces());
        visited.push(interface);
    }

    methods
}
