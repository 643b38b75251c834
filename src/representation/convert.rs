//! Conversion from runtime type handles to [`TypeRepresentation`].

use crate::{
    reflection::TypeIntrospection,
    representation::{codec, TypeRepresentation},
    Error, Result,
};

/// Describe a runtime type as a representation.
///
/// Closed generic types record their arguments recursively, generic type definitions record
/// an empty argument list, arrays carry their rank suffixes on the element's name, and
/// nested types carry a `+`-joined name.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] for types that contain generic parameters but are
/// not themselves generic type definitions, such as `List<T>` inside a generic method.
pub fn to_representation<T: TypeIntrospection>(ty: &T) -> Result<TypeRepresentation> {
    if ty.contains_generic_parameters() && !ty.is_generic_type_definition() {
        return Err(Error::InvalidArgument(format!(
            "Type '{}' contains generic parameters and cannot be represented",
            ty.name()
        )));
    }

    if ty.is_array() {
        return array_representation(ty);
    }

    let generic_arguments = if ty.is_generic_type_definition() {
        Vec::new()
    } else if ty.is_generic_type() {
        ty.generic_arguments()
            .iter()
            .map(to_representation)
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };

    let definition = ty.generic_type_definition().unwrap_or_else(|| ty.clone());
    TypeRepresentation::new(
        definition.namespace(),
        nested_name(&definition),
        definition.assembly_name(),
        definition.assembly_version().as_deref(),
        Some(generic_arguments),
    )
}

fn array_representation<T: TypeIntrospection>(ty: &T) -> Result<TypeRepresentation> {
    let mut suffix = String::new();
    let mut element = ty.clone();

    while element.is_array() {
        suffix.insert_str(0, &codec::rank_suffix(element.array_rank().unwrap_or(1)));
        element = element.element_type().ok_or_else(|| {
            Error::InvalidArgument(format!("Array type '{}' has no element type", ty.name()))
        })?;
    }

    let element = to_representation(&element)?;
    element.with_name(format!("{}{}", element.name(), suffix))
}

fn nested_name<T: TypeIntrospection>(ty: &T) -> String {
    let mut name = ty.name();
    let mut current = ty.declaring_type();
    while let Some(declaring) = current {
        name = format!("{}+{}", declaring.name(), name);
        current = declaring.declaring_type();
    }
    name
}

/// Adds `to_representation` to every runtime type handle.
pub trait ToRepresentation {
    /// See [`to_representation`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for types with unsubstituted generic parameters.
    fn to_representation(&self) -> Result<TypeRepresentation>;
}

impl<T: TypeIntrospection> ToRepresentation for T {
    fn to_representation(&self) -> Result<TypeRepresentation> {
        to_representation(self)
    }
}

impl TypeRepresentation {
    /// Convert a runtime type, see [`to_representation`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for types with unsubstituted generic parameters.
    pub fn from_type<T: TypeIntrospection>(ty: &T) -> Result<Self> {
        to_representation(ty)
    }
}
