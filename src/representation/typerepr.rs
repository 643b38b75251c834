//! The [`TypeRepresentation`] data model.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{representation::codec, Error, Result};

const UNKNOWN_NAMESPACE: &str = "Dotrepr.Representation";
const UNKNOWN_NAME: &str = "UnknownTypeRepresentation";
const UNKNOWN_ASSEMBLY: &str = "Dotrepr.Representation";

/// Serializable description of a type.
///
/// A representation records what is needed to find a type again: its namespace, its
/// simple name (including any `+`-joined nesting prefix and array-rank suffix, but never
/// the generic argument list), the simple name and optional version of its assembly, and
/// its generic arguments.
///
/// `generic_arguments` distinguishes three cases:
/// - `None` - not a generic type
/// - `Some(vec![])` - an open generic type definition such as `List`1`
/// - `Some(args)` - a closed generic type, arguments in declaration order
///
/// Instances are immutable; the `with_*` methods return validated copies with one field
/// replaced.
///
/// # Examples
///
/// ```rust
/// use dotrepr::representation::TypeRepresentation;
///
/// let int32 = TypeRepresentation::new("System", "Int32", "mscorlib", Some("4.0.0.0"), None)?;
/// let list = TypeRepresentation::new(
///     "System.Collections.Generic",
///     "List`1",
///     "mscorlib",
///     None,
///     Some(vec![int32]),
/// )?;
///
/// assert_eq!(
///     list.to_string(),
///     "System.Collections.Generic.List`1[[System.Int32, mscorlib, Version=4.0.0.0]], mscorlib"
/// );
/// # Ok::<(), dotrepr::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TypeRepresentationData")]
pub struct TypeRepresentation {
    pub(crate) namespace: String,
    pub(crate) name: String,
    pub(crate) assembly_name: String,
    pub(crate) assembly_version: Option<String>,
    pub(crate) generic_arguments: Option<Vec<TypeRepresentation>>,
}

/// Unvalidated mirror used as the deserialization target.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeRepresentationData {
    namespace: String,
    name: String,
    assembly_name: String,
    assembly_version: Option<String>,
    generic_arguments: Option<Vec<TypeRepresentation>>,
}

impl TryFrom<TypeRepresentationData> for TypeRepresentation {
    type Error = Error;

    fn try_from(data: TypeRepresentationData) -> Result<Self> {
        TypeRepresentation::new(
            data.namespace,
            data.name,
            data.assembly_name,
            data.assembly_version.as_deref(),
            data.generic_arguments,
        )
    }
}

pub(crate) fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(format!(
            "'{field}' is empty or white space"
        )));
    }
    Ok(())
}

const QUALIFIED_NAME_DELIMITERS: [char; 3] = [',', '[', ']'];
const ASSEMBLY_NAME_DELIMITERS: [char; 4] = [',', '[', ']', '='];

fn reject_delimiters(value: &str, field: &str, delimiters: &[char]) -> Result<()> {
    if let Some(delimiter) = value.chars().find(|c| delimiters.contains(c)) {
        return Err(Error::InvalidArgument(format!(
            "'{field}' contains the qualified-name delimiter '{delimiter}'"
        )));
    }
    Ok(())
}

/// The simple name must build to a qualified name that parses back to it: brackets are
/// only allowed as trailing array-rank suffixes.
fn validate_name(name: &str) -> Result<()> {
    require_text(name, "name")?;
    let (base, suffixes) = name.split_at(name.find('[').unwrap_or(name.len()));
    require_text(base, "name")?;
    reject_delimiters(base, "name", &QUALIFIED_NAME_DELIMITERS)?;
    if !codec::is_rank_suffix_list(suffixes) {
        return Err(Error::InvalidArgument(format!(
            "'name' suffix '{suffixes}' is not a sequence of array ranks"
        )));
    }
    Ok(())
}

impl TypeRepresentation {
    /// Create a new representation.
    ///
    /// # Arguments
    ///
    /// * `namespace` - Namespace of the type
    /// * `name` - Simple name with nesting prefix and array suffix
    /// * `assembly_name` - Simple name of the declaring assembly
    /// * `assembly_version` - Assembly version, `None` for unversioned
    /// * `generic_arguments` - See the type-level documentation
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if a name is empty or white space, a version is
    /// present but white space, or a field contains a qualified-name delimiter (`,` or a
    /// bracket outside array-rank suffixes, or `=` in the assembly name).
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        assembly_name: impl Into<String>,
        assembly_version: Option<&str>,
        generic_arguments: Option<Vec<TypeRepresentation>>,
    ) -> Result<Self> {
        let representation = TypeRepresentation {
            namespace: namespace.into(),
            name: name.into(),
            assembly_name: assembly_name.into(),
            assembly_version: assembly_version.map(str::to_string),
            generic_arguments,
        };

        representation.validate()?;
        Ok(representation)
    }

    fn validate(&self) -> Result<()> {
        require_text(&self.namespace, "namespace")?;
        reject_delimiters(&self.namespace, "namespace", &QUALIFIED_NAME_DELIMITERS)?;
        validate_name(&self.name)?;
        require_text(&self.assembly_name, "assemblyName")?;
        reject_delimiters(&self.assembly_name, "assemblyName", &ASSEMBLY_NAME_DELIMITERS)?;
        if let Some(version) = &self.assembly_version {
            require_text(version, "assemblyVersion")?;
            reject_delimiters(version, "assemblyVersion", &QUALIFIED_NAME_DELIMITERS)?;
        }
        Ok(())
    }

    /// The sentinel used when no real type is available.
    #[must_use]
    pub fn unknown() -> Self {
        TypeRepresentation {
            namespace: UNKNOWN_NAMESPACE.to_string(),
            name: UNKNOWN_NAME.to_string(),
            assembly_name: UNKNOWN_ASSEMBLY.to_string(),
            assembly_version: None,
            generic_arguments: None,
        }
    }

    /// Returns `true` if this is the [`TypeRepresentation::unknown`] sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }

    /// Namespace of the type.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Simple name, including nesting prefix and array suffix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Simple name of the declaring assembly.
    #[must_use]
    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    /// Version of the declaring assembly, if recorded.
    #[must_use]
    pub fn assembly_version(&self) -> Option<&str> {
        self.assembly_version.as_deref()
    }

    /// Generic arguments, see the type-level documentation.
    #[must_use]
    pub fn generic_arguments(&self) -> Option<&[TypeRepresentation]> {
        self.generic_arguments.as_deref()
    }

    /// `namespace.name`, without generic arguments or assembly.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// `true` if the name carries an array-rank suffix.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.name.ends_with(']')
    }

    /// `true` if generic arguments are present and non-empty.
    #[must_use]
    pub fn is_closed_generic(&self) -> bool {
        matches!(&self.generic_arguments, Some(arguments) if !arguments.is_empty())
    }

    /// `true` for an open generic type definition, i.e. a generic arity marker in the name
    /// and an empty argument list.
    #[must_use]
    pub fn is_generic_type_definition(&self) -> bool {
        matches!(&self.generic_arguments, Some(arguments) if arguments.is_empty())
            && !self.is_array()
            && self.name.contains('`')
    }

    /// Copy with the namespace replaced.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `namespace` is empty or white space.
    pub fn with_namespace(&self, namespace: impl Into<String>) -> Result<Self> {
        let mut copy = self.clone();
        copy.namespace = namespace.into();
        copy.validate()?;
        Ok(copy)
    }

    /// Copy with the name replaced.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `name` is empty or white space.
    pub fn with_name(&self, name: impl Into<String>) -> Result<Self> {
        let mut copy = self.clone();
        copy.name = name.into();
        copy.validate()?;
        Ok(copy)
    }

    /// Copy with the assembly name replaced.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `assembly_name` is empty or white space.
    pub fn with_assembly_name(&self, assembly_name: impl Into<String>) -> Result<Self> {
        let mut copy = self.clone();
        copy.assembly_name = assembly_name.into();
        copy.validate()?;
        Ok(copy)
    }

    /// Copy with the assembly version replaced; generic arguments keep their own versions.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `assembly_version` is present but white space.
    pub fn with_assembly_version(&self, assembly_version: Option<&str>) -> Result<Self> {
        let mut copy = self.clone();
        copy.assembly_version = assembly_version.map(str::to_string);
        copy.validate()?;
        Ok(copy)
    }

    /// Copy with the generic arguments replaced.
    #[must_use]
    pub fn with_generic_arguments(
        &self,
        generic_arguments: Option<Vec<TypeRepresentation>>,
    ) -> Self {
        let mut copy = self.clone();
        copy.generic_arguments = generic_arguments;
        copy
    }
}

impl fmt::Display for TypeRepresentation {
    /// Formats as the versioned qualified name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::build(self))
    }
}

impl FromStr for TypeRepresentation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        codec::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int32() -> TypeRepresentation {
        TypeRepresentation::new("System", "Int32", "mscorlib", Some("4.0.0.0"), Some(vec![]))
            .unwrap()
    }

    #[test]
    fn test_new_rejects_blank_fields() {
        for (namespace, name, assembly) in [
            ("", "Int32", "mscorlib"),
            ("  ", "Int32", "mscorlib"),
            ("System", "", "mscorlib"),
            ("System", "Int32", "\t"),
        ] {
            let result = TypeRepresentation::new(namespace, name, assembly, None, None);
            assert!(
                matches!(result, Err(Error::InvalidArgument(_))),
                "({namespace:?}, {name:?}, {assembly:?}) should be rejected"
            );
        }
    }

    #[test]
    fn test_new_rejects_blank_version() {
        let result = TypeRepresentation::new("System", "Int32", "mscorlib", Some("  "), None);
        assert!(matches!(
            result,
            Err(Error::InvalidArgument(message)) if message.contains("assemblyVersion")
        ));
    }

    #[test]
    fn test_new_rejects_qualified_name_delimiters() {
        for (namespace, name, assembly, version) in [
            ("System", "Int32, Evil", "mscorlib", None),
            ("System", "List`1[x]", "mscorlib", None),
            ("System", "Int32]", "mscorlib", None),
            ("System", "[]", "mscorlib", None),
            ("System,Evil", "Int32", "mscorlib", None),
            ("System", "Int32", "mscorlib, Version=1.0", None),
            ("System", "Int32", "Version=1.0", None),
            ("System", "Int32", "mscorlib", Some("1.0, Culture=neutral")),
        ] {
            let result = TypeRepresentation::new(namespace, name, assembly, version, None);
            assert!(
                matches!(result, Err(Error::InvalidArgument(_))),
                "({namespace:?}, {name:?}, {assembly:?}, {version:?}) should be rejected"
            );
        }

        assert!(int32().with_name("Int32[,]").is_ok());
        assert!(int32().with_name("Int32[*][ ]").is_ok());
        assert!(int32().with_name("Int32[,]x").is_err());
    }

    #[test]
    fn test_every_valid_representation_reparses() {
        for name in ["Int32", "Int32[]", "Int32[,][*]", "Outer+Inner[]"] {
            let representation = int32().with_name(name).unwrap();
            let reparsed: TypeRepresentation = representation.to_string().parse().unwrap();
            assert_eq!(reparsed, representation);
        }
    }

    #[test]
    fn test_with_methods_replace_one_field() {
        let original = int32();

        let renamed = original.with_name("Int64").unwrap();
        assert_eq!(renamed.name(), "Int64");
        assert_eq!(renamed.namespace(), original.namespace());
        assert_eq!(original.name(), "Int32");

        let unversioned = original.with_assembly_version(None).unwrap();
        assert_eq!(unversioned.assembly_version(), None);
        assert_ne!(unversioned, original);

        assert!(original.with_namespace(" ").is_err());
        assert!(original.with_assembly_name("").is_err());
        assert_eq!(
            original.with_assembly_name("System.Runtime").unwrap().assembly_name(),
            "System.Runtime"
        );
    }

    #[test]
    fn test_generic_shape_helpers() {
        let definition = TypeRepresentation::new(
            "System.Collections.Generic",
            "List`1",
            "mscorlib",
            None,
            Some(vec![]),
        )
        .unwrap();
        assert!(definition.is_generic_type_definition());
        assert!(!definition.is_closed_generic());

        let closed = definition.with_generic_arguments(Some(vec![int32()]));
        assert!(closed.is_closed_generic());
        assert!(!closed.is_generic_type_definition());

        let array = closed.with_name("List`1[]").unwrap();
        assert!(array.is_array());
        assert!(!int32().is_array());
    }

    #[test]
    fn test_equality_is_order_sensitive_for_generic_arguments() {
        let string = int32().with_name("String").unwrap();
        let a = TypeRepresentation::new(
            "System.Collections.Generic",
            "Dictionary`2",
            "mscorlib",
            None,
            Some(vec![int32(), string.clone()]),
        )
        .unwrap();
        let b = a.with_generic_arguments(Some(vec![string, int32()]));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_unknown_sentinel() {
        let unknown = TypeRepresentation::unknown();
        assert!(unknown.is_unknown());
        assert!(!int32().is_unknown());
        assert_eq!(
            unknown.to_string(),
            "Dotrepr.Representation.UnknownTypeRepresentation, Dotrepr.Representation"
        );
    }

    #[test]
    fn test_none_and_empty_generic_arguments_differ() {
        let plain = int32().with_generic_arguments(None);
        assert_ne!(plain, int32());
        assert_eq!(plain.to_string(), int32().to_string());
    }
}
