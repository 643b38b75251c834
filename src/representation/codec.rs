//! Qualified-name codec for [`TypeRepresentation`].
//!
//! The qualified name is the textual form in which representations are persisted:
//!
//! ```text
//! <Namespace>.<Name>[<generic argument group>][<array ranks>], <AssemblyName>[, Version=<Version>]
//! ```
//!
//! Each generic argument is its own qualified name wrapped in one extra pair of brackets,
//! and the argument list is wrapped in one more pair, so `List<int>` becomes
//! `System.Collections.Generic.List`1[[System.Int32, mscorlib]], mscorlib`. For arrays of
//! closed generics the generic group sits on the element, before the rank suffixes:
//! `System.Nullable`1[[System.Int32, mscorlib]][], mscorlib`.
//!
//! [`parse`] inverts [`build`] exactly, and also reads the unversioned two-part form
//! `<Namespace>.<Name>, <AssemblyName>` and names rendered by a .NET runtime, whose
//! `Culture=` and `PublicKeyToken=` components are discarded.
//!
//! # Examples
//!
//! ```rust
//! use dotrepr::representation::codec;
//!
//! let name =
//!     "System.Collections.Generic.List`1[[System.Int32, mscorlib, Version=4.0.0.0]][], mscorlib";
//! let representation = codec::parse(name)?;
//!
//! assert_eq!(representation.name(), "List`1[]");
//! assert_eq!(representation.generic_arguments().map(<[_]>::len), Some(1));
//! assert_eq!(codec::build(&representation), name);
//! # Ok::<(), dotrepr::Error>(())
//! ```

use std::collections::BTreeSet;

use tracing::trace;

use crate::{representation::TypeRepresentation, Error, Result};

/// Maximum nesting depth of generic argument lists accepted by [`parse`].
pub const MAX_RECURSION_DEPTH: usize = 64;

const VERSION_PREFIX: &str = "Version=";
const IGNORED_PREFIXES: [&str; 3] = ["Culture=", "PublicKeyToken=", "ProcessorArchitecture="];

/// Build the qualified name of a representation, including assembly versions.
#[must_use]
pub fn build(representation: &TypeRepresentation) -> String {
    let mut result = String::with_capacity(64);
    write_qualified_name(representation, &mut result);
    result
}

/// Build the qualified name with every assembly version removed.
#[must_use]
pub fn build_unversioned(representation: &TypeRepresentation) -> String {
    build(&remove_assembly_versions(representation))
}

fn write_qualified_name(representation: &TypeRepresentation, result: &mut String) {
    let generic_group = generic_argument_group(representation);

    result.push_str(&representation.namespace);
    result.push('.');

    match generic_group {
        Some(group) if representation.is_array() => {
            match representation.name.find('[') {
                Some(index) => {
                    result.push_str(&representation.name[..index]);
                    result.push_str(&group);
                    result.push_str(&representation.name[index..]);
                }
                None => {
                    result.push_str(&representation.name);
                    result.push_str(&group);
                }
            }
        }
        Some(group) => {
            result.push_str(&representation.name);
            result.push_str(&group);
        }
        None => result.push_str(&representation.name),
    }

    result.push_str(", ");
    result.push_str(&representation.assembly_name);
    if let Some(version) = &representation.assembly_version {
        result.push_str(", ");
        result.push_str(VERSION_PREFIX);
        result.push_str(version);
    }
}

fn generic_argument_group(representation: &TypeRepresentation) -> Option<String> {
    let arguments = representation.generic_arguments.as_deref()?;
    if arguments.is_empty() {
        return None;
    }

    let mut group = String::from("[");
    for (i, argument) in arguments.iter().enumerate() {
        if i > 0 {
            group.push(',');
        }
        group.push('[');
        write_qualified_name(argument, &mut group);
        group.push(']');
    }
    group.push(']');

    Some(group)
}

/// Parse a qualified name into a representation.
///
/// # Errors
/// - [`Error::Malformed`] for unbalanced brackets, a missing assembly name, empty segments
///   or unknown assembly name components
/// - [`Error::InvalidArgument`] if a resulting name is empty (e.g. no namespace)
/// - [`Error::RecursionLimit`] if generic arguments nest deeper than [`MAX_RECURSION_DEPTH`]
pub fn parse(qualified_name: &str) -> Result<TypeRepresentation> {
    trace!(qualified_name, "parsing qualified type name");
    parse_with_depth(qualified_name, 0)
}

fn parse_with_depth(qualified_name: &str, depth: usize) -> Result<TypeRepresentation> {
    if depth >= MAX_RECURSION_DEPTH {
        return Err(Error::RecursionLimit(MAX_RECURSION_DEPTH));
    }

    let segments = split_top_level(qualified_name)?;
    if segments.len() < 2 {
        return Err(malformed_error!(
            "Qualified name '{}' has no assembly name",
            qualified_name
        ));
    }

    let type_part = segments[0];
    let assembly_name = segments[1];
    if assembly_name.contains('=') {
        return Err(malformed_error!(
            "Qualified name '{}' has no assembly name before '{}'",
            qualified_name,
            assembly_name
        ));
    }

    let mut assembly_version = None;
    for segment in &segments[2..] {
        if let Some(version) = segment.strip_prefix(VERSION_PREFIX) {
            assembly_version = Some(version.trim());
        } else if !IGNORED_PREFIXES
            .iter()
            .any(|prefix| segment.starts_with(prefix))
        {
            return Err(malformed_error!(
                "Unknown assembly name component '{}' in '{}'",
                segment,
                qualified_name
            ));
        }
    }

    let (remaining, array_suffix) = strip_array_suffixes(type_part)?;

    let (full_name, generic_arguments) = if remaining.ends_with("]]") {
        let open = remaining
            .find('[')
            .ok_or_else(|| malformed_error!("Unbalanced brackets in '{}'", type_part))?;
        if matching_open_bracket(remaining)? != open {
            return Err(malformed_error!(
                "Generic argument list of '{}' is not a single bracket group",
                type_part
            ));
        }

        let body = &remaining[open + 1..remaining.len() - 1];
        let mut arguments = Vec::new();
        for argument in split_top_level(body)? {
            let inner = argument
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .ok_or_else(|| {
                    malformed_error!(
                        "Generic argument '{}' of '{}' is not enclosed in brackets",
                        argument,
                        type_part
                    )
                })?;
            arguments.push(parse_with_depth(inner, depth + 1)?);
        }

        (&remaining[..open], arguments)
    } else if remaining.contains(['[', ']']) {
        return Err(malformed_error!(
            "Unexpected bracket group in type name '{}'",
            type_part
        ));
    } else {
        (remaining, Vec::new())
    };

    let (namespace, simple_name) = match full_name.rfind('.') {
        Some(index) => (&full_name[..index], &full_name[index + 1..]),
        None => ("", full_name),
    };

    TypeRepresentation::new(
        namespace,
        format!("{simple_name}{array_suffix}"),
        assembly_name,
        assembly_version,
        Some(generic_arguments),
    )
}

/// Split at commas that are not nested inside any bracket group; segments are trimmed.
fn split_top_level(input: &str) -> Result<Vec<&str>> {
    let mut segments = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;

    for (index, c) in input.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed_error!("Unbalanced ']' in '{}'", input))?;
            }
            ',' if depth == 0 => {
                segments.push(input[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(malformed_error!("Unbalanced '[' in '{}'", input));
    }
    segments.push(input[start..].trim());

    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(malformed_error!("Empty segment in '{}'", input));
    }

    Ok(segments)
}

/// Index of the `[` matching the final `]` of `input`.
fn matching_open_bracket(input: &str) -> Result<usize> {
    let mut depth: usize = 0;
    for (index, c) in input.char_indices().rev() {
        match c {
            ']' => depth += 1,
            '[' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed_error!("Unbalanced '[' in '{}'", input))?;
                if depth == 0 {
                    return Ok(index);
                }
            }
            _ => {}
        }
    }
    Err(malformed_error!("Unbalanced ']' in '{}'", input))
}

/// Strip trailing rank suffixes (`[]`, `[,]`, `[*]`), returning them in textual order.
fn strip_array_suffixes(type_part: &str) -> Result<(&str, String)> {
    let mut remaining = type_part.trim_end();
    let mut suffixes = Vec::new();

    while remaining.ends_with(']') {
        let open = matching_open_bracket(remaining)?;
        let body = &remaining[open + 1..remaining.len() - 1];
        if !body.chars().all(|c| c == ',' || c == '*' || c.is_whitespace()) {
            break;
        }
        suffixes.push(&remaining[open..]);
        remaining = &remaining[..open];
    }

    suffixes.reverse();
    Ok((remaining, suffixes.concat()))
}

/// Rank suffix of an array: `[]` for rank one, `[,]` for rank two and so on.
#[must_use]
pub fn rank_suffix(rank: u32) -> String {
    let mut suffix = String::from("[");
    for _ in 1..rank.max(1) {
        suffix.push(',');
    }
    suffix.push(']');
    suffix
}

/// `true` if `suffixes` is a run of rank suffixes such as `[]`, `[,]` or `[*]`.
pub(crate) fn is_rank_suffix_list(suffixes: &str) -> bool {
    let mut rest = suffixes;
    while !rest.is_empty() {
        let Some(body) = rest.strip_prefix('[') else {
            return false;
        };
        let Some(close) = body.find(']') else {
            return false;
        };
        if !body[..close]
            .chars()
            .all(|c| c == ',' || c == '*' || c.is_whitespace())
        {
            return false;
        }
        rest = &body[close + 1..];
    }
    true
}

/// Split a simple name into its base name and array ranks, outermost rank last.
///
/// `Int32[,][]` yields `("Int32", [2, 1])`; `[*]` counts as rank one.
#[must_use]
pub fn array_ranks(name: &str) -> (&str, Vec<u32>) {
    let Some(index) = name.find('[') else {
        return (name, Vec::new());
    };

    let ranks = name[index..]
        .split_inclusive(']')
        .map(|group| 1 + u32::try_from(group.matches(',').count()).unwrap_or(0))
        .collect();
    (&name[..index], ranks)
}

/// Rebuild a representation, and every nested generic argument, without assembly versions.
///
/// Idempotent: applying it to its own output returns an equal representation.
#[must_use]
pub fn remove_assembly_versions(representation: &TypeRepresentation) -> TypeRepresentation {
    TypeRepresentation {
        namespace: representation.namespace.clone(),
        name: representation.name.clone(),
        assembly_name: representation.assembly_name.clone(),
        assembly_version: None,
        generic_arguments: representation
            .generic_arguments
            .as_ref()
            .map(|arguments| arguments.iter().map(remove_assembly_versions).collect()),
    }
}

/// Every assembly simple name referenced by a representation and its generic arguments.
#[must_use]
pub fn assembly_names(representation: &TypeRepresentation) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    collect_assembly_names(representation, &mut names);
    names
}

fn collect_assembly_names(representation: &TypeRepresentation, names: &mut BTreeSet<String>) {
    names.insert(representation.assembly_name.clone());
    for argument in representation.generic_arguments.iter().flatten() {
        collect_assembly_names(argument, names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repr(
        namespace: &str,
        name: &str,
        assembly: &str,
        version: Option<&str>,
        arguments: Vec<TypeRepresentation>,
    ) -> TypeRepresentation {
        TypeRepresentation::new(namespace, name, assembly, version, Some(arguments)).unwrap()
    }

    fn dictionary_example() -> TypeRepresentation {
        let string = repr("System", "String", "ass2", Some("2.0.0.0"), vec![]);
        let guid = repr("System", "Guid", "ass3", None, vec![]);
        let read_only = repr(
            "System",
            "IReadOnlyDictionary`2",
            "ass4",
            Some("3.0.0.0"),
            vec![string, guid],
        );
        let int32 = repr("System", "Int32", "ass1", Some("1.0.0.0"), vec![]);
        repr("System", "Dictionary`2", "ass5", None, vec![read_only, int32])
    }

    const DICTIONARY_EXAMPLE: &str =
        "System.Dictionary`2[[System.IReadOnlyDictionary`2[[System.String, ass2, Version=2.0.0.0],[System.Guid, ass3]], ass4, Version=3.0.0.0],[System.Int32, ass1, Version=1.0.0.0]], ass5";

    #[test]
    fn test_build_nested_generics() {
        assert_eq!(build(&dictionary_example()), DICTIONARY_EXAMPLE);
    }

    #[test]
    fn test_parse_nested_generics() {
        let parsed = parse(DICTIONARY_EXAMPLE).unwrap();
        assert_eq!(parsed, dictionary_example());

        let arguments = parsed.generic_arguments().unwrap();
        assert_eq!(arguments[0].name(), "IReadOnlyDictionary`2");
        assert_eq!(arguments[0].assembly_version(), Some("3.0.0.0"));
        assert_eq!(arguments[0].generic_arguments().unwrap()[1].assembly_name(), "ass3");
        assert_eq!(arguments[1].namespace(), "System");
    }

    #[test]
    fn test_build_array_of_closed_generic() {
        let int32 = repr("System", "Int32", "mscorlib", None, vec![]);
        let nullable_array = repr("System", "Nullable`1[][,]", "mscorlib", None, vec![int32]);
        assert_eq!(
            build(&nullable_array),
            "System.Nullable`1[[System.Int32, mscorlib]][][,], mscorlib"
        );
    }

    #[test]
    fn test_parse_array_suffixes_keep_textual_order() {
        let parsed = parse("System.Int32[,][][,,], mscorlib, Version=4.0.0.0").unwrap();
        assert_eq!(parsed.name(), "Int32[,][][,,]");
        assert_eq!(parsed.namespace(), "System");
        assert_eq!(parsed.generic_arguments().map(<[_]>::len), Some(0));

        let parsed = parse("System.Nullable`1[[System.Int32, mscorlib]][][,], mscorlib").unwrap();
        assert_eq!(parsed.name(), "Nullable`1[][,]");
        assert_eq!(parsed.generic_arguments().unwrap()[0].name(), "Int32");

        let parsed = parse("System.Int32[*], mscorlib").unwrap();
        assert_eq!(parsed.name(), "Int32[*]");
    }

    #[test]
    fn test_parse_generic_argument_that_is_an_array() {
        let name = "System.Collections.Generic.List`1[[System.Int32[,], mscorlib]], mscorlib";
        let parsed = parse(name).unwrap();
        let argument = &parsed.generic_arguments().unwrap()[0];
        assert_eq!(argument.name(), "Int32[,]");
        assert_eq!(build(&parsed), name);
    }

    #[test]
    fn test_parse_legacy_two_part_name() {
        let parsed = parse("MyCompany.Models.Customer+Address, MyCompany.Models").unwrap();
        assert_eq!(parsed.namespace(), "MyCompany.Models");
        assert_eq!(parsed.name(), "Customer+Address");
        assert_eq!(parsed.assembly_name(), "MyCompany.Models");
        assert_eq!(parsed.assembly_version(), None);
    }

    #[test]
    fn test_parse_runtime_rendered_name() {
        let parsed = parse(
            "System.Int32, mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
        )
        .unwrap();
        assert_eq!(parsed.assembly_version(), Some("4.0.0.0"));
        assert_eq!(build(&parsed), "System.Int32, mscorlib, Version=4.0.0.0");
    }

    #[test]
    fn test_parse_open_generic_definition() {
        let parsed = parse("System.Collections.Generic.List`1, mscorlib").unwrap();
        assert!(parsed.is_generic_type_definition());
        assert_eq!(parsed.name(), "List`1");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse("System.Int32"), Err(Error::Malformed { .. })));
        assert!(matches!(parse("System.Int32, "), Err(Error::Malformed { .. })));
        assert!(matches!(
            parse("System.Int32, Version=1.0.0.0"),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            parse("System.List`1[[System.Int32, mscorlib], mscorlib"),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            parse("System.List`1[[System.Int32, mscorlib]]], mscorlib"),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            parse("System.Int32, mscorlib, Flavor=sweet"),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            parse("System.List`1[System.Int32, mscorlib], mscorlib"),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            parse("Int32, mscorlib"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_recursion_limit() {
        let mut name = "System.Int32, a".to_string();
        for _ in 0..MAX_RECURSION_DEPTH + 1 {
            name = format!("System.Box`1[[{name}]], a");
        }
        assert!(matches!(parse(&name), Err(Error::RecursionLimit(_))));
    }

    #[test]
    fn test_remove_assembly_versions_is_recursive_and_idempotent() {
        let stripped = remove_assembly_versions(&dictionary_example());
        assert_eq!(
            build(&stripped),
            "System.Dictionary`2[[System.IReadOnlyDictionary`2[[System.String, ass2],[System.Guid, ass3]], ass4],[System.Int32, ass1]], ass5"
        );
        assert_eq!(remove_assembly_versions(&stripped), stripped);
        assert_eq!(build_unversioned(&dictionary_example()), build(&stripped));
    }

    #[test]
    fn test_rank_helpers() {
        assert_eq!(rank_suffix(1), "[]");
        assert_eq!(rank_suffix(3), "[,,]");
        assert_eq!(array_ranks("Int32[,][]"), ("Int32", vec![2, 1]));
        assert_eq!(array_ranks("Int32[*]"), ("Int32", vec![1]));
        assert_eq!(array_ranks("Customer+Address"), ("Customer+Address", vec![]));

        assert!(is_rank_suffix_list(""));
        assert!(is_rank_suffix_list("[,][][*]"));
        assert!(!is_rank_suffix_list("[System.Int32, mscorlib]"));
        assert!(!is_rank_suffix_list("[]x"));
        assert!(!is_rank_suffix_list("[,"));
    }

    #[test]
    fn test_assembly_names_cover_the_tree() {
        let names: Vec<String> = assembly_names(&dictionary_example()).into_iter().collect();
        assert_eq!(names, vec!["ass1", "ass2", "ass3", "ass4", "ass5"]);
    }
}
