//! Assembly identity for the reference runtime.
//!
//! An assembly is identified by its simple name and an optional four-part version. This is
//! the subset of the .NET display name that type representations carry; culture and public
//! key tokens are dropped by the qualified-name codec before an identity is consulted.
//!
//! # Examples
//!
//! ```rust
//! use dotrepr::runtime::{AssemblyIdentity, AssemblyVersion};
//!
//! let identity = AssemblyIdentity::new("System.Core", Some(AssemblyVersion::new(3, 5, 0, 0)));
//! assert_eq!(identity.display_name(), "System.Core, Version=3.5.0.0");
//! assert!(identity.satisfies("System.Core", Some("3.5")));
//! ```

use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// Identity of a loaded or loadable assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssemblyIdentity {
    /// Simple assembly name (e.g., "mscorlib", "System.Core").
    pub name: String,

    /// Four-part version number, `None` for unversioned assemblies.
    pub version: Option<AssemblyVersion>,
}

/// Four-part version numbering for .NET assemblies.
///
/// Versions are compared component-wise in order: major, minor, build, revision.
///
/// # Examples
///
/// ```rust
/// use dotrepr::runtime::AssemblyVersion;
///
/// let version = AssemblyVersion::new(1, 2, 3, 4);
/// assert_eq!(version.to_string(), "1.2.3.4");
///
/// let parsed = AssemblyVersion::parse("2.0")?;
/// assert!(parsed > version);
/// # Ok::<(), dotrepr::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssemblyVersion {
    /// Major version component.
    pub major: u16,
    /// Minor version component.
    pub minor: u16,
    /// Build version component.
    pub build: u16,
    /// Revision version component.
    pub revision: u16,
}

impl AssemblyIdentity {
    /// Create a new assembly identity.
    ///
    /// # Arguments
    ///
    /// * `name` - Simple assembly name
    /// * `version` - Optional four-part version
    pub fn new(name: impl Into<String>, version: Option<AssemblyVersion>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Render the display name, `Name[, Version=x.x.x.x]`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.version {
            Some(version) => format!("{}, Version={}", self.name, version),
            None => self.name.clone(),
        }
    }

    /// Returns the version rendered as a string, as type representations record it.
    #[must_use]
    pub fn version_string(&self) -> Option<String> {
        self.version.map(|version| version.to_string())
    }

    /// Check whether this identity satisfies a representation's assembly qualification.
    ///
    /// Names must match exactly; an unspecified requested version matches any version.
    #[must_use]
    pub fn satisfies(&self, name: &str, version: Option<&str>) -> bool {
        if self.name != name {
            return false;
        }

        match version {
            None => true,
            Some(requested) => match AssemblyVersion::parse(requested) {
                Ok(requested) => self.version == Some(requested),
                Err(_) => false,
            },
        }
    }
}

impl AssemblyVersion {
    /// Create a new assembly version with the specified components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Parse assembly version from string representation.
    ///
    /// Supports one to four dotted components; missing components default to 0.
    ///
    /// # Errors
    /// Returns an error if the version string has an invalid format.
    pub fn parse(version_str: &str) -> Result<Self> {
        let parts: Vec<&str> = version_str.trim().split('.').collect();

        if parts.len() > 4 {
            return Err(malformed_error!("Invalid version format: {}", version_str));
        }

        let mut components = [0u16; 4];

        for (i, part) in parts.iter().enumerate() {
            components[i] = part
                .parse::<u16>()
                .map_err(|_| malformed_error!("Invalid version component: {}", part))?;
        }

        Ok(Self::new(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AssemblyVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
