use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Argument Errors
/// - [`Error::InvalidArgument`] - A required name was empty, a type was open, or a hash was blank
/// - [`Error::Malformed`] - A qualified name could not be parsed
/// - [`Error::RecursionLimit`] - Generic arguments were nested too deeply
///
/// ## Resolution Errors
/// - [`Error::NotSupported`] - The requested match strategy is not implemented
/// - [`Error::AmbiguousMatch`] - Several assembly versions or member candidates matched
/// - [`Error::NotFound`] - An assembly, type, or member could not be located
///
/// # Examples
///
/// ```rust
/// use dotrepr::{Error, representation::TypeRepresentation};
///
/// match "NoNamespace, Assembly".parse::<TypeRepresentation>() {
///     Ok(_) => unreachable!(),
///     Err(Error::InvalidArgument(message)) => println!("rejected: {message}"),
///     Err(e) => println!("other: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An argument violated an invariant of the data model.
    ///
    /// Raised for empty or all-whitespace namespaces, names, assembly names, versions and
    /// signature hashes, and for open constructed types handed to the converter.
    #[error("Invalid argument - {0}")]
    InvalidArgument(String),

    /// The qualified name is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The requested operation or strategy is not supported.
    ///
    /// This is a configuration error and is raised regardless of any soft-fail flag.
    #[error("{0}")]
    NotSupported(String),

    /// More than one candidate matched where exactly one was required.
    ///
    /// Covers assemblies loaded in several versions and member signature hashes that match
    /// several members of the declaring type.
    #[error("{0}")]
    AmbiguousMatch(String),

    /// A required assembly, type or member could not be located.
    #[error("{0}")]
    NotFound(String),

    /// Recursion limit reached.
    ///
    /// Generic argument lists are parsed recursively; to prevent stack overflow on hostile
    /// input, a maximum depth is enforced. The associated value is the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_macro_records_location() {
        let error = malformed_error!("unbalanced bracket at {}", 4);
        match error {
            Error::Malformed {
                message,
                file,
                line,
            } => {
                assert_eq!(message, "unbalanced bracket at 4");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            other => panic!("Expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_display_passes_messages_through() {
        let error = Error::NotFound("These assemblies are not loaded: ass1".to_string());
        assert_eq!(error.to_string(), "These assemblies are not loaded: ass1");

        let error = Error::InvalidArgument("name is empty".to_string());
        assert_eq!(error.to_string(), "Invalid argument - name is empty");
    }
}
