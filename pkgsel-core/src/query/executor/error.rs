//! Evaluation errors.

use std::fmt;
use thiserror::Error;

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments
    Exact(usize),
    /// This many arguments or more
    AtLeast(usize),
}

impl Arity {
    /// True when `count` arguments are acceptable.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(expected) => count == expected,
            Self::AtLeast(minimum) => count >= minimum,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(1) => f.write_str("exactly 1 argument"),
            Self::Exact(n) => write!(f, "exactly {n} arguments"),
            Self::AtLeast(n) => write!(f, "at least {n} arguments"),
        }
    }
}

/// Failures while evaluating a parsed expression.
///
/// Every variant names the package, selector or function at fault. Any of
/// them aborts the whole expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// An exact package path has no package in the universe.
    #[error(
        "Unresolved package '{path}'\n  Expected: Import path of a package in the snapshot\n  Suggestion: Use a wildcard such as '{path}/...' to match nested packages\n  Example: acme.org/alpha/..."
    )]
    UnresolvedPackage {
        /// Path as written
        path: String,
    },

    /// Selector name not registered in the catalog.
    #[error(
        "Unknown selector ':{name}'{}\n  Expected: One of {available}",
        did_you_mean(.suggestion, ":")
    )]
    UnknownSelector {
        /// Selector name without the `:`
        name: String,
        /// Closest registered name
        suggestion: Option<String>,
        /// Registered names, comma separated
        available: String,
    },

    /// Function name not registered in the catalog.
    #[error(
        "Unknown function '{name}'{}\n  Expected: One of {available}",
        did_you_mean(.suggestion, "")
    )]
    UnknownFunction {
        /// Function name as written
        name: String,
        /// Closest registered name
        suggestion: Option<String>,
        /// Registered names, comma separated
        available: String,
    },

    /// Function called with the wrong number of arguments.
    #[error("Function '{function}' takes {expected}, got {actual}\n  Example: {example}")]
    WrongArity {
        /// Function name as written
        function: String,
        /// Accepted argument count
        expected: Arity,
        /// Arguments supplied
        actual: usize,
        /// Valid call shape
        example: String,
    },

    /// A parameterized function name carries a missing or unsupported
    /// parameter.
    #[error("Invalid parameter for function '{function}': {reason}\n  Example: {example}")]
    InvalidParameter {
        /// Function name as written
        function: String,
        /// What is wrong with the parameter
        reason: String,
        /// Valid call shape
        example: String,
    },
}

fn did_you_mean(suggestion: &Option<String>, sigil: &str) -> String {
    suggestion.as_deref().map_or_else(String::new, |name| {
        format!("\n  Suggestion: Did you mean '{sigil}{name}'?")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(3));
        assert!(Arity::AtLeast(2).accepts(5));
        assert!(!Arity::AtLeast(2).accepts(1));
        assert_eq!(Arity::Exact(1).to_string(), "exactly 1 argument");
        assert_eq!(Arity::AtLeast(2).to_string(), "at least 2 arguments");
    }

    #[test]
    fn test_messages_name_the_subject() {
        let err = EvalError::UnknownSelector {
            name: "improt".to_string(),
            suggestion: Some("import".to_string()),
            available: "all, import".to_string(),
        };
        let text = err.to_string();
        assert!(text.starts_with("Unknown selector ':improt'"));
        assert!(text.contains("Did you mean ':import'?"));

        let err = EvalError::UnknownFunction {
            name: "Closure".to_string(),
            suggestion: None,
            available: "Reaches".to_string(),
        };
        assert!(!err.to_string().contains("Did you mean"));

        let err = EvalError::WrongArity {
            function: "Reaches".to_string(),
            expected: Arity::Exact(2),
            actual: 1,
            example: "Reaches(a, b)".to_string(),
        };
        assert!(err
            .to_string()
            .contains("'Reaches' takes exactly 2 arguments, got 1"));
    }
}
