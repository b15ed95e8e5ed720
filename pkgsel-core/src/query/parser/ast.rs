//! Abstract Syntax Tree for package-set expressions.
//!
//! The tree is a closed sum type: the evaluator and the canonical printer
//! match on it exhaustively. Text is held as `Cow<'a, str>` so a freshly
//! parsed tree borrows from the expression; `into_owned()` detaches it.
//!
//! ## Canonical form
//!
//! `Display` prints a fully parenthesized form:
//!
//! | node                         | printed as          |
//! |------------------------------|---------------------|
//! | `Package`                    | `acme.org/alpha/...`|
//! | `Selector`                   | `base:name`         |
//! | `Binary`                     | `+(left, right)`    |
//! | `ImplicitUnion`              | `(a, b, c)`         |
//! | `Call`                       | `Reaches(a, b)`     |
//!
//! The parser accepts each of these shapes back, so printing and re-parsing
//! yields a structurally identical tree.

use super::token::SetOp;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::{self, Write as _};

/// Wildcard suffix meaning "this path and everything nested under it".
pub const WILDCARD_SUFFIX: &str = "/...";

/// Pattern matching every package in the universe.
pub const WILDCARD_ALL: &str = "...";

/// Parsed package-set expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Expr<'a> {
    /// Exact package path or wildcard pattern.
    Package(PackagePattern<'a>),

    /// Named transform applied to the set produced by `base`.
    Selector {
        /// Expression the selector applies to
        base: Box<Expr<'a>>,
        /// Selector name without the leading `:`
        name: Cow<'a, str>,
    },

    /// Explicit `+` or `-` between two operands.
    Binary {
        /// Union or difference
        op: SetOp,
        /// Left operand
        left: Box<Expr<'a>>,
        /// Right operand
        right: Box<Expr<'a>>,
    },

    /// Two or more terms written next to each other with no operator.
    ImplicitUnion(Vec<Expr<'a>>),

    /// Function call such as `Reaches(a, b)` or `variant=1(a)`.
    Call {
        /// Full function name as written, including any `=param` suffix
        name: Cow<'a, str>,
        /// Argument expressions, evaluated left to right
        args: Vec<Expr<'a>>,
    },
}

impl<'a> Expr<'a> {
    /// Package pattern leaf borrowing from source.
    #[must_use]
    pub fn package(path: &'a str) -> Self {
        Self::Package(PackagePattern::borrowed(path))
    }

    /// Wrap `base` in a selector.
    #[must_use]
    pub fn selector(base: Self, name: &'a str) -> Self {
        Self::Selector {
            base: Box::new(base),
            name: Cow::Borrowed(name),
        }
    }

    /// Explicit binary operation.
    #[must_use]
    pub fn binary(op: SetOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Function call.
    #[must_use]
    pub fn call(name: &'a str, args: Vec<Self>) -> Self {
        Self::Call {
            name: Cow::Borrowed(name),
            args,
        }
    }

    /// Split a selector chain into its innermost base and the selector names
    /// in application order.
    #[must_use]
    pub fn selector_chain(&self) -> (&Self, Vec<&str>) {
        let mut names = Vec::new();
        let mut node = self;
        while let Self::Selector { base, name } = node {
            names.push(name.as_ref());
            node = base;
        }
        names.reverse();
        (node, names)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + match self {
            Self::Package(_) => 0,
            Self::Selector { base, .. } => base.node_count(),
            Self::Binary { left, right, .. } => left.node_count() + right.node_count(),
            Self::ImplicitUnion(members) | Self::Call { args: members, .. } => {
                members.iter().map(Self::node_count).sum()
            }
        }
    }

    /// Convert to an owned tree (clones all borrowed text).
    #[must_use]
    pub fn into_owned(self) -> Expr<'static> {
        match self {
            Self::Package(pattern) => Expr::Package(pattern.into_owned()),
            Self::Selector { base, name } => Expr::Selector {
                base: Box::new(base.into_owned()),
                name: Cow::Owned(name.into_owned()),
            },
            Self::Binary { op, left, right } => Expr::Binary {
                op,
                left: Box::new(left.into_owned()),
                right: Box::new(right.into_owned()),
            },
            Self::ImplicitUnion(members) => {
                Expr::ImplicitUnion(members.into_iter().map(Self::into_owned).collect())
            }
            Self::Call { name, args } => Expr::Call {
                name: Cow::Owned(name.into_owned()),
                args: args.into_iter().map(Self::into_owned).collect(),
            },
        }
    }

    /// Indented debug rendering, one node per line.
    #[must_use]
    pub fn tree(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        // Writing into a String cannot fail
        let _ = match self {
            Self::Package(pattern) => writeln!(out, "{indent}Package {}", pattern.path),
            Self::Selector { name, .. } => writeln!(out, "{indent}Selector :{name}"),
            Self::Binary { op, .. } => writeln!(out, "{indent}Binary {}", op.symbol()),
            Self::ImplicitUnion(members) => {
                writeln!(out, "{indent}ImplicitUnion ({} members)", members.len())
            }
            Self::Call { name, args } => writeln!(out, "{indent}Call {name}/{}", args.len()),
        };
        match self {
            Self::Package(_) => {}
            Self::Selector { base, .. } => base.write_tree(out, depth + 1),
            Self::Binary { left, right, .. } => {
                left.write_tree(out, depth + 1);
                right.write_tree(out, depth + 1);
            }
            Self::ImplicitUnion(members) | Self::Call { args: members, .. } => {
                for member in members {
                    member.write_tree(out, depth + 1);
                }
            }
        }
    }
}

impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package(pattern) => f.write_str(&pattern.path),
            Self::Selector { base, name } => write!(f, "{base}:{name}"),
            Self::Binary { op, left, right } => write!(f, "{}({left}, {right})", op.symbol()),
            Self::ImplicitUnion(members) => {
                f.write_char('(')?;
                write_list(f, members)?;
                f.write_char(')')
            }
            Self::Call { name, args } => {
                write!(f, "{name}(")?;
                write_list(f, args)?;
                f.write_char(')')
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr<'_>]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Package path as written, possibly with a wildcard suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PackagePattern<'a> {
    /// Raw pattern text
    pub path: Cow<'a, str>,
}

/// How a package pattern resolves against the universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind<'p> {
    /// Exactly one package with this path
    Exact(&'p str),
    /// The prefix itself and every package nested under it
    Subtree(&'p str),
    /// Every package
    Everything,
}

impl<'a> PackagePattern<'a> {
    /// Borrow pattern text from source.
    #[must_use]
    pub const fn borrowed(path: &'a str) -> Self {
        Self {
            path: Cow::Borrowed(path),
        }
    }

    /// Classify the pattern.
    ///
    /// A subtree with an empty prefix (`/...`) covers every package, the
    /// same as `...`.
    #[must_use]
    pub fn kind(&self) -> PatternKind<'_> {
        let path = self.path.as_ref();
        if path == WILDCARD_ALL {
            return PatternKind::Everything;
        }
        match path.strip_suffix(WILDCARD_SUFFIX) {
            Some("") => PatternKind::Everything,
            Some(prefix) => PatternKind::Subtree(prefix),
            None => PatternKind::Exact(path),
        }
    }

    /// True for `...` and `prefix/...` patterns.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        !matches!(self.kind(), PatternKind::Exact(_))
    }

    /// Convert to owned pattern.
    #[must_use]
    pub fn into_owned(self) -> PackagePattern<'static> {
        PackagePattern {
            path: Cow::Owned(self.path.into_owned()),
        }
    }
}

impl From<&str> for PackagePattern<'static> {
    fn from(path: &str) -> Self {
        Self {
            path: Cow::Owned(path.to_string()),
        }
    }
}

/// True when `path` equals `prefix` or is nested under it.
#[must_use]
pub fn path_in_subtree(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
