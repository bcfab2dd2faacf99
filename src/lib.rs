//! # Radix Mux
//!
//! The route-matching core of an HTTP path multiplexer.
//!
//! This crate provides a radix tree (also known as a compressed trie) that maps
//! URL path patterns to per-method handlers and resolves request paths in time
//! proportional to the path length.
//!
//! ## Pattern syntax
//!
//! - **Static text** such as `/api/users` is matched literally. Static text
//!   shared between patterns is stored once.
//! - **Wildcards** such as `:id` match one non-empty path segment (up to the
//!   next `/`) and bind its percent-decoded value.
//! - **Catch-alls** such as `*rest` must end the pattern and bind the rest of
//!   the path verbatim.
//!
//! When several children could match, static text wins over wildcards, and
//! wildcards (tried in registration order) win over the catch-all.
//!
//! ## Example
//!
//! ```rust
//! use radix_mux::Tree;
//!
//! let mut tree = Tree::new();
//! tree.insert("/user/:id", "GET", "show").unwrap();
//! tree.insert("/user/list", "GET", "list").unwrap();
//! tree.insert("/static/*path", "GET", "files").unwrap();
//!
//! let (handler, params) = tree.lookup("/user/42", "GET").unwrap();
//! assert_eq!(*handler, "show");
//! assert_eq!(params["id"], "42");
//!
//! let (handler, params) = tree.lookup("/user/list", "GET").unwrap();
//! assert_eq!(*handler, "list");
//! assert!(params.is_empty());
//!
//! let (_, params) = tree.lookup("/static/css/a%20b.css", "GET").unwrap();
//! assert_eq!(params["path"], "css/a%20b.css");
//! ```

pub mod node;
mod tree;
mod util;

// Re-export public types
pub use crate::node::Node;
pub use crate::tree::{Match, Params, Tree};
pub use crate::util::{CATCH_ALL, SEPARATOR, WILDCARD};

/// Result type for registration and decoding.
pub type Result<T> = std::result::Result<T, RouteError>;

/// Errors raised while registering patterns or decoding matched parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The method already has a handler on this pattern
    #[error("{pattern} already handles {method}")]
    DuplicateMethodHandler { pattern: String, method: String },

    /// A different catch-all is already registered at this position
    #[error("catch-all {requested} conflicts with existing {existing}")]
    ConflictingCatchAll { existing: String, requested: String },

    /// The pattern continues after its catch-all token
    #[error("/ after catch-all found in {pattern}")]
    SeparatorAfterCatchAll { pattern: String },

    /// A static token contains a wildcard or catch-all marker
    #[error("* or : in middle of path component {token}")]
    MalformedToken { token: String },

    /// A wildcard or catch-all token has no name
    #[error("wildcard or catch-all without a name in {pattern}")]
    MissingParamName { pattern: String },

    /// A matched wildcard value is not a valid percent-encoded string
    #[error("cannot decode path parameter {value:?}")]
    ParamDecodeError { value: String },
}
