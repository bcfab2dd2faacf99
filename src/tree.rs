//! The main routing tree.
//!
//! This module contains the `Tree` type, which owns the root node and provides
//! the public registration and lookup API, together with the recursive
//! insertion and search routines that walk the nodes.

use std::collections::HashMap;
use std::fmt;
use std::mem;

use tracing::{debug, trace};

use crate::node::Node;
use crate::util::{
    decode_param, lossy, next_separator, prefix_match, split_token, validate_pattern, CATCH_ALL,
    WILDCARD,
};
use crate::{Result, RouteError};

/// Parameter bindings collected while matching a path.
pub type Params = HashMap<String, String>;

/// A successful match: the node reached and the parameters bound on the way.
#[derive(Debug)]
pub struct Match<'a, H> {
    pub node: &'a Node<H>,
    pub params: Params,
}

/// A radix tree mapping path patterns to per-method handlers.
///
/// Patterns are made of static text, named wildcards (`:name`, matching one
/// path segment) and an optional trailing catch-all (`*name`, matching the
/// rest of the path). Static text shared between patterns is stored once.
///
/// The tree is built with `&mut self` and then only read, so a fully built
/// `Tree` can be shared between threads for concurrent lookups.
#[derive(Debug, Clone)]
pub struct Tree<H> {
    /// The root node of the tree
    pub(crate) root: Node<H>,

    /// The number of method handlers registered
    size: usize,
}

impl<H> Tree<H> {
    /// Creates a new, empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_mux::Tree;
    ///
    /// let tree = Tree::<u32>::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        Tree {
            root: Node::new(Vec::new()),
            size: 0,
        }
    }

    /// Returns the number of (pattern, method) registrations.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no handler has been registered.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn root(&self) -> &Node<H> {
        &self.root
    }

    /// Extends the tree so that `pattern` leads to a node, and returns that node.
    ///
    /// The whole pattern is validated first, so a rejected pattern leaves the
    /// tree unchanged.
    pub fn add_route(&mut self, pattern: &str) -> Result<&mut Node<H>> {
        validate_pattern(pattern.as_bytes())?;
        debug!(pattern, "adding route");
        self.root.add_path(pattern.as_bytes())
    }

    /// Registers `handler` for `method` on `pattern`.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_mux::{RouteError, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("/users/:id", "GET", 1).unwrap();
    ///
    /// let err = tree.insert("/users/:id", "GET", 2).unwrap_err();
    /// assert!(matches!(err, RouteError::DuplicateMethodHandler { .. }));
    /// ```
    pub fn insert(&mut self, pattern: &str, method: &str, handler: H) -> Result<()> {
        let node = self.add_route(pattern)?;
        node.set_handler(method, handler)
            .map_err(|_| RouteError::DuplicateMethodHandler {
                pattern: pattern.to_string(),
                method: method.to_string(),
            })?;

        self.size += 1;
        debug_assert_eq!(self.root.route_count(), self.size);
        Ok(())
    }

    /// Finds the node matching `path`, surfacing parameter decode failures.
    pub fn try_find(&self, path: &str) -> Result<Option<Match<'_, H>>> {
        let mut params = Params::new();
        let found = self.root.search(path.as_bytes(), &mut params)?;

        Ok(found.map(|node| Match { node, params }))
    }

    /// Finds the node matching `path`.
    ///
    /// A path whose wildcard values cannot be percent-decoded does not match.
    pub fn find(&self, path: &str) -> Option<Match<'_, H>> {
        match self.try_find(path) {
            Ok(Some(found)) => Some(found),
            Ok(None) => {
                trace!(path, "no route matched");
                None
            }
            Err(err) => {
                debug!(path, error = %err, "rejecting path with undecodable parameter");
                None
            }
        }
    }

    /// Resolves `path` and `method` to a handler and its parameter bindings.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_mux::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("/search/:query", "GET", "search").unwrap();
    ///
    /// let (handler, params) = tree.lookup("/search/hello%20world", "GET").unwrap();
    /// assert_eq!(*handler, "search");
    /// assert_eq!(params["query"], "hello world");
    /// ```
    pub fn lookup(&self, path: &str, method: &str) -> Option<(&H, Params)> {
        let Match { node, params } = self.find(path)?;
        node.handler(method).map(|handler| (handler, params))
    }

    /// Like [`Tree::lookup`], but reports undecodable parameters as an error.
    pub fn try_lookup(&self, path: &str, method: &str) -> Result<Option<(&H, Params)>> {
        let Match { node, params } = match self.try_find(path)? {
            Some(found) => found,
            None => return Ok(None),
        };

        Ok(node.handler(method).map(|handler| (handler, params)))
    }

    /// Renders the tree shape for debugging. The format is not stable.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.root.dump_tree("", &mut out);
        out
    }
}

impl<H> Node<H> {
    // Recursive helper for add_route. `path` is the part of the pattern not yet consumed.
    pub(crate) fn add_path(&mut self, path: &[u8]) -> Result<&mut Node<H>> {
        if path.is_empty() {
            return Ok(self);
        }

        let (token, remaining) = split_token(path);

        match token[0] {
            CATCH_ALL => {
                if let Some(existing) = &self.catch_all_child {
                    if existing.segment != token {
                        return Err(RouteError::ConflictingCatchAll {
                            existing: lossy(&existing.segment),
                            requested: lossy(token),
                        });
                    }
                }

                let child = self
                    .catch_all_child
                    .get_or_insert_with(|| Box::new(Node::new(token.to_vec())));
                Ok(&mut **child)
            }
            WILDCARD => {
                let idx = match self.wildcard_children.iter().position(|c| c.segment == token) {
                    Some(idx) => idx,
                    None => {
                        self.wildcard_children.push(Node::new(token.to_vec()));
                        self.wildcard_children.len() - 1
                    }
                };

                self.wildcard_children[idx].add_path(remaining)
            }
            first => {
                if let Some(idx) = self.static_indices.iter().position(|&b| b == first) {
                    let consumed = self.split_common_prefix(idx, token);
                    return self.static_children[idx].add_path(&path[consumed..]);
                }

                self.static_indices.push(first);
                self.static_children.push(Node::new(token.to_vec()));
                let last = self.static_children.len() - 1;
                self.static_children[last].add_path(remaining)
            }
        }
    }

    // Makes the static child at `idx` a prefix of `token`, splitting it if needed.
    // Returns how many bytes of `token` the (possibly new) child consumes.
    fn split_common_prefix(&mut self, idx: usize, token: &[u8]) -> usize {
        let child = &mut self.static_children[idx];

        if token.starts_with(&child.segment) {
            return child.segment.len();
        }

        // At least the indexed first byte is shared, and the child is not fully consumed
        let common_len = prefix_match(token, 0, &child.segment);

        let mut existing = mem::replace(child, Node::new(token[..common_len].to_vec()));
        existing.segment = existing.segment[common_len..].to_vec();

        debug!(
            prefix = %lossy(&child.segment),
            tail = %lossy(&existing.segment),
            "splitting static node"
        );

        child.static_indices.push(existing.segment[0]);
        child.static_children.push(existing);

        common_len
    }

    // Recursive helper for lookups. Only writes to `params` on the path that matches.
    pub(crate) fn search<'n>(
        &'n self,
        path: &[u8],
        params: &mut Params,
    ) -> Result<Option<&'n Node<H>>> {
        if path.is_empty() {
            return Ok(if self.has_handlers() { Some(self) } else { None });
        }

        // Static children never share a first byte, so at most one can apply
        if let Some(idx) = self.static_indices.iter().position(|&b| b == path[0]) {
            let child = &self.static_children[idx];
            if path.starts_with(&child.segment) {
                if let Some(found) = child.search(&path[child.segment.len()..], params)? {
                    return Ok(Some(found));
                }
            }
        }

        if !self.wildcard_children.is_empty() {
            let (token, rest) = path.split_at(next_separator(path));

            if !token.is_empty() {
                for child in &self.wildcard_children {
                    if let Some(found) = child.search(rest, params)? {
                        let value = decode_param(token)?;
                        params.insert(child.param_name(), value);
                        return Ok(Some(found));
                    }
                }
            }
        }

        if let Some(catch_all) = &self.catch_all_child {
            if catch_all.has_handlers() {
                // Bound raw, without percent-decoding. `path` is a suffix of the
                // request `&str` starting right after a separator, so it is valid UTF-8.
                params.insert(catch_all.param_name(), lossy(path));
                return Ok(Some(catch_all));
            }
        }

        Ok(None)
    }
}

impl<H> Default for Tree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Display for Tree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}
