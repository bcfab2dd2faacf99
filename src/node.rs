//! Node implementation for the routing tree.
//!
//! Each `Node` owns its children directly. A node consumes a segment of the
//! request path relative to its parent and may carry handlers for any number
//! of HTTP methods.

use std::collections::HashMap;
use std::fmt::Write;

use crate::util::lossy;
use crate::{Result, RouteError};

/// A node of the routing tree.
///
/// Children are checked in a fixed priority order during search: static
/// children first (selected by the first byte of their segment), then
/// wildcard children in registration order, then the catch-all child.
#[derive(Debug, Clone)]
pub struct Node<H> {
    /// The bytes this node consumes, relative to its parent
    pub(crate) segment: Vec<u8>,

    /// First byte of each static child's segment, parallel to `static_children`
    pub(crate) static_indices: Vec<u8>,

    /// Static children, at most one per leading byte
    pub(crate) static_children: Vec<Node<H>>,

    /// Named wildcard children, in registration order
    pub(crate) wildcard_children: Vec<Node<H>>,

    /// Trailing catch-all child, if any
    pub(crate) catch_all_child: Option<Box<Node<H>>>,

    /// Handlers for patterns that terminate at this node
    pub(crate) handlers: HashMap<String, H>,

    /// Trailing-slash redirect hint for the owning multiplexer.
    /// Stored only; matching never reads it.
    pub(crate) redirect_on_missing_slash: bool,
}

impl<H> Node<H> {
    /// Creates a new empty node with the given segment
    pub(crate) fn new(segment: Vec<u8>) -> Self {
        Node {
            segment,
            static_indices: Vec::new(),
            static_children: Vec::new(),
            wildcard_children: Vec::new(),
            catch_all_child: None,
            handlers: HashMap::new(),
            redirect_on_missing_slash: false,
        }
    }

    /// The raw segment this node consumes.
    pub fn segment(&self) -> &[u8] {
        &self.segment
    }

    /// Name of the parameter bound by this node, if it is a wildcard or catch-all node.
    pub(crate) fn param_name(&self) -> String {
        lossy(&self.segment[1..])
    }

    /// Attaches `handler` for `method`.
    ///
    /// Fails with [`RouteError::DuplicateMethodHandler`] if the method is
    /// already handled here; the existing handler is kept.
    pub fn set_handler(&mut self, method: &str, handler: H) -> Result<()> {
        if self.handlers.contains_key(method) {
            return Err(RouteError::DuplicateMethodHandler {
                pattern: lossy(&self.segment),
                method: method.to_string(),
            });
        }

        self.handlers.insert(method.to_string(), handler);
        Ok(())
    }

    /// Returns the handler registered for `method`, if any.
    pub fn handler(&self, method: &str) -> Option<&H> {
        self.handlers.get(method)
    }

    /// Returns the methods handled at this node, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// Returns whether any pattern terminates at this node.
    pub fn has_handlers(&self) -> bool {
        !self.handlers.is_empty()
    }

    pub fn redirect_on_missing_slash(&self) -> bool {
        self.redirect_on_missing_slash
    }

    pub fn set_redirect_on_missing_slash(&mut self, redirect: bool) {
        self.redirect_on_missing_slash = redirect;
    }

    /// Returns the number of method handlers stored in this subtree
    pub fn route_count(&self) -> usize {
        let mut count = self.handlers.len();

        for child in self.static_children.iter().chain(&self.wildcard_children) {
            count += child.route_count();
        }
        if let Some(catch_all) = &self.catch_all_child {
            count += catch_all.route_count();
        }

        count
    }

    /// Returns whether this node has no children of any kind
    pub fn is_leaf(&self) -> bool {
        self.static_children.is_empty()
            && self.wildcard_children.is_empty()
            && self.catch_all_child.is_none()
    }

    /// Renders this subtree, one node per line.
    pub(crate) fn dump_tree(&self, prefix: &str, out: &mut String) {
        let _ = writeln!(
            out,
            "{}{} [{}] {:?}",
            prefix,
            lossy(&self.segment),
            self.static_children.len() + self.wildcard_children.len(),
            self.methods()
        );

        let prefix = format!("{}  ", prefix);
        for child in self.static_children.iter().chain(&self.wildcard_children) {
            child.dump_tree(&prefix, out);
        }
        if let Some(catch_all) = &self.catch_all_child {
            catch_all.dump_tree(&prefix, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node() {
        let node: Node<u32> = Node::new(Vec::new());

        assert!(node.segment().is_empty());
        assert!(!node.has_handlers());
        assert!(node.is_leaf());
        assert!(!node.redirect_on_missing_slash());
    }

    #[test]
    fn test_set_handler() {
        let mut node: Node<u32> = Node::new(b"/x".to_vec());

        node.set_handler("GET", 1).unwrap();
        node.set_handler("POST", 2).unwrap();

        assert_eq!(node.handler("GET"), Some(&1));
        assert_eq!(node.handler("POST"), Some(&2));
        assert_eq!(node.handler("PUT"), None);
        assert_eq!(node.methods(), vec!["GET", "POST"]);
    }

    #[test]
    fn test_duplicate_handler_keeps_first() {
        let mut node: Node<u32> = Node::new(b"/x".to_vec());
        node.set_handler("GET", 1).unwrap();

        let err = node.set_handler("GET", 2).unwrap_err();
        assert_eq!(
            err,
            RouteError::DuplicateMethodHandler {
                pattern: "/x".to_string(),
                method: "GET".to_string(),
            }
        );
        assert_eq!(node.handler("GET"), Some(&1));
    }

    #[test]
    fn test_route_count() {
        let mut node: Node<u32> = Node::new(Vec::new());
        node.set_handler("GET", 1).unwrap();
        assert_eq!(node.route_count(), 1);

        let mut child = Node::new(b"a".to_vec());
        child.set_handler("GET", 2).unwrap();
        child.set_handler("PUT", 3).unwrap();
        node.static_indices.push(b'a');
        node.static_children.push(child);

        let mut catch_all = Node::new(b"*rest".to_vec());
        catch_all.set_handler("GET", 4).unwrap();
        node.catch_all_child = Some(Box::new(catch_all));

        assert_eq!(node.route_count(), 4);
        assert!(!node.is_leaf());
    }

    #[test]
    fn test_param_name() {
        let node: Node<u32> = Node::new(b":id".to_vec());
        assert_eq!(node.param_name(), "id");
    }

    #[test]
    fn test_redirect_flag() {
        let mut node: Node<u32> = Node::new(b"/x".to_vec());
        node.set_redirect_on_missing_slash(true);
        assert!(node.redirect_on_missing_slash());
    }
}
