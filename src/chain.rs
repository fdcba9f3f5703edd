//! An owned chain of handler nodes with a fluent builder.

use crate::handler::{Handler, Node, Outcome};
use itertools::Itertools;
use std::fmt;

/// A possibly empty chain. Dispatch borrows it immutably; every change to
/// the links needs `&mut`, so a chain shared across threads stays fixed.
pub struct Chain<R: ?Sized> {
    head: Option<Node<R>>,
}

impl<R: ?Sized> Chain<R> {
    pub fn new() -> Self {
        Self { head: None }
    }

    pub fn builder() -> ChainBuilder<R> {
        ChainBuilder::new()
    }

    pub fn from_head(head: Node<R>) -> Self {
        Self { head: Some(head) }
    }

    pub fn head(&self) -> Option<&Node<R>> {
        self.head.as_ref()
    }

    pub fn head_mut(&mut self) -> Option<&mut Node<R>> {
        self.head.as_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, Node::len)
    }

    pub fn names(&self) -> Vec<&str> {
        self.head.as_ref().map(Node::names).unwrap_or_default()
    }

    /// Appends a handler after the current tail.
    pub fn push<H: Handler<R> + 'static>(&mut self, handler: H) {
        self.push_node(Node::new(handler));
    }

    pub fn push_node(&mut self, node: Node<R>) {
        match self.head.as_mut() {
            Some(head) => head.append(node),
            None => self.head = Some(node),
        }
    }

    /// Node named `name`, for re-linking.
    pub fn node_mut(&mut self, name: &str) -> Option<&mut Node<R>> {
        self.head.as_mut()?.find_mut(name)
    }

    /// Cuts the chain after the node named `name` and returns the detached
    /// tail as its own chain. `None` when no such node exists.
    pub fn truncate_after(&mut self, name: &str) -> Option<Chain<R>> {
        let node = self.node_mut(name)?;
        Some(Chain {
            head: node.take_next(),
        })
    }

    pub fn dispatch(&self, request: &R) -> Outcome {
        match &self.head {
            Some(head) => head.handle(request),
            None => Outcome::Unhandled,
        }
    }

    pub fn dispatch_traced(&self, request: &R) -> (Outcome, Vec<String>) {
        match &self.head {
            Some(head) => head.handle_traced(request),
            None => (Outcome::Unhandled, Vec::new()),
        }
    }

    /// Dispatches each request in turn.
    pub fn dispatch_all<'r, I>(&self, requests: I) -> Vec<Outcome>
    where
        I: IntoIterator<Item = &'r R>,
        R: 'r,
    {
        requests
            .into_iter()
            .map(|request| self.dispatch(request))
            .collect()
    }
}

impl<R: ?Sized> Default for Chain<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the link order, e.g. `NodeA -> NodeB`.
impl<R: ?Sized> fmt::Display for Chain<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(empty chain)");
        }
        write!(f, "{}", self.names().iter().join(" -> "))
    }
}

impl<R: ?Sized> fmt::Debug for Chain<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").field("head", &self.head).finish()
    }
}

/// Collects handlers in link order, then links them back to front.
pub struct ChainBuilder<R: ?Sized> {
    handlers: Vec<Box<dyn Handler<R>>>,
}

impl<R: ?Sized> ChainBuilder<R> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn link<H: Handler<R> + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn link_boxed(mut self, handler: Box<dyn Handler<R>>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn build(self) -> Chain<R> {
        let mut head: Option<Node<R>> = None;
        for handler in self.handlers.into_iter().rev() {
            let mut node = Node::from_boxed(handler);
            if let Some(next) = head.take() {
                node.set_next(next);
            }
            head = Some(node);
        }
        Chain { head }
    }
}

impl<R: ?Sized> Default for ChainBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}
