//! Chain of Responsibility: handler nodes and the dispatch contract.
//!
//! A [`Node`] wraps one [`Handler`] and exclusively owns its successor.
//! Dispatch walks the links in order: the first handler whose predicate
//! accepts the request produces the [`Outcome`], and nodes after it are
//! never consulted. When the tail declines, the outcome is
//! [`Outcome::Unhandled`].
//!
//! Because every node owns its successor through a `Box`, a chain can
//! never loop back on itself.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

// =============================================================================
// Milestone 1: The handler capability and its result
// =============================================================================

/// One link's decision: accept a request and reply, or decline it.
///
/// Implementors only answer for themselves. Forwarding to the successor is
/// done by [`Node`], never by the handler.
pub trait Handler<R: ?Sized>: Send + Sync {
    fn name(&self) -> &str;

    /// `Some(message)` when this handler accepts `request`.
    fn respond(&self, request: &R) -> Option<String>;
}

/// The reply of the node that accepted a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub handler: String,
    pub message: String,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of one dispatch.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Handled(Reply),
    /// No node in the chain accepted the request.
    Unhandled,
}

impl Outcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled(_))
    }

    pub fn reply(&self) -> Option<&Reply> {
        match self {
            Outcome::Handled(reply) => Some(reply),
            Outcome::Unhandled => None,
        }
    }

    pub fn handler(&self) -> Option<&str> {
        self.reply().map(|reply| reply.handler.as_str())
    }

    pub fn into_reply(self) -> Option<Reply> {
        match self {
            Outcome::Handled(reply) => Some(reply),
            Outcome::Unhandled => None,
        }
    }
}

// =============================================================================
// Milestone 2: Label handlers and match predicates
// =============================================================================

/// Predicate deciding whether a label handler accepts a request.
#[derive(Debug, Clone)]
pub enum Matcher {
    Exact(String),
    Prefix(String),
    Pattern(Regex),
    Any,
}

impl Matcher {
    pub fn exact(label: impl Into<String>) -> Self {
        Matcher::Exact(label.into())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Matcher::Prefix(prefix.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Matcher::Pattern)
    }

    pub fn matches(&self, label: &str) -> bool {
        match self {
            Matcher::Exact(expected) => label == expected,
            Matcher::Prefix(prefix) => label.starts_with(prefix.as_str()),
            Matcher::Pattern(regex) => regex.is_match(label),
            Matcher::Any => true,
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Exact(label) => write!(f, "exact '{label}'"),
            Matcher::Prefix(prefix) => write!(f, "prefix '{prefix}'"),
            Matcher::Pattern(regex) => write!(f, "pattern /{}/", regex.as_str()),
            Matcher::Any => f.write_str("any"),
        }
    }
}

/// Handles string labels; replies with `"<name> handled <label>"`.
#[derive(Debug, Clone)]
pub struct LabelHandler {
    name: String,
    matcher: Matcher,
}

impl LabelHandler {
    pub fn new(name: impl Into<String>, matcher: Matcher) -> Self {
        Self {
            name: name.into(),
            matcher,
        }
    }

    /// Shorthand for the common case of a single accepted label.
    pub fn exact(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, Matcher::exact(label))
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

impl Handler<str> for LabelHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn respond(&self, request: &str) -> Option<String> {
        self.matcher
            .matches(request)
            .then(|| format!("{} handled {}", self.name, request))
    }
}

/// Adapts a closure into a handler for any request type.
pub struct FnHandler<F> {
    name: String,
    respond: F,
}

impl<F> FnHandler<F> {
    pub fn new(name: impl Into<String>, respond: F) -> Self {
        Self {
            name: name.into(),
            respond,
        }
    }
}

impl<R, F> Handler<R> for FnHandler<F>
where
    R: ?Sized,
    F: Fn(&R) -> Option<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn respond(&self, request: &R) -> Option<String> {
        (self.respond)(request)
    }
}

// =============================================================================
// Milestone 3: Nodes, links and dispatch
// =============================================================================

/// A handler plus the link to its successor.
pub struct Node<R: ?Sized> {
    handler: Box<dyn Handler<R>>,
    next: Option<Box<Node<R>>>,
}

impl<R: ?Sized> Node<R> {
    pub fn new<H: Handler<R> + 'static>(handler: H) -> Self {
        Self::from_boxed(Box::new(handler))
    }

    pub fn from_boxed(handler: Box<dyn Handler<R>>) -> Self {
        Self {
            handler,
            next: None,
        }
    }

    pub fn name(&self) -> &str {
        self.handler.name()
    }

    /// Links `next` after this node, replacing any previous successor, and
    /// returns the newly linked node so links can be chained:
    ///
    /// ```
    /// use design_patterns::handler::{LabelHandler, Node};
    ///
    /// let mut head: Node<str> = Node::new(LabelHandler::exact("NodeA", "Handler1"));
    /// head.set_next(Node::new(LabelHandler::exact("NodeB", "Handler2")))
    ///     .set_next(Node::new(LabelHandler::exact("NodeC", "Handler3")));
    /// assert_eq!(head.names(), ["NodeA", "NodeB", "NodeC"]);
    /// ```
    pub fn set_next(&mut self, next: Node<R>) -> &mut Node<R> {
        self.next.insert(Box::new(next))
    }

    /// Detaches and returns the successor, making this node the tail.
    pub fn take_next(&mut self) -> Option<Node<R>> {
        self.next.take().map(|next| *next)
    }

    pub fn next(&self) -> Option<&Node<R>> {
        self.next.as_deref()
    }

    pub fn next_mut(&mut self) -> Option<&mut Node<R>> {
        self.next.as_deref_mut()
    }

    /// Links `node` after the current tail. Walks the whole chain, so
    /// prefer [`ChainBuilder`](crate::chain::ChainBuilder) for bulk linking.
    pub fn append(&mut self, node: Node<R>) {
        let mut cursor = self;
        loop {
            match cursor.next {
                Some(ref mut next) => cursor = &mut **next,
                None => {
                    cursor.next = Some(Box::new(node));
                    return;
                }
            }
        }
    }

    /// First node named `name`, starting from this one.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Node<R>> {
        let mut cursor = self;
        loop {
            if cursor.name() == name {
                return Some(cursor);
            }
            match cursor.next {
                Some(ref mut next) => cursor = &mut **next,
                None => return None,
            }
        }
    }

    pub fn iter(&self) -> Iter<'_, R> {
        Iter { next: Some(self) }
    }

    /// Number of nodes from this one to the tail.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(Node::name).collect()
    }

    /// Offers `request` to this node, then forwards it to each successor in
    /// turn until one accepts it. Runs in a loop, so stack use does not grow
    /// with chain length.
    pub fn handle(&self, request: &R) -> Outcome {
        self.walk(request, &mut |_: &str| {})
    }

    /// Like [`Node::handle`], also returning the names of the nodes that
    /// were consulted, in order.
    pub fn handle_traced(&self, request: &R) -> (Outcome, Vec<String>) {
        let mut visited = Vec::new();
        let outcome = self.walk(request, &mut |name: &str| visited.push(name.to_string()));
        (outcome, visited)
    }

    fn walk(&self, request: &R, visit: &mut dyn FnMut(&str)) -> Outcome {
        let mut node = self;
        loop {
            visit(node.name());
            trace!(handler = node.name(), "offering request");

            if let Some(message) = node.handler.respond(request) {
                debug!(handler = node.name(), "request accepted");
                return Outcome::Handled(Reply {
                    handler: node.name().to_string(),
                    message,
                });
            }

            match node.next.as_deref() {
                Some(next) => {
                    trace!(from = node.name(), to = next.name(), "forwarding request");
                    node = next;
                }
                None => {
                    debug!(tail = node.name(), "chain exhausted, request unhandled");
                    return Outcome::Unhandled;
                }
            }
        }
    }
}

// Unlinks the tail one node at a time so dropping a long chain does not
// recurse once per node.
impl<R: ?Sized> Drop for Node<R> {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

impl<R: ?Sized> fmt::Debug for Node<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("links", &self.names())
            .finish()
    }
}

/// Iterator over a node and its successors.
pub struct Iter<'a, R: ?Sized> {
    next: Option<&'a Node<R>>,
}

impl<'a, R: ?Sized> Iterator for Iter<'a, R> {
    type Item = &'a Node<R>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Label handler that records every invocation in a shared log.
    struct Recording {
        inner: LabelHandler,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Handler<str> for Recording {
        fn name(&self) -> &str {
            self.inner.name()
        }

        fn respond(&self, request: &str) -> Option<String> {
            self.log.lock().unwrap().push(self.name().to_string());
            self.inner.respond(request)
        }
    }

    fn recording(name: &str, label: &str, log: &Arc<Mutex<Vec<String>>>) -> Node<str> {
        Node::new(Recording {
            inner: LabelHandler::exact(name, label),
            log: Arc::clone(log),
        })
    }

    fn two_node_chain(log: &Arc<Mutex<Vec<String>>>) -> Node<str> {
        let mut head = recording("NodeA", "Handler1", log);
        head.set_next(recording("NodeB", "Handler2", log));
        head
    }

    #[test]
    fn test_first_node_handles_and_successor_is_never_invoked() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = two_node_chain(&log);

        let outcome = chain.handle("Handler1");
        assert_eq!(outcome.reply().unwrap().message, "NodeA handled Handler1");
        assert_eq!(outcome.handler(), Some("NodeA"));
        assert_eq!(*log.lock().unwrap(), vec!["NodeA"]);
    }

    #[test]
    fn test_unmatched_request_is_delegated() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = two_node_chain(&log);

        let outcome = chain.handle("Handler2");
        assert_eq!(outcome.reply().unwrap().to_string(), "NodeB handled Handler2");
        assert_eq!(*log.lock().unwrap(), vec!["NodeA", "NodeB"]);
    }

    #[test]
    fn test_exhausted_chain_is_unhandled() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = two_node_chain(&log);

        assert_eq!(chain.handle("Handler3"), Outcome::Unhandled);
        assert_eq!(*log.lock().unwrap(), vec!["NodeA", "NodeB"]);
    }

    #[test]
    fn test_single_node_without_successor_short_circuits() {
        let node: Node<str> = Node::new(LabelHandler::exact("NodeA", "Handler1"));
        let (outcome, visited) = node.handle_traced("Handler2");
        assert!(!outcome.is_handled());
        assert_eq!(visited, vec!["NodeA"]);
    }

    #[test]
    fn test_empty_reply_is_distinct_from_unhandled() {
        let node: Node<str> = Node::new(FnHandler::new("Silent", |_: &str| Some(String::new())));
        let outcome = node.handle("anything");
        assert_ne!(outcome, Outcome::Unhandled);
        assert_eq!(outcome.into_reply().unwrap().message, "");
    }

    #[test]
    fn test_set_next_overwrites_previous_link() {
        let mut head: Node<str> = Node::new(LabelHandler::exact("NodeA", "Handler1"));
        head.set_next(Node::new(LabelHandler::exact("NodeB", "Handler2")));
        head.set_next(Node::new(LabelHandler::exact("NodeC", "Handler3")));

        assert_eq!(head.names(), vec!["NodeA", "NodeC"]);
        assert_eq!(head.handle("Handler2"), Outcome::Unhandled);
        assert_eq!(head.handle("Handler3").handler(), Some("NodeC"));
    }

    #[test]
    fn test_set_next_returns_successor_for_fluent_linking() {
        let mut head: Node<str> = Node::new(LabelHandler::exact("A", "a"));
        head.set_next(Node::new(LabelHandler::exact("B", "b")))
            .set_next(Node::new(LabelHandler::exact("C", "c")));

        assert_eq!(head.len(), 3);
        assert_eq!(head.handle("c").handler(), Some("C"));
    }

    #[test]
    fn test_take_next_truncates() {
        let mut head: Node<str> = Node::new(LabelHandler::exact("A", "a"));
        head.set_next(Node::new(LabelHandler::exact("B", "b")));

        let detached = head.take_next().unwrap();
        assert_eq!(detached.name(), "B");
        assert!(head.next().is_none());
        assert_eq!(head.handle("b"), Outcome::Unhandled);
        assert!(head.take_next().is_none());
    }

    #[test]
    fn test_append_and_find_mut_relink() {
        let mut head: Node<str> = Node::new(LabelHandler::exact("A", "a"));
        head.append(Node::new(LabelHandler::exact("B", "b")));
        head.append(Node::new(LabelHandler::exact("C", "c")));
        assert_eq!(head.names(), vec!["A", "B", "C"]);

        let b = head.find_mut("B").unwrap();
        b.set_next(Node::new(LabelHandler::exact("D", "d")));
        assert_eq!(head.names(), vec!["A", "B", "D"]);
        assert!(head.find_mut("C").is_none());
    }

    #[test]
    fn test_relinking_does_not_touch_earlier_results() {
        let mut head: Node<str> = Node::new(LabelHandler::exact("A", "a"));
        head.set_next(Node::new(LabelHandler::exact("B", "x")));
        let before = head.handle("x");

        head.set_next(Node::new(LabelHandler::exact("C", "x")));
        let after = head.handle("x");

        assert_eq!(before.handler(), Some("B"));
        assert_eq!(after.handler(), Some("C"));
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let mut head: Node<str> = Node::new(LabelHandler::new("Tickets", Matcher::prefix("TICKET-")));
        head.set_next(Node::new(LabelHandler::new("Everything", Matcher::Any)));

        let (outcome, visited) = head.handle_traced("TICKET-42");
        assert_eq!(outcome.handler(), Some("Tickets"));
        assert_eq!(visited, vec!["Tickets"]);
        assert_eq!(head.handle("other").handler(), Some("Everything"));
    }

    #[test]
    fn test_fn_handler_over_numbers() {
        let mut head: Node<u32> = Node::new(FnHandler::new("Small", |n: &u32| {
            (*n < 10).then(|| format!("small {n}"))
        }));
        head.set_next(Node::new(FnHandler::new("Even", |n: &u32| {
            (n % 2 == 0).then(|| format!("even {n}"))
        })));

        assert_eq!(head.handle(&3).into_reply().unwrap().message, "small 3");
        assert_eq!(head.handle(&12).handler(), Some("Even"));
        assert_eq!(head.handle(&13), Outcome::Unhandled);
    }

    #[test]
    fn test_matchers() {
        assert!(Matcher::exact("Handler1").matches("Handler1"));
        assert!(!Matcher::exact("Handler1").matches("Handler10"));
        assert!(Matcher::prefix("Hand").matches("Handler1"));
        assert!(Matcher::pattern(r"^Handler\d$").unwrap().matches("Handler7"));
        assert!(!Matcher::pattern(r"^Handler\d$").unwrap().matches("Handler77"));
        assert!(Matcher::pattern("(").is_err());
        assert!(Matcher::Any.matches(""));
        assert_eq!(Matcher::exact("x").to_string(), "exact 'x'");
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let node: Node<str> = Node::new(LabelHandler::exact("NodeA", "Handler1"));
        let handled = serde_json::to_value(node.handle("Handler1")).unwrap();
        assert_eq!(handled["status"], "handled");
        assert_eq!(handled["handler"], "NodeA");

        let unhandled = serde_json::to_value(node.handle("nope")).unwrap();
        assert_eq!(unhandled["status"], "unhandled");
    }

    #[test]
    fn test_deep_node_links_use_constant_stack() {
        const LEN: usize = 100_000;
        let mut head: Node<str> = Node::new(LabelHandler::exact("N0", "L0"));
        let mut tail = &mut head;
        for index in 1..LEN {
            tail = tail.set_next(Node::new(LabelHandler::exact(
                format!("N{index}"),
                format!("L{index}"),
            )));
        }

        let (outcome, visited) = head.handle_traced("missing");
        assert_eq!(outcome, Outcome::Unhandled);
        assert_eq!(visited.len(), LEN);

        head.append(Node::new(LabelHandler::new("Last", Matcher::Any)));
        assert_eq!(head.handle("missing").handler(), Some("Last"));
        assert_eq!(head.find_mut("Last").unwrap().name(), "Last");

        // Replacing the successor drops the old tail in one go.
        head.set_next(Node::new(LabelHandler::exact("Short", "s")));
        assert_eq!(head.len(), 2);
    }

    #[test]
    fn test_debug_lists_links() {
        let mut head: Node<str> = Node::new(LabelHandler::exact("A", "a"));
        head.set_next(Node::new(LabelHandler::exact("B", "b")));
        let rendered = format!("{head:?}");
        assert!(rendered.contains("\"A\""));
        assert!(rendered.contains("\"B\""));
    }
}
