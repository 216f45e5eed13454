//! Pattern trie router.
//!
//! Screens are registered declaratively against `*`-delimited patterns in
//! which a braced segment captures a parameter instead of matching a
//! literal:
//!
//! ```text
//! mux.handle("*1*{id}*1#", confirm_screen);
//! ```
//!
//! Dispatch requires the token stream to be exhausted exactly at a node with
//! a registered handler; a prefix match is not a match. Registration happens
//! single-threaded at startup (`handle` takes `&mut self`), traversal is
//! read-only (`process` takes `&self`), so the built mux is shared across
//! concurrent requests without locks.

use async_trait::async_trait;

use crate::ussd::command::Command;
use crate::ussd::error::UssdError;
use crate::ussd::params::{Params, Value};
use crate::ussd::DialogResult;

/// A dispatchable screen. Screens read captured parameters and may call
/// collaborators; they never mutate the bag.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, cmd: &Command, params: &Params) -> Result<DialogResult, UssdError>;
}

struct Node {
    key: String,
    is_param: bool,
    children: Vec<Node>,
    handler: Option<Box<dyn Handler>>,
}

impl Node {
    fn new(key: String, is_param: bool) -> Node {
        Node {
            key,
            is_param,
            children: Vec::new(),
            handler: None,
        }
    }

    fn insert(&mut self, segments: &[String], handler: Box<dyn Handler>) {
        let Some((head, rest)) = segments.split_first() else {
            if self.handler.is_some() {
                panic!("mux: duplicate pattern registration at '{}'", self.key);
            }
            self.handler = Some(handler);
            return;
        };

        let (key, is_param) = match head.strip_prefix('{').and_then(|h| h.strip_suffix('}')) {
            Some(name) => (name.to_string(), true),
            None => (head.clone(), false),
        };

        let position = self
            .children
            .iter()
            .position(|c| c.is_param == is_param && (is_param || c.key == key))
            .unwrap_or_else(|| {
                self.children.push(Node::new(key, is_param));
                self.children.len() - 1
            });
        self.children[position].insert(rest, handler);
    }

    /// Walks the trie segment-by-segment, capturing parameter values.
    /// Literal children win over a parameter child at the same level.
    fn traverse(&self, cmd: &Command, index: usize, params: &mut Params) -> Option<&Node> {
        let Some(token) = cmd.get(index) else {
            return Some(self);
        };

        let child = self
            .children
            .iter()
            .find(|c| !c.is_param && c.key == token.value)
            .or_else(|| self.children.iter().find(|c| c.is_param))?;

        if child.is_param {
            params.add(child.key.clone(), Value::Str(token.value.clone()));
        }
        child.traverse(cmd, index + 1, params)
    }

    fn tail(&self) -> bool {
        self.children.is_empty()
    }
}

pub struct Mux {
    root: Node,
    not_found: Option<Box<dyn Handler>>,
}

impl Default for Mux {
    fn default() -> Self {
        Mux::new()
    }
}

impl Mux {
    pub fn new() -> Mux {
        Mux {
            root: Node::new(String::new(), false),
            not_found: None,
        }
    }

    /// Fallback for dial paths with no registered screen. Without one, a
    /// miss surfaces as a typed [`UssdError::ActionNotFound`].
    pub fn not_found(&mut self, handler: impl Handler + 'static) {
        self.not_found = Some(Box::new(handler));
    }

    /// Registers `handler` under `pattern`. Malformed patterns panic: this
    /// runs once at boot, before any traffic.
    pub fn handle(&mut self, pattern: &str, handler: impl Handler + 'static) {
        if !pattern.starts_with('*') {
            panic!("mux: pattern '{pattern}' must start with '*'");
        }
        let segments: Vec<String> = pattern
            .trim_end_matches('#')
            .split('*')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self.root.insert(&segments, Box::new(handler));
    }

    /// Dispatches `cmd` to the screen whose pattern matches its full token
    /// stream, filling `params` with captured values and the leaf flag.
    pub async fn process(
        &self,
        cmd: &Command,
        params: &mut Params,
    ) -> Result<DialogResult, UssdError> {
        if let Some(node) = self.root.traverse(cmd, 0, params) {
            if let Some(handler) = &node.handler {
                params.set_leaf(node.tail());
                return handler.handle(cmd, params).await;
            }
        }

        params.set_leaf(true);
        match &self.not_found {
            Some(handler) => handler.handle(cmd, params).await,
            None => Err(UssdError::ActionNotFound(cmd.join())),
        }
    }
}
