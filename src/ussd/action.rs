//! Action tree: a hand-built menu of depth-aware nodes.
//!
//! Each node consumes the token at its own depth to pick a child; a node
//! reached with no tokens left past its depth renders its own screen.
//! Because the gateway resends the whole path every round-trip, reaching the
//! same screen after N rounds re-walks N hops every request — deliberate
//! replay, not redundant work.
//!
//! The tree is built once at startup (`child` takes `&mut self`) and is
//! traversed read-only afterwards, so it can be shared across requests
//! without locks.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::ussd::command::Command;
use crate::ussd::error::UssdError;
use crate::ussd::token::TokenKind;
use crate::ussd::DialogResult;

type Render = Box<dyn Fn(&Command) -> String + Send + Sync>;

pub struct ActionNode {
    depth: usize,
    children: HashMap<u32, ActionNode>,
    render: Render,
}

impl ActionNode {
    /// Root node at depth zero.
    pub fn root(render: impl Fn(&Command) -> String + Send + Sync + 'static) -> ActionNode {
        ActionNode {
            depth: 0,
            children: HashMap::new(),
            render: Box::new(render),
        }
    }

    /// The stream position this node consumes when choosing its next child.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Registers a child under `key` at `self.depth() + 1` and returns it
    /// for further nesting. Build-time only; never called during traversal.
    /// Registering the same key twice panics, like a duplicate mux pattern.
    pub fn child(
        &mut self,
        key: u32,
        render: impl Fn(&Command) -> String + Send + Sync + 'static,
    ) -> &mut ActionNode {
        let node = ActionNode {
            depth: self.depth + 1,
            children: HashMap::new(),
            render: Box::new(render),
        };
        match self.children.entry(key) {
            Entry::Occupied(_) => {
                panic!("action: duplicate child registered under key {key}")
            }
            Entry::Vacant(slot) => slot.insert(node),
        }
    }

    /// True iff no children are registered: a genuine dead-end.
    pub fn tail(&self) -> bool {
        self.children.is_empty()
    }

    /// Descends while tokens remain past this node's depth, otherwise
    /// renders this node's own screen. Terminality of the result comes from
    /// `tail()`, never from stored state.
    pub fn run(&self, cmd: &Command) -> Result<DialogResult, UssdError> {
        if cmd.len() > self.depth {
            return self.next(cmd)?.run(cmd);
        }
        Ok(DialogResult {
            text: (self.render)(cmd),
            leaf: self.tail(),
        })
    }

    /// Resolves the child selected by the instruction token at this node's
    /// depth.
    fn next(&self, cmd: &Command) -> Result<&ActionNode, UssdError> {
        let token = cmd
            .get(self.depth)
            .ok_or_else(|| UssdError::ActionNotFound(String::new()))?;

        match token.kind {
            TokenKind::Instruction => {
                let key: u32 = token
                    .value
                    .parse()
                    .map_err(|_| UssdError::BadInstruction(token.value.clone()))?;
                self.children
                    .get(&key)
                    .ok_or_else(|| UssdError::ActionNotFound(token.value.clone()))
            }
            TokenKind::Variable => Err(UssdError::WrongTokenKind(token.value.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> ActionNode {
        let mut root = ActionNode::root(|_| "main menu\n1. codes\n2. pay\n".to_string());
        root.child(1, |_| "enter your phone number".to_string());
        let pay = root.child(2, |_| "enter your property code".to_string());
        pay.child(1, |_| "payment confirmed".to_string());
        root
    }

    fn command(dial: &str) -> Command {
        let mut cmd = Command::parse(dial, "250788123456");
        cmd.skip_front(2); // service-code prefix
        cmd
    }

    #[test]
    fn children_sit_one_level_below_their_parent() {
        let mut root = ActionNode::root(|_| String::new());
        let sub = root.child(1, |_| String::new());
        assert_eq!(sub.depth(), 1);
        assert_eq!(sub.child(4, |_| String::new()).depth(), 2);
    }

    #[test]
    fn exhausted_command_renders_the_current_node() {
        let root = sample_tree();
        let res = root.run(&command("*662*102#")).unwrap();
        assert_eq!(res.text, "main menu\n1. codes\n2. pay\n");
        assert!(!res.leaf);
    }

    #[test]
    fn descends_through_registered_children() {
        let root = sample_tree();
        let res = root.run(&command("*662*102*2#")).unwrap();
        assert_eq!(res.text, "enter your property code");
        assert!(!res.leaf);

        let res = root.run(&command("*662*102*2*1#")).unwrap();
        assert_eq!(res.text, "payment confirmed");
        assert!(res.leaf);
    }

    #[test]
    fn unregistered_key_is_a_typed_error() {
        let root = sample_tree();
        let err = root.run(&command("*662*102*9#")).unwrap_err();
        assert!(matches!(err, UssdError::ActionNotFound(key) if key == "9"));
    }

    #[test]
    fn variable_where_instruction_expected_is_a_typed_error() {
        let root = sample_tree();
        let err = root.run(&command("*662*102*longvalue#")).unwrap_err();
        assert!(matches!(err, UssdError::WrongTokenKind(v) if v == "longvalue"));
    }

    #[test]
    #[should_panic(expected = "duplicate child registered under key 1")]
    fn duplicate_child_key_panics_at_registration() {
        let mut root = ActionNode::root(|_| String::new());
        root.child(1, |_| "first".to_string());
        root.child(1, |_| "second".to_string());
    }

    #[test]
    fn tail_means_zero_children() {
        let mut root = ActionNode::root(|_| String::new());
        assert!(root.tail());
        root.child(1, |_| String::new());
        assert!(!root.tail());
    }

    #[test]
    fn replaying_the_same_path_is_deterministic() {
        let root = sample_tree();
        let first = root.run(&command("*662*102*2*1#")).unwrap();
        let second = root.run(&command("*662*102*2*1#")).unwrap();
        assert_eq!(first.text, second.text);
    }
}
