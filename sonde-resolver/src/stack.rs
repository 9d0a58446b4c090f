//! Explicit stack of pending questions driving the iterative resolution.
//!
//! Resolving the address of a nameserver happens by pushing new frames on
//! top of the question that needs it, instead of recursing.

use crossbeam_channel::{Receiver, Sender};
use sonde_proto::packet::QueryType;
use std::ops::{Deref, DerefMut};

/// One question at one delegation level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryState {
    pub name: String,
    pub qtype: QueryType,
    /// Zone the candidates are authoritative for, empty for the root.
    pub zone: String,
    pub nameservers: Vec<String>,
    pub cursor: usize,
    /// Address lookups were already pushed for the candidate at the cursor.
    pub nested: bool,
}

impl QueryState {
    pub fn new(name: &str, qtype: QueryType, nameservers: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            qtype,
            zone: String::new(),
            nameservers,
            cursor: 0,
            nested: false,
        }
    }

    pub fn candidate(&self) -> Option<&str> {
        self.nameservers.get(self.cursor).map(String::as_str)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.nameservers.len()
    }

    /// Moves one delegation level down, starting over with the first of the
    /// referred nameservers.
    pub fn descend(&mut self, zone: String, nameservers: Vec<String>) {
        self.zone = zone;
        self.nameservers = nameservers;
        self.cursor = 0;
        self.nested = false;
    }

    /// Gives up on the current candidate for the next one at the same level.
    pub fn advance(&mut self) {
        self.cursor += 1;
        self.nested = false;
    }
}

#[derive(Debug, Default)]
pub struct Stack {
    frames: Vec<QueryState>,
}

impl Stack {
    pub fn push(&mut self, state: QueryState) {
        self.frames.push(state);
    }

    /// Suspends the top question until the addresses of `host` are known, by
    /// pushing one address lookup per type, each starting from `roots`.
    pub fn nest(&mut self, host: &str, qtypes: &[QueryType], roots: &[String]) {
        if let Some(top) = self.frames.last_mut() {
            top.nested = true;
        }
        // The first type ends up on top and is resolved first.
        for qtype in qtypes.iter().rev() {
            self.frames
                .push(QueryState::new(host, *qtype, roots.to_vec()));
        }
    }

    pub fn pop(&mut self) -> Option<QueryState> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&QueryState> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut QueryState> {
        self.frames.last_mut()
    }

    /// Whether a question for `name` is anywhere on the stack.
    pub fn is_pending(&self, name: &str) -> bool {
        self.frames.iter().any(|frame| frame.name == name)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn reset(&mut self) {
        self.frames.clear();
    }
}

/// Bounded pool of reusable stacks. When empty, a fresh stack is allocated;
/// when full, returned stacks are dropped.
#[derive(Debug)]
pub struct StackPool {
    sender: Sender<Stack>,
    receiver: Receiver<Stack>,
}

impl StackPool {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        Self { sender, receiver }
    }

    pub fn acquire(&self) -> PooledStack<'_> {
        let mut stack = self.receiver.try_recv().unwrap_or_default();
        stack.reset();
        PooledStack { pool: self, stack }
    }

    #[cfg(test)]
    fn idle(&self) -> usize {
        self.receiver.len()
    }
}

/// A stack borrowed from the pool, emptied and handed back on drop.
#[derive(Debug)]
pub struct PooledStack<'a> {
    pool: &'a StackPool,
    stack: Stack,
}

impl<'a> Deref for PooledStack<'a> {
    type Target = Stack;

    fn deref(&self) -> &Self::Target {
        &self.stack
    }
}

impl<'a> DerefMut for PooledStack<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.stack
    }
}

impl<'a> Drop for PooledStack<'a> {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.stack);
        stack.reset();
        let _ = self.pool.sender.try_send(stack);
    }
}

#[cfg(test)]
mod tests {
    use super::{QueryState, Stack, StackPool};
    use sonde_proto::packet::QueryType;

    fn roots() -> Vec<String> {
        vec!["a.root.test".to_string(), "b.root.test".to_string()]
    }

    #[test]
    fn should_descend_in_place() {
        let mut stack = Stack::default();
        stack.push(QueryState::new("www.example.com", QueryType::A, roots()));
        stack.top_mut().unwrap().advance();

        stack
            .top_mut()
            .unwrap()
            .descend("com".into(), vec!["a.gtld.test".into()]);

        assert_eq!(stack.len(), 1);
        let top = stack.top().unwrap();
        assert_eq!(top.zone, "com");
        assert_eq!(top.cursor, 0);
        assert_eq!(top.candidate(), Some("a.gtld.test"));
    }

    #[test]
    fn should_nest_address_lookups() {
        let mut stack = Stack::default();
        stack.push(QueryState::new("www.example.com", QueryType::A, roots()));
        stack.nest("ns1.example.com", &[QueryType::A, QueryType::AAAA], &roots());

        assert_eq!(stack.len(), 3);
        assert!(stack.is_pending("ns1.example.com"));
        let top = stack.pop().unwrap();
        assert_eq!(top.name, "ns1.example.com");
        assert_eq!(top.qtype, QueryType::A);
        assert_eq!(top.nameservers, roots());
        assert_eq!(stack.pop().unwrap().qtype, QueryType::AAAA);

        let parent = stack.pop().unwrap();
        assert!(parent.nested);
        assert_eq!(parent.cursor, 0);
    }

    #[test]
    fn should_exhaust_candidates() {
        let mut state = QueryState::new("example.com", QueryType::A, roots());
        state.advance();
        assert!(!state.is_exhausted());
        state.advance();
        assert!(state.is_exhausted());
        assert_eq!(state.candidate(), None);
    }

    #[test]
    fn should_hand_out_empty_stacks() {
        let pool = StackPool::new(2);
        {
            let mut stack = pool.acquire();
            stack.push(QueryState::new("leak.test", QueryType::A, roots()));
        }
        assert_eq!(pool.idle(), 1);

        let stack = pool.acquire();
        assert!(stack.is_empty());
        assert!(!stack.is_pending("leak.test"));
    }

    #[test]
    fn should_drop_stacks_beyond_capacity() {
        let pool = StackPool::new(1);
        let first = pool.acquire();
        let second = pool.acquire();
        drop(first);
        drop(second);
        assert_eq!(pool.idle(), 1);
    }
}
