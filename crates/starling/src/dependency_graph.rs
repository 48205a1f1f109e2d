//
// dependency_graph.rs
//
// Keyed dependency graph with change notification
//

use std::collections::{HashMap, HashSet};

/// Callback invoked when a subscribed key's dependency set changes.
/// Receives the subscription key (not the key that mutated).
pub type ChangeHandler = Box<dyn Fn(&str)>;

struct Subscriber {
    id: u64,
    handler: ChangeHandler,
}

/// Token returned by [`DependencyGraph::on_change`]. Hand it back to
/// [`DependencyGraph::unsubscribe`] to release the handler; dropping the
/// token alone does not unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    key: String,
    id: u64,
}

/// Directed graph over opaque string keys (file pkg paths, `component:`
/// identifiers, scope keys).
///
/// Edge lists preserve insertion order, which makes transitive-closure
/// queries deterministic. A structural mutation on a node notifies the
/// subscribers of every key that can reach it.
#[derive(Default)]
pub struct DependencyGraph {
    /// Forward lookup: key -> direct dependencies, in insertion order.
    forward: HashMap<String, Vec<String>>,
    /// Reverse lookup: key -> keys that depend on it directly.
    reverse: HashMap<String, Vec<String>>,
    subscribers: HashMap<String, Vec<Subscriber>>,
    next_subscription_id: u64,
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("nodes", &self.forward.len())
            .finish_non_exhaustive()
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dependency edge. Adding an edge that already exists is a no-op
    /// and notifies nobody.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let deps = self.forward.entry(from.to_string()).or_default();
        if deps.iter().any(|d| d == to) {
            return;
        }
        deps.push(to.to_string());
        self.reverse
            .entry(to.to_string())
            .or_default()
            .push(from.to_string());
        log::trace!("dependency added: {} -> {}", from, to);
        self.notify(from);
    }

    /// Remove a dependency edge. Removing an edge that does not exist is a
    /// no-op and notifies nobody.
    pub fn remove_edge(&mut self, from: &str, to: &str) {
        let removed = match self.forward.get_mut(from) {
            Some(deps) => {
                let before = deps.len();
                deps.retain(|d| d != to);
                before != deps.len()
            }
            None => false,
        };
        if !removed {
            return;
        }
        if let Some(parents) = self.reverse.get_mut(to) {
            parents.retain(|p| p != from);
        }
        log::trace!("dependency removed: {} -> {}", from, to);
        self.notify(from);
    }

    /// Direct dependencies of `key`, in insertion order.
    pub fn get_dependencies(&self, key: &str) -> Vec<String> {
        self.forward.get(key).cloned().unwrap_or_default()
    }

    /// Transitive dependencies of `key`: deduplicated, preorder over edge
    /// insertion order, excluding `key` itself. Cycle-safe.
    pub fn get_all_dependencies(&self, key: &str) -> Vec<String> {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(key);
        let mut result = Vec::new();
        let mut stack: Vec<&str> = Vec::new();
        if let Some(deps) = self.forward.get(key) {
            stack.extend(deps.iter().rev().map(String::as_str));
        }
        while let Some(dep) = stack.pop() {
            if !visited.insert(dep) {
                continue;
            }
            result.push(dep.to_string());
            if let Some(children) = self.forward.get(dep) {
                stack.extend(children.iter().rev().map(String::as_str));
            }
        }
        result
    }

    /// Subscribe to changes affecting `key`. A change is any structural
    /// mutation on `key` itself or on a node reachable from it. With
    /// `emit_immediately`, the handler fires once synchronously before this
    /// returns, carrying the subscription key. Handlers must be idempotent;
    /// ordering between handlers on the same key is unspecified.
    pub fn on_change(
        &mut self,
        key: &str,
        handler: impl Fn(&str) + 'static,
        emit_immediately: bool,
    ) -> Subscription {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        if emit_immediately {
            handler(key);
        }
        self.subscribers
            .entry(key.to_string())
            .or_default()
            .push(Subscriber {
                id,
                handler: Box::new(handler),
            });
        Subscription {
            key: key.to_string(),
            id,
        }
    }

    /// Release a subscription acquired with [`on_change`](Self::on_change).
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        if let Some(subs) = self.subscribers.get_mut(&subscription.key) {
            subs.retain(|s| s.id != subscription.id);
            if subs.is_empty() {
                self.subscribers.remove(&subscription.key);
            }
        }
    }

    /// Fire the handlers of every key that can reach `changed` (including
    /// `changed` itself).
    fn notify(&self, changed: &str) {
        let mut affected: Vec<&str> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: Vec<&str> = vec![changed];
        while let Some(key) = queue.pop() {
            if !visited.insert(key) {
                continue;
            }
            affected.push(key);
            if let Some(parents) = self.reverse.get(key) {
                queue.extend(parents.iter().map(String::as_str));
            }
        }
        for key in affected {
            if let Some(subs) = self.subscribers.get(key) {
                for sub in subs {
                    (sub.handler)(key);
                }
            }
        }
    }
}
