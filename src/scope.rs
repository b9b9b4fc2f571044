//! Lexical scope tracking for the emission walk.
//!
//! Scopes form an explicit frame stack: a frame is pushed on entering a
//! block or component invocation's body and popped on leaving it. Name
//! resolution walks frames innermost-first, then the caller-declared
//! `identifiers_in_scope` set, and finally falls back to an explicit
//! external-reference variant carrying the literal name. The fallback models
//! the permissive legacy rule that any unbound name may still refer to
//! something registered at runtime; it is a value, never an error.

use rustc_hash::FxHashSet;

/// How a name came to be bound in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Introduced by a block invocation's `as |...|` clause.
    BlockParam,
    /// The implicit receiver, `this`.
    ImplicitReceiver,
    /// A named argument of the receiver, `@name`.
    Argument,
}

/// The result of resolving a path head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Bound in an active frame.
    Bound(BindingKind),
    /// Not in any frame, but declared resolvable by the caller.
    Declared(&'a str),
    /// Unbound; resolves through the dynamically-keyed global lookup.
    External(&'a str),
}

/// One lexical frame: an ordered name → binding-kind mapping.
type Frame = Vec<(String, BindingKind)>;

/// The live frame stack threaded through a single emission walk.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    /// Creates a stack whose root frame binds the implicit receiver.
    pub fn new() -> Self {
        Self {
            frames: vec![vec![("this".to_string(), BindingKind::ImplicitReceiver)]],
        }
    }

    /// Pushes a frame of block-param bindings.
    pub fn enter<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frames.push(
            names
                .into_iter()
                .map(|n| (n.into(), BindingKind::BlockParam))
                .collect(),
        );
    }

    /// Pops the innermost frame. The root frame is never popped.
    pub fn leave(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Resolves `name` against the frames, then `declared`, then the
    /// external fallback.
    pub fn resolve<'a>(&self, name: &'a str, declared: &FxHashSet<String>) -> Resolution<'a> {
        for frame in self.frames.iter().rev() {
            if let Some((_, kind)) = frame.iter().find(|(n, _)| n == name) {
                return Resolution::Bound(*kind);
            }
        }
        if declared.contains(name) {
            return Resolution::Declared(name);
        }
        Resolution::External(name)
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn innermost_frame_wins() {
        let mut scope = ScopeStack::new();
        scope.enter(["x"]);
        scope.enter(["x", "y"]);
        assert_eq!(
            scope.resolve("x", &declared(&[])),
            Resolution::Bound(BindingKind::BlockParam)
        );
        scope.leave();
        scope.leave();
        assert_eq!(scope.resolve("x", &declared(&[])), Resolution::External("x"));
    }

    #[test]
    fn declared_names_resolve_without_fallback() {
        let scope = ScopeStack::new();
        assert_eq!(
            scope.resolve("message", &declared(&["message"])),
            Resolution::Declared("message")
        );
    }

    #[test]
    fn frames_shadow_declared_names() {
        let mut scope = ScopeStack::new();
        scope.enter(["message"]);
        assert_eq!(
            scope.resolve("message", &declared(&["message"])),
            Resolution::Bound(BindingKind::BlockParam)
        );
    }

    #[test]
    fn unbound_names_fall_back_externally() {
        let scope = ScopeStack::new();
        assert_eq!(
            scope.resolve("whatever", &declared(&["other"])),
            Resolution::External("whatever")
        );
    }

    #[test]
    fn receiver_is_bound_in_the_root_frame() {
        let scope = ScopeStack::new();
        assert_eq!(
            scope.resolve("this", &declared(&[])),
            Resolution::Bound(BindingKind::ImplicitReceiver)
        );
    }

    #[test]
    fn leave_never_pops_the_root_frame() {
        let mut scope = ScopeStack::new();
        scope.leave();
        assert_eq!(
            scope.resolve("this", &declared(&[])),
            Resolution::Bound(BindingKind::ImplicitReceiver)
        );
    }
}
