//! Priority-ordered back-input routing for overlay screens.
//!
//! The router answers one question: if a single cancel/back input arrives
//! right now, which registered overlay should close? It knows nothing about
//! game modes; callers register activity predicates and close actions over a
//! context type of their choosing. Activity is re-evaluated on every call so
//! the router never goes stale relative to state changed elsewhere.

use thiserror::Error;

/// Errors from screen registration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouterError {
    #[error("screen id is empty")]
    EmptyScreenId,
}

struct ScreenEntry<C> {
    screen_id: String,
    priority: i32,
    sequence: u64,
    is_active: Box<dyn Fn(&C) -> bool>,
    close: Box<dyn FnMut(&mut C)>,
}

/// Registry of closeable overlays, resolved by priority.
///
/// Ties in priority go to the highest registration sequence, so a screen
/// re-registered after another wins the tie.
pub struct ScreenRouter<C> {
    entries: Vec<ScreenEntry<C>>,
    next_sequence: u64,
}

impl<C> ScreenRouter<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Register a closeable screen, replacing any entry with the same id.
    ///
    /// Replacement is remove-then-append and assigns a fresh sequence number.
    pub fn register(
        &mut self,
        screen_id: &str,
        priority: i32,
        is_active: impl Fn(&C) -> bool + 'static,
        close: impl FnMut(&mut C) + 'static,
    ) -> Result<(), RouterError> {
        if screen_id.trim().is_empty() {
            return Err(RouterError::EmptyScreenId);
        }

        self.entries.retain(|entry| entry.screen_id != screen_id);

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(ScreenEntry {
            screen_id: screen_id.to_string(),
            priority,
            sequence,
            is_active: Box::new(is_active),
            close: Box::new(close),
        });
        Ok(())
    }

    /// Close the topmost active screen, if any.
    ///
    /// Closes at most one screen per call; callers invoke this once per
    /// discrete back input.
    pub fn try_handle_back(&mut self, ctx: &mut C) -> bool {
        let Some(index) = self.resolve_topmost(ctx) else {
            return false;
        };

        (self.entries[index].close)(ctx);
        true
    }

    /// Id of the screen a back input would close right now, without closing it.
    pub fn peek_top_screen_id(&self, ctx: &C) -> Option<&str> {
        self.resolve_topmost(ctx)
            .map(|index| self.entries[index].screen_id.as_str())
    }

    /// Drop all registrations.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resolve_topmost(&self, ctx: &C) -> Option<usize> {
        let mut best: Option<usize> = None;

        for (index, entry) in self.entries.iter().enumerate() {
            if !(entry.is_active)(ctx) {
                continue;
            }

            best = match best {
                None => Some(index),
                Some(current) => {
                    let current_entry = &self.entries[current];
                    if entry.priority > current_entry.priority
                        || (entry.priority == current_entry.priority
                            && entry.sequence > current_entry.sequence)
                    {
                        Some(index)
                    } else {
                        Some(current)
                    }
                }
            };
        }

        best
    }
}

impl<C> Default for ScreenRouter<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Ctx {
        a_open: bool,
        b_open: bool,
        closed: Vec<&'static str>,
    }

    #[test]
    fn register_rejects_blank_id() {
        let mut router: ScreenRouter<Ctx> = ScreenRouter::new();
        assert_eq!(
            router.register("", 100, |_| true, |_| {}),
            Err(RouterError::EmptyScreenId)
        );
        assert_eq!(
            router.register("  ", 100, |_| true, |_| {}),
            Err(RouterError::EmptyScreenId)
        );
        assert!(router.is_empty());
    }

    #[test]
    fn no_active_screen_is_a_no_op() {
        let mut router: ScreenRouter<Ctx> = ScreenRouter::new();
        router.register("a", 100, |c: &Ctx| c.a_open, |_| {}).unwrap();

        let mut ctx = Ctx::default();
        assert!(!router.try_handle_back(&mut ctx));
        assert_eq!(router.peek_top_screen_id(&ctx), None);
    }

    #[test]
    fn highest_priority_wins() {
        let mut router: ScreenRouter<Ctx> = ScreenRouter::new();
        router
            .register("a", 100, |c: &Ctx| c.a_open, |c: &mut Ctx| {
                c.a_open = false;
                c.closed.push("a");
            })
            .unwrap();
        router
            .register("b", 200, |c: &Ctx| c.b_open, |c: &mut Ctx| {
                c.b_open = false;
                c.closed.push("b");
            })
            .unwrap();

        let mut ctx = Ctx {
            a_open: true,
            b_open: true,
            ..Ctx::default()
        };

        assert_eq!(router.peek_top_screen_id(&ctx), Some("b"));
        assert!(router.try_handle_back(&mut ctx));
        assert_eq!(ctx.closed, vec!["b"]);

        // B's predicate is now false, so the next back closes A.
        assert!(router.try_handle_back(&mut ctx));
        assert_eq!(ctx.closed, vec!["b", "a"]);

        assert!(!router.try_handle_back(&mut ctx));
    }

    #[test]
    fn priority_tie_goes_to_latest_registration() {
        let mut router: ScreenRouter<Ctx> = ScreenRouter::new();
        router
            .register("a", 100, |_| true, |c: &mut Ctx| c.closed.push("a"))
            .unwrap();
        router
            .register("b", 100, |_| true, |c: &mut Ctx| c.closed.push("b"))
            .unwrap();

        let mut ctx = Ctx::default();
        assert_eq!(router.peek_top_screen_id(&ctx), Some("b"));

        // Re-registering A moves it on top of the tie.
        router
            .register("a", 100, |_| true, |c: &mut Ctx| c.closed.push("a2"))
            .unwrap();
        assert!(router.try_handle_back(&mut ctx));
        assert_eq!(ctx.closed, vec!["a2"]);
    }

    #[test]
    fn re_registration_replaces_the_old_entry_entirely() {
        let mut router: ScreenRouter<Ctx> = ScreenRouter::new();
        router
            .register("a", 100, |_| true, |c: &mut Ctx| c.closed.push("old"))
            .unwrap();
        router
            .register("a", 100, |_| true, |c: &mut Ctx| c.closed.push("new"))
            .unwrap();

        assert_eq!(router.len(), 1);

        let mut ctx = Ctx::default();
        assert!(router.try_handle_back(&mut ctx));
        assert!(router.try_handle_back(&mut ctx));
        // The old close action is never invoked again.
        assert_eq!(ctx.closed, vec!["new", "new"]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut router: ScreenRouter<Ctx> = ScreenRouter::new();
        router.register("a", 100, |_| true, |_| {}).unwrap();
        router.register("b", 200, |_| true, |_| {}).unwrap();
        assert_eq!(router.len(), 2);

        router.clear();
        assert!(router.is_empty());

        let mut ctx = Ctx::default();
        assert!(!router.try_handle_back(&mut ctx));
    }
}
