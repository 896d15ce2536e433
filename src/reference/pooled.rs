//! Pool-backed reference lifecycle.
//!
//! Recycles released values instead of rebuilding them: acquire pops from
//! the pool when possible, release returns the value up to a cap. Field
//! payloads decide reuse across re-renders - equal payloads mean the old
//! resource stands.
//!
//! Misuse policy: this lifecycle tolerates unbalanced releases rather than
//! detecting them - any value handed to release is treated as poolable, and
//! the outstanding count is allowed to go negative so the imbalance stays
//! observable.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{Reference, ReferenceLifecycle, ResourceContext};

/// A [`ReferenceLifecycle`] that pools released values.
///
/// `F` is the field payload concrete references of this kind carry; it
/// drives both construction of fresh values and the reuse comparison.
pub struct PooledLifecycle<T, F> {
    kind: &'static str,
    pool: RefCell<Vec<T>>,
    max_pooled: usize,
    build: Box<dyn Fn(&F) -> T>,
    outstanding: Cell<i64>,
}

impl<T: 'static, F: PartialEq + Any> PooledLifecycle<T, F> {
    /// Create a lifecycle that builds fresh values with `build` and keeps at
    /// most `max_pooled` released values around.
    pub fn new(
        kind: &'static str,
        max_pooled: usize,
        build: impl Fn(&F) -> T + 'static,
    ) -> Rc<Self> {
        Rc::new(Self {
            kind,
            pool: RefCell::new(Vec::new()),
            max_pooled,
            build: Box::new(build),
            outstanding: Cell::new(0),
        })
    }

    /// Create a reference of this kind carrying `fields`.
    ///
    /// References built any other way are not guaranteed to work with this
    /// lifecycle: acquire requires the payload to be `F`.
    pub fn reference(self: &Rc<Self>, fields: F) -> Reference<T> {
        Reference::new(self.clone(), fields)
    }

    /// Number of released values currently held for reuse.
    pub fn pooled_count(&self) -> usize {
        self.pool.borrow().len()
    }

    /// Acquired-minus-released balance. Zero when every acquire has been
    /// matched; negative reveals an unbalanced release.
    pub fn outstanding(&self) -> i64 {
        self.outstanding.get()
    }
}

impl<T: 'static, F: PartialEq + Any> ReferenceLifecycle<T> for PooledLifecycle<T, F> {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn on_acquire(&self, _context: &ResourceContext, reference: &Reference<T>) -> T {
        self.outstanding.set(self.outstanding.get() + 1);
        if let Some(value) = self.pool.borrow_mut().pop() {
            return value;
        }
        let fields = reference
            .downcast_fields::<F>()
            .expect("reference payload does not match this lifecycle's field type");
        (self.build)(fields)
    }

    fn on_release(&self, _context: &ResourceContext, value: T, _reference: &Reference<T>) {
        self.outstanding.set(self.outstanding.get() - 1);
        let mut pool = self.pool.borrow_mut();
        if pool.len() < self.max_pooled {
            pool.push(value);
        }
    }

    fn should_reference_update(&self, previous: &Reference<T>, next: &Reference<T>) -> bool {
        match (
            previous.downcast_fields::<F>(),
            next.downcast_fields::<F>(),
        ) {
            (Some(a), Some(b)) => a != b,
            // Unknown payload: re-acquire rather than guess.
            _ => true,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
