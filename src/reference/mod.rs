//! References - descriptors for derived, possibly-expensive resources.
//!
//! A [`Reference`] is a value-like recipe for producing a resource; the
//! bound [`ReferenceLifecycle`] supplies the actual acquire/release/compare
//! behavior (pooling, caching, fresh allocation - no purity constraint).
//! The tree-diffing collaborator calls [`should_update`] for each derived
//! resource it manages across a re-render and only re-acquires when it
//! answers true, so unchanged resources survive even though the declarative
//! tree is rebuilt from scratch every pass.
//!
//! Ownership: the value produced by [`acquire`] belongs to the caller until
//! it is handed back through [`release`]. Every successful acquire must be
//! matched by exactly one release before the reference is discarded;
//! releasing a value that was never acquired, or twice, is undefined at this
//! layer - the owning lifecycle detects or tolerates it.
//!
//! This layer is a thin synchronous pass-through and makes no concurrency
//! guarantee; a lifecycle shared across threads synchronizes itself.

pub mod pooled;

use std::any::Any;
use std::rc::Rc;

use crate::error::ReferenceError;

// =============================================================================
// Context
// =============================================================================

/// Opaque host context forwarded untouched to lifecycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceContext {
    pub surface_id: u64,
}

impl ResourceContext {
    pub const fn new(surface_id: u64) -> Self {
        Self { surface_id }
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Acquire/release/compare behavior for one concrete resource kind.
pub trait ReferenceLifecycle<T> {
    /// Name of the concrete reference kind this lifecycle produces, used to
    /// reject comparisons across kinds.
    fn kind(&self) -> &'static str;

    /// Produce a value for `reference`. Ownership transfers to the caller.
    ///
    /// Acquiring twice from the same reference does not guarantee the same
    /// instance twice.
    fn on_acquire(&self, context: &ResourceContext, reference: &Reference<T>) -> T;

    /// Reclaim a value previously produced by
    /// [`on_acquire`](ReferenceLifecycle::on_acquire).
    fn on_release(&self, context: &ResourceContext, value: T, reference: &Reference<T>);

    /// Whether a resource acquired from `previous` must be replaced to
    /// represent `next`. Both references are of this lifecycle's kind; the
    /// lifecycle compares its own field payloads.
    fn should_reference_update(&self, previous: &Reference<T>, next: &Reference<T>) -> bool;
}

// =============================================================================
// Reference
// =============================================================================

/// A descriptor for a derived resource of type `T`.
///
/// Cheap to clone: the lifecycle and field payload are shared. The acquired
/// resource is a separate, lifecycle-owned object - see the module docs for
/// the ownership contract.
pub struct Reference<T> {
    lifecycle: Rc<dyn ReferenceLifecycle<T>>,
    fields: Rc<dyn Any>,
}

impl<T> Reference<T> {
    /// Bind a field payload to a lifecycle.
    ///
    /// `fields` carries whatever the concrete kind compares in
    /// `should_reference_update`; it is opaque to everything else.
    pub fn new(lifecycle: Rc<dyn ReferenceLifecycle<T>>, fields: impl Any) -> Self {
        Self {
            lifecycle,
            fields: Rc::new(fields),
        }
    }

    /// The concrete kind this reference describes.
    pub fn kind(&self) -> &'static str {
        self.lifecycle.kind()
    }

    /// The lifecycle-specific field payload.
    pub fn fields(&self) -> &dyn Any {
        &*self.fields
    }

    /// Downcast the field payload to a concrete type.
    pub fn downcast_fields<F: Any>(&self) -> Option<&F> {
        self.fields.downcast_ref::<F>()
    }
}

impl<T> Clone for Reference<T> {
    fn clone(&self) -> Self {
        Self {
            lifecycle: self.lifecycle.clone(),
            fields: self.fields.clone(),
        }
    }
}

// =============================================================================
// Protocol
// =============================================================================

/// Acquire the resource described by `reference`.
///
/// The caller owns the returned value until it calls [`release`].
pub fn acquire<T>(context: &ResourceContext, reference: &Reference<T>) -> T {
    reference.lifecycle.on_acquire(context, reference)
}

/// Release a value previously returned by [`acquire`] for `reference`.
///
/// The value must not be retained or used in any way afterwards.
pub fn release<T>(context: &ResourceContext, value: T, reference: &Reference<T>) {
    reference.lifecycle.on_release(context, value, reference);
}

/// Whether a resource acquired from `previous` must be replaced by acquiring
/// anew from `next`.
///
/// - No previous: update exactly when `next` is present.
/// - No next: nothing to update to.
/// - Both present: the kinds must match - a mismatch is a caller error, not
///   a silent "no update" - then `previous`'s lifecycle compares the field
///   payloads.
pub fn should_update<T>(
    previous: Option<&Reference<T>>,
    next: Option<&Reference<T>>,
) -> Result<bool, ReferenceError> {
    match (previous, next) {
        (None, next) => Ok(next.is_some()),
        (Some(_), None) => Ok(false),
        (Some(previous), Some(next)) => {
            if previous.kind() != next.kind() {
                return Err(ReferenceError::KindMismatch {
                    previous: previous.kind(),
                    next: next.kind(),
                });
            }
            Ok(previous
                .lifecycle
                .should_reference_update(previous, next))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    /// Test lifecycle: freshly numbers every acquired value and tracks the
    /// outstanding count.
    struct CountingLifecycle {
        kind: &'static str,
        next_value: Cell<u64>,
        outstanding: Cell<i64>,
    }

    impl CountingLifecycle {
        fn new(kind: &'static str) -> Rc<Self> {
            Rc::new(Self {
                kind,
                next_value: Cell::new(0),
                outstanding: Cell::new(0),
            })
        }

        fn reference(self: &Rc<Self>, version: u32) -> Reference<u64> {
            Reference::new(self.clone(), version)
        }
    }

    impl ReferenceLifecycle<u64> for CountingLifecycle {
        fn kind(&self) -> &'static str {
            self.kind
        }

        fn on_acquire(&self, _context: &ResourceContext, _reference: &Reference<u64>) -> u64 {
            self.outstanding.set(self.outstanding.get() + 1);
            let value = self.next_value.get();
            self.next_value.set(value + 1);
            value
        }

        fn on_release(&self, _context: &ResourceContext, _value: u64, _reference: &Reference<u64>) {
            self.outstanding.set(self.outstanding.get() - 1);
        }

        fn should_reference_update(
            &self,
            previous: &Reference<u64>,
            next: &Reference<u64>,
        ) -> bool {
            previous.downcast_fields::<u32>() != next.downcast_fields::<u32>()
        }
    }

    #[test]
    fn test_should_update_null_rules() {
        let lifecycle = CountingLifecycle::new("counting");
        let reference = lifecycle.reference(1);

        assert!(should_update(None, Some(&reference)).unwrap());
        assert!(!should_update::<u64>(None, None).unwrap());
        assert!(!should_update(Some(&reference), None).unwrap());
    }

    #[test]
    fn test_should_update_compares_fields() {
        let lifecycle = CountingLifecycle::new("counting");
        let a = lifecycle.reference(1);
        let b = lifecycle.reference(1);
        let c = lifecycle.reference(2);

        // Identical fields: the old resource can be reused.
        assert!(!should_update(Some(&a), Some(&b)).unwrap());
        // Changed comparison-relevant field: must re-acquire.
        assert!(should_update(Some(&a), Some(&c)).unwrap());
    }

    #[test]
    fn test_should_update_rejects_kind_mismatch() {
        let counting = CountingLifecycle::new("counting");
        let other = CountingLifecycle::new("other");
        let a = counting.reference(1);
        let b = other.reference(1);

        let err = should_update(Some(&a), Some(&b)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot compare reference kinds `counting` and `other`"
        );
    }

    #[test]
    fn test_acquire_release_balance() {
        let lifecycle = CountingLifecycle::new("counting");
        let context = ResourceContext::new(1);

        let refs: Vec<Reference<u64>> = (0..4).map(|i| lifecycle.reference(i)).collect();
        let values: Vec<u64> = refs.iter().map(|r| acquire(&context, r)).collect();
        assert_eq!(lifecycle.outstanding.get(), 4);

        for (value, reference) in values.into_iter().zip(&refs) {
            release(&context, value, reference);
        }
        assert_eq!(lifecycle.outstanding.get(), 0);
    }

    #[test]
    fn test_acquire_twice_need_not_repeat_instances() {
        let lifecycle = CountingLifecycle::new("counting");
        let context = ResourceContext::new(1);
        let reference = lifecycle.reference(1);

        let first = acquire(&context, &reference);
        let second = acquire(&context, &reference);
        assert_ne!(first, second);

        release(&context, first, &reference);
        release(&context, second, &reference);
        assert_eq!(lifecycle.outstanding.get(), 0);
    }

    #[test]
    fn test_reference_clone_shares_payload() {
        let lifecycle = CountingLifecycle::new("counting");
        let reference = lifecycle.reference(7);
        let clone = reference.clone();

        assert_eq!(clone.kind(), "counting");
        assert!(!should_update(Some(&reference), Some(&clone)).unwrap());
        assert_eq!(clone.downcast_fields::<u32>(), Some(&7));
        assert!(clone.downcast_fields::<String>().is_none());
    }
}
