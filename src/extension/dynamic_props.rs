//! Dynamic props - per-unit dynamic property application.
//!
//! Unlike the other participants this is a binder-only contribution: it
//! never joins the coordinator's phase dispatch. It is applied at
//! attach/detach time, when a unit's host content becomes available to
//! receive dynamic property values, and resets on detach.

use std::cell::RefCell;
use std::collections::BTreeSet;

use super::binder::RenderBinder;
use crate::types::RenderUnitDescription;

/// Applies dynamic property values when a unit's content attaches.
pub struct DynamicPropsBinder {
    bound: RefCell<BTreeSet<u64>>,
}

impl DynamicPropsBinder {
    pub fn new() -> Self {
        Self {
            bound: RefCell::new(BTreeSet::new()),
        }
    }

    /// Whether a unit currently has dynamic props applied.
    pub fn is_bound(&self, id: u64) -> bool {
        self.bound.borrow().contains(&id)
    }

    /// Number of units currently under dynamic-prop control.
    pub fn bound_count(&self) -> usize {
        self.bound.borrow().len()
    }
}

impl Default for DynamicPropsBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBinder for DynamicPropsBinder {
    fn description(&self) -> &'static str {
        "dynamic-props"
    }

    fn bind(&self, unit: &RenderUnitDescription) {
        self.bound.borrow_mut().insert(unit.id);
    }

    fn unbind(&self, unit: &RenderUnitDescription) {
        self.bound.borrow_mut().remove(&unit.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_unbind_tracking() {
        let binder = DynamicPropsBinder::new();
        let a = RenderUnitDescription { id: 1, name: "a" };
        let b = RenderUnitDescription { id: 2, name: "b" };

        binder.bind(&a);
        binder.bind(&b);
        assert_eq!(binder.bound_count(), 2);
        assert!(binder.is_bound(1));

        binder.unbind(&a);
        assert_eq!(binder.bound_count(), 1);
        assert!(!binder.is_bound(1));
        assert!(binder.is_bound(2));
    }
}
