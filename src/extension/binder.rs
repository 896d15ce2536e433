//! Render binders - per-unit behavior contributed by extensions.
//!
//! A binder is applied outside the coordinator's own phase dispatch, by the
//! render-core construction path, at two points in a unit's life:
//! - attach/detach: the unit's backing host object attaches to or detaches
//!   from the surface
//! - mount/unmount: the unit is mounted or unmounted
//!
//! Which list a binder lands in is decided by the contributing extension at
//! enable time. Binders are shared (`Rc`) between their originating extension
//! and the factory's composed lists; their lifetime is the coordinator's.

use std::rc::Rc;

use crate::types::RenderUnitDescription;

/// Per-unit attach/detach or mount/unmount behavior.
pub trait RenderBinder {
    /// Identity used in diagnostics.
    fn description(&self) -> &'static str;

    /// Apply this binder to a unit.
    fn bind(&self, unit: &RenderUnitDescription);

    /// Undo a previous [`bind`](RenderBinder::bind) for a unit.
    fn unbind(&self, unit: &RenderUnitDescription);
}

/// Shared handle to a binder.
pub type BinderHandle = Rc<dyn RenderBinder>;

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;

    use super::*;

    /// Records every bind/unbind it sees, for dispatch-order assertions.
    pub struct RecordingBinder {
        name: &'static str,
        pub log: RefCell<Vec<(&'static str, u64)>>,
    }

    impl RecordingBinder {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                log: RefCell::new(Vec::new()),
            }
        }
    }

    impl RenderBinder for RecordingBinder {
        fn description(&self) -> &'static str {
            self.name
        }

        fn bind(&self, unit: &RenderUnitDescription) {
            self.log.borrow_mut().push(("bind", unit.id));
        }

        fn unbind(&self, unit: &RenderUnitDescription) {
            self.log.borrow_mut().push(("unbind", unit.id));
        }
    }
}
