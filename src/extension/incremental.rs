//! Incremental mount - only mount what intersects the visible region.
//!
//! Keeps the mounted set in sync with the visible rect:
//! - before_mount stores the pass's plan items and applies the initial rect
//! - on_visible_bounds_changed diffs the in-range id set against the mounted
//!   set and mounts/unmounts the difference
//! - an unchanged rect short-circuits (scroll events often repeat bounds)
//!
//! Contributes one attach/detach binder that tracks which units currently
//! have their backing host object attached.

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::trace;

use super::binder::{BinderHandle, RenderBinder};
use super::{HookResult, MountExtension};
use crate::types::{MountPlan, PlanItem, Rect, RenderUnitDescription};

// =============================================================================
// Attach/Detach Binder
// =============================================================================

/// Tracks which units currently have attached host content.
pub struct IncrementalMountBinder {
    attached: RefCell<BTreeSet<u64>>,
}

impl IncrementalMountBinder {
    fn new() -> Self {
        Self {
            attached: RefCell::new(BTreeSet::new()),
        }
    }

    /// Whether a unit's host content is currently attached.
    pub fn is_attached(&self, id: u64) -> bool {
        self.attached.borrow().contains(&id)
    }
}

impl RenderBinder for IncrementalMountBinder {
    fn description(&self) -> &'static str {
        "incremental-mount-attach"
    }

    fn bind(&self, unit: &RenderUnitDescription) {
        self.attached.borrow_mut().insert(unit.id);
    }

    fn unbind(&self, unit: &RenderUnitDescription) {
        self.attached.borrow_mut().remove(&unit.id);
    }
}

// =============================================================================
// Extension
// =============================================================================

/// Mounts and unmounts plan items as the visible region moves over them.
pub struct IncrementalMountExtension {
    uses_internal_mount_state: bool,
    items: Vec<PlanItem>,
    mounted: BTreeSet<u64>,
    last_visible: Option<Rect>,
    mount_pass_count: u64,
    binder: Rc<IncrementalMountBinder>,
}

impl IncrementalMountExtension {
    /// Create the extension.
    ///
    /// `uses_internal_mount_state` reflects whether the target surface is
    /// backed by the internal mount-state implementation; when it is, the
    /// surface already tracks per-item acquire counts and this extension can
    /// skip redundant bookkeeping on unmount.
    pub fn new(uses_internal_mount_state: bool) -> Self {
        Self {
            uses_internal_mount_state,
            items: Vec::new(),
            mounted: BTreeSet::new(),
            last_visible: None,
            mount_pass_count: 0,
            binder: Rc::new(IncrementalMountBinder::new()),
        }
    }

    /// The attach/detach binder this extension contributes.
    pub fn attach_detach_binder(&self) -> BinderHandle {
        self.binder.clone()
    }

    /// Whether the target reported the internal mount-state capability.
    pub fn uses_internal_mount_state(&self) -> bool {
        self.uses_internal_mount_state
    }

    /// Whether an item is currently mounted.
    pub fn is_mounted(&self, id: u64) -> bool {
        self.mounted.contains(&id)
    }

    /// Number of currently mounted items.
    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    /// Number of mount passes performed so far.
    pub fn mount_pass_count(&self) -> u64 {
        self.mount_pass_count
    }

    /// Mount everything entering `visible`, unmount everything leaving it.
    fn apply_visible_bounds(&mut self, visible: Rect) {
        let in_range: BTreeSet<u64> = self
            .items
            .iter()
            .filter(|item| item.bounds.intersects(&visible))
            .map(|item| item.id)
            .collect();

        let to_unmount: Vec<u64> = self.mounted.difference(&in_range).copied().collect();
        for id in to_unmount {
            self.mounted.remove(&id);
            trace!(id, "incremental unmount");
        }
        for id in in_range {
            if self.mounted.insert(id) {
                trace!(id, "incremental mount");
            }
        }

        self.last_visible = Some(visible);
        self.mount_pass_count += 1;
    }
}

impl MountExtension for IncrementalMountExtension {
    fn name(&self) -> &'static str {
        "incremental-mount"
    }

    fn before_mount(&mut self, input: &dyn Any, visible: Rect) -> HookResult {
        if let Some(plan) = input.downcast_ref::<MountPlan>() {
            self.items = plan.items.clone();
        }
        self.apply_visible_bounds(visible);
        Ok(())
    }

    fn on_visible_bounds_changed(&mut self, visible: Rect) -> HookResult {
        if self.last_visible == Some(visible) {
            return Ok(());
        }
        self.apply_visible_bounds(visible);
        Ok(())
    }

    fn on_unmount(&mut self) -> HookResult {
        self.mounted.clear();
        self.last_visible = None;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn plan() -> MountPlan {
        MountPlan::new(vec![
            PlanItem {
                id: 1,
                bounds: Rect::new(0, 0, 100, 50),
            },
            PlanItem {
                id: 2,
                bounds: Rect::new(0, 50, 100, 100),
            },
            PlanItem {
                id: 3,
                bounds: Rect::new(0, 100, 100, 150),
            },
        ])
    }

    #[test]
    fn test_initial_mount_covers_visible_items() {
        let mut ext = IncrementalMountExtension::new(false);
        ext.before_mount(&plan(), Rect::new(0, 0, 100, 60)).unwrap();

        assert!(ext.is_mounted(1));
        assert!(ext.is_mounted(2));
        assert!(!ext.is_mounted(3));
        assert_eq!(ext.mounted_count(), 2);
    }

    #[test]
    fn test_scroll_mounts_and_unmounts() {
        let mut ext = IncrementalMountExtension::new(false);
        ext.before_mount(&plan(), Rect::new(0, 0, 100, 60)).unwrap();

        // Scroll down past the first item.
        ext.on_visible_bounds_changed(Rect::new(0, 60, 100, 150))
            .unwrap();

        assert!(!ext.is_mounted(1));
        assert!(ext.is_mounted(2));
        assert!(ext.is_mounted(3));
    }

    #[test]
    fn test_unchanged_bounds_short_circuit() {
        let mut ext = IncrementalMountExtension::new(false);
        let visible = Rect::new(0, 0, 100, 60);
        ext.before_mount(&plan(), visible).unwrap();
        let passes = ext.mount_pass_count();

        ext.on_visible_bounds_changed(visible).unwrap();
        assert_eq!(ext.mount_pass_count(), passes);

        ext.on_visible_bounds_changed(Rect::new(0, 10, 100, 70))
            .unwrap();
        assert_eq!(ext.mount_pass_count(), passes + 1);
    }

    #[test]
    fn test_unmount_clears_everything() {
        let mut ext = IncrementalMountExtension::new(true);
        ext.before_mount(&plan(), Rect::new(0, 0, 100, 150)).unwrap();
        assert_eq!(ext.mounted_count(), 3);

        ext.on_unmount().unwrap();
        assert_eq!(ext.mounted_count(), 0);

        // A fresh pass after unmount remounts from scratch.
        ext.on_visible_bounds_changed(Rect::new(0, 0, 100, 10))
            .unwrap();
        assert_eq!(ext.mounted_count(), 1);
    }

    #[test]
    fn test_non_plan_input_is_ignored() {
        let mut ext = IncrementalMountExtension::new(false);
        ext.before_mount(&"not a plan", Rect::new(0, 0, 10, 10))
            .unwrap();
        assert_eq!(ext.mounted_count(), 0);
    }

    #[test]
    fn test_binder_tracks_attachment() {
        let ext = IncrementalMountExtension::new(false);
        let binder = ext.attach_detach_binder();
        let unit = RenderUnitDescription { id: 9, name: "cell" };

        binder.bind(&unit);
        assert!(ext.binder.is_attached(9));
        binder.unbind(&unit);
        assert!(!ext.binder.is_attached(9));
    }
}
