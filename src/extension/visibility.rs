//! Visibility processing - enter/exit events as items scroll into view.
//!
//! Dispatched last in the visible-bounds phase, so the events it emits
//! reflect the final mounted state of the surface for the new region.

use std::any::Any;
use std::collections::BTreeSet;

use super::{HookResult, MountExtension};
use crate::types::{MountPlan, PlanItem, Rect};

/// An item crossed the visible-region boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEvent {
    Entered(u64),
    Exited(u64),
}

/// Tracks which plan items are visible and emits enter/exit events.
pub struct VisibilityExtension {
    items: Vec<PlanItem>,
    visible: BTreeSet<u64>,
    events: Vec<VisibilityEvent>,
}

impl VisibilityExtension {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            visible: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    /// Whether an item is currently considered visible.
    pub fn is_visible(&self, id: u64) -> bool {
        self.visible.contains(&id)
    }

    /// Drain the events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<VisibilityEvent> {
        std::mem::take(&mut self.events)
    }

    fn process_bounds(&mut self, bounds: Rect) {
        let now_visible: BTreeSet<u64> = self
            .items
            .iter()
            .filter(|item| item.bounds.intersects(&bounds))
            .map(|item| item.id)
            .collect();

        for &id in self.visible.difference(&now_visible) {
            self.events.push(VisibilityEvent::Exited(id));
        }
        for &id in now_visible.difference(&self.visible) {
            self.events.push(VisibilityEvent::Entered(id));
        }

        self.visible = now_visible;
    }
}

impl Default for VisibilityExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl MountExtension for VisibilityExtension {
    fn name(&self) -> &'static str {
        "visibility"
    }

    fn before_mount(&mut self, input: &dyn Any, visible: Rect) -> HookResult {
        if let Some(plan) = input.downcast_ref::<MountPlan>() {
            self.items = plan.items.clone();
        }
        self.process_bounds(visible);
        Ok(())
    }

    fn on_visible_bounds_changed(&mut self, visible: Rect) -> HookResult {
        self.process_bounds(visible);
        Ok(())
    }

    fn on_unmount(&mut self) -> HookResult {
        // Everything still visible exits when the target goes away.
        for &id in &self.visible {
            self.events.push(VisibilityEvent::Exited(id));
        }
        self.visible.clear();
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
                bounds: Rect::new(0, 0, 10, 10),
            },
            PlanItem {
                id: 2,
                bounds: Rect::new(0, 20, 10, 30),
            },
        ])
    }

    #[test]
    fn test_enter_on_mount() {
        let mut ext = VisibilityExtension::new();
        ext.before_mount(&plan(), Rect::new(0, 0, 10, 15)).unwrap();

        assert!(ext.is_visible(1));
        assert!(!ext.is_visible(2));
        assert_eq!(ext.take_events(), vec![VisibilityEvent::Entered(1)]);
    }

    #[test]
    fn test_enter_and_exit_on_scroll() {
        let mut ext = VisibilityExtension::new();
        ext.before_mount(&plan(), Rect::new(0, 0, 10, 15)).unwrap();
        ext.take_events();

        ext.on_visible_bounds_changed(Rect::new(0, 15, 10, 30))
            .unwrap();

        assert_eq!(
            ext.take_events(),
            vec![VisibilityEvent::Exited(1), VisibilityEvent::Entered(2)]
        );
    }

    #[test]
    fn test_take_events_drains() {
        let mut ext = VisibilityExtension::new();
        ext.before_mount(&plan(), Rect::new(0, 0, 10, 15)).unwrap();

        assert_eq!(ext.take_events().len(), 1);
        assert!(ext.take_events().is_empty());
    }

    #[test]
    fn test_unmount_exits_remaining() {
        let mut ext = VisibilityExtension::new();
        ext.before_mount(&plan(), Rect::new(0, 0, 10, 30)).unwrap();
        ext.take_events();

        ext.on_unmount().unwrap();

        assert_eq!(
            ext.take_events(),
            vec![VisibilityEvent::Exited(1), VisibilityEvent::Exited(2)]
        );
        assert!(!ext.is_visible(1));
    }
}
