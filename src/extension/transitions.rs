//! Transitions - animation intent collection and per-pass activation.
//!
//! The tree-diffing collaborator calls `collect_all_transitions` while it
//! resolves a layout; collected intents stay pending until `after_mount`
//! promotes them to active, so animations always target the mounted set.
//! In the visible-bounds phase this extension runs after incremental mount
//! and before visibility, so it animates freshly mounted content and the
//! visibility extension observes the result.
//!
//! Contributes one attach/detach binder and one mount/unmount binder, both
//! tracking which units are under transition control.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use super::binder::{BinderHandle, RenderBinder};
use super::{HookResult, MountExtension};
use crate::types::{Rect, RenderUnitDescription};

// =============================================================================
// Transition Intents
// =============================================================================

/// A declared animation intent, keyed by the transition key of the component
/// it animates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub key: String,
    pub item_id: u64,
}

/// The layout snapshot forwarded by the tree-diffing collaborator: the
/// transitions declared by the tree that produced the current pass.
#[derive(Debug, Clone, Default)]
pub struct LayoutSnapshot {
    pub transitions: Vec<Transition>,
}

/// Handle to the declarative tree a layout snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeHandle {
    pub id: u64,
}

// =============================================================================
// Binder
// =============================================================================

/// Tracks which units are currently under transition control.
pub struct TransitionBinder {
    kind: &'static str,
    bound: RefCell<BTreeSet<u64>>,
}

impl TransitionBinder {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            bound: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn is_bound(&self, id: u64) -> bool {
        self.bound.borrow().contains(&id)
    }
}

impl RenderBinder for TransitionBinder {
    fn description(&self) -> &'static str {
        self.kind
    }

    fn bind(&self, unit: &RenderUnitDescription) {
        self.bound.borrow_mut().insert(unit.id);
    }

    fn unbind(&self, unit: &RenderUnitDescription) {
        self.bound.borrow_mut().remove(&unit.id);
    }
}

// =============================================================================
// Extension
// =============================================================================

/// Collects transition intents and activates them per mount pass.
pub struct TransitionsExtension {
    pending: Vec<Transition>,
    active: Vec<Transition>,
    source_tree: Option<u64>,
    last_animated: Option<Rect>,
    attach_detach: Rc<TransitionBinder>,
    mount_unmount: Rc<TransitionBinder>,
}

impl TransitionsExtension {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            active: Vec::new(),
            source_tree: None,
            last_animated: None,
            attach_detach: Rc::new(TransitionBinder::new("transitions-attach")),
            mount_unmount: Rc::new(TransitionBinder::new("transitions-mount")),
        }
    }

    /// The attach/detach binder this extension contributes.
    pub fn attach_detach_binder(&self) -> BinderHandle {
        self.attach_detach.clone()
    }

    /// The mount/unmount binder this extension contributes.
    pub fn mount_unmount_binder(&self) -> BinderHandle {
        self.mount_unmount.clone()
    }

    /// Gather the intents declared by the current pass's layout.
    ///
    /// Intents are deduplicated by key; a later declaration for the same key
    /// replaces the earlier one. They stay pending until `after_mount`.
    pub fn collect_all_transitions(&mut self, layout: &LayoutSnapshot, tree: &TreeHandle) {
        self.source_tree = Some(tree.id);
        for transition in &layout.transitions {
            if let Some(existing) = self.pending.iter_mut().find(|t| t.key == transition.key) {
                *existing = transition.clone();
            } else {
                self.pending.push(transition.clone());
            }
        }
    }

    /// Intents collected but not yet activated.
    pub fn pending(&self) -> &[Transition] {
        &self.pending
    }

    /// Intents activated by the last completed mount pass.
    pub fn active(&self) -> &[Transition] {
        &self.active
    }

    /// Tree the current intents were collected from.
    pub fn source_tree(&self) -> Option<u64> {
        self.source_tree
    }

    /// Visible rect of the last bounds change animations ran against.
    pub fn last_animated_bounds(&self) -> Option<Rect> {
        self.last_animated
    }
}

impl Default for TransitionsExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl MountExtension for TransitionsExtension {
    fn name(&self) -> &'static str {
        "transitions"
    }

    fn after_mount(&mut self) -> HookResult {
        // The mounted set is final; pending intents become active.
        self.active = std::mem::take(&mut self.pending);
        Ok(())
    }

    fn on_visible_bounds_changed(&mut self, visible: Rect) -> HookResult {
        // Runs after incremental mount: active transitions advance against
        // the freshly mounted set for this region.
        self.last_animated = Some(visible);
        Ok(())
    }

    fn on_unmount(&mut self) -> HookResult {
        self.pending.clear();
        self.active.clear();
        self.source_tree = None;
        self.last_animated = None;
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

    fn intent(key: &str, item_id: u64) -> Transition {
        Transition {
            key: key.to_string(),
            item_id,
        }
    }

    #[test]
    fn test_collect_dedupes_by_key() {
        let mut ext = TransitionsExtension::new();
        let tree = TreeHandle { id: 1 };

        ext.collect_all_transitions(
            &LayoutSnapshot {
                transitions: vec![intent("fade", 1), intent("slide", 2)],
            },
            &tree,
        );
        ext.collect_all_transitions(
            &LayoutSnapshot {
                transitions: vec![intent("fade", 3)],
            },
            &tree,
        );

        assert_eq!(ext.pending(), &[intent("fade", 3), intent("slide", 2)]);
        assert_eq!(ext.source_tree(), Some(1));
    }

    #[test]
    fn test_after_mount_promotes_pending() {
        let mut ext = TransitionsExtension::new();
        ext.collect_all_transitions(
            &LayoutSnapshot {
                transitions: vec![intent("fade", 1)],
            },
            &TreeHandle { id: 1 },
        );

        ext.after_mount().unwrap();

        assert!(ext.pending().is_empty());
        assert_eq!(ext.active(), &[intent("fade", 1)]);
    }

    #[test]
    fn test_unmount_drops_intents() {
        let mut ext = TransitionsExtension::new();
        ext.collect_all_transitions(
            &LayoutSnapshot {
                transitions: vec![intent("fade", 1)],
            },
            &TreeHandle { id: 1 },
        );
        ext.after_mount().unwrap();
        ext.on_visible_bounds_changed(Rect::new(0, 0, 5, 5)).unwrap();
        assert_eq!(ext.last_animated_bounds(), Some(Rect::new(0, 0, 5, 5)));

        ext.on_unmount().unwrap();

        assert!(ext.pending().is_empty());
        assert!(ext.active().is_empty());
        assert_eq!(ext.source_tree(), None);
        assert_eq!(ext.last_animated_bounds(), None);
    }

    #[test]
    fn test_binders_are_distinct() {
        let ext = TransitionsExtension::new();
        let attach = ext.attach_detach_binder();
        let mount = ext.mount_unmount_binder();
        let unit = RenderUnitDescription { id: 4, name: "hero" };

        attach.bind(&unit);
        assert!(ext.attach_detach.is_bound(4));
        assert!(!ext.mount_unmount.is_bound(4));

        mount.bind(&unit);
        mount.unbind(&unit);
        assert!(!ext.mount_unmount.is_bound(4));
        assert!(ext.attach_detach.is_bound(4));
    }
}
