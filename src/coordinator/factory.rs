//! Render unit factory - composes the binder lists collected by the
//! coordinator into the units the render-core construction path consumes.
//!
//! Pure composition: the factory holds nothing beyond what it was
//! constructed with, and every unit it creates wraps the same two ordered
//! binder lists plus the delegation flag.

use crate::extension::binder::BinderHandle;
use crate::types::RenderUnitDescription;

// =============================================================================
// Factory
// =============================================================================

/// Builds render units carrying the coordinator's composed binder lists.
pub struct RenderUnitFactory {
    mount_unmount_binders: Vec<BinderHandle>,
    attach_detach_binders: Vec<BinderHandle>,
    delegate_to_render_core: bool,
}

impl RenderUnitFactory {
    pub(crate) fn new(
        mount_unmount_binders: Vec<BinderHandle>,
        attach_detach_binders: Vec<BinderHandle>,
        delegate_to_render_core: bool,
    ) -> Self {
        Self {
            mount_unmount_binders,
            attach_detach_binders,
            delegate_to_render_core,
        }
    }

    /// Whether binder application is delegated to the external render-core
    /// path rather than driven by the surface.
    pub fn delegates_to_render_core(&self) -> bool {
        self.delegate_to_render_core
    }

    /// The composed mount/unmount binders, in contribution order.
    pub fn mount_unmount_binders(&self) -> &[BinderHandle] {
        &self.mount_unmount_binders
    }

    /// The composed attach/detach binders, in contribution order.
    pub fn attach_detach_binders(&self) -> &[BinderHandle] {
        &self.attach_detach_binders
    }

    /// Wrap a unit description with the composed binder lists.
    pub fn create_render_unit(&self, description: RenderUnitDescription) -> RenderUnit {
        RenderUnit {
            description,
            mount_unmount_binders: self.mount_unmount_binders.clone(),
            attach_detach_binders: self.attach_detach_binders.clone(),
            delegate_to_render_core: self.delegate_to_render_core,
        }
    }
}

// =============================================================================
// Render Unit
// =============================================================================

/// A renderable unit plus the per-unit behavior contributed by extensions.
pub struct RenderUnit {
    description: RenderUnitDescription,
    mount_unmount_binders: Vec<BinderHandle>,
    attach_detach_binders: Vec<BinderHandle>,
    delegate_to_render_core: bool,
}

impl RenderUnit {
    pub fn description(&self) -> RenderUnitDescription {
        self.description
    }

    pub fn delegates_to_render_core(&self) -> bool {
        self.delegate_to_render_core
    }

    /// Apply every mount/unmount binder, in contribution order.
    pub fn mount(&self) {
        for binder in &self.mount_unmount_binders {
            binder.bind(&self.description);
        }
    }

    /// Undo the mount/unmount binders, in contribution order.
    pub fn unmount(&self) {
        for binder in &self.mount_unmount_binders {
            binder.unbind(&self.description);
        }
    }

    /// Apply every attach/detach binder, in contribution order.
    pub fn attach(&self) {
        for binder in &self.attach_detach_binders {
            binder.bind(&self.description);
        }
    }

    /// Undo the attach/detach binders, in contribution order.
    pub fn detach(&self) {
        for binder in &self.attach_detach_binders {
            binder.unbind(&self.description);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
