//! Extension coordinator - single-registration bookkeeping and fixed-order
//! phase dispatch over a host surface's mount extensions.
//!
//! One coordinator exists per mount-target session and is torn down with the
//! target; instances are never reused across targets. All operations run on
//! the target's owning thread (`Rc`/`RefCell`, no locking); calling an
//! enable-* operation from inside a dispatch hook is unsupported and will
//! panic on reborrow.
//!
//! Dispatch rules:
//! - before_mount/after_mount/on_unmount/on_unbind iterate registered
//!   extensions in registration order, fail-fast.
//! - on_visible_bounds_changed follows a fixed semantic order regardless of
//!   registration order: incremental mount first (the surface must be
//!   updated for the new region), then transitions (animating the freshly
//!   mounted set), then visibility (events reflect the final mounted state).

pub mod factory;

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use bitflags::bitflags;
use tracing::{debug, trace};

use crate::error::CoordinatorError;
use crate::extension::binder::BinderHandle;
use crate::extension::dynamic_props::DynamicPropsBinder;
use crate::extension::incremental::IncrementalMountExtension;
use crate::extension::testing::EndToEndTestExtension;
use crate::extension::transitions::{LayoutSnapshot, TransitionsExtension, TreeHandle};
use crate::extension::visibility::VisibilityExtension;
use crate::extension::MountExtension;
use crate::types::{ExtensionKind, Phase, Rect};

use factory::RenderUnitFactory;

/// Shared handle to a registered extension.
pub type ExtensionHandle = Rc<RefCell<dyn MountExtension>>;

// =============================================================================
// Host Surface Boundary
// =============================================================================

/// The host surface's mount-delegate registry.
///
/// The coordinator registers each extension here exactly once, at enable
/// time, so the surface can also query the extension directly.
pub trait MountDelegateTarget {
    /// Record an extension with the surface.
    fn register_mount_delegate_extension(&mut self, extension: ExtensionHandle);

    /// Whether the surface is backed by the internal mount-state
    /// implementation (consumed by incremental-mount construction).
    fn has_internal_mount_state(&self) -> bool;
}

// =============================================================================
// Enabled-Kind Tracking
// =============================================================================

bitflags! {
    /// Which extension kinds have been enabled on a coordinator.
    ///
    /// Kept in sync with the per-kind handle fields by construction: the
    /// only place a bit is set is the enable-* operation that also stores
    /// the handle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EnabledExtensions: u8 {
        const INCREMENTAL_MOUNT = 1 << 0;
        const VISIBILITY = 1 << 1;
        const TRANSITIONS = 1 << 2;
        const END_TO_END_TEST = 1 << 3;
        const DYNAMIC_PROPS = 1 << 4;
    }
}

impl From<ExtensionKind> for EnabledExtensions {
    fn from(kind: ExtensionKind) -> Self {
        match kind {
            ExtensionKind::IncrementalMount => EnabledExtensions::INCREMENTAL_MOUNT,
            ExtensionKind::Visibility => EnabledExtensions::VISIBILITY,
            ExtensionKind::Transitions => EnabledExtensions::TRANSITIONS,
            ExtensionKind::EndToEndTest => EnabledExtensions::END_TO_END_TEST,
            ExtensionKind::DynamicProps => EnabledExtensions::DYNAMIC_PROPS,
        }
    }
}

// =============================================================================
// Coordinator
// =============================================================================

/// Owns the ordered extension list and drives phase dispatch.
pub struct ExtensionCoordinator {
    /// Registration order = dispatch order; never reordered or deduplicated.
    extensions: Vec<ExtensionHandle>,
    enabled: EnabledExtensions,

    incremental_mount: Option<Rc<RefCell<IncrementalMountExtension>>>,
    visibility: Option<Rc<RefCell<VisibilityExtension>>>,
    transitions: Option<Rc<RefCell<TransitionsExtension>>>,
    end_to_end_test: Option<Rc<RefCell<EndToEndTestExtension>>>,
    dynamic_props: Option<Rc<DynamicPropsBinder>>,

    attach_detach_binders: Vec<BinderHandle>,
    mount_unmount_binders: Vec<BinderHandle>,
    factory: Option<Rc<RenderUnitFactory>>,

    /// Journal of hook invocations since the last take, for diagnosing which
    /// participants ran before a mount fault.
    dispatch_journal: RefCell<Vec<(&'static str, Phase)>>,
}

impl ExtensionCoordinator {
    pub fn new() -> Self {
        Self {
            extensions: Vec::new(),
            enabled: EnabledExtensions::empty(),
            incremental_mount: None,
            visibility: None,
            transitions: None,
            end_to_end_test: None,
            dynamic_props: None,
            attach_detach_binders: Vec::new(),
            mount_unmount_binders: Vec::new(),
            factory: None,
            dispatch_journal: RefCell::new(Vec::new()),
        }
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    fn check_not_enabled(&self, kind: ExtensionKind) -> Result<(), CoordinatorError> {
        if self.enabled.contains(kind.into()) {
            return Err(CoordinatorError::AlreadyEnabled { kind });
        }
        Ok(())
    }

    fn register_listener(&mut self, extension: ExtensionHandle) {
        self.extensions.push(extension);
    }

    /// Enable incremental mount.
    ///
    /// The extension is parameterized on whether the target surface carries
    /// the internal mount-state capability. Contributes one attach/detach
    /// binder.
    pub fn enable_incremental_mount(
        &mut self,
        target: &mut dyn MountDelegateTarget,
    ) -> Result<(), CoordinatorError> {
        self.check_not_enabled(ExtensionKind::IncrementalMount)?;

        let extension = Rc::new(RefCell::new(IncrementalMountExtension::new(
            target.has_internal_mount_state(),
        )));
        target.register_mount_delegate_extension(extension.clone());
        self.attach_detach_binders
            .push(extension.borrow().attach_detach_binder());
        self.incremental_mount = Some(extension.clone());
        self.register_listener(extension);
        self.enabled.insert(EnabledExtensions::INCREMENTAL_MOUNT);
        debug!("enabled incremental mount");
        Ok(())
    }

    /// Enable visibility processing.
    pub fn enable_visibility_processing(
        &mut self,
        target: &mut dyn MountDelegateTarget,
    ) -> Result<(), CoordinatorError> {
        self.check_not_enabled(ExtensionKind::Visibility)?;

        let extension = Rc::new(RefCell::new(VisibilityExtension::new()));
        target.register_mount_delegate_extension(extension.clone());
        self.visibility = Some(extension.clone());
        self.register_listener(extension);
        self.enabled.insert(EnabledExtensions::VISIBILITY);
        debug!("enabled visibility processing");
        Ok(())
    }

    /// Enable transitions. Contributes one attach/detach binder and one
    /// mount/unmount binder.
    pub fn enable_transitions(
        &mut self,
        target: &mut dyn MountDelegateTarget,
    ) -> Result<(), CoordinatorError> {
        self.check_not_enabled(ExtensionKind::Transitions)?;

        let extension = Rc::new(RefCell::new(TransitionsExtension::new()));
        target.register_mount_delegate_extension(extension.clone());
        {
            let ext = extension.borrow();
            self.attach_detach_binders.push(ext.attach_detach_binder());
            self.mount_unmount_binders.push(ext.mount_unmount_binder());
        }
        self.transitions = Some(extension.clone());
        self.register_listener(extension);
        self.enabled.insert(EnabledExtensions::TRANSITIONS);
        debug!("enabled transitions");
        Ok(())
    }

    /// Enable the end-to-end test probe.
    pub fn enable_end_to_end_test_processing(
        &mut self,
        target: &mut dyn MountDelegateTarget,
    ) -> Result<(), CoordinatorError> {
        self.check_not_enabled(ExtensionKind::EndToEndTest)?;

        let extension = Rc::new(RefCell::new(EndToEndTestExtension::new()));
        target.register_mount_delegate_extension(extension.clone());
        self.end_to_end_test = Some(extension.clone());
        self.register_listener(extension);
        self.enabled.insert(EnabledExtensions::END_TO_END_TEST);
        debug!("enabled end-to-end test processing");
        Ok(())
    }

    /// Enable dynamic props.
    ///
    /// A binder-only participant: joins the attach/detach list but never the
    /// phase dispatch list, and is not registered with the target.
    pub fn enable_dynamic_props(&mut self) -> Result<(), CoordinatorError> {
        self.check_not_enabled(ExtensionKind::DynamicProps)?;

        let binder = Rc::new(DynamicPropsBinder::new());
        self.attach_detach_binders.push(binder.clone());
        self.dynamic_props = Some(binder);
        self.enabled.insert(EnabledExtensions::DYNAMIC_PROPS);
        debug!("enabled dynamic props");
        Ok(())
    }

    /// Whether a kind has been enabled on this coordinator.
    pub fn is_enabled(&self, kind: ExtensionKind) -> bool {
        self.enabled.contains(kind.into())
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn visibility_extension(&self) -> Option<Rc<RefCell<VisibilityExtension>>> {
        self.visibility.clone()
    }

    pub fn transitions_extension(&self) -> Option<Rc<RefCell<TransitionsExtension>>> {
        self.transitions.clone()
    }

    pub fn end_to_end_test_extension(&self) -> Option<Rc<RefCell<EndToEndTestExtension>>> {
        self.end_to_end_test.clone()
    }

    pub fn incremental_mount_extension(&self) -> Option<Rc<RefCell<IncrementalMountExtension>>> {
        self.incremental_mount.clone()
    }

    pub fn dynamic_props_binder(&self) -> Option<Rc<DynamicPropsBinder>> {
        self.dynamic_props.clone()
    }

    /// Drain the journal of hook invocations recorded since the last call.
    ///
    /// After a mount fault this names every participant that ran before the
    /// failing one.
    pub fn take_dispatch_journal(&self) -> Vec<(&'static str, Phase)> {
        std::mem::take(&mut *self.dispatch_journal.borrow_mut())
    }

    // -------------------------------------------------------------------------
    // Phase Dispatch
    // -------------------------------------------------------------------------

    fn invoke(
        &self,
        extension: &ExtensionHandle,
        phase: Phase,
        call: impl FnOnce(&mut dyn MountExtension) -> crate::extension::HookResult,
    ) -> Result<(), CoordinatorError> {
        let name = extension.borrow().name();
        self.dispatch_journal.borrow_mut().push((name, phase));
        trace!(extension = name, %phase, "dispatch");
        call(&mut *extension.borrow_mut()).map_err(|source| CoordinatorError::ExtensionFault {
            extension: name,
            phase,
            source,
        })
    }

    /// Dispatch before_mount to every extension in registration order.
    pub fn before_mount(&self, input: &dyn Any, visible: Rect) -> Result<(), CoordinatorError> {
        for extension in &self.extensions {
            self.invoke(extension, Phase::BeforeMount, |ext| {
                ext.before_mount(input, visible)
            })?;
        }
        Ok(())
    }

    /// Dispatch after_mount to every extension in registration order.
    pub fn after_mount(&self) -> Result<(), CoordinatorError> {
        for extension in &self.extensions {
            self.invoke(extension, Phase::AfterMount, |ext| ext.after_mount())?;
        }
        Ok(())
    }

    /// Dispatch the visible-bounds phase in fixed semantic order:
    /// incremental mount, then transitions, then visibility. Absent kinds
    /// are silent no-ops.
    pub fn on_visible_bounds_changed(&self, visible: Rect) -> Result<(), CoordinatorError> {
        // We first mount for the new region, then process transitions and
        // visibility outputs against the updated surface.
        if let Some(extension) = &self.incremental_mount {
            let handle: ExtensionHandle = extension.clone();
            self.invoke(&handle, Phase::VisibleBoundsChanged, |ext| {
                ext.on_visible_bounds_changed(visible)
            })?;
        }

        if let Some(extension) = &self.transitions {
            let handle: ExtensionHandle = extension.clone();
            self.invoke(&handle, Phase::VisibleBoundsChanged, |ext| {
                ext.on_visible_bounds_changed(visible)
            })?;
        }

        if let Some(extension) = &self.visibility {
            let handle: ExtensionHandle = extension.clone();
            self.invoke(&handle, Phase::VisibleBoundsChanged, |ext| {
                ext.on_visible_bounds_changed(visible)
            })?;
        }

        Ok(())
    }

    /// Dispatch on_unmount to every extension in registration order.
    pub fn on_unmount(&self) -> Result<(), CoordinatorError> {
        for extension in &self.extensions {
            self.invoke(extension, Phase::Unmount, |ext| ext.on_unmount())?;
        }
        Ok(())
    }

    /// Dispatch on_unbind to every extension in registration order.
    pub fn on_unbind(&self) -> Result<(), CoordinatorError> {
        for extension in &self.extensions {
            self.invoke(extension, Phase::Unbind, |ext| ext.on_unbind())?;
        }
        Ok(())
    }

    /// Forward a layout snapshot to the transitions extension; a no-op if
    /// transitions were never enabled.
    pub fn collect_all_transitions(&self, layout: &LayoutSnapshot, tree: &TreeHandle) {
        if let Some(extension) = &self.transitions {
            extension.borrow_mut().collect_all_transitions(layout, tree);
        }
    }

    // -------------------------------------------------------------------------
    // Render Unit Factory
    // -------------------------------------------------------------------------

    /// The memoized render-unit factory composed from the accumulated binder
    /// lists.
    ///
    /// Built lazily on first call; the first caller's
    /// `delegate_to_render_core` is frozen for the coordinator's remaining
    /// lifetime and later callers' flags are ignored. Surprising but
    /// load-bearing for callers that race to the first retrieval; pinned by
    /// test rather than changed.
    pub fn render_unit_factory(&mut self, delegate_to_render_core: bool) -> Rc<RenderUnitFactory> {
        let factory = self.factory.get_or_insert_with(|| {
            debug!(delegate_to_render_core, "building render unit factory");
            Rc::new(RenderUnitFactory::new(
                self.mount_unmount_binders.clone(),
                self.attach_detach_binders.clone(),
                delegate_to_render_core,
            ))
        });
        factory.clone()
    }
}

impl Default for ExtensionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
