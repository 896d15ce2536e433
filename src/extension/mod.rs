//! Mount extensions - pluggable participants in a mount pass.
//!
//! An extension implements [`MountExtension`] and is invoked by the
//! coordinator at each lifecycle phase. Every hook defaults to a no-op so a
//! participant only implements the phases it cares about. Extensions must
//! treat the hooks as independent entry points: no extension may assume any
//! other extension has or has not run, and extensions share no mutable state
//! outside the coordinator's explicit binder composition.
//!
//! Bundled participants:
//! - [`incremental::IncrementalMountExtension`] - mounts only what's visible
//! - [`visibility::VisibilityExtension`] - enter/exit visibility events
//! - [`transitions::TransitionsExtension`] - animation intent collection
//! - [`testing::EndToEndTestExtension`] - diagnostic probe
//! - [`dynamic_props::DynamicPropsBinder`] - binder-only dynamic properties

pub mod binder;
pub mod dynamic_props;
pub mod incremental;
pub mod testing;
pub mod transitions;
pub mod visibility;

use std::any::Any;
use std::error::Error;

use crate::types::Rect;

/// Result of a single lifecycle hook. An `Err` aborts the remainder of the
/// phase's dispatch and propagates to the phase's caller.
pub type HookResult = Result<(), Box<dyn Error>>;

/// A pluggable participant in a mount pass.
///
/// All hooks run synchronously on the surface's owning thread and must not
/// block on external I/O.
pub trait MountExtension {
    /// Identity used in fault reporting.
    fn name(&self) -> &'static str;

    /// Called once before the host surface is populated for this mount pass.
    ///
    /// `input` is the opaque mount input; extensions downcast to the shape
    /// they expect and ignore anything else.
    fn before_mount(&mut self, input: &dyn Any, visible: Rect) -> HookResult {
        let _ = (input, visible);
        Ok(())
    }

    /// Called once after population completes.
    fn after_mount(&mut self) -> HookResult {
        Ok(())
    }

    /// Called whenever the visible region changes (e.g. scroll), potentially
    /// many times between a before_mount/after_mount pair.
    fn on_visible_bounds_changed(&mut self, visible: Rect) -> HookResult {
        let _ = visible;
        Ok(())
    }

    /// Teardown hook: the mount target is being torn down.
    fn on_unmount(&mut self) -> HookResult {
        Ok(())
    }

    /// Teardown hook: the mount target is being detached.
    fn on_unbind(&mut self) -> HookResult {
        Ok(())
    }
}
