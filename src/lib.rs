//! # treemount
//!
//! Mount coordination and derived-resource lifecycle for visual-tree
//! renderers.
//!
//! Two independent pieces:
//!
//! - The **extension coordinator** composes order-sensitive mount
//!   participants (incremental mount, visibility, transitions, diagnostics,
//!   dynamic props) into one coherent mount pass over a host surface, and
//!   folds the per-unit binders they contribute into the render-unit
//!   construction path.
//! - The **reference protocol** manages derived, possibly-expensive
//!   resources: acquired from a declarative descriptor, reused across
//!   re-renders while the descriptor's comparison-relevant fields are
//!   unchanged, and released exactly once when no longer needed.
//!
//! ## Mount pass
//!
//! ```text
//! before_mount → on_visible_bounds_changed* → after_mount → … → on_unbind/on_unmount
//! ```
//!
//! Registration-order dispatch for every phase except the visible-bounds
//! phase, which always runs incremental mount, then transitions, then
//! visibility, so animation and visibility logic observe a surface already
//! updated for the new region.
//!
//! ## Modules
//!
//! - [`types`] - Rect, lifecycle phases, extension kinds, mount plans
//! - [`extension`] - the [`MountExtension`] capability and bundled participants
//! - [`coordinator`] - registration, fixed-order dispatch, factory memoization
//! - [`reference`] - acquire/release/should-update over derived resources
//! - [`error`] - coordinator and reference fault taxonomy

pub mod coordinator;
pub mod error;
pub mod extension;
pub mod reference;
pub mod types;

// Re-export commonly used items
pub use types::{ExtensionKind, MountPlan, Phase, PlanItem, Rect, RenderUnitDescription};

pub use error::{CoordinatorError, ReferenceError};

pub use extension::{
    binder::{BinderHandle, RenderBinder},
    dynamic_props::DynamicPropsBinder,
    incremental::IncrementalMountExtension,
    testing::EndToEndTestExtension,
    transitions::{LayoutSnapshot, Transition, TransitionsExtension, TreeHandle},
    visibility::{VisibilityEvent, VisibilityExtension},
    HookResult, MountExtension,
};

pub use coordinator::{
    factory::{RenderUnit, RenderUnitFactory},
    EnabledExtensions, ExtensionCoordinator, ExtensionHandle, MountDelegateTarget,
};

pub use reference::{
    acquire, pooled::PooledLifecycle, release, should_update, Reference, ReferenceLifecycle,
    ResourceContext,
};
