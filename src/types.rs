//! Core types for treemount.
//!
//! These types define the vocabulary shared by the coordinator, the bundled
//! extensions, and the render-unit factory. They are deliberately small:
//! everything here is Copy or cheaply cloneable and flows by value through
//! the mount pipeline.

use std::fmt;

// =============================================================================
// Rect
// =============================================================================

/// Visible region of a host surface, in surface coordinates.
///
/// Stored as four bounds rather than origin+size so that regions scrolled
/// past the surface origin stay representable (negative left/top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// The empty region.
    pub const EMPTY: Self = Self {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    /// Create a rect from its four bounds.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width of the region (zero if bounds are inverted).
    #[inline]
    pub const fn width(&self) -> i32 {
        if self.right > self.left {
            self.right - self.left
        } else {
            0
        }
    }

    /// Height of the region (zero if bounds are inverted).
    #[inline]
    pub const fn height(&self) -> i32 {
        if self.bottom > self.top {
            self.bottom - self.top
        } else {
            0
        }
    }

    /// Whether the region covers no area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Whether two regions overlap (touching edges do not count).
    #[inline]
    pub const fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

// =============================================================================
// Lifecycle Phases
// =============================================================================

/// The mount lifecycle phases an extension can participate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    BeforeMount,
    AfterMount,
    VisibleBoundsChanged,
    Unmount,
    Unbind,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::BeforeMount => "before_mount",
            Phase::AfterMount => "after_mount",
            Phase::VisibleBoundsChanged => "on_visible_bounds_changed",
            Phase::Unmount => "on_unmount",
            Phase::Unbind => "on_unbind",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Extension Kinds
// =============================================================================

/// The kinds of mount participants a coordinator can host.
///
/// Each kind may be enabled at most once per coordinator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    IncrementalMount,
    Visibility,
    Transitions,
    EndToEndTest,
    DynamicProps,
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtensionKind::IncrementalMount => "incremental mount",
            ExtensionKind::Visibility => "visibility processing",
            ExtensionKind::Transitions => "transitions",
            ExtensionKind::EndToEndTest => "end-to-end test processing",
            ExtensionKind::DynamicProps => "dynamic props",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Mount Plan
// =============================================================================

/// One mountable item of a mount pass, with its bounds on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanItem {
    pub id: u64,
    pub bounds: Rect,
}

/// The mount input understood by the bundled extensions.
///
/// The coordinator itself never inspects the mount input; it forwards it as
/// `&dyn Any` and each extension downcasts to the shape it expects. This is
/// the shape the incremental-mount and visibility extensions expect.
#[derive(Debug, Clone, Default)]
pub struct MountPlan {
    pub items: Vec<PlanItem>,
}

impl MountPlan {
    /// Create a plan from a list of items.
    pub fn new(items: Vec<PlanItem>) -> Self {
        Self { items }
    }
}

// =============================================================================
// Render Unit Description
// =============================================================================

/// What the render-core construction path hands to binders: the identity of
/// the concrete unit being attached, detached, mounted or unmounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderUnitDescription {
    pub id: u64,
    pub name: &'static str,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(10, 20, 40, 80);
        assert_eq!(r.width(), 30);
        assert_eq!(r.height(), 60);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_rect_inverted_bounds_are_empty() {
        let r = Rect::new(40, 20, 10, 80);
        assert_eq!(r.width(), 0);
        assert!(r.is_empty());
    }

    #[test]
    fn test_rect_empty() {
        assert!(Rect::EMPTY.is_empty());
        assert!(Rect::new(5, 5, 5, 10).is_empty());
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 15, 15);
        let c = Rect::new(10, 0, 20, 10); // shares an edge with a
        let d = Rect::new(50, 50, 60, 60);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c)); // touching edges don't overlap
        assert!(!a.intersects(&d));
        assert!(!a.intersects(&Rect::EMPTY));
    }

    #[test]
    fn test_negative_coordinates() {
        // Scrolled-past-origin region still intersects content near origin.
        let visible = Rect::new(-5, -5, 5, 5);
        let item = Rect::new(0, 0, 3, 3);
        assert!(visible.intersects(&item));
        assert_eq!(visible.width(), 10);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Phase::BeforeMount.to_string(), "before_mount");
        assert_eq!(Phase::Unbind.to_string(), "on_unbind");
        assert_eq!(ExtensionKind::IncrementalMount.to_string(), "incremental mount");
        assert_eq!(ExtensionKind::DynamicProps.to_string(), "dynamic props");
    }
}
