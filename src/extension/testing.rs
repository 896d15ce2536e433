//! End-to-end test probe - records every lifecycle hook it observes.
//!
//! Enabled only for instrumented surfaces; test harnesses query the recorded
//! phase sequence and last visible rect to assert what a mount pass did.

use std::any::Any;

use super::{HookResult, MountExtension};
use crate::types::{Phase, Rect};

/// Diagnostic extension for end-to-end surface tests.
pub struct EndToEndTestExtension {
    phases: Vec<Phase>,
    last_visible: Option<Rect>,
}

impl EndToEndTestExtension {
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            last_visible: None,
        }
    }

    /// Every phase observed so far, in dispatch order.
    pub fn recorded_phases(&self) -> &[Phase] {
        &self.phases
    }

    /// The visible rect of the most recent mount or bounds-change phase.
    pub fn last_visible_rect(&self) -> Option<Rect> {
        self.last_visible
    }
}

impl Default for EndToEndTestExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl MountExtension for EndToEndTestExtension {
    fn name(&self) -> &'static str {
        "end-to-end-test"
    }

    fn before_mount(&mut self, _input: &dyn Any, visible: Rect) -> HookResult {
        self.phases.push(Phase::BeforeMount);
        self.last_visible = Some(visible);
        Ok(())
    }

    fn after_mount(&mut self) -> HookResult {
        self.phases.push(Phase::AfterMount);
        Ok(())
    }

    fn on_visible_bounds_changed(&mut self, visible: Rect) -> HookResult {
        self.phases.push(Phase::VisibleBoundsChanged);
        self.last_visible = Some(visible);
        Ok(())
    }

    fn on_unmount(&mut self) -> HookResult {
        self.phases.push(Phase::Unmount);
        Ok(())
    }

    fn on_unbind(&mut self) -> HookResult {
        self.phases.push(Phase::Unbind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_records_phase_sequence() {
        let mut ext = EndToEndTestExtension::new();
        let visible = Rect::new(0, 0, 10, 10);

        ext.before_mount(&(), visible).unwrap();
        ext.on_visible_bounds_changed(Rect::new(0, 5, 10, 15)).unwrap();
        ext.after_mount().unwrap();
        ext.on_unbind().unwrap();
        ext.on_unmount().unwrap();

        assert_eq!(
            ext.recorded_phases(),
            &[
                Phase::BeforeMount,
                Phase::VisibleBoundsChanged,
                Phase::AfterMount,
                Phase::Unbind,
                Phase::Unmount,
            ]
        );
        assert_eq!(ext.last_visible_rect(), Some(Rect::new(0, 5, 10, 15)));
    }
}
