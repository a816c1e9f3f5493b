//! Focus Trap
//!
//! Confines Tab / Shift+Tab cycling to a single container (modal dialogs).
//! The focusable set is recomputed from the tree on every evaluation.

use crate::config::FocusTrapConfig;
use crate::element::{ElementId, ElementTree};
use crate::{A11yError, Result};

/// Trap state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrapState {
    #[default]
    Inactive,
    Active {
        container: ElementId,
        /// Focus before activation, restored on release
        return_focus: Option<ElementId>,
    },
}

/// Why activation installed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Trapping an empty container would make it impossible to leave
    EmptyFocusableSet,
}

/// Result of [`FocusTrap::activate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapActivation {
    Installed {
        /// Focus to move into the container, if it is not already inside
        initial_focus: Option<ElementId>,
    },
    Skipped(SkipReason),
}

/// What the host should do with a Tab key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDecision {
    /// Let the default tab order proceed
    PassThrough,
    /// Suppress the default and focus this element
    MoveFocus(ElementId),
}

/// Single-container focus trap
#[derive(Debug, Default)]
pub struct FocusTrap {
    state: TrapState,
    config: FocusTrapConfig,
}

impl FocusTrap {
    pub fn new(config: FocusTrapConfig) -> Self {
        Self { state: TrapState::Inactive, config }
    }

    pub fn state(&self) -> TrapState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TrapState::Active { .. })
    }

    pub fn container(&self) -> Option<ElementId> {
        match self.state {
            TrapState::Active { container, .. } => Some(container),
            TrapState::Inactive => None,
        }
    }

    /// Trap focus inside `container`.
    ///
    /// A container without focusable descendants is left untrapped.
    /// Activating while already active moves the trap to the new container
    /// and keeps the original return focus.
    pub fn activate(
        &mut self,
        tree: &ElementTree,
        container: ElementId,
        focused: Option<ElementId>,
    ) -> Result<TrapActivation> {
        if !tree.contains(container) {
            return Err(A11yError::UnknownElement(container));
        }

        let focusable = tree.focusable_within(container);
        let Some(&first) = focusable.first() else {
            tracing::debug!(%container, "focus trap skipped: no focusable elements");
            return Ok(TrapActivation::Skipped(SkipReason::EmptyFocusableSet));
        };

        let return_focus = match self.state {
            TrapState::Active { return_focus, .. } => return_focus,
            TrapState::Inactive => focused,
        };
        self.state = TrapState::Active { container, return_focus };

        let inside = focused.is_some_and(|id| focusable.contains(&id));
        let initial_focus = if inside { None } else { Some(first) };
        tracing::debug!(%container, focusable = focusable.len(), ?initial_focus, "focus trap activated");
        Ok(TrapActivation::Installed { initial_focus })
    }

    /// Decide how a Tab (or Shift+Tab) press moves focus
    pub fn on_tab(&self, tree: &ElementTree, focused: Option<ElementId>, shift: bool) -> TabDecision {
        let TrapState::Active { container, .. } = self.state else {
            return TabDecision::PassThrough;
        };

        let focusable = tree.focusable_within(container);
        let (Some(&first), Some(&last)) = (focusable.first(), focusable.last()) else {
            // The container lost every focusable child since activation
            tracing::debug!(%container, "focus trap has nothing left to cycle");
            return TabDecision::PassThrough;
        };

        let Some(current) = focused.filter(|id| focusable.contains(id)) else {
            // Focus escaped or sits on a non-focusable node: pull it back in
            let target = if shift { last } else { first };
            tracing::trace!(%container, %target, "focus pulled back into trap");
            return TabDecision::MoveFocus(target);
        };

        if shift && current == first {
            tracing::trace!(%container, to = %last, "focus wrapped backward");
            TabDecision::MoveFocus(last)
        } else if !shift && current == last {
            tracing::trace!(%container, to = %first, "focus wrapped forward");
            TabDecision::MoveFocus(first)
        } else {
            TabDecision::PassThrough
        }
    }

    /// Escape handling; returns the focus to restore when the trap was released
    pub fn on_escape(&mut self, tree: &ElementTree) -> Option<Option<ElementId>> {
        if !self.config.escape_deactivates || !self.is_active() {
            return None;
        }
        Some(self.deactivate(tree))
    }

    /// Release the trap and return the element to refocus.
    ///
    /// `None` when the pre-activation element is gone from the document;
    /// the caller then picks a fallback.
    pub fn deactivate(&mut self, tree: &ElementTree) -> Option<ElementId> {
        let TrapState::Active { container, return_focus } = std::mem::take(&mut self.state) else {
            return None;
        };

        let restore = return_focus.filter(|&id| tree.contains(id) && tree.is_attached(id));
        tracing::debug!(%container, ?restore, "focus trap deactivated");
        restore
    }
}
