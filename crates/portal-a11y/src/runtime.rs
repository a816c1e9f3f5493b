//! Compliance Runtime
//!
//! Host-side composition of the announcer, shortcut dispatcher and focus
//! trap. The components never reference each other; this is where key
//! events are routed between them and dispatcher announcements reach the
//! live region.

use crate::announcer::Announcer;
use crate::config::ComplianceConfig;
use crate::contrast::{self, ContrastResult, TextStyle};
use crate::element::{ElementId, ElementTree};
use crate::focus_trap::{FocusTrap, TabDecision, TrapActivation};
use crate::shortcuts::{DispatchOutcome, KeyEvent, ShortcutDispatcher};
use crate::touch_target::{AuditReport, TouchTargetAuditor};
use crate::Result;

/// What the host applies after a key event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// Suppress the browser default for this key
    pub prevent_default: bool,
    /// Element to focus next
    pub focus: Option<ElementId>,
    /// Shortcut dispatch result, when the event reached the dispatcher
    pub dispatch: Option<DispatchOutcome>,
}

/// Compliance runtime owned by the host application
#[derive(Debug)]
pub struct ComplianceRuntime {
    config: ComplianceConfig,
    announcer: Announcer,
    shortcuts: ShortcutDispatcher,
    focus_trap: FocusTrap,
    auditor: TouchTargetAuditor,
}

impl ComplianceRuntime {
    pub fn new(config: ComplianceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            announcer: Announcer::new(config.announcer.clone()),
            shortcuts: ShortcutDispatcher::new(),
            focus_trap: FocusTrap::new(config.focus_trap.clone()),
            auditor: TouchTargetAuditor::new(config.touch_target.clone()),
            config,
        })
    }

    pub fn config(&self) -> &ComplianceConfig { &self.config }
    pub fn announcer(&self) -> &Announcer { &self.announcer }
    pub fn announcer_mut(&mut self) -> &mut Announcer { &mut self.announcer }
    pub fn shortcuts(&self) -> &ShortcutDispatcher { &self.shortcuts }
    pub fn shortcuts_mut(&mut self) -> &mut ShortcutDispatcher { &mut self.shortcuts }
    pub fn focus_trap(&self) -> &FocusTrap { &self.focus_trap }

    /// Trap focus in a modal container; returns the element to focus first
    pub fn open_modal(
        &mut self,
        tree: &ElementTree,
        container: ElementId,
        focused: Option<ElementId>,
    ) -> Result<Option<ElementId>> {
        match self.focus_trap.activate(tree, container, focused)? {
            TrapActivation::Installed { initial_focus } => Ok(initial_focus),
            TrapActivation::Skipped(_) => Ok(None),
        }
    }

    /// Release the modal trap; returns the element to refocus
    pub fn close_modal(&mut self, tree: &ElementTree) -> Option<ElementId> {
        self.focus_trap.deactivate(tree)
    }

    /// Route a key event: Tab to the trap, Escape to trap release,
    /// everything else to the shortcut dispatcher.
    pub fn handle_key(
        &mut self,
        tree: &ElementTree,
        event: &KeyEvent,
        focused: Option<ElementId>,
        now_ms: u64,
    ) -> KeyOutcome {
        if self.focus_trap.is_active() {
            if event.is_tab() {
                return match self.focus_trap.on_tab(tree, focused, event.shift) {
                    TabDecision::MoveFocus(target) => {
                        KeyOutcome { prevent_default: true, focus: Some(target), dispatch: None }
                    }
                    TabDecision::PassThrough => KeyOutcome::default(),
                };
            }
            if event.is_escape() {
                if let Some(restore) = self.focus_trap.on_escape(tree) {
                    return KeyOutcome { prevent_default: true, focus: restore, dispatch: None };
                }
            }
        }

        let outcome = self.shortcuts.dispatch(event, tree);
        let prevent_default = match &outcome {
            DispatchOutcome::Handled { announcement, prevent_default, .. } => {
                self.announcer.announce(announcement.message.clone(), announcement.politeness, now_ms);
                *prevent_default
            }
            DispatchOutcome::Suppressed | DispatchOutcome::Unmatched => false,
        };
        KeyOutcome { prevent_default, focus: None, dispatch: Some(outcome) }
    }

    /// Advance the announcer clock
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.announcer.tick(now_ms)
    }

    pub fn audit_touch_targets(&self, tree: &ElementTree, root: ElementId) -> AuditReport {
        self.auditor.audit_tree(tree, root)
    }

    /// Contrast check using the configured large-text thresholds
    pub fn evaluate_contrast(&self, foreground: &str, background: &str, style: TextStyle) -> Result<ContrastResult> {
        contrast::evaluate_text(foreground, background, style, &self.config.contrast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementDescriptor;
    use crate::shortcuts::KeyboardShortcut;

    #[test]
    fn test_invalid_config_rejected() {
        let config = ComplianceConfig::default().with_min_touch_target(-1.0);
        assert!(ComplianceRuntime::new(config).is_err());
    }

    #[test]
    fn test_tab_without_trap_passes_through() {
        let mut tree = ElementTree::new();
        let button = tree.append(tree.root(), ElementDescriptor::new("button")).unwrap();
        let mut runtime = ComplianceRuntime::new(ComplianceConfig::default()).unwrap();

        let outcome = runtime.handle_key(&tree, &KeyEvent::new("Tab").on(button), Some(button), 0);
        assert!(!outcome.prevent_default);
        assert_eq!(outcome.dispatch, Some(DispatchOutcome::Unmatched));
    }

    #[test]
    fn test_shortcut_announces() {
        let mut tree = ElementTree::new();
        let body = tree.append(tree.root(), ElementDescriptor::new("div")).unwrap();
        let mut runtime = ComplianceRuntime::new(ComplianceConfig::default()).unwrap();
        runtime.shortcuts_mut().register(KeyboardShortcut::new("1").alt(), "Go to services", || {}).unwrap();

        let outcome = runtime.handle_key(&tree, &KeyEvent::new("1").alt().on(body), None, 0);
        assert!(outcome.prevent_default);
        assert_eq!(runtime.announcer().message(), "Go to services");
        assert!(runtime.tick(1000));
        assert_eq!(runtime.announcer().message(), "");
    }

    #[test]
    fn test_large_text_threshold() {
        let runtime = ComplianceRuntime::new(ComplianceConfig::default()).unwrap();
        let result = runtime.evaluate_contrast("#767676", "#ffffff", TextStyle::new(24.0)).unwrap();
        assert_eq!(result.required_ratio, 3.0);
        let result = runtime.evaluate_contrast("#767676", "#ffffff", TextStyle::new(16.0)).unwrap();
        assert_eq!(result.required_ratio, 4.5);
    }
}
