//! Keyboard Shortcuts
//!
//! Chorded global shortcuts. Dispatch is skipped while focus is in a
//! text entry control so shortcuts never intercept typing.

use std::fmt;

use crate::announcer::Announcement;
use crate::element::{ElementId, ElementTree};
use crate::{A11yError, Result};

/// Keyboard shortcut
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyboardShortcut {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyboardShortcut {
    pub fn new(key: &str) -> Self { Self { key: key.into(), ctrl: false, alt: false, shift: false, meta: false } }
    pub fn ctrl(mut self) -> Self { self.ctrl = true; self }
    pub fn alt(mut self) -> Self { self.alt = true; self }
    pub fn shift(mut self) -> Self { self.shift = true; self }
    pub fn meta(mut self) -> Self { self.meta = true; self }

    /// Parse `Ctrl+Alt+K` style chords
    pub fn parse(chord: &str) -> Option<Self> {
        let mut parts: Vec<&str> = chord.split('+').map(str::trim).collect();
        let key = parts.pop().filter(|k| !k.is_empty())?;
        let mut shortcut = Self::new(key);
        for modifier in parts {
            shortcut = match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => shortcut.ctrl(),
                "alt" | "option" => shortcut.alt(),
                "shift" => shortcut.shift(),
                "cmd" | "meta" | "super" => shortcut.meta(),
                _ => return None,
            };
        }
        Some(shortcut)
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl { parts.push("Ctrl"); }
        if self.alt { parts.push("Alt"); }
        if self.shift { parts.push("Shift"); }
        if self.meta { parts.push("Cmd"); }
        parts.push(&self.key);
        parts.join("+")
    }

    /// Key compared case-insensitively; every modifier must match exactly
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key.eq_ignore_ascii_case(&event.key)
            && self.ctrl == event.ctrl
            && self.alt == event.alt
            && self.shift == event.shift
            && self.meta == event.meta
    }

    fn conflicts_with(&self, other: &KeyboardShortcut) -> bool {
        self.key.eq_ignore_ascii_case(&other.key)
            && (self.ctrl, self.alt, self.shift, self.meta) == (other.ctrl, other.alt, other.shift, other.meta)
    }
}

impl fmt::Display for KeyboardShortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Raw key event from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    /// Element the event was delivered to
    pub target: Option<ElementId>,
}

impl KeyEvent {
    pub fn new(key: &str) -> Self {
        Self { key: key.into(), ctrl: false, alt: false, shift: false, meta: false, target: None }
    }

    pub fn ctrl(mut self) -> Self { self.ctrl = true; self }
    pub fn alt(mut self) -> Self { self.alt = true; self }
    pub fn shift(mut self) -> Self { self.shift = true; self }
    pub fn meta(mut self) -> Self { self.meta = true; self }

    pub fn on(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn is_tab(&self) -> bool {
        self.key.eq_ignore_ascii_case("Tab") && !self.ctrl && !self.alt && !self.meta
    }

    pub fn is_escape(&self) -> bool {
        self.key.eq_ignore_ascii_case("Escape") || self.key.eq_ignore_ascii_case("Esc")
    }
}

/// Result of [`ShortcutDispatcher::dispatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A binding ran; the host must suppress the default action
    Handled {
        shortcut: String,
        description: String,
        announcement: Announcement,
        prevent_default: bool,
    },
    /// Target is a text entry control
    Suppressed,
    /// No binding; the event passes through untouched
    Unmatched,
}

struct Binding {
    shortcut: KeyboardShortcut,
    description: String,
    action: Box<dyn FnMut()>,
}

/// Shortcut registry and dispatcher
pub struct ShortcutDispatcher {
    bindings: Vec<Binding>,
    enabled: bool,
}

impl fmt::Debug for ShortcutDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcutDispatcher")
            .field("bindings", &self.help_entries())
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Default for ShortcutDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutDispatcher {
    pub fn new() -> Self {
        Self { bindings: Vec::new(), enabled: true }
    }

    pub fn set_enabled(&mut self, enabled: bool) { self.enabled = enabled; }
    pub fn is_enabled(&self) -> bool { self.enabled }
    pub fn len(&self) -> usize { self.bindings.len() }
    pub fn is_empty(&self) -> bool { self.bindings.is_empty() }

    /// Register a binding. A chord that is already bound is rejected and
    /// the existing binding stays in force.
    pub fn register(
        &mut self,
        shortcut: KeyboardShortcut,
        description: &str,
        action: impl FnMut() + 'static,
    ) -> Result<()> {
        if self.bindings.iter().any(|b| b.shortcut.conflicts_with(&shortcut)) {
            tracing::warn!(shortcut = %shortcut, "shortcut already registered");
            return Err(A11yError::ShortcutConflict(shortcut.display()));
        }
        tracing::debug!(shortcut = %shortcut, description, "shortcut registered");
        self.bindings.push(Binding { shortcut, description: description.into(), action: Box::new(action) });
        Ok(())
    }

    pub fn unregister(&mut self, shortcut: &KeyboardShortcut) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| !b.shortcut.conflicts_with(shortcut));
        before != self.bindings.len()
    }

    /// Bound chords and their descriptions, in registration order
    pub fn help_entries(&self) -> Vec<(String, &str)> {
        self.bindings.iter().map(|b| (b.shortcut.display(), b.description.as_str())).collect()
    }

    /// Match `event` against the registry and run the binding's action
    pub fn dispatch(&mut self, event: &KeyEvent, tree: &ElementTree) -> DispatchOutcome {
        if !self.enabled {
            return DispatchOutcome::Unmatched;
        }
        if event.target.is_some_and(|target| tree.is_within_text_entry(target)) {
            tracing::trace!(key = %event.key, "shortcut dispatch suppressed in text entry");
            return DispatchOutcome::Suppressed;
        }

        let Some(binding) = self.bindings.iter_mut().find(|b| b.shortcut.matches(event)) else {
            return DispatchOutcome::Unmatched;
        };

        tracing::debug!(shortcut = %binding.shortcut, "shortcut dispatched");
        (binding.action)();
        DispatchOutcome::Handled {
            shortcut: binding.shortcut.display(),
            description: binding.description.clone(),
            announcement: Announcement::polite(binding.description.clone()),
            prevent_default: true,
        }
    }
}
