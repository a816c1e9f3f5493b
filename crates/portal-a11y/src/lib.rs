//! Portal Accessibility
//!
//! Accessibility compliance runtime for the wellness benefits portal.
//! The host UI layer feeds it element trees, colors and key events; it
//! answers with verdicts, focus moves and live-region text.
//!
//! Features:
//! - WCAG contrast ratio evaluation (AA / AAA)
//! - Touch target size auditing
//! - Focus trapping for modal containers
//! - Single-slot live region announcer
//! - Keyboard shortcut dispatch with text-entry suppression

pub mod config;
pub mod contrast;
pub mod element;
pub mod touch_target;
pub mod focus_trap;
pub mod announcer;
pub mod shortcuts;
pub mod runtime;

pub use config::{
    AnnouncerConfig, ComplianceConfig, ContrastConfig, FocusTrapConfig, TouchTargetConfig,
};
pub use contrast::{
    audit_palette, contrast_ratio, evaluate, evaluate_text, relative_luminance,
    suggest_compliant_foreground, Color, ColorPair, ComplianceLevel, ContrastResult,
    PaletteEntry, TextStyle,
};
pub use element::{ElementDescriptor, ElementId, ElementNode, ElementTree, InteractiveNode, Role, Size, TabIndex};
pub use touch_target::{AuditReport, TouchTargetAuditor, TouchTargetIssue, TouchTargetProblem, TouchTargetVerdict};
pub use focus_trap::{FocusTrap, SkipReason, TabDecision, TrapActivation};
pub use announcer::{Announcement, Announcer, ClearHandle, LiveRegionUpdate, Politeness, UpdateKind};
pub use shortcuts::{DispatchOutcome, KeyEvent, KeyboardShortcut, ShortcutDispatcher};
pub use runtime::{ComplianceRuntime, KeyOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Invalid color format {input:?}: {reason}")]
    InvalidColorFormat { input: String, reason: &'static str },

    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),

    #[error("Element tree is full ({0} nodes)")]
    TreeFull(usize),

    #[error("Shortcut already registered: {0}")]
    ShortcutConflict(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, A11yError>;
