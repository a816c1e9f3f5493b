//! Element Model
//!
//! Host-supplied snapshot of interactive elements. The auditor and the
//! focus trap only see elements through [`InteractiveNode`], so tests can
//! use synthetic fixtures instead of a rendering engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{A11yError, Result};

/// Element identifier (index into the tree arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Root node ID
    pub const ROOT: ElementId = ElementId(0);
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Measured size in device-independent pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// No layout data (zero area)
    pub fn is_unmeasured(&self) -> bool {
        let area = self.area();
        area.is_nan() || area <= 0.0
    }
}

/// What the compliance engine needs to know about an element
pub trait InteractiveNode {
    fn id(&self) -> ElementId;
    fn measure(&self) -> Size;
    fn is_focusable(&self) -> bool;
    fn accessible_name(&self) -> String;
    /// Accepts free-form text entry
    fn accepts_text_input(&self) -> bool;
}

/// ARIA role subset relevant to interactive surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Button,
    Link,
    Checkbox,
    Radio,
    Switch,
    Tab,
    MenuItem,
    ListBoxOption,
    Slider,
    TextBox,
    SearchBox,
    ComboBox,
    Dialog,
    AlertDialog,
    Generic,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "button" => Self::Button,
            "link" => Self::Link,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "switch" => Self::Switch,
            "tab" => Self::Tab,
            "menuitem" => Self::MenuItem,
            "option" => Self::ListBoxOption,
            "slider" => Self::Slider,
            "textbox" => Self::TextBox,
            "searchbox" => Self::SearchBox,
            "combobox" => Self::ComboBox,
            "dialog" => Self::Dialog,
            "alertdialog" => Self::AlertDialog,
            "generic" | "presentation" | "none" => Self::Generic,
            _ => return None,
        })
    }

    /// Check if this is a widget role
    pub fn is_widget(&self) -> bool {
        !matches!(self, Self::Dialog | Self::AlertDialog | Self::Generic)
    }

    pub fn is_text_entry(&self) -> bool {
        matches!(self, Self::TextBox | Self::SearchBox)
    }
}

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    NotFocusable,       // tabindex="-1" or unparseable
    Sequential(i32),    // tabindex="0" or positive
}

impl TabIndex {
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Self::NotFocusable,
            Ok(n) => Self::Sequential(n),
            Err(_) => Self::NotFocusable,
        }
    }

    pub fn from_value(value: i32) -> Self {
        if value < 0 { Self::NotFocusable } else { Self::Sequential(value) }
    }

    pub fn is_focusable(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}

/// Input types that take free-form text
const TEXT_INPUT_TYPES: &[&str] = &[
    "text", "search", "email", "password", "tel", "url", "number",
    "date", "datetime-local", "month", "time", "week",
];

/// Element description supplied by the host rendering layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementDescriptor {
    /// Lowercase tag name
    pub tag: String,
    pub role: Option<Role>,
    /// aria-label or equivalent
    pub label: Option<String>,
    /// Visible text content
    pub text: String,
    pub size: Size,
    pub tab_index: Option<i32>,
    pub href: Option<String>,
    pub input_type: Option<String>,
    pub disabled: bool,
    pub hidden: bool,
    pub content_editable: bool,
}

impl ElementDescriptor {
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_ascii_lowercase(), ..Default::default() }
    }

    pub fn with_role(mut self, role: Role) -> Self { self.role = Some(role); self }
    pub fn with_label(mut self, label: &str) -> Self { self.label = Some(label.into()); self }
    pub fn with_text(mut self, text: &str) -> Self { self.text = text.into(); self }
    pub fn with_size(mut self, width: f64, height: f64) -> Self { self.size = Size::new(width, height); self }
    pub fn with_tab_index(mut self, tab_index: i32) -> Self { self.tab_index = Some(tab_index); self }
    pub fn with_href(mut self, href: &str) -> Self { self.href = Some(href.into()); self }
    pub fn with_input_type(mut self, input_type: &str) -> Self { self.input_type = Some(input_type.to_ascii_lowercase()); self }
    pub fn disabled(mut self) -> Self { self.disabled = true; self }
    pub fn hidden(mut self) -> Self { self.hidden = true; self }
    pub fn content_editable(mut self) -> Self { self.content_editable = true; self }

    fn is_native_control(&self) -> bool {
        match self.tag.as_str() {
            "button" | "select" | "textarea" => true,
            "input" => self.input_type.as_deref() != Some("hidden"),
            "a" | "area" => self.href.is_some(),
            _ => false,
        }
    }

    /// In the sequential (Tab) focus order
    pub fn is_focusable(&self) -> bool {
        if self.disabled || self.hidden {
            return false;
        }
        match self.tab_index.map(TabIndex::from_value) {
            Some(tab_index) => tab_index.is_focusable(),
            None => self.is_native_control() || self.content_editable,
        }
    }

    pub fn accepts_text_input(&self) -> bool {
        if self.content_editable || self.role.is_some_and(|r| r.is_text_entry()) {
            return true;
        }
        match self.tag.as_str() {
            "textarea" => true,
            // Missing type defaults to "text"
            "input" => self
                .input_type
                .as_deref()
                .map_or(true, |t| TEXT_INPUT_TYPES.contains(&t)),
            _ => false,
        }
    }

    /// Focusable or carrying a widget role
    pub fn is_interactive(&self) -> bool {
        self.is_focusable() || (!self.hidden && self.role.is_some_and(|r| r.is_widget()))
    }

    /// Label first, then visible text
    pub fn accessible_name(&self) -> String {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => self.text.trim().to_string(),
        }
    }
}

/// Element node stored in the tree
#[derive(Debug, Clone)]
pub struct ElementNode {
    pub id: ElementId,
    pub descriptor: ElementDescriptor,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl ElementNode {
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

impl InteractiveNode for ElementNode {
    fn id(&self) -> ElementId { self.id }
    fn measure(&self) -> Size { self.descriptor.size }
    fn is_focusable(&self) -> bool { self.descriptor.is_focusable() }
    fn accessible_name(&self) -> String { self.descriptor.accessible_name() }
    fn accepts_text_input(&self) -> bool { self.descriptor.accepts_text_input() }
}

/// Arena slot `len` as an id; fails once the arena outgrows `u32`
fn next_id(len: usize) -> Result<ElementId> {
    u32::try_from(len).map(ElementId).map_err(|_| A11yError::TreeFull(len))
}

/// Snapshot of the host's element tree
#[derive(Debug)]
pub struct ElementTree {
    nodes: Vec<ElementNode>,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        let root = ElementNode {
            id: ElementId::ROOT,
            descriptor: ElementDescriptor::new("#document"),
            parent: None,
            children: Vec::new(),
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> ElementId {
        ElementId::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Append a child element
    pub fn append(&mut self, parent: ElementId, descriptor: ElementDescriptor) -> Result<ElementId> {
        self.check(parent)?;
        let id = next_id(self.nodes.len())?;
        self.nodes.push(ElementNode { id, descriptor, parent: Some(parent), children: Vec::new() });
        self.nodes[parent.0 as usize].children.push(id);
        Ok(id)
    }

    /// Detach a subtree from its parent. The nodes stay addressable.
    pub fn detach(&mut self, id: ElementId) -> Result<()> {
        self.check(id)?;
        if let Some(parent) = self.nodes[id.0 as usize].parent.take() {
            self.nodes[parent.0 as usize].children.retain(|&c| c != id);
        }
        Ok(())
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Mutable access to an element's description. Links are only changed
    /// through [`append`](Self::append) and [`detach`](Self::detach).
    pub fn descriptor_mut(&mut self, id: ElementId) -> Option<&mut ElementDescriptor> {
        self.nodes.get_mut(id.0 as usize).map(|n| &mut n.descriptor)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        (id.0 as usize) < self.nodes.len()
    }

    /// Connected to the document root
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.ancestors_inclusive(id).last() == Some(ElementId::ROOT)
    }

    /// `id` and its ancestors, nearest first
    pub fn ancestors_inclusive(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let start = self.get(id).map(|n| n.id);
        std::iter::successors(start, move |current| self.get(*current).and_then(|n| n.parent))
    }

    /// `node` is `ancestor` or one of its descendants
    pub fn is_inclusive_descendant(&self, node: ElementId, ancestor: ElementId) -> bool {
        self.ancestors_inclusive(node).any(|id| id == ancestor)
    }

    /// Descendants of `root` in document (pre-)order, excluding `root`
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let Some(node) = self.get(root) else {
            return out;
        };
        let mut stack: Vec<ElementId> = node.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.get(id) {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Neither `id` nor any of its ancestors is hidden
    pub fn is_rendered(&self, id: ElementId) -> bool {
        self.contains(id)
            && !self
                .ancestors_inclusive(id)
                .filter_map(|a| self.get(a))
                .any(|n| n.descriptor.hidden)
    }

    /// The focusable set of a container, in document order.
    ///
    /// Computed on every call; container mutations invalidate any earlier result.
    /// Elements inside a hidden subtree cannot take focus and are left out.
    pub fn focusable_within(&self, container: ElementId) -> Vec<ElementId> {
        self.rendered_descendants(container)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(|n| n.is_focusable()))
            .collect()
    }

    /// Rendered interactive descendants of `root` in document order
    pub fn interactive_within(&self, root: ElementId) -> Vec<&ElementNode> {
        self.rendered_descendants(root)
            .into_iter()
            .filter_map(|id| self.get(id))
            .filter(|n| n.descriptor.is_interactive())
            .collect()
    }

    /// Descendants of `root` outside any hidden subtree
    fn rendered_descendants(&self, root: ElementId) -> Vec<ElementId> {
        if !self.is_rendered(root) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let Some(node) = self.get(root) else {
            return out;
        };
        let mut stack: Vec<ElementId> = node.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            if node.descriptor.hidden {
                continue;
            }
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// `id` is, or sits inside, a text entry control
    pub fn is_within_text_entry(&self, id: ElementId) -> bool {
        self.ancestors_inclusive(id)
            .filter_map(|a| self.get(a))
            .any(|n| n.accepts_text_input())
    }

    fn check(&self, id: ElementId) -> Result<()> {
        if self.contains(id) { Ok(()) } else { Err(A11yError::UnknownElement(id)) }
    }
}
