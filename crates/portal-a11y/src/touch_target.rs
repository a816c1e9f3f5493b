//! Touch Target Audit
//!
//! Minimum target size checks for interactive elements (WCAG 2.5.5).
//! Each audit is a fresh snapshot; nothing is retained between runs.

use serde::Serialize;

use crate::config::TouchTargetConfig;
use crate::element::{ElementId, ElementTree, InteractiveNode, Size};

/// WCAG criterion covered by this audit
pub const WCAG_CRITERION: &str = "2.5.5 Target Size";

/// Why an element failed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchTargetProblem {
    /// Zero-area layout, e.g. not rendered yet
    Unmeasured,
    TooNarrow { width: f64, required: f64 },
    TooShort { height: f64, required: f64 },
}

impl TouchTargetProblem {
    pub fn recommendation(&self) -> String {
        match self {
            Self::Unmeasured => {
                "Element has no measured size; make sure it is laid out before auditing".to_string()
            }
            Self::TooNarrow { width, required } => {
                format!("Increase width from {width}px to at least {required}px")
            }
            Self::TooShort { height, required } => {
                format!("Increase height from {height}px to at least {required}px")
            }
        }
    }
}

/// Verdict for a single element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TouchTargetVerdict {
    pub element: ElementId,
    pub name: String,
    pub size: Size,
    pub is_valid: bool,
    pub problems: Vec<TouchTargetProblem>,
    /// One remediation per problem, in problem order
    pub recommendations: Vec<String>,
}

/// Failing element as reported in an [`AuditReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TouchTargetIssue {
    pub element: ElementId,
    pub name: String,
    pub size: Size,
    pub problems: Vec<TouchTargetProblem>,
    pub recommendations: Vec<String>,
    pub wcag_criterion: &'static str,
}

impl TouchTargetIssue {
    pub fn is_unmeasured(&self) -> bool {
        self.problems.contains(&TouchTargetProblem::Unmeasured)
    }
}

/// Audit summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    pub total: usize,
    pub compliant: usize,
    pub issues: Vec<TouchTargetIssue>,
}

impl AuditReport {
    pub fn passes(&self) -> bool {
        self.issues.is_empty()
    }

    /// Share of compliant elements; an empty audit counts as fully compliant
    pub fn compliance_rate(&self) -> f64 {
        if self.total == 0 { 1.0 } else { self.compliant as f64 / self.total as f64 }
    }
}

/// Touch target auditor
#[derive(Debug, Clone, Default)]
pub struct TouchTargetAuditor {
    config: TouchTargetConfig,
}

impl TouchTargetAuditor {
    pub fn new(config: TouchTargetConfig) -> Self {
        Self { config }
    }

    pub fn min_size(&self) -> f64 {
        self.config.min_size_px
    }

    /// Check one element. Width and height are judged independently.
    pub fn check<N: InteractiveNode + ?Sized>(&self, element: &N) -> TouchTargetVerdict {
        let size = element.measure();
        let required = self.config.min_size_px;
        let mut problems = Vec::new();

        if size.is_unmeasured() {
            problems.push(TouchTargetProblem::Unmeasured);
        }
        if size.width < required {
            problems.push(TouchTargetProblem::TooNarrow { width: size.width, required });
        }
        if size.height < required {
            problems.push(TouchTargetProblem::TooShort { height: size.height, required });
        }

        let recommendations = problems.iter().map(TouchTargetProblem::recommendation).collect();
        TouchTargetVerdict {
            element: element.id(),
            name: element.accessible_name(),
            size,
            is_valid: problems.is_empty(),
            problems,
            recommendations,
        }
    }

    /// Audit a set of elements in the given order
    pub fn audit<'a, N, I>(&self, elements: I) -> AuditReport
    where
        N: InteractiveNode + ?Sized + 'a,
        I: IntoIterator<Item = &'a N>,
    {
        let mut report = AuditReport::default();

        for element in elements {
            report.total += 1;
            let verdict = self.check(element);
            if verdict.is_valid {
                report.compliant += 1;
                continue;
            }
            tracing::trace!(element = %verdict.element, name = %verdict.name, "touch target below minimum");
            report.issues.push(TouchTargetIssue {
                element: verdict.element,
                name: verdict.name,
                size: verdict.size,
                problems: verdict.problems,
                recommendations: verdict.recommendations,
                wcag_criterion: WCAG_CRITERION,
            });
        }

        tracing::debug!(
            total = report.total,
            compliant = report.compliant,
            issues = report.issues.len(),
            min_size = self.config.min_size_px,
            "touch target audit"
        );
        report
    }

    /// Audit every interactive descendant of `root`
    pub fn audit_tree(&self, tree: &ElementTree, root: ElementId) -> AuditReport {
        self.audit(tree.interactive_within(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementDescriptor;

    struct Fixture {
        id: u32,
        size: Size,
    }

    impl InteractiveNode for Fixture {
        fn id(&self) -> ElementId { ElementId(self.id) }
        fn measure(&self) -> Size { self.size }
        fn is_focusable(&self) -> bool { true }
        fn accessible_name(&self) -> String { format!("fixture {}", self.id) }
        fn accepts_text_input(&self) -> bool { false }
    }

    fn fixture(id: u32, width: f64, height: f64) -> Fixture {
        Fixture { id, size: Size::new(width, height) }
    }

    #[test]
    fn test_exact_minimum_is_compliant() {
        let auditor = TouchTargetAuditor::default();
        let verdict = auditor.check(&fixture(1, 44.0, 44.0));
        assert!(verdict.is_valid);
        assert!(verdict.recommendations.is_empty());
    }

    #[test]
    fn test_width_only_failure() {
        let auditor = TouchTargetAuditor::default();
        let verdict = auditor.check(&fixture(1, 43.0, 44.0));
        assert!(!verdict.is_valid);
        assert_eq!(verdict.recommendations, vec!["Increase width from 43px to at least 44px".to_string()]);
    }

    #[test]
    fn test_height_only_failure() {
        let auditor = TouchTargetAuditor::default();
        let verdict = auditor.check(&fixture(1, 120.0, 32.5));
        assert_eq!(verdict.problems, vec![TouchTargetProblem::TooShort { height: 32.5, required: 44.0 }]);
        assert_eq!(verdict.recommendations[0], "Increase height from 32.5px to at least 44px");
    }

    #[test]
    fn test_unmeasured_is_reported() {
        let auditor = TouchTargetAuditor::default();
        let report = auditor.audit(&[fixture(1, 0.0, 0.0)]);
        assert_eq!(report.total, 1);
        assert_eq!(report.compliant, 0);
        assert!(report.issues[0].is_unmeasured());
        assert_eq!(report.issues[0].recommendations.len(), 3);
        assert_eq!(report.issues[0].wcag_criterion, WCAG_CRITERION);
    }

    #[test]
    fn test_configurable_minimum() {
        let auditor = TouchTargetAuditor::new(TouchTargetConfig { min_size_px: 24.0 });
        let report = auditor.audit(&[fixture(1, 24.0, 30.0), fixture(2, 20.0, 20.0)]);
        assert_eq!(report.compliant, 1);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].element, ElementId(2));
        assert_eq!(report.compliance_rate(), 0.5);
    }

    #[test]
    fn test_audit_tree() {
        let mut tree = ElementTree::new();
        let nav = tree.append(tree.root(), ElementDescriptor::new("nav")).unwrap();
        tree.append(nav, ElementDescriptor::new("a").with_href("/catalog").with_text("Catalog").with_size(80.0, 44.0)).unwrap();
        let icon = tree.append(nav, ElementDescriptor::new("button").with_label("Close").with_size(24.0, 24.0)).unwrap();
        tree.append(nav, ElementDescriptor::new("span").with_text("decorative").with_size(10.0, 10.0)).unwrap();

        let report = TouchTargetAuditor::default().audit_tree(&tree, tree.root());
        assert_eq!(report.total, 2);
        assert_eq!(report.compliant, 1);
        assert_eq!(report.issues[0].element, icon);
        assert_eq!(report.issues[0].name, "Close");
        assert!(!report.passes());
    }

    #[test]
    fn test_audit_tree_skips_hidden_subtree() {
        let mut tree = ElementTree::new();
        let dialog = tree.append(tree.root(), ElementDescriptor::new("div")).unwrap();
        let ok = tree.append(dialog, ElementDescriptor::new("button").with_text("OK").with_size(50.0, 50.0)).unwrap();
        let collapsed = tree.append(dialog, ElementDescriptor::new("div").hidden()).unwrap();
        tree.append(collapsed, ElementDescriptor::new("button").with_text("Ghost").with_size(10.0, 10.0)).unwrap();

        let report = TouchTargetAuditor::default().audit_tree(&tree, dialog);
        assert_eq!(report.total, 1);
        assert!(report.passes());
        assert_eq!(TouchTargetAuditor::default().audit_tree(&tree, collapsed).total, 0);
        assert!(tree.is_rendered(ok));
    }

    #[test]
    fn test_empty_audit() {
        let report = TouchTargetAuditor::default().audit(Vec::<&Fixture>::new());
        assert!(report.passes());
        assert_eq!(report.compliance_rate(), 1.0);
    }
}
