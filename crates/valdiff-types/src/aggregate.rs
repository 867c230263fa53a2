//! Difference aggregation and message rendering.
//!
//! An [`AggregatedDifference`] is created per top-level comparison call,
//! populated during the single recursive walk, and consumed once to render a
//! message. The tree is a tagged union of leaves and groups; it is flattened
//! lazily, only when a message is actually rendered.

use crate::record::{DiffKind, DifferenceRecord};

/// Maximum number of detail lines in a rendered message.
///
/// The cap is raised by one when that is enough to leave at most a single
/// difference hidden, so one lone difference is never omitted.
pub const MAX_DETAIL_LINES: usize = 10;

/// A node in the difference tree: a single record, or a labeled subtree
/// merged in from a nested comparison.
#[derive(Clone, Debug)]
pub enum DiffNode {
    Leaf(DifferenceRecord),
    Group {
        /// Label of the nested subject (member path or element label).
        label: String,
        children: Vec<DiffNode>,
        /// Whether the nested comparison was reordering-only.
        equivalent: bool,
    },
}

/// Accumulator for the differences found by one comparison call.
///
/// `equivalent` stays `true` only while every recorded difference is
/// attributable to pure reordering; any value, attribute, missing, extra or
/// found-instead-of record clears it.
#[derive(Clone, Debug, Default)]
pub struct AggregatedDifference {
    nodes: Vec<DiffNode>,
    different: bool,
    equivalent_broken: bool,
}

impl AggregatedDifference {
    /// An empty accumulator (no differences).
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single difference.
    pub fn record(&mut self, record: DifferenceRecord) {
        self.different = true;
        if !record.kind().preserves_equivalence() {
            self.equivalent_broken = true;
        }
        self.nodes.push(DiffNode::Leaf(record));
    }

    /// Merge a nested comparison result in as a labeled subtree.
    ///
    /// Merging a non-different result is a no-op.
    pub fn merge(&mut self, label: impl Into<String>, other: AggregatedDifference) {
        if !other.different {
            return;
        }
        self.different = true;
        if !other.is_equivalent() {
            self.equivalent_broken = true;
        }
        self.nodes.push(DiffNode::Group {
            label: label.into(),
            equivalent: other.is_equivalent(),
            children: other.nodes,
        });
    }

    /// Whether any difference was recorded.
    pub fn is_different(&self) -> bool {
        self.different
    }

    /// Whether every recorded difference is pure reordering.
    ///
    /// Only meaningful when [`is_different`](Self::is_different) is `true`;
    /// vacuously `true` for an empty accumulator.
    pub fn is_equivalent(&self) -> bool {
        !self.equivalent_broken
    }

    /// The flattened leaf records, in recording order.
    pub fn leaves(&self) -> Vec<&DifferenceRecord> {
        let mut out = Vec::new();
        fn walk<'a>(nodes: &'a [DiffNode], out: &mut Vec<&'a DifferenceRecord>) {
            for node in nodes {
                match node {
                    DiffNode::Leaf(rec) => out.push(rec),
                    DiffNode::Group { children, .. } => walk(children, out),
                }
            }
        }
        walk(&self.nodes, &mut out);
        out
    }

    /// Number of flattened leaf records.
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Number of leaf records of the given kind.
    pub fn count_of(&self, kind: DiffKind) -> usize {
        self.leaves().iter().filter(|r| r.kind() == kind).count()
    }

    /// Render the deterministic failure message.
    ///
    /// The header carries a singular/plural difference count between the two
    /// labels; detail lines are the flattened leaves, capped at
    /// [`MAX_DETAIL_LINES`] with the single-omission grace rule and an
    /// omission trailer; when `for_equivalence` is set and the tree is
    /// reordering-only, the equivalence suffix is appended.
    pub fn render_message(
        &self,
        subject_label: &str,
        expected_label: &str,
        for_equivalence: bool,
    ) -> String {
        if !self.different {
            return format!("{subject_label} and {expected_label} are equal.");
        }

        let leaves = self.leaves();
        let total = leaves.len();
        let mut lines = Vec::with_capacity(total.min(MAX_DETAIL_LINES) + 3);
        if total == 1 {
            lines.push(format!(
                "1 difference found between {subject_label} and {expected_label}:"
            ));
        } else {
            lines.push(format!(
                "{total} differences found between {subject_label} and {expected_label}:"
            ));
        }

        // Raise the cap by one when that leaves at most one line hidden.
        let shown = if total <= MAX_DETAIL_LINES + 2 {
            total.min(MAX_DETAIL_LINES + 1)
        } else {
            MAX_DETAIL_LINES
        };
        for leaf in leaves.iter().take(shown) {
            lines.push(format!("  {leaf}"));
        }
        let omitted = total - shown;
        if omitted > 0 {
            lines.push(format!("({omitted} differences omitted)"));
        }

        if for_equivalence && self.is_equivalent() {
            lines.push("But they are equivalent.".to_string());
        }

        lines.join("\n")
    }
}
