//! Graph nodes: a value wrapped with its path, declared type and criteria.
//!
//! Children are created on demand and never cached beyond one traversal, so
//! a node is cheap to build and holds no state besides the wrapped value
//! (shared via `Rc` for records, cloned for everything else).

use valdiff_types::{Criteria, Member, MemberKind, Value};

/// A node in an object graph walk.
#[derive(Clone, Debug)]
pub struct GraphNode {
    /// Dotted path from the root, e.g. `Order.lines[2].price`.
    pub path: String,
    /// Display label of this node within its parent: `field 'x'`,
    /// `property 'y'`, `autoproperty 'z'`, or an index like `[2]`. Empty at
    /// the root. Children are paired by this label.
    pub label: String,
    /// Declared type of the value at this node.
    pub declared_type: String,
    /// The wrapped value. Records are shared, not owned.
    pub value: Value,
    /// Member-selection criteria, inherited by every child.
    pub criteria: Criteria,
}

/// Build the root node of an object graph.
pub fn build_graph(value: Value, declared_type: impl Into<String>, criteria: Criteria) -> GraphNode {
    let declared_type = declared_type.into();
    GraphNode {
        path: declared_type.clone(),
        label: String::new(),
        declared_type,
        value,
        criteria,
    }
}

impl GraphNode {
    /// Enumerate this node's children under the criteria.
    ///
    /// Record members are filtered by kind, visibility and excluded names,
    /// and their raw names normalized; arrays and sequences expand into
    /// per-element synthetic members named by index. Scalars have none.
    pub fn children(&self) -> Vec<GraphNode> {
        match &self.value {
            Value::Record(rec) => rec
                .members
                .borrow()
                .iter()
                .filter(|m| self.criteria.admits(m.kind, m.visibility, &m.name))
                .map(|m| self.member_child(m))
                .collect(),
            Value::Seq(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.element_child(format!("[{i}]"), item.clone()))
                .collect(),
            Value::Array { dims, elems } => elems
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    self.element_child(format!("[{}]", coordinate_label(dims, i)), item.clone())
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn member_child(&self, member: &Member) -> GraphNode {
        let (label, simple) = normalize_member_name(&member.name, member.kind);
        GraphNode {
            path: format!("{}.{}", self.path, simple),
            label,
            declared_type: member.value.type_name(),
            value: member.value.clone(),
            criteria: self.criteria.clone(),
        }
    }

    fn element_child(&self, index_label: String, value: Value) -> GraphNode {
        GraphNode {
            path: format!("{}{}", self.path, index_label),
            declared_type: value.type_name(),
            label: index_label,
            value,
            criteria: self.criteria.clone(),
        }
    }
}

/// Reconstruct the multi-dimensional coordinate of a row-major flat index.
///
/// Rank-1 arrays keep the plain flat index.
pub fn coordinate_label(dims: &[usize], flat: usize) -> String {
    if dims.len() <= 1 {
        return flat.to_string();
    }
    let mut coords = vec![0usize; dims.len()];
    let mut rest = flat;
    for (axis, dim) in dims.iter().enumerate().rev() {
        let dim = (*dim).max(1);
        coords[axis] = rest % dim;
        rest /= dim;
    }
    coords
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Normalize a raw member name into its display label plus the simple name
/// used for path construction.
///
/// Auto-generated property backing fields (`<Name>k__BackingField`) are
/// relabeled `autoproperty 'Name'`; anonymous-type synthetic fields
/// (`<Name>i__Field`) become `field 'Name'`; everything else is labeled by
/// its member kind.
pub fn normalize_member_name(raw: &str, kind: MemberKind) -> (String, String) {
    if let Some(inner) = synthetic_target(raw, ">k__BackingField") {
        return (format!("autoproperty '{inner}'"), inner.to_string());
    }
    if let Some(inner) = synthetic_target(raw, ">i__Field") {
        return (format!("field '{inner}'"), inner.to_string());
    }
    let label = match kind {
        MemberKind::Field => format!("field '{raw}'"),
        MemberKind::Property => format!("property '{raw}'"),
    };
    (label, raw.to_string())
}

fn synthetic_target<'a>(raw: &'a str, suffix: &str) -> Option<&'a str> {
    raw.strip_prefix('<')?.strip_suffix(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use valdiff_types::{IntValue, Visibility};

    fn int(v: i32) -> Value {
        Value::Int(IntValue::I32(v))
    }

    #[test]
    fn scalar_nodes_have_no_children() {
        let node = build_graph(int(1), "i32", Criteria::default());
        assert!(node.children().is_empty());
    }

    #[test]
    fn record_children_follow_criteria() {
        let value = Value::record(
            "Account",
            vec![
                Member::field("id", int(1)),
                Member::field("hidden", int(2)).with_visibility(Visibility::NonPublic),
                Member::property("label", Value::Str("x".into())),
            ],
        );
        let node = build_graph(value.clone(), "Account", Criteria::default());
        let labels: Vec<String> = node.children().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["field 'id'", "property 'label'"]);

        let fields_only = build_graph(value, "Account", Criteria::fields());
        let labels: Vec<String> = fields_only.children().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["field 'id'"]);
    }

    #[test]
    fn backing_field_is_relabeled_as_autoproperty() {
        let (label, simple) =
            normalize_member_name("<Count>k__BackingField", MemberKind::Field);
        assert_eq!(label, "autoproperty 'Count'");
        assert_eq!(simple, "Count");
    }

    #[test]
    fn anonymous_synthetic_field_is_relabeled() {
        let (label, simple) = normalize_member_name("<Total>i__Field", MemberKind::Field);
        assert_eq!(label, "field 'Total'");
        assert_eq!(simple, "Total");
    }

    #[test]
    fn ordinary_names_get_kind_labels() {
        let (label, _) = normalize_member_name("price", MemberKind::Property);
        assert_eq!(label, "property 'price'");
    }

    #[test]
    fn sequence_expands_by_index() {
        let node = build_graph(Value::seq([int(5), int(6)]), "seq", Criteria::default());
        let children = node.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].label, "[0]");
        assert_eq!(children[1].path, "seq[1]");
    }

    #[test]
    fn multi_dim_array_uses_coordinate_labels() {
        let elems: Vec<Value> = (0..6).map(int).collect();
        let value = Value::array(vec![2, 3], elems).unwrap();
        let node = build_graph(value, "grid", Criteria::default());
        let labels: Vec<String> = node.children().into_iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            vec!["[0, 0]", "[0, 1]", "[0, 2]", "[1, 0]", "[1, 1]", "[1, 2]"]
        );
    }

    #[test]
    fn rank_one_array_keeps_flat_index() {
        assert_eq!(coordinate_label(&[4], 2), "2");
        assert_eq!(coordinate_label(&[2, 2], 3), "1, 1");
    }
}
