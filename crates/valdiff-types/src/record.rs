//! The difference record: one reported discrepancy.

use std::fmt;

use crate::value::Value;

/// Classification of a single reported discrepancy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DiffKind {
    /// The two values differ as opaque leaves.
    Value,
    /// A structural attribute (array rank, dimension length) differs.
    Attribute,
    /// Contents match but ordering differs.
    Equivalent,
    /// An expected element or member was not found.
    Missing,
    /// An actual element or member was not expected.
    Extra,
    /// An element was found at a different position than expected.
    Moved,
    /// An actual element occupies the position of a different expected one.
    FoundInsteadOf,
}

impl DiffKind {
    /// Kinds attributable to pure reordering keep equivalence intact.
    pub fn preserves_equivalence(self) -> bool {
        matches!(self, Self::Moved | Self::Equivalent)
    }
}

/// One reported discrepancy between an actual and an expected value at a
/// given path or position.
///
/// The kind is fixed at construction and never mutated; positional indices
/// are `None` where position is meaningless (e.g. a scalar field mismatch).
#[derive(Clone, Debug)]
pub struct DifferenceRecord {
    /// Label of the subject: a member path, element index label, or the
    /// top-level subject name.
    pub subject_name: String,
    pub actual: Option<Value>,
    pub expected: Option<Value>,
    pub actual_index: Option<usize>,
    pub expected_index: Option<usize>,
    kind: DiffKind,
    /// Extra rendering note (e.g. the raw float difference and the
    /// approximate-comparison suggestion).
    pub annotation: Option<String>,
}

impl DifferenceRecord {
    fn new(subject_name: impl Into<String>, kind: DiffKind) -> Self {
        Self {
            subject_name: subject_name.into(),
            actual: None,
            expected: None,
            actual_index: None,
            expected_index: None,
            kind,
            annotation: None,
        }
    }

    /// A leaf value mismatch.
    pub fn value(subject_name: impl Into<String>, actual: Value, expected: Value) -> Self {
        let mut rec = Self::new(subject_name, DiffKind::Value);
        rec.actual = Some(actual);
        rec.expected = Some(expected);
        rec
    }

    /// A structural attribute mismatch (rank, dimension length).
    pub fn attribute(subject_name: impl Into<String>, actual: Value, expected: Value) -> Self {
        let mut rec = Self::new(subject_name, DiffKind::Attribute);
        rec.actual = Some(actual);
        rec.expected = Some(expected);
        rec
    }

    /// An expected value that was not found.
    pub fn missing(subject_name: impl Into<String>, expected: Value) -> Self {
        let mut rec = Self::new(subject_name, DiffKind::Missing);
        rec.expected = Some(expected);
        rec
    }

    /// An actual value that was not expected.
    pub fn extra(subject_name: impl Into<String>, actual: Value) -> Self {
        let mut rec = Self::new(subject_name, DiffKind::Extra);
        rec.actual = Some(actual);
        rec
    }

    /// An element found at `actual_index` instead of `expected_index`.
    pub fn moved(
        subject_name: impl Into<String>,
        value: Value,
        actual_index: usize,
        expected_index: usize,
    ) -> Self {
        let mut rec = Self::new(subject_name, DiffKind::Moved);
        rec.actual = Some(value);
        rec.actual_index = Some(actual_index);
        rec.expected_index = Some(expected_index);
        rec
    }

    /// An actual value occupying the position of a different expected one.
    pub fn found_instead_of(
        subject_name: impl Into<String>,
        actual: Value,
        expected: Value,
    ) -> Self {
        let mut rec = Self::new(subject_name, DiffKind::FoundInsteadOf);
        rec.actual = Some(actual);
        rec.expected = Some(expected);
        rec
    }

    /// A nested comparison that differs only by ordering.
    pub fn equivalent(subject_name: impl Into<String>, actual: Value, expected: Value) -> Self {
        let mut rec = Self::new(subject_name, DiffKind::Equivalent);
        rec.actual = Some(actual);
        rec.expected = Some(expected);
        rec
    }

    /// The record's kind, fixed at construction.
    pub fn kind(&self) -> DiffKind {
        self.kind
    }

    /// Attach a rendering annotation.
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Attach the actual-side position.
    pub fn with_actual_index(mut self, index: usize) -> Self {
        self.actual_index = Some(index);
        self
    }

    /// Attach the expected-side position.
    pub fn with_expected_index(mut self, index: usize) -> Self {
        self.expected_index = Some(index);
        self
    }

    fn fmt_value(value: &Option<Value>) -> String {
        match value {
            Some(v) => v.to_string(),
            None => "null".into(),
        }
    }
}

/// One detail line of a rendered message.
impl fmt::Display for DifferenceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.subject_name;
        let actual = Self::fmt_value(&self.actual);
        let expected = Self::fmt_value(&self.expected);
        match self.kind {
            DiffKind::Value | DiffKind::Attribute => {
                write!(f, "{name}: expected {expected}, found {actual}")?;
            }
            DiffKind::Missing => {
                write!(f, "{name}: {expected} was not found")?;
                if let Some(i) = self.expected_index {
                    write!(f, " (expected at index {i})")?;
                }
            }
            DiffKind::Extra => {
                write!(f, "{name}: {actual} was not expected")?;
                if let Some(i) = self.actual_index {
                    write!(f, " (found at index {i})")?;
                }
            }
            DiffKind::Moved => {
                match (self.actual_index, self.expected_index) {
                    (Some(ai), Some(ei)) => {
                        write!(f, "{name}: {actual} found at index {ai}, expected at index {ei}")?;
                    }
                    _ => write!(f, "{name}: {actual} found at a different position")?,
                }
            }
            DiffKind::FoundInsteadOf => {
                write!(f, "{name}: found {actual} instead of {expected}")?;
            }
            DiffKind::Equivalent => {
                write!(f, "{name}: contents are equivalent, but order differs")?;
            }
        }
        if let Some(note) = &self.annotation {
            write!(f, "; {note}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::IntValue;

    fn int(v: i32) -> Value {
        Value::Int(IntValue::I32(v))
    }

    #[test]
    fn kind_is_fixed_at_construction() {
        let rec = DifferenceRecord::missing("field 'x'", int(1));
        assert_eq!(rec.kind(), DiffKind::Missing);
        assert!(rec.actual.is_none());
    }

    #[test]
    fn reordering_kinds_preserve_equivalence() {
        assert!(DiffKind::Moved.preserves_equivalence());
        assert!(DiffKind::Equivalent.preserves_equivalence());
        assert!(!DiffKind::Value.preserves_equivalence());
        assert!(!DiffKind::Missing.preserves_equivalence());
        assert!(!DiffKind::FoundInsteadOf.preserves_equivalence());
    }

    #[test]
    fn value_line_rendering() {
        let rec = DifferenceRecord::value("field 'x'", int(1), int(2));
        assert_eq!(rec.to_string(), "field 'x': expected 2, found 1");
    }

    #[test]
    fn moved_line_rendering() {
        let rec = DifferenceRecord::moved("[2]", int(3), 2, 0);
        assert_eq!(rec.to_string(), "[2]: 3 found at index 2, expected at index 0");
    }

    #[test]
    fn annotation_is_appended() {
        let rec = DifferenceRecord::value("value", int(1), int(2))
            .with_annotation("difference of 1");
        assert_eq!(rec.to_string(), "value: expected 2, found 1; difference of 1");
    }
}
