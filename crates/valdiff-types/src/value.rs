//! The dynamic value model the comparison engine operates on.
//!
//! Every comparable input is classified once into a [`Value`], a closed sum
//! type. The engine and the comparers match on `Value` exhaustively and never
//! touch any introspection mechanism; [`crate::Reflect`] is the only seam
//! between user types and this model.
//!
//! Record values are reference-counted so that cyclic object graphs can be
//! expressed and detected: the cycle guard keys on `Rc` pointer identity,
//! never on value equality.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::TypeError;

/// A signed or unsigned integer of any supported width.
///
/// Widths are kept distinct so that default equality stays type-strict;
/// cross-width equality is the dispatcher's numeric-coercion step, not ours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl IntValue {
    /// Widen to the common integer type. Every supported width fits in `i128`.
    pub fn widened(self) -> i128 {
        match self {
            Self::I8(v) => v as i128,
            Self::I16(v) => v as i128,
            Self::I32(v) => v as i128,
            Self::I64(v) => v as i128,
            Self::U8(v) => v as i128,
            Self::U16(v) => v as i128,
            Self::U32(v) => v as i128,
            Self::U64(v) => v as i128,
        }
    }

    /// The Rust-style name of the concrete width.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
        }
    }
}

impl fmt::Display for IntValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
        }
    }
}

/// An IEEE floating-point value of either width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FloatValue {
    F32(f32),
    F64(f64),
}

impl FloatValue {
    /// The value widened to `f64`. Exact for both widths.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::F32(v) => v as f64,
            Self::F64(v) => v,
        }
    }

    /// Returns `true` for the narrower (`f32`) kind.
    pub fn is_narrow(self) -> bool {
        matches!(self, Self::F32(_))
    }

    /// The Rust-style name of the concrete width.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
        }
    }
}

/// A numeric value widened to the common numeric type.
///
/// Two numerics of distinct concrete types are considered equal when their
/// widened values match: integers meet in `i128`, and any float operand pulls
/// the comparison into `f64`.
#[derive(Clone, Copy, Debug)]
pub enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    /// Compare two widened numerics for equality.
    pub fn equals(self, other: Numeric) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

/// Whether a record member is a field or a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MemberKind {
    Field,
    Property,
}

/// Member visibility, as declared on the original type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Visibility {
    Public,
    NonPublic,
}

/// A named member of a [`RecordValue`].
#[derive(Clone, Debug)]
pub struct Member {
    /// Raw member name, exactly as declared (may be a synthetic
    /// compiler-generated name; the graph walker normalizes those).
    pub name: String,
    pub kind: MemberKind,
    pub visibility: Visibility,
    pub value: Value,
}

impl Member {
    /// A public field member.
    pub fn field(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            visibility: Visibility::Public,
            value,
        }
    }

    /// A public property member.
    pub fn property(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property,
            visibility: Visibility::Public,
            value,
        }
    }

    /// Override the member's visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// A named-member object value.
///
/// `Rc` pointer identity is what the cycle guard keys on, and `RefCell`
/// makes it possible to close a cycle after construction. The member list is
/// only borrowed for the duration of one enumeration.
#[derive(Debug)]
pub struct RecordValue {
    /// Declared type name of the object.
    pub type_name: String,
    /// Base types and implemented interfaces, nearest first. Consulted by
    /// comparer-registry lookup when the exact type has no entry.
    pub lineage: Vec<String>,
    /// Marks a compiler-generated transient record (the anonymous-type
    /// analogue). Transient records are compared member-by-member by the
    /// dispatcher; ordinary records compare by identity.
    pub transient: bool,
    /// Named members, in declaration order.
    pub members: RefCell<Vec<Member>>,
}

impl RecordValue {
    /// Create a non-transient record with no lineage.
    pub fn new(type_name: impl Into<String>, members: Vec<Member>) -> Self {
        Self {
            type_name: type_name.into(),
            lineage: Vec::new(),
            transient: false,
            members: RefCell::new(members),
        }
    }
}

/// A value in the dynamic model.
///
/// Classification happens exactly once, at the [`crate::Reflect`] seam; from
/// then on every routing decision is an exhaustive match on this enum.
#[derive(Clone, Debug)]
pub enum Value {
    /// The null analogue. Total null handling: comparing `Unit` with `Unit`
    /// is never a fault, only a (non-)difference.
    Unit,
    Bool(bool),
    Int(IntValue),
    Float(FloatValue),
    Char(char),
    /// Character strings are always compared atomically, never as sequences.
    Str(String),
    /// An ordered iterable.
    Seq(Vec<Value>),
    /// A rectangular multi-dimensional array, elements stored row-major.
    Array { dims: Vec<usize>, elems: Vec<Value> },
    /// A keyed dictionary. Pair order is insertion order; comparison is
    /// order-independent.
    Map(Vec<(Value, Value)>),
    /// A named-member object, shared so graphs may contain cycles.
    Record(Rc<RecordValue>),
    /// A value the introspection seam could not decompose; compared as an
    /// opaque leaf, never an error.
    Opaque { type_name: String, rendered: String },
}

impl Value {
    /// A non-transient record value.
    pub fn record(type_name: impl Into<String>, members: Vec<Member>) -> Self {
        Self::Record(Rc::new(RecordValue::new(type_name, members)))
    }

    /// A transient (anonymous-type analogue) record value.
    pub fn transient_record(type_name: impl Into<String>, members: Vec<Member>) -> Self {
        Self::Record(Rc::new(RecordValue {
            type_name: type_name.into(),
            lineage: Vec::new(),
            transient: true,
            members: RefCell::new(members),
        }))
    }

    /// An ordered sequence.
    pub fn seq(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Seq(items.into_iter().collect())
    }

    /// A rectangular array with the given dimensions, elements row-major.
    ///
    /// Fails when the dimensions do not account for the element count.
    pub fn array(dims: Vec<usize>, elems: Vec<Value>) -> Result<Self, TypeError> {
        let implied: usize = dims.iter().product();
        if implied != elems.len() {
            return Err(TypeError::ArrayShape {
                dims,
                implied,
                actual: elems.len(),
            });
        }
        Ok(Self::Array { dims, elems })
    }

    /// A dictionary from key/value pairs.
    pub fn map(pairs: Vec<(Value, Value)>) -> Self {
        Self::Map(pairs)
    }

    /// An opaque leaf standing in for an unreflectable value.
    pub fn opaque(type_name: impl Into<String>, rendered: impl Into<String>) -> Self {
        Self::Opaque {
            type_name: type_name.into(),
            rendered: rendered.into(),
        }
    }

    /// Returns `true` for the null analogue.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// The name of the value's runtime type, used for registry lookup and
    /// message rendering.
    pub fn type_name(&self) -> String {
        match self {
            Self::Unit => "unit".into(),
            Self::Bool(_) => "bool".into(),
            Self::Int(i) => i.type_name().into(),
            Self::Float(fv) => fv.type_name().into(),
            Self::Char(_) => "char".into(),
            Self::Str(_) => "str".into(),
            Self::Seq(_) => "seq".into(),
            Self::Array { .. } => "array".into(),
            Self::Map(_) => "map".into(),
            Self::Record(r) => r.type_name.clone(),
            Self::Opaque { type_name, .. } => type_name.clone(),
        }
    }

    /// The value widened to the common numeric type, if it is numeric.
    pub fn as_numeric(&self) -> Option<Numeric> {
        match self {
            Self::Int(i) => Some(Numeric::Int(i.widened())),
            Self::Float(fv) => Some(Numeric::Float(fv.as_f64())),
            _ => None,
        }
    }

    /// A linear view of the value's elements, if it is sequence-shaped.
    ///
    /// Dictionaries enumerate as `[key, value]` pairs so that mixed-shape
    /// comparisons can still fall back to the sequence walk.
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Self::Seq(items) => Some(items.clone()),
            Self::Array { elems, .. } => Some(elems.clone()),
            Self::Map(pairs) => Some(
                pairs
                    .iter()
                    .map(|(k, v)| Value::seq([k.clone(), v.clone()]))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Convert a `serde_json::Value` into the dynamic model.
    ///
    /// This is the fixture bridge: JSON objects become maps, arrays become
    /// sequences, and numbers land on the narrowest lossless variant.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Unit,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(IntValue::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Int(IntValue::U64(u))
                } else {
                    Value::Float(FloatValue::F64(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => Value::seq(items.iter().map(Value::from_json)),
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .iter()
                    .map(|(k, v)| (Value::Str(k.clone()), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

/// Default equality.
///
/// Structural for scalars, strings, sequences, arrays and maps; pointer
/// identity for records, matching reference-type default equality in the
/// kind of object graphs this engine models. Identity on records also
/// guarantees termination on cyclic graphs. Numeric variants are equal only
/// when width and value both match; cross-width equality belongs to the
/// dispatcher's coercion step.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unit, Self::Unit) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => a == b,
            (
                Self::Array { dims: ad, elems: ae },
                Self::Array { dims: bd, elems: be },
            ) => ad == bd && ae == be,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => Rc::ptr_eq(a, b),
            (
                Self::Opaque { type_name: at, rendered: ar },
                Self::Opaque { type_name: bt, rendered: br },
            ) => at == bt && ar == br,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(FloatValue::F32(v)) => write!(f, "{v:?}"),
            Self::Float(FloatValue::F64(v)) => write!(f, "{v:?}"),
            Self::Char(c) => write!(f, "'{c}'"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Seq(items) | Self::Array { elems: items, .. } => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::Record(r) => write!(f, "<{}>", r.type_name),
            Self::Opaque { rendered, .. } => write!(f, "{rendered}"),
        }
    }
}
