//! The member-introspector seam.
//!
//! Rust has no runtime reflection, so conversion into the dynamic model is
//! compile-time: primitive and container impls live here, and user record
//! types get an impl from [`reflect_record!`]. Nothing downstream of this
//! seam knows how a [`Value`] was produced.

use std::collections::{BTreeMap, HashMap};

use crate::value::{FloatValue, IntValue, Value};

/// Conversion of a concrete Rust value into the dynamic [`Value`] model.
pub trait Reflect {
    /// Classify `self` into the dynamic model.
    fn reflect(&self) -> Value;
}

impl Reflect for Value {
    fn reflect(&self) -> Value {
        self.clone()
    }
}

impl Reflect for bool {
    fn reflect(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Reflect for char {
    fn reflect(&self) -> Value {
        Value::Char(*self)
    }
}

impl Reflect for str {
    fn reflect(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl Reflect for String {
    fn reflect(&self) -> Value {
        Value::Str(self.clone())
    }
}

macro_rules! reflect_int {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(impl Reflect for $ty {
            fn reflect(&self) -> Value {
                Value::Int(IntValue::$variant(*self))
            }
        })+
    };
}

reflect_int! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
}

impl Reflect for f32 {
    fn reflect(&self) -> Value {
        Value::Float(FloatValue::F32(*self))
    }
}

impl Reflect for f64 {
    fn reflect(&self) -> Value {
        Value::Float(FloatValue::F64(*self))
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Value {
        match self {
            Some(inner) => inner.reflect(),
            None => Value::Unit,
        }
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(&self) -> Value {
        Value::seq(self.iter().map(Reflect::reflect))
    }
}

impl<T: Reflect> Reflect for [T] {
    fn reflect(&self) -> Value {
        Value::seq(self.iter().map(Reflect::reflect))
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect(&self) -> Value {
        Value::seq(self.iter().map(Reflect::reflect))
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn reflect(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.reflect(), v.reflect())).collect())
    }
}

impl<K: Reflect, V: Reflect> Reflect for HashMap<K, V> {
    fn reflect(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.reflect(), v.reflect())).collect())
    }
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

/// Implement [`Reflect`] for a struct by listing its fields.
///
/// ```
/// use valdiff_types::{reflect_record, Reflect, Value};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// reflect_record!(Point { x, y });
///
/// let value = Point { x: 1, y: 2 }.reflect();
/// assert_eq!(value.type_name(), "Point");
/// ```
#[macro_export]
macro_rules! reflect_record {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn reflect(&self) -> $crate::Value {
                $crate::Value::record(
                    stringify!($ty),
                    vec![
                        $($crate::Member::field(
                            stringify!($field),
                            $crate::Reflect::reflect(&self.$field),
                        )),+
                    ],
                )
            }
        }
    };
}
