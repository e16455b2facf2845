//! The Wexpr value tree and its map-key type.
//!
//! Grounded on the teacher crate's `Value` enum: a closed, tagged variant
//! with one arm per concrete Wexpr type, a `Display` impl that serializes
//! back to the wire form, and an optional `serde` derive gated behind the
//! crate's `serde` feature.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A key in a Wexpr map. Wexpr permits both bareword/string keys and
/// numeric keys (§4.6); this is modeled as its own small enum rather than
/// stringifying numbers, so a numeric key stays distinguishable from its
/// string form on the decode -> encode round trip (§9, Open Questions).
///
/// Grounded on the teacher crate's `PathComponent<Key, Index>`, which draws
/// the same distinction between string keys and integer indices.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MapKey {
    /// A bareword or quoted-string key.
    Str(String),
    /// A numeric key, ordered via [`OrderedFloat`].
    Num(OrderedFloat),
}

impl MapKey {
    /// Returns the integer value of this key if it is a [`MapKey::Num`]
    /// holding a non-negative integer, used by the encoder's arrayness
    /// test (§4.7).
    #[must_use]
    pub fn as_array_index(&self) -> Option<u64> {
        match self {
            MapKey::Num(n) => {
                let v = n.0;
                (v.fract() == 0.0 && v >= 0.0).then_some(v as u64)
            }
            MapKey::Str(_) => None,
        }
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        MapKey::Str(s)
    }
}

impl From<f64> for MapKey {
    fn from(n: f64) -> Self {
        MapKey::Num(OrderedFloat(n))
    }
}

/// A thin `f64` wrapper implementing a total order via [`f64::total_cmp`].
///
/// `BTreeMap` requires `Ord` on its key type; plain `f64` is only
/// `PartialOrd` because of `NaN`. Wexpr numbers are never `NaN` in practice
/// (the grammar only produces finite decimal literals), so `total_cmp`'s
/// treatment of `NaN` is never exercised in normal use but keeps the type
/// total regardless.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedFloat(pub f64);

impl Eq for OrderedFloat {}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// An ordered mapping from [`MapKey`] to [`Value`].
pub type Map = BTreeMap<MapKey, Value>;

/// An ordered sequence of [`Value`].
pub type Array = Vec<Value>;

/// A Wexpr value: the in-memory tree produced by [`crate::decode`] and
/// consumed by [`crate::encode`].
///
/// Grounded on the teacher crate's `Value` enum (§3 of `SPEC_FULL.md`
/// explains why `Map`/`Array` are kept as distinct variants rather than one
/// dynamically-typed table).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The `nil`/`null` sentinel.
    Null,
    /// A boolean, written `true` or `false`.
    Bool(bool),
    /// A number, written as a bareword decimal literal.
    Number(f64),
    /// A string, written as a bareword or a quoted, escaped literal.
    String(String),
    /// A binary blob, written `<base64>`.
    Binary(Vec<u8>),
    /// An array, written `#( ... )`.
    Array(Array),
    /// A map, written `@( ... )`.
    Map(Map),
}

impl Value {
    /// Returns `true` if this value is [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if this value is a container ([`Value::Map`] or
    /// [`Value::Array`]). The merge-on-decode rule (§4.6) only reuses
    /// existing containers; scalars are always overwritten.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Map(_) | Self::Array(_))
    }

    /// Borrows the inner map, or `None` if this is not [`Value::Map`].
    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        if let Self::Map(m) = self { Some(m) } else { None }
    }

    /// Mutably borrows the inner map, or `None` if this is not
    /// [`Value::Map`].
    #[must_use]
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        if let Self::Map(m) = self { Some(m) } else { None }
    }

    /// Mutably borrows the inner array, or `None` if this is not
    /// [`Value::Array`].
    #[must_use]
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        if let Self::Array(a) = self { Some(a) } else { None }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Map(v)
    }
}

impl fmt::Display for Value {
    /// Renders the value using the encoder's non-pretty, default-options
    /// form. For control over `pretty`/`binary_paths`, call
    /// [`crate::encode`] directly; this impl exists for quick debugging
    /// output, matching the teacher crate's `Value: Display`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (text, _warnings) =
            crate::encode(self, &crate::EncodeOptions::default()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
