//! Attribute maps attached to vertices, faces, edges and the mesh itself.
//!
//! Attributes are ordered string-keyed maps of [`AttrValue`]. Lookups of a
//! missing key return `None`; there is no reflection-style access.

use std::collections::btree_map::{self, BTreeMap};

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A single attribute value.
///
/// Serialized untagged, so a document reads as plain JSON scalars and arrays
/// (`{"x": 1.5, "name": "corner", "normal": [0.0, 0.0, 1.0]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Explicit null.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating point scalar.
    Float(f64),
    /// Text.
    Text(String),
    /// Numeric vector (points, normals, colors, ...).
    Vector(Vec<f64>),
    /// Heterogeneous list.
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// The value as a float, converting integers.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            AttrValue::Float(x) => Some(x),
            AttrValue::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    /// The value as an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            AttrValue::Int(i) => Some(i),
            _ => None,
        }
    }

    /// The value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            AttrValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// The value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a numeric vector.
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            AttrValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a 3D point, if it is a vector of length 3.
    pub fn as_point(&self) -> Option<Point3<f64>> {
        match self.as_vector()? {
            [x, y, z] => Some(Point3::new(*x, *y, *z)),
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(v: Vec<f64>) -> Self {
        AttrValue::Vector(v)
    }
}

impl From<Point3<f64>> for AttrValue {
    fn from(p: Point3<f64>) -> Self {
        AttrValue::Vector(vec![p.x, p.y, p.z])
    }
}

impl From<Vector3<f64>> for AttrValue {
    fn from(v: Vector3<f64>) -> Self {
        AttrValue::Vector(vec![v.x, v.y, v.z])
    }
}

/// An ordered attribute map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    /// Create an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes holding `x`, `y` and `z` coordinates.
    pub fn from_point(p: &Point3<f64>) -> Self {
        let mut attrs = Self::new();
        attrs.set_point(p);
        attrs
    }

    /// Look up a value.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    /// Set a value, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Option<AttrValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a value, returning it.
    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.0.remove(key)
    }

    /// Whether the key is present.
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, AttrValue> {
        self.0.iter()
    }

    /// Copy every entry of `other` into `self`, overwriting existing keys.
    pub fn extend_from(&mut self, other: &Attributes) {
        for (k, v) in other.iter() {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Read the conventional `x`, `y`, `z` coordinates.
    pub fn point(&self) -> Option<Point3<f64>> {
        let x = self.get("x")?.as_f64()?;
        let y = self.get("y")?.as_f64()?;
        let z = self.get("z")?.as_f64()?;
        Some(Point3::new(x, y, z))
    }

    /// Write the conventional `x`, `y`, `z` coordinates.
    pub fn set_point(&mut self, p: &Point3<f64>) {
        self.set("x", p.x);
        self.set("y", p.y);
        self.set("z", p.z);
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a AttrValue);
    type IntoIter = btree_map::Iter<'a, String, AttrValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
