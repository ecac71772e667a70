//! Decoded KLV values.
//!
//! `KlvValue` is the closed set of shapes a field can decode to.  Sets keep
//! their entries in a `Vec` rather than a map: input order is preserved on
//! re-encode, and a tag may legitimately appear more than once.

use std::fmt;

use crate::imap::Imap;
use crate::key::{LdsKey, UdsKey};

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum KlvValue {
    /// Zero-length field.
    Empty,
    /// Bytes that were not (or could not be) interpreted.
    Blob(Vec<u8>),
    UInt(u64),
    SInt(i64),
    Float(f64),
    /// IMAP special value that has no faithful `f64` form.
    Imap(Imap),
    String(String),
    Bool(bool),
    LocalSet(LocalSet),
    UniversalSet(UniversalSet),
    /// Ordered repetition of one element format.
    Series(Vec<KlvValue>),
    /// Fixed structure with named fields, used for packs.
    Record(Vec<(String, KlvValue)>),
}

impl KlvValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            KlvValue::Empty => "empty",
            KlvValue::Blob(_) => "blob",
            KlvValue::UInt(_) => "uint",
            KlvValue::SInt(_) => "sint",
            KlvValue::Float(_) => "float",
            KlvValue::Imap(_) => "imap",
            KlvValue::String(_) => "string",
            KlvValue::Bool(_) => "bool",
            KlvValue::LocalSet(_) => "local_set",
            KlvValue::UniversalSet(_) => "universal_set",
            KlvValue::Series(_) => "series",
            KlvValue::Record(_) => "record",
        }
    }

    /// Anything but `Empty` or `Blob`.
    pub fn is_valid(&self) -> bool {
        !matches!(self, KlvValue::Empty | KlvValue::Blob(_))
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            KlvValue::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_sint(&self) -> Option<i64> {
        match self {
            KlvValue::SInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            KlvValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// IMAP reading of the value: floats map to normal values.
    pub fn as_imap(&self) -> Option<Imap> {
        match self {
            KlvValue::Float(v) => Some(Imap::from(*v)),
            KlvValue::Imap(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            KlvValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            KlvValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            KlvValue::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_local_set(&self) -> Option<&LocalSet> {
        match self {
            KlvValue::LocalSet(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_universal_set(&self) -> Option<&UniversalSet> {
        match self {
            KlvValue::UniversalSet(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_series(&self) -> Option<&[KlvValue]> {
        match self {
            KlvValue::Series(items) => Some(items),
            _ => None,
        }
    }

    /// Named field of a record.
    pub fn field(&self, name: &str) -> Option<&KlvValue> {
        match self {
            KlvValue::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl fmt::Display for KlvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KlvValue::Empty => f.write_str("(empty)"),
            KlvValue::Blob(bytes) => {
                f.write_str("<")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{b:02X}")?;
                }
                f.write_str(">")
            }
            KlvValue::UInt(v) => write!(f, "{v}"),
            KlvValue::SInt(v) => write!(f, "{v}"),
            KlvValue::Float(v) => write!(f, "{v}"),
            KlvValue::Imap(v) => write!(f, "{v}"),
            KlvValue::String(s) => write!(f, "\"{s}\""),
            KlvValue::Bool(b) => write!(f, "{b}"),
            KlvValue::LocalSet(set) => write!(f, "{{{} entries}}", set.len()),
            KlvValue::UniversalSet(set) => write!(f, "{{{} entries}}", set.len()),
            KlvValue::Series(items) => write!(f, "[{} items]", items.len()),
            KlvValue::Record(fields) => {
                f.write_str("{ ")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

// ── Sets ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Entry<K> {
    key: K,
    value: KlvValue,
    /// Width the value was decoded from.
    length: Option<usize>,
}

/// Ordered multimap of key to value.
///
/// Entries decoded from the wire remember the width they were read at, so
/// re-encoding an untouched value reproduces its original bytes.  The
/// remembered widths play no part in equality.
#[derive(Debug, Clone)]
pub struct KlvSet<K> {
    entries: Vec<Entry<K>>,
}

pub type LocalSet = KlvSet<LdsKey>;
pub type UniversalSet = KlvSet<UdsKey>;

impl<K> Default for KlvSet<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> PartialEq for KlvSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.key == b.key && a.value == b.value)
    }
}

impl<K: PartialEq> KlvSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; existing entries with the same key are kept.
    pub fn add(&mut self, key: impl Into<K>, value: KlvValue) -> &mut Self {
        self.entries.push(Entry {
            key: key.into(),
            value,
            length: None,
        });
        self
    }

    /// Append an entry decoded from `length` bytes.
    pub fn add_with_length(&mut self, key: impl Into<K>, value: KlvValue, length: usize) -> &mut Self {
        self.entries.push(Entry {
            key: key.into(),
            value,
            length: Some(length),
        });
        self
    }

    /// First value stored under `key`.
    pub fn find(&self, key: &K) -> Option<&KlvValue> {
        self.entries.iter().find(|e| e.key == *key).map(|e| &e.value)
    }

    /// Mutable access forgets the entry's decoded width.
    pub fn find_mut(&mut self, key: &K) -> Option<&mut KlvValue> {
        self.entries.iter_mut().find(|e| e.key == *key).map(|e| {
            e.length = None;
            &mut e.value
        })
    }

    /// Every value stored under `key`, in order.
    pub fn all_at<'a>(&'a self, key: &'a K) -> impl Iterator<Item = &'a KlvValue> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.key == *key)
            .map(|e| &e.value)
    }

    pub fn count(&self, key: &K) -> usize {
        self.all_at(key).count()
    }

    pub fn has(&self, key: &K) -> bool {
        self.entries.iter().any(|e| e.key == *key)
    }

    /// Remove every entry under `key`; returns how many were removed.
    pub fn erase(&mut self, key: &K) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != *key);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &KlvValue)> {
        self.entries.iter().map(|e| (&e.key, &e.value))
    }

    /// Entries with the width each was decoded from, if any.
    pub fn iter_with_lengths(&self) -> impl Iterator<Item = (&K, &KlvValue, Option<usize>)> {
        self.entries.iter().map(|e| (&e.key, &e.value, e.length))
    }

    /// Drop every remembered width, so the set encodes at natural widths.
    pub fn clear_lengths(&mut self) {
        for entry in &mut self.entries {
            entry.length = None;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K> FromIterator<(K, KlvValue)> for KlvSet<K> {
    fn from_iter<I: IntoIterator<Item = (K, KlvValue)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| Entry {
                    key,
                    value,
                    length: None,
                })
                .collect(),
        }
    }
}

impl<K> IntoIterator for KlvSet<K> {
    type Item = (K, KlvValue);
    type IntoIter = std::vec::IntoIter<(K, KlvValue)>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<_> = self.entries.into_iter().map(|e| (e.key, e.value)).collect();
        entries.into_iter()
    }
}
