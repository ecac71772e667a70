//! Per-standard tag tables.
//!
//! A [`TagTraitsLookup`] is built once per standard from a literal list of
//! [`TagTraits`].  Its first entry is the "unknown" sentinel every failed
//! lookup returns, so a decoder can carry tags it does not understand.

use std::collections::HashMap;
use std::fmt;

use crate::errors::*;
use crate::format::{BlobFormat, Format};
use crate::key::UdsKey;
use crate::registry::Standard;

/// How many times a tag may appear in one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCount {
    Exact(usize),
    /// Inclusive bounds; `None` means no upper bound.
    Between(usize, Option<usize>),
}

impl TagCount {
    /// Zero or one occurrence.
    pub const OPTIONAL: TagCount = TagCount::Between(0, Some(1));
    /// Any number of occurrences.
    pub const ANY: TagCount = TagCount::Between(0, None);

    pub fn allows(&self, count: usize) -> bool {
        match *self {
            TagCount::Exact(n) => count == n,
            TagCount::Between(lower, upper) => count >= lower && upper.map_or(true, |u| count <= u),
        }
    }
}

impl fmt::Display for TagCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagCount::Exact(n) => write!(f, "exactly {n}"),
            TagCount::Between(lower, Some(upper)) => write!(f, "{lower} to {upper}"),
            TagCount::Between(lower, None) => write!(f, "at least {lower}"),
        }
    }
}

/// Registry entry describing one tag.
pub struct TagTraits {
    tag: u64,
    uds_key: Option<UdsKey>,
    enum_name: &'static str,
    format: Box<dyn Format>,
    name: &'static str,
    description: &'static str,
    count: TagCount,
}

impl TagTraits {
    /// Optional single-occurrence entry.
    pub fn new(
        tag: u64,
        enum_name: &'static str,
        format: impl Format + 'static,
        name: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            tag,
            uds_key: None,
            enum_name,
            format: Box::new(format),
            name,
            description,
            count: TagCount::OPTIONAL,
        }
    }

    /// Sentinel entry for tags a table does not know.
    pub fn unknown(enum_name: &'static str) -> Self {
        Self::new(0, enum_name, BlobFormat::new(), "Unknown Tag", "Unknown tag.")
            .count(TagCount::ANY)
    }

    pub fn uds_key(mut self, key: UdsKey) -> Self {
        self.uds_key = Some(key);
        self
    }

    pub fn count(mut self, count: TagCount) -> Self {
        self.count = count;
        self
    }

    pub fn tag(&self) -> u64 {
        self.tag
    }

    pub fn key(&self) -> Option<&UdsKey> {
        self.uds_key.as_ref()
    }

    pub fn enum_name(&self) -> &'static str {
        self.enum_name
    }

    pub fn format(&self) -> &dyn Format {
        self.format.as_ref()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn tag_count(&self) -> TagCount {
        self.count
    }

    /// Set the value of this tag recurses into, if any.
    pub fn subset(&self) -> Option<Standard> {
        self.format.subset()
    }
}

impl fmt::Debug for TagTraits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagTraits")
            .field("tag", &self.tag)
            .field("uds_key", &self.uds_key)
            .field("enum_name", &self.enum_name)
            .field("format", &self.format.description())
            .field("name", &self.name)
            .field("count", &self.count)
            .finish()
    }
}

/// Immutable table of tag traits with lookups by tag, key, and name.
#[derive(Debug)]
pub struct TagTraitsLookup {
    name: &'static str,
    traits: Vec<TagTraits>,
    by_tag: HashMap<u64, usize>,
    by_uds_key: HashMap<UdsKey, usize>,
    by_name: HashMap<&'static str, usize>,
    by_enum_name: HashMap<&'static str, usize>,
}

fn duplicate(table: &str, what: &str, entry: impl fmt::Display) -> KlvError {
    KlvError::new(ERR_REGISTRY, format!("{table}: duplicate {what} {entry}"))
}

impl TagTraitsLookup {
    /// Build a table.  `traits[0]` is the unknown sentinel and is never
    /// returned by a successful lookup.
    pub fn new(name: &'static str, traits: Vec<TagTraits>) -> Result<Self, KlvError> {
        if traits.is_empty() {
            return Err(KlvError::new(
                ERR_REGISTRY,
                format!("{name}: table needs an unknown entry"),
            ));
        }
        let mut lookup = Self {
            name,
            traits: Vec::new(),
            by_tag: HashMap::new(),
            by_uds_key: HashMap::new(),
            by_name: HashMap::new(),
            by_enum_name: HashMap::new(),
        };
        for (index, entry) in traits.iter().enumerate().skip(1) {
            if entry.tag != 0 && lookup.by_tag.insert(entry.tag, index).is_some() {
                return Err(duplicate(name, "tag", entry.tag));
            }
            if let Some(key) = entry.uds_key {
                if lookup.by_uds_key.insert(key, index).is_some() {
                    return Err(duplicate(name, "universal key", key));
                }
            }
            if lookup.by_name.insert(entry.name, index).is_some() {
                return Err(duplicate(name, "name", entry.name));
            }
            if lookup.by_enum_name.insert(entry.enum_name, index).is_some() {
                return Err(duplicate(name, "enum name", entry.enum_name));
            }
        }
        lookup.traits = traits;
        Ok(lookup)
    }

    /// Table name, e.g. "ST0601".
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn unknown(&self) -> &TagTraits {
        &self.traits[0]
    }

    fn get(&self, index: Option<&usize>) -> &TagTraits {
        index.map_or(self.unknown(), |&i| &self.traits[i])
    }

    pub fn by_tag(&self, tag: u64) -> &TagTraits {
        self.get(self.by_tag.get(&tag))
    }

    pub fn by_uds_key(&self, key: &UdsKey) -> &TagTraits {
        self.get(self.by_uds_key.get(key))
    }

    pub fn by_name(&self, name: &str) -> &TagTraits {
        self.get(self.by_name.get(name))
    }

    pub fn by_enum_name(&self, enum_name: &str) -> &TagTraits {
        self.get(self.by_enum_name.get(enum_name))
    }

    /// Known entries, sentinel excluded.
    pub fn iter(&self) -> impl Iterator<Item = &TagTraits> {
        self.traits.iter().skip(1)
    }

    pub fn len(&self) -> usize {
        self.traits.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
