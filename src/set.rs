//! Generic local- and universal-set codec.
//!
//! A set's value is a run of (key, BER length, value) triples.  Each key is
//! resolved through the set's tag table; the matching format decodes the
//! value.  Unknown keys resolve to the table's blob sentinel and keep their
//! bytes.  Entries are written back in the order they are stored, each at
//! the width it was decoded from when that width still holds the value.
//!
//! ST1010 SDCC-FLP packs describe the entries right before them, so the
//! codec hands each format the tags that precede it and, on write, moves
//! described entries in front of their pack.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use tracing::warn;

use crate::checksum::ChecksumFormat;
use crate::errors::*;
use crate::format::{type_error, Context, Format};
use crate::key::*;
use crate::length_constraints::LengthConstraints;
use crate::read_write::{ber_length, read_ber, write_ber, Cursor};
use crate::registry::Standard;
use crate::tag_traits::{TagTraits, TagTraitsLookup};
use crate::value::{KlvSet, KlvValue};

/// Key type of a set: how it is read and written, and how it resolves in a
/// tag table.
pub trait SetKey: Clone + PartialEq + Eq + Hash + fmt::Display + fmt::Debug {
    fn read_key(cur: &mut Cursor<'_>) -> Result<Self, KlvError>;
    fn write_key(&self, out: &mut Vec<u8>) -> Result<(), KlvError>;
    fn key_length(&self) -> usize;
    fn lookup<'t>(&self, traits: &'t TagTraitsLookup) -> &'t TagTraits;
    /// Numeric tag of this key, as SDCC-FLP packs refer to it.
    fn tag_in(&self, traits: &TagTraitsLookup) -> u64 {
        self.lookup(traits).tag()
    }
    /// This key type's view of a table entry.
    fn of_traits(traits: &TagTraits) -> Option<Self>;
}

impl SetKey for LdsKey {
    fn read_key(cur: &mut Cursor<'_>) -> Result<Self, KlvError> {
        read_lds_key(cur)
    }

    fn write_key(&self, out: &mut Vec<u8>) -> Result<(), KlvError> {
        write_lds_key(*self, out)
    }

    fn key_length(&self) -> usize {
        lds_key_length(*self)
    }

    fn lookup<'t>(&self, traits: &'t TagTraitsLookup) -> &'t TagTraits {
        traits.by_tag(self.0)
    }

    fn tag_in(&self, _: &TagTraitsLookup) -> u64 {
        self.0
    }

    fn of_traits(traits: &TagTraits) -> Option<Self> {
        Some(LdsKey(traits.tag()))
    }
}

impl SetKey for UdsKey {
    fn read_key(cur: &mut Cursor<'_>) -> Result<Self, KlvError> {
        read_uds_key(cur)
    }

    fn write_key(&self, out: &mut Vec<u8>) -> Result<(), KlvError> {
        write_uds_key(self, out);
        Ok(())
    }

    fn key_length(&self) -> usize {
        uds_key_length(self)
    }

    fn lookup<'t>(&self, traits: &'t TagTraitsLookup) -> &'t TagTraits {
        traits.by_uds_key(self)
    }

    fn of_traits(traits: &TagTraits) -> Option<Self> {
        traits.key().copied()
    }
}

// ── Parser ───────────────────────────────────────────────────

/// Decode every entry in the `length` bytes at the cursor.
pub fn read_set<K: SetKey>(
    cur: &mut Cursor<'_>,
    length: usize,
    traits: &TagTraitsLookup,
    ctx: &Context<'_>,
) -> Result<KlvSet<K>, KlvError> {
    let ctx = ctx.descend()?;
    let mut body = cur.sub(length)?;
    let mut set = KlvSet::new();
    // Tags decoded so far, for formats that refer back to their neighbors.
    let mut history = Vec::new();
    while !body.is_empty() {
        let key = K::read_key(&mut body).map_err(|e| e.context(traits.name()))?;
        let length_offset = body.position();
        let value_length = read_ber(&mut body).map_err(|e| e.context(traits.name()))?;
        let value_length = usize::try_from(value_length)
            .ok()
            .filter(|&n| n <= body.remaining())
            .ok_or_else(|| {
                KlvError::new(
                    ERR_LENGTH,
                    format!(
                        "{}: field {key} of {value_length} bytes overruns set ({} bytes left)",
                        traits.name(),
                        body.remaining()
                    ),
                )
                .at(length_offset)
            })?;
        let entry = key.lookup(traits);
        let bound = entry.format().with_preceding(&history);
        let format: &dyn Format = match &bound {
            Some(format) => format.as_ref(),
            None => entry.format(),
        };
        let value = format
            .read(&mut body, value_length, &ctx)
            .map_err(|e| e.context(format!("{} {}", traits.name(), entry.name())))?;
        history.push(key.tag_in(traits));
        set.add_with_length(key, value, value_length);
    }
    check_tag_counts(&set, traits);
    Ok(set)
}

/// Encode every entry of `set`, in stored order, except that the entries an
/// SDCC-FLP pack describes are moved to sit right before it.
pub fn write_set<K: SetKey>(
    set: &KlvSet<K>,
    out: &mut Vec<u8>,
    traits: &TagTraitsLookup,
    ctx: &Context<'_>,
) -> Result<(), KlvError> {
    let ctx = ctx.descend()?;
    check_tag_counts(set, traits);
    let entries: Vec<_> = set.iter_with_lengths().collect();
    let mut history = Vec::new();
    for index in write_order(&entries, traits)? {
        let (key, value, hint) = entries[index];
        let entry = key.lookup(traits);
        let bound = entry.format().with_preceding(&history);
        let format: &dyn Format = match &bound {
            Some(format) => format.as_ref(),
            None => entry.format(),
        };
        let context = |e: KlvError| e.context(format!("{} {}", traits.name(), entry.name()));
        let length = format.length_of_hinted(value, hint, &ctx).map_err(context)?;
        key.write_key(out).map_err(context)?;
        write_ber(length as u64, out);
        format.write(value, out, length, &ctx).map_err(context)?;
        history.push(key.tag_in(traits));
    }
    Ok(())
}

fn write_order<K: SetKey>(
    entries: &[(&K, &KlvValue, Option<usize>)],
    traits: &TagTraitsLookup,
) -> Result<Vec<usize>, KlvError> {
    let tag_of = |key: &K| key.tag_in(traits);
    let described = |&(key, value, _): &(&K, &KlvValue, Option<usize>)| {
        key.lookup(traits).format().preceding_tags(value)
    };

    let mut held = HashSet::new();
    for members in entries.iter().filter_map(described) {
        for tag in members {
            if !held.insert(tag) {
                return Err(KlvError::new(
                    ERR_FORMAT,
                    format!("{}: two SDCC-FLP packs describe tag {tag}", traits.name()),
                ));
            }
        }
    }

    let mut order = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if held.contains(&tag_of(entry.0)) {
            continue;
        }
        for tag in described(entry).unwrap_or_default() {
            let member = entries
                .iter()
                .position(|(key, _, _)| tag_of(*key) == tag)
                .ok_or_else(|| {
                    KlvError::new(
                        ERR_FORMAT,
                        format!("{}: SDCC-FLP describes missing tag {tag}", traits.name()),
                    )
                })?;
            order.push(member);
        }
        order.push(index);
    }
    Ok(order)
}

/// Bytes `write_set` produces for `set`.
pub fn set_length<K: SetKey>(
    set: &KlvSet<K>,
    traits: &TagTraitsLookup,
    ctx: &Context<'_>,
) -> Result<usize, KlvError> {
    let ctx = ctx.descend()?;
    let entries: Vec<_> = set.iter_with_lengths().collect();
    write_order(&entries, traits)?;
    entries.into_iter().try_fold(0usize, |total, (key, value, hint)| {
        let length = key.lookup(traits).format().length_of_hinted(value, hint, &ctx)?;
        Ok(total + key.key_length() + ber_length(length as u64) + length)
    })
}

/// Log every tag whose occurrence count the table does not allow.
pub fn check_tag_counts<K: SetKey>(set: &KlvSet<K>, traits: &TagTraitsLookup) -> bool {
    let mut valid = true;
    for entry in traits.iter() {
        let Some(key) = K::of_traits(entry) else {
            continue;
        };
        let count = set.count(&key);
        if !entry.tag_count().allows(count) {
            warn!(
                "{}: {} appears {count} times; expected {}",
                traits.name(),
                entry.name(),
                entry.tag_count()
            );
            valid = false;
        }
    }
    valid
}

fn print_set<K: SetKey>(set: &KlvSet<K>, traits: &TagTraitsLookup, ctx: &Context<'_>) -> String {
    let ctx = match ctx.descend() {
        Ok(ctx) => ctx,
        Err(_) => return "{ ... }".to_string(),
    };
    let fields: Vec<String> = set
        .iter()
        .map(|(key, value)| {
            let entry = key.lookup(traits);
            let name = if entry.tag() == 0 && entry.key().is_none() {
                format!("Unknown ({key})")
            } else {
                entry.name().to_string()
            };
            format!("{name}: {}", entry.format().print(value, &ctx))
        })
        .collect();
    format!("{{ {} }}", fields.join(", "))
}

// ── Set formats ──────────────────────────────────────────────

/// Local set whose tags resolve through a registry table.
#[derive(Debug, Clone)]
pub struct LocalSetFormat {
    standard: Standard,
    checksum: Option<ChecksumFormat>,
    constraints: LengthConstraints,
}

impl LocalSetFormat {
    pub fn new(standard: Standard) -> Self {
        Self {
            standard,
            checksum: None,
            constraints: LengthConstraints::free(),
        }
    }

    /// Top-level form of the set, closed by a checksum trailer.
    pub fn with_checksum(standard: Standard, checksum: ChecksumFormat) -> Self {
        Self {
            checksum: Some(checksum),
            ..Self::new(standard)
        }
    }

    pub fn standard(&self) -> Standard {
        self.standard
    }
}

impl Format for LocalSetFormat {
    fn description(&self) -> String {
        format!("{} local set of {}", self.standard, self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, ctx: &Context<'_>) -> Result<KlvValue, KlvError> {
        let traits = ctx.registry().traits(self.standard);
        Ok(KlvValue::LocalSet(read_set(cur, length, traits, ctx)?))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, ctx: &Context<'_>) -> Result<(), KlvError> {
        let set = value.as_local_set().ok_or_else(|| type_error("local_set", value))?;
        write_set(set, out, ctx.registry().traits(self.standard), ctx)
    }

    fn length_of_typed(&self, value: &KlvValue, ctx: &Context<'_>) -> Result<usize, KlvError> {
        let set = value.as_local_set().ok_or_else(|| type_error("local_set", value))?;
        set_length(set, ctx.registry().traits(self.standard), ctx)
    }

    fn print_typed(&self, value: &KlvValue, ctx: &Context<'_>) -> String {
        match value.as_local_set() {
            Some(set) => print_set(set, ctx.registry().traits(self.standard), ctx),
            None => value.to_string(),
        }
    }

    fn checksum(&self) -> Option<&ChecksumFormat> {
        self.checksum.as_ref()
    }

    fn subset(&self) -> Option<Standard> {
        Some(self.standard)
    }
}

/// Universal set keyed by 16-byte labels.
#[derive(Debug, Clone)]
pub struct UniversalSetFormat {
    standard: Standard,
    constraints: LengthConstraints,
}

impl UniversalSetFormat {
    pub fn new(standard: Standard) -> Self {
        Self {
            standard,
            constraints: LengthConstraints::free(),
        }
    }
}

impl Format for UniversalSetFormat {
    fn description(&self) -> String {
        format!("{} universal set of {}", self.standard, self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, ctx: &Context<'_>) -> Result<KlvValue, KlvError> {
        let traits = ctx.registry().traits(self.standard);
        Ok(KlvValue::UniversalSet(read_set(cur, length, traits, ctx)?))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, ctx: &Context<'_>) -> Result<(), KlvError> {
        let set = value
            .as_universal_set()
            .ok_or_else(|| type_error("universal_set", value))?;
        write_set(set, out, ctx.registry().traits(self.standard), ctx)
    }

    fn length_of_typed(&self, value: &KlvValue, ctx: &Context<'_>) -> Result<usize, KlvError> {
        let set = value
            .as_universal_set()
            .ok_or_else(|| type_error("universal_set", value))?;
        set_length(set, ctx.registry().traits(self.standard), ctx)
    }

    fn print_typed(&self, value: &KlvValue, ctx: &Context<'_>) -> String {
        match value.as_universal_set() {
            Some(set) => print_set(set, ctx.registry().traits(self.standard), ctx),
            None => value.to_string(),
        }
    }

    fn subset(&self) -> Option<Standard> {
        Some(self.standard)
    }
}
