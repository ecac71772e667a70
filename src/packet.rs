//! Top-level packets and packet streams.
//!
//! A packet is a 16-byte universal key, a BER length, and a value whose
//! format is found by looking the key up in the registry's packet table.
//! Packets of formats that carry a checksum trailer have it verified and
//! stripped on read, and recomputed on write.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, error, warn};

use crate::constants::*;
use crate::errors::*;
use crate::format::Context;
use crate::key::{read_uds_key, write_uds_key, LdsKey, UdsKey};
use crate::read_write::{ber_length, read_ber, write_ber, Cursor};
use crate::registry::{Registry, ST0104_KEY, ST0601_KEY, ST0806_KEY, ST1108_KEY};
use crate::standards::st0104::USER_DEFINED_TIMESTAMP_KEY;
use crate::tag_traits::TagTraits;
use crate::value::KlvValue;

const ST0601_PRECISION_TIMESTAMP: LdsKey = LdsKey(2);
const ST0806_TIMESTAMP: LdsKey = LdsKey(2);
const ST1108_METRIC_PERIOD_PACK: LdsKey = LdsKey(2);

// ── Packet ───────────────────────────────────────────────────

/// Outcome of checking a packet's checksum trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumStatus {
    /// The format has no trailer, or the packet did not carry one.
    #[default]
    Absent,
    Valid,
    Mismatch { stored: u64, computed: u64 },
}

/// One decoded top-level KLV unit.
#[derive(Debug, Clone)]
pub struct Packet {
    pub key: UdsKey,
    pub value: KlvValue,
    /// Set by `read_packet`; ignored by `write_packet` and by equality.
    pub checksum: ChecksumStatus,
}

impl Packet {
    pub fn new(key: UdsKey, value: KlvValue) -> Self {
        Self {
            key,
            value,
            checksum: ChecksumStatus::Absent,
        }
    }

    /// Human-readable form, using the registry to name every field.
    pub fn print(&self, registry: &Registry) -> String {
        let entry = packet_traits(registry, &self.key);
        let ctx = Context::new(registry);
        format!("{{ {}: {} }}", entry.name(), entry.format().print(&self.value, &ctx))
    }
}

impl PartialEq for Packet {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {}: {} }}", self.key, self.value)
    }
}

/// Packet-table entry for `key`; the unknown-packet sentinel if none.
pub fn packet_traits<'r>(registry: &'r Registry, key: &UdsKey) -> &'r TagTraits {
    registry.packets().by_uds_key(key)
}

// ── Reading ──────────────────────────────────────────────────

/// Decode the next packet at the cursor.
///
/// Bytes before the next universal-key prefix are skipped.  On failure the
/// cursor is left where it was.
pub fn read_packet(cur: &mut Cursor<'_>, registry: &Registry) -> Result<Packet, KlvError> {
    let mut body = cur.clone();
    let skipped = body
        .rest()
        .windows(UDS_PREFIX.len())
        .position(|w| w == UDS_PREFIX)
        .ok_or_else(|| {
            KlvError::new(ERR_LENGTH, "universal key not found in data buffer").at(body.position())
        })?;
    if skipped > 0 {
        debug!("skipped {skipped} bytes in klv stream");
        body.skip(skipped)?;
    }

    let packet_bytes = body.rest();
    let key_offset = body.position();
    let key = read_uds_key(&mut body)?;
    if !key.is_valid() {
        return Err(KlvError::new(ERR_FORMAT, format!("invalid universal key {key}")).at(key_offset));
    }

    let length_offset = body.position();
    let declared = read_ber(&mut body)?;
    let value_length = usize::try_from(declared)
        .ok()
        .filter(|&n| n <= body.remaining())
        .ok_or_else(|| {
            KlvError::new(
                ERR_LENGTH,
                format!(
                    "packet value of {declared} bytes overruns buffer ({} bytes left)",
                    body.remaining()
                ),
            )
            .at(length_offset)
        })?;
    let header_length = body.position() - key_offset;
    let packet_bytes = &packet_bytes[..header_length + value_length];

    let entry = packet_traits(registry, &key);
    let format = entry.format();
    let (set_length, checksum) = match format.checksum() {
        Some(trailer) if value_length >= trailer.length() && trailer.is_present(packet_bytes) => {
            let trailer_offset = packet_bytes.len() - trailer.length();
            let computed = trailer.evaluate(&packet_bytes[..trailer_offset + trailer.header().len()]);
            let mut stored_at = Cursor::new(&packet_bytes[trailer_offset..]);
            let stored = trailer.read_trailer(&mut stored_at)?;
            let status = if stored == computed {
                ChecksumStatus::Valid
            } else {
                error!(
                    "{}: calculated checksum (0x{computed:08x}) does not equal checksum contained in packet (0x{stored:08x})",
                    entry.name()
                );
                ChecksumStatus::Mismatch { stored, computed }
            };
            (value_length - trailer.length(), status)
        }
        Some(trailer) => {
            warn!("{}: {trailer} trailer not found", entry.name());
            (value_length, ChecksumStatus::Absent)
        }
        None => (value_length, ChecksumStatus::Absent),
    };

    let ctx = Context::new(registry);
    let value = format
        .read(&mut body, set_length, &ctx)
        .map_err(|e| e.context(entry.name()))?;
    body.skip(value_length - set_length)?;

    *cur = body;
    Ok(Packet {
        key,
        value,
        checksum,
    })
}

/// Decode every packet in `data`.  Trailing bytes holding no further
/// universal-key prefix are ignored.
pub fn read_packets(data: &[u8], registry: &Registry) -> Result<Vec<Packet>, KlvError> {
    let mut cur = Cursor::new(data);
    let mut packets = Vec::new();
    while has_prefix_ahead(cur.rest()) {
        packets.push(read_packet(&mut cur, registry)?);
    }
    if !cur.is_empty() {
        debug!("ignored {} trailing bytes in klv stream", cur.remaining());
    }
    Ok(packets)
}

fn has_prefix_ahead(data: &[u8]) -> bool {
    data.windows(UDS_PREFIX.len()).any(|w| w == UDS_PREFIX)
}

// ── Writing ──────────────────────────────────────────────────

/// Encode `packet`, appending a checksum trailer when its format has one.
pub fn write_packet(packet: &Packet, out: &mut Vec<u8>, registry: &Registry) -> Result<(), KlvError> {
    let entry = packet_traits(registry, &packet.key);
    let format = entry.format();
    let ctx = Context::new(registry);
    let context = |e: KlvError| e.context(entry.name());

    let length = format.length_of(&packet.value, &ctx).map_err(context)?;
    let trailer_length = format.checksum().map_or(0, |c| c.length());

    let start = out.len();
    write_uds_key(&packet.key, out);
    write_ber((length + trailer_length) as u64, out);
    let result = format
        .write(&packet.value, out, length, &ctx)
        .and_then(|()| match format.checksum() {
            Some(trailer) => trailer.write_trailer(out, start),
            None => Ok(()),
        });
    if let Err(err) = result {
        out.truncate(start);
        return Err(context(err));
    }
    Ok(())
}

/// Bytes `write_packet` produces for `packet`.
pub fn packet_length(packet: &Packet, registry: &Registry) -> Result<usize, KlvError> {
    let format = packet_traits(registry, &packet.key).format();
    let ctx = Context::new(registry);
    let value_length = format.length_of(&packet.value, &ctx)?
        + format.checksum().map_or(0, |c| c.length());
    Ok(UDS_KEY_LENGTH + ber_length(value_length as u64) + value_length)
}

/// Microsecond timestamp carried inside the packet, for the standards that
/// define one.
pub fn packet_timestamp(packet: &Packet) -> Option<u64> {
    if packet.key == ST0601_KEY {
        packet
            .value
            .as_local_set()?
            .find(&ST0601_PRECISION_TIMESTAMP)?
            .as_uint()
    } else if packet.key == ST0806_KEY {
        packet.value.as_local_set()?.find(&ST0806_TIMESTAMP)?.as_uint()
    } else if packet.key == ST0104_KEY {
        packet
            .value
            .as_universal_set()?
            .find(&USER_DEFINED_TIMESTAMP_KEY)?
            .as_uint()
    } else if packet.key == ST1108_KEY {
        packet
            .value
            .as_local_set()?
            .find(&ST1108_METRIC_PERIOD_PACK)?
            .field("timestamp")?
            .as_uint()
    } else {
        None
    }
}

// ── Streams ──────────────────────────────────────────────────

/// Position of a packet on the media timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp {
    pub time_us: Option<u64>,
    pub frame: Option<u64>,
}

impl Timestamp {
    pub fn new(time_us: u64, frame: u64) -> Self {
        Self {
            time_us: Some(time_us),
            frame: Some(frame),
        }
    }

    /// Valid times first, earlier first; ties broken the same way by frame.
    pub fn order(&self, other: &Self) -> Ordering {
        fn known_first(a: Option<u64>, b: Option<u64>) -> Ordering {
            match (a, b) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
        known_first(self.time_us, other.time_us).then(known_first(self.frame, other.frame))
    }
}

/// Packet together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedPacket {
    pub packet: Packet,
    pub timestamp: Timestamp,
    pub stream_index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamKind {
    /// Packets are tied to video frames.
    #[default]
    Sync,
    /// Packets arrive independent of frame boundaries.
    Async,
}

/// How a KLV elementary stream is multiplexed with video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StreamSettings {
    pub kind: StreamKind,
    pub index: u32,
}

/// Packets collected from one KLV stream, waiting to be delivered.
#[derive(Debug, Clone, Default)]
pub struct KlvStream {
    settings: StreamSettings,
    pending: Vec<TimedPacket>,
}

impl KlvStream {
    pub fn new(settings: StreamSettings) -> Self {
        Self {
            settings,
            pending: Vec::new(),
        }
    }

    pub fn settings(&self) -> StreamSettings {
        self.settings
    }

    pub fn pending(&self) -> &[TimedPacket] {
        &self.pending
    }

    pub fn push(&mut self, packet: Packet, timestamp: Timestamp) {
        self.pending.push(TimedPacket {
            packet,
            timestamp,
            stream_index: self.settings.index,
        });
    }

    /// Decode every packet in `data` and queue them under `timestamp`.
    /// Returns how many packets were queued.
    pub fn push_bytes(&mut self, data: &[u8], timestamp: Timestamp, registry: &Registry) -> Result<usize, KlvError> {
        let packets = read_packets(data, registry)?;
        let count = packets.len();
        for packet in packets {
            self.push(packet, timestamp);
        }
        Ok(count)
    }

    /// Remove and return the packets due at `frame`.
    ///
    /// A synchronous stream hands over packets stamped with `frame` or an
    /// earlier frame, in timeline order; packets with no frame are always
    /// due.  An asynchronous stream hands over everything queued, in arrival
    /// order.
    pub fn deliver(&mut self, frame: u64) -> Vec<TimedPacket> {
        match self.settings.kind {
            StreamKind::Async => std::mem::take(&mut self.pending),
            StreamKind::Sync => {
                let (mut due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
                    .into_iter()
                    .partition(|p| p.timestamp.frame.map_or(true, |f| f <= frame));
                self.pending = later;
                due.sort_by(|a, b| a.timestamp.order(&b.timestamp));
                due
            }
        }
    }
}
