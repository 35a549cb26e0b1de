use std::borrow::Cow;

use tracing::debug;

use crate::core_api::CoreError;
use crate::reader::{LittleEndianReader, LittleEndianWriter, ReadError};

/// Observed upper bound on how much the run-state payload expands.
pub const PAYLOAD_EXPANSION_RATIO: usize = 10;

/// Fixed header plus the compressed run-state payload of a save file.
///
/// Fields appear here in the order they are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEnvelope {
    pub signature: [u8; 4],
    pub checksum: [u8; 4],
    pub version: u32,
    pub timestamp: u64,
    pub location: String,
    pub runs: i32,
    pub meta_points: i32,
    pub shrine_points: i32,
    pub godmode: u8,
    pub hellmode: u8,
    pub lua_keys: Vec<String>,
    pub current_map: String,
    pub starting_map: String,
    pub payload: Vec<u8>,
}

impl SaveEnvelope {
    pub fn parse(bytes: &[u8]) -> Result<Self, CoreError> {
        let mut r = LittleEndianReader::new(bytes);
        let envelope = parse_fields(&mut r).map_err(envelope_error)?;

        if !r.is_empty() {
            debug!(
                trailing = r.remaining(),
                offset = r.position(),
                "ignoring bytes after save payload"
            );
        }
        Ok(envelope)
    }

    pub fn signature_tag(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.signature)
    }

    pub fn is_godmode(&self) -> bool {
        self.godmode != 0
    }

    pub fn is_hellmode(&self) -> bool {
        self.hellmode != 0
    }

    /// Largest output the payload may expand to.
    pub fn decompressed_size_hint(&self) -> usize {
        self.payload.len().saturating_mul(PAYLOAD_EXPANSION_RATIO)
    }

    pub fn decompress_payload(&self) -> Result<Vec<u8>, CoreError> {
        let raw = lz4_flex::block::decompress(&self.payload, self.decompressed_size_hint())?;
        debug!(
            compressed = self.payload.len(),
            decompressed = raw.len(),
            "expanded run-state payload"
        );
        Ok(raw)
    }

    /// Serialize every field back in stored order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = LittleEndianWriter::new();
        w.write_bytes(&self.signature);
        w.write_bytes(&self.checksum);
        w.write_u32(self.version);
        w.write_u64(self.timestamp);
        w.write_prefixed_string(&self.location);
        w.write_i32(self.runs);
        w.write_i32(self.meta_points);
        w.write_i32(self.shrine_points);
        w.write_u8(self.godmode);
        w.write_u8(self.hellmode);
        w.write_u32(self.lua_keys.len() as u32);
        for key in &self.lua_keys {
            w.write_prefixed_string(key);
        }
        w.write_prefixed_string(&self.current_map);
        w.write_prefixed_string(&self.starting_map);
        w.write_u32(self.payload.len() as u32);
        w.write_bytes(&self.payload);
        w.into_bytes()
    }
}

/// LZ4-block compress a raw luabins buffer into envelope payload form.
pub fn compress_payload(raw: &[u8]) -> Vec<u8> {
    lz4_flex::block::compress(raw)
}

fn parse_fields(r: &mut LittleEndianReader<'_>) -> Result<SaveEnvelope, ReadError> {
    let signature = r.read_array::<4>()?;
    let checksum = r.read_array::<4>()?;
    let version = r.read_u32()?;
    let timestamp = r.read_u64()?;
    let location = r.read_prefixed_string()?;
    let runs = r.read_i32()?;
    let meta_points = r.read_i32()?;
    let shrine_points = r.read_i32()?;
    let godmode = r.read_u8()?;
    let hellmode = r.read_u8()?;

    let key_count = r.read_u32()? as usize;
    // Each key needs at least its 4-byte length prefix.
    let mut lua_keys = Vec::with_capacity(key_count.min(r.remaining() / 4));
    for _ in 0..key_count {
        lua_keys.push(r.read_prefixed_string()?);
    }

    let current_map = r.read_prefixed_string()?;
    let starting_map = r.read_prefixed_string()?;

    let payload_len = r.read_u32()? as usize;
    let payload = r.read_bytes(payload_len)?.to_vec();

    Ok(SaveEnvelope {
        signature,
        checksum,
        version,
        timestamp,
        location,
        runs,
        meta_points,
        shrine_points,
        godmode,
        hellmode,
        lua_keys,
        current_map,
        starting_map,
        payload,
    })
}

fn envelope_error(e: ReadError) -> CoreError {
    CoreError::EnvelopeFormat {
        reason: e.fault,
        offset: e.offset,
    }
}
