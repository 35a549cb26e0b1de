//! Luabins codec for the run-state payload.
//!
//! Layout: a single byte holding the number of top-level values, then each
//! value as a one-byte tag followed by its body. Tables carry an i32 array
//! size and an i32 hash size, then `array + hash` key/value pairs.

use tracing::debug;

use crate::core_api::CoreError;
use crate::reader::{LittleEndianReader, LittleEndianWriter, ReadError};
use crate::value::{Table, Value};

const TAG_NIL: u8 = b'-';
const TAG_FALSE: u8 = b'0';
const TAG_TRUE: u8 = b'1';
const TAG_NUMBER: u8 = b'N';
const TAG_STRING: u8 = b'S';
const TAG_TABLE: u8 = b'T';

pub const MAX_TOP_LEVEL_VALUES: usize = u8::MAX as usize;
pub const MAX_TABLE_DEPTH: usize = 256;

/// Decode a luabins buffer.
///
/// The top-level values come back as a table keyed `0..n`, so the first
/// value is `root.get_index(0)`.
pub fn decode(bytes: &[u8]) -> Result<Value, CoreError> {
    let mut r = LittleEndianReader::new(bytes);
    let count = r.read_u8().map_err(read_error)?;

    let mut root = Table::with_capacity(count as usize);
    for index in 0..count {
        let value = read_value(&mut r, 0)?;
        root.push(Value::Integer(i64::from(index)), value);
    }

    if !r.is_empty() {
        debug!(
            trailing = r.remaining(),
            offset = r.position(),
            "ignoring bytes after luabins values"
        );
    }

    Ok(Value::Table(root))
}

fn read_value(r: &mut LittleEndianReader<'_>, depth: usize) -> Result<Value, CoreError> {
    let offset = r.position();
    let tag = r.read_u8().map_err(read_error)?;
    match tag {
        TAG_NIL => Ok(Value::Nil),
        TAG_FALSE => Ok(Value::Bool(false)),
        TAG_TRUE => Ok(Value::Bool(true)),
        TAG_NUMBER => r.read_f64().map(number_value).map_err(read_error),
        TAG_STRING => r
            .read_prefixed_string()
            .map(Value::String)
            .map_err(read_error),
        TAG_TABLE => read_table(r, depth + 1, offset).map(Value::Table),
        other => Err(CoreError::ValueDecode {
            reason: format!("unknown type tag 0x{other:02X}"),
            offset,
        }),
    }
}

fn read_table(
    r: &mut LittleEndianReader<'_>,
    depth: usize,
    offset: usize,
) -> Result<Table, CoreError> {
    if depth > MAX_TABLE_DEPTH {
        return Err(CoreError::ValueDecode {
            reason: format!("tables nested deeper than {MAX_TABLE_DEPTH}"),
            offset,
        });
    }

    let array_size = r.read_i32().map_err(read_error)?;
    let hash_size = r.read_i32().map_err(read_error)?;
    let total = usize::try_from(array_size)
        .ok()
        .zip(usize::try_from(hash_size).ok())
        .and_then(|(a, h)| a.checked_add(h))
        .ok_or_else(|| CoreError::ValueDecode {
            reason: format!("invalid table size {array_size}+{hash_size}"),
            offset,
        })?;

    // Every pair takes at least two tag bytes.
    let mut table = Table::with_capacity(total.min(r.remaining() / 2));
    for _ in 0..total {
        let key = read_value(r, depth)?;
        let value = read_value(r, depth)?;
        table.push(key, value);
    }
    Ok(table)
}

fn number_value(v: f64) -> Value {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Value::Integer(v as i64)
    } else {
        Value::Float(v)
    }
}

fn read_error(e: ReadError) -> CoreError {
    CoreError::ValueDecode {
        reason: e.fault.to_string(),
        offset: e.offset,
    }
}

/// Encode values in luabins layout. Integers are written as numbers, the
/// only numeric type the format has.
pub fn encode(values: &[Value]) -> Result<Vec<u8>, CoreError> {
    if values.len() > MAX_TOP_LEVEL_VALUES {
        return Err(CoreError::ValueEncode {
            reason: format!(
                "{} top-level values, at most {MAX_TOP_LEVEL_VALUES} fit",
                values.len()
            ),
        });
    }

    let mut w = LittleEndianWriter::new();
    w.write_u8(values.len() as u8);
    for value in values {
        write_value(&mut w, value, 0)?;
    }
    Ok(w.into_bytes())
}

fn write_value(w: &mut LittleEndianWriter, value: &Value, depth: usize) -> Result<(), CoreError> {
    match value {
        Value::Nil => w.write_u8(TAG_NIL),
        Value::Bool(false) => w.write_u8(TAG_FALSE),
        Value::Bool(true) => w.write_u8(TAG_TRUE),
        Value::Integer(v) => {
            w.write_u8(TAG_NUMBER);
            w.write_f64(*v as f64);
        }
        Value::Float(v) => {
            w.write_u8(TAG_NUMBER);
            w.write_f64(*v);
        }
        Value::String(s) => {
            if u32::try_from(s.len()).is_err() {
                return Err(CoreError::ValueEncode {
                    reason: format!("string of {} bytes is too long", s.len()),
                });
            }
            w.write_u8(TAG_STRING);
            w.write_prefixed_string(s);
        }
        Value::Table(t) => {
            if depth + 1 > MAX_TABLE_DEPTH {
                return Err(CoreError::ValueEncode {
                    reason: format!("tables nested deeper than {MAX_TABLE_DEPTH}"),
                });
            }
            let array_size = t
                .keys()
                .enumerate()
                .take_while(|(i, k)| k.as_integer() == Some(*i as i64 + 1))
                .count();
            let hash_size = t.len() - array_size;
            let (Ok(array_size), Ok(hash_size)) =
                (i32::try_from(array_size), i32::try_from(hash_size))
            else {
                return Err(CoreError::ValueEncode {
                    reason: format!("table of {} entries is too large", t.len()),
                });
            };

            w.write_u8(TAG_TABLE);
            w.write_i32(array_size);
            w.write_i32(hash_size);
            for (k, v) in t.iter() {
                write_value(w, k, depth + 1)?;
                write_value(w, v, depth + 1)?;
            }
        }
    }
    Ok(())
}
