use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Header fields of the decoded save, plus where the bytes came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub signature: String,
    pub version: u32,
    pub timestamp: u64,
    pub location: String,
    pub runs: i32,
    pub meta_points: i32,
    pub shrine_points: i32,
    pub godmode: bool,
    pub hellmode: bool,
    pub current_map: String,
    pub starting_map: String,
    pub lua_key_count: usize,
    pub compressed_len: usize,
    pub decompressed_len: usize,
    pub trait_entry_count: usize,
    /// Filesystem modification time, when opened from a path.
    #[serde(skip)]
    pub modified: Option<SystemTime>,
}
