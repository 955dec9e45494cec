//! Wall kick offsets
//!
//! When a rotation would collide, these horizontal column offsets are tried
//! in order and the first one that fits wins. This is a single fixed table
//! shared by every piece and both directions, not the per-orientation SRS
//! tables.

/// Column offsets tried after a rotation, in order
pub const KICK_OFFSETS: [i32; 5] = [0, -1, 1, -2, 2];
