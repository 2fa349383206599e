/// Deepest bracket chain followed before the remaining segments are dropped.
pub const MAX_DEPTH: usize = 256;

/// Highest sequence index padded out with `Null` holes. Sequences reaching
/// further keep their elements in index order without the holes.
pub const MAX_SEQUENCE_INDEX: usize = 65_535;

/// Upper bound for a configured `max_index`.
pub const MAX_INDEX_CEILING: usize = 1 << 20;

pub(crate) const OPEN_BRACKET: u8 = b'[';
pub(crate) const CLOSE_BRACKET: u8 = b']';

/// Matches the `\w` class of the field-name pattern `\[(\w+)\]`.
#[inline]
pub fn is_segment_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
