//! Self-describing trailing-byte padding for block alignment.
//!
//! The padding byte value encodes its own length: `p` copies of byte `p`
//! are appended, where `p = block_size - len % block_size`. Removal trims
//! trailing bytes by value rather than by a remembered count, so raw binary
//! plaintext that genuinely ends in bytes equal to a valid padding marker
//! is over-trimmed. Query-string plaintexts are immune: they always end in
//! an ASCII hex digit, whose value exceeds any supported block size.

/// Pads `data` up to the next multiple of `block_size`.
///
/// Always appends at least one byte — input that is already block-aligned
/// gains a full extra block. The output length is a positive multiple of
/// `block_size`, strictly greater than the input length.
pub fn add_padding(data: &[u8], block_size: usize) -> Vec<u8> {
    debug_assert!((1..=255).contains(&block_size));
    let pad = block_size - data.len() % block_size;
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}

/// Strips the padding applied by [`add_padding`].
///
/// Inspects the final byte: when it is a plausible padding value for
/// `block_size` (`1..=block_size`), every trailing byte equal to it is
/// removed. Any other value means the buffer is unpadded or corrupt, and
/// the input is returned unchanged rather than rejected.
pub fn remove_padding(data: &[u8], block_size: usize) -> &[u8] {
    let Some(&marker) = data.last() else {
        return data;
    };
    if marker == 0 || marker as usize > block_size {
        return data;
    }
    let end = data.iter().rposition(|&b| b != marker).map_or(0, |i| i + 1);
    &data[..end]
}
