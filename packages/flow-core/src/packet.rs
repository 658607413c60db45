//! Datagram splitting: header region plus fixed-length record blocks.

use crate::error::EngineError;

/// Splits a datagram into its header region and record blocks.
///
/// The header is the first `header_len` bytes; the remainder is divided into
/// consecutive blocks of exactly `record_len` bytes. Trailing bytes shorter
/// than a full block are dropped. A header-only datagram yields zero blocks.
pub fn split_datagram(
    buf: &[u8],
    header_len: usize,
    record_len: usize,
) -> Result<(&[u8], Vec<&[u8]>), EngineError> {
    if record_len == 0 {
        return Err(EngineError::ZeroRecordLength);
    }
    if buf.len() < header_len {
        return Err(EngineError::TruncatedHeader {
            len: buf.len(),
            header_len,
        });
    }

    let header = &buf[..header_len];
    let blocks: Vec<&[u8]> = buf[header_len..].chunks_exact(record_len).collect();
    Ok((header, blocks))
}
