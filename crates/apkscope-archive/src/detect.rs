pub(crate) const MAGIC_LEN: usize = 4;

/// Whether `header` starts like a zip container.
///
/// Accepts a local file header or, for archives without entries, the end of
/// central directory record.
pub fn is_zip(header: &[u8]) -> bool {
    matches!(
        header,
        [0x50, 0x4B, 0x03, 0x04, ..] | [0x50, 0x4B, 0x05, 0x06, ..]
    )
}
