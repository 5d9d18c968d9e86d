use std::io::{self, Read};

use crate::ByteFrequencyTable;

const CHUNK_SIZE: usize = 8192;

/// Measure the entropy of everything `reader` yields.
///
/// A read failure degrades the measurement to `0.0`; callers that need to
/// tell "ordered data" from "no data" must track the byte count themselves.
pub fn stream_entropy<R: Read>(mut reader: R) -> f64 {
    let mut table = ByteFrequencyTable::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => table.update(&buffer[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::debug!(error = %e, read = table.total(), "entropy stream aborted");
                return 0.0;
            }
        }
    }

    table.entropy()
}

/// Reader adapter that counts byte frequencies as data passes through.
pub struct EntropyReader<R> {
    reader: R,
    table: ByteFrequencyTable,
}

impl<R> EntropyReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            table: ByteFrequencyTable::new(),
        }
    }

    /// Bytes observed so far.
    pub fn bytes_read(&self) -> u64 {
        self.table.total()
    }

    /// Consume the adapter, returning the inner reader and the entropy of
    /// the bytes it yielded.
    pub fn finish(self) -> (R, f64) {
        (self.reader, self.table.entropy())
    }
}

impl<R: Read> Read for EntropyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.table.update(&buf[..n]);
        }
        Ok(n)
    }
}
