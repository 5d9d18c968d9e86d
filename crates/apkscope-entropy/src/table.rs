/// Occurrence count for each of the 256 byte values plus the grand total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteFrequencyTable {
    counts: [u64; 256],
    total: u64,
}

impl Default for ByteFrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteFrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: [0; 256],
            total: 0,
        }
    }

    /// Count every byte of `data`.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
        self.total += data.len() as u64;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Number of distinct byte values seen.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&n| n > 0).count()
    }

    /// Reduce the table to Shannon entropy in bits per byte.
    ///
    /// An empty table yields `0.0`.
    pub fn entropy(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        let total = self.total as f64;
        let entropy: f64 = self
            .counts
            .iter()
            .filter(|&&n| n > 0)
            .map(|&n| {
                let p = n as f64 / total;
                -p * p.log2()
            })
            .sum();

        // a single symbol sums to -0.0
        entropy.max(0.0)
    }
}

/// Entropy of an in-memory buffer.
pub fn entropy_of(data: &[u8]) -> f64 {
    let mut table = ByteFrequencyTable::new();
    table.update(data);
    table.entropy()
}
