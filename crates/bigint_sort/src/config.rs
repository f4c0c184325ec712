use crate::SortError;

/// Tunables for the parallel partition and the quicksort driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SortConfig {
    /// Width of one atomically claimed chunk.
    pub chunk_size: usize,
    /// When positive, chunks grow to `n * chunk_share / num_threads`.
    pub chunk_share: f64,
    /// Number of pivot candidates drawn per divide step.
    pub sample_count: usize,
}

pub const DEFAULT_CONFIG: SortConfig = SortConfig {
    chunk_size: 1024,
    chunk_share: 0.0,
    sample_count: 100,
};

impl Default for SortConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}

impl SortConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_chunk_share(mut self, chunk_share: f64) -> Self {
        self.chunk_share = chunk_share;
        self
    }

    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn validate(&self) -> Result<(), SortError> {
        if self.chunk_size == 0 {
            return Err(SortError::InvalidConfig("chunk_size must be at least 1"));
        }
        if self.sample_count == 0 {
            return Err(SortError::InvalidConfig("sample_count must be at least 1"));
        }
        if !self.chunk_share.is_finite() || self.chunk_share < 0.0 {
            return Err(SortError::InvalidConfig(
                "chunk_share must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Chunk width used for a range of `n` elements split across `num_threads`.
    #[inline]
    pub fn effective_chunk_size(&self, n: usize, num_threads: usize) -> usize {
        if self.chunk_share <= 0.0 {
            return self.chunk_size;
        }
        let scaled = (n as f64 * self.chunk_share / num_threads.max(1) as f64) as usize;
        self.chunk_size.max(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SortConfig::default();
        assert_eq!(config, DEFAULT_CONFIG);
        assert_eq!(config.chunk_size, 1024);
        assert_eq!(config.sample_count, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_values() {
        assert!(DEFAULT_CONFIG.with_chunk_size(0).validate().is_err());
        assert!(DEFAULT_CONFIG.with_sample_count(0).validate().is_err());
        assert!(DEFAULT_CONFIG.with_chunk_share(-0.5).validate().is_err());
        assert!(DEFAULT_CONFIG.with_chunk_share(f64::NAN).validate().is_err());
    }

    #[test]
    fn chunk_scales_with_share() {
        let fixed = DEFAULT_CONFIG.with_chunk_size(16);
        assert_eq!(fixed.effective_chunk_size(1 << 20, 4), 16);

        let scaled = fixed.with_chunk_share(0.25);
        assert_eq!(scaled.effective_chunk_size(4000, 4), 250);
        assert_eq!(scaled.effective_chunk_size(100, 4), 16);
    }
}
