//! Probabilistic seen-set for deduplicating crawl URLs.
//!
//! A fixed-size Bloom filter: `add` sets `k` bits chosen by independent
//! seeded hashes, `check` is true only if all `k` bits are set. Once a key
//! has been added, `check` never returns false for it (bits are only ever
//! set), so a URL can never be crawled twice. False positives are possible
//! and grow with the number of additions; size the filter for the expected
//! crawl volume.
//!
//! The filter is not internally synchronized. In the pipeline every access
//! happens while holding the shared pipeline lock.

/// Default filter width: 8 million bits (1 MiB), sized for crawls in the
/// low millions of URLs at a small false-positive rate.
pub const DEFAULT_BITS: usize = 1 << 23;

/// Default number of hash functions.
pub const DEFAULT_HASHES: usize = 2;

/// Fixed-size Bloom filter over URL strings.
pub struct SeenSet {
    words: Vec<u64>,
    bit_count: usize,
    seeds: Vec<u64>,
}

impl SeenSet {
    /// Creates a filter with `bits` bits (rounded up to a whole `u64`) and
    /// `hashes` independent hash functions. Both must be non-zero.
    pub fn new(bits: usize, hashes: usize) -> Self {
        assert!(bits > 0, "filter must have at least one bit");
        assert!(hashes > 0, "filter must use at least one hash");

        let word_count = (bits + 63) / 64;
        let seeds = (0..hashes as u64).map(splitmix64).collect();

        Self {
            words: vec![0u64; word_count],
            bit_count: word_count * 64,
            seeds,
        }
    }

    /// Creates a filter with the default sizing.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BITS, DEFAULT_HASHES)
    }

    /// Marks a key as seen. Idempotent; never fails.
    pub fn add(&mut self, key: &str) {
        for &seed in &self.seeds {
            let idx = self.bit_index(key, seed);
            self.words[idx / 64] |= 1u64 << (idx % 64);
        }
    }

    /// True if the key has (probably) been seen. Never false for a key
    /// that was previously added.
    pub fn check(&self, key: &str) -> bool {
        self.seeds.iter().all(|&seed| {
            let idx = self.bit_index(key, seed);
            self.words[idx / 64] & (1u64 << (idx % 64)) != 0
        })
    }

    fn bit_index(&self, key: &str, seed: u64) -> usize {
        (hash_key(key.as_bytes(), seed) as usize) % self.bit_count
    }
}

impl Default for SeenSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Seeded byte-mixing hash producing a 64-bit value per seed.
fn hash_key(data: &[u8], seed: u64) -> u64 {
    let mut hash = seed ^ data.len() as u64;
    for &byte in data {
        hash ^= (byte as u64).wrapping_mul(0x1000_0000_01b3);
        hash = hash.rotate_left(13).wrapping_mul(0xff51_afd7_ed55_8ccd);
    }
    hash ^ (hash >> 33)
}

/// Derives well-spaced hash seeds from sequential indices.
fn splitmix64(index: u64) -> u64 {
    let mut z = index.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_filter_reports_nothing_seen() {
        let filter = SeenSet::new(1024, 2);
        assert!(!filter.check("https://example.test/"));
    }

    #[test]
    fn test_no_false_negatives() {
        let mut filter = SeenSet::new(1 << 16, 2);
        let urls: Vec<String> = (0..5000)
            .map(|i| format!("https://example.test/page/{}", i))
            .collect();

        for url in &urls {
            filter.add(url);
        }

        // Every added key must report seen, every time.
        for url in &urls {
            assert!(filter.check(url), "false negative for {}", url);
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut filter = SeenSet::new(1024, 2);
        filter.add("https://example.test/a");
        let snapshot = filter.words.clone();

        filter.add("https://example.test/a");
        assert_eq!(filter.words, snapshot);
        assert!(filter.check("https://example.test/a"));
    }

    #[test]
    fn test_distinct_keys_mostly_unseen() {
        let mut filter = SeenSet::with_defaults();
        filter.add("https://example.test/a");

        // A generously sized filter with one entry should not collide on
        // a handful of other keys.
        for i in 0..100 {
            let url = format!("https://example.test/other/{}", i);
            assert!(!filter.check(&url), "unexpected collision for {}", url);
        }
    }

    #[test]
    fn test_bits_rounded_up_to_word() {
        let filter = SeenSet::new(1, 1);
        assert_eq!(filter.bit_count, 64);
    }
}
