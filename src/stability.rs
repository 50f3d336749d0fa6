use std::collections::HashSet;

/// SHA-256 digest of a full grid state, the sole key for cycle detection.
pub type Fingerprint = [u8; 32];

/// Detects fixed points and oscillation cycles by remembering every grid
/// fingerprint seen so far. Any repeat, whatever the period, signals
/// stability; there is no explicit period tracking.
///
/// A repeated digest is treated as true stability. A hash collision could in
/// principle produce a false positive, but over a bounded generation budget
/// the probability is negligible.
pub struct StabilityDetector {
  seen: HashSet<Fingerprint>,
}

impl StabilityDetector {
  pub fn new() -> Self {
    Self {
      seen: HashSet::new(),
    }
  }

  /// Record one generation's fingerprint. Returns `true` the first time a
  /// fingerprint repeats a previously observed one, `false` otherwise.
  pub fn observe(&mut self, fingerprint: Fingerprint) -> bool {
    !self.seen.insert(fingerprint)
  }

  /// Number of distinct states observed so far.
  pub fn len(&self) -> usize {
    self.seen.len()
  }

  pub fn is_empty(&self) -> bool {
    self.seen.is_empty()
  }
}

impl Default for StabilityDetector {
  fn default() -> Self {
    Self::new()
  }
}
