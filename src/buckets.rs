//! Insertion-ordered, deduplicated include classification buckets.
use std::collections::HashSet;

/// The `standard` and `external` include buckets described in the data
/// model: each holds header tokens in first-seen order with no
/// duplicates. The two buckets are disjoint by construction — a token is
/// classified into exactly one of them the first time it is seen.
#[derive(Debug, Default)]
pub struct IncludeBuckets {
    standard: Vec<String>,
    external: Vec<String>,
    seen: HashSet<String>,
}

impl IncludeBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `token` as belonging to the standard or external bucket.
    /// No-op if the token has already been classified (into either
    /// bucket), preserving the first classification.
    pub fn classify(&mut self, token: &str, is_standard: bool) {
        if !self.seen.insert(token.to_string()) {
            return;
        }
        if is_standard {
            self.standard.push(token.to_string());
        } else {
            self.external.push(token.to_string());
        }
    }

    pub fn standard(&self) -> &[String] {
        &self.standard
    }

    pub fn external(&self) -> &[String] {
        &self.external
    }
}
