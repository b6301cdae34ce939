use crate::wordlist::WordlistEntry;

/// Response body lower-cased once, so each entry's keywords can be checked
/// without re-allocating.
pub struct LoweredBody(String);

impl LoweredBody {
    pub fn new(body: &str) -> Self {
        Self(body.to_lowercase())
    }

    fn contains(&self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        !keyword.is_empty() && self.0.contains(&keyword.to_lowercase())
    }

    /// At least one positive keyword and no false-positive indicator.
    pub fn matches(&self, entry: &WordlistEntry) -> bool {
        entry.positive_match.iter().any(|k| self.contains(k))
            && !entry.false_positive_indicators.iter().any(|k| self.contains(k))
    }
}
