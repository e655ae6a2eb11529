//! Cache key derivation and TTL validation.

use crate::models::SearchMode;

/// Prefix shared by every search cache key.
pub const CACHE_PREFIX: &str = "search_cache_";

/// Cached entries are valid for 24 hours.
pub const CACHE_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Compute the cache key for a search.
///
/// The term is lower-cased and trimmed so `"  Calc "` and `"calc"` share a key.
pub fn cache_key(mode: SearchMode, term: &str) -> String {
    format!("{CACHE_PREFIX}{}_{}", mode.as_str(), term.to_lowercase().trim())
}

/// True while `now - timestamp` is under the TTL.
pub fn is_fresh(timestamp: i64, now: i64) -> bool {
    now.saturating_sub(timestamp) < CACHE_TTL_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalizes_case_and_whitespace() {
        assert_eq!(cache_key(SearchMode::Title, "  Calc "), cache_key(SearchMode::Title, "calc"));
        assert_eq!(cache_key(SearchMode::Title, "calc"), "search_cache_title_calc");
    }

    #[test]
    fn test_key_different_mode() {
        assert_ne!(cache_key(SearchMode::Title, "101"), cache_key(SearchMode::Code, "101"));
        assert_eq!(cache_key(SearchMode::Code, "101"), "search_cache_code_101");
    }

    #[test]
    fn test_key_keeps_inner_whitespace() {
        assert_eq!(cache_key(SearchMode::Title, " Linear  Algebra"), "search_cache_title_linear  algebra");
    }

    #[test]
    fn test_freshness_boundary() {
        assert!(is_fresh(0, CACHE_TTL_MS - 1));
        assert!(!is_fresh(0, CACHE_TTL_MS));
        assert!(!is_fresh(0, CACHE_TTL_MS + 1));
    }
}
