//! Cache Key Module
//!
//! Deterministic key construction from operation-specific components.

/// Separator between key components.
pub const KEY_SEPARATOR: &str = ":";

// == Key Builder ==
/// Joins components into a single cache key with `:` between them.
///
/// Empty input yields the empty string; a single component yields itself
/// unchanged. There is no escaping: components that themselves contain `:`
/// can collide with different logical inputs, so callers must pick
/// separator-free components.
///
/// # Example
/// ```
/// use opcache::cache_key;
///
/// let key = cache_key(&["pods", "kube-system", "wide"]);
/// assert_eq!(key, "pods:kube-system:wide");
/// ```
pub fn cache_key<S: AsRef<str>>(components: &[S]) -> String {
    components
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_with_separator() {
        assert_eq!(cache_key(&["a", "b", "c"]), "a:b:c");
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(cache_key(&empty), "");
    }

    #[test]
    fn test_single_component() {
        assert_eq!(cache_key(&["a"]), "a");
    }

    #[test]
    fn test_accepts_owned_strings() {
        let parts = vec!["svc".to_string(), "default".to_string()];
        assert_eq!(cache_key(&parts), "svc:default");
    }

    #[test]
    fn test_no_escaping_means_collisions_are_possible() {
        // Known limitation: components containing the separator collide.
        assert_eq!(cache_key(&["a:b", "c"]), cache_key(&["a", "b:c"]));
    }
}
