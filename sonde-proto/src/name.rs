//! Helpers over names in their stored form: lowercase labels joined by dots,
//! without the trailing dot. The root is the empty string.

/// Brings a user supplied name ("Example.COM.") into its stored form.
pub fn normalize_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Whether `child` equals `parent` or sits below it. The root is the parent
/// of every name.
pub fn is_subdomain(child: &str, parent: &str) -> bool {
    if parent.is_empty() || child == parent {
        return true;
    }
    child
        .strip_suffix(parent)
        .map_or(false, |head| head.ends_with('.'))
}

#[cfg(test)]
mod tests {
    #[test]
    fn should_normalize_name() {
        assert_eq!(super::normalize_name("Example.COM."), "example.com");
        assert_eq!(super::normalize_name("."), "");
    }

    #[test]
    fn should_check_subdomain() {
        assert!(super::is_subdomain("www.example.com", "example.com"));
        assert!(super::is_subdomain("example.com", "example.com"));
        assert!(super::is_subdomain("example.com", ""));
        assert!(!super::is_subdomain("badexample.com", "example.com"));
        assert!(!super::is_subdomain("example.com", "www.example.com"));
        assert!(!super::is_subdomain("evil.test", "example.com"));
    }
}
