/// Computes namespaced key names for a storage backend.
///
/// The prefix is normalized once at construction: lower-cased, with spaces
/// and underscores collapsed to hyphens. Distinct prefixes never produce
/// colliding key names for the same logical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNamespace {
    prefix: String,
}

impl KeyNamespace {
    /// Create a namespace from a raw prefix.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: normalize(prefix),
        }
    }

    /// The normalized prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The fully qualified name for a logical key: `"<prefix>:<key>"`.
    pub fn key_name(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    /// The enumeration pattern matching every key in this namespace.
    pub fn pattern(&self) -> String {
        format!("{}:*", self.prefix)
    }
}

fn normalize(prefix: &str) -> String {
    prefix
        .chars()
        .map(|c| match c {
            ' ' | '_' => '-',
            _ => c.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_prefix() {
        let namespace = KeyNamespace::new("AuthBridge Session_Storage");
        assert_eq!(namespace.prefix(), "authbridge-session-storage");
        assert_eq!(
            namespace.key_name("state"),
            "authbridge-session-storage:state"
        );
    }

    #[test]
    fn test_distinct_prefixes_never_collide() {
        let a = KeyNamespace::new("alpha");
        let b = KeyNamespace::new("beta");
        assert_ne!(a.key_name("token"), b.key_name("token"));
    }

    #[test]
    fn test_pattern_covers_namespace() {
        let namespace = KeyNamespace::new("x");
        assert_eq!(namespace.pattern(), "x:*");
        assert!(namespace.key_name("a").starts_with("x:"));
    }
}
