//! Key namespace builders for the three TaskStore families.

pub fn task_key(task_id: &str) -> String {
    format!("task:{task_id}")
}

pub fn search_key(fingerprint: &str) -> String {
    format!("search:{fingerprint}")
}

pub fn excel_key(task_id: &str) -> String {
    format!("excel:{task_id}")
}

/// Glob pattern used by the bulk-cleanup sweep to enumerate a namespace.
pub fn namespace_pattern(namespace: &str) -> String {
    format!("{namespace}:*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_by_family() {
        assert_eq!(task_key("abc"), "task:abc");
        assert_eq!(search_key("deadbeef"), "search:deadbeef");
        assert_eq!(excel_key("abc"), "excel:abc");
    }

    #[test]
    fn namespace_pattern_is_a_prefix_glob() {
        assert_eq!(namespace_pattern("task"), "task:*");
    }
}
