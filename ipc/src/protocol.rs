//! Conventional request tags
//!
//! Applications may define their own tags; these are the ones every peer
//! understands.

/// Instructs the receiving peer to perform some work
pub const REQ_DO: &str = "DO";

/// Reports that the sending peer is done with whatever it was asked to do
pub const REQ_FINISHED: &str = "FINISHED";

/// Instructs the receiving peer to terminate
pub const REQ_DIE: &str = "DIE";

/// Greeting sent by a parent in tests; receivers ignore it
pub const REQ_TEST_PARENT: &str = "I'M PARENT PROCESS";

/// Greeting sent by a child in tests; receivers ignore it
pub const REQ_TEST_CHILD: &str = "I'M CHILD PROCESS";

/// Returns whether `request` is one of the reserved tags above
pub fn is_reserved(request: &str) -> bool {
    matches!(
        request,
        REQ_DO | REQ_FINISHED | REQ_DIE | REQ_TEST_PARENT | REQ_TEST_CHILD
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_tags() {
        assert!(is_reserved(REQ_DO));
        assert!(is_reserved(REQ_FINISHED));
        assert!(is_reserved(REQ_DIE));
        assert!(is_reserved(REQ_TEST_PARENT));
        assert!(is_reserved(REQ_TEST_CHILD));
        assert!(!is_reserved("RESIZE"));
        assert!(!is_reserved("die"));
    }
}
