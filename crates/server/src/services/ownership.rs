//! Ownership authorization gate.
//!
//! The single authorization rule in the system: a verified subject may act on
//! a resource iff the subject id equals the resource id, byte for byte. No
//! superuser bypass exists. Callers must reject requests carrying no
//! credential before consulting the gate.
//!
//! Kept as a pure predicate so a richer policy engine can replace it without
//! touching callers.

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The subject may act on the resource.
    Allow,
    /// The subject may not act on the resource.
    Deny,
}

/// Decide whether `subject_id` may act on the resource named `resource_id`.
#[must_use]
pub fn authorize(subject_id: &str, resource_id: &str) -> Decision {
    if subject_id == resource_id {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_iff_equal() {
        assert_eq!(authorize("42", "42"), Decision::Allow);
        assert_eq!(authorize("42", "43"), Decision::Deny);
        assert_eq!(authorize("42", ""), Decision::Deny);
        assert_eq!(authorize("", "42"), Decision::Deny);
    }

    #[test]
    fn test_empty_pair_is_equal() {
        assert_eq!(authorize("", ""), Decision::Allow);
    }

    #[test]
    fn test_comparison_is_exact() {
        assert_eq!(authorize("42 ", "42"), Decision::Deny);
        assert_eq!(authorize("ABC", "abc"), Decision::Deny);
        assert_eq!(authorize("héllo", "héllo"), Decision::Allow);
    }
}
