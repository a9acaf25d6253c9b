use crate::types::{AppError, Result};
use tollgate_token::Principal;

/// Requires one specific authority.
pub fn require_authority(principal: &Principal, authority: &str) -> Result<()> {
    if principal.has_authority(authority) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "{} lacks {}",
            principal.subject(),
            authority
        )))
    }
}

/// Requires at least one of `authorities`. An empty list is never satisfied.
pub fn require_any(principal: &Principal, authorities: &[&str]) -> Result<()> {
    if principal.has_any(authorities) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "{} lacks any of [{}]",
            principal.subject(),
            authorities.join(", ")
        )))
    }
}

/// Requires every one of `authorities`. An empty list is always satisfied.
pub fn require_all(principal: &Principal, authorities: &[&str]) -> Result<()> {
    let missing: Vec<&str> = authorities
        .iter()
        .copied()
        .filter(|a| !principal.has_authority(a))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "{} lacks [{}]",
            principal.subject(),
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn principal() -> Principal {
        Principal::new("alice", vec!["ROLE_USER".into(), "REPORTS_READ".into()])
    }

    #[test]
    fn test_require_authority() {
        assert!(require_authority(&principal(), "ROLE_USER").is_ok());
        assert!(matches!(
            require_authority(&principal(), "ROLE_ADMIN"),
            Err(AppError::Forbidden(msg)) if msg.contains("ROLE_ADMIN")
        ));
    }

    #[test]
    fn test_authorities_are_case_sensitive() {
        assert!(require_authority(&principal(), "role_user").is_err());
    }

    #[rstest]
    #[case(&["ROLE_ADMIN", "ROLE_USER"], true)]
    #[case(&["ROLE_ADMIN"], false)]
    #[case(&[], false)]
    fn test_require_any(#[case] required: &[&str], #[case] allowed: bool) {
        assert_eq!(require_any(&principal(), required).is_ok(), allowed);
    }

    #[rstest]
    #[case(&["ROLE_USER", "REPORTS_READ"], true)]
    #[case(&["ROLE_USER", "ROLE_ADMIN"], false)]
    #[case(&[], true)]
    fn test_require_all(#[case] required: &[&str], #[case] allowed: bool) {
        assert_eq!(require_all(&principal(), required).is_ok(), allowed);
    }

    #[test]
    fn test_require_all_names_only_missing() {
        match require_all(&principal(), &["ROLE_USER", "ROLE_ADMIN", "AUDIT"]) {
            Err(AppError::Forbidden(msg)) => {
                assert!(msg.contains("ROLE_ADMIN, AUDIT"));
                assert!(!msg.contains("ROLE_USER"));
            }
            other => panic!("expected forbidden, got {:?}", other),
        }
    }
}
