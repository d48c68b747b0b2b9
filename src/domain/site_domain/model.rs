//! Domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::support::errors::DomainError;

/// Longest hostname (plus optional path) accepted as a domain name
pub const MAX_NAME_LENGTH: usize = 255;

/// Prefix marking culture-only wildcard entries (e.g. `*1234`)
pub const WILDCARD_PREFIX: char = '*';

/// A hostname (or hostname + path) mapped to a content item.
///
/// `id == 0` means the record has not been persisted yet; the repository
/// assigns the id and timestamps on first save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub id: i32,
    pub key: Uuid,
    /// Unique name, e.g. `shop.example.com` or `example.com/en`
    pub name: String,
    /// Owning content item; `None` for wildcard domains
    pub root_content_id: Option<i32>,
    /// Culture tag such as `en-US`
    pub language_iso_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            key: Uuid::new_v4(),
            name: name.into(),
            root_content_id: None,
            language_iso_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_root_content(mut self, content_id: i32) -> Self {
        self.root_content_id = Some(content_id);
        self
    }

    pub fn with_language(mut self, iso_code: impl Into<String>) -> Self {
        self.language_iso_code = Some(iso_code.into());
        self
    }

    /// Whether the entity has been persisted
    pub fn has_identity(&self) -> bool {
        self.id != 0
    }

    /// Wildcard domains have no owning content, or a blank / `*`-prefixed name
    pub fn is_wildcard(&self) -> bool {
        self.root_content_id.is_none()
            || self.name.trim().is_empty()
            || self.name.starts_with(WILDCARD_PREFIX)
    }

    /// Check the name before it reaches storage
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name(&self.name)
    }
}

pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("domain name must not be empty".into()));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(DomainError::Validation(format!(
            "domain name '{}' must not contain whitespace",
            name
        )));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::Validation(format!(
            "domain name exceeds {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Apply the wildcard filter shared by every repository implementation
pub fn filter_wildcards(domains: Vec<Domain>, include_wildcards: bool) -> Vec<Domain> {
    if include_wildcards {
        domains
    } else {
        domains.into_iter().filter(|d| !d.is_wildcard()).collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_domain_has_no_identity() {
        let d = Domain::new("shop.example.com");
        assert!(!d.has_identity());
        assert_eq!(d.created_at, d.updated_at);
    }

    #[test]
    fn domain_without_content_is_wildcard() {
        assert!(Domain::new("shop.example.com").is_wildcard());
        assert!(!Domain::new("shop.example.com")
            .with_root_content(42)
            .is_wildcard());
    }

    #[test]
    fn star_prefixed_name_is_wildcard() {
        let d = Domain::new("*1234").with_root_content(1234);
        assert!(d.is_wildcard());
    }

    #[test]
    fn validate_rejects_blank_and_whitespace() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("shop example.com").is_err());
        assert!(validate_name("example.com/en").is_ok());
    }

    #[test]
    fn validate_rejects_overlong_names() {
        let name = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            validate_name(&name),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn name_length_counts_characters() {
        let idn = "ü".repeat(200);
        assert!(validate_name(&idn).is_ok());
        let too_long = "ü".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            validate_name(&too_long),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn filter_wildcards_keeps_owned_domains() {
        let domains = vec![
            Domain::new("a.example.com").with_root_content(1),
            Domain::new("*1"),
            Domain::new("b.example.com"),
        ];
        let owned = filter_wildcards(domains.clone(), false);
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].name, "a.example.com");
        assert_eq!(filter_wildcards(domains, true).len(), 3);
    }
}
