mod site;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use folio_protocol::HOME_SECTION;
use thiserror::Error;

pub use site::{
    ContactInfo, CtaAction, Education, Experience, HeroConfig, HeroCta, HeroCtas, NavItem,
    Project, SiteConfig, SkillCategory, SocialLinks,
};

/// Content bundled with the binary.
const BUILTIN_SITE: &str = include_str!("../../assets/site.json");

/// Environment variables overlaid onto [`ContactInfo`].
pub const ENV_CONTACT_EMAIL: &str = "FOLIO_CONTACT_EMAIL";
pub const ENV_CONTACT_PHONE: &str = "FOLIO_CONTACT_PHONE";
pub const ENV_WHATSAPP_URL: &str = "FOLIO_WHATSAPP_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading site config: {0}")]
    Io(#[from] std::io::Error),
    #[error("site config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid site config: {}", join_violations(.0))]
    Invalid(Vec<Violation>),
}

/// One broken shape rule, with the path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub problem: &'static str,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.problem)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SiteConfig {
    /// The content shipped with folio.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_SITE)
    }

    /// Parse and validate a JSON content document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!(
            "loaded site config for {:?}: {} nav items, {} projects",
            config.name,
            config.nav_items.len(),
            config.projects.len()
        );
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the shape rules serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();
        let mut require = |ok: bool, path: String, problem: &'static str| {
            if !ok {
                violations.push(Violation { path, problem });
            }
        };

        require(!self.name.trim().is_empty(), "name".into(), "must not be empty");
        require(!self.title.trim().is_empty(), "title".into(), "must not be empty");
        require(
            !self.nav_items.is_empty(),
            "nav_items".into(),
            "must list at least one section",
        );
        require(
            self.nav_items.iter().any(|item| item.id == HOME_SECTION),
            "nav_items".into(),
            "must include the home section",
        );

        let mut seen = HashSet::new();
        for (i, item) in self.nav_items.iter().enumerate() {
            require(
                seen.insert(item.id.as_str()),
                format!("nav_items[{i}].id"),
                "duplicates an earlier nav item",
            );
            require(
                !item.label.trim().is_empty(),
                format!("nav_items[{i}].label"),
                "must not be empty",
            );
        }

        for (key, cta) in [
            ("primary", &self.hero.cta.primary),
            ("secondary", &self.hero.cta.secondary),
        ] {
            require(
                !cta.text.trim().is_empty(),
                format!("hero.cta.{key}.text"),
                "must not be empty",
            );
            require(
                cta.action != CtaAction::Upwork
                    || cta.url.as_deref().is_some_and(|u| !u.is_empty()),
                format!("hero.cta.{key}.url"),
                "is required for upwork actions",
            );
        }

        for (i, exp) in self.experience.iter().enumerate() {
            require(
                !exp.title.trim().is_empty(),
                format!("experience[{i}].title"),
                "must not be empty",
            );
            require(
                !exp.company.trim().is_empty(),
                format!("experience[{i}].company"),
                "must not be empty",
            );
        }

        for (i, project) in self.projects.iter().enumerate() {
            require(
                !project.title.trim().is_empty(),
                format!("projects[{i}].title"),
                "must not be empty",
            );
            require(
                !project.tech.is_empty(),
                format!("projects[{i}].tech"),
                "must list at least one technology",
            );
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(violations))
        }
    }

    /// Overlay contact channels from an environment lookup.
    ///
    /// Hosts pass `|k| std::env::var(k).ok()` natively, or a compile-time
    /// table on wasm. Unset or empty variables leave the field untouched.
    pub fn with_contact_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let overlay = |key: &str, field: &mut String| {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        };
        overlay(ENV_CONTACT_EMAIL, &mut self.contact.email);
        overlay(ENV_CONTACT_PHONE, &mut self.contact.phone);
        overlay(ENV_WHATSAPP_URL, &mut self.contact.whatsapp);
        self
    }

    pub fn nav_item(&self, id: &str) -> Option<&NavItem> {
        self.nav_items.iter().find(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json(nav: &str) -> String {
        format!(
            r#"{{
                "name": "Ada",
                "title": "Engineer",
                "description": "",
                "social": {{ "linkedin": "", "medium": "", "github": "" }},
                "hero": {{
                    "title": "t",
                    "subtitle": "s",
                    "cta": {{
                        "primary": {{
                            "text": "Hire",
                            "action": "upwork",
                            "url": "https://example.com"
                        }},
                        "secondary": {{ "text": "Talk", "action": "email" }}
                    }}
                }},
                "nav_items": {nav},
                "story_title": "Story"
            }}"#
        )
    }

    #[test]
    fn builtin_config_is_valid() {
        let config = SiteConfig::builtin().expect("builtin site config must load");
        assert_eq!(config.nav_items.len(), 6);
        assert_eq!(config.nav_items[0].id, "home");
        assert_eq!(config.experience.len(), 2);
        assert_eq!(config.education.len(), 1);
        assert!(config.contact.email.is_empty());
    }

    #[test]
    fn minimal_config_loads_with_defaults() {
        let json = minimal_json(r#"[{ "id": "home", "label": "Home" }]"#);
        let config = SiteConfig::from_json(&json).expect("minimal config");
        assert!(config.projects.is_empty());
        assert!(config.now_content.is_empty());
    }

    #[test]
    fn duplicate_nav_ids_are_rejected() {
        let json = minimal_json(
            r#"[{ "id": "home", "label": "Home" }, { "id": "home", "label": "Again" }]"#,
        );
        let Err(ConfigError::Invalid(violations)) = SiteConfig::from_json(&json) else {
            panic!("expected validation failure");
        };
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "nav_items[1].id");
    }

    #[test]
    fn missing_home_is_rejected() {
        let json = minimal_json(r#"[{ "id": "story", "label": "Story" }]"#);
        let err = SiteConfig::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("home section"));
    }

    #[test]
    fn empty_nav_id_fails_at_parse_time() {
        let json = minimal_json(r#"[{ "id": "", "label": "Home" }]"#);
        assert!(matches!(
            SiteConfig::from_json(&json),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn upwork_cta_needs_url() {
        let json = minimal_json(r#"[{ "id": "home", "label": "Home" }]"#)
            .replace(r#", "url": "https://example.com""#, "");
        let err = SiteConfig::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("hero.cta.primary.url"));
    }

    #[test]
    fn contact_env_overlays_only_set_values() {
        let config = SiteConfig::builtin()
            .unwrap()
            .with_contact_env(|key| match key {
                ENV_CONTACT_EMAIL => Some("me@example.com".into()),
                ENV_CONTACT_PHONE => Some("   ".into()),
                _ => None,
            });
        assert_eq!(config.contact.email, "me@example.com");
        assert!(config.contact.phone.is_empty());
        assert_eq!(config.contact.location, "Lahore, Pakistan");
    }

    #[test]
    fn cta_href_depends_on_configured_channel() {
        let config = SiteConfig::builtin().unwrap();
        let whatsapp = config.hero.cta.secondary.clone();
        assert_eq!(whatsapp.href(&config.contact), None);

        let config = config.with_contact_env(|key| {
            (key == ENV_WHATSAPP_URL).then(|| "https://wa.me/1".to_string())
        });
        assert_eq!(
            whatsapp.href(&config.contact).as_deref(),
            Some("https://wa.me/1")
        );
        assert!(
            config.hero.cta.primary.href(&config.contact).is_some_and(|h| h.contains("upwork"))
        );
    }
}
