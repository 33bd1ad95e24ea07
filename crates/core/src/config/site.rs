use folio_protocol::SectionId;
use serde::{Deserialize, Serialize};

/// All content shown on the page. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub contact: ContactInfo,
    pub social: SocialLinks,
    pub hero: HeroConfig,
    pub nav_items: Vec<NavItem>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub skill_categories: Vec<SkillCategory>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub professional_skills: Vec<String>,
    pub story_title: String,
    #[serde(default)]
    pub story_paragraphs: Vec<String>,
    #[serde(default)]
    pub story_quote: String,
    #[serde(default)]
    pub now_content: String,
}

/// Contact channels. Kept out of the content file and filled from the
/// environment, see [`SiteConfig::with_contact_env`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub linkedin: String,
    pub medium: String,
    pub github: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroConfig {
    pub title: String,
    pub subtitle: String,
    pub cta: HeroCtas,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroCtas {
    pub primary: HeroCta,
    pub secondary: HeroCta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroCta {
    pub text: String,
    pub action: CtaAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaAction {
    Email,
    Whatsapp,
    Upwork,
}

impl HeroCta {
    /// Where the call-to-action leads, given the configured contact channels.
    ///
    /// `None` when the channel it needs is not configured.
    pub fn href(&self, contact: &ContactInfo) -> Option<String> {
        match self.action {
            CtaAction::Email if !contact.email.is_empty() => {
                Some(format!("mailto:{}", contact.email))
            }
            CtaAction::Whatsapp if !contact.whatsapp.is_empty() => Some(contact.whatsapp.clone()),
            CtaAction::Upwork => self.url.clone(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub id: SectionId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub years: String,
    pub institution: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub period: String,
    pub location: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub description: Vec<String>,
    pub tech: Vec<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<String>,
}
