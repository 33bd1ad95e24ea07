use folio_protocol::ThemeToken;
use serde::Serialize;

use crate::config::SiteConfig;

/// Color band of a journey entry, by recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineTone {
    Current,
    Recent,
    Past,
}

impl TimelineTone {
    /// Position 0 is the present. Position 1 is recent, as is anything but
    /// the last entry of a timeline of at most two. The rest is past.
    pub fn for_position(index: usize, total: usize) -> Self {
        if index == 0 {
            Self::Current
        } else if index == 1 || (total <= 2 && index + 1 < total) {
            Self::Recent
        } else {
            Self::Past
        }
    }

    pub fn token(self) -> ThemeToken {
        match self {
            Self::Current => ThemeToken::TimelineCurrent,
            Self::Recent => ThemeToken::TimelineRecent,
            Self::Past => ThemeToken::TimelinePast,
        }
    }

    /// Only the present entry pulses.
    pub fn pulses(self) -> bool {
        self == Self::Current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Experience,
    Education,
}

/// A journey row, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry<'a> {
    pub kind: EntryKind,
    pub title: &'a str,
    pub subtitle: &'a str,
    pub period: &'a str,
    pub location: &'a str,
    pub achievements: &'a [String],
    pub index: usize,
    pub tone: TimelineTone,
    /// Last entry of its group; the connecting line is not drawn.
    pub is_last: bool,
}

/// Experience first, then education, numbered across both groups.
pub fn journey(config: &SiteConfig) -> Vec<TimelineEntry<'_>> {
    let total = config.experience.len() + config.education.len();
    let mut entries = Vec::with_capacity(total);

    for (i, exp) in config.experience.iter().enumerate() {
        let index = entries.len();
        entries.push(TimelineEntry {
            kind: EntryKind::Experience,
            title: &exp.title,
            subtitle: &exp.company,
            period: &exp.period,
            location: &exp.location,
            achievements: &exp.achievements,
            index,
            tone: TimelineTone::for_position(index, total),
            is_last: i + 1 == config.experience.len(),
        });
    }

    for edu in &config.education {
        let index = entries.len();
        entries.push(TimelineEntry {
            kind: EntryKind::Education,
            title: &edu.degree,
            subtitle: &edu.institution,
            period: &edu.years,
            location: &edu.location,
            achievements: &[],
            index,
            tone: TimelineTone::for_position(index, total),
            is_last: index + 1 == total,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use TimelineTone::*;

    #[test]
    fn tone_by_position() {
        assert_eq!(TimelineTone::for_position(0, 3), Current);
        assert_eq!(TimelineTone::for_position(1, 3), Recent);
        assert_eq!(TimelineTone::for_position(2, 3), Past);
        assert_eq!(TimelineTone::for_position(5, 9), Past);
    }

    #[test]
    fn short_timelines() {
        assert_eq!(TimelineTone::for_position(0, 1), Current);
        // Index 1 is recent by the first rule even when it is the last of two.
        assert_eq!(TimelineTone::for_position(1, 2), Recent);
    }

    #[test]
    fn builtin_journey() {
        let config = SiteConfig::builtin().unwrap();
        let entries = journey(&config);
        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.kind, e.tone, e.is_last))
            .collect();
        assert_eq!(
            summary,
            vec![
                (EntryKind::Experience, Current, false),
                (EntryKind::Experience, Recent, true),
                (EntryKind::Education, Past, true),
            ]
        );
        assert_eq!(entries[2].title, "Bachelor of Science in Computer Science");
        assert!(entries[2].achievements.is_empty());
        assert!(entries[0].tone.pulses());
    }
}
