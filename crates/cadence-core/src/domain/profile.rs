use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Brand and voice profile of an organization - the context handed to the
/// content generator. Every descriptive field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandProfile {
    pub organization_id: Uuid,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub audience: Option<String>,
    pub tone: Option<String>,
    pub goals: Option<String>,
    pub themes: Option<String>,
    pub channels: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BrandProfile {
    pub fn new(organization_id: Uuid) -> Self {
        Self {
            organization_id,
            ..Default::default()
        }
    }

    /// Labelled, non-blank descriptive fields in a stable order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Company", &self.company_name),
            ("Description", &self.description),
            ("Target audience", &self.audience),
            ("Tone of voice", &self.tone),
            ("Goals", &self.goals),
            ("Themes", &self.themes),
            ("Channels", &self.channels),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (label, v))
        })
        .collect()
    }
}
