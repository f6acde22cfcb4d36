//! Lead intent categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reply intent category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadIntent {
    Interested,
    NotInterested,
    OutOfOffice,
    MeetingBooked,
    /// No category recognized
    Neutral,
}

impl LeadIntent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Interested => "Interested",
            Self::NotInterested => "Not Interested",
            Self::OutOfOffice => "Out of Office",
            Self::MeetingBooked => "Meeting Booked",
            Self::Neutral => "Neutral",
        }
    }

    /// Category named first in free-form analysis text
    pub fn detect(text: &str) -> Self {
        const CATEGORIES: [LeadIntent; 4] = [
            LeadIntent::NotInterested,
            LeadIntent::Interested,
            LeadIntent::OutOfOffice,
            LeadIntent::MeetingBooked,
        ];

        let lower = text.to_lowercase();
        CATEGORIES
            .iter()
            .filter_map(|intent| {
                lower
                    .find(&intent.label().to_lowercase())
                    .map(|pos| (pos, *intent))
            })
            // "not interested" starts before the "interested" inside it
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, intent)| intent)
            .unwrap_or(Self::Neutral)
    }
}

impl fmt::Display for LeadIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of analyzing a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentAnalysis {
    /// Backend text, or the fallback
    pub analysis: String,
    pub intent: LeadIntent,
    /// Whether the backend failed and the fallback was used
    pub fallback: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_categories() {
        assert_eq!(
            LeadIntent::detect("Interested. The lead asks to chat tomorrow."),
            LeadIntent::Interested
        );
        assert_eq!(
            LeadIntent::detect("**Not Interested** - they are not looking right now."),
            LeadIntent::NotInterested
        );
        assert_eq!(
            LeadIntent::detect("Category: Out of Office. Auto-reply until Monday."),
            LeadIntent::OutOfOffice
        );
        assert_eq!(
            LeadIntent::detect("meeting booked: a time was confirmed"),
            LeadIntent::MeetingBooked
        );
        assert_eq!(LeadIntent::detect("Neutral"), LeadIntent::Neutral);
    }

    #[test]
    fn test_first_mentioned_category_wins() {
        assert_eq!(
            LeadIntent::detect("Interested rather than Not Interested, since they ask about pricing."),
            LeadIntent::Interested
        );
    }
}
