//! Keyword-based issue categorisation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Topical label assigned to every issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Roads, pavements and street furniture.
    Roadways,
    /// Pollution, waste, parks and noise.
    Environmental,
    /// Safety, crime and public lighting.
    Community,
    /// Drainage, leaks and sewers.
    Sewage,
    /// Vehicles, parking and congestion.
    Traffic,
    /// Anything no other rule claims.
    General,
}

impl Category {
    /// All labels in rule-table order.
    pub const ALL: [Self; 6] = [
        Self::Roadways,
        Self::Environmental,
        Self::Community,
        Self::Sewage,
        Self::Traffic,
        Self::General,
    ];

    /// Display label persisted alongside each issue.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Roadways => "Roadways",
            Self::Environmental => "Environmental",
            Self::Community => "Community",
            Self::Sewage => "Sewage",
            Self::Traffic => "Traffic",
            Self::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered rule table. The first category with a matching keyword wins, so
/// "water" always lands in [`Category::Environmental`] before
/// [`Category::Sewage`] is consulted.
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::Roadways,
        &[
            "road",
            "pothole",
            "street",
            "highway",
            "pavement",
            "traffic light",
            "sign",
        ],
    ),
    (
        Category::Environmental,
        &[
            "pollution",
            "waste",
            "garbage",
            "tree",
            "park",
            "air",
            "water",
            "noise",
        ],
    ),
    (
        Category::Community,
        &[
            "community",
            "safety",
            "crime",
            "lighting",
            "security",
            "vandalism",
        ],
    ),
    (
        Category::Sewage,
        &[
            "sewage", "drainage", "water", "leak", "pipe", "overflow", "sewer",
        ],
    ),
    (
        Category::Traffic,
        &[
            "traffic",
            "parking",
            "vehicle",
            "signal",
            "jam",
            "congestion",
            "speed",
        ],
    ),
    (
        Category::General,
        &["other", "miscellaneous", "complaint", "suggestion"],
    ),
];

/// Assign a category to an issue from its title and description.
///
/// The two fields are joined with a single space and lowercased, then each
/// rule is tested in table order for any keyword occurring as a substring.
/// Text matching no rule falls back to [`Category::General`].
///
/// # Examples
///
/// ```
/// use cityeye::{Category, categorize};
///
/// assert_eq!(categorize("Pothole", "near the school"), Category::Roadways);
/// assert_eq!(categorize("Water", "sewer backing up"), Category::Environmental);
/// assert_eq!(categorize("Hello", "world"), Category::General);
/// ```
#[must_use]
pub fn categorize(title: &str, description: &str) -> Category {
    let text = format!("{title} {description}").to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map_or(Category::General, |(category, _)| *category)
}

#[cfg(test)]
mod tests {
    //! Covers first-match ordering and fallback behaviour.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::pothole("Pothole", "", Category::Roadways)]
    #[case::traffic_light("Broken traffic light", "", Category::Roadways)]
    #[case::garbage("Garbage", "not collected for a week", Category::Environmental)]
    #[case::vandalism("Vandalism", "bus shelter smashed", Category::Community)]
    #[case::leak("Leak", "pipe burst under the pavement", Category::Roadways)]
    #[case::sewer("Sewer", "overflow at the corner", Category::Sewage)]
    #[case::congestion("Congestion", "cars queued at the junction", Category::Traffic)]
    #[case::parking_hits_park_first("Parking", "cars blocking the lane", Category::Environmental)]
    #[case::complaint("Complaint", "about the office hours", Category::General)]
    fn assigns_first_matching_category(
        #[case] title: &str,
        #[case] description: &str,
        #[case] expected: Category,
    ) {
        assert_eq!(categorize(title, description), expected);
    }

    #[test]
    fn water_prefers_environmental_over_sewage() {
        assert_eq!(
            categorize("Water everywhere", "the sewer is blocked"),
            Category::Environmental
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(categorize("SEWAGE", "OVERFLOW"), Category::Sewage);
    }

    #[test]
    fn keywords_match_inside_longer_words() {
        // "signal" contains "sign", so the roadways rule fires first.
        assert_eq!(categorize("Signal", "stuck on red"), Category::Roadways);
    }

    #[test]
    fn keywords_may_span_title_and_description() {
        assert_eq!(categorize("traffic", "light out"), Category::Roadways);
    }

    #[rstest]
    #[case("", "")]
    #[case("Hello", "world")]
    #[case("🚧", "ünïcödé")]
    fn falls_back_to_general(#[case] title: &str, #[case] description: &str) {
        assert_eq!(categorize(title, description), Category::General);
    }

    #[test]
    fn every_rule_label_is_a_known_category() {
        let labels: Vec<_> = CATEGORY_RULES.iter().map(|(category, _)| *category).collect();
        assert_eq!(labels, Category::ALL);
    }

    #[test]
    fn category_serialises_as_label() {
        let json = serde_json::to_string(&Category::Environmental).expect("serialise");
        assert_eq!(json, "\"Environmental\"");
    }
}
