use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Full span of the player-count sliders
pub const PLAYER_BOUNDS: InclusiveRange<u32> = InclusiveRange { low: 1, high: 10 };

/// Full span of the complexity slider
pub const COMPLEXITY_BOUNDS: InclusiveRange<f64> = InclusiveRange {
    low: 1.0,
    high: 5.0,
};

/// Mechanic selections that disable the mechanic filter
const MECHANIC_WILDCARDS: [&str; 2] = ["tous", "all"];

/// Closed interval `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InclusiveRange<T> {
    pub low: T,
    pub high: T,
}

impl<T: PartialOrd + Copy> InclusiveRange<T> {
    /// Builds a range from two bounds given in either order
    pub fn new(a: T, b: T) -> Self {
        if b < a {
            Self { low: b, high: a }
        } else {
            Self { low: a, high: b }
        }
    }

    pub fn contains(&self, value: T) -> bool {
        self.low <= value && value <= self.high
    }

    /// True when this range spans all of `bounds`, making it a no-op filter
    pub fn covers(&self, bounds: &InclusiveRange<T>) -> bool {
        self.low <= bounds.low && self.high >= bounds.high
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown letter range: {0}")]
pub struct ParseLetterBucketError(pub String);

/// Coarse alphabetic partition of game names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LetterBucket {
    #[default]
    All,
    AToE,
    FToJ,
    KToO,
    PToT,
    UToZ,
    /// First character outside A-Z
    Other,
}

impl LetterBucket {
    /// Every bucket, in menu order
    pub const ALL_BUCKETS: [LetterBucket; 7] = [
        LetterBucket::All,
        LetterBucket::AToE,
        LetterBucket::FToJ,
        LetterBucket::KToO,
        LetterBucket::PToT,
        LetterBucket::UToZ,
        LetterBucket::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LetterBucket::All => "All",
            LetterBucket::AToE => "A - E",
            LetterBucket::FToJ => "F - J",
            LetterBucket::KToO => "K - O",
            LetterBucket::PToT => "P - T",
            LetterBucket::UToZ => "U - Z",
            LetterBucket::Other => "Other",
        }
    }

    /// Inclusive uppercase bounds of a letter range
    pub fn bounds(self) -> Option<(char, char)> {
        match self {
            LetterBucket::AToE => Some(('A', 'E')),
            LetterBucket::FToJ => Some(('F', 'J')),
            LetterBucket::KToO => Some(('K', 'O')),
            LetterBucket::PToT => Some(('P', 'T')),
            LetterBucket::UToZ => Some(('U', 'Z')),
            LetterBucket::All | LetterBucket::Other => None,
        }
    }

    /// Tests the first character of `name`, uppercased, against the bucket
    pub fn matches(self, name: &str) -> bool {
        let first = name.chars().next().map(|c| c.to_ascii_uppercase());

        match (self, self.bounds()) {
            (LetterBucket::All, _) => true,
            (_, Some((low, high))) => first.is_some_and(|c| (low..=high).contains(&c)),
            _ => !first.is_some_and(|c| c.is_ascii_uppercase()),
        }
    }
}

impl Display for LetterBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LetterBucket {
    type Err = ParseLetterBucketError;

    /// Accepts the menu labels (`"A - E"`, `"All"`, `"Other"`), the French
    /// `"Tous"`/`"Autres"` and the compact `"A-E"` form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        match compact.as_str() {
            "" | "TOUS" | "ALL" => Ok(LetterBucket::All),
            "AUTRES" | "OTHER" => Ok(LetterBucket::Other),
            _ => LetterBucket::ALL_BUCKETS
                .into_iter()
                .find(|bucket| {
                    bucket
                        .bounds()
                        .is_some_and(|(low, high)| compact == format!("{}-{}", low, high))
                })
                .ok_or_else(|| ParseLetterBucketError(s.to_string())),
        }
    }
}

impl From<LetterBucket> for String {
    fn from(bucket: LetterBucket) -> Self {
        bucket.label().to_string()
    }
}

impl TryFrom<String> for LetterBucket {
    type Error = ParseLetterBucketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One catalogue query. Rebuilt for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Exact display key; when set, every other filter is ignored
    pub name_exact: Option<String>,
    pub min_players: InclusiveRange<u32>,
    pub max_players: InclusiveRange<u32>,
    pub complexity: InclusiveRange<f64>,
    /// Case-insensitive substring of the mechanics text
    pub mechanic: Option<String>,
    pub letters: LetterBucket,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            name_exact: None,
            min_players: PLAYER_BOUNDS,
            max_players: PLAYER_BOUNDS,
            complexity: COMPLEXITY_BOUNDS,
            mechanic: None,
            letters: LetterBucket::All,
        }
    }
}

impl FilterSpec {
    /// The display key to match, if the name search is active
    pub fn name_key(&self) -> Option<&str> {
        self.name_exact.as_deref().filter(|key| !key.is_empty())
    }

    /// Lowercased mechanic needle, `None` for blank or wildcard selections
    pub fn mechanic_needle(&self) -> Option<String> {
        let mechanic = self.mechanic.as_deref()?.trim();
        let lowered = mechanic.to_lowercase();

        if lowered.is_empty() || MECHANIC_WILDCARDS.contains(&lowered.as_str()) {
            None
        } else {
            Some(lowered)
        }
    }
}
