use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod filter;

pub use filter::{FilterSpec, InclusiveRange, LetterBucket, COMPLEXITY_BOUNDS, PLAYER_BOUNDS};

/// Base URL of a game's BoardGameGeek page
pub const BGG_GAME_URL: &str = "https://boardgamegeek.com/boardgame";

/// Image shown when a game has no thumbnail
pub const PLACEHOLDER_THUMBNAIL: &str = "https://via.placeholder.com/200";

/// Label used when a game has no category
pub const UNSPECIFIED_CATEGORY: &str = "Not specified";

/// BoardGameGeek identifier, the only key shared by every snapshot table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl GameId {
    /// Link to the game's page on BoardGameGeek
    pub fn bgg_url(&self) -> String {
        format!("{}/{}", BGG_GAME_URL, self.0)
    }
}

impl Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a French edition exists. Unknown is treated as no.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrenchEdition {
    Yes,
    No,
    #[default]
    Unknown,
}

impl FrenchEdition {
    /// Parses the snapshot's `Yes` / `No` flag; anything else is unknown
    pub fn from_flag(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(flag) if flag.eq_ignore_ascii_case("yes") => FrenchEdition::Yes,
            Some(flag) if flag.eq_ignore_ascii_case("no") => FrenchEdition::No,
            _ => FrenchEdition::Unknown,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, FrenchEdition::Yes)
    }
}

/// One board game, joined with its thumbnail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    pub id: GameId,
    /// Not unique: two games may share a name across years
    pub name: String,
    pub year_published: Option<i32>,
    /// Expected to be `<= max_players`, not enforced
    pub min_players: u32,
    pub max_players: u32,
    /// Nominal range [1, 5]
    pub complexity: Option<f64>,
    /// Nominal range [0, 10]
    pub rating_average: Option<f64>,
    /// Nominal range [0, 10]; default sort key
    pub rating_bayes_average: Option<f64>,
    /// Comma-delimited, kept as opaque text
    pub mechanics: Option<String>,
    pub categories: Option<String>,
    pub duration_avg_minutes: Option<f64>,
    pub french_edition: FrenchEdition,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
    pub description: String,
}

impl GameRecord {
    /// Creates a record with every optional attribute missing
    pub fn new(id: GameId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            year_published: None,
            min_players: 0,
            max_players: 0,
            complexity: None,
            rating_average: None,
            rating_bayes_average: None,
            mechanics: None,
            categories: None,
            duration_avg_minutes: None,
            french_edition: FrenchEdition::Unknown,
            thumbnail_url: None,
            image_url: None,
            description: String::new(),
        }
    }

    /// Human-readable search key, `"name (year)"`
    pub fn display_key(&self) -> String {
        match self.year_published {
            Some(year) => format!("{} ({})", self.name, year),
            None => self.name.clone(),
        }
    }

    pub fn thumbnail_or_placeholder(&self) -> &str {
        self.thumbnail_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(PLACEHOLDER_THUMBNAIL)
    }

    pub fn category_label(&self) -> &str {
        self.categories
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(UNSPECIFIED_CATEGORY)
    }

    pub fn bgg_url(&self) -> String {
        self.id.bgg_url()
    }
}
