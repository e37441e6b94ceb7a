use serde::Deserialize;
use std::{fs::File, io::Read, path::Path};

use crate::{
    config::Config,
    db::dataset::{Neighbour, RecommendationRow},
    error::{AppError, AppResult},
    models::GameId,
};

/// Raw row of the game metadata table
///
/// Numeric columns are read as floats: the snapshot is produced by a
/// dataframe export that writes integers as `2.0` once a column holds a gap.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameRow {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "yearpublished")]
    pub year_published: Option<f64>,
    #[serde(rename = "Min_joueurs")]
    pub min_players: Option<f64>,
    #[serde(rename = "Max_joueurs")]
    pub max_players: Option<f64>,
    #[serde(rename = "Complexite")]
    pub complexity: Option<f64>,
    #[serde(rename = "average")]
    pub rating_average: Option<f64>,
    #[serde(rename = "bayesaverage")]
    pub rating_bayes_average: Option<f64>,
    #[serde(rename = "Mecaniques")]
    pub mechanics: Option<String>,
    #[serde(rename = "Categories")]
    pub categories: Option<String>,
    #[serde(rename = "Duree_moy")]
    pub duration_avg_minutes: Option<f64>,
    #[serde(rename = "Francais")]
    pub french_edition: Option<String>,
    #[serde(rename = "Image")]
    pub image_url: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
}

/// Raw row of the thumbnail table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThumbnailRow {
    pub id: u64,
    #[serde(rename = "Thumbnail")]
    pub thumbnail: Option<String>,
}

/// Supplier of the three snapshot tables
///
/// The catalogue only consumes parsed rows; where they come from (files,
/// fixtures) is up to the implementation.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogSource: Send + Sync {
    fn games(&self) -> AppResult<Vec<GameRow>>;

    fn thumbnails(&self) -> AppResult<Vec<ThumbnailRow>>;

    fn recommendations(&self) -> AppResult<Vec<RecommendationRow>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Reads the snapshot from three CSV files
#[derive(Debug, Clone)]
pub struct CsvSource {
    games_path: String,
    thumbnails_path: String,
    recommendations_path: String,
}

impl CsvSource {
    pub fn new(
        games_path: impl Into<String>,
        thumbnails_path: impl Into<String>,
        recommendations_path: impl Into<String>,
    ) -> Self {
        Self {
            games_path: games_path.into(),
            thumbnails_path: thumbnails_path.into(),
            recommendations_path: recommendations_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.games_path.clone(),
            config.thumbnails_path.clone(),
            config.recommendations_path.clone(),
        )
    }

    fn read_file<T>(path: &str, parse: impl FnOnce(File) -> AppResult<T>) -> AppResult<T> {
        tracing::debug!(path = %path, "Reading snapshot table");

        let file = File::open(Path::new(path)).map_err(|e| AppError::Snapshot {
            path: path.to_string(),
            source: csv::Error::from(e),
        })?;

        parse(file).map_err(|e| match e {
            AppError::Csv(source) => AppError::Snapshot {
                path: path.to_string(),
                source,
            },
            other => other,
        })
    }
}

impl CatalogSource for CsvSource {
    fn games(&self) -> AppResult<Vec<GameRow>> {
        Self::read_file(&self.games_path, read_games)
    }

    fn thumbnails(&self) -> AppResult<Vec<ThumbnailRow>> {
        Self::read_file(&self.thumbnails_path, read_thumbnails)
    }

    fn recommendations(&self) -> AppResult<Vec<RecommendationRow>> {
        Self::read_file(&self.recommendations_path, read_recommendations)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader)
}

/// Parses the game metadata table
pub fn read_games<R: Read>(reader: R) -> AppResult<Vec<GameRow>> {
    let mut reader = csv_reader(reader);
    let mut rows = Vec::new();

    for row in reader.deserialize() {
        rows.push(row?);
    }

    Ok(rows)
}

/// Parses the thumbnail table; extra columns are ignored
pub fn read_thumbnails<R: Read>(reader: R) -> AppResult<Vec<ThumbnailRow>> {
    let mut reader = csv_reader(reader);
    let mut rows = Vec::new();

    for row in reader.deserialize() {
        rows.push(row?);
    }

    Ok(rows)
}

/// Parses the recommendation table
///
/// The first column holds the source id; each further column is a
/// similarity slot, left to right in rank order. Empty cells are skipped.
pub fn read_recommendations<R: Read>(reader: R) -> AppResult<Vec<RecommendationRow>> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;

        let Some(source) = record.get(0).and_then(parse_game_id) else {
            tracing::warn!(
                line = ?record.position().map(|p| p.line()),
                "Recommendation row without a valid source id skipped"
            );
            continue;
        };

        let neighbours = record
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(column, cell)| {
                let id = parse_game_id(cell)?;
                let slot = headers
                    .get(column)
                    .map(str::to_string)
                    .unwrap_or_else(|| column.to_string());
                Some(Neighbour { slot, id })
            })
            .collect();

        rows.push(RecommendationRow { source, neighbours });
    }

    Ok(rows)
}

/// Parses an id cell, accepting float notation such as `201.0`
pub fn parse_game_id(cell: &str) -> Option<GameId> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    cell.parse::<u64>()
        .ok()
        .or_else(|| {
            cell.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
                .map(|v| v as u64)
        })
        .map(GameId)
}
