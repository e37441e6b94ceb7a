use std::collections::HashMap;

use crate::{
    db::{
        dataset::{Catalog, Dataset, RecommendationTable},
        source::{CatalogSource, GameRow, ThumbnailRow},
    },
    error::AppResult,
    models::{FrenchEdition, GameId, GameRecord},
};

/// Loads and indexes the whole snapshot
///
/// Called once at start-up. Any error here is fatal for the service: the
/// catalogue is never served from a partial or empty snapshot.
pub fn load_catalog(source: &dyn CatalogSource) -> AppResult<Catalog> {
    tracing::info!(source = source.name(), "Loading catalogue snapshot");

    let games = source.games()?;
    let thumbnails = source.thumbnails()?;
    let recommendation_rows = source.recommendations()?;

    tracing::debug!(
        games = games.len(),
        thumbnails = thumbnails.len(),
        recommendation_rows = recommendation_rows.len(),
        "Snapshot tables read"
    );

    let dataset = Dataset::new(join_thumbnails(games, thumbnails))?;
    let recommendations = RecommendationTable::from_rows(recommendation_rows);

    tracing::info!(
        games = dataset.len(),
        recommendation_sources = recommendations.len(),
        "Catalogue loaded"
    );

    Ok(Catalog::new(dataset, recommendations))
}

/// Left join of the game table with the thumbnail table on `id`
///
/// Games without a thumbnail row keep a `None` thumbnail; the first
/// thumbnail row for an id wins.
pub fn join_thumbnails(games: Vec<GameRow>, thumbnails: Vec<ThumbnailRow>) -> Vec<GameRecord> {
    let mut thumbnail_by_id: HashMap<u64, Option<String>> = HashMap::with_capacity(thumbnails.len());
    for row in thumbnails {
        thumbnail_by_id.entry(row.id).or_insert(row.thumbnail);
    }

    games
        .into_iter()
        .map(|game| {
            let thumbnail = thumbnail_by_id.get(&game.id).cloned().flatten();
            into_record(game, thumbnail)
        })
        .collect()
}

fn into_record(row: GameRow, thumbnail_url: Option<String>) -> GameRecord {
    GameRecord {
        id: GameId(row.id),
        name: row.name,
        year_published: row.year_published.and_then(whole_number).map(|y| y as i32),
        min_players: player_count(row.min_players),
        max_players: player_count(row.max_players),
        complexity: finite(row.complexity),
        rating_average: finite(row.rating_average),
        rating_bayes_average: finite(row.rating_bayes_average),
        mechanics: non_blank(row.mechanics),
        categories: non_blank(row.categories),
        duration_avg_minutes: finite(row.duration_avg_minutes),
        french_edition: FrenchEdition::from_flag(row.french_edition.as_deref()),
        thumbnail_url: non_blank(thumbnail_url),
        image_url: non_blank(row.image_url),
        description: row.description.unwrap_or_default(),
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn whole_number(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.round())
}

/// Missing or negative counts become 0
fn player_count(value: Option<f64>) -> u32 {
    value
        .and_then(whole_number)
        .map(|v| v.clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(0)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
