use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{
        FilterSpec, GameId, GameRecord, InclusiveRange, LetterBucket, COMPLEXITY_BOUNDS,
        PLAYER_BOUNDS,
    },
    services::{
        clamp_page_index, filter, normalize, page, pagination::total_pages, resolve,
        RadarProfile, AXIS_LABELS,
    },
};

use super::AppState;

// Request/Response types

/// Catalogue filters as sent by the sidebar controls
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Exact display key, `"name (year)"`
    pub name: Option<String>,
    pub min_players_from: Option<u32>,
    pub min_players_to: Option<u32>,
    pub max_players_from: Option<u32>,
    pub max_players_to: Option<u32>,
    pub complexity_from: Option<f64>,
    pub complexity_to: Option<f64>,
    pub mechanic: Option<String>,
    pub letters: Option<String>,
    pub page: Option<usize>,
}

impl CatalogQuery {
    /// Missing bounds fall back to the full slider span
    pub fn filter_spec(&self) -> AppResult<FilterSpec> {
        let letters = match self.letters.as_deref() {
            Some(raw) => raw
                .parse::<LetterBucket>()
                .map_err(|e| AppError::InvalidInput(e.to_string()))?,
            None => LetterBucket::All,
        };

        let complexity_from = self.complexity_from.unwrap_or(COMPLEXITY_BOUNDS.low);
        let complexity_to = self.complexity_to.unwrap_or(COMPLEXITY_BOUNDS.high);
        if !complexity_from.is_finite() || !complexity_to.is_finite() {
            return Err(AppError::InvalidInput(
                "Complexity bounds must be finite numbers".to_string(),
            ));
        }

        Ok(FilterSpec {
            name_exact: self.name.clone(),
            min_players: InclusiveRange::new(
                self.min_players_from.unwrap_or(PLAYER_BOUNDS.low),
                self.min_players_to.unwrap_or(PLAYER_BOUNDS.high),
            ),
            max_players: InclusiveRange::new(
                self.max_players_from.unwrap_or(PLAYER_BOUNDS.low),
                self.max_players_to.unwrap_or(PLAYER_BOUNDS.high),
            ),
            complexity: InclusiveRange::new(complexity_from, complexity_to),
            mechanic: self.mechanic.clone(),
            letters,
        })
    }
}

/// Search by display key; bare `name` is the legacy form and returns the
/// first game loaded with that name
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub display_key: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}

/// Summary of a game as listed in the catalogue or under a recommendation
#[derive(Debug, Serialize)]
pub struct GameCard {
    pub id: GameId,
    pub name: String,
    pub year_published: Option<i32>,
    pub display_key: String,
    pub rating: Option<f64>,
    pub rating_average: Option<f64>,
    pub duration_avg_minutes: Option<f64>,
    pub min_players: u32,
    pub max_players: u32,
    pub complexity: Option<f64>,
    pub mechanics: Option<String>,
    pub category: String,
    pub french_edition: bool,
    pub thumbnail_url: String,
    pub bgg_url: String,
    pub radar: RadarProfile,
}

impl From<&GameRecord> for GameCard {
    fn from(game: &GameRecord) -> Self {
        Self {
            id: game.id,
            name: game.name.clone(),
            year_published: game.year_published,
            display_key: game.display_key(),
            rating: game.rating_bayes_average,
            rating_average: game.rating_average,
            duration_avg_minutes: game.duration_avg_minutes,
            min_players: game.min_players,
            max_players: game.max_players,
            complexity: game.complexity,
            mechanics: game.mechanics.clone(),
            category: game.category_label().to_string(),
            french_edition: game.french_edition.is_available(),
            thumbnail_url: game.thumbnail_or_placeholder().to_string(),
            bgg_url: game.bgg_url(),
            radar: normalize(game),
        }
    }
}

/// Full view of a selected game
#[derive(Debug, Serialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub card: GameCard,
    pub image_url: Option<String>,
    pub description: String,
}

impl From<&GameRecord> for GameDetail {
    fn from(game: &GameRecord) -> Self {
        Self {
            card: GameCard::from(game),
            image_url: game.image_url.clone(),
            description: game.description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogPageResponse {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub games: Vec<GameCard>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub selected: GameDetail,
    pub recommendations: Vec<GameCard>,
}

/// Everything the sidebar needs to build its controls
#[derive(Debug, Serialize)]
pub struct FilterOptionsResponse {
    pub letter_buckets: Vec<LetterBucket>,
    pub mechanics: Vec<String>,
    pub players: InclusiveRange<u32>,
    pub complexity: InclusiveRange<f64>,
    pub page_size: usize,
    pub radar_axes: Vec<&'static str>,
    pub display_keys: Vec<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let catalog = &state.catalog;
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "games": catalog.dataset.len(),
            "recommendation_sources": catalog.recommendations.len(),
            "loaded_at": catalog.loaded_at,
        })),
    )
}

/// Filtered, paginated catalogue, best-rated first
pub async fn list_games(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> AppResult<Json<CatalogPageResponse>> {
    let Query(query) = query?;
    let spec = query.filter_spec()?;
    let matches = filter::apply(&state.catalog.dataset, &spec);

    let page_size = state.settings.page_size;
    let requested = query.page.unwrap_or(1);
    let index = clamp_page_index(requested, total_pages(matches.len(), page_size));
    let current = page(&matches, page_size, index);

    tracing::info!(
        request_id = %request_id,
        results = matches.len(),
        requested_page = requested,
        page = index,
        "Catalogue page served"
    );

    Ok(Json(CatalogPageResponse {
        page: current.index,
        page_size,
        total_pages: current.total_pages,
        total_results: matches.len(),
        has_previous: current.has_previous(),
        has_next: current.has_next(),
        games: current.items.iter().map(|&game| GameCard::from(game)).collect(),
    }))
}

/// Single game by id
pub async fn get_game(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> AppResult<Json<GameDetail>> {
    let Path(id) = id?;
    state
        .catalog
        .dataset
        .get(GameId(id))
        .map(|game| Json(GameDetail::from(game)))
        .ok_or_else(|| AppError::NotFound(format!("Game {}", id)))
}

/// Resolves a `"name (year)"` search key to its game
pub async fn lookup_game(
    State(state): State<AppState>,
    query: Result<Query<LookupQuery>, QueryRejection>,
) -> AppResult<Json<GameDetail>> {
    let Query(query) = query?;
    let dataset = &state.catalog.dataset;
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

    let game = match (non_empty(query.display_key), non_empty(query.name)) {
        (Some(key), _) => dataset
            .lookup_display_key(&key)
            .ok_or_else(|| AppError::NotFound(format!("No game with display key {}", key)))?,
        (None, Some(name)) => dataset
            .find_by_name(&name)
            .ok_or_else(|| AppError::NotFound(format!("No game named {}", name)))?,
        (None, None) => {
            return Err(AppError::InvalidInput(
                "display_key or name is required".to_string(),
            ))
        }
    };

    Ok(Json(GameDetail::from(game)))
}

/// Selected game plus its precomputed neighbours
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<u64>, PathRejection>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationsResponse>> {
    let Path(id) = id?;
    let Query(query) = query?;
    let catalog = &state.catalog;
    let selected = catalog
        .dataset
        .get(GameId(id))
        .ok_or_else(|| AppError::NotFound(format!("Game {}", id)))?;

    let max_count = state.settings.max_recommendations;
    let limit = query.limit.map_or(max_count, |limit| limit.min(max_count));
    let recommendations = resolve(&catalog.dataset, &catalog.recommendations, selected.id, limit);

    if recommendations.is_empty() {
        tracing::info!(request_id = %request_id, id = %selected.id, "No recommendations found");
    } else {
        tracing::info!(
            request_id = %request_id,
            id = %selected.id,
            count = recommendations.len(),
            "Recommendations served"
        );
    }

    Ok(Json(RecommendationsResponse {
        selected: GameDetail::from(selected),
        recommendations: recommendations.into_iter().map(GameCard::from).collect(),
    }))
}

/// Options for the catalogue filters
pub async fn filter_options(State(state): State<AppState>) -> Json<FilterOptionsResponse> {
    let dataset = &state.catalog.dataset;

    Json(FilterOptionsResponse {
        letter_buckets: LetterBucket::ALL_BUCKETS.to_vec(),
        mechanics: dataset.mechanic_options(),
        players: PLAYER_BOUNDS,
        complexity: COMPLEXITY_BOUNDS,
        page_size: state.settings.page_size,
        radar_axes: AXIS_LABELS.to_vec(),
        display_keys: dataset.display_keys(),
    })
}
