use serde::Serialize;

use crate::models::GameRecord;

/// Radar axis labels, in [`RadarProfile`] field order
pub const AXIS_LABELS: [&str; 4] = ["Average player count", "Play time", "Complexity", "Rating"];

/// Used when complexity or rating is missing
const MISSING_SCORE_DEFAULT: f64 = 1.0;

const MAX_COMPLEXITY: f64 = 5.0;
const MAX_RATING: f64 = 10.0;
const DURATION_BUCKETS: f64 = 4.0;
const PLAYER_BUCKETS: f64 = 4.0;

/// Four comparable axes, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarProfile {
    pub player_count: f64,
    pub duration: f64,
    pub complexity: f64,
    pub rating: f64,
}

/// Derives the radar profile of a game
///
/// Missing complexity and rating silently default to 1 and a missing
/// duration counts as the shortest bucket, so the chart always renders.
pub fn normalize(record: &GameRecord) -> RadarProfile {
    RadarProfile {
        player_count: player_bucket(record.min_players, record.max_players) as f64 / PLAYER_BUCKETS,
        duration: duration_bucket(record.duration_avg_minutes) as f64 / DURATION_BUCKETS,
        complexity: bounded_score(record.complexity, MAX_COMPLEXITY),
        rating: bounded_score(record.rating_bayes_average, MAX_RATING),
    }
}

/// 0 up to 30 min, 1 up to 1h, 2 up to 2h, 3 up to 3h, 4 beyond
pub fn duration_bucket(minutes: Option<f64>) -> u8 {
    match minutes.filter(|m| !m.is_nan()) {
        None => 0,
        Some(m) if m <= 30.0 => 0,
        Some(m) if m <= 60.0 => 1,
        Some(m) if m <= 120.0 => 2,
        Some(m) if m <= 180.0 => 3,
        Some(_) => 4,
    }
}

/// Bucket of the average of min and max players: 1 up to 2, 2 up to 4,
/// 3 up to 8, 4 beyond
pub fn player_bucket(min_players: u32, max_players: u32) -> u8 {
    let average = (min_players as f64 + max_players as f64) / 2.0;

    if average <= 2.0 {
        1
    } else if average <= 4.0 {
        2
    } else if average <= 8.0 {
        3
    } else {
        4
    }
}

fn bounded_score(value: Option<f64>, max: f64) -> f64 {
    let value = value
        .filter(|v| !v.is_nan())
        .unwrap_or(MISSING_SCORE_DEFAULT);
    value.clamp(0.0, max) / max
}
