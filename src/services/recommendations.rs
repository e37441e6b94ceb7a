use crate::{
    db::{Dataset, RecommendationTable},
    models::{GameId, GameRecord},
};

/// Max games shown under a selection (five rows of three)
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 15;

/// Resolves the precomputed neighbours of `selected`
///
/// Takes the first `max_count` neighbours in similarity-rank order and maps
/// them back to full records. Neighbours missing from the dataset are
/// dropped, so the result may be shorter than `max_count`. A game with no
/// row in the table yields an empty list.
pub fn resolve<'a>(
    dataset: &'a Dataset,
    table: &RecommendationTable,
    selected: GameId,
    max_count: usize,
) -> Vec<&'a GameRecord> {
    let Some(neighbours) = table.neighbours(selected) else {
        tracing::debug!(id = %selected, "No precomputed recommendations");
        return Vec::new();
    };

    neighbours
        .iter()
        .take(max_count)
        .filter_map(|neighbour| {
            let record = dataset.get(neighbour.id);
            if record.is_none() {
                tracing::debug!(
                    id = %selected,
                    neighbour = %neighbour.id,
                    slot = %neighbour.slot,
                    "Recommended game missing from catalogue"
                );
            }
            record
        })
        .collect()
}
