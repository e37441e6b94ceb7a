use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::{
    error::{AppError, AppResult},
    models::{GameId, GameRecord},
};

/// Immutable game table with its lookup indexes
///
/// Built once from the joined snapshot. Records keep their load order; the
/// rating order used by the catalogue is computed here once and reused by
/// every query.
#[derive(Debug)]
pub struct Dataset {
    records: Vec<GameRecord>,
    by_id: HashMap<GameId, usize>,
    by_display_key: HashMap<String, usize>,
    ranked: Vec<usize>,
}

impl Dataset {
    /// Indexes `records`. Later duplicates of an id or display key are
    /// dropped from the index in favour of the first one loaded.
    pub fn new(records: Vec<GameRecord>) -> AppResult<Self> {
        let mut kept = Vec::with_capacity(records.len());
        let mut by_id = HashMap::with_capacity(records.len());

        for record in records {
            if by_id.contains_key(&record.id) {
                tracing::warn!(id = %record.id, name = %record.name, "Duplicate game id ignored");
                continue;
            }
            by_id.insert(record.id, kept.len());
            kept.push(record);
        }

        if kept.is_empty() {
            return Err(AppError::EmptyDataset);
        }

        let mut by_display_key = HashMap::with_capacity(kept.len());
        for (index, record) in kept.iter().enumerate() {
            let key = record.display_key();
            if by_display_key.contains_key(&key) {
                tracing::warn!(display_key = %key, id = %record.id, "Ambiguous display key, keeping first game");
                continue;
            }
            by_display_key.insert(key, index);
        }

        let mut ranked: Vec<usize> = (0..kept.len()).collect();
        ranked.sort_by(|&a, &b| by_bayes_rating_desc(&kept[a], &kept[b]));

        Ok(Self {
            records: kept,
            by_id,
            by_display_key,
            ranked,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: GameId) -> Option<&GameRecord> {
        self.by_id.get(&id).map(|&index| &self.records[index])
    }

    /// Resolves a `"name (year)"` display key to its game
    pub fn lookup_display_key(&self, key: &str) -> Option<&GameRecord> {
        self.by_display_key
            .get(key)
            .map(|&index| &self.records[index])
    }

    /// Legacy lookup by bare name; returns the first game loaded with it
    pub fn find_by_name(&self, name: &str) -> Option<&GameRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    /// Records by bayes rating, best first; ties keep load order
    pub fn ranked(&self) -> impl Iterator<Item = &GameRecord> + '_ {
        self.ranked.iter().map(move |&index| &self.records[index])
    }

    /// Display keys in load order, one per indexed game
    pub fn display_keys(&self) -> Vec<String> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let key = record.display_key();
                (self.by_display_key.get(&key) == Some(&index)).then_some(key)
            })
            .collect()
    }

    /// Distinct non-empty mechanics values, sorted
    pub fn mechanic_options(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|record| record.mechanics.as_deref())
            .filter(|mechanics| !mechanics.trim().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

fn bayes_rating(record: &GameRecord) -> Option<f64> {
    record.rating_bayes_average.filter(|rating| !rating.is_nan())
}

/// Descending rating; unrated games sort last
fn by_bayes_rating_desc(a: &GameRecord, b: &GameRecord) -> Ordering {
    match (bayes_rating(a), bayes_rating(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One entry of a precomputed neighbour list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbour {
    /// Column label in the source table
    pub slot: String,
    pub id: GameId,
}

/// A source game and its neighbours in similarity-rank order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRow {
    pub source: GameId,
    pub neighbours: Vec<Neighbour>,
}

/// Precomputed similarity table: source id to ranked neighbour ids
#[derive(Debug, Default)]
pub struct RecommendationTable {
    entries: HashMap<GameId, Vec<Neighbour>>,
}

impl RecommendationTable {
    /// Builds the table; a repeated source id keeps its first row
    pub fn from_rows(rows: Vec<RecommendationRow>) -> Self {
        let mut entries = HashMap::with_capacity(rows.len());

        for row in rows {
            if entries.contains_key(&row.source) {
                tracing::warn!(source = %row.source, "Duplicate recommendation row ignored");
                continue;
            }
            entries.insert(row.source, row.neighbours);
        }

        Self { entries }
    }

    /// Ranked neighbours of `id`, `None` when the table has no row for it
    pub fn neighbours(&self, id: GameId) -> Option<&[Neighbour]> {
        self.entries.get(&id).map(Vec::as_slice)
    }

    /// Number of source games with a row
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything loaded at start-up, shared read-only by every request
#[derive(Debug)]
pub struct Catalog {
    pub dataset: Dataset,
    pub recommendations: RecommendationTable,
    pub loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn new(dataset: Dataset, recommendations: RecommendationTable) -> Self {
        Self {
            dataset,
            recommendations,
            loaded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(id: u64, name: &str, year: i32, rating: Option<f64>) -> GameRecord {
        GameRecord {
            year_published: Some(year),
            rating_bayes_average: rating,
            ..GameRecord::new(GameId(id), name)
        }
    }

    fn ranked_ids(dataset: &Dataset) -> Vec<u64> {
        dataset.ranked().map(|g| g.id.0).collect()
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert!(matches!(Dataset::new(vec![]), Err(AppError::EmptyDataset)));
    }

    #[test]
    fn test_ranked_by_bayes_rating_desc() {
        let dataset = Dataset::new(vec![
            rated(1, "Low", 2000, Some(5.5)),
            rated(2, "High", 2001, Some(8.1)),
            rated(3, "Mid", 2002, Some(7.0)),
        ])
        .unwrap();

        assert_eq!(ranked_ids(&dataset), vec![2, 3, 1]);
    }

    #[test]
    fn test_ranked_ties_keep_load_order() {
        let dataset = Dataset::new(vec![
            rated(1, "A", 2000, Some(7.0)),
            rated(2, "B", 2000, Some(8.0)),
            rated(3, "C", 2000, Some(7.0)),
            rated(4, "D", 2000, Some(7.0)),
        ])
        .unwrap();

        assert_eq!(ranked_ids(&dataset), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_unrated_games_sort_last() {
        let dataset = Dataset::new(vec![
            rated(1, "Unrated", 2000, None),
            rated(2, "Rated", 2000, Some(3.0)),
            rated(3, "Broken", 2000, Some(f64::NAN)),
        ])
        .unwrap();

        assert_eq!(ranked_ids(&dataset), vec![2, 1, 3]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let dataset = Dataset::new(vec![
            rated(1, "First", 2000, Some(6.0)),
            rated(1, "Second", 2001, Some(9.0)),
        ])
        .unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.get(GameId(1)).unwrap().name, "First");
    }

    #[test]
    fn test_lookup_display_key_disambiguates_by_year() {
        let dataset = Dataset::new(vec![
            rated(1, "Dune", 1979, Some(7.0)),
            rated(2, "Dune", 2019, Some(7.5)),
        ])
        .unwrap();

        assert_eq!(dataset.lookup_display_key("Dune (2019)").unwrap().id, GameId(2));
        assert_eq!(dataset.lookup_display_key("Dune (1979)").unwrap().id, GameId(1));
        assert!(dataset.lookup_display_key("Dune").is_none());
        assert_eq!(dataset.find_by_name("Dune").unwrap().id, GameId(1));
    }

    #[test]
    fn test_duplicate_display_key_keeps_first() {
        let dataset = Dataset::new(vec![
            rated(1, "Clone", 2010, Some(6.0)),
            rated(2, "Clone", 2010, Some(9.0)),
            rated(3, "Other", 2011, Some(5.0)),
        ])
        .unwrap();

        assert_eq!(dataset.lookup_display_key("Clone (2010)").unwrap().id, GameId(1));
        assert_eq!(
            dataset.display_keys(),
            vec!["Clone (2010)".to_string(), "Other (2011)".to_string()]
        );
    }

    #[test]
    fn test_mechanic_options_sorted_unique() {
        let mut a = rated(1, "A", 2000, None);
        a.mechanics = Some("Dice Rolling".to_string());
        let mut b = rated(2, "B", 2000, None);
        b.mechanics = Some("Auction/Bidding".to_string());
        let mut c = rated(3, "C", 2000, None);
        c.mechanics = Some("Dice Rolling".to_string());
        let d = rated(4, "D", 2000, None);

        let dataset = Dataset::new(vec![a, b, c, d]).unwrap();
        assert_eq!(
            dataset.mechanic_options(),
            vec!["Auction/Bidding".to_string(), "Dice Rolling".to_string()]
        );
    }

    #[test]
    fn test_recommendation_table_lookup() {
        let table = RecommendationTable::from_rows(vec![RecommendationRow {
            source: GameId(100),
            neighbours: vec![
                Neighbour { slot: "0".to_string(), id: GameId(201) },
                Neighbour { slot: "1".to_string(), id: GameId(202) },
            ],
        }]);

        let neighbours = table.neighbours(GameId(100)).unwrap();
        assert_eq!(neighbours.len(), 2);
        assert_eq!(neighbours[0].id, GameId(201));
        assert!(table.neighbours(GameId(999)).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_recommendation_table_duplicate_source_keeps_first() {
        let table = RecommendationTable::from_rows(vec![
            RecommendationRow {
                source: GameId(1),
                neighbours: vec![Neighbour { slot: "0".to_string(), id: GameId(2) }],
            },
            RecommendationRow {
                source: GameId(1),
                neighbours: vec![],
            },
        ]);

        assert_eq!(table.neighbours(GameId(1)).unwrap().len(), 1);
    }
}
