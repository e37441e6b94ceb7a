use crate::{
    db::Dataset,
    models::{FilterSpec, GameRecord, LetterBucket, COMPLEXITY_BOUNDS, PLAYER_BOUNDS},
};

/// A single catalogue predicate
pub type Predicate<'s> = Box<dyn Fn(&GameRecord) -> bool + 's>;

/// Filters the catalogue, best-rated first
///
/// A non-empty `name_exact` short-circuits every other filter and yields at
/// most the one game with that display key. Otherwise the active predicates
/// are intersected over the rating order. Never fails; an empty result is a
/// normal outcome.
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> Vec<&'a GameRecord> {
    if let Some(key) = spec.name_key() {
        return dataset.lookup_display_key(key).into_iter().collect();
    }

    let predicates = active_predicates(spec);

    dataset
        .ranked()
        .filter(|&game| predicates.iter().all(|predicate| predicate(game)))
        .collect()
}

/// Predicates for every filter not left at its no-op value
pub fn active_predicates(spec: &FilterSpec) -> Vec<Predicate<'_>> {
    let mut predicates: Vec<Predicate<'_>> = Vec::new();

    if spec.letters != LetterBucket::All {
        predicates.push(Box::new(move |game: &GameRecord| {
            spec.letters.matches(&game.name)
        }));
    }

    if !spec.min_players.covers(&PLAYER_BOUNDS) {
        predicates.push(Box::new(move |game: &GameRecord| {
            spec.min_players.contains(game.min_players)
        }));
    }

    if !spec.max_players.covers(&PLAYER_BOUNDS) {
        predicates.push(Box::new(move |game: &GameRecord| {
            spec.max_players.contains(game.max_players)
        }));
    }

    if let Some(needle) = spec.mechanic_needle() {
        predicates.push(Box::new(move |game: &GameRecord| {
            mechanics_contain(game, &needle)
        }));
    }

    if !spec.complexity.covers(&COMPLEXITY_BOUNDS) {
        predicates.push(Box::new(move |game: &GameRecord| {
            game.complexity
                .is_some_and(|complexity| spec.complexity.contains(complexity))
        }));
    }

    predicates
}

/// Case-insensitive substring test; games without mechanics never match
fn mechanics_contain(game: &GameRecord, lowercase_needle: &str) -> bool {
    game.mechanics
        .as_deref()
        .is_some_and(|mechanics| mechanics.to_lowercase().contains(lowercase_needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameId, InclusiveRange};

    struct GameBuilder(GameRecord);

    impl GameBuilder {
        fn new(id: u64, name: &str, rating: f64) -> Self {
            Self(GameRecord {
                year_published: Some(2000 + id as i32),
                min_players: 2,
                max_players: 4,
                complexity: Some(2.5),
                rating_bayes_average: Some(rating),
                mechanics: Some("Hand Management".to_string()),
                ..GameRecord::new(GameId(id), name)
            })
        }

        fn players(mut self, min: u32, max: u32) -> Self {
            self.0.min_players = min;
            self.0.max_players = max;
            self
        }

        fn complexity(mut self, complexity: Option<f64>) -> Self {
            self.0.complexity = complexity;
            self
        }

        fn mechanics(mut self, mechanics: Option<&str>) -> Self {
            self.0.mechanics = mechanics.map(str::to_string);
            self
        }

        fn build(self) -> GameRecord {
            self.0
        }
    }

    fn sample_dataset() -> Dataset {
        Dataset::new(vec![
            GameBuilder::new(1, "Azul", 7.6).players(2, 4).build(),
            GameBuilder::new(2, "Zeta", 6.0).players(1, 1).complexity(Some(4.2)).build(),
            GameBuilder::new(3, "7 Wonders", 7.7)
                .players(3, 7)
                .mechanics(Some("Card Drafting, Set Collection"))
                .build(),
            GameBuilder::new(4, "Gloomhaven", 8.4)
                .players(1, 4)
                .complexity(Some(3.9))
                .mechanics(Some("Action Queue, Campaign / Battle Card Driven"))
                .build(),
            GameBuilder::new(5, "Party Time", 5.1)
                .players(4, 12)
                .complexity(None)
                .mechanics(None)
                .build(),
            GameBuilder::new(6, "azul junior", 5.9).players(2, 3).complexity(Some(1.2)).build(),
        ])
        .unwrap()
    }

    fn ids(games: &[&GameRecord]) -> Vec<u64> {
        games.iter().map(|g| g.id.0).collect()
    }

    #[test]
    fn test_default_spec_returns_everything_by_rating() {
        let dataset = sample_dataset();
        let result = apply(&dataset, &FilterSpec::default());
        assert_eq!(ids(&result), vec![4, 3, 1, 2, 6, 5]);
    }

    #[test]
    fn test_default_spec_has_no_active_predicates() {
        assert!(active_predicates(&FilterSpec::default()).is_empty());
    }

    #[test]
    fn test_name_exact_short_circuits_other_filters() {
        let dataset = sample_dataset();
        let spec = FilterSpec {
            name_exact: Some("Zeta (2002)".to_string()),
            letters: LetterBucket::AToE,
            min_players: InclusiveRange::new(5, 6),
            ..Default::default()
        };

        let result = apply(&dataset, &spec);
        assert_eq!(ids(&result), vec![2]);
        assert_eq!(result[0].display_key(), "Zeta (2002)");
    }

    #[test]
    fn test_name_exact_unknown_key_is_empty() {
        let dataset = sample_dataset();
        let spec = FilterSpec {
            name_exact: Some("Zeta".to_string()),
            ..Default::default()
        };
        assert!(apply(&dataset, &spec).is_empty());
    }

    #[test]
    fn test_empty_name_exact_is_ignored() {
        let dataset = sample_dataset();
        let spec = FilterSpec {
            name_exact: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(apply(&dataset, &spec).len(), dataset.len());
    }

    #[test]
    fn test_letter_bucket_filter() {
        let dataset = sample_dataset();

        let spec = FilterSpec {
            letters: LetterBucket::UToZ,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&dataset, &spec)), vec![2]);

        let spec = FilterSpec {
            letters: LetterBucket::Other,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&dataset, &spec)), vec![3]);

        let spec = FilterSpec {
            letters: LetterBucket::AToE,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&dataset, &spec)), vec![1, 6]);
    }

    #[test]
    fn test_player_range_filters() {
        let dataset = sample_dataset();

        let spec = FilterSpec {
            min_players: InclusiveRange::new(1, 1),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&dataset, &spec)), vec![4, 2]);

        let spec = FilterSpec {
            max_players: InclusiveRange::new(5, 10),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&dataset, &spec)), vec![3]);
    }

    #[test]
    fn test_mechanic_filter_is_case_insensitive_and_skips_missing() {
        let dataset = sample_dataset();

        let spec = FilterSpec {
            mechanic: Some("card drafting".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&dataset, &spec)), vec![3]);

        let spec = FilterSpec {
            mechanic: Some("CARD".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&dataset, &spec)), vec![4, 3]);

        let spec = FilterSpec {
            mechanic: Some("Tous".to_string()),
            ..Default::default()
        };
        assert_eq!(apply(&dataset, &spec).len(), dataset.len());
    }

    #[test]
    fn test_complexity_filter_excludes_missing_when_active() {
        let dataset = sample_dataset();

        let spec = FilterSpec {
            complexity: InclusiveRange::new(1.0, 3.0),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&dataset, &spec)), vec![3, 1, 6]);

        let spec = FilterSpec {
            complexity: InclusiveRange::new(3.9, 4.2),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&dataset, &spec)), vec![4, 2]);
    }

    #[test]
    fn test_conjunction_of_predicates() {
        let dataset = sample_dataset();
        let spec = FilterSpec {
            letters: LetterBucket::AToE,
            max_players: InclusiveRange::new(4, 4),
            mechanic: Some("hand".to_string()),
            complexity: InclusiveRange::new(2.0, 3.0),
            ..Default::default()
        };

        let result = apply(&dataset, &spec);
        assert_eq!(ids(&result), vec![1]);
        for game in result {
            assert!(LetterBucket::AToE.matches(&game.name));
            assert_eq!(game.max_players, 4);
        }
    }

    #[test]
    fn test_relaxing_a_predicate_never_shrinks_result() {
        let dataset = sample_dataset();
        let strict = FilterSpec {
            letters: LetterBucket::AToE,
            min_players: InclusiveRange::new(2, 2),
            mechanic: Some("hand".to_string()),
            complexity: InclusiveRange::new(1.0, 3.0),
            ..Default::default()
        };
        let strict_len = apply(&dataset, &strict).len();

        let relaxations = [
            FilterSpec { letters: LetterBucket::All, ..strict.clone() },
            FilterSpec { min_players: PLAYER_BOUNDS, ..strict.clone() },
            FilterSpec { mechanic: None, ..strict.clone() },
            FilterSpec { complexity: COMPLEXITY_BOUNDS, ..strict.clone() },
        ];

        for relaxed in relaxations {
            assert!(apply(&dataset, &relaxed).len() >= strict_len);
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let dataset = sample_dataset();
        let spec = FilterSpec {
            mechanic: Some("card".to_string()),
            ..Default::default()
        };
        assert_eq!(apply(&dataset, &spec), apply(&dataset, &spec));
    }
}
