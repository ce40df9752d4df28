use std::path::PathBuf;

use fbref_scout::aggregate::{league_summary, mean_by_age, sort_by_metric, top_players};
use fbref_scout::dataset::{DEFAULT_MIN_MINUTES, load};
use fbref_scout::filter::{PlayerFilter, filter};
use fbref_scout::percentile::{compare, percentile, percentiles, radar};
use fbref_scout::position::radar_metrics;
use fbref_scout::similarity::{SimilarityOptions, similar, similar_with, similarity_report};
use fbref_scout::{EnrichedTable, Metric, RawTable, ScoutError, SimplifiedPosition};

fn sample() -> EnrichedTable {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("players_sample.csv");
    let raw = RawTable::from_csv_path(&path).expect("fixture should parse");
    load(&raw, DEFAULT_MIN_MINUTES).expect("fixture should load")
}

fn score_of(results: &[fbref_scout::SimilarPlayer], name: &str) -> f64 {
    results
        .iter()
        .find(|s| s.name == name)
        .map(|s| s.similarity)
        .expect("player should be in results")
}

#[test]
fn similar_never_returns_the_query_player() {
    let table = sample();
    for name in ["Ola Berg", "Luca Fischer", "Bruno Almeida", "Felix Hoffmann"] {
        let results = similar(&table, name, 10).unwrap();
        assert!(results.iter().all(|s| s.name != name), "{name} matched itself");
    }
}

#[test]
fn identical_profiles_score_one() {
    let table = sample();
    let results = similar(&table, "Ola Berg", 3).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].name, "Twin Berg");
    assert!((results[0].similarity - 1.0).abs() < 1e-9);
}

#[test]
fn results_are_sorted_and_bounded() {
    let table = sample();
    let results = similar(&table, "Marco Duarte", 10).unwrap();
    assert!(
        results
            .windows(2)
            .all(|w| w[0].similarity >= w[1].similarity)
    );
    assert!(
        results
            .iter()
            .all(|s| (-1.0..=1.0).contains(&s.similarity))
    );
}

#[test]
fn candidate_pool_is_the_position_group() {
    let table = sample();
    let mf = similar(&table, "Luca Fischer", 10).unwrap();
    assert_eq!(mf.len(), 3);
    assert!(mf.iter().all(|s| s.position == SimplifiedPosition::MF));

    // n larger than the pool returns the whole pool.
    let fw = similar(&table, "Ola Berg", 50).unwrap();
    assert_eq!(fw.len(), 4);
    assert!(fw.iter().all(|s| s.position == SimplifiedPosition::FW));

    let gk = similar(&table, "Felix Hoffmann", 5).unwrap();
    assert_eq!(gk.len(), 1);
    assert_eq!(gk[0].name, "Gio Keller");
}

#[test]
fn singleton_group_yields_empty_result() {
    let table = sample();
    let results = similar(&table, "Jonas Nobody", 5).unwrap();
    assert!(results.is_empty());
}

#[test]
fn similarity_is_symmetric_within_a_group() {
    let table = sample();
    let from_ola = similar(&table, "Ola Berg", 10).unwrap();
    let from_marco = similar(&table, "Marco Duarte", 10).unwrap();
    let a = score_of(&from_ola, "Marco Duarte");
    let b = score_of(&from_marco, "Ola Berg");
    assert!((a - b).abs() < 1e-12);
}

#[test]
fn unknown_player_is_an_error() {
    let table = sample();
    assert_eq!(
        similar(&table, "Nobody Here", 5).unwrap_err(),
        ScoutError::PlayerNotFound("Nobody Here".to_string())
    );
    assert!(matches!(
        percentiles(&table, "Nobody Here", &[Metric::GoalsPer90]),
        Err(ScoutError::PlayerNotFound(_))
    ));
    // The table is still usable afterwards.
    assert!(similar(&table, "Ola Berg", 1).is_ok());
}

#[test]
fn position_filter_off_compares_everyone() {
    let table = sample();
    let mut opts = SimilarityOptions::top(50);
    opts.position_filter = false;
    let results = similar_with(&table, "Ola Berg", &opts).unwrap();
    assert_eq!(results.len(), table.len() - 1);
    assert!(results.iter().any(|s| s.position == SimplifiedPosition::DF));
}

#[test]
fn custom_metric_list_is_reported_back() {
    let table = sample();
    let opts = SimilarityOptions {
        n: 2,
        position_filter: true,
        metrics: vec![Metric::TacklesPer90, Metric::InterceptionsPer90],
    };
    let results = similar_with(&table, "Bruno Almeida", &opts).unwrap();
    assert_eq!(results.len(), 2);
    let keys: Vec<Metric> = results[0].metrics.keys().copied().collect();
    assert_eq!(keys, vec![Metric::TacklesPer90, Metric::InterceptionsPer90]);
}

#[test]
fn batch_report_keeps_per_player_errors() {
    let table = sample();
    let names = vec!["Ola Berg".to_string(), "Ghost".to_string()];
    let report = similarity_report(&table, &names, &SimilarityOptions::top(2));
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].player, "Ola Berg");
    assert!(report[0].error.is_none());
    assert_eq!(report[0].similar.len(), 2);
    assert!(report[1].error.is_some());
    assert!(report[1].similar.is_empty());
}

#[test]
fn percentile_is_strict_share_of_group() {
    let table = sample();
    // FW goals/90: 0.5, 0.5, 0.2, 0.0 and one missing.
    assert_eq!(percentile(&table, "Ola Berg", Metric::GoalsPer90).unwrap(), 40.0);
    assert_eq!(percentile(&table, "Twin Berg", Metric::GoalsPer90).unwrap(), 40.0);
    assert_eq!(percentile(&table, "Marco Duarte", Metric::GoalsPer90).unwrap(), 20.0);
    assert_eq!(percentile(&table, "Kai Lorenz", Metric::GoalsPer90).unwrap(), 0.0);
}

#[test]
fn missing_value_ranks_at_zero() {
    let table = sample();
    assert_eq!(percentile(&table, "Zero Nineties", Metric::GoalsPer90).unwrap(), 0.0);
    assert_eq!(percentile(&table, "Emil Jensen", Metric::TacklesPer90).unwrap(), 0.0);
    // Emil's blank still counts toward the MF group size.
    assert_eq!(percentile(&table, "Hugo Costa", Metric::TacklesPer90).unwrap(), 50.0);
}

#[test]
fn percentile_of_underived_metric() {
    let table = sample();
    let raw_without_sca = {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("tests/fixtures/players_sample.csv");
        let raw = RawTable::from_csv_path(&path).unwrap();
        let idx = raw.column_index("SCA").unwrap();
        let headers = raw
            .headers()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, h)| h.clone())
            .collect();
        let rows = raw
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(i, _)| *i != idx)
                    .map(|(_, c)| c.clone())
                    .collect()
            })
            .collect();
        RawTable::new(headers, rows)
    };
    let reduced = load(&raw_without_sca, DEFAULT_MIN_MINUTES).unwrap();
    assert_eq!(
        percentile(&reduced, "Ola Berg", Metric::ShotCreatingPer90).unwrap_err(),
        ScoutError::MetricUnavailable(Metric::ShotCreatingPer90)
    );

    let batch = percentiles(
        &reduced,
        "Ola Berg",
        &[Metric::GoalsPer90, Metric::ShotCreatingPer90],
    )
    .unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch.get(&Metric::GoalsPer90), Some(&40.0));

    assert!(percentile(&table, "Ola Berg", Metric::ShotCreatingPer90).is_ok());
}

#[test]
fn unknown_player_wins_over_underived_metric() {
    let headers = ["Player", "Pos", "Min", "90s", "Gls"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows = vec![
        vec!["Solo Striker", "FW", "900", "10", "4"]
            .into_iter()
            .map(String::from)
            .collect(),
    ];
    let table = load(&RawTable::new(headers, rows), DEFAULT_MIN_MINUTES).unwrap();
    assert!(!table.has_metric(Metric::TacklesPer90));

    assert_eq!(
        percentile(&table, "Ghost", Metric::TacklesPer90).unwrap_err(),
        ScoutError::PlayerNotFound("Ghost".to_string())
    );
    assert_eq!(
        percentile(&table, "Solo Striker", Metric::TacklesPer90).unwrap_err(),
        ScoutError::MetricUnavailable(Metric::TacklesPer90)
    );
}

#[test]
fn compare_ranks_both_against_left_group() {
    let table = sample();
    let cmp = compare(&table, "Ola Berg", "Luca Fischer", None).unwrap();
    assert_eq!(cmp.group, SimplifiedPosition::FW);
    assert_eq!(cmp.metrics, radar_metrics(SimplifiedPosition::FW).to_vec());
    assert_eq!(cmp.right.position, SimplifiedPosition::MF);
    // Luca's 0.1 goals/90 beats only Kai's 0.0 among the five forwards.
    assert_eq!(cmp.right.percentiles.get(&Metric::GoalsPer90), Some(&20.0));
    assert_eq!(cmp.left.percentiles.get(&Metric::GoalsPer90), Some(&40.0));
}

#[test]
fn radar_uses_position_profile() {
    let table = sample();
    let ranks = radar(&table, "Bruno Almeida").unwrap();
    let expected: Vec<Metric> = {
        let mut m = radar_metrics(SimplifiedPosition::DF).to_vec();
        m.sort();
        m
    };
    assert_eq!(ranks.keys().copied().collect::<Vec<_>>(), expected);
    assert!(ranks.values().all(|p| (0.0..=100.0).contains(p)));
}

#[test]
fn filter_selects_without_touching_the_table() {
    let table = sample();

    let la_liga = filter(&table, &PlayerFilter::new().league("La Liga"));
    assert_eq!(la_liga.len(), 4);
    assert!(la_liga.records().iter().all(|r| r.league == "La Liga"));

    let defenders = filter(&table, &PlayerFilter::new().position(SimplifiedPosition::DF));
    assert_eq!(
        defenders.player_names(None, None),
        vec!["Bruno Almeida", "Carlos Garcia", "Ivan Ionescu"]
    );

    let young = filter(&table, &PlayerFilter::new().age_between(None, Some(21.0)));
    assert_eq!(young.player_names(None, None), vec!["Emil Jensen", "Gio Keller", "Kai Lorenz"]);

    let busy = filter(&table, &PlayerFilter::new().min_minutes(2500));
    assert_eq!(busy.len(), 3);

    assert_eq!(table.len(), 15);
    assert_eq!(la_liga.metrics(), table.metrics());
}

#[test]
fn queries_run_on_a_filtered_table() {
    let table = sample();
    let prem = filter(&table, &PlayerFilter::new().league("Premier League"));
    let results = similar(&prem, "Ola Berg", 5).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Marco Duarte");
}

#[test]
fn top_players_orders_by_metric() {
    let table = sample();
    let top = top_players(&table, Metric::GoalsPer90, 3, None);
    let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ola Berg", "Twin Berg", "Marco Duarte"]);

    let keepers = top_players(&table, Metric::ProgPassesPer90, 5, Some(SimplifiedPosition::GK));
    assert_eq!(keepers.len(), 2);
}

#[test]
fn sort_puts_missing_values_last() {
    let table = sample();
    let sorted = sort_by_metric(&table, Metric::TacklesPer90);
    assert_eq!(sorted.len(), table.len());
    let tail: Vec<&str> = sorted[sorted.len() - 2..]
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(tail, vec!["Zero Nineties", "Emil Jensen"]);
}

#[test]
fn league_summary_skips_keepers() {
    let table = sample();
    let summary = league_summary(&table, Metric::GoalsPer90);
    assert_eq!(
        summary.keys().cloned().collect::<Vec<_>>(),
        vec!["Bundesliga", "La Liga", "Premier League"]
    );
    let bundesliga = &summary["Bundesliga"];
    assert_eq!(bundesliga.count, 3);
    assert_eq!(bundesliga.max, 0.1);
    assert_eq!(bundesliga.min, 0.0);
}

#[test]
fn mean_by_age_is_ascending() {
    let table = sample();
    let by_age = mean_by_age(&table, Metric::GoalsPer90);
    assert!(by_age.windows(2).all(|w| w[0].0 < w[1].0));
    assert_eq!(by_age.first().map(|(age, _)| *age), Some(19));
}
