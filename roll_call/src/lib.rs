/*!
Roll-call voting records for ideal-point analysis.

This crate holds the data side of the analysis: roll-call matrices and their
metadata, the selection of the periods that are worth estimating, and the
interfaces of the external estimators. The estimation itself is not done here.

```
use roll_call::builder::Builder;
use roll_call::*;

let mut builder = Builder::new(&["FRA".to_string(), "USA".to_string()]);
builder.add_vote_simple("A/HRC/RES/1", &[VoteChoice::Yea, VoteChoice::Nay])?;
let rc = builder.build()?;

let mut loader = |_period: PeriodId| -> Result<RollCall, DataError> { Ok(rc.clone()) };
let rules = CorpusRules {
    first_period: 2006,
    last_period: 2008,
    excluded_periods: vec![2007],
    min_votes: 1,
};
let outcome = build_corpus(&mut loader, &rules);
assert_eq!(
    outcome.corpus.ids(),
    vec![PeriodId::Year(2006), PeriodId::Year(2008)]
);
# Ok::<(), DataError>(())
```

See the [manual] for the file formats.
*/
mod config;
pub mod builder;
pub mod manual;
pub mod records;

use log::{debug, info, warn};

use std::collections::HashSet;

pub use crate::config::*;

impl RollCall {
    /// Assembles a roll call, checking the dimensions of all the parts.
    ///
    /// * `legislator_ids` the row labels of the vote matrix
    /// * `vote_ids` the column labels of the vote matrix
    /// * `choices` the matrix, one row per legislator
    pub fn new(
        legislator_ids: Vec<String>,
        vote_ids: Vec<String>,
        choices: Vec<Vec<VoteChoice>>,
        legislator_data: MetadataTable,
        vote_data: MetadataTable,
    ) -> Result<RollCall, DataError> {
        if choices.len() != legislator_ids.len() {
            return Err(DataError::DimensionMismatch {
                what: "row labels of the vote matrix".to_string(),
                expected: choices.len(),
                found: legislator_ids.len(),
            });
        }
        if legislator_data.len() != choices.len() {
            return Err(DataError::DimensionMismatch {
                what: "rows of the legislator metadata".to_string(),
                expected: choices.len(),
                found: legislator_data.len(),
            });
        }
        if vote_data.len() != vote_ids.len() {
            return Err(DataError::DimensionMismatch {
                what: "rows of the vote metadata".to_string(),
                expected: vote_ids.len(),
                found: vote_data.len(),
            });
        }
        for (lid, row) in legislator_ids.iter().zip(choices.iter()) {
            if row.len() != vote_ids.len() {
                return Err(DataError::DimensionMismatch {
                    what: format!("votes recorded for {}", lid),
                    expected: vote_ids.len(),
                    found: row.len(),
                });
            }
        }
        debug!(
            "RollCall::new: {} legislators, {} votes",
            legislator_ids.len(),
            vote_ids.len()
        );
        Ok(RollCall {
            legislator_ids,
            vote_ids,
            choices,
            legislator_data,
            vote_data,
        })
    }

    pub fn legislator_ids(&self) -> &[String] {
        &self.legislator_ids
    }

    pub fn vote_ids(&self) -> &[String] {
        &self.vote_ids
    }

    pub fn choices(&self) -> &[Vec<VoteChoice>] {
        &self.choices
    }

    pub fn legislator_data(&self) -> &MetadataTable {
        &self.legislator_data
    }

    pub fn vote_data(&self) -> &MetadataTable {
        &self.vote_data
    }

    pub fn num_legislators(&self) -> usize {
        self.legislator_ids.len()
    }

    pub fn num_votes(&self) -> usize {
        self.vote_ids.len()
    }

    pub fn choice(&self, legislator: usize, vote: usize) -> Option<VoteChoice> {
        self.choices.get(legislator).and_then(|r| r.get(vote)).copied()
    }

    pub fn has_legislator(&self, id: &str) -> bool {
        self.legislator_ids.iter().any(|l| l == id)
    }
}

impl Corpus {
    pub fn new() -> Corpus {
        Corpus::default()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn ids(&self) -> Vec<PeriodId> {
        self.periods.iter().map(|p| p.id).collect()
    }

    /// Adds a period at the end of the corpus. Periods must come in ascending order.
    pub fn push(&mut self, period: Period) -> Result<(), DataError> {
        if let Some(last) = self.periods.last() {
            if last.id >= period.id {
                return Err(DataError::InvalidPeriod {
                    value: format!("{} after {}", period.id, last.id),
                });
            }
        }
        self.periods.push(period);
        Ok(())
    }
}

/// Reads the roll call of one period.
pub trait PeriodLoader {
    fn load(&mut self, period: PeriodId) -> Result<RollCall, DataError>;
}

impl<F> PeriodLoader for F
where
    F: FnMut(PeriodId) -> Result<RollCall, DataError>,
{
    fn load(&mut self, period: PeriodId) -> Result<RollCall, DataError> {
        self(period)
    }
}

/// The years between two bounds (inclusive), in ascending order, without the
/// excluded ones.
#[derive(Debug, Clone)]
pub struct PeriodRange {
    // i64 so that a range ending at i32::MAX terminates.
    next: i64,
    last: i64,
    excluded: HashSet<i32>,
}

impl PeriodRange {
    pub fn new(first: i32, last: i32, excluded: &[i32]) -> PeriodRange {
        PeriodRange {
            next: first as i64,
            last: last as i64,
            excluded: excluded.iter().cloned().collect(),
        }
    }

    pub fn from_rules(rules: &CorpusRules) -> PeriodRange {
        PeriodRange::new(
            rules.first_period,
            rules.last_period,
            &rules.excluded_periods,
        )
    }
}

impl Iterator for PeriodRange {
    type Item = PeriodId;

    fn next(&mut self) -> Option<PeriodId> {
        while self.next <= self.last {
            let year = self.next as i32;
            self.next += 1;
            if self.excluded.contains(&year) {
                debug!("PeriodRange: {} is excluded", year);
                continue;
            }
            return Some(PeriodId::Year(year));
        }
        None
    }
}

/// Loads all the periods allowed by the rules and keeps the ones that have
/// enough votes.
///
/// A period that fails to load is logged and skipped: this never aborts the
/// construction of the corpus.
pub fn build_corpus<L: PeriodLoader + ?Sized>(loader: &mut L, rules: &CorpusRules) -> CorpusOutcome {
    info!(
        "Building corpus for periods {}..={}, excluded: {:?}, minimum votes: {}",
        rules.first_period, rules.last_period, rules.excluded_periods, rules.min_votes
    );
    let mut corpus = Corpus::new();
    let mut skipped: Vec<(PeriodId, SkipReason)> = Vec::new();
    for period in PeriodRange::from_rules(rules) {
        match loader.load(period) {
            Ok(rc) if rc.num_votes() < rules.min_votes => {
                info!(
                    "Skipping period {}: {} votes, fewer than the minimum of {}",
                    period,
                    rc.num_votes(),
                    rules.min_votes
                );
                skipped.push((
                    period,
                    SkipReason::TooFewVotes {
                        found: rc.num_votes(),
                        minimum: rules.min_votes,
                    },
                ));
            }
            Ok(rc) => {
                info!(
                    "Period {}: {} legislators, {} votes",
                    period,
                    rc.num_legislators(),
                    rc.num_votes()
                );
                // The range is ascending, the order always holds.
                corpus.periods.push(Period {
                    id: period,
                    roll_call: rc,
                });
            }
            Err(e) => {
                warn!("Skipping period {}: {}", period, e);
                skipped.push((period, SkipReason::LoadFailed(e)));
            }
        }
    }
    info!(
        "Corpus: {} periods kept {:?}, {} skipped",
        corpus.len(),
        corpus.ids(),
        skipped.len()
    );
    CorpusOutcome { corpus, skipped }
}

// ******** Estimation *********

/// An estimator working on a single roll call.
pub trait StaticEstimator {
    fn estimate(
        &mut self,
        roll_call: &RollCall,
        settings: &StaticSettings,
    ) -> Result<StaticEstimate, EstimationError>;
}

/// An estimator following the legislators across the periods of a corpus.
pub trait DynamicEstimator {
    fn estimate(
        &mut self,
        corpus: &Corpus,
        settings: &DynamicSettings,
    ) -> Result<DynamicEstimate, EstimationError>;
}

pub fn check_static_inputs(
    roll_call: &RollCall,
    settings: &StaticSettings,
) -> Result<(), EstimationError> {
    let expected = settings.dimensions.count();
    if settings.polarity.len() != expected {
        return Err(EstimationError::PolarityCount {
            expected,
            found: settings.polarity.len(),
        });
    }
    for anchor in settings.polarity.iter() {
        if !roll_call.has_legislator(anchor) {
            return Err(EstimationError::UnknownAnchor(anchor.clone()));
        }
    }
    Ok(())
}

pub fn check_dynamic_inputs(
    corpus: &Corpus,
    settings: &DynamicSettings,
) -> Result<(), EstimationError> {
    if corpus.is_empty() {
        return Err(EstimationError::EmptyCorpus);
    }
    let anchor_found = corpus
        .periods
        .iter()
        .any(|p| p.roll_call.has_legislator(&settings.polarity));
    if !anchor_found {
        return Err(EstimationError::UnknownAnchor(settings.polarity.clone()));
    }
    if corpus.len() == 1 {
        warn!(
            "The corpus only contains period {}: the dynamic model has a single period to work with",
            corpus.periods[0].id
        );
    }
    Ok(())
}

/// Checks the inputs and runs the static estimator.
pub fn run_static<E: StaticEstimator + ?Sized>(
    estimator: &mut E,
    roll_call: &RollCall,
    settings: &StaticSettings,
) -> Result<StaticEstimate, EstimationError> {
    check_static_inputs(roll_call, settings)?;
    info!(
        "Running static estimation: {} legislators, {} votes, settings: {:?}",
        roll_call.num_legislators(),
        roll_call.num_votes(),
        settings
    );
    let res = estimator.estimate(roll_call, settings)?;
    debug!("run_static: {} estimates", res.legislators.len());
    Ok(res)
}

/// Checks the inputs and runs the dynamic estimator.
pub fn run_dynamic<E: DynamicEstimator + ?Sized>(
    estimator: &mut E,
    corpus: &Corpus,
    settings: &DynamicSettings,
) -> Result<DynamicEstimate, EstimationError> {
    check_dynamic_inputs(corpus, settings)?;
    info!(
        "Running dynamic estimation over periods {:?}, settings: {:?}",
        corpus.ids(),
        settings
    );
    let res = estimator.estimate(corpus, settings)?;
    debug!("run_dynamic: {} points", res.points.len());
    Ok(res)
}

/// Rounds to a number of decimals. Values that round to zero are always `0.0`,
/// never `-0.0`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// The first dimension of a static estimate, rounded to 3 decimals and sorted
/// by coordinate.
///
/// Legislators without a finite coordinate are left out.
pub fn coordinate_table(estimate: &StaticEstimate) -> Vec<CoordinateRow> {
    let mut rows: Vec<CoordinateRow> = Vec::new();
    for le in estimate.legislators.iter() {
        let coord = le.coordinates.first().cloned().unwrap_or(f64::NAN);
        if !coord.is_finite() {
            info!("coordinate_table: no estimate for {}, leaving it out", le.legislator);
            continue;
        }
        let se = le.std_errors.first().cloned().unwrap_or(f64::NAN);
        rows.push(CoordinateRow {
            legislator: le.legislator.clone(),
            coord1d: round_to(coord, 3),
            se1d: round_to(se, 3),
        });
    }
    rows.sort_by(|a, b| a.coord1d.total_cmp(&b.coord1d));
    rows
}

#[cfg(test)]
mod tests {
    use super::builder::Builder;
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn roll_call_with_votes(num_votes: usize) -> RollCall {
        let legislators = names(&["CHN", "FRA", "USA"]);
        let mut builder = Builder::new(&legislators);
        for i in 0..num_votes {
            builder
                .add_vote_simple(
                    &format!("RES/{}", i),
                    &[VoteChoice::Nay, VoteChoice::Yea, VoteChoice::Abstain],
                )
                .unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn period_range_ascending_without_excluded() {
        let ps: Vec<PeriodId> = PeriodRange::new(2006, 2009, &[2007]).collect();
        assert_eq!(
            ps,
            vec![
                PeriodId::Year(2006),
                PeriodId::Year(2008),
                PeriodId::Year(2009)
            ]
        );
    }

    #[test]
    fn period_range_inverted_is_empty() {
        assert_eq!(PeriodRange::new(2010, 2009, &[]).count(), 0);
    }

    #[test]
    fn period_range_ends_at_max() {
        let ps: Vec<PeriodId> = PeriodRange::new(i32::MAX - 1, i32::MAX, &[]).collect();
        assert_eq!(ps.len(), 2);
    }

    #[test]
    fn period_id_display_and_parse() {
        assert_eq!(PeriodId::Year(2012).to_string(), "2012");
        assert_eq!(PeriodId::All.to_string(), "all");
        assert_eq!("ALL".parse::<PeriodId>(), Ok(PeriodId::All));
        assert_eq!(" 2015".parse::<PeriodId>(), Ok(PeriodId::Year(2015)));
        assert!("20x5".parse::<PeriodId>().is_err());
        assert!(PeriodId::Year(3000) < PeriodId::All);
    }

    #[test]
    fn excluded_periods_never_loaded() {
        init();
        let mut calls: Vec<PeriodId> = Vec::new();
        let mut loader = |p: PeriodId| -> Result<RollCall, DataError> {
            calls.push(p);
            Ok(roll_call_with_votes(3))
        };
        let rules = CorpusRules {
            first_period: 2006,
            last_period: 2010,
            excluded_periods: vec![2007, 2009],
            min_votes: 1,
        };
        let outcome = build_corpus(&mut loader, &rules);
        assert_eq!(
            calls,
            vec![
                PeriodId::Year(2006),
                PeriodId::Year(2008),
                PeriodId::Year(2010)
            ]
        );
        assert_eq!(outcome.corpus.ids(), calls);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn periods_below_minimum_are_skipped() {
        init();
        let mut loader = |p: PeriodId| -> Result<RollCall, DataError> {
            match p {
                PeriodId::Year(2020) => Ok(roll_call_with_votes(12)),
                _ => Ok(roll_call_with_votes(5)),
            }
        };
        let rules = CorpusRules {
            first_period: 2020,
            last_period: 2021,
            excluded_periods: vec![],
            min_votes: 10,
        };
        let outcome = build_corpus(&mut loader, &rules);
        assert_eq!(outcome.corpus.ids(), vec![PeriodId::Year(2020)]);
        assert_eq!(
            outcome.skipped,
            vec![(
                PeriodId::Year(2021),
                SkipReason::TooFewVotes {
                    found: 5,
                    minimum: 10
                }
            )]
        );
    }

    #[test]
    fn failed_loads_keep_order() {
        init();
        let mut loader = |p: PeriodId| match p {
            PeriodId::Year(2007) => Err(DataError::MissingFile {
                path: "2007-votes.csv".to_string(),
            }),
            PeriodId::Year(2009) => Ok(roll_call_with_votes(1)),
            _ => Ok(roll_call_with_votes(4)),
        };
        let rules = CorpusRules {
            first_period: 2006,
            last_period: 2010,
            excluded_periods: vec![2008],
            min_votes: 2,
        };
        let outcome = build_corpus(&mut loader, &rules);
        assert_eq!(
            outcome.corpus.ids(),
            vec![PeriodId::Year(2006), PeriodId::Year(2010)]
        );
        let skipped: Vec<PeriodId> = outcome.skipped.iter().map(|(p, _)| *p).collect();
        assert_eq!(skipped, vec![PeriodId::Year(2007), PeriodId::Year(2009)]);
        assert!(matches!(
            outcome.skipped[0].1,
            SkipReason::LoadFailed(DataError::MissingFile { .. })
        ));
    }

    #[test]
    fn row_count_mismatch_is_rejected() {
        init();
        let legislators = names(&["FRA", "USA"]);
        let res = RollCall::new(
            legislators.clone(),
            names(&["RES/1"]),
            vec![vec![VoteChoice::Yea], vec![VoteChoice::Nay]],
            MetadataTable::new(names(&["Country"]), vec![names(&["FRA"])]),
            MetadataTable::new(names(&["Resolution"]), vec![names(&["RES/1"])]),
        );
        assert!(matches!(
            res,
            Err(DataError::DimensionMismatch {
                expected: 2,
                found: 1,
                ..
            })
        ));

        let mut loader = |_p: PeriodId| {
            RollCall::new(
                legislators.clone(),
                names(&["RES/1"]),
                vec![vec![VoteChoice::Yea], vec![VoteChoice::Nay]],
                MetadataTable::new(names(&["Country"]), vec![names(&["FRA"])]),
                MetadataTable::new(names(&["Resolution"]), vec![names(&["RES/1"])]),
            )
        };
        let outcome = build_corpus(
            &mut loader,
            &CorpusRules {
                first_period: 2006,
                last_period: 2006,
                excluded_periods: vec![],
                min_votes: 0,
            },
        );
        assert!(outcome.corpus.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
    }

    #[test]
    fn vote_metadata_mismatch_is_rejected() {
        let res = RollCall::new(
            names(&["FRA"]),
            names(&["RES/1", "RES/2"]),
            vec![vec![VoteChoice::Yea, VoteChoice::Nay]],
            MetadataTable::new(names(&["Country"]), vec![names(&["FRA"])]),
            MetadataTable::new(names(&["Resolution"]), vec![names(&["RES/1"])]),
        );
        assert!(matches!(res, Err(DataError::DimensionMismatch { .. })));
    }

    #[test]
    fn corpus_push_rejects_disorder() {
        let mut corpus = Corpus::new();
        let rc = roll_call_with_votes(1);
        corpus
            .push(Period {
                id: PeriodId::Year(2010),
                roll_call: rc.clone(),
            })
            .unwrap();
        assert!(corpus
            .push(Period {
                id: PeriodId::Year(2009),
                roll_call: rc,
            })
            .is_err());
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn vote_codes() {
        for c in VoteChoice::ALL {
            assert_eq!(VoteChoice::from_code(c.code()), Some(c));
        }
        assert_eq!(VoteChoice::parse_code(" 4"), Some(VoteChoice::NotInLegislature));
        assert_eq!(VoteChoice::parse_code("5"), None);
        assert_eq!(VoteChoice::parse_code("yes"), None);
        assert_eq!(VoteChoice::from_record_value("y"), Some(VoteChoice::Yea));
        assert_eq!(VoteChoice::from_record_value("."), Some(VoteChoice::NoVote));
        assert_eq!(VoteChoice::from_record_value(""), Some(VoteChoice::NoVote));
        assert_eq!(VoteChoice::from_record_value("X"), None);
    }

    fn estimate(values: &[(&str, f64, f64)]) -> StaticEstimate {
        StaticEstimate {
            dimensions: Dimensions::One,
            legislators: values
                .iter()
                .map(|(id, c, se)| LegislatorEstimate {
                    legislator: id.to_string(),
                    coordinates: vec![*c],
                    std_errors: vec![*se],
                })
                .collect(),
        }
    }

    #[test]
    fn coordinate_table_sorted_and_rounded() {
        let est = estimate(&[
            ("USA", 0.91234, 0.0214),
            ("CHN", -0.8766, 0.03333),
            ("FRA", 0.40049, 0.01),
            ("ERI", f64::NAN, f64::NAN),
            ("BRA", -0.0004, 0.1),
        ]);
        let rows = coordinate_table(&est);
        let ids: Vec<&str> = rows.iter().map(|r| r.legislator.as_str()).collect();
        assert_eq!(ids, vec!["CHN", "BRA", "FRA", "USA"]);
        for w in rows.windows(2) {
            assert!(w[0].coord1d <= w[1].coord1d);
        }
        assert_eq!(rows[0].coord1d, -0.877);
        assert_eq!(rows[0].se1d, 0.033);
        assert_eq!(rows[3].coord1d, 0.912);
        assert!(rows[1].coord1d.is_sign_positive());
    }

    #[test]
    fn rounding_to_zero_is_positive() {
        for x in [-0.0004, -0.0, 0.0003] {
            let r = round_to(x, 3);
            assert_eq!(r, 0.0);
            assert!(r.is_sign_positive(), "{} -> {}", x, r);
            assert_eq!(r.to_string(), "0");
        }
        assert_eq!(round_to(-0.0006, 3), -0.001);
    }

    #[test]
    fn rounding_stays_close() {
        for x in [0.12345, -0.99951, 0.0004999, 1.0, -0.3335, 0.7777777] {
            let r: f64 = round_to(x, 3).to_string().parse().unwrap();
            assert!((r - x).abs() <= 0.0005 + 1e-12, "{} -> {}", x, r);
        }
    }

    struct FixedDynamic {
        calls: usize,
    }

    impl DynamicEstimator for FixedDynamic {
        fn estimate(
            &mut self,
            corpus: &Corpus,
            settings: &DynamicSettings,
        ) -> Result<DynamicEstimate, EstimationError> {
            self.calls += 1;
            let mut points = Vec::new();
            for p in corpus.periods() {
                for l in p.roll_call.legislator_ids() {
                    points.push(DynamicPoint {
                        legislator: l.clone(),
                        period: p.id,
                        coordinates: vec![0.0],
                    });
                }
            }
            Ok(DynamicEstimate {
                dimensions: settings.dimensions,
                points,
            })
        }
    }

    fn dynamic_settings(anchor: &str) -> DynamicSettings {
        DynamicSettings {
            dimensions: Dimensions::One,
            model: DynamicModel::Linear,
            min_votes: 10,
            polarity: anchor.to_string(),
        }
    }

    #[test]
    fn dynamic_single_period_runs() {
        init();
        let mut loader = |p: PeriodId| -> Result<RollCall, DataError> {
            match p {
                PeriodId::Year(2020) => Ok(roll_call_with_votes(12)),
                _ => Ok(roll_call_with_votes(5)),
            }
        };
        let rules = CorpusRules {
            first_period: 2020,
            last_period: 2021,
            excluded_periods: vec![],
            min_votes: 10,
        };
        let outcome = build_corpus(&mut loader, &rules);
        let mut est = FixedDynamic { calls: 0 };
        let res = run_dynamic(&mut est, &outcome.corpus, &dynamic_settings("USA")).unwrap();
        assert_eq!(est.calls, 1);
        assert_eq!(res.points.len(), 3);
        assert!(res.points.iter().all(|p| p.period == PeriodId::Year(2020)));
    }

    #[test]
    fn dynamic_empty_corpus_fails_before_estimator() {
        let mut est = FixedDynamic { calls: 0 };
        let res = run_dynamic(&mut est, &Corpus::new(), &dynamic_settings("USA"));
        assert_eq!(res, Err(EstimationError::EmptyCorpus));
        assert_eq!(est.calls, 0);
    }

    #[test]
    fn dynamic_unknown_anchor() {
        let mut corpus = Corpus::new();
        corpus
            .push(Period {
                id: PeriodId::Year(2006),
                roll_call: roll_call_with_votes(2),
            })
            .unwrap();
        let mut est = FixedDynamic { calls: 0 };
        let res = run_dynamic(&mut est, &corpus, &dynamic_settings("GBR"));
        assert_eq!(res, Err(EstimationError::UnknownAnchor("GBR".to_string())));
    }

    #[test]
    fn static_polarity_checks() {
        let rc = roll_call_with_votes(3);
        let settings = StaticSettings {
            dimensions: Dimensions::Two,
            min_votes: 1,
            polarity: names(&["USA"]),
        };
        assert_eq!(
            check_static_inputs(&rc, &settings),
            Err(EstimationError::PolarityCount {
                expected: 2,
                found: 1
            })
        );
        let settings = StaticSettings {
            polarity: names(&["USA", "XXX"]),
            ..settings
        };
        assert_eq!(
            check_static_inputs(&rc, &settings),
            Err(EstimationError::UnknownAnchor("XXX".to_string()))
        );
        let settings = StaticSettings {
            polarity: names(&["USA", "FRA"]),
            ..settings
        };
        assert_eq!(check_static_inputs(&rc, &settings), Ok(()));
    }

    #[test]
    fn settings_conversions() {
        assert_eq!(Dimensions::try_from(2), Ok(Dimensions::Two));
        assert_eq!(
            Dimensions::try_from(3),
            Err(EstimationError::InvalidDimensions(3))
        );
        assert_eq!(DynamicModel::try_from(1), Ok(DynamicModel::Linear));
        assert_eq!(DynamicModel::Cubic.code(), 3);
        assert!(DynamicModel::try_from(4).is_err());
    }
}
