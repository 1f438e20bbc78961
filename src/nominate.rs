use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};

use roll_call::records::*;
use roll_call::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

pub mod config_reader;
pub mod estimator;
pub mod io_csv;
pub mod io_records;
pub mod plot;

use crate::nominate::config_reader::*;
use crate::nominate::estimator::CommandEstimator;
use crate::nominate::io_csv::{write_coordinates, write_roll_call, write_summary_sheet, CsvLoader};
use crate::nominate::io_records::read_records;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum NominateError {
    #[snafu(display("Error opening configuration {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid configuration: {reason}"))]
    InvalidConfig { reason: String },
    #[snafu(display("Error reading {path}"))]
    ReadingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error creating directory {path}"))]
    CreatingDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error loading period {period}: {source}"))]
    LoadingPeriod { source: DataError, period: String },
    #[snafu(display("Invalid voting records: {source}"))]
    Records { source: DataError },
    #[snafu(display("Error opening CSV file {path}: {source}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error writing CSV file {path}: {source}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error flushing {path}"))]
    Flushing {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening workbook {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Missing sheet {sheet} in workbook {path}"))]
    MissingSheet { sheet: String, path: String },
    #[snafu(display("Sheet {sheet} of workbook {path} has no header row"))]
    EmptySheet { sheet: String, path: String },
    #[snafu(display("{source}"))]
    Estimation { source: EstimationError },
    #[snafu(display("Error drawing {path}: {message}"))]
    Plotting { path: String, message: String },
    #[snafu(display("The coordinates differ from the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type NResult<T> = Result<T, NominateError>;

pub const COORDINATES_FILE: &str = "coordinates.csv";

/// What an analysis went through and produced.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub kept: Vec<PeriodId>,
    pub skipped: Vec<(PeriodId, SkipReason)>,
    pub outputs: Vec<PathBuf>,
}

/// Runs a full analysis: corpus, static estimation on the aggregate, dynamic
/// estimation on the corpus, and the reports.
///
/// An estimator that is not provided is skipped.
pub fn analyze(
    config: &AnalysisConfig,
    input_dir: &Path,
    out_dir: &Path,
    static_estimator: Option<&mut dyn StaticEstimator>,
    dynamic_estimator: Option<&mut dyn DynamicEstimator>,
) -> NResult<AnalysisOutcome> {
    // Validate everything before starting the long work.
    let rules = config.corpus_rules()?;
    let axis_titles = config.axis_titles()?;
    let static_run = match static_estimator {
        Some(est) => Some((est, config.static_settings()?)),
        None => None,
    };
    let dynamic_run = match dynamic_estimator {
        Some(est) => Some((est, config.dynamic_settings()?)),
        None => None,
    };

    fs::create_dir_all(out_dir).context(CreatingDirSnafu {
        path: out_dir.display().to_string(),
    })?;

    let mut loader = CsvLoader::new(input_dir);
    let corpus_outcome = build_corpus(&mut loader, &rules);
    let aggregate = loader
        .load(PeriodId::All)
        .context(LoadingPeriodSnafu { period: "all" })?;
    info!(
        "Aggregate: {} legislators, {} votes",
        aggregate.num_legislators(),
        aggregate.num_votes()
    );

    let mut outputs: Vec<PathBuf> = Vec::new();

    match static_run {
        Some((est, settings)) => {
            let estimate = run_static(est, &aggregate, &settings).context(EstimationSnafu {})?;
            let mut files = report_static(out_dir, &estimate, &axis_titles)?;
            outputs.append(&mut files);
        }
        None => info!("No static estimator configured, skipping the static estimation"),
    }

    match dynamic_run {
        Some((est, settings)) => {
            let estimate = run_dynamic(est, &corpus_outcome.corpus, &settings)
                .context(EstimationSnafu {})?;
            let p = out_dir.join(plot::DYNAMIC_FILE);
            plot::plot_dynamic(&p, &estimate)?;
            outputs.push(p);
        }
        None => info!("No dynamic estimator configured, skipping the dynamic estimation"),
    }

    Ok(AnalysisOutcome {
        kept: corpus_outcome.corpus.ids(),
        skipped: corpus_outcome.skipped,
        outputs,
    })
}

/// Writes the plots and the coordinate table of a static estimate.
pub fn report_static(
    out_dir: &Path,
    estimate: &StaticEstimate,
    axis_titles: &(String, String),
) -> NResult<Vec<PathBuf>> {
    let mut outputs: Vec<PathBuf> = Vec::new();

    let p = out_dir.join(plot::STATIC_1D_FILE);
    plot::plot_static_1d(&p, estimate)?;
    outputs.push(p);

    if estimate.dimensions == Dimensions::Two {
        let p = out_dir.join(plot::STATIC_2D_FILE);
        plot::plot_static_2d(&p, estimate, axis_titles)?;
        outputs.push(p);
    }

    let rows = coordinate_table(estimate);
    let p = out_dir.join(COORDINATES_FILE);
    write_coordinates(&p, &rows)?;
    outputs.push(p);
    Ok(outputs)
}

fn resolve_dir(base: &Path, dir: &str) -> PathBuf {
    let p = Path::new(dir);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

pub fn run_analysis(
    config_path: String,
    out: Option<String>,
    reference: Option<String>,
) -> NResult<()> {
    let config = read_config(&config_path)?;
    info!("config: {:?}", config);

    let base = Path::new(&config_path)
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    let input_dir = resolve_dir(&base, &config.input_directory);
    let out_dir = match (out, &config.output_directory) {
        (Some(o), _) => PathBuf::from(o),
        (None, Some(o)) => resolve_dir(&base, o),
        (None, None) => input_dir.clone(),
    };
    debug!("input: {:?} output: {:?}", input_dir, out_dir);

    let mut static_est = config.static_estimator.clone().map(CommandEstimator::new);
    let mut dynamic_est = config.dynamic_estimator.clone().map(CommandEstimator::new);

    let outcome = analyze(
        &config,
        &input_dir,
        &out_dir,
        static_est.as_mut().map(|e| e as &mut dyn StaticEstimator),
        dynamic_est.as_mut().map(|e| e as &mut dyn DynamicEstimator),
    )?;

    println!(
        "Periods kept: {}",
        outcome
            .kept
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<String>>()
            .join(", ")
    );
    for (p, reason) in outcome.skipped.iter() {
        match reason {
            SkipReason::LoadFailed(e) => println!("Period {} skipped: {}", p, e),
            SkipReason::TooFewVotes { found, minimum } => println!(
                "Period {} skipped: {} votes (minimum {})",
                p, found, minimum
            ),
        }
    }
    for f in outcome.outputs.iter() {
        println!("Wrote {}", f.display());
    }

    // The reference table, if provided for comparison
    if let Some(reference_p) = reference {
        check_reference(&out_dir.join(COORDINATES_FILE), Path::new(&reference_p))?;
    }
    Ok(())
}

/// Compares a written file with a reference, printing the differences.
pub fn check_reference(computed: &Path, reference: &Path) -> NResult<()> {
    let computed_s = fs::read_to_string(computed).context(ReadingFileSnafu {
        path: computed.display().to_string(),
    })?;
    let reference_s = fs::read_to_string(reference).context(ReadingFileSnafu {
        path: reference.display().to_string(),
    })?;
    // Line endings depend on the tool that wrote the reference.
    let computed_s = computed_s.replace("\r\n", "\n");
    let reference_s = reference_s.replace("\r\n", "\n");
    if computed_s != reference_s {
        warn!("Found differences with the reference file");
        print_diff(reference_s.as_str(), computed_s.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference.display().to_string(),
        }
        .fail();
    }
    info!("Coordinates match the reference {}", reference.display());
    Ok(())
}

pub const DEFAULT_EXPORT_ROOT: &str = "output";

/// `output/<yymmdd-HHMMSS>` followed by the keywords, joined with dashes.
pub fn default_export_dir(now: NaiveDateTime, keywords: &[String]) -> PathBuf {
    let mut parts: Vec<String> = vec![now.format("%y%m%d-%H%M%S").to_string()];
    parts.extend(keywords.iter().cloned());
    Path::new(DEFAULT_EXPORT_ROOT).join(parts.join("-"))
}

pub fn run_export(
    records_path: String,
    out: Option<String>,
    keywords: Vec<String>,
) -> NResult<()> {
    let records = read_records(&records_path)?;
    let kept = filter_by_keywords(records.resolutions, &keywords);
    if kept.is_empty() {
        whatever!("No resolution left to export (keywords: {:?})", keywords)
    }

    let out = match out {
        Some(o) => o,
        None => default_export_dir(Local::now().naive_local(), &keywords)
            .display()
            .to_string(),
    };
    let out_dir = Path::new(&out);
    fs::create_dir_all(out_dir).context(CreatingDirSnafu { path: out.clone() })?;
    println!("Created output directory {}", out);

    let batches = batch_by_period(&kept);
    for (period, batch) in batches.iter() {
        let rc = roll_call_for(batch, &records.countries).context(RecordsSnafu {})?;
        write_roll_call(out_dir, *period, &rc)?;
        info!(
            "Exported period {}: {} resolutions, {} countries",
            period,
            rc.num_votes(),
            rc.num_legislators()
        );
    }
    println!("Exported {} periods to {}", batches.len(), out);
    Ok(())
}

pub fn run_sessions(records_path: String) -> NResult<()> {
    let records = read_records(&records_path)?;
    let sessions = detect_sessions(&records.resolutions).context(RecordsSnafu {})?;
    for s in sessions.iter() {
        println!(
            "Session #{}: {} to {}, {} members, {} resolutions",
            s.number,
            s.first_vote.format("%Y/%m/%d"),
            s.last_vote.format("%Y/%m/%d"),
            s.members.len(),
            s.resolutions.len()
        );
    }
    Ok(())
}

pub fn run_sheet(records_path: String, out: String) -> NResult<()> {
    let records = read_records(&records_path)?;
    let sessions = detect_sessions(&records.resolutions).context(RecordsSnafu {})?;
    write_summary_sheet(Path::new(&out), &records, &sessions)?;
    println!("See {}", out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use roll_call::builder::Builder;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    const COUNTRIES: [&str; 4] = ["CHN", "CUB", "FRA", "USA"];

    fn roll_call_with_votes(num_votes: usize) -> RollCall {
        let names: Vec<String> = COUNTRIES.iter().map(|s| s.to_string()).collect();
        let mut b = Builder::new(&names);
        for i in 0..num_votes {
            let choices = match i % 3 {
                0 => [VoteChoice::Nay, VoteChoice::Nay, VoteChoice::Yea, VoteChoice::Yea],
                1 => [VoteChoice::Yea, VoteChoice::Yea, VoteChoice::Abstain, VoteChoice::Nay],
                _ => [VoteChoice::Yea, VoteChoice::NoVote, VoteChoice::Yea, VoteChoice::NotInLegislature],
            };
            b.add_vote_simple(&format!("A/HRC/RES/{}", i), &choices).unwrap();
        }
        b.build().unwrap()
    }

    fn config(dimensions: u32, polarity: &[&str]) -> AnalysisConfig {
        AnalysisConfig {
            input_directory: ".".to_string(),
            output_directory: None,
            first_period: Some(2020),
            last_period: Some(2021),
            excluded_periods: vec![],
            min_votes: Some(10),
            dimensions: Some(dimensions),
            polarity_anchors: polarity.iter().map(|s| s.to_string()).collect(),
            dynamic_dimensions: Some(1),
            dynamic_model: Some(1),
            axis_titles: None,
            static_estimator: None,
            dynamic_estimator: None,
        }
    }

    struct FakeStatic {
        coords: Vec<(String, f64, f64)>,
    }

    impl StaticEstimator for FakeStatic {
        fn estimate(
            &mut self,
            roll_call: &RollCall,
            settings: &StaticSettings,
        ) -> Result<StaticEstimate, EstimationError> {
            assert_eq!(roll_call.num_votes(), 17);
            Ok(StaticEstimate {
                dimensions: settings.dimensions,
                legislators: self
                    .coords
                    .iter()
                    .map(|(id, c, se)| LegislatorEstimate {
                        legislator: id.clone(),
                        coordinates: vec![*c; settings.dimensions.count()],
                        std_errors: vec![*se; settings.dimensions.count()],
                    })
                    .collect(),
            })
        }
    }

    struct FakeDynamic {
        seen: Vec<PeriodId>,
    }

    impl DynamicEstimator for FakeDynamic {
        fn estimate(
            &mut self,
            corpus: &Corpus,
            settings: &DynamicSettings,
        ) -> Result<DynamicEstimate, EstimationError> {
            self.seen = corpus.ids();
            let points = corpus
                .periods()
                .iter()
                .flat_map(|p| {
                    p.roll_call
                        .legislator_ids()
                        .iter()
                        .enumerate()
                        .map(move |(i, l)| DynamicPoint {
                            legislator: l.clone(),
                            period: p.id,
                            coordinates: vec![i as f64 / 4.0 - 0.4],
                        })
                })
                .collect();
            Ok(DynamicEstimate {
                dimensions: settings.dimensions,
                points,
            })
        }
    }

    fn fake_static() -> FakeStatic {
        FakeStatic {
            coords: vec![
                ("USA".to_string(), 0.87654, 0.02),
                ("CHN".to_string(), -0.91, 0.0312),
                ("FRA".to_string(), 0.5, 0.0101),
                ("CUB".to_string(), -0.9049, 0.05),
            ],
        }
    }

    fn write_inputs(dir: &Path) {
        write_roll_call(dir, PeriodId::Year(2020), &roll_call_with_votes(12)).unwrap();
        write_roll_call(dir, PeriodId::Year(2021), &roll_call_with_votes(5)).unwrap();
        write_roll_call(dir, PeriodId::All, &roll_call_with_votes(17)).unwrap();
    }

    #[test]
    fn end_to_end_single_period_corpus() {
        init();
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_inputs(input.path());

        let cfg = config(2, &["USA", "USA"]);
        let mut st = fake_static();
        let mut dy = FakeDynamic { seen: vec![] };
        let outcome = analyze(
            &cfg,
            input.path(),
            out.path(),
            Some(&mut st),
            Some(&mut dy),
        )
        .unwrap();

        assert_eq!(outcome.kept, vec![PeriodId::Year(2020)]);
        assert_eq!(dy.seen, vec![PeriodId::Year(2020)]);
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
        for f in [
            plot::STATIC_1D_FILE,
            plot::STATIC_2D_FILE,
            plot::DYNAMIC_FILE,
            COORDINATES_FILE,
        ] {
            assert!(out.path().join(f).exists(), "missing {}", f);
        }

        let table = fs::read_to_string(out.path().join(COORDINATES_FILE)).unwrap();
        assert_eq!(
            table,
            ",coord1D,se1D\nCHN,-0.91,0.031\nCUB,-0.905,0.05\nFRA,0.5,0.01\nUSA,0.877,0.02\n"
        );
    }

    #[test]
    fn one_dimension_skips_second_plot() {
        init();
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_inputs(input.path());

        let cfg = config(1, &["USA"]);
        let mut st = fake_static();
        let outcome = analyze(&cfg, input.path(), out.path(), Some(&mut st), None).unwrap();
        assert_eq!(outcome.outputs.len(), 2);
        assert!(!out.path().join(plot::STATIC_2D_FILE).exists());
        assert!(!out.path().join(plot::DYNAMIC_FILE).exists());
    }

    #[test]
    fn missing_aggregate_is_fatal() {
        init();
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_roll_call(input.path(), PeriodId::Year(2020), &roll_call_with_votes(12)).unwrap();

        let cfg = config(1, &["USA"]);
        let res = analyze(&cfg, input.path(), out.path(), None, None);
        assert!(matches!(res, Err(NominateError::LoadingPeriod { .. })));
    }

    #[test]
    fn empty_corpus_is_fatal_for_dynamic() {
        init();
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_inputs(input.path());

        let mut cfg = config(1, &["USA"]);
        cfg.min_votes = Some(50);
        let mut dy = FakeDynamic { seen: vec![] };
        let res = analyze(&cfg, input.path(), out.path(), None, Some(&mut dy));
        assert!(matches!(
            res,
            Err(NominateError::Estimation {
                source: EstimationError::EmptyCorpus
            })
        ));
        assert!(dy.seen.is_empty());
    }

    #[test]
    fn reference_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        let c = dir.path().join("c.csv");
        fs::write(&a, ",coord1D,se1D\nCHN,-0.91,0.031\n").unwrap();
        fs::write(&b, ",coord1D,se1D\r\nCHN,-0.91,0.031\r\n").unwrap();
        fs::write(&c, ",coord1D,se1D\nCHN,-0.9,0.031\n").unwrap();
        assert!(check_reference(&a, &b).is_ok());
        assert!(matches!(
            check_reference(&a, &c),
            Err(NominateError::ReferenceMismatch { .. })
        ));
    }

    #[test]
    fn export_then_load() {
        init();
        let records = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(
            records.path().join("resolutions.csv"),
            "name,vote_date,summary,agenda\n\
             R1,2007/06/18,Right to food,Item 3\n\
             R2,2008/03/01,Situation in Myanmar,Item 4\n\
             R3,2008/06/01,Freedom of expression,Item 3\n",
        )
        .unwrap();
        fs::write(
            records.path().join("votes.csv"),
            "resolution_name,country_short,vote\n\
             R1,FRA,Y\nR1,CHN,N\n\
             R2,FRA,Y\nR2,CHN,A\nR2,USA,N\n\
             R3,FRA,.\nR3,USA,Y\n",
        )
        .unwrap();
        fs::write(
            records.path().join("countries.csv"),
            "country_short,country_long,category\n\
             CHN,China,Asia-Pacific\nFRA,France,WEOG\nUSA,United States,WEOG\n",
        )
        .unwrap();

        run_export(
            records.path().display().to_string(),
            Some(out.path().display().to_string()),
            vec![],
        )
        .unwrap();

        let mut loader = CsvLoader::new(out.path());
        let all = loader.load(PeriodId::All).unwrap();
        assert_eq!(all.num_votes(), 3);
        assert_eq!(all.legislator_ids(), &["CHN", "FRA", "USA"].map(|s| s.to_string()));
        let y2008 = loader.load(PeriodId::Year(2008)).unwrap();
        assert_eq!(y2008.vote_ids(), &["R2".to_string(), "R3".to_string()]);
        // CHN did not vote on R3.
        assert_eq!(y2008.choice(0, 1), Some(VoteChoice::NotInLegislature));
        assert_eq!(y2008.choice(1, 1), Some(VoteChoice::NoVote));
        assert!(loader.load(PeriodId::Year(2009)).is_err());

        let res = run_export(
            records.path().display().to_string(),
            Some(out.path().display().to_string()),
            vec!["nothing matches".to_string()],
        );
        assert!(res.is_err());
    }

    #[test]
    fn export_dir_from_time_and_keywords() {
        let now = NaiveDate::from_ymd_opt(2023, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 41)
            .unwrap();
        assert_eq!(
            default_export_dir(now, &[]),
            Path::new("output").join("230307-090541")
        );
        assert_eq!(
            default_export_dir(now, &["Myanmar".to_string(), "Syria".to_string()]),
            Path::new("output").join("230307-090541-Myanmar-Syria")
        );
    }
}
