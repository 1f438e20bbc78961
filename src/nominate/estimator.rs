// Estimators running as external programs.

use std::process::Command;

use serde::Serialize;

use crate::nominate::config_reader::EstimatorCommand;
use crate::nominate::io_csv::write_roll_call;
use crate::nominate::*;

pub const REQUEST_FILE: &str = "request.json";
pub const ESTIMATES_FILE: &str = "estimates.csv";

/// What the external program is asked to do.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct EstimationRequest {
    pub kind: String,
    pub dimensions: usize,
    #[serde(rename = "minVotes")]
    pub min_votes: usize,
    pub polarity: Vec<String>,
    pub model: Option<u32>,
    pub periods: Vec<String>,
    #[serde(rename = "inputDirectory")]
    pub input_directory: String,
    #[serde(rename = "outputFile")]
    pub output_file: String,
}

/// One line of the file written by the external program.
#[derive(PartialEq, Debug, Clone)]
struct EstimateLine {
    legislator: String,
    period: Option<PeriodId>,
    coordinates: [f64; 2],
    std_errors: [f64; 2],
}

/// Runs an external program in a scratch directory, which is removed when the
/// estimation returns.
#[derive(Debug, Clone)]
pub struct CommandEstimator {
    command: EstimatorCommand,
}

impl CommandEstimator {
    pub fn new(command: EstimatorCommand) -> CommandEstimator {
        CommandEstimator { command }
    }

    fn run(
        &self,
        kind: &str,
        dimensions: Dimensions,
        min_votes: usize,
        polarity: &[String],
        model: Option<DynamicModel>,
        periods: &[(PeriodId, &RollCall)],
    ) -> Result<Vec<EstimateLine>, EstimationError> {
        let failed = |msg: String| EstimationError::Failed(msg);

        let scratch = tempfile::tempdir()
            .map_err(|e| failed(format!("cannot create a scratch directory: {}", e)))?;
        let input_dir = scratch.path().join("input");
        fs::create_dir_all(&input_dir)
            .map_err(|e| failed(format!("cannot create {:?}: {}", input_dir, e)))?;
        for (id, rc) in periods.iter() {
            write_roll_call(&input_dir, *id, rc).map_err(|e| failed(e.to_string()))?;
        }

        let output_file = scratch.path().join(ESTIMATES_FILE);
        let request = EstimationRequest {
            kind: kind.to_string(),
            dimensions: dimensions.count(),
            min_votes,
            polarity: polarity.to_vec(),
            model: model.map(|m| m.code()),
            periods: periods.iter().map(|(id, _)| id.to_string()).collect(),
            input_directory: input_dir.display().to_string(),
            output_file: output_file.display().to_string(),
        };
        let request_path = scratch.path().join(REQUEST_FILE);
        let request_s = serde_json::to_string_pretty(&request)
            .map_err(|e| failed(format!("cannot serialize the request: {}", e)))?;
        fs::write(&request_path, request_s)
            .map_err(|e| failed(format!("cannot write {:?}: {}", request_path, e)))?;

        info!(
            "Running {} {:?} for a {} estimation",
            self.command.program, self.command.args, kind
        );
        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(&request_path)
            .output()
            .map_err(|e| failed(format!("cannot start {}: {}", self.command.program, e)))?;
        debug!(
            "CommandEstimator: stdout: {}",
            String::from_utf8_lossy(&output.stdout)
        );
        if !output.status.success() {
            return Err(failed(format!(
                "{} exited with {}: {}",
                self.command.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        read_estimates(&output_file)
    }
}

impl StaticEstimator for CommandEstimator {
    fn estimate(
        &mut self,
        roll_call: &RollCall,
        settings: &StaticSettings,
    ) -> Result<StaticEstimate, EstimationError> {
        let lines = self.run(
            "static",
            settings.dimensions,
            settings.min_votes,
            &settings.polarity,
            None,
            &[(PeriodId::All, roll_call)],
        )?;
        let n = settings.dimensions.count();
        Ok(StaticEstimate {
            dimensions: settings.dimensions,
            legislators: lines
                .into_iter()
                .map(|l| LegislatorEstimate {
                    legislator: l.legislator,
                    coordinates: l.coordinates[..n].to_vec(),
                    std_errors: l.std_errors[..n].to_vec(),
                })
                .collect(),
        })
    }
}

impl DynamicEstimator for CommandEstimator {
    fn estimate(
        &mut self,
        corpus: &Corpus,
        settings: &DynamicSettings,
    ) -> Result<DynamicEstimate, EstimationError> {
        let periods: Vec<(PeriodId, &RollCall)> = corpus
            .periods()
            .iter()
            .map(|p| (p.id, &p.roll_call))
            .collect();
        let lines = self.run(
            "dynamic",
            settings.dimensions,
            settings.min_votes,
            &[settings.polarity.clone()],
            Some(settings.model),
            &periods,
        )?;
        let n = settings.dimensions.count();
        let mut points: Vec<DynamicPoint> = Vec::new();
        for l in lines.into_iter() {
            let period = l.period.ok_or_else(|| {
                EstimationError::Failed(format!("no period for legislator {}", l.legislator))
            })?;
            points.push(DynamicPoint {
                legislator: l.legislator,
                period,
                coordinates: l.coordinates[..n].to_vec(),
            });
        }
        Ok(DynamicEstimate {
            dimensions: settings.dimensions,
            points,
        })
    }
}

fn parse_value(s: &str) -> Result<f64, EstimationError> {
    let s = s.trim();
    if s.is_empty() || s == "NA" {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .map_err(|_| EstimationError::Failed(format!("invalid value in the estimates: {:?}", s)))
}

fn read_estimates(path: &Path) -> Result<Vec<EstimateLine>, EstimationError> {
    let failed = |e: csv::Error| {
        EstimationError::Failed(format!("cannot read the estimates {:?}: {}", path, e))
    };
    let mut rdr = csv::Reader::from_path(path).map_err(failed)?;
    let header = rdr.headers().map_err(failed)?.clone();
    let column = |name: &str| header.iter().position(|h| h.trim() == name);
    let legislator_idx = column("legislator").ok_or_else(|| {
        EstimationError::Failed(format!("no legislator column in {:?}", path))
    })?;
    let period_idx = column("period");
    let value_idx = [
        column("coord1D"),
        column("coord2D"),
        column("se1D"),
        column("se2D"),
    ];

    let mut res: Vec<EstimateLine> = Vec::new();
    for record_r in rdr.records() {
        let record = record_r.map_err(failed)?;
        let mut values = [f64::NAN; 4];
        for (v, idx_o) in values.iter_mut().zip(value_idx.iter()) {
            if let Some(s) = idx_o.and_then(|idx| record.get(idx)) {
                *v = parse_value(s)?;
            }
        }
        let period = match period_idx.and_then(|idx| record.get(idx)) {
            Some(s) if !s.trim().is_empty() => Some(
                s.parse::<PeriodId>()
                    .map_err(|e| EstimationError::Failed(e.to_string()))?,
            ),
            _ => None,
        };
        res.push(EstimateLine {
            legislator: record.get(legislator_idx).unwrap_or_default().to_string(),
            period,
            coordinates: [values[0], values[1]],
            std_errors: [values[2], values[3]],
        });
    }
    debug!("read_estimates: {} lines from {:?}", res.len(), path);
    Ok(res)
}
