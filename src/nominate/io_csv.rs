// Reading and writing the CSV files of the periods and the reports.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Writer};

use crate::nominate::io_records::Records;
use crate::nominate::*;

pub const VOTES_SUFFIX: &str = "votes";
pub const LEGIS_DATA_SUFFIX: &str = "legis-data";
pub const VOTE_DATA_SUFFIX: &str = "vote-data";

pub fn period_file(dir: &Path, period: PeriodId, suffix: &str) -> PathBuf {
    dir.join(format!("{}-{}.csv", period, suffix))
}

/// Reads the three files of a period from a directory.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    dir: PathBuf,
}

impl CsvLoader {
    pub fn new(dir: &Path) -> CsvLoader {
        CsvLoader {
            dir: dir.to_path_buf(),
        }
    }
}

impl PeriodLoader for CsvLoader {
    fn load(&mut self, period: PeriodId) -> Result<RollCall, DataError> {
        read_roll_call(&self.dir, period)
    }
}

fn malformed(path: &Path, lineno: u64, e: &csv::Error) -> DataError {
    let line = e.position().map(|p| p.line()).unwrap_or(lineno);
    DataError::Malformed {
        path: path.display().to_string(),
        line,
        reason: e.to_string(),
    }
}

/// A table with its header row. Every row has the length of the header.
pub(crate) fn read_table(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), DataError> {
    if !path.is_file() {
        return Err(DataError::MissingFile {
            path: path.display().to_string(),
        });
    }
    let rdr = ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| malformed(path, 0, &e))?;
    let mut records = rdr.into_records();
    let header: Vec<String> = match records.next() {
        None => {
            return Err(DataError::EmptyTable {
                path: path.display().to_string(),
            })
        }
        Some(r) => to_strings(&r.map_err(|e| malformed(path, 1, &e))?),
    };
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx as u64 + 2;
        let line = line_r.map_err(|e| malformed(path, lineno, &e))?;
        rows.push(to_strings(&line));
    }
    debug!("read_table: {:?}: {} rows", path, rows.len());
    Ok((header, rows))
}

fn to_strings(record: &StringRecord) -> Vec<String> {
    record.iter().map(|s| s.to_string()).collect()
}

pub fn read_roll_call(dir: &Path, period: PeriodId) -> Result<RollCall, DataError> {
    let (votes_header, votes_rows) = read_table(&period_file(dir, period, VOTES_SUFFIX))?;
    let vote_ids: Vec<String> = votes_header.into_iter().skip(1).collect();

    let mut legislator_ids: Vec<String> = Vec::new();
    let mut choices: Vec<Vec<VoteChoice>> = Vec::new();
    for row in votes_rows.iter() {
        let legislator = row.first().cloned().unwrap_or_default();
        let mut line: Vec<VoteChoice> = Vec::new();
        for (cell, vote) in row.iter().skip(1).zip(vote_ids.iter()) {
            let c = VoteChoice::parse_code(cell).ok_or_else(|| DataError::InvalidCode {
                legislator: legislator.clone(),
                vote: vote.clone(),
                value: cell.clone(),
            })?;
            line.push(c);
        }
        legislator_ids.push(legislator);
        choices.push(line);
    }

    let (legis_header, legis_rows) = read_table(&period_file(dir, period, LEGIS_DATA_SUFFIX))?;
    let (vote_header, vote_rows) = read_table(&period_file(dir, period, VOTE_DATA_SUFFIX))?;

    RollCall::new(
        legislator_ids,
        vote_ids,
        choices,
        MetadataTable::new(legis_header, legis_rows),
        MetadataTable::new(vote_header, vote_rows),
    )
}

fn write_table(path: &Path, header: &[String], rows: &[Vec<String>]) -> NResult<()> {
    let path_s = path.display().to_string();
    let mut wtr = Writer::from_path(path).context(CsvOpenSnafu {
        path: path_s.clone(),
    })?;
    wtr.write_record(header).context(CsvWriteSnafu {
        path: path_s.clone(),
    })?;
    for row in rows.iter() {
        wtr.write_record(row).context(CsvWriteSnafu {
            path: path_s.clone(),
        })?;
    }
    wtr.flush().context(FlushingSnafu { path: path_s })?;
    Ok(())
}

/// Writes the three files of a period.
pub fn write_roll_call(dir: &Path, period: PeriodId, rc: &RollCall) -> NResult<()> {
    let mut header: Vec<String> = vec!["Country".to_string()];
    header.extend(rc.vote_ids().iter().cloned());
    let rows: Vec<Vec<String>> = rc
        .legislator_ids()
        .iter()
        .zip(rc.choices().iter())
        .map(|(l, line)| {
            let mut row = vec![l.clone()];
            row.extend(line.iter().map(|c| c.code().to_string()));
            row
        })
        .collect();
    write_table(&period_file(dir, period, VOTES_SUFFIX), &header, &rows)?;

    let legis = rc.legislator_data();
    write_table(
        &period_file(dir, period, LEGIS_DATA_SUFFIX),
        &legis.header,
        &legis.rows,
    )?;
    let votes = rc.vote_data();
    write_table(
        &period_file(dir, period, VOTE_DATA_SUFFIX),
        &votes.header,
        &votes.rows,
    )?;
    debug!("write_roll_call: wrote period {} to {:?}", period, dir);
    Ok(())
}

fn format_value(x: f64) -> String {
    if x.is_finite() {
        x.to_string()
    } else {
        "NA".to_string()
    }
}

pub fn write_coordinates(path: &Path, rows: &[CoordinateRow]) -> NResult<()> {
    let header: Vec<String> = ["", "coord1D", "se1D"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let lines: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.legislator.clone(),
                format_value(r.coord1d),
                format_value(r.se1d),
            ]
        })
        .collect();
    write_table(path, &header, &lines)?;
    info!("Wrote {} coordinates to {:?}", rows.len(), path);
    Ok(())
}

/// One line per resolution with the start of its session, the tallies and the
/// vote of every country.
///
/// The categories keep the order in which they appear in the country table.
pub fn write_summary_sheet(path: &Path, records: &Records, sessions: &[Session]) -> NResult<()> {
    let mut categories: Vec<(&str, Vec<&str>)> = Vec::new();
    for c in records.countries.iter() {
        match categories.iter_mut().find(|(cat, _)| *cat == c.category) {
            Some((_, countries)) => countries.push(c.short_name.as_str()),
            None => categories.push((c.category.as_str(), vec![c.short_name.as_str()])),
        }
    }
    for (_, countries) in categories.iter_mut() {
        countries.sort();
    }

    let session_starts: HashMap<&str, NaiveDate> = sessions
        .iter()
        .flat_map(|s| s.resolutions.iter().map(move |r| (r.as_str(), s.first_vote)))
        .collect();

    let mut header: Vec<String> = [
        "Name",
        "Start of Session",
        "Date",
        "Summary",
        "Agenda",
        "Passed",
        "Yes",
        "No",
        "Abstain",
        "Missing",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for (category, countries) in categories.iter() {
        header.push(String::new());
        header.push(category.to_string());
        header.extend(countries.iter().map(|c| c.to_string()));
    }

    let mut resolutions: Vec<&Resolution> = records.resolutions.iter().collect();
    resolutions.sort_by_key(|r| r.date);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for r in resolutions.into_iter() {
        let tally = r.tally();
        let session_start = match session_starts.get(r.name.as_str()) {
            Some(d) => d.format("%Y/%m/%d").to_string(),
            None => {
                warn!("No session found for resolution {}", r.name);
                String::new()
            }
        };
        let passed = if tally.passed() { "True" } else { "False" };
        let mut row = vec![
            r.name.clone(),
            session_start,
            r.date.format("%Y/%m/%d").to_string(),
            r.summary.clone(),
            r.agenda.clone(),
            passed.to_string(),
            tally.yes.to_string(),
            tally.no.to_string(),
            tally.abstain.to_string(),
            tally.no_vote.to_string(),
        ];
        for (category, countries) in categories.iter() {
            row.push(String::new());
            row.push(category.to_string());
            row.extend(countries.iter().map(|c| {
                r.vote_of(c)
                    .unwrap_or(VoteChoice::NotInLegislature)
                    .name()
                    .to_string()
            }));
        }
        rows.push(row);
    }
    write_table(path, &header, &rows)?;
    info!("Wrote {} resolutions to {:?}", rows.len(), path);
    Ok(())
}
