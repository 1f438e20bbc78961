// Reading the voting records, from a directory of CSV files or from a workbook.

use std::collections::{HashMap, HashSet};

use calamine::{open_workbook, DataType, Reader, Xlsx};
use chrono::{Duration, NaiveDate};

use crate::nominate::io_csv::read_table;
use crate::nominate::*;

pub const RESOLUTIONS_TABLE: &str = "resolutions";
pub const VOTES_TABLE: &str = "votes";
pub const COUNTRIES_TABLE: &str = "countries";

/// The resolutions with their votes, and the countries that may vote on them.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Records {
    pub resolutions: Vec<Resolution>,
    pub countries: Vec<Country>,
}

/// A table as read from the source, with its header row.
type RawTable = (Vec<String>, Vec<Vec<String>>);

/// Reads the records from a workbook if the path is an `.xlsx` file, from a
/// directory of CSV files otherwise.
pub fn read_records(path: &str) -> NResult<Records> {
    let is_excel = Path::new(path)
        .extension()
        .map(|e| e.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);
    let (resolutions, votes, countries) = if is_excel {
        read_excel_tables(path)?
    } else {
        read_csv_tables(Path::new(path))?
    };
    let records = assemble_records(&resolutions, &votes, &countries).context(RecordsSnafu {})?;
    info!(
        "Read {} resolutions and {} countries from {}",
        records.resolutions.len(),
        records.countries.len(),
        path
    );
    Ok(records)
}

fn read_csv_tables(dir: &Path) -> NResult<(RawTable, RawTable, RawTable)> {
    let read = |name: &str| {
        read_table(&dir.join(format!("{}.csv", name))).context(RecordsSnafu {})
    };
    Ok((
        read(RESOLUTIONS_TABLE)?,
        read(VOTES_TABLE)?,
        read(COUNTRIES_TABLE)?,
    ))
}

fn read_excel_tables(path: &str) -> NResult<(RawTable, RawTable, RawTable)> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let mut read = |sheet: &str| -> NResult<RawTable> {
        let wrange = workbook
            .worksheet_range(sheet)
            .context(MissingSheetSnafu { sheet, path })?
            .context(OpeningExcelSnafu { path })?;
        let mut rows = wrange
            .rows()
            .map(|row| row.iter().map(read_cell).collect::<Vec<String>>());
        let header = rows.next().context(EmptySheetSnafu { sheet, path })?;
        debug!("read_excel_tables: sheet {}: header {:?}", sheet, header);
        Ok((header, rows.collect()))
    };
    Ok((
        read(RESOLUTIONS_TABLE)?,
        read(VOTES_TABLE)?,
        read(COUNTRIES_TABLE)?,
    ))
}

// Spreadsheet dates are a number of days since 1899-12-30.
fn serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.checked_add_signed(Duration::days(serial.floor() as i64)))
}

fn read_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(serial) => serial_date(*serial)
            .map(|d| d.format("%Y/%m/%d").to_string())
            .unwrap_or_else(|| serial.to_string()),
        DataType::Empty => String::new(),
        DataType::Error(e) => {
            warn!("read_cell: cell error {:?}, using an empty value", e);
            String::new()
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, DataError> {
    let s = s.trim();
    let parsed = NaiveDate::parse_from_str(s, "%Y/%m/%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
        // A date cell without a date format reads as its serial number.
        .or_else(|| s.parse::<f64>().ok().and_then(serial_date));
    parsed.ok_or_else(|| DataError::InvalidRecord {
        reason: format!("invalid date {:?}", s),
    })
}

/// The positions of the named columns in a header.
fn column_indexes(
    table: &str,
    header: &[String],
    names: &[&str],
) -> Result<Vec<usize>, DataError> {
    names
        .iter()
        .map(|n| {
            header
                .iter()
                .position(|h| h.trim() == *n)
                .ok_or_else(|| DataError::InvalidRecord {
                    reason: format!("column {} is missing from table {}", n, table),
                })
        })
        .collect()
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).map(|s| s.trim().to_string()).unwrap_or_default()
}

fn is_country_code(code: &str) -> bool {
    code.chars().count() == 3
}

/// Applies the record rules and links the votes to their resolutions.
pub fn assemble_records(
    resolutions: &RawTable,
    votes: &RawTable,
    countries: &RawTable,
) -> Result<Records, DataError> {
    let (header, rows) = countries;
    let idx = column_indexes(
        COUNTRIES_TABLE,
        header,
        &["country_short", "country_long", "category"],
    )?;
    let mut all_countries: Vec<Country> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for row in rows.iter() {
        let short_name = cell(row, idx[0]);
        if !is_country_code(&short_name) {
            warn!("Ignoring country with invalid code {:?}", short_name);
            continue;
        }
        if !seen.insert(short_name.clone()) {
            warn!("Ignoring duplicate country {}", short_name);
            continue;
        }
        all_countries.push(Country {
            short_name,
            long_name: cell(row, idx[1]),
            category: cell(row, idx[2]),
        });
    }

    let (header, rows) = resolutions;
    let idx = column_indexes(
        RESOLUTIONS_TABLE,
        header,
        &["name", "vote_date", "summary", "agenda"],
    )?;
    let mut all_resolutions: Vec<Resolution> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for row in rows.iter() {
        let name = cell(row, idx[0]);
        if positions.contains_key(&name) {
            warn!("Ignoring duplicate resolution {}", name);
            continue;
        }
        let date = parse_date(&cell(row, idx[1]))?;
        positions.insert(name.clone(), all_resolutions.len());
        all_resolutions.push(Resolution {
            name,
            date,
            summary: cell(row, idx[2]),
            agenda: cell(row, idx[3]),
            votes: Vec::new(),
        });
    }

    let (header, rows) = votes;
    let idx = column_indexes(
        VOTES_TABLE,
        header,
        &["resolution_name", "country_short", "vote"],
    )?;
    for row in rows.iter() {
        let resolution_name = cell(row, idx[0]);
        let country = cell(row, idx[1]);
        let value = cell(row, idx[2]);
        if !is_country_code(&country) {
            warn!(
                "Ignoring vote of invalid country code {:?} on {}",
                country, resolution_name
            );
            continue;
        }
        let r = match positions.get(&resolution_name) {
            Some(pos) => &mut all_resolutions[*pos],
            None => {
                warn!(
                    "Ignoring vote of {} on unknown resolution {}",
                    country, resolution_name
                );
                continue;
            }
        };
        if r.vote_of(&country).is_some() {
            warn!(
                "Ignoring duplicate vote of {} on {}",
                country, resolution_name
            );
            continue;
        }
        let choice =
            VoteChoice::from_record_value(&value).ok_or_else(|| DataError::InvalidRecord {
                reason: format!(
                    "invalid vote {:?} of {} on {}",
                    value, country, resolution_name
                ),
            })?;
        r.votes.push((country, choice));
    }

    Ok(Records {
        resolutions: all_resolutions,
        countries: all_countries,
    })
}
