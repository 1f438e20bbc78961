// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// All the possible states of one cell of a roll-call matrix.
///
/// The numeric codes are the ones used in the `<period>-votes.csv` files.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum VoteChoice {
    /// Code 0.
    Nay,
    /// Code 1.
    Yea,
    /// Code 2: present, but neither for nor against. Counted as missing.
    Abstain,
    /// Code 3: member of the body who did not record a vote. Counted as missing.
    NoVote,
    /// Code 4: not a member of the body when the vote took place.
    NotInLegislature,
}

impl VoteChoice {
    pub const ALL: [VoteChoice; 5] = [
        VoteChoice::Nay,
        VoteChoice::Yea,
        VoteChoice::Abstain,
        VoteChoice::NoVote,
        VoteChoice::NotInLegislature,
    ];

    pub fn code(&self) -> u8 {
        match self {
            VoteChoice::Nay => 0,
            VoteChoice::Yea => 1,
            VoteChoice::Abstain => 2,
            VoteChoice::NoVote => 3,
            VoteChoice::NotInLegislature => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<VoteChoice> {
        VoteChoice::ALL.iter().find(|c| c.code() == code).copied()
    }

    /// Parses the textual form of a code, as found in a CSV cell.
    pub fn parse_code(cell: &str) -> Option<VoteChoice> {
        cell.trim()
            .parse::<u8>()
            .ok()
            .and_then(VoteChoice::from_code)
    }

    /// Parses the letter recorded by the voting records: `Y`, `N`, `A` or `.`.
    ///
    /// An empty value means that the voting intention is missing from the record.
    pub fn from_record_value(value: &str) -> Option<VoteChoice> {
        match value.trim().to_uppercase().as_str() {
            "N" => Some(VoteChoice::Nay),
            "Y" => Some(VoteChoice::Yea),
            "A" => Some(VoteChoice::Abstain),
            "." | "" => Some(VoteChoice::NoVote),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VoteChoice::Nay => "NO",
            VoteChoice::Yea => "YES",
            VoteChoice::Abstain => "ABSTAIN",
            VoteChoice::NoVote => "NO_VOTE",
            VoteChoice::NotInLegislature => "NOT_IN_SESSION",
        }
    }
}

/// A table with a header row. The first column holds the identifier of each row.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct MetadataTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MetadataTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> MetadataTable {
        MetadataTable { header, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(|r| r.first().map(|s| s.as_str()).unwrap_or(""))
    }
}

/// A roll-call matrix with its legislator and vote metadata.
///
/// Rows are legislators, columns are votes. Only constructed through
/// [`RollCall::new`] or the [`crate::builder::Builder`], which check that the
/// dimensions of the matrix and of both metadata tables agree.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RollCall {
    pub(crate) legislator_ids: Vec<String>,
    pub(crate) vote_ids: Vec<String>,
    pub(crate) choices: Vec<Vec<VoteChoice>>,
    pub(crate) legislator_data: MetadataTable,
    pub(crate) vote_data: MetadataTable,
}

/// A time bucket of the analysis.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum PeriodId {
    Year(i32),
    /// The aggregate over all the years.
    All,
}

impl Display for PeriodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodId::Year(y) => write!(f, "{}", y),
            PeriodId::All => write!(f, "all"),
        }
    }
}

impl FromStr for PeriodId {
    type Err = DataError;

    fn from_str(s: &str) -> Result<PeriodId, DataError> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(PeriodId::All);
        }
        s.parse::<i32>()
            .map(PeriodId::Year)
            .map_err(|_| DataError::InvalidPeriod {
                value: s.to_string(),
            })
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Period {
    pub id: PeriodId,
    pub roll_call: RollCall,
}

/// The periods retained for the dynamic estimation, in ascending order.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Corpus {
    pub(crate) periods: Vec<Period>,
}

// ******** Output data structures *********

/// Why a period did not make it into the corpus.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SkipReason {
    LoadFailed(DataError),
    TooFewVotes { found: usize, minimum: usize },
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CorpusOutcome {
    pub corpus: Corpus,
    pub skipped: Vec<(PeriodId, SkipReason)>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct LegislatorEstimate {
    pub legislator: String,
    /// One value per dimension. NaN when the estimator dropped this legislator.
    pub coordinates: Vec<f64>,
    pub std_errors: Vec<f64>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct StaticEstimate {
    pub dimensions: Dimensions,
    pub legislators: Vec<LegislatorEstimate>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct DynamicPoint {
    pub legislator: String,
    pub period: PeriodId,
    pub coordinates: Vec<f64>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct DynamicEstimate {
    pub dimensions: Dimensions,
    pub points: Vec<DynamicPoint>,
}

/// One line of the persisted coordinate table.
#[derive(PartialEq, Debug, Clone)]
pub struct CoordinateRow {
    pub legislator: String,
    pub coord1d: f64,
    pub se1d: f64,
}

/// Errors raised while reading or assembling voting data.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum DataError {
    MissingFile {
        path: String,
    },
    Malformed {
        path: String,
        line: u64,
        reason: String,
    },
    EmptyTable {
        path: String,
    },
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    InvalidCode {
        legislator: String,
        vote: String,
        value: String,
    },
    UnknownLegislator {
        id: String,
    },
    InvalidPeriod {
        value: String,
    },
    InconsistentSessions {
        resolution: String,
        members: String,
    },
    InvalidRecord {
        reason: String,
    },
}

impl Error for DataError {}

impl Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::MissingFile { path } => write!(f, "missing file {}", path),
            DataError::Malformed { path, line, reason } => {
                write!(f, "malformed file {} (line {}): {}", path, line, reason)
            }
            DataError::EmptyTable { path } => write!(f, "no header row in {}", path),
            DataError::DimensionMismatch {
                what,
                expected,
                found,
            } => write!(f, "{}: expected {} but found {}", what, expected, found),
            DataError::InvalidCode {
                legislator,
                vote,
                value,
            } => write!(
                f,
                "invalid vote code {:?} for {} on {}",
                value, legislator, vote
            ),
            DataError::UnknownLegislator { id } => write!(f, "unknown legislator {}", id),
            DataError::InvalidPeriod { value } => write!(f, "invalid period {:?}", value),
            DataError::InconsistentSessions {
                resolution,
                members,
            } => write!(
                f,
                "membership of resolution {} was already seen in an earlier session: {}",
                resolution, members
            ),
            DataError::InvalidRecord { reason } => write!(f, "invalid record: {}", reason),
        }
    }
}

/// Errors that prevent an estimation from running or completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum EstimationError {
    EmptyCorpus,
    InvalidDimensions(u32),
    InvalidModel(u32),
    PolarityCount { expected: usize, found: usize },
    UnknownAnchor(String),
    /// The external estimator failed.
    Failed(String),
}

impl Error for EstimationError {}

impl Display for EstimationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimationError::EmptyCorpus => {
                write!(f, "no period passed the filters, the corpus is empty")
            }
            EstimationError::InvalidDimensions(d) => {
                write!(f, "unsupported number of dimensions: {} (expected 1 or 2)", d)
            }
            EstimationError::InvalidModel(m) => {
                write!(f, "unsupported dynamic model: {} (expected 0 to 3)", m)
            }
            EstimationError::PolarityCount { expected, found } => write!(
                f,
                "expected {} polarity anchor(s) but {} were given",
                expected, found
            ),
            EstimationError::UnknownAnchor(id) => {
                write!(f, "polarity anchor {} is not a legislator of the input", id)
            }
            EstimationError::Failed(msg) => write!(f, "estimator failed: {}", msg),
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CorpusRules {
    pub first_period: i32,
    pub last_period: i32,
    pub excluded_periods: Vec<i32>,
    /// Periods with fewer vote columns than this are left out of the corpus.
    pub min_votes: usize,
}

impl CorpusRules {
    pub const DEFAULT_RULES: CorpusRules = CorpusRules {
        first_period: 2006,
        last_period: 2023,
        excluded_periods: Vec::new(),
        min_votes: 20,
    };
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Dimensions {
    One,
    Two,
}

impl Dimensions {
    pub fn count(&self) -> usize {
        match self {
            Dimensions::One => 1,
            Dimensions::Two => 2,
        }
    }
}

impl TryFrom<u32> for Dimensions {
    type Error = EstimationError;

    fn try_from(value: u32) -> Result<Dimensions, EstimationError> {
        match value {
            1 => Ok(Dimensions::One),
            2 => Ok(Dimensions::Two),
            x => Err(EstimationError::InvalidDimensions(x)),
        }
    }
}

/// How the position of a legislator may drift between periods.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DynamicModel {
    Constant,
    Linear,
    Quadratic,
    Cubic,
}

impl DynamicModel {
    pub fn code(&self) -> u32 {
        match self {
            DynamicModel::Constant => 0,
            DynamicModel::Linear => 1,
            DynamicModel::Quadratic => 2,
            DynamicModel::Cubic => 3,
        }
    }
}

impl TryFrom<u32> for DynamicModel {
    type Error = EstimationError;

    fn try_from(value: u32) -> Result<DynamicModel, EstimationError> {
        match value {
            0 => Ok(DynamicModel::Constant),
            1 => Ok(DynamicModel::Linear),
            2 => Ok(DynamicModel::Quadratic),
            3 => Ok(DynamicModel::Cubic),
            x => Err(EstimationError::InvalidModel(x)),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StaticSettings {
    pub dimensions: Dimensions,
    pub min_votes: usize,
    /// One legislator per dimension, placed on the positive side of that dimension.
    pub polarity: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DynamicSettings {
    pub dimensions: Dimensions,
    pub model: DynamicModel,
    pub min_votes: usize,
    pub polarity: String,
}
