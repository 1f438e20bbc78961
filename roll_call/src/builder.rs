pub use crate::config::*;

/// A builder for assembling a roll call one vote at a time.
///
/// ```
/// pub use roll_call::builder::Builder;
/// pub use roll_call::VoteChoice;
/// # use roll_call::DataError;
///
/// let mut builder = Builder::new(&["FRA".to_string(), "USA".to_string()]);
///
/// builder.add_vote_simple("A/HRC/RES/7/1", &[VoteChoice::Yea, VoteChoice::Nay])?;
/// builder.add_vote_simple("A/HRC/RES/7/2", &[VoteChoice::Abstain, VoteChoice::Yea])?;
///
/// let rc = builder.build()?;
/// assert_eq!(rc.num_votes(), 2);
///
/// # Ok::<(), DataError>(())
/// ```
pub struct Builder {
    pub(crate) _legislators: Vec<String>,
    pub(crate) _legislator_data: Option<MetadataTable>,
    pub(crate) _vote_header: Vec<String>,
    pub(crate) _vote_data: Vec<Vec<String>>,
    // Column-major while building: one entry per vote.
    pub(crate) _columns: Vec<Vec<VoteChoice>>,
}

impl Builder {
    pub fn new(legislators: &[String]) -> Builder {
        Builder {
            _legislators: legislators.to_vec(),
            _legislator_data: None,
            _vote_header: vec!["Vote".to_string()],
            _vote_data: Vec::new(),
            _columns: Vec::new(),
        }
    }

    /// Attaches the legislator metadata, one row per legislator in the order given to `new`.
    ///
    /// If not provided, the metadata only contains the identifiers.
    pub fn legislator_data(self, header: &[String], rows: &[Vec<String>]) -> Builder {
        Builder {
            _legislator_data: Some(MetadataTable::new(header.to_vec(), rows.to_vec())),
            ..self
        }
    }

    /// Sets the header of the vote metadata. The first column is the vote identifier.
    pub fn vote_header(self, header: &[String]) -> Builder {
        Builder {
            _vote_header: header.to_vec(),
            ..self
        }
    }

    /// Adds a vote without metadata beyond its identifier.
    pub fn add_vote_simple(&mut self, vote_id: &str, choices: &[VoteChoice]) -> Result<(), DataError> {
        self.add_vote(&[vote_id.to_string()], choices)
    }

    /// Adds a vote.
    ///
    /// metadata: the row of the vote metadata, starting with the vote identifier.
    /// choices: the choice of each legislator, in the order given to `new`.
    pub fn add_vote(&mut self, metadata: &[String], choices: &[VoteChoice]) -> Result<(), DataError> {
        let vote_id = metadata.first().cloned().unwrap_or_default();
        if choices.len() != self._legislators.len() {
            return Err(DataError::DimensionMismatch {
                what: format!("choices for vote {}", vote_id),
                expected: self._legislators.len(),
                found: choices.len(),
            });
        }
        self._vote_data.push(metadata.to_vec());
        self._columns.push(choices.to_vec());
        Ok(())
    }

    pub fn build(self) -> Result<RollCall, DataError> {
        let vote_ids: Vec<String> = self
            ._vote_data
            .iter()
            .map(|r| r.first().cloned().unwrap_or_default())
            .collect();
        let choices: Vec<Vec<VoteChoice>> = (0..self._legislators.len())
            .map(|lidx| self._columns.iter().map(|col| col[lidx]).collect())
            .collect();
        let legislator_data = match self._legislator_data {
            Some(t) => t,
            None => MetadataTable::new(
                vec!["Legislator".to_string()],
                self._legislators.iter().map(|l| vec![l.clone()]).collect(),
            ),
        };
        RollCall::new(
            self._legislators,
            vote_ids,
            choices,
            legislator_data,
            MetadataTable::new(self._vote_header, self._vote_data),
        )
    }
}
