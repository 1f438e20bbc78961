//! Resolution records, as published by the voting body, and their grouping into
//! the periods of the analysis.

use chrono::{Datelike, NaiveDate};
use log::{debug, info};

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::builder::Builder;
use crate::config::*;

pub type CountryShortName = String;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Resolution {
    pub name: String,
    pub date: NaiveDate,
    pub summary: String,
    pub agenda: String,
    /// The recorded votes, in the order of the record.
    pub votes: Vec<(CountryShortName, VoteChoice)>,
}

impl Resolution {
    pub fn vote_of(&self, country: &str) -> Option<VoteChoice> {
        self.votes
            .iter()
            .find(|(c, _)| c == country)
            .map(|(_, v)| *v)
    }

    pub fn countries(&self) -> BTreeSet<&str> {
        self.votes.iter().map(|(c, _)| c.as_str()).collect()
    }

    pub fn tally(&self) -> Tally {
        let mut t = Tally::default();
        for (_, v) in self.votes.iter() {
            match v {
                VoteChoice::Yea => t.yes += 1,
                VoteChoice::Nay => t.no += 1,
                VoteChoice::Abstain => t.abstain += 1,
                VoteChoice::NoVote => t.no_vote += 1,
                VoteChoice::NotInLegislature => {}
            }
        }
        t
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Country {
    pub short_name: CountryShortName,
    pub long_name: String,
    pub category: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct Tally {
    pub yes: usize,
    pub no: usize,
    pub abstain: usize,
    pub no_vote: usize,
}

impl Tally {
    pub fn passed(&self) -> bool {
        self.yes > self.no
    }
}

/// A stretch of resolutions voted by the same set of members.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Session {
    pub number: u32,
    pub members: BTreeSet<CountryShortName>,
    pub resolutions: Vec<String>,
    pub first_vote: NaiveDate,
    pub last_vote: NaiveDate,
}

/// Keeps the resolutions whose summary mentions one of the keywords (ignoring case).
/// Without keywords, all the resolutions are kept.
pub fn filter_by_keywords(resolutions: Vec<Resolution>, keywords: &[String]) -> Vec<Resolution> {
    if keywords.is_empty() {
        return resolutions;
    }
    let kws: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    let res: Vec<Resolution> = resolutions
        .into_iter()
        .filter(|r| {
            let summary = r.summary.to_lowercase();
            kws.iter().any(|k| summary.contains(k.as_str()))
        })
        .collect();
    info!(
        "filter_by_keywords: {} resolutions match {:?}",
        res.len(),
        keywords
    );
    res
}

/// Groups the resolutions by year of vote, plus one `all` group with every resolution.
///
/// Within each group, the resolutions are ordered by date.
pub fn batch_by_period(resolutions: &[Resolution]) -> BTreeMap<PeriodId, Vec<Resolution>> {
    let mut sorted: Vec<Resolution> = resolutions.to_vec();
    sorted.sort_by_key(|r| r.date);
    let mut batches: BTreeMap<PeriodId, Vec<Resolution>> = BTreeMap::new();
    batches.insert(PeriodId::All, sorted.clone());
    for r in sorted.into_iter() {
        batches
            .entry(PeriodId::Year(r.date.year()))
            .or_default()
            .push(r);
    }
    debug!(
        "batch_by_period: {:?}",
        batches
            .iter()
            .map(|(p, rs)| (p.to_string(), rs.len()))
            .collect::<Vec<_>>()
    );
    batches
}

/// All the countries that voted on at least one of the resolutions, sorted.
pub fn countries_for_resolutions(resolutions: &[Resolution]) -> Vec<CountryShortName> {
    let names: BTreeSet<&str> = resolutions.iter().flat_map(|r| r.countries()).collect();
    names.into_iter().map(|s| s.to_string()).collect()
}

/// Assembles the roll call of a batch of resolutions.
///
/// Countries that did not take part in a vote are marked as not in the legislature.
pub fn roll_call_for(resolutions: &[Resolution], countries: &[Country]) -> Result<RollCall, DataError> {
    let by_name: HashMap<&str, &Country> = countries
        .iter()
        .map(|c| (c.short_name.as_str(), c))
        .collect();
    let names = countries_for_resolutions(resolutions);
    let mut legis_rows: Vec<Vec<String>> = Vec::new();
    for n in names.iter() {
        let c = by_name
            .get(n.as_str())
            .ok_or_else(|| DataError::UnknownLegislator { id: n.clone() })?;
        legis_rows.push(vec![
            c.short_name.clone(),
            c.long_name.clone(),
            c.category.clone(),
        ]);
    }

    // The "party" column is expected by the estimators for the legislator metadata.
    let mut builder = Builder::new(&names)
        .legislator_data(
            &[
                "Country".to_string(),
                "Country Long".to_string(),
                "party".to_string(),
            ],
            &legis_rows,
        )
        .vote_header(&[
            "Resolution".to_string(),
            "Date".to_string(),
            "Summary".to_string(),
        ]);
    for r in resolutions.iter() {
        let choices: Vec<VoteChoice> = names
            .iter()
            .map(|n| r.vote_of(n).unwrap_or(VoteChoice::NotInLegislature))
            .collect();
        builder.add_vote(
            &[
                r.name.clone(),
                r.date.format("%Y/%m/%d").to_string(),
                r.summary.clone(),
            ],
            &choices,
        )?;
    }
    builder.build()
}

/// Splits the resolutions into sessions of constant membership.
///
/// Fails if a membership comes back after having changed, which points to a
/// vote record missing some of the members.
pub fn detect_sessions(resolutions: &[Resolution]) -> Result<Vec<Session>, DataError> {
    let mut sorted: Vec<&Resolution> = resolutions.iter().collect();
    sorted.sort_by_key(|r| r.date);

    let mut sessions: Vec<Session> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut last_key: Option<String> = None;

    for r in sorted.into_iter() {
        let members = r.countries();
        let key = members.iter().cloned().collect::<Vec<&str>>().join("|");

        if last_key.as_deref() != Some(key.as_str()) && index.contains_key(&key) {
            return Err(DataError::InconsistentSessions {
                resolution: r.name.clone(),
                members: key,
            });
        }

        let idx = match index.get(&key) {
            Some(idx) => *idx,
            None => {
                let number = sessions.len() as u32 + 1;
                info!(
                    "New session #{} on {}, resolution {}, members {}",
                    number,
                    r.date,
                    r.name,
                    members.iter().cloned().collect::<Vec<&str>>().join(", ")
                );
                sessions.push(Session {
                    number,
                    members: members.iter().map(|s| s.to_string()).collect(),
                    resolutions: Vec::new(),
                    first_vote: r.date,
                    last_vote: r.date,
                });
                index.insert(key.clone(), sessions.len() - 1);
                sessions.len() - 1
            }
        };
        let s = &mut sessions[idx];
        s.last_vote = r.date;
        s.resolutions.push(r.name.clone());
        last_key = Some(key);
    }
    Ok(sessions)
}
