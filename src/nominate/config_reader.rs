use crate::nominate::*;

use serde::{Deserialize, Serialize};

/// An external program, run with its arguments followed by the path of the request.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(rename = "inputDirectory")]
    pub input_directory: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "firstPeriod")]
    pub first_period: Option<i32>,
    #[serde(rename = "lastPeriod")]
    pub last_period: Option<i32>,
    #[serde(rename = "excludedPeriods", default)]
    pub excluded_periods: Vec<i32>,
    #[serde(rename = "minVotes")]
    pub min_votes: Option<usize>,
    pub dimensions: Option<u32>,
    #[serde(rename = "polarityAnchors", default)]
    pub polarity_anchors: Vec<String>,
    #[serde(rename = "dynamicDimensions")]
    pub dynamic_dimensions: Option<u32>,
    #[serde(rename = "dynamicModel")]
    pub dynamic_model: Option<u32>,
    #[serde(rename = "axisTitles")]
    pub axis_titles: Option<Vec<String>>,
    #[serde(rename = "staticEstimator")]
    pub static_estimator: Option<EstimatorCommand>,
    #[serde(rename = "dynamicEstimator")]
    pub dynamic_estimator: Option<EstimatorCommand>,
}

impl AnalysisConfig {
    pub fn corpus_rules(&self) -> NResult<CorpusRules> {
        let defaults = CorpusRules::DEFAULT_RULES;
        let rules = CorpusRules {
            first_period: self.first_period.unwrap_or(defaults.first_period),
            last_period: self.last_period.unwrap_or(defaults.last_period),
            excluded_periods: self.excluded_periods.clone(),
            min_votes: self.min_votes.unwrap_or(defaults.min_votes),
        };
        if rules.first_period > rules.last_period {
            return InvalidConfigSnafu {
                reason: format!(
                    "firstPeriod {} is after lastPeriod {}",
                    rules.first_period, rules.last_period
                ),
            }
            .fail();
        }
        Ok(rules)
    }

    pub fn static_settings(&self) -> NResult<StaticSettings> {
        let dimensions =
            Dimensions::try_from(self.dimensions.unwrap_or(1)).context(EstimationSnafu {})?;
        if self.polarity_anchors.len() != dimensions.count() {
            return InvalidConfigSnafu {
                reason: format!(
                    "{} dimension(s) need as many polarity anchors, found {:?}",
                    dimensions.count(),
                    self.polarity_anchors
                ),
            }
            .fail();
        }
        Ok(StaticSettings {
            dimensions,
            min_votes: self.min_votes_or_default(),
            polarity: self.polarity_anchors.clone(),
        })
    }

    pub fn dynamic_settings(&self) -> NResult<DynamicSettings> {
        let dimensions = Dimensions::try_from(self.dynamic_dimensions.unwrap_or(1))
            .context(EstimationSnafu {})?;
        let model =
            DynamicModel::try_from(self.dynamic_model.unwrap_or(1)).context(EstimationSnafu {})?;
        let polarity = match self.polarity_anchors.first() {
            Some(p) => p.clone(),
            None => {
                return InvalidConfigSnafu {
                    reason: "polarityAnchors is empty",
                }
                .fail()
            }
        };
        Ok(DynamicSettings {
            dimensions,
            model,
            min_votes: self.min_votes_or_default(),
            polarity,
        })
    }

    /// The titles of the axes of the two-dimensional plot.
    pub fn axis_titles(&self) -> NResult<(String, String)> {
        match &self.axis_titles {
            None => Ok(("Dimension 1".to_string(), "Dimension 2".to_string())),
            Some(titles) if titles.len() == 2 => Ok((titles[0].clone(), titles[1].clone())),
            Some(titles) => InvalidConfigSnafu {
                reason: format!("axisTitles needs two titles, found {:?}", titles),
            }
            .fail(),
        }
    }

    fn min_votes_or_default(&self) -> usize {
        self.min_votes
            .unwrap_or(CorpusRules::DEFAULT_RULES.min_votes)
    }
}

pub fn read_config(path: &str) -> NResult<AnalysisConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: AnalysisConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(config)
}
