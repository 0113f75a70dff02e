use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

// The first variant of every rating is the form's "nothing chosen yet" value.

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum PredictionAccuracy {
    #[default]
    #[serde(rename = "Select Rating")]
    #[strum(serialize = "Select Rating")]
    Unselected,
    #[serde(rename = "Very Accurate")]
    #[strum(serialize = "Very Accurate")]
    VeryAccurate,
    #[serde(rename = "Mostly Accurate")]
    #[strum(serialize = "Mostly Accurate")]
    MostlyAccurate,
    #[serde(rename = "Somewhat Accurate")]
    #[strum(serialize = "Somewhat Accurate")]
    SomewhatAccurate,
    #[serde(rename = "Not Accurate")]
    #[strum(serialize = "Not Accurate")]
    NotAccurate,
    #[serde(rename = "Completely Wrong")]
    #[strum(serialize = "Completely Wrong")]
    CompletelyWrong,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum ConfidenceLevel {
    #[default]
    #[serde(rename = "Select Level")]
    #[strum(serialize = "Select Level")]
    Unselected,
    #[serde(rename = "Very Confident")]
    #[strum(serialize = "Very Confident")]
    VeryConfident,
    Confident,
    Neutral,
    #[serde(rename = "Not Confident")]
    #[strum(serialize = "Not Confident")]
    NotConfident,
    #[serde(rename = "No Confidence")]
    #[strum(serialize = "No Confidence")]
    NoConfidence,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum ReportUsefulness {
    #[default]
    #[serde(rename = "Select Rating")]
    #[strum(serialize = "Select Rating")]
    Unselected,
    #[serde(rename = "Extremely Useful")]
    #[strum(serialize = "Extremely Useful")]
    ExtremelyUseful,
    #[serde(rename = "Very Useful")]
    #[strum(serialize = "Very Useful")]
    VeryUseful,
    #[serde(rename = "Moderately Useful")]
    #[strum(serialize = "Moderately Useful")]
    ModeratelyUseful,
    #[serde(rename = "Slightly Useful")]
    #[strum(serialize = "Slightly Useful")]
    SlightlyUseful,
    #[serde(rename = "Not Useful")]
    #[strum(serialize = "Not Useful")]
    NotUseful,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum Recommendation {
    #[default]
    #[serde(rename = "Select Option")]
    #[strum(serialize = "Select Option")]
    Unselected,
    #[serde(rename = "Definitely Yes")]
    #[strum(serialize = "Definitely Yes")]
    DefinitelyYes,
    #[serde(rename = "Probably Yes")]
    #[strum(serialize = "Probably Yes")]
    ProbablyYes,
    Maybe,
    #[serde(rename = "Probably No")]
    #[strum(serialize = "Probably No")]
    ProbablyNo,
    #[serde(rename = "Definitely No")]
    #[strum(serialize = "Definitely No")]
    DefinitelyNo,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct FeedbackData {
    #[serde(default)]
    pub prediction_accuracy: PredictionAccuracy,
    #[serde(default)]
    pub confidence: ConfidenceLevel,
    #[serde(default)]
    pub report_usefulness: ReportUsefulness,
    #[serde(default)]
    pub recommendation: Recommendation,
    #[serde(default)]
    pub additional_comments: String,
}

impl FeedbackData {
    /// Names of the rating fields still at their placeholder value.
    pub fn missing_ratings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.prediction_accuracy == PredictionAccuracy::Unselected {
            missing.push("prediction_accuracy");
        }
        if self.confidence == ConfidenceLevel::Unselected {
            missing.push("confidence");
        }
        if self.report_usefulness == ReportUsefulness::Unselected {
            missing.push("report_usefulness");
        }
        if self.recommendation == Recommendation::Unselected {
            missing.push("recommendation");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_ratings().is_empty()
    }
}
