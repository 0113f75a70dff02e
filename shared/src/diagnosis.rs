use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::Display;

pub const UNKNOWN_CLASS: &str = "Unknown";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionResult {
    pub predicted_class: String,
    pub confidence_score: f32,
    pub all_class_scores: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionResult {
    /// Sentinel returned whenever inference could not produce a usable score vector.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            predicted_class: UNKNOWN_CLASS.to_string(),
            confidence_score: 0.0,
            all_class_scores: Vec::new(),
            error: Some(reason.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_reportable(&self) -> bool {
        !self.is_error() && !self.predicted_class.is_empty() && self.predicted_class != UNKNOWN_CLASS
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_confidence(self.confidence_score)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence > 0.9 {
            RiskLevel::High
        } else if confidence > 0.7 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RankedPrediction {
    pub rank: usize,
    pub class_name: String,
    pub probability: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DiseaseInfo {
    pub disease_name: String,
    pub description: String,
    pub mechanism: String,
    pub transmission: String,
    pub prevention: Vec<String>,
    pub complications: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeSource {
    MedicalKnowledgeBase,
    GeneralMedicalKnowledge,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct KnowledgeLookup {
    pub success: bool,
    pub source: KnowledgeSource,
    #[serde(flatten)]
    pub info: DiseaseInfo,
}

impl KnowledgeLookup {
    pub fn is_generic(&self) -> bool {
        self.source == KnowledgeSource::GeneralMedicalKnowledge
    }
}

/// One prescribed medication from the remote info service.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MedicationEntry {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub drug_name: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub dosage: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub duration: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub route: String,
    #[serde(default, deserialize_with = "deserialize_yes_flag")]
    pub morning: bool,
    #[serde(default, deserialize_with = "deserialize_yes_flag")]
    pub afternoon: bool,
    #[serde(default, deserialize_with = "deserialize_yes_flag")]
    pub evening: bool,
}

// Numbers and booleans arrive unquoted from some formularies ("dosage": 500).
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

// The remote service marks a dose time with the literal string "Yes"; anything else means no.
fn deserialize_yes_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => s == "Yes",
        _ => false,
    })
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MedicationResponse {
    pub status: String,
    #[serde(default)]
    pub data: Vec<MedicationEntry>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Remote supplementary data for a class: the parsed body, or `{"error": reason}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum RemoteInfo {
    Found(MedicationResponse),
    Error { error: String },
}

impl RemoteInfo {
    pub fn error(reason: impl Into<String>) -> Self {
        RemoteInfo::Error {
            error: reason.into(),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RemoteInfo::Found(_) => None,
            RemoteInfo::Error { error } => Some(error),
        }
    }
}
