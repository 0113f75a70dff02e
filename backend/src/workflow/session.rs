use serde::{Deserialize, Serialize};
use shared::{KnowledgeLookup, PatientData, PredictionResult, RankedPrediction, RemoteInfo, RiskLevel};
use strum::Display;
use uuid::Uuid;

use crate::db::{FeedbackUpdate, SaveReceipt};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionStage {
    #[default]
    Idle,
    Submitted,
    Analyzing,
    Predicted,
    ReportRequested,
    Enriched,
    FeedbackOffered,
    FeedbackSubmitted,
}

impl SessionStage {
    pub fn can_request_report(self) -> bool {
        matches!(
            self,
            SessionStage::Predicted
                | SessionStage::Enriched
                | SessionStage::FeedbackOffered
                | SessionStage::FeedbackSubmitted
        )
    }

    pub fn accepts_feedback(self) -> bool {
        matches!(self, SessionStage::Enriched | SessionStage::FeedbackOffered)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedReport {
    pub knowledge: KnowledgeLookup,
    pub remote_info: RemoteInfo,
    pub top_predictions: Vec<RankedPrediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedbackReceipt {
    Merged(FeedbackUpdate),
    Standalone(SaveReceipt),
}

/// Everything one user interaction has produced so far. Owned by the caller
/// and handed to the workflow by `&mut` for each transition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosisSession {
    pub id: String,
    pub stage: SessionStage,
    pub patient: Option<PatientData>,
    #[serde(skip)]
    pub image: Option<Vec<u8>>,
    pub image_hash: Option<String>,
    pub prediction: Option<PredictionResult>,
    pub risk_level: Option<RiskLevel>,
    pub analysis_time_seconds: Option<f64>,
    pub report: Option<EnrichedReport>,
    pub save_receipt: Option<SaveReceipt>,
    pub record_id: Option<String>,
    pub show_feedback_form: bool,
    pub feedback_submitted: bool,
    pub feedback_receipt: Option<FeedbackReceipt>,
    pub warnings: Vec<String>,
}

impl DiagnosisSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ..Self::default()
        }
    }

    /// Drops everything derived from a previous submission, keeping the id.
    pub fn reset(&mut self) {
        *self = Self {
            id: std::mem::take(&mut self.id),
            ..Self::default()
        };
    }
}
