use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::{DiseaseInfo, FeedbackData, KnowledgeSource, PatientData, PredictionResult, RemoteInfo, RiskLevel};

use crate::storage::CompressedImage;

pub const DIAGNOSIS_RECORD: &str = "diagnosis";
pub const FEEDBACK_RECORD: &str = "user_feedback";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    #[serde(flatten)]
    pub patient: PatientData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_image: Option<CompressedImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosisResults {
    pub diagnosis_timestamp: String,
    pub predicted_condition: String,
    pub confidence_score: f32,
    pub analysis_time_seconds: f64,
    pub all_predictions: Vec<f32>,
    pub risk_level: RiskLevel,
}

impl DiagnosisResults {
    pub fn from_prediction(prediction: &PredictionResult, analysis_time_seconds: f64) -> Self {
        Self {
            diagnosis_timestamp: Utc::now().to_rfc3339(),
            predicted_condition: prediction.predicted_class.clone(),
            confidence_score: prediction.confidence_score,
            analysis_time_seconds: (analysis_time_seconds * 100.0).round() / 100.0,
            all_predictions: prediction.all_class_scores.clone(),
            risk_level: prediction.risk_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    pub knowledge_source: KnowledgeSource,
    pub disease_info: DiseaseInfo,
    pub remote_info: RemoteInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosisRecord {
    pub record_type: String,
    pub patient_data: PatientRecord,
    pub diagnosis_results: DiagnosisResults,
    pub report: ReportSummary,
    pub created_at: String,
}

impl DiagnosisRecord {
    pub fn new(patient_data: PatientRecord, diagnosis_results: DiagnosisResults, report: ReportSummary) -> Self {
        Self {
            record_type: DIAGNOSIS_RECORD.to_string(),
            patient_data,
            diagnosis_results,
            report,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Feedback saved on its own when it cannot be merged into a diagnosis record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandaloneFeedbackRecord {
    pub record_type: String,
    pub feedback_data: FeedbackData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_record_id: Option<String>,
    pub created_at: String,
}

impl StandaloneFeedbackRecord {
    pub fn new(feedback_data: FeedbackData, original_record_id: Option<String>) -> Self {
        Self {
            record_type: FEEDBACK_RECORD.to_string(),
            feedback_data,
            original_record_id,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}
