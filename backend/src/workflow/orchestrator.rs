use shared::{FeedbackData, PatientData, PredictionResult};
use std::sync::Arc;
use std::time::Instant;

use crate::cache::TensorCache;
use crate::db::{
    DiagnosisRecord, DiagnosisResults, PatientRecord, PersistenceError, PersistenceGateway, ReportSummary,
    StandaloneFeedbackRecord,
};
use crate::inference::{predict, top_predictions, LoadedModel};
use crate::knowledge;
use crate::remote::MedicationService;
use crate::storage::{compress_for_storage, validate_image_size};
use crate::workflow::session::{DiagnosisSession, EnrichedReport, FeedbackReceipt, SessionStage};

const TOP_K: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),
    #[error("Cannot {action} while session is {stage}")]
    InvalidTransition { stage: SessionStage, action: &'static str },
    #[error("Feedback could not be saved: {0}")]
    FeedbackNotSaved(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Drives one session through preprocess, predict, enrich, persist and
/// feedback. Holds only shared, read-mostly services; all per-user state
/// lives in the `DiagnosisSession` passed to each call.
#[derive(Clone)]
pub struct DiagnosisWorkflow {
    model: Arc<LoadedModel>,
    tensors: Arc<TensorCache>,
    remote: MedicationService,
    persistence: PersistenceGateway,
}

impl DiagnosisWorkflow {
    pub fn new(
        model: Arc<LoadedModel>,
        tensors: Arc<TensorCache>,
        remote: MedicationService,
        persistence: PersistenceGateway,
    ) -> Self {
        Self {
            model,
            tensors,
            remote,
            persistence,
        }
    }

    pub fn model(&self) -> &LoadedModel {
        &self.model
    }

    pub fn persistence(&self) -> &PersistenceGateway {
        &self.persistence
    }

    /// Starts a fresh diagnosis. On a validation error the session is left
    /// untouched.
    pub fn submit(
        &self,
        session: &mut DiagnosisSession,
        patient: PatientData,
        image: Vec<u8>,
    ) -> Result<(), WorkflowError> {
        if !patient.has_name() {
            return Err(WorkflowError::Validation("Patient name is required".to_string()));
        }
        if image.is_empty() {
            return Err(WorkflowError::Validation("An image is required".to_string()));
        }
        if patient.age > shared::patient::MAX_AGE {
            return Err(WorkflowError::Validation(format!(
                "Age must be between 0 and {}",
                shared::patient::MAX_AGE
            )));
        }
        validate_image_size(&image).map_err(|e| WorkflowError::Validation(e.to_string()))?;

        session.reset();
        log::info!("Session {}: diagnosis submitted for {}", session.id, patient.name.trim());
        session.patient = Some(patient);
        session.image_hash = Some(crate::cache::calculate_image_hash(&image));
        session.image = Some(image);
        session.stage = SessionStage::Submitted;
        Ok(())
    }

    /// Always ends in `Predicted`; failures are carried in the prediction's
    /// `error` field.
    pub fn analyze<'s>(
        &self,
        session: &'s mut DiagnosisSession,
    ) -> Result<&'s PredictionResult, WorkflowError> {
        if session.stage != SessionStage::Submitted {
            return Err(WorkflowError::InvalidTransition {
                stage: session.stage,
                action: "analyze",
            });
        }
        let Some(image) = session.image.as_deref() else {
            return Err(WorkflowError::Validation("An image is required".to_string()));
        };

        session.stage = SessionStage::Analyzing;
        let start = Instant::now();
        let prediction = match self.tensors.get_or_preprocess(image) {
            Ok(tensor) => predict(&self.model, &tensor),
            Err(e) => {
                log::error!("Session {}: image preprocessing failed: {}", session.id, e);
                PredictionResult::failed(e.to_string())
            }
        };
        let elapsed = start.elapsed().as_secs_f64();

        log::info!(
            "Session {}: predicted {} ({:.3}) in {:.2}s",
            session.id,
            prediction.predicted_class,
            prediction.confidence_score,
            elapsed
        );
        session.risk_level = (!prediction.is_error()).then(|| prediction.risk_level());
        session.analysis_time_seconds = Some(elapsed);
        session.stage = SessionStage::Predicted;
        Ok(session.prediction.insert(prediction))
    }

    /// Enriches the prediction with local and remote information and
    /// persists the combined record once per diagnosis.
    pub async fn request_report<'s>(
        &self,
        session: &'s mut DiagnosisSession,
    ) -> Result<&'s EnrichedReport, WorkflowError> {
        if !session.stage.can_request_report() {
            return Err(WorkflowError::InvalidTransition {
                stage: session.stage,
                action: "request a report",
            });
        }
        let prediction = match &session.prediction {
            Some(p) if p.is_reportable() => p.clone(),
            _ => {
                return Err(WorkflowError::Validation(
                    "No valid prediction to generate a report for".to_string(),
                ));
            }
        };
        let patient = session
            .patient
            .clone()
            .ok_or_else(|| WorkflowError::Validation("Patient details are missing".to_string()))?;

        let resume_stage = session.stage;
        session.stage = SessionStage::ReportRequested;
        session.warnings.clear();

        let lookup = knowledge::lookup(&prediction.predicted_class);
        let remote_info = self.remote.fetch(&prediction.predicted_class).await;
        if let Some(reason) = remote_info.error_message() {
            log::warn!("Session {}: remote info unavailable: {}", session.id, reason);
            session
                .warnings
                .push("Could not fetch online database information. Using local data only.".to_string());
        }

        if session.record_id.is_none() {
            let compressed_image = session.image.as_deref().and_then(|bytes| match compress_for_storage(bytes) {
                Ok(compressed) => Some(compressed),
                Err(e) => {
                    log::error!("Error compressing image: {}", e);
                    None
                }
            });
            let record = DiagnosisRecord::new(
                PatientRecord {
                    patient,
                    compressed_image,
                },
                DiagnosisResults::from_prediction(&prediction, session.analysis_time_seconds.unwrap_or_default()),
                ReportSummary {
                    knowledge_source: lookup.source,
                    disease_info: lookup.info.clone(),
                    remote_info: remote_info.clone(),
                },
            );

            let receipt = match self.persistence.save_diagnosis(&record).await {
                Ok(receipt) => receipt,
                Err(e) => {
                    session.stage = resume_stage;
                    return Err(e.into());
                }
            };
            if !receipt.success {
                session.warnings.push(receipt.message.clone());
            }
            session.record_id = receipt.persisted_id().map(str::to_string);
            session.save_receipt = Some(receipt);
            if session.record_id.is_some() {
                session.image = None;
            }
        }

        let top = top_predictions(&prediction, self.model.labels(), TOP_K);
        if session.feedback_submitted {
            session.stage = SessionStage::FeedbackSubmitted;
        } else {
            session.show_feedback_form = true;
            session.stage = SessionStage::FeedbackOffered;
        }

        Ok(session.report.insert(EnrichedReport {
            knowledge: lookup,
            remote_info,
            top_predictions: top,
        }))
    }

    /// Merges feedback into the saved record, or stores it on its own when
    /// that is not possible.
    pub async fn submit_feedback<'s>(
        &self,
        session: &'s mut DiagnosisSession,
        feedback: FeedbackData,
    ) -> Result<&'s FeedbackReceipt, WorkflowError> {
        if !session.stage.accepts_feedback() {
            return Err(WorkflowError::InvalidTransition {
                stage: session.stage,
                action: "submit feedback",
            });
        }
        if !feedback.is_complete() {
            return Err(WorkflowError::Validation(format!(
                "Please select a value for: {}",
                feedback.missing_ratings().join(", ")
            )));
        }

        let merged = match session.record_id.as_deref() {
            Some(record_id) => match self.persistence.update_with_feedback(record_id, &feedback).await {
                Ok(update) => Some(update),
                Err(e) => {
                    log::error!("Failed to update record {} with feedback: {}", record_id, e);
                    None
                }
            },
            None => None,
        };

        let receipt = match merged {
            Some(update) => FeedbackReceipt::Merged(update),
            None => {
                log::info!("Session {}: saving feedback as new record", session.id);
                let record = StandaloneFeedbackRecord::new(feedback, session.record_id.clone());
                let receipt = self.persistence.save_feedback(&record).await?;
                if !receipt.success {
                    return Err(WorkflowError::FeedbackNotSaved(receipt.message));
                }
                FeedbackReceipt::Standalone(receipt)
            }
        };

        session.feedback_submitted = true;
        session.show_feedback_form = false;
        session.image = None;
        session.stage = SessionStage::FeedbackSubmitted;
        Ok(session.feedback_receipt.insert(receipt))
    }
}
