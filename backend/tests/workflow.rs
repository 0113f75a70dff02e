mod common;

use backend::db::{MemoryStore, PersistenceError};
use backend::workflow::{DiagnosisSession, FeedbackReceipt, SessionStage, WorkflowError};
use common::*;
use serde_json::json;
use shared::{
    ConfidenceLevel, FeedbackData, KnowledgeSource, PatientData, PredictionAccuracy, Recommendation,
    ReportUsefulness,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn complete_feedback() -> FeedbackData {
    FeedbackData {
        prediction_accuracy: PredictionAccuracy::MostlyAccurate,
        confidence: ConfidenceLevel::Confident,
        report_usefulness: ReportUsefulness::VeryUseful,
        recommendation: Recommendation::ProbablyYes,
        additional_comments: "Clear report".to_string(),
    }
}

#[tokio::test]
async fn black_image_flows_through_to_a_persisted_ringworm_record() {
    let store = Arc::new(MemoryStore::new());
    let workflow = ringworm_workflow(store.clone());
    let mut session = DiagnosisSession::new();

    workflow
        .submit(&mut session, PatientData::new("Test Patient"), black_png(50, 50))
        .unwrap();
    assert_eq!(session.stage, SessionStage::Submitted);

    let prediction = workflow.analyze(&mut session).unwrap();
    assert_eq!(prediction.predicted_class, "FU-ringworm");
    assert_eq!(prediction.confidence_score, 0.7);
    assert!(prediction.error.is_none());
    assert_eq!(session.stage, SessionStage::Predicted);

    let report = workflow.request_report(&mut session).await.unwrap();
    assert_eq!(report.knowledge.source, KnowledgeSource::MedicalKnowledgeBase);
    assert!(!report.knowledge.is_generic());
    assert_eq!(report.top_predictions[0].class_name, "FU-ringworm");
    assert!(report.remote_info.error_message().is_some());

    assert_eq!(session.stage, SessionStage::FeedbackOffered);
    assert!(session.show_feedback_form);
    assert!(!session.warnings.is_empty());

    let record_id = session.record_id.clone().expect("record should be persisted");
    let records = store.all(COLLECTION).await;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["id"], json!(record_id));
    assert_eq!(record["record_type"], "diagnosis");
    assert_eq!(record["diagnosis_results"]["predicted_condition"], "FU-ringworm");
    assert_eq!(record["diagnosis_results"]["risk_level"], "Low");
    assert_eq!(record["patient_data"]["name"], "Test Patient");
    assert_eq!(record["patient_data"]["compressed_image"]["dimensions"], json!([50, 50]));
    assert_eq!(record["report"]["knowledge_source"], "medical_knowledge_base");
}

#[tokio::test]
async fn feedback_is_merged_into_the_diagnosis_record() {
    let store = Arc::new(MemoryStore::new());
    let workflow = ringworm_workflow(store.clone());
    let mut session = DiagnosisSession::new();
    workflow
        .submit(&mut session, PatientData::new("Test Patient"), black_png(50, 50))
        .unwrap();
    workflow.analyze(&mut session).unwrap();
    workflow.request_report(&mut session).await.unwrap();

    let receipt = workflow
        .submit_feedback(&mut session, complete_feedback())
        .await
        .unwrap();
    assert!(matches!(receipt, FeedbackReceipt::Merged(update) if update.modified_count == 1));
    assert_eq!(session.stage, SessionStage::FeedbackSubmitted);
    assert!(session.feedback_submitted);

    let records = store.all(COLLECTION).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["user_feedback"]["recommendation"], "Probably Yes");

    let again = workflow.submit_feedback(&mut session, complete_feedback()).await;
    assert!(matches!(again, Err(WorkflowError::InvalidTransition { .. })));
}

#[tokio::test]
async fn identical_feedback_twice_reports_no_modification() {
    let store = Arc::new(MemoryStore::new());
    let workflow = ringworm_workflow(store.clone());
    let mut session = DiagnosisSession::new();
    workflow
        .submit(&mut session, PatientData::new("Test Patient"), black_png(50, 50))
        .unwrap();
    workflow.analyze(&mut session).unwrap();
    workflow.request_report(&mut session).await.unwrap();
    let record_id = session.record_id.clone().unwrap();

    let gateway = workflow.persistence();
    let first = gateway
        .update_with_feedback(&record_id, &complete_feedback())
        .await
        .unwrap();
    let second = gateway
        .update_with_feedback(&record_id, &complete_feedback())
        .await
        .unwrap();
    assert!(first.modified_count > 0);
    assert_eq!(second.modified_count, 0);
}

#[tokio::test]
async fn incomplete_feedback_is_rejected_without_advancing() {
    let store = Arc::new(MemoryStore::new());
    let workflow = ringworm_workflow(store.clone());
    let mut session = DiagnosisSession::new();
    workflow
        .submit(&mut session, PatientData::new("Test Patient"), black_png(50, 50))
        .unwrap();
    workflow.analyze(&mut session).unwrap();
    workflow.request_report(&mut session).await.unwrap();

    let mut feedback = complete_feedback();
    feedback.recommendation = Recommendation::Unselected;
    let result = workflow.submit_feedback(&mut session, feedback).await;
    assert!(matches!(result, Err(WorkflowError::Validation(msg)) if msg.contains("recommendation")));
    assert_eq!(session.stage, SessionStage::FeedbackOffered);
}

#[tokio::test]
async fn failed_merge_falls_back_to_standalone_feedback() {
    let store = Arc::new(ForgetfulStore::default());
    let workflow = workflow(
        model_with(FixedClassifier(RINGWORM_SCORES.to_vec())),
        gateway(Some(store.clone())),
    );
    let mut session = DiagnosisSession::new();
    workflow
        .submit(&mut session, PatientData::new("Test Patient"), black_png(50, 50))
        .unwrap();
    workflow.analyze(&mut session).unwrap();
    workflow.request_report(&mut session).await.unwrap();
    let record_id = session.record_id.clone().unwrap();

    let receipt = workflow
        .submit_feedback(&mut session, complete_feedback())
        .await
        .unwrap();
    assert!(matches!(receipt, FeedbackReceipt::Standalone(save) if save.success));
    assert_eq!(store.failed_lookups.load(Ordering::SeqCst), 1);

    let records = store.inner.all(COLLECTION).await;
    assert_eq!(records.len(), 2);
    let standalone = records
        .iter()
        .find(|r| r["record_type"] == "user_feedback")
        .unwrap();
    assert_eq!(standalone["original_record_id"], json!(record_id));
    assert_eq!(standalone["feedback_data"]["prediction_accuracy"], "Mostly Accurate");
}

#[tokio::test]
async fn without_a_store_feedback_cannot_be_saved() {
    let workflow = workflow(model_with(FixedClassifier(RINGWORM_SCORES.to_vec())), gateway(None));
    let mut session = DiagnosisSession::new();
    workflow
        .submit(&mut session, PatientData::new("Test Patient"), black_png(50, 50))
        .unwrap();
    workflow.analyze(&mut session).unwrap();
    workflow.request_report(&mut session).await.unwrap();

    let receipt = session.save_receipt.as_ref().unwrap();
    assert!(!receipt.success);
    assert!(receipt.record_id.starts_with("local_save_"));
    assert!(session.record_id.is_none());

    let result = workflow.submit_feedback(&mut session, complete_feedback()).await;
    assert!(matches!(result, Err(WorkflowError::FeedbackNotSaved(_))));
    assert_eq!(session.stage, SessionStage::FeedbackOffered);
}

#[tokio::test]
async fn repeated_report_requests_persist_once() {
    let store = Arc::new(MemoryStore::new());
    let workflow = ringworm_workflow(store.clone());
    let mut session = DiagnosisSession::new();
    workflow
        .submit(&mut session, PatientData::new("Test Patient"), black_png(50, 50))
        .unwrap();
    workflow.analyze(&mut session).unwrap();
    workflow.request_report(&mut session).await.unwrap();
    let first_id = session.record_id.clone();
    workflow.request_report(&mut session).await.unwrap();

    assert_eq!(session.record_id, first_id);
    assert_eq!(store.count(COLLECTION).await, 1);
}

#[tokio::test]
async fn missing_name_or_image_keeps_session_idle() {
    let workflow = ringworm_workflow(Arc::new(MemoryStore::new()));
    let mut session = DiagnosisSession::new();

    let no_name = workflow.submit(&mut session, PatientData::new("   "), black_png(50, 50));
    assert!(matches!(no_name, Err(WorkflowError::Validation(_))));
    assert_eq!(session.stage, SessionStage::Idle);

    let no_image = workflow.submit(&mut session, PatientData::new("Test Patient"), Vec::new());
    assert!(matches!(no_image, Err(WorkflowError::Validation(_))));
    assert_eq!(session.stage, SessionStage::Idle);

    assert!(matches!(
        workflow.analyze(&mut session),
        Err(WorkflowError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn resubmission_starts_a_fresh_diagnosis() {
    let store = Arc::new(MemoryStore::new());
    let workflow = ringworm_workflow(store.clone());
    let mut session = DiagnosisSession::new();
    workflow
        .submit(&mut session, PatientData::new("Test Patient"), black_png(50, 50))
        .unwrap();
    workflow.analyze(&mut session).unwrap();
    workflow.request_report(&mut session).await.unwrap();
    workflow
        .submit_feedback(&mut session, complete_feedback())
        .await
        .unwrap();

    workflow
        .submit(&mut session, PatientData::new("Second Patient"), black_png(60, 60))
        .unwrap();
    assert_eq!(session.stage, SessionStage::Submitted);
    assert!(session.record_id.is_none());
    assert!(session.prediction.is_none());
    assert!(!session.feedback_submitted);
}

#[tokio::test]
async fn failed_predictions_cannot_be_reported() {
    let workflow = workflow(model_with(BrokenClassifier), gateway(Some(Arc::new(MemoryStore::new()))));
    let mut session = DiagnosisSession::new();
    workflow
        .submit(&mut session, PatientData::new("Test Patient"), black_png(50, 50))
        .unwrap();

    let prediction = workflow.analyze(&mut session).unwrap();
    assert_eq!(prediction.predicted_class, "Unknown");
    assert!(prediction.error.is_some());
    assert_eq!(session.stage, SessionStage::Predicted);

    let report = workflow.request_report(&mut session).await;
    assert!(matches!(report, Err(WorkflowError::Validation(_))));
    assert_eq!(session.stage, SessionStage::Predicted);
}

#[tokio::test]
async fn undecodable_images_still_reach_predicted() {
    let workflow = ringworm_workflow(Arc::new(MemoryStore::new()));
    let mut session = DiagnosisSession::new();
    workflow
        .submit(&mut session, PatientData::new("Test Patient"), b"not an image".to_vec())
        .unwrap();

    let prediction = workflow.analyze(&mut session).unwrap();
    assert!(prediction.is_error());
    assert_eq!(session.stage, SessionStage::Predicted);
}

#[tokio::test]
async fn save_without_results_never_reaches_the_store() {
    let store = Arc::new(MemoryStore::new());
    let gateway = gateway(Some(store.clone()));
    let document = json!({"record_type": "diagnosis", "patient_data": {"name": "Test Patient"}})
        .as_object()
        .cloned()
        .unwrap();

    let result = gateway.save(document).await;
    assert!(matches!(result, Err(PersistenceError::Validation("diagnosis_results"))));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn image_bytes_are_released_once_persisted() {
    let store = Arc::new(MemoryStore::new());
    let workflow = ringworm_workflow(store.clone());
    let mut session = DiagnosisSession::new();
    workflow
        .submit(&mut session, PatientData::new("Test Patient"), black_png(50, 50))
        .unwrap();
    workflow.analyze(&mut session).unwrap();
    assert!(session.image.is_some());

    workflow.request_report(&mut session).await.unwrap();
    assert!(session.record_id.is_some());
    assert!(session.image.is_none());
    assert!(session.image_hash.is_some());

    workflow.request_report(&mut session).await.unwrap();
    assert_eq!(store.count(COLLECTION).await, 1);
}

#[tokio::test]
async fn unsaved_diagnosis_keeps_image_until_feedback() {
    let offline = workflow(model_with(FixedClassifier(RINGWORM_SCORES.to_vec())), gateway(None));
    let online = workflow(
        model_with(FixedClassifier(RINGWORM_SCORES.to_vec())),
        gateway(Some(Arc::new(ForgetfulStore::default()))),
    );
    let mut session = DiagnosisSession::new();
    offline
        .submit(&mut session, PatientData::new("Test Patient"), black_png(50, 50))
        .unwrap();
    offline.analyze(&mut session).unwrap();
    offline.request_report(&mut session).await.unwrap();
    assert!(session.record_id.is_none());
    assert!(session.image.is_some());

    online
        .submit_feedback(&mut session, complete_feedback())
        .await
        .unwrap();
    assert!(session.image.is_none());
}
