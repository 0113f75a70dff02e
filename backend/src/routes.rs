use actix_multipart::Multipart;
use actix_web::{web, Error, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;
use shared::{FeedbackData, Gender, PatientData};
use std::io::Write;

use crate::knowledge;
use crate::workflow::{DiagnosisWorkflow, SessionRegistry, WorkflowError};

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(web::resource("/health").route(web::get().to(health)))
            .service(web::resource("/sessions").route(web::post().to(create_session)))
            .service(web::resource("/sessions/{session_id}").route(web::get().to(get_session)))
            .service(web::resource("/sessions/{session_id}/report").route(web::post().to(request_report)))
            .service(web::resource("/sessions/{session_id}/feedback").route(web::post().to(submit_feedback)))
            .service(web::resource("/knowledge/{name}").route(web::get().to(lookup_knowledge))),
    );
}

async fn health(workflow: web::Data<DiagnosisWorkflow>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "running",
        "service": "Skin Disease Diagnosis API",
        "version": env!("CARGO_PKG_VERSION"),
        "model_loaded": true,
        "classes": workflow.model().labels().len(),
        "persistence_configured": workflow.persistence().is_configured(),
    }))
}

async fn create_session(
    workflow: web::Data<DiagnosisWorkflow>,
    registry: web::Data<SessionRegistry>,
    payload: Multipart,
) -> Result<HttpResponse, Error> {
    let (patient, image) = match read_submission(payload).await? {
        Ok(submission) => submission,
        Err(message) => return Ok(HttpResponse::BadRequest().json(ErrorResponse::new(message))),
    };

    let (session_id, handle) = registry.create();
    let mut session = handle.lock().await;
    if let Err(e) = workflow.submit(&mut session, patient, image) {
        drop(session);
        registry.remove(&session_id);
        return Ok(workflow_error_response(&e));
    }
    if let Err(e) = workflow.analyze(&mut session) {
        return Ok(workflow_error_response(&e));
    }

    info!("Created diagnosis session {}", session_id);
    Ok(HttpResponse::Created().json(&*session))
}

async fn get_session(registry: web::Data<SessionRegistry>, path: web::Path<String>) -> HttpResponse {
    let session_id = path.into_inner();
    match registry.get(&session_id) {
        Some(handle) => HttpResponse::Ok().json(&*handle.lock().await),
        None => session_not_found(&session_id),
    }
}

async fn request_report(
    workflow: web::Data<DiagnosisWorkflow>,
    registry: web::Data<SessionRegistry>,
    path: web::Path<String>,
) -> HttpResponse {
    let session_id = path.into_inner();
    let Some(handle) = registry.get(&session_id) else {
        return session_not_found(&session_id);
    };

    let mut session = handle.lock().await;
    match workflow.request_report(&mut session).await {
        Ok(_) => HttpResponse::Ok().json(&*session),
        Err(e) => workflow_error_response(&e),
    }
}

async fn submit_feedback(
    workflow: web::Data<DiagnosisWorkflow>,
    registry: web::Data<SessionRegistry>,
    path: web::Path<String>,
    feedback: web::Json<FeedbackData>,
) -> HttpResponse {
    let session_id = path.into_inner();
    let Some(handle) = registry.get(&session_id) else {
        return session_not_found(&session_id);
    };

    let mut session = handle.lock().await;
    match workflow.submit_feedback(&mut session, feedback.into_inner()).await {
        Ok(_) => HttpResponse::Ok().json(&*session),
        Err(e) => workflow_error_response(&e),
    }
}

async fn lookup_knowledge(path: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(knowledge::lookup(&path.into_inner()))
}

fn session_not_found(session_id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(format!("Session {} not found", session_id)))
}

pub fn workflow_error_response(e: &WorkflowError) -> HttpResponse {
    let body = ErrorResponse::new(e.to_string());
    match e {
        WorkflowError::Validation(_) => HttpResponse::BadRequest().json(body),
        WorkflowError::InvalidTransition { .. } => HttpResponse::Conflict().json(body),
        WorkflowError::FeedbackNotSaved(_) | WorkflowError::Persistence(_) => {
            error!("Persistence failure: {}", e);
            HttpResponse::BadGateway().json(body)
        }
    }
}

/// Collects the `image` file part and the patient text fields. The inner
/// `Err` is a user-facing validation message.
async fn read_submission(mut payload: Multipart) -> Result<Result<(PatientData, Vec<u8>), String>, Error> {
    let mut patient = PatientData::new("");
    let mut image_data = Vec::new();

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            data.write_all(&chunk)?;
        }

        if name == "image" {
            image_data = data;
            continue;
        }

        let Ok(value) = String::from_utf8(data) else {
            return Ok(Err(format!("Field '{}' is not valid UTF-8", name)));
        };
        if let Err(message) = apply_patient_field(&mut patient, &name, value) {
            return Ok(Err(message));
        }
    }

    Ok(Ok((patient, image_data)))
}

fn apply_patient_field(patient: &mut PatientData, name: &str, value: String) -> Result<(), String> {
    match name {
        "name" => patient.name = value,
        "age" => {
            patient.age = value
                .trim()
                .parse()
                .map_err(|_| format!("Invalid age: {}", value.trim()))?
        }
        "gender" => {
            patient.gender = value
                .trim()
                .parse::<Gender>()
                .map_err(|_| format!("Invalid gender: {}", value.trim()))?
        }
        "email" => patient.email = value,
        "medical_history" => patient.medical_history = value,
        "skin_type" => patient.skin_type = value,
        "sun_exposure" => patient.sun_exposure = value,
        "family_history_skin" => patient.family_history_skin = value,
        "previous_skin_issues" => patient.previous_skin_issues = value,
        "current_symptoms" => patient.current_symptoms = value,
        "lesion_location" => patient.lesion_location = value,
        other => warn!("Ignoring unknown form field '{}'", other),
    }
    Ok(())
}
