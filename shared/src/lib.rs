pub mod diagnosis;
pub mod feedback;
pub mod patient;
pub mod pcos;

pub use diagnosis::{
    DiseaseInfo, KnowledgeLookup, KnowledgeSource, MedicationEntry, MedicationResponse,
    PredictionResult, RankedPrediction, RemoteInfo, RiskLevel,
};
pub use feedback::{
    ConfidenceLevel, FeedbackData, PredictionAccuracy, Recommendation, ReportUsefulness,
};
pub use patient::{Gender, PatientData};
pub use pcos::{PcosInput, PcosOutput, ServiceStatus};
