use shared::{PcosInput, PcosOutput};
use std::path::Path;
use tract_onnx::prelude::*;

pub const POSITIVE: &str = "PCOS Detected";
pub const NEGATIVE: &str = "No PCOS";

#[derive(Debug, thiserror::Error)]
pub enum RiskModelError {
    #[error("Failed to load model from {path}: {reason}")]
    Load { path: String, reason: String },
    #[error("Model error: {0}")]
    Inference(String),
    #[error("Malformed model output: {0}")]
    MalformedOutput(String),
}

/// Two-class tabular classifier: returns `[p(no PCOS), p(PCOS)]`.
pub trait RiskModel: Send + Sync {
    fn predict_proba(&self, features: [f32; 5]) -> Result<Vec<f32>, RiskModelError>;
}

pub struct OnnxRiskModel {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
}

impl OnnxRiskModel {
    pub fn load(model_path: &Path) -> Result<Self, RiskModelError> {
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| RiskModelError::Load {
                path: model_path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { model })
    }
}

impl RiskModel for OnnxRiskModel {
    fn predict_proba(&self, features: [f32; 5]) -> Result<Vec<f32>, RiskModelError> {
        let input = Tensor::from_shape(&[1, features.len()], &features)
            .map_err(|e| RiskModelError::Inference(e.to_string()))?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| RiskModelError::Inference(e.to_string()))?;

        // Exported classifiers emit the label first and the probabilities
        // after it; take the first float output.
        let probabilities = outputs
            .iter()
            .find(|t| t.datum_type() == f32::datum_type())
            .ok_or_else(|| RiskModelError::MalformedOutput("no probability output".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| RiskModelError::MalformedOutput(e.to_string()))?
            .iter()
            .copied()
            .collect();
        Ok(probabilities)
    }
}

pub fn assess(model: &dyn RiskModel, input: &PcosInput) -> Result<PcosOutput, RiskModelError> {
    let probabilities = model.predict_proba(input.features())?;
    classify(&probabilities)
}

/// Arg-max over the two class probabilities, confidence rounded to 2 places.
pub fn classify(probabilities: &[f32]) -> Result<PcosOutput, RiskModelError> {
    if probabilities.len() != 2 {
        return Err(RiskModelError::MalformedOutput(format!(
            "expected 2 class probabilities, got {}",
            probabilities.len()
        )));
    }
    if probabilities.iter().any(|p| p.is_nan()) {
        return Err(RiskModelError::MalformedOutput("NaN probability".to_string()));
    }

    let positive = probabilities[1] > probabilities[0];
    let confidence = if positive { probabilities[1] } else { probabilities[0] };
    Ok(PcosOutput {
        prediction: if positive { POSITIVE } else { NEGATIVE }.to_string(),
        confidence: (confidence * 100.0).round() / 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_positive_probability_detects_pcos() {
        let output = classify(&[0.126, 0.874]).unwrap();
        assert_eq!(output.prediction, POSITIVE);
        assert_eq!(output.confidence, 0.87);
    }

    #[test]
    fn negative_class_wins_ties() {
        let output = classify(&[0.5, 0.5]).unwrap();
        assert_eq!(output.prediction, NEGATIVE);
        assert_eq!(output.confidence, 0.5);
    }

    #[test]
    fn wrong_arity_is_malformed() {
        assert!(matches!(classify(&[1.0]), Err(RiskModelError::MalformedOutput(_))));
        assert!(matches!(classify(&[0.2, 0.3, 0.5]), Err(RiskModelError::MalformedOutput(_))));
        assert!(matches!(classify(&[f32::NAN, 0.3]), Err(RiskModelError::MalformedOutput(_))));
    }

    #[test]
    fn missing_model_file_fails_to_load() {
        let result = OnnxRiskModel::load(Path::new("/nonexistent/pcos_model.onnx"));
        assert!(matches!(result, Err(RiskModelError::Load { .. })));
    }
}
