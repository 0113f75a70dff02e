use shared::{PredictionResult, RankedPrediction};

use crate::inference::model::LoadedModel;
use crate::inference::preprocess::ImageTensor;

/// Runs the model and picks the top class. Never fails: any problem is folded
/// into the "Unknown" sentinel so callers branch on `error`, not on `Err`.
pub fn predict(model: &LoadedModel, tensor: &ImageTensor) -> PredictionResult {
    log::info!("Making prediction initiated");
    let scores = match model.classify(tensor) {
        Ok(scores) => scores,
        Err(e) => {
            log::error!("Error in skin disease prediction: {}", e);
            return PredictionResult::failed(e.to_string());
        }
    };

    let result = match select_top(&scores, model.labels()) {
        Ok((label, confidence)) => PredictionResult {
            predicted_class: label,
            confidence_score: confidence,
            all_class_scores: scores,
            error: None,
        },
        Err(reason) => {
            log::error!("Error in skin disease prediction: {}", reason);
            PredictionResult::failed(reason)
        }
    };
    log::info!("Making prediction finished");
    result
}

fn select_top(scores: &[f32], labels: &[String]) -> Result<(String, f32), String> {
    if scores.is_empty() {
        return Err("Model returned an empty score vector".to_string());
    }
    if scores.len() != labels.len() {
        return Err(format!(
            "Model returned {} scores but {} labels are loaded",
            scores.len(),
            labels.len()
        ));
    }
    if scores.iter().any(|s| s.is_nan()) {
        return Err("Model returned NaN scores".to_string());
    }

    let (index, confidence) = argmax(scores).ok_or_else(|| "No maximal score".to_string())?;
    let label = labels
        .get(index)
        .cloned()
        .ok_or_else(|| format!("No label for class index {}", index))?;
    Ok((label, confidence))
}

/// First index holding the maximum value.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores.iter().copied().enumerate().fold(None, |best, (i, s)| match best {
        Some((_, b)) if b >= s => best,
        _ => Some((i, s)),
    })
}

/// The `k` most probable classes, most probable first.
pub fn top_predictions(result: &PredictionResult, labels: &[String], k: usize) -> Vec<RankedPrediction> {
    let mut ranked: Vec<(usize, f32)> = result.all_class_scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(k)
        .filter_map(|(i, p)| labels.get(i).map(|label| (label.clone(), p)))
        .enumerate()
        .map(|(rank, (class_name, probability))| RankedPrediction {
            rank: rank + 1,
            class_name,
            probability,
        })
        .collect()
}
