pub mod catalog;

use lazy_static::lazy_static;
use shared::{DiseaseInfo, KnowledgeLookup, KnowledgeSource};
use std::collections::HashMap;

use catalog::{DiseaseEntry, CATALOG, GENERIC_COMPLICATIONS, GENERIC_PREVENTION};

lazy_static! {
    static ref BY_NAME: HashMap<String, &'static DiseaseEntry> = CATALOG
        .iter()
        .map(|entry| (entry.disease.to_lowercase(), entry))
        .collect();
}

/// Class names the classifier is trained on, in output order.
pub fn known_classes() -> Vec<&'static str> {
    CATALOG.iter().map(|entry| entry.disease).collect()
}

/// Exact, case-insensitive lookup. Unknown names get a generic entry with the
/// same shape, so this never fails.
pub fn lookup(class_name: &str) -> KnowledgeLookup {
    let clean_name = class_name.trim();
    log::info!("Looking up information for class name: {}", clean_name);

    match BY_NAME.get(&clean_name.to_lowercase()) {
        Some(entry) => {
            log::info!("Found exact match for disease: {}", entry.disease);
            KnowledgeLookup {
                success: true,
                source: KnowledgeSource::MedicalKnowledgeBase,
                info: to_info(entry),
            }
        }
        None => {
            log::warn!(
                "No specific information found for disease: {}. Providing general advice.",
                clean_name
            );
            KnowledgeLookup {
                success: true,
                source: KnowledgeSource::GeneralMedicalKnowledge,
                info: generic_info(clean_name),
            }
        }
    }
}

fn to_info(entry: &DiseaseEntry) -> DiseaseInfo {
    DiseaseInfo {
        disease_name: entry.disease.to_string(),
        description: entry.description.to_string(),
        mechanism: entry.mechanism.to_string(),
        transmission: entry.transmission.to_string(),
        prevention: to_owned(entry.prevention),
        complications: to_owned(entry.complications),
    }
}

fn generic_info(name: &str) -> DiseaseInfo {
    DiseaseInfo {
        disease_name: name.to_string(),
        description: format!(
            "Skin condition detected: {}. This appears to be a dermatological condition that requires professional evaluation.",
            name
        ),
        mechanism: "The exact mechanism of this condition may vary. Consult with a dermatologist for detailed information.".to_string(),
        transmission: "Transmission characteristics unknown. Follow general hygiene practices and avoid direct contact until evaluated by a healthcare provider.".to_string(),
        prevention: to_owned(GENERIC_PREVENTION),
        complications: to_owned(GENERIC_COMPLICATIONS),
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
