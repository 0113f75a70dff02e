use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum Gender {
    #[default]
    Select,
    Male,
    Female,
    Other,
}

/// Patient details captured alongside the lesion image.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PatientData {
    pub name: String,
    #[serde(default = "default_age")]
    pub age: u8,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub medical_history: String,
    #[serde(default)]
    pub skin_type: String,
    #[serde(default)]
    pub sun_exposure: String,
    #[serde(default)]
    pub family_history_skin: String,
    #[serde(default)]
    pub previous_skin_issues: String,
    #[serde(default)]
    pub current_symptoms: String,
    #[serde(default)]
    pub lesion_location: String,
}

pub const MAX_AGE: u8 = 150;

fn default_age() -> u8 {
    30
}

impl PatientData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: default_age(),
            gender: Gender::default(),
            email: String::new(),
            medical_history: String::new(),
            skin_type: String::new(),
            sun_exposure: String::new(),
            family_history_skin: String::new(),
            previous_skin_issues: String::new(),
            current_symptoms: String::new(),
            lesion_location: String::new(),
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}
