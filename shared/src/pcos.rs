use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PcosInput {
    pub age: f32,
    pub bmi: f32,
    pub menstrual_irregularity: i32,
    pub testosterone_level: f32,
    pub antral_follicle_count: i32,
}

impl PcosInput {
    /// Feature vector in the column order the model was trained on.
    pub fn features(&self) -> [f32; 5] {
        [
            self.age,
            self.bmi,
            self.menstrual_irregularity as f32,
            self.testosterone_level,
            self.antral_follicle_count as f32,
        ]
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PcosOutput {
    pub prediction: String,
    pub confidence: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServiceStatus {
    pub status: String,
    pub service: String,
    pub version: String,
}
