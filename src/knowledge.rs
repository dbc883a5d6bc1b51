//! Static clinical knowledge: candidate diseases and their care roadmaps.
//!
//! Both tables are immutable once built. `KnowledgeBase::builtin()` is
//! called once at startup and shared read-only behind an `Arc`.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════
// Types
// ═══════════════════════════════════════════

/// A risk factor listed on a disease record.
///
/// Only `AgeOver` and `Sex` influence scoring; `Condition` is informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskFactor {
    AgeOver(i64),
    Sex(String),
    Condition(String),
}

/// One candidate disease with its symptom profile.
#[derive(Debug, Clone)]
pub struct DiseaseProfile {
    pub name: String,
    /// Lowercase symptom phrases matched against patient input.
    pub symptoms: Vec<String>,
    pub base_prior: f64,
    pub risk_factors: Vec<RiskFactor>,
    pub explanation: String,
    pub suggested_tests: Vec<String>,
}

/// Static care plan for a diagnosis.
///
/// Empty lists are omitted on the wire, so `CareRoadmap::default()`
/// serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareRoadmap {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medication: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lifestyle: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diet: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monitoring: Vec<String>,
}

impl CareRoadmap {
    pub fn is_empty(&self) -> bool {
        self.medication.is_empty()
            && self.lifestyle.is_empty()
            && self.diet.is_empty()
            && self.monitoring.is_empty()
    }
}

/// Disease records plus the roadmap table, in a fixed order.
///
/// Order is significant: scoring sums and tie-breaks follow it.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    diseases: Vec<DiseaseProfile>,
    roadmaps: Vec<(String, CareRoadmap)>,
}

impl KnowledgeBase {
    pub fn new(diseases: Vec<DiseaseProfile>, roadmaps: Vec<(String, CareRoadmap)>) -> Self {
        Self { diseases, roadmaps }
    }

    pub fn diseases(&self) -> &[DiseaseProfile] {
        &self.diseases
    }

    /// Exact, case-sensitive roadmap lookup.
    pub fn roadmap(&self, disease: &str) -> Option<&CareRoadmap> {
        self.roadmaps
            .iter()
            .find(|(name, _)| name == disease)
            .map(|(_, roadmap)| roadmap)
    }

    /// The five-disease table shipped with the application.
    pub fn builtin() -> Self {
        let diseases = vec![
            disease(
                "GERD",
                &["heartburn", "acid reflux", "chest pain", "regurgitation", "difficulty swallowing"],
                0.1,
                vec![condition("obesity"), condition("smoking")],
                "Gastroesophageal Reflux Disease (GERD) is suggested by burning sensation in the chest and regurgitation.",
                &["Upper Endoscopy", "Esophageal pH monitoring"],
            ),
            disease(
                "Angina",
                &["chest pain", "shortness of breath", "nausea", "fatigue", "dizziness"],
                0.05,
                vec![
                    RiskFactor::AgeOver(45),
                    condition("hypertension"),
                    condition("high cholesterol"),
                ],
                "Symptoms overlap with cardiac issues. Chest pain combined with shortage of breath warrants investigation for Angina.",
                &["ECG", "Stress Test", "Coronary Angiography"],
            ),
            disease(
                "Common Cold",
                &["runny nose", "sore throat", "cough", "sneezing", "mild fever"],
                0.2,
                vec![],
                "Classic viral upper respiratory symptoms.",
                &["Physical Exam", "Rapid Strep Test (to rule out strep)"],
            ),
            disease(
                "Migraine",
                &["headache", "nausea", "sensitivity to light", "sensitivity to sound", "throbbing"],
                0.1,
                vec![condition("family history"), RiskFactor::Sex("female".into())],
                "Unilateral throbbing headache with sensory sensitivity is characteristic of Migraine.",
                &["MRI (to rule out others)", "Neurological Exam"],
            ),
            disease(
                "Type 2 Diabetes (Early Warning)",
                &["excessive thirst", "frequent urination", "hunger", "fatigue", "blurred vision"],
                0.05,
                vec![condition("obesity"), RiskFactor::AgeOver(45), condition("sedentary")],
                "Polydipsia (thirst) and polyuria (urination) are hallmark signs of high blood sugar.",
                &["HbA1c", "Fasting Plasma Glucose"],
            ),
        ];

        let roadmaps = vec![
            roadmap(
                "GERD",
                &["Antacids", "H2 blockers", "Proton pump inhibitors (PPIs)"],
                &["Avoid trigger foods (spicy, fatty)", "Eat smaller meals", "Wait 3 hours before lying down"],
                &["Low-acid foods", "Lean proteins", "Vegetables"],
                &["Monitor frequency of heartburn", "Watch for difficulty swallowing"],
            ),
            roadmap(
                "Angina",
                &["Nitrates", "Aspirin", "Beta-blockers", "Statins"],
                &["Stop smoking", "Stress management", "Cardiac rehabilitation"],
                &["Heart-healthy diet (low saturated fat, low sodium)"],
                &["Blood pressure reading", "Lipid profile check"],
            ),
            roadmap(
                "Common Cold",
                &["Pain relievers", "Decongestants", "Cough suppressants"],
                &["Rest", "Hydration"],
                &["Warm fluids", "Soup"],
                &["Monitor fever temperature", "Watch for worsening breath"],
            ),
            roadmap(
                "Migraine",
                &["Pain relief", "Triptans", "Anti-nausea meds"],
                &["Sleep hygiene", "Stress management", "Identify triggers"],
                &["Magnesium-rich foods", "Hydration"],
                &["Headache diary"],
            ),
            roadmap(
                "Type 2 Diabetes (Early Warning)",
                &["Metformin (if prescribed)", "Insulin (if advanced)"],
                &["Weight loss", "Regular exercise (150 mins/week)"],
                &["Low glycemic index foods", "Portion control"],
                &["Daily blood sugar monitoring", "Foot checks"],
            ),
        ];

        Self::new(diseases, roadmaps)
    }
}

// ═══════════════════════════════════════════
// Table builders
// ═══════════════════════════════════════════

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn condition(name: &str) -> RiskFactor {
    RiskFactor::Condition(name.to_string())
}

fn disease(
    name: &str,
    symptoms: &[&str],
    base_prior: f64,
    risk_factors: Vec<RiskFactor>,
    explanation: &str,
    suggested_tests: &[&str],
) -> DiseaseProfile {
    DiseaseProfile {
        name: name.to_string(),
        symptoms: strings(symptoms),
        base_prior,
        risk_factors,
        explanation: explanation.to_string(),
        suggested_tests: strings(suggested_tests),
    }
}

fn roadmap(
    name: &str,
    medication: &[&str],
    lifestyle: &[&str],
    diet: &[&str],
    monitoring: &[&str],
) -> (String, CareRoadmap) {
    (
        name.to_string(),
        CareRoadmap {
            medication: strings(medication),
            lifestyle: strings(lifestyle),
            diet: strings(diet),
            monitoring: strings(monitoring),
        },
    )
}
