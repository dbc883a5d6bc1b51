//! Rule-based candidate ranking.
//!
//! Each disease starts at its base prior, gains a fixed bump per matched
//! record symptom and per applicable risk factor, and is then expressed as
//! a truncated integer share of the summed scores. Candidates at or below
//! the display threshold are dropped.

use serde::{Deserialize, Serialize};

use crate::knowledge::{KnowledgeBase, RiskFactor};

/// Added per record symptom matched by any input symptom.
pub const SYMPTOM_MATCH_BUMP: f64 = 0.15;

/// Added per applicable age or sex risk factor.
pub const RISK_FACTOR_BUMP: f64 = 0.1;

/// Candidates must score strictly above this percentage to be shown.
pub const DISPLAY_THRESHOLD: u32 = 5;

/// One ranked candidate, as returned by `/api/analyze` and stored on the visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisCandidate {
    pub name: String,
    pub probability: u32,
    pub explanation: String,
    pub suggested_tests: Vec<String>,
}

/// Trim and lowercase symptom input.
///
/// A blank entry normalizes to `""`, which is contained in every record
/// symptom and so matches all of them.
pub fn normalize_symptoms<S: AsRef<str>>(symptoms: &[S]) -> Vec<String> {
    symptoms
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .collect()
}

/// Bidirectional substring containment.
fn symptom_matches(record: &str, input: &str) -> bool {
    record.contains(input) || input.contains(record)
}

fn risk_factor_applies(factor: &RiskFactor, age: i64, sex: &str) -> bool {
    match factor {
        RiskFactor::AgeOver(threshold) => age > *threshold,
        RiskFactor::Sex(expected) => sex.to_lowercase() == expected.to_lowercase(),
        RiskFactor::Condition(_) => false,
    }
}

/// Raw (unnormalized) score for every disease, in knowledge-base order.
fn raw_scores(kb: &KnowledgeBase, symptoms: &[String], age: i64, sex: &str) -> Vec<f64> {
    kb.diseases()
        .iter()
        .map(|disease| {
            let mut score = disease.base_prior;

            for record_symptom in &disease.symptoms {
                if symptoms.iter().any(|s| symptom_matches(record_symptom, s)) {
                    score += SYMPTOM_MATCH_BUMP;
                }
            }

            // At most one bump per kind, however many factors of that kind exist.
            let age_applies = disease
                .risk_factors
                .iter()
                .any(|f| matches!(f, RiskFactor::AgeOver(_)) && risk_factor_applies(f, age, sex));
            let sex_applies = disease
                .risk_factors
                .iter()
                .any(|f| matches!(f, RiskFactor::Sex(_)) && risk_factor_applies(f, age, sex));
            if age_applies {
                score += RISK_FACTOR_BUMP;
            }
            if sex_applies {
                score += RISK_FACTOR_BUMP;
            }

            score
        })
        .collect()
}

/// Rank candidate diseases for the given symptoms, age, and sex.
///
/// Pure: reads only the knowledge base. Returns an empty list when every
/// raw score is zero.
pub fn score_symptoms<S: AsRef<str>>(
    kb: &KnowledgeBase,
    symptoms: &[S],
    age: i64,
    sex: &str,
) -> Vec<DiagnosisCandidate> {
    let symptoms = normalize_symptoms(symptoms);
    let scores = raw_scores(kb, &symptoms, age, sex);

    let total: f64 = scores.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut results: Vec<DiagnosisCandidate> = kb
        .diseases()
        .iter()
        .zip(scores)
        .filter_map(|(disease, score)| {
            let probability = ((score / total) * 100.0) as u32;
            (probability > DISPLAY_THRESHOLD).then(|| DiagnosisCandidate {
                name: disease.name.clone(),
                probability,
                explanation: disease.explanation.clone(),
                suggested_tests: disease.suggested_tests.clone(),
            })
        })
        .collect();

    // Stable: ties keep knowledge-base order.
    results.sort_by(|a, b| b.probability.cmp(&a.probability));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::DiseaseProfile;

    fn builtin() -> KnowledgeBase {
        KnowledgeBase::builtin()
    }

    fn probability_of(results: &[DiagnosisCandidate], name: &str) -> Option<u32> {
        results.iter().find(|r| r.name == name).map(|r| r.probability)
    }

    fn zero_prior_kb() -> KnowledgeBase {
        KnowledgeBase::new(
            vec![DiseaseProfile {
                name: "Nothing".into(),
                symptoms: vec!["itch".into()],
                base_prior: 0.0,
                risk_factors: vec![],
                explanation: String::new(),
                suggested_tests: vec![],
            }],
            vec![],
        )
    }

    #[test]
    fn cold_symptoms_rank_common_cold_first() {
        let results = score_symptoms(&builtin(), &["runny nose", "sore throat", "cough"], 0, "");
        assert_eq!(results[0].name, "Common Cold");
        assert_eq!(results[0].probability, 68);
    }

    #[test]
    fn cold_symptoms_drop_low_candidates() {
        let results = score_symptoms(&builtin(), &["runny nose", "sore throat", "cough"], 0, "");
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        // Angina and diabetes both land on 5%, which is not shown.
        assert_eq!(names, vec!["Common Cold", "GERD", "Migraine"]);
    }

    #[test]
    fn angina_age_risk_raises_probability() {
        let symptoms = ["chest pain", "shortness of breath"];
        let older = score_symptoms(&builtin(), &symptoms, 50, "male");
        let younger = score_symptoms(&builtin(), &symptoms, 20, "male");

        let older_p = probability_of(&older, "Angina").expect("angina missing at 50");
        let younger_p = probability_of(&younger, "Angina").expect("angina missing at 20");
        assert_eq!(older_p, 39);
        assert_eq!(younger_p, 36);
        assert!(older_p > younger_p);
    }

    #[test]
    fn age_exactly_45_does_not_trigger() {
        let symptoms = ["chest pain"];
        let at_45 = score_symptoms(&builtin(), &symptoms, 45, "");
        let at_20 = score_symptoms(&builtin(), &symptoms, 20, "");
        assert_eq!(at_45, at_20);
    }

    #[test]
    fn female_risk_factor_is_case_insensitive() {
        let lower = score_symptoms(&builtin(), &["headache"], 30, "female");
        let upper = score_symptoms(&builtin(), &["headache"], 30, "FEMALE");
        let male = score_symptoms(&builtin(), &["headache"], 30, "male");
        assert_eq!(lower, upper);
        assert!(probability_of(&lower, "Migraine") > probability_of(&male, "Migraine"));
    }

    #[test]
    fn matching_ignores_case_and_whitespace() {
        let a = score_symptoms(&builtin(), &["Heartburn "], 30, "");
        let b = score_symptoms(&builtin(), &["heartburn"], 30, "");
        assert_eq!(a, b);
    }

    #[test]
    fn input_contained_in_record_symptom_matches() {
        // "pain" is a substring of "chest pain"
        let with_pain = score_symptoms(&builtin(), &["pain"], 30, "");
        let without = score_symptoms(&builtin(), &Vec::<String>::new(), 30, "");
        assert!(probability_of(&with_pain, "GERD") > probability_of(&without, "GERD"));
    }

    #[test]
    fn record_symptom_contained_in_input_matches() {
        let results = score_symptoms(&builtin(), &["severe throbbing headache"], 30, "");
        assert_eq!(results[0].name, "Migraine");
    }

    #[test]
    fn single_input_can_bump_several_record_symptoms() {
        // "sensitivity to" is contained in both sensitivity entries
        let kb = builtin();
        let scores = raw_scores(&kb, &["sensitivity to".to_string()], 0, "");
        let migraine = scores[3];
        assert!((migraine - (0.1 + 2.0 * SYMPTOM_MATCH_BUMP)).abs() < 1e-9);
    }

    #[test]
    fn empty_symptoms_still_produce_results() {
        let results = score_symptoms(&builtin(), &Vec::<String>::new(), 0, "");
        assert!(!results.is_empty());
        assert_eq!(results[0].name, "Common Cold");
    }

    #[test]
    fn blank_symptom_matches_every_record_symptom() {
        // Every disease gains 5 bumps: total 0.5 + 5 * 0.75 = 4.25
        let results = score_symptoms(&builtin(), &[" "], 0, "");
        let ranked: Vec<(&str, u32)> = results
            .iter()
            .map(|r| (r.name.as_str(), r.probability))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("Common Cold", 22),
                ("GERD", 20),
                ("Migraine", 20),
                ("Angina", 18),
                ("Type 2 Diabetes (Early Warning)", 18),
            ]
        );
    }

    #[test]
    fn empty_string_symptom_scores_like_whitespace() {
        let empty = score_symptoms(&builtin(), &[""], 0, "");
        let spaces = score_symptoms(&builtin(), &["   "], 0, "");
        assert_eq!(empty, spaces);
    }

    #[test]
    fn unmatched_symptoms_do_not_panic() {
        let results = score_symptoms(&builtin(), &["xyzzy", "plugh"], 0, "other");
        assert!(!results.is_empty());
    }

    #[test]
    fn zero_total_returns_empty() {
        let results = score_symptoms(&zero_prior_kb(), &["sneeze"], 0, "");
        assert!(results.is_empty());
    }

    #[test]
    fn empty_knowledge_base_returns_empty() {
        let kb = KnowledgeBase::default();
        assert!(score_symptoms(&kb, &["cough"], 60, "female").is_empty());
    }

    #[test]
    fn probabilities_within_bounds_and_sorted() {
        let inputs: Vec<Vec<&str>> = vec![
            vec![],
            vec!["cough"],
            vec!["fatigue", "nausea"],
            vec!["heartburn", "acid reflux", "chest pain", "regurgitation"],
            vec!["excessive thirst", "frequent urination", "hunger", "blurred vision"],
            vec!["a"],
        ];
        for symptoms in inputs {
            for (age, sex) in [(0, ""), (60, "female"), (30, "male")] {
                let results = score_symptoms(&builtin(), &symptoms, age, sex);
                for r in &results {
                    assert!(r.probability > 5 && r.probability <= 100, "{r:?}");
                }
                assert!(results.windows(2).all(|w| w[0].probability >= w[1].probability));
            }
        }
    }

    #[test]
    fn ties_keep_knowledge_base_order() {
        let results = score_symptoms(&builtin(), &["runny nose", "sore throat", "cough"], 0, "");
        // GERD and Migraine both at 10%
        assert_eq!(results[1].probability, results[2].probability);
        assert_eq!(results[1].name, "GERD");
        assert_eq!(results[2].name, "Migraine");
    }

    #[test]
    fn candidates_carry_explanation_and_tests() {
        let results = score_symptoms(&builtin(), &["excessive thirst", "frequent urination"], 50, "");
        let diabetes = results
            .iter()
            .find(|r| r.name == "Type 2 Diabetes (Early Warning)")
            .unwrap();
        assert!(diabetes.explanation.contains("Polydipsia"));
        assert_eq!(diabetes.suggested_tests, vec!["HbA1c", "Fasting Plasma Glucose"]);
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(
            normalize_symptoms(&["  Sore Throat ", "COUGH"]),
            vec!["sore throat".to_string(), "cough".to_string()]
        );
    }

    #[test]
    fn normalize_keeps_blank_entries() {
        assert_eq!(normalize_symptoms(&["", "  "]), vec![String::new(), String::new()]);
    }

    #[test]
    fn sex_risk_factor_folds_non_ascii_case() {
        let kb = KnowledgeBase::new(
            vec![
                DiseaseProfile {
                    name: "Sex-linked".into(),
                    symptoms: vec![],
                    base_prior: 0.1,
                    risk_factors: vec![RiskFactor::Sex("féminin".into())],
                    explanation: String::new(),
                    suggested_tests: vec![],
                },
                DiseaseProfile {
                    name: "Other".into(),
                    symptoms: vec![],
                    base_prior: 0.1,
                    risk_factors: vec![],
                    explanation: String::new(),
                    suggested_tests: vec![],
                },
            ],
            vec![],
        );
        let scores = raw_scores(&kb, &[], 0, "FÉMININ");
        assert!((scores[0] - (0.1 + RISK_FACTOR_BUMP)).abs() < 1e-9);
    }
}
