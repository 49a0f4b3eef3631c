use crate::model::AnswerSource;
use crate::pipeline::Pipeline;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    pub case_id: String,
    pub question: String,
    pub expected_category: Option<String>,
    pub expected_source: Option<AnswerSource>,
    pub min_confidence: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOutcome {
    pub case_id: String,
    pub passed: bool,
    pub actual_category: String,
    pub actual_source: AnswerSource,
    pub confidence: f32,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f32,
    pub outcomes: Vec<EvalOutcome>,
}

fn case_matches(
    case: &EvalCase,
    actual_category: &str,
    actual_source: AnswerSource,
    confidence: f32,
) -> bool {
    if let Some(expected) = &case.expected_category {
        if expected != actual_category {
            return false;
        }
    }
    if let Some(expected) = case.expected_source {
        if expected != actual_source {
            return false;
        }
    }
    if let Some(min) = case.min_confidence {
        if confidence < min {
            return false;
        }
    }
    true
}

pub fn evaluate_cases(pipeline: &Pipeline, cases: &[EvalCase]) -> EvalSummary {
    let mut outcomes = Vec::with_capacity(cases.len());

    for case in cases {
        let start = Instant::now();
        let resolution = pipeline.answer(&case.question);
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let passed = case_matches(
            case,
            &resolution.intent,
            resolution.source,
            resolution.confidence,
        );

        outcomes.push(EvalOutcome {
            case_id: case.case_id.clone(),
            passed,
            actual_category: resolution.intent,
            actual_source: resolution.source,
            confidence: resolution.confidence,
            latency_ms,
        });
    }

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed).count();
    let failed = total.saturating_sub(passed);
    let pass_rate = if total == 0 {
        0.0
    } else {
        passed as f32 / total as f32
    };

    EvalSummary {
        total,
        passed,
        failed,
        pass_rate,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexParams;
    use crate::intent::IntentClassifier;
    use crate::model::KnowledgeEntry;
    use crate::ner::{EntitySchema, RegexNer};
    use crate::template::TemplateCatalog;

    fn pipeline() -> Pipeline {
        let entries = vec![KnowledgeEntry::new(
            "kb-1".to_string(),
            "acces_plateforme".to_string(),
            "Comment réinitialiser son mot de passe".to_string(),
            Vec::new(),
            "Cliquez sur mot de passe oublié.".to_string(),
            Vec::new(),
            None,
            None,
        )];
        Pipeline::new(
            entries,
            RegexNer::new(&EntitySchema { entities: Vec::new() }),
            IntentClassifier::default(),
            TemplateCatalog::new(Vec::new()),
            &IndexParams {
                max_df: 1.0,
                ..IndexParams::default()
            },
            3,
        )
    }

    fn case(id: &str, question: &str) -> EvalCase {
        EvalCase {
            case_id: id.to_string(),
            question: question.to_string(),
            expected_category: None,
            expected_source: None,
            min_confidence: None,
        }
    }

    #[test]
    fn summary_counts_passed_and_failed() {
        let p = pipeline();
        let mut hit = case("hit", "mot de passe oublié");
        hit.expected_category = Some("acces_plateforme".to_string());
        hit.expected_source = Some(AnswerSource::KnowledgeBase);
        let mut miss = case("miss", "mot de passe oublié");
        miss.expected_category = Some("frais_inscription".to_string());

        let summary = evaluate_cases(&p, &[hit, miss]);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert!((summary.pass_rate - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn min_confidence_gates_a_pass() {
        let p = pipeline();
        let mut strict = case("strict", "mot de passe oublié");
        strict.min_confidence = Some(1.1);

        let summary = evaluate_cases(&p, &[strict]);
        assert_eq!(summary.passed, 0);
    }

    #[test]
    fn no_match_queries_check_against_no_match_source() {
        let p = pipeline();
        let mut c = case("none", "xylophone quantique");
        c.expected_source = Some(AnswerSource::NoMatch);
        c.expected_category = Some("info_generale_uvbf".to_string());

        let summary = evaluate_cases(&p, &[c]);
        assert_eq!(summary.passed, 1);
    }

    #[test]
    fn empty_case_list_yields_zero_pass_rate() {
        let summary = evaluate_cases(&pipeline(), &[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pass_rate, 0.0);
    }
}
