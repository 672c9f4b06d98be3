//! Assessment scoring and finding generation.
//!
//! Walks a question set in order and applies each question's rule to its
//! answer, accumulating points against a maximum and emitting a finding for
//! every failing answer:
//!
//! | Kind         | Fails when                  | Points when passing | Max   |
//! |--------------|-----------------------------|---------------------|-------|
//! | yes/no       | answer is `"no"`            | question points     | points|
//! | radio        | answer in the negative set  | 10                  | 10    |
//! | text         | fewer than 50 characters    | 10                  | 10    |
//! | slider       | value below 7               | raw value (always)  | 10    |
//! | multi-select | fewer than 2 selections     | selection count     | 4     |
//!
//! The score is `round(100 * points / max)`. Unanswered or mis-shaped answers
//! contribute nothing; callers gate submission on
//! [`QuestionSet::is_complete`] separately.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::domain::models::question::{RADIO_POINTS, SLIDER_MAX, SLIDER_THRESHOLD, TEXT_POINTS};
use crate::domain::models::{Answer, AnswerMap, Finding, Question, QuestionKind, QuestionSet};

/// Result of scoring one answer map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOutcome {
    /// Percentage score, 0..=100
    pub score: u8,
    /// One finding per failing answer, in question order
    pub findings: Vec<Finding>,
    /// Points earned
    pub points: f64,
    /// Points available across the answered questions
    pub max_points: u32,
}

/// Score `answers` against `set`, stamping findings with the current time.
pub fn evaluate(set: &QuestionSet, answers: &AnswerMap) -> ScoreOutcome {
    evaluate_at(set, answers, Utc::now())
}

/// Score `answers` against `set`, stamping findings with `now`.
pub fn evaluate_at(set: &QuestionSet, answers: &AnswerMap, now: DateTime<Utc>) -> ScoreOutcome {
    let mut points = 0.0_f64;
    let mut max_points = 0_u32;
    let mut findings = Vec::new();

    for question in &set.questions {
        let Some(answer) = question.answer_in(answers) else {
            debug!(question = %question.id, "no usable answer, excluded from score");
            continue;
        };

        let (earned, available, failed) = rule(question, answer);
        points += earned;
        max_points += available;

        if failed {
            findings.push(emit(question, answer, now));
        }
    }

    ScoreOutcome {
        score: percentage(points, max_points),
        findings,
        points,
        max_points,
    }
}

/// `(points earned, points available, emits finding)` for one answer.
#[allow(clippy::cast_precision_loss)]
fn rule(question: &Question, answer: &Answer) -> (f64, u32, bool) {
    match (&question.kind, answer) {
        (QuestionKind::YesNo { points }, Answer::Text(value)) => {
            let failed = value == "no";
            let earned = if failed { 0.0 } else { f64::from(*points) };
            (earned, *points, failed)
        }
        (QuestionKind::Radio { negative, .. }, Answer::Text(value)) => {
            let failed = negative.contains(value);
            let earned = if failed { 0.0 } else { f64::from(RADIO_POINTS) };
            (earned, RADIO_POINTS, failed)
        }
        (QuestionKind::Text { min_length }, Answer::Text(value)) => {
            let failed = value.chars().count() < *min_length;
            let earned = if failed { 0.0 } else { f64::from(TEXT_POINTS) };
            (earned, TEXT_POINTS, failed)
        }
        (QuestionKind::Slider { .. }, Answer::Number(value)) => {
            let value = value.as_f64().unwrap_or_default();
            (value, SLIDER_MAX, value < SLIDER_THRESHOLD)
        }
        (
            QuestionKind::MultiSelect {
                min_selections,
                max_score,
                ..
            },
            Answer::List(selected),
        ) => {
            let failed = selected.len() < *min_selections;
            let earned = if failed { 0.0 } else { selected.len() as f64 };
            (earned, *max_score, failed)
        }
        // `answer_in` only yields answers the kind accepts
        _ => (0.0, 0, false),
    }
}

fn emit(question: &Question, answer: &Answer, now: DateTime<Utc>) -> Finding {
    let finding = Finding::from_template(&question.finding, question.id.clone(), now);
    match &question.kind {
        QuestionKind::Slider { label } => {
            let description = format!(
                "{} ({label}: {answer}/{SLIDER_MAX})",
                question.finding.description
            );
            finding.with_description(description)
        }
        _ => finding,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percentage(points: f64, max_points: u32) -> u8 {
    if max_points == 0 {
        return 0;
    }
    (100.0 * points / f64::from(max_points)).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AssessmentKind, FindingStatus};
    use crate::services::question_bank::question_set;

    fn basic_answers(no_ids: &[&str]) -> AnswerMap {
        question_set(AssessmentKind::Basic)
            .questions
            .iter()
            .map(|q| {
                let value = if no_ids.contains(&q.id.as_str()) { "no" } else { "yes" };
                (q.id.clone(), Answer::text(value))
            })
            .collect()
    }

    fn passing_advanced() -> AnswerMap {
        let long = "A security steering committee chaired by the CISO meets monthly to review risk.";
        [
            ("risk_assessment_process", Answer::text("Yes")),
            ("vendor_risk_management", Answer::text("Always")),
            ("continuous_monitoring", Answer::text("Yes")),
            ("security_governance", Answer::text(long)),
            ("incident_lessons_learned", Answer::text(long)),
            ("security_maturity", Answer::number(10)),
            ("logging_coverage", Answer::number(10)),
            ("framework_alignment", Answer::list(&["NIST CSF", "ISO 27001", "SOC 2", "CIS Controls"])),
        ]
        .into_iter()
        .map(|(id, answer)| (id.to_string(), answer))
        .collect()
    }

    #[test]
    fn test_all_yes_scores_100_without_findings() {
        let outcome = evaluate(question_set(AssessmentKind::Basic), &basic_answers(&[]));
        assert_eq!(outcome.score, 100);
        assert!(outcome.findings.is_empty());
        assert_eq!(outcome.max_points, 80);
    }

    #[test]
    fn test_two_no_answers_score_75() {
        let outcome = evaluate(
            question_set(AssessmentKind::Basic),
            &basic_answers(&["mfa_enabled", "patch_management"]),
        );
        assert_eq!(outcome.score, 75);
        assert_eq!(outcome.findings.len(), 2);

        let sources: Vec<_> = outcome
            .findings
            .iter()
            .map(|f| f.source_question.as_str())
            .collect();
        assert_eq!(sources, vec!["mfa_enabled", "patch_management"]);
    }

    #[test]
    fn test_findings_are_stamped() {
        let now = Utc::now();
        let outcome = evaluate_at(
            question_set(AssessmentKind::Basic),
            &basic_answers(&["data_backups"]),
            now,
        );
        let finding = &outcome.findings[0];
        assert_eq!(finding.status, FindingStatus::Open);
        assert_eq!(finding.created_date, now);
        assert_eq!(finding.title, "Backups not performed or tested");
    }

    #[test]
    fn test_all_no_scores_zero() {
        let ids: Vec<&str> = question_set(AssessmentKind::Basic)
            .questions
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        let outcome = evaluate(question_set(AssessmentKind::Basic), &basic_answers(&ids));
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.findings.len(), 8);
    }

    #[test]
    fn test_missing_answers_are_excluded() {
        let mut answers = basic_answers(&["mfa_enabled"]);
        answers.remove("data_backups");
        answers.insert("access_reviews".into(), Answer::text("sometimes"));

        let outcome = evaluate(question_set(AssessmentKind::Basic), &answers);
        // 5 yes out of 6 usable answers
        assert_eq!(outcome.max_points, 60);
        assert_eq!(outcome.score, 83);
        assert_eq!(outcome.findings.len(), 1);
    }

    #[test]
    fn test_empty_answers_score_zero() {
        let outcome = evaluate(question_set(AssessmentKind::Advanced), &AnswerMap::new());
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.max_points, 0);
        assert!(outcome.findings.is_empty());
    }

    #[test]
    fn test_advanced_all_passing() {
        let outcome = evaluate(question_set(AssessmentKind::Advanced), &passing_advanced());
        assert_eq!(outcome.max_points, 74);
        assert!(outcome.findings.is_empty());
        assert_eq!(outcome.score, 100);
    }

    #[test]
    fn test_radio_negative_values_emit() {
        let mut answers = passing_advanced();
        answers.insert("risk_assessment_process".into(), Answer::text("In Progress"));
        answers.insert("vendor_risk_management".into(), Answer::text("Never"));

        let outcome = evaluate(question_set(AssessmentKind::Advanced), &answers);
        assert_eq!(outcome.findings.len(), 2);
        // 74 - 20 = 54 of 74
        assert_eq!(outcome.score, 73);
    }

    #[test]
    fn test_short_text_emits() {
        let mut answers = passing_advanced();
        answers.insert("security_governance".into(), Answer::text("We have a CISO."));

        let outcome = evaluate(question_set(AssessmentKind::Advanced), &answers);
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].source_question, "security_governance");
    }

    #[test]
    fn test_text_boundary_is_fifty_characters() {
        let mut answers = passing_advanced();
        answers.insert("security_governance".into(), Answer::text("x".repeat(50)));
        answers.insert("incident_lessons_learned".into(), Answer::text("x".repeat(49)));

        let outcome = evaluate(question_set(AssessmentKind::Advanced), &answers);
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].source_question, "incident_lessons_learned");
    }

    #[test]
    fn test_low_slider_description_carries_value() {
        let mut answers = passing_advanced();
        answers.insert("security_maturity".into(), Answer::number(5));

        let outcome = evaluate(question_set(AssessmentKind::Advanced), &answers);
        assert_eq!(outcome.findings.len(), 1);
        assert!(outcome.findings[0]
            .description
            .ends_with("(Current maturity: 5/10)"));
        // slider always counts its raw value: 69 of 74
        assert!((outcome.points - 69.0).abs() < f64::EPSILON);
        assert_eq!(outcome.score, 93);
    }

    #[test]
    fn test_slider_at_threshold_passes() {
        let mut answers = passing_advanced();
        answers.insert("logging_coverage".into(), Answer::number(7));

        let outcome = evaluate(question_set(AssessmentKind::Advanced), &answers);
        assert!(outcome.findings.is_empty());
    }

    #[test]
    fn test_multi_select_rules() {
        let mut answers = passing_advanced();
        answers.insert("framework_alignment".into(), Answer::list(&["SOC 2"]));
        let outcome = evaluate(question_set(AssessmentKind::Advanced), &answers);
        assert_eq!(outcome.findings.len(), 1);
        assert!((outcome.points - 70.0).abs() < f64::EPSILON);

        answers.insert("framework_alignment".into(), Answer::list(&["SOC 2", "NIST CSF"]));
        let outcome = evaluate(question_set(AssessmentKind::Advanced), &answers);
        assert!(outcome.findings.is_empty());
        assert!((outcome.points - 72.0).abs() < f64::EPSILON);
        assert_eq!(outcome.max_points, 74);
    }
}
