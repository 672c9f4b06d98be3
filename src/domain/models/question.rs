//! Assessment question model.
//!
//! A question is a prompt, a [`QuestionKind`] carrying the payload its scoring
//! rule needs, and the [`FindingTemplate`] emitted when the answer fails that
//! rule. Answers are kept in their JSON shape ([`Answer`]) and interpreted by
//! the kind of the question they answer.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{AssessmentKind, FindingTemplate};

/// Points awarded for a passing radio answer.
pub const RADIO_POINTS: u32 = 10;

/// Points awarded for a text answer of sufficient length.
pub const TEXT_POINTS: u32 = 10;

/// Minimum character count of a text answer that avoids a finding.
pub const TEXT_MIN_LENGTH: usize = 50;

/// Upper bound of the maturity slider.
pub const SLIDER_MAX: u32 = 10;

/// Slider values below this emit a finding.
pub const SLIDER_THRESHOLD: f64 = 7.0;

/// Fewer selections than this emit a finding.
pub const MULTI_SELECT_MIN: usize = 2;

/// Fixed max-score contribution of a multi-select question.
pub const MULTI_SELECT_CAP: u32 = 4;

/// Question type with the payload its scoring rule depends on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// `"yes"` earns `points`, `"no"` emits the finding.
    YesNo { points: u32 },
    /// An answer inside `negative` emits the finding.
    Radio {
        options: Vec<String>,
        negative: Vec<String>,
    },
    /// Free text shorter than `min_length` characters emits the finding.
    Text { min_length: usize },
    /// 0..=10 scale; the raw value always counts.
    Slider { label: String },
    /// Fewer than `min_selections` emits the finding.
    MultiSelect {
        options: Vec<String>,
        min_selections: usize,
        max_score: u32,
    },
}

impl QuestionKind {
    pub fn yes_no(points: u32) -> Self {
        Self::YesNo { points }
    }

    pub fn radio(options: &[&str], negative: &[&str]) -> Self {
        Self::Radio {
            options: options.iter().map(ToString::to_string).collect(),
            negative: negative.iter().map(ToString::to_string).collect(),
        }
    }

    pub const fn text() -> Self {
        Self::Text {
            min_length: TEXT_MIN_LENGTH,
        }
    }

    pub fn slider(label: impl Into<String>) -> Self {
        Self::Slider {
            label: label.into(),
        }
    }

    pub fn multi_select(options: &[&str]) -> Self {
        Self::MultiSelect {
            options: options.iter().map(ToString::to_string).collect(),
            min_selections: MULTI_SELECT_MIN,
            max_score: MULTI_SELECT_CAP,
        }
    }

    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::YesNo { .. } => "yes_no",
            Self::Radio { .. } => "radio",
            Self::Text { .. } => "text",
            Self::Slider { .. } => "slider",
            Self::MultiSelect { .. } => "multi_select",
        }
    }

    /// Whether `answer` has the shape and range this kind expects.
    pub fn accepts(&self, answer: &Answer) -> bool {
        match (self, answer) {
            (Self::YesNo { .. }, Answer::Text(s)) => s == "yes" || s == "no",
            (Self::Radio { options, .. }, Answer::Text(s)) => options.contains(s),
            (Self::Text { .. }, Answer::Text(_)) => true,
            (Self::Slider { .. }, Answer::Number(n)) => n
                .as_f64()
                .is_some_and(|v| (0.0..=f64::from(SLIDER_MAX)).contains(&v)),
            (Self::MultiSelect { options, .. }, Answer::List(items)) => {
                let distinct: HashSet<&String> = items.iter().collect();
                distinct.len() == items.len() && items.iter().all(|item| options.contains(item))
            }
            _ => false,
        }
    }

    /// Read a raw command-line value in the shape this kind expects.
    pub fn parse_answer(&self, raw: &str) -> Answer {
        match self {
            Self::Slider { .. } => Answer::parse_loose(raw),
            Self::MultiSelect { .. } => Answer::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect(),
            ),
            Self::YesNo { .. } => Answer::Text(raw.trim().to_lowercase()),
            Self::Radio { .. } | Self::Text { .. } => Answer::Text(raw.trim().to_string()),
        }
    }

    /// Bring a loaded answer into canonical form. Yes/no answers are case
    /// and whitespace insensitive; other answers are kept as given.
    pub fn normalize(&self, answer: Answer) -> Answer {
        match (self, answer) {
            (Self::YesNo { .. }, Answer::Text(s)) => Answer::Text(s.trim().to_lowercase()),
            (_, answer) => answer,
        }
    }
}

/// An answer in its JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Number(serde_json::Number),
    Text(String),
    List(Vec<String>),
}

impl Answer {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn number(n: u32) -> Self {
        Self::Number(n.into())
    }

    pub fn list(items: &[&str]) -> Self {
        Self::List(items.iter().map(ToString::to_string).collect())
    }

    /// Parse a command-line value: integers become numbers, comma separated
    /// values become lists, anything else is text.
    pub fn parse_loose(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(n) = raw.parse::<u64>() {
            return Self::Number(n.into());
        }
        if raw.contains(',') {
            return Self::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect(),
            );
        }
        Self::Text(raw.to_string())
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Question id to answer.
pub type AnswerMap = BTreeMap<String, Answer>;

/// A single assessment question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    pub finding: FindingTemplate,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        prompt: impl Into<String>,
        kind: QuestionKind,
        finding: FindingTemplate,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            kind,
            finding,
        }
    }

    /// The answer to this question if present and well-shaped.
    pub fn answer_in<'a>(&self, answers: &'a AnswerMap) -> Option<&'a Answer> {
        answers.get(&self.id).filter(|a| self.kind.accepts(a))
    }
}

/// The fixed question list of one assessment kind.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSet {
    pub kind: AssessmentKind,
    pub questions: Vec<Question>,
}

impl QuestionSet {
    pub const fn new(kind: AssessmentKind, questions: Vec<Question>) -> Self {
        Self { kind, questions }
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Ids of questions without a well-shaped answer, in question order.
    pub fn missing_answers(&self, answers: &AnswerMap) -> Vec<String> {
        self.questions
            .iter()
            .filter(|q| q.answer_in(answers).is_none())
            .map(|q| q.id.clone())
            .collect()
    }

    /// Normalize the answers to known questions in place.
    pub fn normalize(&self, answers: &mut AnswerMap) {
        for question in &self.questions {
            if let Some(answer) = answers.remove(&question.id) {
                answers.insert(question.id.clone(), question.kind.normalize(answer));
            }
        }
    }

    /// The "can submit" gate: every question has a well-shaped answer.
    pub fn is_complete(&self, answers: &AnswerMap) -> bool {
        self.questions.iter().all(|q| q.answer_in(answers).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Severity;

    fn template() -> FindingTemplate {
        FindingTemplate::new("t", "d", Severity::Low, "c", "r")
    }

    #[test]
    fn test_answer_json_shapes() {
        let answers: AnswerMap =
            serde_json::from_str(r#"{"a": "yes", "b": 5, "c": ["NIST CSF", "SOC 2"]}"#).unwrap();

        assert_eq!(answers["a"], Answer::text("yes"));
        assert_eq!(answers["b"], Answer::number(5));
        assert_eq!(answers["c"], Answer::list(&["NIST CSF", "SOC 2"]));
    }

    #[test]
    fn test_yes_no_accepts_only_yes_or_no() {
        let kind = QuestionKind::yes_no(10);
        assert!(kind.accepts(&Answer::text("yes")));
        assert!(kind.accepts(&Answer::text("no")));
        assert!(!kind.accepts(&Answer::text("maybe")));
        assert!(!kind.accepts(&Answer::number(1)));
    }

    #[test]
    fn test_slider_range() {
        let kind = QuestionKind::slider("Current maturity");
        assert!(kind.accepts(&Answer::number(0)));
        assert!(kind.accepts(&Answer::number(10)));
        assert!(!kind.accepts(&Answer::number(11)));
        assert!(!kind.accepts(&Answer::text("5")));
    }

    #[test]
    fn test_multi_select_rejects_unknown_options() {
        let kind = QuestionKind::multi_select(&["A", "B", "C", "D"]);
        assert!(kind.accepts(&Answer::list(&["A", "C"])));
        assert!(kind.accepts(&Answer::list(&[])));
        assert!(!kind.accepts(&Answer::list(&["A", "Z"])));
    }

    #[test]
    fn test_multi_select_rejects_repeated_options() {
        let kind = QuestionKind::multi_select(&["A", "B", "C", "D"]);
        assert!(!kind.accepts(&Answer::list(&["A", "A"])));
        assert!(!kind.accepts(&Answer::list(&["A", "B", "C", "D", "A"])));
        assert!(kind.accepts(&Answer::list(&["D", "A"])));
    }

    #[test]
    fn test_missing_answers_in_question_order() {
        let set = QuestionSet::new(
            AssessmentKind::Basic,
            vec![
                Question::new("q1", "One?", QuestionKind::yes_no(10), template()),
                Question::new("q2", "Two?", QuestionKind::yes_no(10), template()),
                Question::new("q3", "Three?", QuestionKind::yes_no(10), template()),
            ],
        );
        let mut answers = AnswerMap::new();
        answers.insert("q2".into(), Answer::text("yes"));
        answers.insert("q3".into(), Answer::text("perhaps"));

        assert_eq!(set.missing_answers(&answers), vec!["q1", "q3"]);
        assert!(!set.is_complete(&answers));

        answers.insert("q1".into(), Answer::text("no"));
        answers.insert("q3".into(), Answer::text("no"));
        assert!(set.is_complete(&answers));
    }

    #[test]
    fn test_parse_loose() {
        assert_eq!(Answer::parse_loose("7"), Answer::number(7));
        assert_eq!(Answer::parse_loose("SOC 2, ISO 27001"), Answer::list(&["SOC 2", "ISO 27001"]));
        assert_eq!(Answer::parse_loose(" yes "), Answer::text("yes"));
    }

    #[test]
    fn test_parse_answer_follows_kind() {
        let multi = QuestionKind::multi_select(&["SOC 2", "ISO 27001"]);
        assert_eq!(multi.parse_answer("SOC 2"), Answer::list(&["SOC 2"]));

        let text = QuestionKind::text();
        assert_eq!(text.parse_answer("quarterly, by the board"), Answer::text("quarterly, by the board"));

        assert_eq!(QuestionKind::yes_no(10).parse_answer("Yes"), Answer::text("yes"));
    }

    #[test]
    fn test_normalize_matches_flag_parsing() {
        let set = QuestionSet::new(
            AssessmentKind::Basic,
            vec![
                Question::new("q1", "One?", QuestionKind::yes_no(10), template()),
                Question::new("q2", "Two?", QuestionKind::radio(&["Never", "Yearly"], &["Never"]), template()),
            ],
        );
        let mut answers = AnswerMap::new();
        answers.insert("q1".into(), Answer::text(" Yes"));
        answers.insert("q2".into(), Answer::text("Yearly"));
        assert!(!set.is_complete(&answers));

        set.normalize(&mut answers);

        assert_eq!(answers["q1"], QuestionKind::yes_no(10).parse_answer("Yes"));
        assert_eq!(answers["q2"], Answer::text("Yearly"));
        assert!(set.is_complete(&answers));
        assert_eq!(QuestionKind::slider("Level").parse_answer("8"), Answer::number(8));
    }
}
