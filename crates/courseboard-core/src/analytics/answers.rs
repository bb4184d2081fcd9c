//! Answer distribution for a single problem.
//!
//! Groups the flat per-answer rows by problem part, picks the part being
//! viewed and ranks its answers for the chart and the table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::records::{last_updated, AnswerDistributionEntry};
use crate::stats::percent;

/// How answer values should be plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    Numeric,
    Text,
}

/// One part (question) of a multi-part problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub part_id: String,
    /// 1-based position in the problem.
    pub index: usize,
}

/// One answer row of the active part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRow {
    pub answer_value: Option<String>,
    pub count: u64,
    pub correct: bool,
    pub variant: Option<i64>,
    /// Share of the part's responses, 0-100.
    pub percent: f64,
}

/// Answer distribution view model for one problem part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerDistribution {
    pub problem_id: String,
    pub questions: Vec<Question>,
    pub active_part_id: String,
    pub is_random: bool,
    pub answer_type: AnswerType,
    pub total_responses: u64,
    /// Every answer, most frequent first.
    pub answers: Vec<AnswerRow>,
    /// Head of `answers` limited for charting.
    pub chart_answers: Vec<AnswerRow>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Whether a problem part was randomized per learner.
///
/// A variant other than 1 marks a randomized part; `Some(0)` therefore
/// counts as randomized.
pub fn is_random(entries: &[&AnswerDistributionEntry]) -> bool {
    entries
        .iter()
        .any(|entry| matches!(entry.variant, Some(variant) if variant != 1))
}

/// Numeric when every present answer parses as a number.
pub fn answer_type(entries: &[&AnswerDistributionEntry]) -> AnswerType {
    let mut values = entries
        .iter()
        .filter_map(|entry| entry.answer_value.as_deref())
        .peekable();
    if values.peek().is_none() {
        return AnswerType::Text;
    }
    if values.all(|value| value.trim().parse::<f64>().is_ok()) {
        AnswerType::Numeric
    } else {
        AnswerType::Text
    }
}

/// Distinct part IDs in first-seen order.
pub fn questions(entries: &[AnswerDistributionEntry]) -> Vec<Question> {
    let mut questions: Vec<Question> = Vec::new();
    for entry in entries {
        if !questions.iter().any(|q| q.part_id == entry.part_id) {
            questions.push(Question {
                part_id: entry.part_id.clone(),
                index: questions.len() + 1,
            });
        }
    }
    questions
}

/// Build the distribution for `part_id` (or the first part when `None`).
///
/// Returns `None` when there are no entries or the requested part is unknown.
pub fn build_answer_distribution(
    problem_id: &str,
    entries: &[AnswerDistributionEntry],
    part_id: Option<&str>,
    chart_limit: usize,
) -> Option<AnswerDistribution> {
    let questions = questions(entries);
    let active_part_id = match part_id {
        Some(requested) => questions
            .iter()
            .find(|q| q.part_id == requested)?
            .part_id
            .clone(),
        None => questions.first()?.part_id.clone(),
    };

    let part_entries: Vec<&AnswerDistributionEntry> = entries
        .iter()
        .filter(|entry| entry.part_id == active_part_id)
        .collect();
    let total_responses: u64 = part_entries.iter().map(|e| e.last_response_count).sum();

    let mut answers: Vec<AnswerRow> = part_entries
        .iter()
        .map(|entry| AnswerRow {
            answer_value: entry.answer_value.clone(),
            count: entry.last_response_count,
            correct: entry.correct,
            variant: entry.variant,
            percent: percent(entry.last_response_count, total_responses),
        })
        .collect();
    // Stable: equal counts keep service order.
    answers.sort_by(|a, b| b.count.cmp(&a.count));

    let chart_answers = answers.iter().take(chart_limit).cloned().collect();

    Some(AnswerDistribution {
        problem_id: problem_id.to_string(),
        is_random: is_random(&part_entries),
        answer_type: answer_type(&part_entries),
        last_updated: last_updated(part_entries.iter().copied()),
        questions,
        active_part_id,
        total_responses,
        answers,
        chart_answers,
    })
}
