use std::collections::BTreeMap;

use crate::model::QuizResult;

#[derive(Clone, Debug, PartialEq)]
pub struct SubjectStats {
    pub subject: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub accuracy: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverallStats {
    pub total_quizzes: usize,
    pub total_questions: u32,
    pub total_correct: u32,
    pub overall_accuracy: f64,
    /// Sorted ascending by accuracy: worst-performing subjects first.
    pub subjects: Vec<SubjectStats>,
}

fn accuracy(correct: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(correct) / f64::from(total) * 100.0
    }
}

/// Pure aggregation over a result list. Subjects are grouped by exact string
/// match (case- and whitespace-sensitive); the input is never mutated.
pub fn aggregate(results: &[QuizResult]) -> OverallStats {
    let mut total_questions = 0u32;
    let mut total_correct = 0u32;
    let mut by_subject: BTreeMap<&str, (u32, u32)> = BTreeMap::new();

    for result in results {
        total_questions += result.total_questions;
        total_correct += result.correct_answers;
        let entry = by_subject.entry(result.subject.as_str()).or_default();
        entry.0 += result.total_questions;
        entry.1 += result.correct_answers;
    }

    let mut subjects: Vec<SubjectStats> = by_subject
        .into_iter()
        .map(|(subject, (questions, correct))| SubjectStats {
            subject: subject.to_string(),
            total_questions: questions,
            correct_answers: correct,
            accuracy: accuracy(correct, questions),
        })
        .collect();
    // Worst accuracy first; BTreeMap iteration gives a stable name order for ties
    subjects.sort_by(|a, b| {
        a.accuracy
            .partial_cmp(&b.accuracy)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    OverallStats {
        total_quizzes: results.len(),
        total_questions,
        total_correct,
        overall_accuracy: accuracy(total_correct, total_questions),
        subjects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(subject: &str, total: u32, correct: u32) -> QuizResult {
        QuizResult {
            subject: subject.to_string(),
            total_questions: total,
            correct_answers: correct,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn empty_input_yields_zeroed_stats() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total_quizzes, 0);
        assert_eq!(stats.total_questions, 0);
        assert_eq!(stats.overall_accuracy, 0.0);
        assert!(stats.subjects.is_empty());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let results = vec![result("Português", 10, 7), result("Direito", 5, 5)];
        assert_eq!(aggregate(&results), aggregate(&results));
    }

    #[test]
    fn overall_accuracy_stays_within_bounds() {
        let results = vec![
            result("A", 10, 0),
            result("B", 10, 10),
            result("A", 20, 13),
        ];
        let stats = aggregate(&results);
        assert!(stats.overall_accuracy >= 0.0 && stats.overall_accuracy <= 100.0);
        for s in &stats.subjects {
            assert!(s.accuracy >= 0.0 && s.accuracy <= 100.0);
        }
    }

    #[test]
    fn subjects_sum_per_group_and_sort_worst_first() {
        let results = vec![
            result("Português", 10, 9),
            result("Direito", 10, 3),
            result("Português", 10, 7),
            result("Informática", 10, 5),
        ];
        let stats = aggregate(&results);
        assert_eq!(stats.total_quizzes, 4);
        assert_eq!(stats.total_questions, 40);
        assert_eq!(stats.total_correct, 24);

        let order: Vec<&str> = stats.subjects.iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(order, vec!["Direito", "Informática", "Português"]);
        assert_eq!(stats.subjects[2].total_questions, 20);
        assert_eq!(stats.subjects[2].correct_answers, 16);
    }

    #[test]
    fn grouping_is_exact_match() {
        // Case and whitespace differences are distinct subjects
        let results = vec![
            result("Português", 10, 5),
            result("português", 10, 5),
            result("Português ", 10, 5),
        ];
        let stats = aggregate(&results);
        assert_eq!(stats.subjects.len(), 3);
    }

    #[test]
    fn zero_question_results_do_not_divide_by_zero() {
        let stats = aggregate(&[result("A", 0, 0)]);
        assert_eq!(stats.overall_accuracy, 0.0);
        assert_eq!(stats.subjects[0].accuracy, 0.0);
    }
}
