use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Allowed question counts for a quiz, in menu order.
pub const QUESTION_COUNTS: [u32; 4] = [5, 10, 15, 20];

/// Allowed study plan lengths in weeks, in menu order.
pub const PLAN_DURATIONS: [u32; 4] = [4, 8, 12, 16];

pub const MIN_HOURS_PER_WEEK: u32 = 1;
pub const MAX_HOURS_PER_WEEK: u32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Label used in prompts; the exam board vocabulary is Portuguese.
    pub fn label_pt(self) -> &'static str {
        match self {
            Difficulty::Easy => "Fácil",
            Difficulty::Medium => "Médio",
            Difficulty::Hard => "Difícil",
        }
    }
}

/// Configuration submitted for one quiz. Immutable once submitted; restart
/// re-uses the same value for a fresh generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSettings {
    pub subject: String,
    pub num_questions: u32,
    pub difficulty: Difficulty,
}

/// One generated multiple-choice question. Deserialized straight from the
/// service payload; never constructed locally.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: String,
    /// Issuing examination board attributed to the question (FGV, Cebraspe, ...).
    pub banca: String,
}

/// Exactly 5 options per question, A through E.
pub const OPTIONS_PER_QUESTION: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserAnswer {
    pub question_index: usize,
    pub selected_answer_index: usize,
    pub is_correct: bool,
}

/// Outcome of one completed quiz, as persisted in the result history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub subject: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudyPlanSettings {
    pub goal: String,
    pub subjects: Vec<String>,
    pub hours_per_week: u32,
    pub duration_in_weeks: u32,
}

impl StudyPlanSettings {
    /// Build validated settings from raw form input. Subjects are trimmed and
    /// blank entries dropped; an empty goal or an empty surviving subject
    /// list is rejected before any request is issued.
    pub fn from_form(
        goal: &str,
        subjects: &[String],
        hours_per_week: u32,
        duration_in_weeks: u32,
    ) -> Result<Self, &'static str> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err("Enter a goal for the plan");
        }
        let subjects: Vec<String> = subjects
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        if subjects.is_empty() {
            return Err("Enter at least one subject");
        }
        Ok(Self {
            goal: goal.to_string(),
            subjects,
            hours_per_week: hours_per_week.clamp(MIN_HOURS_PER_WEEK, MAX_HOURS_PER_WEEK),
            duration_in_weeks,
        })
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyActivity {
    pub subject: String,
    pub activity: String,
    pub duration: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailySchedule {
    pub day: String,
    pub activities: Vec<StudyActivity>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    pub week: u32,
    pub focus: String,
    pub daily_schedule: Vec<DailySchedule>,
}

/// Generated study plan. Opaque to the flow controller beyond the non-empty
/// weekly_plan check applied at the generation boundary.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub title: String,
    pub weekly_plan: Vec<WeeklyPlan>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_settings_trim_and_drop_blank_subjects() {
        let subjects = vec![
            "  Direito Constitucional ".to_string(),
            "".to_string(),
            "   ".to_string(),
            "Português".to_string(),
        ];
        let settings = StudyPlanSettings::from_form("Analista TRT", &subjects, 10, 8).unwrap();
        assert_eq!(
            settings.subjects,
            vec!["Direito Constitucional".to_string(), "Português".to_string()]
        );
    }

    #[test]
    fn plan_settings_reject_all_blank_subjects() {
        let subjects = vec!["  ".to_string(), "".to_string()];
        let result = StudyPlanSettings::from_form("Analista TRT", &subjects, 10, 8);
        assert!(result.is_err());
    }

    #[test]
    fn plan_settings_reject_blank_goal() {
        let subjects = vec!["Português".to_string()];
        assert!(StudyPlanSettings::from_form("   ", &subjects, 10, 8).is_err());
    }

    #[test]
    fn plan_settings_clamp_hours() {
        let subjects = vec!["Português".to_string()];
        let settings = StudyPlanSettings::from_form("Concurso", &subjects, 0, 4).unwrap();
        assert_eq!(settings.hours_per_week, MIN_HOURS_PER_WEEK);
        let settings = StudyPlanSettings::from_form("Concurso", &subjects, 999, 4).unwrap();
        assert_eq!(settings.hours_per_week, MAX_HOURS_PER_WEEK);
    }

    #[test]
    fn quiz_question_deserializes_from_service_field_names() {
        let json = r#"{
            "question": "Qual princípio?",
            "options": ["a", "b", "c", "d", "e"],
            "correctAnswerIndex": 2,
            "explanation": "Porque sim.",
            "banca": "FGV"
        }"#;
        let q: QuizQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.correct_answer_index, 2);
        assert_eq!(q.options.len(), OPTIONS_PER_QUESTION);
        assert_eq!(q.banca, "FGV");
    }
}
