use chrono::Utc;

use crate::audio;
use crate::config::Config;
use crate::event::SpeechKind;
use crate::r#gen::{GenClient, GenError};
use crate::model::{QuizQuestion, QuizResult, QuizSettings, StudyPlan, StudyPlanSettings};
use crate::session::quiz::{Advance, QuizSession};
use crate::store::StatsStore;
use crate::ui::components::home::Menu;
use crate::ui::components::plan_config::PlanForm;
use crate::ui::components::question_card::QuestionCard;
use crate::ui::components::quiz_config::QuizForm;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    QuizConfig,
    LoadingQuiz,
    Quiz,
    Results,
    PlanConfig,
    LoadingPlan,
    StudyPlan,
    Statistics,
    Error,
}

/// Top-level application state. All transitions happen synchronously on the
/// main loop; methods that need the generation service return the settings
/// value so the caller can spawn the single outstanding request, and the
/// matching `*_generated` method consumes its terminal outcome.
pub struct App {
    pub screen: AppScreen,
    pub theme: &'static Theme,
    pub config: Config,
    pub r#gen: GenClient,
    pub store: Option<StatsStore>,
    pub menu: Menu<'static>,
    pub banner_dismissed: bool,

    pub quiz_form: QuizForm,
    pub plan_form: PlanForm,
    pub quiz_settings: Option<QuizSettings>,
    pub session: Option<QuizSession>,
    pub study_plan: Option<StudyPlan>,
    pub error: Option<String>,

    pub stats_results: Vec<QuizResult>,
    pub stats_confirm_clear: bool,

    pub quiz_scroll: u16,
    pub results_scroll: u16,
    pub plan_scroll: u16,

    /// True from the moment a generation request is issued until its outcome
    /// arrives. At most one request is ever in flight.
    pub pending_generation: bool,
    /// At most one speech request at a time.
    pub speaking: bool,
    pub speech_notice: Option<String>,

    pub tick: u64,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        let config = Config::load().unwrap_or_default();
        let store = StatsStore::new()
            .map_err(|e| log::warn!("statistics unavailable: {e}"))
            .ok();
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Option<StatsStore>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);
        let banner_dismissed = store
            .as_ref()
            .map(|s| s.banner_dismissed())
            .unwrap_or(false);
        let r#gen = GenClient::new(&config);

        Self {
            screen: AppScreen::Home,
            theme,
            config,
            r#gen,
            store,
            menu,
            banner_dismissed,
            quiz_form: QuizForm::new(),
            plan_form: PlanForm::new(),
            quiz_settings: None,
            session: None,
            study_plan: None,
            error: None,
            stats_results: Vec::new(),
            stats_confirm_clear: false,
            quiz_scroll: 0,
            results_scroll: 0,
            plan_scroll: 0,
            pending_generation: false,
            speaking: false,
            speech_notice: None,
            tick: 0,
            should_quit: false,
        }
    }

    // --- navigation ---

    pub fn open_quiz_config(&mut self) {
        self.quiz_form.reset();
        self.screen = AppScreen::QuizConfig;
    }

    pub fn open_plan_config(&mut self) {
        self.plan_form.reset();
        self.screen = AppScreen::PlanConfig;
    }

    pub fn open_statistics(&mut self) {
        self.stats_results = self
            .store
            .as_ref()
            .map(|s| s.list())
            .unwrap_or_default();
        self.stats_confirm_clear = false;
        self.screen = AppScreen::Statistics;
    }

    /// Clear all quiz, plan, and error state and return to the home screen.
    pub fn go_home(&mut self) {
        self.quiz_settings = None;
        self.session = None;
        self.study_plan = None;
        self.error = None;
        self.speech_notice = None;
        self.quiz_form.reset();
        self.plan_form.reset();
        self.quiz_scroll = 0;
        self.results_scroll = 0;
        self.plan_scroll = 0;
        self.stats_confirm_clear = false;
        self.screen = AppScreen::Home;
    }

    pub fn dismiss_banner(&mut self) {
        self.banner_dismissed = true;
        if let Some(store) = &self.store {
            store.dismiss_banner();
        }
    }

    // --- quiz flow ---

    /// Accept submitted settings and move to the loading screen. Returns the
    /// settings the caller must generate for, or None if a request is
    /// already outstanding.
    pub fn start_quiz(&mut self, settings: QuizSettings) -> Option<QuizSettings> {
        if self.pending_generation {
            return None;
        }
        self.error = None;
        self.quiz_settings = Some(settings.clone());
        self.pending_generation = true;
        self.screen = AppScreen::LoadingQuiz;
        Some(settings)
    }

    /// Terminal outcome of the quiz generation request. A well-formed empty
    /// question list takes the same error path as a failure.
    pub fn quiz_generated(&mut self, outcome: Result<Vec<QuizQuestion>, GenError>) {
        self.pending_generation = false;
        match outcome {
            Ok(questions) if !questions.is_empty() => {
                self.session = Some(QuizSession::new(questions));
                self.quiz_scroll = 0;
                self.speech_notice = None;
                self.screen = AppScreen::Quiz;
            }
            Ok(_) => {
                self.generation_failed(
                    "The AI returned no questions. Try again with a different subject."
                        .to_string(),
                );
            }
            Err(e) => self.generation_failed(e.to_string()),
        }
    }

    pub fn select_answer(&mut self, index: usize) {
        if let Some(session) = self.session.as_mut()
            && session.select_answer(index)
        {
            self.quiz_scroll = 0;
        }
    }

    /// Advance within the session; completing the last question records the
    /// result and moves to the results screen.
    pub fn advance(&mut self) {
        let finished = match self.session.as_mut() {
            Some(session) => session.advance() == Advance::Finished,
            None => false,
        };
        if finished {
            self.complete_quiz();
        } else {
            self.quiz_scroll = 0;
        }
    }

    pub fn retreat(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.retreat();
            self.quiz_scroll = 0;
        }
    }

    fn complete_quiz(&mut self) {
        if let (Some(settings), Some(session)) = (&self.quiz_settings, &self.session)
            && !session.is_empty()
        {
            let result = QuizResult {
                subject: settings.subject.clone(),
                total_questions: session.len() as u32,
                correct_answers: session.correct_count() as u32,
                timestamp: Utc::now(),
            };
            if let Some(store) = &self.store {
                store.record(result);
            }
        }
        self.results_scroll = 0;
        self.screen = AppScreen::Results;
    }

    /// Request a fresh quiz with the settings of the one just finished. The
    /// new quiz is generated anew and may contain different questions.
    pub fn restart_quiz(&mut self) -> Option<QuizSettings> {
        let settings = self.quiz_settings.clone()?;
        self.start_quiz(settings)
    }

    // --- study plan flow ---

    pub fn start_plan(&mut self, settings: StudyPlanSettings) -> Option<StudyPlanSettings> {
        if self.pending_generation {
            return None;
        }
        self.error = None;
        self.pending_generation = true;
        self.screen = AppScreen::LoadingPlan;
        Some(settings)
    }

    pub fn plan_generated(&mut self, outcome: Result<StudyPlan, GenError>) {
        self.pending_generation = false;
        match outcome {
            Ok(plan) if !plan.weekly_plan.is_empty() => {
                self.study_plan = Some(plan);
                self.plan_scroll = 0;
                self.screen = AppScreen::StudyPlan;
            }
            Ok(_) => {
                self.generation_failed(
                    "The AI returned an empty study plan. Try different parameters."
                        .to_string(),
                );
            }
            Err(e) => self.generation_failed(e.to_string()),
        }
    }

    pub fn new_plan(&mut self) {
        self.study_plan = None;
        self.open_plan_config();
    }

    fn generation_failed(&mut self, message: String) {
        log::warn!("generation failed: {message}");
        self.error = Some(message);
        self.screen = AppScreen::Error;
    }

    // --- statistics ---

    pub fn request_clear_stats(&mut self) {
        if !self.stats_results.is_empty() {
            self.stats_confirm_clear = true;
        }
    }

    pub fn confirm_clear_stats(&mut self) {
        if let Some(store) = &self.store {
            store.clear();
        }
        self.stats_results.clear();
        self.stats_confirm_clear = false;
    }

    pub fn cancel_clear_stats(&mut self) {
        self.stats_confirm_clear = false;
    }

    // --- speech ---

    /// Ask for a spoken rendition of the current question or its explanation.
    /// Returns the text to synthesize, or None when a speech request is
    /// already outstanding or there is nothing to read.
    pub fn request_speech(&mut self, kind: SpeechKind) -> Option<String> {
        if self.speaking {
            return None;
        }
        let session = self.session.as_ref()?;
        let text = match kind {
            SpeechKind::Question => QuestionCard::spoken_question(session),
            SpeechKind::Explanation => {
                // The explanation is only on screen once the question is answered
                if !session.current_answered() {
                    return None;
                }
                session.current_question().explanation.clone()
            }
        };
        self.speaking = true;
        self.speech_notice = None;
        Some(text)
    }

    pub fn speech_ready(&mut self, kind: SpeechKind, outcome: Result<Vec<u8>, GenError>) {
        self.speaking = false;
        match outcome {
            Ok(pcm) => {
                let name = match kind {
                    SpeechKind::Question => "question",
                    SpeechKind::Explanation => "explanation",
                };
                let base = self
                    .store
                    .as_ref()
                    .map(|s| s.base_dir().clone())
                    .unwrap_or_else(|| std::path::PathBuf::from("."));
                match audio::save_speech(&base, name, &pcm) {
                    Ok(path) => {
                        self.speech_notice = Some(format!("Audio saved to {}", path.display()));
                    }
                    Err(e) => {
                        log::warn!("could not save speech audio: {e}");
                        self.speech_notice = Some("Could not save the audio file".to_string());
                    }
                }
            }
            Err(e) => {
                log::warn!("speech generation failed: {e}");
                self.speech_notice = Some(format!("Speech failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;
    use tempfile::TempDir;

    fn app_with_store() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let store = StatsStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, App::with_store(Config::default(), Some(store)))
    }

    fn settings() -> QuizSettings {
        QuizSettings {
            subject: "Direito Constitucional".to_string(),
            num_questions: 5,
            difficulty: Difficulty::Medium,
        }
    }

    fn questions(n: usize) -> Vec<QuizQuestion> {
        (0..n)
            .map(|i| QuizQuestion {
                question: format!("q{i}"),
                options: (0..5).map(|j| format!("op{j}")).collect(),
                correct_answer_index: 0,
                explanation: "e".to_string(),
                banca: "FGV".to_string(),
            })
            .collect()
    }

    #[test]
    fn submit_moves_to_loading_and_blocks_second_request() {
        let (_dir, mut app) = app_with_store();
        assert!(app.start_quiz(settings()).is_some());
        assert_eq!(app.screen, AppScreen::LoadingQuiz);
        assert!(app.pending_generation);
        // A second submission while in flight is swallowed
        assert!(app.start_quiz(settings()).is_none());
    }

    #[test]
    fn empty_question_list_lands_on_error_not_quiz() {
        let (_dir, mut app) = app_with_store();
        app.start_quiz(settings());
        app.quiz_generated(Ok(Vec::new()));
        assert_eq!(app.screen, AppScreen::Error);
        assert!(app.error.is_some());
        assert!(!app.pending_generation);
    }

    #[test]
    fn generation_failure_carries_the_message() {
        let (_dir, mut app) = app_with_store();
        app.start_quiz(settings());
        app.quiz_generated(Err(GenError::MissingApiKey));
        assert_eq!(app.screen, AppScreen::Error);
        assert!(app.error.as_deref().unwrap().contains("API key"));
    }

    #[test]
    fn successful_generation_starts_a_fresh_session() {
        let (_dir, mut app) = app_with_store();
        app.start_quiz(settings());
        app.quiz_generated(Ok(questions(2)));
        assert_eq!(app.screen, AppScreen::Quiz);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn completing_a_quiz_records_the_result() {
        let (_dir, mut app) = app_with_store();
        app.start_quiz(settings());
        app.quiz_generated(Ok(questions(2)));

        app.select_answer(0); // correct
        app.advance();
        app.select_answer(1); // wrong
        app.advance();

        assert_eq!(app.screen, AppScreen::Results);
        let recorded = app.store.as_ref().unwrap().list();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].subject, "Direito Constitucional");
        assert_eq!(recorded[0].total_questions, 2);
        assert_eq!(recorded[0].correct_answers, 1);
    }

    #[test]
    fn advance_does_not_finish_an_unanswered_last_question() {
        let (_dir, mut app) = app_with_store();
        app.start_quiz(settings());
        app.quiz_generated(Ok(questions(1)));
        app.advance();
        assert_eq!(app.screen, AppScreen::Quiz);
    }

    #[test]
    fn restart_reuses_identical_settings() {
        let (_dir, mut app) = app_with_store();
        app.start_quiz(settings());
        app.quiz_generated(Ok(questions(1)));
        app.select_answer(0);
        app.advance();

        let again = app.restart_quiz().unwrap();
        assert_eq!(again, settings());
        assert_eq!(app.screen, AppScreen::LoadingQuiz);
    }

    #[test]
    fn go_home_clears_all_transient_state() {
        let (_dir, mut app) = app_with_store();
        app.start_quiz(settings());
        app.quiz_generated(Err(GenError::MissingApiKey));
        app.go_home();
        assert_eq!(app.screen, AppScreen::Home);
        assert!(app.error.is_none());
        assert!(app.quiz_settings.is_none());
        assert!(app.session.is_none());
        assert!(app.study_plan.is_none());
    }

    #[test]
    fn plan_flow_accepts_non_empty_plans_only() {
        let (_dir, mut app) = app_with_store();
        let plan_settings = StudyPlanSettings {
            goal: "TRT".to_string(),
            subjects: vec!["Português".to_string()],
            hours_per_week: 10,
            duration_in_weeks: 8,
        };
        assert!(app.start_plan(plan_settings).is_some());
        assert_eq!(app.screen, AppScreen::LoadingPlan);

        app.plan_generated(Ok(StudyPlan {
            title: "t".to_string(),
            weekly_plan: Vec::new(),
        }));
        assert_eq!(app.screen, AppScreen::Error);
    }

    #[test]
    fn clearing_statistics_requires_a_confirmation_step() {
        let (_dir, mut app) = app_with_store();
        app.start_quiz(settings());
        app.quiz_generated(Ok(questions(1)));
        app.select_answer(0);
        app.advance();

        app.open_statistics();
        assert_eq!(app.stats_results.len(), 1);
        app.request_clear_stats();
        assert!(app.stats_confirm_clear);
        app.confirm_clear_stats();
        assert!(app.stats_results.is_empty());
        assert!(app.store.as_ref().unwrap().list().is_empty());
    }

    #[test]
    fn only_one_speech_request_at_a_time() {
        let (_dir, mut app) = app_with_store();
        app.start_quiz(settings());
        app.quiz_generated(Ok(questions(1)));

        let first = app.request_speech(SpeechKind::Question);
        assert!(first.is_some());
        assert!(app.request_speech(SpeechKind::Question).is_none());

        app.speech_ready(SpeechKind::Question, Err(GenError::NoAudio));
        assert!(!app.speaking);
        assert!(app.request_speech(SpeechKind::Question).is_some());
    }

    #[test]
    fn explanation_speech_needs_an_answered_question() {
        let (_dir, mut app) = app_with_store();
        app.start_quiz(settings());
        app.quiz_generated(Ok(questions(1)));

        assert!(app.request_speech(SpeechKind::Explanation).is_none());
        app.select_answer(2);
        assert!(app.request_speech(SpeechKind::Explanation).is_some());
    }

    #[test]
    fn banner_dismissal_survives_reconstruction() {
        let dir = TempDir::new().unwrap();
        {
            let store = StatsStore::with_base_dir(dir.path().to_path_buf()).unwrap();
            let mut app = App::with_store(Config::default(), Some(store));
            assert!(!app.banner_dismissed);
            app.dismiss_banner();
        }
        let store = StatsStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let app = App::with_store(Config::default(), Some(store));
        assert!(app.banner_dismissed);
    }
}
