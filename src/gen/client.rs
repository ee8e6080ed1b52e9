use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;
use crate::r#gen::prompt;
use crate::r#gen::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::model::{OPTIONS_PER_QUESTION, QuizQuestion, QuizSettings, StudyPlan, StudyPlanSettings};

const QUIZ_TEMPERATURE: f32 = 0.8;
const PLAN_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("no API key configured (set GEMINI_API_KEY or api_key in the config file)")]
    MissingApiKey,
    #[error("request to the generation service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("the service response contained no content")]
    EmptyResponse,
    #[error("could not decode the service response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid generated content: {0}")]
    InvalidPayload(String),
    #[error("the service returned no audio payload")]
    NoAudio,
}

/// Client for the remote generation service. One attempt per call, no
/// retries, no caching; every failure surfaces immediately to the caller.
#[derive(Clone)]
pub struct GenClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    tts_model: String,
    tts_voice: String,
}

impl GenClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            model: config.model.clone(),
            tts_model: config.tts_model.clone(),
            tts_voice: config.tts_voice.clone(),
        }
    }

    pub fn generate_quiz(&self, settings: &QuizSettings) -> Result<Vec<QuizQuestion>, GenError> {
        let request = GenerateContentRequest::json(&prompt::quiz(settings), QUIZ_TEMPERATURE);
        let response = self.call(&self.model, &request)?;
        let text = response.first_text().ok_or(GenError::EmptyResponse)?;
        parse_quiz(text)
    }

    pub fn generate_study_plan(
        &self,
        settings: &StudyPlanSettings,
    ) -> Result<StudyPlan, GenError> {
        let request =
            GenerateContentRequest::json(&prompt::study_plan(settings), PLAN_TEMPERATURE);
        let response = self.call(&self.model, &request)?;
        let text = response.first_text().ok_or(GenError::EmptyResponse)?;
        parse_study_plan(text)
    }

    /// Fetch a spoken rendition of `text`. Returns raw PCM bytes (24 kHz,
    /// mono, 16-bit little-endian — the service's inline audio format).
    pub fn generate_speech(&self, text: &str) -> Result<Vec<u8>, GenError> {
        let request = GenerateContentRequest::speech(&prompt::speech(text), &self.tts_voice);
        let response = self.call(&self.tts_model, &request)?;
        let encoded = response.first_inline_data().ok_or(GenError::NoAudio)?;
        BASE64
            .decode(encoded)
            .map_err(|e| GenError::InvalidPayload(format!("audio payload is not valid base64: {e}")))
    }

    fn call(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenError> {
        let api_key = self.api_key.as_deref().ok_or(GenError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        log::debug!("generation request: model={model}");
        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            log::warn!("generation request failed: {status}");
            return Err(GenError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json()?)
    }
}

#[derive(Deserialize)]
struct QuizPayload {
    questions: Vec<QuizQuestion>,
}

/// Decode and structurally validate a quiz payload. An empty question list is
/// passed through — the flow controller treats it as failure-equivalent, the
/// same path as a decode error.
pub fn parse_quiz(text: &str) -> Result<Vec<QuizQuestion>, GenError> {
    let payload: QuizPayload = serde_json::from_str(text.trim())?;
    for (i, q) in payload.questions.iter().enumerate() {
        if q.options.len() != OPTIONS_PER_QUESTION {
            return Err(GenError::InvalidPayload(format!(
                "question {} has {} options, expected {}",
                i + 1,
                q.options.len(),
                OPTIONS_PER_QUESTION
            )));
        }
        if q.correct_answer_index >= q.options.len() {
            return Err(GenError::InvalidPayload(format!(
                "question {} answer index {} out of range",
                i + 1,
                q.correct_answer_index
            )));
        }
    }
    Ok(payload.questions)
}

pub fn parse_study_plan(text: &str) -> Result<StudyPlan, GenError> {
    let plan: StudyPlan = serde_json::from_str(text.trim())?;
    if plan.weekly_plan.is_empty() {
        return Err(GenError::InvalidPayload(
            "study plan has no weeks".to_string(),
        ));
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_json(correct: usize, options: usize) -> String {
        let opts: Vec<String> = (0..options).map(|i| format!("\"op{i}\"")).collect();
        format!(
            r#"{{"question":"q?","options":[{}],"correctAnswerIndex":{},"explanation":"e","banca":"FGV"}}"#,
            opts.join(","),
            correct
        )
    }

    #[test]
    fn parse_quiz_accepts_valid_payload() {
        let text = format!(r#"{{"questions":[{},{}]}}"#, question_json(0, 5), question_json(4, 5));
        let questions = parse_quiz(&text).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].correct_answer_index, 4);
    }

    #[test]
    fn parse_quiz_passes_empty_list_through() {
        // The caller decides: an empty list takes the same error path as a
        // decode failure.
        assert!(parse_quiz(r#"{"questions":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn parse_quiz_rejects_missing_questions_property() {
        assert!(matches!(parse_quiz(r#"{"foo":1}"#), Err(GenError::Parse(_))));
    }

    #[test]
    fn parse_quiz_rejects_wrapping_text() {
        let err = parse_quiz("```json\n{\"questions\":[]}\n```").unwrap_err();
        assert!(matches!(err, GenError::Parse(_)));
    }

    #[test]
    fn parse_quiz_rejects_wrong_option_count() {
        let text = format!(r#"{{"questions":[{}]}}"#, question_json(0, 4));
        let err = parse_quiz(&text).unwrap_err();
        assert!(matches!(err, GenError::InvalidPayload(_)));
    }

    #[test]
    fn parse_quiz_rejects_out_of_range_answer() {
        let text = format!(r#"{{"questions":[{}]}}"#, question_json(5, 5));
        let err = parse_quiz(&text).unwrap_err();
        assert!(matches!(err, GenError::InvalidPayload(_)));
    }

    #[test]
    fn parse_study_plan_rejects_empty_weeks() {
        let err = parse_study_plan(r#"{"title":"Plano","weeklyPlan":[]}"#).unwrap_err();
        assert!(matches!(err, GenError::InvalidPayload(_)));
    }

    #[test]
    fn parse_study_plan_accepts_minimal_plan() {
        let text = r#"{
            "title": "Plano TRT",
            "weeklyPlan": [{
                "week": 1,
                "focus": "Português",
                "dailySchedule": [{
                    "day": "Segunda-feira",
                    "activities": [{"subject":"Português","activity":"Leitura","duration":"1 hora"}]
                }]
            }]
        }"#;
        let plan = parse_study_plan(text).unwrap();
        assert_eq!(plan.weekly_plan.len(), 1);
        assert_eq!(plan.weekly_plan[0].daily_schedule[0].activities.len(), 1);
    }
}
