use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

/// A survey owned by the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct Survey {
    pub survey_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
}

impl Survey {
    /// Description for list display, empty when the survey has none
    pub fn description_display(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Body of `GET /api/surveys/my-surveys`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveysResponse {
    #[serde(default)]
    pub surveys: Vec<Survey>,
}

/// Body of `POST /api/surveys`.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct NewSurvey {
    pub title: String,
    pub description: Option<String>,
}

/// A question belonging to a survey.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct Question {
    pub question_id: i64,
    pub question_text: String,
}

/// Body of `GET /api/surveys/<id>/questions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionsResponse {
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Body of `POST /api/surveys/<id>/add-question`.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct NewQuestion {
    pub question_text: String,
}

/// Body of `POST /api/surveys/<id>/answer`.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct Answer {
    pub question_id: i64,
    pub answer: String,
}

/// Body of `GET /api/surveys/<id>/responses`: answers grouped by question text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub responses: BTreeMap<String, Vec<String>>,
}
