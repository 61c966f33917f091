//! Wire types for the Survey API.
//!
//! - `Credentials`, `AuthResponse`: login request and response bodies
//! - `SignupRequest`, `MessageResponse`: account creation
//! - `Survey`, `SurveysResponse`: the dashboard listing
//! - `Question`, `Answer`, `ResponsesResponse`: survey contents and results

pub mod auth;
pub mod survey;

pub use auth::{AuthResponse, Credentials, MessageResponse, SignupRequest};
pub use survey::{
    Answer, NewQuestion, NewSurvey, Question, QuestionsResponse, ResponsesResponse, Survey,
    SurveysResponse,
};
