use std::collections::BTreeMap;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use survey_login_core::models::{Answer, NewSurvey, Question, Survey};
use survey_login_core::{
    ApiClient, ApiError, Config, LoginError, LoginOutcome, LoginSubmissionHandler, LoginView,
    SubmitEvent, TokenStore, DASHBOARD_TARGET,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for username input
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for survey titles, questions and answers typed in a prompt
const MAX_PROMPT_LENGTH: usize = 200;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    SurveyDetail,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

/// What an open prompt is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    NewSurvey,
    NewQuestion,
    Answer { question_id: i64 },
    ConfirmDelete { survey_id: i64 },
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::NewSurvey => " New survey title ",
            PromptKind::NewQuestion => " New question ",
            PromptKind::Answer { .. } => " Your answer ",
            PromptKind::ConfirmDelete { .. } => " Delete survey? (y/n) ",
        }
    }

    /// Prompts that take typed text rather than a yes/no
    pub fn takes_text(&self) -> bool {
        !matches!(self, PromptKind::ConfirmDelete { .. })
    }
}

/// Single-line input overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// The login form and its error line.
///
/// Implements `LoginView` so the submission handler can write the error
/// text and request navigation.
#[derive(Debug)]
pub struct LoginPage {
    pub username: String,
    pub password: String,
    pub focus: LoginFocus,
    pub error: Option<String>,
    navigate_to: Option<String>,
}

impl LoginPage {
    fn new(username: String, password: String) -> Self {
        let focus = if username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        Self {
            username,
            password,
            focus,
            error: None,
            navigate_to: None,
        }
    }

    fn take_navigation(&mut self) -> Option<String> {
        self.navigate_to.take()
    }
}

impl LoginView for LoginPage {
    fn set_error_text(&mut self, text: &str) {
        self.error = Some(text.to_string());
    }

    fn navigate(&mut self, target: &str) {
        self.navigate_to = Some(target.to_string());
    }
}

pub struct App {
    pub config: Config,
    handler: LoginSubmissionHandler<Box<dyn TokenStore>>,
    persist_config: bool,

    pub screen: Screen,
    pub login: LoginPage,
    pub prompt: Option<Prompt>,

    pub surveys: Vec<Survey>,
    pub survey_selection: usize,

    // Survey detail
    pub questions: Vec<Question>,
    pub question_selection: usize,
    pub responses: BTreeMap<String, Vec<String>>,

    pub status_message: Option<String>,
    /// Whether `status_message` reports a success rather than a failure
    pub status_is_notice: bool,
}

impl App {
    /// Create a new application instance using the configured token backend
    pub fn new(config: Config) -> Result<Self> {
        let store = config.token_store()?;

        // Prefill from env vars or the last successful login
        let username = std::env::var("SURVEY_USERNAME")
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();
        let password = std::env::var("SURVEY_PASSWORD").unwrap_or_default();

        let mut app = Self::with_store(config, store)?;
        app.login = LoginPage::new(username, password);
        app.persist_config = true;
        Ok(app)
    }

    /// Create an instance around an explicit token store.
    ///
    /// The config is never written back to disk.
    pub fn with_store(config: Config, store: Box<dyn TokenStore>) -> Result<Self> {
        let api = ApiClient::with_base_url(config.api_base_url.clone())?;
        debug!(base_url = %api.base_url(), backend = ?config.token_backend, "App configured");

        Ok(Self {
            config,
            handler: LoginSubmissionHandler::new(api, store),
            persist_config: false,
            screen: Screen::Login,
            login: LoginPage::new(String::new(), String::new()),
            prompt: None,
            surveys: Vec::new(),
            survey_selection: 0,
            questions: Vec::new(),
            question_selection: 0,
            responses: BTreeMap::new(),
            status_message: None,
            status_is_notice: false,
        })
    }

    /// Token left by an earlier login, if the store can be read
    pub fn stored_token(&self) -> Option<String> {
        match self.handler.store().token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                None
            }
        }
    }

    /// Skip the login form when a token is already stored
    pub async fn resume_session(&mut self) {
        if let Some(token) = self.stored_token() {
            info!("Resuming with stored token");
            self.open_dashboard(token).await;
        }
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Submit the login form
    pub async fn submit_login(&mut self) {
        let username = self.login.username.clone();
        let password = self.login.password.clone();
        let form = [("username", username.as_str()), ("password", password.as_str())];
        let mut event = SubmitEvent::new(&form);

        self.status_message = None;
        let result = self.handler.handle_submit(&mut event, &mut self.login).await;

        match result {
            Ok(LoginOutcome::LoggedIn { token }) => {
                self.login.password.clear();
                self.login.error = None;

                self.config.last_username = Some(username);
                if self.persist_config {
                    if let Err(e) = self.config.save() {
                        warn!(error = %e, "Failed to save config");
                    }
                }

                if let Some(target) = self.login.take_navigation() {
                    self.navigate(&target, token).await;
                }
            }
            Ok(LoginOutcome::Rejected { status, .. }) => {
                debug!(status = status.as_u16(), "Login form shows rejection");
            }
            Err(e) => {
                error!(error = %e, "Login request failed");
                self.report(Self::describe_failure(&e));
            }
        }
    }

    /// Status line text for failures the handler leaves unhandled
    fn describe_failure(e: &LoginError) -> String {
        match e {
            LoginError::Api(ApiError::NetworkError(inner)) if inner.is_timeout() => {
                "Connection timed out.".to_string()
            }
            LoginError::Api(ApiError::NetworkError(_)) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            other => format!("Error: {}", other),
        }
    }

    async fn navigate(&mut self, target: &str, token: String) {
        if target == DASHBOARD_TARGET {
            self.open_dashboard(token).await;
        } else {
            warn!(target = %target, "Unknown navigation target");
        }
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    async fn open_dashboard(&mut self, token: String) {
        self.screen = Screen::Dashboard;
        self.refresh_surveys(Some(token)).await;
    }

    /// Client carrying the stored token, or back to the login form if there is none
    fn authed_api(&mut self) -> Option<ApiClient> {
        match self.stored_token() {
            Some(token) => Some(self.handler.api().with_token(token)),
            None => {
                self.logout();
                None
            }
        }
    }

    /// Reload the survey list with the stored token
    pub async fn refresh_surveys(&mut self, token: Option<String>) {
        let api = match token {
            Some(token) => self.handler.api().with_token(token),
            None => match self.authed_api() {
                Some(api) => api,
                None => return,
            },
        };

        match api.fetch_my_surveys().await {
            Ok(surveys) => {
                debug!(count = surveys.len(), "Surveys loaded");
                self.survey_selection = self.survey_selection.min(surveys.len().saturating_sub(1));
                self.surveys = surveys;
                self.status_message = None;
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch surveys");
                self.report(format!("Could not load surveys: {}", e));
            }
        }
    }

    /// Forget the token and go back to the login form
    pub fn logout(&mut self) {
        if let Err(e) = self.handler.store().clear() {
            warn!(error = %e, "Failed to clear stored token");
        }
        self.surveys.clear();
        self.survey_selection = 0;
        self.clear_detail();
        self.prompt = None;
        self.login.focus = if self.login.username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.screen = Screen::Login;
    }

    pub fn selected_survey(&self) -> Option<&Survey> {
        self.surveys.get(self.survey_selection)
    }

    pub fn selected_question(&self) -> Option<&Question> {
        self.questions.get(self.question_selection)
    }

    // =========================================================================
    // Survey detail
    // =========================================================================

    /// Show questions and responses for the selected survey
    pub async fn open_selected_survey(&mut self) {
        let Some(survey_id) = self.selected_survey().map(|s| s.survey_id) else {
            return;
        };
        self.clear_detail();
        self.screen = Screen::SurveyDetail;
        self.load_survey_detail(survey_id).await;
    }

    pub fn close_survey(&mut self) {
        self.clear_detail();
        self.screen = Screen::Dashboard;
    }

    fn clear_detail(&mut self) {
        self.questions.clear();
        self.question_selection = 0;
        self.responses.clear();
    }

    async fn load_survey_detail(&mut self, survey_id: i64) {
        let Some(api) = self.authed_api() else {
            return;
        };

        match api.fetch_questions(survey_id).await {
            Ok(questions) => {
                self.question_selection =
                    self.question_selection.min(questions.len().saturating_sub(1));
                self.questions = questions;
            }
            Err(e) => {
                error!(error = %e, survey_id, "Failed to fetch questions");
                self.report(format!("Could not load questions: {}", e));
                return;
            }
        }

        match api.fetch_responses(survey_id).await {
            Ok(responses) => self.responses = responses,
            Err(e) => {
                error!(error = %e, survey_id, "Failed to fetch responses");
                self.report(format!("Could not load responses: {}", e));
            }
        }
    }

    // =========================================================================
    // Prompts
    // =========================================================================

    pub fn start_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt {
            kind,
            input: String::new(),
        });
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Ask before deleting the selected survey
    pub fn confirm_delete_selected(&mut self) {
        if let Some(survey_id) = self.selected_survey().map(|s| s.survey_id) {
            self.start_prompt(PromptKind::ConfirmDelete { survey_id });
        }
    }

    /// Ask for an answer to the selected question
    pub fn start_answer_selected(&mut self) {
        if let Some(question_id) = self.selected_question().map(|q| q.question_id) {
            self.start_prompt(PromptKind::Answer { question_id });
        }
    }

    /// Act on the open prompt and close it
    pub async fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let text = prompt.input.trim().to_string();
        if prompt.kind.takes_text() && text.is_empty() {
            self.report("Nothing entered".to_string());
            return;
        }

        match prompt.kind {
            PromptKind::NewSurvey => self.create_survey(text).await,
            PromptKind::NewQuestion => self.add_question(text).await,
            PromptKind::Answer { question_id } => self.answer_question(question_id, text).await,
            PromptKind::ConfirmDelete { survey_id } => self.delete_survey(survey_id).await,
        }
    }

    async fn create_survey(&mut self, title: String) {
        let Some(api) = self.authed_api() else {
            return;
        };
        let survey = NewSurvey {
            title,
            description: None,
        };
        match api.create_survey(&survey).await {
            Ok(message) => {
                info!(title = %survey.title, "Survey created");
                self.refresh_surveys(None).await;
                self.notify(message);
            }
            Err(e) => {
                error!(error = %e, "Failed to create survey");
                self.report(format!("Could not create survey: {}", e));
            }
        }
    }

    async fn delete_survey(&mut self, survey_id: i64) {
        let Some(api) = self.authed_api() else {
            return;
        };
        match api.delete_survey(survey_id).await {
            Ok(message) => {
                info!(survey_id, "Survey deleted");
                self.close_survey();
                self.refresh_surveys(None).await;
                self.notify(message);
            }
            Err(e) => {
                error!(error = %e, survey_id, "Failed to delete survey");
                self.report(format!("Delete failed: {}", e));
            }
        }
    }

    async fn add_question(&mut self, text: String) {
        let Some(survey_id) = self.selected_survey().map(|s| s.survey_id) else {
            return;
        };
        let Some(api) = self.authed_api() else {
            return;
        };
        match api.add_question(survey_id, &text).await {
            Ok(message) => {
                self.load_survey_detail(survey_id).await;
                self.notify(message);
            }
            Err(e) => {
                error!(error = %e, survey_id, "Failed to add question");
                self.report(format!("Could not add question: {}", e));
            }
        }
    }

    async fn answer_question(&mut self, question_id: i64, text: String) {
        let Some(survey_id) = self.selected_survey().map(|s| s.survey_id) else {
            return;
        };
        let Some(api) = self.authed_api() else {
            return;
        };
        let answer = Answer {
            question_id,
            answer: text,
        };
        match api.submit_answer(survey_id, &answer).await {
            Ok(message) => {
                self.load_survey_detail(survey_id).await;
                self.notify(message);
            }
            Err(e) => {
                error!(error = %e, survey_id, question_id, "Failed to submit answer");
                self.report(format!("Could not submit answer: {}", e));
            }
        }
    }

    fn report(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_is_notice = false;
    }

    fn notify(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_is_notice = true;
    }

    pub fn quit(&mut self) {
        self.screen = Screen::Quitting;
    }
}

// ============================================================================
// Input Validation
// ============================================================================

/// Check if a character is valid for text input (printable, non-control)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if a prompt character should be accepted
pub fn can_add_prompt_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PROMPT_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use survey_login_core::MemoryTokenStore;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn app_against(base_url: &str) -> (App, Arc<MemoryTokenStore>) {
        let store = Arc::new(MemoryTokenStore::new());
        let config = Config {
            api_base_url: base_url.to_string(),
            ..Config::default()
        };
        let mut app = App::with_store(config, Box::new(Arc::clone(&store))).unwrap();
        app.login.username = "alice".to_string();
        app.login.password = "hunter2".to_string();
        (app, store)
    }

    async fn mount_surveys(server: &MockServer, surveys: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/surveys/my-surveys"))
            .and(header("authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "surveys": surveys })))
            .mount(server)
            .await;
    }

    #[test]
    fn test_can_add_username_char() {
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(49, 'z'));
        assert!(!can_add_username_char(50, 'a'));
        assert!(!can_add_username_char(0, '\n'));
        assert!(!can_add_username_char(0, '\t'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, '!'));
        assert!(can_add_password_char(127, ' '));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
    }

    #[test]
    fn test_login_page_records_view_writes() {
        let mut page = LoginPage::new(String::new(), String::new());
        assert_eq!(page.focus, LoginFocus::Username);

        page.set_error_text("Invalid password");
        assert_eq!(page.error.as_deref(), Some("Invalid password"));

        page.navigate("dashboard.html");
        assert_eq!(page.take_navigation().as_deref(), Some("dashboard.html"));
        assert!(page.take_navigation().is_none());
    }

    #[test]
    fn test_prefilled_username_focuses_password() {
        let page = LoginPage::new("alice".to_string(), String::new());
        assert_eq!(page.focus, LoginFocus::Password);
    }

    #[test]
    fn test_prompt_char_counts_characters_not_bytes() {
        let title = "ééééé";
        assert_eq!(title.len(), 10);
        assert!(can_add_prompt_char(title.chars().count(), 'é'));
        assert!(!can_add_prompt_char(MAX_PROMPT_LENGTH, 'a'));
    }

    #[test]
    fn test_username_limit_counts_multibyte_characters_once() {
        let username: String = std::iter::repeat('ß').take(30).collect();
        // 60 bytes, but only 30 characters
        assert!(username.len() > MAX_USERNAME_LENGTH);
        assert!(can_add_username_char(username.chars().count(), 'ß'));
    }

    #[tokio::test]
    async fn test_successful_login_opens_dashboard() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"username": "alice", "password": "hunter2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
            .expect(1)
            .mount(&server)
            .await;
        mount_surveys(&server, json!([{"survey_id": 1, "title": "Team lunch"}])).await;

        let (mut app, store) = app_against(&server.uri());
        app.submit_login().await;

        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(store.get("token").as_deref(), Some("abc123"));
        assert!(app.login.error.is_none());
        assert!(app.login.password.is_empty());
        assert_eq!(app.config.last_username.as_deref(), Some("alice"));
        assert_eq!(app.surveys.len(), 1);
        assert_eq!(app.surveys[0].title, "Team lunch");
    }

    #[tokio::test]
    async fn test_rejected_login_stays_on_form_with_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid password"})))
            .mount(&server)
            .await;

        let (mut app, store) = app_against(&server.uri());
        app.submit_login().await;

        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.login.error.as_deref(), Some("Invalid password"));
        assert!(app.status_message.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_on_status_line() {
        let (mut app, store) = app_against("http://127.0.0.1:1");
        app.submit_login().await;

        assert_eq!(app.screen, Screen::Login);
        assert!(app.login.error.is_none());
        let message = app.status_message.as_deref().unwrap();
        assert!(message.contains("Unable to connect") || message.contains("timed out"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_stored_token_resumes_session() {
        let server = MockServer::start().await;
        mount_surveys(&server, json!([])).await;

        let (mut app, store) = app_against(&server.uri());
        store.set_token("abc123").unwrap();
        app.resume_session().await;

        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.surveys.is_empty());
    }

    #[tokio::test]
    async fn test_open_survey_loads_questions_and_responses() {
        let server = MockServer::start().await;
        mount_surveys(&server, json!([{"survey_id": 7, "title": "Lunch"}])).await;
        Mock::given(method("GET"))
            .and(path("/api/surveys/7/questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "questions": [{"question_id": 3, "question_text": "Favourite lunch?"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/surveys/7/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responses": {"Favourite lunch?": ["Tacos"]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, store) = app_against(&server.uri());
        store.set_token("abc123").unwrap();
        app.resume_session().await;
        app.open_selected_survey().await;

        assert_eq!(app.screen, Screen::SurveyDetail);
        assert_eq!(app.selected_question().map(|q| q.question_id), Some(3));
        assert_eq!(app.responses["Favourite lunch?"], vec!["Tacos"]);

        app.close_survey();
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.questions.is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_survey_and_refreshes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/surveys/7/delete"))
            .and(header("authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Survey deleted"})))
            .expect(1)
            .mount(&server)
            .await;
        // First listing shows the survey, the refresh after delete does not
        Mock::given(method("GET"))
            .and(path("/api/surveys/my-surveys"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "surveys": [{"survey_id": 7, "title": "Lunch"}]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_surveys(&server, json!([])).await;

        let (mut app, store) = app_against(&server.uri());
        store.set_token("abc123").unwrap();
        app.resume_session().await;
        assert_eq!(app.surveys.len(), 1);

        app.confirm_delete_selected();
        assert_eq!(
            app.prompt.as_ref().map(|p| p.kind),
            Some(PromptKind::ConfirmDelete { survey_id: 7 })
        );
        app.submit_prompt().await;

        assert!(app.prompt.is_none());
        assert!(app.surveys.is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Survey deleted"));
        assert!(app.status_is_notice);
    }

    #[tokio::test]
    async fn test_empty_prompt_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/surveys"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "Survey created"})))
            .expect(0)
            .mount(&server)
            .await;

        let (mut app, store) = app_against(&server.uri());
        store.set_token("abc123").unwrap();
        app.start_prompt(PromptKind::NewSurvey);
        app.prompt.as_mut().unwrap().input = "   ".to_string();
        app.submit_prompt().await;

        assert!(app.prompt.is_none());
        assert_eq!(app.status_message.as_deref(), Some("Nothing entered"));
        assert!(!app.status_is_notice);
    }

    #[tokio::test]
    async fn test_action_without_stored_token_returns_to_login() {
        let (mut app, _store) = app_against("http://127.0.0.1:1");
        app.screen = Screen::Dashboard;
        app.start_prompt(PromptKind::NewSurvey);
        app.prompt.as_mut().unwrap().input = "Offsite".to_string();
        app.submit_prompt().await;

        assert_eq!(app.screen, Screen::Login);
    }
}
