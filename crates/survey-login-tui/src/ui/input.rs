//! Keyboard input handling for the TUI.
//!
//! Translates key events into application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_password_char, can_add_prompt_char, can_add_username_char, App, LoginFocus, PromptKind,
    Screen,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // An open prompt takes every key until it closes
    if app.prompt.is_some() {
        handle_prompt_input(app, key).await;
        return Ok(false);
    }

    match app.screen {
        Screen::Login => handle_login_input(app, key).await,
        Screen::Dashboard => handle_dashboard_input(app, key).await,
        Screen::SurveyDetail => handle_detail_input(app, key).await,
        Screen::Quitting => Ok(true),
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.quit();
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login.focus = match app.login.focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login.focus = match app.login.focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login.focus {
            LoginFocus::Username => {
                app.login.focus = LoginFocus::Password;
            }
            // Enter in the password field submits, like a browser form
            LoginFocus::Password | LoginFocus::Button => {
                app.submit_login().await;
            }
        },
        KeyCode::Backspace => match app.login.focus {
            LoginFocus::Username => {
                app.login.username.pop();
            }
            LoginFocus::Password => {
                app.login.password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login.focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login.username.chars().count(), c) {
                    app.login.username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login.password.chars().count(), c) {
                    app.login.password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_dashboard_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let max_index = app.surveys.len().saturating_sub(1);

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.quit();
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.survey_selection = (app.survey_selection + 1).min(max_index);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.survey_selection = app.survey_selection.saturating_sub(1);
        }
        KeyCode::Home | KeyCode::Char('g') => {
            app.survey_selection = 0;
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.survey_selection = max_index;
        }
        KeyCode::Enter => {
            app.open_selected_survey().await;
        }
        KeyCode::Char('n') => {
            app.start_prompt(PromptKind::NewSurvey);
        }
        KeyCode::Char('d') => {
            app.confirm_delete_selected();
        }
        KeyCode::Char('r') => {
            app.refresh_surveys(None).await;
        }
        KeyCode::Char('L') => {
            app.logout();
        }
        _ => {}
    }
    Ok(false)
}

async fn handle_detail_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let max_index = app.questions.len().saturating_sub(1);

    match key.code {
        KeyCode::Char('q') => {
            app.quit();
            return Ok(true);
        }
        KeyCode::Esc | KeyCode::Backspace => {
            app.close_survey();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.question_selection = (app.question_selection + 1).min(max_index);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.question_selection = app.question_selection.saturating_sub(1);
        }
        KeyCode::Char('a') => {
            app.start_prompt(PromptKind::NewQuestion);
        }
        KeyCode::Enter | KeyCode::Char('A') => {
            app.start_answer_selected();
        }
        KeyCode::Char('d') => {
            app.confirm_delete_selected();
        }
        KeyCode::Char('r') => {
            app.open_selected_survey().await;
        }
        _ => {}
    }
    Ok(false)
}

async fn handle_prompt_input(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.prompt.as_mut() else {
        return;
    };

    if !prompt.kind.takes_text() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.submit_prompt().await,
            _ => app.cancel_prompt(),
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Enter => app.submit_prompt().await,
        KeyCode::Backspace => {
            prompt.input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_prompt_char(prompt.input.chars().count(), c) {
                prompt.input.push(c);
            }
        }
        _ => {}
    }
}
