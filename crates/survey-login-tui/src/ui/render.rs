use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, LoginFocus, Prompt, Screen};

use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(8),    // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    match app.screen {
        Screen::Dashboard => render_dashboard(frame, app, chunks[1]),
        Screen::SurveyDetail => render_survey_detail(frame, app, chunks[1]),
        Screen::Login | Screen::Quitting => {}
    }
    render_status_bar(frame, app, chunks[2]);

    if matches!(app.screen, Screen::Login) {
        render_login_form(frame, app);
    }
    if let Some(ref prompt) = app.prompt {
        render_prompt(frame, prompt);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Survey Site";
    let host = app.config.api_base_url.as_str();

    let title_line = Line::from(vec![
        Span::styled(title, styles::brand_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + host.len() + 4),
        )),
        Span::styled(host, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = match app.screen {
        Screen::Login => &[("Tab", "next field"), ("Enter", "sign in"), ("Esc", "quit")],
        Screen::Dashboard => &[
            ("j/k", "move"),
            ("Enter", "open"),
            ("n", "new"),
            ("d", "delete"),
            ("r", "refresh"),
            ("L", "log out"),
            ("q", "quit"),
        ],
        Screen::SurveyDetail => &[
            ("j/k", "move"),
            ("A", "answer"),
            ("a", "add question"),
            ("d", "delete"),
            ("Esc", "back"),
        ],
        Screen::Quitting => &[],
    };

    let mut spans = vec![Span::raw(" ")];
    if let Some(ref message) = app.status_message {
        let style = if app.status_is_notice {
            styles::notice_style()
        } else {
            styles::error_style()
        };
        spans.push(Span::styled(message.clone(), style));
        spans.push(Span::raw("  "));
    }
    for (key, desc) in hints {
        spans.push(Span::styled(*key, styles::help_key_style()));
        spans.push(Span::raw(format!(" {}  ", desc)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let items: Vec<ListItem> = app
        .surveys
        .iter()
        .map(|s| ListItem::new(s.title.clone()).style(styles::text_style()))
        .collect();

    let list_title = format!(" My Surveys ({}) ", app.surveys.len());
    let list = List::new(items)
        .block(
            Block::default()
                .title(list_title)
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    if !app.surveys.is_empty() {
        state.select(Some(app.survey_selection));
    }
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let detail = match app.selected_survey() {
        Some(survey) => {
            let description = survey.description_display();
            vec![
                Line::from(Span::styled(survey.title.clone(), styles::heading_style())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("ID: ", styles::muted_style()),
                    Span::raw(survey.survey_id.to_string()),
                ]),
                Line::from(""),
                Line::from(if description.is_empty() {
                    Span::styled("No description", styles::muted_style())
                } else {
                    Span::raw(description.to_string())
                }),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter to view questions and responses",
                    styles::muted_style(),
                )),
            ]
        }
        None => vec![Line::from(Span::styled(
            "No surveys yet",
            styles::muted_style(),
        ))],
    };

    let paragraph = Paragraph::new(detail)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Details ")
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        );
    frame.render_widget(paragraph, chunks[1]);
}

fn render_login_form(frame: &mut Frame, app: &App) {
    let login = &app.login;
    let height = if login.error.is_some() { 12 } else { 10 };
    let area = centered_rect_fixed(46, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("           ╔═╗╦ ╦╦═╗╦  ╦╔═╗╦ ╦", styles::brand_style())),
        Line::from(Span::styled("           ╚═╗║ ║╠╦╝╚╗╔╝║╣ ╚╦╝", styles::brand_style())),
        Line::from(Span::styled("           ╚═╝╚═╝╩╚═ ╚╝ ╚═╝ ╩ ", styles::brand_style())),
        Line::from(""),
    ];

    let username_focused = login.focus == LoginFocus::Username;
    let username_style = if username_focused {
        styles::selected_style()
    } else {
        styles::text_style()
    };
    let cursor = if username_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("Username: [", styles::muted_style()),
        Span::styled(format!("{:<16}{}", tail(&login.username, 16), cursor), username_style),
        Span::styled("]", styles::muted_style()),
    ]));

    let password_focused = login.focus == LoginFocus::Password;
    let password_style = if password_focused {
        styles::selected_style()
    } else {
        styles::text_style()
    };
    let masked = "*".repeat(login.password.chars().count().min(16));
    let cursor = if password_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(format!("{:<16}{}", masked, cursor), password_style),
        Span::styled("]", styles::muted_style()),
    ]));

    let button_focused = login.focus == LoginFocus::Button;
    let (label, button_style) = if button_focused {
        (" ▶ Login ◀ ", styles::selected_style())
    } else {
        ("   Login   ", styles::text_style())
    };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("            ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    // Error element
    if let Some(ref error) = login.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_survey_detail(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let title = app
        .selected_survey()
        .map(|s| s.title.as_str())
        .unwrap_or("Survey");

    let items: Vec<ListItem> = app
        .questions
        .iter()
        .map(|q| ListItem::new(q.question_text.clone()).style(styles::question_style()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" {} - Questions ({}) ", title, app.questions.len()))
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    if !app.questions.is_empty() {
        state.select(Some(app.question_selection));
    }
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let lines = response_lines(app);
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Responses ")
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(paragraph, chunks[1]);
}

/// Answers grouped under their question text
fn response_lines(app: &App) -> Vec<Line<'static>> {
    if app.responses.is_empty() {
        return vec![Line::from(Span::styled("No responses yet", styles::muted_style()))];
    }

    let mut lines = Vec::new();
    for (question, answers) in &app.responses {
        lines.push(Line::from(Span::styled(question.clone(), styles::question_style())));
        for answer in answers {
            lines.push(Line::from(vec![
                Span::styled("  • ", styles::muted_style()),
                Span::styled(answer.clone(), styles::answer_style()),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn render_prompt(frame: &mut Frame, prompt: &Prompt) {
    let destructive = !prompt.kind.takes_text();
    let area = centered_rect_fixed(56, 3, frame.area());
    frame.render_widget(Clear, area);

    let body = if destructive {
        Line::from(vec![
            Span::styled("y", styles::help_key_style()),
            Span::raw(" delete   "),
            Span::styled("any other key", styles::help_key_style()),
            Span::raw(" keep"),
        ])
    } else {
        Line::from(vec![
            Span::styled(tail(&prompt.input, 50), styles::text_style()),
            Span::styled("▌", styles::muted_style()),
        ])
    };

    let block = Block::default()
        .title(prompt.kind.title())
        .borders(Borders::ALL)
        .border_style(styles::prompt_border_style(destructive));

    frame.render_widget(Paragraph::new(body).block(block), area);
}

/// Last `width` characters of `s`, so the cursor end stays visible
fn tail(s: &str, width: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(width)).collect()
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_keeps_end_of_long_input() {
        assert_eq!(tail("alice", 16), "alice");
        assert_eq!(tail("abcdefghijklmnopqrstuvwxyz", 4), "wxyz");
        assert_eq!(tail("", 4), "");
    }

    #[test]
    fn test_response_lines_group_answers_under_questions() {
        let mut app = App::with_store(
            survey_login_core::Config::default(),
            Box::new(survey_login_core::MemoryTokenStore::new()),
        )
        .unwrap();
        assert_eq!(response_lines(&app).len(), 1);

        app.responses
            .insert("Budget?".to_string(), vec!["20".to_string(), "30".to_string()]);
        app.responses
            .insert("Where?".to_string(), vec!["Park".to_string()]);

        // question, answers, blank spacer per group
        let lines = response_lines(&app);
        assert_eq!(lines.len(), 4 + 3);
        assert_eq!(lines[0].to_string(), "Budget?");
        assert_eq!(lines[1].to_string(), "  • 20");
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let outer = Rect::new(0, 0, 30, 8);
        let rect = centered_rect_fixed(46, 12, outer);
        assert_eq!(rect.width, 30);
        assert_eq!(rect.height, 8);

        let outer = Rect::new(0, 0, 100, 40);
        let rect = centered_rect_fixed(46, 12, outer);
        assert_eq!((rect.x, rect.y), (27, 14));
    }
}
