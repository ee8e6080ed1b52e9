mod app;
mod audio;
mod config;
mod event;
mod r#gen;
mod model;
mod session;
mod stats;
mod store;
mod ui;

use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{App, AppScreen};
use event::{
    AppEvent, EventHandler, SpeechKind, spawn_plan_generation, spawn_quiz_generation,
    spawn_speech_generation,
};
use r#gen::GenClient;
use ui::components::FormOutcome;
use ui::components::error_screen::ErrorScreen;
use ui::components::home::Banner;
use ui::components::loading::LoadingScreen;
use ui::components::plan_config::PlanConfigScreen;
use ui::components::question_card::QuestionCard;
use ui::components::quiz_config::QuizConfigScreen;
use ui::components::results::ResultsScreen;
use ui::components::stats_screen::StatsScreen;
use ui::components::study_plan::StudyPlanScreen;

#[derive(Parser)]
#[command(
    name = "simulado",
    version,
    about = "Terminal exam-prep simulator with AI-generated quizzes and study plans"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Generation model override")]
    model: Option<String>,

    #[arg(long, help = "Request timeout for generation calls, in seconds")]
    timeout: Option<u64>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut app = App::new();
    if let Err(e) = app.config.ensure_saved() {
        log::warn!("could not write config scaffold: {e}");
    }

    if cli.model.is_some() || cli.timeout.is_some() {
        if let Some(model) = cli.model {
            app.config.model = model;
        }
        if let Some(timeout) = cli.timeout {
            app.config.request_timeout_secs = timeout;
        }
        app.r#gen = GenClient::new(&app.config);
    }
    if let Some(theme_name) = cli.theme
        && let Some(theme) = ui::theme::Theme::load(&theme_name)
    {
        let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
        app.theme = theme;
        app.menu.theme = theme;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(std::time::Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, events),
            AppEvent::Tick => app.tick = app.tick.wrapping_add(1),
            AppEvent::Resize(_, _) => {}
            AppEvent::QuizReady(outcome) => app.quiz_generated(outcome),
            AppEvent::PlanReady(outcome) => app.plan_generated(outcome),
            AppEvent::SpeechReady(kind, outcome) => app.speech_ready(kind, outcome),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::QuizConfig => match app.quiz_form.handle(key) {
            FormOutcome::Submit(settings) => {
                if let Some(settings) = app.start_quiz(settings) {
                    spawn_quiz_generation(app.r#gen.clone(), settings, events.sender());
                }
            }
            FormOutcome::Back => app.go_home(),
            FormOutcome::Continue => {}
        },
        // No cancel path: the outstanding request runs to its single outcome
        AppScreen::LoadingQuiz | AppScreen::LoadingPlan => {}
        AppScreen::Quiz => handle_quiz_key(app, key, events),
        AppScreen::Results => handle_results_key(app, key, events),
        AppScreen::PlanConfig => match app.plan_form.handle(key) {
            FormOutcome::Submit(settings) => {
                if let Some(settings) = app.start_plan(settings) {
                    spawn_plan_generation(app.r#gen.clone(), settings, events.sender());
                }
            }
            FormOutcome::Back => app.go_home(),
            FormOutcome::Continue => {}
        },
        AppScreen::StudyPlan => handle_study_plan_key(app, key),
        AppScreen::Statistics => handle_stats_key(app, key),
        AppScreen::Error => {
            if matches!(key.code, KeyCode::Char('h') | KeyCode::Enter | KeyCode::Esc) {
                app.go_home();
            }
        }
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.open_quiz_config(),
        KeyCode::Char('2') => app.open_plan_config(),
        KeyCode::Char('3') => app.open_statistics(),
        KeyCode::Char('x') => {
            if !app.banner_dismissed {
                app.dismiss_banner();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => app.open_quiz_config(),
            1 => app.open_plan_config(),
            2 => app.open_statistics(),
            3 => app.should_quit = true,
            _ => {}
        },
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    match key.code {
        KeyCode::Char(ch @ 'a'..='e') => app.select_answer(ch as usize - 'a' as usize),
        KeyCode::Char(ch @ '1'..='5') => app.select_answer(ch as usize - '1' as usize),
        KeyCode::Right | KeyCode::Char('n') | KeyCode::Enter => {
            // Forward navigation opens up once the current question is answered
            if app.session.as_ref().is_some_and(|s| s.current_answered()) {
                app.advance();
            }
        }
        KeyCode::Left | KeyCode::Char('p') => app.retreat(),
        KeyCode::Char('t') => {
            if let Some(text) = app.request_speech(SpeechKind::Question) {
                spawn_speech_generation(
                    app.r#gen.clone(),
                    SpeechKind::Question,
                    text,
                    events.sender(),
                );
            }
        }
        KeyCode::Char('f') => {
            if let Some(text) = app.request_speech(SpeechKind::Explanation) {
                spawn_speech_generation(
                    app.r#gen.clone(),
                    SpeechKind::Explanation,
                    text,
                    events.sender(),
                );
            }
        }
        KeyCode::Down => app.quiz_scroll = app.quiz_scroll.saturating_add(1),
        KeyCode::Up => app.quiz_scroll = app.quiz_scroll.saturating_sub(1),
        KeyCode::Char('h') | KeyCode::Esc => app.go_home(),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    match key.code {
        KeyCode::Char('r') => {
            if let Some(settings) = app.restart_quiz() {
                spawn_quiz_generation(app.r#gen.clone(), settings, events.sender());
            }
        }
        KeyCode::Char('h') | KeyCode::Esc => app.go_home(),
        KeyCode::Down | KeyCode::Char('j') => {
            app.results_scroll = app.results_scroll.saturating_add(1);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.results_scroll = app.results_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_study_plan_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('n') => app.new_plan(),
        KeyCode::Char('q') => app.open_quiz_config(),
        KeyCode::Char('h') | KeyCode::Esc => app.go_home(),
        KeyCode::Down | KeyCode::Char('j') => {
            let max = app
                .study_plan
                .as_ref()
                .map(|p| StudyPlanScreen::line_count(p) as u16)
                .unwrap_or(0);
            app.plan_scroll = (app.plan_scroll + 1).min(max);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.plan_scroll = app.plan_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    if app.stats_confirm_clear {
        match key.code {
            KeyCode::Char('y') => app.confirm_clear_stats(),
            KeyCode::Char('n') | KeyCode::Esc => app.cancel_clear_stats(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('x') | KeyCode::Delete => app.request_clear_stats(),
        KeyCode::Char('h') | KeyCode::Char('q') | KeyCode::Esc => app.go_home(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Home => render_home(frame, app),
        AppScreen::QuizConfig => render_quiz_config(frame, app),
        AppScreen::LoadingQuiz => render_loading(
            frame,
            app,
            "Generating your quiz",
            "The AI is preparing your questions",
        ),
        AppScreen::LoadingPlan => render_loading(
            frame,
            app,
            "Building your study plan",
            "The AI is laying out your weekly schedule",
        ),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::Results => render_results(frame, app),
        AppScreen::PlanConfig => render_plan_config(frame, app),
        AppScreen::StudyPlan => render_study_plan(frame, app),
        AppScreen::Statistics => render_statistics(frame, app),
        AppScreen::Error => render_error(frame, app),
    }
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, text: &str, app: &App) {
    let footer = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(app.theme.colors.muted()),
    )));
    frame.render_widget(footer, area);
}

fn render_home(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let banner_height = if app.banner_dismissed { 0 } else { 2 };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    if !app.banner_dismissed {
        frame.render_widget(&Banner { theme: app.theme }, layout[0]);
    }

    let menu_area = ui::layout::centered_rect(60, 85, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    render_footer(
        frame,
        layout[2],
        " [1-3] Select  [Enter] Confirm  [q] Quit ",
        app,
    );
}

fn render_quiz_config(frame: &mut ratatui::Frame, app: &App) {
    let (main, footer) = ui::layout::main_footer(frame.area());
    let form_area = ui::layout::centered_rect(70, 85, main);
    frame.render_widget(QuizConfigScreen::new(&app.quiz_form, app.theme), form_area);
    render_footer(
        frame,
        footer,
        " [Tab/↑↓] Field  [←→] Change  [Enter] Generate  [Esc] Back ",
        app,
    );
}

fn render_plan_config(frame: &mut ratatui::Frame, app: &App) {
    let (main, footer) = ui::layout::main_footer(frame.area());
    let form_area = ui::layout::centered_rect(70, 90, main);
    frame.render_widget(PlanConfigScreen::new(&app.plan_form, app.theme), form_area);
    render_footer(
        frame,
        footer,
        " [Tab/↑↓] Field  [Ctrl-n] Add subject  [Ctrl-d] Remove  [Enter] Generate  [Esc] Back ",
        app,
    );
}

fn render_loading(frame: &mut ratatui::Frame, app: &App, title: &str, subtitle: &str) {
    let area = ui::layout::centered_rect(60, 50, frame.area());
    frame.render_widget(LoadingScreen::new(title, subtitle, app.tick, app.theme), area);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let (main, footer) = ui::layout::main_footer(frame.area());

    let subject = app
        .quiz_settings
        .as_ref()
        .map(|s| s.subject.as_str())
        .unwrap_or("");
    let card = QuestionCard::new(
        session,
        subject,
        app.speaking,
        app.speech_notice.as_deref(),
        app.quiz_scroll,
        app.theme,
    );
    frame.render_widget(card, main);

    let hint = if session.current_answered() {
        " [→/n] Next  [←/p] Prev  [t] Hear question  [f] Hear explanation  [h] Home "
    } else {
        " [a-e] Answer  [←/p] Prev  [t] Hear question  [h] Home "
    };
    render_footer(frame, footer, hint, app);
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let (main, footer) = ui::layout::main_footer(frame.area());
    let subject = app
        .quiz_settings
        .as_ref()
        .map(|s| s.subject.as_str())
        .unwrap_or("");
    frame.render_widget(
        ResultsScreen::new(session, subject, app.results_scroll, app.theme),
        main,
    );
    render_footer(
        frame,
        footer,
        " [r] New quiz, same settings  [↑↓] Scroll  [h] Home ",
        app,
    );
}

fn render_study_plan(frame: &mut ratatui::Frame, app: &App) {
    let Some(plan) = app.study_plan.as_ref() else {
        return;
    };
    let (main, footer) = ui::layout::main_footer(frame.area());
    frame.render_widget(StudyPlanScreen::new(plan, app.plan_scroll, app.theme), main);
    render_footer(
        frame,
        footer,
        " [n] New plan  [q] Quiz me on this  [↑↓] Scroll  [h] Home ",
        app,
    );
}

fn render_statistics(frame: &mut ratatui::Frame, app: &App) {
    let (main, footer) = ui::layout::main_footer(frame.area());
    let stats = stats::aggregate(&app.stats_results);
    frame.render_widget(
        StatsScreen::new(&stats, app.stats_confirm_clear, app.theme),
        main,
    );
    render_footer(frame, footer, " [x] Clear history  [h] Home ", app);
}

fn render_error(frame: &mut ratatui::Frame, app: &App) {
    let message = app.error.as_deref().unwrap_or("An unknown error occurred.");
    let area = ui::layout::centered_rect(70, 60, frame.area());
    frame.render_widget(ErrorScreen::new(message, app.theme), area);
}
