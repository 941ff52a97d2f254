mod app;
mod event;
mod ui;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use tracing_subscriber::EnvFilter;

use quizr::bank::QuestionBank;
use quizr::config::Config;
use quizr::session::quiz::QuizPhase;
use quizr::store::history::HistoryStore;
use quizr::store::json_store::{self, FileStore, KeyValueStore, MemoryStore};

use app::{App, Modal};
use event::{AppEvent, EventSource};
use ui::components::confirm_dialog::ConfirmDialog;
use ui::components::history_table::HistoryTable;
use ui::components::home_menu::HomeMenu;
use ui::components::progress_bar::ProgressBar;
use ui::components::question_card::QuestionCard;
use ui::components::results_panel::ResultsPanel;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};

#[derive(Parser)]
#[command(name = "quizr", version, about = "Terminal multiple-choice quiz")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Preselected category key (or \"all\")")]
    category: Option<String>,

    #[arg(short = 'n', long, help = "Preselected number of questions")]
    count: Option<usize>,

    #[arg(short, long, help = "Question bank file (.toml or .json)")]
    bank: Option<PathBuf>,

    #[arg(long, help = "Print saved results and exit")]
    history: bool,

    #[arg(long, help = "Delete saved results and exit")]
    clear_history: bool,

    #[arg(long, help = "List available themes and exit")]
    list_themes: bool,

    #[arg(long, help = "Write the given options to the config file")]
    save_config: bool,
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(data_dir: &Path) {
    if fs::create_dir_all(data_dir).is_err() {
        return;
    }
    let Ok(file) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("quizr.log"))
    else {
        return;
    };
    let filter = EnvFilter::try_from_env("QUIZR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn open_store() -> Box<dyn KeyValueStore> {
    match FileStore::new() {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!("data directory unavailable, history will not persist: {e:#}");
            Box::new(MemoryStore::default())
        }
    }
}

fn print_history(store: Box<dyn KeyValueStore>) {
    let history = HistoryStore::new(store).load();
    if history.is_empty() {
        println!("No saved results.");
        return;
    }
    println!(
        "{:<12} {:<20} {:>9} {:>7} {:>5} {:>7}",
        "Date", "Category", "Questions", "Score", "%", "Review"
    );
    for r in &history {
        println!(
            "{:<12} {:<20} {:>9} {:>7} {:>4}% {:>7}",
            r.date,
            r.category,
            r.question_count,
            r.score_text(),
            r.percentage,
            r.review_text()
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&json_store::default_data_dir());

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("ignoring unreadable config: {e:#}");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(category) = cli.category {
        config.default_category = Some(category);
    }
    if let Some(count) = cli.count {
        config.default_count = Some(count);
    }
    if let Some(path) = cli.bank {
        config.bank_path = Some(path.to_string_lossy().to_string());
    }

    if cli.list_themes {
        for name in ui::theme::Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }
    if cli.save_config {
        config.save()?;
        println!("Config written to {}", Config::config_path().display());
    }
    if cli.clear_history {
        HistoryStore::new(open_store()).clear()?;
        println!("History cleared.");
        return Ok(());
    }
    if cli.history {
        print_history(open_store());
        return Ok(());
    }

    let bank = match &config.bank_path {
        Some(path) => QuestionBank::load_file(Path::new(path))
            .with_context(|| format!("loading question bank {path}"))?,
        None => QuestionBank::builtin()?,
    };
    config.validate(&bank);

    let theme = ui::theme::Theme::load(&config.theme).unwrap_or_default();
    let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
    let mut app = App::new(bank, config, open_store(), theme);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventSource::new(Duration::from_millis(250));
    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!("quizr exited with error: {err:#}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventSource,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if let Some(modal) = app.modal {
        handle_modal_key(app, modal, key);
        return;
    }

    match app.session.phase() {
        QuizPhase::Home => handle_home_key(app, key),
        QuizPhase::InQuiz(_) | QuizPhase::InReview { .. } => handle_quiz_key(app, key),
        QuizPhase::Results { .. } => handle_results_key(app, key),
    }
}

fn handle_modal_key(app: &mut App, modal: Modal, key: KeyEvent) {
    match (modal, key.code) {
        (Modal::History, KeyCode::Char('c')) => app.request_clear_history(),
        (Modal::ConfirmClear, KeyCode::Char('y')) => app.confirm_clear_history(),
        (Modal::ConfirmClear, KeyCode::Char('n')) => app.close_modal(),
        (_, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h')) => app.close_modal(),
        _ => {}
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.move_home_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_home_cursor(true),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            app.toggle_home_focus()
        }
        KeyCode::Char(' ') => app.select_home_item(),
        KeyCode::Enter => {
            app.start_quiz();
        }
        KeyCode::Char('h') => app.open_history(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Char(ch @ '1'..='9') => {
            let index = ch as usize - '1' as usize;
            app.answer(index);
        }
        KeyCode::Up | KeyCode::Char('k') => app.move_option_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_option_cursor(true),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if app.is_answered() {
                app.advance();
            } else {
                app.answer_at_cursor();
            }
        }
        KeyCode::Char('n') => {
            app.advance();
        }
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') => app.save_result(),
        KeyCode::Char('r') => {
            app.restart();
        }
        KeyCode::Char('h') => app.open_history(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => app.go_home(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.bg())),
        area,
    );

    let hints = footer_hints(app);
    let hint_lines = pack_hint_lines(&hints, area.width as usize);
    let active = app.session.active_pass();
    let layout = AppLayout::new(area, active.is_some(), hint_lines.len() as u16);

    render_header(frame, app, layout.header);

    match app.session.phase() {
        QuizPhase::Home => {
            let menu = HomeMenu {
                bank: app.session.bank(),
                setup: app.session.setup(),
                count_choices: &app.config.count_choices,
                category_cursor: app.category_cursor,
                count_cursor: app.count_cursor,
                focus: app.home_focus,
                theme: app.theme,
            };
            frame.render_widget(menu, layout.main);
        }
        QuizPhase::InQuiz(pass) | QuizPhase::InReview { review: pass, .. } => {
            let reviewing = matches!(app.session.phase(), QuizPhase::InReview { .. });
            let (index, total) = pass.progress();
            let bar_title = if reviewing { "Review" } else { "Progress" };
            frame.render_widget(
                ProgressBar::new(bar_title, index, total, app.theme),
                layout.progress,
            );
            if let Some(question) = pass.current_question() {
                let card = QuestionCard {
                    title: if reviewing {
                        "Review \u{2014} try the missed ones again"
                    } else {
                        app.session.category_label()
                    },
                    question,
                    feedback: pass.feedback(),
                    cursor: app.option_cursor,
                    theme: app.theme,
                };
                frame.render_widget(card, layout.main);
            }
        }
        QuizPhase::Results { primary, .. } => {
            if let Some(result) = app.session.last_result() {
                let panel = ResultsPanel {
                    result,
                    wrong_answers: primary.wrong_answers(),
                    theme: app.theme,
                };
                frame.render_widget(panel, layout.main);
            }
        }
    }

    let footer = Paragraph::new(
        hint_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, layout.footer);

    if let Some(notice) = &app.notice {
        render_notice(frame, app, &notice.text, notice.is_error, layout.main);
    }

    match app.modal {
        Some(Modal::History) => {
            let popup = centered_rect(80, 70, area);
            frame.render_widget(
                HistoryTable {
                    entries: &app.history_entries,
                    theme: app.theme,
                },
                popup,
            );
        }
        Some(Modal::ConfirmClear) => {
            frame.render_widget(
                HistoryTable {
                    entries: &app.history_entries,
                    theme: app.theme,
                },
                centered_rect(80, 70, area),
            );
            frame.render_widget(
                ConfirmDialog {
                    message: "Delete all saved results?",
                    theme: app.theme,
                },
                centered_rect(40, 20, area),
            );
        }
        None => {}
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let mut spans = vec![Span::styled(
        " quizr ",
        Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD),
    )];
    match app.session.phase() {
        QuizPhase::Home => {}
        QuizPhase::InQuiz(pass) | QuizPhase::InReview { review: pass, .. } => {
            let (index, total) = pass.progress();
            spans.push(Span::styled(
                format!("\u{2502} {} ", app.session.category_label()),
                Style::default().fg(colors.fg()),
            ));
            spans.push(Span::styled(
                format!("\u{2502} {} / {} ", (index + 1).min(total), total),
                Style::default().fg(colors.muted()),
            ));
            spans.push(Span::styled(
                format!("\u{2502} score {}", pass.score()),
                Style::default().fg(colors.muted()),
            ));
        }
        QuizPhase::Results { .. } => spans.push(Span::styled(
            "\u{2502} results",
            Style::default().fg(colors.fg()),
        )),
    }
    let header = Paragraph::new(Line::from(spans)).block(
        Block::bordered().border_style(Style::default().fg(colors.border())),
    );
    frame.render_widget(header, area);
}

fn render_notice(frame: &mut ratatui::Frame, app: &App, text: &str, is_error: bool, area: Rect) {
    let colors = &app.theme.colors;
    let width = (text.chars().count() as u16 + 4).min(area.width);
    let rect = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(3),
        width,
        3.min(area.height),
    );
    let color = if is_error { colors.error() } else { colors.success() };
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(color))),
        rect,
    );
}

fn footer_hints(app: &App) -> Vec<&'static str> {
    if let Some(modal) = app.modal {
        return match modal {
            Modal::History => vec!["[c] Clear history", "[Esc] Close"],
            Modal::ConfirmClear => vec!["[y] Confirm", "[n/Esc] Cancel"],
        };
    }
    match app.session.phase() {
        QuizPhase::Home => vec![
            "[\u{2191}\u{2193}] Move",
            "[Tab] Switch list",
            "[Space] Choose",
            "[Enter] Start",
            "[h] History",
            "[q] Quit",
        ],
        QuizPhase::InQuiz(_) | QuizPhase::InReview { .. } if app.is_answered() => {
            vec!["[Enter/n] Next", "[Esc] Home"]
        }
        QuizPhase::InQuiz(_) | QuizPhase::InReview { .. } => vec![
            "[1-9] Answer",
            "[\u{2191}\u{2193}] Move",
            "[Enter] Pick",
            "[Esc] Home",
        ],
        QuizPhase::Results { .. } if app.saved => {
            vec!["[r] Play again", "[h] History", "[Esc] Home"]
        }
        QuizPhase::Results { .. } => vec![
            "[s] Save result",
            "[r] Play again",
            "[h] History",
            "[Esc] Home",
        ],
    }
}
