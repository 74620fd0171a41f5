use anyhow::Result;
use blockpad_config::Config;
use blockpad_engine::editing::{AutosaveClock, Cmd, Debouncer, EditorSession};
use blockpad_engine::model::{BlockKind, BlockType};
use blockpad_engine::render::ExportOptions;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::{Stdout, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::io;

const TICK: Duration = Duration::from_millis(100);
const SUMMARY_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

pub struct App {
    path: PathBuf,
    autosave_path: PathBuf,
    export_options: ExportOptions,
    session: EditorSession,
    list_state: ListState,
    debouncer: Debouncer,
    autosave: AutosaveClock,
    saved_version: u64,
    status: String,
}

impl App {
    pub fn new(path: PathBuf, config: &Config) -> Result<Self> {
        let document = io::read_document_or_empty(&path)?;
        let autosave_path = config
            .editor
            .autosave_path
            .clone()
            .unwrap_or_else(|| path.clone());

        let mut app = Self {
            status: format!("Editing {} ({} blocks)", path.display(), document.len()),
            path,
            autosave_path,
            export_options: config.export_options(),
            session: EditorSession::with_document(document, config.render_options()),
            list_state: ListState::default(),
            debouncer: Debouncer::new(config.debounce()),
            autosave: AutosaveClock::new(config.autosave_interval()),
            saved_version: 0,
        };
        if !app.session.document().is_empty() {
            app.list_state.select(Some(0));
        }
        Ok(app)
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn handle_key(&mut self, code: KeyCode, now: Instant) -> Result<Action> {
        match code {
            KeyCode::Char('q') => {
                self.debouncer.flush();
                self.session.commit();
                self.autosave_now()?;
                return Ok(Action::Quit);
            }
            KeyCode::Down | KeyCode::Char('j') => self.next_block(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_block(),
            KeyCode::Char('J') => self.move_selected(1, now),
            KeyCode::Char('K') => self.move_selected(-1, now),
            KeyCode::Char(c @ ('a' | 'h' | 'p' | 'l' | 'c' | 't')) => self.add_block(c, now),
            KeyCode::Char('d') => {
                if let Some(at) = self.selected() {
                    self.edit(Cmd::RemoveBlock { at }, now);
                    self.clamp_selection();
                }
            }
            KeyCode::Char('y') => self.duplicate_selected(now),
            KeyCode::Char('o') => self.toggle_selected(now),
            KeyCode::Char('X') => {
                self.edit(Cmd::Clear, now);
                self.clamp_selection();
                self.status = "Cleared document".to_string();
            }
            KeyCode::Char('u') => {
                self.settle();
                self.status = if self.session.undo() {
                    "Undo".to_string()
                } else {
                    "Nothing to undo".to_string()
                };
                self.clamp_selection();
            }
            KeyCode::Char('r') => {
                self.settle();
                self.status = if self.session.redo() {
                    "Redo".to_string()
                } else {
                    "Nothing to redo".to_string()
                };
                self.clamp_selection();
            }
            KeyCode::Char('s') => {
                io::write_document(&self.path, self.session.document())?;
                self.saved_version = self.session.version();
                self.status = format!("Saved {}", self.path.display());
            }
            KeyCode::Char('e') => {
                let target = self.path.with_extension("html");
                io::write_file(&target, &self.session.export_html(&self.export_options))?;
                self.status = format!("Exported {}", target.display());
            }
            _ => {}
        }
        Ok(Action::Continue)
    }

    /// Commit settled edits and autosave when the clocks say so.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        if self.debouncer.poll(now) {
            self.session.commit();
        }
        if self.autosave.due(now) {
            self.autosave_now()?;
        }
        Ok(())
    }

    fn autosave_now(&mut self) -> Result<()> {
        if self.session.version() == self.saved_version {
            return Ok(());
        }
        io::write_document(&self.autosave_path, self.session.document())?;
        self.saved_version = self.session.version();
        log::info!("autosaved to {}", self.autosave_path.display());
        Ok(())
    }

    /// Commit a pending edit before history is walked.
    fn settle(&mut self) {
        if self.debouncer.flush() {
            self.session.commit();
        }
    }

    fn edit(&mut self, cmd: Cmd, now: Instant) {
        if self.session.apply(cmd).changed {
            self.debouncer.touch(now);
        }
    }

    fn add_block(&mut self, key: char, now: Instant) {
        let Some(kind) = add_key(key) else {
            return;
        };
        self.edit(Cmd::AddBlock { kind }, now);
        self.list_state
            .select(self.session.document().len().checked_sub(1));
        self.status = format!("Added {kind} block");
    }

    fn duplicate_selected(&mut self, now: Instant) {
        let Some(at) = self.selected() else {
            return;
        };
        let Some(block) = self.session.document().get(at).cloned() else {
            return;
        };
        self.edit(
            Cmd::InsertBlock {
                at: at + 1,
                block: block.with_generated_id(),
            },
            now,
        );
        self.list_state.select(Some(at + 1));
        self.status = "Duplicated block".to_string();
    }

    /// Cycles a heading's level or flips a list between ordered and bulleted.
    fn toggle_selected(&mut self, now: Instant) {
        let Some(at) = self.selected() else {
            return;
        };
        let Some(mut block) = self.session.document().get(at).cloned() else {
            return;
        };
        match &mut block.kind {
            BlockKind::Heading(heading) => {
                let level = heading.effective_level() % 6 + 1;
                heading.level = Some(i64::from(level));
                self.status = format!("Heading level {level}");
            }
            BlockKind::List(list) => {
                list.ordered = !list.ordered;
                self.status = if list.ordered {
                    "Numbered list".to_string()
                } else {
                    "Bulleted list".to_string()
                };
            }
            _ => {
                self.status = "Only headings and lists toggle".to_string();
                return;
            }
        }
        self.edit(Cmd::UpdateBlock { at, block }, now);
    }

    fn move_selected(&mut self, offset: isize, now: Instant) {
        let Some(from) = self.selected() else {
            return;
        };
        let Some(to) = from.checked_add_signed(offset) else {
            return;
        };
        if to >= self.session.document().len() {
            return;
        }
        self.edit(Cmd::MoveBlock { from, to }, now);
        self.list_state.select(Some(to));
    }

    fn next_block(&mut self) {
        let len = self.session.document().len();
        if len == 0 {
            return;
        }
        let i = match self.selected() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_block(&mut self) {
        let len = self.session.document().len();
        if len == 0 {
            return;
        }
        let i = match self.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn clamp_selection(&mut self) {
        let last = self.session.document().len().checked_sub(1);
        let selected = match (self.selected(), last) {
            (_, None) => None,
            (Some(i), Some(last)) => Some(i.min(last)),
            (None, Some(_)) => Some(0),
        };
        self.list_state.select(selected);
    }
}

fn add_key(c: char) -> Option<BlockType> {
    match c {
        'a' => Some(BlockType::Text),
        'h' => Some(BlockType::Heading),
        'p' => Some(BlockType::Paragraph),
        'l' => Some(BlockType::List),
        'c' => Some(BlockType::Code),
        't' => Some(BlockType::Table),
        _ => None,
    }
}

fn summary(block: &blockpad_engine::model::Block) -> String {
    let kind = block
        .block_type()
        .map_or_else(|| "unrecognized".to_string(), |t| t.to_string());
    let text: String = block
        .plain_text()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut line = format!("{kind}: {text}");
    if line.chars().count() > SUMMARY_WIDTH {
        line = line.chars().take(SUMMARY_WIDTH - 1).collect();
        line.push('…');
    }
    line
}

pub fn run(path: &Path, config: &Config) -> Result<()> {
    let mut app = App::new(path.to_path_buf(), config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key.code, Instant::now())? == Action::Quit
        {
            return Ok(());
        }
        app.tick(Instant::now())?;
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(rows[0]);

    // Block list panel
    let items: Vec<ListItem> = app
        .session
        .document()
        .iter()
        .map(|block| ListItem::new(vec![Line::from(vec![Span::raw(summary(block))])]))
        .collect();

    let title = if app.session.is_dirty() {
        "Blocks *"
    } else {
        "Blocks"
    };
    let blocks_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(blocks_list, chunks[0], &mut app.list_state);

    // Preview panel
    let html = app.session.preview().html();
    let preview_text: Vec<Line> = if html.is_empty() {
        vec![Line::from("Press a/h/p/l/c/t to add a block")]
    } else {
        html.lines().map(|line| Line::from(line.to_string())).collect()
    };
    let preview = Paragraph::new(preview_text)
        .block(Block::default().borders(Borders::ALL).title("Preview (HTML)"))
        .wrap(Wrap { trim: false });

    f.render_widget(preview, chunks[1]);

    let help = Paragraph::new(vec![
        Line::from(app.status.as_str()),
        Line::from(
            "q: Quit | j/k: Select | J/K: Move | a/h/p/l/c/t: Add | y: Duplicate | o: Toggle | d: Delete | X: Clear | u/r: Undo/Redo | s: Save | e: Export",
        ),
    ])
    .block(Block::default());

    f.render_widget(help, rows[1]);
}
