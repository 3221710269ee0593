//! TUI application state and rendering.

use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::input::{AppAction, handle_event};
use crate::{
    render::{
        ThemeColor,
        colors::{string_to_color, theme},
    },
    shades::{ShadeKey, Shades, generate_color_shades},
    store::{OrgStore, Role},
    theme::{CssVariableSet, ThemeOutcome, VariableChange, apply_theme},
};

/// Everything the preview pane shows for one organization.
pub struct PreviewEntry {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub primary_color: Option<String>,
    /// `None` when no primary color is configured.
    pub shades: Option<Shades>,
    pub theme: CssVariableSet,
}

impl PreviewEntry {
    fn from_store(store: &OrgStore) -> Vec<Self> {
        store
            .organizations()
            .iter()
            .map(|org| {
                let primary_color = org
                    .branding
                    .as_ref()
                    .map(|b| b.primary_color.clone())
                    .filter(|c| !c.is_empty());
                let shades = primary_color.as_deref().map(generate_color_shades);
                PreviewEntry {
                    id: org.id.clone(),
                    name: org.name.clone(),
                    role: org.role,
                    primary_color,
                    shades,
                    theme: apply_theme(org.branding.as_ref()),
                }
            })
            .collect()
    }
}

/// TUI application state.
pub struct App {
    pub entries: Vec<PreviewEntry>,
    /// Index of the active organization, if any.
    pub current: Option<usize>,
    /// Current cursor position (index into entries).
    pub cursor: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Organization to switch to after quitting (if any).
    pub switch_to: Option<String>,
    /// List state for ratatui.
    list_state: ListState,
}

impl App {
    /// Create a new App from the organization store.
    pub fn new(store: &OrgStore) -> Self {
        let entries = PreviewEntry::from_store(store);
        let current = store
            .current()
            .and_then(|org| entries.iter().position(|e| e.id == org.id));
        let cursor = current.unwrap_or(0);
        let mut list_state = ListState::default();
        list_state.select(Some(cursor));

        Self {
            entries,
            current,
            cursor,
            should_quit: false,
            switch_to: None,
            list_state,
        }
    }

    /// Move cursor up.
    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.list_state.select(Some(self.cursor));
        }
    }

    /// Move cursor down.
    pub fn move_down(&mut self) {
        if self.cursor < self.entries.len().saturating_sub(1) {
            self.cursor += 1;
            self.list_state.select(Some(self.cursor));
        }
    }

    /// Select the highlighted organization and quit.
    pub fn select(&mut self) {
        if let Some(entry) = self.entries.get(self.cursor) {
            self.switch_to = Some(entry.id.clone());
            self.should_quit = true;
        }
    }

    /// Quit without selecting.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::MoveUp => self.move_up(),
            AppAction::MoveDown => self.move_down(),
            AppAction::Select => self.select(),
            AppAction::Quit => self.quit(),
            AppAction::None => {}
        }
    }
}

/// Terminal type alias.
type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Set up the terminal for TUI mode.
fn setup_terminal() -> Result<Terminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = ratatui::Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal(terminal: &mut Terminal) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the preview. Returns the organization to switch to, if any.
pub fn run_tui(store: &OrgStore) -> Result<Option<String>> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(store);

    let result = run_event_loop(&mut terminal, &mut app);

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result?;
    Ok(app.switch_to)
}

fn run_event_loop(terminal: &mut Terminal, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| render(frame, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            let event = event::read()?;
            let action = handle_event(event);
            app.handle_action(action);
        }
    }
    Ok(())
}

fn to_color(color: ThemeColor) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

/// Render the TUI.
fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let block = Block::default()
        .title(" brandkit preview ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(to_color(theme::FRAME)));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let [list_area, preview_area] =
        Layout::horizontal([Constraint::Percentage(35), Constraint::Min(0)]).areas(inner_area);

    let items: Vec<ListItem> = app
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| render_org_item(entry, i == app.cursor, Some(i) == app.current))
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .bg(Color::Rgb(40, 40, 45))
            .add_modifier(Modifier::BOLD),
    );
    frame.render_stateful_widget(list, list_area, &mut app.list_state);

    if let Some(entry) = app.entries.get(app.cursor) {
        frame.render_widget(Paragraph::new(preview_lines(entry)), preview_area);
    }

    render_help(frame, area);
}

/// Render a single organization as a ListItem.
fn render_org_item(entry: &PreviewEntry, is_selected: bool, is_current: bool) -> ListItem<'static> {
    let arrow = if is_selected {
        Span::styled("→ ", Style::default().fg(Color::White))
    } else if is_current {
        Span::styled("→ ", Style::default().fg(Color::Rgb(80, 80, 80)))
    } else {
        Span::raw("  ")
    };

    let mut name_style = Style::default().fg(to_color(string_to_color(&entry.name)));
    if is_current {
        name_style = name_style.add_modifier(Modifier::BOLD);
    }

    let swatch = match entry.primary_color.as_deref().and_then(ThemeColor::from_hex) {
        Some(color) => Span::styled(" ■", Style::default().fg(to_color(color))),
        None => Span::styled(" □", Style::default().fg(to_color(theme::MUTED))),
    };

    ListItem::new(Line::from(vec![
        arrow,
        Span::styled(entry.name.clone(), name_style),
        Span::styled(format!(" {}", entry.role), Style::default().fg(to_color(theme::GOLD))),
        swatch,
    ]))
}

/// Shade ramp and theme variables for the highlighted organization.
fn preview_lines(entry: &PreviewEntry) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", entry.primary_color.as_deref().unwrap_or("no branding")),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::raw(""));

    let ramp = match &entry.shades {
        None => {
            lines.push(Line::from(Span::styled(
                " no branding configured, system palette applies",
                Style::default().fg(to_color(theme::GRAY)),
            )));
            None
        }
        Some(Shades::Malformed) => {
            lines.push(Line::from(Span::styled(
                " malformed primary color, no shades",
                Style::default().fg(to_color(theme::RED)),
            )));
            None
        }
        Some(shades) => Some(shades),
    };
    for (key, hex) in ramp.into_iter().flat_map(|shades| shades.iter()) {
        let color = ThemeColor::from_hex(hex).unwrap_or(theme::GRAY);
        let key_style = if key == ShadeKey::S500 {
            Style::default().fg(to_color(theme::GOLD)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(to_color(theme::MUTED))
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:>4} ", key.value()), key_style),
            Span::styled(
                format!(" {hex:^9} "),
                Style::default()
                    .bg(to_color(color))
                    .fg(to_color(color.contrasting_text())),
            ),
        ]));
    }

    lines.push(Line::raw(""));
    let outcome_color = match entry.theme.outcome {
        ThemeOutcome::Branded => theme::GREEN,
        ThemeOutcome::SystemDefault => theme::GRAY,
        ThemeOutcome::Degraded => theme::RED,
    };
    for change in &entry.theme.changes {
        let (variable, value) = match change {
            VariableChange::Set { variable, value } => (variable, value.clone()),
            VariableChange::Remove { variable } => (variable, "(removed)".to_string()),
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<22}", variable.name()), Style::default().fg(to_color(outcome_color))),
            Span::raw(value),
        ]));
    }
    lines
}

/// Render help text at the bottom.
fn render_help(frame: &mut Frame, area: Rect) {
    let help_text = Line::from(vec![
        Span::styled(" j/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" down  "),
        Span::styled("k/↑", Style::default().fg(Color::Yellow)),
        Span::raw(" up  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" switch  "),
        Span::styled("q/Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ]);

    let help_area = Rect {
        x: area.x + 2,
        y: area.y + area.height.saturating_sub(1),
        width: area.width.saturating_sub(4),
        height: 1,
    };

    frame.render_widget(Paragraph::new(help_text), help_area);
}
