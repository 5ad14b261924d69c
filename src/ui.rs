// Terminal UI - home page plus one page per screening form
// A single request is in flight at a time; the loop blocks on it after
// drawing the "Calculating..." card

use crate::forms::{FormState, Route};
use crate::predictor::Predictor;
use crate::risk::{ChartPoint, MetricStatus, Outcome, RiskBand, ScreeningResult};
use crate::validation::Payload;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap,
    },
    Frame, Terminal,
};
use std::f64::consts::PI;
use std::io;
use tokio::runtime::Runtime;
use tracing::info;

pub struct App {
    pub route: Route,
    pub home_state: TableState,
    pub form: Option<FormState>,
    /// Index of the focused input on a form page
    pub focus: usize,
    pub should_quit: bool,
    pending: Option<Payload>,
    predictor: Predictor,
    runtime: Runtime,
}

impl App {
    pub fn new(predictor: Predictor, start: Route) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let mut home_state = TableState::default();
        home_state.select(Some(0));

        let mut app = Self {
            route: Route::Home,
            home_state,
            form: None,
            focus: 0,
            should_quit: false,
            pending: None,
            predictor,
            runtime,
        };
        app.navigate(start);
        Ok(app)
    }

    /// Switch pages; the previous form's state is dropped
    pub fn navigate(&mut self, route: Route) {
        info!(from = %self.route.path(), to = %route.path(), "navigate");
        self.route = route;
        self.focus = 0;
        self.pending = None;
        self.form = match route {
            Route::Home => None,
            Route::Form(kind) => Some(FormState::new(kind)),
        };
    }

    pub fn selected_entry(&self) -> Option<Route> {
        let entries = Route::home_entries();
        self.home_state.selected().and_then(|i| entries.get(i).copied())
    }

    pub fn next(&mut self) {
        match self.route {
            Route::Home => {
                let len = Route::home_entries().len();
                let i = match self.home_state.selected() {
                    Some(i) if i + 1 < len => i + 1,
                    _ => 0,
                };
                self.home_state.select(Some(i));
            }
            Route::Form(_) => {
                let len = self.field_count();
                if len > 0 {
                    self.focus = (self.focus + 1) % len;
                }
            }
        }
    }

    pub fn previous(&mut self) {
        match self.route {
            Route::Home => {
                let len = Route::home_entries().len();
                let i = match self.home_state.selected() {
                    Some(0) | None => len - 1,
                    Some(i) => i - 1,
                };
                self.home_state.select(Some(i));
            }
            Route::Form(_) => {
                let len = self.field_count();
                if len > 0 {
                    self.focus = (self.focus + len - 1) % len;
                }
            }
        }
    }

    fn field_count(&self) -> usize {
        self.form.as_ref().map(|f| f.fields().len()).unwrap_or(0)
    }

    fn focused_field_name(&self) -> Option<String> {
        let form = self.form.as_ref()?;
        form.fields().get(self.focus).map(|f| f.name.clone())
    }

    /// Append a character to the focused input
    pub fn type_char(&mut self, c: char) {
        let Some(name) = self.focused_field_name() else {
            return;
        };
        if let Some(form) = self.form.as_mut() {
            let mut raw = form.value(&name).to_string();
            raw.push(c);
            form.set_value(&name, raw);
        }
    }

    pub fn backspace(&mut self) {
        let Some(name) = self.focused_field_name() else {
            return;
        };
        if let Some(form) = self.form.as_mut() {
            let mut raw = form.value(&name).to_string();
            raw.pop();
            form.set_value(&name, raw);
        }
    }

    /// Validate the form and queue its payload
    pub fn submit(&mut self) {
        if let Some(form) = self.form.as_mut() {
            if let Some(payload) = form.submit_payload() {
                self.pending = Some(payload);
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Await the queued request and hand the outcome to the form
    pub fn resolve_pending(&mut self) {
        let Some(payload) = self.pending.take() else {
            return;
        };
        let Some(form) = self.form.as_mut() else {
            return;
        };

        let kind = form.kind();
        let outcome = self.runtime.block_on(self.predictor.predict(kind, &payload));
        form.finish(outcome);
    }

    pub fn reset_form(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.reset();
        }
        self.focus = 0;
        self.pending = None;
    }

    /// Continue from a pre-screening result to its detailed form
    pub fn open_detailed(&mut self) {
        let target = self
            .form
            .as_ref()
            .filter(|f| f.result.is_some())
            .and_then(|f| f.kind().detailed());

        if let Some(kind) = target {
            self.navigate(Route::Form(kind));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Char('r') if ctrl => self.reset_form(),
            KeyCode::Char('d') if ctrl => self.open_detailed(),
            KeyCode::Down | KeyCode::Tab => self.next(),
            KeyCode::Up | KeyCode::BackTab => self.previous(),
            KeyCode::Esc => match self.route {
                Route::Home => self.should_quit = true,
                Route::Form(_) => self.navigate(Route::Home),
            },
            KeyCode::Enter => match self.route {
                Route::Home => {
                    if let Some(route) = self.selected_entry() {
                        self.navigate(route);
                    }
                }
                Route::Form(_) => self.submit(),
            },
            KeyCode::Char(c) => match self.route {
                Route::Home => match c {
                    'q' => self.should_quit = true,
                    'j' => self.next(),
                    'k' => self.previous(),
                    _ => {}
                },
                Route::Form(_) => {
                    if c.is_ascii_digit() || c == '.' || c == '-' {
                        self.type_char(c);
                    }
                }
            },
            KeyCode::Backspace => self.backspace(),
            _ => {}
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
        }

        if app.has_pending() {
            terminal.draw(|f| ui(f, app))?;
            app.resolve_pending();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Page
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.route {
        Route::Home => render_home(f, chunks[1], app),
        Route::Form(_) => render_form_page(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.route {
        Route::Home => "Health Screening".to_string(),
        Route::Form(kind) => kind.title().to_string(),
    };

    let spans = vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(app.route.path(), Style::default().fg(Color::DarkGray)),
        Span::raw("  |  "),
        Span::styled(
            format!("mode: {:?}", app.predictor.mode()).to_lowercase(),
            Style::default().fg(Color::White),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_home(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Screening", "Description", "Route"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = Route::home_entries().into_iter().filter_map(|route| match route {
        Route::Form(kind) => Some(Row::new(vec![
            Cell::from(kind.title()),
            Cell::from(kind.description()),
            Cell::from(route.path()).style(Style::default().fg(Color::DarkGray)),
        ])),
        Route::Home => None,
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(30),
            Constraint::Min(30),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Choose a screening "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.home_state);
}

fn render_form_page(f: &mut Frame, area: Rect, app: &App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_inputs(f, columns[0], form, app.focus);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),      // Result card
            Constraint::Percentage(50), // Bar chart
            Constraint::Min(8),         // Radar
        ])
        .split(columns[1]);

    render_result_card(f, right[0], form);

    if let Some(result) = form.result.as_ref() {
        render_bar_chart(f, right[1], result);
        render_radar(f, right[2], result);
    }
}

fn render_inputs(f: &mut Frame, area: Rect, form: &FormState, focus: usize) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", form.kind().description()),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
    ];

    for (i, field) in form.fields().iter().enumerate() {
        let focused = i == focus;
        let marker = if focused { "→ " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<28}", field.label), label_style),
            Span::styled(
                format!("[{:<10}]", form.value(&field.name)),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(" "),
            Span::styled(field.range_text(), Style::default().fg(Color::DarkGray)),
        ]));

        if focused && !field.hint.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", field.hint),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
    }

    if let Some(error) = form.error.as_ref() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    let inputs = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ", form.kind().title())),
    );

    f.render_widget(inputs, area);
}

/// "#10b981" -> Color::Rgb
fn hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn band_color(band: Option<RiskBand>) -> Color {
    band.and_then(|b| hex_color(b.color())).unwrap_or(Color::Cyan)
}

fn status_color(status: MetricStatus) -> Color {
    match status {
        MetricStatus::Good => Color::Green,
        MetricStatus::Moderate => Color::Yellow,
        MetricStatus::High => Color::Red,
    }
}

fn render_result_card(f: &mut Frame, area: Rect, form: &FormState) {
    let (lines, color) = if form.loading {
        (
            vec![Line::from(Span::styled(
                "Calculating...",
                Style::default().add_modifier(Modifier::ITALIC),
            ))],
            Color::Cyan,
        )
    } else if let Some(result) = form.result.as_ref() {
        let color = band_color(result.outcome.band());
        let mut lines = vec![Line::from(Span::styled(
            result.outcome.headline(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];

        if let Outcome::Risk { band, .. } = &result.outcome {
            lines.push(Line::from(band.message()));
        }
        if form.kind().detailed().is_some() {
            lines.push(Line::from(Span::styled(
                "Ctrl-D: continue to the detailed assessment",
                Style::default().fg(Color::DarkGray),
            )));
        }
        (lines, color)
    } else {
        (
            vec![Line::from(Span::styled(
                "Fill in the form and press Enter",
                Style::default().fg(Color::DarkGray),
            ))],
            Color::White,
        )
    };

    let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(" Result "),
    );

    f.render_widget(card, area);
}

fn render_bar_chart(f: &mut Frame, area: Rect, result: &ScreeningResult) {
    let bars: Vec<Bar> = result
        .chart
        .iter()
        .map(|point| {
            let pct = point.percentage.clamp(0.0, 100.0);
            Bar::default()
                .value(pct.round() as u64)
                .text_value(format!("{:.0}%", pct))
                .label(Line::from(point.subject.clone()))
                .style(Style::default().fg(status_color(point.status())))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" % of range maximum "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(1)
        .max(100);

    f.render_widget(chart, area);
}

/// Unit-circle position of spoke `i` of `n`, first spoke at 12 o'clock
fn spoke(i: usize, n: usize, radius: f64) -> (f64, f64) {
    let angle = PI / 2.0 - 2.0 * PI * i as f64 / n as f64;
    (radius * angle.cos(), radius * angle.sin())
}

fn render_radar(f: &mut Frame, area: Rect, result: &ScreeningResult) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Profile ");

    let points: &[ChartPoint] = &result.radar;
    if points.len() < 3 {
        f.render_widget(Paragraph::new("Not enough values to draw").block(block), area);
        return;
    }

    let n = points.len();
    let color = band_color(result.outcome.band());

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([-1.4, 1.4])
        .y_bounds([-1.2, 1.2])
        .paint(move |ctx| {
            // Grid rings and spokes
            for ring in [0.25, 0.5, 0.75, 1.0] {
                for i in 0..n {
                    let (x1, y1) = spoke(i, n, ring);
                    let (x2, y2) = spoke(i + 1, n, ring);
                    ctx.draw(&CanvasLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        color: Color::DarkGray,
                    });
                }
            }
            for i in 0..n {
                let (x, y) = spoke(i, n, 1.0);
                ctx.draw(&CanvasLine { x1: 0.0, y1: 0.0, x2: x, y2: y, color: Color::DarkGray });
            }

            ctx.layer();

            // Value polygon
            let radius = |p: &ChartPoint| (p.percentage / 100.0).clamp(0.0, 1.0);
            for i in 0..n {
                let (x1, y1) = spoke(i, n, radius(&points[i]));
                let (x2, y2) = spoke(i + 1, n, radius(&points[(i + 1) % n]));
                ctx.draw(&CanvasLine { x1, y1, x2, y2, color });
            }

            for (i, point) in points.iter().enumerate() {
                let (x, y) = spoke(i, n, 1.1);
                ctx.print(x, y, point.subject.clone());
            }
        });

    f.render_widget(canvas, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let spans = match app.route {
        Route::Home => vec![
            Span::raw(" "),
            key("↑/↓"),
            Span::raw(" Select | "),
            key("Enter"),
            Span::raw(" Open | "),
            Span::styled("q", Style::default().fg(Color::Red)),
            Span::raw(" Quit"),
        ],
        Route::Form(_) => vec![
            Span::raw(" "),
            key("↑/↓/Tab"),
            Span::raw(" Field | "),
            key("Enter"),
            Span::raw(" Submit | "),
            key("Ctrl-R"),
            Span::raw(" Reset | "),
            key("Esc"),
            Span::raw(" Home | "),
            Span::styled("Ctrl-Q", Style::default().fg(Color::Red)),
            Span::raw(" Quit"),
        ],
    };

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PredictionClient;
    use crate::config::PredictionMode;
    use crate::error::MISSING_FIELDS_MESSAGE;
    use crate::forms::FormKind;
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn local_app(start: Route) -> App {
        let client = PredictionClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let predictor = Predictor::new(PredictionMode::Local, client, Some(3));
        App::new(predictor, start).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_home_navigation_wraps() {
        let mut app = local_app(Route::Home);
        assert_eq!(app.selected_entry(), Some(Route::Form(FormKind::PreDiabetes)));

        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_entry(), Some(Route::Form(FormKind::Symptom)));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_entry(), Some(Route::Form(FormKind::PreHeart)));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.route, Route::Form(FormKind::PreHeart));
        assert!(app.form.is_some());
    }

    #[test]
    fn test_typing_only_accepts_numeric_characters() {
        let mut app = local_app(Route::Form(FormKind::PreDiabetes));
        type_str(&mut app, "4x5");
        assert_eq!(app.form.as_ref().unwrap().value("age"), "45");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.as_ref().unwrap().value("age"), "4");
    }

    #[test]
    fn test_live_validation_shows_range_message() {
        let mut app = local_app(Route::Form(FormKind::PreDiabetes));
        type_str(&mut app, "9");

        assert_eq!(
            app.form.as_ref().unwrap().error.as_deref(),
            Some("Age must be between 18 and 80")
        );
    }

    #[test]
    fn test_submit_with_empty_fields_is_blocked() {
        let mut app = local_app(Route::Form(FormKind::PreDiabetes));
        press(&mut app, KeyCode::Enter);

        assert!(!app.has_pending());
        assert_eq!(
            app.form.as_ref().unwrap().error.as_deref(),
            Some(MISSING_FIELDS_MESSAGE)
        );
    }

    #[test]
    fn test_submit_resolves_to_result() {
        let mut app = local_app(Route::Form(FormKind::PreDiabetes));
        type_str(&mut app, "45");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "27");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "110");

        press(&mut app, KeyCode::Enter);
        assert!(app.has_pending());
        assert!(app.form.as_ref().unwrap().loading);

        app.resolve_pending();

        let form = app.form.as_ref().unwrap();
        assert!(!form.loading);
        assert_eq!(form.result.as_ref().unwrap().outcome, Outcome::risk(45.0));
    }

    #[test]
    fn test_reset_and_escape() {
        let mut app = local_app(Route::Form(FormKind::Symptom));
        type_str(&mut app, "7");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.focus, 1);

        ctrl(&mut app, 'r');
        assert_eq!(app.focus, 0);
        assert_eq!(app.form.as_ref().unwrap().value("fever"), "0");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.route, Route::Home);
        assert!(app.form.is_none());

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_detailed_form_needs_a_result() {
        let mut app = local_app(Route::Form(FormKind::PreHeart));
        ctrl(&mut app, 'd');
        assert_eq!(app.route, Route::Form(FormKind::PreHeart));

        for value in ["50", "180", "120", "80"] {
            type_str(&mut app, value);
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Enter);
        app.resolve_pending();
        assert!(app.form.as_ref().unwrap().result.is_some());

        ctrl(&mut app, 'd');
        assert_eq!(app.route, Route::Form(FormKind::Heart));
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#10b981"), Some(Color::Rgb(0x10, 0xb9, 0x81)));
        assert_eq!(hex_color("10b981"), None);
        assert_eq!(band_color(None), Color::Cyan);
    }

    #[test]
    fn test_render_home_and_result() {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        let mut app = local_app(Route::Home);
        terminal.draw(|f| ui(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("Diabetes Pre-Screening"));

        app.navigate(Route::Form(FormKind::PreDiabetes));
        type_str(&mut app, "45");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "27");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "110");
        press(&mut app, KeyCode::Enter);

        terminal.draw(|f| ui(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("Calculating..."));

        app.resolve_pending();
        terminal.draw(|f| ui(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("45.0% Risk Score - Moderate Risk"));
    }
}
