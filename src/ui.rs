use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use g318_story_map::{
    poi_list, search, Catalog, Poi, PoiDetail, PoiId, PoiType, ProgressView, Route, VisitTracker,
    AUTO_ADVANCE,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Event poll interval; also drives the carousel auto-advance.
const TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Explorer,
    Route,
    About,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Explorer => Page::Route,
            Page::Route => Page::About,
            Page::About => Page::Explorer,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Explorer => Page::About,
            Page::Route => Page::Explorer,
            Page::About => Page::Route,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Explorer => "Explorer",
            Page::Route => "Route",
            Page::About => "About",
        }
    }
}

pub struct App {
    pub catalog: Arc<Catalog>,
    pub tracker: VisitTracker,
    pub route: Route,
    /// Ids matching the current query, in catalog order
    pub filtered: Vec<PoiId>,
    pub state: TableState,
    pub current_page: Page,
    pub query: String,
    pub search_mode: bool,
    pub detail: Option<PoiDetail>,
    last_advance: Instant,
}

impl App {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let tracker = VisitTracker::new(catalog.clone());
        let filtered: Vec<PoiId> = catalog.iter().map(|p| p.id).collect();

        let mut state = TableState::default();
        if !filtered.is_empty() {
            state.select(Some(0));
        }

        Self {
            catalog,
            tracker,
            route: Route::g318(),
            filtered,
            state,
            current_page: Page::Explorer,
            query: String::new(),
            search_mode: false,
            detail: None,
            last_advance: Instant::now(),
        }
    }

    /// Re-run the filter for the current query and reset the selection.
    pub fn apply_search(&mut self) {
        self.filtered = search(&self.catalog, &self.query)
            .iter()
            .map(|p| p.id)
            .collect();

        if self.filtered.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
        self.apply_search();
    }

    pub fn selected_id(&self) -> Option<PoiId> {
        self.state.selected().and_then(|i| self.filtered.get(i).copied())
    }

    pub fn selected_poi(&self) -> Option<&Poi> {
        self.selected_id().and_then(|id| self.catalog.get(id))
    }

    /// Open the detail panel for the selected POI and mark it visited,
    /// like tapping its map marker.
    pub fn open_detail(&mut self) {
        let id = match self.selected_id() {
            Some(id) => id,
            None => return,
        };
        let detail = match self.catalog.get(id) {
            Some(poi) => PoiDetail::from_poi(poi),
            None => return,
        };

        self.tracker.mark_visited(id);
        self.detail = Some(detail);
        self.last_advance = Instant::now();
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn carousel_next(&mut self) {
        if let Some(detail) = &mut self.detail {
            detail.carousel.next();
        }
        self.last_advance = Instant::now();
    }

    pub fn carousel_prev(&mut self) {
        if let Some(detail) = &mut self.detail {
            detail.carousel.prev();
        }
        self.last_advance = Instant::now();
    }

    /// Advance the carousel while the detail panel sits open.
    pub fn tick(&mut self, now: Instant) {
        if let Some(detail) = &mut self.detail {
            if detail.carousel.count() > 1 && now.duration_since(self.last_advance) >= AUTO_ADVANCE
            {
                detail.carousel.next();
                self.last_advance = now;
            }
        }
    }

    pub fn reset_visits(&mut self) {
        self.tracker.reset();
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                let next = i + 10;
                if next >= len {
                    len - 1
                } else {
                    next
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = match self.state.selected() {
            Some(i) => {
                if i < 10 {
                    0
                } else {
                    i - 10
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if app.search_mode {
                    match key.code {
                        KeyCode::Esc | KeyCode::Enter => app.search_mode = false,
                        KeyCode::Backspace => {
                            app.query.pop();
                            app.apply_search();
                        }
                        KeyCode::Char(c) => {
                            app.query.push(c);
                            app.apply_search();
                        }
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Esc => {
                            if app.detail.is_some() {
                                app.close_detail();
                            } else {
                                return Ok(());
                            }
                        }
                        KeyCode::Enter => {
                            if app.detail.is_some() {
                                app.close_detail();
                            } else if app.current_page == Page::Explorer {
                                app.open_detail();
                            }
                        }
                        KeyCode::Tab => {
                            if key.modifiers.contains(KeyModifiers::SHIFT) {
                                app.previous_page();
                            } else {
                                app.next_page();
                            }
                        }
                        KeyCode::Char('/') if app.current_page == Page::Explorer => {
                            app.search_mode = true;
                        }
                        KeyCode::Char('c') => app.clear_search(),
                        KeyCode::Char('r') => app.reset_visits(),
                        KeyCode::Left => app.carousel_prev(),
                        KeyCode::Right => app.carousel_next(),
                        KeyCode::Down | KeyCode::Char('j') => app.next(),
                        KeyCode::Up | KeyCode::Char('k') => app.previous(),
                        KeyCode::PageDown => app.page_down(),
                        KeyCode::PageUp => app.page_up(),
                        KeyCode::Home => app.state.select(Some(0)),
                        KeyCode::End => {
                            if !app.filtered.is_empty() {
                                app.state.select(Some(app.filtered.len() - 1));
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        app.tick(Instant::now());
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    // Header with page navigation
    render_header(f, chunks[0], app);

    // Content area with optional split for detail panel
    if app.detail.is_some() && app.current_page == Page::Explorer {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60), // POI list
                Constraint::Percentage(40), // Detail panel
            ])
            .split(chunks[1]);

        render_explorer(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Explorer => render_explorer(f, chunks[1], app),
            Page::Route => render_route_page(f, chunks[1], app),
            Page::About => render_about(f, chunks[1]),
        }
    }

    // Status bar
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let progress = ProgressView::from_tracker(&app.tracker);

    let pages = [Page::Explorer, Page::Route, Page::About];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Visited: {}/{}", progress.visited, progress.total),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        progress.label.clone(),
        Style::default().fg(Color::Green),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" G318 Story Map "),
    );

    f.render_widget(header, area);
}

fn render_explorer(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Min(0),    // POI table
            Constraint::Length(3), // Progress gauge
        ])
        .split(area);

    render_search_box(f, chunks[0], app);
    render_poi_table(f, chunks[1], app);
    render_progress_gauge(f, chunks[2], app);
}

fn render_search_box(f: &mut Frame, area: Rect, app: &App) {
    let border_color = if app.search_mode {
        Color::Yellow
    } else {
        Color::White
    };

    let content = if app.query.is_empty() && !app.search_mode {
        Line::from(Span::styled(
            "Press / to search",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        let mut spans = vec![Span::raw(app.query.clone())];
        if app.search_mode {
            spans.push(Span::styled("▌", Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    };

    let search_box = Paragraph::new(vec![content]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Search "),
    );

    f.render_widget(search_box, area);
}

fn poi_type_color(poi_type: PoiType) -> Color {
    match poi_type {
        PoiType::Town => Color::White,
        PoiType::Pass | PoiType::Canyon => Color::Yellow,
        PoiType::Lake | PoiType::Glacier => Color::Cyan,
        PoiType::Peak => Color::Red,
        PoiType::Palace => Color::Magenta,
        PoiType::Forest => Color::Green,
        PoiType::Bridge => Color::LightBlue,
    }
}

fn render_poi_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["", "Name", "Type", "Distance", "Description"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let pois: Vec<&Poi> = app
        .filtered
        .iter()
        .filter_map(|id| app.catalog.get(*id))
        .collect();
    let items = poi_list(&pois, &app.tracker, app.selected_id());

    let rows = items.iter().map(|item| {
        let type_color = pois
            .iter()
            .find(|p| p.id == item.id)
            .map(|p| poi_type_color(p.poi_type))
            .unwrap_or(Color::White);

        let visited_mark = if item.visited {
            Cell::from("✓").style(Style::default().fg(Color::Blue))
        } else {
            Cell::from(" ")
        };

        let cells = vec![
            visited_mark,
            Cell::from(item.name.clone()),
            Cell::from(item.type_label).style(Style::default().fg(type_color)),
            Cell::from(item.distance.clone()),
            Cell::from(item.summary.clone()).style(Style::default().fg(Color::DarkGray)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(30),
            Constraint::Length(14),
            Constraint::Length(24),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Points of Interest "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_progress_gauge(f: &mut Frame, area: Rect, app: &App) {
    let progress = ProgressView::from_tracker(&app.tracker);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Journey Progress "),
        )
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .percent(progress.percent as u16)
        .label(progress.label);

    f.render_widget(gauge, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let detail = match &app.detail {
        Some(d) => d,
        None => return,
    };

    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                detail.title.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Type: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(detail.type_label),
            Span::raw("    "),
            Span::styled(
                "Distance: ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(detail.distance.clone()),
        ]),
        Line::from(""),
    ];

    // Image carousel
    if detail.carousel.is_empty() {
        content.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "No images",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    } else {
        let dots: String = detail
            .carousel
            .dots()
            .iter()
            .map(|&active| if active { "●" } else { "○" })
            .collect::<Vec<_>>()
            .join(" ");

        content.push(Line::from(vec![
            Span::styled(
                format!(
                    "  Image {}/{}: ",
                    detail.carousel.index() + 1,
                    detail.carousel.count()
                ),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                detail.current_image().unwrap_or("").to_string(),
                Style::default().fg(Color::Green),
            ),
        ]));
        content.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(dots, Style::default().fg(Color::Yellow)),
            Span::styled(
                "  (←/→ to switch)",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from("  ─────────────────────────────────────"));
    content.push(Line::from(""));
    content.push(Line::from(vec![Span::styled(
        "  ABOUT",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )]));
    content.push(Line::from(""));
    content.push(Line::from(format!("  {}", detail.description)));
    content.push(Line::from(""));
    content.push(Line::from(vec![Span::styled(
        "  STORY",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )]));
    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            detail.story.clone(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ]));

    if !detail.tips.is_empty() {
        content.push(Line::from(""));
        content.push(Line::from(vec![Span::styled(
            "  TIPS",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]));
        content.push(Line::from(""));
        for tip in &detail.tips {
            content.push(Line::from(format!("  • {}", tip)));
        }
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![Span::styled(
        "  Press Enter to close",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )]));

    let detail_panel = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" POI Details "),
    );

    f.render_widget(detail_panel, area);
}

fn render_route_page(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Segment table
            Constraint::Min(0),    // Waypoints
        ])
        .split(area);

    let header_cells = ["Segment", "Color", "Waypoints", "Length"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = app
        .route
        .segments()
        .iter()
        .map(|segment| {
            let cells = vec![
                Cell::from(segment.name.clone()),
                Cell::from(segment.color.clone()).style(Style::default().fg(Color::Green)),
                Cell::from(format!("{}", app.route.segment_waypoints(segment).len())),
                Cell::from(format!("{:.0} km", app.route.segment_length_km(segment))),
            ];
            Row::new(cells).height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(22),
            Constraint::Length(10),
            Constraint::Length(11),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(
                " G318 Route - {:.0} km total ",
                app.route.total_length_km()
            )),
    );

    f.render_widget(table, chunks[0]);

    let names: Vec<&str> = app.route.waypoints().iter().map(|w| w.name.as_str()).collect();
    let waypoints = Paragraph::new(format!("\n  {}", names.join("  ›  ")))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Waypoints "),
        );

    f.render_widget(waypoints, chunks[1]);
}

fn render_about(f: &mut Frame, area: Rect) {
    let content = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "  G318 Story Map",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("  An interactive map of the scenery along China National Highway 318,"),
        Line::from("  from Shanghai to Lhasa."),
        Line::from(""),
        Line::from("  • Open a stop to read its story and travel tips"),
        Line::from("  • Search to find stops quickly"),
        Line::from("  • Track which stops you have visited"),
        Line::from("  • Follow the route segment by segment"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Keys",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("  /          edit the search query"),
        Line::from("  c          clear the search query"),
        Line::from("  Enter      open / close the selected stop"),
        Line::from("  ←/→        previous / next image"),
        Line::from("  ↑/↓  j/k   move the selection"),
        Line::from("  Tab        switch page"),
        Line::from("  r          reset visit progress"),
        Line::from("  q          quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Enjoy the journey!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" About "),
    );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.filtered.len();

    let mut status_spans = vec![Span::styled(
        format!(" Stop: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if !app.query.is_empty() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Search: {}", app.query),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("/", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Search | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Details | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Reset | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

// ============================================================================
// TESTS
// ============================================================================
