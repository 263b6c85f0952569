use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, InputMode, ListTab};
use crate::detail::DetailFeed;
use crate::error::FetchError;
use crate::router::Route;
use crate::types::{DetailRecord, SummaryRecord};
use crate::util_text::{
    capitalize, dex_number, format_height, format_weight, stat_bar_percent, stat_label, text_bar,
    truncate,
};

pub const TITLE: &str = "Pokemon";
pub const SUBTITLE: &str = "Discover and explore Pokemon with page controls";

const MIN_WIDTH: u16 = 50;
const MIN_HEIGHT: u16 = 12;
const STAT_BAR_WIDTH: u16 = 20;

// ===============================
// Top-level draw
// ===============================
pub fn draw(f: &mut Frame, app: &mut App) {
    app.tick_spinner();

    let goto_open = app.input_mode() == InputMode::Goto;
    let show_debug = app.debug_visible();

    let mut constraints: Vec<Constraint> = Vec::with_capacity(5);
    constraints.push(Constraint::Length(3)); // header
    if goto_open { constraints.push(Constraint::Length(3)); }
    constraints.push(Constraint::Min(0)); // body
    if show_debug { constraints.push(Constraint::Length(8)); }
    constraints.push(Constraint::Length(2)); // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut idx = 0usize;
    header(f, chunks[idx], app); idx += 1;
    if goto_open {
        goto_bar(f, chunks[idx], app); idx += 1;
    }
    body(f, chunks[idx], app); idx += 1;
    if show_debug {
        debug_panel(f, chunks[idx], app); idx += 1;
    }
    footer(f, chunks[idx], app);
}

// ===============================
// Header / go-to prompt
// ===============================
fn header(f: &mut Frame, area: Rect, app: &App) {
    let colors = app.theme();
    let title = Line::from(vec![
        Span::styled(TITLE, Style::default().fg(colors.accent).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(SUBTITLE, Style::default().fg(colors.text_dim)),
    ]);

    let second = match app.route() {
        Route::List => {
            // Box-drawing tab strip, active tab highlighted
            let mut spans = Vec::new();
            for (i, tab) in ListTab::ALL.iter().enumerate() {
                spans.push(Span::raw(if i == 0 { "┌─" } else { "┬─" }));
                if *tab == app.tab() {
                    spans.push(Span::styled(
                        tab.label(),
                        Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
                    ));
                } else {
                    spans.push(Span::styled(tab.label(), Style::default().fg(colors.text)));
                }
                spans.push(Span::raw("─"));
            }
            spans.push(Span::raw("┐"));
            Line::from(spans)
        }
        other => Line::from(Span::styled(other.to_string(), Style::default().fg(colors.text_dim))),
    };

    let paragraph = Paragraph::new(vec![title, second]).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(colors.border)),
    );
    f.render_widget(paragraph, area);
}

fn goto_bar(f: &mut Frame, area: Rect, app: &App) {
    let colors = app.theme();
    let input = app.goto_input();
    let paragraph = Paragraph::new(input)
        .style(Style::default().fg(colors.accent))
        .block(
            Block::default()
                .title(" Go to route (Enter to open, Esc to cancel) ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(colors.accent)),
        );
    f.render_widget(paragraph, area);

    if area.width > 2 {
        let x = area.x + 1 + (input.chars().count().min(area.width.saturating_sub(2) as usize) as u16);
        f.set_cursor_position((x, area.y + 1));
    }
}

// ===============================
// Body
// ===============================
fn body(f: &mut Frame, area: Rect, app: &App) {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        too_small(f, area, app);
        return;
    }

    match app.route() {
        Route::List => match app.tab() {
            ListTab::Paged => paged_view(f, area, app),
            ListTab::Incremental => incremental_view(f, area, app),
        },
        Route::Detail { .. } => {
            if let Some(feed) = app.detail() {
                detail_view(f, area, app, feed);
            }
        }
        Route::NotFound { path } => not_found(f, area, app, path),
    }
}

fn too_small(f: &mut Frame, area: Rect, app: &App) {
    let colors = app.theme();
    let text = format!(
        "Terminal too small!\n\nMinimum size: {}×{}\nCurrent size: {}×{}",
        MIN_WIDTH, MIN_HEIGHT, area.width, area.height
    );
    let warning = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors.error).add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true });
    f.render_widget(warning, area);
}

/// Split a list area into optional error bar, list and one status line
fn list_chunks(area: Rect, has_error: bool) -> (Option<Rect>, Rect, Rect) {
    let mut constraints = Vec::with_capacity(3);
    if has_error { constraints.push(Constraint::Length(1)); }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));
    let chunks = Layout::vertical(constraints).split(area);
    if has_error {
        (Some(chunks[0]), chunks[1], chunks[2])
    } else {
        (None, chunks[0], chunks[1])
    }
}

fn error_bar(f: &mut Frame, area: Rect, app: &App, err: &FetchError) {
    let colors = app.theme();
    let line = Line::from(vec![
        Span::styled(
            format!("Failed to load Pokémon: {}", err.user_message()),
            Style::default().fg(colors.error).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("r", Style::default().fg(colors.accent)),
        Span::styled(" Retry", Style::default().fg(colors.text_dim)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn records_list(f: &mut Frame, area: Rect, app: &App, title: String, records: &[SummaryRecord]) {
    let colors = app.theme();
    let url_width = (area.width as usize).saturating_sub(30);
    let items: Vec<ListItem> = records
        .iter()
        .map(|rec| {
            let dex = rec.id.map(dex_number).unwrap_or_else(|| "#---".to_string());
            let sprite = rec.sprite_url.as_deref().map(|u| truncate(u, url_width)).unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(format!("{dex:<6}"), Style::default().fg(colors.text_dim)),
                Span::styled(format!("{:<18}", capitalize(&rec.name)), Style::default().fg(colors.text)),
                Span::styled(sprite, Style::default().fg(colors.text_dim)),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    if !records.is_empty() {
        state.select(Some(app.selected().min(records.len() - 1)));
    }

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(colors.selection_bg)
                .fg(colors.selection_fg)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(colors.border)),
        );
    f.render_stateful_widget(list, area, &mut state);
}

fn notice(f: &mut Frame, area: Rect, app: &App, text: &str) {
    let p = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme().text_dim));
    f.render_widget(p, area);
}

fn loading_line(app: &App, text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("{} {text}", app.spinner_char()),
        Style::default().fg(app.theme().accent),
    ))
}

fn paged_view(f: &mut Frame, area: Rect, app: &App) {
    let Some(feed) = app.paged() else { return };
    let (err_area, list_area, status_area) = list_chunks(area, feed.error().is_some());

    if let (Some(a), Some(err)) = (err_area, feed.error()) {
        error_bar(f, a, app, err);
    }

    if feed.shows_empty_notice() {
        notice(f, list_area, app, "No Pokémon found.");
    } else {
        let title = format!(" {} of {} ", feed.records().len(), feed.total_count());
        records_list(f, list_area, app, title, feed.records());
    }

    if feed.is_loading() {
        f.render_widget(Paragraph::new(loading_line(app, "Loading Pokémon...")).alignment(Alignment::Center), status_area);
    } else if feed.shows_pager() {
        let colors = app.theme();
        let key = |s: &'static str| Span::styled(s, Style::default().fg(colors.accent));
        let line = Line::from(vec![
            key("«"),
            Span::raw(" "),
            key("‹"),
            Span::styled(
                format!(" Page {} / {} ", feed.page(), feed.total_pages()),
                Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
            ),
            key("›"),
            Span::raw(" "),
            key("»"),
        ]);
        f.render_widget(Paragraph::new(line).alignment(Alignment::Center), status_area);
    }
}

fn incremental_view(f: &mut Frame, area: Rect, app: &App) {
    let Some(feed) = app.incremental() else { return };
    let (err_area, list_area, status_area) = list_chunks(area, feed.error().is_some());

    if let (Some(a), Some(err)) = (err_area, feed.error()) {
        error_bar(f, a, app, err);
    }

    let title = format!(" {} loaded ", feed.records().len());
    records_list(f, list_area, app, title, feed.records());

    let colors = app.theme();
    let status = if feed.is_loading() {
        Some(loading_line(app, "Loading Pokémon..."))
    } else if feed.shows_load_more() {
        Some(Line::from(vec![
            Span::styled("n", Style::default().fg(colors.accent)),
            Span::raw(" / "),
            Span::styled("Space", Style::default().fg(colors.accent)),
            Span::styled(" Load More", Style::default().fg(colors.text)),
        ]))
    } else if feed.shows_end_marker() {
        Some(Line::from(Span::styled(
            "You've seen all Pokémon!",
            Style::default().fg(colors.success).add_modifier(Modifier::BOLD),
        )))
    } else {
        None
    };
    if let Some(line) = status {
        f.render_widget(Paragraph::new(line).alignment(Alignment::Center), status_area);
    }
}

// ===============================
// Detail
// ===============================
fn detail_view(f: &mut Frame, area: Rect, app: &App, feed: &DetailFeed) {
    let colors = app.theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors.border));

    if feed.is_loading() {
        let p = Paragraph::new(loading_line(app, "Loading Pokémon details..."))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(p, area);
        return;
    }

    if let Some(err) = feed.error() {
        let lines = vec![
            Line::from(Span::styled(
                format!("Error: {}", err.user_message()),
                Style::default().fg(colors.error).add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
            Line::from(vec![
                Span::styled("r", Style::default().fg(colors.accent)),
                Span::raw(" Retry   "),
                Span::styled("b", Style::default().fg(colors.accent)),
                Span::raw(" Back to List"),
            ]),
        ];
        let p = Paragraph::new(lines).alignment(Alignment::Center).block(block);
        f.render_widget(p, area);
        return;
    }

    if let Some(rec) = feed.record() {
        let p = Paragraph::new(detail_lines(app, rec))
            .wrap(Wrap { trim: false })
            .scroll((app.detail_scroll(), 0))
            .block(block.title(" Back to List (b) "));
        f.render_widget(p, area);
    }
}

fn detail_lines(app: &App, rec: &DetailRecord) -> Vec<Line<'static>> {
    let colors = app.theme();
    let label = |s: &'static str| Span::styled(s, Style::default().fg(colors.text_dim));
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(capitalize(&rec.name), Style::default().fg(colors.accent).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(dex_number(rec.id), Style::default().fg(colors.text_dim)),
    ]));

    let mut chips = Vec::new();
    for t in &rec.types {
        chips.push(Span::styled(
            format!("[{}]", capitalize(&t.name)),
            Style::default().fg(colors.chip).add_modifier(Modifier::BOLD),
        ));
        chips.push(Span::raw(" "));
    }
    lines.push(Line::from(chips));
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        label("Height: "),
        Span::raw(format_height(rec.height)),
        Span::raw("    "),
        label("Weight: "),
        Span::raw(format_weight(rec.weight)),
    ]));
    if let Some(xp) = rec.base_experience {
        lines.push(Line::from(vec![label("Base Experience: "), Span::raw(format!("{xp} XP"))]));
    }

    let abilities = rec
        .abilities
        .iter()
        .map(|a| {
            let name = capitalize(&a.name);
            if a.hidden { format!("{name} (hidden)") } else { name }
        })
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(Line::from(vec![label("Abilities: "), Span::raw(abilities)]));
    lines.push(Line::raw(""));

    lines.push(Line::from(Span::styled(
        "Base Stats",
        Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
    )));
    for stat in &rec.stats {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<16}", stat_label(&stat.name)), Style::default().fg(colors.text_dim)),
            Span::raw(format!("{:>4} ", stat.base)),
            Span::styled(
                text_bar(stat_bar_percent(stat.base), STAT_BAR_WIDTH),
                Style::default().fg(colors.bar),
            ),
        ]));
    }

    if let Some(url) = rec.image() {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            label("Image: "),
            Span::styled(url.to_string(), Style::default().fg(colors.text_dim)),
        ]));
    }
    lines
}

fn not_found(f: &mut Frame, area: Rect, app: &App, path: &str) {
    let colors = app.theme();
    let lines = vec![
        Line::from(Span::styled(
            "404 - Page Not Found",
            Style::default().fg(colors.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(path.to_string(), Style::default().fg(colors.text_dim))),
        Line::raw(""),
        Line::from(vec![
            Span::styled("h", Style::default().fg(colors.accent)),
            Span::raw(" Go Home"),
        ]),
    ];
    let vertical = Layout::vertical([
        Constraint::Percentage(35),
        Constraint::Length(lines.len() as u16),
        Constraint::Min(0),
    ])
    .split(area);
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), vertical[1]);
}

// ===============================
// Footer / debug
// ===============================
fn footer(f: &mut Frame, area: Rect, app: &App) {
    let colors = app.theme();
    let key = |s: &'static str| Span::styled(s, Style::default().fg(colors.accent));
    let mut spans = Vec::new();

    match app.route() {
        Route::List => {
            spans.push(key("Tab"));
            spans.push(Span::raw(" switch │ "));
            spans.push(key("↑/↓"));
            spans.push(Span::raw(" select │ "));
            spans.push(key("Enter"));
            spans.push(Span::raw(" open │ "));
            match app.tab() {
                ListTab::Paged => {
                    spans.push(key("←/→"));
                    spans.push(Span::raw(" page │ "));
                }
                ListTab::Incremental => {
                    spans.push(key("n"));
                    spans.push(Span::raw(" more │ "));
                }
            }
        }
        Route::Detail { .. } => {
            spans.push(key("↑/↓"));
            spans.push(Span::raw(" scroll │ "));
            spans.push(key("b"));
            spans.push(Span::raw(" back │ "));
        }
        Route::NotFound { .. } => {
            spans.push(key("h"));
            spans.push(Span::raw(" home │ "));
        }
    }
    spans.push(key("r"));
    spans.push(Span::raw(" retry │ "));
    spans.push(key(":"));
    spans.push(Span::raw(" go │ "));
    spans.push(key("q"));
    spans.push(Span::raw(" quit"));

    if app.debug_visible() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("[DEBUG]", Style::default().fg(colors.text_dim)));
    }
    if let Some(toast) = app.toast_message() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            toast.to_string(),
            Style::default().fg(colors.success).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::raw(format!(" │ FPS {}", app.fps())));

    let w = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(colors.border)),
    );
    f.render_widget(w, area);
}

fn debug_panel(f: &mut Frame, area: Rect, app: &App) {
    let log = app.debug_log();
    let lines_to_show = area.height.saturating_sub(2) as usize;
    let start = log.len().saturating_sub(lines_to_show);
    let lines: Vec<Line> = log[start..].iter().map(|msg| Line::raw(msg.as_str())).collect();

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(app.theme().text_dim))
        .block(
            Block::default()
                .title(" Debug ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.theme().text_dim)),
        );
    f.render_widget(paragraph, area);
}
