use crate::app::App;
use crate::braille;
use dla_accretion::Band;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 30;

// UI color scheme
const BORDER_COLOR: Color = Color::Rgb(0xF5, 0xC8, 0x42);
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Status
            Constraint::Length(8), // Growth
            Constraint::Min(8),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_growth_box(frame, sections[1], app);
    render_controls_box(frame, sections[2]);
}

fn labeled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(DIM_TEXT_COLOR)),
        Span::styled(value, Style::default().fg(TEXT_COLOR)),
    ])
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let engine = &app.engine;
    let (state, color) = if engine.is_running() {
        ("Growing", Color::Green)
    } else if engine.is_complete() {
        ("Complete", HIGHLIGHT_COLOR)
    } else {
        ("Stopped", Color::Red)
    };

    let content = vec![
        Line::from(Span::styled(state, Style::default().fg(color))),
        labeled("Particles", engine.particle_count().to_string()),
        labeled("Tree", format!("#{}", app.generation)),
    ];

    let paragraph = Paragraph::new(content).block(styled_block(" Status "));
    frame.render_widget(paragraph, area);
}

fn render_growth_box(frame: &mut Frame, area: Rect, app: &App) {
    let engine = &app.engine;
    let settings = engine.settings();
    let boundary = engine.boundary();
    let band = engine.band();
    let band_color = {
        let rgb = engine.current_color();
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    };

    let content = vec![
        labeled("Profile", settings.sizing.name().to_string()),
        labeled("Radius", format!("{:.0}px", boundary.radius)),
        labeled("Reach", format!("{:.1}px", engine.max_radius())),
        Line::from(vec![
            Span::styled("Band: ", Style::default().fg(DIM_TEXT_COLOR)),
            Span::styled(
                format!("{} ({}/3)", band.name(), band.index() + 1),
                Style::default().fg(band_color),
            ),
        ]),
        labeled("Speed", format!("{}/frame", settings.iterations_per_frame)),
        labeled("Outline", if app.show_boundary { "On" } else { "Off" }.to_string()),
    ];

    let paragraph = Paragraph::new(content).block(styled_block(" Growth "));
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect) {
    let key = |k: &str, desc: &str| {
        Line::from(vec![
            Span::styled(format!("{:<7}", k), Style::default().fg(HIGHLIGHT_COLOR)),
            Span::styled(desc.to_string(), Style::default().fg(TEXT_COLOR)),
        ])
    };

    let content = vec![
        key("Space", "Start/Stop"),
        key("R/G", "New tree"),
        key("+/-", "Speed"),
        key("B", "Outline"),
        key("V", "Fullscreen"),
        key("H", "Help"),
        key("Q", "Quit"),
    ];

    let paragraph = Paragraph::new(content).block(styled_block(" Controls "));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = braille::render_to_braille(app.engine.surface(), inner.width, inner.height);

    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            let cell_rect = Rect {
                x,
                y,
                width: 1,
                height: 1,
            };
            let span = Span::styled(cell.char.to_string(), Style::default().fg(cell.color));
            frame.render_widget(Paragraph::new(Line::from(span)), cell_rect);
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(24);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    frame.render_widget(Clear, help_area);

    let band_line = |band: Band, text: &str| {
        let rgb = app.engine.settings().palette.color(band);
        Line::from(vec![
            Span::styled("\u{2588}\u{2588} ", Style::default().fg(Color::Rgb(rgb.r, rgb.g, rgb.b))),
            Span::raw(text.to_string()),
        ])
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("DIFFUSION-LIMITED AGGREGATION", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Particles wander in from just beyond the tree until they touch it and stick. Growth stops once a branch reaches the boundary circle."),
        Line::from(""),
        Line::from(Span::styled("GROWTH BANDS:", Style::default().fg(HIGHLIGHT_COLOR))),
        band_line(Band::Early, "First third of the expected particles"),
        band_line(Band::Middle, "Second third"),
        band_line(Band::Late, "Everything after"),
        Line::from(""),
        Line::from(Span::styled("CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Start/Stop, R/G=New tree, +/-=Speed, B=Outline, V=Fullscreen, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2);
    let is_scrollable = content_height > visible_height;

    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}
