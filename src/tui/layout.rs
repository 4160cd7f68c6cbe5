//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::Canvas;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph};

use super::runtime::{App, TICK_MS};
use super::style;
use crate::sim::clock::SimTime;
use crate::sim::event::{Annotation, SegmentKind};
use crate::sim::types::{MINUTES_PER_DAY, START_HOUR};

/// Number of labels along the time axis.
const X_LABELS: usize = 5;

/// Dots per midnight marker, every other one drawn.
const MARKER_DOTS: usize = 30;

/// Approximate width of one terminal column in annotation offset pixels.
const PIXELS_PER_COLUMN: i32 = 8;

/// Minute indices of every 00:00 within a run.
pub fn midnight_minutes(total_minutes: usize) -> impl Iterator<Item = usize> {
    let first = (MINUTES_PER_DAY - START_HOUR * 60) as usize + 1;
    (first..=total_minutes).step_by(MINUTES_PER_DAY as usize)
}

/// Plot rectangle a bordered `Chart` uses for its data, given the widths of
/// its widest y label and its first x label.
fn plot_area(area: Rect, y_label_width: u16, first_x_label_width: u16) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    // Left-aligned first x label ends under the y axis.
    let left = y_label_width
        .max(first_x_label_width.saturating_sub(1))
        .min(inner.width / 3)
        + 1;
    Rect::new(
        inner.x + left,
        inner.y,
        inner.width.saturating_sub(left),
        inner.height.saturating_sub(2),
    )
}

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // chart
            Constraint::Length(3), // battery gauge
            Constraint::Length(4), // status panel
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
    render_gauge(frame, app, chunks[2]);
    render_status(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: clock, progress, speed, run state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (icon, label) = if app.is_finished() {
        ("■", "DONE")
    } else if app.paused {
        ("‖", "PAUSED")
    } else {
        ("▶", "RUNNING")
    };
    let clock = app.now.map_or_else(|| "--- --:--".to_string(), |t| t.to_string());

    let header = Line::from(vec![
        Span::styled(
            " POWER-SIM ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(clock, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " │ {}/{} min │ {} min per {TICK_MS}ms │ {icon} {label} ",
            app.elapsed(),
            app.total_minutes(),
            app.minutes_per_tick(),
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Energy over time, one dataset per status kind, with threshold lines.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let config = app.config();
    let x_hi = app.total_minutes() as f64;

    let series: Vec<(SegmentKind, Vec<(f64, f64)>)> = SegmentKind::ALL
        .iter()
        .map(|&kind| (kind, app.points_of(kind)))
        .collect();
    let off_line = [(0.0, config.off_wh), (x_hi, config.off_wh)];
    let resume_line = [(0.0, config.resume_wh), (x_hi, config.resume_wh)];
    let markers: Vec<Vec<(f64, f64)>> = midnight_minutes(app.total_minutes())
        .map(|minute| {
            (0..=MARKER_DOTS)
                .step_by(2)
                .map(|i| (minute as f64, config.capacity_wh * i as f64 / MARKER_DOTS as f64))
                .collect()
        })
        .collect();

    let mut datasets: Vec<Dataset> = series
        .iter()
        .filter(|(_, points)| !points.is_empty())
        .map(|(kind, points)| {
            Dataset::default()
                .name(kind.label())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(style::segment_color(*kind)))
                .data(points)
        })
        .collect();
    for (name, line) in [("off", &off_line), ("resume", &resume_line)] {
        datasets.push(
            Dataset::default()
                .name(name)
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(style::THRESHOLD_COLOR))
                .data(line),
        );
    }
    for marker in &markers {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(style::MIDNIGHT_COLOR))
                .data(marker),
        );
    }

    let x_labels: Vec<String> = (0..X_LABELS)
        .map(|i| {
            let minute = app.total_minutes().saturating_sub(1) * i / (X_LABELS - 1);
            SimTime::at_offset(config.start_day, minute).to_string()
        })
        .collect();
    let y_labels = vec![
        "0".to_string(),
        format!("{:.0}", config.capacity_wh / 2.0),
        format!("{:.0}", config.capacity_wh),
    ];

    let y_label_width = y_labels.iter().map(String::len).max().unwrap_or(0) as u16;
    let first_x_label_width = x_labels.first().map_or(0, String::len) as u16;
    let plot = plot_area(area, y_label_width, first_x_label_width);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Battery Energy ")
                .borders(Borders::ALL),
        )
        .x_axis(Axis::default().bounds([0.0, x_hi]).labels(x_labels))
        .y_axis(
            Axis::default()
                .title("Wh")
                .bounds([0.0, config.capacity_wh])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
    render_annotations(frame, app.annotations(), plot, x_hi, config.capacity_wh);
}

/// Time labels drawn beside their points, over the chart's plot area.
fn render_annotations(
    frame: &mut Frame,
    annotations: &[Annotation],
    plot: Rect,
    x_hi: f64,
    y_hi: f64,
) {
    if plot.width == 0 || plot.height == 0 {
        return;
    }
    let minutes_per_column = x_hi / f64::from(plot.width);
    let canvas = Canvas::default()
        .x_bounds([0.0, x_hi])
        .y_bounds([0.0, y_hi])
        .paint(|ctx| {
            for note in annotations {
                let columns = f64::from(note.offset.0 / PIXELS_PER_COLUMN);
                let x = (note.minute as f64 + columns * minutes_per_column).clamp(0.0, x_hi);
                ctx.print(
                    x,
                    note.energy_wh.clamp(0.0, y_hi),
                    Span::styled(
                        note.label.clone(),
                        Style::default().fg(style::ANNOTATION_COLOR),
                    ),
                );
            }
        });
    frame.render_widget(canvas, plot);
}

/// Battery fill gauge, colored against the off and resume thresholds.
fn render_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let config = app.config();
    let fraction = app.battery_fraction().clamp(0.0, 1.0);
    let energy_wh = fraction * config.capacity_wh;
    let color = style::level_color(energy_wh, config.off_wh, config.resume_wh);

    let gauge = Gauge::default()
        .block(Block::default().title(" Battery ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(color))
        .ratio(fraction)
        .label(format!("{energy_wh:.0} Wh / {:.0}%", fraction * 100.0));
    frame.render_widget(gauge, area);
}

/// Most recent status line, and the closing event once the run is over.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![app.last_status.as_ref().map_or_else(
        || Line::from("  Waiting for first minute..."),
        |status| Line::from(format!("  {status}")),
    )];
    if let Some(closing) = &app.closing {
        lines.push(Line::from(format!(
            "  Closed at minute {}: {}",
            closing.minute,
            closing.kind().label()
        )));
    }
    let paragraph =
        Paragraph::new(lines).block(Block::default().title(" Status ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Space:Pause  +/-:Speed  r:Restart",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
