//! TUI rendering for the testimonial carousel.

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::CarouselApp;

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &CarouselApp) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // card
      Constraint::Length(1), // dots
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0]);
  draw_card(f, rows[1], app);
  draw_dots(f, rows[2], app);
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " Minty Labs · what clients say",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Card ─────────────────────────────────────────────────────────────────────

fn draw_card(f: &mut Frame, area: Rect, app: &CarouselApp) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(if app.hovering {
      Color::Green
    } else {
      Color::DarkGray
    }));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(t) = app.carousel.current() else {
    f.render_widget(
      Paragraph::new("No featured testimonials.")
        .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let rating = t.rating.min(5) as usize;
  let stars = "★".repeat(rating) + &"☆".repeat(5 - rating);
  let lines = vec![
    Line::from(Span::styled(stars, Style::default().fg(Color::Yellow))),
    Line::from(""),
    Line::from(Span::styled(
      format!("“{}”", t.quote),
      Style::default().add_modifier(Modifier::ITALIC),
    )),
    Line::from(""),
    Line::from(vec![
      Span::styled(
        format!(" {} ", t.initial),
        Style::default()
          .fg(Color::Black)
          .bg(Color::Green)
          .add_modifier(Modifier::BOLD),
      ),
      Span::raw(" "),
      Span::styled(
        t.author.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
      ),
    ]),
    Line::from(Span::styled(
      format!("{}, {}", t.title, t.company),
      Style::default().fg(Color::Gray),
    )),
    Line::from(""),
    Line::from(Span::styled(
      format!("{} · {} · {}", t.industry, t.project_duration, t.team_size),
      Style::default().fg(Color::DarkGray),
    )),
  ];
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

// ─── Dots ─────────────────────────────────────────────────────────────────────

fn draw_dots(f: &mut Frame, area: Rect, app: &CarouselApp) {
  let state = app.state();
  let dots: Vec<Span> = (0..state.len)
    .map(|i| {
      if i == state.index {
        Span::styled("● ", Style::default().fg(Color::Green))
      } else {
        Span::styled("○ ", Style::default().fg(Color::DarkGray))
      }
    })
    .collect();
  f.render_widget(Paragraph::new(Line::from(dots)).centered(), area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &CarouselApp) {
  let state = app.state();
  let mode_label = match (state.auto_playing, state.paused) {
    (false, _) => "MANUAL",
    (true, true) => "PAUSED",
    (true, false) => "AUTO",
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    "  ←→/hl prev/next  1-9 jump  space autoplay  p hover  q quit",
    Style::default().fg(Color::DarkGray),
  );

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
