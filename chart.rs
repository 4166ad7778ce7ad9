//! Bar chart rendering of ranked patterns.

use std::io::{self, Stdout};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing::debug;

use crate::error::Result;
use crate::patterns::RankedPattern;

const LABEL_MAX_CHARS: usize = 40;
const CHART_TITLE: &str = "Top Patterns";

/// Displays a ranked pattern list. Implementations may block until the user
/// dismisses the display.
pub trait Renderer {
    fn render(&mut self, ranked: &[RankedPattern]) -> Result<()>;
}

/// Full-screen horizontal bar chart; returns once the user presses q, Esc or Enter.
#[derive(Debug, Default)]
pub struct TerminalChart;

impl Renderer for TerminalChart {
    fn render(&mut self, ranked: &[RankedPattern]) -> Result<()> {
        if ranked.is_empty() {
            debug!("no patterns to chart");
            return Ok(());
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let outcome = show_until_dismissed(&mut terminal, ranked);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        outcome
    }
}

fn show_until_dismissed(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ranked: &[RankedPattern],
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, ranked))?;
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
            {
                return Ok(());
            }
        }
    }
}

/// Lay out the chart: highest count on top, frequency along the x axis.
pub fn draw(f: &mut Frame, ranked: &[RankedPattern]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // chart
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    let bars: Vec<Bar> = ranked
        .iter()
        .map(|r| {
            Bar::default()
                .label(Line::from(truncate_str(&r.pattern.to_string(), LABEL_MAX_CHARS)))
                .value(r.count as u64)
                .text_value(r.count.to_string())
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(" {CHART_TITLE} "))
                .borders(Borders::ALL),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::default().fg(Color::LightBlue))
        .value_style(Style::default().fg(Color::Black).bg(Color::LightBlue))
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, chunks[0]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" Frequency →", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   [q/Esc/Enter] close"),
    ]));
    f.render_widget(footer, chunks[1]);
}

fn truncate_str(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}…")
    } else {
        s.to_string()
    }
}

/// Renderer for headless runs (`--no-chart`).
#[derive(Debug, Default)]
pub struct NoChart;

impl Renderer for NoChart {
    fn render(&mut self, ranked: &[RankedPattern]) -> Result<()> {
        debug!(patterns = ranked.len(), "chart disabled");
        Ok(())
    }
}

/// Keeps every ranked list it is asked to draw.
#[derive(Debug, Default)]
pub struct RecordingChart {
    pub rendered: Vec<Vec<RankedPattern>>,
}

impl RecordingChart {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for RecordingChart {
    fn render(&mut self, ranked: &[RankedPattern]) -> Result<()> {
        self.rendered.push(ranked.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::Pattern;
    use ratatui::backend::TestBackend;

    fn ranked(rows: &[(&str, usize)]) -> Vec<RankedPattern> {
        rows.iter()
            .map(|(text, count)| RankedPattern {
                pattern: Pattern::new(text.split(' ').map(str::to_string).collect()),
                count: *count,
            })
            .collect()
    }

    fn screen(rows: &[(&str, usize)]) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let data = ranked(rows);
        terminal.draw(|f| draw(f, &data)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_highest_bar_drawn_first() {
        let lines = screen(&[("the dog", 5), ("dog ran", 2)]);
        let first = lines.iter().position(|l| l.contains("the dog")).unwrap();
        let second = lines.iter().position(|l| l.contains("dog ran")).unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_footer_names_axis() {
        let lines = screen(&[("the dog", 1)]);
        assert!(lines.last().unwrap().contains("Frequency"));
        assert!(lines[0].contains("Top Patterns"));
    }

    #[test]
    fn test_truncate_long_labels() {
        assert_eq!(truncate_str("abcdef", 3), "abc…");
        assert_eq!(truncate_str("abc", 3), "abc");
    }

    #[test]
    fn test_recording_chart_keeps_lists() {
        let mut chart = RecordingChart::new();
        chart.render(&ranked(&[("a b", 2)])).unwrap();
        chart.render(&[]).unwrap();
        assert_eq!(chart.rendered.len(), 2);
        assert_eq!(chart.rendered[0][0].count, 2);
        assert!(chart.rendered[1].is_empty());
    }
}
