use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Row, Table, Widget};

use crate::stats::OverallStats;
use crate::ui::theme::Theme;

/// Statistics dashboard: overall cards plus the per-subject breakdown,
/// worst-performing subjects first.
pub struct StatsScreen<'a> {
    stats: &'a OverallStats,
    confirm_clear: bool,
    theme: &'a Theme,
}

impl<'a> StatsScreen<'a> {
    pub fn new(stats: &'a OverallStats, confirm_clear: bool, theme: &'a Theme) -> Self {
        Self {
            stats,
            confirm_clear,
            theme,
        }
    }
}

impl Widget for StatsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let stats = self.stats;

        let block = Block::bordered()
            .title(" Statistics ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if stats.total_quizzes == 0 {
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  No quizzes completed yet.",
                    Style::default().fg(colors.muted()),
                )),
                Line::from(Span::styled(
                    "  Finish a quiz and your accuracy by subject shows up here.",
                    Style::default().fg(colors.muted()),
                )),
            ])
            .render(inner, buf);
            return;
        }

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(inner);

        let cards = Line::from(vec![
            Span::styled(
                format!("  Quizzes {}", stats.total_quizzes),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("   Questions {}", stats.total_questions),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                format!("   Correct {}", stats.total_correct),
                Style::default().fg(colors.correct()),
            ),
            Span::styled(
                format!("   Accuracy {:.1}%", stats.overall_accuracy),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(vec![Line::from(""), cards]).render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            "  By subject (weakest first)",
            Style::default().fg(colors.muted()),
        )))
        .render(layout[1], buf);

        let rows: Vec<Row> = stats
            .subjects
            .iter()
            .map(|s| {
                let accuracy_color = if s.accuracy < 60.0 {
                    colors.incorrect()
                } else {
                    colors.correct()
                };
                Row::new(vec![
                    Span::styled(s.subject.clone(), Style::default().fg(colors.fg())),
                    Span::styled(
                        s.total_questions.to_string(),
                        Style::default().fg(colors.fg()),
                    ),
                    Span::styled(
                        s.correct_answers.to_string(),
                        Style::default().fg(colors.fg()),
                    ),
                    Span::styled(
                        format!("{:.1}%", s.accuracy),
                        Style::default().fg(accuracy_color),
                    ),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(50),
                Constraint::Percentage(17),
                Constraint::Percentage(16),
                Constraint::Percentage(17),
            ],
        )
        .header(
            Row::new(vec!["Subject", "Questions", "Correct", "Accuracy"]).style(
                Style::default()
                    .fg(colors.header_fg())
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .column_spacing(2);
        Widget::render(table, layout[2], buf);

        if self.confirm_clear {
            Paragraph::new(Line::from(Span::styled(
                "  Clear ALL statistics? This cannot be undone.  [y] yes  [n] no",
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            )))
            .render(layout[3], buf);
        }
    }
}
