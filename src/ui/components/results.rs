use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::quiz::{QuestionView, QuizSession};
use crate::ui::theme::Theme;

const OPTION_LETTERS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

/// Post-quiz summary with a per-question review list.
pub struct ResultsScreen<'a> {
    session: &'a QuizSession,
    subject: &'a str,
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> ResultsScreen<'a> {
    pub fn new(session: &'a QuizSession, subject: &'a str, scroll: u16, theme: &'a Theme) -> Self {
        Self {
            session,
            subject,
            scroll,
            theme,
        }
    }
}

impl Widget for ResultsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(5)])
            .split(area);

        let correct = session.correct_count();
        let total = session.len();
        let score = session.score_percentage();
        let verdict_color = if score >= 60.0 {
            colors.correct()
        } else {
            colors.incorrect()
        };

        let summary = vec![
            Line::from(Span::styled(
                format!(" {} — quiz complete", self.subject),
                Style::default()
                    .fg(colors.header_fg())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(" {correct} of {total} correct ({score:.0}%)"),
                Style::default().fg(verdict_color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                " Restarting generates a fresh set of questions for the same settings",
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(summary).render(layout[0], buf);

        let mut lines: Vec<Line> = Vec::new();
        for (i, q) in session.questions().iter().enumerate() {
            let (marker, style) = match session.view(i) {
                QuestionView::Correct { .. } => {
                    ("✓", Style::default().fg(colors.correct()))
                }
                QuestionView::Incorrect { .. } => {
                    ("✗", Style::default().fg(colors.incorrect()))
                }
                QuestionView::Unanswered => ("-", Style::default().fg(colors.muted())),
            };
            lines.push(Line::from(Span::styled(
                format!("{marker} Q{}. {}", i + 1, q.question),
                style,
            )));
            if let QuestionView::Incorrect { selected, correct } = session.view(i) {
                lines.push(Line::from(Span::styled(
                    format!(
                        "    you answered {}, correct was {}: {}",
                        OPTION_LETTERS[selected], OPTION_LETTERS[correct], q.options[correct]
                    ),
                    Style::default().fg(colors.muted()),
                )));
            }
        }

        let block = Block::bordered()
            .title(" Review ")
            .border_style(Style::default().fg(colors.border()));
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(layout[1], buf);
    }
}
