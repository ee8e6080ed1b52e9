use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::quiz::{QuestionView, QuizSession};
use crate::ui::theme::Theme;

const OPTION_LETTERS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

/// The active quiz screen: progress, banca, the question with its five
/// options, and the explanation once answered.
pub struct QuestionCard<'a> {
    session: &'a QuizSession,
    subject: &'a str,
    speaking: bool,
    notice: Option<&'a str>,
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(
        session: &'a QuizSession,
        subject: &'a str,
        speaking: bool,
        notice: Option<&'a str>,
        scroll: u16,
        theme: &'a Theme,
    ) -> Self {
        Self {
            session,
            subject,
            speaking,
            notice,
            scroll,
            theme,
        }
    }

    /// Spoken form of the current question: the statement followed by the
    /// lettered options.
    pub fn spoken_question(session: &QuizSession) -> String {
        let q = session.current_question();
        let options = q
            .options
            .iter()
            .enumerate()
            .map(|(i, opt)| format!("{}: {opt}", OPTION_LETTERS[i]))
            .collect::<Vec<_>>()
            .join(". ");
        format!("{}. Alternativas: {options}", q.question)
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;
        let q = session.current_question();
        let idx = session.current_index();
        let view = session.view(idx);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(5),
            ])
            .split(area);

        // Info line
        let speaking_text = if self.speaking { "  ♪ speaking…" } else { "" };
        let info = format!(
            " Question {} of {}  |  Banca: {}  |  {}{}",
            idx + 1,
            session.len(),
            q.banca,
            self.subject,
            speaking_text,
        );
        Paragraph::new(Line::from(Span::styled(
            info,
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg()),
        )))
        .style(Style::default().bg(colors.header_bg()))
        .render(layout[0], buf);

        // Progress bar
        let width = layout[1].width.saturating_sub(2) as usize;
        let filled = width * (idx + 1) / session.len().max(1);
        let bar = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                "█".repeat(filled),
                Style::default().fg(colors.bar_filled()),
            ),
            Span::styled(
                "░".repeat(width.saturating_sub(filled)),
                Style::default().fg(colors.bar_empty()),
            ),
        ]);
        Paragraph::new(bar).render(layout[1], buf);

        // Question, options, explanation
        let mut lines: Vec<Line> = vec![Line::from("")];
        lines.push(Line::from(Span::styled(
            q.question.clone(),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));

        for (i, option) in q.options.iter().enumerate() {
            let style = match view {
                QuestionView::Unanswered => Style::default().fg(colors.fg()),
                QuestionView::Correct { selected } if i == selected => Style::default()
                    .fg(colors.correct())
                    .add_modifier(Modifier::BOLD),
                QuestionView::Incorrect { selected, correct } => {
                    if i == correct {
                        Style::default()
                            .fg(colors.correct())
                            .add_modifier(Modifier::BOLD)
                    } else if i == selected {
                        Style::default().fg(colors.incorrect())
                    } else {
                        Style::default().fg(colors.muted())
                    }
                }
                _ => Style::default().fg(colors.muted()),
            };
            lines.push(Line::from(Span::styled(
                format!("  {}. {option}", OPTION_LETTERS[i]),
                style,
            )));
        }

        if let Some(answer) = session.answer_for(idx) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Explanation",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                q.explanation.clone(),
                Style::default().fg(colors.fg()),
            )));
            if answer.is_correct {
                let query = format!("{} {} {}", self.subject, q.banca, q.question);
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!(
                        "Deepen: https://www.google.com/search?q={}",
                        query.replace(' ', "+")
                    ),
                    Style::default().fg(colors.accent_dim()),
                )));
            }
        }

        if let Some(notice) = self.notice {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                notice.to_string(),
                Style::default().fg(colors.warning()),
            )));
        }

        let block = Block::bordered().border_style(Style::default().fg(colors.border()));
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(layout[2], buf);
    }
}
