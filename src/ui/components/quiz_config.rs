use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::model::{Difficulty, QUESTION_COUNTS, QuizSettings};
use crate::ui::components::FormOutcome;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

const FIELD_SUBJECT: usize = 0;
const FIELD_COUNT: usize = 1;
const FIELD_DIFFICULTY: usize = 2;
const FIELD_LAST: usize = FIELD_DIFFICULTY;

/// Quiz configuration form state. Validation happens on submit; an invalid
/// form shows an inline error and never leaves the screen.
pub struct QuizForm {
    pub subject: LineInput,
    pub count_idx: usize,
    pub difficulty_idx: usize,
    pub field: usize,
    pub error: Option<&'static str>,
}

impl QuizForm {
    pub fn new() -> Self {
        Self {
            subject: LineInput::new(""),
            count_idx: 1, // 10 questions
            difficulty_idx: 1,
            field: FIELD_SUBJECT,
            error: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn handle(&mut self, key: KeyEvent) -> FormOutcome<QuizSettings> {
        match key.code {
            KeyCode::Esc => return FormOutcome::Back,
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab | KeyCode::Down => {
                self.field = if self.field == FIELD_LAST {
                    0
                } else {
                    self.field + 1
                };
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = if self.field == 0 {
                    FIELD_LAST
                } else {
                    self.field - 1
                };
            }
            _ if self.field == FIELD_SUBJECT => {
                self.subject.handle(key);
                self.error = None;
            }
            KeyCode::Right => self.cycle(1),
            KeyCode::Left => self.cycle(-1),
            _ => {}
        }
        FormOutcome::Continue
    }

    fn cycle(&mut self, dir: isize) {
        let step = |idx: usize, len: usize| -> usize {
            if dir > 0 {
                (idx + 1) % len
            } else {
                (idx + len - 1) % len
            }
        };
        match self.field {
            FIELD_COUNT => self.count_idx = step(self.count_idx, QUESTION_COUNTS.len()),
            FIELD_DIFFICULTY => self.difficulty_idx = step(self.difficulty_idx, Difficulty::ALL.len()),
            _ => {}
        }
    }

    fn submit(&mut self) -> FormOutcome<QuizSettings> {
        let subject = self.subject.value().trim();
        if subject.is_empty() {
            self.error = Some("Enter a subject for the quiz");
            return FormOutcome::Continue;
        }
        FormOutcome::Submit(QuizSettings {
            subject: subject.to_string(),
            num_questions: QUESTION_COUNTS[self.count_idx],
            difficulty: Difficulty::ALL[self.difficulty_idx],
        })
    }
}

pub struct QuizConfigScreen<'a> {
    form: &'a QuizForm,
    theme: &'a Theme,
}

impl<'a> QuizConfigScreen<'a> {
    pub fn new(form: &'a QuizForm, theme: &'a Theme) -> Self {
        Self { form, theme }
    }
}

impl Widget for QuizConfigScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let form = self.form;

        let block = Block::bordered()
            .title(" New Quiz ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let header = Paragraph::new(Line::from(Span::styled(
            "  Configure the practice exam the AI will generate",
            Style::default().fg(colors.muted()),
        )));
        header.render(layout[0], buf);

        render_text_field(
            buf,
            layout[1],
            "Subject",
            &form.subject,
            form.field == FIELD_SUBJECT,
            self.theme,
        );
        render_choice_field(
            buf,
            layout[2],
            "Questions",
            &QUESTION_COUNTS[form.count_idx].to_string(),
            form.field == FIELD_COUNT,
            self.theme,
        );
        render_choice_field(
            buf,
            layout[3],
            "Difficulty",
            Difficulty::ALL[form.difficulty_idx].label(),
            form.field == FIELD_DIFFICULTY,
            self.theme,
        );

        if let Some(error) = form.error {
            Paragraph::new(Line::from(Span::styled(
                format!("  {error}"),
                Style::default().fg(colors.error()),
            )))
            .render(layout[4], buf);
        }
    }
}

pub(crate) fn render_text_field(
    buf: &mut Buffer,
    area: Rect,
    label: &str,
    input: &LineInput,
    selected: bool,
    theme: &Theme,
) {
    let colors = &theme.colors;
    let indicator = if selected { " > " } else { "   " };
    let label_style = field_label_style(selected, theme);

    let (before, cursor, after) = input.render_parts();
    let mut value_spans = vec![Span::styled(
        "   ".to_string(),
        Style::default().fg(colors.fg()),
    )];
    value_spans.push(Span::styled(
        before.to_string(),
        Style::default().fg(colors.fg()),
    ));
    if selected {
        let cursor_text = cursor.map(|c| c.to_string()).unwrap_or_else(|| " ".to_string());
        value_spans.push(Span::styled(
            cursor_text,
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    } else if let Some(c) = cursor {
        value_spans.push(Span::styled(
            c.to_string(),
            Style::default().fg(colors.fg()),
        ));
    }
    value_spans.push(Span::styled(
        after.to_string(),
        Style::default().fg(colors.fg()),
    ));

    let lines = vec![
        Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
        Line::from(value_spans),
    ];
    Paragraph::new(lines).render(area, buf);
}

pub(crate) fn render_choice_field(
    buf: &mut Buffer,
    area: Rect,
    label: &str,
    value: &str,
    selected: bool,
    theme: &Theme,
) {
    let colors = &theme.colors;
    let indicator = if selected { " > " } else { "   " };
    let value_style = Style::default().fg(if selected {
        colors.accent()
    } else {
        colors.muted()
    });

    let lines = vec![
        Line::from(Span::styled(
            format!("{indicator}{label}:"),
            field_label_style(selected, theme),
        )),
        Line::from(Span::styled(format!("   < {value} >"), value_style)),
    ];
    Paragraph::new(lines).render(area, buf);
}

fn field_label_style(selected: bool, theme: &Theme) -> Style {
    let colors = &theme.colors;
    Style::default()
        .fg(if selected { colors.accent() } else { colors.fg() })
        .add_modifier(if selected {
            Modifier::BOLD
        } else {
            Modifier::empty()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut QuizForm, text: &str) {
        for ch in text.chars() {
            form.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn blank_subject_is_rejected_inline() {
        let mut form = QuizForm::new();
        type_str(&mut form, "   ");
        match form.handle(key(KeyCode::Enter)) {
            FormOutcome::Continue => {}
            _ => panic!("expected inline rejection"),
        }
        assert!(form.error.is_some());
    }

    #[test]
    fn submit_carries_selected_values() {
        let mut form = QuizForm::new();
        type_str(&mut form, "Direito Administrativo");
        // Questions field: 10 -> 15
        form.handle(key(KeyCode::Down));
        form.handle(key(KeyCode::Right));
        // Difficulty field: Medium -> Hard
        form.handle(key(KeyCode::Down));
        form.handle(key(KeyCode::Right));

        match form.handle(key(KeyCode::Enter)) {
            FormOutcome::Submit(settings) => {
                assert_eq!(settings.subject, "Direito Administrativo");
                assert_eq!(settings.num_questions, 15);
                assert_eq!(settings.difficulty, Difficulty::Hard);
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn count_cycles_wrap_around() {
        let mut form = QuizForm::new();
        form.handle(key(KeyCode::Down));
        assert_eq!(QUESTION_COUNTS[form.count_idx], 10);
        for _ in 0..QUESTION_COUNTS.len() {
            form.handle(key(KeyCode::Right));
        }
        assert_eq!(QUESTION_COUNTS[form.count_idx], 10);
        form.handle(key(KeyCode::Left));
        assert_eq!(QUESTION_COUNTS[form.count_idx], 5);
    }

    #[test]
    fn esc_backs_out() {
        let mut form = QuizForm::new();
        assert!(matches!(form.handle(key(KeyCode::Esc)), FormOutcome::Back));
    }
}
