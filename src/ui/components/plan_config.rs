use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::model::{
    MAX_HOURS_PER_WEEK, MIN_HOURS_PER_WEEK, PLAN_DURATIONS, StudyPlanSettings,
};
use crate::ui::components::FormOutcome;
use crate::ui::components::quiz_config::{render_choice_field, render_text_field};
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

const MAX_SUBJECTS: usize = 8;

/// Study plan configuration form. Subject rows can grow (Ctrl-n) and shrink
/// (Ctrl-d); blank rows are dropped at submit time by the settings validator.
pub struct PlanForm {
    pub goal: LineInput,
    pub subjects: Vec<LineInput>,
    pub hours: u32,
    pub duration_idx: usize,
    pub field: usize,
    pub error: Option<&'static str>,
}

impl PlanForm {
    pub fn new() -> Self {
        Self {
            goal: LineInput::new(""),
            subjects: vec![LineInput::new("")],
            hours: 10,
            duration_idx: 1, // 8 weeks
            field: 0,
            error: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn field_count(&self) -> usize {
        // goal + subject rows + hours + duration
        self.subjects.len() + 3
    }

    fn hours_field(&self) -> usize {
        self.subjects.len() + 1
    }

    fn duration_field(&self) -> usize {
        self.subjects.len() + 2
    }

    fn subject_row(&self) -> Option<usize> {
        (self.field >= 1 && self.field <= self.subjects.len()).then(|| self.field - 1)
    }

    pub fn handle(&mut self, key: KeyEvent) -> FormOutcome<StudyPlanSettings> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => {
                    if self.subjects.len() < MAX_SUBJECTS {
                        let row = self.subject_row().map(|r| r + 1).unwrap_or(self.subjects.len());
                        self.subjects.insert(row, LineInput::new(""));
                        self.field = row + 1;
                    }
                    return FormOutcome::Continue;
                }
                KeyCode::Char('d') => {
                    if let Some(row) = self.subject_row()
                        && self.subjects.len() > 1
                    {
                        self.subjects.remove(row);
                        self.field = self.field.min(self.subjects.len());
                    }
                    return FormOutcome::Continue;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Esc => return FormOutcome::Back,
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab | KeyCode::Down => {
                self.field = (self.field + 1) % self.field_count();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = if self.field == 0 {
                    self.field_count() - 1
                } else {
                    self.field - 1
                };
            }
            KeyCode::Right if self.field == self.hours_field() => {
                self.hours = (self.hours + 1).min(MAX_HOURS_PER_WEEK);
            }
            KeyCode::Left if self.field == self.hours_field() => {
                self.hours = self.hours.saturating_sub(1).max(MIN_HOURS_PER_WEEK);
            }
            KeyCode::Right if self.field == self.duration_field() => {
                self.duration_idx = (self.duration_idx + 1) % PLAN_DURATIONS.len();
            }
            KeyCode::Left if self.field == self.duration_field() => {
                self.duration_idx =
                    (self.duration_idx + PLAN_DURATIONS.len() - 1) % PLAN_DURATIONS.len();
            }
            _ => {
                if self.field == 0 {
                    self.goal.handle(key);
                    self.error = None;
                } else if let Some(row) = self.subject_row() {
                    self.subjects[row].handle(key);
                    self.error = None;
                }
            }
        }
        FormOutcome::Continue
    }

    fn submit(&mut self) -> FormOutcome<StudyPlanSettings> {
        let subjects: Vec<String> = self.subjects.iter().map(|s| s.value().to_string()).collect();
        match StudyPlanSettings::from_form(
            self.goal.value(),
            &subjects,
            self.hours,
            PLAN_DURATIONS[self.duration_idx],
        ) {
            Ok(settings) => FormOutcome::Submit(settings),
            Err(message) => {
                self.error = Some(message);
                FormOutcome::Continue
            }
        }
    }
}

pub struct PlanConfigScreen<'a> {
    form: &'a PlanForm,
    theme: &'a Theme,
}

impl<'a> PlanConfigScreen<'a> {
    pub fn new(form: &'a PlanForm, theme: &'a Theme) -> Self {
        Self { form, theme }
    }
}

impl Widget for PlanConfigScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let form = self.form;

        let block = Block::bordered()
            .title(" Study Plan ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut constraints = vec![Constraint::Length(2), Constraint::Length(3)];
        constraints.extend(form.subjects.iter().map(|_| Constraint::Length(3)));
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Length(2));
        constraints.push(Constraint::Min(0));
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            "  Describe your goal; [Ctrl-n] adds a subject, [Ctrl-d] removes one",
            Style::default().fg(colors.muted()),
        )))
        .render(layout[0], buf);

        render_text_field(buf, layout[1], "Goal", &form.goal, form.field == 0, self.theme);

        for (i, subject) in form.subjects.iter().enumerate() {
            render_text_field(
                buf,
                layout[2 + i],
                &format!("Subject {}", i + 1),
                subject,
                form.field == i + 1,
                self.theme,
            );
        }

        let hours_area = layout[2 + form.subjects.len()];
        render_choice_field(
            buf,
            hours_area,
            "Hours per week",
            &form.hours.to_string(),
            form.field == form.hours_field(),
            self.theme,
        );

        let duration_area = layout[3 + form.subjects.len()];
        render_choice_field(
            buf,
            duration_area,
            "Duration (weeks)",
            &PLAN_DURATIONS[form.duration_idx].to_string(),
            form.field == form.duration_field(),
            self.theme,
        );

        if let Some(error) = form.error {
            Paragraph::new(Line::from(Span::styled(
                format!("  {error}"),
                Style::default().fg(colors.error()),
            )))
            .render(layout[4 + form.subjects.len()], buf);
        }
    }
}
