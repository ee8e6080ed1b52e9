use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::model::StudyPlan;
use crate::ui::theme::Theme;

/// Scrollable viewer for a generated study plan.
pub struct StudyPlanScreen<'a> {
    plan: &'a StudyPlan,
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> StudyPlanScreen<'a> {
    pub fn new(plan: &'a StudyPlan, scroll: u16, theme: &'a Theme) -> Self {
        Self {
            plan,
            scroll,
            theme,
        }
    }

    /// Upper bound for the scroll offset (content lines, before wrapping).
    pub fn line_count(plan: &StudyPlan) -> usize {
        let mut count = 2; // title + blank
        for week in &plan.weekly_plan {
            count += 2; // week heading + blank
            for day in &week.daily_schedule {
                count += 1 + day.activities.len();
            }
        }
        count
    }
}

impl Widget for StudyPlanScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let plan = self.plan;

        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(
                plan.title.clone(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for week in &plan.weekly_plan {
            lines.push(Line::from(Span::styled(
                format!("Week {} — {}", week.week, week.focus),
                Style::default()
                    .fg(colors.header_fg())
                    .add_modifier(Modifier::BOLD),
            )));
            for day in &week.daily_schedule {
                lines.push(Line::from(Span::styled(
                    format!("  {}", day.day),
                    Style::default().fg(colors.fg()),
                )));
                for activity in &day.activities {
                    lines.push(Line::from(Span::styled(
                        format!(
                            "    • {} — {} ({})",
                            activity.subject, activity.activity, activity.duration
                        ),
                        Style::default().fg(colors.muted()),
                    )));
                }
            }
            lines.push(Line::from(""));
        }

        let block = Block::bordered()
            .title(" Study Plan ")
            .border_style(Style::default().fg(colors.border()));
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DailySchedule, StudyActivity, WeeklyPlan};

    #[test]
    fn line_count_tracks_plan_shape() {
        let plan = StudyPlan {
            title: "Plano".to_string(),
            weekly_plan: vec![WeeklyPlan {
                week: 1,
                focus: "Português".to_string(),
                daily_schedule: vec![DailySchedule {
                    day: "Segunda-feira".to_string(),
                    activities: vec![StudyActivity {
                        subject: "Português".to_string(),
                        activity: "Leitura".to_string(),
                        duration: "1 hora".to_string(),
                    }],
                }],
            }],
        };
        // title + blank + heading + day + activity + trailing blank
        assert_eq!(StudyPlanScreen::line_count(&plan), 6);
    }
}
