use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::theme::Theme;

/// Full-screen wait indicator shown while a generation request is in flight.
/// There is no cancel path: the request always runs to its single outcome.
pub struct LoadingScreen<'a> {
    title: &'a str,
    subtitle: &'a str,
    tick: u64,
    theme: &'a Theme,
}

impl<'a> LoadingScreen<'a> {
    pub fn new(title: &'a str, subtitle: &'a str, tick: u64, theme: &'a Theme) -> Self {
        Self {
            title,
            subtitle,
            tick,
            theme,
        }
    }
}

impl Widget for LoadingScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let dots = ".".repeat((self.tick / 3 % 4) as usize);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{}{dots}", self.title),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                self.subtitle,
                Style::default().fg(colors.muted()),
            )),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
