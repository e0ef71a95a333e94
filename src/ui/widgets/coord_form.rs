use crate::form::{CoordForm, Field};
use crate::ui::widgets::Panel;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct CoordFormPanel<'a> {
    pub form: &'a CoordForm,
    pub error: Option<&'a str>,
}

impl CoordFormPanel<'_> {
    fn field_line(&self, field: Field, value: &str, editing: bool) -> Line<'static> {
        let active = editing && self.form.active() == field;
        let value_style = if active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if active { "▏" } else { "" };

        Line::from(vec![
            Span::styled(
                format!("{:<10}", field.name()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("{}{}", value, cursor), value_style),
        ])
    }
}

impl Panel for CoordFormPanel<'_> {
    fn title(&self) -> String {
        "Go to".to_string()
    }

    fn render(&self, frame: &mut Frame, area: Rect, selected: bool) {
        let mut lines = vec![
            self.field_line(Field::Latitude, self.form.latitude(), selected),
            self.field_line(Field::Longitude, self.form.longitude(), selected),
        ];

        if let Some(error) = self.error {
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        } else if selected {
            lines.push(Line::from(Span::styled(
                "Enter: go | Tab: switch | Esc: map",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let paragraph = Paragraph::new(lines).block(self.block(selected));
        frame.render_widget(paragraph, area);
    }
}
