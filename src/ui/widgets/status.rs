use crate::channel::protocol::SubmitBounds;
use crate::map::markers::{MarkerLayer, MarkerRetention};
use crate::session::ConnectionState;
use crate::ui::widgets::Panel;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Session id, connection state and viewport bookkeeping.
pub struct StatusPanel<'a> {
    pub ws_id: Option<&'a str>,
    pub server: &'a str,
    pub connection: &'a ConnectionState,
    pub markers: &'a MarkerLayer,
    pub last_submitted: Option<&'a SubmitBounds>,
}

impl StatusPanel<'_> {
    fn connection_span(&self) -> Span<'static> {
        match self.connection {
            ConnectionState::Connecting => {
                Span::styled("connecting", Style::default().fg(Color::Yellow))
            }
            ConnectionState::Connected => {
                Span::styled("connected", Style::default().fg(Color::Green))
            }
            ConnectionState::Disconnected => {
                Span::styled("disconnected", Style::default().fg(Color::Red))
            }
            ConnectionState::Failed(message) => Span::styled(
                format!("error: {}", message),
                Style::default().fg(Color::Red),
            ),
        }
    }

    fn markers_text(&self) -> String {
        let retention = match self.markers.retention() {
            MarkerRetention::Retain => "retain",
            MarkerRetention::Release => "release",
        };
        format!(
            "{} shown / {} tracked ({})",
            self.markers.attached_count(),
            self.markers.len(),
            retention
        )
    }
}

impl Panel for StatusPanel<'_> {
    fn title(&self) -> String {
        "Status".to_string()
    }

    fn render(&self, frame: &mut Frame, area: Rect, selected: bool) {
        let label = Style::default().fg(Color::DarkGray);

        let session = match self.ws_id {
            Some(id) => Span::styled(
                id.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            None => Span::styled("waiting for server...", label),
        };

        let bounds = match self.last_submitted {
            Some(b) => format!(
                "{:.3},{:.3} → {:.3},{:.3}",
                b.sw.lat, b.sw.lng, b.ne.lat, b.ne.lng
            ),
            None => "none yet".to_string(),
        };

        let lines = vec![
            Line::from(vec![Span::styled("Session  ", label), session]),
            Line::from(vec![
                Span::styled("Server   ", label),
                Span::raw(self.server.to_string()),
                Span::raw(" "),
                self.connection_span(),
            ]),
            Line::from(vec![
                Span::styled("Markers  ", label),
                Span::raw(self.markers_text()),
            ]),
            Line::from(vec![Span::styled("Bounds   ", label), Span::raw(bounds)]),
        ];

        let paragraph = Paragraph::new(lines).block(self.block(selected));
        frame.render_widget(paragraph, area);
    }
}
