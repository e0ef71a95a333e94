pub mod widgets;

use crate::app::{App, Focus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use widgets::coord_form::CoordFormPanel;
use widgets::map::MapPanel;
use widgets::status::StatusPanel;
use widgets::tweet_feed::TweetFeedPanel;
use widgets::Panel;

/// Screen regions: the map on the left, status/form/feed stacked on the right,
/// one help line at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub map: Rect,
    pub status: Rect,
    pub form: Rect,
    pub feed: Rect,
    pub help: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(1)])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(rows[0]);

        let sidebar = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Length(5),
                Constraint::Min(4),
            ])
            .split(columns[1]);

        Self {
            map: columns[0],
            status: sidebar[0],
            form: sidebar[1],
            feed: sidebar[2],
            help: rows[1],
        }
    }

    /// Drawable size of the map canvas, inside its border.
    pub fn map_canvas_size(&self) -> (u16, u16) {
        (
            self.map.width.saturating_sub(2),
            self.map.height.saturating_sub(2),
        )
    }
}

pub fn render(frame: &mut Frame, app: &App) {
    let layout = ScreenLayout::new(frame.area());
    let session = app.session();

    MapPanel {
        title: app.map_title(),
        view: &session.map,
        markers: &session.markers,
    }
    .render(frame, layout.map, app.focus() == Focus::Map);

    StatusPanel {
        ws_id: session.ws_id(),
        server: app.server_label(),
        connection: session.connection(),
        markers: &session.markers,
        last_submitted: session.last_submitted(),
    }
    .render(frame, layout.status, false);

    CoordFormPanel {
        form: &session.form,
        error: app.notice(),
    }
    .render(frame, layout.form, app.focus() == Focus::Form);

    TweetFeedPanel {
        title: app.feed_title(),
        feed: &session.feed,
    }
    .render(frame, layout.feed, false);

    render_help(frame, layout.help, app.focus());
}

fn render_help(frame: &mut Frame, area: Rect, focus: Focus) {
    let text = match focus {
        Focus::Map => "←↓↑→/hjkl: pan | +/-: zoom | Tab/g: go to coordinates | q: quit",
        Focus::Form => "0-9 . -: edit | Tab: switch field | Enter: go | Esc: back to map",
    };
    let help = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_partitions_screen() {
        let layout = ScreenLayout::new(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.help.height, 1);
        assert_eq!(layout.help.y, 39);
        assert_eq!(layout.map.height, 39);
        assert_eq!(layout.status.x, layout.form.x);
        assert_eq!(layout.form.x, layout.feed.x);
        assert!(layout.map.width > layout.feed.width);
        assert_eq!(layout.map_canvas_size(), (layout.map.width - 2, 37));
    }

    #[test]
    fn test_tiny_screen_does_not_underflow() {
        let layout = ScreenLayout::new(Rect::new(0, 0, 1, 1));
        let (cols, rows) = layout.map_canvas_size();
        assert_eq!((cols, rows), (0, 0));
    }
}
