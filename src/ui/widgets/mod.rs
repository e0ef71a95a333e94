pub mod coord_form;
pub mod map;
pub mod status;
pub mod tweet_feed;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// A bordered section of the screen, drawn from borrowed session state.
pub trait Panel {
    fn title(&self) -> String;

    fn render(&self, frame: &mut Frame, area: Rect, selected: bool);

    fn block(&self, selected: bool) -> Block<'static> {
        let border_style = if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };

        Block::default()
            .title(format!(" {} ", self.title()))
            .borders(Borders::ALL)
            .border_style(border_style)
    }
}
