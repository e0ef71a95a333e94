use crate::tweets::TweetFeed;
use crate::ui::widgets::Panel;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

pub struct TweetFeedPanel<'a> {
    pub title: &'a str,
    pub feed: &'a TweetFeed,
}

impl Panel for TweetFeedPanel<'_> {
    fn title(&self) -> String {
        format!(
            "{} ({}/{})",
            self.title,
            self.feed.len(),
            self.feed.max_tweets()
        )
    }

    fn render(&self, frame: &mut Frame, area: Rect, selected: bool) {
        let block = self.block(selected);

        if self.feed.is_empty() {
            let waiting = List::new(vec![ListItem::new("Waiting for tweets...")]).block(block);
            frame.render_widget(waiting, area);
            return;
        }

        // Leave room for the borders and the timestamp prefix.
        let width = area.width.saturating_sub(2 + 9).max(10) as usize;

        let items: Vec<ListItem> = self
            .feed
            .entries()
            .map(|entry| {
                let stamp = entry.received_at.format("%H:%M:%S ").to_string();
                let mut lines = Vec::new();
                for (i, chunk) in textwrap::wrap(&entry.text, width).into_iter().enumerate() {
                    let prefix = if i == 0 {
                        Span::styled(stamp.clone(), Style::default().fg(Color::DarkGray))
                    } else {
                        Span::raw(" ".repeat(stamp.len()))
                    };
                    lines.push(Line::from(vec![
                        prefix,
                        Span::styled(chunk.into_owned(), Style::default().fg(Color::White)),
                    ]));
                }
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_widget(list, area);
    }
}
