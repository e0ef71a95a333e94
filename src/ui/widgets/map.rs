use crate::map::markers::MarkerLayer;
use crate::map::MapView;
use crate::ui::widgets::Panel;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::canvas::{Canvas, Map as WorldMap, MapResolution, Points},
    Frame,
};

pub struct MapPanel<'a> {
    pub title: &'a str,
    pub view: &'a MapView,
    pub markers: &'a MarkerLayer,
}

impl Panel for MapPanel<'_> {
    fn title(&self) -> String {
        let center = self.view.center();
        format!(
            "{} | z{} | {:.4}, {:.4}",
            self.title,
            self.view.zoom(),
            center.lat,
            center.lng
        )
    }

    fn render(&self, frame: &mut Frame, area: Rect, selected: bool) {
        let bounds = self.view.bounds();
        let center = self.view.center();

        let coords: Vec<(f64, f64)> = self
            .markers
            .attached()
            .map(|m| (m.position.lng, m.position.lat))
            .collect();

        let canvas = Canvas::default()
            .block(self.block(selected))
            .marker(Marker::Braille)
            .x_bounds([bounds.sw.lng, bounds.ne.lng])
            .y_bounds([bounds.sw.lat, bounds.ne.lat])
            .paint(|ctx| {
                ctx.draw(&WorldMap {
                    color: Color::DarkGray,
                    resolution: MapResolution::High,
                });
                ctx.layer();

                ctx.draw(&Points {
                    coords: &coords,
                    color: Color::Yellow,
                });
                for &(lng, lat) in &coords {
                    ctx.print(
                        lng,
                        lat,
                        Span::styled(
                            "●",
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        ),
                    );
                }

                ctx.print(
                    center.lng,
                    center.lat,
                    Span::styled("+", Style::default().fg(Color::Red)),
                );
            });

        frame.render_widget(canvas, area);
    }
}
