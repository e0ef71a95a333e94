use crate::channel::{EventChannel, ServerEventReceiver};
use crate::config::Config;
use crate::session::Session;
use crate::ui::{self, ScreenLayout};
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{layout::Rect, DefaultTerminal};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Fraction of the visible span moved by one pan key press.
const PAN_STEP: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Map,
    Form,
}

pub struct App {
    session: Session,
    channel: Box<dyn EventChannel>,
    events: ServerEventReceiver,
    focus: Focus,
    notice: Option<String>,
    map_title: String,
    feed_title: String,
    server_label: String,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, channel: Box<dyn EventChannel>, events: ServerEventReceiver) -> Self {
        let server_label = channel.describe();
        Self {
            session: Session::from_config(config),
            channel,
            events,
            focus: Focus::Map,
            notice: None,
            map_title: config.map.title.clone(),
            feed_title: config.feed.title.clone(),
            server_label,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn map_title(&self) -> &str {
        &self.map_title
    }

    pub fn feed_title(&self) -> &str {
        &self.feed_title
    }

    pub fn server_label(&self) -> &str {
        &self.server_label
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut input = EventStream::new();
        let mut tick = tokio::time::interval(TICK_RATE);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("entering main loop");
        while !self.should_quit {
            let size = terminal.size()?;
            self.resize(Rect::new(0, 0, size.width, size.height), Instant::now());
            terminal.draw(|frame| ui::render(frame, self))?;

            tokio::select! {
                maybe_event = input.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_terminal_event(event),
                    Some(Err(e)) => return Err(e.into()),
                    None => self.should_quit = true,
                },
                Some(event) = self.events.recv() => {
                    self.session.handle_server_event(event, Instant::now());
                }
                _ = tick.tick() => {}
            }

            self.flush_idle(Instant::now()).await;
        }

        if let Err(e) = self.channel.close().await {
            warn!(error = %e, "failed to close channel");
        }
        info!("main loop finished");
        Ok(())
    }

    /// Keeps the map viewport in step with the canvas size.
    pub fn resize(&mut self, area: Rect, now: Instant) {
        let (cols, rows) = ScreenLayout::new(area).map_canvas_size();
        self.session.map.set_size(cols, rows, now);
    }

    /// Emits a bounds submission when the map has settled. Failures are
    /// logged and dropped.
    pub async fn flush_idle(&mut self, now: Instant) {
        if let Some(payload) = self.session.poll_idle(now) {
            if let Err(e) = self.channel.submit_bounds(&payload).await {
                warn!(error = %e, "submit_bounds dropped");
            }
        }
    }

    fn handle_terminal_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key, Instant::now());
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        // Shift still passes through: '+' arrives shifted on most layouts.
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return;
        }

        match self.focus {
            Focus::Map => self.handle_map_key(key.code, now),
            Focus::Form => self.handle_form_key(key.code, now),
        }
    }

    fn handle_map_key(&mut self, code: KeyCode, now: Instant) {
        let map = &mut self.session.map;
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => map.pan(-PAN_STEP, 0.0, now),
            KeyCode::Right | KeyCode::Char('l') => map.pan(PAN_STEP, 0.0, now),
            KeyCode::Up | KeyCode::Char('k') => map.pan(0.0, PAN_STEP, now),
            KeyCode::Down | KeyCode::Char('j') => map.pan(0.0, -PAN_STEP, now),
            KeyCode::Char('+') | KeyCode::Char('=') => map.zoom_in(now),
            KeyCode::Char('-') => map.zoom_out(now),
            KeyCode::Tab | KeyCode::Char('g') => self.focus = Focus::Form,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, code: KeyCode, now: Instant) {
        let form = &mut self.session.form;
        match code {
            KeyCode::Esc => {
                self.focus = Focus::Map;
                self.notice = None;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.next_field(),
            KeyCode::Backspace => form.delete_char(),
            KeyCode::Delete => form.clear_active(),
            KeyCode::Char(c) => form.add_char(c),
            KeyCode::Enter => match self.session.submit_form(now) {
                Ok(()) => {
                    self.notice = None;
                    self.focus = Focus::Map;
                }
                Err(e) => {
                    warn!(error = %e, "form rejected");
                    self.notice = Some(e.to_string());
                }
            },
            _ => {}
        }
    }
}
