use crate::client::{LookupError, OrderSource};
use crate::format::DisplayOptions;
use crate::order::Order;
use crate::ui::widgets::OrderScreen;
use crate::view::ItemsView;
use crate::viewer::OrderViewer;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Response for the search issued as `generation`.
#[derive(Debug, Clone)]
pub struct LookupMessage {
    pub generation: u64,
    pub outcome: Result<Order, LookupError>,
}

pub struct App {
    viewer: OrderViewer,
    screen: OrderScreen,
    input: String,
    source: Arc<dyn OrderSource>,
    tx: mpsc::UnboundedSender<LookupMessage>,
    rx: mpsc::UnboundedReceiver<LookupMessage>,
    should_quit: bool,
}

impl App {
    pub fn new(source: Arc<dyn OrderSource>, options: DisplayOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            viewer: OrderViewer::new(options),
            screen: OrderScreen::new(),
            input: String::new(),
            source,
            tx,
            rx,
            should_quit: false,
        }
    }

    pub fn viewer(&self) -> &OrderViewer {
        &self.viewer
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Start a search for the current input. The request runs on its own
    /// task; its result comes back through the channel.
    pub fn submit(&mut self) {
        let Some(ticket) = self.viewer.begin(&self.input) else {
            return;
        };

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = source.fetch_order(&ticket.order_id).await;
            let _ = tx.send(LookupMessage {
                generation: ticket.generation,
                outcome,
            });
        });
    }

    pub fn apply(&mut self, message: LookupMessage) {
        if self.viewer.finish(message.generation, message.outcome) {
            self.screen.reset_scroll();
        }
    }

    fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
        }
    }

    fn item_count(&self) -> usize {
        match self.viewer.result().map(|view| &view.items) {
            Some(ItemsView::Rows(rows)) => rows.len(),
            _ => 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Up => self.screen.scroll_up(),
            KeyCode::Down => {
                let count = self.item_count();
                self.screen.scroll_down(count);
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        info!("order viewer started");

        while !self.should_quit {
            self.drain_messages();
            terminal.draw(|frame| self.screen.render(frame, &self.viewer, &self.input))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        info!("order viewer stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::Phase;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns the order named by the id, recording each id asked for.
    struct EchoSource {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl OrderSource for EchoSource {
        async fn fetch_order(&self, order_id: &str) -> Result<Order, LookupError> {
            self.requested.lock().unwrap().push(order_id.to_string());
            if order_id == "missing" {
                return Err(LookupError::NotFound);
            }
            Ok(Order {
                order_uid: Some(order_id.to_string()),
                ..Default::default()
            })
        }
    }

    fn app() -> (App, Arc<EchoSource>) {
        let source = Arc::new(EchoSource {
            requested: Mutex::new(Vec::new()),
        });
        let app = App::new(source.clone(), DisplayOptions::default());
        (app, source)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    async fn next_message(app: &mut App) -> LookupMessage {
        app.rx.recv().await.unwrap()
    }

    #[tokio::test]
    async fn test_enter_runs_lookup() {
        let (mut app, source) = app();
        type_text(&mut app, " abc ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.viewer().phase(), Phase::Loading);

        let message = next_message(&mut app).await;
        app.apply(message);

        assert_eq!(app.viewer().phase(), Phase::Success);
        assert_eq!(*source.requested.lock().unwrap(), vec!["abc".to_string()]);
        assert_eq!(app.viewer().result().unwrap().header[0].value, "abc");
    }

    #[tokio::test]
    async fn test_enter_with_blank_input() {
        let (mut app, source) = app();
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.viewer().phase(), Phase::Error);
        assert!(source.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_newer_search_wins() {
        let (mut app, _source) = app();
        type_text(&mut app, "first");
        press(&mut app, KeyCode::Enter);
        let first = next_message(&mut app).await;

        for _ in 0.."first".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "missing");
        press(&mut app, KeyCode::Enter);
        let second = next_message(&mut app).await;

        app.apply(second);
        app.apply(first);

        assert_eq!(app.viewer().phase(), Phase::Error);
        assert_eq!(app.viewer().error(), Some("Заказ не найден"));
        assert!(app.viewer().result().is_none());
    }

    #[test]
    fn test_editing_and_quit() {
        let (mut app, _source) = app();
        type_text(&mut app, "ab");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input(), "a");
        assert!(!app.should_quit());

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
        assert_eq!(app.input(), "a");
    }

    #[test]
    fn test_escape_quits() {
        let (mut app, _source) = app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }
}
