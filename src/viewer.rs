use crate::client::{LookupError, OrderSource};
use crate::format::DisplayOptions;
use crate::order::Order;
use crate::view::{render_order, OrderView};
use tracing::{debug, info, warn};

pub const SUCCESS_MESSAGE: &str = "Информация о заказе успешно загружена!";

/// Which of the four screens is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Error,
    Success,
}

/// A search that passed validation and is waiting for its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub order_id: String,
}

/// Visible state of the lookup screen: loading indicator, the two banners
/// and the result section.
///
/// Each accepted search bumps `generation`; [`OrderViewer::finish`] drops
/// responses that belong to an older search.
#[derive(Debug, Clone, Default)]
pub struct OrderViewer {
    options: DisplayOptions,
    generation: u64,
    loading: bool,
    error: Option<String>,
    success: Option<&'static str>,
    result: Option<OrderView>,
}

impl OrderViewer {
    pub fn new(options: DisplayOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Validate `input` and start a search.
    ///
    /// A blank identifier shows the validation error and returns `None`; an
    /// earlier result stays on screen in that case.
    pub fn begin(&mut self, input: &str) -> Option<Ticket> {
        let order_id = input.trim();
        if order_id.is_empty() {
            self.fail(LookupError::EmptyOrderId);
            return None;
        }

        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.success = None;
        self.result = None;

        info!(order_id, generation = self.generation, "lookup started");
        Some(Ticket {
            generation: self.generation,
            order_id: order_id.to_string(),
        })
    }

    /// Apply the outcome of the search issued as `generation`.
    ///
    /// Returns `false` when a newer search has started since, in which case
    /// nothing changes.
    pub fn finish(&mut self, generation: u64, outcome: Result<Order, LookupError>) -> bool {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "discarding stale response"
            );
            return false;
        }

        match outcome {
            Ok(order) => {
                info!(generation, "order rendered");
                self.result = Some(render_order(&order, &self.options));
                self.loading = false;
                self.error = None;
                self.success = Some(SUCCESS_MESSAGE);
            }
            Err(err) => self.fail(err),
        }
        true
    }

    /// Run one complete search against `source`.
    pub async fn lookup(&mut self, source: &dyn OrderSource, input: &str) -> Phase {
        if let Some(ticket) = self.begin(input) {
            let outcome = source.fetch_order(&ticket.order_id).await;
            self.finish(ticket.generation, outcome);
        }
        self.phase()
    }

    fn fail(&mut self, err: LookupError) {
        warn!(error = %err, "lookup failed");
        self.loading = false;
        self.error = Some(err.to_string());
        self.success = None;
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.success.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success
    }

    /// The result section, when visible.
    pub fn result(&self) -> Option<&OrderView> {
        self.result.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Item;
    use crate::view::ItemsView;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSource {
        calls: AtomicUsize,
        outcome: Result<Order, LookupError>,
    }

    impl FakeSource {
        fn new(outcome: Result<Order, LookupError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcome,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OrderSource for FakeSource {
        async fn fetch_order(&self, _order_id: &str) -> Result<Order, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn order_with_item() -> Order {
        Order {
            order_uid: Some("b563feb7b2b84b6test".to_string()),
            items: Some(vec![Item {
                name: Some("Mascaras".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_idle() {
        let viewer = OrderViewer::default();
        assert_eq!(viewer.phase(), Phase::Idle);
        assert!(viewer.result().is_none());
    }

    #[tokio::test]
    async fn test_blank_input_makes_no_request() {
        let source = FakeSource::new(Ok(order_with_item()));
        let mut viewer = OrderViewer::default();

        for input in ["", "   ", "\t\n"] {
            assert_eq!(viewer.lookup(&source, input).await, Phase::Error);
            assert_eq!(viewer.error(), Some("Пожалуйста, введите ID заказа"));
        }
        assert_eq!(source.calls(), 0);
        assert_eq!(viewer.generation(), 0);
    }

    #[tokio::test]
    async fn test_success_shows_result_and_banner() {
        let source = FakeSource::new(Ok(order_with_item()));
        let mut viewer = OrderViewer::default();

        assert_eq!(viewer.lookup(&source, "  b563feb7b2b84b6test ").await, Phase::Success);
        assert_eq!(source.calls(), 1);
        assert_eq!(viewer.success(), Some(SUCCESS_MESSAGE));
        assert!(viewer.error().is_none());
        assert!(!viewer.is_loading());

        let Some(ItemsView::Rows(rows)) = viewer.result().map(|v| &v.items) else {
            panic!("expected item rows");
        };
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_not_found() {
        let source = FakeSource::new(Err(LookupError::NotFound));
        let mut viewer = OrderViewer::default();

        assert_eq!(viewer.lookup(&source, "missing").await, Phase::Error);
        assert_eq!(viewer.error(), Some("Заказ не найден"));
        assert!(viewer.success().is_none());
        assert!(viewer.result().is_none());
    }

    #[tokio::test]
    async fn test_server_error_carries_status() {
        let source = FakeSource::new(Err(LookupError::Server(502)));
        let mut viewer = OrderViewer::default();

        viewer.lookup(&source, "x").await;
        assert!(viewer.error().unwrap().contains("502"));
    }

    #[test]
    fn test_begin_hides_previous_state() {
        let mut viewer = OrderViewer::default();
        let first = viewer.begin("first").unwrap();
        viewer.finish(first.generation, Ok(order_with_item()));
        assert_eq!(viewer.phase(), Phase::Success);

        let second = viewer.begin("second").unwrap();
        assert_eq!(second.order_id, "second");
        assert_eq!(viewer.phase(), Phase::Loading);
        assert!(viewer.result().is_none());
        assert!(viewer.success().is_none());
        assert!(viewer.error().is_none());
    }

    #[test]
    fn test_validation_error_keeps_previous_result() {
        let mut viewer = OrderViewer::default();
        let ticket = viewer.begin("first").unwrap();
        viewer.finish(ticket.generation, Ok(order_with_item()));

        assert!(viewer.begin("  ").is_none());
        assert_eq!(viewer.phase(), Phase::Error);
        assert!(viewer.success().is_none());
        assert!(viewer.result().is_some());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut viewer = OrderViewer::default();
        let stale = viewer.begin("first").unwrap();
        let fresh = viewer.begin("second").unwrap();

        assert!(viewer.finish(fresh.generation, Err(LookupError::NotFound)));
        assert!(!viewer.finish(stale.generation, Ok(order_with_item())));

        assert_eq!(viewer.phase(), Phase::Error);
        assert!(viewer.result().is_none());
    }

    #[test]
    fn test_stale_response_while_loading() {
        let mut viewer = OrderViewer::default();
        let stale = viewer.begin("first").unwrap();
        viewer.begin("second").unwrap();

        assert!(!viewer.finish(stale.generation, Err(LookupError::Server(500))));
        assert_eq!(viewer.phase(), Phase::Loading);
        assert!(viewer.error().is_none());
    }
}
