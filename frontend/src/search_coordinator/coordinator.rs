use std::sync::Arc;

use backend::api::search::{SearchExecutor, SearchOutcome, build_query_descriptor, normalize_hits};
use common::{filter_state::FilterState, pagination::PaginationTracker, search_result::SearchSnapshot};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::messages::{CoordinatorPhase, Message, SearchCompletion, UpdateResult};
use crate::data_definitions::bootstrap::BootstrapComplete;

struct InFlight {
    request_id: u64,
    handle: JoinHandle<()>,
}

/// Owns the filter state and the published result set of one search page view.
///
/// Every filter replacement issues a request with a fresh id. Only the
/// completion carrying the latest id is ever published; anything older is
/// dropped on arrival, and its task is aborted as soon as it is superseded.
pub struct SearchCoordinator {
    executor: Arc<dyn SearchExecutor>,
    phase: CoordinatorPhase,
    filter_state: FilterState,
    latest_request_id: u64,
    in_flight: Option<InFlight>,
    /// Totals of the last published success, and the filters they belong to.
    pagination: Option<(FilterState, PaginationTracker)>,
    snapshot_tx: watch::Sender<SearchSnapshot>,
    completion_tx: mpsc::UnboundedSender<SearchCompletion>,
    completion_rx: mpsc::UnboundedReceiver<SearchCompletion>,
}

impl SearchCoordinator {
    pub fn new(executor: Arc<dyn SearchExecutor>) -> Self {
        let (snapshot_tx, _) = watch::channel(SearchSnapshot::default());
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            executor,
            phase: CoordinatorPhase::Idle,
            filter_state: FilterState::default(),
            latest_request_id: 0,
            in_flight: None,
            pagination: None,
            snapshot_tx,
            completion_tx,
            completion_rx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub fn phase(&self) -> CoordinatorPhase {
        self.phase
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter_state
    }

    /// Zero until the first search is dispatched.
    pub fn latest_request_id(&self) -> u64 {
        self.latest_request_id
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn update(&mut self, message: Message) -> UpdateResult {
        match message {
            Message::BeginBootstrap => {
                if self.phase != CoordinatorPhase::Idle {
                    debug!(phase = self.phase.as_str(), "bootstrap already started");
                    return UpdateResult::Ignored;
                }
                self.phase = CoordinatorPhase::Bootstrapping;
                UpdateResult::PhaseChanged(self.phase)
            }

            Message::BootstrapComplete(done) => self.handle_bootstrap_complete(done),

            Message::SearchCompleted(completion) => self.handle_completion(completion),

            Message::Retry => {
                if self.phase != CoordinatorPhase::Ready {
                    return UpdateResult::Ignored;
                }
                self.dispatch()
            }

            message => {
                if self.phase != CoordinatorPhase::Ready {
                    debug!(message = message.as_str(), phase = self.phase.as_str(), "not ready, ignoring filter change");
                    return UpdateResult::Ignored;
                }
                match message.next_filter_state(&self.filter_state) {
                    Some(next) => self.replace_filter_state(next),
                    None => UpdateResult::Ignored,
                }
            }
        }
    }

    fn handle_bootstrap_complete(&mut self, done: BootstrapComplete) -> UpdateResult {
        match self.phase {
            CoordinatorPhase::Bootstrapping => {}
            CoordinatorPhase::Ready => {
                warn!("bootstrap completed twice, keeping the current filter state");
                return UpdateResult::Ignored;
            }
            CoordinatorPhase::Idle => {
                debug!("bootstrap completed before it began, ignoring");
                return UpdateResult::Ignored;
            }
        }
        self.filter_state = done.filter_state;
        self.filter_state.page = self.filter_state.page.max(1);
        self.phase = CoordinatorPhase::Ready;
        info!(mode = %self.filter_state.mode, "search page ready");
        self.dispatch()
    }

    fn replace_filter_state(&mut self, mut next: FilterState) -> UpdateResult {
        if next.mode != self.filter_state.mode {
            next.page = 1;
        }
        next.page = next.page.max(1);
        if let Some((filters, tracker)) = &self.pagination {
            if filters.same_filters_as(&next) {
                next.page = tracker.clamp(next.page);
            }
        }
        if next == self.filter_state {
            return UpdateResult::Ignored;
        }
        self.filter_state = next;
        self.dispatch()
    }

    fn dispatch(&mut self) -> UpdateResult {
        self.latest_request_id += 1;
        let request_id = self.latest_request_id;

        if let Some(previous) = self.in_flight.take() {
            debug!(request_id = previous.request_id, "aborting superseded search");
            previous.handle.abort();
        }

        let descriptor = build_query_descriptor(&self.filter_state);
        info!(request_id, mode = %descriptor.mode, page = descriptor.page, "dispatching search");

        let executor = Arc::clone(&self.executor);
        let completion_tx = self.completion_tx.clone();
        let handle = tokio::spawn(async move {
            let outcome = executor.execute(&descriptor).await;
            if completion_tx.send(SearchCompletion { request_id, outcome }).is_err() {
                debug!(request_id, "coordinator gone, dropping search result");
            }
        });
        self.in_flight = Some(InFlight { request_id, handle });

        self.snapshot_tx.send_modify(|snapshot| {
            snapshot.loading = true;
            snapshot.error = None;
        });
        UpdateResult::Dispatched { request_id }
    }

    fn handle_completion(&mut self, completion: SearchCompletion) -> UpdateResult {
        if completion.request_id != self.latest_request_id {
            debug!(
                request_id = completion.request_id,
                latest = self.latest_request_id,
                "discarding superseded search result"
            );
            return UpdateResult::Superseded;
        }
        if self.in_flight.as_ref().is_some_and(|f| f.request_id == completion.request_id) {
            self.in_flight = None;
        }

        match completion.outcome {
            SearchOutcome::Success { hits, total_found } => {
                let tracker = PaginationTracker::new(total_found);
                let page = tracker.clamp(self.filter_state.page);
                if page != self.filter_state.page {
                    info!(requested = self.filter_state.page, page, total_found, "page out of range, re-querying");
                    self.filter_state.page = page;
                    self.pagination = Some((self.filter_state.clone(), tracker));
                    self.dispatch();
                    return UpdateResult::Requeried { page };
                }

                let records = normalize_hits(hits);
                info!(request_id = completion.request_id, results = records.len(), total_found, "search applied");
                self.snapshot_tx.send_replace(SearchSnapshot {
                    records,
                    total_found,
                    total_pages: tracker.total_pages(),
                    current_page: page,
                    mode: self.filter_state.mode,
                    loading: false,
                    error: None,
                });
                self.pagination = Some((self.filter_state.clone(), tracker));
                UpdateResult::Applied
            }
            SearchOutcome::Failure { reason } => {
                warn!(request_id = completion.request_id, %reason, "search failed, keeping previous results");
                self.snapshot_tx.send_modify(|snapshot| {
                    snapshot.loading = false;
                    snapshot.error = Some(reason);
                });
                UpdateResult::Failed
            }
        }
    }

    /// Await the next finished search and apply it.
    ///
    /// Returns `Ignored` straight away when nothing is queued or in flight.
    pub async fn process_next(&mut self) -> UpdateResult {
        let completion = match self.completion_rx.try_recv() {
            Ok(completion) => completion,
            Err(_) if self.in_flight.is_none() => return UpdateResult::Ignored,
            Err(_) => match self.completion_rx.recv().await {
                Some(completion) => completion,
                None => return UpdateResult::Ignored,
            },
        };
        self.update(Message::SearchCompleted(completion))
    }

    /// Apply every completion already queued, without waiting.
    pub fn drain_ready(&mut self) -> Vec<UpdateResult> {
        let mut results = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            results.push(self.update(Message::SearchCompleted(completion)));
        }
        results
    }

    /// Process completions until the latest request has been published or has failed.
    pub async fn settle(&mut self) -> UpdateResult {
        loop {
            match self.process_next().await {
                UpdateResult::Superseded | UpdateResult::Requeried { .. } => continue,
                UpdateResult::Ignored if self.in_flight.is_some() => continue,
                result => return result,
            }
        }
    }

    /// Event loop: apply commands and completions as they come, until `commands` closes.
    pub async fn run(&mut self, mut commands: mpsc::UnboundedReceiver<Message>) {
        loop {
            let message = tokio::select! {
                command = commands.recv() => match command {
                    Some(message) => message,
                    None => break,
                },
                Some(completion) = self.completion_rx.recv() => Message::SearchCompleted(completion),
            };
            let name = message.as_str();
            let result = self.update(message);
            debug!(message = name, ?result, "coordinator update");
        }
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
        }
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use backend::api::search::RawHits;
    use common::{filter_state::SearchMode, search_query::QueryDescriptor};

    use super::*;

    /// Answers every query at once with `total_found` and no hits.
    struct FixedTotal(u64);

    #[async_trait]
    impl SearchExecutor for FixedTotal {
        async fn execute(&self, descriptor: &QueryDescriptor) -> SearchOutcome {
            let hits = match descriptor.mode {
                SearchMode::Items => RawHits::Items(vec![]),
                SearchMode::Collections => RawHits::Collections(vec![]),
            };
            SearchOutcome::Success { hits, total_found: self.0 }
        }
    }

    fn ready(total: u64) -> SearchCoordinator {
        let mut coordinator = SearchCoordinator::new(Arc::new(FixedTotal(total)));
        coordinator.update(Message::BeginBootstrap);
        coordinator.update(Message::BootstrapComplete(BootstrapComplete { filter_state: FilterState::default() }));
        coordinator
    }

    #[tokio::test]
    async fn user_actions_before_ready_are_ignored() {
        let mut coordinator = SearchCoordinator::new(Arc::new(FixedTotal(0)));
        assert_eq!(coordinator.update(Message::SetFreeText("dune".into())), UpdateResult::Ignored);
        assert_eq!(coordinator.update(Message::Retry), UpdateResult::Ignored);
        assert_eq!(
            coordinator.update(Message::BeginBootstrap),
            UpdateResult::PhaseChanged(CoordinatorPhase::Bootstrapping)
        );
        assert_eq!(coordinator.update(Message::ToggleTopic("history".into())), UpdateResult::Ignored);
        assert_eq!(coordinator.latest_request_id(), 0);
        assert!(!coordinator.is_searching());
        assert_eq!(coordinator.filter_state(), &FilterState::default());
    }

    #[tokio::test]
    async fn bootstrap_complete_without_begin_is_ignored() {
        let mut coordinator = SearchCoordinator::new(Arc::new(FixedTotal(3)));
        let done = BootstrapComplete { filter_state: FilterState::default().with_free_text("dune") };
        assert_eq!(coordinator.update(Message::BootstrapComplete(done.clone())), UpdateResult::Ignored);
        assert_eq!(coordinator.phase(), CoordinatorPhase::Idle);
        assert_eq!(coordinator.latest_request_id(), 0);
        assert!(!coordinator.is_searching());
        assert_eq!(coordinator.filter_state(), &FilterState::default());

        coordinator.update(Message::BeginBootstrap);
        assert_eq!(coordinator.update(Message::BootstrapComplete(done)), UpdateResult::Dispatched { request_id: 1 });
        assert_eq!(coordinator.phase(), CoordinatorPhase::Ready);
    }

    #[tokio::test]
    async fn unchanged_filter_state_does_not_requery() {
        let mut coordinator = ready(5);
        assert_eq!(coordinator.settle().await, UpdateResult::Applied);
        let same = coordinator.filter_state().clone();
        assert_eq!(coordinator.update(Message::ReplaceFilters(same)), UpdateResult::Ignored);
        assert_eq!(coordinator.update(Message::Retry), UpdateResult::Dispatched { request_id: 2 });
    }

    #[tokio::test]
    async fn page_only_change_is_clamped_before_dispatch() {
        let mut coordinator = ready(45);
        assert_eq!(coordinator.settle().await, UpdateResult::Applied);
        assert_eq!(coordinator.snapshot().total_pages, 3);

        assert_eq!(coordinator.update(Message::GoToPage(9)), UpdateResult::Dispatched { request_id: 2 });
        assert_eq!(coordinator.filter_state().page, 3);
        assert_eq!(coordinator.settle().await, UpdateResult::Applied);
        assert_eq!(coordinator.snapshot().current_page, 3);

        // already there
        assert_eq!(coordinator.update(Message::GoToPage(7)), UpdateResult::Ignored);
    }

    #[tokio::test]
    async fn second_bootstrap_is_ignored() {
        let mut coordinator = ready(0);
        let again = BootstrapComplete { filter_state: FilterState::default().with_free_text("late") };
        assert_eq!(coordinator.update(Message::BootstrapComplete(again)), UpdateResult::Ignored);
        assert_eq!(coordinator.filter_state().free_text, "");
        assert_eq!(coordinator.update(Message::BeginBootstrap), UpdateResult::Ignored);
    }

    #[tokio::test]
    async fn process_next_returns_when_idle() {
        let mut coordinator = SearchCoordinator::new(Arc::new(FixedTotal(0)));
        assert_eq!(coordinator.process_next().await, UpdateResult::Ignored);
        assert!(coordinator.drain_ready().is_empty());
    }
}
