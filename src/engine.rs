// Suggestion engine: owns the displayed destination list and recomputes it
// off the caller's task whenever the party size or destination text changes
use crate::calendar::CalendarState;
use crate::destination::Destination;
use crate::store::DestinationStore;
use crate::suggestions::{filter_by_display_name, shuffle_for_party, EngineConfig};
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

// What caused a suggestion list to be computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Initial,
    PeopleCount(i32),
    DestinationText(String),
}

/// The value observers render.
///
/// `generation` is the ticket of the trigger that produced it; it only ever
/// grows.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestions {
    pub generation: u64,
    pub trigger: Trigger,
    pub destinations: Vec<Destination>,
}

// Outcome of one trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publication {
    Published,
    Superseded,
    Failed,
}

#[derive(Debug, Default)]
pub struct EngineStats {
    pub triggers_issued: AtomicUsize,
    pub published: AtomicUsize,
    pub superseded: AtomicUsize,
    pub failed: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EngineStatsReport {
    pub triggers_issued: usize,
    pub published: usize,
    pub superseded: usize,
    pub failed: usize,
}

// Handle to an in-flight recomputation
#[derive(Debug)]
pub struct SuggestionTask {
    ticket: u64,
    handle: JoinHandle<Publication>,
}

impl SuggestionTask {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub async fn wait(self) -> Publication {
        match self.handle.await {
            Ok(publication) => publication,
            Err(e) => {
                error!(ticket = self.ticket, "Suggestion task did not finish: {}", e);
                Publication::Failed
            }
        }
    }
}

// Everything a background task needs to publish its result
#[derive(Clone)]
struct Publisher {
    state: Arc<watch::Sender<Suggestions>>,
    latest_ticket: Arc<AtomicU64>,
    stats: Arc<EngineStats>,
}

impl Publisher {
    fn publish(&self, ticket: u64, trigger: Trigger, destinations: Vec<Destination>) -> Publication {
        let count = destinations.len();

        // The check and the write happen under the channel's write lock
        let published = self.state.send_if_modified(|current| {
            if ticket < self.latest_ticket.load(Ordering::SeqCst) || ticket <= current.generation {
                return false;
            }
            *current = Suggestions {
                generation: ticket,
                trigger,
                destinations,
            };
            true
        });

        if published {
            self.stats.published.fetch_add(1, Ordering::SeqCst);
            debug!(ticket, count, "Published suggestions");
            Publication::Published
        } else {
            self.stats.superseded.fetch_add(1, Ordering::SeqCst);
            warn!(
                ticket,
                latest = self.latest_ticket.load(Ordering::SeqCst),
                "Discarding stale suggestions"
            );
            Publication::Superseded
        }
    }
}

/// Holds the current suggestion list for the explore screen.
///
/// Both triggers read the same immutable [`DestinationStore`] and replace the
/// whole list; the two filters are never combined. Every trigger takes a
/// ticket when issued and a result is only published if no newer trigger has
/// been issued in the meantime, so slow computations cannot overwrite fresher
/// ones. Triggers spawn tokio tasks and must be called inside a runtime.
pub struct SuggestionEngine {
    store: Arc<DestinationStore>,
    config: EngineConfig,
    publisher: Publisher,
    calendar: Mutex<CalendarState>,
}

impl SuggestionEngine {
    pub fn new(store: Arc<DestinationStore>, config: EngineConfig) -> Self {
        let initial = Suggestions {
            generation: 0,
            trigger: Trigger::Initial,
            destinations: store.destinations().to_vec(),
        };
        let (state, _) = watch::channel(initial);

        Self {
            store,
            config,
            publisher: Publisher {
                state: Arc::new(state),
                latest_ticket: Arc::new(AtomicU64::new(0)),
                stats: Arc::new(EngineStats::default()),
            },
            calendar: Mutex::new(CalendarState::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<DestinationStore> {
        &self.store
    }

    pub fn hotels(&self) -> &[Destination] {
        self.store.hotels()
    }

    pub fn restaurants(&self) -> &[Destination] {
        self.store.restaurants()
    }

    pub fn subscribe(&self) -> watch::Receiver<Suggestions> {
        self.publisher.state.subscribe()
    }

    pub fn snapshot(&self) -> Suggestions {
        self.publisher.state.borrow().clone()
    }

    pub fn current_suggestions(&self) -> Vec<Destination> {
        self.publisher.state.borrow().destinations.clone()
    }

    pub fn on_people_count_changed(&self, count: i32) -> SuggestionTask {
        let config = self.config.clone();
        self.dispatch(Trigger::PeopleCount(count), move |store| {
            shuffle_for_party(store.destinations(), count, &config)
        })
    }

    pub fn on_destination_text_changed(&self, text: &str) -> SuggestionTask {
        let needle = text.to_string();
        self.dispatch(Trigger::DestinationText(needle.clone()), move |store| {
            filter_by_display_name(store.destinations(), &needle)
        })
    }

    pub fn on_day_selected(&self, date: NaiveDate) -> CalendarState {
        let selection = {
            let mut calendar = self.calendar.lock();
            calendar.select_day(date);
            *calendar
        };
        debug!(%selection, "Day selected");
        selection
    }

    pub fn calendar(&self) -> CalendarState {
        *self.calendar.lock()
    }

    pub fn stats(&self) -> EngineStatsReport {
        let stats = &self.publisher.stats;
        EngineStatsReport {
            triggers_issued: stats.triggers_issued.load(Ordering::SeqCst),
            published: stats.published.load(Ordering::SeqCst),
            superseded: stats.superseded.load(Ordering::SeqCst),
            failed: stats.failed.load(Ordering::SeqCst),
        }
    }

    fn dispatch<F>(&self, trigger: Trigger, compute: F) -> SuggestionTask
    where
        F: FnOnce(&DestinationStore) -> Vec<Destination> + Send + 'static,
    {
        let ticket = self.publisher.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.publisher
            .stats
            .triggers_issued
            .fetch_add(1, Ordering::SeqCst);
        debug!(ticket, ?trigger, "Recomputing suggestions");

        let store = Arc::clone(&self.store);
        let publisher = self.publisher.clone();
        let handle = tokio::spawn(async move {
            match tokio::task::spawn_blocking(move || compute(&store)).await {
                Ok(destinations) => publisher.publish(ticket, trigger, destinations),
                Err(e) => {
                    publisher.stats.failed.fetch_add(1, Ordering::SeqCst);
                    error!(ticket, ?trigger, "Suggestion computation failed: {}", e);
                    Publication::Failed
                }
            }
        });

        SuggestionTask { ticket, handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::{City, DestinationCatalog};
    use crate::suggestions::SeedStrategy;
    use futures::future::join_all;
    use std::time::Duration;

    fn scenario_store() -> Arc<DestinationStore> {
        let catalog = DestinationCatalog {
            destinations: vec![
                Destination::new(City::new("Paris", "FR", 48.8566, 2.3522), "Nonstop - 1h 5m+"),
                Destination::new(City::new("Tokyo", "JP", 35.6762, 139.6503), "Nonstop - 13h 40m+"),
                Destination::new(City::new("Madrid", "ES", 40.416775, -3.703790), "Nonstop - 2h 12m+"),
            ],
            hotels: vec![Destination::new(City::new("Aspen", "US", 39.1911, -106.8175), "4 Bedrooms - 3 Bathrooms")],
            restaurants: vec![],
        };
        Arc::new(DestinationStore::from_catalog(catalog).unwrap())
    }

    fn city_names(list: &[Destination]) -> Vec<String> {
        list.iter().map(|d| d.city.name.clone()).collect()
    }

    #[tokio::test]
    async fn test_starts_with_full_list() {
        let engine = SuggestionEngine::new(scenario_store(), EngineConfig::default());

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.generation, 0);
        assert_eq!(snapshot.trigger, Trigger::Initial);
        assert_eq!(city_names(&snapshot.destinations), vec!["Paris", "Tokyo", "Madrid"]);
        assert_eq!(city_names(engine.hotels()), vec!["Aspen"]);
        assert!(engine.restaurants().is_empty());
    }

    #[tokio::test]
    async fn test_scenario() {
        let engine = SuggestionEngine::new(scenario_store(), EngineConfig::default());

        assert_eq!(
            engine.on_destination_text_changed("To").wait().await,
            Publication::Published
        );
        assert_eq!(city_names(&engine.current_suggestions()), vec!["Tokyo"]);

        assert_eq!(engine.on_people_count_changed(5).wait().await, Publication::Published);
        assert!(engine.current_suggestions().is_empty());

        assert_eq!(engine.on_people_count_changed(2).wait().await, Publication::Published);
        let mut names = city_names(&engine.current_suggestions());
        names.sort();
        assert_eq!(names, vec!["Madrid", "Paris", "Tokyo"]);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.generation, 3);
        assert_eq!(snapshot.trigger, Trigger::PeopleCount(2));
    }

    #[tokio::test]
    async fn test_empty_text_restores_full_list() {
        let engine = SuggestionEngine::new(scenario_store(), EngineConfig::default());

        engine.on_people_count_changed(9).wait().await;
        assert!(engine.current_suggestions().is_empty());

        engine.on_destination_text_changed("").wait().await;
        assert_eq!(
            city_names(&engine.current_suggestions()),
            vec!["Paris", "Tokyo", "Madrid"]
        );
    }

    #[tokio::test]
    async fn test_subscriber_sees_new_value() {
        let engine = SuggestionEngine::new(scenario_store(), EngineConfig::default());
        let mut receiver = engine.subscribe();

        let task = engine.on_destination_text_changed("Mad");
        tokio::time::timeout(Duration::from_secs(5), receiver.changed())
            .await
            .expect("no publication within timeout")
            .unwrap();

        let seen = receiver.borrow_and_update().clone();
        assert_eq!(city_names(&seen.destinations), vec!["Madrid"]);
        assert_eq!(seen.trigger, Trigger::DestinationText("Mad".to_string()));
        assert_eq!(task.wait().await, Publication::Published);
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let engine = SuggestionEngine::new(scenario_store(), EngineConfig::default());

        // Issue two triggers, then deliver the older result last
        let older = engine.publisher.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let newer = engine.on_destination_text_changed("Par");
        assert!(newer.ticket() > older);
        assert_eq!(newer.wait().await, Publication::Published);

        let outcome = engine.publisher.publish(older, Trigger::PeopleCount(9), Vec::new());
        assert_eq!(outcome, Publication::Superseded);
        assert_eq!(city_names(&engine.current_suggestions()), vec!["Paris"]);

        let stats = engine.stats();
        assert_eq!(stats.published, 1);
        assert_eq!(stats.superseded, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_last_issued_trigger_wins() {
        let engine = SuggestionEngine::new(scenario_store(), EngineConfig::default());

        let mut tasks = Vec::new();
        for i in 0..50 {
            tasks.push(engine.on_people_count_changed(i % 7));
            tasks.push(engine.on_destination_text_changed("o"));
        }
        tasks.push(engine.on_destination_text_changed("Tok"));
        let last_ticket = tasks.last().map(SuggestionTask::ticket).unwrap();

        let outcomes = join_all(tasks.into_iter().map(SuggestionTask::wait)).await;
        assert!(!outcomes.contains(&Publication::Failed));
        assert_eq!(outcomes.last(), Some(&Publication::Published));

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.generation, last_ticket);
        assert_eq!(city_names(&snapshot.destinations), vec!["Tokyo"]);

        let stats = engine.stats();
        assert_eq!(stats.triggers_issued, 101);
        assert_eq!(stats.published + stats.superseded, 101);
    }

    #[tokio::test]
    async fn test_stable_seed_repeats_order() {
        let config = EngineConfig {
            seed_strategy: SeedStrategy::StableByCount,
            ..Default::default()
        };
        let store = Arc::new(DestinationStore::builtin().unwrap());
        let engine = SuggestionEngine::new(store, config);

        engine.on_people_count_changed(3).wait().await;
        let first = engine.current_suggestions();
        engine.on_destination_text_changed("").wait().await;
        engine.on_people_count_changed(3).wait().await;

        assert_eq!(engine.current_suggestions(), first);
        assert_eq!(first.len(), engine.store().destinations().len());
    }

    #[tokio::test]
    async fn test_day_selection() {
        let engine = SuggestionEngine::new(scenario_store(), EngineConfig::default());
        let start = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();

        engine.on_day_selected(start);
        let calendar = engine.on_day_selected(end);

        assert_eq!(calendar.nights(), Some(3));
        assert_eq!(engine.calendar(), calendar);
        // Dates have no effect on suggestions
        assert_eq!(engine.snapshot().generation, 0);
    }
}
