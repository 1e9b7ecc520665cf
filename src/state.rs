use crate::client::BackendClient;
use crate::models::{RunRecord, TodayRun};
use crate::stats_bar::StatsBar;
use std::sync::Arc;
use tokio::sync::Mutex;

/// How many upcoming runs the index page lists.
pub const UPCOMING_RUNS: usize = 3;

/// Everything the index page shows, as of the last page load.
#[derive(Debug, Default)]
pub struct TodayPage {
    pub run: Option<TodayRun>,
    pub bar: Option<StatsBar>,
    pub upcoming: Vec<RunRecord>,
    pub load_failed: bool,
}

impl TodayPage {
    pub fn is_saving(&self) -> bool {
        self.bar.as_ref().is_some_and(StatsBar::is_saving)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub client: BackendClient,
    pub today: Arc<Mutex<TodayPage>>,
}

impl AppState {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            today: Arc::new(Mutex::new(TodayPage::default())),
        }
    }
}
