use std::path::PathBuf;

use tracing::{debug, warn};

use crate::filter::{build_view, Filters, SortKey};
use crate::loader::{ShardError, ShardLoader};
use crate::model::Tradeup;

pub const BATCH_SIZE: usize = 20;

/// What a `request_more` call decided to do.
#[derive(Debug, PartialEq, Eq)]
pub enum Advance {
    /// `count` more view entries became visible, starting at `start`.
    Batch { start: usize, count: usize },
    /// A shard fetch was started; the caller performs the read (typically
    /// off-thread) and must hand the outcome to `complete_fetch` exactly once.
    Fetch(PathBuf),
    /// Everything rendered and every shard requested.
    Exhausted,
    /// A fetch is already in flight; the call is dropped, not queued.
    Busy,
}

/// Owns the accumulated records and the paging state: how much of the
/// filtered+sorted view is visible, which shard comes next, and whether a
/// fetch is in flight. Knows nothing about the display layer.
pub struct Catalog {
    loader: ShardLoader,
    records: Vec<Tradeup>,
    filters: Filters,
    sort_key: SortKey,
    view: Vec<Tradeup>,
    cursor: usize,
    batch_size: usize,
    loading: bool,
}

impl Catalog {
    pub fn new(loader: ShardLoader) -> Self {
        Self {
            loader,
            records: vec![],
            filters: Filters::default(),
            sort_key: SortKey::default(),
            view: vec![],
            cursor: 0,
            batch_size: BATCH_SIZE,
            loading: false,
        }
    }

    #[cfg(test)]
    fn with_batch_size(loader: ShardLoader, batch_size: usize) -> Self {
        let mut catalog = Self::new(loader);
        catalog.batch_size = batch_size;
        catalog
    }

    /// One step of the paging machine: surface another batch of the current
    /// view, or start fetching the next shard, or report exhaustion. At most
    /// one fetch is ever in flight; concurrent calls get `Busy`.
    pub fn request_more(&mut self) -> Advance {
        if self.loading {
            debug!("request dropped, shard fetch already in flight");
            return Advance::Busy;
        }
        if self.cursor < self.view.len() {
            let start = self.cursor;
            let count = (self.view.len() - start).min(self.batch_size);
            self.cursor += count;
            Advance::Batch { start, count }
        } else if let Some(path) = self.loader.next_shard() {
            self.loading = true;
            Advance::Fetch(path)
        } else {
            Advance::Exhausted
        }
    }

    /// Finishes the fetch started by `request_more`. A failed shard
    /// contributes zero records and loading continues with the next one.
    pub fn complete_fetch(&mut self, result: Result<Vec<Tradeup>, ShardError>) {
        self.loading = false;
        match result {
            Ok(batch) => {
                self.records.extend(batch);
                self.rebuild_view();
            }
            Err(e) => warn!(error = %e, "shard load failed, skipping"),
        }
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.rebuild_view();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.rebuild_view();
    }

    fn rebuild_view(&mut self) {
        self.view = build_view(&self.records, &self.filters, self.sort_key);
        self.cursor = 0;
        debug!(
            total = self.records.len(),
            matching = self.view.len(),
            "view rebuilt"
        );
    }

    /// The slice of the view that has been surfaced so far.
    pub fn visible(&self) -> &[Tradeup] {
        &self.view[..self.cursor]
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Terminal state: nothing left to render and nothing left to fetch.
    /// The load-more affordance is hidden once this holds.
    pub fn exhausted(&self) -> bool {
        !self.loading && self.cursor >= self.view.len() && self.loader.remaining() == 0
    }
}
