//! Event-driven controller tying the store, the query engine and a
//! [`Presenter`] together. Events arrive one at a time over a channel; file
//! reads run on a worker thread that posts a single completion event back.

use anyhow::Result;
use crossbeam::channel::{Receiver, Sender};
use std::path::PathBuf;
use std::thread;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::load::read_file;
use crate::query::{Selection, SortKey, select_indices};
use crate::record::{Dimension, JobRecord};
use crate::render::Presenter;
use crate::store::{JobStore, LoadTicket};

#[derive(Debug)]
pub enum UiEvent {
    LoadRequested(PathBuf),
    LoadCompleted {
        ticket: LoadTicket,
        path: PathBuf,
        result: Result<Vec<JobRecord>, LoadError>,
    },
    FilterChanged(Dimension, String),
    SortChanged(SortKey),
    /// Open the detail view of the n-th displayed listing (0-based).
    Select(usize),
    Dismiss,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct Session<P: Presenter> {
    store: JobStore,
    selection: Selection,
    presenter: P,
    events: Sender<UiEvent>,
    /// Store positions of the listings currently on screen.
    displayed: Vec<usize>,
    detail: Option<usize>,
    pending: Option<LoadTicket>,
    quit_requested: bool,
    /// Selection applied by the first successful load instead of "All".
    preset: Option<Selection>,
}

impl<P: Presenter> Session<P> {
    /// `events` is where file reads post their completion.
    pub fn new(presenter: P, events: Sender<UiEvent>) -> Self {
        Self {
            store: JobStore::new(),
            selection: Selection::default(),
            presenter,
            events,
            displayed: Vec::new(),
            detail: None,
            pending: None,
            quit_requested: false,
            preset: None,
        }
    }

    /// Filters and sort to apply when the first file loads. Later loads
    /// reset the filters as usual.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection.clone();
        self.preset = Some(selection);
        self
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn displayed(&self) -> Vec<&JobRecord> {
        let all = self.store.all();
        self.displayed.iter().map(|&i| &all[i]).collect()
    }

    pub fn detail(&self) -> Option<&JobRecord> {
        self.detail.map(|i| &self.store.all()[i])
    }

    /// Handle events until `Quit` (deferred while a load is in flight) or
    /// until every sender is gone.
    pub fn run(&mut self, events: &Receiver<UiEvent>) -> Result<()> {
        for event in events.iter() {
            if self.handle(event)? == Control::Quit {
                break;
            }
        }
        Ok(())
    }

    pub fn handle(&mut self, event: UiEvent) -> Result<Control> {
        match event {
            UiEvent::LoadRequested(path) => self.on_load_requested(path),
            UiEvent::LoadCompleted {
                ticket,
                path,
                result,
            } => {
                self.on_load_completed(ticket, path, result)?;
                if self.quit_requested && self.pending.is_none() {
                    return Ok(Control::Quit);
                }
            }
            UiEvent::FilterChanged(dim, value) => {
                self.selection.filters.set(dim, value);
                self.refresh()?;
            }
            UiEvent::SortChanged(sort) => {
                self.selection.sort = sort;
                self.refresh()?;
            }
            UiEvent::Select(n) => self.on_select(n)?,
            UiEvent::Dismiss => {
                if self.detail.take().is_some() {
                    self.presenter.hide_detail()?;
                }
            }
            UiEvent::Quit => {
                if self.pending.is_none() {
                    return Ok(Control::Quit);
                }
                debug!("quit deferred until the pending load finishes");
                self.quit_requested = true;
            }
        }
        Ok(Control::Continue)
    }

    /// Read a file on this thread and install it; used by one-shot callers.
    pub fn load_now(&mut self, path: PathBuf) -> Result<()> {
        let ticket = self.store.begin_load();
        self.pending = Some(ticket);
        let result = read_file(&path);
        self.on_load_completed(ticket, path, result)
    }

    fn on_load_requested(&mut self, path: PathBuf) {
        let ticket = self.store.begin_load();
        self.pending = Some(ticket);
        info!(path = %path.display(), "loading listings");
        spawn_read(path, ticket, self.events.clone());
    }

    fn on_load_completed(
        &mut self,
        ticket: LoadTicket,
        path: PathBuf,
        result: Result<Vec<JobRecord>, LoadError>,
    ) -> Result<()> {
        if !self.store.is_current(ticket) {
            debug!(path = %path.display(), "discarding result of superseded load");
            return Ok(());
        }
        self.pending = None;

        let records = match result {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "load rejected, keeping previous listings"
                );
                return self.presenter.notify(&err.user_message());
            }
        };

        let count = records.len();
        self.store.complete_load(ticket, records);
        info!(path = %path.display(), records = count, "listings installed");

        self.detail = None;
        self.presenter.show_options(&self.store.facets())?;

        if let Some(preset) = self.preset.take() {
            self.selection = preset;
            return self.refresh();
        }

        // options are rebuilt, so every filter falls back to "All"
        self.selection.filters = Default::default();
        self.displayed = (0..count).collect();
        self.show_displayed()
    }

    fn refresh(&mut self) -> Result<()> {
        self.displayed = select_indices(
            self.store.all(),
            &self.selection.filters,
            self.selection.sort,
        );
        debug!(
            shown = self.displayed.len(),
            total = self.store.len(),
            sort = %self.selection.sort,
            "listing refreshed"
        );
        self.show_displayed()
    }

    fn show_displayed(&mut self) -> Result<()> {
        let all = self.store.all();
        let shown: Vec<&JobRecord> = self.displayed.iter().map(|&i| &all[i]).collect();
        self.presenter.show_listing(&shown)
    }

    fn on_select(&mut self, n: usize) -> Result<()> {
        match self.displayed.get(n).copied() {
            Some(idx) => {
                self.detail = Some(idx);
                self.presenter.show_detail(&self.store.all()[idx])
            }
            None => self
                .presenter
                .notify(&format!("no listing #{} on screen", n + 1)),
        }
    }
}

/// Read `path` on a worker thread and post exactly one `LoadCompleted`.
pub fn spawn_read(
    path: PathBuf,
    ticket: LoadTicket,
    events: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let result = read_file(&path);
        // receiver gone means the session already quit
        let _ = events.send(UiEvent::LoadCompleted {
            ticket,
            path,
            result,
        });
    })
}
