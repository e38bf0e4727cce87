//! Sequencing of user actions over the record store.
//!
//! The coordinator owns the in-memory records, the data-view buffer, the
//! persistence backend and the request invoker. Every mutation is written
//! through to storage straight away. Requests run as futures polled on the
//! caller's task, so records are only ever touched between polls.

use crate::analysis::{Metrics, MetricsAggregator, TimeWindow};
use crate::classify::{self, DataItem};
use crate::export::{self, ExportSink};
use crate::invoke::{CallRequest, Invoker};
use crate::model::{Button, Call, templates};
use crate::persist::{self, KeyValueStore};
use crate::store::RecordStore;
use crate::validate::ButtonDraft;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures::stream::FuturesUnordered;

pub struct Coordinator<S: KeyValueStore, I: Invoker> {
    store: S,
    invoker: I,
    records: RecordStore,
    data_view: Vec<Call>,
}

impl<S: KeyValueStore, I: Invoker> Coordinator<S, I> {
    /// Load saved state; unreadable collections start empty
    pub fn open(store: S, invoker: I) -> Result<Self> {
        let records = persist::load_store(&store)?;
        let data_view = persist::load_data_view(&store)?;

        tracing::debug!(
            "Opened workspace with {} button(s), {} call(s)",
            records.buttons().len(),
            records.calls().len()
        );

        Ok(Self {
            store,
            invoker,
            records,
            data_view,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn buttons(&self) -> &[Button] {
        self.records.buttons()
    }

    pub fn calls(&self) -> &[Call] {
        self.records.calls()
    }

    /// Successful calls collected for the data view, newest first
    pub fn data_view(&self) -> &[Call] {
        &self.data_view
    }

    pub fn button(&self, id: &str) -> Result<&Button> {
        self.records
            .button(id)
            .ok_or_else(|| Error::ButtonNotFound(id.to_string()))
    }

    pub fn create_button(&mut self, draft: &ButtonDraft) -> Result<Button> {
        let button = draft.validate()?;
        self.records.add_button(button.clone());
        persist::save_buttons(&mut self.store, &self.records)?;

        tracing::info!("Created button: {} ({})", button.name, button.id);
        Ok(button)
    }

    pub fn create_from_template(&mut self, template_id: &str) -> Result<Button> {
        let template = templates::find(template_id)
            .ok_or_else(|| Error::TemplateNotFound(template_id.to_string()))?;
        self.create_button(&ButtonDraft::from(&template))
    }

    /// Edit a button: the old one is deleted with its history and a new one
    /// is created from the draft. Nothing changes if the draft is invalid.
    pub fn replace_button(&mut self, id: &str, draft: &ButtonDraft) -> Result<Button> {
        self.button(id)?;
        let button = draft.validate()?;

        self.records.remove_button(id);
        self.records.add_button(button.clone());
        self.data_view.retain(|call| call.button_id != id);
        self.save_all()?;

        tracing::info!("Replaced button {} with {}", id, button.id);
        Ok(button)
    }

    /// Delete a button and every call made for it
    pub fn delete_button(&mut self, id: &str) -> Result<Button> {
        let button = self
            .records
            .remove_button(id)
            .ok_or_else(|| Error::ButtonNotFound(id.to_string()))?;
        self.data_view.retain(|call| call.button_id != id);
        self.save_all()?;

        tracing::info!("Deleted button: {} ({})", button.name, button.id);
        Ok(button)
    }

    /// Run a button's request and record the resulting call
    pub async fn execute_button(&mut self, id: &str) -> Result<Call> {
        let request = CallRequest::from(self.button(id)?);
        tracing::info!("Executing button: {}", request.button_name);

        let call = self.invoker.execute(&request).await;
        record_call(&mut self.records, &mut self.data_view, &mut self.store, call.clone())?;
        Ok(call)
    }

    /// Run several buttons at once; calls are recorded as they complete
    ///
    /// The same id may appear more than once, producing independent calls.
    /// Unknown ids are rejected before anything is sent.
    pub async fn execute_many(&mut self, ids: &[String]) -> Result<Vec<Call>> {
        let requests = ids
            .iter()
            .map(|id| self.button(id).map(CallRequest::from))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Executing {} request(s) concurrently", requests.len());

        let mut pending: FuturesUnordered<_> = requests
            .iter()
            .map(|request| self.invoker.execute(request))
            .collect();

        let mut completed = Vec::with_capacity(requests.len());
        while let Some(call) = pending.next().await {
            record_call(&mut self.records, &mut self.data_view, &mut self.store, call.clone())?;
            completed.push(call);
        }
        Ok(completed)
    }

    /// Empty the call history and the data view
    pub fn clear_history(&mut self) -> Result<()> {
        self.records.clear_calls();
        self.data_view.clear();
        persist::save_calls(&mut self.store, &self.records)?;
        persist::save_data_view(&mut self.store, &self.data_view)?;

        tracing::info!("Call history cleared");
        Ok(())
    }

    /// Empty only the data view
    pub fn clear_data_view(&mut self) -> Result<()> {
        self.data_view.clear();
        persist::save_data_view(&mut self.store, &self.data_view)?;

        tracing::info!("Data view cleared");
        Ok(())
    }

    pub fn windowed_calls(&self, window: TimeWindow, now: DateTime<Utc>) -> Vec<&Call> {
        MetricsAggregator::new(window.start(now)).window(self.records.calls())
    }

    pub fn metrics(&self, window: TimeWindow, now: DateTime<Utc>) -> Metrics {
        MetricsAggregator::new(window.start(now)).aggregate(self.records.calls())
    }

    /// Export the calls of a window through the sink
    pub fn export(
        &self,
        window: TimeWindow,
        now: DateTime<Utc>,
        sink: &mut impl ExportSink,
    ) -> Result<String> {
        let calls = self.windowed_calls(window, now);
        let document = export::export_document(&calls)?;
        sink.export(&export::export_file_name(window, now), &document)
    }

    /// Classified items of the data view that match a search term
    pub fn data_items(&self, search: &str) -> Vec<DataItem> {
        classify::data_items(&self.data_view)
            .into_iter()
            .filter(|item| item.matches(search))
            .collect()
    }

    fn save_all(&mut self) -> Result<()> {
        persist::save_buttons(&mut self.store, &self.records)?;
        persist::save_calls(&mut self.store, &self.records)?;
        persist::save_data_view(&mut self.store, &self.data_view)
    }
}

fn record_call(
    records: &mut RecordStore,
    data_view: &mut Vec<Call>,
    store: &mut impl KeyValueStore,
    call: Call,
) -> Result<()> {
    match &call.error {
        Some(error) => tracing::warn!("Call {} failed: {}", call.id, error),
        None => tracing::info!(
            "Call {} completed: {} in {}ms",
            call.id,
            call.status,
            call.duration
        ),
    }

    let for_data_view = call.has_data();
    if for_data_view {
        data_view.insert(0, call.clone());
    }
    records.add_call(call);

    persist::save_calls(store, records)?;
    if for_data_view {
        persist::save_data_view(store, data_view)?;
    }
    Ok(())
}
