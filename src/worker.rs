use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;

use crate::api::CatalogApi;
use crate::types::{AppEvent, FetchCommand, FetchRequest, ViewSlot};

/// Background task executing fetch commands from the UI thread.
///
/// One request per view slot: starting a new request aborts the previous one
/// for that slot, and `Cancel` aborts without replacement. Results go back as
/// `AppEvent`s; the views discard anything whose ticket they no longer expect.
pub async fn run_fetch_worker(
    api: Arc<dyn CatalogApi>,
    mut commands: UnboundedReceiver<FetchCommand>,
    events: UnboundedSender<AppEvent>,
) {
    let mut in_flight: HashMap<ViewSlot, AbortHandle> = HashMap::new();
    log::info!("[worker] fetch worker started");

    while let Some(cmd) = commands.recv().await {
        match cmd {
            FetchCommand::Start { slot, ticket, request } => {
                if let Some(prev) = in_flight.remove(&slot) {
                    prev.abort();
                }
                log::debug!("[worker] start {slot:?} ticket={} {request:?}", ticket.value());

                let api = Arc::clone(&api);
                let events = events.clone();
                let handle = tokio::spawn(async move {
                    let ev = match request {
                        FetchRequest::List { url } => AppEvent::ListFetched {
                            slot,
                            ticket,
                            result: api.list_page(&url).await,
                        },
                        FetchRequest::Detail { id } => AppEvent::DetailFetched {
                            ticket,
                            result: api.detail(&id).await,
                        },
                    };
                    if events.send(ev).is_err() {
                        log::debug!("[worker] event channel closed, dropping result");
                    }
                });
                in_flight.insert(slot, handle.abort_handle());
            }
            FetchCommand::Cancel(slot) => {
                if let Some(prev) = in_flight.remove(&slot) {
                    log::debug!("[worker] cancel {slot:?}");
                    prev.abort();
                }
            }
        }
        in_flight.retain(|_, h| !h.is_finished());
    }

    for (_, h) in in_flight.drain() {
        h.abort();
    }
    log::info!("[worker] command channel closed, worker shutting down");
}
