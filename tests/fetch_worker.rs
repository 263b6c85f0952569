//! Fetch worker against an in-memory catalog

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pokeview::api::CatalogApi;
use pokeview::error::FetchError;
use pokeview::types::{
    AppEvent, DetailRecord, FetchCommand, FetchRequest, ListPage, NamedResource, Ticket, ViewSlot,
};
use pokeview::worker::run_fetch_worker;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// URLs containing "slow" take a while; detail id "missing" is a 404
#[derive(Default)]
struct FakeCatalog {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_page(&self, url: &str) -> Result<ListPage, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        if url.contains("slow") {
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        Ok(ListPage {
            count: 1,
            next: None,
            previous: None,
            results: vec![NamedResource {
                name: url.to_string(),
                url: "https://pokeapi.co/api/v2/pokemon/1/".into(),
            }],
        })
    }

    async fn detail(&self, id: &str) -> Result<DetailRecord, FetchError> {
        self.calls.lock().unwrap().push(id.to_string());
        if id == "missing" {
            return Err(FetchError::Status(404));
        }
        Ok(DetailRecord {
            id: 1,
            name: id.to_string(),
            height: 7,
            weight: 69,
            types: vec![],
            abilities: vec![],
            stats: vec![],
            base_experience: None,
            sprite: None,
            artwork: None,
        })
    }
}

fn spawn_worker(
    api: Arc<FakeCatalog>,
) -> (UnboundedSender<FetchCommand>, UnboundedReceiver<AppEvent>) {
    let (cmd_tx, cmd_rx) = unbounded_channel();
    let (ev_tx, ev_rx) = unbounded_channel();
    tokio::spawn(run_fetch_worker(api, cmd_rx, ev_tx));
    (cmd_tx, ev_rx)
}

/// Every event until the worker and its tasks are gone
async fn collect(mut rx: UnboundedReceiver<AppEvent>) -> Vec<AppEvent> {
    let mut out = Vec::new();
    let deadline = Duration::from_secs(5);
    while let Ok(Some(ev)) = tokio::time::timeout(deadline, rx.recv()).await {
        out.push(ev);
    }
    out
}

fn list(slot: ViewSlot, ticket: Ticket, url: &str) -> FetchCommand {
    FetchCommand::Start { slot, ticket, request: FetchRequest::List { url: url.into() } }
}

#[tokio::test]
async fn list_result_carries_ticket() {
    let (tx, rx) = spawn_worker(Arc::new(FakeCatalog::default()));
    let ticket = Ticket::issue();
    tx.send(list(ViewSlot::PagedList, ticket, "page-1")).unwrap();

    let mut rx = rx;
    let ev = rx.recv().await.unwrap();
    match ev {
        AppEvent::ListFetched { slot, ticket: got, result } => {
            assert_eq!(slot, ViewSlot::PagedList);
            assert_eq!(got, ticket);
            assert_eq!(result.unwrap().results[0].name, "page-1");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn detail_error_is_forwarded() {
    let (tx, rx) = spawn_worker(Arc::new(FakeCatalog::default()));
    let ticket = Ticket::issue();
    tx.send(FetchCommand::Start {
        slot: ViewSlot::Detail,
        ticket,
        request: FetchRequest::Detail { id: "missing".into() },
    })
    .unwrap();
    drop(tx);

    let events = collect(rx).await;
    assert_eq!(events.len(), 1);
    match &events[0] {
        AppEvent::DetailFetched { result: Err(e), .. } => {
            assert_eq!(e.user_message(), "HTTP error! status: 404");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn cancel_aborts_in_flight_request() {
    let api = Arc::new(FakeCatalog::default());
    let (tx, rx) = spawn_worker(Arc::clone(&api));
    tx.send(list(ViewSlot::IncrementalList, Ticket::issue(), "slow-page")).unwrap();
    tx.send(FetchCommand::Cancel(ViewSlot::IncrementalList)).unwrap();
    drop(tx);

    assert!(collect(rx).await.is_empty());
}

#[tokio::test]
async fn restart_replaces_previous_request_for_slot() {
    let api = Arc::new(FakeCatalog::default());
    let (tx, rx) = spawn_worker(Arc::clone(&api));
    let old = Ticket::issue();
    let new = Ticket::issue();
    tx.send(list(ViewSlot::PagedList, old, "slow-page-2")).unwrap();
    tx.send(list(ViewSlot::PagedList, new, "page-1")).unwrap();
    drop(tx);

    let events = collect(rx).await;
    let tickets: Vec<Ticket> = events
        .iter()
        .filter_map(|ev| match ev {
            AppEvent::ListFetched { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .collect();
    assert_eq!(tickets, vec![new]);
}

#[tokio::test]
async fn slots_are_independent() {
    let (tx, rx) = spawn_worker(Arc::new(FakeCatalog::default()));
    let a = Ticket::issue();
    let b = Ticket::issue();
    tx.send(list(ViewSlot::PagedList, a, "slow-paged")).unwrap();
    tx.send(list(ViewSlot::IncrementalList, b, "incremental")).unwrap();

    let mut rx = rx;
    let mut seen = Vec::new();
    for _ in 0..2 {
        if let Some(AppEvent::ListFetched { ticket, .. }) = rx.recv().await {
            seen.push(ticket);
        }
    }
    seen.sort();
    assert_eq!(seen, vec![a, b]);
}
