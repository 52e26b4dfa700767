//! Tests for the WebSocket stream client against a local scripted server.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::SinkExt;
use playground_client::{ClientConfig, CloseReason, StreamClient};
use playground_snapshot::{ExecutionStage, InterpreterSnapshot, Outcome, TraceTarget};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

const TXID: &str = "f2f398dace996dab12e0cfb02fb0b59de0ef0398be393d90ebc8ab397550370b";

/// What the server does after sending its messages.
#[derive(Clone, Copy)]
enum Ending {
    Close,
    Hang,
    Drop,
}

#[derive(Clone)]
struct Script {
    messages: Vec<String>,
    ending: Ending,
}

#[derive(Debug, PartialEq)]
enum Event {
    Snapshot(&'static str, Outcome),
    Closed(&'static str, CloseReason),
}

fn snapshot(outcome: Outcome) -> InterpreterSnapshot {
    InterpreterSnapshot {
        stage: ExecutionStage::ExecutingPubKeyScript,
        locking_script: vec![],
        unlocking_script: vec![],
        current_script: vec![],
        p2sh_script: None,
        witness_script: None,
        witness_stack_items: None,
        main_stack: vec![],
        alt_stack: vec![],
        outcome,
        step_index: None,
    }
}

fn doc(outcome: Outcome) -> String {
    snapshot(outcome).to_json().unwrap()
}

/// Serve one script per accepted connection, recording request paths.
async fn serve(scripts: Vec<Script>) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let paths = Arc::new(Mutex::new(Vec::new()));

    let recorded = Arc::clone(&paths);
    tokio::spawn(async move {
        for script in scripts {
            let (tcp, _) = listener.accept().await.unwrap();
            let recorded = Arc::clone(&recorded);
            tokio::spawn(async move {
                let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                    recorded.lock().unwrap().push(req.uri().path().to_string());
                    Ok(resp)
                };
                let mut ws = tokio_tungstenite::accept_hdr_async(tcp, callback)
                    .await
                    .unwrap();
                for text in script.messages {
                    ws.send(Message::Text(text)).await.unwrap();
                }
                match script.ending {
                    Ending::Close => {
                        let _ = ws.close(None).await;
                    }
                    Ending::Hang => std::future::pending::<()>().await,
                    Ending::Drop => drop(ws),
                }
            });
        }
    });

    (addr, paths)
}

fn client_for(addr: SocketAddr) -> StreamClient {
    StreamClient::new(ClientConfig {
        server_url: format!("http://{addr}"),
        ..ClientConfig::default()
    })
}

fn open(
    client: &StreamClient,
    name: &'static str,
    events: &mpsc::UnboundedSender<Event>,
) -> playground_client::StreamHandle {
    let on_snapshot = events.clone();
    let on_close = events.clone();
    client.open_stream(
        &TraceTarget::new(TXID, 0),
        Box::new(move |s| {
            let _ = on_snapshot.send(Event::Snapshot(name, s.outcome));
        }),
        Box::new(move |reason| {
            let _ = on_close.send(Event::Closed(name, reason));
        }),
    )
}

async fn next(events: &mut mpsc::UnboundedReceiver<Event>) -> Event {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for stream event")
        .expect("event channel closed")
}

#[tokio::test]
async fn test_stream_delivers_every_snapshot_then_completes() {
    let (addr, paths) = serve(vec![Script {
        messages: vec![
            doc(Outcome::Pending),
            doc(Outcome::Pending),
            doc(Outcome::Result(true)),
        ],
        ending: Ending::Close,
    }])
    .await;

    let client = client_for(addr);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = open(&client, "a", &tx);

    assert_eq!(next(&mut rx).await, Event::Snapshot("a", Outcome::Pending));
    assert_eq!(next(&mut rx).await, Event::Snapshot("a", Outcome::Pending));
    assert_eq!(next(&mut rx).await, Event::Snapshot("a", Outcome::Result(true)));
    assert_eq!(next(&mut rx).await, Event::Closed("a", CloseReason::Completed));
    assert!(handle.is_closed());

    assert_eq!(
        paths.lock().unwrap().as_slice(),
        [format!("/api/transaction/{TXID}/input/0/stream-interpret")]
    );
}

#[tokio::test]
async fn test_dropped_connection_is_a_failure() {
    let (addr, _) = serve(vec![Script {
        messages: vec![doc(Outcome::Pending)],
        ending: Ending::Drop,
    }])
    .await;

    let client = client_for(addr);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _handle = open(&client, "a", &tx);

    assert_eq!(next(&mut rx).await, Event::Snapshot("a", Outcome::Pending));
    match next(&mut rx).await {
        Event::Closed("a", CloseReason::Failed(_)) => {}
        other => panic!("expected failed close, got {:?}", other),
    }
}

#[tokio::test]
async fn test_undecodable_message_is_a_failure() {
    let (addr, _) = serve(vec![Script {
        messages: vec!["{\"result\": 1}".to_string()],
        ending: Ending::Hang,
    }])
    .await;

    let client = client_for(addr);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _handle = open(&client, "a", &tx);

    match next(&mut rx).await {
        Event::Closed("a", CloseReason::Failed(reason)) => {
            assert!(reason.contains("malformed"));
        }
        other => panic!("expected failed close, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_is_a_failure() {
    let client = StreamClient::new(ClientConfig {
        server_url: "http://127.0.0.1:1".to_string(),
        ..ClientConfig::default()
    });
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _handle = open(&client, "a", &tx);

    assert!(matches!(
        next(&mut rx).await,
        Event::Closed("a", CloseReason::Failed(_))
    ));
}

#[tokio::test]
async fn test_cancel_closes_once_and_stops_delivery() {
    let (addr, _) = serve(vec![Script {
        messages: vec![doc(Outcome::Pending)],
        ending: Ending::Hang,
    }])
    .await;

    let client = client_for(addr);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = open(&client, "a", &tx);

    assert_eq!(next(&mut rx).await, Event::Snapshot("a", Outcome::Pending));

    handle.cancel();
    handle.cancel();
    client.cancel();

    assert_eq!(next(&mut rx).await, Event::Closed("a", CloseReason::Cancelled));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_second_open_closes_first_before_delivering() {
    let (addr, _) = serve(vec![
        Script {
            messages: vec![doc(Outcome::Pending)],
            ending: Ending::Hang,
        },
        Script {
            messages: vec![doc(Outcome::Pending), doc(Outcome::Result(false))],
            ending: Ending::Close,
        },
    ])
    .await;

    let client = client_for(addr);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let first = open(&client, "first", &tx);
    assert_eq!(next(&mut rx).await, Event::Snapshot("first", Outcome::Pending));

    let _second = open(&client, "second", &tx);
    assert!(first.is_closed());

    assert_eq!(
        next(&mut rx).await,
        Event::Closed("first", CloseReason::Cancelled)
    );
    assert_eq!(next(&mut rx).await, Event::Snapshot("second", Outcome::Pending));
    assert_eq!(
        next(&mut rx).await,
        Event::Snapshot("second", Outcome::Result(false))
    );
    assert_eq!(
        next(&mut rx).await,
        Event::Closed("second", CloseReason::Completed)
    );
}
