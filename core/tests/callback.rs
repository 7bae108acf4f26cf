//! Completion-handler dispatch: results arrive only through the configured
//! context, which decides the thread a completion runs on.

mod support;

use std::sync::{Arc, Mutex};

use hostlink_core::{
    CallbackClient, CallbackQueue, ClientConfig, HostClient, Immediate, NetworkingError, NO_BODY,
};
use support::{Note, Refused, ScriptedTransport, HOST};

type Outcome = Arc<Mutex<Option<Result<Note, NetworkingError>>>>;

fn recorder() -> (Outcome, impl FnOnce(Result<Note, NetworkingError>) + Send + 'static) {
    let outcome: Outcome = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&outcome);
    (outcome, move |result| {
        *slot.lock().unwrap() = Some(result);
    })
}

fn host_client(transport: ScriptedTransport) -> HostClient<ScriptedTransport> {
    HostClient::with_transport(ClientConfig::new(HOST), transport)
}

#[tokio::test]
async fn completion_waits_for_the_pump() {
    let (queue, mut pump) = CallbackQueue::channel();
    let client = CallbackClient::on_current_runtime(
        host_client(ScriptedTransport::json(200, r#"{"title":"Queued","pinned":false}"#)),
        queue,
    );
    let (outcome, completion) = recorder();

    client.get("notes", &[&1], NO_BODY, completion).await.unwrap();

    assert!(outcome.lock().unwrap().is_none(), "completion ran before the pump");
    assert_eq!(pump.run_pending(), 1);
    let note = outcome.lock().unwrap().take().unwrap().unwrap();
    assert_eq!(note.title, "Queued");
}

#[tokio::test]
async fn transport_failure_is_delivered() {
    let (queue, mut pump) = CallbackQueue::channel();
    let client =
        CallbackClient::on_current_runtime(host_client(ScriptedTransport::refused("localhost")), queue);
    let (outcome, completion) = recorder();

    let _task = client.post("notes", &[], Some(&serde_json::json!({"title": "x"})), completion);
    assert!(pump.run_next().await);

    match outcome.lock().unwrap().take().unwrap() {
        Err(NetworkingError::TransportFailure(source)) => {
            assert!(source.downcast_ref::<Refused>().is_some());
        }
        other => panic!("expected TransportFailure, got {other:?}"),
    };
}

#[tokio::test]
async fn invalid_path_goes_through_the_context() {
    let (queue, mut pump) = CallbackQueue::channel();
    let client = CallbackClient::on_current_runtime(
        HostClient::with_transport(ClientConfig::new("nohost"), ScriptedTransport::json(200, "{}")),
        queue,
    );
    let (outcome, completion) = recorder();

    client.delete("notes", &[&3], NO_BODY, completion).await.unwrap();

    assert!(outcome.lock().unwrap().is_none());
    pump.run_pending();
    assert!(matches!(
        outcome.lock().unwrap().take(),
        Some(Err(NetworkingError::InvalidPath(ref path))) if path == "nohost/notes/3"
    ));
    assert!(client.client().transport().sent().is_empty());
}

#[tokio::test]
async fn no_data_is_delivered_as_uncategorized() {
    let client = CallbackClient::on_current_runtime(host_client(ScriptedTransport::empty(204)), Immediate);
    let (outcome, completion) = recorder();

    let body = serde_json::json!({"pinned": true});
    client
        .update("notes", &[&1], Some(&body), completion)
        .await
        .unwrap();

    assert!(matches!(
        outcome.lock().unwrap().take(),
        Some(Err(NetworkingError::Uncategorized(_)))
    ));
    let sent = client.client().transport().sent();
    assert_eq!(sent[0].method, hostlink_core::HttpMethod::Put);
}

#[test]
fn completions_run_on_the_pumping_thread() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let (queue, mut pump) = CallbackQueue::channel();
    let client = CallbackClient::new(
        host_client(ScriptedTransport::json(200, r#"{"title":"t","pinned":true}"#)),
        queue,
        runtime.handle().clone(),
    );

    let ran_on = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&ran_on);
    let task = client.get("notes", &[&1], NO_BODY, move |result: Result<Note, NetworkingError>| {
        assert!(result.is_ok());
        *slot.lock().unwrap() = Some(std::thread::current().id());
    });
    runtime.block_on(task).unwrap();

    assert_eq!(pump.run_pending(), 1);
    assert_eq!(*ran_on.lock().unwrap(), Some(std::thread::current().id()));
}

#[test]
fn immediate_runs_on_the_runtime_worker() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let client = CallbackClient::new(
        host_client(ScriptedTransport::json(200, r#"{"title":"t","pinned":false}"#)),
        Immediate,
        runtime.handle().clone(),
    );

    let ran_on = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&ran_on);
    let task = client.get("notes", &[&1], NO_BODY, move |result: Result<Note, NetworkingError>| {
        assert!(result.is_ok());
        *slot.lock().unwrap() = Some(std::thread::current().id());
    });
    runtime.block_on(task).unwrap();

    let ran_on = ran_on.lock().unwrap().expect("completion should have run");
    assert_ne!(ran_on, std::thread::current().id());
}
