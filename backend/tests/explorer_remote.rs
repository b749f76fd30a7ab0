//! End-to-end explorer passes against a stand-in remote memo service.
//!
//! The remote service is an Actix Web server bound to an ephemeral port; the
//! explorer talks to it through the real reqwest adapter and writes into the
//! in-memory record store.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpResponse, HttpServer, web};
use memo_backend::domain::ports::RemoteMemoSourceError;
use memo_backend::domain::{
    Explorer, ExplorerError, Role, Store, SyncErrorKind, SyncUserError, User, Visibility,
};
use memo_backend::outbound::memo_source::{DEFAULT_REQUEST_TIMEOUT, HttpMemoSource};
use memo_backend::outbound::persistence::InMemoryRecordStore;
use rstest::rstest;

const TWO_POSTS: &str = r#"[{"content":"hi","createdTs":100,"updatedTs":100},{"content":"yo","createdTs":200,"updatedTs":200}]"#;

/// Canned behaviour of the stand-in remote service.
struct RemoteFeed {
    body: &'static str,
    delay: Duration,
    requests: Mutex<Vec<HashMap<String, String>>>,
}

impl RemoteFeed {
    fn new(body: &'static str, delay: Duration) -> Self {
        Self {
            body,
            delay,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().expect("requests mutex").clone()
    }

    fn requested_users(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|query| query.get("creatorUsername").cloned())
            .collect()
    }
}

async fn list_memos(
    feed: web::Data<RemoteFeed>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    feed.requests
        .lock()
        .expect("requests mutex")
        .push(query.into_inner());
    if !feed.delay.is_zero() {
        actix_web::rt::time::sleep(feed.delay).await;
    }
    HttpResponse::Ok()
        .content_type("application/json")
        .body(feed.body)
}

fn spawn_remote(feed: web::Data<RemoteFeed>) -> (String, ServerHandle) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let server = HttpServer::new(move || {
        App::new()
            .app_data(feed.clone())
            .route("/api/v1/memo", web::get().to(list_memos))
    })
    .workers(1)
    .disable_signals()
    .listen(listener)
    .expect("bind test server")
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{addr}"), handle)
}

struct Local {
    records: Arc<InMemoryRecordStore>,
    store: Arc<Store>,
}

impl Local {
    fn new() -> Self {
        let records = Arc::new(InMemoryRecordStore::default());
        let store = Arc::new(Store::new(records.clone()));
        Self { records, store }
    }

    async fn external_user(&self, username: String) -> User {
        self.store
            .create_user(&User {
                username,
                role: Role::External,
                ..User::default()
            })
            .await
            .expect("create external user")
    }

    fn explorer(&self) -> Explorer {
        let source = HttpMemoSource::new(DEFAULT_REQUEST_TIMEOUT).expect("build http source");
        Explorer::new(Arc::clone(&self.store), Arc::new(source))
    }
}

#[rstest]
#[actix_web::test]
async fn mirrors_remote_posts_for_external_user() {
    let feed = web::Data::new(RemoteFeed::new(TWO_POSTS, Duration::ZERO));
    let (base, handle) = spawn_remote(feed.clone());
    let local = Local::new();
    let alice = local.external_user(format!("{base}/u/alice")).await;

    let report = local
        .explorer()
        .sync_all_external_users()
        .await
        .expect("pass succeeds");

    assert_eq!(report.memos_created, 2);
    let memos = local.records.list_memos(alice.id).expect("list memos");
    let summary = memos
        .iter()
        .map(|memo| {
            (
                memo.creator_id,
                memo.content.as_str(),
                memo.created_ts,
                memo.updated_ts,
                memo.visibility,
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![
            (alice.id, "hi", 100, 100, Visibility::Protected),
            (alice.id, "yo", 200, 200, Visibility::Protected),
        ]
    );

    let requests = feed.requests();
    let query = requests.first().expect("one remote request");
    assert_eq!(query.get("creatorUsername").map(String::as_str), Some("alice"));
    assert_eq!(query.get("rowStatus").map(String::as_str), Some("NORMAL"));
    assert_eq!(query.get("limit").map(String::as_str), Some("2"));

    handle.stop(false).await;
}

#[rstest]
#[actix_web::test]
async fn consecutive_passes_duplicate_unchanged_feed() {
    let feed = web::Data::new(RemoteFeed::new(TWO_POSTS, Duration::ZERO));
    let (base, handle) = spawn_remote(feed.clone());
    let local = Local::new();
    let alice = local.external_user(format!("{base}/u/alice")).await;
    let explorer = local.explorer();

    explorer.sync_all_external_users().await.expect("first pass");
    explorer.sync_all_external_users().await.expect("second pass");

    let memos = local.records.list_memos(alice.id).expect("list memos");
    assert_eq!(memos.len(), 4);
    assert_eq!(feed.requests().len(), 2);

    handle.stop(false).await;
}

#[rstest]
#[actix_web::test]
async fn slow_remote_times_out_and_aborts_the_pass() {
    let slow = web::Data::new(RemoteFeed::new(TWO_POSTS, Duration::from_secs(5)));
    let fast = web::Data::new(RemoteFeed::new(TWO_POSTS, Duration::ZERO));
    let (slow_base, slow_handle) = spawn_remote(slow.clone());
    let (fast_base, fast_handle) = spawn_remote(fast.clone());
    let local = Local::new();
    let slow_user = local.external_user(format!("{slow_base}/u/slowpoke")).await;
    let after = local.external_user(format!("{fast_base}/u/after")).await;

    let started = Instant::now();
    let error = local
        .explorer()
        .sync_all_external_users()
        .await
        .expect_err("pass aborts");

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(error.kind(), SyncErrorKind::Network);
    assert!(matches!(
        &error,
        ExplorerError::SyncUser {
            user_id,
            source: SyncUserError::Fetch(RemoteMemoSourceError::Timeout { .. }),
        } if *user_id == slow_user.id
    ));
    assert_eq!(slow.requested_users(), vec!["slowpoke"]);
    assert!(fast.requests().is_empty());
    assert!(local.records.list_memos(after.id).expect("list memos").is_empty());

    slow_handle.stop(false).await;
    fast_handle.stop(false).await;
}

#[rstest]
#[actix_web::test]
async fn non_json_body_is_a_decode_failure() {
    let feed = web::Data::new(RemoteFeed::new("<html>maintenance</html>", Duration::ZERO));
    let (base, handle) = spawn_remote(feed.clone());
    let local = Local::new();
    let alice = local.external_user(format!("{base}/u/alice")).await;

    let error = local
        .explorer()
        .sync_all_external_users()
        .await
        .expect_err("pass aborts");

    assert_eq!(error.kind(), SyncErrorKind::Decode);
    assert_eq!(error.user_id(), Some(alice.id));
    assert!(local.records.list_memos(alice.id).expect("list memos").is_empty());

    handle.stop(false).await;
}

#[rstest]
#[actix_web::test]
async fn malformed_address_never_reaches_the_remote() {
    let feed = web::Data::new(RemoteFeed::new(TWO_POSTS, Duration::ZERO));
    let (base, handle) = spawn_remote(feed.clone());
    let local = Local::new();
    let broken = local.external_user("not-a-valid-url-%".to_owned()).await;
    let healthy = local.external_user(format!("{base}/u/alice")).await;

    let error = local
        .explorer()
        .sync_all_external_users()
        .await
        .expect_err("pass aborts");

    assert_eq!(error.kind(), SyncErrorKind::Parse);
    assert_eq!(error.user_id(), Some(broken.id));
    assert!(feed.requests().is_empty());
    assert!(local.records.list_memos(healthy.id).expect("list memos").is_empty());

    handle.stop(false).await;
}

#[rstest]
#[actix_web::test]
async fn escaped_account_name_reaches_the_remote_decoded() {
    let feed = web::Data::new(RemoteFeed::new("[]", Duration::ZERO));
    let (base, handle) = spawn_remote(feed.clone());
    let local = Local::new();
    local
        .external_user(format!("{base}/u/%C3%A1l%20ice"))
        .await;

    local
        .explorer()
        .sync_all_external_users()
        .await
        .expect("pass succeeds");

    assert_eq!(feed.requested_users(), vec!["ál ice"]);

    handle.stop(false).await;
}
