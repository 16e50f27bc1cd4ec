//! Full CRUD lifecycle against a live server.
//!
//! # Design
//! Starts the server on a random port with a SQLite database, then drives it
//! over real HTTP using ureq. Checks that form bodies, status codes and JSON
//! payloads survive the actual transport.

use std::sync::Arc;

use todo_core::{Resources, Todo};
use todo_server::SqliteStore;

struct Reply {
    status: u16,
    body: String,
}

impl Reply {
    fn todo(&self) -> Todo {
        serde_json::from_str(&self.body).expect("todo JSON")
    }
}

fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

/// Issue one request and return status and body as data, 4xx/5xx included.
fn call(method: &str, url: &str, form: Option<&str>) -> Reply {
    let agent = agent();
    let result = match (method, form) {
        ("GET", _) => agent.get(url).call(),
        ("DELETE", _) => agent.delete(url).call(),
        ("POST", Some(body)) => agent
            .post(url)
            .content_type("application/x-www-form-urlencoded")
            .send(body.as_bytes()),
        ("POST", None) => agent.post(url).send_empty(),
        ("PUT", Some(body)) => agent
            .put(url)
            .content_type("application/x-www-form-urlencoded")
            .send(body.as_bytes()),
        ("PUT", None) => agent.put(url).send_empty(),
        (other, _) => panic!("unsupported method in test: {other}"),
    };
    let mut response = result.expect("HTTP transport error");

    Reply {
        status: response.status().as_u16(),
        body: response.body_mut().read_to_string().unwrap_or_default(),
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let store = Arc::new(SqliteStore::open_in_memory().unwrap());
            todo_server::run(listener, Resources::new(store)).await
        })
        .unwrap();
    });

    format!("http://{addr}/todos")
}

#[test]
fn crud_lifecycle() {
    let base = start_server();

    // Step 1: list — should be empty.
    let reply = call("GET", &base, None);
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, "[]");

    // Step 2: create without a title is rejected.
    let reply = call("POST", &base, Some("date=2024-01-01"));
    assert_eq!(reply.status, 400);

    // Step 3: create a todo.
    let reply = call("POST", &base, Some("title=Buy%20milk"));
    assert_eq!(reply.status, 200);
    let created = reply.todo();
    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);
    let item = format!("{base}/{}", created.id);

    // Step 4: get the created todo.
    let reply = call("GET", &item, None);
    assert_eq!(reply.status, 200);
    assert_eq!(reply.todo(), created);

    // Step 5: partial update; malformed segment ignored.
    let reply = call("PUT", &item, Some("title=Eggs&justakey&completed=true"));
    assert_eq!(reply.status, 200);
    let updated = reply.todo();
    assert_eq!(updated.title, "Eggs");
    assert_eq!(updated.date, created.date);
    assert!(updated.completed);

    // Step 6: non-numeric id.
    let reply = call("PUT", &format!("{base}/abc"), Some("title=x"));
    assert_eq!(reply.status, 404);

    // Step 7: list — should have one item.
    let reply = call("GET", &base, None);
    let todos: Vec<Todo> = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(todos, vec![updated.clone()]);

    // Step 8: delete returns the pre-deletion snapshot.
    let reply = call("DELETE", &item, None);
    assert_eq!(reply.status, 200);
    assert_eq!(reply.todo(), updated);

    // Step 9: get after delete — 404.
    assert_eq!(call("GET", &item, None).status, 404);

    // Step 10: delete again — 404.
    assert_eq!(call("DELETE", &item, None).status, 404);

    // Step 11: list — should be empty again.
    let reply = call("GET", &base, None);
    assert_eq!(reply.body, "[]");
}
