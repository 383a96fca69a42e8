//! Todo API client example
//!
//! Builds a client from a nested endpoint registry and calls a public
//! JSON placeholder API.
//!
//! Run with: cargo run --example todo_client

use endpoint_tree::endpoint::{apost, del, get, post, put, EndpointGroup};
use endpoint_tree::{ApiClient, ClientConfig, RequestOptions, RequestParts};
use serde_json::{json, Value};

fn endpoints() -> EndpointGroup {
    EndpointGroup::new()
        .with_group(
            "todos",
            EndpointGroup::new()
                .with_endpoint("list", get("/todos"))
                .with_endpoint("get", get("/todos/:id"))
                .with_endpoint("create", post("/todos"))
                .with_endpoint("update", put("/todos/:id"))
                .with_endpoint("remove", del("/todos/:id")),
        )
        .with_group(
            "users",
            EndpointGroup::new()
                .with_endpoint("get", get("/users/:id"))
                .with_endpoint("todos", get("/users/:id/todos")),
        )
        .with_endpoint("login", apost("/posts"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Endpoint Tree Todo Example");
    println!("==========================\n");

    let config = ClientConfig::new("https://jsonplaceholder.typicode.com")
        .with_async_token(|| async { std::env::var("TODO_TOKEN").ok() })
        .with_on_error(|error| eprintln!("  request failed: {}", error));
    let api = ApiClient::with_reqwest(config, &endpoints());

    // Object input on GET becomes the query string
    let open: Vec<Value> = api
        .at("todos.list")?
        .call(json!({"completed": false, "userId": 1}))
        .json()
        .await?;
    println!("Open todos for user 1: {}", open.len());

    // Path params plus query
    let todo = api.at("users.todos")?.call(
        RequestParts::new()
            .param("id", 1)
            .query(json!({"_limit": 2})),
    );
    println!("Status: {}", todo.status().await?);
    let first_two: Vec<Value> = todo.json().await?;
    println!("First two: {}", serde_json::to_string_pretty(&first_two)?);

    // Object input on POST becomes the JSON body
    let created: Value = api
        .at("todos.create")?
        .call(json!({"title": "Write docs", "completed": false, "userId": 1}))
        .json()
        .await?;
    println!("Created: {}", created);

    // Params and body together, with a per-call header
    let updated = api
        .at("todos.update")?
        .call_with(
            RequestParts::new().param("id", 1).json(json!({"title": "Renamed"})),
            RequestOptions::new().header("X-Request-Source", "todo_client")?,
        )
        .await?;
    println!("Updated: {} {}", updated.status(), updated.text()?);

    // Authed endpoint; sends a bearer token only when TODO_TOKEN is set
    let login = api.at("login")?.call(json!({"user": "demo"}));
    println!("Login ok: {}", login.ok().await?);

    // Missing path param fails without sending anything
    match api.at("todos.remove")?.call(()).await {
        Ok(_) => println!("Unexpected success"),
        Err(error) => println!("Expected failure: {}", error),
    }

    Ok(())
}
