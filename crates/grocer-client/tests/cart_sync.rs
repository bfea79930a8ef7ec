//! End-to-end tests of the cart synchronization protocol against an
//! in-process stub gateway.
//!
//! The stub keeps a single shopper's cart in memory and records every
//! request it serves, so the tests can assert both what the engine ended
//! up with and what actually went over the wire (including the cases
//! where nothing must).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tempfile::TempDir;

use grocer_client::{AddToCart, ClientError, Storefront};
use grocer_gateway::GatewayConfig;
use grocer_shared::{
    AddressId, CartItemId, DeliveryDay, PaymentMethod, PendingCartItem, PlaceOrder, ProductId,
    RecurringDetails,
};
use grocer_store::Database;

// ---------------------------------------------------------------------------
// Stub gateway
// ---------------------------------------------------------------------------

/// Quantity ceiling the stub enforces on updates, standing in for a stock
/// limit.  Lets tests observe the server overriding an optimistic value.
const STOCK_CAP: u64 = 5;

#[derive(Default)]
struct StubState {
    requests: Vec<String>,
    items: Vec<Value>,
    next_line: u32,
    /// Product ids whose additions the stub rejects.
    rejected_products: Vec<String>,
}

type Shared = Arc<Mutex<StubState>>;

fn price_for(product: &str) -> f64 {
    match product {
        "p-milk" => 30.0,
        "p-bread" => 25.0,
        _ => 10.0,
    }
}

async fn login(State(s): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    s.lock().unwrap().requests.push("POST /auth/login".into());
    Json(json!({
        "user": {
            "name": "Asha",
            "email": body["email"],
            "phone": "555-0100",
            "isBusiness": false
        },
        "token": "tok-1"
    }))
}

async fn get_cart(State(s): State<Shared>) -> Json<Value> {
    let mut s = s.lock().unwrap();
    s.requests.push("GET /cart".into());
    let total: f64 = s
        .items
        .iter()
        .map(|i| i["variation"]["price"].as_f64().unwrap_or(0.0) * i["quantity"].as_f64().unwrap_or(0.0))
        .sum();
    Json(json!({ "items": s.items, "total": total }))
}

async fn add_item(State(s): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut s = s.lock().unwrap();
    let product = body["productId"].as_str().unwrap_or_default().to_string();
    s.requests.push(format!("POST /cart/add {product}"));

    if s.rejected_products.contains(&product) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": format!("Product {product} is unavailable") })),
        );
    }

    s.next_line += 1;
    let line = json!({
        "_id": format!("line-{}", s.next_line),
        "productId": product,
        "variationIndex": body["variationIndex"],
        "quantity": body["quantity"],
        "variation": { "quantity": "1 unit", "price": price_for(&product) }
    });
    s.items.push(line);
    (StatusCode::OK, Json(json!({ "ok": true })))
}

async fn update_item(State(s): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut s = s.lock().unwrap();
    let id = body["itemId"].as_str().unwrap_or_default().to_string();
    s.requests.push(format!("PUT /cart/update {id}"));

    let capped = body["quantity"].as_u64().unwrap_or(0).min(STOCK_CAP);
    let mut found = false;
    for item in &mut s.items {
        if item["_id"] == body["itemId"] {
            item["quantity"] = json!(capped);
            found = true;
        }
    }

    if found {
        (StatusCode::OK, Json(json!({ "ok": true })))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Cart item not found" })),
        )
    }
}

async fn remove_item(State(s): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    let mut s = s.lock().unwrap();
    s.requests.push(format!("DELETE /cart/item/{id}"));
    s.items.retain(|i| i["_id"] != Value::String(id.clone()));
    Json(json!({ "ok": true }))
}

async fn update_profile(State(s): State<Shared>, Json(_body): Json<Value>) -> Json<Value> {
    s.lock().unwrap().requests.push("PUT /auth/profile".into());
    Json(json!({}))
}

async fn addresses(State(s): State<Shared>) -> Json<Value> {
    s.lock().unwrap().requests.push("GET /auth/address".into());
    Json(json!({
        "addresses": [{
            "_id": "addr-1",
            "name": "Asha",
            "phone": "555-0100",
            "addressLine1": "12 Main St",
            "city": "Pune",
            "state": "MH",
            "pincode": "411001",
            "isDefault": true
        }]
    }))
}

async fn create_order(State(s): State<Shared>, Json(_body): Json<Value>) -> Json<Value> {
    let mut s = s.lock().unwrap();
    s.requests.push("POST /orders/create".into());
    s.items.clear();
    Json(json!({ "_id": "order-1", "items": [], "total": 0.0, "status": "placed" }))
}

async fn spawn_stub(state: Shared) -> Result<SocketAddr> {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/profile", put(update_profile))
        .route("/api/auth/address", get(addresses))
        .route("/api/cart", get(get_cart))
        .route("/api/cart/add", post(add_item))
        .route("/api/cart/update", put(update_item))
        .route("/api/cart/item/:id", delete(remove_item))
        .route("/api/orders/create", post(create_order))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Ok(addr)
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Harness {
    front: Storefront,
    stub: Shared,
    db_path: PathBuf,
    _tmp: TempDir,
}

async fn harness() -> Result<Harness> {
    let stub: Shared = Shared::default();
    let addr = spawn_stub(stub.clone()).await?;

    let tmp = tempfile::tempdir()?;
    let db_path = tmp.path().join("grocer.db");
    let db = Database::open_at(&db_path)?;

    let config = GatewayConfig {
        base_url: format!("http://{addr}/api"),
        ..Default::default()
    };
    let front = Storefront::with_database(&config, db)?;

    Ok(Harness {
        front,
        stub,
        db_path,
        _tmp: tmp,
    })
}

fn requests(stub: &Shared) -> Vec<String> {
    stub.lock().unwrap().requests.clone()
}

fn product(id: &str) -> ProductId {
    ProductId(id.into())
}

// ---------------------------------------------------------------------------
// Guest deferral and replay
// ---------------------------------------------------------------------------

#[tokio::test]
async fn guest_add_defers_without_network() -> Result<()> {
    let h = harness().await?;

    let outcome = h.front.add_to_cart(product("p-milk"), 0, 2).await?;
    assert_eq!(outcome, AddToCart::DeferredForLogin);

    // Nothing went over the wire and the in-memory cart is untouched.
    assert!(requests(&h.stub).is_empty());
    let cart = h.front.cart()?;
    assert!(cart.items.is_empty());
    assert_eq!(cart.total, Decimal::ZERO);

    // Exactly one queued addition with the given tuple.
    let db = Database::open_at(&h.db_path)?;
    let queued = db.list_pending_items()?;
    assert_eq!(
        queued,
        vec![PendingCartItem {
            product_id: product("p-milk"),
            variation_index: 0,
            quantity: 2,
        }]
    );
    Ok(())
}

#[tokio::test]
async fn replay_runs_in_insertion_order_then_clears_and_fetches() -> Result<()> {
    let h = harness().await?;

    h.front.add_to_cart(product("p-a"), 0, 1).await?;
    h.front.add_to_cart(product("p-b"), 0, 2).await?;
    h.front.add_to_cart(product("p-c"), 0, 3).await?;

    let outcome = h.front.login("asha@example.com", "pw").await?;
    let report = outcome.replay.expect("queued items were replayed");
    assert_eq!(report.attempted, 3);
    assert!(report.failed.is_empty());

    assert_eq!(
        requests(&h.stub),
        vec![
            "POST /auth/login",
            "POST /cart/add p-a",
            "POST /cart/add p-b",
            "POST /cart/add p-c",
            "GET /cart",
        ]
    );

    // Queue is gone, cart reflects the replayed additions.
    let db = Database::open_at(&h.db_path)?;
    assert!(db.list_pending_items()?.is_empty());
    assert_eq!(h.front.cart()?.items.len(), 3);
    Ok(())
}

#[tokio::test]
async fn replay_failure_still_clears_queue_and_is_reported() -> Result<()> {
    let h = harness().await?;
    h.stub
        .lock()
        .unwrap()
        .rejected_products
        .push("p-bad".into());

    h.front.add_to_cart(product("p-a"), 0, 1).await?;
    h.front.add_to_cart(product("p-bad"), 0, 1).await?;
    h.front.add_to_cart(product("p-c"), 0, 1).await?;

    let outcome = h.front.login("asha@example.com", "pw").await?;
    let report = outcome.replay.expect("queued items were replayed");
    assert_eq!(report.attempted, 3);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].item.product_id, product("p-bad"));
    assert_eq!(report.failed[0].reason, "Product p-bad is unavailable");

    // All three were attempted, in order, despite the middle rejection,
    // and the queue was cleared unconditionally.
    let adds: Vec<_> = requests(&h.stub)
        .into_iter()
        .filter(|r| r.starts_with("POST /cart/add"))
        .collect();
    assert_eq!(
        adds,
        vec![
            "POST /cart/add p-a",
            "POST /cart/add p-bad",
            "POST /cart/add p-c",
        ]
    );
    let db = Database::open_at(&h.db_path)?;
    assert!(db.list_pending_items()?.is_empty());

    // The failed item is silently absent from the reconciled cart.
    let cart = h.front.cart()?;
    let products: Vec<_> = cart.items.iter().map(|i| i.product_id.clone()).collect();
    assert_eq!(products, vec![product("p-a"), product("p-c")]);
    Ok(())
}

#[tokio::test]
async fn login_with_empty_queue_just_fetches() -> Result<()> {
    let h = harness().await?;

    let outcome = h.front.login("asha@example.com", "pw").await?;
    assert!(outcome.replay.is_none());
    assert_eq!(outcome.user.name, "Asha");
    assert_eq!(requests(&h.stub), vec!["POST /auth/login", "GET /cart"]);
    Ok(())
}

// ---------------------------------------------------------------------------
// Reconciliation discipline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_truth_overwrites_optimistic_quantity() -> Result<()> {
    let h = harness().await?;
    h.front.login("asha@example.com", "pw").await?;
    h.front.add_to_cart(product("p-milk"), 0, 2).await?;

    let line_id = h.front.cart()?.items[0].id.clone().expect("line id");

    // Ask for more than the stub's stock cap: the optimistic layer briefly
    // shows the requested value, but the reconciling fetch must land on
    // what the server actually stored.
    h.front.update_quantity(&line_id, 9).await?;

    let cart = h.front.cart()?;
    assert_eq!(cart.items[0].quantity, STOCK_CAP as u32);
    assert_eq!(cart.total, Decimal::from(30 * STOCK_CAP));
    assert_eq!(h.front.last_cart_error()?, None);
    assert!(!h.front.cart_busy()?);
    Ok(())
}

#[tokio::test]
async fn failed_update_rolls_back_and_still_called_gateway() -> Result<()> {
    let h = harness().await?;
    h.front.login("asha@example.com", "pw").await?;
    h.front.add_to_cart(product("p-milk"), 0, 2).await?;
    let before = h.front.cart()?;

    let stale = CartItemId("line-unknown".into());
    let err = h
        .front
        .update_quantity(&stale, 4)
        .await
        .expect_err("server rejects the stale id");
    assert_eq!(err.to_string(), "Cart item not found");

    // The call was attempted even though no local line matched, and the
    // rollback fetch restored server truth.
    assert!(requests(&h.stub)
        .iter()
        .any(|r| r == "PUT /cart/update line-unknown"));
    assert_eq!(h.front.cart()?, before);
    assert_eq!(
        h.front.last_cart_error()?,
        Some("Cart item not found".into())
    );
    assert!(!h.front.cart_busy()?);
    Ok(())
}

#[tokio::test]
async fn remove_reconciles_to_server_state() -> Result<()> {
    let h = harness().await?;
    h.front.login("asha@example.com", "pw").await?;
    h.front.add_to_cart(product("p-milk"), 0, 2).await?;
    h.front.add_to_cart(product("p-bread"), 0, 1).await?;

    let first = h.front.cart()?.items[0].id.clone().expect("line id");
    h.front.remove_item(&first).await?;

    let cart = h.front.cart()?;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].product_id, product("p-bread"));
    assert_eq!(cart.total, Decimal::from(25));
    Ok(())
}

#[tokio::test]
async fn remove_with_empty_id_fails_fast_without_network() -> Result<()> {
    let h = harness().await?;
    h.front.login("asha@example.com", "pw").await?;
    let wire_before = requests(&h.stub).len();

    let err = h
        .front
        .remove_item(&CartItemId(String::new()))
        .await
        .expect_err("precondition failure");
    assert!(matches!(err, ClientError::MissingItemId));
    assert_eq!(requests(&h.stub).len(), wire_before);
    Ok(())
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_resets_cart_synchronously_without_network() -> Result<()> {
    let h = harness().await?;
    h.front.login("asha@example.com", "pw").await?;
    h.front.add_to_cart(product("p-milk"), 0, 2).await?;
    assert!(!h.front.cart()?.items.is_empty());

    let wire_before = requests(&h.stub).len();
    h.front.logout()?;

    assert!(!h.front.is_authenticated()?);
    let cart = h.front.cart()?;
    assert!(cart.items.is_empty());
    assert_eq!(cart.total, Decimal::ZERO);
    assert_eq!(requests(&h.stub).len(), wire_before);

    // The persisted session is gone too, and logging out again is a no-op.
    let db = Database::open_at(&h.db_path)?;
    assert!(db.load_session()?.is_none());
    h.front.logout()?;
    Ok(())
}

#[tokio::test]
async fn persisted_session_is_restored_without_network() -> Result<()> {
    let stub: Shared = Shared::default();
    let addr = spawn_stub(stub.clone()).await?;

    let tmp = tempfile::tempdir()?;
    let db_path = tmp.path().join("grocer.db");

    {
        let db = Database::open_at(&db_path)?;
        db.save_session(&grocer_shared::Session {
            user: grocer_shared::UserProfile {
                name: "Asha".into(),
                email: "asha@example.com".into(),
                phone: "555-0100".into(),
                is_business: false,
            },
            token: "tok-1".into(),
        })?;
    }

    let config = GatewayConfig {
        base_url: format!("http://{addr}/api"),
        ..Default::default()
    };
    let front = Storefront::with_database(&config, Database::open_at(&db_path)?)?;

    assert!(front.is_authenticated()?);
    assert_eq!(front.current_user()?.unwrap().email, "asha@example.com");
    assert!(requests(&stub).is_empty());
    Ok(())
}

#[tokio::test]
async fn profile_update_merges_and_repersists_with_token() -> Result<()> {
    let h = harness().await?;
    h.front.login("asha@example.com", "pw").await?;

    let merged = h
        .front
        .update_profile(grocer_shared::ProfileUpdate {
            phone: Some("555-0199".into()),
            ..Default::default()
        })
        .await?;

    assert_eq!(merged.phone, "555-0199");
    assert_eq!(merged.name, "Asha");

    let db = Database::open_at(&h.db_path)?;
    let stored = db.load_session()?.expect("session persisted");
    assert_eq!(stored.user.phone, "555-0199");
    assert_eq!(stored.user.name, "Asha");
    assert_eq!(stored.token, "tok-1");
    Ok(())
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn place_order_happy_path_empties_cart() -> Result<()> {
    let h = harness().await?;
    h.front.login("asha@example.com", "pw").await?;
    h.front.add_to_cart(product("p-milk"), 0, 2).await?;

    let address = h.front.addresses().await?.remove(0);
    let placed = h
        .front
        .place_order(&PlaceOrder::once(address.id, PaymentMethod::Cod))
        .await?;

    assert_eq!(placed.id.0, "order-1");
    assert!(h.front.cart()?.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn checkout_preconditions_block_the_network() -> Result<()> {
    let h = harness().await?;
    h.front.login("asha@example.com", "pw").await?;

    // Empty cart.
    let err = h
        .front
        .place_order(&PlaceOrder::once(AddressId("addr-1".into()), PaymentMethod::Cod))
        .await
        .expect_err("cart is empty");
    assert!(matches!(err, ClientError::EmptyCart));

    h.front.add_to_cart(product("p-milk"), 0, 1).await?;
    let wire_before = requests(&h.stub).len();

    // Missing address.
    let err = h
        .front
        .place_order(&PlaceOrder::once(AddressId("".into()), PaymentMethod::Cod))
        .await
        .expect_err("no address");
    assert!(matches!(err, ClientError::MissingAddress));

    // Incoherent recurring schedule.
    let start = chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let err = h
        .front
        .place_order(&PlaceOrder::recurring(
            AddressId("addr-1".into()),
            PaymentMethod::Cod,
            RecurringDetails {
                delivery_days: vec![DeliveryDay::Monday],
                start_date: start,
                end_date: start,
            },
        ))
        .await
        .expect_err("end date not after start");
    assert!(matches!(err, ClientError::EndBeforeStart));

    assert_eq!(requests(&h.stub).len(), wire_before);
    Ok(())
}

// ---------------------------------------------------------------------------
// Guest-to-signed-in flow, end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn guest_addition_is_visible_after_sign_in() -> Result<()> {
    let h = harness().await?;

    // Guest adds milk; the cart stays empty and the shopper is routed to
    // sign-in.
    let outcome = h.front.add_to_cart(product("p-milk"), 0, 2).await?;
    assert_eq!(outcome, AddToCart::DeferredForLogin);
    assert!(h.front.cart()?.items.is_empty());

    // After signing in, the queued addition was replayed and the fetched
    // cart shows one line, quantity 2, at the server-reported total.
    h.front.login("asha@example.com", "pw").await?;
    let cart = h.front.cart()?;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].product_id, product("p-milk"));
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.total, Decimal::from(60));
    Ok(())
}
