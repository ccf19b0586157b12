use market_hex::application::market_service::MarketService;
use market_hex::inbound::http::{HttpServer, HttpServerConfig};
use market_repo::{build_repo, seed_repo, SeedData};
use market_types::domain::{Entity, Offer, Order, User};
use serde_json::Value;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

async fn start_seeded_server() -> (String, tokio::task::JoinHandle<()>) {
    let port = find_free_port();
    let config = HttpServerConfig {
        port: port.to_string(),
    };

    let repo = build_repo(None).await.expect("build repo");
    seed_repo(&repo, SeedData::builtin().unwrap())
        .await
        .expect("seed repo");
    let service = MarketService::new(repo);
    let server = HttpServer::new(service, config).await.unwrap();

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });

    // Give the server a moment to start.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    (format!("http://127.0.0.1:{}", port), handle)
}

async fn assert_rows_match_seed<E>(client: &reqwest::Client, addr: &str, drafts: Vec<E::Draft>)
where
    E: Entity + PartialEq,
{
    for draft in drafts {
        let id = E::draft_id(&draft).expect("seed rows carry explicit ids");
        let res = client
            .get(format!("{}/{}/{}/", addr, E::COLLECTION, id))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        let fetched: E = res.json().await.unwrap();
        assert_eq!(fetched, E::from_draft(id, draft));
    }
}

#[tokio::test]
async fn seeded_rows_are_served_verbatim() {
    let (addr, handle) = start_seeded_server().await;
    let client = reqwest::Client::new();
    let seed = SeedData::builtin().unwrap();

    let users: Vec<User> = client
        .get(format!("{}/users/", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users.len(), seed.users.len());

    assert_rows_match_seed::<User>(&client, &addr, seed.users).await;
    assert_rows_match_seed::<Order>(&client, &addr, seed.orders).await;
    assert_rows_match_seed::<Offer>(&client, &addr, seed.offers).await;

    handle.abort();
}

#[tokio::test]
async fn users_crud_over_http() {
    let (addr, handle) = start_seeded_server().await;
    let client = reqwest::Client::new();

    let seeded: Vec<User> = client
        .get(format!("{}/users/", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let seeded_count = seeded.len();

    let res = client
        .post(format!("{}/users/create/", addr))
        .body("{\"first_name\":\"Ignored\"}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "new user added");

    let listed: Vec<User> = client
        .get(format!("{}/users/", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), seeded_count + 1);
    let created = listed.last().unwrap().clone();
    assert_eq!(created.first_name, "Test");
    assert_eq!(created.age, 1);

    let res = client
        .put(format!("{}/users/{}/update/", addr, created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "info updated");

    let fetched: User = client
        .get(format!("{}/users/{}/", addr, created.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.first_name, "first_name");
    assert_eq!(fetched.role, "test");

    let res = client
        .delete(format!("{}/users/1/delete/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "user Alice Johnson: removed");

    let res = client
        .get(format!("{}/users/1/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "not found", "id": 1 }));

    handle.abort();
}

#[tokio::test]
async fn mutating_routes_answer_get() {
    let (addr, handle) = start_seeded_server().await;
    let client = reqwest::Client::new();

    let body = client
        .get(format!("{}/orders/create/", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "new order added");

    let body = client
        .get(format!("{}/orders/2/update/", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "info updated");

    let order: Order = client
        .get(format!("{}/orders/2/", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(order.name, "name");
    assert_eq!(order.address, "test");

    let body = client
        .get(format!("{}/orders/2/delete/", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "order 2: removed");

    handle.abort();
}

#[tokio::test]
async fn offers_and_missing_rows() {
    let (addr, handle) = start_seeded_server().await;
    let client = reqwest::Client::new();

    let before: Vec<Offer> = client
        .get(format!("{}/offers/", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    for path in ["offers/999/update/", "offers/999/delete/"] {
        let res = client
            .get(format!("{}/{}", addr, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    }

    let after: Vec<Offer> = client
        .get(format!("{}/offers/", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(before, after);

    let res = client
        .delete(format!("{}/offers/3/delete/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "offer 3: removed");

    let res = client
        .get(format!("{}/offers/abc/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    let health: Value = client
        .get(format!("{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    handle.abort();
}
