///  To run :
///  cargo r --example client_example
use market_client::MarketClient;
use market_hex::application::market_service::MarketService;
use market_hex::inbound::http::{HttpServer, HttpServerConfig};
use market_repo::{build_repo, seed_repo, SeedData};
use market_types::domain::{Offer, Order, User};
use reqwest::StatusCode;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Start a seeded server on an ephemeral port.
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    let repo = build_repo(None).await?;
    seed_repo(&repo, SeedData::builtin()?).await?;
    let service = MarketService::new(repo);
    let server = HttpServer::new(
        service,
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = MarketClient::new(&addr)?;
    let users = client.list::<User>().await?;
    println!("{} users seeded", users.len());

    let alice = client.get::<User>(1).await?;
    println!("user 1 is {} {}", alice.first_name, alice.last_name);

    println!("{}", client.create::<Order>().await?);
    println!("{}", client.update::<Order>(1).await?);
    println!("{}", client.delete::<Order>(1).await?);

    // Offers may still point at the deleted order.
    println!("{}", client.create::<Offer>().await?);

    match client.get::<Order>(1).await {
        Ok(order) => println!("order 1 still present: {:?}", order),
        Err(err) => {
            if err
                .downcast_ref::<reqwest::Error>()
                .and_then(|e| e.status())
                == Some(StatusCode::NOT_FOUND)
            {
                println!("order 1 is gone (404)");
            } else {
                return Err(err);
            }
        }
    }

    handle.abort();
    Ok(())
}
