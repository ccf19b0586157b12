#![cfg(feature = "sqlite")]

use market_repo::sqlite::SqliteRepo;
use market_repo::{seed_repo, SeedData};
use market_types::domain::{Entity, NewOffer, Offer, Order, OrderChanges, User};
use market_types::ports::{RepoError, Repository};
use std::path::PathBuf;

fn temp_db_url() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut path = PathBuf::from(dir.path());
    path.push(format!("market-{}.db", std::process::id()));
    let url = format!("sqlite://{}", path.display());
    (dir, url)
}

#[tokio::test]
async fn sqlite_repo_crud_flow() {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();

    let created = Repository::<Order>::insert(&repo, Order::placeholder_draft())
        .await
        .unwrap();
    assert_eq!(created.id, 1);

    let fetched = Repository::<Order>::get(&repo, created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, created);

    let listed = Repository::<Order>::list(&repo).await.unwrap();
    assert_eq!(listed.len(), 1);

    let updated = Repository::<Order>::update(
        &repo,
        created.id,
        OrderChanges {
            price: Some(7000),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.price, 7000);
    assert_eq!(updated.name, "Test");

    let deleted = Repository::<Order>::delete(&repo, created.id).await.unwrap();
    assert_eq!(deleted.map(|o| o.id), Some(created.id));
    assert!(Repository::<Order>::get(&repo, created.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn sqlite_repo_handles_missing_rows() {
    let (_dir, url) = temp_db_url();
    let repo = SqliteRepo::new(&url).await.unwrap();

    let missing = Repository::<User>::get(&repo, 77).await.unwrap();
    assert!(missing.is_none());

    let updated = Repository::<User>::update(&repo, 77, User::placeholder_changes())
        .await
        .unwrap();
    assert!(updated.is_none());

    let deleted = Repository::<User>::delete(&repo, 77).await.unwrap();
    assert!(deleted.is_none());
}

#[tokio::test]
async fn sqlite_repo_accepts_dangling_foreign_keys() {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let offer = Repository::<Offer>::insert(
        &repo,
        NewOffer {
            id: None,
            order_id: 999,
            executor_id: 998,
        },
    )
    .await
    .unwrap();
    assert_eq!(offer.order_id, 999);
}

#[tokio::test]
async fn sqlite_repo_seeds_and_rejects_duplicate_ids() {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let report = seed_repo(&repo, SeedData::builtin().unwrap()).await.unwrap();
    assert_eq!(report.users, 5);

    let alice = Repository::<User>::get(&repo, 1).await.unwrap().unwrap();
    assert_eq!(alice.first_name, "Alice");

    let err = Repository::<Offer>::insert(
        &repo,
        NewOffer {
            id: Some(1),
            order_id: 1,
            executor_id: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Conflict { table: "offers", id: 1 }));
}

#[tokio::test]
async fn sqlite_repo_lists_in_insertion_order() {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    for id in [5, 2, 9] {
        Repository::<Offer>::insert(
            &repo,
            NewOffer {
                id: Some(id),
                order_id: 1,
                executor_id: 1,
            },
        )
        .await
        .unwrap();
    }
    let assigned = Repository::<Offer>::insert(&repo, Offer::placeholder_draft())
        .await
        .unwrap();
    assert_eq!(assigned.id, 10);

    let ids: Vec<_> = Repository::<Offer>::list(&repo)
        .await
        .unwrap()
        .iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec![5, 2, 9, 10]);
}
