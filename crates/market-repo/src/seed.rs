use anyhow::Context;
use market_types::domain::{NewOffer, NewOrder, NewUser, Offer, Order, User};
use market_types::ports::{RepoError, Repository};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN: &str = include_str!("../seed/marketplace.json");

/// Rows loaded into an empty store at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<NewUser>,
    #[serde(default)]
    pub orders: Vec<NewOrder>,
    #[serde(default)]
    pub offers: Vec<NewOffer>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub orders: usize,
    pub offers: usize,
}

impl SeedData {
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_json(BUILTIN).context("built-in seed data is malformed")
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading seed file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing seed file {}", path.display()))
    }

    /// Built-in set unless a seed file is given.
    pub async fn load(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::from_file(p).await,
            None => Self::builtin(),
        }
    }
}

/// Inserts users, then orders, then offers; stops at the first failure.
pub async fn seed_repo<R>(repo: &R, data: SeedData) -> Result<SeedReport, RepoError>
where
    R: Repository<User> + Repository<Order> + Repository<Offer>,
{
    let mut report = SeedReport::default();
    for draft in data.users {
        <R as Repository<User>>::insert(repo, draft).await?;
        report.users += 1;
    }
    for draft in data.orders {
        <R as Repository<Order>>::insert(repo, draft).await?;
        report.orders += 1;
    }
    for draft in data.offers {
        <R as Repository<Offer>>::insert(repo, draft).await?;
        report.offers += 1;
    }
    tracing::info!(
        users = report.users,
        orders = report.orders,
        offers = report.offers,
        "store seeded"
    );
    Ok(report)
}
