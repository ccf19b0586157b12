pub mod repository;

pub use repository::{MarketRepository, RepoError, Repository};
