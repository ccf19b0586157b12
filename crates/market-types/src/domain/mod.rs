pub mod entity;
pub mod offer;
pub mod order;
pub mod user;

pub use entity::{Entity, RowId};
pub use offer::{NewOffer, Offer, OfferChanges};
pub use order::{NewOrder, Order, OrderChanges};
pub use user::{NewUser, User, UserChanges};
