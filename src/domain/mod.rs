//! Domain layer - fee arithmetic, the PriceFeed contract surface and reveal tallying

pub mod fees;
pub mod price_feed;
pub mod tally;

pub use fees::{format_ether, FeeError, FeeSchedule};
pub use price_feed::{find_request_id, PriceFeed};
