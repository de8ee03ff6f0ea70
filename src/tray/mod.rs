pub mod item;
pub mod tally;

pub use item::{DetectedItem, UNKNOWN_LABEL};
pub use tally::{Tally, TrayCollection, group_by_label, merge};
