pub mod stats;
pub mod sync;

pub use stats::FavouriteStats;
pub use sync::{FailurePolicy, FavouritesSync, Phase, Toggle, WriteStatus};
