pub mod model;
pub mod remote;
pub mod repo;
pub mod sqlite;

pub use model::*;
pub use remote::{RemoteFavourites, WriteResponse};
pub use repo::*;
pub use sqlite::SqliteRepository;
