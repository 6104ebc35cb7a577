pub mod core;
pub mod ops;

pub use self::core::{CollectionApi, WriteOp, WriteSummary};
pub use self::ops::MongoCollection;
