pub mod intent;
pub mod query;
pub mod speech;
