pub mod schema;
pub mod sync;
