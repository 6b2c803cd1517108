//! Row structs mapped from the database schema.

pub mod order;
pub mod product;
pub mod quote;
pub mod store;
