//! Zero-sized repository structs, one per storage concern.

pub mod catalog_repo;
pub mod order_repo;
pub mod product_repo;
pub mod quote_repo;
pub mod store_repo;

pub use catalog_repo::CatalogRepo;
pub use order_repo::OrderRepo;
pub use product_repo::ProductRepo;
pub use quote_repo::QuoteRepo;
pub use store_repo::StoreRepo;
