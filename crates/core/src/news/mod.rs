pub mod feed;
pub mod provider;
pub mod sectors;
pub mod types;
