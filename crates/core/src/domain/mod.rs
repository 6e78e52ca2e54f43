pub mod contract;
pub mod digest;
pub mod profile;
