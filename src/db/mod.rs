pub mod load;
pub mod migrate;

pub use load::export_world;
pub use migrate::migrate;
