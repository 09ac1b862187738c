pub mod api;
pub mod flowers;
