pub mod colors;
pub mod flower;
pub mod path;

pub use colors::petal_color;
pub use flower::*;
pub use path::{Route, flower_path};
