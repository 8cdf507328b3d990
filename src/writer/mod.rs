pub mod component;
pub mod procedure;
pub mod store;

pub use component::*;
pub use procedure::*;
pub use store::*;
