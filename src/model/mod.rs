pub mod common;
pub mod group;
pub mod notification;
pub mod product;
pub mod selection;

pub use common::*;
pub use group::*;
pub use notification::*;
pub use product::*;
pub use selection::*;
