pub mod blob;
pub mod memory;
pub mod postgres;
pub mod traits;

pub use blob::*;
pub use memory::*;
pub use postgres::*;
pub use traits::*;
