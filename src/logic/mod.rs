pub mod bulk;
pub mod controller;
pub mod errors;
pub mod group_form;
pub mod product_form;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use bulk::*;
pub use controller::*;
pub use errors::*;
pub use group_form::*;
pub use product_form::*;
pub use upload::object_key;
