//! Plain data carried between the checkout saga and its collaborators.

pub mod address;
pub mod cart;
pub mod order;
pub mod product;

pub use address::*;
pub use cart::*;
pub use order::*;
pub use product::*;
