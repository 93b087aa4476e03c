//! Built-in rules.

mod diamond;

pub use diamond::{UseDiamondOperator, applicability as diamond_applicability};
