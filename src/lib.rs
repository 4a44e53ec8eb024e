//! Order Bumps
//!
//! Conditional checkout order bumps: rules deciding which extra-product offers to show for the
//! current cart, and the pricing of the discounted products a shopper accepts.

pub mod bumps;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod conditions;
pub mod config;
pub mod discounts;
pub mod fixtures;
pub mod prelude;
pub mod report;
