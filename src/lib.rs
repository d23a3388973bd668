//! Promotion Engine
//!
//! Prices shopping carts by applying promotions: single-item bulk deals
//! ("3 of A for 130") followed by multi-item bundles ("C + D for 30").
//! A cart line claimed by one promotion is never re-priced by another.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod items;
pub mod orchestrator;
pub mod prelude;
pub mod pricing;
pub mod promotions;
pub mod receipt;
pub mod strategies;
