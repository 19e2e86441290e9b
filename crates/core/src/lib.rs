//! Core business logic for Tienda.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Debt ledger arithmetic: movement application, reversal, history replay
//! - `earnings` - Sales earnings aggregation: per-item profit/loss and window summaries

pub mod earnings;
pub mod ledger;
