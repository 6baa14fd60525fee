//! Core business logic for the rewards service.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Admin roles, the request-scoped actor and password hashing
//! - `ledger` - Points ledger: balance fold, reward progress and the policy engine
//! - `directory` - Phone normalization, kiosk keypad, enrollment validation and search terms

pub mod auth;
pub mod directory;
pub mod ledger;
