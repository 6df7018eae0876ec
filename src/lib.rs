//! Depthrace - order-book execution simulation and detection-race statistics.
//!
//! This crate answers two questions about a prediction-market monitoring
//! backend:
//!
//! - What would it cost to buy into a binary outcome with a given budget,
//!   walking the ask ladder level by level?
//! - Which detection source tends to observe an event first, and by how much?
//!
//! # Modules
//!
//! - [`domain`] - Pure calculations: books, the execution simulator, races and
//!   per-source statistics, price history
//! - [`adapter`] - JSON snapshot parsing and the command-line front end
//! - [`infrastructure`] - Configuration loading and logging setup
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use depthrace::domain::{simulate, PriceLevel};
//! use rust_decimal_macros::dec;
//!
//! let asks = [
//!     PriceLevel::new(dec!(0.40), dec!(100)),
//!     PriceLevel::new(dec!(0.50), dec!(200)),
//! ];
//! let outcome = simulate(&asks, dec!(80)).unwrap();
//! assert_eq!(outcome.shares_acquired(), dec!(180));
//! ```

pub mod adapter;
pub mod domain;
pub mod error;
pub mod infrastructure;
