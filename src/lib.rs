//! Texas Hold'em 7-card hand evaluator and equity engine.
//!
//! The hot path is [`fast_evaluator::evaluate7`], backed by two lazily-built
//! perfect-hash tables ([`tables`]). Everything under [`equity`] is a thin
//! loop over that evaluator. [`base_evaluator`], [`seed_tables`], and
//! [`table_builder`] exist only to construct those tables at startup and are
//! never on the hot path.

pub mod base_evaluator;
pub mod card_encoding;
pub mod cards;
pub mod encoding;
pub mod equity;
pub mod error;
pub mod fast_evaluator;
pub mod seed_tables;
pub mod table_builder;
pub mod tables;

pub use error::{GtoError, GtoResult};
pub use fast_evaluator::evaluate7;
