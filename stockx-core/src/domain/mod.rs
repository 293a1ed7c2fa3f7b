//! Core domain types for a dashboard render pass.

pub mod fundamentals;
pub mod quote;
pub mod range;
pub mod symbol;

pub use fundamentals::Fundamentals;
pub use quote::Quote;
pub use range::{RangeError, RangePreset, TimeRange};
pub use symbol::SymbolSet;
