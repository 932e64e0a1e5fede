//! # KICAI Core
//!
//! Domain types, traits, and error definitions for the KICAI design
//! assistant. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The external seams (language-model inference, the pricing tool protocol)
//! are defined as traits here. Implementations live in their respective
//! crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod design;
pub mod error;
pub mod inference;
pub mod mode;
pub mod pricing;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use design::{BoardStats, ComponentEntry, DesignSnapshot};
pub use error::{InferenceError, PricingError};
pub use inference::{InferenceProvider, InferenceRequest, InferenceResponse};
pub use mode::{AnalysisContext, InteractionMode, Language, ModeConfig};
pub use pricing::{Offer, PricingQuery, PricingResult, PricingSource};
pub use turn::{Role, Turn};
