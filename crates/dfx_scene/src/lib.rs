//! Scene-level effect management
//!
//! Sits on top of `dfx_core` and `dfx_props`:
//!
//! - [`handle`]: [`EffectHandle`], a record bound to its owning model
//!   with kind-gated typed accessors
//! - [`registry`]: the insertion-ordered set of live handles
//! - [`model`]: the [`ModelInfo`] / [`GameModels`] contracts the host
//!   game fulfils, plus mock implementations for tests
//! - [`api`]: the model-targeted entry points the scripting binding
//!   layer calls
//! - [`error`]: [`EffectError`], the caller-mistake taxonomy

pub mod api;
pub mod error;
pub mod handle;
pub mod model;
pub mod registry;

pub use error::EffectError;
pub use handle::{EffectHandle, EffectId};
pub use model::{GameModels, ModelInfo, SharedEffect};
pub use registry::EffectRegistry;
