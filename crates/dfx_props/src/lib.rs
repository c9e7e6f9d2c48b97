//! Property layer for 2D effects
//!
//! Connects string-keyed, dynamically typed property bags to the typed
//! effect records of `dfx_core`:
//!
//! - [`value`]: the [`Value`] variants bags carry and the [`PropertyBag`]
//!   map itself
//! - [`property`]: the [`EffectProperty`] identifiers keys resolve to,
//!   and which kinds each one applies to
//! - [`validate`]: whole-bag validation ahead of effect creation
//! - [`marshal`]: moving values into and out of records, including the
//!   engine-mediated texture properties

pub mod marshal;
pub mod property;
pub mod validate;
pub mod value;

pub use marshal::{apply_all, apply_one, read_all, read_one};
pub use property::{EffectProperty, ALL_PROPERTIES};
pub use validate::validate;
pub use value::{PropertyBag, Value};

use thiserror::Error;

/// Property-level failure
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PropertyError {
    /// Key missing, wrong value variant, or out of range
    #[error("invalid \"{key}\" value")]
    InvalidValue { key: &'static str },
}
