//! Errors surfaced at the scripting boundary
//!
//! Only caller mistakes become errors. Host-resource failures (texture
//! not found, allocation refused) leave the resource absent instead and
//! never abort the enclosing operation.

use dfx_core::kind::EffectKind;
use dfx_props::PropertyError;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EffectError {
    /// Model id matches no object, building or vehicle
    #[error("invalid model {0}")]
    InvalidModel(u32),

    /// Effect index past the model's live count
    #[error("invalid effect index {0}")]
    InvalidIndex(u32),

    /// A property bag key failed validation
    #[error(transparent)]
    InvalidProperty(#[from] PropertyError),

    /// Kind cannot be created through the scripting surface
    #[error("effect kind {0} cannot be created")]
    UnsupportedKind(EffectKind),

    /// The model is valid but carries no effect storage
    #[error("no model info for model {0}")]
    ModelInfoUnavailable(u32),
}
