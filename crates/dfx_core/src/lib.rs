//! # dfx_core
//!
//! In-memory representation and lifecycle management of 2D effects
//! (2dfx): the light/particle/roadsign/escalator decorations attached
//! to static world models.
//!
//! - [`record`]: the effect record as a closed sum type over effect kind
//! - [`kind`]: wire enumerations (effect kind, flash mode, texture names)
//! - [`color`]: RGBA color and its two packed encodings
//! - [`engine`]: the host-engine surface, as traits over opaque handles
//! - [`lifecycle`]: shutdown / destroy / deep-clone of records
//! - [`roadsign`]: flag decoding and roadsign visual construction
//!
//! The host renderer is never touched directly; everything goes through
//! [`engine::GfxEngine`], and [`mock::MockEngine`] (feature `mock`)
//! stands in for it under test.

pub mod color;
pub mod engine;
pub mod kind;
pub mod lifecycle;
pub mod record;
pub mod roadsign;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use color::Color;
pub use engine::{AtomicHandle, FrameId, GfxEngine, TextureHandle, TxdScope};
pub use kind::{CoronaFlashType, EffectKind, TextureName};
pub use record::{EffectData, EffectRecord};
