//! Umbrella crate that re-exports the `skirmish-*` building blocks.
//!
//! This crate is intended as a convenient entrypoint for hosts embedding the
//! combat-AI core.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use skirmish_core as core;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use skirmish_bt as bt;

#[cfg(feature = "nav")]
#[cfg_attr(docsrs, doc(cfg(feature = "nav")))]
pub use skirmish_nav as nav;

#[cfg(feature = "sense")]
#[cfg_attr(docsrs, doc(cfg(feature = "sense")))]
pub use skirmish_sense as sense;

#[cfg(feature = "agent")]
#[cfg_attr(docsrs, doc(cfg(feature = "agent")))]
pub use skirmish_agent as agent;
