// SPDX-License-Identifier: MPL-2.0
//! `goru_frame` places a profile photo inside a circular frame template,
//! lets the user drag and zoom it within strict bounds, and exports the
//! composed frame as a PNG.
//!
//! The viewport math lives in [`ui::state`], the composition model and
//! rendering in [`media`], and the Iced application in [`app`].

pub mod app;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod media;
pub mod ui;

#[cfg(test)]
mod test_utils;
