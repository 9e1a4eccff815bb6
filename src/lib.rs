//! Posterly is the composition engine behind a poster-creation tool.
//!
//! It turns a poster's abstract element graph (role-tagged text blocks,
//! logos, a chosen background) plus an aspect ratio into a structured,
//! serializable [`StyleSheet`], and merges natural-language-driven style
//! patches onto it with undo support.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `AspectRatio -> GeometryParams` (orientation, padding,
//!    font scale)
//! 2. **Derive**: `PosterData + GeometryParams -> StyleSheet` (pure,
//!    deterministic)
//! 3. **Patch** (on demand): a style advisor's response is merged onto the
//!    current sheet, snapshotting the previous one for undo
//!
//! [`PosterSession`] owns the mutable state and enforces the lifecycle:
//! any change to assets, background or geometry rederives the sheet and
//! drops the patch history, since old patches target a stale snapshot.
//!
//! Everything here is synchronous and allocation-only; the engine performs
//! no IO. The collaborators that generate background images and patch
//! suggestions live behind the traits in [`collaborator`].
#![forbid(unsafe_code)]

pub mod collaborator;
pub mod derive;
pub mod error;
pub mod geometry;
pub mod model;
pub mod patch;
pub mod session;
pub mod style;

pub use collaborator::{
    BackgroundGenerator, ImageBrief, PatchModification, PatchRequest, PatchResponse, StyleAdvisor,
    background_candidates, request_restyle,
};
pub use derive::{FontTier, FontTierTable, derive, derive_with_tiers};
pub use error::{PosterError, PosterResult};
pub use geometry::{AspectRatio, GeometryParams, resolve};
pub use model::{Asset, AssetKind, AssetRole, BackgroundOption, EventDetails, PosterData};
pub use patch::{StylePatch, apply_patch, parse_declarations};
pub use session::{PosterSession, SessionState};
pub use style::{AssetRule, ContainerGroup, StyleMap, StyleSheet};
