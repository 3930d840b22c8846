//! Built-in styling extensions
//!
//! `css` drives the style engine over the tree and emits a stylesheet in the
//! requested format. `utility-classes` maps recognized inline declarations to
//! utility class names and falls back to the engine for everything it cannot
//! express as a class.

mod css;
mod utility;

pub use css::CssStylingExtension;
pub use utility::UtilityClassStylingExtension;
