//! efab Core
//!
//! Shared vocabulary for the expandable floating action button widget.
//!
//! # Features
//!
//! - **View Host Contract**: [`ViewHost`] is the narrow interface the widget
//!   consumes from the surrounding UI framework (views, visibility, anchors,
//!   animatable properties)
//! - **Headless Host**: [`HeadlessHost`] keeps a view tree in memory for tests
//!   and simulation
//! - **Widget Vocabulary**: orientations, sizes, positions and gravity
//! - **Errors**: fail-fast configuration errors shared by every component

pub mod color;
pub mod error;
pub mod headless;
pub mod types;
pub mod view;

pub use color::Color;
pub use error::{EfabError, Result};
pub use headless::{HeadlessHost, ViewNode};
pub use types::{
    FabOptionPosition, FabSize, Gravity, LabelPosition, Orientation, ViewProperty, Visibility,
};
pub use view::{Anchor, ViewHost, ViewId, ViewKind};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::error::{EfabError, Result};
    pub use crate::headless::HeadlessHost;
    pub use crate::types::{
        FabOptionPosition, FabSize, Gravity, LabelPosition, Orientation, ViewProperty, Visibility,
    };
    pub use crate::view::{Anchor, ViewHost, ViewId, ViewKind};
}
