//! View host contract
//!
//! The widget never owns pixels. Every view it talks about lives in the host
//! framework's view tree and is addressed by a [`ViewId`]. The host implements
//! [`ViewHost`], which is the whole surface the widget consumes: creation,
//! parenting, visibility, size class, anchoring, animatable float properties
//! and a handful of styling setters.
//!
//! All calls happen on the UI thread.

use slotmap::new_key_type;

use crate::color::Color;
use crate::types::{FabSize, Gravity, Orientation, ViewProperty, Visibility};

new_key_type! {
    /// Handle to a view owned by the host
    pub struct ViewId;
}

/// Role of a view, passed to the host when it is created
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Overlay,
    MainButton,
    Option,
    Label,
}

/// Relative positioning of a view against another view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub view: ViewId,
    pub gravity: Gravity,
}

impl Anchor {
    pub fn new(view: ViewId, gravity: Gravity) -> Self {
        Self { view, gravity }
    }
}

/// The host UI framework as seen by the widget
pub trait ViewHost {
    /// Create a detached view and return its unique id
    fn create_view(&mut self, kind: ViewKind) -> ViewId;

    /// Attach a view to the layout
    fn add_child(&mut self, view: ViewId);

    /// Detach a view from the layout
    fn remove_child(&mut self, view: ViewId);

    /// Detach every child of the layout
    fn remove_all_children(&mut self);

    fn is_attached(&self, view: ViewId) -> bool;

    fn visibility(&self, view: ViewId) -> Visibility;

    fn set_visibility(&mut self, view: ViewId, visibility: Visibility);

    fn property(&self, view: ViewId, property: ViewProperty) -> f32;

    fn set_property(&mut self, view: ViewId, property: ViewProperty, value: f32);

    fn size(&self, view: ViewId) -> FabSize;

    fn set_size(&mut self, view: ViewId, size: FabSize);

    fn anchor(&self, view: ViewId) -> Option<Anchor>;

    fn set_anchor(&mut self, view: ViewId, anchor: Option<Anchor>);

    /// Rotate only the icon drawable of a button, leaving the view untouched
    fn set_icon_rotation(&mut self, view: ViewId, degrees: f32);

    fn icon_rotation(&self, view: ViewId) -> f32;

    fn set_background(&mut self, view: ViewId, color: Color);

    fn set_text(&mut self, view: ViewId, text: Option<&str>);

    fn set_text_color(&mut self, view: ViewId, color: Color);

    fn set_text_size(&mut self, view: ViewId, size: f32);

    fn set_elevation(&mut self, view: ViewId, elevation: f32);

    fn set_enabled(&mut self, view: ViewId, enabled: bool);

    fn is_enabled(&self, view: ViewId) -> bool;

    /// Current device orientation
    fn device_orientation(&self) -> Orientation;

    /// Theme accent color, used as the default button color
    fn theme_accent(&self) -> Color;
}
