//! In-memory view host
//!
//! Keeps every view the widget creates in a slot map and records the last
//! value written for each property. Used by the test suites and by the
//! headless simulator; it performs no layout and draws nothing.

use slotmap::SlotMap;

use crate::color::Color;
use crate::types::{FabSize, Orientation, ViewProperty, Visibility};
use crate::view::{Anchor, ViewHost, ViewId, ViewKind};

/// Recorded state of one view
#[derive(Clone, Debug)]
pub struct ViewNode {
    pub kind: ViewKind,
    pub visibility: Visibility,
    pub size: FabSize,
    pub anchor: Option<Anchor>,
    pub translation_x: f32,
    pub translation_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub alpha: f32,
    pub icon_rotation: f32,
    pub background: Color,
    pub text: Option<String>,
    pub text_color: Color,
    pub text_size: f32,
    pub elevation: f32,
    pub enabled: bool,
}

impl ViewNode {
    fn new(kind: ViewKind) -> Self {
        Self {
            kind,
            visibility: Visibility::Visible,
            size: FabSize::Normal,
            anchor: None,
            translation_x: ViewProperty::TranslationX.initial(),
            translation_y: ViewProperty::TranslationY.initial(),
            scale_x: ViewProperty::ScaleX.initial(),
            scale_y: ViewProperty::ScaleY.initial(),
            alpha: ViewProperty::Alpha.initial(),
            icon_rotation: 0.0,
            background: Color::TRANSPARENT,
            text: None,
            text_color: Color::BLACK,
            text_size: 14.0,
            elevation: 0.0,
            enabled: true,
        }
    }

    fn property_mut(&mut self, property: ViewProperty) -> &mut f32 {
        match property {
            ViewProperty::TranslationX => &mut self.translation_x,
            ViewProperty::TranslationY => &mut self.translation_y,
            ViewProperty::ScaleX => &mut self.scale_x,
            ViewProperty::ScaleY => &mut self.scale_y,
            ViewProperty::Alpha => &mut self.alpha,
        }
    }

    fn property(&self, property: ViewProperty) -> f32 {
        match property {
            ViewProperty::TranslationX => self.translation_x,
            ViewProperty::TranslationY => self.translation_y,
            ViewProperty::ScaleX => self.scale_x,
            ViewProperty::ScaleY => self.scale_y,
            ViewProperty::Alpha => self.alpha,
        }
    }
}

/// A [`ViewHost`] backed by plain memory
pub struct HeadlessHost {
    views: SlotMap<ViewId, ViewNode>,
    children: Vec<ViewId>,
    orientation: Orientation,
    accent: Color,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::with_orientation(Orientation::Portrait)
    }

    pub fn with_orientation(orientation: Orientation) -> Self {
        Self {
            views: SlotMap::with_key(),
            children: Vec::new(),
            orientation,
            accent: Color::from_hex(0x6200EE),
        }
    }

    /// Simulate a device rotation
    pub fn set_device_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn set_theme_accent(&mut self, accent: Color) {
        self.accent = accent;
    }

    pub fn node(&self, view: ViewId) -> Option<&ViewNode> {
        self.views.get(view)
    }

    /// Attached children in insertion order
    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    fn node_mut(&mut self, view: ViewId) -> Option<&mut ViewNode> {
        let node = self.views.get_mut(view);
        if node.is_none() {
            tracing::trace!("HeadlessHost: dropping write to unknown view {:?}", view);
        }
        node
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewHost for HeadlessHost {
    fn create_view(&mut self, kind: ViewKind) -> ViewId {
        self.views.insert(ViewNode::new(kind))
    }

    fn add_child(&mut self, view: ViewId) {
        if !self.views.contains_key(view) {
            tracing::warn!("HeadlessHost: cannot attach unknown view {:?}", view);
            return;
        }
        if !self.children.contains(&view) {
            self.children.push(view);
        }
    }

    fn remove_child(&mut self, view: ViewId) {
        self.children.retain(|child| *child != view);
    }

    fn remove_all_children(&mut self) {
        self.children.clear();
    }

    fn is_attached(&self, view: ViewId) -> bool {
        self.children.contains(&view)
    }

    fn visibility(&self, view: ViewId) -> Visibility {
        self.views
            .get(view)
            .map(|n| n.visibility)
            .unwrap_or(Visibility::Gone)
    }

    fn set_visibility(&mut self, view: ViewId, visibility: Visibility) {
        if let Some(node) = self.node_mut(view) {
            node.visibility = visibility;
        }
    }

    fn property(&self, view: ViewId, property: ViewProperty) -> f32 {
        self.views
            .get(view)
            .map(|n| n.property(property))
            .unwrap_or_else(|| property.initial())
    }

    fn set_property(&mut self, view: ViewId, property: ViewProperty, value: f32) {
        if let Some(node) = self.node_mut(view) {
            *node.property_mut(property) = value;
        }
    }

    fn size(&self, view: ViewId) -> FabSize {
        self.views.get(view).map(|n| n.size).unwrap_or_default()
    }

    fn set_size(&mut self, view: ViewId, size: FabSize) {
        if let Some(node) = self.node_mut(view) {
            node.size = size;
        }
    }

    fn anchor(&self, view: ViewId) -> Option<Anchor> {
        self.views.get(view).and_then(|n| n.anchor)
    }

    fn set_anchor(&mut self, view: ViewId, anchor: Option<Anchor>) {
        if let Some(node) = self.node_mut(view) {
            node.anchor = anchor;
        }
    }

    fn set_icon_rotation(&mut self, view: ViewId, degrees: f32) {
        if let Some(node) = self.node_mut(view) {
            node.icon_rotation = degrees;
        }
    }

    fn icon_rotation(&self, view: ViewId) -> f32 {
        self.views.get(view).map(|n| n.icon_rotation).unwrap_or(0.0)
    }

    fn set_background(&mut self, view: ViewId, color: Color) {
        if let Some(node) = self.node_mut(view) {
            node.background = color;
        }
    }

    fn set_text(&mut self, view: ViewId, text: Option<&str>) {
        if let Some(node) = self.node_mut(view) {
            node.text = text.map(str::to_owned);
        }
    }

    fn set_text_color(&mut self, view: ViewId, color: Color) {
        if let Some(node) = self.node_mut(view) {
            node.text_color = color;
        }
    }

    fn set_text_size(&mut self, view: ViewId, size: f32) {
        if let Some(node) = self.node_mut(view) {
            node.text_size = size;
        }
    }

    fn set_elevation(&mut self, view: ViewId, elevation: f32) {
        if let Some(node) = self.node_mut(view) {
            node.elevation = elevation;
        }
    }

    fn set_enabled(&mut self, view: ViewId, enabled: bool) {
        if let Some(node) = self.node_mut(view) {
            node.enabled = enabled;
        }
    }

    fn is_enabled(&self, view: ViewId) -> bool {
        self.views.get(view).map(|n| n.enabled).unwrap_or(false)
    }

    fn device_orientation(&self) -> Orientation {
        self.orientation
    }

    fn theme_accent(&self) -> Color {
        self.accent
    }
}
