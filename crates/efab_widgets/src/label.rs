//! Label widget
//!
//! A small text badge anchored beside an [`ExpandableFab`](crate::ExpandableFab)
//! or a [`FabOption`](crate::FabOption). The label owns its own slide-and-fade
//! animations; its owner composes them into the layout's animation group.
//!
//! A label without text never shows and contributes empty animations, so
//! owners can compose it unconditionally.

use efab_animation::{Animation, Easing, PropertyAnimation};
use efab_core::error::non_negative;
use efab_core::{
    Anchor, Color, LabelPosition, Result, ViewHost, ViewId, ViewKind, ViewProperty, Visibility,
};
use serde::{Deserialize, Serialize};

/// Label configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Text to display; `None` keeps the label out of layout and animation
    pub text: Option<String>,
    /// Text color
    pub text_color: Color,
    /// Text size in pixels
    pub text_size: f32,
    /// Background color
    pub background_color: Color,
    /// Elevation in pixels
    pub elevation: f32,
    /// Side of the owner the label sits on
    pub position: LabelPosition,
    /// Resting distance from the owner, in pixels
    pub margin_px: f32,
    /// Extra horizontal travel while showing or hiding, in pixels
    pub translation_x_px: f32,
    /// Duration of the hidden to visible animation
    pub hidden_to_visible_duration_ms: u64,
    /// Duration of the visible to hidden animation
    pub visible_to_hidden_duration_ms: u64,
    /// Overshoot tension of the hidden to visible slide
    pub overshoot_tension: f32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            text: None,
            text_color: Color::WHITE,
            text_size: 14.0,
            background_color: Color::LABEL_BACKGROUND,
            elevation: 4.0,
            position: LabelPosition::Left,
            margin_px: 50.0,
            translation_x_px: 100.0,
            hidden_to_visible_duration_ms: 250,
            visible_to_hidden_duration_ms: 75,
            overshoot_tension: 3.5,
        }
    }
}

impl LabelConfig {
    /// Defaults for a label owned by a `FabOption`
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for a label owned by the main button
    pub fn for_main_button() -> Self {
        Self {
            visible_to_hidden_duration_ms: 125,
            ..Self::default()
        }
    }

    /// Set the text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the text color
    pub fn text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Set the background color
    pub fn background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the elevation
    pub fn elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation;
        self
    }

    /// Set the side of the owner
    pub fn position(mut self, position: LabelPosition) -> Self {
        self.position = position;
        self
    }

    /// Set the resting margin
    pub fn margin_px(mut self, margin: f32) -> Self {
        self.margin_px = margin;
        self
    }

    /// Set the show/hide travel distance
    pub fn translation_x_px(mut self, translation: f32) -> Self {
        self.translation_x_px = translation;
        self
    }

    /// Set both animation durations
    pub fn durations_ms(mut self, hidden_to_visible: u64, visible_to_hidden: u64) -> Self {
        self.hidden_to_visible_duration_ms = hidden_to_visible;
        self.visible_to_hidden_duration_ms = visible_to_hidden;
        self
    }

    /// Set the overshoot tension
    pub fn overshoot_tension(mut self, tension: f32) -> Self {
        self.overshoot_tension = tension;
        self
    }

    /// Reject negative sizes, margins and tensions
    pub fn validate(&self) -> Result<()> {
        non_negative("label text_size", self.text_size as f64)?;
        non_negative("label elevation", self.elevation as f64)?;
        non_negative("label margin_px", self.margin_px as f64)?;
        non_negative("label overshoot_tension", self.overshoot_tension as f64)?;
        Ok(())
    }

    /// Signed resting offset from the owner
    fn rest_offset(&self) -> f32 {
        self.position.direction() * self.margin_px
    }
}

/// A text badge attached to one owner view
#[derive(Debug)]
pub struct Label {
    view: ViewId,
    config: LabelConfig,
    enabled: bool,
}

impl Label {
    /// Create the label view, hidden until its owner shows it
    pub fn new<H: ViewHost + ?Sized>(host: &mut H, config: LabelConfig) -> Result<Self> {
        config.validate()?;
        let view = host.create_view(ViewKind::Label);
        host.set_visibility(view, Visibility::Gone);

        let label = Self {
            view,
            config,
            enabled: true,
        };
        label.apply_style(host);
        Ok(label)
    }

    pub fn view_id(&self) -> ViewId {
        self.view
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    pub fn text(&self) -> Option<&str> {
        self.config.text.as_deref()
    }

    pub fn has_text(&self) -> bool {
        self.config.text.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replace the configuration; an invalid one leaves the current one intact
    pub fn set_config<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        config: LabelConfig,
    ) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.apply_style(host);
        if !self.has_text() {
            host.set_visibility(self.view, Visibility::Gone);
        }
        Ok(())
    }

    fn apply_style<H: ViewHost + ?Sized>(&self, host: &mut H) {
        host.set_text(self.view, self.config.text.as_deref());
        host.set_text_size(self.view, self.config.text_size);
        host.set_elevation(self.view, self.config.elevation);
        if self.enabled {
            host.set_background(self.view, self.config.background_color);
            host.set_text_color(self.view, self.config.text_color);
        } else {
            host.set_background(self.view, Color::DISABLED);
            host.set_text_color(self.view, Color::DISABLED_TEXT);
        }
    }

    /// Tint with the disabled palette, or restore the configured colors
    pub fn set_enabled<H: ViewHost + ?Sized>(&mut self, host: &mut H, enabled: bool) {
        self.enabled = enabled;
        self.apply_style(host);
        host.set_enabled(self.view, enabled);
    }

    /// Anchor the label to its owner
    pub fn attach_to<H: ViewHost + ?Sized>(&self, host: &mut H, owner: ViewId) {
        host.set_anchor(
            self.view,
            Some(Anchor::new(owner, self.config.position.gravity())),
        );
    }

    /// Recompute the anchor gravity from the configured position
    pub fn reposition<H: ViewHost + ?Sized>(&self, host: &mut H) {
        if let Some(anchor) = host.anchor(self.view) {
            host.set_anchor(
                self.view,
                Some(Anchor::new(anchor.view, self.config.position.gravity())),
            );
        }
    }

    /// Show at the resting offset without animating
    pub fn show<H: ViewHost + ?Sized>(&self, host: &mut H) {
        if !self.has_text() {
            return;
        }
        self.reposition(host);
        host.set_visibility(self.view, Visibility::Visible);
        host.set_property(
            self.view,
            ViewProperty::TranslationX,
            self.config.rest_offset(),
        );
    }

    pub fn hide<H: ViewHost + ?Sized>(&self, host: &mut H) {
        host.set_visibility(self.view, Visibility::Gone);
    }

    /// Slide in from beyond the resting offset while fading in
    ///
    /// Makes the label visible (at zero alpha) immediately.
    pub fn hidden_to_visible_animation<H: ViewHost + ?Sized>(&self, host: &mut H) -> Animation {
        if !self.has_text() {
            return Animation::empty();
        }

        self.reposition(host);
        host.set_property(self.view, ViewProperty::Alpha, 0.0);
        host.set_visibility(self.view, Visibility::Visible);

        let end = self.config.rest_offset();
        let start = end + self.config.translation_x_px;
        let duration = self.config.hidden_to_visible_duration_ms;

        Animation::together([
            PropertyAnimation::between(self.view, ViewProperty::TranslationX, start, end)
                .duration_ms(duration)
                .easing(Easing::Overshoot(self.config.overshoot_tension))
                .into(),
            PropertyAnimation::between(self.view, ViewProperty::Alpha, 0.0, 1.0)
                .duration_ms(duration)
                .into(),
        ])
    }

    /// Slide further out while fading, then hide
    pub fn visible_to_hidden_animation<H: ViewHost + ?Sized>(&self, host: &H) -> Animation {
        if !self.has_text() {
            return Animation::empty();
        }

        let current = host.property(self.view, ViewProperty::TranslationX);
        let duration = self.config.visible_to_hidden_duration_ms;

        Animation::together([
            PropertyAnimation::between(
                self.view,
                ViewProperty::TranslationX,
                current,
                current + self.config.translation_x_px,
            )
            .duration_ms(duration)
            .into(),
            PropertyAnimation::new(self.view, ViewProperty::Alpha, 0.0)
                .duration_ms(duration)
                .into(),
        ])
        .then_hide(self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use efab_animation::AnimationEngine;
    use efab_core::{EfabError, Gravity, HeadlessHost};

    fn labelled(host: &mut HeadlessHost, config: LabelConfig) -> (ViewId, Label) {
        let owner = host.create_view(ViewKind::Option);
        let label = Label::new(host, config).unwrap();
        label.attach_to(host, owner);
        (owner, label)
    }

    #[test]
    fn test_label_without_text_is_inert() {
        let mut host = HeadlessHost::new();
        let (_, label) = labelled(&mut host, LabelConfig::new());

        assert!(label.hidden_to_visible_animation(&mut host).is_empty());
        assert!(label.visible_to_hidden_animation(&host).is_empty());

        label.show(&mut host);
        assert_eq!(host.visibility(label.view_id()), Visibility::Gone);
    }

    #[test]
    fn test_show_rests_at_margin() {
        let mut host = HeadlessHost::new();
        let (owner, label) = labelled(&mut host, LabelConfig::new().text("Share"));

        label.show(&mut host);
        let node = host.node(label.view_id()).unwrap();
        assert_eq!(node.visibility, Visibility::Visible);
        assert_eq!(node.translation_x, -50.0);
        assert_eq!(
            node.anchor,
            Some(Anchor::new(owner, Gravity::START | Gravity::CENTER_VERTICAL))
        );
    }

    #[test]
    fn test_hidden_to_visible_slides_to_rest() {
        let mut host = HeadlessHost::new();
        let config = LabelConfig::new()
            .text("Edit")
            .position(LabelPosition::Right);
        let (_, label) = labelled(&mut host, config);
        let mut engine = AnimationEngine::new();

        let anim = label.hidden_to_visible_animation(&mut host);
        assert_eq!(anim.duration_ms(), 250);
        assert_eq!(host.visibility(label.view_id()), Visibility::Visible);
        assert_eq!(host.property(label.view_id(), ViewProperty::Alpha), 0.0);

        let slide = anim
            .tweens()
            .into_iter()
            .find(|t| t.property == ViewProperty::TranslationX)
            .cloned()
            .unwrap();
        assert_eq!(slide.from, Some(150.0));
        assert_eq!(slide.to, 50.0);

        engine.start(&anim);
        engine.tick(250.0, &mut host);
        assert_eq!(host.property(label.view_id(), ViewProperty::TranslationX), 50.0);
        assert_eq!(host.property(label.view_id(), ViewProperty::Alpha), 1.0);
    }

    #[test]
    fn test_visible_to_hidden_hides_on_end() {
        let mut host = HeadlessHost::new();
        let (_, label) = labelled(&mut host, LabelConfig::new().text("Edit"));
        let mut engine = AnimationEngine::new();

        label.show(&mut host);
        engine.start(&label.visible_to_hidden_animation(&host));
        engine.tick(75.0, &mut host);

        let node = host.node(label.view_id()).unwrap();
        assert_eq!(node.visibility, Visibility::Gone);
        assert_eq!(node.translation_x, 50.0);
        assert_eq!(node.alpha, 0.0);
    }

    #[test]
    fn test_disable_tints_and_enable_restores() {
        let mut host = HeadlessHost::new();
        let config = LabelConfig::new()
            .text("Edit")
            .background_color(Color::BLACK);
        let (_, mut label) = labelled(&mut host, config);

        label.set_enabled(&mut host, false);
        let node = host.node(label.view_id()).unwrap();
        assert_eq!(node.background, Color::DISABLED);
        assert_eq!(node.text_color, Color::DISABLED_TEXT);
        assert!(!node.enabled);

        label.set_enabled(&mut host, true);
        let node = host.node(label.view_id()).unwrap();
        assert_eq!(node.background, Color::BLACK);
        assert_eq!(node.text_color, Color::WHITE);
    }

    #[test]
    fn test_invalid_config_keeps_previous() {
        let mut host = HeadlessHost::new();
        let (_, mut label) = labelled(&mut host, LabelConfig::new().text("Edit"));

        let err = label
            .set_config(&mut host, LabelConfig::new().margin_px(-1.0))
            .unwrap_err();
        assert!(matches!(err, EfabError::IllegalArgument { .. }));
        assert_eq!(label.config().margin_px, 50.0);
        assert_eq!(label.text(), Some("Edit"));
    }
}
