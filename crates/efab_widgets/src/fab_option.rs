//! FabOption widget
//!
//! A secondary action button revealed when the main button opens. Options
//! are stacked above or below the main button; their size and spacing come
//! from the main button's configuration and are passed in when the opening
//! animation is built.
//!
//! Only the first option click per open/close cycle reaches its client
//! listener. The layout enforces this through the default behavior it
//! installs.

use efab_animation::{Animation, Easing, PropertyAnimation};
use efab_core::error::non_negative;
use efab_core::{
    Color, EfabError, FabOptionPosition, FabSize, Orientation, Result, ViewHost, ViewId, ViewKind,
    ViewProperty, Visibility,
};
use serde::{Deserialize, Serialize};

use crate::click::{Callback, ClickListener, OptionBehavior};
use crate::label::{Label, LabelConfig};

/// FabOption configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FabOptionConfig {
    /// Button color; `None` uses the host theme accent
    pub color: Option<Color>,
    /// Duration of the pop-in animation
    pub opening_duration_ms: u64,
    /// Duration of the shrink-out animation
    pub closing_duration_ms: u64,
    /// Overshoot tension of the pop-in scale
    pub opening_overshoot_tension: f32,
    /// Label shown beside the option
    pub label: LabelConfig,
}

impl Default for FabOptionConfig {
    fn default() -> Self {
        Self {
            color: None,
            opening_duration_ms: 125,
            closing_duration_ms: 75,
            opening_overshoot_tension: 3.5,
            label: LabelConfig::default(),
        }
    }
}

impl FabOptionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the button color
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the label text
    pub fn label_text(mut self, text: impl Into<String>) -> Self {
        self.label.text = Some(text.into());
        self
    }

    /// Replace the label configuration
    pub fn label(mut self, label: LabelConfig) -> Self {
        self.label = label;
        self
    }

    /// Set both animation durations
    pub fn durations_ms(mut self, opening: u64, closing: u64) -> Self {
        self.opening_duration_ms = opening;
        self.closing_duration_ms = closing;
        self
    }

    /// Set the pop-in overshoot tension
    pub fn opening_overshoot_tension(mut self, tension: f32) -> Self {
        self.opening_overshoot_tension = tension;
        self
    }

    pub fn validate(&self) -> Result<()> {
        non_negative(
            "fab option opening_overshoot_tension",
            self.opening_overshoot_tension as f64,
        )?;
        self.label.validate()
    }
}

/// Stack geometry handed down from the main button
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptionPlacement {
    pub size: FabSize,
    pub position: FabOptionPosition,
    pub first_margin_px: f32,
    pub successive_margin_px: f32,
}

/// One secondary action button
#[derive(Debug)]
pub struct FabOption {
    view: ViewId,
    orientation: Orientation,
    config: FabOptionConfig,
    label: Label,
    enabled: bool,
    on_click: Callback<dyn Fn()>,
    default_behavior: Callback<dyn Fn() -> bool>,
}

impl FabOption {
    /// Create the option and its label, both hidden
    pub fn new<H: ViewHost + ?Sized>(
        host: &mut H,
        orientation: Orientation,
        config: FabOptionConfig,
    ) -> Result<Self> {
        config.validate()?;
        let view = host.create_view(ViewKind::Option);
        host.set_visibility(view, Visibility::Gone);

        let label = Label::new(host, config.label.clone())?;
        label.attach_to(host, view);

        let option = Self {
            view,
            orientation,
            config,
            label,
            enabled: true,
            on_click: Callback::none(),
            default_behavior: Callback::none(),
        };
        option.apply_color(host);
        Ok(option)
    }

    pub fn view_id(&self) -> ViewId {
        self.view
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn config(&self) -> &FabOptionConfig {
        &self.config
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replace the configuration; an invalid one leaves the current one intact
    pub fn set_config<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        config: FabOptionConfig,
    ) -> Result<()> {
        config.validate()?;
        self.label.set_config(host, config.label.clone())?;
        self.config = config;
        self.apply_color(host);
        Ok(())
    }

    fn apply_color<H: ViewHost + ?Sized>(&self, host: &mut H) {
        let color = if self.enabled {
            self.config.color.unwrap_or_else(|| host.theme_accent())
        } else {
            Color::DISABLED
        };
        host.set_background(self.view, color);
    }

    /// Enable or disable the option together with its label
    pub fn set_enabled<H: ViewHost + ?Sized>(&mut self, host: &mut H, enabled: bool) {
        self.enabled = enabled;
        self.apply_color(host);
        host.set_enabled(self.view, enabled);
        self.label.set_enabled(host, enabled);
    }

    /// Register the client callback, run only for the honored click
    pub fn set_on_click(&mut self, listener: Option<ClickListener>) {
        self.on_click.set(listener);
    }

    pub(crate) fn set_default_behavior(&mut self, behavior: Option<OptionBehavior>) {
        self.default_behavior.set(behavior);
    }

    /// Run the click behavior and return whether the client listener fired
    ///
    /// Fails with [`EfabError::Configuration`] until the option has been added
    /// to a layout.
    pub fn click(&self) -> Result<bool> {
        let behavior = self
            .default_behavior
            .get()
            .ok_or_else(|| EfabError::not_attached("FabOption"))?;
        if !behavior() {
            return Ok(false);
        }
        if let Some(listener) = self.on_click.get() {
            listener();
        }
        Ok(true)
    }

    /// Pop in at stack slot `index` together with the label
    pub fn opening_animation<H: ViewHost + ?Sized>(
        &self,
        host: &mut H,
        index: usize,
        placement: OptionPlacement,
    ) -> Animation {
        host.set_property(self.view, ViewProperty::Alpha, 0.0);
        host.set_visibility(self.view, Visibility::Visible);
        if placement.size != FabSize::Custom {
            host.set_size(self.view, placement.size);
        }

        let margin = if index == 0 {
            placement.first_margin_px
        } else {
            placement.successive_margin_px
        };
        let offset = placement.position.direction() * margin;

        let duration = self.config.opening_duration_ms;
        let pop = Easing::Overshoot(self.config.opening_overshoot_tension);

        let button = Animation::together([
            PropertyAnimation::between(self.view, ViewProperty::ScaleX, 0.0, 1.0)
                .duration_ms(duration)
                .easing(pop)
                .into(),
            PropertyAnimation::between(self.view, ViewProperty::ScaleY, 0.0, 1.0)
                .duration_ms(duration)
                .easing(pop)
                .into(),
            PropertyAnimation::between(self.view, ViewProperty::Alpha, 0.0, 1.0)
                .duration_ms(duration)
                .into(),
            PropertyAnimation::new(self.view, ViewProperty::TranslationY, offset)
                .duration_ms(1)
                .into(),
        ]);

        Animation::together([button, self.label.hidden_to_visible_animation(host)])
    }

    /// Shrink out and hide, together with the label
    pub fn closing_animation<H: ViewHost + ?Sized>(&self, host: &H) -> Animation {
        let duration = self.config.closing_duration_ms;
        let button = Animation::together([
            PropertyAnimation::new(self.view, ViewProperty::ScaleX, 0.0)
                .duration_ms(duration)
                .into(),
            PropertyAnimation::new(self.view, ViewProperty::ScaleY, 0.0)
                .duration_ms(duration)
                .into(),
            PropertyAnimation::new(self.view, ViewProperty::Alpha, 0.0)
                .duration_ms(duration)
                .into(),
        ])
        .then_hide(self.view);

        Animation::together([button, self.label.visible_to_hidden_animation(host)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use efab_animation::AnimationEngine;
    use efab_core::HeadlessHost;
    use std::cell::Cell;
    use std::rc::Rc;

    fn placement(position: FabOptionPosition) -> OptionPlacement {
        OptionPlacement {
            size: FabSize::Mini,
            position,
            first_margin_px: 80.0,
            successive_margin_px: 75.0,
        }
    }

    #[test]
    fn test_opening_offsets_by_slot() {
        let mut host = HeadlessHost::new();
        let option =
            FabOption::new(&mut host, Orientation::Portrait, FabOptionConfig::new()).unwrap();
        let mut engine = AnimationEngine::new();

        engine.start(&option.opening_animation(&mut host, 0, placement(FabOptionPosition::Above)));
        engine.tick(125.0, &mut host);

        let node = host.node(option.view_id()).unwrap();
        assert_eq!(node.visibility, Visibility::Visible);
        assert_eq!(node.size, FabSize::Mini);
        assert_eq!(node.translation_y, -80.0);
        assert_eq!(node.scale_x, 1.0);
        assert_eq!(node.alpha, 1.0);

        engine.start(&option.opening_animation(&mut host, 2, placement(FabOptionPosition::Below)));
        engine.tick(125.0, &mut host);
        assert_eq!(host.property(option.view_id(), ViewProperty::TranslationY), 75.0);
    }

    #[test]
    fn test_custom_size_is_left_alone() {
        let mut host = HeadlessHost::new();
        let option =
            FabOption::new(&mut host, Orientation::Portrait, FabOptionConfig::new()).unwrap();
        host.set_size(option.view_id(), FabSize::Auto);

        let mut custom = placement(FabOptionPosition::Above);
        custom.size = FabSize::Custom;
        option.opening_animation(&mut host, 0, custom);
        assert_eq!(host.size(option.view_id()), FabSize::Auto);
    }

    #[test]
    fn test_opening_includes_label() {
        let mut host = HeadlessHost::new();
        let config = FabOptionConfig::new().label_text("Share");
        let option = FabOption::new(&mut host, Orientation::Portrait, config).unwrap();

        let anim = option.opening_animation(&mut host, 0, placement(FabOptionPosition::Above));
        assert_eq!(anim.duration_ms(), 250);
        assert_eq!(
            host.visibility(option.label().view_id()),
            Visibility::Visible
        );
    }

    #[test]
    fn test_closing_hides_option() {
        let mut host = HeadlessHost::new();
        let option =
            FabOption::new(&mut host, Orientation::Portrait, FabOptionConfig::new()).unwrap();
        let mut engine = AnimationEngine::new();

        engine.start(&option.opening_animation(&mut host, 0, placement(FabOptionPosition::Above)));
        engine.tick(125.0, &mut host);
        engine.start(&option.closing_animation(&host));
        engine.tick(75.0, &mut host);

        let node = host.node(option.view_id()).unwrap();
        assert_eq!(node.visibility, Visibility::Gone);
        assert_eq!(node.scale_y, 0.0);
    }

    #[test]
    fn test_click_gated_by_default_behavior() {
        let mut host = HeadlessHost::new();
        let mut option =
            FabOption::new(&mut host, Orientation::Portrait, FabOptionConfig::new()).unwrap();
        assert!(matches!(option.click(), Err(EfabError::Configuration(_))));

        let fired = Rc::new(Cell::new(0));
        let count = Rc::clone(&fired);
        option.set_on_click(Some(Rc::new(move || count.set(count.get() + 1))));

        let allow = Rc::new(Cell::new(true));
        let gate = Rc::clone(&allow);
        option.set_default_behavior(Some(Rc::new(move || gate.replace(false))));

        assert!(option.click().unwrap());
        assert!(!option.click().unwrap());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_disable_cascades_to_label() {
        let mut host = HeadlessHost::new();
        let config = FabOptionConfig::new()
            .color(Color::BLACK)
            .label_text("Share");
        let mut option = FabOption::new(&mut host, Orientation::Portrait, config).unwrap();

        option.set_enabled(&mut host, false);
        assert_eq!(host.node(option.view_id()).unwrap().background, Color::DISABLED);
        assert!(!option.label().is_enabled());

        option.set_enabled(&mut host, true);
        assert_eq!(host.node(option.view_id()).unwrap().background, Color::BLACK);
        assert!(option.label().is_enabled());
    }

    #[test]
    fn test_default_color_is_theme_accent() {
        let mut host = HeadlessHost::new();
        host.set_theme_accent(Color::WHITE);
        let option =
            FabOption::new(&mut host, Orientation::Portrait, FabOptionConfig::new()).unwrap();
        assert_eq!(host.node(option.view_id()).unwrap().background, Color::WHITE);
    }
}
