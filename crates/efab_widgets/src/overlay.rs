//! Overlay widget
//!
//! A dimming scrim shown behind the opened widget. Clicking it closes the
//! widget.

use efab_animation::{Animation, PropertyAnimation};
use efab_core::error::non_negative;
use efab_core::{
    Color, EfabError, Orientation, Result, ViewHost, ViewId, ViewKind, ViewProperty, Visibility,
};
use serde::{Deserialize, Serialize};

use crate::click::{Callback, ClickListener, DefaultBehavior};

/// Overlay configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Scrim color
    pub color: Color,
    /// Alpha reached when fully opened
    pub opacity: f32,
    /// Fade-in duration
    pub opening_duration_ms: u64,
    /// Fade-out duration
    pub closing_duration_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 0.78431,
            opening_duration_ms: 300,
            closing_duration_ms: 300,
        }
    }
}

impl OverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scrim color
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the opened alpha
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set both fade durations
    pub fn durations_ms(mut self, opening: u64, closing: u64) -> Self {
        self.opening_duration_ms = opening;
        self.closing_duration_ms = closing;
        self
    }

    pub fn validate(&self) -> Result<()> {
        non_negative("overlay opacity", self.opacity as f64)
    }
}

/// Dimming scrim for one orientation
#[derive(Debug)]
pub struct Overlay {
    view: ViewId,
    orientation: Orientation,
    config: OverlayConfig,
    on_click: Callback<dyn Fn()>,
    default_behavior: Callback<dyn Fn()>,
}

impl Overlay {
    /// Create the overlay view, hidden
    pub fn new<H: ViewHost + ?Sized>(
        host: &mut H,
        orientation: Orientation,
        config: OverlayConfig,
    ) -> Result<Self> {
        config.validate()?;
        let view = host.create_view(ViewKind::Overlay);
        host.set_visibility(view, Visibility::Gone);
        host.set_background(view, config.color);

        Ok(Self {
            view,
            orientation,
            config,
            on_click: Callback::none(),
            default_behavior: Callback::none(),
        })
    }

    pub fn view_id(&self) -> ViewId {
        self.view
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Replace the configuration; an invalid one leaves the current one intact
    pub fn set_config<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        config: OverlayConfig,
    ) -> Result<()> {
        config.validate()?;
        host.set_background(self.view, config.color);
        self.config = config;
        Ok(())
    }

    /// Register the client callback, run after the default behavior
    pub fn set_on_click(&mut self, listener: Option<ClickListener>) {
        self.on_click.set(listener);
    }

    pub(crate) fn set_default_behavior(&mut self, behavior: Option<DefaultBehavior>) {
        self.default_behavior.set(behavior);
    }

    /// Run the click behavior
    ///
    /// Fails with [`EfabError::Configuration`] until the overlay has been
    /// added to a layout.
    pub fn click(&self) -> Result<()> {
        let behavior = self
            .default_behavior
            .get()
            .ok_or_else(|| EfabError::not_attached("Overlay"))?;
        behavior();
        if let Some(listener) = self.on_click.get() {
            listener();
        }
        Ok(())
    }

    /// Fade in to the configured opacity
    ///
    /// `duration_override_ms` takes precedence over the configured duration.
    pub fn opening_animation<H: ViewHost + ?Sized>(
        &self,
        host: &mut H,
        duration_override_ms: Option<u64>,
    ) -> Animation {
        host.set_property(self.view, ViewProperty::Alpha, 0.0);
        host.set_visibility(self.view, Visibility::Visible);

        PropertyAnimation::between(self.view, ViewProperty::Alpha, 0.0, self.config.opacity)
            .duration_ms(duration_override_ms.unwrap_or(self.config.opening_duration_ms))
            .into()
    }

    /// Fade out, then hide
    pub fn closing_animation(&self, duration_override_ms: Option<u64>) -> Animation {
        Animation::from(
            PropertyAnimation::new(self.view, ViewProperty::Alpha, 0.0)
                .duration_ms(duration_override_ms.unwrap_or(self.config.closing_duration_ms)),
        )
        .then_hide(self.view)
    }
}
