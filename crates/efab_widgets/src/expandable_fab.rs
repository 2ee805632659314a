//! ExpandableFab widget
//!
//! The main button. Its icon rotation runs on the [`RotationDriver`] rather
//! than the animation engine: only the icon turns, so views anchored to the
//! button never move while it rotates. The label still animates through the
//! engine and is returned to the layout for grouping.
//!
//! Because the two run on separate clocks, the layout waits for the driver's
//! finished signal (delivered through [`ExpandableFab::poll_rotation`]) as
//! well as the group's before committing a state change.

use efab_animation::{
    Animation, DriverClock, DriverEvent, RotationDriver, RotationPhase, RotationPlan,
};
use efab_core::error::{finite, non_negative};
use efab_core::{
    Color, EfabError, FabOptionPosition, FabSize, Orientation, Result, ViewHost, ViewId, ViewKind,
    Visibility,
};
use serde::{Deserialize, Serialize};

use crate::click::{Callback, ClickListener, DefaultBehavior};
use crate::fab_option::OptionPlacement;
use crate::label::{Label, LabelConfig};

/// Pause between the anticipation and the return rotation when closing
pub const ANTICIPATION_PAUSE_MS: u64 = 100;

const ANTICIPATION_EPSILON: f32 = 0.01;

/// ExpandableFab configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandableFabConfig {
    /// Button color; `None` uses the host theme accent
    pub color: Option<Color>,
    /// Size class of the main button
    pub size: FabSize,
    /// Size class applied to every option when opening
    pub fab_option_size: FabSize,
    /// Whether options stack above or below the button
    pub fab_option_position: FabOptionPosition,
    /// Icon angle when open, in degrees
    pub icon_animation_rotation_deg: f32,
    /// Distance between the button and the first option
    pub first_fab_option_margin_px: f32,
    /// Distance between consecutive options
    pub successive_fab_option_margin_px: f32,
    /// Icon rotation time when opening
    pub opening_duration_ms: u64,
    /// Icon rotation time when closing, anticipation included
    pub closing_duration_ms: u64,
    /// Scales the wind-up before the icon rotates back; 0 disables it
    pub closing_anticipate_tension: f32,
    /// Label shown beside the button
    pub label: LabelConfig,
}

impl Default for ExpandableFabConfig {
    fn default() -> Self {
        Self {
            color: None,
            size: FabSize::Normal,
            fab_option_size: FabSize::Mini,
            fab_option_position: FabOptionPosition::Above,
            icon_animation_rotation_deg: -135.0,
            first_fab_option_margin_px: 80.0,
            successive_fab_option_margin_px: 75.0,
            opening_duration_ms: 250,
            closing_duration_ms: 500,
            closing_anticipate_tension: 2.0,
            label: LabelConfig::for_main_button(),
        }
    }
}

impl ExpandableFabConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the button color
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the button size class
    pub fn size(mut self, size: FabSize) -> Self {
        self.size = size;
        self
    }

    /// Set the size class of the options
    pub fn fab_option_size(mut self, size: FabSize) -> Self {
        self.fab_option_size = size;
        self
    }

    /// Stack options above or below the button
    pub fn fab_option_position(mut self, position: FabOptionPosition) -> Self {
        self.fab_option_position = position;
        self
    }

    /// Set the open icon angle
    pub fn icon_animation_rotation_deg(mut self, degrees: f32) -> Self {
        self.icon_animation_rotation_deg = degrees;
        self
    }

    /// Set the distance to the first option
    pub fn first_fab_option_margin_px(mut self, margin: f32) -> Self {
        self.first_fab_option_margin_px = margin;
        self
    }

    /// Set the distance between options
    pub fn successive_fab_option_margin_px(mut self, margin: f32) -> Self {
        self.successive_fab_option_margin_px = margin;
        self
    }

    /// Set both rotation durations
    pub fn durations_ms(mut self, opening: u64, closing: u64) -> Self {
        self.opening_duration_ms = opening;
        self.closing_duration_ms = closing;
        self
    }

    /// Set the closing wind-up tension
    pub fn closing_anticipate_tension(mut self, tension: f32) -> Self {
        self.closing_anticipate_tension = tension;
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

    pub fn validate(&self) -> Result<()> {
        finite(
            "icon_animation_rotation_deg",
            self.icon_animation_rotation_deg as f64,
        )?;
        non_negative(
            "first_fab_option_margin_px",
            self.first_fab_option_margin_px as f64,
        )?;
        non_negative(
            "successive_fab_option_margin_px",
            self.successive_fab_option_margin_px as f64,
        )?;
        non_negative(
            "closing_anticipate_tension",
            self.closing_anticipate_tension as f64,
        )?;
        self.label.validate()
    }

    /// Stack geometry for the options of this button
    pub fn placement(&self) -> OptionPlacement {
        OptionPlacement {
            size: self.fab_option_size,
            position: self.fab_option_position,
            first_margin_px: self.first_fab_option_margin_px,
            successive_margin_px: self.successive_fab_option_margin_px,
        }
    }

    /// Icon rotation played when opening
    pub fn opening_plan(&self) -> RotationPlan {
        RotationPlan::single(RotationPhase::new(
            0.0,
            self.icon_animation_rotation_deg,
            self.opening_duration_ms,
        ))
    }

    /// Icon rotation played when closing
    ///
    /// With a non-zero anticipation the icon first winds further away from
    /// rest over a fifth of the duration, pauses, then returns to 0° over the
    /// remainder. Otherwise it returns directly over the whole duration.
    pub fn closing_plan(&self) -> RotationPlan {
        let open = self.icon_animation_rotation_deg;
        let anticipate = (open / 10.0).abs() * self.closing_anticipate_tension;

        if anticipate.abs() > ANTICIPATION_EPSILON {
            let wound = if open < 0.0 {
                open - anticipate
            } else {
                open + anticipate
            };
            let wind_up_ms = self.closing_duration_ms / 5;
            RotationPlan::new()
                .then(RotationPhase::new(open, wound, wind_up_ms))
                .then(
                    RotationPhase::new(wound, 0.0, self.closing_duration_ms - wind_up_ms)
                        .after(ANTICIPATION_PAUSE_MS),
                )
        } else {
            RotationPlan::single(RotationPhase::new(open, 0.0, self.closing_duration_ms))
        }
    }
}

/// The main button of one orientation
pub struct ExpandableFab {
    view: ViewId,
    orientation: Orientation,
    config: ExpandableFabConfig,
    label: Label,
    enabled: bool,
    driver: RotationDriver,
    on_click: Callback<dyn Fn()>,
    default_behavior: Callback<dyn Fn()>,
}

impl std::fmt::Debug for ExpandableFab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpandableFab")
            .field("view", &self.view)
            .field("orientation", &self.orientation)
            .field("config", &self.config)
            .field("enabled", &self.enabled)
            .field("rotating", &self.driver.is_running())
            .finish()
    }
}

impl ExpandableFab {
    /// Create the button and its label
    ///
    /// The rotation driver starts on the background clock; the layout
    /// switches it to its own clock when the button is added.
    pub fn new<H: ViewHost + ?Sized>(
        host: &mut H,
        orientation: Orientation,
        config: ExpandableFabConfig,
    ) -> Result<Self> {
        config.validate()?;
        let view = host.create_view(ViewKind::MainButton);
        if config.size != FabSize::Custom {
            host.set_size(view, config.size);
        }

        let label = Label::new(host, config.label.clone())?;
        label.attach_to(host, view);

        let fab = Self {
            view,
            orientation,
            config,
            label,
            enabled: true,
            driver: RotationDriver::new(DriverClock::Background),
            on_click: Callback::none(),
            default_behavior: Callback::none(),
        };
        fab.apply_color(host);
        Ok(fab)
    }

    pub fn view_id(&self) -> ViewId {
        self.view
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn config(&self) -> &ExpandableFabConfig {
        &self.config
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True while the icon rotation has not reported completion
    pub fn is_rotating(&self) -> bool {
        self.driver.is_running()
    }

    /// Replace the configuration; an invalid one leaves the current one intact
    pub fn set_config<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        config: ExpandableFabConfig,
    ) -> Result<()> {
        config.validate()?;
        self.label.set_config(host, config.label.clone())?;
        if config.size != FabSize::Custom {
            host.set_size(self.view, config.size);
        }
        self.config = config;
        self.apply_color(host);
        Ok(())
    }

    pub(crate) fn set_driver_clock(&mut self, clock: DriverClock) {
        if self.driver.clock() != clock {
            self.driver = RotationDriver::new(clock);
        }
    }

    fn apply_color<H: ViewHost + ?Sized>(&self, host: &mut H) {
        let color = if self.enabled {
            self.config.color.unwrap_or_else(|| host.theme_accent())
        } else {
            Color::DISABLED
        };
        host.set_background(self.view, color);
    }

    /// Enable or disable the button together with its label
    pub fn set_enabled<H: ViewHost + ?Sized>(&mut self, host: &mut H, enabled: bool) {
        self.enabled = enabled;
        self.apply_color(host);
        host.set_enabled(self.view, enabled);
        self.label.set_enabled(host, enabled);
    }

    /// Show the button and its label
    pub fn show<H: ViewHost + ?Sized>(&self, host: &mut H) {
        host.set_visibility(self.view, Visibility::Visible);
        self.label.show(host);
    }

    /// Hide the button and its label
    pub fn hide<H: ViewHost + ?Sized>(&self, host: &mut H) {
        host.set_visibility(self.view, Visibility::Gone);
        self.label.hide(host);
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
    /// Fails with [`EfabError::Configuration`] until the button has been added
    /// to a layout.
    pub fn click(&self) -> Result<()> {
        let behavior = self
            .default_behavior
            .get()
            .ok_or_else(|| EfabError::not_attached("ExpandableFab"))?;
        behavior();
        if let Some(listener) = self.on_click.get() {
            listener();
        }
        Ok(())
    }

    /// Start the opening icon rotation and return the label's animation
    pub fn opening_animation<H: ViewHost + ?Sized>(&mut self, host: &mut H) -> Animation {
        self.driver.start(self.config.opening_plan());
        self.label.hidden_to_visible_animation(host)
    }

    /// Start the closing icon rotation and return the label's animation
    pub fn closing_animation<H: ViewHost + ?Sized>(&mut self, host: &H) -> Animation {
        self.driver.start(self.config.closing_plan());
        self.label.visible_to_hidden_animation(host)
    }

    /// Apply pending icon rotation steps; returns true when the rotation finished
    pub fn poll_rotation<H: ViewHost + ?Sized>(&mut self, host: &mut H, dt_ms: f32) -> bool {
        let current = self.driver.generation();
        let mut finished = false;
        for event in self.driver.poll(dt_ms) {
            match event {
                DriverEvent::Rotated(degrees) => host.set_icon_rotation(self.view, degrees),
                DriverEvent::Finished(generation) => finished |= generation == current,
            }
        }
        finished
    }

    /// Stop any in-flight icon rotation
    ///
    /// Call when the button leaves the view tree. Dropping the button does
    /// the same.
    pub fn detach(&mut self) {
        if self.driver.is_running() {
            tracing::debug!("ExpandableFab({}): cancel icon rotation", self.orientation);
        }
        self.driver.cancel();
    }
}
