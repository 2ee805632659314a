//! ExpandableFabLayout - the widget coordinator
//!
//! Owns the portrait and landscape [`OrientationConfiguration`]s, arbitrates
//! open and close requests through the [`WidgetStateMachine`], and plays one
//! combined animation group per transition:
//!
//! - opening: overlay fade-in ∥ main button (icon rotation + label) ∥ options
//!   popping in one after another, nearest first
//! - closing: overlay fade-out ∥ main button ∥ options shrinking one after
//!   another, farthest first
//!
//! Clicks reach the layout through default behaviors installed on each child
//! when it is added. The behaviors only queue a command; the layout runs the
//! queue after every [`click`](ExpandableFabLayout::click) and every
//! [`tick`](ExpandableFabLayout::tick).
//!
//! # Example
//!
//! ```ignore
//! let mut layout = ExpandableFabLayout::new(HeadlessHost::new());
//!
//! let fab = ExpandableFab::new(layout.host_mut(), Orientation::Portrait, ExpandableFabConfig::new())?;
//! let share = FabOption::new(layout.host_mut(), Orientation::Portrait, FabOptionConfig::new().label_text("Share"))?;
//! let main = layout.add_view(fab)?;
//! layout.add_view(share)?;
//!
//! layout.click(main)?;       // opening starts
//! layout.tick(16.0);         // call once per frame
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use efab_animation::{Animation, AnimationEngine, AnimationId, DriverClock};
use efab_core::{EfabError, Orientation, Result, ViewHost, ViewId, Visibility};
use serde::{Deserialize, Serialize};

use crate::click::{ClickListener, DefaultBehavior, OptionBehavior};
use crate::configuration::OrientationConfiguration;
use crate::expandable_fab::{ExpandableFab, ExpandableFabConfig};
use crate::fab_option::{FabOption, FabOptionConfig};
use crate::overlay::{Overlay, OverlayConfig};
use crate::state::{CloseRequest, Commit, WidgetPhase, WidgetStateMachine};

/// Layout-wide settings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Overrides every overlay's fade-in duration
    pub overlay_opening_duration_ms: Option<u64>,
    /// Overrides every overlay's fade-out duration
    pub overlay_closing_duration_ms: Option<u64>,
    /// Clock used by the main buttons' icon rotation
    #[serde(skip)]
    pub driver_clock: DriverClock,
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the overlay fade durations
    pub fn overlay_durations_ms(mut self, opening: Option<u64>, closing: Option<u64>) -> Self {
        self.overlay_opening_duration_ms = opening;
        self.overlay_closing_duration_ms = closing;
        self
    }

    /// Select the icon rotation clock
    pub fn driver_clock(mut self, clock: DriverClock) -> Self {
        self.driver_clock = clock;
        self
    }
}

/// A child the layout knows how to file
#[derive(Debug)]
pub enum FabChild {
    Overlay(Overlay),
    MainButton(ExpandableFab),
    Option(FabOption),
}

impl FabChild {
    pub fn view_id(&self) -> ViewId {
        match self {
            FabChild::Overlay(overlay) => overlay.view_id(),
            FabChild::MainButton(fab) => fab.view_id(),
            FabChild::Option(option) => option.view_id(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        match self {
            FabChild::Overlay(overlay) => overlay.orientation(),
            FabChild::MainButton(fab) => fab.orientation(),
            FabChild::Option(option) => option.orientation(),
        }
    }
}

impl From<Overlay> for FabChild {
    fn from(overlay: Overlay) -> Self {
        FabChild::Overlay(overlay)
    }
}

impl From<ExpandableFab> for FabChild {
    fn from(fab: ExpandableFab) -> Self {
        FabChild::MainButton(fab)
    }
}

impl From<FabOption> for FabChild {
    fn from(option: FabOption) -> Self {
        FabChild::Option(option)
    }
}

/// Work queued by click behaviors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LayoutCommand {
    /// Main button: close when open or busy, open otherwise
    Toggle,
    Close,
}

type CommandQueue = Rc<RefCell<VecDeque<LayoutCommand>>>;

/// Coordinator of the expandable FAB widget
pub struct ExpandableFabLayout<H: ViewHost> {
    host: H,
    config: LayoutConfig,
    portrait: OrientationConfiguration,
    landscape: OrientationConfiguration,
    engine: AnimationEngine,
    group: Option<AnimationId>,
    state: Rc<RefCell<WidgetStateMachine>>,
    commands: CommandQueue,
    on_state_changed: Option<Box<dyn FnMut(WidgetPhase)>>,
}

impl<H: ViewHost> ExpandableFabLayout<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, LayoutConfig::default())
    }

    pub fn with_config(host: H, config: LayoutConfig) -> Self {
        Self {
            host,
            config,
            portrait: OrientationConfiguration::new(Orientation::Portrait),
            landscape: OrientationConfiguration::new(Orientation::Landscape),
            engine: AnimationEngine::new(),
            group: None,
            state: Rc::new(RefCell::new(WidgetStateMachine::new())),
            commands: Rc::new(RefCell::new(VecDeque::new())),
            on_state_changed: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Host access, used to create children before adding them
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Change the overlay duration overrides
    ///
    /// The rotation clock is fixed once main buttons have been added.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    // =========================================================================
    // Configurations
    // =========================================================================

    pub fn portrait_configuration(&self) -> &OrientationConfiguration {
        &self.portrait
    }

    pub fn landscape_configuration(&self) -> &OrientationConfiguration {
        &self.landscape
    }

    pub fn configuration(&self, orientation: Orientation) -> &OrientationConfiguration {
        match orientation {
            Orientation::Portrait => &self.portrait,
            Orientation::Landscape => &self.landscape,
        }
    }

    /// Orientation whose configuration is in use
    ///
    /// The device orientation's configuration wins when it has a main button;
    /// otherwise the other one is used.
    pub fn active_orientation(&self) -> Orientation {
        let device = self.host.device_orientation();
        if self.configuration(device).expandable_fab().is_some() {
            device
        } else {
            device.opposite()
        }
    }

    pub fn active_configuration(&self) -> &OrientationConfiguration {
        self.configuration(self.active_orientation())
    }

    /// One configuration and the host, borrowed together
    fn parts(&mut self, orientation: Orientation) -> (&mut OrientationConfiguration, &mut H) {
        let configuration = match orientation {
            Orientation::Portrait => &mut self.portrait,
            Orientation::Landscape => &mut self.landscape,
        };
        (configuration, &mut self.host)
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn is_open(&self) -> bool {
        self.state.borrow().is_open()
    }

    pub fn state(&self) -> WidgetPhase {
        self.state.borrow().phase()
    }

    /// Snapshot of the full protocol state
    pub fn state_machine(&self) -> WidgetStateMachine {
        self.state.borrow().clone()
    }

    /// True while a group or an icon rotation is still running
    pub fn is_animating(&self) -> bool {
        self.engine.has_active_animations()
            || [&self.portrait, &self.landscape]
                .iter()
                .filter_map(|c| c.expandable_fab())
                .any(ExpandableFab::is_rotating)
    }

    /// Observe every phase change
    pub fn on_state_changed<F: FnMut(WidgetPhase) + 'static>(&mut self, callback: F) {
        self.on_state_changed = Some(Box::new(callback));
    }

    fn notify(&mut self, phase: WidgetPhase) {
        tracing::debug!("ExpandableFabLayout: -> {:?}", phase);
        if let Some(callback) = self.on_state_changed.as_mut() {
            callback(phase);
        }
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// File a child into the configuration of its orientation
    ///
    /// Fails with [`EfabError::DuplicateConfiguration`] for a second main
    /// button in the same orientation.
    pub fn add_view(&mut self, child: impl Into<FabChild>) -> Result<ViewId> {
        match child.into() {
            FabChild::Overlay(overlay) => Ok(self.add_overlay(overlay)),
            FabChild::MainButton(fab) => self.add_expandable_fab(fab),
            FabChild::Option(option) => Ok(self.add_fab_option(option)),
        }
    }

    /// Add several children in order, stopping at the first error
    pub fn add_views<I>(&mut self, children: I) -> Result<Vec<ViewId>>
    where
        I: IntoIterator,
        I::Item: Into<FabChild>,
    {
        children
            .into_iter()
            .map(|child| self.add_view(child))
            .collect()
    }

    fn add_overlay(&mut self, mut overlay: Overlay) -> ViewId {
        let view = overlay.view_id();
        let orientation = overlay.orientation();
        overlay.set_default_behavior(Some(self.close_behavior()));
        self.host.add_child(view);

        let (configuration, host) = self.parts(orientation);
        if let Some(previous) = configuration.set_overlay(overlay) {
            tracing::warn!(
                "ExpandableFabLayout: replacing the {} overlay",
                orientation
            );
            host.remove_child(previous.view_id());
        }
        view
    }

    fn add_expandable_fab(&mut self, mut fab: ExpandableFab) -> Result<ViewId> {
        let orientation = fab.orientation();
        if self.configuration(orientation).expandable_fab().is_some() {
            return Err(EfabError::DuplicateConfiguration(orientation));
        }

        let view = fab.view_id();
        fab.set_default_behavior(Some(self.toggle_behavior()));
        fab.set_driver_clock(self.config.driver_clock);
        self.host.add_child(view);
        self.host.add_child(fab.label().view_id());
        fab.show(&mut self.host);

        // Shown when it matches the device orientation, or when the other
        // orientation has no main button to show instead
        let device = self.host.device_orientation();
        let (other, host) = self.parts(orientation.opposite());
        if let Some(other_fab) = other.expandable_fab() {
            if orientation == device {
                other_fab.hide(host);
            } else {
                fab.hide(host);
            }
        }

        let (configuration, host) = self.parts(orientation);
        configuration.set_expandable_fab(host, fab);
        tracing::debug!("ExpandableFabLayout: added {} main button", orientation);
        Ok(view)
    }

    fn add_fab_option(&mut self, mut option: FabOption) -> ViewId {
        let view = option.view_id();
        let orientation = option.orientation();
        option.set_default_behavior(Some(self.option_behavior()));
        self.host.add_child(view);
        self.host.add_child(option.label().view_id());

        let (configuration, host) = self.parts(orientation);
        let index = configuration.push_fab_option(host, option);
        tracing::debug!(
            "ExpandableFabLayout: added {} option at index {}",
            orientation,
            index
        );
        view
    }

    /// Remove the option at `index` of `orientation`, re-anchoring the chain
    pub fn remove_fab_option_at(
        &mut self,
        orientation: Orientation,
        index: usize,
    ) -> Option<FabOption> {
        let (configuration, host) = self.parts(orientation);
        configuration.remove_fab_option_at(host, index)
    }

    /// Remove the option whose view is `view`, re-anchoring the chain
    pub fn remove_fab_option(&mut self, view: ViewId) -> Result<FabOption> {
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            let (configuration, host) = self.parts(orientation);
            if let Some(option) = configuration.remove_fab_option(host, view) {
                return Ok(option);
            }
        }
        Err(EfabError::UnknownView(view))
    }

    /// Remove every child and return to the initial state
    pub fn remove_all_views(&mut self) {
        self.engine.cancel_all();
        self.group = None;
        self.portrait.clear();
        self.landscape.clear();
        self.host.remove_all_children();
        self.state.borrow_mut().reset();
        self.commands.borrow_mut().clear();
        tracing::debug!("ExpandableFabLayout: removed all views");
    }

    /// Re-apply main button visibility after a device rotation
    ///
    /// Plays no animation and leaves any running transition alone.
    pub fn orientation_changed(&mut self) {
        let active = self.active_orientation();
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            let (configuration, host) = self.parts(orientation);
            if let Some(fab) = configuration.expandable_fab() {
                if orientation == active {
                    fab.show(host);
                } else {
                    fab.hide(host);
                }
            }
        }
    }

    // =========================================================================
    // Component access
    // =========================================================================

    fn missing(orientation: Orientation, component: &str) -> EfabError {
        EfabError::not_attached(format!("the {} {}", orientation, component))
    }

    fn option_orientation(&self, view: ViewId) -> Result<Orientation> {
        [Orientation::Portrait, Orientation::Landscape]
            .into_iter()
            .find(|o| self.configuration(*o).fab_option_index(view).is_some())
            .ok_or(EfabError::UnknownView(view))
    }

    fn option_mut(&mut self, view: ViewId) -> Result<(&mut FabOption, &mut H)> {
        let orientation = self.option_orientation(view)?;
        let (configuration, host) = self.parts(orientation);
        let index = configuration
            .fab_option_index(view)
            .ok_or(EfabError::UnknownView(view))?;
        let option = configuration
            .fab_option_mut(index)
            .ok_or(EfabError::UnknownView(view))?;
        Ok((option, host))
    }

    /// Validate and apply an overlay configuration change
    pub fn update_overlay_config(
        &mut self,
        orientation: Orientation,
        update: impl FnOnce(&mut OverlayConfig),
    ) -> Result<()> {
        let (configuration, host) = self.parts(orientation);
        let overlay = configuration
            .overlay_mut()
            .ok_or_else(|| Self::missing(orientation, "Overlay"))?;
        let mut config = overlay.config().clone();
        update(&mut config);
        overlay.set_config(host, config)
    }

    /// Validate and apply a main button configuration change
    ///
    /// On error the previous configuration stays in place.
    pub fn update_expandable_fab_config(
        &mut self,
        orientation: Orientation,
        update: impl FnOnce(&mut ExpandableFabConfig),
    ) -> Result<()> {
        let (configuration, host) = self.parts(orientation);
        let fab = configuration
            .expandable_fab_mut()
            .ok_or_else(|| Self::missing(orientation, "ExpandableFab"))?;
        let mut config = fab.config().clone();
        update(&mut config);
        fab.set_config(host, config)?;

        // Option position may have changed
        configuration.reanchor_all(host);
        Ok(())
    }

    /// Validate and apply an option configuration change
    pub fn update_fab_option_config(
        &mut self,
        view: ViewId,
        update: impl FnOnce(&mut FabOptionConfig),
    ) -> Result<()> {
        let (option, host) = self.option_mut(view)?;
        let mut config = option.config().clone();
        update(&mut config);
        option.set_config(host, config)
    }

    pub fn set_overlay_on_click(
        &mut self,
        orientation: Orientation,
        listener: Option<ClickListener>,
    ) -> Result<()> {
        let (configuration, _) = self.parts(orientation);
        configuration
            .overlay_mut()
            .ok_or_else(|| Self::missing(orientation, "Overlay"))?
            .set_on_click(listener);
        Ok(())
    }

    pub fn set_expandable_fab_on_click(
        &mut self,
        orientation: Orientation,
        listener: Option<ClickListener>,
    ) -> Result<()> {
        let (configuration, _) = self.parts(orientation);
        configuration
            .expandable_fab_mut()
            .ok_or_else(|| Self::missing(orientation, "ExpandableFab"))?
            .set_on_click(listener);
        Ok(())
    }

    pub fn set_fab_option_on_click(
        &mut self,
        view: ViewId,
        listener: Option<ClickListener>,
    ) -> Result<()> {
        let (option, _) = self.option_mut(view)?;
        option.set_on_click(listener);
        Ok(())
    }

    /// Enable or disable a main button and its label
    pub fn set_expandable_fab_enabled(
        &mut self,
        orientation: Orientation,
        enabled: bool,
    ) -> Result<()> {
        let (configuration, host) = self.parts(orientation);
        configuration
            .expandable_fab_mut()
            .ok_or_else(|| Self::missing(orientation, "ExpandableFab"))?
            .set_enabled(host, enabled);
        Ok(())
    }

    /// Enable or disable an option and its label
    pub fn set_fab_option_enabled(&mut self, view: ViewId, enabled: bool) -> Result<()> {
        let (option, host) = self.option_mut(view)?;
        option.set_enabled(host, enabled);
        Ok(())
    }

    // =========================================================================
    // Clicks
    // =========================================================================

    fn close_behavior(&self) -> DefaultBehavior {
        let commands = Rc::clone(&self.commands);
        Rc::new(move || commands.borrow_mut().push_back(LayoutCommand::Close))
    }

    fn toggle_behavior(&self) -> DefaultBehavior {
        let commands = Rc::clone(&self.commands);
        Rc::new(move || commands.borrow_mut().push_back(LayoutCommand::Toggle))
    }

    fn option_behavior(&self) -> OptionBehavior {
        let state = Rc::clone(&self.state);
        let commands = Rc::clone(&self.commands);
        Rc::new(move || {
            if !state.borrow_mut().claim_option_click() {
                tracing::debug!("ExpandableFabLayout: option already clicked this cycle");
                return false;
            }
            commands.borrow_mut().push_back(LayoutCommand::Close);
            true
        })
    }

    /// Dispatch a click on `view`, one of the layout's children or labels
    ///
    /// Label clicks are forwarded to the label's owner. Clicks on hidden
    /// views and disabled buttons are ignored.
    pub fn click(&mut self, view: ViewId) -> Result<()> {
        let orientation = [Orientation::Portrait, Orientation::Landscape]
            .into_iter()
            .find(|o| self.configuration(*o).contains(view))
            .ok_or(EfabError::UnknownView(view))?;
        if self.host.visibility(view) != Visibility::Visible {
            tracing::trace!("ExpandableFabLayout: ignoring click on hidden view {:?}", view);
            return Ok(());
        }
        let configuration = self.configuration(orientation);

        if let Some(overlay) = configuration.overlay().filter(|o| o.view_id() == view) {
            overlay.click()?;
        } else if let Some(fab) = configuration
            .expandable_fab()
            .filter(|f| f.view_id() == view || f.label().view_id() == view)
        {
            if fab.is_enabled() {
                fab.click()?;
            } else {
                tracing::trace!("ExpandableFabLayout: ignoring click on disabled main button");
            }
        } else if let Some(option) = configuration
            .fab_options()
            .iter()
            .find(|o| o.view_id() == view || o.label().view_id() == view)
        {
            if option.is_enabled() {
                option.click()?;
            } else {
                tracing::trace!("ExpandableFabLayout: ignoring click on disabled option");
            }
        }

        self.process_commands();
        Ok(())
    }

    fn process_commands(&mut self) {
        loop {
            let command = self.commands.borrow_mut().pop_front();
            match command {
                Some(LayoutCommand::Toggle) => {
                    let closes = self.state.borrow().main_button_closes();
                    if closes {
                        self.close();
                    } else {
                        self.open();
                    }
                }
                Some(LayoutCommand::Close) => self.close(),
                None => break,
            }
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Start opening the active configuration
    ///
    /// Returns false, starting nothing, when already open or while a
    /// transition is in flight.
    pub fn open(&mut self) -> bool {
        if !self.state.borrow_mut().request_open() {
            tracing::debug!("ExpandableFabLayout: open ignored");
            return false;
        }

        let orientation = self.active_orientation();
        let group = self.opening_group(orientation);
        self.group = Some(self.engine.start(&group));
        self.notify(WidgetPhase::Opening);
        true
    }

    /// Close the widget
    ///
    /// While animations are in flight the close is deferred until the running
    /// transition completes. When closed and idle this does nothing.
    pub fn close(&mut self) {
        let request = self.state.borrow_mut().request_close();
        match request {
            CloseRequest::Start => {
                let orientation = self.active_orientation();
                let group = self.closing_group(orientation);
                self.group = Some(self.engine.start(&group));
                self.notify(WidgetPhase::Closing);
            }
            CloseRequest::Deferred => {
                tracing::debug!("ExpandableFabLayout: close deferred until animations finish");
            }
            CloseRequest::Ignored => {}
        }
    }

    fn opening_group(&mut self, orientation: Orientation) -> Animation {
        let overlay_ms = self.config.overlay_opening_duration_ms;
        let state = Rc::clone(&self.state);
        let (configuration, host) = self.parts(orientation);

        let overlay = configuration
            .overlay()
            .map(|overlay| overlay.opening_animation(host, overlay_ms))
            .unwrap_or_else(Animation::empty);

        let placement = configuration
            .expandable_fab()
            .map(|fab| fab.config().placement())
            .unwrap_or_else(|| ExpandableFabConfig::default().placement());

        let fab = match configuration.expandable_fab_mut() {
            Some(fab) => {
                state.borrow_mut().efab_animation_started();
                fab.opening_animation(host)
            }
            None => {
                tracing::warn!("ExpandableFabLayout: opening without a main button");
                Animation::empty()
            }
        };

        let options = Animation::sequence(
            configuration
                .fab_options()
                .iter()
                .enumerate()
                .map(|(index, option)| option.opening_animation(host, index, placement)),
        );

        Animation::together([overlay, fab, options])
    }

    fn closing_group(&mut self, orientation: Orientation) -> Animation {
        let overlay_ms = self.config.overlay_closing_duration_ms;
        let state = Rc::clone(&self.state);
        let (configuration, host) = self.parts(orientation);

        let overlay = configuration
            .overlay()
            .map(|overlay| overlay.closing_animation(overlay_ms))
            .unwrap_or_else(Animation::empty);

        let fab = match configuration.expandable_fab_mut() {
            Some(fab) => {
                state.borrow_mut().efab_animation_started();
                fab.closing_animation(host)
            }
            None => Animation::empty(),
        };

        let options = Animation::sequence(
            configuration
                .fab_options()
                .iter()
                .rev()
                .map(|option| option.closing_animation(host)),
        );

        Animation::together([overlay, fab, options])
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// Advance the widget by one frame
    ///
    /// Applies pending icon rotation steps, advances the animation group, and
    /// commits the terminal state once both have finished. Call once per
    /// frame on the UI thread.
    pub fn tick(&mut self, dt_ms: f32) {
        self.process_commands();

        let mut rotation_finished = false;
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            let (configuration, host) = self.parts(orientation);
            if let Some(fab) = configuration.expandable_fab_mut() {
                rotation_finished |= fab.poll_rotation(host, dt_ms);
            }
        }

        let finished = self.engine.tick(dt_ms, &mut self.host);
        let group_finished = match self.group {
            Some(group) if finished.contains(&group) => {
                self.group = None;
                true
            }
            _ => false,
        };

        if rotation_finished {
            let commit = self.state.borrow_mut().efab_animation_finished();
            self.apply_commit(commit);
        }
        if group_finished {
            let commit = self.state.borrow_mut().group_animation_finished();
            self.apply_commit(commit);
        }

        self.process_commands();
    }

    fn apply_commit(&mut self, commit: Option<Commit>) {
        match commit {
            Some(Commit::Opened { close_requested }) => {
                self.notify(WidgetPhase::Open);
                if close_requested {
                    self.close();
                }
            }
            Some(Commit::Closed) => self.notify(WidgetPhase::Closed),
            None => {}
        }
    }
}
