//! Headless simulation
//!
//! Builds a described widget on a [`HeadlessHost`], opens it, closes it
//! (through the main button or an option) and reports how long each
//! transition took.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use efab_animation::DriverClock;
use efab_core::{HeadlessHost, Orientation, ViewHost, ViewId};
use efab_widgets::{ExpandableFabLayout, WidgetPhase};
use tracing::{debug, info};

use crate::config::WidgetDescription;

/// Simulated time after which a transition counts as stuck
const SETTLE_LIMIT_MS: f32 = 10_000.0;

/// Simulation settings taken from the command line
#[derive(Clone, Debug)]
pub struct SimulationOptions {
    pub orientation: Orientation,
    pub frame_ms: f32,
    pub clock: DriverClock,
    /// Close by clicking this option instead of the main button
    pub close_with_option: Option<usize>,
    pub cycles: u32,
}

/// Measured outcome of one open/close cycle
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    pub opening_ms: f32,
    pub closing_ms: f32,
    pub phases: Vec<WidgetPhase>,
}

/// Run the configured number of cycles
pub fn run(
    description: &WidgetDescription,
    options: &SimulationOptions,
) -> Result<Vec<CycleReport>> {
    if options.frame_ms <= 0.0 {
        anyhow::bail!("frame interval must be positive, got {}", options.frame_ms);
    }

    let config = description.layout.clone().driver_clock(options.clock);
    let host = HeadlessHost::with_orientation(options.orientation);
    let mut layout = ExpandableFabLayout::with_config(host, config);
    description.build(&mut layout)?;

    let active = layout.active_orientation();
    if active != options.orientation {
        info!(
            "No {} main button, using the {} configuration",
            options.orientation, active
        );
    }

    let main_button = layout
        .active_configuration()
        .expandable_fab()
        .map(|fab| fab.view_id())
        .context("Description has no main button to click")?;
    let close_target = match options.close_with_option {
        Some(index) => layout
            .active_configuration()
            .fab_option(index)
            .map(|option| option.view_id())
            .with_context(|| format!("No option {} in the {} configuration", index, active))?,
        None => main_button,
    };

    let phases = Rc::new(RefCell::new(Vec::new()));
    let observed = Rc::clone(&phases);
    layout.on_state_changed(move |phase| {
        info!("  -> {:?}", phase);
        observed.borrow_mut().push(phase);
    });

    let mut reports = Vec::new();
    for cycle in 1..=options.cycles {
        info!("Cycle {}", cycle);

        layout.click(main_button)?;
        let opening_ms = settle(&mut layout, options)?;
        if !layout.is_open() {
            anyhow::bail!("widget did not open in cycle {}", cycle);
        }
        log_views(&layout);

        layout.click(close_target)?;
        let closing_ms = settle(&mut layout, options)?;
        if layout.is_open() {
            anyhow::bail!("widget did not close in cycle {}", cycle);
        }

        reports.push(CycleReport {
            opening_ms,
            closing_ms,
            phases: phases.borrow_mut().drain(..).collect(),
        });
    }

    Ok(reports)
}

/// Tick until no transition is in flight, returning the simulated time
fn settle(
    layout: &mut ExpandableFabLayout<HeadlessHost>,
    options: &SimulationOptions,
) -> Result<f32> {
    let mut elapsed = 0.0;
    loop {
        if options.clock == DriverClock::Background {
            thread::sleep(Duration::from_secs_f32(options.frame_ms / 1000.0));
        }
        layout.tick(options.frame_ms);
        elapsed += options.frame_ms;

        if !layout.state().is_transitioning() && !layout.is_animating() {
            return Ok(elapsed);
        }
        if elapsed > SETTLE_LIMIT_MS {
            anyhow::bail!(
                "widget still {:?} after {} ms of simulated time",
                layout.state(),
                SETTLE_LIMIT_MS
            );
        }
    }
}

fn log_views(layout: &ExpandableFabLayout<HeadlessHost>) {
    let host = layout.host();
    let configuration = layout.active_configuration();

    if let Some(fab) = configuration.expandable_fab() {
        debug!(
            "  main button: icon {:.1} deg, label {:?}",
            host.icon_rotation(fab.view_id()),
            host.visibility(fab.label().view_id())
        );
    }
    for (index, option) in configuration.fab_options().iter().enumerate() {
        log_option(host, index, option.view_id());
    }
}

fn log_option(host: &HeadlessHost, index: usize, view: ViewId) {
    if let Some(node) = host.node(view) {
        debug!(
            "  option {}: {:?}, translation_y {:.1}, scale {:.2}",
            index, node.visibility, node.translation_y, node.scale_x
        );
    }
}
