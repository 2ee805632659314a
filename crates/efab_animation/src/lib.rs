//! efab Animation System
//!
//! Two independent timing engines drive the widget:
//!
//! - **Declarative animations**: [`Animation`] trees of property tweens
//!   composed in parallel ([`Animation::together`]) or in order
//!   ([`Animation::sequence`]), played by the [`AnimationEngine`] which reports
//!   each finished tree once.
//! - **Manual icon rotation**: the [`RotationDriver`] steps a
//!   [`RotationPlan`] in fixed 10 ms increments, either on a background timer
//!   thread or from the frame loop, and hands every step back to the UI thread
//!   as a [`DriverEvent`].
//!
//! The widget coordinator joins the two finished signals before committing a
//! state change.

pub mod animation;
pub mod driver;
pub mod easing;
pub mod engine;

pub use animation::{Animation, EndAction, PropertyAnimation};
pub use driver::{
    DriverClock, DriverEvent, RotationDriver, RotationPhase, RotationPlan, STEP_INTERVAL_MS,
};
pub use easing::Easing;
pub use engine::{AnimationEngine, AnimationId};
