//! efab Widget Library
//!
//! An expandable floating action button: a main button that opens into a
//! stack of option buttons with optional labels over a dimming overlay, and
//! animates back closed.
//!
//! # Architecture
//!
//! - **Components**: [`Overlay`], [`ExpandableFab`], [`FabOption`] and
//!   [`Label`] are controllers for host-owned views. Each builds its own
//!   opening and closing animations and is configured through a validated
//!   value object ([`OverlayConfig`], [`ExpandableFabConfig`],
//!   [`FabOptionConfig`], [`LabelConfig`]).
//! - **Configurations**: one [`OrientationConfiguration`] per orientation
//!   holds the components and maintains the anchor chain of the options.
//! - **Coordinator**: [`ExpandableFabLayout`] files children by role
//!   ([`FabChild`]), runs the [`WidgetStateMachine`] and plays the combined
//!   animation groups.
//!
//! # Example
//!
//! ```ignore
//! use efab_widgets::prelude::*;
//!
//! let mut layout = ExpandableFabLayout::new(HeadlessHost::new());
//! let overlay = Overlay::new(layout.host_mut(), Orientation::Portrait, OverlayConfig::new())?;
//! let fab = ExpandableFab::new(layout.host_mut(), Orientation::Portrait, ExpandableFabConfig::new())?;
//! layout.add_views([FabChild::from(overlay), fab.into()])?;
//!
//! // In the frame loop
//! layout.tick(dt_ms);
//! ```

mod click;
pub mod configuration;
pub mod expandable_fab;
pub mod fab_option;
pub mod label;
pub mod layout;
pub mod overlay;
pub mod state;

pub use click::ClickListener;
pub use configuration::OrientationConfiguration;
pub use expandable_fab::{ExpandableFab, ExpandableFabConfig, ANTICIPATION_PAUSE_MS};
pub use fab_option::{FabOption, FabOptionConfig, OptionPlacement};
pub use label::{Label, LabelConfig};
pub use layout::{ExpandableFabLayout, FabChild, LayoutConfig};
pub use overlay::{Overlay, OverlayConfig};
pub use state::{CloseRequest, Commit, WidgetPhase, WidgetStateMachine};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::click::ClickListener;
    pub use crate::configuration::OrientationConfiguration;
    pub use crate::expandable_fab::{ExpandableFab, ExpandableFabConfig};
    pub use crate::fab_option::{FabOption, FabOptionConfig};
    pub use crate::label::{Label, LabelConfig};
    pub use crate::layout::{ExpandableFabLayout, FabChild, LayoutConfig};
    pub use crate::overlay::{Overlay, OverlayConfig};
    pub use crate::state::{WidgetPhase, WidgetStateMachine};

    pub use efab_animation::DriverClock;
    pub use efab_core::prelude::*;
}
