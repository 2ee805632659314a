//! Per-orientation configuration
//!
//! Holds the overlay, main button and options of one orientation and keeps
//! the anchor chain intact: option 0 hangs off the main button, every later
//! option off the one before it.

use efab_core::{Anchor, Orientation, ViewHost, ViewId};

use crate::expandable_fab::ExpandableFab;
use crate::fab_option::FabOption;
use crate::overlay::Overlay;

/// The views that make up the widget in one orientation
#[derive(Debug)]
pub struct OrientationConfiguration {
    orientation: Orientation,
    overlay: Option<Overlay>,
    expandable_fab: Option<ExpandableFab>,
    fab_options: Vec<FabOption>,
}

impl OrientationConfiguration {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            overlay: None,
            expandable_fab: None,
            fab_options: Vec::new(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self) -> Option<&mut Overlay> {
        self.overlay.as_mut()
    }

    pub fn expandable_fab(&self) -> Option<&ExpandableFab> {
        self.expandable_fab.as_ref()
    }

    pub fn expandable_fab_mut(&mut self) -> Option<&mut ExpandableFab> {
        self.expandable_fab.as_mut()
    }

    /// Options in stack order, index 0 nearest the main button
    pub fn fab_options(&self) -> &[FabOption] {
        &self.fab_options
    }

    pub fn fab_option(&self, index: usize) -> Option<&FabOption> {
        self.fab_options.get(index)
    }

    pub fn fab_option_mut(&mut self, index: usize) -> Option<&mut FabOption> {
        self.fab_options.get_mut(index)
    }

    pub fn fab_option_index(&self, view: ViewId) -> Option<usize> {
        self.fab_options.iter().position(|o| o.view_id() == view)
    }

    pub fn is_empty(&self) -> bool {
        self.overlay.is_none() && self.expandable_fab.is_none() && self.fab_options.is_empty()
    }

    /// Install the overlay, returning the one it replaces
    pub(crate) fn set_overlay(&mut self, overlay: Overlay) -> Option<Overlay> {
        self.overlay.replace(overlay)
    }

    /// Install the main button and anchor any options filed before it
    pub(crate) fn set_expandable_fab<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        fab: ExpandableFab,
    ) {
        self.expandable_fab = Some(fab);
        self.reanchor_all(host);
    }

    /// Append an option to the top of the stack and anchor it
    pub(crate) fn push_fab_option<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        option: FabOption,
    ) -> usize {
        self.fab_options.push(option);
        let index = self.fab_options.len() - 1;
        self.set_fab_option_anchor(host, index);
        index
    }

    /// Anchor the option at `index` to its predecessor, or to the main button
    /// for index 0
    ///
    /// The gravity follows the main button's option position. Without a main
    /// button the first option is left unanchored.
    pub fn set_fab_option_anchor<H: ViewHost + ?Sized>(&self, host: &mut H, index: usize) {
        let Some(option) = self.fab_options.get(index) else {
            return;
        };

        let gravity = self
            .expandable_fab
            .as_ref()
            .map(|fab| fab.config().fab_option_position)
            .unwrap_or_default()
            .gravity();

        let target = if index == 0 {
            self.expandable_fab.as_ref().map(ExpandableFab::view_id)
        } else {
            Some(self.fab_options[index - 1].view_id())
        };

        host.set_anchor(option.view_id(), target.map(|view| Anchor::new(view, gravity)));
    }

    pub(crate) fn reanchor_all<H: ViewHost + ?Sized>(&self, host: &mut H) {
        for index in 0..self.fab_options.len() {
            self.set_fab_option_anchor(host, index);
        }
    }

    /// Remove the option at `index` and its label from the host
    ///
    /// The option that moves into `index` is re-anchored to its new
    /// predecessor. Removing the last option re-anchors nothing.
    pub(crate) fn remove_fab_option_at<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        index: usize,
    ) -> Option<FabOption> {
        if index >= self.fab_options.len() {
            return None;
        }

        let removed = self.fab_options.remove(index);
        host.remove_child(removed.label().view_id());
        host.remove_child(removed.view_id());

        if index < self.fab_options.len() {
            self.set_fab_option_anchor(host, index);
        }
        Some(removed)
    }

    /// Remove the option whose view is `view`
    pub(crate) fn remove_fab_option<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        view: ViewId,
    ) -> Option<FabOption> {
        let index = self.fab_option_index(view)?;
        self.remove_fab_option_at(host, index)
    }

    /// True if `view` is one of this configuration's views or labels
    pub fn contains(&self, view: ViewId) -> bool {
        self.overlay.as_ref().is_some_and(|o| o.view_id() == view)
            || self
                .expandable_fab
                .as_ref()
                .is_some_and(|f| f.view_id() == view || f.label().view_id() == view)
            || self
                .fab_options
                .iter()
                .any(|o| o.view_id() == view || o.label().view_id() == view)
    }

    /// Drop every view, cancelling the main button's icon rotation
    pub(crate) fn clear(&mut self) {
        if let Some(fab) = self.expandable_fab.as_mut() {
            fab.detach();
        }
        self.overlay = None;
        self.expandable_fab = None;
        self.fab_options.clear();
    }
}
