//! Click callbacks
//!
//! Every component runs two callbacks per click: the default behavior
//! installed by the [`ExpandableFabLayout`](crate::ExpandableFabLayout), then
//! the client's listener. The default behavior only exists once the component
//! has been added to a layout.

use std::fmt;
use std::rc::Rc;

/// Client click callback
pub type ClickListener = Rc<dyn Fn()>;

/// Default behavior of the overlay and the main button
pub(crate) type DefaultBehavior = Rc<dyn Fn()>;

/// Default behavior of an option; returns whether the client listener may fire
pub(crate) type OptionBehavior = Rc<dyn Fn() -> bool>;

/// Wrapper so components holding callbacks can still derive `Debug`
pub(crate) struct Callback<F: ?Sized>(pub(crate) Option<Rc<F>>);

impl<F: ?Sized> Callback<F> {
    pub(crate) fn none() -> Self {
        Self(None)
    }

    pub(crate) fn set(&mut self, f: Option<Rc<F>>) {
        self.0 = f;
    }

    pub(crate) fn get(&self) -> Option<&Rc<F>> {
        self.0.as_ref()
    }
}

impl<F: ?Sized> fmt::Debug for Callback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.is_some() { "Some(..)" } else { "None" })
    }
}
