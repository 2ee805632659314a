//! Declarative animations
//!
//! An [`Animation`] is an immutable description: property tweens combined
//! with `together`/`sequence`, plus actions to run when a node finishes.
//! Nothing moves until the tree is handed to the
//! [`AnimationEngine`](crate::AnimationEngine).
//!
//! # Example
//!
//! ```ignore
//! let fade = PropertyAnimation::new(view, ViewProperty::Alpha, 0.0)
//!     .duration_ms(75);
//! let shrink = PropertyAnimation::new(view, ViewProperty::ScaleX, 0.0)
//!     .duration_ms(75);
//!
//! let closing = Animation::together([fade.into(), shrink.into()])
//!     .then_hide(view);
//! ```

use efab_core::{ViewId, ViewProperty, Visibility};
use smallvec::SmallVec;

use crate::easing::Easing;

/// A single float property tween on one view
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyAnimation {
    pub view: ViewId,
    pub property: ViewProperty,
    /// Start value; `None` reads the current value when the tween starts
    pub from: Option<f32>,
    pub to: f32,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl PropertyAnimation {
    /// Tween `property` from its current value to `to`
    pub fn new(view: ViewId, property: ViewProperty, to: f32) -> Self {
        Self {
            view,
            property,
            from: None,
            to,
            duration_ms: 0,
            easing: Easing::Linear,
        }
    }

    /// Tween between two explicit values
    pub fn between(view: ViewId, property: ViewProperty, from: f32, to: f32) -> Self {
        Self::new(view, property, to).start_value(from)
    }

    pub fn start_value(mut self, from: f32) -> Self {
        self.from = Some(from);
        self
    }

    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Side effect applied when an animation node completes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EndAction {
    SetVisibility(ViewId, Visibility),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AnimationKind {
    Empty,
    Property(PropertyAnimation),
    Together(Vec<Animation>),
    Sequence(Vec<Animation>),
}

/// A composable animation tree
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub(crate) kind: AnimationKind,
    pub(crate) on_end: SmallVec<[EndAction; 1]>,
}

impl Animation {
    fn from_kind(kind: AnimationKind) -> Self {
        Self {
            kind,
            on_end: SmallVec::new(),
        }
    }

    /// A zero-length placeholder that finishes immediately and changes nothing
    pub fn empty() -> Self {
        Self::from_kind(AnimationKind::Empty)
    }

    /// Play all children at the same time
    pub fn together(children: impl IntoIterator<Item = Animation>) -> Self {
        Self::from_kind(AnimationKind::Together(children.into_iter().collect()))
    }

    /// Play children one after another, in iteration order
    pub fn sequence(children: impl IntoIterator<Item = Animation>) -> Self {
        Self::from_kind(AnimationKind::Sequence(children.into_iter().collect()))
    }

    /// Run `action` when this node finishes
    pub fn on_end(mut self, action: EndAction) -> Self {
        self.on_end.push(action);
        self
    }

    /// Set `view` to [`Visibility::Gone`] when this node finishes
    pub fn then_hide(self, view: ViewId) -> Self {
        self.on_end(EndAction::SetVisibility(view, Visibility::Gone))
    }

    pub fn is_empty(&self) -> bool {
        match &self.kind {
            AnimationKind::Empty => self.on_end.is_empty(),
            AnimationKind::Property(_) => false,
            AnimationKind::Together(children) | AnimationKind::Sequence(children) => {
                self.on_end.is_empty() && children.iter().all(Animation::is_empty)
            }
        }
    }

    /// Total running time of the tree
    pub fn duration_ms(&self) -> u64 {
        match &self.kind {
            AnimationKind::Empty => 0,
            AnimationKind::Property(p) => p.duration_ms,
            AnimationKind::Together(children) => children
                .iter()
                .map(Animation::duration_ms)
                .max()
                .unwrap_or(0),
            AnimationKind::Sequence(children) => children.iter().map(Animation::duration_ms).sum(),
        }
    }

    /// Every property tween in the tree, depth first
    pub fn tweens(&self) -> Vec<&PropertyAnimation> {
        let mut out = Vec::new();
        self.collect_tweens(&mut out);
        out
    }

    fn collect_tweens<'a>(&'a self, out: &mut Vec<&'a PropertyAnimation>) {
        match &self.kind {
            AnimationKind::Empty => {}
            AnimationKind::Property(p) => out.push(p),
            AnimationKind::Together(children) | AnimationKind::Sequence(children) => {
                for child in children {
                    child.collect_tweens(out);
                }
            }
        }
    }
}

impl From<PropertyAnimation> for Animation {
    fn from(tween: PropertyAnimation) -> Self {
        Self::from_kind(AnimationKind::Property(tween))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn view(n: u64) -> ViewId {
        ViewId::from(KeyData::from_ffi((1u64 << 32) | n))
    }

    #[test]
    fn test_together_duration_is_longest_child() {
        let a = PropertyAnimation::new(view(0), ViewProperty::Alpha, 1.0).duration_ms(100);
        let b = PropertyAnimation::new(view(0), ViewProperty::ScaleX, 1.0).duration_ms(250);
        let anim = Animation::together([a.into(), b.into()]);
        assert_eq!(anim.duration_ms(), 250);
    }

    #[test]
    fn test_sequence_duration_is_sum() {
        let a = PropertyAnimation::new(view(0), ViewProperty::Alpha, 1.0).duration_ms(100);
        let b = PropertyAnimation::new(view(1), ViewProperty::Alpha, 1.0).duration_ms(250);
        let anim = Animation::sequence([a.into(), Animation::empty(), b.into()]);
        assert_eq!(anim.duration_ms(), 350);
        assert_eq!(anim.tweens().len(), 2);
    }

    #[test]
    fn test_empty_detection() {
        assert!(Animation::empty().is_empty());
        assert!(Animation::together([Animation::empty(), Animation::empty()]).is_empty());
        assert!(!Animation::empty().then_hide(view(3)).is_empty());
    }
}
