//! Animation engine
//!
//! Plays [`Animation`] trees against a [`ViewHost`]. Each started tree is
//! flattened into timed tracks (one per property tween) and timed end actions,
//! then advanced by [`AnimationEngine::tick`]. A tree is reported as finished
//! exactly once, on the tick where its last track and action complete.
//!
//! Starting a tree cancels any still-running track of an older tree that
//! drives the same view property. The older tree keeps its timing and still
//! finishes (and runs its end actions) on schedule.

use efab_core::{ViewHost, ViewId, ViewProperty};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::animation::{Animation, AnimationKind, EndAction, PropertyAnimation};
use crate::easing::Easing;

new_key_type! {
    /// Handle to a running animation tree
    pub struct AnimationId;
}

#[derive(Clone, Debug)]
struct Track {
    view: ViewId,
    property: ViewProperty,
    from: Option<f32>,
    to: f32,
    start_ms: f32,
    duration_ms: f32,
    easing: Easing,
    done: bool,
}

impl Track {
    fn new(tween: &PropertyAnimation, start_ms: f32) -> Self {
        Self {
            view: tween.view,
            property: tween.property,
            from: tween.from,
            to: tween.to,
            start_ms,
            duration_ms: tween.duration_ms as f32,
            easing: tween.easing,
            done: false,
        }
    }

    fn advance<H: ViewHost + ?Sized>(&mut self, elapsed_ms: f32, host: &mut H) {
        if self.done || elapsed_ms < self.start_ms {
            return;
        }

        // Start values are read lazily so a sequenced track sees what the
        // tracks before it left behind
        let from = match self.from {
            Some(from) => from,
            None => {
                let current = host.property(self.view, self.property);
                self.from = Some(current);
                current
            }
        };

        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((elapsed_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
        };
        let value = from + (self.to - from) * self.easing.apply(progress);
        host.set_property(self.view, self.property, value);

        if progress >= 1.0 {
            // Land exactly on the target regardless of easing rounding
            host.set_property(self.view, self.property, self.to);
            self.done = true;
        }
    }
}

#[derive(Clone, Debug)]
struct TimedAction {
    at_ms: f32,
    action: EndAction,
    fired: bool,
}

struct RunningAnimation {
    tracks: Vec<Track>,
    actions: SmallVec<[TimedAction; 4]>,
    elapsed_ms: f32,
    total_ms: f32,
}

impl RunningAnimation {
    fn compile(animation: &Animation) -> Self {
        let mut running = Self {
            tracks: Vec::new(),
            actions: SmallVec::new(),
            elapsed_ms: 0.0,
            total_ms: 0.0,
        };
        running.total_ms = running.flatten(animation, 0.0);
        running
    }

    /// Lay out `animation` starting at `offset`, returning its end time
    fn flatten(&mut self, animation: &Animation, offset: f32) -> f32 {
        let end = match &animation.kind {
            AnimationKind::Empty => offset,
            AnimationKind::Property(tween) => {
                self.tracks.push(Track::new(tween, offset));
                offset + tween.duration_ms as f32
            }
            AnimationKind::Together(children) => children
                .iter()
                .map(|child| self.flatten(child, offset))
                .fold(offset, f32::max),
            AnimationKind::Sequence(children) => children
                .iter()
                .fold(offset, |cursor, child| self.flatten(child, cursor)),
        };

        for action in &animation.on_end {
            self.actions.push(TimedAction {
                at_ms: end,
                action: *action,
                fired: false,
            });
        }

        end
    }

    fn touches(&self, view: ViewId, property: ViewProperty) -> bool {
        self.tracks
            .iter()
            .any(|t| t.view == view && t.property == property)
    }

    fn cancel_tracks(&mut self, view: ViewId, property: ViewProperty) {
        for track in self
            .tracks
            .iter_mut()
            .filter(|t| t.view == view && t.property == property)
        {
            track.done = true;
        }
    }

    /// Advance by `dt_ms`; returns true when everything has completed
    fn advance<H: ViewHost + ?Sized>(&mut self, dt_ms: f32, host: &mut H) -> bool {
        self.elapsed_ms += dt_ms;

        for track in &mut self.tracks {
            track.advance(self.elapsed_ms, host);
        }

        for timed in self.actions.iter_mut().filter(|a| !a.fired) {
            if self.elapsed_ms >= timed.at_ms {
                apply(timed.action, host);
                timed.fired = true;
            }
        }

        self.elapsed_ms >= self.total_ms
            && self.tracks.iter().all(|t| t.done)
            && self.actions.iter().all(|a| a.fired)
    }
}

fn apply<H: ViewHost + ?Sized>(action: EndAction, host: &mut H) {
    match action {
        EndAction::SetVisibility(view, visibility) => host.set_visibility(view, visibility),
    }
}

/// Plays declarative animation trees and reports their completion
pub struct AnimationEngine {
    running: SlotMap<AnimationId, RunningAnimation>,
}

impl AnimationEngine {
    pub fn new() -> Self {
        Self {
            running: SlotMap::with_key(),
        }
    }

    /// Start playing `animation`
    ///
    /// Nothing is applied until the next [`tick`](Self::tick); a zero-length
    /// tree finishes on that tick even when `dt_ms` is zero.
    pub fn start(&mut self, animation: &Animation) -> AnimationId {
        let compiled = RunningAnimation::compile(animation);

        for track in &compiled.tracks {
            for (_, other) in self.running.iter_mut() {
                if other.touches(track.view, track.property) {
                    other.cancel_tracks(track.view, track.property);
                }
            }
        }

        tracing::trace!(
            "AnimationEngine: start tree with {} tracks over {}ms",
            compiled.tracks.len(),
            compiled.total_ms
        );
        self.running.insert(compiled)
    }

    /// Advance every running tree and return the ones that finished
    pub fn tick<H: ViewHost + ?Sized>(&mut self, dt_ms: f32, host: &mut H) -> Vec<AnimationId> {
        let mut finished = Vec::new();
        for (id, running) in self.running.iter_mut() {
            if running.advance(dt_ms, host) {
                finished.push(id);
            }
        }
        for id in &finished {
            self.running.remove(*id);
        }
        finished
    }

    /// Drop a running tree without applying its remaining tracks or actions
    pub fn cancel(&mut self, id: AnimationId) -> bool {
        self.running.remove(id).is_some()
    }

    /// Drop every running tree
    pub fn cancel_all(&mut self) {
        self.running.clear();
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.running.contains_key(id)
    }

    pub fn has_active_animations(&self) -> bool {
        !self.running.is_empty()
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use efab_core::{HeadlessHost, ViewKind, Visibility};

    #[test]
    fn test_property_tween_reaches_target() {
        let mut host = HeadlessHost::new();
        let view = host.create_view(ViewKind::Option);
        let mut engine = AnimationEngine::new();

        let fade = PropertyAnimation::between(view, ViewProperty::Alpha, 0.0, 1.0).duration_ms(100);
        let id = engine.start(&fade.into());

        assert!(engine.tick(50.0, &mut host).is_empty());
        assert!((host.property(view, ViewProperty::Alpha) - 0.5).abs() < 1e-4);

        let finished = engine.tick(50.0, &mut host);
        assert_eq!(finished, vec![id]);
        assert_eq!(host.property(view, ViewProperty::Alpha), 1.0);
        assert!(!engine.has_active_animations());
    }

    #[test]
    fn test_empty_animation_finishes_on_first_tick() {
        let mut host = HeadlessHost::new();
        let mut engine = AnimationEngine::new();

        let id = engine.start(&Animation::empty());
        assert!(engine.is_running(id));
        assert_eq!(engine.tick(0.0, &mut host), vec![id]);
    }

    #[test]
    fn test_sequence_reads_start_value_when_track_begins() {
        let mut host = HeadlessHost::new();
        let view = host.create_view(ViewKind::Label);
        let mut engine = AnimationEngine::new();

        let first =
            PropertyAnimation::between(view, ViewProperty::TranslationX, 0.0, 10.0).duration_ms(10);
        let second = PropertyAnimation::new(view, ViewProperty::TranslationX, 30.0).duration_ms(10);
        engine.start(&Animation::sequence([first.into(), second.into()]));

        engine.tick(10.0, &mut host);
        assert_eq!(host.property(view, ViewProperty::TranslationX), 10.0);

        engine.tick(5.0, &mut host);
        assert!((host.property(view, ViewProperty::TranslationX) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_end_action_runs_when_node_finishes() {
        let mut host = HeadlessHost::new();
        let a = host.create_view(ViewKind::Option);
        let b = host.create_view(ViewKind::Option);
        let mut engine = AnimationEngine::new();

        let hide_a = Animation::from(
            PropertyAnimation::new(a, ViewProperty::Alpha, 0.0).duration_ms(50),
        )
        .then_hide(a);
        let hide_b = Animation::from(
            PropertyAnimation::new(b, ViewProperty::Alpha, 0.0).duration_ms(50),
        )
        .then_hide(b);
        engine.start(&Animation::sequence([hide_a, hide_b]));

        engine.tick(50.0, &mut host);
        assert_eq!(host.visibility(a), Visibility::Gone);
        assert_eq!(host.visibility(b), Visibility::Visible);

        engine.tick(50.0, &mut host);
        assert_eq!(host.visibility(b), Visibility::Gone);
    }

    #[test]
    fn test_new_tree_cancels_conflicting_track() {
        let mut host = HeadlessHost::new();
        let view = host.create_view(ViewKind::Overlay);
        let mut engine = AnimationEngine::new();

        let slow = PropertyAnimation::between(view, ViewProperty::Alpha, 0.0, 1.0).duration_ms(1000);
        let old = engine.start(&slow.into());
        engine.tick(100.0, &mut host);

        let fast = PropertyAnimation::new(view, ViewProperty::Alpha, 0.0).duration_ms(10);
        let new = engine.start(&fast.into());

        let finished = engine.tick(10.0, &mut host);
        assert!(finished.contains(&new));
        assert_eq!(host.property(view, ViewProperty::Alpha), 0.0);

        // The cancelled tree keeps its schedule but no longer writes alpha
        engine.tick(500.0, &mut host);
        assert_eq!(host.property(view, ViewProperty::Alpha), 0.0);
        assert!(engine.tick(400.0, &mut host).contains(&old));
    }

    #[test]
    fn test_cancel_drops_tree() {
        let mut host = HeadlessHost::new();
        let view = host.create_view(ViewKind::Overlay);
        let mut engine = AnimationEngine::new();

        let id = engine.start(
            &PropertyAnimation::new(view, ViewProperty::Alpha, 0.0)
                .duration_ms(100)
                .into(),
        );
        assert!(engine.cancel(id));
        assert!(engine.tick(200.0, &mut host).is_empty());
        assert_eq!(host.property(view, ViewProperty::Alpha), 1.0);
    }
}
