//! Easing curves
//!
//! The curves match the platform interpolators the widget was designed
//! around: overshoot for entrances, anticipate for wind-ups.

/// Animation easing function
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    /// Constant speed
    #[default]
    Linear,
    /// Flings past the target and settles back; higher tension overshoots more
    Overshoot(f32),
    /// Pulls back before moving toward the target; higher tension pulls further
    Anticipate(f32),
}

impl Easing {
    /// Apply the easing to normalized time (clamped to `0.0..=1.0`)
    ///
    /// The result may leave `0.0..=1.0` for the overshooting curves.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::Overshoot(tension) => {
                let t = t - 1.0;
                t * t * ((tension + 1.0) * t + tension) + 1.0
            }
            Easing::Anticipate(tension) => t * t * ((tension + 1.0) * t - tension),
        }
    }
}
