//! Widget open/close state machine
//!
//! ```text
//!            request_open              both finished
//!   Closed ───────────────► Opening ─────────────────► Open
//!     ▲                                                  │
//!     │      both finished               request_close   │
//!     └──────────────────── Closing ◄────────────────────┘
//! ```
//!
//! Two animation subsystems run per transition: the main button's icon
//! rotation and the declarative group. Each reports its own finished signal.
//! The terminal state is committed by whichever signal arrives second, and
//! only once.
//!
//! A close requested while a transition is in flight is not started. It sets
//! `close_when_able`, and the opening commit reports it so the layout can
//! close right away.

/// Coarse widget phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WidgetPhase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl WidgetPhase {
    pub fn is_transitioning(self) -> bool {
        matches!(self, WidgetPhase::Opening | WidgetPhase::Closing)
    }
}

/// Result of a close request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseRequest {
    /// Start the closing group now
    Start,
    /// Animations are in flight; close once they settle
    Deferred,
    /// Already closed and idle
    Ignored,
}

/// A committed terminal state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commit {
    /// Now open; `close_requested` means a close arrived during the opening
    Opened { close_requested: bool },
    Closed,
}

/// Open/close protocol state, mutated only through transitions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetStateMachine {
    phase: WidgetPhase,
    open: bool,
    close_when_able: bool,
    fab_option_already_clicked: bool,
    efab_animations_finished: bool,
    group_animations_finished: bool,
}

impl Default for WidgetStateMachine {
    fn default() -> Self {
        Self {
            phase: WidgetPhase::Closed,
            open: false,
            close_when_able: false,
            fab_option_already_clicked: false,
            efab_animations_finished: true,
            group_animations_finished: true,
        }
    }
}

impl WidgetStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> WidgetPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close_when_able(&self) -> bool {
        self.close_when_able
    }

    pub fn fab_option_already_clicked(&self) -> bool {
        self.fab_option_already_clicked
    }

    pub fn efab_animations_finished(&self) -> bool {
        self.efab_animations_finished
    }

    pub fn group_animations_finished(&self) -> bool {
        self.group_animations_finished
    }

    /// Both finished signals are in
    pub fn animations_finished(&self) -> bool {
        self.efab_animations_finished && self.group_animations_finished
    }

    /// What a main button click should do: close when open or busy
    pub fn main_button_closes(&self) -> bool {
        self.open || !self.animations_finished()
    }

    /// Begin opening; false when already open or a transition is in flight
    pub fn request_open(&mut self) -> bool {
        if self.open || !self.animations_finished() {
            return false;
        }
        self.group_animations_finished = false;
        self.phase = WidgetPhase::Opening;
        true
    }

    /// Begin closing, defer the close, or ignore it
    pub fn request_close(&mut self) -> CloseRequest {
        if !self.animations_finished() {
            self.close_when_able = true;
            return CloseRequest::Deferred;
        }
        if !self.open {
            return CloseRequest::Ignored;
        }
        self.group_animations_finished = false;
        self.phase = WidgetPhase::Closing;
        CloseRequest::Start
    }

    /// The icon rotation of the current transition has started
    pub fn efab_animation_started(&mut self) {
        self.efab_animations_finished = false;
    }

    /// The icon rotation reported completion
    pub fn efab_animation_finished(&mut self) -> Option<Commit> {
        self.efab_animations_finished = true;
        self.commit()
    }

    /// The declarative group reported completion
    pub fn group_animation_finished(&mut self) -> Option<Commit> {
        self.group_animations_finished = true;
        self.commit()
    }

    /// Claim the single honored option click of this cycle
    pub fn claim_option_click(&mut self) -> bool {
        if self.fab_option_already_clicked {
            return false;
        }
        self.fab_option_already_clicked = true;
        true
    }

    /// Back to the initial state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn commit(&mut self) -> Option<Commit> {
        if !self.animations_finished() {
            return None;
        }
        match self.phase {
            WidgetPhase::Opening => {
                self.open = true;
                self.phase = WidgetPhase::Open;
                Some(Commit::Opened {
                    close_requested: self.close_when_able,
                })
            }
            WidgetPhase::Closing => {
                self.open = false;
                self.close_when_able = false;
                self.fab_option_already_clicked = false;
                self.phase = WidgetPhase::Closed;
                Some(Commit::Closed)
            }
            WidgetPhase::Open | WidgetPhase::Closed => None,
        }
    }
}
