use crate::constants::{FADE_STEP, HOLD_DURATION};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Phase {
    Idle,         // No frame to show yet
    Holding,      // Showing the current frame, hold timer running
    Fading,       // Crossfade to the current frame in progress
    AwaitingMore, // Last buffered frame shown, polling for new frames
}

/// What the main loop should do with the trigger after a tick.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum TriggerSignal {
    None,
    Disable, // a transition just started
    Enable,  // the last buffered frame has finished its hold
}

/// Which buffered frames to draw this tick, and at what alpha.
/// The previous frame is drawn first so the current one blends over it.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RenderPlan {
    pub previous: Option<(usize, u8)>,
    pub current: Option<(usize, u8)>,
}

impl RenderPlan {
    fn empty() -> Self {
        Self { previous: None, current: None }
    }
}

/// Sequential playback over an append-only frame buffer with a linear
/// crossfade between consecutive frames. Owns all animation state;
/// `tick()` is the only mutating entry point and is called once per
/// rendered frame.
///
/// Generic over the frame payload so the state machine can be driven
/// in tests without textures.
pub struct Playback<T> {
    frames: Vec<T>,
    current: Option<usize>,
    timer: u32,
    fade_out: u8,
    fade_in: u8,
    fading_in: bool,
}

impl<T> Playback<T> {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            current: None,
            timer: 0,
            fade_out: 255,
            fade_in: 0,
            fading_in: false,
        }
    }

    /// Appends fetched frames. The buffer only ever grows. If playback
    /// is idle it starts at the first frame with a fresh fade ramp.
    pub fn extend(&mut self, frames: Vec<T>) {
        self.frames.extend(frames);
        if self.current.is_none() && !self.frames.is_empty() {
            self.current = Some(0);
            self.timer = 0;
            self.fade_out = 255;
            self.fade_in = 0;
            self.fading_in = true;
        }
    }

    pub fn frame(&self, index: usize) -> &T {
        &self.frames[index]
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn phase(&self) -> Phase {
        match self.current {
            None => Phase::Idle,
            Some(_) if self.fading_in => Phase::Fading,
            Some(_) if self.timer < HOLD_DURATION => Phase::Holding,
            Some(index) if index + 1 >= self.frames.len() => Phase::AwaitingMore,
            Some(_) => Phase::Holding,
        }
    }

    /// Advances the animation by one frame and reports what to draw.
    pub fn tick(&mut self) -> (RenderPlan, TriggerSignal) {
        let Some(mut index) = self.current else {
            return (RenderPlan::empty(), TriggerSignal::None);
        };

        let mut signal = TriggerSignal::None;
        if self.timer < HOLD_DURATION {
            self.timer += 1;
        } else if index + 1 < self.frames.len() {
            // Hold expired and another frame is buffered: advance and
            // restart the crossfade ramp.
            index += 1;
            self.current = Some(index);
            self.timer = 0;
            self.fade_out = 255;
            self.fade_in = 0;
            self.fading_in = true;
            signal = TriggerSignal::Disable;
        } else {
            // Hold expired on the last buffered frame. Keep polling;
            // a later fetch can still append frames.
            signal = TriggerSignal::Enable;
        }

        if self.fading_in {
            self.fade_in = self.fade_in.saturating_add(FADE_STEP);
            self.fade_out = self.fade_out.saturating_sub(FADE_STEP);
            if self.fade_in == u8::MAX {
                self.fading_in = false;
            }
        }

        let plan = RenderPlan {
            previous: (index > 0).then(|| (index - 1, self.fade_out)),
            current: Some((index, self.fade_in)),
        };
        (plan, signal)
    }
}
