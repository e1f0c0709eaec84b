use crate::foundation::core::Tick;

/// Owner of the animation tick. Restarting always rewinds to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationClock {
    tick: Tick,
    running: bool,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.tick = Tick(0);
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance one frame. Ignored while stopped.
    pub fn advance(&mut self) -> Tick {
        if self.running {
            self.tick = self.tick.next();
        }
        self.tick
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
