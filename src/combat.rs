//! Health and cooldown primitives shared by every combatant.

/// Current/max health pair. `current` always stays in `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Subtract `amount` (negative amounts are ignored). Returns `true` only
    /// on the call that takes health from above zero to zero.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if amount <= 0.0 || self.is_depleted() {
            return false;
        }
        self.current = (self.current - amount).max(0.0);
        self.is_depleted()
    }

    pub fn heal(&mut self, amount: f32) {
        if amount > 0.0 {
            self.current = (self.current + amount).min(self.max);
        }
    }

    pub fn raise_max(&mut self, amount: f32) {
        self.max = (self.max + amount).max(0.0);
        self.current = self.current.min(self.max);
    }
}

/// Countdown timer that gates an action. Ready when `remaining` hits zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cooldown {
    remaining: f32,
    delay: f32,
}

impl Cooldown {
    /// Starts ready.
    pub fn ready(delay: f32) -> Self {
        Self { remaining: 0.0, delay }
    }

    /// Starts fully charged, so the first use waits one `delay`.
    pub fn charged(delay: f32) -> Self {
        Self { remaining: delay, delay }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    pub fn trigger(&mut self) {
        self.remaining = self.delay;
    }

    /// Trigger if ready; `false` means the action must wait.
    pub fn try_trigger(&mut self) -> bool {
        if self.is_ready() {
            self.trigger();
            true
        } else {
            false
        }
    }
}
