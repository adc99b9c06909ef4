//! Per-frame keyboard snapshot
//!
//! Backends poll their device once per frame and hand the games a plain
//! `FrameInput`, so every update is a pure function of state and input.

/// Keys the games react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Space,
    P,
    Left,
    Right,
    Up,
    Down,
    Escape,
}

impl Key {
    pub const ALL: [Key; 8] = [
        Key::Enter,
        Key::Space,
        Key::P,
        Key::Left,
        Key::Right,
        Key::Up,
        Key::Down,
        Key::Escape,
    ];

    #[inline]
    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Small set of keys stored as a bitmask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySet(u16);

impl KeySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn of(keys: &[Key]) -> Self {
        let mut set = Self::empty();
        for &key in keys {
            set.insert(key);
        }
        set
    }

    pub fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    pub fn remove(&mut self, key: Key) {
        self.0 &= !key.bit();
    }

    pub fn contains(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        Key::ALL.into_iter().filter(|k| self.contains(*k))
    }
}

/// Input for a single frame
///
/// `down` holds every key held this frame, `pressed` only the keys whose
/// press edge happened since the previous poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub down: KeySet,
    pub pressed: KeySet,
}

impl FrameInput {
    /// Input with a single key pressed (and held) this frame
    pub fn press(key: Key) -> Self {
        let set = KeySet::of(&[key]);
        Self {
            down: set,
            pressed: set,
        }
    }

    /// Input with keys held but no new presses
    pub fn hold(keys: &[Key]) -> Self {
        Self {
            down: KeySet::of(keys),
            pressed: KeySet::empty(),
        }
    }

    #[inline]
    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(key)
    }

    #[inline]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(key)
    }
}

/// Turns key-down/key-up events into per-frame snapshots
///
/// Event-driven backends (the browser) feed raw events here; `take_frame`
/// returns the snapshot and clears the press edges.
#[derive(Debug, Clone, Default)]
pub struct KeyTracker {
    down: KeySet,
    pressed: KeySet,
}

impl KeyTracker {
    pub fn key_down(&mut self, key: Key) {
        // Auto-repeat sends key-down again while held; only the first one is an edge
        if !self.down.contains(key) {
            self.pressed.insert(key);
        }
        self.down.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.down.remove(key);
    }

    /// Release everything (focus lost)
    pub fn reset(&mut self) {
        self.down.clear();
        self.pressed.clear();
    }

    /// Press edge pending for the next snapshot
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(key)
    }

    pub fn take_frame(&mut self) -> FrameInput {
        let frame = FrameInput {
            down: self.down,
            pressed: self.pressed,
        };
        self.pressed.clear();
        frame
    }
}
