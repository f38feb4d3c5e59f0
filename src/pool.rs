//! Fixed pool of button instances.
//!
//! Mirrors the bare-metal allocation model: a compile-time array of slots
//! and no heap after init. `new_button` scans for a free slot under a
//! [`PoolLock`]; the default lock is a no-op, suitable for single-context
//! hosts, and preemptive hosts plug in a real mutual-exclusion
//! implementation instead.
//!
//! `step` is not internally synchronised. A given instance must be stepped
//! by one context at a time; events are emitted synchronously from within
//! the step, and every `Released` is followed by exactly one `Click`
//! carrying the running count before the call returns.

use log::{debug, info, warn};

use crate::engine::ButtonEngine;
use crate::error::ButtonError;
use crate::event::{ButtonEvent, EventSink};
use crate::param::ButtonParam;
use crate::reader::LevelReader;

/// Capacity of a default pool.
pub const BUTTON_MAX: usize = 8;

/// Opaque handle to a pooled button instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonId(pub(crate) u8);

impl ButtonId {
    /// Slot index behind the handle.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Mutual exclusion around slot allocation and free.
pub trait PoolLock {
    fn lock(&self);
    fn unlock(&self);
}

/// Zero-overhead lock for single-context hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLock;

impl PoolLock for NoopLock {
    fn lock(&self) {}
    fn unlock(&self) {}
}

struct Slot<'a> {
    engine: ButtonEngine,
    reader: Option<&'a mut dyn LevelReader>,
    sink: Option<&'a mut dyn EventSink>,
    allocated: bool,
    active: bool,
}

impl Slot<'_> {
    fn empty() -> Self {
        Self {
            engine: ButtonEngine::new(),
            reader: None,
            sink: None,
            allocated: false,
            active: false,
        }
    }
}

/// Fixed pool of up to `N` button instances.
pub struct ButtonPool<'a, L: PoolLock = NoopLock, const N: usize = BUTTON_MAX> {
    slots: [Slot<'a>; N],
    lock: L,
}

impl<'a> ButtonPool<'a> {
    /// Pool with the default capacity and the no-op lock.
    pub fn new() -> Self {
        Self::with_lock(NoopLock)
    }
}

impl Default for ButtonPool<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, L: PoolLock, const N: usize> ButtonPool<'a, L, N> {
    /// Pool guarded by a caller-supplied allocation lock.
    pub fn with_lock(lock: L) -> Self {
        Self {
            slots: core::array::from_fn(|_| Slot::empty()),
            lock,
        }
    }

    /// Claim a free slot and bind a level reader and an optional event sink
    /// to it.
    ///
    /// The instance starts with the default timing block and disabled;
    /// call [`enable`](Self::enable) before stepping it. Returns `None`
    /// when every slot is taken.
    pub fn new_button(
        &mut self,
        reader: &'a mut dyn LevelReader,
        sink: Option<&'a mut dyn EventSink>,
    ) -> Option<ButtonId> {
        self.lock.lock();
        let index = self.slots.iter().position(|slot| !slot.allocated);
        if let Some(index) = index {
            self.slots[index].allocated = true;
        }
        self.lock.unlock();

        let index = index?;
        let slot = &mut self.slots[index];
        slot.engine = ButtonEngine::new();
        slot.reader = Some(reader);
        slot.sink = sink;
        slot.active = false;
        info!("button: slot {index} allocated");
        Some(ButtonId(index as u8))
    }

    /// Release a slot, clearing all instance state. Stepping a deleted
    /// handle afterwards returns [`ButtonError::InvalidParam`].
    pub fn delete(&mut self, id: ButtonId) {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return;
        };
        self.lock.lock();
        *slot = Slot::empty();
        self.lock.unlock();
        info!("button: slot {} freed", id.index());
    }

    /// Start processing steps for this instance.
    pub fn enable(&mut self, id: ButtonId) -> Result<(), ButtonError> {
        let slot = self.slot_mut(id)?;
        slot.active = true;
        debug!("button: slot {} enabled", id.index());
        Ok(())
    }

    /// Stop processing steps; the instance keeps its state.
    pub fn disable(&mut self, id: ButtonId) -> Result<(), ButtonError> {
        let slot = self.slot_mut(id)?;
        slot.active = false;
        debug!("button: slot {} disabled", id.index());
        Ok(())
    }

    /// Install a new timing block on one instance.
    pub fn set_param(&mut self, id: ButtonId, param: &ButtonParam) -> Result<(), ButtonError> {
        let slot = self.slot_mut(id)?;
        slot.engine.set_param(param).inspect_err(|_| {
            warn!("button: slot {} rejected timing block", id.index());
        })
    }

    /// Copy out the current timing block of one instance.
    pub fn get_param(&self, id: ButtonId) -> Result<ButtonParam, ButtonError> {
        self.slot_ref(id).map(|slot| slot.engine.param())
    }

    /// Advance one instance to `now_ms`, emitting events through its sink.
    pub fn step(&mut self, id: ButtonId, now_ms: u32) -> Result<(), ButtonError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.allocated)
            .ok_or(ButtonError::InvalidParam)?;
        if !slot.active {
            return Err(ButtonError::Disabled);
        }
        let reader = slot.reader.as_deref_mut().ok_or(ButtonError::InvalidParam)?;

        let Some(event) = slot.engine.step(now_ms, reader) else {
            return Ok(());
        };

        if let Some(sink) = slot.sink.as_deref_mut() {
            sink.on_event(id, event);
            if event == ButtonEvent::Released {
                sink.on_event(id, ButtonEvent::Click(slot.engine.clicks()));
            }
        }
        Ok(())
    }

    /// Whether one instance's waveform has left the steady-up state.
    /// Stale handles report `false`.
    pub fn busy(&self, id: ButtonId) -> bool {
        self.slot_ref(id).map(|slot| slot.engine.busy()).unwrap_or(false)
    }

    /// Whether any allocated instance is busy. The host can sleep while
    /// this reports `false`.
    pub fn any_busy(&self) -> bool {
        self.slots.iter().any(|slot| slot.allocated && slot.engine.busy())
    }

    /// Number of allocated slots.
    pub fn allocated(&self) -> usize {
        self.slots.iter().filter(|slot| slot.allocated).count()
    }

    fn slot_ref(&self, id: ButtonId) -> Result<&Slot<'a>, ButtonError> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.allocated)
            .ok_or(ButtonError::InvalidParam)
    }

    fn slot_mut(&mut self, id: ButtonId) -> Result<&mut Slot<'a>, ButtonError> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.allocated)
            .ok_or(ButtonError::InvalidParam)
    }
}
