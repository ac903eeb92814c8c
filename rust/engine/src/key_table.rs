//! Bounded table of currently-held notes.
//!
//! Every `NoteOn` claims a slot here for as long as the key is physically
//! held (independent of whether the pedal is keeping a voice sounding after
//! release). The table backs two things: the allocator's "is this voice's
//! key still held" check (so a voice parked by the sustain pedal can be
//! reclaimed), and unison mode's "which note should reappear when the
//! current one releases" bookkeeping.

use arrayvec::ArrayVec;

/// Which voice (if any) is currently playing a held key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceAssignment {
    /// Not sounding on any voice - only reachable transiently.
    Off,
    /// Held in unison mode, but currently shadowed by a more recent note.
    Pending,
    /// Sounding, in unison mode, on every voice.
    Unison,
    /// Sounding, in polyphonic mode, on voice index `0`.
    Voice(usize),
}

#[derive(Clone, Copy, Debug)]
struct KeySlot {
    creator_id: u32,
    note: f32,
    velocity: f32,
    start_time: usize,
    start_order: u64,
    assignment: VoiceAssignment,
}

/// Fixed-capacity set of held-key slots. `CAPACITY` should be a power of
/// two; [`Self::find_free_slot`] relies on wrapping rotation through the
/// slot array, which works regardless but is tuned for that case.
pub struct KeyEventTable<const CAPACITY: usize = 16> {
    slots: ArrayVec<Option<KeySlot>, CAPACITY>,
    last_slot: usize,
    next_order: u64,
}

impl<const CAPACITY: usize> Default for KeyEventTable<CAPACITY> {
    fn default() -> Self {
        let mut slots = ArrayVec::new();
        for _ in 0..CAPACITY {
            slots.push(None);
        }
        KeyEventTable {
            slots,
            last_slot: 0,
            next_order: 0,
        }
    }
}

impl<const CAPACITY: usize> KeyEventTable<CAPACITY> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a free slot for a newly-held key, assigning it a fresh
    /// monotonically increasing `start_order`. Returns `None` (dropping
    /// the note) if the table is full.
    pub fn insert(
        &mut self,
        creator_id: u32,
        note: f32,
        velocity: f32,
        start_time: usize,
        assignment: VoiceAssignment,
    ) -> Option<usize> {
        let idx = self.find_free_slot()?;
        let order = self.next_order;
        self.next_order += 1;
        self.slots[idx] = Some(KeySlot {
            creator_id,
            note,
            velocity,
            start_time,
            start_order: order,
            assignment,
        });
        self.last_slot = idx;
        Some(idx)
    }

    fn find_free_slot(&self) -> Option<usize> {
        let n = self.slots.len();
        if n == 0 {
            return None;
        }
        for step in 1..=n {
            let idx = (self.last_slot + step) % n;
            if self.slots[idx].is_none() {
                return Some(idx);
            }
        }
        log::trace!("conformal_poly_input: key event table full, dropping note");
        None
    }

    #[must_use]
    pub fn find_by_creator_id(&self, creator_id: u32) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, Some(s) if s.creator_id == creator_id))
    }

    /// Slot holding the most recently-started `Pending` key, i.e. the note
    /// that should reappear when the currently-sounding unison note
    /// releases. Ties are broken by largest `start_order` (most recent).
    #[must_use]
    pub fn most_recent_pending(&self) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| match slot {
                Some(s) if s.assignment == VoiceAssignment::Pending => Some((idx, s.start_order)),
                _ => None,
            })
            .max_by_key(|(_, order)| *order)
            .map(|(idx, _)| idx)
    }

    pub fn clear_by_creator_id(&mut self, creator_id: u32) {
        for slot in &mut self.slots {
            if matches!(slot, Some(s) if s.creator_id == creator_id) {
                *slot = None;
            }
        }
    }

    /// Clears any slot currently assigned to `voice`. Used when a voice is
    /// stolen: the key that used to hold it no longer has anything sounding
    /// underneath it, so it must stop being reported as "live" by
    /// [`Self::has_live_key_for_voice`].
    pub fn clear_by_voice(&mut self, voice: usize) {
        for slot in &mut self.slots {
            if matches!(slot, Some(s) if s.assignment == VoiceAssignment::Voice(voice)) {
                *slot = None;
            }
        }
    }

    pub fn clear_slot(&mut self, idx: usize) {
        if let Some(slot) = self.slots.get_mut(idx) {
            *slot = None;
        }
    }

    pub fn clear_all(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.next_order = 0;
    }

    pub fn set_assignment(&mut self, idx: usize, assignment: VoiceAssignment) {
        if let Some(Some(slot)) = self.slots.get_mut(idx) {
            slot.assignment = assignment;
        }
    }

    #[must_use]
    pub fn note(&self, idx: usize) -> Option<f32> {
        self.slots.get(idx).and_then(|s| s.as_ref()).map(|s| s.note)
    }

    #[must_use]
    pub fn velocity(&self, idx: usize) -> Option<f32> {
        self.slots
            .get(idx)
            .and_then(|s| s.as_ref())
            .map(|s| s.velocity)
    }

    #[must_use]
    pub fn start_time(&self, idx: usize) -> Option<usize> {
        self.slots
            .get(idx)
            .and_then(|s| s.as_ref())
            .map(|s| s.start_time)
    }

    #[must_use]
    pub fn assignment(&self, idx: usize) -> Option<VoiceAssignment> {
        self.slots.get(idx).and_then(|s| s.as_ref()).map(|s| s.assignment)
    }

    /// The slot currently marked [`VoiceAssignment::Unison`], if any -
    /// unison mode keeps at most one key sounding at a time.
    #[must_use]
    pub fn find_unison_sounding(&self) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, Some(s) if s.assignment == VoiceAssignment::Unison))
    }

    #[must_use]
    pub fn creator_id(&self, idx: usize) -> Option<u32> {
        self.slots
            .get(idx)
            .and_then(|s| s.as_ref())
            .map(|s| s.creator_id)
    }

    /// Whether any held key is currently assigned to `voice`. Used by the
    /// allocator's second pass to find a voice that is sounding only
    /// because the sustain pedal is holding it, not because its key is
    /// still down.
    #[must_use]
    pub fn has_live_key_for_voice(&self, voice: usize) -> bool {
        self.slots.iter().any(|slot| {
            matches!(slot, Some(s) if s.assignment == VoiceAssignment::Voice(voice))
        })
    }
}
