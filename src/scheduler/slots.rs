use crate::model::{DateRange, ShiftSlot, SlotDef};
use chrono::NaiveDate;

/// Suite finie de créneaux : par date croissante, puis dans l'ordre configuré.
/// Cloner la suite permet de la reparcourir depuis le début.
#[derive(Debug, Clone)]
pub struct SlotSequence<'a> {
    range: DateRange,
    slots: &'a [SlotDef],
    current: Option<NaiveDate>,
    index: usize,
}

impl<'a> SlotSequence<'a> {
    pub fn new(range: DateRange, slots: &'a [SlotDef]) -> Self {
        Self {
            range,
            slots,
            current: Some(range.start),
            index: 0,
        }
    }

    /// Nombre total de créneaux.
    pub fn total(&self) -> usize {
        usize::try_from(self.range.len_days()).unwrap_or(0) * self.slots.len()
    }
}

impl Iterator for SlotSequence<'_> {
    type Item = ShiftSlot;

    fn next(&mut self) -> Option<ShiftSlot> {
        if self.slots.is_empty() {
            return None;
        }
        let date = self.current.filter(|d| *d <= self.range.end)?;
        let slot = ShiftSlot {
            date,
            index: self.index,
            def: self.slots[self.index].clone(),
        };
        self.index += 1;
        if self.index == self.slots.len() {
            self.index = 0;
            self.current = date.succ_opt();
        }
        Some(slot)
    }
}
