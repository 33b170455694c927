//! Readings the simulated scale reports.

use std::sync::{Arc, PoisonError, RwLock};

use scale_proto::{ReadingKind, Weight};

/// Something that can answer "what does the scale read right now".
pub trait ReadingSource {
    fn reading(&self, kind: ReadingKind) -> Weight;
}

impl<T: ReadingSource + ?Sized> ReadingSource for &T {
    fn reading(&self, kind: ReadingKind) -> Weight {
        (**self).reading(kind)
    }
}

/// A fixed set of readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readings {
    pub gross: Weight,
    pub tare: Weight,
    pub net: Weight,
}

impl Readings {
    pub const fn get(&self, kind: ReadingKind) -> Weight {
        match kind {
            ReadingKind::Gross => self.gross,
            ReadingKind::Tare => self.tare,
            ReadingKind::Net => self.net,
        }
    }

    pub fn set(&mut self, kind: ReadingKind, value: Weight) {
        match kind {
            ReadingKind::Gross => self.gross = value,
            ReadingKind::Tare => self.tare = value,
            ReadingKind::Net => self.net = value,
        }
    }
}

impl Default for Readings {
    /// A 72.30 kg load on a 2.15 kg container.
    fn default() -> Self {
        Self {
            gross: Weight::new(7230),
            tare: Weight::new(215),
            net: Weight::new(7015),
        }
    }
}

impl ReadingSource for Readings {
    fn reading(&self, kind: ReadingKind) -> Weight {
        self.get(kind)
    }
}

/// Readings shared between the simulator and whoever updates them.
///
/// The simulator only reads. Writers hold a clone and call
/// [`SharedReadings::set`] or [`SharedReadings::replace`].
#[derive(Debug, Clone, Default)]
pub struct SharedReadings {
    inner: Arc<RwLock<Readings>>,
}

impl SharedReadings {
    pub fn new(readings: Readings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(readings)),
        }
    }

    /// Returns a copy of the current readings.
    pub fn snapshot(&self) -> Readings {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, kind: ReadingKind, value: Weight) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(kind, value);
    }

    pub fn replace(&self, readings: Readings) -> Readings {
        std::mem::replace(
            &mut *self.inner.write().unwrap_or_else(PoisonError::into_inner),
            readings,
        )
    }
}

impl ReadingSource for SharedReadings {
    fn reading(&self, kind: ReadingKind) -> Weight {
        self.snapshot().get(kind)
    }
}
