//! Scroll-spy: keeps the navigation's active section in sync with what is
//! on screen.
//!
//! Visibility is measured against a band of the viewport (the top 20% and
//! bottom 70% are excluded), so a section becomes active when its header
//! reaches the upper part of the screen. Changes are only reported when a
//! section's ratio crosses one of [`THRESHOLDS`] or its intersecting flag
//! flips.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::sections::SectionId;

pub const THRESHOLDS: [f64; 6] = [0.01, 0.1, 0.25, 0.5, 0.75, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBand {
    /// Fraction of the viewport height cut from the top.
    pub top_inset: f64,
    /// Fraction of the viewport height cut from the bottom.
    pub bottom_inset: f64,
}

impl Default for ViewportBand {
    fn default() -> Self {
        Self {
            top_inset: 0.20,
            bottom_inset: 0.70,
        }
    }
}

impl ViewportBand {
    fn edges(&self, viewport_height: f64) -> (f64, f64) {
        let top = viewport_height * self.top_inset;
        let bottom = viewport_height * (1.0 - self.bottom_inset);
        (top, bottom)
    }
}

/// One section's visibility, as reported by an intersection observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub section: SectionId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// A section's box relative to the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub section: SectionId,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn intersect(&self, viewport_height: f64, band: &ViewportBand) -> IntersectionEntry {
        let (band_top, band_bottom) = band.edges(viewport_height);
        let overlap = (self.top + self.height).min(band_bottom) - self.top.max(band_top);
        let is_intersecting = self.height > 0.0 && overlap >= 0.0;
        let ratio = if self.height > 0.0 {
            (overlap.max(0.0) / self.height).min(1.0)
        } else {
            0.0
        };
        IntersectionEntry {
            section: self.section,
            is_intersecting,
            ratio,
        }
    }
}

fn threshold_bucket(ratio: f64) -> usize {
    THRESHOLDS.iter().filter(|&&t| ratio >= t).count()
}

#[derive(Debug, Clone)]
pub struct SectionTracker {
    tracked: Vec<SectionId>,
    active: SectionId,
    latest: HashMap<SectionId, IntersectionEntry>,
    band: ViewportBand,
}

impl SectionTracker {
    pub fn new(tracked: &[SectionId]) -> Self {
        Self {
            tracked: tracked.to_vec(),
            active: SectionId::About,
            latest: HashMap::new(),
            band: ViewportBand::default(),
        }
    }

    pub fn active(&self) -> SectionId {
        self.active
    }

    /// Navigation click: the target becomes active right away, ahead of the
    /// smooth scroll catching up.
    pub fn scroll_to(&mut self, section: SectionId) {
        self.active = section;
    }

    /// Applies intersection changes and returns the active section.
    ///
    /// The most visible intersecting tracked section wins; with nothing
    /// intersecting the previous active section is kept.
    pub fn observe(&mut self, entries: &[IntersectionEntry]) -> SectionId {
        for entry in entries {
            if self.tracked.contains(&entry.section) {
                self.latest.insert(entry.section, *entry);
            }
        }

        let best = self
            .tracked
            .iter()
            .filter_map(|id| self.latest.get(id))
            .filter(|e| e.is_intersecting)
            .fold(None::<&IntersectionEntry>, |best, e| match best {
                Some(b) if b.ratio >= e.ratio => Some(b),
                _ => Some(e),
            });

        if let Some(best) = best {
            if best.section != self.active {
                debug!(section = best.section.as_str(), "Active section changed");
            }
            self.active = best.section;
        }
        self.active
    }

    /// Measures section boxes against the viewport band and feeds the
    /// entries whose threshold bucket changed into [`Self::observe`].
    /// Returns `None` when nothing crossed a threshold.
    pub fn measure(&mut self, bounds: &[SectionBounds], viewport_height: f64) -> Option<SectionId> {
        let changed: Vec<_> = bounds
            .iter()
            .filter(|b| self.tracked.contains(&b.section))
            .map(|b| b.intersect(viewport_height, &self.band))
            .filter(|entry| match self.latest.get(&entry.section) {
                Some(prev) => {
                    prev.is_intersecting != entry.is_intersecting
                        || threshold_bucket(prev.ratio) != threshold_bucket(entry.ratio)
                }
                None => true,
            })
            .collect();

        if changed.is_empty() {
            return None;
        }
        Some(self.observe(&changed))
    }
}
