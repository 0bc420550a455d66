// File: crates/linetool-core/src/magnet.rs
// Summary: Snap-to-price collaborator interface; enabled while dragging, disabled on release.

/// External snapping assist. The controller enables it while an anchor is
/// being dragged and disables it on pointer release; `align` may pull the
/// dragged price onto a nearby OHLC value.
pub trait Magnet {
    fn enable(&mut self);
    fn disable(&mut self);
    fn align(&self, price: f64, timestamp: f64) -> f64;
}

/// Magnet that never snaps.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMagnet;

impl Magnet for NoMagnet {
    fn enable(&mut self) {}

    fn disable(&mut self) {}

    fn align(&self, price: f64, _timestamp: f64) -> f64 {
        price
    }
}

/// Magnet snapping to a fixed candidate list within a price threshold; enough
/// for tests and the demo, where the host chart supplies OHLC values.
#[derive(Clone, Debug)]
pub struct CandidateMagnet {
    pub candidates: Vec<f64>,
    pub threshold: f64,
    enabled: bool,
}

impl CandidateMagnet {
    pub fn new(candidates: Vec<f64>, threshold: f64) -> Self {
        Self { candidates, threshold, enabled: false }
    }
}

impl Magnet for CandidateMagnet {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn align(&self, price: f64, _timestamp: f64) -> f64 {
        if !self.enabled {
            return price;
        }
        let nearest = self
            .candidates
            .iter()
            .copied()
            .min_by(|a, b| (a - price).abs().total_cmp(&(b - price).abs()));
        match nearest {
            Some(candidate) if (candidate - price).abs() <= self.threshold => candidate,
            _ => price,
        }
    }
}
