use crate::core::{Detector, Finding};
use std::sync::Arc;

/// Ordered detector list. Registration order is the output order of the
/// engine, so it is part of each engine's contract.
pub struct DetectorRegistry<F: Finding> {
    detectors: Vec<Arc<dyn Detector<Finding = F>>>,
}

impl<F: Finding> DetectorRegistry<F> {
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Registering an id twice replaces the earlier detector in place.
    pub fn register<D: Detector<Finding = F> + 'static>(&mut self, detector: D) {
        let detector: Arc<dyn Detector<Finding = F>> = Arc::new(detector);
        match self.detectors.iter().position(|d| d.id() == detector.id()) {
            Some(index) => self.detectors[index] = detector,
            None => self.detectors.push(detector),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Detector<Finding = F>>> {
        self.detectors.iter().find(|d| d.id() == id).cloned()
    }

    pub fn all(&self) -> &[Arc<dyn Detector<Finding = F>>] {
        &self.detectors
    }

    pub fn list_ids(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl<F: Finding> Default for DetectorRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DetectorRegistryBuilder<F: Finding> {
    registry: DetectorRegistry<F>,
}

impl<F: Finding> DetectorRegistryBuilder<F> {
    pub fn new() -> Self {
        Self {
            registry: DetectorRegistry::new(),
        }
    }

    pub fn with_detector<D: Detector<Finding = F> + 'static>(mut self, detector: D) -> Self {
        self.registry.register(detector);
        self
    }

    pub fn build(self) -> DetectorRegistry<F> {
        self.registry
    }
}

impl<F: Finding> Default for DetectorRegistryBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}
