use std::collections::HashMap;

use crate::errors::{Error, Result};
use crate::paramset::ParamSet;
use crate::sampler::{RandomSampler, Sampler, ZeroTwoSequenceSampler};

pub type SamplerFactory = fn(&mut ParamSet) -> Result<Box<dyn Sampler>>;

lazy_static! {
    /// Samplers known to the renderer, keyed by the name used in
    /// configuration.
    pub static ref REGISTRY: SamplerRegistry = SamplerRegistry::with_builtins();
}

/// Maps sampler names to the functions that build them.
pub struct SamplerRegistry {
    factories: HashMap<&'static str, SamplerFactory>,
}

impl SamplerRegistry {
    pub fn new() -> SamplerRegistry {
        SamplerRegistry {
            factories: HashMap::new(),
        }
    }

    pub fn with_builtins() -> SamplerRegistry {
        let mut registry = SamplerRegistry::new();
        registry.register("random", RandomSampler::create);
        registry.register("02sequence", ZeroTwoSequenceSampler::create);
        registry.register("lowdiscrepancy", ZeroTwoSequenceSampler::create);
        registry
    }

    pub fn register(&mut self, name: &'static str, factory: SamplerFactory) {
        if self.factories.insert(name, factory).is_some() {
            warn!(slog_scope::logger(), "Sampler \"{}\" registered twice", name);
        }
    }

    pub fn create(&self, name: &str, params: &mut ParamSet) -> Result<Box<dyn Sampler>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::UnknownSampler(name.to_owned()))?;
        let sampler = factory(params)?;
        info!(
            slog_scope::logger(),
            "Created \"{}\" sampler with {} samples per pixel",
            name,
            sampler.samples_per_pixel()
        );
        params.report_unused();
        Ok(sampler)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for SamplerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Look `name` up in the process-wide registry and build the sampler.
pub fn make_sampler(name: &str, params: &mut ParamSet) -> Result<Box<dyn Sampler>> {
    REGISTRY.create(name, params)
}
