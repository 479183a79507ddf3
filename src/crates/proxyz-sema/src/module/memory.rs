//! A module service over sources held in memory.

use std::collections::BTreeMap;

use proxyz_frontend::Interner;

use super::service::{ModuleDescriptor, ModuleService, import_paths, parse_sources};
use crate::errors::ServiceError;

/// Identity -> source files. Import paths resolve to the identity with the
/// same text; an import of an unknown identity is left out of the
/// dependency table.
#[derive(Debug, Default, Clone)]
pub struct InMemoryModules {
    modules: BTreeMap<String, Vec<(String, String)>>,
    requests: usize,
}

impl InMemoryModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a module built from `(file name, source)` pairs.
    pub fn with_module<I, N, S>(mut self, identity: &str, files: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        self.insert(identity, files);
        self
    }

    pub fn insert<I, N, S>(&mut self, identity: &str, files: I)
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(name, source)| (name.into(), source.into()))
            .collect();
        self.modules.insert(identity.to_string(), files);
    }

    /// How many times the service has been asked for a pattern or module.
    pub fn requests(&self) -> usize {
        self.requests
    }

    fn describe(&self, identity: &str, interner: &mut Interner) -> Option<ModuleDescriptor> {
        let files = self.modules.get(identity)?;
        let sources = files
            .iter()
            .map(|(name, source)| (name.as_str(), source.as_str()));
        let mut descriptor = parse_sources(identity, sources, interner);
        for path in import_paths(&descriptor) {
            if self.modules.contains_key(&path) {
                descriptor.dependencies.insert(path.clone(), path);
            }
        }
        Some(descriptor)
    }
}

impl ModuleService for InMemoryModules {
    fn load_pattern(
        &mut self,
        pattern: &str,
        interner: &mut Interner,
    ) -> Result<Vec<ModuleDescriptor>, ServiceError> {
        self.requests += 1;
        if pattern.is_empty() {
            return Err(ServiceError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "empty pattern".to_string(),
            });
        }
        let identities: Vec<String> = self
            .modules
            .keys()
            .filter(|identity| pattern_matches(pattern, identity))
            .cloned()
            .collect();
        Ok(identities
            .iter()
            .filter_map(|identity| self.describe(identity, interner))
            .collect())
    }

    fn load_module(
        &mut self,
        identity: &str,
        interner: &mut Interner,
    ) -> Result<ModuleDescriptor, ServiceError> {
        self.requests += 1;
        self.describe(identity, interner)
            .ok_or_else(|| ServiceError::UnknownModule {
                identity: identity.to_string(),
            })
    }
}

/// `pattern` names `identity` exactly, or `prefix/...` names the prefix and
/// everything below it.
fn pattern_matches(pattern: &str, identity: &str) -> bool {
    if pattern == "..." {
        return true;
    }
    match pattern.strip_suffix("/...") {
        Some(prefix) => {
            identity == prefix
                || identity
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
        None => identity == pattern,
    }
}
