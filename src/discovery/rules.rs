//! Include / exclude glob rules for feature discovery

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

/// Patterns used when the configuration names none
pub const DEFAULT_INCLUDE: &[&str] = &["**/*.feature"];

/// Which files under the feature directory are feature files
#[derive(Debug, Clone)]
pub struct DiscoveryRules {
    include: GlobSet,
    exclude: GlobSet,
}

impl Default for DiscoveryRules {
    fn default() -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in DEFAULT_INCLUDE {
            if let Ok(glob) = Glob::new(pattern) {
                builder.add(glob);
            }
        }
        Self {
            include: builder.build().unwrap_or_else(|_| GlobSet::empty()),
            exclude: GlobSet::empty(),
        }
    }
}

impl DiscoveryRules {
    /// Compile patterns; an empty include list falls back to [`DEFAULT_INCLUDE`]
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, globset::Error> {
        let include = if include.is_empty() {
            build_set(DEFAULT_INCLUDE)?
        } else {
            build_set(include)?
        };
        Ok(Self {
            include,
            exclude: build_set(exclude)?,
        })
    }

    /// Check a path relative to the feature directory
    pub fn is_selected(&self, relative: &Path) -> bool {
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }
}

fn build_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref().trim();
        if !pattern.is_empty() {
            builder.add(Glob::new(pattern)?);
        }
    }
    builder.build()
}
