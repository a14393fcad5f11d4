//! Cache-populating dependency queries
//!
//! Every query follows the same path: look up the cache, and on a miss run
//! Maven, parse its output, store the result and return it.

use crate::cache::{CacheKind, CacheSettings, CacheStats, TieredCache};
use crate::config::schema::MavenConfig;
use crate::config::{Config, ConfigManager};
use crate::deps::{parse_list, parse_tree, DependencyNode, ResolvedDependency};
use crate::error::{PomlensError, PomlensResult};
use crate::maven::{diagnostic_tail, goal_args, DependencyTool, Goal, MavenRunner};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Dependency queries backed by the tiered cache
pub struct DependencyService {
    cache: TieredCache,
    tool: Box<dyn DependencyTool>,
    maven: MavenConfig,
    caching: bool,
}

impl DependencyService {
    pub fn new(cache: TieredCache, tool: Box<dyn DependencyTool>, maven: MavenConfig) -> Self {
        Self {
            cache,
            tool,
            maven,
            caching: true,
        }
    }

    /// Build the service for a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        let cache = TieredCache::open(
            &ConfigManager::cache_dir(config),
            CacheSettings::from_config(&config.cache),
        );
        let runner = MavenRunner::new(config.maven.clone());
        Self::new(cache, Box::new(runner), config.maven.clone()).with_caching(config.cache.enabled)
    }

    /// Turn result caching on or off; the tool runs on every call when off
    pub fn with_caching(mut self, enabled: bool) -> Self {
        self.caching = enabled;
        self
    }

    pub fn cache(&self) -> &TieredCache {
        &self.cache
    }

    pub fn tool_name(&self) -> &str {
        self.tool.tool_name()
    }

    /// Dependency forest for `pom`
    pub async fn dependency_tree(
        &self,
        pom: &Path,
        refresh: bool,
    ) -> PomlensResult<Vec<DependencyNode>> {
        self.query(pom, CacheKind::DependencyTree, Goal::DependencyTree, refresh, |out| {
            Ok(parse_tree(out))
        })
        .await
    }

    /// Flat resolved dependency list for `pom`
    pub async fn resolved_dependencies(
        &self,
        pom: &Path,
        refresh: bool,
    ) -> PomlensResult<Vec<ResolvedDependency>> {
        self.query(
            pom,
            CacheKind::ResolvedDependencies,
            Goal::DependencyList,
            refresh,
            |out| Ok(parse_list(out)),
        )
        .await
    }

    /// Effective POM document for `pom`
    pub async fn effective_pom(&self, pom: &Path, refresh: bool) -> PomlensResult<String> {
        self.query(pom, CacheKind::EffectivePom, Goal::EffectivePom, refresh, |out| {
            extract_effective_pom(out)
        })
        .await
    }

    /// Drop every cached result for `pom`
    ///
    /// The file need not exist any more; entries of a deleted or moved POM
    /// are still found under the path they were cached with.
    pub async fn invalidate(&self, pom: &Path) -> PomlensResult<()> {
        let pom = cached_path(pom)?;
        self.cache.invalidate(&pom).await;
        Ok(())
    }

    pub async fn clear_all(&self) {
        self.cache.clear_all().await;
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    async fn query<T, F>(
        &self,
        pom: &Path,
        kind: CacheKind,
        goal: Goal,
        refresh: bool,
        parse: F,
    ) -> PomlensResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&str) -> PomlensResult<T>,
    {
        let pom = resolve_pom(pom)?;

        if self.caching {
            if let Some(cached) = self.cache.get::<T>(&pom, kind, refresh).await {
                return Ok(cached);
            }
        }

        let cwd = pom.parent().unwrap_or_else(|| Path::new("."));
        let args = goal_args(&self.maven, goal, &pom);
        info!("Running {} {} for {}", self.tool.tool_name(), goal.as_str(), pom.display());
        let output = self.tool.run(&args, cwd).await?;

        let value = parse(&output.stdout)?;
        if self.caching {
            self.cache.set(&pom, kind, &value).await?;
        } else {
            debug!("Caching disabled, not storing {} ({})", pom.display(), kind);
        }
        Ok(value)
    }
}

/// Canonical absolute path of an existing POM
fn resolve_pom(pom: &Path) -> PomlensResult<PathBuf> {
    if !pom.is_file() {
        return Err(PomlensError::PathNotFound(pom.to_path_buf()));
    }
    std::fs::canonicalize(pom)
        .map_err(|e| PomlensError::io(format!("resolving {}", pom.display()), e))
}

/// Path a POM was cached under, derived without requiring the file
///
/// Mirrors `resolve_pom`: the canonical path when the file exists, else the
/// canonical parent joined with the file name, else the absolute path.
fn cached_path(pom: &Path) -> PomlensResult<PathBuf> {
    if let Ok(canonical) = std::fs::canonicalize(pom) {
        return Ok(canonical);
    }

    let parent = match pom.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if let (Ok(dir), Some(name)) = (std::fs::canonicalize(parent), pom.file_name()) {
        return Ok(dir.join(name));
    }

    std::path::absolute(pom)
        .map_err(|e| PomlensError::io(format!("resolving {}", pom.display()), e))
}

/// Cut the XML document out of `help:effective-pom` output
pub fn extract_effective_pom(stdout: &str) -> PomlensResult<String> {
    let start = stdout.find("<?xml").or_else(|| stdout.find("<project"));
    let end = stdout
        .rfind("</project>")
        .map(|idx| idx + "</project>".len());

    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(stdout[start..end].to_string()),
        _ => Err(PomlensError::tool_failure(
            Goal::EffectivePom.as_str(),
            diagnostic_tail(stdout, ""),
        )),
    }
}
