use crate::constants::{SCHEMA_FILE_EXTENSION, SCHEMA_FILE_SUFFIX};
use crate::error::SmoothError;
use crate::schema::SchemaDefinition;
use anyhow::{Context, Result, anyhow};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::DfsPostOrder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A schema definition file and its parsed contents
#[derive(Debug, Clone)]
pub struct SchemaFile {
    /// File stem, e.g. `PostsSchema`
    pub identity: String,
    pub path: PathBuf,
    pub definition: SchemaDefinition,
}

/// Configuration for schema loading
#[derive(Debug, Clone)]
pub struct SchemaLoaderConfig {
    pub schema_dir: PathBuf,
}

impl SchemaLoaderConfig {
    pub fn new(schema_dir: PathBuf) -> Self {
        Self { schema_dir }
    }
}

/// Handles discovery, parsing, and run-first ordering of schema files
pub struct SchemaLoader {
    config: SchemaLoaderConfig,
}

impl SchemaLoader {
    pub fn new(config: SchemaLoaderConfig) -> Self {
        Self { config }
    }

    /// Load every schema, each preceded by the schemas it must run after
    pub fn load_ordered_schema_files(&self) -> Result<Vec<SchemaFile>> {
        let paths = self.discover_schema_files()?;
        let files = paths
            .iter()
            .map(|path| self.parse_schema_file(path))
            .collect::<Result<Vec<_>>>()?;

        order_by_run_first(files)
    }

    /// Load one schema by identity
    pub fn load_schema(&self, identity: &str) -> Result<SchemaFile> {
        let path = self.schema_path(identity);
        if !path.is_file() {
            return Err(anyhow!(
                "Schema {} not found at {}",
                identity,
                path.display()
            ));
        }
        self.parse_schema_file(&path)
    }

    pub fn schema_path(&self, identity: &str) -> PathBuf {
        self.config
            .schema_dir
            .join(format!("{}.{}", identity, SCHEMA_FILE_EXTENSION))
    }

    /// Discover `*Schema.yaml` files, sorted by file name
    fn discover_schema_files(&self) -> Result<Vec<PathBuf>> {
        if !self.config.schema_dir.is_dir() {
            debug!(
                "Schema directory {} does not exist",
                self.config.schema_dir.display()
            );
            return Ok(Vec::new());
        }

        let pattern = self
            .config
            .schema_dir
            .join(format!("*{}.{}", SCHEMA_FILE_SUFFIX, SCHEMA_FILE_EXTENSION));
        let pattern = pattern.to_string_lossy();

        let mut files = glob::glob(&pattern)
            .with_context(|| format!("Invalid schema glob pattern {}", pattern))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to read schema directory")?;
        files.retain(|p| p.is_file());

        // Sort alphabetically for deterministic ordering
        files.sort();

        Ok(files)
    }

    fn parse_schema_file(&self, path: &Path) -> Result<SchemaFile> {
        let identity = identity_of(path)?;
        let definition = SchemaDefinition::load(&identity, path)
            .with_context(|| format!("Failed to load schema file {}", path.display()))?;

        Ok(SchemaFile {
            identity,
            path: path.to_path_buf(),
            definition,
        })
    }
}

/// `blog_posts` -> `BlogPostsSchema`; names already ending in the suffix are kept
pub fn schema_identity(name: &str) -> String {
    let studly = crate::migrate::generation::studly(name);
    if studly.ends_with(SCHEMA_FILE_SUFFIX) && studly != SCHEMA_FILE_SUFFIX {
        studly
    } else {
        format!("{}{}", studly, SCHEMA_FILE_SUFFIX)
    }
}

fn identity_of(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Invalid schema file name: {}", path.display()))
}

/// Order schemas so every schema comes after its run-first dependencies,
/// keeping file name order otherwise.
pub fn order_by_run_first(files: Vec<SchemaFile>) -> Result<Vec<SchemaFile>> {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..files.len()).map(|i| graph.add_node(i)).collect();
    let index: HashMap<&str, NodeIndex> = files
        .iter()
        .zip(&nodes)
        .map(|(f, node)| (f.identity.as_str(), *node))
        .collect();

    for (file, node) in files.iter().zip(&nodes) {
        // neighbors() reverses insertion order and the DFS stack reverses it back
        for dependency in &file.definition.run_first {
            let Some(target) = index.get(dependency.as_str()) else {
                return Err(SmoothError::MissingDependency {
                    schema: file.identity.clone(),
                    dependency: dependency.clone(),
                }
                .into());
            };
            graph.add_edge(*node, *target, ());
        }
    }

    for component in tarjan_scc(&graph) {
        let is_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|n| graph.contains_edge(*n, *n));
        if !is_cycle {
            continue;
        }

        let schema = component[0];
        let dependency = graph
            .neighbors(schema)
            .find(|n| component.contains(n))
            .unwrap_or(schema);
        return Err(SmoothError::CircularDependency {
            schema: files[graph[schema]].identity.clone(),
            dependency: files[graph[dependency]].identity.clone(),
        }
        .into());
    }

    let mut dfs = DfsPostOrder::empty(&graph);
    let mut order = Vec::with_capacity(files.len());
    for node in &nodes {
        dfs.move_to(*node);
        while let Some(visited) = dfs.next(&graph) {
            order.push(graph[visited]);
        }
    }

    let mut slots: Vec<Option<SchemaFile>> = files.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect())
}
