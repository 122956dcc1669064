//! Command-line interface for the migration assistant client.
//!
//! Commands operate on the persisted session: `analyze` starts one, the edit
//! commands mutate the stored structure through the session, and `migrate`
//! submits it and writes the returned archive. `CliContext::execute` returns
//! the rendered output so integration tests can drive commands directly.

use crate::config::{xdg, RemoldConfig};
use crate::error::ApiError;
use crate::migrator::{HttpMigratorClient, MigratorApi};
use crate::session::{EditSession, FileField, SessionEdit};
use crate::store::{persistence::SledDocumentStore, DocumentStore};
use crate::tree::{parse_list, Document, FileRecord, Path as TreePath, StructureNode};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Remold CLI - assisted migration of legacy projects
#[derive(Parser)]
#[command(name = "remold")]
#[command(about = "Analyze a legacy project, edit the inferred target structure, and convert it")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Store database path (overrides configuration)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a source project and start an edit session
    Analyze {
        /// Repository URL to analyze
        #[arg(long)]
        repo_url: Option<String>,

        /// Project archive (zip) to upload instead of a URL
        #[arg(long)]
        archive: Option<PathBuf>,
    },
    /// Render the current target structure
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Add a file or folder to the structure
    Add {
        #[command(subcommand)]
        command: AddCommands,
    },
    /// Delete a file or folder
    Rm {
        /// Path of the node, e.g. src/App.jsx
        path: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Edit fields of a file
    Set {
        /// Path of the file, e.g. src/App.jsx
        path: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        namespace: Option<String>,

        #[arg(long)]
        file_type: Option<String>,

        /// Comma-separated source file paths
        #[arg(long)]
        source_files: Option<String>,

        /// Comma-separated dependency names
        #[arg(long)]
        dependencies: Option<String>,

        /// Migration complexity (low, medium, high)
        #[arg(long)]
        complexity: Option<String>,
    },
    /// Generate description and file type for a file
    Recommend {
        /// Path of the file, e.g. src/App.jsx
        path: String,

        /// Write the recommendation into the structure
        #[arg(long)]
        apply: bool,
    },
    /// List selectable source files from the analysis report
    Sources,
    /// Submit the structure and write the migrated project archive
    Migrate {
        /// Output archive path
        #[arg(long, default_value = "migrated-project.zip")]
        output: PathBuf,

        /// One-shot: migrate a repository directly, skipping the session
        #[arg(long)]
        repo_url: Option<String>,

        /// One-shot: migrate a local archive directly, skipping the session
        #[arg(long)]
        archive: Option<PathBuf>,
    },
    /// Convert a single code snippet
    Convert {
        /// Snippet file; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Comma-separated file types the snippet involves
        #[arg(long)]
        types: String,

        /// Write converted code here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show session status
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum AddCommands {
    /// Add a file under a folder (top level when --parent is omitted)
    File {
        /// Name of the new file
        name: String,

        /// Parent folder path, e.g. src/components
        #[arg(long)]
        parent: Option<String>,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        file_type: String,

        #[arg(long, default_value = "")]
        namespace: String,

        /// Comma-separated source file paths
        #[arg(long)]
        source_files: Option<String>,

        /// Comma-separated dependency names
        #[arg(long)]
        dependencies: Option<String>,

        /// Migration complexity (low, medium, high)
        #[arg(long)]
        complexity: Option<String>,
    },
    /// Add a folder (top level when --parent is omitted)
    Folder {
        /// Name of the new folder
        name: String,

        /// Parent folder path, e.g. src
        #[arg(long)]
        parent: Option<String>,
    },
}

/// Execution context: configuration plus the store and backend ports.
pub struct CliContext {
    store: Arc<dyn DocumentStore>,
    migrator: Box<dyn MigratorApi>,
}

impl CliContext {
    /// Build the production context: sled store and HTTP client from config.
    pub fn new(config: &RemoldConfig, store_override: Option<PathBuf>) -> Result<Self, ApiError> {
        let store_path = match store_override.or_else(|| config.storage.path.clone()) {
            Some(path) => path,
            None => xdg::store_dir()?,
        };
        let store = Arc::new(SledDocumentStore::open(&store_path)?);
        let migrator = Box::new(HttpMigratorClient::new(&config.backend)?);
        Ok(CliContext::with_parts(store, migrator))
    }

    /// Build a context over explicit ports. Used by tests.
    pub fn with_parts(store: Arc<dyn DocumentStore>, migrator: Box<dyn MigratorApi>) -> Self {
        CliContext { store, migrator }
    }

    /// Execute a command, returning its rendered output.
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Analyze { repo_url, archive } => self.analyze(repo_url, archive).await,
            Commands::Show { format } => self.show(format),
            Commands::Add { command } => self.add(command),
            Commands::Rm { path, yes } => self.rm(path, *yes),
            Commands::Set {
                path,
                description,
                namespace,
                file_type,
                source_files,
                dependencies,
                complexity,
            } => self.set(
                path,
                description,
                namespace,
                file_type,
                source_files,
                dependencies,
                complexity,
            ),
            Commands::Recommend { path, apply } => self.recommend(path, *apply).await,
            Commands::Sources => self.sources(),
            Commands::Migrate {
                output,
                repo_url,
                archive,
            } => self.migrate(output, repo_url, archive).await,
            Commands::Convert {
                input,
                types,
                output,
            } => self.convert(input, types, output).await,
            Commands::Status { format } => self.status(format),
        }
    }

    async fn analyze(
        &self,
        repo_url: &Option<String>,
        archive: &Option<PathBuf>,
    ) -> Result<String, ApiError> {
        let outcome = match (repo_url, archive) {
            (Some(url), None) => self.migrator.analyze_repo(url).await?,
            (None, Some(path)) => {
                let bytes = std::fs::read(path)?;
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("project.zip");
                self.migrator.analyze_archive(file_name, bytes).await?
            }
            _ => {
                return Err(ApiError::InvalidInput(
                    "provide exactly one of --repo-url or --archive".to_string(),
                ))
            }
        };

        let session = EditSession::from_analysis(outcome, self.store.clone())?;
        let mut out = String::new();
        out.push_str(&format!("{}\n\n", section_heading("Analysis complete")));
        out.push_str(&format!("Project: {}\n", session.project_id()));
        if let Some(summary) = session
            .analysis_results()
            .and_then(|results| results.get("summary"))
            .and_then(|summary| summary.as_object())
        {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Metric", "Value"]);
            for (key, value) in summary {
                table.add_row(vec![key.replace('_', " "), render_scalar(value)]);
            }
            out.push_str(&format!("\n{}\n", table));
        }
        out.push_str(&format!("\n{}\n\n", section_heading("Target structure")));
        out.push_str(&render_tree(session.document()));
        Ok(out)
    }

    fn show(&self, format: &str) -> Result<String, ApiError> {
        let session = self.session()?;
        match format {
            "json" => serde_json::to_string_pretty(session.document().as_value())
                .map_err(|e| ApiError::InvalidInput(format!("failed to render document: {}", e))),
            _ => Ok(render_tree(session.document())),
        }
    }

    fn add(&self, command: &AddCommands) -> Result<String, ApiError> {
        let mut session = self.session()?;
        match command {
            AddCommands::File {
                name,
                parent,
                description,
                file_type,
                namespace,
                source_files,
                dependencies,
                complexity,
            } => {
                if name.trim().is_empty() {
                    return Err(ApiError::InvalidInput("file name must not be blank".to_string()));
                }
                let seed = FileRecord {
                    description: description.clone(),
                    file_type: file_type.clone(),
                    namespace: namespace.clone(),
                    source_files: source_files.as_deref().map(parse_list).unwrap_or_default(),
                    dependencies: dependencies.as_deref().map(parse_list),
                    migration_complexity: complexity
                        .as_deref()
                        .map(|c| c.parse().map_err(ApiError::InvalidInput))
                        .transpose()?,
                    ..FileRecord::default()
                };
                let parent = self.parent_path(session.document(), parent.as_deref())?;
                session.apply(SessionEdit::AddFile {
                    parent,
                    name: name.clone(),
                    seed: Some(seed),
                })?;
                info!(name = %name, "file added");
                Ok(format!(
                    "Added file '{}'\n\n{}",
                    name,
                    render_tree(session.document())
                ))
            }
            AddCommands::Folder { name, parent } => {
                if name.trim().is_empty() {
                    return Err(ApiError::InvalidInput(
                        "folder name must not be blank".to_string(),
                    ));
                }
                let parent = self.parent_path(session.document(), parent.as_deref())?;
                session.apply(SessionEdit::AddFolder {
                    parent,
                    name: name.clone(),
                })?;
                info!(name = %name, "folder added");
                Ok(format!(
                    "Added folder '{}'\n\n{}",
                    name,
                    render_tree(session.document())
                ))
            }
        }
    }

    fn rm(&self, display_path: &str, yes: bool) -> Result<String, ApiError> {
        let mut session = self.session()?;
        let raw = self.locate(session.document(), display_path)?;
        let is_file = session
            .document()
            .node_at(&raw)
            .map(|node| node.is_file())
            .unwrap_or(false);

        if !yes {
            let kind = if is_file { "file" } else { "folder" };
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!("Delete {} '{}'?", kind, display_path))
                .default(false)
                .interact()
                .map_err(|e| ApiError::InvalidInput(format!("confirmation failed: {}", e)))?;
            if !confirmed {
                return Ok("Aborted.".to_string());
            }
        }

        session.apply(SessionEdit::Delete { path: raw })?;
        Ok(format!(
            "Deleted '{}'\n\n{}",
            display_path,
            render_tree(session.document())
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn set(
        &self,
        display_path: &str,
        description: &Option<String>,
        namespace: &Option<String>,
        file_type: &Option<String>,
        source_files: &Option<String>,
        dependencies: &Option<String>,
        complexity: &Option<String>,
    ) -> Result<String, ApiError> {
        let mut session = self.session()?;
        let raw = self.locate(session.document(), display_path)?;
        if session.document().file_at(&raw).is_none() {
            return Err(ApiError::InvalidInput(format!(
                "'{}' is not a file",
                display_path
            )));
        }

        let mut fields: Vec<FileField> = Vec::new();
        if let Some(value) = description {
            fields.push(FileField::Description(value.clone()));
        }
        if let Some(value) = namespace {
            fields.push(FileField::Namespace(value.clone()));
        }
        if let Some(value) = file_type {
            fields.push(FileField::FileType(value.clone()));
        }
        if let Some(value) = source_files {
            fields.push(FileField::SourceFiles(parse_list(value)));
        }
        if let Some(value) = dependencies {
            fields.push(FileField::Dependencies(parse_list(value)));
        }
        if let Some(value) = complexity {
            fields.push(FileField::Complexity(
                value.parse().map_err(ApiError::InvalidInput)?,
            ));
        }
        if fields.is_empty() {
            return Err(ApiError::InvalidInput(
                "provide at least one field to set".to_string(),
            ));
        }

        for field in fields {
            session.apply(SessionEdit::SetField {
                path: raw.clone(),
                field,
            })?;
        }
        Ok(format!("Updated '{}'", display_path))
    }

    async fn recommend(&self, display_path: &str, apply: bool) -> Result<String, ApiError> {
        let mut session = self.session()?;
        let raw = self.locate(session.document(), display_path)?;
        let record = session.document().file_at(&raw).ok_or_else(|| {
            ApiError::InvalidInput(format!("'{}' is not a file", display_path))
        })?;

        let recommendation = self.migrator.recommend(&record.file_name).await?;
        let mut out = format!(
            "Description: {}\nFile type:   {}\n",
            recommendation.description, recommendation.file_type
        );
        if apply {
            session.apply(SessionEdit::ApplyRecommendation {
                path: raw,
                recommendation,
            })?;
            out.push_str("\nApplied to structure.\n");
        }
        Ok(out)
    }

    fn sources(&self) -> Result<String, ApiError> {
        let session = self.session()?;
        let candidates = session.source_candidates();
        if candidates.is_empty() {
            return Ok("No source files in the analysis report.".to_string());
        }
        Ok(candidates.join("\n"))
    }

    async fn migrate(
        &self,
        output: &PathBuf,
        repo_url: &Option<String>,
        archive: &Option<PathBuf>,
    ) -> Result<String, ApiError> {
        let bytes = match (repo_url, archive) {
            (Some(_), Some(_)) => {
                return Err(ApiError::InvalidInput(
                    "provide at most one of --repo-url or --archive".to_string(),
                ))
            }
            (Some(url), None) => self.migrator.migrate_repo(url).await?,
            (None, Some(path)) => {
                let data = std::fs::read(path)?;
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("project.zip");
                self.migrator.migrate_archive(file_name, data).await?
            }
            (None, None) => {
                let mut session = self.session()?;
                session.save(self.migrator.as_ref()).await?
            }
        };
        std::fs::write(output, &bytes)?;
        info!(path = %output.display(), size = bytes.len(), "migration archive written");
        Ok(format!(
            "Migration complete: wrote {} bytes to {}",
            bytes.len(),
            output.display()
        ))
    }

    async fn convert(
        &self,
        input: &Option<PathBuf>,
        types: &str,
        output: &Option<PathBuf>,
    ) -> Result<String, ApiError> {
        let source = match input {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };
        if source.trim().is_empty() {
            return Err(ApiError::InvalidInput("snippet is empty".to_string()));
        }
        let file_types = parse_list(types);
        if file_types.is_empty() {
            return Err(ApiError::InvalidInput(
                "provide at least one file type via --types".to_string(),
            ));
        }

        let converted = self.migrator.convert_snippet(&source, &file_types).await?;
        match output {
            Some(path) => {
                std::fs::write(path, &converted)?;
                Ok(format!("Converted snippet written to {}", path.display()))
            }
            None => Ok(converted),
        }
    }

    fn status(&self, format: &str) -> Result<String, ApiError> {
        let session = self.session()?;
        let counts = session.document().count_nodes();
        if format == "json" {
            let value = json!({
                "project_id": session.project_id(),
                "changes": session.changes(),
                "files": counts.files,
                "folders": counts.folders,
            });
            return serde_json::to_string_pretty(&value)
                .map_err(|e| ApiError::InvalidInput(format!("failed to render status: {}", e)));
        }
        let mut out = format!("{}\n\n", section_heading("Session"));
        out.push_str(&format!("  Project: {}\n", session.project_id()));
        out.push_str(&format!(
            "  Changes: {}\n",
            if session.changes() { "yes" } else { "no" }
        ));
        out.push_str(&format!("  Files: {}\n", counts.files));
        out.push_str(&format!("  Folders: {}\n", counts.folders));
        Ok(out)
    }

    fn session(&self) -> Result<EditSession, ApiError> {
        EditSession::restore(self.store.clone())?.ok_or(ApiError::NoSession)
    }

    /// Map a user-facing node path to its raw document path.
    fn locate(&self, document: &Document, display_path: &str) -> Result<TreePath, ApiError> {
        let segments: Vec<String> = display_path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        document
            .locate(&segments)
            .ok_or_else(|| ApiError::InvalidInput(format!("no such node: {}", display_path)))
    }

    /// Map an optional user-facing folder path to a raw parent path.
    /// Existing folders are resolved in place; missing ones map to canonical
    /// `folders` containers so the permissive write creates them.
    fn parent_path(
        &self,
        document: &Document,
        parent: Option<&str>,
    ) -> Result<TreePath, ApiError> {
        let parent = match parent {
            Some(p) if !p.trim().is_empty() => p,
            _ => return Ok(Vec::new()),
        };

        let mut raw: TreePath = Vec::new();
        for segment in parent.split('/').filter(|s| !s.is_empty()) {
            let mut extended = raw.clone();
            extended.push("folders".to_string());
            extended.push(segment.to_string());
            if document.resolve(&extended).is_none() {
                // Fall back to a flat-form folder bound directly under the
                // current node; otherwise target the canonical container and
                // let the write create it.
                let mut flat = raw.clone();
                flat.push(segment.to_string());
                if let Some(value) = document.resolve(&flat) {
                    if crate::tree::is_file_shaped(value) {
                        return Err(ApiError::InvalidInput(format!(
                            "'{}' is a file, not a folder",
                            parent
                        )));
                    }
                    raw = flat;
                    continue;
                }
            }
            raw = extended;
        }
        Ok(raw)
    }
}

fn section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn render_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render the document in display order, two spaces per nesting level.
pub fn render_tree(document: &Document) -> String {
    let mut out = String::new();
    for rendered in document.render_order() {
        let indent = "  ".repeat(rendered.depth);
        match &rendered.node {
            StructureNode::Folder(_) => {
                out.push_str(&format!("{}{}/\n", indent, rendered.name().blue().bold()));
            }
            StructureNode::File(record) => {
                if record.file_type.is_empty() {
                    out.push_str(&format!("{}{}\n", indent, rendered.name()));
                } else {
                    out.push_str(&format!(
                        "{}{} {}\n",
                        indent,
                        rendered.name(),
                        format!("[{}]", record.file_type).dimmed()
                    ));
                }
            }
        }
    }
    if out.is_empty() {
        out.push_str("(empty structure)\n");
    }
    out
}
