//! Subcommand implementations
//!
//! Each command returns the text to print so it can be exercised without a
//! terminal.

use anyhow::{anyhow, bail, Context, Result};
use flexui_core::{
    ModificationOrchestrator, ModifierConfig, Oracle, TargetAddress, OPERATIONS,
};
use flexui_extract::ResponseExtractor;
use flexui_oracle::ChatCompletionsOracle;
use flexui_schema::{
    fallback_component_label, resolve_component_id, Breakpoint, DocumentHash, FlexibleContent,
    SchemaEnum,
};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Read and validate a document file
///
/// # Errors
/// Fails if the file cannot be read or is not a valid document
pub fn load_document(path: &Path) -> Result<FlexibleContent> {
    let text = read_text(path)?;
    FlexibleContent::from_json_str(&text)
        .with_context(|| format!("{} is not a valid document", path.display()))
}

/// `validate`: parse, validate and summarize a document
///
/// # Errors
/// Fails if the document is invalid
pub fn validate(path: &Path) -> Result<String> {
    let document = load_document(path)?;
    let hash = DocumentHash::of(&document)?;

    let mut out = String::new();
    writeln!(out, "valid document")?;
    writeln!(out, "layout: {}", document.layout.layout_type)?;
    writeln!(out, "sections: {}", document.sections.len())?;
    for section in document.sections.values() {
        writeln!(
            out,
            "  {} ({} components)",
            section.id,
            section.components.len()
        )?;
    }
    writeln!(out, "components: {}", document.component_count())?;
    write!(out, "fingerprint: {hash}")?;
    Ok(out)
}

/// `resolve`: map a dotted path to a component id
///
/// # Errors
/// Fails if the document is invalid
pub fn resolve(path: &Path, address: &str) -> Result<String> {
    let document = load_document(path)?;
    Ok(match resolve_component_id(&document, address) {
        Some(id) => id,
        None => match fallback_component_label(address) {
            Some(label) => format!("unresolved (unverified guess: {label})"),
            None => "unresolved".to_string(),
        },
    })
}

/// `extract`: recover a JSON object from a saved model reply
///
/// # Errors
/// Fails if no strategy recovers an object
pub fn extract(path: &Path) -> Result<String> {
    let reply = read_text(path)?;
    let extracted = ResponseExtractor::new().extract(&reply)?;
    Ok(format!(
        "strategy: {}\n{}",
        extracted.strategy,
        serde_json::to_string_pretty(&extracted.value)?
    ))
}

/// Breakpoint selection for `styles`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakpointChoice {
    Named(Breakpoint),
    Width(u32),
}

impl BreakpointChoice {
    /// Parse a wire name such as `max-md`
    ///
    /// # Errors
    /// Fails for unknown breakpoint names
    pub fn named(name: &str) -> Result<Self> {
        Breakpoint::from_name(name)
            .map(Self::Named)
            .ok_or_else(|| anyhow!("unknown breakpoint '{name}' (expected one of {})", Breakpoint::allowed()))
    }

    #[must_use]
    pub fn breakpoint(self) -> Breakpoint {
        match self {
            Self::Named(bp) => bp,
            Self::Width(px) => Breakpoint::for_viewport_width(px),
        }
    }
}

/// `styles`: effective declarations of one component at a breakpoint
///
/// # Errors
/// Fails if the document is invalid or has no such component
pub fn styles(path: &Path, component_id: &str, choice: BreakpointChoice) -> Result<String> {
    let document = load_document(path)?;
    let breakpoint = choice.breakpoint();
    let declarations = document
        .resolved_component_styles(component_id, breakpoint)
        .ok_or_else(|| anyhow!("no component '{component_id}' in {}", path.display()))?;
    Ok(format!(
        "breakpoint: {breakpoint}\n{}",
        serde_json::to_string_pretty(&declarations)?
    ))
}

/// Inputs of `modify`
#[derive(Debug, Clone, Default)]
pub struct ModifyOptions {
    pub document: PathBuf,
    pub instruction: String,
    pub target_id: Option<String>,
    pub path: Option<String>,
    pub config: Option<PathBuf>,
    pub out: Option<PathBuf>,
}

impl ModifyOptions {
    fn target(&self) -> Option<TargetAddress> {
        self.target_id
            .clone()
            .map(TargetAddress::Id)
            .or_else(|| self.path.clone().map(TargetAddress::Path))
    }
}

/// Load the config file if given, otherwise defaults
///
/// # Errors
/// Fails if the file cannot be read or holds invalid values
pub fn load_config(path: Option<&Path>) -> Result<ModifierConfig> {
    match path {
        Some(path) => ModifierConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ModifierConfig::default()),
    }
}

/// `modify` against the configured HTTP oracle
///
/// # Errors
/// Fails on missing credentials or any rejected modification
pub async fn modify(options: &ModifyOptions) -> Result<String> {
    let config = load_config(options.config.as_deref())?;
    let oracle = ChatCompletionsOracle::from_settings(&config.oracle)?;
    modify_with(options, &config, Arc::new(oracle)).await
}

/// `modify` with an injected oracle
///
/// # Errors
/// Fails on timeout or any rejected modification; the input file is never
/// written
pub async fn modify_with(
    options: &ModifyOptions,
    config: &ModifierConfig,
    oracle: Arc<dyn Oracle>,
) -> Result<String> {
    let document = load_document(&options.document)?;
    let orchestrator = ModificationOrchestrator::new(oracle);
    let target = options.target();

    let outcome = tokio::time::timeout(
        Duration::from_secs(config.request_timeout_secs),
        orchestrator.apply(&document, &options.instruction, target.as_ref()),
    )
    .await
    .map_err(|_| anyhow!("modification timed out after {}s", config.request_timeout_secs))??;

    let json = outcome.document.to_json_pretty()?;
    let mut out = String::new();
    writeln!(out, "{}", outcome.summary)?;
    for change in &outcome.diff.changes {
        writeln!(out, "  {change}")?;
    }
    for warning in &outcome.warnings {
        writeln!(out, "warning: {warning}")?;
    }
    write!(out, "fingerprint: {} -> {}", outcome.before.short(), outcome.after.short())?;

    match &options.out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            write!(out, "\nwritten to {}", path.display())?;
        }
        None => write!(out, "\n{json}")?,
    }
    Ok(out)
}

/// `info`: crate versions and operation names
#[must_use]
pub fn info() -> String {
    let mut out = format!(
        "flexui {}\nschema {}\nextract {}\ncore {}\noracle {}\noperations:",
        crate::VERSION,
        flexui_schema::VERSION,
        flexui_extract::VERSION,
        flexui_core::VERSION,
        flexui_oracle::VERSION,
    );
    for op in OPERATIONS {
        out.push_str("\n  ");
        out.push_str(op);
    }
    out
}
