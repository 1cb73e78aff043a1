//! Modification Orchestrator
//!
//! Runs one validate-modify-validate cycle:
//! 1. Validate the input document (fail fast, no oracle call)
//! 2. Resolve the target address to a section and component id
//! 3. Build the prompt and invoke the oracle
//! 4. Recover a JSON object from the reply
//! 5. Validate the recovered document
//!
//! The input is only ever borrowed. A failed modification leaves the
//! caller's document exactly as it was; there is no partial result.

use crate::error::ModificationError;
use crate::oracle::Oracle;
use crate::prompt::PromptBuilder;
use crate::types::{
    ModificationOutcome, ModificationRequest, ModificationResponse, ModificationWarning,
    RequestId, TargetAddress, TargetComponent,
};
use indexmap::IndexSet;
use flexui_extract::ResponseExtractor;
use flexui_schema::{
    diff_documents, fallback_component_label, resolve_component, DocumentHash,
    FlexibleContent,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Operation names exposed by the modification service
pub const OPERATIONS: &[&str] = &["modify_ui", "health"];

/// Applies natural-language modifications to documents
///
/// Stateless apart from the shared oracle handle; one instance can serve
/// concurrent requests.
pub struct ModificationOrchestrator {
    oracle: Arc<dyn Oracle>,
    extractor: ResponseExtractor,
    prompts: PromptBuilder,
}

impl fmt::Debug for ModificationOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModificationOrchestrator")
            .field("extractor", &self.extractor)
            .field("prompts", &self.prompts)
            .finish_non_exhaustive()
    }
}

impl ModificationOrchestrator {
    /// Create orchestrator around an oracle handle
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            extractor: ResponseExtractor::new(),
            prompts: PromptBuilder::new(),
        }
    }

    /// With custom extractor
    #[must_use]
    pub fn with_extractor(mut self, extractor: ResponseExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// With custom prompt builder
    #[must_use]
    pub fn with_prompt_builder(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    /// Operation names for introspection
    #[inline]
    #[must_use]
    pub fn operations() -> &'static [&'static str] {
        OPERATIONS
    }

    /// Apply `instruction` to `document`
    ///
    /// # Errors
    /// - [`ModificationError::InvalidRequest`] for a blank instruction
    /// - [`ModificationError::InvalidInputDocument`] before any oracle call
    /// - [`ModificationError::Oracle`], [`ModificationError::ExtractionFailure`]
    ///   or [`ModificationError::InvalidOutputDocument`] after it
    pub async fn apply(
        &self,
        document: &FlexibleContent,
        instruction: &str,
        target: Option<&TargetAddress>,
    ) -> Result<ModificationOutcome, ModificationError> {
        let request_id = RequestId::new();
        let span = info_span!("modify", request_id = %request_id);

        async {
            let result = self.run(request_id, document, instruction, target).await;
            if let Err(ref err) = result {
                error!(kind = %err.kind(), error = %err, "modification aborted");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        request_id: RequestId,
        document: &FlexibleContent,
        instruction: &str,
        target: Option<&TargetAddress>,
    ) -> Result<ModificationOutcome, ModificationError> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(ModificationError::InvalidRequest(
                "instruction is empty".to_string(),
            ));
        }
        info!(
            components = document.component_count(),
            target = ?target.map(ToString::to_string),
            "modification requested"
        );

        document
            .validate()
            .map_err(ModificationError::InvalidInputDocument)?;
        let before = DocumentHash::of(document).map_err(ModificationError::InvalidInputDocument)?;

        let mut warnings = Vec::new();
        let target = match target {
            None => None,
            Some(TargetAddress::Id(id)) => Some(TargetComponent::locate(document, id)),
            Some(TargetAddress::Path(path)) => match resolve_component(document, path) {
                Some(address) => {
                    debug!(%path, %address, "target path resolved");
                    Some(TargetComponent::from(address))
                }
                None => {
                    let fallback_label = fallback_component_label(path);
                    warn!(%path, ?fallback_label, "target path not found, proceeding undirected");
                    warnings.push(ModificationWarning::TargetNotFound {
                        path: path.clone(),
                        fallback_label,
                    });
                    None
                }
            },
        };

        let prompt = self
            .prompts
            .build(document, instruction, target.as_ref())
            .map_err(ModificationError::InvalidInputDocument)?;

        debug!(prompt_len = prompt.len(), "invoking oracle");
        let reply = self.oracle.generate(&prompt).await?;
        debug!(reply_len = reply.len(), "oracle replied");

        let extracted = self.extractor.extract(&reply)?;
        let modified = FlexibleContent::from_value(&extracted.value)
            .map_err(ModificationError::InvalidOutputDocument)?;
        let after = DocumentHash::of(&modified).map_err(ModificationError::InvalidOutputDocument)?;

        let diff = diff_documents(document, &modified);
        if let Some(target) = &target {
            if !diff.touches_only(target.section_id.as_deref(), &target.component_id) {
                let components: IndexSet<String> = diff
                    .touched_components()
                    .filter(|(section, component)| !target.matches(section, component))
                    .map(|(section, component)| format!("{section}.{component}"))
                    .collect();
                let structure_changed = diff.layout_changed
                    || diff.metadata_changed
                    || diff.changes.iter().any(|c| c.component_id.is_none());
                warn!(
                    target = %target,
                    others = ?components,
                    structure_changed,
                    "targeted modification changed other parts"
                );
                warnings.push(ModificationWarning::UntargetedChanges {
                    target: target.clone(),
                    components: components.into_iter().collect(),
                    structure_changed,
                });
            }
        }

        let summary = match &target {
            Some(target) => format!(
                "Applied modification to '{}': {instruction}",
                target.component_id
            ),
            None => format!("Applied modification: {instruction}"),
        };
        info!(
            strategy = extracted.strategy,
            changes = diff.changes.len(),
            before = %before.short(),
            after = %after.short(),
            "modification applied"
        );

        Ok(ModificationOutcome {
            request_id,
            document: modified,
            summary,
            target,
            strategy: extracted.strategy,
            before,
            after,
            diff,
            warnings,
            applied_at: chrono::Utc::now(),
        })
    }

    /// Handle a boundary request: decode, apply, encode
    ///
    /// # Errors
    /// - [`ModificationError::InvalidRequest`] if there is no instruction
    /// - [`ModificationError::InvalidInputDocument`] if `current_json` is
    ///   not a valid document
    /// - anything [`Self::apply`] reports
    pub async fn handle_request(
        &self,
        request: &ModificationRequest,
    ) -> Result<ModificationResponse, ModificationError> {
        let instruction = request.instruction().ok_or_else(|| {
            ModificationError::InvalidRequest("request has no messages".to_string())
        })?;
        let document = FlexibleContent::from_value(&request.current_json)
            .map_err(ModificationError::InvalidInputDocument)?;
        let target = request.target();

        let outcome = self.apply(&document, instruction, target.as_ref()).await?;
        let modified_json = outcome
            .document
            .to_value()
            .map_err(ModificationError::InvalidOutputDocument)?;

        Ok(ModificationResponse {
            ai_message: outcome.summary,
            modified_json,
        })
    }
}
