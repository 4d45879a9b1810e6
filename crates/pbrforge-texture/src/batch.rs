//! Batch driver.
//!
//! Materials run in parallel with no shared mutable state. Per-item
//! failures are reported and never stop the other materials; only fatal
//! errors abort the run.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::generate::{generate_material, GenerateError, GenerationConfig};
use crate::output::TextureSink;
use crate::registry::MaterialRegistry;

/// Outcome of one batch item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Success,
    Skipped,
    Error,
    DryRun,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Success => "success",
            ItemStatus::Skipped => "skipped",
            ItemStatus::Error => "error",
            ItemStatus::DryRun => "dry_run",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report for one batch item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    /// Material name or file the item refers to.
    pub material: String,
    pub status: ItemStatus,
    /// Reason for anything other than success.
    pub message: Option<String>,
    /// Files written for this item.
    pub files: Vec<PathBuf>,
}

impl ItemReport {
    pub fn new(material: impl Into<String>, status: ItemStatus) -> Self {
        Self {
            material: material.into(),
            status,
            message: None,
            files: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }
}

/// Aggregated batch outcome, in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub items: Vec<ItemReport>,
}

impl BatchSummary {
    pub fn new(items: Vec<ItemReport>) -> Self {
        Self { items }
    }

    /// Number of items with the given status.
    pub fn count(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(ItemStatus::Success)
    }

    pub fn skipped(&self) -> usize {
        self.count(ItemStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(ItemStatus::Error)
    }

    pub fn dry_run(&self) -> usize {
        self.count(ItemStatus::DryRun)
    }

    pub fn has_errors(&self) -> bool {
        self.failed() > 0
    }
}

/// Cooperative cancellation shared between the caller and a running batch.
///
/// Checked before each material starts; a material already running
/// finishes normally.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What to generate.
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    /// Materials to generate. Empty means every registered material.
    pub materials: Vec<String>,
    pub config: GenerationConfig,
    /// Resolve and validate only.
    pub dry_run: bool,
}

/// Generate every requested material and hand each set to `sink`.
///
/// Returns `Err` only for an invalid configuration, checked before any
/// field is computed, or for a fatal internal error.
pub fn run_batch(
    registry: &MaterialRegistry,
    request: &BatchRequest,
    sink: &dyn TextureSink,
    cancel: &CancelToken,
) -> Result<BatchSummary, GenerateError> {
    request.config.validate()?;

    let names: Vec<String> = if request.materials.is_empty() {
        registry.names().map(str::to_string).collect()
    } else {
        request.materials.clone()
    };
    log::debug!("batch of {} materials", names.len());

    let items = names
        .par_iter()
        .map(|name| run_item(registry, request, sink, cancel, name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BatchSummary::new(items))
}

fn run_item(
    registry: &MaterialRegistry,
    request: &BatchRequest,
    sink: &dyn TextureSink,
    cancel: &CancelToken,
    name: &str,
) -> Result<ItemReport, GenerateError> {
    if cancel.is_cancelled() {
        return Ok(ItemReport::new(name, ItemStatus::Skipped).with_message("cancelled"));
    }

    let entry = match registry.get(name) {
        Ok(entry) => entry,
        Err(e) => {
            log::warn!("skipping {}: {}", name, e);
            return Ok(ItemReport::new(name, ItemStatus::Skipped).with_message(e.to_string()));
        }
    };

    if request.dry_run {
        return Ok(ItemReport::new(name, ItemStatus::DryRun));
    }

    let result = generate_material(entry, &request.config)
        .and_then(|set| sink.write_set(&set));
    match result {
        Ok(files) => {
            log::info!(
                "{}: {} files at {}x{}",
                name,
                files.len(),
                request.config.resolution,
                request.config.resolution
            );
            Ok(ItemReport::new(name, ItemStatus::Success).with_files(files))
        }
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            log::warn!("{} failed: [{}] {}", name, e.code(), e);
            Ok(ItemReport::new(name, ItemStatus::Error).with_message(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ScalarField;
    use crate::generate::MaterialTextureSet;
    use crate::height::{HeightConstructor, HeightContext};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        written: Mutex<Vec<String>>,
    }

    impl TextureSink for RecordingSink {
        fn write_set(&self, set: &MaterialTextureSet) -> Result<Vec<PathBuf>, GenerateError> {
            self.written.lock().unwrap().push(set.name.clone());
            Ok(vec![PathBuf::from(format!("{}.png", set.name))])
        }
    }

    struct FailingSink;

    impl TextureSink for FailingSink {
        fn write_set(&self, _set: &MaterialTextureSet) -> Result<Vec<PathBuf>, GenerateError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    fn request(materials: &[&str]) -> BatchRequest {
        BatchRequest {
            materials: materials.iter().map(|s| s.to_string()).collect(),
            config: GenerationConfig::default()
                .with_resolution(16)
                .with_working_resolution(32),
            dry_run: false,
        }
    }

    #[test]
    fn unknown_materials_are_skipped_without_writes() {
        let sink = RecordingSink::default();
        let summary = run_batch(
            &MaterialRegistry::builtin(),
            &request(&["stone", "lava", "sand"]),
            &sink,
            &CancelToken::new(),
        )
        .unwrap();

        let statuses: Vec<_> = summary.items.iter().map(|i| i.status).collect();
        assert_eq!(
            statuses,
            [ItemStatus::Success, ItemStatus::Skipped, ItemStatus::Success]
        );
        assert!(summary.items[1].message.as_deref().unwrap_or("").contains("lava"));
        let mut written = sink.written.lock().unwrap().clone();
        written.sort();
        assert_eq!(written, ["sand", "stone"]);
    }

    #[test]
    fn empty_request_means_every_material() {
        let sink = RecordingSink::default();
        let registry = MaterialRegistry::builtin();
        let summary = run_batch(&registry, &request(&[]), &sink, &CancelToken::new()).unwrap();
        assert_eq!(summary.succeeded(), registry.len());
        let names: Vec<_> = summary.items.iter().map(|i| i.material.as_str()).collect();
        assert_eq!(names, registry.names().collect::<Vec<_>>());
    }

    #[test]
    fn sink_errors_do_not_stop_the_batch() {
        let summary = run_batch(
            &MaterialRegistry::builtin(),
            &request(&["dirt", "snow"]),
            &FailingSink,
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(summary.failed(), 2);
        assert!(summary.has_errors());
    }

    #[test]
    fn dry_run_generates_nothing() {
        let sink = RecordingSink::default();
        let mut req = request(&["mud", "nope"]);
        req.dry_run = true;
        let summary =
            run_batch(&MaterialRegistry::builtin(), &req, &sink, &CancelToken::new()).unwrap();
        assert_eq!(summary.dry_run(), 1);
        assert_eq!(summary.skipped(), 1);
        assert!(sink.written.lock().unwrap().is_empty());
    }

    #[test]
    fn cancelled_batch_skips_everything() {
        let sink = RecordingSink::default();
        let cancel = CancelToken::new();
        cancel.cancel();
        let summary =
            run_batch(&MaterialRegistry::builtin(), &request(&["stone", "ice"]), &sink, &cancel)
                .unwrap();
        assert_eq!(summary.skipped(), 2);
        assert!(sink.written.lock().unwrap().is_empty());
    }

    #[test]
    fn invalid_config_fails_before_work() {
        let sink = RecordingSink::default();
        let mut req = request(&["stone"]);
        req.config.resolution = 100;
        let err = run_batch(&MaterialRegistry::builtin(), &req, &sink, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, GenerateError::InvalidConfiguration(_)));
        assert!(sink.written.lock().unwrap().is_empty());
    }

    /// Shapes heights far outside [0, 1].
    #[derive(Debug)]
    struct Overflowing;

    impl HeightConstructor for Overflowing {
        fn archetype(&self) -> &'static str {
            "overflowing"
        }

        fn construct(&self, ctx: &HeightContext) -> ScalarField {
            ScalarField::from_fn(ctx.resolution, ctx.resolution, |x, _| x as f64 / 4.0 - 3.0)
        }
    }

    #[test]
    fn out_of_range_field_aborts_the_batch() {
        let mut registry = MaterialRegistry::builtin();
        let preset = registry.get("stone").unwrap().preset.clone();
        registry.register("broken", preset, Overflowing);

        let sink = RecordingSink::default();
        let result = run_batch(
            &registry,
            &request(&["broken", "sand"]),
            &sink,
            &CancelToken::new(),
        );
        let err = result.unwrap_err();
        assert!(matches!(err, GenerateError::OutOfRange { map: "height", .. }));
        assert_eq!(err.code(), "PBR_003");
        assert!(!sink.written.lock().unwrap().contains(&"broken".to_string()));
    }
}
