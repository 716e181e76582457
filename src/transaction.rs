//! The all-or-nothing registration pipeline.
//!
//! One run is one pass over one descriptor file: backup, read, duplicate
//! pre-check, identifier minting, four coordinated mutations in dependency
//! order, structural post-check, atomic write. Any failure before the write
//! leaves the destination untouched; the write is the single commit point.

use crate::{backup, ident, pbx, validate};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Run-scoped configuration, passed in explicitly so independent runs (and
/// tests) can use different inputs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Path to the project.pbxproj descriptor
    pub project: PathBuf,
    /// Path to the source file being registered; must exist on disk
    pub source_file: PathBuf,
    /// Name of the navigator group that owns the file
    pub group: String,
    /// Build targets whose Sources phase compiles the file
    pub targets: Vec<String>,
    /// Run the full pipeline through post-validation without backup or write
    pub dry_run: bool,
}

/// Pipeline state. `Failed` is reachable from every non-terminal state; the
/// destination file is only overwritten in the `Written` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Init,
    BackedUp,
    Read,
    PreValidated,
    Mutated,
    PostValidated,
    Written,
    Done,
    Failed,
}

#[derive(Error, Debug)]
pub enum RegisterError {
    #[error("file to register not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("file to register has no usable file name: {path}")]
    InvalidFileName { path: PathBuf },

    #[error(transparent)]
    Ident(#[from] ident::IdentError),

    #[error(transparent)]
    Locate(#[from] pbx::LocateError),

    #[error(transparent)]
    Mutate(#[from] pbx::MutateError),

    #[error(transparent)]
    Validate(#[from] validate::ValidateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failed run, with enough context to recover by hand: the phase that was
/// active when the error surfaced and the backup path if one was created.
#[derive(Error, Debug)]
#[error("registration failed during {phase:?}: {source}")]
pub struct RunFailure {
    pub phase: Phase,
    pub backup: Option<PathBuf>,
    #[source]
    pub source: RegisterError,
}

/// One registered target: its build-file entry and the Sources phase that
/// references it.
#[derive(Debug, Clone, Serialize)]
pub struct TargetLink {
    pub target: String,
    pub build_file_id: String,
    pub sources_phase_id: String,
}

/// Success report: every identifier minted and every section touched.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub file_name: String,
    pub file_ref_id: String,
    pub targets: Vec<TargetLink>,
    pub sections_touched: Vec<&'static str>,
    pub backup: Option<PathBuf>,
    pub dry_run: bool,
}

/// Successful run outcome. Original and patched document text are carried
/// for diff display; on a non-dry run the patched text is already on disk.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub report: RunReport,
    pub original: String,
    pub patched: String,
}

/// Orchestrates one registration transaction over one descriptor file.
pub struct Registrar {
    config: RunConfig,
    phase: Phase,
}

impl Registrar {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            phase: Phase::Init,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the pipeline to completion.
    ///
    /// On error the destination file on disk is untouched; if a backup was
    /// already created its path is reported in the failure.
    pub fn run(&mut self) -> Result<Outcome, RunFailure> {
        let mut backup = None;
        match self.execute(&mut backup) {
            Ok(outcome) => {
                self.phase = Phase::Done;
                Ok(outcome)
            }
            Err(source) => {
                let phase = self.phase;
                self.phase = Phase::Failed;
                Err(RunFailure {
                    phase,
                    backup,
                    source,
                })
            }
        }
    }

    fn execute(&mut self, backup_out: &mut Option<PathBuf>) -> Result<Outcome, RegisterError> {
        // The file being registered must already exist on disk.
        if !self.config.source_file.exists() {
            return Err(RegisterError::FileNotFound {
                path: self.config.source_file.clone(),
            });
        }
        let file_name = self
            .config
            .source_file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RegisterError::InvalidFileName {
                path: self.config.source_file.clone(),
            })?
            .to_string();

        if !self.config.dry_run {
            *backup_out = Some(backup::create_backup(&self.config.project)?);
        }
        self.phase = Phase::BackedUp;

        let original = fs::read_to_string(&self.config.project)?;
        self.phase = Phase::Read;

        // Pre-check: refuse double registration outright.
        if validate::already_registered(&original, &file_name) {
            return Err(validate::ValidateError::DuplicateRegistration { label: file_name }.into());
        }
        self.phase = Phase::PreValidated;

        // Mint every identifier up front, checked against the full token
        // population of the document plus the ids minted by this run.
        let mut population = ident::token_population(&original);
        let file_ref_id = ident::mint_unique(&format!("file_ref_{file_name}"), &mut population)?;
        let mut build_file_ids = Vec::with_capacity(self.config.targets.len());
        for target in &self.config.targets {
            let id =
                ident::mint_unique(&format!("build_file_{target}_{file_name}"), &mut population)?;
            build_file_ids.push((target.clone(), id));
        }

        // Mutations in dependency order: declare the file, then reference it.
        // Spans are re-located after every splice since offsets shift.
        let mut doc = original.clone();

        // 1. File declaration.
        let section = pbx::find_section(&doc, "PBXFileReference")?;
        doc = pbx::insert_entry(
            &doc,
            section,
            &pbx::file_reference_entry(&file_ref_id, &file_name),
        )?;

        // 2. One build-file entry per target.
        for (_, id) in &build_file_ids {
            let section = pbx::find_section(&doc, "PBXBuildFile")?;
            doc = pbx::insert_entry(
                &doc,
                section,
                &pbx::build_file_entry(id, &file_ref_id, &file_name),
            )?;
        }

        // 3. The owning group's children list.
        let section = pbx::find_section(&doc, "PBXGroup")?;
        let group_anchor = format!("/* {} */ = {{", self.config.group);
        let list = pbx::find_block(&doc, section, &group_anchor, "children = (", ");")?;
        doc = pbx::insert_list_element(&doc, list, &pbx::child_element(&file_ref_id, &file_name))?;

        // 4. Each target's Sources phase files list.
        let mut targets = Vec::with_capacity(build_file_ids.len());
        for (target, build_file_id) in build_file_ids {
            let phase_id = pbx::find_sources_phase_id(&doc, &target)?;
            let section = pbx::find_section(&doc, "PBXSourcesBuildPhase")?;
            let anchor = format!("{phase_id} /* Sources */ = {{");
            let list = pbx::find_block(&doc, section, &anchor, "files = (", ");")?;
            doc =
                pbx::insert_list_element(&doc, list, &pbx::phase_element(&build_file_id, &file_name))?;
            targets.push(TargetLink {
                target,
                build_file_id,
                sources_phase_id: phase_id,
            });
        }
        self.phase = Phase::Mutated;

        // Post-check gates the commit.
        validate::validate(&doc)?;
        self.phase = Phase::PostValidated;

        if !self.config.dry_run {
            backup::atomic_write(&self.config.project, doc.as_bytes())?;
            self.phase = Phase::Written;
        }

        Ok(Outcome {
            report: RunReport {
                file_name,
                file_ref_id,
                targets,
                sections_touched: vec![
                    "PBXFileReference",
                    "PBXBuildFile",
                    "PBXGroup",
                    "PBXSourcesBuildPhase",
                ],
                backup: backup_out.clone(),
                dry_run: self.config.dry_run,
            },
            original,
            patched: doc,
        })
    }
}
