//! Per-SDK release pipeline
//!
//! For every requested SDK, in request order: remove any stale checkout,
//! clone the repository, run the generator into it, then stage, commit and
//! tag the result with the API version. The first failing command aborts the
//! whole run; nothing already committed or tagged is rolled back.
//!
//! A dry run stops the entire run once the first SDK has been tagged.

use crate::conversion::case::camel_to_snake;
use crate::conversion::template::{TemplateError, render_repo_name};
use crate::core::config::Config;
use crate::core::constants::{generator, git};
use crate::core::loader::{DocumentLoader, LoadError, is_remote};
use crate::core::runner::{CommandRunner, Invocation, RunnerError};
use crate::models::api_spec::ApiSpec;
use crate::models::definitions::{DefinitionError, DefinitionTable, DefinitionsDocument};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, debug, info, info_span, warn};

/// Error types for a release run
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("Cannot resolve repository name for {sdk:?}")]
    Template {
        sdk: String,
        #[source]
        source: TemplateError,
    },

    #[error("Cannot resolve path {path}")]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Release of {sdk:?} failed after reaching {stage}")]
    Step {
        sdk: String,
        stage: ReleaseStage,
        #[source]
        source: RunnerError,
    },
}

impl ReleaseError {
    /// Message followed by its chain of causes, each printed once
    pub fn report(self) -> String {
        format!("{:#}", anyhow::Error::from(self))
    }
}

/// Progress of a single SDK through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStage {
    Clean,
    Cloned,
    Generated,
    Committed,
    Tagged,
    Pushed,
}

impl fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseStage::Clean => "clean",
            ReleaseStage::Cloned => "cloned",
            ReleaseStage::Generated => "generated",
            ReleaseStage::Committed => "committed",
            ReleaseStage::Tagged => "tagged",
            ReleaseStage::Pushed => "pushed",
        };
        f.write_str(name)
    }
}

/// A requested SDK with its repository resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    pub sdk: String,
    pub repo_name: String,
    /// Generator flavor
    pub template: String,
}

/// Result of releasing one SDK
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkRelease {
    pub sdk: String,
    pub repo_name: String,
    pub stage: ReleaseStage,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No SDKs were requested
    NothingToDo,
    /// Every requested SDK went through the pipeline
    Completed(Vec<SdkRelease>),
    /// Dry run stopped after the first SDK
    DryRun(SdkRelease),
}

/// Drives a release run
pub struct Orchestrator {
    config: Config,
    runner: Arc<dyn CommandRunner>,
    loader: DocumentLoader,
}

impl Orchestrator {
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>) -> Result<Self, ReleaseError> {
        let loader = DocumentLoader::new(config.http_timeout)?;
        Ok(Self {
            config,
            runner,
            loader,
        })
    }

    /// Load the documents and release every requested SDK
    pub async fn run(&self) -> Result<RunOutcome, ReleaseError> {
        if self.config.sdks.is_empty() {
            warn!("No SDKs to generate...");
            return Ok(RunOutcome::NothingToDo);
        }

        let document: DefinitionsDocument =
            self.loader.load_json(&self.config.definition_file).await?;
        let spec: ApiSpec = self.loader.load_yaml(&self.config.api_spec).await?;
        let table = DefinitionTable::from_document(document)?;

        info!(
            title = spec.title(),
            version = spec.version(),
            definitions = table.len(),
            "Loaded API specification"
        );

        self.release(&spec, &table).await
    }

    /// Release every requested SDK from already loaded documents
    async fn release(
        &self,
        spec: &ApiSpec,
        table: &DefinitionTable,
    ) -> Result<RunOutcome, ReleaseError> {
        table.validate(&self.config.sdks)?;

        let package = camel_to_snake(spec.title());
        let targets = resolve_targets(&self.config.sdks, table, &package)?;
        let api_spec = self.spec_argument()?;

        info!(package = %package, sdks = targets.len(), "Releasing version {}", spec.version());

        let mut released = Vec::with_capacity(targets.len());
        for target in &targets {
            let span = info_span!("sdk", sdk = %target.sdk, repo = %target.repo_name);
            let release = self
                .release_sdk(target, &api_spec, spec.version())
                .instrument(span)
                .await?;

            if self.config.dry_run {
                info!("Dry Run, no further steps performed.");
                return Ok(RunOutcome::DryRun(release));
            }

            released.push(release);
        }

        Ok(RunOutcome::Completed(released))
    }

    async fn release_sdk(
        &self,
        target: &ReleaseTarget,
        api_spec: &str,
        version: &str,
    ) -> Result<SdkRelease, ReleaseError> {
        let workspace = &self.config.workspace;
        let repo_dir = workspace.join(&target.repo_name);
        let message = format!("{} {}", git::VERSION_MESSAGE_PREFIX, version);
        let clone_url = self.clone_url(target);
        let mut stage = ReleaseStage::Clean;

        if let Err(e) = tokio::fs::remove_dir_all(&repo_dir).await {
            debug!("No stale checkout removed at {}: {}", repo_dir.display(), e);
        }

        let steps = [
            (
                Invocation::new(git::BIN, workspace).args(["clone", clone_url.as_str()]),
                ReleaseStage::Cloned,
            ),
            (
                Invocation::new(&self.config.generator, workspace).args([
                    generator::GENERATE,
                    "-i",
                    api_spec,
                    "-g",
                    target.template.as_str(),
                    "-o",
                    target.repo_name.as_str(),
                ]),
                ReleaseStage::Generated,
            ),
            (
                Invocation::new(git::BIN, &repo_dir).args(["add", "."]),
                ReleaseStage::Generated,
            ),
            (
                Invocation::new(git::BIN, &repo_dir).args(["commit", "-m", message.as_str()]),
                ReleaseStage::Committed,
            ),
            (
                Invocation::new(git::BIN, &repo_dir)
                    .args(["tag", "-a", version, "-m", message.as_str()]),
                ReleaseStage::Tagged,
            ),
        ];

        for (invocation, reached) in &steps {
            stage = self.step(target, stage, invocation, *reached).await?;
        }

        if self.config.dry_run {
            return Ok(self.finished(target, stage));
        }

        if self.config.push {
            let pushes = [
                Invocation::new(git::BIN, &repo_dir).arg("push"),
                Invocation::new(git::BIN, &repo_dir).args(["push", "--tags"]),
            ];
            for invocation in &pushes {
                stage = self
                    .step(target, stage, invocation, ReleaseStage::Pushed)
                    .await?;
            }
        } else {
            debug!("Push disabled, leaving {} local", target.repo_name);
        }

        Ok(self.finished(target, stage))
    }

    async fn step(
        &self,
        target: &ReleaseTarget,
        stage: ReleaseStage,
        invocation: &Invocation,
        reached: ReleaseStage,
    ) -> Result<ReleaseStage, ReleaseError> {
        info!("Running {}", invocation);
        self.runner
            .run(invocation)
            .await
            .map_err(|source| ReleaseError::Step {
                sdk: target.sdk.clone(),
                stage,
                source,
            })?;
        Ok(reached)
    }

    fn finished(&self, target: &ReleaseTarget, stage: ReleaseStage) -> SdkRelease {
        info!(stage = %stage, "Finished {}", target.sdk);
        SdkRelease {
            sdk: target.sdk.clone(),
            repo_name: target.repo_name.clone(),
            stage,
        }
    }

    fn clone_url(&self, target: &ReleaseTarget) -> String {
        format!(
            "{}:{}/{}.git",
            git::SSH_HOST,
            self.config.org_name,
            target.repo_name
        )
    }

    /// Spec location handed to the generator
    ///
    /// The generator runs inside the workspace, so relative local paths are
    /// made absolute against the directory the run was started from.
    fn spec_argument(&self) -> Result<String, ReleaseError> {
        let location = &self.config.api_spec;
        if is_remote(location) || Path::new(location).is_absolute() {
            return Ok(location.clone());
        }

        std::path::absolute(location)
            .map(|path| path.display().to_string())
            .map_err(|source| ReleaseError::Path {
                path: PathBuf::from(location),
                source,
            })
    }
}

/// Resolve repository names for the requested SDKs, in request order
pub fn resolve_targets(
    sdks: &[String],
    table: &DefinitionTable,
    package: &str,
) -> Result<Vec<ReleaseTarget>, ReleaseError> {
    sdks.iter()
        .map(|sdk| -> Result<ReleaseTarget, ReleaseError> {
            let definition = table
                .get(sdk)
                .ok_or_else(|| DefinitionError::Missing(vec![sdk.clone()]))?;
            let repo_name = render_repo_name(&definition.repo, package).map_err(|source| {
                ReleaseError::Template {
                    sdk: sdk.clone(),
                    source,
                }
            })?;
            Ok(ReleaseTarget {
                sdk: sdk.clone(),
                repo_name,
                template: definition.template.clone(),
            })
        })
        .collect()
}
