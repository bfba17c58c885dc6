/*!
 * Per-job execution: fan-out over files, bounded cue-batch concurrency,
 * monotone progress reporting, cooperative cancellation, and per-file
 * failure isolation.
 *
 * A job's mutable state lives entirely inside its `run` call; observers
 * receive `ProgressEvent`s and the final `JobSummary`, never references
 * into the running job.
 */

use anyhow::Result;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::sync::mpsc::UnboundedSender;

use crate::app_config::TranslationSettings;
use crate::processing::placeholders::{PlaceholderProtector, ProtectedCue};
use crate::processing::{CreditsManager, WordRemover, WordReplacer};
use crate::providers::{TranslationClient, create_client};
use crate::subtitle_processor::SubtitleDocument;
use crate::translation::RetryOrchestrator;

use super::models::{
    CancelFlag, FileProgress, FileStatus, JobStatus, JobSummary, ProgressEvent, SourceFile,
    TranslationRequest,
};

/// Outcome of processing one translation unit within a file
enum UnitResult {
    /// Unit translated; carries its index and texts
    Done {
        /// Position of the unit within the file
        index: usize,
        /// Translated protected texts for the unit's cues
        texts: Vec<String>,
        /// Cues that kept original text
        soft_errors: usize,
    },
    /// Cancellation was observed before the unit started
    Cancelled,
}

/// Result of processing one file
struct FileOutcome {
    /// Final progress record for the file
    progress: FileProgress,
    /// Composed output bytes when the file completed
    output: Option<Vec<u8>>,
}

/// Runs translation jobs against a provider client
pub struct JobScheduler {
    /// Provider client shared by every unit of the job
    client: Arc<dyn TranslationClient>,
}

impl JobScheduler {
    /// Build a scheduler with the client selected by the settings
    pub fn from_settings(settings: &TranslationSettings) -> Result<Self> {
        let client = create_client(settings)?;
        Ok(Self { client })
    }

    /// Build a scheduler around an existing client - used by tests
    pub fn with_client(client: Arc<dyn TranslationClient>) -> Self {
        Self { client }
    }

    /// Run one job to completion.
    ///
    /// Emits ordered `ProgressEvent`s on `events` while running and
    /// returns the final summary. Invalid settings abort the job before
    /// any file is touched.
    pub async fn run(
        &self,
        request: TranslationRequest,
        events: UnboundedSender<ProgressEvent>,
        cancel: CancelFlag,
    ) -> JobSummary {
        let mut summary = JobSummary {
            status: JobStatus::Pending,
            files: request
                .files
                .iter()
                .map(|f| (f.name.clone(), FileProgress::pending(&f.name)))
                .collect(),
            outputs: HashMap::new(),
            completed: Vec::new(),
        };

        if let Err(e) = request.settings.validate() {
            let _ = events.send(ProgressEvent::Error {
                file: None,
                message: e.to_string(),
            });
            summary.status = JobStatus::Failed;
            return summary;
        }
        summary.status = JobStatus::Running;

        // Shared pipeline stages, built once per job
        let settings = request.settings.clone();
        let remover = WordRemover::new(&request.removal_words);
        let protector = Arc::new(PlaceholderProtector::new(
            request.matching_words.iter().map(|w| w.source.as_str()),
            settings.matching_case_insensitive,
        ));
        let replacer = WordReplacer::new(&request.matching_words, settings.matching_case_insensitive);
        let credits = CreditsManager::new(settings.translator_name.clone());
        let orchestrator = RetryOrchestrator::new(
            Arc::clone(&self.client),
            Arc::clone(&protector),
            settings.source_language.clone(),
            settings.target_language.clone(),
        );

        info!(
            "Starting job: {} file(s), {} -> {}, provider {}",
            request.files.len(),
            settings.source_language,
            settings.target_language,
            self.client.name()
        );

        // Files run with their own bound; cue-batch concurrency inside a
        // file is the hard rate-limit guarantee. The stream owns its
        // items so the job future stays spawnable.
        let outcomes: Vec<(String, FileOutcome)> = stream::iter(request.files)
            .map(|file| {
                let events = events.clone();
                let cancel = cancel.clone();
                let settings = &settings;
                let remover = &remover;
                let protector = &protector;
                let replacer = &replacer;
                let credits = &credits;
                let orchestrator = &orchestrator;
                async move {
                    let outcome = self
                        .process_file(
                            &file, settings, remover, protector, replacer, credits, orchestrator,
                            &events, &cancel,
                        )
                        .await;
                    (file.name, outcome)
                }
            })
            .buffered(settings.file_parallelism)
            .collect()
            .await;

        for (name, outcome) in outcomes {
            if outcome.progress.status == FileStatus::Done {
                summary.completed.push(name.clone());
            }
            if let Some(output) = outcome.output {
                summary.outputs.insert(name.clone(), output);
            }
            summary.files.insert(name, outcome.progress);
        }

        if cancel.is_cancelled() {
            let _ = events.send(ProgressEvent::Cancelled { file: None });
            summary.status = JobStatus::Cancelled;
        } else {
            let _ = events.send(ProgressEvent::AllComplete {
                files: summary.completed.clone(),
            });
            summary.status = JobStatus::Completed;
        }

        info!("Job finished: {:?}", summary.status);
        summary
    }

    /// Run the whole pipeline for one file.
    ///
    /// Failures here mark only this file; siblings never see them.
    #[allow(clippy::too_many_arguments)]
    async fn process_file(
        &self,
        file: &SourceFile,
        settings: &TranslationSettings,
        remover: &WordRemover,
        protector: &Arc<PlaceholderProtector>,
        replacer: &WordReplacer,
        credits: &CreditsManager,
        orchestrator: &RetryOrchestrator,
        events: &UnboundedSender<ProgressEvent>,
        cancel: &CancelFlag,
    ) -> FileOutcome {
        let mut progress = FileProgress::pending(&file.name);

        if cancel.is_cancelled() {
            progress.status = FileStatus::Cancelled;
            let _ = events.send(ProgressEvent::Cancelled {
                file: Some(file.name.clone()),
            });
            return FileOutcome {
                progress,
                output: None,
            };
        }

        let mut document = match SubtitleDocument::parse(&file.data) {
            Ok(document) => document,
            Err(e) => {
                warn!("Failed to parse {}: {}", file.name, e);
                progress.status = FileStatus::Error;
                progress.error_message = Some(e.to_string());
                let _ = events.send(ProgressEvent::Error {
                    file: Some(file.name.clone()),
                    message: e.to_string(),
                });
                return FileOutcome {
                    progress,
                    output: None,
                };
            }
        };

        let total = document.len();
        progress.total_cues = total;
        progress.status = FileStatus::Translating;
        let _ = events.send(ProgressEvent::Progress {
            file: file.name.clone(),
            current: 0,
            total,
        });

        remover.process_document(&mut document);
        let cues: Vec<ProtectedCue> = document
            .entries
            .iter()
            .map(|entry| protector.protect_cue(entry))
            .collect();
        let units: Vec<Vec<ProtectedCue>> = cues
            .chunks(settings.batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();
        let unit_count = units.len();
        debug!(
            "{}: {} cues in {} unit(s), concurrency {}",
            file.name, total, unit_count, settings.concurrent_requests
        );

        // The done counter and the progress emission share one lock so
        // out-of-order unit completion can never publish a value that
        // goes backwards.
        let done = Mutex::new(0usize);
        let semaphore = Arc::new(Semaphore::new(settings.concurrent_requests));

        let results: Vec<UnitResult> = stream::iter(units.into_iter().enumerate())
            .map(|(index, unit)| {
                let semaphore = Arc::clone(&semaphore);
                let events = events.clone();
                let done = &done;
                async move {
                    // Cancellation is observed before new work starts;
                    // in-flight calls are left to finish.
                    if cancel.is_cancelled() {
                        return UnitResult::Cancelled;
                    }
                    let _permit = semaphore.acquire().await.expect("semaphore closed");
                    if cancel.is_cancelled() {
                        return UnitResult::Cancelled;
                    }

                    let outcome = orchestrator.translate_unit(&unit).await;

                    let current = {
                        let mut done = done.lock();
                        *done += unit.len();
                        let current = *done;
                        let _ = events.send(ProgressEvent::Progress {
                            file: file.name.clone(),
                            current,
                            total,
                        });
                        current
                    };
                    debug!("{}: unit {} done ({}/{})", file.name, index, current, total);

                    UnitResult::Done {
                        index,
                        texts: outcome.texts,
                        soft_errors: outcome.soft_errors,
                    }
                }
            })
            .buffer_unordered(settings.concurrent_requests)
            .collect()
            .await;

        progress.done_cues = *done.lock();

        let mut translated_units: Vec<Option<Vec<String>>> = vec![None; unit_count];
        let mut soft_errors = 0usize;
        let mut cancelled = false;
        for result in results {
            match result {
                UnitResult::Done {
                    index,
                    texts,
                    soft_errors: unit_soft,
                } => {
                    translated_units[index] = Some(texts);
                    soft_errors += unit_soft;
                }
                UnitResult::Cancelled => cancelled = true,
            }
        }

        if cancelled {
            progress.status = FileStatus::Cancelled;
            let _ = events.send(ProgressEvent::Cancelled {
                file: Some(file.name.clone()),
            });
            return FileOutcome {
                progress,
                output: None,
            };
        }

        // Reassemble in unit order, restore spans, and finish the pipeline
        let translated: Vec<String> = translated_units
            .into_iter()
            .flat_map(|texts| texts.expect("every unit completed"))
            .collect();
        for (entry, (cue, text)) in document
            .entries
            .iter_mut()
            .zip(cues.iter().zip(translated.iter()))
        {
            entry.set_text(&protector.restore_text(text, &cue.spans));
        }

        replacer.process_document(&mut document);
        credits.apply(
            &mut document,
            settings.replace_credits,
            settings.add_credits,
            settings.append_credits_at_end,
        );

        let output = document.compose();
        progress.status = FileStatus::Done;
        if soft_errors > 0 {
            let note = format!("{} cue(s) kept their original text", soft_errors);
            warn!("{}: {}", file.name, note);
            progress.error_message = Some(note);
        }
        let _ = events.send(ProgressEvent::FileComplete {
            file: file.name.clone(),
            output: output.clone(),
        });

        FileOutcome {
            progress,
            output: Some(output),
        }
    }
}
