/// Annotation workflow
///
/// `WorkflowController` owns the whole session: the queue, the decoded photo,
/// the click points and the results ledger. Each public method handles one
/// user command from start to finish, so callers never see a half-updated
/// session (e.g. a new position with the old click points).
///
/// ```text
/// Empty ──select/start──▶ AwaitingFirstPoint ──click──▶ AwaitingSecondPoint
///                              ▲                              │ click
///                              │ next photo                   ▼
///                              └──────────── measure + append record
///                                                  │ no next photo
///                                                  ▼
///                                  QueueExhausted (batch) / Empty (single)
/// ```

use std::path::{Path, PathBuf};

use super::data::{MeasurementRecord, Point};
use super::ledger::ResultsLedger;
use super::queue::{image_name, ImageQueue};
use super::roi::RoiCapture;
use crate::analysis::{patch_stats, DocEstimator};
use crate::config::{Config, RedoPolicy};
use crate::error::{Error, Result};
use crate::photo::{listing, FileDecoder, ImageDecoder, PixelBuffer};

/// Where the controller is in the annotation of the current photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    /// No photo on screen
    #[default]
    Empty,
    /// Waiting for the water patch click
    AwaitingFirstPoint,
    /// Waiting for the paper patch click
    AwaitingSecondPoint,
    /// A batch ran past its last photo
    QueueExhausted,
}

impl WorkflowState {
    /// Whether clicks on the image are taken as patch anchors
    pub fn accepts_points(self) -> bool {
        matches!(self, Self::AwaitingFirstPoint | Self::AwaitingSecondPoint)
    }
}

/// What happened after a measurement was recorded
#[derive(Debug)]
pub enum AfterMeasurement {
    /// The batch moved on to this photo
    NextImage { name: String, index: usize, total: usize },
    /// The batch moved on but the next photo could not be decoded
    NextImageFailed(Error),
    /// That was the last photo of the batch
    QueueExhausted,
    /// Single-photo mode; nothing else to do
    Idle,
}

/// User-visible result of a command
#[derive(Debug)]
pub enum Notice {
    /// The command does not apply in the current state
    Ignored,
    FolderListed { count: usize },
    /// Start was requested without any photos to analyse
    NoImagesFound,
    /// A photo is on screen and waiting for the water click
    ImageReady { name: String, index: usize, total: usize },
    WaterAnchored(Point),
    Measured { record: MeasurementRecord, then: AfterMeasurement },
    QueueExhausted,
    /// The previous photo is back on screen; both patches must be picked again
    RedoReady { name: String, retracted: Option<MeasurementRecord> },
    RowDeleted(Option<MeasurementRecord>),
    Reset,
}

/// The last photo that was measured or skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PreviousStep {
    index: usize,
    /// Ledger length right after the measurement was appended; `None` for a skip
    record_len: Option<usize>,
}

/// Drives the annotation of one or more photos
pub struct WorkflowController<D = FileDecoder> {
    decoder: D,
    config: Config,
    estimator: DocEstimator,
    queue: ImageQueue,
    state: WorkflowState,
    buffer: Option<PixelBuffer>,
    roi: RoiCapture,
    ledger: ResultsLedger,
    previous: Option<PreviousStep>,
    /// Bumped on every successful decode, so views can tell a reload apart
    generation: u64,
}

impl WorkflowController<FileDecoder> {
    /// A controller that decodes photos from disk
    pub fn new(config: Config) -> Result<Self> {
        Self::with_decoder(FileDecoder, config)
    }
}

impl Default for WorkflowController<FileDecoder> {
    /// Disk decoding with the built-in calibration, which always validates
    fn default() -> Self {
        Self::build(FileDecoder, Config::default())
    }
}

impl<D: ImageDecoder> WorkflowController<D> {
    /// Fails with `Error::InvalidConfig` for a zero-sized patch or an unusable calibration
    pub fn with_decoder(decoder: D, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(decoder, config))
    }

    fn build(decoder: D, config: Config) -> Self {
        Self {
            decoder,
            estimator: DocEstimator::new(config.calibration),
            config,
            queue: ImageQueue::default(),
            state: WorkflowState::Empty,
            buffer: None,
            roi: RoiCapture::new(),
            ledger: ResultsLedger::new(),
            previous: None,
            generation: 0,
        }
    }

    // ========== Read access for the UI ==========

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn queue(&self) -> &ImageQueue {
        &self.queue
    }

    pub fn current_index(&self) -> usize {
        self.queue.current_index()
    }

    pub fn previous_index(&self) -> Option<usize> {
        self.previous.map(|p| p.index)
    }

    pub fn roi(&self) -> &RoiCapture {
        &self.roi
    }

    pub fn ledger(&self) -> &ResultsLedger {
        &self.ledger
    }

    /// Counts decodes; changes whenever `current_image` may show new pixels
    pub fn image_generation(&self) -> u64 {
        self.generation
    }

    /// The photo on screen, if any
    pub fn current_image(&self) -> Option<(&Path, &PixelBuffer)> {
        let buffer = self.buffer.as_ref()?;
        Some((self.queue.current_path()?, buffer))
    }

    // ========== Commands ==========

    /// Analyse one photo on its own
    pub fn select_single_image(&mut self, path: PathBuf) -> Result<Notice> {
        log::info!("Selected single image {}", path.display());
        self.queue = ImageQueue::single(path);
        self.previous = None;
        self.load_current()
    }

    /// List a folder's photos as a new batch; nothing is loaded until start
    pub fn select_folder(&mut self, folder: &Path) -> Result<Notice> {
        let paths = listing::list_images(folder, self.config.extensions)?;
        Ok(self.select_batch(paths))
    }

    /// Replace the queue with an already listed batch
    pub fn select_batch(&mut self, paths: Vec<PathBuf>) -> Notice {
        let count = paths.len();
        self.queue = ImageQueue::batch(paths);
        self.previous = None;
        self.unload(WorkflowState::Empty);
        Notice::FolderListed { count }
    }

    /// Load the first photo of the batch
    pub fn start_analysis(&mut self) -> Result<Notice> {
        if !self.queue.is_batch() || self.queue.is_empty() {
            log::warn!("Start requested but no images are queued");
            return Ok(Notice::NoImagesFound);
        }

        self.queue.seek(1);
        self.previous = None;
        self.load_current()
    }

    /// Take one click on the photo as a patch anchor
    pub fn submit_point(&mut self, point: Point) -> Result<Notice> {
        if !self.state.accepts_points() {
            log::debug!("Ignoring point {:?} in state {:?}", point, self.state);
            return Ok(Notice::Ignored);
        }
        let Some(buffer) = self.buffer.as_ref() else {
            return Ok(Notice::Ignored);
        };
        if !buffer.contains(point.x, point.y) {
            return Err(Error::PointOutOfBounds {
                x: point.x,
                y: point.y,
                width: buffer.width(),
                height: buffer.height(),
            });
        }

        let Some(water) = self.roi.water() else {
            self.roi.push(point);
            self.set_state(WorkflowState::AwaitingSecondPoint);
            return Ok(Notice::WaterAnchored(point));
        };

        let record = self.measure(buffer, water, point)?;
        self.roi.push(point);
        self.ledger.append(record.clone());
        self.previous = Some(PreviousStep {
            index: self.queue.current_index(),
            record_len: Some(self.ledger.len()),
        });
        log::info!(
            "Measured {}: water B={} paper B={} DOC={:.5}",
            record.image_name,
            record.water.b,
            record.paper.b,
            record.estimated_doc
        );

        let then = if !self.queue.is_batch() {
            self.unload(WorkflowState::Empty);
            AfterMeasurement::Idle
        } else if self.queue.advance().is_some() {
            match self.load_current() {
                Ok(Notice::ImageReady { name, index, total }) => AfterMeasurement::NextImage { name, index, total },
                Ok(_) => AfterMeasurement::Idle,
                Err(e) => AfterMeasurement::NextImageFailed(e),
            }
        } else {
            self.exhaust();
            AfterMeasurement::QueueExhausted
        };

        Ok(Notice::Measured { record, then })
    }

    /// Move to the next batch photo without recording anything
    pub fn skip_to_next(&mut self) -> Result<Notice> {
        if !self.queue.is_batch()
            || self.queue.current_index() == 0
            || self.state == WorkflowState::QueueExhausted
        {
            return Ok(Notice::Ignored);
        }

        self.previous = Some(PreviousStep {
            index: self.queue.current_index(),
            record_len: None,
        });

        if self.queue.advance().is_some() {
            self.load_current()
        } else {
            self.exhaust();
            Ok(Notice::QueueExhausted)
        }
    }

    /// Reload the last measured or skipped photo so both patches can be picked again
    pub fn redo_last_measurement(&mut self) -> Result<Notice> {
        let Some(previous) = self.previous else {
            return Ok(Notice::Ignored);
        };

        self.queue.seek(previous.index);
        let name = match self.load_current()? {
            Notice::ImageReady { name, .. } => name,
            _ => return Ok(Notice::Ignored),
        };

        let retracted = match self.config.redo {
            RedoPolicy::AppendDuplicate => None,
            RedoPolicy::Retract => self.retract(previous, &name),
        };

        Ok(Notice::RedoReady { name, retracted })
    }

    /// Drop the newest ledger row, whichever photo it belongs to
    pub fn delete_last_line(&mut self) -> Notice {
        let removed = self.ledger.delete_last();
        if let Some(record) = &removed {
            log::info!("Deleted row for {}", record.image_name);
        }
        Notice::RowDeleted(removed)
    }

    /// Clear results and position; the selected files stay queued
    pub fn reset(&mut self) -> Notice {
        self.ledger.reset();
        self.queue.rewind();
        self.previous = None;
        self.unload(WorkflowState::Empty);
        log::info!("Session reset");
        Notice::Reset
    }

    // ========== Internals ==========

    fn measure(&self, buffer: &PixelBuffer, water: Point, paper: Point) -> Result<MeasurementRecord> {
        let water_stats = patch_stats(buffer, water, self.config.patch)?;
        let paper_stats = patch_stats(buffer, paper, self.config.patch)?;
        let name = self.queue.current_path().map(image_name).unwrap_or_default();

        Ok(MeasurementRecord {
            image_name: name,
            water: water_stats,
            paper: paper_stats,
            estimated_doc: self.estimator.estimate(water_stats.b, paper_stats.b),
        })
    }

    /// Decode the photo at the current position
    ///
    /// Clicks are only accepted again once decoding succeeded. On failure the
    /// position stays on the broken photo so skipping moves past it.
    fn load_current(&mut self) -> Result<Notice> {
        self.unload(WorkflowState::Empty);

        let Some(path) = self.queue.current_path() else {
            return Ok(Notice::Ignored);
        };
        let name = image_name(path);

        match self.decoder.decode(path) {
            Ok(buffer) => {
                self.buffer = Some(buffer);
                self.generation += 1;
                self.set_state(WorkflowState::AwaitingFirstPoint);
                Ok(Notice::ImageReady {
                    name,
                    index: self.queue.current_index(),
                    total: self.queue.len(),
                })
            }
            Err(e) => {
                log::warn!("Could not load {}: {}", name, e);
                Err(e)
            }
        }
    }

    fn exhaust(&mut self) {
        self.unload(WorkflowState::QueueExhausted);
        log::info!("Reached the end of the batch ({} images)", self.queue.len());
    }

    /// Drop the photo and click points, then enter `state`
    fn unload(&mut self, state: WorkflowState) {
        self.buffer = None;
        self.roi.clear();
        self.set_state(state);
    }

    fn set_state(&mut self, state: WorkflowState) {
        if self.state != state {
            log::debug!("Workflow {:?} -> {:?}", self.state, state);
        }
        self.state = state;
    }

    /// Remove the record the previous measurement produced, if it is still the newest row
    fn retract(&mut self, previous: PreviousStep, name: &str) -> Option<MeasurementRecord> {
        let record_len = previous.record_len?;
        if self.ledger.len() != record_len || self.ledger.last()?.image_name != name {
            return None;
        }

        self.previous = Some(PreviousStep {
            record_len: None,
            ..previous
        });
        let removed = self.ledger.delete_last();
        log::info!("Retracted row for {} before redo", name);
        removed
    }
}
