use iced::widget::image::{Handle, Image};
use iced::widget::{button, canvas, column, container, row, scrollable, stack, text, Column, Row};
use iced::{ContentFit, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

use doc_analyzer::export;
use doc_analyzer::state::{AfterMeasurement, Point as PixelPoint};
use doc_analyzer::{Config, Notice, WorkflowController, WorkflowState};

mod ui;

const HELP: &str = "Click the water sample first, then the white paper. \
Each click marks the top-left corner of the sampled patch.";

/// Main application state
struct DocAnalyzer {
    /// The annotation session
    workflow: WorkflowController,
    /// Display copy of the decoded photo, keyed by the controller's decode count
    preview: Option<(u64, Handle)>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    SelectImage,
    SelectFolder,
    StartAnalysis,
    /// A click on the photo, already in image pixels
    ImageClicked(PixelPoint),
    Skip,
    Redo,
    DeleteLast,
    Reset,
    Download,
    /// Background CSV write finished
    DownloadComplete(Result<PathBuf, String>),
}

impl DocAnalyzer {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let (workflow, status) = match Config::load().and_then(WorkflowController::new) {
            Ok(workflow) => (workflow, "Select an image or a folder to begin.".to_string()),
            Err(e) => {
                log::error!("{e}");
                (WorkflowController::default(), format!("{e}. Using default calibration."))
            }
        };
        let config = workflow.config();
        log::info!(
            "Calibration offset={} slope={}, patch {}x{}",
            config.calibration.offset,
            config.calibration.slope,
            config.patch.width,
            config.patch.height
        );

        (
            DocAnalyzer {
                workflow,
                preview: None,
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let result = match message {
            Message::SelectImage => {
                let Some(path) = FileDialog::new()
                    .set_title("Select a photo")
                    .add_filter("Images", &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"])
                    .pick_file()
                else {
                    return Task::none();
                };
                self.workflow.select_single_image(path)
            }
            Message::SelectFolder => {
                let Some(folder) = FileDialog::new()
                    .set_title("Select a folder of photos")
                    .pick_folder()
                else {
                    return Task::none();
                };
                self.workflow.select_folder(&folder)
            }
            Message::StartAnalysis => self.workflow.start_analysis(),
            Message::ImageClicked(point) => self.workflow.submit_point(point),
            Message::Skip => self.workflow.skip_to_next(),
            Message::Redo => self.workflow.redo_last_measurement(),
            Message::DeleteLast => Ok(self.workflow.delete_last_line()),
            Message::Reset => Ok(self.workflow.reset()),
            Message::Download => return self.download(),
            Message::DownloadComplete(Ok(path)) => {
                self.status = format!("Saved results to {}", path.display());
                return Task::none();
            }
            Message::DownloadComplete(Err(e)) => {
                log::error!("CSV download failed: {e}");
                self.status = format!("Could not save results: {e}");
                return Task::none();
            }
        };

        match result {
            Ok(notice) => {
                if let Some(status) = describe(&notice) {
                    self.status = status;
                }
            }
            Err(e) => {
                self.status = format!("{e}");
                if self.workflow.queue().is_batch() && self.workflow.state() == WorkflowState::Empty {
                    self.status.push_str(". Skip to continue with the next image.");
                }
            }
        }

        self.refresh_preview();
        Task::none()
    }

    /// Rebuild the displayed photo whenever the controller decoded a new one
    fn refresh_preview(&mut self) {
        let Some((_, buffer)) = self.workflow.current_image() else {
            self.preview = None;
            return;
        };
        let generation = self.workflow.image_generation();
        if matches!(&self.preview, Some((shown, _)) if *shown == generation) {
            return;
        }

        let handle = Handle::from_rgba(buffer.width(), buffer.height(), buffer.to_rgba8());
        self.preview = Some((generation, handle));
    }

    /// Ask where to save the CSV, then write it in the background
    fn download(&mut self) -> Task<Message> {
        if self.workflow.ledger().is_empty() {
            self.status = "No results to download yet.".to_string();
            return Task::none();
        }

        let Some(path) = FileDialog::new()
            .set_title("Save results")
            .set_file_name(export::default_file_name())
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return Task::none();
        };

        self.status = format!("Saving to {}...", path.display());
        Task::perform(export::save_csv(path, self.workflow.ledger().export()), |result| {
            Message::DownloadComplete(result.map_err(|e| e.to_string()))
        })
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let workflow = &self.workflow;
        let has_batch = workflow.queue().is_batch();

        let controls = row![
            button("Select image").on_press(Message::SelectImage),
            button("Select folder").on_press(Message::SelectFolder),
            button("Start analysis").on_press_maybe(has_batch.then_some(Message::StartAnalysis)),
            button("Skip").on_press_maybe(has_batch.then_some(Message::Skip)),
            button("Redo last").on_press_maybe(workflow.previous_index().map(|_| Message::Redo)),
            button("Delete last row").on_press_maybe((!workflow.ledger().is_empty()).then_some(Message::DeleteLast)),
            button("Reset").on_press(Message::Reset),
            button("Download CSV").on_press_maybe((!workflow.ledger().is_empty()).then_some(Message::Download)),
        ]
        .spacing(10);

        let content: Column<Message> = column![
            text("DOC Analyzer").size(32),
            text(HELP).size(14),
            controls,
            text(&self.status).size(16),
            row![self.photo_view(), self.results_view()].spacing(20),
        ]
        .spacing(16)
        .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// The photo with the click overlay on top
    fn photo_view(&self) -> Element<Message> {
        let (Some((_, handle)), Some((_, buffer))) = (&self.preview, self.workflow.current_image()) else {
            let message = match self.workflow.state() {
                WorkflowState::QueueExhausted => "All images analysed.",
                _ => "No image loaded.",
            };
            return container(text(message))
                .center_x(Length::Fixed(ui::MAX_VIEW_WIDTH))
                .center_y(Length::Fixed(ui::MAX_VIEW_HEIGHT))
                .into();
        };

        let size = ui::fit_size(buffer.width(), buffer.height());
        let roi = self.workflow.roi();
        let overlay = ui::overlay::RoiOverlay {
            image_width: buffer.width(),
            image_height: buffer.height(),
            water: roi.water(),
            paper: roi.paper(),
            patch: self.workflow.config().patch,
            accepting: self.workflow.state().accepts_points(),
        };

        stack![
            Image::new(handle.clone())
                .width(Length::Fixed(size.width))
                .height(Length::Fixed(size.height))
                .content_fit(ContentFit::Fill),
            canvas(overlay)
                .width(Length::Fixed(size.width))
                .height(Length::Fixed(size.height)),
        ]
        .into()
    }

    /// Ledger rows in export column order
    fn results_view(&self) -> Element<Message> {
        let header = Row::with_children(export::CSV_HEADER.iter().map(|h| cell(h.to_string()))).spacing(6);
        let rows = self.workflow.ledger().records().iter().map(|r| {
            Row::with_children([
                cell(r.image_name.clone()),
                cell(r.water.r.to_string()),
                cell(r.water.g.to_string()),
                cell(r.water.b.to_string()),
                cell(r.paper.r.to_string()),
                cell(r.paper.g.to_string()),
                cell(r.paper.b.to_string()),
                cell(format!("{:.5}", r.estimated_doc)),
            ])
            .spacing(6)
            .into()
        });

        column![header, scrollable(Column::with_children(rows).spacing(4))]
            .spacing(8)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// One table cell
fn cell<'a>(value: String) -> Element<'a, Message> {
    text(value).size(13).width(Length::Fixed(80.0)).into()
}

/// Turn a controller notice into a status line; `None` keeps the current one
fn describe(notice: &Notice) -> Option<String> {
    let status = match notice {
        Notice::Ignored => return None,
        Notice::RowDeleted(None) => return None,
        Notice::FolderListed { count } => {
            format!("Found {count} images. Press Start analysis to begin.")
        }
        Notice::NoImagesFound => "No images found.".to_string(),
        Notice::ImageReady { name, index, total } => {
            format!("{name} ({index}/{total}): click the water sample.")
        }
        Notice::WaterAnchored(point) => {
            format!("Water patch at ({}, {}). Now click the white paper.", point.x, point.y)
        }
        Notice::Measured { record, then } => {
            let next = match then {
                AfterMeasurement::NextImage { name, index, total } => {
                    format!(" Next: {name} ({index}/{total}), click the water sample.")
                }
                AfterMeasurement::NextImageFailed(e) => {
                    format!(" Could not load the next image ({e}); skip to continue.")
                }
                AfterMeasurement::QueueExhausted => " All images analysed.".to_string(),
                AfterMeasurement::Idle => String::new(),
            };
            format!("{}: estimated DOC {:.5}.{next}", record.image_name, record.estimated_doc)
        }
        Notice::QueueExhausted => "All images analysed.".to_string(),
        Notice::RedoReady { name, retracted } => {
            let removed = if retracted.is_some() { " The previous row was removed." } else { "" };
            format!("Redo {name}: select the water and paper regions again.{removed}")
        }
        Notice::RowDeleted(Some(record)) => format!("Deleted the row for {}.", record.image_name),
        Notice::Reset => "Results cleared.".to_string(),
    };
    Some(status)
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application("DOC Analyzer", DocAnalyzer::update, DocAnalyzer::view)
        .theme(DocAnalyzer::theme)
        .centered()
        .run_with(DocAnalyzer::new)
}
