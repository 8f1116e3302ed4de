use iced::widget::{button, column, container, row, scrollable, text, Space};
use iced::{event, mouse, window, Alignment, Element, Event, Length, Subscription, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::PathBuf;

mod error;
mod export;
mod ingest;
mod state;
mod ui;

use error::{ExportError, IngestError};
use export::{ExportJob, Exporter};
use ingest::IngestTally;
use state::board::{Slot, TierStore};
use state::data::{RenderMode, TierItem};
use state::settings::AppConfig;
use ui::drag::{DragEvent, DragState};

/// Main application state
struct TierMaker {
    /// The board and its transitions
    store: TierStore,
    /// In-progress drag gesture
    drag: DragState,
    /// Edit or presentation view
    mode: RenderMode,
    /// Export state machine
    exporter: Exporter,
    /// User configuration
    config: AppConfig,
    /// Ingest outcomes since start
    tally: IngestTally,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Add images"
    PickFiles,
    /// User clicked "Import folder"
    PickFolder,
    /// A file was dropped onto the window
    FileDropped(PathBuf),
    /// One background decode finished
    ItemLoaded(Result<TierItem, IngestError>),
    /// Pointer event from the board
    Drag(DragEvent),
    /// Delete button on a thumbnail
    Remove(Slot),
    /// User clicked "Clear all"
    ClearAll,
    /// Switch between edit and presentation view
    ToggleMode,
    /// User clicked "Export"
    Export,
    /// Presentation mode has settled; capture now
    ExportSettled,
    /// Background export finished
    ExportFinished(Result<PathBuf, ExportError>),
}

impl TierMaker {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let app = Self::with_config(AppConfig::load_or_default());
        log::info!("Tier Maker initialized");
        (app, Task::none())
    }

    fn with_config(config: AppConfig) -> Self {
        TierMaker {
            store: TierStore::new(),
            drag: DragState::default(),
            mode: RenderMode::Edit,
            exporter: Exporter::new(),
            config,
            tally: IngestTally::default(),
            status: "Ready. Add images to start ranking.".to_string(),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFiles => {
                let files = FileDialog::new()
                    .set_title("Select Images")
                    .add_filter("Images", &ingest::loader::IMAGE_EXTENSIONS)
                    .pick_files()
                    .unwrap_or_default();
                self.load_paths(files)
            }
            Message::PickFolder => {
                let Some(folder) = FileDialog::new()
                    .set_title("Select Folder with Images")
                    .pick_folder()
                else {
                    return Task::none();
                };
                self.load_paths(ingest::loader::scan_folder(&folder))
            }
            Message::FileDropped(path) => {
                if path.is_dir() {
                    self.load_paths(ingest::loader::scan_folder(&path))
                } else if ingest::loader::is_image_path(&path) {
                    self.load_paths(vec![path])
                } else {
                    log::info!("Ignoring dropped file {}", path.display());
                    Task::none()
                }
            }
            Message::ItemLoaded(result) => {
                ingest::apply_result(&mut self.store, &mut self.tally, result);
                self.status = self.ingest_status();
                Task::none()
            }
            Message::Drag(event) => {
                if self.exporter.is_busy() {
                    self.drag.cancel();
                    return Task::none();
                }
                if let Some(mv) = self.drag.update(event, self.store.board()) {
                    if self.store.move_item(mv) {
                        log::debug!("Moved {} from {:?} to {:?}", mv.item, mv.from, mv.to);
                    }
                }
                Task::none()
            }
            Message::Remove(slot) => {
                if let Some(item) = self.store.remove(slot) {
                    log::info!("Removed {}", item.id);
                    self.status = format!("Removed {}.", item.display_name());
                }
                Task::none()
            }
            Message::ClearAll => {
                if self.store.board().is_empty() {
                    return Task::none();
                }
                let confirmed = MessageDialog::new()
                    .set_level(MessageLevel::Warning)
                    .set_title("Clear all images?")
                    .set_description("Every image on the board will be removed. This cannot be undone.")
                    .set_buttons(MessageButtons::YesNo)
                    .show();
                if confirmed == MessageDialogResult::Yes {
                    let count = self.store.board().len();
                    self.drag.cancel();
                    self.store.reset();
                    self.status = "Board cleared.".to_string();
                    log::info!("Board cleared ({} images removed)", count);
                }
                Task::none()
            }
            Message::ToggleMode => {
                if !self.exporter.is_busy() {
                    self.drag.cancel();
                    self.mode = self.mode.toggled();
                }
                Task::none()
            }
            Message::Export => {
                if !self.exporter.begin(self.mode) {
                    return Task::none();
                }
                log::info!("Export started");
                self.drag.cancel();
                self.mode = RenderMode::Presentation;
                self.status = "Exporting...".to_string();
                Task::perform(export::settle(), |()| Message::ExportSettled)
            }
            Message::ExportSettled => {
                let dir = self.config.export.resolve_output_dir();
                let job = ExportJob {
                    scene: export::scene::build(self.store.board(), &self.config, self.mode),
                    options: export::raster::RasterOptions::for_export(&self.config.export),
                    path: self.exporter.target_path(&dir),
                };
                Task::perform(export::run(job), Message::ExportFinished)
            }
            Message::ExportFinished(result) => {
                if let Some(previous) = self.exporter.finish() {
                    self.mode = previous;
                }
                match result {
                    Ok(path) => {
                        self.status = format!("Saved {}", path.display());
                    }
                    Err(e) => {
                        log::error!("Export failed: {}", e);
                        self.status = "Export failed.".to_string();
                        let _ = MessageDialog::new()
                            .set_level(MessageLevel::Error)
                            .set_title("Export failed")
                            .set_description(format!(
                                "The image could not be generated.\n\n{e}"
                            ))
                            .set_buttons(MessageButtons::Ok)
                            .show();
                    }
                }
                Task::none()
            }
        }
    }

    /// Start one background decode per path
    fn load_paths(&mut self, paths: Vec<PathBuf>) -> Task<Message> {
        if paths.is_empty() {
            return Task::none();
        }
        self.status = format!("Loading {} image(s)...", paths.len());
        Task::batch(
            paths
                .into_iter()
                .map(|path| Task::perform(ingest::loader::load_item(path), Message::ItemLoaded)),
        )
    }

    fn ingest_status(&self) -> String {
        let IngestTally { loaded, failed } = self.tally;
        if failed == 0 {
            format!("{loaded} image(s) loaded.")
        } else {
            format!("{loaded} image(s) loaded, {failed} could not be read.")
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let board = self.store.board();
        let busy = self.exporter.is_busy();

        let mode_label = if self.mode.is_presentation() {
            "Back to edit"
        } else {
            "Preview"
        };
        let export_label = if busy { "Exporting..." } else { "Export PNG" };

        let header = row![
            text("Tier Maker").size(32),
            Space::with_width(Length::Fill),
            button(mode_label)
                .on_press_maybe((!busy).then_some(Message::ToggleMode))
                .padding([8, 16])
                .style(button::secondary),
            button(export_label)
                .on_press_maybe((!busy).then_some(Message::Export))
                .padding([8, 16]),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let mut content = column![
            header,
            ui::board::tier_rows(board, &self.config, &self.drag, self.mode),
        ]
        .spacing(24)
        .max_width(1100.0);

        if !self.mode.is_presentation() {
            let controls = row![
                button("Add images").on_press(Message::PickFiles).padding([10, 20]),
                button("Import folder")
                    .on_press(Message::PickFolder)
                    .padding([10, 20])
                    .style(button::secondary),
                button("Clear all")
                    .on_press(Message::ClearAll)
                    .padding([10, 20])
                    .style(button::danger),
                Space::with_width(Length::Fill),
                text("Drag images onto a tier. Use Preview to check the result.")
                    .size(14)
                    .color(ui::palette::MUTED),
            ]
            .spacing(8)
            .align_y(Alignment::Center);

            content = content
                .push(controls)
                .push(ui::board::pool_panel(board, &self.drag));
        }

        content = content.push(text(&self.status).size(14).color(ui::palette::MUTED));

        scrollable(
            container(content)
                .width(Length::Fill)
                .padding(32)
                .center_x(Length::Fill),
        )
        .into()
    }

    /// Global events: drop completion and files dropped on the window
    fn subscription(&self) -> Subscription<Message> {
        let files = event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        });

        if self.drag.is_dragging() {
            let release = event::listen_with(|event, _status, _window| match event {
                Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                    Some(Message::Drag(DragEvent::Released))
                }
                _ => None,
            });
            Subscription::batch([files, release])
        } else {
            files
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("Tier Maker v{} starting", env!("CARGO_PKG_VERSION"));

    iced::application("Tier Maker", TierMaker::update, TierMaker::view)
        .subscription(TierMaker::subscription)
        .theme(TierMaker::theme)
        .window_size((1200.0, 900.0))
        .centered()
        .run_with(TierMaker::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::board::Move;
    use crate::state::data::{test_item, TierId};

    /// App with one item in Legendary and one left in the pool
    fn ranked_app() -> TierMaker {
        let mut app = TierMaker::with_config(AppConfig::default());
        app.store.ingest(test_item("a.png"));
        app.store.ingest(test_item("b.png"));
        let item = app.store.board().lane(TierId::Pool)[0].id;
        assert!(app.store.move_item(Move {
            item,
            from: Slot::new(TierId::Pool, 0),
            to: Slot::new(TierId::Legendary, 0),
        }));
        app
    }

    fn drag_to_elite(app: &mut TierMaker) {
        let item = app.store.board().lane(TierId::Legendary)[0].id;
        let _ = app.update(Message::Drag(DragEvent::Picked {
            item,
            slot: Slot::new(TierId::Legendary, 0),
        }));
        let _ = app.update(Message::Drag(DragEvent::LeftLane(TierId::Legendary)));
        let _ = app.update(Message::Drag(DragEvent::EnteredLane(TierId::Elite)));
        let _ = app.update(Message::Drag(DragEvent::Released));
    }

    #[test]
    fn test_ranked_items_can_be_dragged_in_presentation_mode() {
        let mut app = ranked_app();
        let _ = app.update(Message::ToggleMode);
        assert!(app.mode.is_presentation());

        drag_to_elite(&mut app);

        let board = app.store.board();
        assert_eq!(board.lane(TierId::Elite).len(), 1);
        assert_eq!(board.lane(TierId::Legendary).len(), 0);
        assert_eq!(board.lane(TierId::Pool).len(), 1);
        assert!(!app.drag.is_dragging());
    }

    #[test]
    fn test_drag_is_ignored_while_exporting() {
        let mut app = ranked_app();
        let _ = app.update(Message::Export);
        assert!(app.exporter.is_busy());
        let before = std::sync::Arc::clone(app.store.board());

        drag_to_elite(&mut app);

        assert!(std::sync::Arc::ptr_eq(&before, app.store.board()));
        assert!(!app.drag.is_dragging());
    }
}
