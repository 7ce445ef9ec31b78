use iced::widget::container;
use iced::{Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod compile;
mod error;
mod scan;
mod state;
mod ui;

use compile::CompileReport;
use scan::ingest::Scan;
use state::selection::{Direction, FinalizeMode, SelectionState};
use state::settings::Settings;

const READY: &str = "Ready to load screenshots";

/// Which screen is showing
enum Screen {
    Home,
    /// Grid of thumbnails with include checkboxes
    Select(SelectionState),
    /// One image at a time, reorder and remove
    Review(SelectionState),
}

/// Main application state
struct SheetMusicCompiler {
    settings: Settings,
    settings_path: PathBuf,
    screen: Screen,
    /// Status message to display to the user
    status: String,
    /// A scan or compile is running in the background
    busy: bool,
    /// Entry shown enlarged on the grid screen
    preview: Option<usize>,
    last_report: Option<CompileReport>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    PickSource,
    PickOutput,
    LoadScreenshots,
    ScanComplete(Result<Scan, String>),
    ToggleInclude(usize),
    SelectAll,
    SelectNone,
    Preview(usize),
    ClosePreview,
    ReviewOrder,
    Previous,
    Next,
    MoveUp,
    MoveDown,
    RemoveCurrent,
    Compile,
    CompileComplete(Result<CompileReport, String>),
    OpenOutputFolder,
    Cancel,
}

impl SheetMusicCompiler {
    fn new() -> (Self, Task<Message>) {
        let settings_path = Settings::default_path();
        let settings = Settings::load_or_default(&settings_path);

        info!(
            "🎼 Sheet Music Compiler ready (source: {}, output: {})",
            settings.source_folder.display(),
            settings.output_folder.display()
        );

        (
            SheetMusicCompiler {
                settings,
                settings_path,
                screen: Screen::Home,
                status: READY.to_string(),
                busy: false,
                preview: None,
                last_report: None,
            },
            Task::none(),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickSource => {
                if let Some(folder) = pick_folder("Select Screenshots Folder", &self.settings.source_folder) {
                    self.settings.source_folder = folder;
                    self.save_settings();
                }
                Task::none()
            }
            Message::PickOutput => {
                if let Some(folder) = pick_folder("Select Output Folder", &self.settings.output_folder) {
                    self.settings.output_folder = folder;
                    self.save_settings();
                }
                Task::none()
            }
            Message::LoadScreenshots => {
                self.busy = true;
                self.status = "Loading screenshots...".to_string();
                Task::perform(
                    scan::ingest::scan_in_background(self.settings.clone()),
                    Message::ScanComplete,
                )
            }
            Message::ScanComplete(result) => {
                self.busy = false;
                match result {
                    Ok(scan) => {
                        self.status = format!(
                            "Found {} screenshots - Select which ones to include",
                            scan.entries.len()
                        );
                        self.preview = None;
                        self.screen = Screen::Select(scan.into_selection());
                    }
                    Err(e) => {
                        self.status = e;
                        self.screen = Screen::Home;
                    }
                }
                Task::none()
            }
            Message::ToggleInclude(index) => {
                if let Screen::Select(selection) = &mut self.screen {
                    if let Err(e) = selection.toggle_include(index) {
                        self.status = e.to_string();
                    }
                }
                Task::none()
            }
            Message::SelectAll | Message::SelectNone => {
                if let Screen::Select(selection) = &mut self.screen {
                    let result = if matches!(message, Message::SelectAll) {
                        selection.select_all()
                    } else {
                        selection.select_none()
                    };
                    if let Err(e) = result {
                        self.status = e.to_string();
                    }
                }
                Task::none()
            }
            Message::Preview(index) => {
                self.preview = Some(index);
                Task::none()
            }
            Message::ClosePreview => {
                self.preview = None;
                Task::none()
            }
            Message::ReviewOrder => {
                if let Screen::Select(selection) = &mut self.screen {
                    match selection.into_review() {
                        Ok(review) => {
                            self.status = String::new();
                            self.preview = None;
                            self.screen = Screen::Review(review);
                        }
                        Err(e) => self.status = e.to_string(),
                    }
                }
                Task::none()
            }
            Message::Previous | Message::Next => {
                if let Screen::Review(selection) = &mut self.screen {
                    if matches!(message, Message::Previous) {
                        selection.previous();
                    } else {
                        selection.next();
                    }
                }
                Task::none()
            }
            Message::MoveUp | Message::MoveDown => {
                if let Screen::Review(selection) = &mut self.screen {
                    let direction = if matches!(message, Message::MoveUp) {
                        Direction::Up
                    } else {
                        Direction::Down
                    };
                    if let Err(e) = selection.move_entry(selection.current(), direction) {
                        self.status = e.to_string();
                    }
                }
                Task::none()
            }
            Message::RemoveCurrent => {
                if let Screen::Review(selection) = &mut self.screen {
                    match selection.remove(selection.current()) {
                        Ok(removed) => self.status = format!("Removed {}", removed.file_name()),
                        Err(e) => self.status = e.to_string(),
                    }
                }
                Task::none()
            }
            Message::Compile => {
                let pages = match &mut self.screen {
                    Screen::Select(selection) => selection.finalize(FinalizeMode::Included),
                    Screen::Review(selection) => selection.finalize(FinalizeMode::All),
                    Screen::Home => return Task::none(),
                };

                match pages {
                    Ok(pages) => {
                        self.busy = true;
                        self.preview = None;
                        self.screen = Screen::Home;
                        self.status = format!("Creating Word document ({} pages)...", pages.len());
                        Task::perform(
                            compile::compile_in_background(pages, self.settings.output_folder.clone()),
                            Message::CompileComplete,
                        )
                    }
                    Err(e) => {
                        self.status = e.to_string();
                        Task::none()
                    }
                }
            }
            Message::CompileComplete(result) => {
                self.busy = false;
                match result {
                    Ok(report) => {
                        self.status = format!(
                            "✅ Sheet music document created: {} in {}",
                            report.file_name(),
                            self.settings.output_folder.display()
                        );
                        if !report.failures.is_empty() {
                            self.status
                                .push_str(&format!(" ({} pages could not be loaded)", report.failures.len()));
                        }
                        self.last_report = Some(report);
                    }
                    Err(e) => {
                        warn!("Compile failed: {}", e);
                        self.status = e;
                    }
                }
                Task::none()
            }
            Message::OpenOutputFolder => {
                compile::reveal::reveal(&self.settings.output_folder);
                Task::none()
            }
            Message::Cancel => {
                self.screen = Screen::Home;
                self.preview = None;
                self.status = READY.to_string();
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let content = match &self.screen {
            Screen::Home => ui::home::view(
                &self.settings,
                &self.status,
                self.busy,
                self.last_report.is_some(),
            ),
            Screen::Select(selection) => ui::grid::view(selection, &self.status, self.preview),
            Screen::Review(selection) => ui::review::view(selection, &self.status),
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save(&self.settings_path) {
            warn!("Could not save settings: {}", e);
        }
    }
}

/// Show the native folder picker, starting at `current` when it exists
fn pick_folder(title: &str, current: &std::path::Path) -> Option<PathBuf> {
    let mut dialog = FileDialog::new().set_title(title);
    if current.is_dir() {
        dialog = dialog.set_directory(current);
    }
    dialog.pick_folder()
}

fn main() -> iced::Result {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheet_music_compiler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    iced::application(
        "Sheet Music Compiler",
        SheetMusicCompiler::update,
        SheetMusicCompiler::view,
    )
    .theme(SheetMusicCompiler::theme)
    .centered()
    .run_with(SheetMusicCompiler::new)
}
