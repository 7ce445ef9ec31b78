use iced::widget::{button, column, row, text};
use iced::{Alignment, Element};

use crate::state::settings::Settings;
use crate::Message;

/// Start screen: folders, load button and status line
pub fn view<'a>(settings: &'a Settings, status: &'a str, busy: bool, can_open_output: bool) -> Element<'a, Message> {
    let load = button("Load & Review Screenshots")
        .on_press_maybe((!busy).then_some(Message::LoadScreenshots))
        .padding(10);

    let open_folder = button("Open Folder")
        .on_press_maybe(can_open_output.then_some(Message::OpenOutputFolder));

    column![
        text("Sheet Music Compiler").size(32),
        text("Compile sheet music screenshots into a Word document").size(14),
        row![
            text(format!("Source: {}", settings.source_folder.display())),
            button("Change…").on_press(Message::PickSource),
        ]
        .spacing(10)
        .align_y(Alignment::Center),
        row![
            text(format!("Output: {}", settings.output_folder.display())),
            button("Change…").on_press(Message::PickOutput),
        ]
        .spacing(10)
        .align_y(Alignment::Center),
        load,
        text(status).size(16),
        open_folder,
    ]
    .spacing(20)
    .padding(40)
    .align_x(Alignment::Center)
    .into()
}
