use iced::widget::image::{Handle, Image};
use iced::widget::{button, column, row, text};
use iced::{Alignment, Element, Length};

use crate::state::selection::SelectionState;
use crate::Message;

const IMAGE_HEIGHT: f32 = 400.0;

/// Single-image review screen: step through, reorder, remove
pub fn view<'a>(selection: &'a SelectionState, status: &'a str) -> Element<'a, Message> {
    let (info, image): (String, Element<'a, Message>) = match selection.current_entry() {
        Some(entry) => (
            format!(
                "Image {} of {} - {}",
                selection.current() + 1,
                selection.len(),
                entry.timestamp.format("%Y-%m-%d %H:%M:%S")
            ),
            Image::new(Handle::from_path(&entry.path))
                .height(Length::Fixed(IMAGE_HEIGHT))
                .into(),
        ),
        None => ("No images to display".to_string(), text("").into()),
    };

    column![
        text("Review Sheet Music Images").size(24),
        text(info),
        image,
        row![
            button("◀ Previous").on_press(Message::Previous),
            button("Next ▶").on_press(Message::Next),
        ]
        .spacing(10),
        row![
            button("Move Up").on_press(Message::MoveUp),
            button("Move Down").on_press(Message::MoveDown),
            button("Remove from List").on_press(Message::RemoveCurrent),
        ]
        .spacing(10),
        row![
            button("Compile Selected Images").on_press(Message::Compile),
            button("Cancel").on_press(Message::Cancel),
        ]
        .spacing(10),
        text(status).size(14),
    ]
    .spacing(16)
    .padding(20)
    .align_x(Alignment::Center)
    .into()
}
