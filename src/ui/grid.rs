/// Grid selection screen
///
/// Thumbnails in three columns, each with an "Include" checkbox.
/// Clicking a thumbnail opens a larger preview above the grid.

use iced::widget::image::{Handle, Image};
use iced::widget::{button, checkbox, column, container, mouse_area, row, scrollable, text, Column, Row};
use iced::{Alignment, Element, Length};

use crate::state::selection::SelectionState;
use crate::Message;

/// Thumbnails per row
const COLUMNS: usize = 3;
/// Longest thumbnail edge in logical pixels
const THUMB_SIZE: f32 = 180.0;
const PREVIEW_HEIGHT: f32 = 420.0;

pub fn view<'a>(selection: &'a SelectionState, status: &'a str, preview: Option<usize>) -> Element<'a, Message> {
    let count = selection.included_count();

    let header = column![
        text("Select Screenshots to Compile").size(24),
        text(format!(
            "Found {} screenshots - Select which ones to include",
            selection.len()
        )),
        row![
            button("Select All").on_press(Message::SelectAll),
            button("Select None").on_press(Message::SelectNone),
        ]
        .spacing(10),
    ]
    .spacing(8)
    .align_x(Alignment::Center);

    let mut content = Column::new().spacing(10).push(header);

    if let Some(entry) = preview.and_then(|i| selection.entries().get(i)) {
        content = content.push(
            column![
                text(format!(
                    "{} - {}",
                    entry.file_name(),
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S")
                )),
                Image::new(Handle::from_path(&entry.path)).height(Length::Fixed(PREVIEW_HEIGHT)),
                button("Close Preview").on_press(Message::ClosePreview),
            ]
            .spacing(6)
            .align_x(Alignment::Center),
        );
    }

    let tiles: Vec<Element<'a, Message>> = selection
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| -> Element<'a, Message> {
            let tile = column![
                checkbox("Include", selection.is_included(i))
                    .on_toggle(move |_| Message::ToggleInclude(i)),
                mouse_area(
                    Image::new(Handle::from_path(&entry.path))
                        .width(Length::Fixed(THUMB_SIZE))
                        .height(Length::Fixed(THUMB_SIZE)),
                )
                .on_press(Message::Preview(i)),
                text(format!(
                    "Screenshot {}\n{}",
                    i + 1,
                    entry.timestamp.format("%m/%d %H:%M")
                ))
                .size(12),
            ]
            .spacing(4)
            .align_x(Alignment::Center);

            container(tile)
                .padding(6)
                .width(Length::FillPortion(1))
                .style(container::rounded_box)
                .into()
        })
        .collect();

    let mut grid = Column::new().spacing(10);
    let mut tiles = tiles.into_iter().peekable();
    while tiles.peek().is_some() {
        let cells: Vec<Element<'a, Message>> = tiles.by_ref().take(COLUMNS).collect();
        grid = grid.push(Row::with_children(cells).spacing(10));
    }

    let actions = row![
        button(text(format!("Compile Selected Pages ({})", count)))
            .on_press_maybe((count > 0).then_some(Message::Compile)),
        button("Review Order").on_press_maybe((count > 0).then_some(Message::ReviewOrder)),
        button("Cancel").on_press(Message::Cancel),
    ]
    .spacing(10);

    content
        .push(scrollable(grid).height(Length::Fill))
        .push(actions)
        .push(text(status).size(14))
        .padding(20)
        .align_x(Alignment::Center)
        .into()
}
