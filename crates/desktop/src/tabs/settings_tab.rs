use std::path::Path;

use iced::widget::{button, checkbox, column, pick_list, row, slider, text, text_input, Space};
use iced::{Alignment, Element, Length};

use crate::app::{scaled, Message};
use crate::settings::{Appearance, Settings};

const CAMERA_INDICES: &[u32] = &[0, 1, 2, 3, 4, 5, 6, 7];

pub fn view<'a>(settings: &'a Settings) -> Element<'a, Message> {
    let fs = settings.font_scale;

    column![
        text("Capture").size(scaled(16.0, fs)),
        Space::new().height(8),
        labeled(
            "Camera",
            pick_list(
                CAMERA_INDICES,
                Some(settings.camera_index),
                Message::CameraIndexChanged
            )
            .text_size(scaled(13.0, fs))
            .into(),
            fs,
        ),
        text("Applies the next time the camera starts.")
            .size(scaled(11.0, fs)),
        Space::new().height(8),
        labeled(
            "Snapshot prefix",
            text_input("face_detection", &settings.snapshot_prefix)
                .on_input(Message::SnapshotPrefixChanged)
                .size(scaled(13.0, fs))
                .width(Length::Fixed(220.0))
                .into(),
            fs,
        ),
        Space::new().height(20),
        text("Files").size(scaled(16.0, fs)),
        Space::new().height(8),
        path_row(
            "Cascade folder",
            settings.cascade_dir.as_deref(),
            "haarcascades next to the app",
            Message::SelectCascadeDir,
            fs,
        ),
        path_row(
            "Overlay font",
            settings.font_path.as_deref(),
            "system default",
            Message::SelectFont,
            fs,
        ),
        Space::new().height(20),
        text("Appearance").size(scaled(16.0, fs)),
        Space::new().height(8),
        labeled(
            "Mode",
            pick_list(Appearance::ALL, Some(settings.appearance), Message::AppearanceChanged)
                .text_size(scaled(13.0, fs))
                .into(),
            fs,
        ),
        Space::new().height(8),
        checkbox(settings.high_contrast)
            .label("High contrast")
            .on_toggle(Message::HighContrastChanged)
            .text_size(scaled(13.0, fs)),
        Space::new().height(8),
        row![
            text("Font size").size(scaled(13.0, fs)),
            slider(0.8..=1.5, settings.font_scale, Message::FontScaleChanged).step(0.05),
            text(format!("{:.0}%", settings.font_scale * 100.0)).size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    ]
    .spacing(4)
    .into()
}

fn labeled<'a>(label: &'a str, control: Element<'a, Message>, fs: f32) -> Element<'a, Message> {
    row![text(label).size(scaled(13.0, fs)).width(Length::Fixed(130.0)), control]
        .spacing(12)
        .align_y(Alignment::Center)
        .into()
}

fn path_row<'a>(
    label: &'a str,
    path: Option<&Path>,
    fallback: &'a str,
    on_browse: Message,
    fs: f32,
) -> Element<'a, Message> {
    let shown = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| fallback.to_string());
    row![
        text(label).size(scaled(13.0, fs)).width(Length::Fixed(130.0)),
        text(shown).size(scaled(12.0, fs)).width(Length::Fill),
        button(text("Change").size(scaled(13.0, fs)))
            .on_press(on_browse)
            .padding([6, 14])
            .style(button::secondary),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}
