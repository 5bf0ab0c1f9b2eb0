use std::path::Path;

use iced::widget::{button, column, container, image, row, text, Space};
use iced::{Alignment, ContentFit, Element, Length, Theme};

use crate::app::{scaled, Message};
use crate::theme::preview_background;

pub fn view<'a>(
    fs: f32,
    preview: Option<&image::Handle>,
    capturing: bool,
    face_classifier: Option<&Path>,
    eye_classifier: Option<&Path>,
) -> Element<'a, Message> {
    let preview_area: Element<'a, Message> = match preview {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => text(if capturing {
            "Waiting for camera..."
        } else {
            "Camera is stopped"
        })
        .size(scaled(14.0, fs))
        .into(),
    };

    let preview_box = container(preview_area)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(|theme: &Theme| container::Style {
            background: Some(preview_background(theme).into()),
            ..container::rounded_box(theme)
        });

    let toggle_label = if capturing { "Stop Camera" } else { "Start Camera" };
    let controls = row![
        button(text(toggle_label).size(scaled(13.0, fs)))
            .on_press(Message::ToggleCapture)
            .padding([8, 18])
            .style(button::primary),
        button(text("Capture Image").size(scaled(13.0, fs)))
            .on_press_maybe(capture_message(capturing))
            .padding([8, 18])
            .style(button::secondary),
        button(text("Load Classifier").size(scaled(13.0, fs)))
            .on_press(Message::LoadClassifier)
            .padding([8, 18])
            .style(button::secondary),
        button(text("Load Eye Classifier").size(scaled(13.0, fs)))
            .on_press(Message::LoadEyeClassifier)
            .padding([8, 18])
            .style(button::secondary),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    column![
        preview_box,
        Space::new().height(12),
        controls,
        Space::new().height(8),
        classifier_line("Face", face_classifier, fs),
        classifier_line("Eyes", eye_classifier, fs),
    ]
    .spacing(2)
    .into()
}

/// Snapshots are only offered while the camera runs.
fn capture_message(capturing: bool) -> Option<Message> {
    capturing.then_some(Message::CaptureImage)
}

fn classifier_line<'a>(label: &str, path: Option<&Path>, fs: f32) -> Element<'a, Message> {
    let name = path
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "not loaded".to_string());
    text(format!("{label}: {name}"))
        .size(scaled(11.0, fs))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_is_disabled_while_idle() {
        assert!(capture_message(false).is_none());
        assert!(matches!(capture_message(true), Some(Message::CaptureImage)));
    }
}
