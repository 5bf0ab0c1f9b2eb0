use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use iced::widget::{button, column, container, image, row, text};
use iced::{window, Element, Length, Subscription, Task, Theme};

use facecam_core::annotation::infrastructure::raster_painter::RasterPainter;
use facecam_core::capture::infrastructure::opencv_camera::OpenCvCamera;
use facecam_core::detection::infrastructure::cascade_resolver;
use facecam_core::detection::infrastructure::opencv_cascade::OpenCvCascadeLoader;
use facecam_core::session::capture_session::{CaptureSession, TickOutcome};
use facecam_core::shared::constants::TICK_INTERVAL;
use facecam_core::snapshot::domain::snapshot_format::{default_snapshot_name, SnapshotFormat};
use facecam_core::snapshot::infrastructure::image_file_writer::ImageFileWriter;

use crate::settings::{Appearance, Settings};
use crate::tabs;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Camera,
    Settings,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::Camera, Tab::Settings];

    fn label(self) -> &'static str {
        match self {
            Tab::Camera => "Camera",
            Tab::Settings => "Settings",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    ToggleCapture,
    Tick(Instant),
    CaptureImage,
    SnapshotPathSelected(Option<PathBuf>),
    LoadClassifier,
    ClassifierSelected(Option<PathBuf>),
    LoadEyeClassifier,
    EyeClassifierSelected(Option<PathBuf>),
    CascadeNoticeDismissed,
    CameraIndexChanged(u32),
    SnapshotPrefixChanged(String),
    SelectFont,
    FontSelected(Option<PathBuf>),
    SelectCascadeDir,
    CascadeDirSelected(Option<PathBuf>),
    AppearanceChanged(Appearance),
    HighContrastChanged(bool),
    FontScaleChanged(f32),
    PollSystemTheme,
    CloseRequested(window::Id),
}

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    session: CaptureSession,
    preview: Option<image::Handle>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let session = CaptureSession::new(
            Box::new(OpenCvCamera::new()),
            Box::new(OpenCvCascadeLoader::new()),
            Box::new(ImageFileWriter::new()),
            Box::new(RasterPainter::from_font_lookup(settings.font_path.as_deref())),
        )
        .with_camera_index(settings.camera_index);

        let mut app = Self {
            active_tab: Tab::Camera,
            settings,
            session,
            preview: None,
        };
        let task = app.load_cascades();
        (app, task)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }
            Message::ToggleCapture => {
                if self.session.is_capturing() {
                    self.session.stop();
                    self.preview = None;
                } else if let Err(e) = self.session.start() {
                    log::warn!("{e}");
                }
            }
            Message::Tick(scheduled) => {
                if let TickOutcome::Displayed { .. } = self.session.tick_at(scheduled) {
                    self.refresh_preview();
                }
            }
            Message::CaptureImage => {
                let dir = self.snapshot_dir();
                let name = default_snapshot_name(
                    self.settings.effective_snapshot_prefix(),
                    &chrono::Local::now(),
                );
                if self.session.displayed_frame().is_none() {
                    // Reports "no image" through the status line.
                    let _ = self.session.capture_snapshot(&dir.join(&name));
                    return Task::none();
                }
                return Task::perform(
                    async move {
                        let mut dialog = rfd::AsyncFileDialog::new()
                            .set_title("Save image")
                            .set_directory(dir)
                            .set_file_name(name);
                        for format in SnapshotFormat::ALL {
                            dialog = dialog.add_filter(format.label(), format.extensions());
                        }
                        dialog.save_file().await.map(|h| h.path().to_path_buf())
                    },
                    Message::SnapshotPathSelected,
                );
            }
            Message::SnapshotPathSelected(Some(path)) => {
                if self.session.capture_snapshot(&path).is_ok() {
                    self.settings.last_snapshot_dir = path.parent().map(Path::to_path_buf);
                    self.settings.save();
                }
            }
            Message::SnapshotPathSelected(None) => {}
            Message::LoadClassifier => {
                let start_dir = parent_dir(self.session.face_classifier_path());
                return Task::perform(
                    pick_classifier("Select face classifier", start_dir),
                    Message::ClassifierSelected,
                );
            }
            Message::ClassifierSelected(Some(path)) => {
                let _ = self.session.reload_face_classifier(&path);
            }
            Message::ClassifierSelected(None) => {}
            Message::LoadEyeClassifier => {
                let start_dir = parent_dir(self.session.eye_classifier_path());
                return Task::perform(
                    pick_classifier("Select eye classifier", start_dir),
                    Message::EyeClassifierSelected,
                );
            }
            Message::EyeClassifierSelected(Some(path)) => {
                let _ = self.session.reload_eye_classifier(&path);
            }
            Message::EyeClassifierSelected(None) => {}
            Message::CascadeNoticeDismissed => {}
            Message::CameraIndexChanged(index) => {
                self.settings.camera_index = index;
                self.session.set_camera_index(index);
                self.settings.save();
            }
            Message::SnapshotPrefixChanged(prefix) => {
                self.settings.snapshot_prefix = prefix;
                self.settings.save();
            }
            Message::SelectFont => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select overlay font")
                            .add_filter("Fonts", &["ttf", "otf"])
                            .pick_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::FontSelected,
                );
            }
            Message::FontSelected(Some(path)) => {
                self.session
                    .set_painter(Box::new(RasterPainter::from_font_lookup(Some(&path))));
                self.settings.font_path = Some(path);
                self.settings.save();
            }
            Message::FontSelected(None) => {}
            Message::SelectCascadeDir => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select cascade directory")
                            .pick_folder()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::CascadeDirSelected,
                );
            }
            Message::CascadeDirSelected(Some(dir)) => {
                self.settings.cascade_dir = Some(dir);
                self.settings.save();
                return self.load_cascades();
            }
            Message::CascadeDirSelected(None) => {}
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.settings.save();
            }
            Message::HighContrastChanged(enabled) => {
                self.settings.high_contrast = enabled;
                self.settings.save();
            }
            Message::FontScaleChanged(scale) => {
                self.settings.font_scale = scale;
                self.settings.save();
            }
            Message::PollSystemTheme => {
                // theme() re-resolves on every render.
            }
            Message::CloseRequested(id) => {
                self.session.shutdown();
                self.preview = None;
                self.settings.save();
                return window::close(id);
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fs = self.settings.font_scale;

        let tab_bar = row(Tab::ALL
            .iter()
            .map(|&tab| {
                let btn = button(text(tab.label()).size(scaled(13.0, fs)))
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        let content: Element<'_, Message> = match self.active_tab {
            Tab::Camera => tabs::camera_tab::view(
                fs,
                self.preview.as_ref(),
                self.session.is_capturing(),
                self.session.face_classifier_path(),
                self.session.eye_classifier_path(),
            ),
            Tab::Settings => tabs::settings_tab::view(&self.settings),
        };

        let status = self.session.status();
        let is_error = status.is_error();
        let status_bar = container(
            text(status.text.clone())
                .size(scaled(12.0, fs))
                .style(move |theme: &Theme| {
                    if is_error {
                        text::danger(theme)
                    } else {
                        text::Style::default()
                    }
                }),
        )
        .width(Length::Fill)
        .padding([6, 16]);

        column![
            tab_bar,
            container(content).padding(16).height(Length::Fill),
            status_bar
        ]
        .spacing(0)
        .height(Length::Fill)
        .into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance, self.settings.high_contrast)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![window::close_requests().map(Message::CloseRequested)];
        if self.session.is_capturing() {
            subscriptions.push(iced::time::every(TICK_INTERVAL).map(Message::Tick));
        }
        if self.settings.appearance == Appearance::System {
            subscriptions
                .push(iced::time::every(Duration::from_secs(2)).map(|_| Message::PollSystemTheme));
        }
        Subscription::batch(subscriptions)
    }

    fn refresh_preview(&mut self) {
        self.preview = self
            .session
            .displayed_frame()
            .map(|frame| image::Handle::from_rgba(frame.width(), frame.height(), frame.to_rgba()));
    }

    /// Resolves and loads the default cascades, creating the cascade
    /// directory on first run.
    fn load_cascades(&mut self) -> Task<Message> {
        let dir = match &self.settings.cascade_dir {
            Some(dir) => dir.clone(),
            None => match cascade_resolver::default_cascade_dir() {
                Ok(dir) => dir,
                Err(e) => {
                    log::warn!("{e}");
                    return Task::none();
                }
            },
        };

        let created = cascade_resolver::ensure_cascade_dir(&dir).unwrap_or_else(|e| {
            log::warn!("{e}");
            false
        });

        let paths = cascade_resolver::resolve_from_env(&dir);
        if let Err(e) = self.session.load_default_classifiers(&paths) {
            log::warn!("Default classifiers unavailable: {e}");
        }

        if created {
            cascade_dir_notice(dir)
        } else {
            Task::none()
        }
    }

    fn snapshot_dir(&self) -> PathBuf {
        self.settings
            .last_snapshot_dir
            .clone()
            .or_else(dirs::picture_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Scale a base font size by the user's font_scale setting.
pub fn scaled(base: f32, font_scale: f32) -> f32 {
    (base * font_scale).round()
}

fn parent_dir(path: Option<&Path>) -> Option<PathBuf> {
    path.and_then(Path::parent).map(Path::to_path_buf)
}

async fn pick_classifier(title: &'static str, start_dir: Option<PathBuf>) -> Option<PathBuf> {
    let mut dialog = rfd::AsyncFileDialog::new()
        .set_title(title)
        .add_filter("XML Files", &["xml"])
        .add_filter("All Files", &["*"]);
    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file().await.map(|h| h.path().to_path_buf())
}

fn cascade_dir_notice(dir: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(rfd::MessageLevel::Info)
                .set_title("Cascade directory created")
                .set_description(format!(
                    "Created {}.\n\nCopy haarcascade_frontalface_default.xml and \
                     haarcascade_eye.xml from your OpenCV installation into it, \
                     then restart or use \"Load Classifier\".",
                    dir.display()
                ))
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await;
        },
        |_| Message::CascadeNoticeDismissed,
    )
}
