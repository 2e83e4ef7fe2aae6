use iced::widget::{button, column, container, image as image_widget, text};
use iced::{Element, Length, Size, Task};
use image::{DynamicImage, RgbImage};

use crate::error::{Error, Result};
use crate::render::ImageSink;

#[derive(Debug, Clone)]
pub enum ViewerMessage {
    Dismiss,
}

struct ViewerState {
    title: String,
    handle: image_widget::Handle,
    width: u32,
    height: u32,
}

impl ViewerState {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn update(&mut self, message: ViewerMessage) -> Task<ViewerMessage> {
        match message {
            ViewerMessage::Dismiss => iced::exit(),
        }
    }

    fn view(&self) -> Element<'_, ViewerMessage> {
        let content = column![
            image_widget::Image::<image_widget::Handle>::new(self.handle.clone())
                .width(Length::Fill)
                .height(Length::Fill),
            text(format!("{}x{}", self.width, self.height)).size(14),
            button(text("Close")).on_press(ViewerMessage::Dismiss),
        ]
        .spacing(10)
        .padding(10);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Shows the image in a window and blocks until the user closes it.
///
/// The window lives only for the duration of `emit`; it is torn down when the
/// event loop returns, whether the user dismissed it or the loop failed.
/// Most platforms only allow one event loop per process and require it on the
/// main thread.
#[derive(Debug, Clone)]
pub struct ViewerSink {
    title: String,
}

impl ViewerSink {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for ViewerSink {
    fn default() -> Self {
        Self::new("Debug")
    }
}

impl ImageSink for ViewerSink {
    fn emit(&self, image: &RgbImage) -> Result<()> {
        let (width, height) = image.dimensions();
        let rgba = DynamicImage::ImageRgb8(image.clone()).to_rgba8().into_raw();
        let handle = image_widget::Handle::from_rgba(width, height, rgba);
        let title = self.title.clone();

        log::info!("showing debug image in window '{}'", title);

        let result = iced::application(
            move || ViewerState {
                title: title.clone(),
                handle: handle.clone(),
                width,
                height,
            },
            ViewerState::update,
            ViewerState::view,
        )
        .title(ViewerState::title)
        .window_size(Size::new(width.max(320) as f32, height as f32 + 80.0))
        .run();

        log::debug!("viewer '{}' closed", self.title);
        result.map_err(|e| Error::Render(format!("viewer failed: {}", e)))
    }
}

/// Show an annotated image and wait for the user to dismiss it.
pub fn display(image: &RgbImage, window_title: &str) -> Result<()> {
    ViewerSink::new(window_title).emit(image)
}
