mod app;
mod settings;
mod tabs;
mod theme;

use app::App;

fn main() -> iced::Result {
    env_logger::init();

    iced::application(App::new, App::update, App::view)
        .title("FaceCam - Face Detection")
        .theme(App::theme)
        .subscription(App::subscription)
        .window(iced::window::Settings {
            size: iced::Size::new(820.0, 700.0),
            exit_on_close_request: false,
            ..Default::default()
        })
        .run()
}
