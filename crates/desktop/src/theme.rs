use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

use crate::settings::Appearance;

/// Theme for the given appearance setting.
pub fn resolve_theme(appearance: Appearance, high_contrast: bool) -> Theme {
    let dark = match appearance {
        Appearance::Dark => true,
        Appearance::Light => false,
        Appearance::System => system_prefers_dark(),
    };
    let base = if dark { dark_palette() } else { light_palette() };
    let palette = if high_contrast {
        with_high_contrast(base, dark)
    } else {
        base
    };
    Theme::custom("FaceCam", palette)
}

/// Background behind the camera preview.
pub fn preview_background(theme: &Theme) -> Color {
    let palette = theme.extended_palette();
    if palette.is_dark {
        Color::BLACK
    } else {
        palette.background.strong.color
    }
}

fn dark_palette() -> Palette {
    Palette {
        background: color!(0x18, 0x1a, 0x1d),
        text: color!(0xd4, 0xd4, 0xd4),
        primary: color!(0x3d, 0xb8, 0x6b),
        success: color!(0x30, 0xd1, 0x58),
        warning: color!(0xff, 0xcc, 0x00),
        danger: color!(0xff, 0x45, 0x3a),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xf4, 0xf5, 0xf6),
        text: color!(0x1f, 0x1f, 0x22),
        primary: color!(0x1e, 0x8e, 0x4a),
        success: color!(0x34, 0xc7, 0x59),
        warning: color!(0xff, 0x9f, 0x0a),
        danger: color!(0xd7, 0x26, 0x1e),
    }
}

fn with_high_contrast(palette: Palette, dark: bool) -> Palette {
    if dark {
        Palette {
            background: Color::BLACK,
            text: Color::WHITE,
            ..palette
        }
    } else {
        Palette {
            background: Color::WHITE,
            text: Color::BLACK,
            ..palette
        }
    }
}

fn system_prefers_dark() -> bool {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).trim() == "Dark")
            .unwrap_or(true)
    }
    #[cfg(not(target_os = "macos"))]
    {
        true
    }
}
