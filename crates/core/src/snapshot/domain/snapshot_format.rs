use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::shared::constants::SNAPSHOT_EXTENSIONS;

/// Encodings a snapshot can be saved in, chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotFormat {
    Jpeg,
    Png,
    Bmp,
}

impl SnapshotFormat {
    pub const ALL: &[SnapshotFormat] = &[
        SnapshotFormat::Jpeg,
        SnapshotFormat::Png,
        SnapshotFormat::Bmp,
    ];

    /// Case-insensitive lookup by extension; `None` for anything else.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG Image",
            Self::Png => "PNG Image",
            Self::Bmp => "BMP Image",
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Jpeg => &SNAPSHOT_EXTENSIONS[0..2],
            Self::Png => &SNAPSHOT_EXTENSIONS[2..3],
            Self::Bmp => &SNAPSHOT_EXTENSIONS[3..4],
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Default snapshot file name: `<prefix>_YYYYMMDD_HHMMSS.jpg`.
pub fn default_snapshot_name<Tz: TimeZone>(prefix: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{prefix}_{}.jpg", at.format("%Y%m%d_%H%M%S"))
}

/// [`default_snapshot_name`] inside `dir`, stamped with the local time.
pub fn default_snapshot_path(dir: &Path, prefix: &str) -> PathBuf {
    dir.join(default_snapshot_name(prefix, &chrono::Local::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    #[case::jpg("shot.jpg", Some(SnapshotFormat::Jpeg))]
    #[case::jpeg_upper("SHOT.JPEG", Some(SnapshotFormat::Jpeg))]
    #[case::png("dir/shot.png", Some(SnapshotFormat::Png))]
    #[case::bmp("shot.Bmp", Some(SnapshotFormat::Bmp))]
    #[case::gif("shot.gif", None)]
    #[case::no_extension("shot", None)]
    fn test_from_path(#[case] path: &str, #[case] expected: Option<SnapshotFormat>) {
        assert_eq!(SnapshotFormat::from_path(Path::new(path)), expected);
    }

    #[test]
    fn test_default_snapshot_name_embeds_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            default_snapshot_name("face_detection", &at),
            "face_detection_20260307_090501.jpg"
        );
    }

    #[test]
    fn test_default_snapshot_path_is_jpeg_in_dir() {
        let path = default_snapshot_path(Path::new("/tmp/shots"), "cam");
        assert_eq!(path.parent(), Some(Path::new("/tmp/shots")));
        assert_eq!(SnapshotFormat::from_path(&path), Some(SnapshotFormat::Jpeg));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("cam_"));
    }

    #[test]
    fn test_every_format_has_extensions() {
        for format in SnapshotFormat::ALL {
            assert!(!format.extensions().is_empty());
            let sample = PathBuf::from(format!("x.{}", format.extensions()[0]));
            assert_eq!(SnapshotFormat::from_path(&sample), Some(*format));
        }
    }
}
