//! Video content descriptors.

use serde::{Deserialize, Serialize};

/// A video selected from a tour hotspot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    pub path: String,
    /// MIME type guessed from the file extension.
    pub mime_type: String,
    pub is_360: bool,
}

impl VideoSource {
    /// Builds a descriptor. Matroska files are always treated as 360°
    /// footage regardless of `is_360`.
    pub fn new(path: impl Into<String>, is_360: bool) -> Self {
        let path = path.into();
        let mime_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let is_360 = is_360 || has_extension(&path, "mkv");
        Self {
            path,
            mime_type,
            is_360,
        }
    }

    /// True for `.mkv` containers, which many browsers cannot decode.
    pub fn is_matroska(&self) -> bool {
        has_extension(&self.path, "mkv")
    }

    /// Last path segment, shown in the "format not supported" panel.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

fn has_extension(path: &str, ext: &str) -> bool {
    path.rsplit_once('.')
        .is_some_and(|(_, found)| found.eq_ignore_ascii_case(ext))
}

/// A clickable tour hotspot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub is_360: bool,
    /// Position on the overview image, in percent.
    pub x: f32,
    pub y: f32,
}

impl Hotspot {
    pub fn source(&self) -> VideoSource {
        VideoSource::new(&self.video_file, self.is_360)
    }
}

/// The hotspots of the Rumtek tour.
pub fn rumtek_hotspots() -> Vec<Hotspot> {
    vec![
        Hotspot {
            id: "interior".to_string(),
            title: "Interior View".to_string(),
            description: "Explore the magnificent interior of the monastery".to_string(),
            video_file: "/assets/videos/inside monestry.mkv".to_string(),
            is_360: true,
            x: 45.0,
            y: 35.0,
        },
        Hotspot {
            id: "tawang".to_string(),
            title: "Tawang Monastery".to_string(),
            description: "Experience the sacred Tawang Monastery".to_string(),
            video_file: "/assets/videos/Tawang Monastery.mkv".to_string(),
            is_360: true,
            x: 25.0,
            y: 60.0,
        },
        Hotspot {
            id: "meditation".to_string(),
            title: "360° Experience".to_string(),
            description: "Immersive 360-degree monastery experience".to_string(),
            video_file: "/assets/videos/outside 360.mp4".to_string(),
            is_360: true,
            x: 70.0,
            y: 50.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mkv_implies_360() {
        let source = VideoSource::new("/assets/videos/Tawang Monastery.MKV", false);
        assert!(source.is_360);
        assert!(source.is_matroska());
        assert_eq!(source.mime_type, "video/x-matroska");
        assert_eq!(source.file_name(), "Tawang Monastery.MKV");
    }

    #[test]
    fn test_mp4_needs_flag() {
        let flat = VideoSource::new("/assets/videos/outside 360.mp4", false);
        assert!(!flat.is_360);
        assert_eq!(flat.mime_type, "video/mp4");

        let spherical = VideoSource::new("/assets/videos/outside 360.mp4", true);
        assert!(spherical.is_360);
        assert!(!spherical.is_matroska());
    }

    #[test]
    fn test_unknown_extension_is_octet_stream() {
        let source = VideoSource::new("clip", false);
        assert_eq!(source.mime_type, "application/octet-stream");
        assert_eq!(source.file_name(), "clip");
    }

    #[test]
    fn test_hotspots_are_360() {
        assert!(rumtek_hotspots().iter().all(|h| h.source().is_360));
    }
}
