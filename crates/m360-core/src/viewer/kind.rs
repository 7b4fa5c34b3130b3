//! Playback strategy selection.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::source::VideoSource;

/// The three ways a video can be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewerKind {
    /// Native video element with standard controls.
    Plain,
    /// Canvas with a video-textured sphere and a drag/zoom camera.
    SphereMapped,
    /// Third-party declarative scene engine with a videosphere.
    PanoramicScene,
}

/// How the caller wants 360° content rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerPreference {
    /// Scene engine for 360° content, plain player otherwise.
    #[default]
    Auto,
    /// Manual sphere rendering for 360° content.
    ManualSphere,
}

impl ViewerKind {
    /// Chooses the strategy for a source.
    pub fn select(source: &VideoSource, preference: ViewerPreference) -> ViewerKind {
        match (source.is_360, preference) {
            (false, _) => ViewerKind::Plain,
            (true, ViewerPreference::Auto) => ViewerKind::PanoramicScene,
            (true, ViewerPreference::ManualSphere) => ViewerKind::SphereMapped,
        }
    }

    /// Strategy to fall back to after a terminal error.
    pub fn fallback(self) -> Option<ViewerKind> {
        match self {
            ViewerKind::PanoramicScene | ViewerKind::SphereMapped => Some(ViewerKind::Plain),
            ViewerKind::Plain => None,
        }
    }

    pub fn is_360(self) -> bool {
        !matches!(self, ViewerKind::Plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mkv_360_selects_scene_engine() {
        let source = VideoSource::new("/assets/videos/inside monestry.mkv", true);
        assert_eq!(
            ViewerKind::select(&source, ViewerPreference::Auto),
            ViewerKind::PanoramicScene
        );
    }

    #[test]
    fn test_flat_video_selects_plain_even_with_sphere_preference() {
        let source = VideoSource::new("/assets/videos/intro.mp4", false);
        assert_eq!(
            ViewerKind::select(&source, ViewerPreference::ManualSphere),
            ViewerKind::Plain
        );
    }

    #[test]
    fn test_manual_sphere() {
        let source = VideoSource::new("/assets/videos/outside 360.mp4", true);
        assert_eq!(
            ViewerKind::select(&source, ViewerPreference::ManualSphere),
            ViewerKind::SphereMapped
        );
    }

    #[test]
    fn test_fallback_chain_ends_at_plain() {
        assert_eq!(ViewerKind::PanoramicScene.fallback(), Some(ViewerKind::Plain));
        assert_eq!(ViewerKind::SphereMapped.fallback(), Some(ViewerKind::Plain));
        assert_eq!(ViewerKind::Plain.fallback(), None);
    }
}
