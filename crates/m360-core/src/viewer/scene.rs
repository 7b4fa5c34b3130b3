//! Markup for the panoramic scene.

use super::source::VideoSource;

pub const SCENE_DOM_ID: &str = "monastery-scene";
pub const VIDEO_DOM_ID: &str = "monastery-video";

/// Geometry of the videosphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

/// Videosphere used by the scene engine.
pub const VIDEOSPHERE: SphereGeometry = SphereGeometry {
    radius: 100.0,
    width_segments: 64,
    height_segments: 32,
};

/// Sphere the manual renderer textures.
pub const MANUAL_SPHERE: SphereGeometry = SphereGeometry {
    radius: 500.0,
    width_segments: 60,
    height_segments: 40,
};

pub const SCENE_CAMERA_FOV: f32 = 75.0;

/// Renders the scene body for a source. The video element itself is a
/// separate hidden node referenced through `#monastery-video`.
pub fn scene_markup(source: &VideoSource) -> String {
    let sphere = VIDEOSPHERE;
    format!(
        concat!(
            "<a-scene id=\"{scene}\" embedded vr-mode-ui=\"enabled: true\" ",
            "device-orientation-permission-ui=\"enabled: false\">\n",
            "  <a-assets><!-- {file} ({mime}) --></a-assets>\n",
            "  <a-videosphere src=\"#{video}\" radius=\"{radius}\" ",
            "segments-width=\"{w}\" segments-height=\"{h}\" rotation=\"0 0 0\"></a-videosphere>\n",
            "  <a-camera position=\"0 0 0\" fov=\"{fov}\" ",
            "look-controls=\"enabled: true; reverseMouseDrag: false\" wasd-controls=\"enabled: false\">\n",
            "    <a-cursor raycaster=\"objects: .clickable\" ",
            "geometry=\"primitive: ring; radiusInner: 0.02; radiusOuter: 0.03\" ",
            "material=\"color: white; shader: flat\"></a-cursor>\n",
            "  </a-camera>\n",
            "</a-scene>"
        ),
        scene = SCENE_DOM_ID,
        file = comment_safe(source.file_name()),
        mime = source.mime_type,
        video = VIDEO_DOM_ID,
        radius = sphere.radius,
        w = sphere.width_segments,
        h = sphere.height_segments,
        fov = SCENE_CAMERA_FOV,
    )
}

/// Collapses hyphen runs so the text cannot terminate an HTML comment.
fn comment_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if !(c == '-' && out.ends_with('-')) {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_contains_sphere_and_camera() {
        let markup = scene_markup(&VideoSource::new("/v/inside.mkv", true));
        assert!(markup.contains("src=\"#monastery-video\""));
        assert!(markup.contains("radius=\"100\""));
        assert!(markup.contains("segments-width=\"64\""));
        assert!(markup.contains("segments-height=\"32\""));
        assert!(markup.contains("fov=\"75\""));
        assert!(markup.contains("wasd-controls=\"enabled: false\""));
        assert!(markup.contains("primitive: ring"));
    }

    #[test]
    fn test_file_name_cannot_close_comment() {
        let markup = scene_markup(&VideoSource::new("/v/evil-->x<a-entity>--.mp4", true));
        assert_eq!(markup.matches("-->").count(), 1);
        assert!(markup.contains("<!-- evil->x<a-entity>-.mp4 ("));
        assert_eq!(comment_safe("a---b"), "a-b");
    }
}
