//! Panoramic playback through the declarative scene library.
//!
//! The scene is only built once the library is available; until then the
//! viewer stays `Loading` while [`ScriptLoader`] works through the CDNs.

use std::time::Duration;

use tracing::info;

use super::host::{HostNode, NodeId, ViewerHost};
use super::kind::ViewerKind;
use super::media::{MediaBinding, MediaEvent};
use super::scene::{SCENE_DOM_ID, VIDEO_DOM_ID, scene_markup};
use super::script::{SCRIPT_LOAD_FAILURE, ScriptEvent, ScriptLoadState, ScriptLoader};
use super::source::VideoSource;
use super::state::{ViewerFault, ViewerState};
use super::Playback;
use crate::config::ViewerSettings;
use crate::error::Result;

#[derive(Debug)]
pub struct PanoramaViewer {
    media: MediaBinding,
    loader: ScriptLoader,
    scene: Option<NodeId>,
}

impl PanoramaViewer {
    pub fn mount(host: &mut dyn ViewerHost, source: VideoSource, settings: &ViewerSettings) -> Self {
        let mut viewer = Self {
            media: MediaBinding::new(source, settings.load_timeout()),
            loader: ScriptLoader::new(&settings.primary_cdn, &settings.fallback_cdn),
            scene: None,
        };
        if viewer.loader.begin(host) == ScriptLoadState::Loaded {
            viewer.build_scene(host);
        }
        viewer
    }

    pub fn script_state(&self) -> ScriptLoadState {
        self.loader.state()
    }

    pub fn scene(&self) -> Option<NodeId> {
        self.scene
    }

    /// Handles the outcome of the pending script element.
    pub fn on_script_event(&mut self, host: &mut dyn ViewerHost, event: ScriptEvent) -> Result<()> {
        if self.media.state() != &ViewerState::Loading {
            return Ok(());
        }
        match self.loader.on_event(host, event) {
            ScriptLoadState::Loaded if self.scene.is_none() => {
                self.build_scene(host);
                Ok(())
            }
            ScriptLoadState::Failed => self.media.fail(
                host,
                ViewerFault::ScriptLoad {
                    message: SCRIPT_LOAD_FAILURE.to_string(),
                },
            ),
            _ => Ok(()),
        }
    }

    /// Simulates look-controls turning the camera, in degrees.
    pub fn look(&mut self, host: &mut dyn ViewerHost, pitch: f32, yaw: f32) {
        if let Some(rotation) = self.camera_rotation_mut(host) {
            rotation[0] = (rotation[0] + pitch).clamp(-90.0, 90.0);
            rotation[1] += yaw;
        }
    }

    pub fn camera_rotation(&self, host: &dyn ViewerHost) -> Option<[f32; 3]> {
        match self.scene.and_then(|id| host.node(id)) {
            Some(HostNode::Scene {
                camera_rotation, ..
            }) => Some(*camera_rotation),
            _ => None,
        }
    }

    fn camera_rotation_mut<'h>(&self, host: &'h mut dyn ViewerHost) -> Option<&'h mut [f32; 3]> {
        match self.scene.and_then(|id| host.node_mut(id)) {
            Some(HostNode::Scene {
                camera_rotation, ..
            }) => Some(camera_rotation),
            _ => None,
        }
    }

    fn build_scene(&mut self, host: &mut dyn ViewerHost) {
        info!(path = %self.media.source.path, "Building panoramic scene");
        let markup = scene_markup(&self.media.source);
        self.scene = Some(self.media.inject(
            host,
            HostNode::Scene {
                dom_id: SCENE_DOM_ID.to_string(),
                markup,
                camera_rotation: [0.0; 3],
            },
        ));
        let element = self.media.video_element(Some(VIDEO_DOM_ID), true);
        self.media.attach_video(host, element);
    }
}

impl Playback for PanoramaViewer {
    fn kind(&self) -> ViewerKind {
        ViewerKind::PanoramicScene
    }

    fn state(&self) -> &ViewerState {
        self.media.state()
    }

    fn source(&self) -> &VideoSource {
        &self.media.source
    }

    fn play(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        self.media.play(host)
    }

    fn pause(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        self.media.pause(host)
    }

    fn toggle_mute(&mut self, host: &mut dyn ViewerHost) -> Result<bool> {
        self.media.toggle_mute(host)
    }

    fn reset_view(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        if let Some(rotation) = self.camera_rotation_mut(host) {
            *rotation = [0.0; 3];
        }
        Ok(())
    }

    fn retry(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        self.media.retry(host)?;
        self.scene = None;
        if self.loader.restart(host) == ScriptLoadState::Loaded {
            self.build_scene(host);
        }
        Ok(())
    }

    fn on_media_event(&mut self, host: &mut dyn ViewerHost, event: MediaEvent) -> Result<()> {
        self.media.on_media_event(host, event)
    }

    fn on_tick(&mut self, host: &mut dyn ViewerHost, elapsed: Duration) -> Result<()> {
        self.media.on_tick(host, elapsed)
    }

    fn destroy(&mut self, host: &mut dyn ViewerHost) {
        self.media.teardown(host);
        self.loader.remove(host);
        self.scene = None;
    }
}
