//! Manual sphere rendering: a canvas showing the inside of a video-textured
//! sphere, steered by pointer drag and wheel zoom.

use std::time::Duration;

use super::camera::SphereCamera;
use super::host::{HostNode, NodeId, ViewerHost};
use super::kind::ViewerKind;
use super::media::{MediaBinding, MediaEvent};
use super::scene::{MANUAL_SPHERE, SphereGeometry};
use super::source::VideoSource;
use super::state::ViewerState;
use super::Playback;
use crate::config::ViewerSettings;
use crate::error::Result;

const DEFAULT_CANVAS: (u32, u32) = (1280, 720);

#[derive(Debug)]
pub struct SphereViewer {
    media: MediaBinding,
    camera: SphereCamera,
    canvas: Option<NodeId>,
    size: (u32, u32),
}

impl SphereViewer {
    pub fn mount(host: &mut dyn ViewerHost, source: VideoSource, settings: &ViewerSettings) -> Self {
        let mut camera = SphereCamera::default();
        camera.resize(DEFAULT_CANVAS.0, DEFAULT_CANVAS.1);
        let mut viewer = Self {
            media: MediaBinding::new(source, settings.load_timeout()),
            camera,
            canvas: None,
            size: DEFAULT_CANVAS,
        };
        viewer.attach(host);
        viewer
    }

    fn attach(&mut self, host: &mut dyn ViewerHost) {
        let (width, height) = self.size;
        self.canvas = Some(self.media.inject(
            host,
            HostNode::Canvas {
                width,
                height,
                frames_rendered: 0,
            },
        ));
        let element = self.media.video_element(None, true);
        self.media.attach_video(host, element);
    }

    pub fn geometry(&self) -> SphereGeometry {
        MANUAL_SPHERE
    }

    pub fn camera(&self) -> &SphereCamera {
        &self.camera
    }

    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.camera.drag(dx, dy);
    }

    pub fn zoom(&mut self, delta_y: f32) {
        self.camera.zoom(delta_y);
    }

    /// Follows a container resize.
    pub fn resize(&mut self, host: &mut dyn ViewerHost, width: u32, height: u32) {
        self.size = (width, height);
        self.camera.resize(width, height);
        if let Some(HostNode::Canvas {
            width: w, height: h, ..
        }) = self.canvas.and_then(|id| host.node_mut(id))
        {
            *w = width;
            *h = height;
        }
    }

    /// Draws one animation frame. Returns false when nothing was drawn.
    pub fn render_frame(&mut self, host: &mut dyn ViewerHost) -> bool {
        if !self.media.state().is_active() {
            return false;
        }
        match self.canvas.and_then(|id| host.node_mut(id)) {
            Some(HostNode::Canvas { frames_rendered, .. }) => {
                *frames_rendered += 1;
                true
            }
            _ => false,
        }
    }
}

impl Playback for SphereViewer {
    fn kind(&self) -> ViewerKind {
        ViewerKind::SphereMapped
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

    fn reset_view(&mut self, _host: &mut dyn ViewerHost) -> Result<()> {
        self.camera.reset();
        Ok(())
    }

    fn retry(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        self.media.retry(host)?;
        self.canvas = None;
        self.attach(host);
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
        self.canvas = None;
    }
}
