//! 360° video presentation.
//!
//! A [`VideoSource`] is presented by exactly one of three strategies
//! ([`ViewerKind`]). Every strategy implements [`Playback`] and drives the
//! same lifecycle ([`ViewerState`]) against a [`ViewerHost`].

pub mod camera;
pub mod host;
pub mod kind;
pub(crate) mod media;
pub mod panorama;
pub mod plain;
pub mod scene;
pub mod script;
pub mod source;
pub mod sphere;
pub mod stage;
pub mod state;

use std::time::Duration;

pub use camera::SphereCamera;
pub use host::{HeadlessHost, HostNode, NodeId, VideoElement, ViewerHost};
pub use kind::{ViewerKind, ViewerPreference};
pub use media::MediaEvent;
pub use panorama::PanoramaViewer;
pub use plain::PlainViewer;
pub use script::{ScriptEvent, ScriptLoadState};
pub use source::{Hotspot, VideoSource, rumtek_hotspots};
pub use sphere::SphereViewer;
pub use stage::TourStage;
pub use state::{LifecycleEvent, ViewerFault, ViewerState};

use crate::config::ViewerSettings;
use crate::error::Result;

/// Capabilities shared by every viewer.
pub trait Playback {
    fn kind(&self) -> ViewerKind;

    fn state(&self) -> &ViewerState;

    fn source(&self) -> &VideoSource;

    fn play(&mut self, host: &mut dyn ViewerHost) -> Result<()>;

    fn pause(&mut self, host: &mut dyn ViewerHost) -> Result<()>;

    /// Returns whether the media is muted afterwards.
    fn toggle_mute(&mut self, host: &mut dyn ViewerHost) -> Result<bool>;

    /// Returns the view to its initial orientation.
    fn reset_view(&mut self, host: &mut dyn ViewerHost) -> Result<()>;

    /// Leaves `Error` and loads again from scratch.
    fn retry(&mut self, host: &mut dyn ViewerHost) -> Result<()>;

    fn on_media_event(&mut self, host: &mut dyn ViewerHost, event: MediaEvent) -> Result<()>;

    /// Advances timers by `elapsed`.
    fn on_tick(&mut self, host: &mut dyn ViewerHost, elapsed: Duration) -> Result<()>;

    /// Pauses media, detaches its source and removes every injected node.
    /// Calling it twice is a no-op.
    fn destroy(&mut self, host: &mut dyn ViewerHost);
}

/// A mounted viewer of any kind.
#[derive(Debug)]
pub enum Viewer {
    Plain(PlainViewer),
    Sphere(SphereViewer),
    Panorama(PanoramaViewer),
}

macro_rules! each_viewer {
    ($viewer:expr, $inner:ident => $body:expr) => {
        match $viewer {
            Viewer::Plain($inner) => $body,
            Viewer::Sphere($inner) => $body,
            Viewer::Panorama($inner) => $body,
        }
    };
}

impl Viewer {
    /// Mounts the strategy `kind` for `source` into `host`.
    pub fn mount(
        kind: ViewerKind,
        host: &mut dyn ViewerHost,
        source: VideoSource,
        settings: &ViewerSettings,
    ) -> Self {
        match kind {
            ViewerKind::Plain => Viewer::Plain(PlainViewer::mount(host, source, settings)),
            ViewerKind::SphereMapped => Viewer::Sphere(SphereViewer::mount(host, source, settings)),
            ViewerKind::PanoramicScene => {
                Viewer::Panorama(PanoramaViewer::mount(host, source, settings))
            }
        }
    }

    /// Routes a script load outcome. Only the panoramic viewer loads scripts.
    pub fn on_script_event(&mut self, host: &mut dyn ViewerHost, event: ScriptEvent) -> Result<()> {
        match self {
            Viewer::Panorama(viewer) => viewer.on_script_event(host, event),
            Viewer::Plain(_) | Viewer::Sphere(_) => Ok(()),
        }
    }
}

impl Playback for Viewer {
    fn kind(&self) -> ViewerKind {
        each_viewer!(self, v => v.kind())
    }

    fn state(&self) -> &ViewerState {
        each_viewer!(self, v => v.state())
    }

    fn source(&self) -> &VideoSource {
        each_viewer!(self, v => v.source())
    }

    fn play(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        each_viewer!(self, v => v.play(host))
    }

    fn pause(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        each_viewer!(self, v => v.pause(host))
    }

    fn toggle_mute(&mut self, host: &mut dyn ViewerHost) -> Result<bool> {
        each_viewer!(self, v => v.toggle_mute(host))
    }

    fn reset_view(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        each_viewer!(self, v => v.reset_view(host))
    }

    fn retry(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        each_viewer!(self, v => v.retry(host))
    }

    fn on_media_event(&mut self, host: &mut dyn ViewerHost, event: MediaEvent) -> Result<()> {
        each_viewer!(self, v => v.on_media_event(host, event))
    }

    fn on_tick(&mut self, host: &mut dyn ViewerHost, elapsed: Duration) -> Result<()> {
        each_viewer!(self, v => v.on_tick(host, elapsed))
    }

    fn destroy(&mut self, host: &mut dyn ViewerHost) {
        each_viewer!(self, v => v.destroy(host))
    }
}
