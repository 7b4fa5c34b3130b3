//! Media element bookkeeping shared by every viewer.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::host::{HostNode, NodeId, VideoElement, ViewerHost};
use super::source::VideoSource;
use super::state::{LifecycleEvent, ViewerFault, ViewerState};
use crate::error::{M360Error, Result};

/// Events a media element emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    LoadedData,
    CanPlay,
    Playing,
    Paused,
    Error(Option<String>),
}

/// Owns the state, the video node and every other node a viewer injected.
#[derive(Debug)]
pub(crate) struct MediaBinding {
    pub(crate) source: VideoSource,
    state: ViewerState,
    video: Option<NodeId>,
    nodes: Vec<NodeId>,
    load_timeout: Duration,
    waited: Duration,
}

impl MediaBinding {
    pub(crate) fn new(source: VideoSource, load_timeout: Duration) -> Self {
        Self {
            source,
            state: ViewerState::Loading,
            video: None,
            nodes: Vec::new(),
            load_timeout,
            waited: Duration::ZERO,
        }
    }

    pub(crate) fn state(&self) -> &ViewerState {
        &self.state
    }

    pub(crate) fn transition(&mut self, event: LifecycleEvent) -> Result<()> {
        let next = self.state.next(event)?;
        debug!(from = self.state.name(), to = next.name(), "Viewer transition");
        self.state = next;
        Ok(())
    }

    /// Appends a node and remembers it for teardown.
    pub(crate) fn inject(&mut self, host: &mut dyn ViewerHost, node: HostNode) -> NodeId {
        let id = host.append(node);
        self.nodes.push(id);
        id
    }

    pub(crate) fn attach_video(&mut self, host: &mut dyn ViewerHost, element: VideoElement) -> NodeId {
        let id = self.inject(host, HostNode::Video(element));
        self.video = Some(id);
        self.waited = Duration::ZERO;
        id
    }

    /// Builds the element for this source with the given presentation.
    pub(crate) fn video_element(&self, dom_id: Option<&str>, hidden: bool) -> VideoElement {
        VideoElement {
            dom_id: dom_id.map(str::to_string),
            mime_type: Some(self.source.mime_type.clone()),
            controls: !hidden,
            hidden,
            looping: hidden,
            muted: hidden,
            ..VideoElement::new(&self.source.path)
        }
    }

    pub(crate) fn on_media_event(&mut self, host: &mut dyn ViewerHost, event: MediaEvent) -> Result<()> {
        if matches!(self.state, ViewerState::Unmounted | ViewerState::Error(_)) {
            debug!(?event, state = self.state.name(), "Ignoring media event");
            return Ok(());
        }

        match event {
            MediaEvent::LoadedData => {
                if self.state == ViewerState::Loading {
                    self.transition(LifecycleEvent::Loaded)?;
                }
                Ok(())
            }
            MediaEvent::CanPlay => {
                if self.state == ViewerState::Loading {
                    self.transition(LifecycleEvent::Loaded)?;
                }
                if self.state == ViewerState::Ready {
                    self.autoplay(host)?;
                }
                Ok(())
            }
            MediaEvent::Playing => self.transition(LifecycleEvent::Play),
            MediaEvent::Paused => self.transition(LifecycleEvent::Pause),
            MediaEvent::Error(message) => {
                let fault = if self.source.is_matroska() {
                    self.format_fault()
                } else {
                    ViewerFault::MediaLoad {
                        message: message.unwrap_or_else(|| "Failed to load video".to_string()),
                    }
                };
                self.fail(host, fault)
            }
        }
    }

    fn autoplay(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        if host.autoplay_allowed() {
            self.set_paused(host, false);
            self.transition(LifecycleEvent::Play)
        } else {
            info!("Autoplay blocked, waiting for user interaction");
            self.transition(LifecycleEvent::Pause)
        }
    }

    /// Advances the load timer. Only runs once a video is attached and the
    /// viewer is still loading.
    pub(crate) fn on_tick(&mut self, host: &mut dyn ViewerHost, elapsed: Duration) -> Result<()> {
        if self.state != ViewerState::Loading || self.video.is_none() {
            return Ok(());
        }
        self.waited += elapsed;
        if self.waited < self.load_timeout {
            return Ok(());
        }
        let fault = if self.source.is_matroska() {
            self.format_fault()
        } else {
            ViewerFault::LoadTimeout
        };
        self.fail(host, fault)
    }

    fn format_fault(&self) -> ViewerFault {
        ViewerFault::FormatUnsupported {
            file_name: self.source.file_name().to_string(),
        }
    }

    /// Moves to `Error` and shows the fault panel.
    pub(crate) fn fail(&mut self, host: &mut dyn ViewerHost, fault: ViewerFault) -> Result<()> {
        warn!(path = %self.source.path, ?fault, "Viewer failed");
        let panel = HostNode::Panel {
            title: fault.title().to_string(),
            lines: fault.remediation(),
        };
        self.transition(LifecycleEvent::Fail(fault))?;
        self.set_paused(host, true);
        self.inject(host, panel);
        Ok(())
    }

    pub(crate) fn play(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        self.transition(LifecycleEvent::Play)?;
        self.set_paused(host, false);
        Ok(())
    }

    pub(crate) fn pause(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        self.transition(LifecycleEvent::Pause)?;
        self.set_paused(host, true);
        Ok(())
    }

    /// Flips the mute flag and returns the new value.
    pub(crate) fn toggle_mute(&mut self, host: &mut dyn ViewerHost) -> Result<bool> {
        if self.state == ViewerState::Unmounted {
            return Err(M360Error::invalid_transition(self.state.name(), "toggle_mute"));
        }
        let video = self
            .video
            .and_then(|id| host.video_mut(id))
            .ok_or_else(|| M360Error::not_found("video", self.source.path.clone()))?;
        video.muted = !video.muted;
        Ok(video.muted)
    }

    pub(crate) fn rewind(&mut self, host: &mut dyn ViewerHost) {
        if let Some(video) = self.video.and_then(|id| host.video_mut(id)) {
            video.current_time = 0.0;
        }
    }

    /// Error -> Loading with every injected node removed.
    pub(crate) fn retry(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        self.transition(LifecycleEvent::Retry)?;
        self.release(host);
        self.waited = Duration::ZERO;
        Ok(())
    }

    /// Pauses, detaches the source and removes every injected node.
    pub(crate) fn teardown(&mut self, host: &mut dyn ViewerHost) {
        if self.state == ViewerState::Unmounted {
            return;
        }
        self.release(host);
        self.state = ViewerState::Unmounted;
        debug!(path = %self.source.path, "Viewer unmounted");
    }

    fn release(&mut self, host: &mut dyn ViewerHost) {
        if let Some(video) = self.video.take().and_then(|id| host.video_mut(id)) {
            video.detach();
        }
        for id in self.nodes.drain(..) {
            host.remove(id);
        }
    }

    fn set_paused(&self, host: &mut dyn ViewerHost, paused: bool) {
        if let Some(video) = self.video.and_then(|id| host.video_mut(id)) {
            video.paused = paused;
        }
    }
}
