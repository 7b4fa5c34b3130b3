//! Native video element with standard controls.

use std::time::Duration;

use super::host::ViewerHost;
use super::kind::ViewerKind;
use super::media::{MediaBinding, MediaEvent};
use super::source::VideoSource;
use super::state::ViewerState;
use super::Playback;
use crate::config::ViewerSettings;
use crate::error::Result;

#[derive(Debug)]
pub struct PlainViewer {
    media: MediaBinding,
}

impl PlainViewer {
    pub fn mount(host: &mut dyn ViewerHost, source: VideoSource, settings: &ViewerSettings) -> Self {
        let mut viewer = Self {
            media: MediaBinding::new(source, settings.load_timeout()),
        };
        viewer.attach(host);
        viewer
    }

    fn attach(&mut self, host: &mut dyn ViewerHost) {
        let element = self.media.video_element(None, false);
        self.media.attach_video(host, element);
    }
}

impl Playback for PlainViewer {
    fn kind(&self) -> ViewerKind {
        ViewerKind::Plain
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

    /// Plain playback has no camera; resetting rewinds to the start.
    fn reset_view(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        self.media.rewind(host);
        Ok(())
    }

    fn retry(&mut self, host: &mut dyn ViewerHost) -> Result<()> {
        self.media.retry(host)?;
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::host::{HeadlessHost, HostNode};
    use crate::viewer::state::ViewerFault;

    fn mount(host: &mut HeadlessHost, path: &str) -> PlainViewer {
        PlainViewer::mount(host, VideoSource::new(path, false), &ViewerSettings::default())
    }

    #[test]
    fn test_mount_adds_controlled_video() {
        let mut host = HeadlessHost::new();
        let viewer = mount(&mut host, "/v/intro.mp4");
        assert_eq!(viewer.state(), &ViewerState::Loading);
        let (_, node) = host.nodes().next().unwrap();
        let HostNode::Video(video) = node else {
            panic!("expected video node");
        };
        assert!(video.controls);
        assert!(!video.hidden);
        assert_eq!(video.mime_type.as_deref(), Some("video/mp4"));
    }

    #[test]
    fn test_canplay_autoplays() {
        let mut host = HeadlessHost::new();
        let mut viewer = mount(&mut host, "/v/intro.mp4");
        viewer.on_media_event(&mut host, MediaEvent::LoadedData).unwrap();
        assert_eq!(viewer.state(), &ViewerState::Ready);
        viewer.on_media_event(&mut host, MediaEvent::CanPlay).unwrap();
        assert_eq!(viewer.state(), &ViewerState::Playing);
    }

    #[test]
    fn test_blocked_autoplay_pauses() {
        let mut host = HeadlessHost::with_autoplay_blocked();
        let mut viewer = mount(&mut host, "/v/intro.mp4");
        viewer.on_media_event(&mut host, MediaEvent::CanPlay).unwrap();
        assert_eq!(viewer.state(), &ViewerState::Paused);
        viewer.play(&mut host).unwrap();
        assert_eq!(viewer.state(), &ViewerState::Playing);
    }

    #[test]
    fn test_timeout_then_retry() {
        let mut host = HeadlessHost::new();
        let mut viewer = mount(&mut host, "/v/intro.mp4");
        viewer.on_tick(&mut host, Duration::from_secs(9)).unwrap();
        assert_eq!(viewer.state(), &ViewerState::Loading);
        viewer.on_tick(&mut host, Duration::from_secs(1)).unwrap();
        assert_eq!(viewer.state().fault(), Some(&ViewerFault::LoadTimeout));

        viewer.retry(&mut host).unwrap();
        assert_eq!(viewer.state(), &ViewerState::Loading);
        // Old video and error panel are gone, a fresh video is attached.
        assert_eq!(host.node_count(), 1);
    }

    #[test]
    fn test_toggle_mute_and_destroy() {
        let mut host = HeadlessHost::new();
        let mut viewer = mount(&mut host, "/v/intro.mp4");
        assert!(viewer.toggle_mute(&mut host).unwrap());
        assert!(!viewer.toggle_mute(&mut host).unwrap());

        viewer.destroy(&mut host);
        assert_eq!(viewer.state(), &ViewerState::Unmounted);
        assert_eq!(host.node_count(), 0);
        assert!(viewer.toggle_mute(&mut host).is_err());
        assert!(viewer.play(&mut host).is_err());
    }
}
