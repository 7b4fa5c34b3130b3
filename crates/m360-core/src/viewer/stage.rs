//! The tour page area that shows one video at a time.

use std::time::Duration;

use tracing::info;

use super::host::ViewerHost;
use super::kind::{ViewerKind, ViewerPreference};
use super::media::MediaEvent;
use super::script::ScriptEvent;
use super::source::VideoSource;
use super::{Playback, Viewer};
use crate::config::ViewerSettings;
use crate::error::{M360Error, Result};

/// Owns the host and at most one mounted viewer.
#[derive(Debug)]
pub struct TourStage<H: ViewerHost> {
    host: H,
    settings: ViewerSettings,
    preference: ViewerPreference,
    auto_fallback: bool,
    viewer: Option<Viewer>,
}

impl<H: ViewerHost> TourStage<H> {
    pub fn new(host: H, settings: ViewerSettings) -> Self {
        Self {
            host,
            settings,
            preference: ViewerPreference::Auto,
            auto_fallback: true,
            viewer: None,
        }
    }

    pub fn with_preference(mut self, preference: ViewerPreference) -> Self {
        self.preference = preference;
        self
    }

    /// When enabled (the default), a 360° viewer that fails with a
    /// retryable fault is replaced by plain playback of the same source.
    pub fn with_auto_fallback(mut self, enabled: bool) -> Self {
        self.auto_fallback = enabled;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    /// Mounts a viewer for `source`, destroying the current one first.
    pub fn show(&mut self, source: VideoSource) -> &Viewer {
        self.unmount();
        let kind = ViewerKind::select(&source, self.preference);
        info!(path = %source.path, %kind, "Showing video");
        self.viewer
            .insert(Viewer::mount(kind, &mut self.host, source, &self.settings))
    }

    /// Returns to the outside view, leaving nothing mounted.
    pub fn back_to_outside(&mut self) {
        self.unmount();
    }

    pub fn media_event(&mut self, event: MediaEvent) -> Result<()> {
        self.with_viewer(|viewer, host| viewer.on_media_event(host, event))?;
        self.apply_fallback();
        Ok(())
    }

    pub fn script_event(&mut self, event: ScriptEvent) -> Result<()> {
        self.with_viewer(|viewer, host| viewer.on_script_event(host, event))?;
        self.apply_fallback();
        Ok(())
    }

    pub fn tick(&mut self, elapsed: Duration) -> Result<()> {
        self.with_viewer(|viewer, host| viewer.on_tick(host, elapsed))?;
        self.apply_fallback();
        Ok(())
    }

    pub fn play(&mut self) -> Result<()> {
        self.with_viewer(|viewer, host| viewer.play(host))
    }

    pub fn pause(&mut self) -> Result<()> {
        self.with_viewer(|viewer, host| viewer.pause(host))
    }

    pub fn toggle_mute(&mut self) -> Result<bool> {
        self.with_viewer(|viewer, host| viewer.toggle_mute(host))
    }

    pub fn reset_view(&mut self) -> Result<()> {
        self.with_viewer(|viewer, host| viewer.reset_view(host))
    }

    pub fn retry(&mut self) -> Result<()> {
        self.with_viewer(|viewer, host| viewer.retry(host))
    }

    fn with_viewer<T>(
        &mut self,
        op: impl FnOnce(&mut Viewer, &mut dyn ViewerHost) -> Result<T>,
    ) -> Result<T> {
        let viewer = self
            .viewer
            .as_mut()
            .ok_or_else(|| M360Error::not_found("viewer", "stage"))?;
        op(viewer, &mut self.host)
    }

    fn unmount(&mut self) {
        if let Some(mut viewer) = self.viewer.take() {
            viewer.destroy(&mut self.host);
        }
    }

    fn apply_fallback(&mut self) {
        if !self.auto_fallback {
            return;
        }
        let Some(viewer) = self.viewer.as_ref() else {
            return;
        };
        let Some(fallback) = viewer.kind().fallback() else {
            return;
        };
        if !viewer.state().fault().is_some_and(|fault| fault.is_retryable()) {
            return;
        }

        let source = viewer.source().clone();
        info!(path = %source.path, %fallback, "Falling back after viewer error");
        self.unmount();
        self.viewer = Some(Viewer::mount(fallback, &mut self.host, source, &self.settings));
    }
}
