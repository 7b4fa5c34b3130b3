//! Loading the scene library from a CDN.

use tracing::{debug, warn};

use super::host::{HostNode, NodeId, ViewerHost};

/// Global name the scene library registers.
pub const SCENE_LIBRARY: &str = "AFRAME";
/// DOM id of the injected script element.
pub const SCRIPT_DOM_ID: &str = "aframe-script";
/// Shown when neither CDN delivers the library.
pub const SCRIPT_LOAD_FAILURE: &str =
    "Failed to load 360° viewer. Please check your internet connection and try again.";

/// Outcome reported by the host for the pending script element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptEvent {
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLoadState {
    Idle,
    LoadingPrimary,
    LoadingFallback,
    Loaded,
    Failed,
}

/// Injects the library script, switching to the fallback CDN at most once.
#[derive(Debug)]
pub struct ScriptLoader {
    primary: String,
    fallback: String,
    state: ScriptLoadState,
    node: Option<NodeId>,
}

impl ScriptLoader {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
            state: ScriptLoadState::Idle,
            node: None,
        }
    }

    pub fn state(&self) -> ScriptLoadState {
        self.state
    }

    /// Starts loading unless the library is already present.
    pub fn begin(&mut self, host: &mut dyn ViewerHost) -> ScriptLoadState {
        if host.has_library(SCENE_LIBRARY) {
            self.state = ScriptLoadState::Loaded;
            return self.state;
        }
        self.inject(host, self.primary.clone());
        self.state = ScriptLoadState::LoadingPrimary;
        self.state
    }

    /// Feeds a load outcome for the pending script. Events arriving when
    /// nothing is pending are ignored.
    pub fn on_event(&mut self, host: &mut dyn ViewerHost, event: ScriptEvent) -> ScriptLoadState {
        self.state = match (self.state, event) {
            (ScriptLoadState::LoadingPrimary | ScriptLoadState::LoadingFallback, ScriptEvent::Loaded) => {
                host.register_library(SCENE_LIBRARY);
                debug!("Scene library loaded");
                ScriptLoadState::Loaded
            }
            (ScriptLoadState::LoadingPrimary, ScriptEvent::Failed) => {
                warn!(url = %self.primary, "Primary CDN failed, trying fallback");
                self.remove(host);
                self.inject(host, self.fallback.clone());
                ScriptLoadState::LoadingFallback
            }
            (ScriptLoadState::LoadingFallback, ScriptEvent::Failed) => {
                warn!(url = %self.fallback, "Fallback CDN failed");
                self.remove(host);
                ScriptLoadState::Failed
            }
            (state, _) => state,
        };
        self.state
    }

    /// Removes the script element this loader injected, if any.
    pub fn remove(&mut self, host: &mut dyn ViewerHost) {
        if let Some(id) = self.node.take() {
            host.remove(id);
        }
    }

    /// Clears a failed attempt and starts over from the primary CDN.
    pub fn restart(&mut self, host: &mut dyn ViewerHost) -> ScriptLoadState {
        self.remove(host);
        self.state = ScriptLoadState::Idle;
        self.begin(host)
    }

    fn inject(&mut self, host: &mut dyn ViewerHost, src: String) {
        debug!(%src, "Injecting scene library script");
        self.node = Some(host.append(HostNode::Script {
            dom_id: SCRIPT_DOM_ID.to_string(),
            src,
        }));
    }
}
