//! Viewer lifecycle state machine.
//!
//! ```text
//! Loading -> Ready -> (Playing <-> Paused) -> (Error | Unmounted)
//!    ^                                           |
//!    +------------------ retry ------------------+
//! ```
//!
//! `Unmounted` is terminal and reachable from every other state.

use serde::{Deserialize, Serialize};

use crate::error::{M360Error, Result};

/// Why a viewer stopped working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewerFault {
    /// The media element reported an error.
    MediaLoad { message: String },
    /// The media did not become playable before the load timeout.
    LoadTimeout,
    /// The container format cannot be decoded by the host.
    FormatUnsupported { file_name: String },
    /// The scene library could not be fetched from any CDN.
    ScriptLoad { message: String },
}

impl ViewerFault {
    /// Headline for the error panel.
    pub fn title(&self) -> &'static str {
        match self {
            ViewerFault::FormatUnsupported { .. } => "Video format not supported",
            ViewerFault::ScriptLoad { .. } => "360° Viewer Error",
            ViewerFault::MediaLoad { .. } | ViewerFault::LoadTimeout => "Video failed to load",
        }
    }

    /// Suggestions shown under the headline.
    pub fn remediation(&self) -> Vec<String> {
        match self {
            ViewerFault::FormatUnsupported { file_name } => vec![
                "Your browser doesn't natively support MKV video files for 360° viewing.".to_string(),
                "Convert MKV files to MP4 format".to_string(),
                "Use Chrome or Edge browser".to_string(),
                "Download VLC for full MKV support".to_string(),
                format!("File: {file_name}"),
            ],
            ViewerFault::ScriptLoad { message } => vec![message.clone()],
            ViewerFault::MediaLoad { message } => {
                vec![message.clone(), "Check your connection and try again.".to_string()]
            }
            ViewerFault::LoadTimeout => {
                vec!["Video loading timeout".to_string(), "Check your connection and try again.".to_string()]
            }
        }
    }

    /// Whether a retry button makes sense for this fault.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ViewerFault::FormatUnsupported { .. })
    }
}

/// Where a viewer is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "fault", rename_all = "snake_case")]
pub enum ViewerState {
    Loading,
    Ready,
    Playing,
    Paused,
    Error(ViewerFault),
    Unmounted,
}

/// Inputs that move a viewer between states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Loaded,
    Play,
    Pause,
    Fail(ViewerFault),
    Retry,
    Unmount,
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Loaded => "loaded",
            LifecycleEvent::Play => "play",
            LifecycleEvent::Pause => "pause",
            LifecycleEvent::Fail(_) => "fail",
            LifecycleEvent::Retry => "retry",
            LifecycleEvent::Unmount => "unmount",
        }
    }
}

impl ViewerState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewerState::Loading => "loading",
            ViewerState::Ready => "ready",
            ViewerState::Playing => "playing",
            ViewerState::Paused => "paused",
            ViewerState::Error(_) => "error",
            ViewerState::Unmounted => "unmounted",
        }
    }

    /// Media is attached and decodable.
    pub fn is_active(&self) -> bool {
        matches!(self, ViewerState::Ready | ViewerState::Playing | ViewerState::Paused)
    }

    pub fn fault(&self) -> Option<&ViewerFault> {
        match self {
            ViewerState::Error(fault) => Some(fault),
            _ => None,
        }
    }

    /// Computes the next state, rejecting transitions the diagram does not
    /// allow.
    pub fn next(&self, event: LifecycleEvent) -> Result<ViewerState> {
        use LifecycleEvent as E;
        use ViewerState as S;

        let next = match (self, event) {
            (S::Unmounted, event) => {
                return Err(M360Error::invalid_transition(self.name(), event.name()));
            }
            (_, E::Unmount) => S::Unmounted,
            (S::Loading, E::Loaded) => S::Ready,
            (S::Ready | S::Playing | S::Paused, E::Play) => S::Playing,
            (S::Ready | S::Playing | S::Paused, E::Pause) => S::Paused,
            (S::Loading | S::Ready | S::Playing | S::Paused, E::Fail(fault)) => S::Error(fault),
            (S::Error(_), E::Retry) => S::Loading,
            (_, event) => {
                return Err(M360Error::invalid_transition(self.name(), event.name()));
            }
        };
        Ok(next)
    }
}
