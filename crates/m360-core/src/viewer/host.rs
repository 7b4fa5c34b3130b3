//! The surface viewers render into.
//!
//! Viewers never touch a real document. They append and remove nodes
//! through [`ViewerHost`], which a browser bridge or the in-memory
//! [`HeadlessHost`] implements.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Handle for a node appended to a host.
pub type NodeId = u64;

/// A media element as viewers configure it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoElement {
    pub dom_id: Option<String>,
    /// `None` once the source has been detached.
    pub src: Option<String>,
    pub mime_type: Option<String>,
    pub paused: bool,
    pub muted: bool,
    pub looping: bool,
    pub controls: bool,
    pub hidden: bool,
    pub current_time: f64,
}

impl VideoElement {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            paused: true,
            ..Self::default()
        }
    }

    /// Stops playback and drops the source so the decoder is released.
    pub fn detach(&mut self) {
        self.paused = true;
        self.src = None;
    }
}

/// Everything a viewer can inject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum HostNode {
    Script {
        dom_id: String,
        src: String,
    },
    Video(VideoElement),
    Scene {
        dom_id: String,
        markup: String,
        /// Camera rotation in degrees (pitch, yaw, roll).
        camera_rotation: [f32; 3],
    },
    Canvas {
        width: u32,
        height: u32,
        frames_rendered: u64,
    },
    Panel {
        title: String,
        lines: Vec<String>,
    },
}

impl HostNode {
    pub fn dom_id(&self) -> Option<&str> {
        match self {
            HostNode::Script { dom_id, .. } | HostNode::Scene { dom_id, .. } => Some(dom_id),
            HostNode::Video(video) => video.dom_id.as_deref(),
            HostNode::Canvas { .. } | HostNode::Panel { .. } => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            HostNode::Script { .. } => "script",
            HostNode::Video(_) => "video",
            HostNode::Scene { .. } => "scene",
            HostNode::Canvas { .. } => "canvas",
            HostNode::Panel { .. } => "panel",
        }
    }
}

/// Operations viewers need from their environment.
pub trait ViewerHost {
    /// Appends a node and returns its handle.
    fn append(&mut self, node: HostNode) -> NodeId;

    /// Removes a node, returning it if it was present.
    fn remove(&mut self, id: NodeId) -> Option<HostNode>;

    fn node(&self, id: NodeId) -> Option<&HostNode>;

    fn node_mut(&mut self, id: NodeId) -> Option<&mut HostNode>;

    /// Looks a node up by its DOM id.
    fn find_by_dom_id(&self, dom_id: &str) -> Option<NodeId>;

    /// Whether a global library (e.g. `AFRAME`) is already loaded.
    fn has_library(&self, name: &str) -> bool;

    /// Records that a library finished loading.
    fn register_library(&mut self, name: &str);

    /// Whether media may start playing without a user gesture.
    fn autoplay_allowed(&self) -> bool;

    fn video_mut(&mut self, id: NodeId) -> Option<&mut VideoElement> {
        match self.node_mut(id) {
            Some(HostNode::Video(video)) => Some(video),
            _ => None,
        }
    }

    fn video(&self, id: NodeId) -> Option<&VideoElement> {
        match self.node(id) {
            Some(HostNode::Video(video)) => Some(video),
            _ => None,
        }
    }
}

/// In-memory host used by the CLI simulator and tests.
#[derive(Debug)]
pub struct HeadlessHost {
    nodes: BTreeMap<NodeId, HostNode>,
    next_id: NodeId,
    libraries: HashSet<String>,
    autoplay_allowed: bool,
    script_requests: Vec<String>,
    removed: Vec<HostNode>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 1,
            libraries: HashSet::new(),
            autoplay_allowed: true,
            script_requests: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose autoplay policy rejects unmuted playback.
    pub fn with_autoplay_blocked() -> Self {
        Self {
            autoplay_allowed: false,
            ..Self::default()
        }
    }

    /// Host where `name` is already present, as if another page loaded it.
    pub fn with_library(name: &str) -> Self {
        let mut host = Self::default();
        host.libraries.insert(name.to_string());
        host
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &HostNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every script URL ever appended, in order.
    pub fn script_requests(&self) -> &[String] {
        &self.script_requests
    }

    /// Nodes in the state they were in when removed.
    pub fn removed_nodes(&self) -> &[HostNode] {
        &self.removed
    }
}

impl ViewerHost for HeadlessHost {
    fn append(&mut self, node: HostNode) -> NodeId {
        if let HostNode::Script { src, .. } = &node {
            self.script_requests.push(src.clone());
        }
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn remove(&mut self, id: NodeId) -> Option<HostNode> {
        let node = self.nodes.remove(&id)?;
        self.removed.push(node.clone());
        Some(node)
    }

    fn node(&self, id: NodeId) -> Option<&HostNode> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut HostNode> {
        self.nodes.get_mut(&id)
    }

    fn find_by_dom_id(&self, dom_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.dom_id() == Some(dom_id))
            .map(|(id, _)| *id)
    }

    fn has_library(&self, name: &str) -> bool {
        self.libraries.contains(name)
    }

    fn register_library(&mut self, name: &str) {
        self.libraries.insert(name.to_string());
    }

    fn autoplay_allowed(&self) -> bool {
        self.autoplay_allowed
    }
}
