//! Declaration stack
//!
//! One frame per open declaration, the synthetic root frame at index 0.
//! Placement walks go from the innermost frame outwards.

use keaconv_core::Map;

/// Kind of declaration owning a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Root,
    Group,
    Subnet,
    SharedNetwork,
    Pool,
    Host,
    Class,
    /// Opaque parameter block, transparent to every placement walk
    Parameter,
}

impl FrameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FrameKind::Root => "root",
            FrameKind::Group => "group",
            FrameKind::Subnet => "subnet",
            FrameKind::SharedNetwork => "shared-network",
            FrameKind::Pool => "pool",
            FrameKind::Host => "host",
            FrameKind::Class => "class",
            FrameKind::Parameter => "parameter",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub kind: FrameKind,
    pub map: Map,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclStack {
    frames: Vec<Frame>,
}

impl Default for DeclStack {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclStack {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                kind: FrameKind::Root,
                map: Map::new(),
            }],
        }
    }

    pub fn push(&mut self, kind: FrameKind, map: Map) {
        self.frames.push(Frame { kind, map });
    }

    /// Close the innermost declaration. The root frame is never popped.
    pub fn pop(&mut self) -> Option<Frame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false: the root frame is never popped
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn top(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn kind(&self, index: usize) -> FrameKind {
        self.frames[index].kind
    }

    pub fn map(&self, index: usize) -> &Map {
        &self.frames[index].map
    }

    pub fn map_mut(&mut self, index: usize) -> &mut Map {
        &mut self.frames[index].map
    }

    pub fn top_map(&mut self) -> &mut Map {
        let top = self.top();
        self.map_mut(top)
    }

    pub fn root_map(&mut self) -> &mut Map {
        self.map_mut(0)
    }

    /// Innermost frame whose kind is not transparent
    pub fn innermost(&self, transparent: impl Fn(FrameKind) -> bool) -> usize {
        (0..self.frames.len())
            .rev()
            .find(|&i| !transparent(self.frames[i].kind))
            .unwrap_or(0)
    }

    pub fn into_root(mut self) -> Map {
        self.frames.truncate(1);
        self.frames
            .pop()
            .map(|frame| frame.map)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_permanent() {
        let mut stack = DeclStack::new();
        assert!(stack.pop().is_none());
        assert_eq!(stack.len(), 1);
        assert!(!stack.is_empty());
        assert_eq!(stack.kind(0), FrameKind::Root);
    }

    #[test]
    fn test_innermost_skips_transparent_frames() {
        let mut stack = DeclStack::new();
        stack.push(FrameKind::Subnet, Map::new());
        stack.push(FrameKind::Pool, Map::new());
        stack.push(FrameKind::Parameter, Map::new());

        let index = stack.innermost(|k| matches!(k, FrameKind::Parameter | FrameKind::Pool));
        assert_eq!(stack.kind(index), FrameKind::Subnet);
        assert_eq!(stack.innermost(|_| true), 0);
    }
}
