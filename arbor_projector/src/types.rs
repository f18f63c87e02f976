// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inputs and outputs of the plane projector.

use alloc::vec::Vec;
use core::fmt;

use arbor_tree::NodeId;
use kurbo::{Affine, Point, Rect};

/// Marker sizing parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MarkerSizing {
    /// Marker diameter for a node lying on the active plane, in voxels.
    pub base_diameter: f64,
    /// Lower bound for any computed size.
    pub min_size: f64,
    /// Screen pixels per voxel.
    pub pixel_scale: f64,
}

impl Default for MarkerSizing {
    fn default() -> Self {
        Self {
            base_diameter: 3.0,
            min_size: 1.0,
            pixel_scale: 1.0,
        }
    }
}

impl MarkerSizing {
    /// Size of a marker `delta` planes away from the active plane, given a window radius.
    ///
    /// `max(min_size, (base_diameter × (1 − |delta| / window) × pixel_scale)²)`
    pub fn size(&self, delta: i32, window: f64) -> f64 {
        let falloff = 1.0 - f64::from(delta).abs() / window;
        let d = self.base_diameter * falloff * self.pixel_scale;
        (d * d).max(self.min_size)
    }
}

/// What the host is currently looking at.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewParams {
    /// Active depth plane.
    pub plane: i32,
    /// Half-window radius: nodes with `|z - plane| < window` are in window.
    pub window: f64,
    /// Visible XY region in voxel coordinates.
    pub viewport: Rect,
    /// Voxel → screen mapping applied to every emitted position.
    pub to_screen: Affine,
    /// Marker sizing.
    pub sizing: MarkerSizing,
}

impl ViewParams {
    /// View of `plane` with the given window radius and viewport, identity screen mapping,
    /// and default marker sizing.
    pub fn new(plane: i32, window: f64, viewport: Rect) -> Self {
        Self {
            plane,
            window,
            viewport,
            to_screen: Affine::IDENTITY,
            sizing: MarkerSizing::default(),
        }
    }

    /// Replace the voxel → screen mapping.
    pub fn with_screen_transform(mut self, to_screen: Affine) -> Self {
        self.to_screen = to_screen;
        self
    }

    /// Replace the marker sizing.
    pub fn with_sizing(mut self, sizing: MarkerSizing) -> Self {
        self.sizing = sizing;
        self
    }

    /// True if depth `z` lies strictly inside the window around the active plane.
    pub fn in_window(&self, z: i32) -> bool {
        f64::from(z - self.plane).abs() < self.window
    }
}

bitflags::bitflags! {
    /// Special styling for a projected node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MarkerFlags: u8 {
        /// Leaf of the whole tree: terminal marker.
        const LEAF      = 0b0000_0001;
        /// Root of the tree.
        const ROOT      = 0b0000_0010;
        /// Lies exactly on the active plane: highlight overlay.
        const IN_PLANE  = 0b0000_0100;
        /// The slot's extension node: ring highlight.
        const EXTENSION = 0b0000_1000;
    }
}

/// One node of a projected segment.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedVertex {
    /// Source node.
    pub node: NodeId,
    /// Screen position; `None` marks a gap (node outside the depth window).
    pub position: Option<Point>,
    /// Marker size; `0.0` for gaps.
    pub size: f64,
    /// Node depth minus the active plane.
    pub depth_delta: i32,
    /// Special styling; empty for gaps.
    pub markers: MarkerFlags,
}

impl ProjectedVertex {
    /// True if the node is drawn.
    pub fn is_visible(&self) -> bool {
        self.position.is_some()
    }
}

/// Depth relation of a stub's far end to the viewer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StubKind {
    /// Neighbour lies deeper than the active plane. Conventionally dashed.
    Farther,
    /// Neighbour lies shallower than the active plane. Conventionally dotted.
    Closer,
}

/// Numeric depth annotation drawn at a stub's far end.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DepthLabel {
    /// Depth of the out-of-window neighbour.
    pub depth: i32,
    /// Where to draw the label, in screen coordinates.
    pub anchor: Point,
}

impl fmt::Display for DepthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z:{}", self.depth)
    }
}

/// Connector from an in-window node toward a neighbour outside the window.
#[derive(Clone, Debug, PartialEq)]
pub struct Stub {
    /// In-window node.
    pub from: NodeId,
    /// Out-of-window parent or child.
    pub to: NodeId,
    /// Screen position of `from`.
    pub start: Point,
    /// Screen position of `to`.
    pub end: Point,
    /// Whether `to` is deeper or shallower than the active plane.
    pub kind: StubKind,
    /// Present when `to` lies inside the viewport.
    pub label: Option<DepthLabel>,
}

/// Renderable form of one [`Segment`](arbor_tree::Segment).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectedSegment {
    /// One entry per segment node, in segment order.
    pub vertices: Vec<ProjectedVertex>,
    /// Connectors attached to this segment.
    pub stubs: Vec<Stub>,
}

impl ProjectedSegment {
    /// Gapped polyline positions.
    pub fn points(&self) -> impl Iterator<Item = Option<Point>> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    /// Marker sizes, parallel to [`points`](Self::points).
    pub fn sizes(&self) -> impl Iterator<Item = f64> + '_ {
        self.vertices.iter().map(|v| v.size)
    }

    /// Contiguous gap-free runs of the polyline.
    pub fn runs(&self) -> Vec<Vec<Point>> {
        let mut out: Vec<Vec<Point>> = Vec::new();
        let mut open = false;
        for p in self.points() {
            match p {
                Some(p) if open => {
                    if let Some(run) = out.last_mut() {
                        run.push(p);
                    }
                }
                Some(p) => {
                    out.push(alloc::vec![p]);
                    open = true;
                }
                None => open = false,
            }
        }
        out
    }
}

/// Everything a renderer needs to draw one tree on the active plane.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Projection {
    /// Surviving segments in tree order.
    pub segments: Vec<ProjectedSegment>,
    /// The extension node, when it is in window.
    pub extension: Option<NodeId>,
    /// The extension node, when it is in window and its classification is editable.
    /// Hosts enable their classification editor only when this is set.
    pub editable: Option<NodeId>,
}

impl Projection {
    /// Iterate all stubs across segments.
    pub fn stubs(&self) -> impl Iterator<Item = &Stub> + '_ {
        self.segments.iter().flat_map(|s| s.stubs.iter())
    }

    /// Find the vertex for `node` in the first segment that shows it.
    pub fn vertex(&self, node: NodeId) -> Option<&ProjectedVertex> {
        self.segments
            .iter()
            .flat_map(|s| s.vertices.iter())
            .find(|v| v.node == node)
    }
}
