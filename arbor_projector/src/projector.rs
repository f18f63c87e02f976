// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plane projection: segments → gapped polylines, stubs, and markers.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use arbor_tree::{NeuriteTree, NodeId, VoxelPoint};

use crate::types::{
    DepthLabel, MarkerFlags, ProjectedSegment, ProjectedVertex, Projection, Stub, StubKind,
    ViewParams,
};

/// Computes the renderable geometry of a tree for one view.
///
/// Projection is a pure function of the tree, the extension node, and the
/// [`ViewParams`]; it can run against any consistent snapshot of the tree.
#[derive(Clone, Debug)]
pub struct PlaneProjector {
    view: ViewParams,
}

impl PlaneProjector {
    /// Create a projector for `view`.
    pub fn new(view: ViewParams) -> Self {
        Self { view }
    }

    /// The view this projector renders.
    pub fn view(&self) -> &ViewParams {
        &self.view
    }

    /// Project `tree` onto the active plane.
    ///
    /// 1. Segments without any in-window node are dropped.
    /// 2. Segments without any node inside the viewport are dropped.
    /// 3. Every remaining segment becomes a vertex list where out-of-window nodes are gaps.
    /// 4. Each edge with exactly one in-window endpoint inside a surviving segment gets one
    ///    [`Stub`]: toward the child where a visible run ends at a non-leaf, toward the parent
    ///    where a visible run starts at a non-root.
    pub fn project(&self, tree: &NeuriteTree, extension: Option<NodeId>) -> Projection {
        let view = &self.view;
        let mut seen_stubs = BTreeSet::new();
        let mut segments = Vec::new();

        for seg in tree.segments() {
            let nodes = seg.nodes();
            if !nodes.iter().any(|&n| self.in_window(tree, n)) {
                continue;
            }
            if !nodes
                .iter()
                .any(|&n| self.position(tree, n).is_some_and(|p| view.viewport.contains(p.xy())))
            {
                continue;
            }
            let vertices: Vec<ProjectedVertex> = nodes
                .iter()
                .map(|&n| self.vertex(tree, n, extension))
                .collect();
            let stubs = self.stubs(tree, &vertices, &mut seen_stubs);
            segments.push(ProjectedSegment { vertices, stubs });
        }

        let extension = extension.filter(|&e| self.in_window(tree, e));
        let editable = extension.filter(|&e| tree.get(e).is_some_and(|n| n.class().is_editable()));
        Projection {
            segments,
            extension,
            editable,
        }
    }

    fn position(&self, tree: &NeuriteTree, id: NodeId) -> Option<VoxelPoint> {
        tree.get(id).map(|n| n.position())
    }

    fn in_window(&self, tree: &NeuriteTree, id: NodeId) -> bool {
        self.position(tree, id)
            .is_some_and(|p| self.view.in_window(p.z))
    }

    fn vertex(&self, tree: &NeuriteTree, id: NodeId, extension: Option<NodeId>) -> ProjectedVertex {
        let view = &self.view;
        let pos = self.position(tree, id).unwrap_or_default();
        let depth_delta = pos.z - view.plane;
        if !view.in_window(pos.z) {
            return ProjectedVertex {
                node: id,
                position: None,
                size: 0.0,
                depth_delta,
                markers: MarkerFlags::empty(),
            };
        }
        let mut markers = MarkerFlags::empty();
        markers.set(MarkerFlags::LEAF, tree.is_leaf(id));
        markers.set(MarkerFlags::ROOT, tree.root() == Some(id));
        markers.set(MarkerFlags::IN_PLANE, depth_delta == 0);
        markers.set(MarkerFlags::EXTENSION, extension == Some(id));
        ProjectedVertex {
            node: id,
            position: Some(view.to_screen * pos.xy()),
            size: view.sizing.size(depth_delta, view.window),
            depth_delta,
            markers,
        }
    }

    fn stubs(
        &self,
        tree: &NeuriteTree,
        vertices: &[ProjectedVertex],
        seen: &mut BTreeSet<(NodeId, NodeId)>,
    ) -> Vec<Stub> {
        let mut out = Vec::new();
        for (i, v) in vertices.iter().enumerate() {
            if !v.is_visible() {
                continue;
            }
            let ends_run = vertices.get(i + 1).is_none_or(|next| !next.is_visible());
            let starts_run = i == 0 || !vertices[i - 1].is_visible();
            if ends_run && !tree.is_leaf(v.node) {
                for &child in tree.children(v.node) {
                    if !self.in_window(tree, child) && seen.insert((v.node, child)) {
                        out.extend(self.stub(tree, v.node, child));
                    }
                }
            }
            if starts_run
                && let Some(parent) = tree.parent(v.node)
                && !self.in_window(tree, parent)
                && seen.insert((v.node, parent))
            {
                out.extend(self.stub(tree, v.node, parent));
            }
        }
        out
    }

    fn stub(&self, tree: &NeuriteTree, from: NodeId, to: NodeId) -> Option<Stub> {
        let view = &self.view;
        let a = self.position(tree, from)?;
        let b = self.position(tree, to)?;
        let end = view.to_screen * b.xy();
        let label = view
            .viewport
            .contains(b.xy())
            .then_some(DepthLabel { depth: b.z, anchor: end });
        Some(Stub {
            from,
            to,
            start: view.to_screen * a.xy(),
            end,
            kind: if b.z > view.plane {
                StubKind::Farther
            } else {
                StubKind::Closer
            },
            label,
        })
    }
}
