// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-tick hover resolver.

use core::hash::Hash;

use crossway_network::{NetworkView, NodeId, Ray, SegmentId, ground};
use crossway_selection::{OverlayContour, OverlayStyle, Selection, SelectionKey, SelectionParams};
use glam::DVec3;
use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};
use kurbo::Point;
use tracing::{debug, trace};

use crate::config::{HoverConfig, SelectionMode};
use crate::filter::{DefaultFilter, HoverFilter};

/// The element under the pointer this tick.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum HoverResult {
    /// Nothing is hovered.
    #[default]
    None,
    /// A junction node.
    Node(NodeId),
    /// A segment.
    Segment(SegmentId),
}

impl HoverResult {
    /// The hovered element's key, if any.
    pub fn key(self) -> Option<SelectionKey> {
        match self {
            Self::None => None,
            Self::Node(id) => Some(SelectionKey::Node(id)),
            Self::Segment(id) => Some(SelectionKey::Segment(id)),
        }
    }

    /// Whether nothing is hovered.
    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

impl From<SelectionKey> for HoverResult {
    fn from(key: SelectionKey) -> Self {
        match key {
            SelectionKey::Node(id) => Self::Node(id),
            SelectionKey::Segment(id) => Self::Segment(id),
        }
    }
}

/// Best candidate of a query: the element, its ray parameter, and the
/// segment whose cell entry led to it.
#[derive(Copy, Clone, Debug)]
struct Candidate {
    key: SelectionKey,
    t: f64,
    via: SegmentId,
}

impl Candidate {
    fn beats(t: f64, best: Option<&Self>) -> bool {
        best.is_none_or(|b| t < b.t)
    }
}

/// Resolves the single hovered node or segment for a pointer ray.
///
/// Owns every piece of hover state: the selection caches, the ignore-set,
/// the previous tick's winner for the fast path, and scan scratch sets.
/// Selections are built on first test and kept until their element leaves
/// the view, [`invalidate`](Self::invalidate) is called, or the state is
/// cleared.
///
/// # Example
///
/// ```rust
/// use crossway_hover::{HoverResult, HoverTester};
/// use crossway_network::{GridLayout, Network, Ray};
/// use glam::DVec3;
/// use kurbo::Point;
///
/// let mut net = Network::new(GridLayout::default());
/// let a = net.add_node(Point::new(-30.0, 0.0), 0.0);
/// let b = net.add_node(Point::new(30.0, 0.0), 0.0);
/// let road = net.add_segment(a, b, 4.0).unwrap();
///
/// let mut hover = HoverTester::default();
/// let ray = Ray::vertical(0.0, 1.0, 100.0);
/// let hit = DVec3::new(0.0, 0.0, 1.0);
/// assert_eq!(hover.query_hover(&net, &ray, hit), HoverResult::Segment(road));
///
/// // Ignoring the only candidate lets the next query fall back to it.
/// hover.ignore_current_hover();
/// assert_eq!(hover.query_hover(&net, &ray, hit), HoverResult::Segment(road));
/// ```
#[derive(Debug)]
pub struct HoverTester<F = DefaultFilter> {
    config: HoverConfig,
    filter: F,
    nodes: HashMap<NodeId, Selection>,
    segments: HashMap<SegmentId, Selection>,
    ignored: HashSet<SelectionKey>,
    hovered: HoverResult,
    last_segment: Option<SegmentId>,
    last_position: Option<Point>,
    visited: HashSet<SegmentId>,
    tested: HashSet<NodeId>,
}

impl Default for HoverTester<DefaultFilter> {
    fn default() -> Self {
        Self::new(HoverConfig::default(), DefaultFilter::default())
    }
}

impl<F: HoverFilter> HoverTester<F> {
    /// Create a tester with the given configuration and filter.
    pub fn new(config: HoverConfig, filter: F) -> Self {
        Self {
            config,
            filter,
            nodes: HashMap::new(),
            segments: HashMap::new(),
            ignored: HashSet::new(),
            hovered: HoverResult::None,
            last_segment: None,
            last_position: None,
            visited: HashSet::new(),
            tested: HashSet::new(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &HoverConfig {
        &self.config
    }

    /// Current filter.
    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// The result of the latest query.
    pub fn hovered(&self) -> HoverResult {
        self.hovered
    }

    /// Whether `key` is in the ignore-set.
    pub fn is_ignored(&self, key: SelectionKey) -> bool {
        self.ignored.contains(&key)
    }

    /// Resolve the element under `ray`.
    ///
    /// `hit_position` is where the host's own raycast met the terrain; its
    /// ground projection centres the grid window and detects pointer
    /// movement.
    pub fn query_hover(
        &mut self,
        view: &(impl NetworkView + ?Sized),
        ray: &Ray,
        hit_position: DVec3,
    ) -> HoverResult {
        let centre = ground(hit_position);
        self.note_position(centre);

        if let Some(fast) = self.fast_path(view, ray) {
            trace!(result = ?fast.key, t = fast.t, "hover kept");
            return self.finish(Some(fast));
        }

        let mut best = self.scan(view, ray, centre);
        if best.is_none() && !self.ignored.is_empty() {
            debug!(
                ignored = self.ignored.len(),
                retry = self.config.retry_when_exhausted,
                "every candidate ignored, clearing ignore-set"
            );
            self.ignored.clear();
            if self.config.retry_when_exhausted {
                best = self.scan(view, ray, centre);
            }
        }
        trace!(result = ?best.map(|c| c.key), "hover resolved");
        self.finish(best)
    }

    /// Exclude the current hover from the following queries.
    ///
    /// Repeating this cycles through overlapping candidates; once all of
    /// them are ignored the set clears itself.
    pub fn ignore_current_hover(&mut self) {
        if let Some(key) = self.hovered.key() {
            debug!(?key, "ignoring hover");
            self.ignored.insert(key);
        }
        self.hovered = HoverResult::None;
        self.last_segment = None;
    }

    /// Drop every cached selection, the ignore-set, and the fast path.
    pub fn clear_hover_state(&mut self) {
        self.nodes.clear();
        self.segments.clear();
        self.ignored.clear();
        self.hovered = HoverResult::None;
        self.last_segment = None;
        self.last_position = None;
    }

    /// Forget the cached selection of `key`, for example after the host
    /// edited the element.
    pub fn invalidate(&mut self, key: SelectionKey) {
        self.evict(key);
    }

    /// Switch the element kinds to resolve. Clears all hover state.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.config.mode = mode;
        self.clear_hover_state();
    }

    /// Replace the filter. Clears all hover state.
    pub fn set_filter(&mut self, filter: F) {
        self.filter = filter;
        self.clear_hover_state();
    }

    /// The selection of `key`, built and cached on demand.
    pub fn selection(
        &mut self,
        view: &(impl NetworkView + ?Sized),
        key: SelectionKey,
    ) -> Option<&Selection> {
        self.fetch(view, key)
    }

    /// Where `ray` enters the footprint of `key`, regardless of filters and
    /// the ignore-set.
    pub fn contains(
        &mut self,
        view: &(impl NetworkView + ?Sized),
        key: SelectionKey,
        ray: &Ray,
    ) -> Option<f64> {
        self.fetch(view, key)?.contains(ray)
    }

    /// The overlay contour of `key`.
    pub fn render(
        &mut self,
        view: &(impl NetworkView + ?Sized),
        key: SelectionKey,
        style: &OverlayStyle,
    ) -> Option<OverlayContour> {
        Some(self.fetch(view, key)?.render(style))
    }

    fn finish(&mut self, best: Option<Candidate>) -> HoverResult {
        self.hovered = best.map(|c| c.key.into()).unwrap_or_default();
        self.last_segment = best.map(|c| c.via);
        self.hovered
    }

    fn note_position(&mut self, centre: Point) {
        let tolerance = self.config.move_tolerance;
        let moved = self
            .last_position
            .is_some_and(|last| (centre - last).hypot2() > tolerance * tolerance);
        if moved && !self.ignored.is_empty() {
            debug!(ignored = self.ignored.len(), "pointer moved, clearing ignore-set");
            self.ignored.clear();
        }
        self.last_position = Some(centre);
    }

    fn fast_path(&mut self, view: &(impl NetworkView + ?Sized), ray: &Ray) -> Option<Candidate> {
        let via = self.last_segment?;
        if !self.segment_eligible(view, via) {
            return None;
        }
        let segment = view.segment(via)?;
        let ends = [segment.start_node, segment.end_node];

        if self.config.mode.contains(SelectionMode::NODES) {
            let mut best: Option<Candidate> = None;
            for node in ends {
                if !self.node_eligible(view, node) {
                    continue;
                }
                let key = SelectionKey::Node(node);
                if let Some(t) = self.test(view, key, ray)
                    && Candidate::beats(t, best.as_ref())
                {
                    best = Some(Candidate { key, t, via });
                }
            }
            if best.is_some() {
                return best;
            }
        }
        if self.config.mode.contains(SelectionMode::SEGMENTS) {
            let key = SelectionKey::Segment(via);
            return self.test(view, key, ray).map(|t| Candidate { key, t, via });
        }
        None
    }

    fn scan(
        &mut self,
        view: &(impl NetworkView + ?Sized),
        ray: &Ray,
        centre: Point,
    ) -> Option<Candidate> {
        self.visited.clear();
        self.tested.clear();
        let mode = self.config.mode;
        let (xs, zs) = view.grid_layout().window(centre, self.config.grid_window);
        let mut best: Option<Candidate> = None;

        for iz in zs {
            for ix in xs.clone() {
                let mut cursor = view.cell_head(ix, iz);
                let mut steps = 0;
                while let Some(id) = cursor {
                    if steps >= self.config.max_cell_iterations {
                        debug!(ix, iz, steps, "cell walk capped");
                        break;
                    }
                    steps += 1;
                    cursor = view.next_in_cell(id);
                    if !self.visited.insert(id) || !self.segment_eligible(view, id) {
                        continue;
                    }
                    let Some(segment) = view.segment(id) else {
                        continue;
                    };
                    let ends = [segment.start_node, segment.end_node];

                    let mut node_won = false;
                    if mode.contains(SelectionMode::NODES) {
                        for node in ends {
                            if !self.tested.insert(node) || !self.node_eligible(view, node) {
                                continue;
                            }
                            let key = SelectionKey::Node(node);
                            if let Some(t) = self.test(view, key, ray)
                                && Candidate::beats(t, best.as_ref())
                            {
                                best = Some(Candidate { key, t, via: id });
                                node_won = true;
                            }
                        }
                    }
                    if mode.contains(SelectionMode::SEGMENTS) && !node_won {
                        let key = SelectionKey::Segment(id);
                        if let Some(t) = self.test(view, key, ray)
                            && Candidate::beats(t, best.as_ref())
                        {
                            best = Some(Candidate { key, t, via: id });
                        }
                    }
                }
            }
        }
        best
    }

    fn segment_eligible(&mut self, view: &(impl NetworkView + ?Sized), id: SegmentId) -> bool {
        match view.segment(id) {
            Some(segment) => self.filter.accept_segment(id, segment),
            None => {
                self.evict(SelectionKey::Segment(id));
                false
            }
        }
    }

    fn node_eligible(&mut self, view: &(impl NetworkView + ?Sized), id: NodeId) -> bool {
        match view.node(id) {
            Some(node) => self.filter.accept_node(id, node),
            None => {
                self.evict(SelectionKey::Node(id));
                false
            }
        }
    }

    /// Ray parameter of `key`'s hit, treating ignored elements as misses.
    fn test(
        &mut self,
        view: &(impl NetworkView + ?Sized),
        key: SelectionKey,
        ray: &Ray,
    ) -> Option<f64> {
        if self.ignored.contains(&key) {
            return None;
        }
        self.fetch(view, key)?.contains(ray)
    }

    fn fetch(&mut self, view: &(impl NetworkView + ?Sized), key: SelectionKey) -> Option<&Selection> {
        let params = self.config.selection;
        match key {
            SelectionKey::Node(id) => {
                if view.node(id).is_none() {
                    self.evict(key);
                    return None;
                }
                cached(&mut self.nodes, id, view, key, params)
            }
            SelectionKey::Segment(id) => {
                if view.segment(id).is_none() {
                    self.evict(key);
                    return None;
                }
                cached(&mut self.segments, id, view, key, params)
            }
        }
    }

    fn evict(&mut self, key: SelectionKey) {
        let removed = match key {
            SelectionKey::Node(id) => self.nodes.remove(&id).is_some(),
            SelectionKey::Segment(id) => self.segments.remove(&id).is_some(),
        };
        if removed {
            debug!(?key, "dropped cached selection");
        }
    }
}

/// Look up `id` in `cache`, building its selection on a miss.
fn cached<'a, K: Eq + Hash>(
    cache: &'a mut HashMap<K, Selection>,
    id: K,
    view: &(impl NetworkView + ?Sized),
    key: SelectionKey,
    params: SelectionParams,
) -> Option<&'a Selection> {
    match cache.entry(id) {
        Entry::Occupied(entry) => Some(entry.into_mut()),
        Entry::Vacant(entry) => match Selection::build(view, key, params) {
            Ok(selection) => Some(entry.insert(selection)),
            Err(error) => {
                debug!(?key, %error, "cannot build selection");
                None
            }
        },
    }
}
