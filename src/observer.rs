use super::*;

/// Rounds of callback delivery allowed before a settle is considered
/// runaway (callbacks that keep scrolling each other).
const MAX_DELIVERY_ROUNDS: usize = 64;

pub(crate) type ObserverCallback =
    Rc<dyn Fn(&mut Page, &[IntersectionEntry], ObserverId) -> Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObserverRoot {
    #[default]
    Viewport,
    Element(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObserverOptions {
    pub root: ObserverRoot,
    pub root_margin: RootMargin,
    pub threshold: f64,
}

impl ObserverOptions {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    /// Target intersects the root at or above the observer threshold.
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
    pub time_ms: i64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ObservedTarget {
    pub(crate) node: NodeId,
    /// Last delivered state; `None` until the first delivery.
    pub(crate) last: Option<bool>,
}

pub(crate) struct Observer {
    pub(crate) options: ObserverOptions,
    pub(crate) callback: ObserverCallback,
    pub(crate) targets: Vec<ObservedTarget>,
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("options", &self.options)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    pub(crate) observers: Vec<Option<Observer>>,
    /// Set while callbacks run; nested updates are picked up by the next round.
    pub(crate) delivering: bool,
}

impl ObserverRegistry {
    fn get_mut(&mut self, id: ObserverId) -> Result<&mut Observer> {
        self.observers
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::Runtime(format!("unknown or disconnected observer {}", id.0)))
    }

    pub(crate) fn is_connected(&self, id: ObserverId) -> bool {
        self.observers.get(id.0).is_some_and(Option::is_some)
    }
}

impl Page {
    pub fn observe_intersections(
        &mut self,
        options: ObserverOptions,
        callback: impl Fn(&mut Page, &[IntersectionEntry], ObserverId) -> Result<()> + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.observers.observers.len());
        self.observers.observers.push(Some(Observer {
            options,
            callback: Rc::new(callback),
            targets: Vec::new(),
        }));
        id
    }

    /// Starts watching `node`. The first evaluation always delivers an entry.
    pub fn observe(&mut self, observer: ObserverId, node: NodeId) -> Result<()> {
        let observer = self.observers.get_mut(observer)?;
        if !observer.targets.iter().any(|target| target.node == node) {
            observer.targets.push(ObservedTarget { node, last: None });
        }
        Ok(())
    }

    pub fn unobserve(&mut self, observer: ObserverId, node: NodeId) -> Result<()> {
        let observer = self.observers.get_mut(observer)?;
        observer.targets.retain(|target| target.node != node);
        Ok(())
    }

    pub fn disconnect(&mut self, observer: ObserverId) {
        if let Some(slot) = self.observers.observers.get_mut(observer.0) {
            *slot = None;
        }
    }

    pub fn observed_targets(&self, observer: ObserverId) -> Vec<NodeId> {
        self.observers
            .observers
            .get(observer.0)
            .and_then(Option::as_ref)
            .map(|observer| observer.targets.iter().map(|target| target.node).collect())
            .unwrap_or_default()
    }

    /// Intersection ratio of `node` against an observer root, and whether it
    /// intersects at all (edge-adjacent counts).
    pub(crate) fn measure_intersection(
        &self,
        node: NodeId,
        options: &ObserverOptions,
    ) -> (bool, f64) {
        let Some(target_rect) = self.layout.client_rect(&self.dom, node) else {
            return (false, 0.0);
        };

        let (root_box, stop_at) = match options.root {
            ObserverRoot::Viewport => (self.layout.viewport.rect(), None),
            ObserverRoot::Element(root) => {
                if !self.dom.is_descendant_of(node, root) {
                    return (false, 0.0);
                }
                let Some(root_rect) = self.layout.client_rect(&self.dom, root) else {
                    return (false, 0.0);
                };
                (root_rect, Some(root))
            }
        };
        let root_box = options.root_margin.expand(root_box);

        let Some(visible) = self
            .layout
            .clipped_rect(&self.dom, node, stop_at)
            .and_then(|clipped| clipped.intersection(&root_box))
        else {
            return (false, 0.0);
        };

        let target_area = target_rect.area();
        let ratio = if target_area > 0.0 {
            (visible.area() / target_area).clamp(0.0, 1.0)
        } else {
            1.0
        };
        (true, ratio)
    }

    fn collect_intersection_batches(
        &mut self,
    ) -> Vec<(ObserverId, ObserverCallback, Vec<IntersectionEntry>)> {
        let now = self.scheduler.now_ms;
        let mut measured = Vec::new();
        for (index, slot) in self.observers.observers.iter().enumerate() {
            let Some(observer) = slot else {
                continue;
            };
            let states = observer
                .targets
                .iter()
                .map(|target| {
                    let (intersects, ratio) =
                        self.measure_intersection(target.node, &observer.options);
                    let is_intersecting = intersects && ratio >= observer.options.threshold;
                    (target.node, target.last, is_intersecting, ratio)
                })
                .collect::<Vec<_>>();
            measured.push((index, states));
        }

        let mut batches = Vec::new();
        for (index, states) in measured {
            let Some(observer) = self.observers.observers[index].as_mut() else {
                continue;
            };
            let mut entries = Vec::new();
            for (node, last, is_intersecting, ratio) in states {
                if last == Some(is_intersecting) {
                    continue;
                }
                if let Some(target) = observer.targets.iter_mut().find(|t| t.node == node) {
                    target.last = Some(is_intersecting);
                }
                entries.push(IntersectionEntry {
                    target: node,
                    is_intersecting,
                    intersection_ratio: ratio,
                    time_ms: now,
                });
            }
            if !entries.is_empty() {
                batches.push((ObserverId(index), Rc::clone(&observer.callback), entries));
            }
        }
        batches
    }

    /// Measures every observed target and delivers entries whose
    /// intersecting state changed, repeating while callbacks move things.
    pub(crate) fn update_intersections(&mut self) -> Result<()> {
        if self.observers.delivering {
            return Ok(());
        }
        self.observers.delivering = true;
        let result = self.deliver_intersection_rounds();
        self.observers.delivering = false;
        result
    }

    fn deliver_intersection_rounds(&mut self) -> Result<()> {
        for _ in 0..MAX_DELIVERY_ROUNDS {
            let batches = self.collect_intersection_batches();
            if batches.is_empty() {
                return Ok(());
            }
            for (id, callback, entries) in batches {
                if !self.observers.is_connected(id) {
                    continue;
                }
                self.trace_line(format!(
                    "[observer] id={} entries={} intersecting={}",
                    id.0,
                    entries.len(),
                    entries.iter().filter(|entry| entry.is_intersecting).count()
                ));
                callback(self, &entries, id)?;
            }
        }
        Err(Error::Runtime(format!(
            "intersection delivery did not settle after {MAX_DELIVERY_ROUNDS} rounds"
        )))
    }
}
