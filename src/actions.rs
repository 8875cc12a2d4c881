use super::*;

impl Page {
    /// Clicks the first match: bubbling `click`, then the default action
    /// unless a listener prevented it.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target)
    }

    pub fn click_node(&mut self, target: NodeId) -> Result<()> {
        let event = self.dispatch_event(EventTarget::Node(target), "click", true)?;
        if !event.default_prevented() {
            self.run_click_default_action(target)?;
        }
        self.update_intersections()
    }

    pub fn hover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(EventTarget::Node(target), "mouseenter", false)?;
        self.update_intersections()
    }

    pub fn unhover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(EventTarget::Node(target), "mouseleave", false)?;
        self.update_intersections()
    }

    /// Dispatches a bubbling event of `event_type` with no default action.
    pub fn dispatch(&mut self, selector: &str, event_type: &str) -> Result<Event> {
        let target = self.select_one(selector)?;
        let event = self.dispatch_event(EventTarget::Node(target), event_type, true)?;
        self.update_intersections()?;
        Ok(event)
    }

    /// Scrolls the window vertically; `scroll` fires only when the offset
    /// actually changes.
    pub fn scroll_to(&mut self, y: f64) -> Result<()> {
        let x = self.layout.viewport.scroll_x;
        self.set_window_scroll(x, y)?;
        self.update_intersections()
    }

    /// Scrolls a scroll container horizontally.
    pub fn scroll_element_to(&mut self, selector: &str, left: f64) -> Result<()> {
        let container = self.select_one(selector)?;
        if !self.layout.scroll_containers.contains(&container) {
            return Err(Error::Runtime(format!(
                "{selector} is not a scroll container"
            )));
        }
        let (_, top) = self.layout.scroll_offset(container);
        self.set_element_scroll(container, left, top)?;
        self.update_intersections()
    }

    pub fn viewport(&self) -> Viewport {
        self.layout.viewport
    }

    pub fn set_rect(&mut self, selector: &str, rect: Rect) -> Result<()> {
        let target = self.select_one(selector)?;
        self.set_node_rect(target, Some(rect))
    }

    /// Box of the `index`-th match (document order).
    pub fn set_rect_at(&mut self, selector: &str, index: usize, rect: Rect) -> Result<()> {
        let target = self
            .select_all(selector)?
            .get(index)
            .copied()
            .ok_or_else(|| Error::SelectorNotFound(format!("{selector} [index {index}]")))?;
        self.set_node_rect(target, Some(rect))
    }

    /// Removes the box of the first match, as if it were `display: none`.
    pub fn clear_rect(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.set_node_rect(target, None)
    }

    pub fn set_node_rect(&mut self, target: NodeId, rect: Option<Rect>) -> Result<()> {
        if self.dom.element(target).is_none() {
            return Err(Error::Runtime("layout target is not an element".into()));
        }
        match rect {
            Some(rect) => {
                self.layout.rects.insert(target, rect);
            }
            None => {
                self.layout.rects.remove(&target);
            }
        }
        self.update_intersections()
    }

    /// Marks the first match as a scroll container: its scroll offset moves
    /// its descendants and clips them to its box.
    pub fn set_scroll_container(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.layout.scroll_containers.insert(target);
        self.update_intersections()
    }

    pub fn element_scroll_offset(&self, selector: &str) -> Result<(f64, f64)> {
        let target = self.select_one(selector)?;
        Ok(self.layout.scroll_offset(target))
    }

    /// `element.scrollIntoView(options)`: recorded, then applied at once to
    /// every scroll container ancestor and the window.
    pub fn scroll_into_view(&mut self, target: NodeId, options: ScrollIntoViewOptions) -> Result<()> {
        self.scroll_requests.push(ScrollRequest { target, options });
        self.trace_line(format!(
            "[scroll] into_view target={} behavior={:?} block={:?} inline={:?}",
            truncate_chars(&self.dom.dump_node(target), 60),
            options.behavior,
            options.block,
            options.inline
        ));
        self.apply_scroll_into_view(target, options)?;
        self.update_intersections()
    }

    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.scroll_requests)
    }

    fn run_click_default_action(&mut self, target: NodeId) -> Result<()> {
        let anchor = std::iter::once(target)
            .chain(self.dom.ancestors(target))
            .find(|node| self.dom.tag_name(*node) == Some("a"));
        let Some(href) = anchor.and_then(|anchor| self.dom.attr(anchor, "href")) else {
            return Ok(());
        };
        // Only in-page navigation is modeled.
        let Some(fragment) = href.strip_prefix('#') else {
            return Ok(());
        };

        self.location_hash = href.clone();
        self.trace_line(format!("[nav] fragment {href}"));
        if fragment.is_empty() {
            let x = self.layout.viewport.scroll_x;
            return self.set_window_scroll(x, 0.0);
        }
        match self.dom.by_id(fragment) {
            Some(destination) => {
                self.apply_scroll_into_view(destination, ScrollIntoViewOptions::default())
            }
            None => Ok(()),
        }
    }

    fn apply_scroll_into_view(
        &mut self,
        target: NodeId,
        options: ScrollIntoViewOptions,
    ) -> Result<()> {
        let containers = self
            .dom
            .ancestors(target)
            .into_iter()
            .filter(|node| self.layout.scroll_containers.contains(node))
            .collect::<Vec<_>>();

        for container in containers {
            let (Some(target_box), Some(port)) = (
                self.layout.client_rect(&self.dom, target),
                self.layout.client_rect(&self.dom, container),
            ) else {
                continue;
            };
            let dx = layout::alignment_delta(
                options.inline,
                port.x,
                port.width,
                target_box.x,
                target_box.width,
            );
            let dy = layout::alignment_delta(
                options.block,
                port.y,
                port.height,
                target_box.y,
                target_box.height,
            );
            let (left, top) = self.layout.scroll_offset(container);
            self.set_element_scroll(container, left + dx, top + dy)?;
        }

        let Some(target_box) = self.layout.client_rect(&self.dom, target) else {
            return Ok(());
        };
        let view = self.layout.viewport.rect();
        let dx = layout::alignment_delta(
            options.inline,
            view.x,
            view.width,
            target_box.x,
            target_box.width,
        );
        let dy = layout::alignment_delta(
            options.block,
            view.y,
            view.height,
            target_box.y,
            target_box.height,
        );
        self.set_window_scroll(view.x + dx, view.y + dy)
    }

    fn set_window_scroll(&mut self, x: f64, y: f64) -> Result<()> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(Error::Runtime(format!(
                "scroll offsets must be finite (x={x}, y={y})"
            )));
        }
        let (x, y) = (x.max(0.0), y.max(0.0));
        let viewport = &mut self.layout.viewport;
        if viewport.scroll_x == x && viewport.scroll_y == y {
            return Ok(());
        }
        viewport.scroll_x = x;
        viewport.scroll_y = y;
        self.trace_line(format!("[scroll] window x={x} y={y}"));
        self.dispatch_event(EventTarget::Window, "scroll", false)?;
        Ok(())
    }

    fn set_element_scroll(&mut self, container: NodeId, left: f64, top: f64) -> Result<()> {
        if !(left.is_finite() && top.is_finite()) {
            return Err(Error::Runtime(format!(
                "scroll offsets must be finite (left={left}, top={top})"
            )));
        }
        let next = (left.max(0.0), top.max(0.0));
        if self.layout.scroll_offset(container) == next {
            return Ok(());
        }
        self.layout.scroll_offsets.insert(container, next);
        self.dispatch_event(EventTarget::Node(container), "scroll", false)?;
        Ok(())
    }
}
