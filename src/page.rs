use super::*;

pub(crate) const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub(crate) const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

#[derive(Debug, Default)]
pub(crate) struct PlatformMockState {
    pub(crate) match_media_mocks: HashMap<String, bool>,
    pub(crate) match_media_calls: Vec<String>,
    pub(crate) default_match_media_matches: bool,
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) timers: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
        }
    }
}

/// A loaded document plus the platform pieces behaviors talk to.
#[derive(Debug)]
pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) scheduler: SchedulerState,
    pub(crate) layout: LayoutState,
    pub(crate) observers: ObserverRegistry,
    pub(crate) platform_mocks: PlatformMockState,
    pub(crate) location_hash: String,
    pub(crate) console_logs: Vec<String>,
    pub(crate) scroll_requests: Vec<ScrollRequest>,
    pub(crate) trace_state: TraceState,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_viewport(html, DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
    }

    pub fn from_html_with_viewport(html: &str, width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(Error::Runtime(format!(
                "viewport must be finite and non-negative (width={width}, height={height})"
            )));
        }
        Ok(Self {
            dom: html::parse_html(html)?,
            listeners: ListenerStore::default(),
            scheduler: SchedulerState::default(),
            layout: LayoutState::new(width, height),
            observers: ObserverRegistry::default(),
            platform_mocks: PlatformMockState::default(),
            location_hash: String::new(),
            console_logs: Vec::new(),
            scroll_requests: Vec::new(),
            trace_state: TraceState::default(),
        })
    }

    pub fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    /// All matches in document order; empty when nothing matches.
    pub fn select_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all(selector)
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name))
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.dom.class_contains(target, class_name)
    }

    pub fn node_has_class(&self, node: NodeId, class_name: &str) -> Result<bool> {
        self.dom.class_contains(node, class_name)
    }

    /// Inline style value, `""` when the property is unset.
    pub fn style(&self, selector: &str, property: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.style_get(target, property)
    }

    pub fn node_style(&self, node: NodeId, property: &str) -> Result<String> {
        self.dom.style_get(node, property)
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    /// Fragment set by the last in-page anchor jump, including the `#`.
    pub fn location_hash(&self) -> &str {
        &self.location_hash
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_attr(&self, selector: &str, name: &str, expected: Option<&str>) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.attr(target, name);
        if actual.as_deref() != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{name}={expected:?}"),
                actual: format!("{name}={actual:?}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class {class_name} present={expected}"),
                actual: format!("class {class_name} present={actual}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.style_get(target, property)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{property}: {expected}"),
                actual: format!("{property}: {actual}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub(crate) fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    pub fn set_match_media_mock(&mut self, query: &str, matches: bool) {
        self.platform_mocks
            .match_media_mocks
            .insert(query.to_string(), matches);
    }

    pub fn clear_match_media_mocks(&mut self) {
        self.platform_mocks.match_media_mocks.clear();
    }

    pub fn set_default_match_media_matches(&mut self, matches: bool) {
        self.platform_mocks.default_match_media_matches = matches;
    }

    /// `window.matchMedia(query).matches`, answered from the mocks.
    pub fn match_media(&mut self, query: &str) -> bool {
        self.platform_mocks.match_media_calls.push(query.to_string());
        self.platform_mocks
            .match_media_mocks
            .get(query)
            .copied()
            .unwrap_or(self.platform_mocks.default_match_media_matches)
    }

    pub fn take_match_media_calls(&mut self) -> Vec<String> {
        std::mem::take(&mut self.platform_mocks.match_media_calls)
    }

    pub fn console_log(&mut self, message: &str) {
        log::info!("{message}");
        self.console_logs.push(message.to_string());
    }

    pub fn take_console_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.console_logs)
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_state.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.trace_state.timers = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_state.log_limit = max_entries;
        while self.trace_state.logs.len() > self.trace_state.log_limit {
            self.trace_state.logs.pop_front();
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace_state.logs.drain(..).collect()
    }

    pub(crate) fn trace_event_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.events {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_timer_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.timers {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_line(&mut self, line: String) {
        if self.trace_state.enabled {
            log::debug!("{line}");
            if self.trace_state.logs.len() >= self.trace_state.log_limit {
                self.trace_state.logs.pop_front();
            }
            self.trace_state.logs.push_back(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_failures_carry_selector_and_snippet() -> Result<()> {
        let page = Page::from_html("<p id='out' class='a'>hello</p>")?;
        page.assert_text("#out", "hello")?;
        page.assert_class("#out", "a", true)?;
        page.assert_attr("#out", "missing", None)?;
        match page.assert_text("#out", "bye") {
            Err(Error::AssertionFailed {
                selector,
                actual,
                dom_snippet,
                ..
            }) => {
                assert_eq!(selector, "#out");
                assert_eq!(actual, "hello");
                assert!(dom_snippet.contains("<p"));
            }
            other => panic!("expected assertion failure, got {other:?}"),
        }
        assert!(matches!(
            page.assert_exists("#nope"),
            Err(Error::SelectorNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn match_media_records_calls_and_falls_back_to_default() -> Result<()> {
        let mut page = Page::from_html("<p></p>")?;
        page.set_match_media_mock("(prefers-reduced-motion: reduce)", true);
        assert!(page.match_media("(prefers-reduced-motion: reduce)"));
        assert!(!page.match_media("(min-width: 768px)"));
        page.set_default_match_media_matches(true);
        assert!(page.match_media("(min-width: 768px)"));
        assert_eq!(
            page.take_match_media_calls(),
            vec![
                "(prefers-reduced-motion: reduce)".to_string(),
                "(min-width: 768px)".to_string(),
                "(min-width: 768px)".to_string(),
            ]
        );
        assert!(page.take_match_media_calls().is_empty());
        Ok(())
    }

    #[test]
    fn trace_buffer_is_bounded_and_drained() -> Result<()> {
        let mut page = Page::from_html("<p></p>")?;
        page.trace_line("dropped while disabled".into());
        page.enable_trace(true);
        page.set_trace_log_limit(2)?;
        for n in 0..3 {
            page.trace_line(format!("line {n}"));
        }
        assert_eq!(page.take_trace_logs(), vec!["line 1", "line 2"]);
        assert!(page.take_trace_logs().is_empty());
        assert!(page.set_trace_log_limit(0).is_err());
        Ok(())
    }

    #[test]
    fn console_lines_are_buffered() -> Result<()> {
        let mut page = Page::from_html("<p></p>")?;
        page.console_log("ready");
        assert_eq!(page.take_console_logs(), vec!["ready"]);
        Ok(())
    }

    #[test]
    fn rejects_unusable_viewports() {
        assert!(Page::from_html_with_viewport("<p></p>", -1.0, 10.0).is_err());
        assert!(Page::from_html_with_viewport("<p></p>", f64::NAN, 10.0).is_err());
    }

    #[test]
    fn dump_dom_serializes_the_match_with_sorted_attributes() -> Result<()> {
        let page = Page::from_html(
            "<li id='s0' class='btm-donation-step'>Choose <b>one</b></li>",
        )?;
        assert_eq!(
            page.dump_dom("#s0")?,
            r#"<li class="btm-donation-step" id="s0">Choose <b>one</b></li>"#
        );
        assert!(matches!(
            page.dump_dom("#s9"),
            Err(Error::SelectorNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn clearing_media_mocks_falls_back_to_the_default() -> Result<()> {
        let mut page = Page::from_html("<p></p>")?;
        page.set_match_media_mock("(prefers-reduced-motion: reduce)", true);
        assert!(page.match_media("(prefers-reduced-motion: reduce)"));
        page.clear_match_media_mocks();
        assert!(!page.match_media("(prefers-reduced-motion: reduce)"));
        page.set_default_match_media_matches(true);
        assert!(page.match_media("(prefers-reduced-motion: reduce)"));
        Ok(())
    }

    #[test]
    fn trace_categories_can_be_silenced_separately() -> Result<()> {
        let mut page = Page::from_html("<button id='cta'></button>")?;
        page.enable_trace(true);
        page.set_trace_events(false);
        page.set_timeout(5, |_| Ok(()));
        page.click("#cta")?;
        page.flush()?;
        let logs = page.take_trace_logs();
        assert!(logs.iter().all(|line| !line.starts_with("[event]")));
        assert!(logs.iter().any(|line| line.starts_with("[timer] run")));

        page.set_trace_events(true);
        page.set_trace_timers(false);
        page.set_timeout(5, |_| Ok(()));
        page.click("#cta")?;
        page.flush()?;
        let logs = page.take_trace_logs();
        assert!(logs.iter().any(|line| line.starts_with("[event] click")));
        assert!(logs.iter().all(|line| !line.starts_with("[timer]")));
        Ok(())
    }
}
