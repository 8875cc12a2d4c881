use super::*;

pub(crate) type ListenerCallback = Rc<dyn Fn(&mut Page, &mut Event) -> Result<()>>;

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Node(NodeId),
}

#[derive(Clone)]
pub(crate) struct Listener {
    pub(crate) callback: ListenerCallback,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    pub(crate) map: HashMap<EventTarget, HashMap<String, Vec<Listener>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, target: EventTarget, event: String, listener: Listener) {
        self.map
            .entry(target)
            .or_default()
            .entry(event)
            .or_default()
            .push(listener);
    }

    /// Snapshot of the listeners, so callbacks can add more while running.
    pub(crate) fn get(&self, target: EventTarget, event: &str) -> Vec<Listener> {
        self.map
            .get(&target)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, target: EventTarget, event: &str) -> usize {
        self.map
            .get(&target)
            .and_then(|events| events.get(event))
            .map_or(0, Vec::len)
    }
}

/// Event object handed to listeners.
#[derive(Debug, Clone)]
pub struct Event {
    pub(crate) event_type: String,
    pub(crate) target: EventTarget,
    pub(crate) current_target: EventTarget,
    pub(crate) time_stamp_ms: i64,
    pub(crate) bubbles: bool,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) immediate_propagation_stopped: bool,
}

impl Event {
    pub(crate) fn new(event_type: &str, target: EventTarget, bubbles: bool, time_stamp_ms: i64) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            time_stamp_ms,
            bubbles,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn target(&self) -> EventTarget {
        self.target
    }

    pub fn current_target(&self) -> EventTarget {
        self.current_target
    }

    pub fn time_stamp_ms(&self) -> i64 {
        self.time_stamp_ms
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }
}

impl Page {
    pub fn add_event_listener(
        &mut self,
        target: EventTarget,
        event: &str,
        callback: impl Fn(&mut Page, &mut Event) -> Result<()> + 'static,
    ) {
        self.listeners.add(
            target,
            event.to_string(),
            Listener {
                callback: Rc::new(callback),
            },
        );
    }

    pub fn listener_count(&self, target: EventTarget, event: &str) -> usize {
        self.listeners.count(target, event)
    }

    /// Runs listeners on the target, then (for bubbling events) on each
    /// ancestor element and finally the window.
    pub(crate) fn dispatch_event(
        &mut self,
        target: EventTarget,
        event_type: &str,
        bubbles: bool,
    ) -> Result<Event> {
        let mut event = Event::new(event_type, target, bubbles, self.scheduler.now_ms);

        let mut path = vec![target];
        if bubbles {
            if let EventTarget::Node(node) = target {
                path.extend(self.dom.ancestors(node).into_iter().map(EventTarget::Node));
                path.push(EventTarget::Window);
            }
        }

        for current in path {
            event.current_target = current;
            for listener in self.listeners.get(current, event_type) {
                (listener.callback)(self, &mut event)?;
                if event.immediate_propagation_stopped {
                    break;
                }
            }
            if event.propagation_stopped {
                break;
            }
        }

        self.trace_event_line(format!(
            "[event] {} target={} default_prevented={}",
            event_type,
            self.describe_target(target),
            event.default_prevented
        ));
        Ok(event)
    }

    fn describe_target(&self, target: EventTarget) -> String {
        match target {
            EventTarget::Window => "window".into(),
            EventTarget::Node(node) => truncate_chars(&self.dom.dump_node(node), 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn dispatched_events_bubble_to_the_window() -> Result<()> {
        let mut page = Page::from_html("<div id='outer'><button id='inner'></button></div>")?;
        let outer = page.select_one("#outer")?;
        let inner = page.select_one("#inner")?;
        let seen = Rc::new(RefCell::new(Vec::new()));
        for target in [
            EventTarget::Node(inner),
            EventTarget::Node(outer),
            EventTarget::Window,
        ] {
            let sink = Rc::clone(&seen);
            page.add_event_listener(target, "pledge", move |_, event| {
                sink.borrow_mut().push((
                    event.event_type().to_string(),
                    event.target(),
                    event.current_target(),
                ));
                Ok(())
            });
        }

        page.advance_time(40)?;
        let event = page.dispatch("#inner", "pledge")?;
        assert!(event.bubbles());
        assert_eq!(event.time_stamp_ms(), 40);
        assert!(!event.default_prevented());
        let target = EventTarget::Node(inner);
        assert_eq!(
            *seen.borrow(),
            vec![
                ("pledge".to_string(), target, EventTarget::Node(inner)),
                ("pledge".to_string(), target, EventTarget::Node(outer)),
                ("pledge".to_string(), target, EventTarget::Window),
            ]
        );
        Ok(())
    }

    #[test]
    fn stop_propagation_finishes_the_current_target_first() -> Result<()> {
        let mut page = Page::from_html("<div id='outer'><button id='inner'></button></div>")?;
        let outer = page.select_one("#outer")?;
        let inner = page.select_one("#inner")?;
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        page.add_event_listener(EventTarget::Node(inner), "pledge", move |_, event| {
            sink.borrow_mut().push("first");
            event.stop_propagation();
            Ok(())
        });
        let sink = Rc::clone(&seen);
        page.add_event_listener(EventTarget::Node(inner), "pledge", move |_, _| {
            sink.borrow_mut().push("second");
            Ok(())
        });
        let sink = Rc::clone(&seen);
        page.add_event_listener(EventTarget::Node(outer), "pledge", move |_, _| {
            sink.borrow_mut().push("outer");
            Ok(())
        });

        page.dispatch("#inner", "pledge")?;
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
        Ok(())
    }

    #[test]
    fn stop_immediate_propagation_skips_remaining_listeners() -> Result<()> {
        let mut page = Page::from_html("<button id='cta'></button>")?;
        let cta = page.select_one("#cta")?;
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        page.add_event_listener(EventTarget::Node(cta), "pledge", move |_, event| {
            sink.borrow_mut().push("first");
            event.stop_immediate_propagation();
            Ok(())
        });
        let sink = Rc::clone(&seen);
        page.add_event_listener(EventTarget::Node(cta), "pledge", move |_, _| {
            sink.borrow_mut().push("second");
            Ok(())
        });

        page.dispatch("#cta", "pledge")?;
        assert_eq!(*seen.borrow(), vec!["first"]);
        Ok(())
    }

    #[test]
    fn hover_events_report_that_they_do_not_bubble() -> Result<()> {
        let mut page = Page::from_html("<a id='cta' class='btm-cta-button'></a>")?;
        let cta = page.select_one("#cta")?;
        let flags = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&flags);
        page.add_event_listener(EventTarget::Node(cta), "mouseenter", move |_, event| {
            sink.borrow_mut().push(event.bubbles());
            Ok(())
        });
        page.hover("#cta")?;
        assert_eq!(*flags.borrow(), vec![false]);
        Ok(())
    }
}
