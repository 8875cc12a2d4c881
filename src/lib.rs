//! Landing page motion behaviors running on a deterministic page runtime.
//!
//! [`Page`] models the slice of a browser the behaviors need: a DOM with
//! classes and inline styles, listeners, a virtual clock with timers and
//! animation frames, explicit layout boxes, scrolling and intersection
//! observers. [`motion::install`] wires the landing page behaviors onto a
//! page the same way a `DOMContentLoaded` handler would.
//!
//! ```no_run
//! use landing_motion::{MotionConfig, Page, Rect, motion};
//!
//! # fn main() -> landing_motion::Result<()> {
//! let mut page = Page::from_html(r#"<p class="btm-stat-number">1,234+</p>"#)?;
//! page.set_rect(".btm-stat-number", Rect::new(0.0, 100.0, 200.0, 40.0))?;
//! motion::install(&mut page, &MotionConfig::default())?;
//! page.flush()?;
//! page.assert_text(".btm-stat-number", "1,234+")?;
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;

mod actions;
mod config;
mod dom;
mod events;
mod html;
mod layout;
pub mod motion;
mod observer;
mod page;
mod scheduler;
mod selector;

pub use config::{
    AnchorConfig, CarouselConfig, CounterConfig, HoverConfig, MotionConfig, ParallaxConfig,
    ReducedMotionConfig, RevealConfig, StepsConfig, TypewriterConfig, VideoConfig,
};
pub use dom::NodeId;
pub use events::{Event, EventTarget};
pub use layout::{
    Rect, RootMargin, ScrollAlignment, ScrollBehavior, ScrollIntoViewOptions, ScrollRequest,
    Viewport,
};
pub use observer::{IntersectionEntry, ObserverId, ObserverOptions, ObserverRoot};
pub use page::Page;
pub use scheduler::{FrameId, PendingTimer, TimerId};

pub(crate) use dom::Dom;
pub(crate) use events::ListenerStore;
pub(crate) use layout::LayoutState;
pub(crate) use observer::ObserverRegistry;
pub(crate) use scheduler::SchedulerState;
pub(crate) use selector::*;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}

/// Formats a number the way JavaScript's `Number.prototype.toString` does
/// for the finite, non-huge values that show up in inline styles.
pub(crate) fn format_js_number(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".into()
        } else if value > 0.0 {
            "Infinity".into()
        } else {
            "-Infinity".into()
        };
    }
    // -0 prints as "0" in JS.
    format!("{}", value + 0.0)
}
