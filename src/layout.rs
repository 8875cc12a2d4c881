use super::*;

use fancy_regex::Regex;
use std::sync::LazyLock;

static MARGIN_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?(?:\d+(?:\.\d*)?|\.\d+))(px|%)?$").expect("root margin pattern is valid")
});

/// Axis-aligned box in CSS pixels, document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Overlap of two boxes. Edge-adjacent boxes yield a zero-area rect;
    /// disjoint boxes yield `None`.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MarginLength {
    Px(f64),
    Percent(f64),
}

impl MarginLength {
    fn resolve(self, basis: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(percent) => basis * percent / 100.0,
        }
    }
}

/// `rootMargin` of an intersection observer, CSS margin shorthand order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    top: MarginLength,
    right: MarginLength,
    bottom: MarginLength,
    left: MarginLength,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::px(0.0, 0.0, 0.0, 0.0)
    }
}

impl RootMargin {
    pub fn px(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top: MarginLength::Px(top),
            right: MarginLength::Px(right),
            bottom: MarginLength::Px(bottom),
            left: MarginLength::Px(left),
        }
    }

    /// Parses one to four `px` or `%` lengths, e.g. `"0px 0px -50px 0px"`.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidConfig(format!("invalid root margin: {value:?}"));
        let mut lengths = Vec::with_capacity(4);
        for token in value.split_ascii_whitespace() {
            let captures = MARGIN_TOKEN
                .captures(token)
                .map_err(|_| invalid())?
                .ok_or_else(invalid)?;
            let number = captures
                .get(1)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .ok_or_else(invalid)?;
            let length = match captures.get(2).map(|m| m.as_str()) {
                Some("%") => MarginLength::Percent(number),
                Some(_) => MarginLength::Px(number),
                // Only a bare zero may drop its unit.
                None if number == 0.0 => MarginLength::Px(0.0),
                None => return Err(invalid()),
            };
            lengths.push(length);
        }

        let [top, right, bottom, left] = match lengths[..] {
            [all] => [all, all, all, all],
            [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
            [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
            [top, right, bottom, left] => [top, right, bottom, left],
            _ => return Err(invalid()),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Grows (or, for negative margins, shrinks) the root box.
    pub fn expand(&self, root: Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);
        Rect::new(
            root.x - left,
            root.y - top,
            (root.width + left + right).max(0.0),
            (root.height + top + bottom).max(0.0),
        )
    }
}

/// Window size and scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Viewport {
    pub fn rect(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlignment {
    Start,
    Center,
    End,
    Nearest,
}

/// `scrollIntoView` options; the default matches `scrollIntoView()` with no
/// arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollIntoViewOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollAlignment,
    pub inline: ScrollAlignment,
}

impl Default for ScrollIntoViewOptions {
    fn default() -> Self {
        Self {
            behavior: ScrollBehavior::Auto,
            block: ScrollAlignment::Start,
            inline: ScrollAlignment::Nearest,
        }
    }
}

/// A `scrollIntoView` call observed by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: NodeId,
    pub options: ScrollIntoViewOptions,
}

/// Scroll offset change needed along one axis to align `target` inside
/// `view` (both given as start and size on that axis).
pub(crate) fn alignment_delta(
    alignment: ScrollAlignment,
    view_start: f64,
    view_size: f64,
    target_start: f64,
    target_size: f64,
) -> f64 {
    let view_end = view_start + view_size;
    let target_end = target_start + target_size;
    match alignment {
        ScrollAlignment::Start => target_start - view_start,
        ScrollAlignment::End => target_end - view_end,
        ScrollAlignment::Center => {
            (target_start + target_size / 2.0) - (view_start + view_size / 2.0)
        }
        ScrollAlignment::Nearest => {
            if target_start >= view_start && target_end <= view_end {
                0.0
            } else if target_start < view_start || target_size > view_size {
                target_start - view_start
            } else {
                target_end - view_end
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct LayoutState {
    pub(crate) viewport: Viewport,
    pub(crate) rects: HashMap<NodeId, Rect>,
    pub(crate) scroll_offsets: HashMap<NodeId, (f64, f64)>,
    pub(crate) scroll_containers: HashSet<NodeId>,
}

impl LayoutState {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport {
                width,
                height,
                scroll_x: 0.0,
                scroll_y: 0.0,
            },
            rects: HashMap::new(),
            scroll_offsets: HashMap::new(),
            scroll_containers: HashSet::new(),
        }
    }

    pub(crate) fn scroll_offset(&self, node: NodeId) -> (f64, f64) {
        self.scroll_offsets.get(&node).copied().unwrap_or((0.0, 0.0))
    }

    /// Box of `node` after applying the scroll offsets of its scroll
    /// container ancestors. `None` for nodes without a layout box.
    pub(crate) fn client_rect(&self, dom: &Dom, node: NodeId) -> Option<Rect> {
        let rect = *self.rects.get(&node)?;
        let (dx, dy) = dom
            .ancestors(node)
            .into_iter()
            .filter(|ancestor| self.scroll_containers.contains(ancestor))
            .map(|container| self.scroll_offset(container))
            .fold((0.0, 0.0), |(x, y), (left, top)| (x + left, y + top));
        Some(rect.translate(-dx, -dy))
    }

    /// Part of `node` left visible after clipping by scroll container
    /// ancestors below `stop_at`.
    pub(crate) fn clipped_rect(
        &self,
        dom: &Dom,
        node: NodeId,
        stop_at: Option<NodeId>,
    ) -> Option<Rect> {
        let mut visible = self.client_rect(dom, node)?;
        for ancestor in dom.ancestors(node) {
            if Some(ancestor) == stop_at {
                break;
            }
            if !self.scroll_containers.contains(&ancestor) {
                continue;
            }
            let Some(port) = self.client_rect(dom, ancestor) else {
                continue;
            };
            visible = visible.intersection(&port)?;
        }
        Some(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_margin_shorthand_expands_like_css() -> Result<()> {
        let root = Rect::new(0.0, 0.0, 1000.0, 800.0);
        assert_eq!(
            RootMargin::parse("0px 0px -50px 0px")?.expand(root),
            Rect::new(0.0, 0.0, 1000.0, 750.0)
        );
        assert_eq!(
            RootMargin::parse("10px")?.expand(root),
            Rect::new(-10.0, -10.0, 1020.0, 820.0)
        );
        assert_eq!(
            RootMargin::parse("10% 0")?.expand(root),
            Rect::new(0.0, -80.0, 1000.0, 960.0)
        );
        Ok(())
    }

    #[test]
    fn root_margin_rejects_unitless_non_zero_and_extra_values() {
        for value in ["5", "1px 2px 3px 4px 5px", "", "1em"] {
            assert!(RootMargin::parse(value).is_err(), "{value:?} should fail");
        }
    }

    #[test]
    fn intersection_distinguishes_adjacent_from_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            a.intersection(&Rect::new(10.0, 0.0, 5.0, 5.0)),
            Some(Rect::new(10.0, 0.0, 0.0, 5.0))
        );
        assert_eq!(a.intersection(&Rect::new(11.0, 0.0, 5.0, 5.0)), None);
        assert_eq!(
            a.intersection(&Rect::new(5.0, 5.0, 10.0, 10.0)),
            Some(Rect::new(5.0, 5.0, 5.0, 5.0))
        );
    }

    #[test]
    fn alignment_deltas_follow_scroll_into_view_rules() {
        assert_eq!(alignment_delta(ScrollAlignment::Start, 0.0, 800.0, 1200.0, 100.0), 1200.0);
        assert_eq!(alignment_delta(ScrollAlignment::End, 0.0, 800.0, 1200.0, 100.0), 500.0);
        assert_eq!(alignment_delta(ScrollAlignment::Center, 0.0, 300.0, 600.0, 300.0), 600.0);
        assert_eq!(alignment_delta(ScrollAlignment::Nearest, 0.0, 800.0, 100.0, 100.0), 0.0);
        assert_eq!(alignment_delta(ScrollAlignment::Nearest, 500.0, 800.0, 100.0, 100.0), -400.0);
        assert_eq!(alignment_delta(ScrollAlignment::Nearest, 0.0, 800.0, 900.0, 100.0), 200.0);
    }
}
