use super::*;

use fancy_regex::Regex;
use std::sync::LazyLock;

// Digits and commas, at least one digit.
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9,]*[0-9][0-9,]*").expect("counter pattern is valid"));

/// Stat text split around its first number, e.g. `"1,234+ hectares"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterText {
    pub prefix: String,
    pub target: u64,
    pub suffix: String,
}

impl CounterText {
    /// `None` when the text holds no number or the number overflows `u64`.
    pub fn parse(text: &str) -> Option<Self> {
        let found = NUMBER_PATTERN.find(text).ok()??;
        let digits = found
            .as_str()
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>();
        let target = digits.parse::<u64>().ok()?;
        Some(Self {
            prefix: text[..found.start()].to_string(),
            target,
            suffix: text[found.end()..].to_string(),
        })
    }

    pub fn render(&self, value: u64) -> String {
        format!("{}{}{}", self.prefix, format_grouped(value), self.suffix)
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn total_frames(duration_ms: u64, frames_per_second: u64) -> u64 {
    duration_ms.saturating_mul(frames_per_second) / 1000
}

/// Value shown on `frame` (1-based): `target * frame / total`, rounded half
/// up and capped at `target`.
pub fn frame_value(target: u64, frame: u64, total: u64) -> u64 {
    if total == 0 {
        return target;
    }
    let scaled = u128::from(target) * u128::from(frame) * 2 + u128::from(total);
    let value = scaled / (u128::from(total) * 2);
    u64::try_from(value).map_or(target, |value| value.min(target))
}

/// Counts each stat up from zero the first time half of it is visible.
pub fn install(page: &mut Page, config: &CounterConfig) -> Result<bool> {
    let targets = page.select_all(&config.selector)?;
    if targets.is_empty() {
        return Ok(false);
    }

    let total = total_frames(config.duration_ms, config.frames_per_second);
    let observer = page.observe_intersections(
        ObserverOptions::with_threshold(config.threshold),
        move |page, entries, observer| {
            for entry in entries.iter().filter(|entry| entry.is_intersecting) {
                start_count(page, entry.target, total)?;
                page.unobserve(observer, entry.target)?;
            }
            Ok(())
        },
    );
    for node in targets {
        page.observe(observer, node)?;
    }
    Ok(true)
}

fn start_count(page: &mut Page, target: NodeId, total: u64) -> Result<()> {
    let Some(text) = CounterText::parse(&page.dom.text_content(target)) else {
        return Ok(());
    };
    render_frame(page, target, Rc::new(text), 1, total)
}

fn render_frame(
    page: &mut Page,
    target: NodeId,
    text: Rc<CounterText>,
    frame: u64,
    total: u64,
) -> Result<()> {
    let value = frame_value(text.target, frame, total);
    page.dom.set_text_content(target, &text.render(value))?;
    if frame < total {
        page.request_animation_frame(move |page| {
            render_frame(page, target, text, frame + 1, total)
        });
    }
    Ok(())
}
