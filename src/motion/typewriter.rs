use super::*;

/// Clears the heading and types its text back one character per step.
///
/// The text comes from the configured attribute when it is non-empty,
/// otherwise from the element's current text. Each step appends one
/// character and schedules the next; the step after the last character
/// finds nothing left and ends the run.
pub fn install(page: &mut Page, config: &TypewriterConfig) -> Result<bool> {
    let Some(target) = page.dom.query_selector(&config.selector)? else {
        return Ok(false);
    };

    let full_text = page
        .dom
        .attr(target, &config.text_attribute)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| page.dom.text_content(target));

    page.dom.set_text_content(target, "")?;
    page.dom.style_set(target, "width", "0")?;

    let chars = Rc::<[char]>::from(full_text.chars().collect::<Vec<_>>());
    let interval = config.char_interval_ms;
    page.set_timeout(config.start_delay_ms, move |page| {
        type_step(page, target, chars, 0, interval)
    });
    Ok(true)
}

fn type_step(
    page: &mut Page,
    target: NodeId,
    chars: Rc<[char]>,
    index: usize,
    interval: i64,
) -> Result<()> {
    let Some(ch) = chars.get(index) else {
        return Ok(());
    };
    let mut text = page.dom.text_content(target);
    text.push(*ch);
    page.dom.set_text_content(target, &text)?;
    page.set_timeout(interval, move |page| {
        type_step(page, target, chars, index + 1, interval)
    });
    Ok(())
}
