use super::*;

/// Honors the reduced-motion preference, read once. Revealed content shows
/// immediately without transitions and the typewriter caret stops
/// animating; already scheduled typing steps still run.
pub fn install(
    page: &mut Page,
    config: &ReducedMotionConfig,
    reveal: &RevealConfig,
    typewriter: &TypewriterConfig,
) -> Result<bool> {
    if !page.match_media(&config.media_query) {
        return Ok(false);
    }
    log::debug!("reduced motion requested; skipping entrance animations");

    for node in page.select_all(&format!(".{}", reveal.base_class))? {
        page.dom.class_add(node, &reveal.visible_class)?;
        page.dom.style_set(node, "transition", "none")?;
    }

    if let Some(heading) = page.dom.query_selector(&typewriter.selector)? {
        page.dom.style_set(heading, "animation", "none")?;
        page.dom.style_set(heading, "borderRight", "none")?;
    }
    Ok(true)
}
