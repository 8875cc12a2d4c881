use super::*;

/// Source URL with the first paused marker flipped, or `None` when there
/// is no marker.
pub fn activate_src(src: &str, paused: &str, playing: &str) -> Option<String> {
    src.contains(paused).then(|| src.replacen(paused, playing, 1))
}

/// Starts the embedded video the first time 30% of it is visible.
pub fn install(page: &mut Page, config: &VideoConfig) -> Result<bool> {
    let Some(frame) = page.dom.query_selector(&config.selector)? else {
        return Ok(false);
    };

    let paused = config.paused_marker.clone();
    let playing = config.playing_marker.clone();
    let observer = page.observe_intersections(
        ObserverOptions::with_threshold(config.threshold),
        move |page, entries, observer| {
            for entry in entries.iter().filter(|entry| entry.is_intersecting) {
                if let Some(src) = page
                    .dom
                    .attr(frame, "src")
                    .and_then(|src| activate_src(&src, &paused, &playing))
                {
                    page.dom.set_attr(frame, "src", &src)?;
                }
                page.unobserve(observer, entry.target)?;
            }
            Ok(())
        },
    );
    page.observe(observer, frame)?;
    Ok(true)
}
