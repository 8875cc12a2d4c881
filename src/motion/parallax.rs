use super::*;

/// Vertical offset for the hero background, or `None` once the page is
/// scrolled past the first screen (the last transform then stays put).
pub fn parallax_offset(scroll_y: f64, viewport_height: f64, speed: f64) -> Option<f64> {
    (scroll_y < viewport_height).then(|| scroll_y * speed)
}

pub fn transform_value(offset: f64) -> String {
    format!("translateY({}px)", format_js_number(offset))
}

pub fn install(page: &mut Page, config: &ParallaxConfig) -> Result<bool> {
    let Some(background) = page.dom.query_selector(&config.selector)? else {
        return Ok(false);
    };

    let speed = config.speed;
    page.add_event_listener(EventTarget::Window, "scroll", move |page, _| {
        let viewport = page.viewport();
        let Some(offset) = parallax_offset(viewport.scroll_y, viewport.height, speed) else {
            return Ok(());
        };
        page.dom
            .style_set(background, "transform", &transform_value(offset))
    });
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_applies_only_within_first_screen() {
        assert_eq!(parallax_offset(100.0, 800.0, 0.3), Some(30.0));
        assert_eq!(parallax_offset(0.0, 800.0, 0.3), Some(0.0));
        assert_eq!(parallax_offset(800.0, 800.0, 0.3), None);
    }

    #[test]
    fn fractional_offsets_keep_javascript_formatting() {
        assert_eq!(transform_value(30.0), "translateY(30px)");
        assert_eq!(transform_value(3.0 * 0.3), "translateY(0.8999999999999999px)");
    }

    #[test]
    fn offsets_are_written_unrounded() -> Result<()> {
        let mut page =
            Page::from_html_with_viewport(r#"<img class="btm-hero-bg-image">"#, 1280.0, 800.0)?;
        install(&mut page, &ParallaxConfig::default())?;
        page.scroll_to(791.0)?;
        page.assert_style(
            ".btm-hero-bg-image",
            "transform",
            "translateY(237.29999999999998px)",
        )?;
        Ok(())
    }

    #[test]
    fn transform_tracks_scroll_then_freezes() -> Result<()> {
        let mut page = Page::from_html_with_viewport(
            r#"<img class="btm-hero-bg-image" src="/hero.jpg">"#,
            1280.0,
            800.0,
        )?;
        assert!(install(&mut page, &ParallaxConfig::default())?);
        page.assert_style(".btm-hero-bg-image", "transform", "")?;

        page.scroll_to(200.0)?;
        page.assert_style(".btm-hero-bg-image", "transform", "translateY(60px)")?;
        page.scroll_to(790.0)?;
        page.assert_style(".btm-hero-bg-image", "transform", "translateY(237px)")?;
        page.scroll_to(1500.0)?;
        page.assert_style(".btm-hero-bg-image", "transform", "translateY(237px)")?;
        page.scroll_to(100.0)?;
        page.assert_style(".btm-hero-bg-image", "transform", "translateY(30px)")?;
        Ok(())
    }
}
