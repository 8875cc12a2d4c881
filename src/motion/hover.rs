use super::*;

pub fn install(page: &mut Page, config: &HoverConfig) -> Result<bool> {
    let buttons = page.select_all(&config.selector)?;
    if buttons.is_empty() {
        return Ok(false);
    }

    for button in buttons {
        let transform = config.transform.clone();
        page.add_event_listener(EventTarget::Node(button), "mouseenter", move |page, _| {
            page.dom.style_set(button, "transform", &transform)
        });
        // Clearing the inline value hands control back to the stylesheet.
        page.add_event_listener(EventTarget::Node(button), "mouseleave", move |page, _| {
            page.dom.style_set(button, "transform", "")
        });
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_lifts_and_leave_restores() -> Result<()> {
        let mut page = Page::from_html(
            r#"<a class="btm-cta-button" style="color: blue;">Give</a>"#,
        )?;
        assert!(install(&mut page, &HoverConfig::default())?);
        page.hover(".btm-cta-button")?;
        page.assert_style(".btm-cta-button", "transform", "translateY(-3px) scale(1.02)")?;
        page.unhover(".btm-cta-button")?;
        page.assert_style(".btm-cta-button", "transform", "")?;
        page.assert_attr(".btm-cta-button", "style", Some("color: blue;"))?;
        Ok(())
    }

    #[test]
    fn each_button_is_independent() -> Result<()> {
        let mut page = Page::from_html(
            r#"<a class="btm-cta-button" id="a">A</a><a class="btm-cta-button" id="b">B</a>"#,
        )?;
        install(&mut page, &HoverConfig::default())?;
        page.hover("#b")?;
        page.assert_style("#a", "transform", "")?;
        page.assert_style("#b", "transform", "translateY(-3px) scale(1.02)")?;
        Ok(())
    }
}
