use super::*;

/// Stagger class for the element at `index` in the matched set.
pub fn delay_class(prefix: &str, index: usize, stagger: usize) -> String {
    format!("{prefix}{}", index % stagger.max(1) + 1)
}

/// Tags every animatable element with the hidden-state and stagger classes,
/// then reveals each one the first time it scrolls into view.
pub fn install(page: &mut Page, config: &RevealConfig) -> Result<bool> {
    let targets = page.select_all(&config.selector)?;
    if targets.is_empty() {
        return Ok(false);
    }

    for (index, node) in targets.iter().enumerate() {
        page.dom.class_add(*node, &config.base_class)?;
        page.dom.class_add(
            *node,
            &delay_class(&config.delay_class_prefix, index, config.stagger),
        )?;
    }

    let options = ObserverOptions {
        root: ObserverRoot::Viewport,
        root_margin: RootMargin::parse(&config.root_margin)?,
        threshold: config.threshold,
    };
    let visible_class = config.visible_class.clone();
    // Elements stay observed; leaving the viewport never hides them again.
    let observer = page.observe_intersections(options, move |page, entries, _| {
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            page.dom.class_add(entry.target, &visible_class)?;
        }
        Ok(())
    });
    for node in targets {
        page.observe(observer, node)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_classes_cycle_through_the_stagger() {
        let classes = (0..6)
            .map(|index| delay_class("btm-delay-", index, 4))
            .collect::<Vec<_>>();
        assert_eq!(
            classes,
            [
                "btm-delay-1",
                "btm-delay-2",
                "btm-delay-3",
                "btm-delay-4",
                "btm-delay-1",
                "btm-delay-2"
            ]
        );
    }

    #[test]
    fn stagger_follows_document_order_across_selector_group() -> Result<()> {
        let mut page = Page::from_html(
            r#"<div class="btm-section-header" id="h"></div>
               <div class="btm-glass-card" id="a"></div>
               <div class="btm-stat-card" id="b"></div>"#,
        )?;
        assert!(install(&mut page, &RevealConfig::default())?);
        page.assert_class("#h", "btm-delay-1", true)?;
        page.assert_class("#a", "btm-delay-2", true)?;
        page.assert_class("#b", "btm-delay-3", true)?;
        page.assert_class("#b", "btm-fade-in-up", true)?;
        Ok(())
    }

    #[test]
    fn revealed_elements_stay_visible() -> Result<()> {
        let mut page =
            Page::from_html_with_viewport(r#"<div class="btm-glass-card"></div>"#, 1000.0, 800.0)?;
        page.set_rect(".btm-glass-card", Rect::new(0.0, 1200.0, 400.0, 300.0))?;
        install(&mut page, &RevealConfig::default())?;
        page.scroll_to(0.0)?;
        page.assert_class(".btm-glass-card", "btm-visible", false)?;

        // 40px inside the shrunken root: 13% of the card.
        page.scroll_to(490.0)?;
        page.assert_class(".btm-glass-card", "btm-visible", true)?;

        page.scroll_to(0.0)?;
        page.assert_class(".btm-glass-card", "btm-visible", true)?;
        Ok(())
    }

    #[test]
    fn bottom_margin_delays_the_reveal() -> Result<()> {
        let mut page =
            Page::from_html_with_viewport(r#"<div class="btm-glass-card"></div>"#, 1000.0, 800.0)?;
        page.set_rect(".btm-glass-card", Rect::new(0.0, 1200.0, 400.0, 100.0))?;
        install(&mut page, &RevealConfig::default())?;
        // Card top is 30px above the viewport bottom but still under the margin.
        page.scroll_to(430.0)?;
        page.assert_class(".btm-glass-card", "btm-visible", false)?;
        page.scroll_to(470.0)?;
        page.assert_class(".btm-glass-card", "btm-visible", true)?;
        Ok(())
    }

    #[test]
    fn no_matches_is_a_no_op() -> Result<()> {
        let mut page = Page::from_html("<p>plain</p>")?;
        assert!(!install(&mut page, &RevealConfig::default())?);
        Ok(())
    }
}
