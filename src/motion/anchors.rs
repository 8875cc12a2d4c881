use super::*;

/// Turns same-page links into smooth scrolls. A bare `#` is left to the
/// browser default, as are fragments that name no element.
pub fn install(page: &mut Page, config: &AnchorConfig) -> Result<bool> {
    let anchors = page.select_all(&config.selector)?;
    if anchors.is_empty() {
        return Ok(false);
    }

    for anchor in anchors {
        page.add_event_listener(EventTarget::Node(anchor), "click", move |page, event| {
            let Some(href) = page.dom.attr(anchor, "href") else {
                return Ok(());
            };
            let Some(fragment) = href.strip_prefix('#').filter(|id| !id.is_empty()) else {
                return Ok(());
            };
            let Some(destination) = page.dom.by_id(fragment) else {
                return Ok(());
            };
            event.prevent_default();
            page.scroll_into_view(
                destination,
                ScrollIntoViewOptions {
                    behavior: ScrollBehavior::Smooth,
                    block: ScrollAlignment::Start,
                    ..ScrollIntoViewOptions::default()
                },
            )
        });
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAV: &str = r##"
        <nav>
          <a id="to-donate" href="#donate">Donate</a>
          <a id="to-top" href="#">Top</a>
          <a id="to-nowhere" href="#missing">Lost</a>
          <a id="external" href="https://example.org/#donate">Elsewhere</a>
        </nav>
        <section id="donate"></section>"##;

    fn nav_page() -> Result<Page> {
        let mut page = Page::from_html(NAV)?;
        page.set_rect("#donate", Rect::new(0.0, 2400.0, 1280.0, 600.0))?;
        install(&mut page, &AnchorConfig::default())?;
        Ok(page)
    }

    #[test]
    fn fragment_links_scroll_smoothly_to_the_target_top() -> Result<()> {
        let mut page = nav_page()?;
        page.click("#to-donate")?;
        let requests = page.take_scroll_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].target, page.select_one("#donate")?);
        assert_eq!(requests[0].options.behavior, ScrollBehavior::Smooth);
        assert_eq!(requests[0].options.block, ScrollAlignment::Start);
        assert_eq!(page.viewport().scroll_y, 2400.0);
        // Default navigation was suppressed.
        assert_eq!(page.location_hash(), "");
        Ok(())
    }

    #[test]
    fn bare_hash_is_not_intercepted() -> Result<()> {
        let mut page = nav_page()?;
        page.scroll_to(500.0)?;
        page.click("#to-top")?;
        assert!(page.take_scroll_requests().is_empty());
        assert_eq!(page.location_hash(), "#");
        Ok(())
    }

    #[test]
    fn unknown_fragment_falls_through_to_default() -> Result<()> {
        let mut page = nav_page()?;
        page.click("#to-nowhere")?;
        assert!(page.take_scroll_requests().is_empty());
        assert_eq!(page.location_hash(), "#missing");
        assert_eq!(page.viewport().scroll_y, 0.0);
        Ok(())
    }

    #[test]
    fn only_same_page_links_get_listeners() -> Result<()> {
        let page = nav_page()?;
        let external = page.select_one("#external")?;
        assert_eq!(page.listener_count(EventTarget::Node(external), "click"), 0);
        let donate = page.select_one("#to-donate")?;
        assert_eq!(page.listener_count(EventTarget::Node(donate), "click"), 1);
        Ok(())
    }
}
