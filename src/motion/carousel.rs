use super::*;

/// Marks dot `index` active and clears every other dot.
pub(crate) fn set_active_dot(
    page: &mut Page,
    dots: &[NodeId],
    index: usize,
    active_class: &str,
) -> Result<()> {
    for (position, dot) in dots.iter().enumerate() {
        page.dom.class_toggle_force(*dot, active_class, position == index)?;
    }
    Ok(())
}

/// Keeps the stats strip's dots in sync with the card scrolled into the
/// strip, and lets a dot tap scroll its card to the center.
pub fn install(page: &mut Page, config: &CarouselConfig) -> Result<bool> {
    let Some(container) = page.dom.query_selector(&config.container_selector)? else {
        return Ok(false);
    };
    let cards = Rc::<[NodeId]>::from(page.select_all(&config.card_selector)?);
    let dots = Rc::<[NodeId]>::from(page.select_all(&config.dot_selector)?);
    if cards.is_empty() || dots.is_empty() {
        return Ok(false);
    }

    let options = ObserverOptions {
        root: ObserverRoot::Element(container),
        threshold: config.threshold,
        ..ObserverOptions::default()
    };
    let active_class = config.active_dot_class.clone();
    let observed_cards = Rc::clone(&cards);
    let synced_dots = Rc::clone(&dots);
    let observer = page.observe_intersections(options, move |page, entries, _| {
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            if let Some(index) = observed_cards.iter().position(|card| *card == entry.target) {
                set_active_dot(page, &synced_dots, index, &active_class)?;
            }
        }
        Ok(())
    });
    for card in cards.iter() {
        page.observe(observer, *card)?;
    }

    for (index, dot) in dots.iter().enumerate() {
        let Some(card) = cards.get(index).copied() else {
            continue;
        };
        page.add_event_listener(EventTarget::Node(*dot), "click", move |page, _| {
            page.scroll_into_view(
                card,
                ScrollIntoViewOptions {
                    behavior: ScrollBehavior::Smooth,
                    block: ScrollAlignment::Nearest,
                    inline: ScrollAlignment::Center,
                },
            )
        });
    }
    Ok(true)
}
