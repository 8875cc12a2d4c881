use landing_motion::motion;
use landing_motion::{MotionConfig, Page, Rect, RevealConfig, TypewriterConfig};

#[test]
fn json_ld_and_inline_styles_do_not_produce_reveal_targets() -> landing_motion::Result<()> {
    let html = r#"
    <head>
      <style>.btm-glass-card > p { color: #fff; } /* <div class="btm-stat-card"> */</style>
      <script type="application/ld+json">
        {"@context":"https://schema.org","description":"<div class='btm-glass-card'>"}
      </script>
    </head>
    <body>
      <div class="btm-glass-card" id="only"><p>Reserve</p></div>
    </body>
    "#;

    let mut page = Page::from_html(html)?;
    motion::reveal::install(&mut page, &RevealConfig::default())?;
    let tagged = page.select_all(".btm-fade-in-up")?;
    assert_eq!(tagged, vec![page.select_one("#only")?]);
    Ok(())
}

#[test]
fn typewriter_types_decoded_entities_as_single_characters() -> landing_motion::Result<()> {
    let html = r#"<h1 class="btm-typewriter">Save&nbsp;the Macaw &amp; its Home&#x2014;Now</h1>"#;

    let mut page = Page::from_html(html)?;
    motion::typewriter::install(&mut page, &TypewriterConfig::default())?;
    // 500 ms start delay plus five more 80 ms steps.
    page.advance_time(900)?;
    page.assert_text(".btm-typewriter", "Save\u{a0}t")?;
    page.flush()?;
    page.assert_text(".btm-typewriter", "Save\u{a0}the Macaw & its Home\u{2014}Now")?;
    Ok(())
}

#[test]
fn uppercase_markup_and_unquoted_attributes_still_wire_behaviors() -> landing_motion::Result<()> {
    let html = r##"
    <SECTION>
      <DIV CLASS=btm-stats-grid>
        <DIV CLASS="btm-stat-card"><P CLASS="btm-stat-number">12</P></DIV>
      </DIV>
      <BUTTON CLASS='btm-stats-dot'></BUTTON>
      <A CLASS="btm-cta-button" HREF="#give">Give</A>
      <DIV ID="give"></DIV>
    </SECTION>
    "##;

    let mut page = Page::from_html(html)?;
    page.set_rect(".btm-stats-grid", Rect::new(0.0, 100.0, 300.0, 200.0))?;
    page.set_rect(".btm-stat-card", Rect::new(0.0, 100.0, 300.0, 200.0))?;
    page.set_rect(".btm-stat-number", Rect::new(10.0, 150.0, 100.0, 40.0))?;
    page.set_rect("#give", Rect::new(0.0, 1500.0, 300.0, 200.0))?;
    let report = motion::install(&mut page, &MotionConfig::default())?;
    assert!(report.carousel && report.counter && report.anchors && report.hover);

    page.assert_class(".btm-stats-dot", "btm-stats-dot--active", true)?;
    page.flush()?;
    page.assert_text(".btm-stat-number", "12")?;
    page.click(".btm-cta-button")?;
    assert_eq!(page.viewport().scroll_y, 1500.0);
    Ok(())
}

#[test]
fn comments_around_markup_are_skipped() -> landing_motion::Result<()> {
    let html = r#"
    <!DOCTYPE html>
    <!-- <iframe class="btm-video-iframe" src="https://video.example/a?autoplay=0"></iframe> -->
    <iframe class="btm-video-iframe" src="https://video.example/b?autoplay=0"></iframe>
    "#;

    let mut page = Page::from_html(html)?;
    page.set_rect(".btm-video-iframe", Rect::new(0.0, 0.0, 640.0, 360.0))?;
    motion::install(&mut page, &MotionConfig::default())?;
    assert_eq!(page.select_all(".btm-video-iframe")?.len(), 1);
    page.assert_attr(
        ".btm-video-iframe",
        "src",
        Some("https://video.example/b?autoplay=1"),
    )?;
    Ok(())
}
