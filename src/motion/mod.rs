//! The landing page behaviors. Each submodule wires one effect onto a
//! [`Page`]; [`install`] runs all of them the way the page-load handler does.

use super::*;

pub mod anchors;
pub mod carousel;
pub mod counter;
pub mod hover;
pub mod parallax;
pub mod reduced_motion;
pub mod reveal;
pub mod steps;
pub mod typewriter;
pub mod video;

/// Which behaviors found their markup during [`install`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstallReport {
    pub reveal: bool,
    pub typewriter: bool,
    pub counter: bool,
    pub carousel: bool,
    pub anchors: bool,
    pub hover: bool,
    pub parallax: bool,
    pub steps: bool,
    pub video: bool,
    pub reduced_motion: bool,
}

impl InstallReport {
    pub fn active_count(&self) -> usize {
        [
            self.reveal,
            self.typewriter,
            self.counter,
            self.carousel,
            self.anchors,
            self.hover,
            self.parallax,
            self.steps,
            self.video,
            self.reduced_motion,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

/// Installs every behavior, logs the init line and delivers the first
/// round of intersection entries. Missing markup is never an error.
pub fn install(page: &mut Page, config: &MotionConfig) -> Result<InstallReport> {
    config.validate()?;

    let report = InstallReport {
        reveal: reveal::install(page, &config.reveal)?,
        typewriter: typewriter::install(page, &config.typewriter)?,
        counter: counter::install(page, &config.counter)?,
        carousel: carousel::install(page, &config.carousel)?,
        anchors: anchors::install(page, &config.anchors)?,
        hover: hover::install(page, &config.hover)?,
        parallax: parallax::install(page, &config.parallax)?,
        steps: steps::install(page, &config.steps)?,
        video: video::install(page, &config.video)?,
        reduced_motion: reduced_motion::install(
            page,
            &config.reduced_motion,
            &config.reveal,
            &config.typewriter,
        )?,
    };
    log::debug!(
        "landing behaviors installed: {} of 10 active",
        report.active_count()
    );

    page.console_log(&config.init_message);
    page.update_intersections()?;
    Ok(report)
}
