use super::*;

/// Scroll-triggered fade-in of content blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealConfig {
    /// Selector group; matches are tagged in document order.
    pub selector: String,
    pub base_class: String,
    /// Stagger classes are `{delay_class_prefix}{n}` with `n` in `1..=stagger`.
    pub delay_class_prefix: String,
    pub stagger: usize,
    pub visible_class: String,
    pub root_margin: String,
    pub threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: [
                ".btm-glass-card",
                ".btm-stat-card",
                ".btm-donation-card",
                ".btm-support-image-container",
                ".btm-action-image-container",
                ".btm-section-header",
                ".btm-video-wrapper",
                ".btm-connect-link",
            ]
            .join(", "),
            base_class: "btm-fade-in-up".into(),
            delay_class_prefix: "btm-delay-".into(),
            stagger: 4,
            visible_class: "btm-visible".into(),
            root_margin: "0px 0px -50px 0px".into(),
            threshold: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypewriterConfig {
    pub selector: String,
    pub text_attribute: String,
    pub start_delay_ms: i64,
    pub char_interval_ms: i64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            selector: ".btm-typewriter".into(),
            text_attribute: "data-text".into(),
            start_delay_ms: 500,
            char_interval_ms: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CounterConfig {
    pub selector: String,
    pub duration_ms: u64,
    pub frames_per_second: u64,
    pub threshold: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            selector: ".btm-stat-number".into(),
            duration_ms: 2000,
            frames_per_second: 60,
            threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    pub container_selector: String,
    pub card_selector: String,
    pub dot_selector: String,
    pub active_dot_class: String,
    pub threshold: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            container_selector: ".btm-stats-grid".into(),
            card_selector: ".btm-stat-card".into(),
            dot_selector: ".btm-stats-dot".into(),
            active_dot_class: "btm-stats-dot--active".into(),
            threshold: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnchorConfig {
    pub selector: String,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            selector: r##"a[href^="#"]"##.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoverConfig {
    pub selector: String,
    pub transform: String,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            selector: ".btm-cta-button".into(),
            transform: "translateY(-3px) scale(1.02)".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxConfig {
    pub selector: String,
    pub speed: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            selector: ".btm-hero-bg-image".into(),
            speed: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepsConfig {
    pub selector: String,
    pub active_class: String,
    pub completed_class: String,
    pub threshold: f64,
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            selector: ".btm-donation-step".into(),
            active_class: "btm-donation-step--active".into(),
            completed_class: "btm-donation-step--completed".into(),
            threshold: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoConfig {
    pub selector: String,
    pub threshold: f64,
    pub paused_marker: String,
    pub playing_marker: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            selector: ".btm-video-iframe".into(),
            threshold: 0.3,
            paused_marker: "autoplay=0".into(),
            playing_marker: "autoplay=1".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReducedMotionConfig {
    pub media_query: String,
}

impl Default for ReducedMotionConfig {
    fn default() -> Self {
        Self {
            media_query: "(prefers-reduced-motion: reduce)".into(),
        }
    }
}

/// Everything the landing page behaviors read: selectors, class names,
/// timings and observer thresholds. `Default` matches the shipped markup.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionConfig {
    pub reveal: RevealConfig,
    pub typewriter: TypewriterConfig,
    pub counter: CounterConfig,
    pub carousel: CarouselConfig,
    pub anchors: AnchorConfig,
    pub hover: HoverConfig,
    pub parallax: ParallaxConfig,
    pub steps: StepsConfig,
    pub video: VideoConfig,
    pub reduced_motion: ReducedMotionConfig,
    pub init_message: String,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reveal: RevealConfig::default(),
            typewriter: TypewriterConfig::default(),
            counter: CounterConfig::default(),
            carousel: CarouselConfig::default(),
            anchors: AnchorConfig::default(),
            hover: HoverConfig::default(),
            parallax: ParallaxConfig::default(),
            steps: StepsConfig::default(),
            video: VideoConfig::default(),
            reduced_motion: ReducedMotionConfig::default(),
            init_message: "[BTM] Landing page initialized successfully".into(),
        }
    }
}

impl MotionConfig {
    pub fn with_reveal(mut self, reveal: RevealConfig) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn with_typewriter(mut self, typewriter: TypewriterConfig) -> Self {
        self.typewriter = typewriter;
        self
    }

    pub fn with_counter(mut self, counter: CounterConfig) -> Self {
        self.counter = counter;
        self
    }

    pub fn with_carousel(mut self, carousel: CarouselConfig) -> Self {
        self.carousel = carousel;
        self
    }

    pub fn with_anchors(mut self, anchors: AnchorConfig) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn with_hover(mut self, hover: HoverConfig) -> Self {
        self.hover = hover;
        self
    }

    pub fn with_parallax(mut self, parallax: ParallaxConfig) -> Self {
        self.parallax = parallax;
        self
    }

    pub fn with_steps(mut self, steps: StepsConfig) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_video(mut self, video: VideoConfig) -> Self {
        self.video = video;
        self
    }

    pub fn with_reduced_motion(mut self, reduced_motion: ReducedMotionConfig) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }

    pub fn with_init_message(mut self, message: impl Into<String>) -> Self {
        self.init_message = message.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, selector) in [
            ("reveal.selector", &self.reveal.selector),
            ("typewriter.selector", &self.typewriter.selector),
            ("counter.selector", &self.counter.selector),
            ("carousel.container_selector", &self.carousel.container_selector),
            ("carousel.card_selector", &self.carousel.card_selector),
            ("carousel.dot_selector", &self.carousel.dot_selector),
            ("anchors.selector", &self.anchors.selector),
            ("hover.selector", &self.hover.selector),
            ("parallax.selector", &self.parallax.selector),
            ("steps.selector", &self.steps.selector),
            ("video.selector", &self.video.selector),
        ] {
            parse_selector_groups(selector)
                .map_err(|err| Error::InvalidConfig(format!("{name}: {err}")))?;
        }

        for (name, class_name) in [
            ("reveal.base_class", &self.reveal.base_class),
            ("reveal.delay_class_prefix", &self.reveal.delay_class_prefix),
            ("reveal.visible_class", &self.reveal.visible_class),
            ("carousel.active_dot_class", &self.carousel.active_dot_class),
            ("steps.active_class", &self.steps.active_class),
            ("steps.completed_class", &self.steps.completed_class),
        ] {
            if class_name.is_empty() || class_name.chars().any(char::is_whitespace) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a single class token, got {class_name:?}"
                )));
            }
        }

        for (name, threshold) in [
            ("reveal.threshold", self.reveal.threshold),
            ("counter.threshold", self.counter.threshold),
            ("carousel.threshold", self.carousel.threshold),
            ("steps.threshold", self.steps.threshold),
            ("video.threshold", self.video.threshold),
        ] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {threshold}"
                )));
            }
        }

        RootMargin::parse(&self.reveal.root_margin)
            .map_err(|err| Error::InvalidConfig(format!("reveal.root_margin: {err}")))?;

        if self.reveal.stagger == 0 {
            return Err(Error::InvalidConfig("reveal.stagger must be at least 1".into()));
        }
        if self.typewriter.start_delay_ms < 0 || self.typewriter.char_interval_ms < 0 {
            return Err(Error::InvalidConfig(
                "typewriter delays must be non-negative".into(),
            ));
        }
        if motion::counter::total_frames(self.counter.duration_ms, self.counter.frames_per_second)
            == 0
        {
            return Err(Error::InvalidConfig(format!(
                "counter animation needs at least one frame (duration_ms={}, frames_per_second={})",
                self.counter.duration_ms, self.counter.frames_per_second
            )));
        }
        if !self.parallax.speed.is_finite() {
            return Err(Error::InvalidConfig("parallax.speed must be finite".into()));
        }
        if self.video.paused_marker.is_empty() {
            return Err(Error::InvalidConfig("video.paused_marker must not be empty".into()));
        }
        Ok(())
    }
}
