//! Auto-playing carousel state shared by the hero, featured, most-liked and
//! related-product sliders.
//!
//! The type is a plain state machine: the host feeds it timer ticks and
//! pointer/touch events and reads back the slide index, the scroll offset
//! and the progress-bar key. Time never advances inside it.

use std::time::Duration;

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    /// Past either end continues on the other side.
    Wrap,
    /// Stops at the first and last slide.
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct CarouselConfig {
    #[serde(serialize_with = "as_millis")]
    #[schema(value_type = u64)]
    pub period: Duration,
    #[serde(serialize_with = "as_millis")]
    #[schema(value_type = u64)]
    pub transition: Duration,
    pub gap_px: f64,
    pub swipe_threshold_px: f64,
    pub navigation: Navigation,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

impl CarouselConfig {
    pub fn hero() -> Self {
        Self {
            period: Duration::from_millis(4500),
            transition: Duration::from_millis(600),
            gap_px: 0.0,
            swipe_threshold_px: 40.0,
            navigation: Navigation::Clamp,
        }
    }

    pub fn featured() -> Self {
        Self {
            period: Duration::from_millis(5500),
            transition: Duration::from_millis(450),
            gap_px: 16.0,
            swipe_threshold_px: 40.0,
            navigation: Navigation::Wrap,
        }
    }

    pub fn most_liked() -> Self {
        Self {
            period: Duration::from_millis(3500),
            transition: Duration::from_millis(450),
            gap_px: 16.0,
            swipe_threshold_px: 40.0,
            navigation: Navigation::Wrap,
        }
    }

    pub fn related() -> Self {
        Self {
            period: Duration::from_millis(5000),
            transition: Duration::from_millis(450),
            gap_px: 16.0,
            swipe_threshold_px: 40.0,
            navigation: Navigation::Wrap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Touch {
    start_x: f64,
    last_x: f64,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    config: CarouselConfig,
    len: usize,
    index: usize,
    slide_width: f64,
    hovering: bool,
    touch: Option<Touch>,
    timer_armed: bool,
    progress_key: u64,
    reduced_motion: bool,
}

impl Carousel {
    /// `len` is fixed for the lifetime of the carousel.
    pub fn new(len: usize, config: CarouselConfig) -> Self {
        let mut carousel = Self {
            config,
            len,
            index: 0,
            slide_width: 0.0,
            hovering: false,
            touch: None,
            timer_armed: false,
            progress_key: 0,
            reduced_motion: false,
        };
        carousel.restart_timer();
        carousel
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Arrows and dots are only shown with more than one slide.
    pub fn controls_enabled(&self) -> bool {
        self.len > 1
    }

    pub fn autoplay_enabled(&self) -> bool {
        self.len > 1 && self.slide_width > 0.0 && !self.reduced_motion
    }

    pub fn timer_armed(&self) -> bool {
        self.timer_armed
    }

    pub fn is_paused(&self) -> bool {
        self.hovering || self.touch.is_some()
    }

    /// Changes every time the timer restarts so the progress bar animates from zero again.
    pub fn progress_key(&self) -> u64 {
        self.progress_key
    }

    pub fn slide_width(&self) -> f64 {
        self.slide_width
    }

    /// Horizontal translation of the track, in pixels.
    pub fn offset_px(&self) -> f64 {
        self.index as f64 * self.slide_width
    }

    pub fn transition_duration(&self) -> Duration {
        if self.reduced_motion {
            Duration::ZERO
        } else {
            self.config.transition
        }
    }

    pub fn progress_duration(&self) -> Duration {
        if self.reduced_motion {
            Duration::ZERO
        } else {
            self.config.period
        }
    }

    /// Timer callback. Returns true when the slide advanced.
    pub fn tick(&mut self) -> bool {
        if !self.timer_armed || self.is_paused() || !self.controls_enabled() {
            return false;
        }
        self.index = (self.index + 1) % self.len;
        true
    }

    pub fn pointer_enter(&mut self) {
        self.hovering = true;
    }

    pub fn pointer_leave(&mut self) {
        self.hovering = false;
    }

    pub fn touch_start(&mut self, x: f64) {
        if self.is_empty() {
            return;
        }
        self.touch = Some(Touch {
            start_x: x,
            last_x: x,
        });
        self.timer_armed = false;
    }

    pub fn touch_move(&mut self, x: f64) {
        if let Some(touch) = self.touch.as_mut() {
            touch.last_x = x;
        }
    }

    pub fn touch_end(&mut self) {
        let Some(touch) = self.touch.take() else {
            return;
        };
        let dx = touch.last_x - touch.start_x;
        if dx.abs() > self.config.swipe_threshold_px {
            if dx < 0.0 {
                self.step_forward();
            } else {
                self.step_back();
            }
        }
        self.restart_timer();
    }

    pub fn next(&mut self) {
        self.step_forward();
        self.restart_timer();
    }

    pub fn prev(&mut self) {
        self.step_back();
        self.restart_timer();
    }

    pub fn goto(&mut self, index: usize) {
        if self.is_empty() {
            return;
        }
        self.index = index.min(self.len - 1);
        self.restart_timer();
    }

    /// Re-measure after a viewport change; `width` excludes the gap.
    pub fn resize(&mut self, width: f64) {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self.slide_width = if width > 0.0 {
            (width + self.config.gap_px).round()
        } else {
            0.0
        };
        self.restart_timer();
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
        self.restart_timer();
    }

    fn step_forward(&mut self) {
        if !self.controls_enabled() {
            return;
        }
        self.index = match self.config.navigation {
            Navigation::Wrap => (self.index + 1) % self.len,
            Navigation::Clamp => (self.index + 1).min(self.len - 1),
        };
    }

    fn step_back(&mut self) {
        if !self.controls_enabled() {
            return;
        }
        self.index = match self.config.navigation {
            Navigation::Wrap => (self.index + self.len - 1) % self.len,
            Navigation::Clamp => self.index.saturating_sub(1),
        };
    }

    fn restart_timer(&mut self) {
        self.timer_armed = self.autoplay_enabled();
        if self.timer_armed {
            self.progress_key += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(len: usize, config: CarouselConfig) -> Carousel {
        let mut carousel = Carousel::new(len, config);
        carousel.resize(300.0);
        carousel
    }

    #[test]
    fn next_wraps_back_to_start() {
        let mut carousel = measured(5, CarouselConfig::most_liked());
        for _ in 0..5 {
            carousel.next();
        }
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn prev_from_start_goes_to_last() {
        let mut carousel = measured(5, CarouselConfig::featured());
        carousel.prev();
        assert_eq!(carousel.index(), 4);
    }

    #[test]
    fn hero_arrows_clamp() {
        let mut carousel = measured(3, CarouselConfig::hero());
        carousel.prev();
        assert_eq!(carousel.index(), 0);
        carousel.goto(2);
        carousel.next();
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn tick_advances_and_wraps() {
        let mut carousel = measured(2, CarouselConfig::most_liked());
        assert!(carousel.tick());
        assert_eq!(carousel.index(), 1);
        assert!(carousel.tick());
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn hovering_suspends_ticks() {
        let mut carousel = measured(3, CarouselConfig::most_liked());
        carousel.pointer_enter();
        assert!(!carousel.tick());
        assert_eq!(carousel.index(), 0);
        carousel.pointer_leave();
        assert!(carousel.tick());
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn short_drag_does_not_move() {
        let mut carousel = measured(3, CarouselConfig::most_liked());
        carousel.touch_start(200.0);
        carousel.touch_move(180.0);
        carousel.touch_end();
        assert_eq!(carousel.index(), 0);
        assert!(carousel.timer_armed());
    }

    #[test]
    fn swipes_move_one_slide_in_drag_direction() {
        let mut carousel = measured(3, CarouselConfig::most_liked());
        carousel.touch_start(200.0);
        assert!(!carousel.timer_armed());
        assert!(!carousel.tick());
        carousel.touch_move(100.0);
        carousel.touch_end();
        assert_eq!(carousel.index(), 1);

        carousel.touch_start(100.0);
        carousel.touch_move(190.0);
        carousel.touch_end();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn manual_navigation_restarts_progress() {
        let mut carousel = measured(4, CarouselConfig::featured());
        let before = carousel.progress_key();
        carousel.goto(3);
        assert_eq!(carousel.index(), 3);
        assert!(carousel.progress_key() > before);
    }

    #[test]
    fn goto_clamps_out_of_range_index() {
        let mut carousel = measured(4, CarouselConfig::featured());
        carousel.goto(40);
        assert_eq!(carousel.index(), 3);
    }

    #[test]
    fn offset_follows_measured_width() {
        let mut carousel = measured(4, CarouselConfig::most_liked());
        carousel.next();
        carousel.next();
        assert_eq!(carousel.slide_width(), 316.0);
        assert_eq!(carousel.offset_px(), 632.0);
        carousel.resize(200.0);
        assert_eq!(carousel.offset_px(), 432.0);
    }

    #[test]
    fn reduced_motion_disables_autoplay() {
        let mut carousel = measured(4, CarouselConfig::most_liked());
        carousel.set_reduced_motion(true);
        assert!(!carousel.timer_armed());
        assert!(!carousel.tick());
        assert_eq!(carousel.transition_duration(), Duration::ZERO);
        carousel.next();
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn unmeasured_carousel_does_not_autoplay() {
        let mut carousel = Carousel::new(4, CarouselConfig::most_liked());
        assert!(!carousel.tick());
    }

    #[test]
    fn single_and_empty_carousels_are_inert() {
        let mut single = measured(1, CarouselConfig::hero());
        assert!(!single.controls_enabled());
        single.next();
        single.prev();
        assert!(!single.tick());
        assert_eq!(single.index(), 0);

        let mut empty = measured(0, CarouselConfig::hero());
        assert!(empty.is_empty());
        empty.next();
        empty.goto(3);
        empty.touch_start(10.0);
        empty.touch_end();
        assert_eq!(empty.index(), 0);
    }
}
