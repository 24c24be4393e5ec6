use std::rc::Rc;

use crate::page::{Page, Rect};

const ACTIVE_CLASS: &str = "active";
const ANIMATED_ATTRIBUTE: &str = "data-animated";
const TARGET_WIDTH_ATTRIBUTE: &str = "data-width";

#[derive(Clone, Debug, PartialEq)]
pub struct ParallaxLayer {
    pub selector: &'static str,
    pub translate_per_px: f64,
    pub rotate_per_px: f64,
}

impl ParallaxLayer {
    /// Same scroll offset, same transform.
    pub fn transform(&self, scroll_y: f64) -> String {
        format!(
            "translateY({}px) rotate({}deg)",
            scroll_y * self.translate_per_px,
            scroll_y * self.rotate_per_px
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SyncConfig {
    pub header_selector: &'static str,
    pub header_scrolled_class: &'static str,
    pub header_threshold: f64,
    pub section_selector: &'static str,
    pub nav_link_selector: &'static str,
    pub section_threshold: f64,
    pub back_to_top_selector: &'static str,
    pub back_to_top_threshold: f64,
    pub skill_bar_selector: &'static str,
    pub skill_band: f64,
    pub parallax_layers: Vec<ParallaxLayer>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            header_selector: ".site-header",
            header_scrolled_class: "scrolled",
            header_threshold: 100.0,
            section_selector: "section[id]",
            nav_link_selector: ".nav-link",
            section_threshold: 150.0,
            back_to_top_selector: "#backToTop",
            back_to_top_threshold: 300.0,
            skill_bar_selector: ".skill-progress",
            skill_band: 0.8,
            parallax_layers: vec![
                ParallaxLayer {
                    selector: ".float-1",
                    translate_per_px: 0.05,
                    rotate_per_px: 0.01,
                },
                ParallaxLayer {
                    selector: ".float-2",
                    translate_per_px: 0.03,
                    rotate_per_px: 0.02,
                },
                ParallaxLayer {
                    selector: ".float-3",
                    translate_per_px: 0.07,
                    rotate_per_px: 0.015,
                },
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionAnchor {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// Equal offsets resolve to the later anchor.
pub fn compute_active_section(anchors: &[SectionAnchor], scroll_y: f64, threshold: f64) -> Option<&str> {
    anchors
        .iter()
        .filter(|anchor| anchor.top - threshold <= scroll_y)
        .last()
        .map(|anchor| anchor.id.as_str())
}

pub fn in_inclusion_band(rect: Rect, viewport_height: f64, band: f64) -> bool {
    rect.top <= viewport_height * band && rect.bottom >= 0.0
}

/// One-shot width transition for a skill bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkillBar {
    pub target_percentage: f64,
    pub current_rendered_width: f64,
    animated: bool,
}

impl SkillBar {
    pub fn new(target_percentage: f64) -> Self {
        Self {
            target_percentage,
            current_rendered_width: 0.0,
            animated: false,
        }
    }

    pub fn already_animated(target_percentage: f64) -> Self {
        Self {
            target_percentage,
            current_rendered_width: target_percentage,
            animated: true,
        }
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// Returns true only on the call that starts the transition.
    pub fn step(&mut self, in_band: bool) -> bool {
        if self.animated || !in_band {
            return false;
        }

        self.current_rendered_width = self.target_percentage;
        self.animated = true;
        true
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub header_scrolled: bool,
    pub active_section: Option<String>,
    pub bars_revealed: usize,
}

pub struct ScrollSync<P: Page> {
    page: Rc<P>,
    config: SyncConfig,
}

impl<P: Page> ScrollSync<P> {
    pub fn new(page: Rc<P>, config: SyncConfig) -> Self {
        Self { page, config }
    }

    pub fn on_scroll_tick(&self) -> TickReport {
        let scroll_y = self.page.scroll_y();

        let header_scrolled = scroll_y > self.config.header_threshold;
        if let Some(header) = self.page.find(self.config.header_selector) {
            self.page
                .set_class(&header, self.config.header_scrolled_class, header_scrolled);
        }

        if let Some(back_to_top) = self.page.find(self.config.back_to_top_selector) {
            self.page.set_class(
                &back_to_top,
                ACTIVE_CLASS,
                scroll_y > self.config.back_to_top_threshold,
            );
        }

        let active_section = self.highlight_nav(scroll_y);
        let bars_revealed = self.animate_skill_bars();
        self.apply_parallax(scroll_y);

        TickReport {
            header_scrolled,
            active_section,
            bars_revealed,
        }
    }

    pub fn on_resize(&self) -> TickReport {
        let viewport = self.page.viewport();
        if let Some(root) = self.page.root() {
            self.page
                .set_style(&root, "--vh", &format!("{}px", viewport.height * 0.01));
        }

        self.on_scroll_tick()
    }

    pub fn section_anchors(&self) -> Vec<SectionAnchor> {
        self.page
            .find_all(self.config.section_selector)
            .into_iter()
            .filter_map(|section| {
                let id = self.page.attribute(&section, "id")?;
                Some(SectionAnchor {
                    id,
                    top: self.page.offset_top(&section),
                    height: self.page.offset_height(&section),
                })
            })
            .collect()
    }

    fn highlight_nav(&self, scroll_y: f64) -> Option<String> {
        let anchors = self.section_anchors();
        let current = compute_active_section(&anchors, scroll_y, self.config.section_threshold)
            .map(ToString::to_string);
        let wanted_href = current.as_deref().map(|id| format!("#{id}"));

        for link in self.page.find_all(self.config.nav_link_selector) {
            let is_current = wanted_href.is_some()
                && self.page.attribute(&link, "href").as_deref() == wanted_href.as_deref();
            self.page.set_class(&link, ACTIVE_CLASS, is_current);
        }

        current
    }

    /// Reveals every bar that entered the inclusion band for the first time.
    pub fn animate_skill_bars(&self) -> usize {
        let viewport_height = self.page.viewport().height;
        let mut revealed = 0;

        for node in self.page.find_all(self.config.skill_bar_selector) {
            let Some(target) = self
                .page
                .attribute(&node, TARGET_WIDTH_ATTRIBUTE)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite())
            else {
                continue;
            };

            let mut bar = if self.page.attribute(&node, ANIMATED_ATTRIBUTE).is_some() {
                SkillBar::already_animated(target)
            } else {
                SkillBar::new(target)
            };

            let in_band = in_inclusion_band(
                self.page.bounding_rect(&node),
                viewport_height,
                self.config.skill_band,
            );

            if bar.step(in_band) {
                self.page.set_style(
                    &node,
                    "width",
                    &format!("{}%", bar.current_rendered_width),
                );
                self.page.set_attribute(&node, ANIMATED_ATTRIBUTE, "true");
                revealed += 1;
            }
        }

        revealed
    }

    pub fn apply_parallax(&self, scroll_y: f64) {
        for layer in &self.config.parallax_layers {
            if let Some(node) = self.page.find(layer.selector) {
                self.page
                    .set_style(&node, "transform", &layer.transform(scroll_y));
            }
        }
    }
}
