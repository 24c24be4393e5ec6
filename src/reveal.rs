use std::rc::Rc;

use crate::page::{Page, VisibilityOptions};
use crate::scheduler::{millis, Scheduler};

pub const CARD_SELECTORS: [&str; 3] = [".product-card", ".feature-card", ".testimonial-card"];
pub const HIGHLIGHT_SELECTOR: &str = ".highlight";
pub const LAZY_IMAGE_SELECTOR: &str = "img[data-src]";
pub const SECTION_NUMBER_SELECTOR: &str = ".section-title .title-number";
const REVEAL_CLASSES: [&str; 2] = ["animate__animated", "animate__fadeInUp"];
const PULSE_CLASSES: [&str; 2] = ["animate__animated", "animate__pulse"];
pub const PULSE_MS: u64 = 1_000;

/// Cards fade in the first time they scroll into view.
pub fn install_card_reveal<P: Page + 'static>(page: &Rc<P>) -> usize {
    let cards: Vec<P::Node> = CARD_SELECTORS
        .iter()
        .flat_map(|selector| page.find_all(selector))
        .collect();
    let count = cards.len();

    let target = page.clone();
    page.observe_visibility(
        cards,
        VisibilityOptions {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px",
        },
        Rc::new(move |card: &P::Node| {
            for class in REVEAL_CLASSES {
                target.set_class(card, class, true);
            }
        }),
    );

    count
}

pub fn install_highlights<P: Page + 'static>(page: &Rc<P>) -> usize {
    let highlights = page.find_all(HIGHLIGHT_SELECTOR);
    let count = highlights.len();

    let target = page.clone();
    page.observe_visibility(
        highlights,
        VisibilityOptions {
            threshold: 0.5,
            ..VisibilityOptions::default()
        },
        Rc::new(move |highlight: &P::Node| target.set_class(highlight, "active", true)),
    );

    count
}

/// Images carrying `data-src` get their real source once visible.
pub fn install_lazy_images<P: Page + 'static>(page: &Rc<P>) -> usize {
    let images = page.find_all(LAZY_IMAGE_SELECTOR);
    let count = images.len();

    let target = page.clone();
    page.observe_visibility(
        images,
        VisibilityOptions::default(),
        Rc::new(move |image: &P::Node| {
            if let Some(source) = target.attribute(image, "data-src") {
                target.set_attribute(image, "src", &source);
                target.remove_attribute(image, "data-src");
            }
        }),
    );

    count
}

pub fn number_section_titles<P: Page>(page: &P) {
    for (index, number) in page.find_all(SECTION_NUMBER_SELECTOR).iter().enumerate() {
        page.set_text(number, &format!("{:02}", index + 1));
    }
}

pub fn mark_touch_device<P: Page>(page: &P, is_touch: bool) {
    if let Some(body) = page.body() {
        page.set_class(&body, "touch-device", is_touch);
    }
}

/// One-second attention pulse on a single element.
pub fn pulse<P: Page + 'static>(page: &Rc<P>, scheduler: &dyn Scheduler, node: &P::Node) {
    for class in PULSE_CLASSES {
        page.set_class(node, class, true);
    }

    let target = page.clone();
    let node = node.clone();
    scheduler.schedule(
        millis(PULSE_MS),
        Box::new(move || {
            for class in PULSE_CLASSES {
                target.set_class(&node, class, false);
            }
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePage, ManualScheduler};

    #[test]
    fn cards_reveal_once() {
        let page = Rc::new(FakePage::new());
        let product = page.add(".product-card");
        let feature = page.add(".feature-card");

        assert_eq!(install_card_reveal(&page), 2);
        assert_eq!(page.observed_count(), 2);

        page.reveal(product);
        assert!(page.has_class(&product, "animate__fadeInUp"));
        assert!(!page.has_class(&feature, "animate__fadeInUp"));
        assert_eq!(page.observed_count(), 1);

        page.set_class(&product, "animate__fadeInUp", false);
        page.reveal(product);
        assert!(!page.has_class(&product, "animate__fadeInUp"));
    }

    #[test]
    fn highlight_becomes_active() {
        let page = Rc::new(FakePage::new());
        let highlight = page.add(".highlight");

        install_highlights(&page);
        page.reveal(highlight);

        assert!(page.has_class(&highlight, "active"));
    }

    #[test]
    fn lazy_image_swaps_source() {
        let page = Rc::new(FakePage::new());
        let image = page.add("img[data-src]");
        page.set_attribute(&image, "data-src", "/img/hero.webp");

        install_lazy_images(&page);
        assert_eq!(page.attribute(&image, "src"), None);

        page.reveal(image);
        assert_eq!(page.attribute(&image, "src").as_deref(), Some("/img/hero.webp"));
        assert_eq!(page.attribute(&image, "data-src"), None);
    }

    #[test]
    fn nothing_to_observe_is_fine() {
        let page = Rc::new(FakePage::new());

        assert_eq!(install_card_reveal(&page), 0);
        assert_eq!(install_lazy_images(&page), 0);
    }

    #[test]
    fn section_numbers_are_zero_padded() {
        let page = FakePage::new();
        let numbers: Vec<usize> = (0..3).map(|_| page.add(SECTION_NUMBER_SELECTOR)).collect();

        number_section_titles(&page);

        assert_eq!(page.text(numbers[0]), "01");
        assert_eq!(page.text(numbers[2]), "03");
    }

    #[test]
    fn touch_devices_are_flagged_on_body() {
        let page = FakePage::new();
        let body = page.add("body");

        mark_touch_device(&page, true);
        assert!(page.has_class(&body, "touch-device"));

        mark_touch_device(&page, false);
        assert!(!page.has_class(&body, "touch-device"));
    }

    #[test]
    fn pulse_wears_off_after_a_second() {
        let page = Rc::new(FakePage::new());
        let scheduler = ManualScheduler::default();
        let button = page.add(".rent-btn");

        pulse(&page, &scheduler, &button);
        assert!(page.has_class(&button, "animate__pulse"));

        scheduler.advance(millis(999));
        assert!(page.has_class(&button, "animate__pulse"));
        scheduler.advance(millis(1));
        assert!(!page.has_class(&button, "animate__pulse"));
        assert!(!page.has_class(&button, "animate__animated"));
    }
}
