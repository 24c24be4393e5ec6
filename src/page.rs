use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Element box relative to the viewport, as reported by layout.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityOptions {
    pub threshold: f64,
    pub root_margin: &'static str,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: "0px",
        }
    }
}

pub type VisibilityCallback<N> = Rc<dyn Fn(&N)>;

/// The live page as seen by the controllers.
///
/// Lookups return `None` or an empty list when the markup lacks an element;
/// callers skip the dependent feature in that case. Writes on a node never
/// fail.
pub trait Page {
    type Node: Clone + PartialEq;

    fn find(&self, selector: &str) -> Option<Self::Node>;
    fn find_all(&self, selector: &str) -> Vec<Self::Node>;
    fn root(&self) -> Option<Self::Node>;
    fn body(&self) -> Option<Self::Node>;

    fn scroll_y(&self) -> f64;
    fn viewport(&self) -> Viewport;
    fn offset_top(&self, node: &Self::Node) -> f64;
    fn offset_height(&self, node: &Self::Node) -> f64;
    fn bounding_rect(&self, node: &Self::Node) -> Rect;
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&self, node: &Self::Node, name: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn set_class(&self, node: &Self::Node, class: &str, on: bool);
    fn style(&self, node: &Self::Node, property: &str) -> Option<String>;
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);
    fn set_text(&self, node: &Self::Node, text: &str);

    /// Calls `on_visible` at most once per node, the first time it
    /// intersects the viewport, and stops watching it afterwards.
    fn observe_visibility(
        &self,
        nodes: Vec<Self::Node>,
        options: VisibilityOptions,
        on_visible: VisibilityCallback<Self::Node>,
    );
}
