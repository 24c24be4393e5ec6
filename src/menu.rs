#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuKey {
    Enter,
    Space,
    Escape,
    Other,
}

impl MenuKey {
    pub fn from_key(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEvent {
    ToggleClicked,
    ToggleKey(MenuKey),
    LinkClicked,
    DocumentClick { inside_menu: bool, inside_toggle: bool },
    DocumentKey(MenuKey),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn aria_expanded(self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }

    pub fn apply(self, event: MenuEvent) -> Self {
        let open = match event {
            MenuEvent::ToggleClicked => !self.open,
            MenuEvent::ToggleKey(MenuKey::Enter | MenuKey::Space) => !self.open,
            MenuEvent::ToggleKey(_) => self.open,
            MenuEvent::LinkClicked => false,
            MenuEvent::DocumentClick {
                inside_menu,
                inside_toggle,
            } => self.open && (inside_menu || inside_toggle),
            MenuEvent::DocumentKey(MenuKey::Escape) => false,
            MenuEvent::DocumentKey(_) => self.open,
        };

        Self { open }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened() -> MobileMenu {
        MobileMenu::default().apply(MenuEvent::ToggleClicked)
    }

    #[test]
    fn toggle_flips_state() {
        let menu = opened();
        assert!(menu.is_open());
        assert_eq!(menu.aria_expanded(), "true");
        assert!(!menu.apply(MenuEvent::ToggleClicked).is_open());
    }

    #[test]
    fn only_enter_and_space_toggle_from_keyboard() {
        let closed = MobileMenu::default();

        assert!(closed.apply(MenuEvent::ToggleKey(MenuKey::from_key("Enter"))).is_open());
        assert!(closed.apply(MenuEvent::ToggleKey(MenuKey::from_key(" "))).is_open());
        assert!(!closed.apply(MenuEvent::ToggleKey(MenuKey::from_key("a"))).is_open());
    }

    #[test]
    fn link_click_and_escape_close() {
        assert!(!opened().apply(MenuEvent::LinkClicked).is_open());
        assert!(!opened()
            .apply(MenuEvent::DocumentKey(MenuKey::from_key("Escape")))
            .is_open());
        assert!(opened()
            .apply(MenuEvent::DocumentKey(MenuKey::from_key("Tab")))
            .is_open());
    }

    #[test]
    fn outside_click_closes_but_inside_click_keeps_open() {
        let outside = MenuEvent::DocumentClick {
            inside_menu: false,
            inside_toggle: false,
        };
        let inside = MenuEvent::DocumentClick {
            inside_menu: true,
            inside_toggle: false,
        };

        assert!(!opened().apply(outside).is_open());
        assert!(opened().apply(inside).is_open());
        assert!(!MobileMenu::default().apply(inside).is_open());
    }
}
