use crate::sorts::SortOption;

const HEADER_HIDE_AFTER_PX: f64 = 50.0;

/// Open/closed state of the sort dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortMenu {
    selected: SortOption,
    open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub option: SortOption,
    pub label: &'static str,
    pub selected: bool,
}

impl SortMenu {
    pub fn new(selected: SortOption) -> Self {
        Self {
            selected,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> SortOption {
        self.selected
    }

    pub fn label(&self) -> &'static str {
        self.selected.label()
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Choose an option; the menu closes and the new sort is returned for the caller.
    pub fn select(&mut self, option: SortOption) -> SortOption {
        self.selected = option;
        self.open = false;
        option
    }

    /// Keyboard handling. Only Escape does anything, and only while open.
    pub fn key_pressed(&mut self, key: &str) {
        if self.open && key == "Escape" {
            self.open = false;
        }
    }

    pub fn clicked_outside(&mut self) {
        self.open = false;
    }

    pub fn entries(&self) -> Vec<MenuEntry> {
        SortOption::ALL
            .into_iter()
            .map(|option| MenuEntry {
                option,
                label: option.label(),
                selected: option == self.selected,
            })
            .collect()
    }
}

impl Default for SortMenu {
    fn default() -> Self {
        Self::new(SortOption::default())
    }
}

/// Hide-on-scroll-down, show-on-scroll-up rule for the listing header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderVisibility {
    visible: bool,
    last_y: f64,
}

impl Default for HeaderVisibility {
    fn default() -> Self {
        Self {
            visible: true,
            last_y: 0.0,
        }
    }
}

impl HeaderVisibility {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn on_scroll(&mut self, y: f64) -> bool {
        if y > self.last_y && y > HEADER_HIDE_AFTER_PX {
            self.visible = false;
        } else if y < self.last_y {
            self.visible = true;
        }
        self.last_y = y;
        self.visible
    }
}
