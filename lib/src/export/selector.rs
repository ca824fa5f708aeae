use crate::models::{Category, Placement};

/// State of one category toggle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Toggle {
    /// Explicitly requested for export
    pub selected: bool,
    /// Not user-changeable right now
    pub locked: bool,
    /// Shown checked because a whole-profile selection already covers it
    pub implied: bool,
}

impl Toggle {
    const FREE: Toggle = Toggle {
        selected: false,
        locked: false,
        implied: false,
    };

    const BLOCKED: Toggle = Toggle {
        selected: false,
        locked: true,
        implied: false,
    };

    const COVERED: Toggle = Toggle {
        selected: false,
        locked: true,
        implied: true,
    };

    pub fn is_checked(&self) -> bool {
        self.selected || self.implied
    }
}

/// Which categories an export should contain
///
/// Whole-profile and partial selections exclude each other: choosing one
/// class locks the other. Only `selected` toggles end up in the export.
#[derive(Debug, Clone, Default)]
pub struct ExportTypeSelector {
    toggles: [Toggle; 7],
    order: Vec<Category>,
}

impl ExportTypeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a user toggle; returns whether anything changed
    ///
    /// Calls against a locked toggle are ignored.
    pub fn set_category(&mut self, category: Category, enabled: bool) -> bool {
        let current = self.toggles[category.index()];
        if current.locked {
            log::debug!("Ignoring toggle of locked category {}", category);
            return false;
        }
        if current.selected == enabled {
            return false;
        }

        match (category.placement(), enabled) {
            (Placement::WholeProfile, true) => {
                for other in Category::ALL.into_iter().filter(|c| *c != category) {
                    self.toggles[other.index()] = if other.is_whole_profile() {
                        Toggle::BLOCKED
                    } else {
                        Toggle::COVERED
                    };
                }
                self.order.clear();
                self.select(category);
            }
            (Placement::WholeProfile, false) => {
                self.toggles = [Toggle::FREE; 7];
                self.order.clear();
            }
            (Placement::Partial, true) => {
                self.select(category);
                for whole in Category::ALL.into_iter().filter(|c| c.is_whole_profile()) {
                    self.toggles[whole.index()] = Toggle::BLOCKED;
                }
            }
            (Placement::Partial, false) => {
                self.deselect(category);
                if !self.any_selected(Placement::Partial) {
                    for whole in Category::ALL.into_iter().filter(|c| c.is_whole_profile()) {
                        self.toggles[whole.index()] = Toggle::FREE;
                    }
                }
            }
        }
        true
    }

    /// Flip a category's selection
    pub fn toggle(&mut self, category: Category) -> bool {
        let enabled = !self.is_selected(category);
        self.set_category(category, enabled)
    }

    pub fn toggle_state(&self, category: Category) -> Toggle {
        self.toggles[category.index()]
    }

    pub fn is_selected(&self, category: Category) -> bool {
        self.toggles[category.index()].selected
    }

    pub fn is_locked(&self, category: Category) -> bool {
        self.toggles[category.index()].locked
    }

    /// Selected categories in the order they were chosen
    pub fn selected(&self) -> &[Category] {
        &self.order
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn any_selected(&self, placement: Placement) -> bool {
        self.order.iter().any(|c| c.placement() == placement)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn select(&mut self, category: Category) {
        let toggle = &mut self.toggles[category.index()];
        toggle.selected = true;
        toggle.implied = false;
        if !self.order.contains(&category) {
            self.order.push(category);
        }
    }

    fn deselect(&mut self, category: Category) {
        self.toggles[category.index()].selected = false;
        self.order.retain(|c| *c != category);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_whole_profile_locks_everything_else() {
        let mut selector = ExportTypeSelector::new();
        assert!(selector.set_category(Category::AllProfiles, true));

        assert_eq!(selector.selected(), &[Category::AllProfiles]);
        assert!(!selector.is_locked(Category::AllProfiles));

        let other_whole = selector.toggle_state(Category::CurrentAllProfile);
        assert!(other_whole.locked && !other_whole.is_checked());

        for partial in Category::ALL.into_iter().filter(|c| !c.is_whole_profile()) {
            let toggle = selector.toggle_state(partial);
            assert!(toggle.locked && toggle.implied && !toggle.selected);
            assert!(toggle.is_checked());
        }
    }

    #[test]
    fn test_locked_toggle_is_noop() {
        let mut selector = ExportTypeSelector::new();
        selector.set_category(Category::CurrentAllProfile, true);

        assert!(!selector.set_category(Category::UserSettings, true));
        assert!(!selector.set_category(Category::AllProfiles, true));
        assert_eq!(selector.selected(), &[Category::CurrentAllProfile]);
    }

    #[test]
    fn test_whole_profile_off_unlocks_all() {
        let mut selector = ExportTypeSelector::new();
        selector.set_category(Category::AllProfiles, true);
        selector.set_category(Category::AllProfiles, false);

        assert!(selector.is_empty());
        for category in Category::ALL {
            assert_eq!(selector.toggle_state(category), Toggle::default());
        }
    }

    #[test]
    fn test_partial_locks_whole_until_last_partial_cleared() {
        let mut selector = ExportTypeSelector::new();
        selector.set_category(Category::CurrentBookmarks, true);
        selector.set_category(Category::UserSettings, true);

        assert!(selector.is_locked(Category::AllProfiles));
        assert!(selector.is_locked(Category::CurrentAllProfile));

        selector.set_category(Category::CurrentBookmarks, false);
        assert!(selector.is_locked(Category::AllProfiles));

        selector.set_category(Category::UserSettings, false);
        assert!(!selector.is_locked(Category::AllProfiles));
        assert!(!selector.is_locked(Category::CurrentAllProfile));
        assert!(selector.is_empty());
    }

    #[test]
    fn test_selection_order_is_preserved() {
        let mut selector = ExportTypeSelector::new();
        selector.set_category(Category::UserSettings, true);
        selector.set_category(Category::CurrentBookmarks, true);
        selector.set_category(Category::DefaultFolderStyle, true);
        selector.toggle(Category::CurrentBookmarks);
        selector.toggle(Category::CurrentBookmarks);

        assert_eq!(
            selector.selected(),
            &[
                Category::UserSettings,
                Category::DefaultFolderStyle,
                Category::CurrentBookmarks
            ]
        );
    }

    #[test]
    fn test_repeated_set_reports_no_change() {
        let mut selector = ExportTypeSelector::new();
        assert!(selector.set_category(Category::UserSettings, true));
        assert!(!selector.set_category(Category::UserSettings, true));
        assert!(!selector.set_category(Category::CurrentBookmarks, false));
    }

    fn any_category() -> impl Strategy<Value = Category> {
        (0..Category::ALL.len()).prop_map(|i| Category::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_classes_stay_mutually_exclusive(
            steps in prop::collection::vec((any_category(), any::<bool>()), 0..40)
        ) {
            let mut selector = ExportTypeSelector::new();
            for (category, enabled) in steps {
                selector.set_category(category, enabled);

                let whole = selector.any_selected(Placement::WholeProfile);
                let partial = selector.any_selected(Placement::Partial);
                prop_assert!(!(whole && partial));

                let whole_count = selector
                    .selected()
                    .iter()
                    .filter(|c| c.is_whole_profile())
                    .count();
                prop_assert!(whole_count <= 1);

                for c in Category::ALL {
                    prop_assert_eq!(selector.is_selected(c), selector.selected().contains(&c));
                }
            }
        }
    }
}
