use crate::models::{ActivityEntry, BookmarkNode, Category, ExportDocument, Placement, Profile};
use serde_json::Value;
use std::fmt;

/// Per-category destination switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeToggle {
    pub apply_to_current: bool,
    pub apply_to_new: bool,
}

impl MergeToggle {
    fn preset(category: Category) -> Self {
        match category.placement() {
            Placement::WholeProfile => Self {
                apply_to_current: false,
                apply_to_new: true,
            },
            Placement::Partial => Self {
                apply_to_current: true,
                apply_to_new: false,
            },
        }
    }

    fn is_enabled(&self, category: Category) -> bool {
        match category.placement() {
            Placement::WholeProfile => self.apply_to_new,
            Placement::Partial => self.apply_to_current,
        }
    }
}

/// Which side a toggle request targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    CurrentProfile,
    NewProfile,
}

/// Non-fatal explanation of why a toggle request was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementNotice {
    pub category: Category,
    pub message: String,
}

impl fmt::Display for PlacementNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category.label(), self.message)
    }
}

/// Destinations chosen for each imported category
///
/// Presets follow the placement class and are locked. A caller may unlock
/// them, after which only the permitted side of each category can change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeSelection {
    entries: Vec<(Category, MergeToggle)>,
    editable: bool,
}

impl MergeSelection {
    pub fn for_categories(categories: &[Category]) -> Self {
        let mut entries: Vec<(Category, MergeToggle)> = Vec::new();
        for &category in categories {
            if !entries.iter().any(|(c, _)| *c == category) {
                entries.push((category, MergeToggle::preset(category)));
            }
        }
        Self {
            entries,
            editable: false,
        }
    }

    pub fn get(&self, category: Category) -> Option<MergeToggle> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, t)| *t)
    }

    pub fn entries(&self) -> &[(Category, MergeToggle)] {
        &self.entries
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Allow the permitted side of each category to be switched off and on
    pub fn unlock_defaults(&mut self) {
        self.editable = true;
    }

    pub fn set_apply_to_current(
        &mut self,
        category: Category,
        value: bool,
    ) -> Result<(), PlacementNotice> {
        self.set(category, Destination::CurrentProfile, value)
    }

    pub fn set_apply_to_new(
        &mut self,
        category: Category,
        value: bool,
    ) -> Result<(), PlacementNotice> {
        self.set(category, Destination::NewProfile, value)
    }

    pub fn set(
        &mut self,
        category: Category,
        destination: Destination,
        value: bool,
    ) -> Result<(), PlacementNotice> {
        let notice = |message: &str| PlacementNotice {
            category,
            message: message.to_string(),
        };

        let editable = self.editable;
        let toggle = self
            .entries
            .iter_mut()
            .find(|(c, _)| *c == category)
            .map(|(_, t)| t)
            .ok_or_else(|| notice("not part of this import"))?;

        match (category.placement(), destination) {
            (Placement::WholeProfile, Destination::CurrentProfile) => Err(notice(
                "can only be imported as a new profile, not into the current one",
            )),
            (Placement::Partial, Destination::NewProfile) => Err(notice(
                "can only be imported into the current profile, not as a new one",
            )),
            _ if !editable => Err(notice("destination is fixed for this import")),
            (Placement::WholeProfile, Destination::NewProfile) => {
                toggle.apply_to_new = value;
                Ok(())
            }
            (Placement::Partial, Destination::CurrentProfile) => {
                toggle.apply_to_current = value;
                Ok(())
            }
        }
    }

    /// Categories to apply, in apply order
    pub fn enabled(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.get(*c).is_some_and(|t| t.is_enabled(*c)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled().is_empty()
    }
}

/// Result of merging an import into owned copies of the store's data
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The active profile after partial categories were applied
    pub active: Profile,
    /// Profiles to create, from whole-profile categories
    pub new_profiles: Vec<Profile>,
    pub applied: Vec<Category>,
    pub bookmarks_imported: usize,
}

impl MergeOutcome {
    pub fn touches_active(&self) -> bool {
        self.applied.iter().any(|c| !c.is_whole_profile())
    }
}

/// Apply the enabled categories of `document`, in fixed order, to `active`
///
/// Nothing outside the returned outcome is touched, so an error later in the
/// commit leaves the store as it was.
pub fn merge_into(
    document: &ExportDocument,
    categories: &[Category],
    mut active: Profile,
) -> MergeOutcome {
    let payload = &document.export;
    let mut new_profiles = Vec::new();
    let mut applied = Vec::new();
    let mut bookmarks_imported = 0;

    for category in Category::ALL.into_iter().filter(|c| categories.contains(c)) {
        let done = match category {
            Category::AllProfiles => match &payload.all_profiles {
                Some(profiles) => {
                    new_profiles.extend(profiles.iter().cloned());
                    true
                }
                None => false,
            },
            Category::CurrentAllProfile => match &payload.current_all_profile {
                Some(profile) => {
                    new_profiles.push(profile.clone());
                    true
                }
                None => false,
            },
            Category::CurrentBookmarks => match &payload.current_bookmarks {
                Some(nodes) if !nodes.is_empty() => {
                    let title = import_title(document);
                    bookmarks_imported += graft_bookmarks(&mut active, nodes, &title);
                    true
                }
                _ => false,
            },
            Category::DefaultFolderStyle => {
                overwrite(&mut active.default_folder_style, &payload.default_folder_style)
            }
            Category::DefaultBookmarksStyle => overwrite(
                &mut active.default_bookmarks_style,
                &payload.default_bookmarks_style,
            ),
            Category::UserSettings => overwrite(&mut active.user_settings, &payload.user_settings),
            Category::CurrentUserActivityLog => match &payload.current_user_activity_log {
                Some(entries) => {
                    merge_activity_log(&mut active, entries);
                    true
                }
                None => false,
            },
        };

        if done {
            log::debug!("Merged {}", category);
            applied.push(category);
        } else {
            log::warn!("{} enabled but empty or missing in the import; skipped", category);
        }
    }

    MergeOutcome {
        active,
        new_profiles,
        applied,
        bookmarks_imported,
    }
}

// Last writer wins: no field-level merge
fn overwrite(slot: &mut Value, imported: &Option<Value>) -> bool {
    match imported {
        Some(value) => {
            *slot = value.clone();
            true
        }
        None => false,
    }
}

/// Title for the imported bookmark subtree, from the export's creation time
pub fn import_title(document: &ExportDocument) -> String {
    match document.created_at() {
        Some(created) => format!("Imported {}", created.format("%Y-%m-%d %H:%M:%S")),
        None => format!("Imported {}", document.details.timestamp_creation),
    }
}

/// Append imported nodes as one re-keyed subtree of the root container
///
/// Returns the number of imported nodes, excluding a wrapper folder.
fn graft_bookmarks(active: &mut Profile, nodes: &[BookmarkNode], title: &str) -> usize {
    let (mut subtree, imported) = match nodes {
        [single] => (single.clone(), single.count()),
        _ => {
            let mut wrapper = BookmarkNode::folder(title);
            wrapper.children = nodes.to_vec();
            let imported = nodes.iter().map(BookmarkNode::count).sum();
            (wrapper, imported)
        }
    };

    let root = active.root_container_mut();
    subtree.title = title.to_string();
    subtree.url = None;
    subtree.index = root.next_child_index();
    subtree.rekey(Some(root.id.clone()));
    root.children.push(subtree);
    imported
}

/// Add imported entries not already logged, keeping the log in time order
fn merge_activity_log(active: &mut Profile, entries: &[ActivityEntry]) {
    for entry in entries {
        if !active.user_activity_log.iter().any(|e| e.same_event(entry)) {
            active.user_activity_log.push(entry.clone());
        }
    }
    active.user_activity_log.sort_by_key(|e| e.timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Environment, ProfileSource};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::json;
    use std::collections::HashSet;

    fn exporter_profile() -> Profile {
        let mut profile = Profile::new("Laptop");
        let mut dev = BookmarkNode::folder("dev");
        dev.push_child(BookmarkNode::bookmark("Rust", "https://rust-lang.org"));
        dev.push_child(BookmarkNode::bookmark("Docs", "https://docs.rs"));
        profile.root_container_mut().push_child(dev);
        profile.default_folder_style = json!({ "color": "#336699" });
        profile.user_settings = json!({ "openInNewTab": true });
        profile
    }

    fn document(categories: &[Category]) -> ExportDocument {
        let active = exporter_profile();
        let source = ProfileSource::new(active.clone(), vec![active, Profile::new("Tablet")]);
        let created = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
        let mut doc = ExportDocument::with_timestamp(Environment::detect(), created);
        for &c in categories {
            doc.include(c, &source);
        }
        doc
    }

    fn destination() -> Profile {
        let mut profile = Profile::new("Desktop");
        profile
            .root_container_mut()
            .push_child(BookmarkNode::bookmark("Home", "https://example.com"));
        profile
    }

    #[rstest]
    #[case(Category::AllProfiles, false, true)]
    #[case(Category::CurrentAllProfile, false, true)]
    #[case(Category::CurrentBookmarks, true, false)]
    #[case(Category::UserSettings, true, false)]
    fn test_presets_follow_placement(
        #[case] category: Category,
        #[case] current: bool,
        #[case] new: bool,
    ) {
        let selection = MergeSelection::for_categories(&[category]);
        assert_eq!(
            selection.get(category),
            Some(MergeToggle {
                apply_to_current: current,
                apply_to_new: new
            })
        );
        assert_eq!(selection.enabled(), vec![category]);
    }

    #[test]
    fn test_locked_selection_refuses_every_flip() {
        let mut selection = MergeSelection::for_categories(&[Category::CurrentBookmarks]);
        let before = selection.clone();

        let notice = selection
            .set_apply_to_current(Category::CurrentBookmarks, false)
            .unwrap_err();
        assert_eq!(notice.category, Category::CurrentBookmarks);
        assert!(selection.set_apply_to_new(Category::CurrentBookmarks, true).is_err());
        assert_eq!(selection, before);
    }

    #[test]
    fn test_unlocked_selection_allows_only_permitted_side() {
        let mut selection =
            MergeSelection::for_categories(&[Category::UserSettings, Category::DefaultFolderStyle]);
        selection.unlock_defaults();

        selection.set_apply_to_current(Category::UserSettings, false).unwrap();
        assert_eq!(selection.enabled(), vec![Category::DefaultFolderStyle]);

        let notice = selection
            .set_apply_to_new(Category::DefaultFolderStyle, true)
            .unwrap_err();
        assert!(notice.to_string().contains("current profile"));
        assert!(!selection.get(Category::DefaultFolderStyle).unwrap().apply_to_new);
    }

    #[test]
    fn test_whole_profile_cannot_target_current() {
        let mut selection = MergeSelection::for_categories(&[Category::AllProfiles]);
        selection.unlock_defaults();
        assert!(selection.set_apply_to_current(Category::AllProfiles, true).is_err());
        selection.set_apply_to_new(Category::AllProfiles, false).unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_notice_for_category_not_imported() {
        let mut selection = MergeSelection::for_categories(&[Category::UserSettings]);
        let notice = selection
            .set_apply_to_current(Category::CurrentBookmarks, true)
            .unwrap_err();
        assert_eq!(notice.message, "not part of this import");
    }

    #[test]
    fn test_enabled_uses_apply_order() {
        let selection = MergeSelection::for_categories(&[
            Category::CurrentUserActivityLog,
            Category::UserSettings,
            Category::CurrentBookmarks,
        ]);
        assert_eq!(
            selection.enabled(),
            vec![
                Category::CurrentBookmarks,
                Category::UserSettings,
                Category::CurrentUserActivityLog
            ]
        );
    }

    #[test]
    fn test_graft_bookmarks_rekeys_and_appends() {
        let doc = document(&[Category::CurrentBookmarks]);
        let outcome = merge_into(&doc, &[Category::CurrentBookmarks], destination());

        let root = &outcome.active.bookmarks[0];
        assert_eq!(root.children.len(), 2);

        let grafted = &root.children[1];
        assert_eq!(grafted.index, 1);
        assert_eq!(grafted.title, "Imported 2024-05-17 08:30:00");
        assert_eq!(grafted.parent_id.as_deref(), Some(root.id.as_str()));

        let exported_ids: HashSet<String> = doc.export.current_bookmarks.as_ref().unwrap()[0]
            .walk()
            .iter()
            .map(|n| n.id.clone())
            .collect();
        for node in grafted.walk() {
            assert!(!exported_ids.contains(&node.id));
        }
        assert_eq!(grafted.children[0].title, "dev");
        assert_eq!(grafted.children[0].children.len(), 2);
        assert_eq!(outcome.bookmarks_imported, 4);
    }

    #[test]
    fn test_multiple_top_level_nodes_are_wrapped() {
        let mut doc = document(&[Category::CurrentBookmarks]);
        doc.export.current_bookmarks = Some(vec![
            BookmarkNode::bookmark("A", "https://a.example"),
            BookmarkNode::bookmark("B", "https://b.example"),
        ]);
        let outcome = merge_into(&doc, &[Category::CurrentBookmarks], destination());

        let grafted = &outcome.active.bookmarks[0].children[1];
        assert!(grafted.is_folder());
        assert_eq!(grafted.children.len(), 2);
        assert_eq!(outcome.bookmarks_imported, 2);
    }

    #[test]
    fn test_empty_bookmark_list_is_not_grafted() {
        let mut doc = document(&[Category::CurrentBookmarks, Category::UserSettings]);
        doc.export.current_bookmarks = Some(Vec::new());
        let outcome = merge_into(
            &doc,
            &[Category::CurrentBookmarks, Category::UserSettings],
            destination(),
        );

        assert_eq!(outcome.active.bookmarks[0].children.len(), 1);
        assert_eq!(outcome.applied, vec![Category::UserSettings]);
        assert_eq!(outcome.bookmarks_imported, 0);
    }

    #[test]
    fn test_graft_after_sibling_at_max_index() {
        let doc = document(&[Category::CurrentBookmarks]);
        let mut target = destination();
        target.root_container_mut().children[0].index = usize::MAX;

        let outcome = merge_into(&doc, &[Category::CurrentBookmarks], target);
        let root = &outcome.active.bookmarks[0];
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].index, usize::MAX);
        assert_eq!(outcome.applied, vec![Category::CurrentBookmarks]);
    }

    #[test]
    fn test_styles_and_settings_overwrite_wholesale() {
        let doc = document(&[Category::DefaultFolderStyle, Category::UserSettings]);
        let mut target = destination();
        target.user_settings = json!({ "language": "de", "openInNewTab": false });

        let outcome = merge_into(
            &doc,
            &[Category::DefaultFolderStyle, Category::UserSettings],
            target,
        );
        assert_eq!(outcome.active.user_settings, json!({ "openInNewTab": true }));
        assert_eq!(outcome.active.default_folder_style, json!({ "color": "#336699" }));
        assert!(outcome.new_profiles.is_empty());
        assert!(outcome.touches_active());
    }

    #[test]
    fn test_whole_profile_categories_create_profiles() {
        let doc = document(&[Category::AllProfiles]);
        let original = destination();
        let outcome = merge_into(&doc, &[Category::AllProfiles], original.clone());

        assert_eq!(outcome.new_profiles.len(), 2);
        assert_eq!(outcome.active, original);
        assert!(!outcome.touches_active());
    }

    #[test]
    fn test_activity_log_appends_without_duplicates() {
        let shared = ActivityEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            action: "add".into(),
            target: Some("https://a.example".into()),
            detail: None,
        };
        let older = ActivityEntry {
            timestamp: Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap(),
            ..shared.clone()
        };

        let mut doc = document(&[Category::CurrentUserActivityLog]);
        doc.export.current_user_activity_log = Some(vec![shared.clone(), older.clone()]);
        let mut target = destination();
        target.user_activity_log = vec![shared.clone()];

        let outcome = merge_into(&doc, &[Category::CurrentUserActivityLog], target);
        assert_eq!(outcome.active.user_activity_log, vec![older, shared]);
    }

    #[test]
    fn test_missing_slice_is_skipped() {
        let doc = document(&[Category::UserSettings]);
        let outcome = merge_into(
            &doc,
            &[Category::UserSettings, Category::CurrentBookmarks],
            destination(),
        );
        assert_eq!(outcome.applied, vec![Category::UserSettings]);
    }

    #[test]
    fn test_import_title_falls_back_to_raw_timestamp() {
        let mut doc = document(&[Category::UserSettings]);
        doc.details.timestamp_creation = "yesterday".into();
        assert_eq!(import_title(&doc), "Imported yesterday");
    }
}
