use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an imported category may be merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Only by creating a new profile
    WholeProfile,
    /// Only into the currently active profile
    Partial,
}

/// One of the fixed data slices that can be exported and imported
///
/// Declaration order is also the order in which an import applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    AllProfiles,
    CurrentAllProfile,
    CurrentBookmarks,
    DefaultFolderStyle,
    DefaultBookmarksStyle,
    UserSettings,
    CurrentUserActivityLog,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::AllProfiles,
        Category::CurrentAllProfile,
        Category::CurrentBookmarks,
        Category::DefaultFolderStyle,
        Category::DefaultBookmarksStyle,
        Category::UserSettings,
        Category::CurrentUserActivityLog,
    ];

    /// Wire tag used in `details.exportType` and as the `export` key
    pub fn tag(self) -> &'static str {
        match self {
            Category::AllProfiles => "allProfiles",
            Category::CurrentAllProfile => "currentAllProfile",
            Category::CurrentBookmarks => "currentBookmarks",
            Category::DefaultFolderStyle => "defaultFolderStyle",
            Category::DefaultBookmarksStyle => "defaultBookmarksStyle",
            Category::UserSettings => "userSettings",
            Category::CurrentUserActivityLog => "currentUserActivityLog",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }

    pub fn placement(self) -> Placement {
        match self {
            Category::AllProfiles | Category::CurrentAllProfile => Placement::WholeProfile,
            _ => Placement::Partial,
        }
    }

    pub fn is_whole_profile(self) -> bool {
        self.placement() == Placement::WholeProfile
    }

    /// Position in `ALL`, used to index fixed-size tables
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label for reports
    pub fn label(self) -> &'static str {
        match self {
            Category::AllProfiles => "All profiles",
            Category::CurrentAllProfile => "Current profile (complete)",
            Category::CurrentBookmarks => "Bookmarks",
            Category::DefaultFolderStyle => "Default folder style",
            Category::DefaultBookmarksStyle => "Default bookmark style",
            Category::UserSettings => "User settings",
            Category::CurrentUserActivityLog => "Activity log",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Category {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s.trim()).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|c| c.tag()).collect();
            ProfileError::Validation(format!(
                "unknown category '{}' (expected one of: {})",
                s,
                known.join(", ")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Category::AllProfiles, Placement::WholeProfile)]
    #[case(Category::CurrentAllProfile, Placement::WholeProfile)]
    #[case(Category::CurrentBookmarks, Placement::Partial)]
    #[case(Category::DefaultFolderStyle, Placement::Partial)]
    #[case(Category::DefaultBookmarksStyle, Placement::Partial)]
    #[case(Category::UserSettings, Placement::Partial)]
    #[case(Category::CurrentUserActivityLog, Placement::Partial)]
    fn test_placement(#[case] category: Category, #[case] expected: Placement) {
        assert_eq!(category.placement(), expected);
    }

    #[test]
    fn test_tag_matches_serde_name() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.tag()));
            assert_eq!(Category::from_tag(category.tag()), Some(category));
        }
    }

    #[test]
    fn test_index_follows_declaration_order() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!(
            " userSettings ".parse::<Category>().unwrap(),
            Category::UserSettings
        );
        let err = "colors".parse::<Category>().unwrap_err();
        assert!(err.to_string().contains("unknown category 'colors'"));
    }
}
