use crate::error::Result;
use crate::store::ProfileStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type ProfileId = String;

/// Generate a fresh unique identifier for profiles and bookmark nodes
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A folder or bookmark in a profile's bookmark tree
///
/// A node without `url` is a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
    /// Per-node style overrides, interpreted by the theme engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
    #[serde(default)]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    pub fn folder(title: &str) -> Self {
        Self {
            id: new_id(),
            parent_id: None,
            index: 0,
            title: title.to_string(),
            url: None,
            date_added: None,
            style: None,
            children: Vec::new(),
        }
    }

    pub fn bookmark(title: &str, url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::folder(title)
        }
    }

    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }

    /// Append a child, wiring its parent link and sibling index
    pub fn push_child(&mut self, mut child: BookmarkNode) {
        child.parent_id = Some(self.id.clone());
        child.index = self.next_child_index();
        self.children.push(child);
    }

    /// One past the largest sibling index among the children (0 when empty)
    pub fn next_child_index(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.index)
            .max()
            .map_or(0, |max| max.saturating_add(1))
    }

    /// Number of nodes in this subtree, including self
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(BookmarkNode::count).sum::<usize>()
    }

    /// Assign fresh ids to the whole subtree, rewiring parent links to match
    pub fn rekey(&mut self, parent_id: Option<String>) {
        self.id = new_id();
        self.parent_id = parent_id;
        let id = self.id.clone();
        for child in &mut self.children {
            child.rekey(Some(id.clone()));
        }
    }

    /// Iterate the subtree depth-first, self first
    pub fn walk(&self) -> Vec<&BookmarkNode> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.walk());
        }
        nodes
    }
}

/// One entry of a profile's activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ActivityEntry {
    pub fn new(action: &str, target: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now(),
            action: action.to_string(),
            target: target.map(str::to_string),
            detail: None,
        }
    }

    /// Entries describing the same event compare equal regardless of detail
    pub fn same_event(&self, other: &ActivityEntry) -> bool {
        self.timestamp == other.timestamp
            && self.action == other.action
            && self.target == other.target
    }
}

/// Identity block carried by every export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetail {
    pub name: String,
    pub id: ProfileId,
    pub creation_timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A user's live profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    /// Avatar reference (URL or data URI)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub creation_timestamp: DateTime<Utc>,
    /// `bookmarks[0]` is the root bookmark container
    #[serde(default)]
    pub bookmarks: Vec<BookmarkNode>,
    #[serde(default)]
    pub default_folder_style: Value,
    #[serde(default)]
    pub default_bookmarks_style: Value,
    #[serde(default)]
    pub user_settings: Value,
    #[serde(default)]
    pub user_activity_log: Vec<ActivityEntry>,
}

impl Profile {
    pub fn new(name: &str) -> Self {
        Self {
            id: new_id(),
            name: name.to_string(),
            image: None,
            creation_timestamp: Utc::now(),
            bookmarks: vec![BookmarkNode::folder("root")],
            default_folder_style: Value::Object(Default::default()),
            default_bookmarks_style: Value::Object(Default::default()),
            user_settings: Value::Object(Default::default()),
            user_activity_log: Vec::new(),
        }
    }

    pub fn detail(&self) -> ProfileDetail {
        ProfileDetail {
            name: self.name.clone(),
            id: self.id.clone(),
            creation_timestamp: self.creation_timestamp,
            image: self.image.clone(),
        }
    }

    /// Root bookmark container, created when the profile has none
    pub fn root_container_mut(&mut self) -> &mut BookmarkNode {
        if self.bookmarks.is_empty() {
            self.bookmarks.push(BookmarkNode::folder("root"));
        }
        &mut self.bookmarks[0]
    }

    pub fn bookmark_count(&self) -> usize {
        self.bookmarks.iter().map(BookmarkNode::count).sum()
    }
}

/// Snapshot of the store an export reads from
///
/// `allProfiles` needs every stored profile, the other categories only the
/// active one.
#[derive(Debug, Clone)]
pub struct ProfileSource {
    pub active: Profile,
    pub all: Vec<Profile>,
}

impl ProfileSource {
    pub fn new(active: Profile, all: Vec<Profile>) -> Self {
        Self { active, all }
    }

    pub fn load(store: &dyn ProfileStore) -> Result<Self> {
        Ok(Self {
            active: store.active_profile()?,
            all: store.profiles()?,
        })
    }
}
