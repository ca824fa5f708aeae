pub mod category;
pub mod document;
pub mod profile;

pub use category::{Category, Placement};
pub use document::{Environment, ExportDetails, ExportDocument, ExportPayload};
pub use profile::{ActivityEntry, BookmarkNode, Profile, ProfileDetail, ProfileId, ProfileSource};
