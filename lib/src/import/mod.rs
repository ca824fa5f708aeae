pub mod classifier;
pub mod merge;
pub mod session;
pub mod validator;

pub use classifier::{classify, ArtifactKind};
pub use merge::{
    import_title, merge_into, Destination, MergeOutcome, MergeSelection, MergeToggle,
    PlacementNotice,
};
pub use session::{ApplyReport, ImportSession, SessionState};
pub use validator::{
    SchemaValidator, StructuralValidator, ValidationResult, ValidationStatus, PROFILE_SCHEMA,
};
