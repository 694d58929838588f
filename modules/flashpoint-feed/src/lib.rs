pub mod aggregate;
pub mod dedup;
pub mod normalize;
pub mod sources;
pub mod translate;

pub use aggregate::aggregate;
pub use dedup::{dedup_key, dedupe};
pub use normalize::normalize;
pub use sources::{GdeltAdapter, RawRecord, RssAdapter, SourceAdapter};
pub use translate::{HttpTranslator, PendingGuard, PendingPermit, Translator};
