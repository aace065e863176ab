//! Write policies: how a whole collection lands on disk.

/// Controls how [`save`](crate::persist::save) replaces a collection file.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// Truncate the file and write the new content into it. A crash mid-write
    /// can leave a truncated file behind.
    #[default]
    InPlace,
    /// Write a uniquely named temp file beside the target and rename it over
    /// the target, so readers see either the old or the new content.
    Atomic,
}

impl WritePolicy {
    /// Pick [`Atomic`](Self::Atomic) when `atomic` is set.
    pub fn from_flag(atomic: bool) -> Self {
        if atomic {
            WritePolicy::Atomic
        } else {
            WritePolicy::InPlace
        }
    }
}
