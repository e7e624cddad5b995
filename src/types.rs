//! Shared types passed between the watch stages.
//!
//! A [`Note`] is read from the Bear database by [`source`](crate::source),
//! filtered by [`detect`](crate::detect), and handed to
//! [`convert`](crate::convert). It is never modified along the way.

/// One record of the Bear change feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Note title. Unique key within a single poll.
    pub title: String,
    /// Unmodified note text as stored by Bear.
    pub body: Vec<u8>,
}

impl Note {
    pub fn new(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}
