/// The computed release, consumed only by the publisher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDraft {
    /// Tag name of the new release (e.g. `v1.5.0`)
    pub version: String,
    pub body: String,
    /// Commit the release tag is created at
    pub target_ref: String,
}

impl ReleaseDraft {
    pub fn new(
        version: impl Into<String>,
        body: impl Into<String>,
        target_ref: impl Into<String>,
    ) -> Self {
        ReleaseDraft {
            version: version.into(),
            body: body.into(),
            target_ref: target_ref.into(),
        }
    }
}
