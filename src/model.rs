use crate::resource::Resource;

/// Implemented by typed resource definitions (usually via `#[resource]`).
///
/// A model is a thin wrapper over the dynamic [`Resource`] handle: it names
/// the resource kind and exposes typed accessors, while all state lives in
/// the record itself.
pub trait Model: Sized {
    /// The JSON:API `type` string for this kind.
    fn resource_type() -> String;

    /// URL segment override; the type string is used when `None`.
    fn endpoint() -> Option<String> {
        None
    }

    fn from_record(record: Resource) -> Self;

    fn record(&self) -> &Resource;

    /// A fresh, unpersisted record of this kind.
    fn create() -> Self {
        let record = Resource::new(Self::resource_type());
        if let Some(endpoint) = Self::endpoint() {
            record.set_endpoint(endpoint);
        }
        Self::from_record(record)
    }
}
