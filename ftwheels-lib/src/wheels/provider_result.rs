use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum ProviderResult<T> {
    /// The operation succeeded and data was found.
    Found(T),

    /// The index has no data for this package (e.g. the project does not exist).
    Unavailable(Arc<str>),

    /// An error occurred while fetching or decoding the data for this package.
    Error(Arc<ohno::AppError>),
}
