use thiserror::Error;

pub type Result<T> = std::result::Result<T, FinderError>;

/// Fatal discovery errors. A failed run leaves the model and registry
/// partially populated; callers must discard them.
#[derive(Debug, Error)]
pub enum FinderError {
    /// An interface-style marker sits on a type that declares no interfaces,
    /// so no contract type exists to register. A configuration error in the
    /// analyzed codebase.
    #[error("{type_name} is annotated @{marker} but declares no interfaces to use as its contract")]
    MissingContractInterface {
        type_name: String,
        marker: &'static str,
    },
}
