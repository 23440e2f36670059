// Application layer - Use case interactors

pub mod container;
pub mod convert_interactor;
pub mod probe_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use convert_interactor::ConvertInteractor;
pub use probe_interactor::ProbeInteractor;
