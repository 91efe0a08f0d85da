// Application layer - Use case interactors

pub mod container;
pub mod gallery_interactor;
pub mod notifications;
pub mod trim_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use gallery_interactor::GalleryController;
pub use notifications::{Notification, NotificationCenter, NotificationKind};
pub use trim_interactor::TrimController;
