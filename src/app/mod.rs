pub mod background;
pub mod input;
pub mod messages;
pub mod runtime;

pub use messages::BackgroundMessage;
pub use runtime::run_tui;

use crate::api::ApiClient;
use std::path::PathBuf;
use std::sync::mpsc;

/// Shared handles the input and drain paths need to start background work.
pub struct RuntimeContext {
    pub api: ApiClient,
    pub tx: mpsc::Sender<messages::BackgroundMessage>,
    /// Where downloaded plan documents land.
    pub output_dir: PathBuf,
}
