pub mod create;
pub mod install;
pub mod make;
pub mod status;

pub use create::cmd_create;
pub use install::cmd_install;
pub use make::{CorrectionTarget, cmd_make};
pub use status::cmd_status;
