//! Application metadata constants

pub const NAME: &str = "edusolve";
pub const DISPLAY_NAME: &str = "EduSolve AI";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = "Course-grounded exercise correction with a follow-up tutor";

/// Directory name for edusolve data (env file) in the home or project dir
pub const DATA_DIR: &str = ".edusolve";
/// Env file inside DATA_DIR
pub const ENV_FILE: &str = "env";

/// Prefix of exported correction documents
pub const EXPORT_FILE_PREFIX: &str = "Correction_EduSolve";
