pub mod runtime;

pub use runtime::ensure_runtime;
pub use runtime::probe_java;
pub use runtime::select_java_executable;
pub use runtime::JavaInstallation;
