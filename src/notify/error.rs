use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with code {code}: {stderr}")]
    Exit {
        program: String,
        code: i32,
        stderr: String,
    },
}
