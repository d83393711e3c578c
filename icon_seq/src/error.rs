use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IconSeqError {
    #[error("Cannot parse header: {message}")]
    Parse { message: String },
    #[error("Cannot access header `{path}`: {source}")]
    IOError {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

impl IconSeqError {
    pub fn to_result<T>(self) -> Result<T, Self> {
        Err(self)
    }
}
