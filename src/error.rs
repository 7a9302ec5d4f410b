use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid author pattern: {0}")]
    AuthorPattern(#[from] regex::Error),
    #[error("No valid repository paths")]
    NoRepositories,
    #[error("Not a git repository: {} (use --repo to choose one)", .0.display())]
    NotARepository(PathBuf),
    #[error("Failed to write HTML to {}: {source}", path.display())]
    HtmlWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Signature time error: {0}")]
    SignatureTime(#[from] gix::date::parse::Error),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
}

// gix errors are large; keep them boxed so `Result<T>` stays small.
impl From<gix::object::find::existing::Error> for GridError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        GridError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for GridError {
    fn from(err: gix::object::commit::Error) -> Self {
        GridError::Commit(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for GridError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        GridError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for GridError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        GridError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for GridError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GridError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for GridError {
    fn from(err: gix::objs::decode::Error) -> Self {
        GridError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::discover::Error> for GridError {
    fn from(err: gix::discover::Error) -> Self {
        GridError::GitDiscover(Box::new(err))
    }
}
