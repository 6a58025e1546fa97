use std::fmt;

pub use self::Error::*;

pub type Outcome<T> = Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Unknown,
    Unauthorized,
    InvalidArgs,
    NoResults,
    ArgumentCount { command: String, required: usize, given: usize },
    Failed(String),
    Api(failure::Error),
    Store(diesel::result::Error),
    Pool(r2d2::Error),
    IrcErr(Box<irc::error::Error>),
    Throw(failure::Error)
}

impl Error {
    pub fn failed<T: Into<String>>(msg: T) -> Self {
        Failed(msg.into())
    }

    pub fn throw<T: fmt::Display + fmt::Debug + Send + Sync + 'static>(msg: T) -> Self {
        Throw(failure::err_msg(msg))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Unknown          => write!(f, "unknown command"),
            Unauthorized     => write!(f, "access denied"),
            InvalidArgs      => write!(f, "invalid arguments"),
            NoResults        => write!(f, "no results"),
            ArgumentCount { command, required, given } => write!(
                f, "not enough arguments to {}: expected {}, got {}", command, required, given
            ),
            Failed(msg)      => write!(f, "{}", msg),
            Api(e)           => write!(f, "API error: {}", e),
            Store(e)         => write!(f, "database error: {}", e),
            Pool(e)          => write!(f, "connection pool error: {}", e),
            IrcErr(e)        => write!(f, "IRC error: {}", e),
            Throw(e)         => write!(f, "{}", e)
        }
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(_: std::num::ParseIntError) -> Self {
        InvalidArgs
    }
}
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Api(failure::Error::from(e))
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Api(failure::Error::from(e))
    }
}
impl From<chrono::format::ParseError> for Error {
    fn from(e: chrono::format::ParseError) -> Self {
        Api(failure::Error::from(e))
    }
}
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Throw(failure::Error::from(e))
    }
}
impl From<diesel::result::Error> for Error {
    fn from(e: diesel::result::Error) -> Self {
        Store(e)
    }
}
impl From<diesel::ConnectionError> for Error {
    fn from(e: diesel::ConnectionError) -> Self {
        Throw(failure::Error::from(e))
    }
}
impl From<r2d2::Error> for Error {
    fn from(e: r2d2::Error) -> Self {
        Pool(e)
    }
}
impl From<irc::error::Error> for Error {
    fn from(e: irc::error::Error) -> Self {
        IrcErr(Box::new(e))
    }
}
impl From<regex::Error> for Error {
    fn from(_: regex::Error) -> Self {
        InvalidArgs
    }
}
impl From<humantime::DurationError> for Error {
    fn from(e: humantime::DurationError) -> Self {
        Throw(failure::Error::from(e))
    }
}
