use std::collections::BTreeMap;
use std::ffi::OsString;

/// A command-line token which is not of the form `--name` or `--name=value`.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("malformed argument {0:?}, expected --name or --name=value")]
pub struct ArgumentFormatError(pub String);

/// Flags given on the command line, by name without the leading `--`.
///
/// A bare `--name` has an empty value. When a flag is repeated, the last
/// occurrence wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawArgs(BTreeMap<String, String>);

impl RawArgs {
    /// Parse each token as `--name` or `--name=value`.
    ///
    /// Stops at the first malformed token.
    pub fn collect<I, S>(tokens: I) -> Result<Self, ArgumentFormatError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .map(|token| parse_token(token.as_ref()))
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self)
    }

    /// Same as [RawArgs::collect] for tokens from [std::env::args_os].
    ///
    /// A token which is not valid UTF-8 is malformed.
    pub fn collect_os<I>(tokens: I) -> Result<Self, ArgumentFormatError>
    where
        I: IntoIterator<Item = OsString>,
    {
        tokens
            .into_iter()
            .map(|token| {
                let token = token
                    .into_string()
                    .map_err(|t| ArgumentFormatError(t.to_string_lossy().into_owned()))?;
                parse_token(&token)
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Value of a flag, treating a flag without a value the same as an absent flag.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

fn parse_token(token: &str) -> Result<(String, String), ArgumentFormatError> {
    let malformed = || ArgumentFormatError(token.to_string());
    let flag = token.strip_prefix("--").ok_or_else(malformed)?;
    let (name, value) = flag.split_once('=').unwrap_or((flag, ""));
    if is_valid_name(name) {
        Ok((name.to_string(), value.to_string()))
    } else {
        Err(malformed())
    }
}

fn is_valid_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphanumeric())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
