use std::fmt;

/// Single-use proof that an OAuth2 callback belongs to a flow this server started.
#[derive(Clone, PartialEq, Eq)]
pub struct StateToken(String);

/// Bearer credential carried in the session cookie.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

macro_rules! opaque_token {
    ($name:ident) => {
        impl $name {
            pub(crate) fn new(value: String) -> Self {
                Self(value)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Enough to correlate log lines, not enough to replay
                let prefix: String = self.0.chars().take(4).collect();
                write!(f, "{}({prefix}…)", stringify!($name))
            }
        }
    };
}

opaque_token!(StateToken);
opaque_token!(SessionToken);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = SessionToken::new("abcdefghijklmnopqrstuvwxyz".to_string());
        let debug = format!("{token:?}");
        assert_eq!(debug, "SessionToken(abcd…)");
        assert!(!debug.contains("efgh"));
    }

    #[test]
    fn test_accessors() {
        let token = StateToken::new("value".to_string());
        assert_eq!(token.as_str(), "value");
        assert_eq!(token.into_inner(), "value");
    }
}
