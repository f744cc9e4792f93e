use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A social sign-in provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Provider {
    Google,
    GitHub,
    Facebook,
    /// Any other provider, by lowercase id.
    Custom(String),
}

impl Provider {
    /// Lowercase identifier, as used in messages and action calls.
    pub fn id(&self) -> &str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
            Self::Facebook => "facebook",
            Self::Custom(id) => id,
        }
    }

    /// Button label.
    pub fn label(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::GitHub => "GitHub",
            Self::Facebook => "Facebook",
            Self::Custom(id) => id,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl From<&str> for Provider {
    fn from(s: &str) -> Self {
        let id = s.trim().to_ascii_lowercase();
        match id.as_str() {
            "google" => Self::Google,
            "github" => Self::GitHub,
            "facebook" => Self::Facebook,
            _ => Self::Custom(id),
        }
    }
}

impl FromStr for Provider {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_custom() {
        assert_eq!("GitHub".parse::<Provider>().unwrap(), Provider::GitHub);
        assert_eq!(" google ".parse::<Provider>().unwrap(), Provider::Google);
        assert_eq!(
            "GitLab".parse::<Provider>().unwrap(),
            Provider::Custom("gitlab".to_string())
        );
    }

    #[test]
    fn test_id_and_label() {
        assert_eq!(Provider::GitHub.id(), "github");
        assert_eq!(Provider::GitHub.label(), "GitHub");
        assert_eq!(Provider::Google.to_string(), "google");
    }
}
