//! Who is playing. A player is a display name plus a stable id derived from
//! it, so "Ada" and " ada " land on the same leaderboard row.

use crate::error::{Error, Result};

pub const MAX_NAME_LEN: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Player {
    id: String,
    name: String,
}

impl Player {
    pub fn new(name: &str) -> Result<Self> {
        let name = validate_name(name)?;
        Ok(Self {
            id: player_id(name),
            name: name.to_string(),
        })
    }

    /// A player from an optional configured name. An empty or missing name
    /// means nobody is signed in.
    pub fn from_setting(name: Option<&str>) -> Result<Option<Self>> {
        match name.map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => Self::new(name).map(Some),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidPlayerName("name cannot be empty".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(Error::InvalidPlayerName(format!(
            "name must be {MAX_NAME_LEN} characters or less"
        )));
    }
    let valid = trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');
    if !valid {
        return Err(Error::InvalidPlayerName(
            "name can only contain letters, numbers, spaces, hyphens and underscores".into(),
        ));
    }
    Ok(trimmed)
}

fn player_id(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn names_are_trimmed() {
        let p = Player::new("  Ada Lovelace ").unwrap();
        assert_eq!(p.name(), "Ada Lovelace");
        assert_eq!(p.id(), "ada lovelace");
    }

    #[test]
    fn same_name_same_id() {
        assert_eq!(Player::new("ADA").unwrap().id(), Player::new("ada").unwrap().id());
    }

    #[test]
    fn space_and_underscore_stay_distinct() {
        let spaced = Player::new("a b").unwrap();
        let joined = Player::new("a_b").unwrap();
        assert_ne!(spaced.id(), joined.id());
    }

    #[test]
    fn rejects_bad_names() {
        assert!(Player::new("   ").is_err());
        assert!(Player::new(&"x".repeat(25)).is_err());
        assert!(Player::new("semi;colon").is_err());
        assert!(Player::new(&"x".repeat(24)).is_ok());
    }

    #[test]
    fn blank_setting_means_signed_out() {
        assert_eq!(Player::from_setting(None).unwrap(), None);
        assert_eq!(Player::from_setting(Some("  ")).unwrap(), None);
        assert_eq!(Player::from_setting(Some("bob")).unwrap().unwrap().name(), "bob");
        assert!(Player::from_setting(Some("b@d")).is_err());
    }
}
