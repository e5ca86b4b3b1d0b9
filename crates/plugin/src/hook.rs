//! Release lifecycle hooks.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A point in the release lifecycle at which the host invokes plugins.
///
/// Decoding goes through [`FromStr`], so `pre_publish` is accepted on the wire
/// as well as `pre-publish`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Hook {
    /// Before the release workflow initializes.
    PreInit,
    /// After the release workflow initializes.
    PostInit,
    /// Before the release plan is computed.
    PrePlan,
    /// After the release plan is computed.
    PostPlan,
    /// Before the next version is determined.
    PreVersion,
    /// After the next version is determined.
    PostVersion,
    /// Before release notes are generated.
    PreNotes,
    /// After release notes are generated.
    PostNotes,
    /// Before the release is approved.
    PreApprove,
    /// After the release is approved.
    PostApprove,
    /// Before the release is published.
    PrePublish,
    /// After the release is published.
    PostPublish,
    /// After the whole workflow succeeded.
    OnSuccess,
    /// After the workflow failed.
    OnError,
}

impl Hook {
    /// Every hook, in lifecycle order.
    pub const ALL: [Self; 14] = [
        Self::PreInit,
        Self::PostInit,
        Self::PrePlan,
        Self::PostPlan,
        Self::PreVersion,
        Self::PostVersion,
        Self::PreNotes,
        Self::PostNotes,
        Self::PreApprove,
        Self::PostApprove,
        Self::PrePublish,
        Self::PostPublish,
        Self::OnSuccess,
        Self::OnError,
    ];

    /// The wire name of the hook (e.g. `pre-publish`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreInit => "pre-init",
            Self::PostInit => "post-init",
            Self::PrePlan => "pre-plan",
            Self::PostPlan => "post-plan",
            Self::PreVersion => "pre-version",
            Self::PostVersion => "post-version",
            Self::PreNotes => "pre-notes",
            Self::PostNotes => "post-notes",
            Self::PreApprove => "pre-approve",
            Self::PostApprove => "post-approve",
            Self::PrePublish => "pre-publish",
            Self::PostPublish => "post-publish",
            Self::OnSuccess => "on-success",
            Self::OnError => "on-error",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hook {
    type Err = Error;

    /// Accepts both `pre-publish` and `pre_publish` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|hook| hook.as_str() == normalized)
            .ok_or_else(|| Error::unknown_hook(s))
    }
}

impl TryFrom<String> for Hook {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(Hook::PrePublish.to_string(), "pre-publish");
        assert_eq!(Hook::OnError.to_string(), "on-error");
    }

    #[test]
    fn test_from_str_accepts_both_separators() {
        assert_eq!("post-publish".parse::<Hook>().unwrap(), Hook::PostPublish);
        assert_eq!("post_publish".parse::<Hook>().unwrap(), Hook::PostPublish);
        assert_eq!("ON_ERROR".parse::<Hook>().unwrap(), Hook::OnError);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "pre-launch".parse::<Hook>().unwrap_err();
        assert!(matches!(err, Error::UnknownHook { .. }));
    }

    #[test]
    fn test_serde_round_trip_uses_kebab_case() {
        let json = serde_json::to_string(&Hook::PreVersion).unwrap();
        assert_eq!(json, "\"pre-version\"");
        let hook: Hook = serde_json::from_str("\"on-success\"").unwrap();
        assert_eq!(hook, Hook::OnSuccess);
    }

    #[test]
    fn test_deserialize_accepts_underscores_and_reports_unknown() {
        let hook: Hook = serde_json::from_str("\"post_publish\"").unwrap();
        assert_eq!(hook, Hook::PostPublish);

        let err = serde_json::from_str::<Hook>("\"pre-launch\"").unwrap_err();
        assert!(err.to_string().contains("Unknown hook: pre-launch"));
    }

    #[test]
    fn test_all_names_parse_back() {
        for hook in Hook::ALL {
            assert_eq!(hook.as_str().parse::<Hook>().unwrap(), hook);
        }
    }
}
