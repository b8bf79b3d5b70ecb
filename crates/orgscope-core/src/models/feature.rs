//! Feature flag records and the per-organization flag store.
//!
//! Policy: a feature with no record is enabled (fail-open), unless the
//! store was built with an explicit default map that says otherwise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Optional capability areas that can be toggled per organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    LeadScoring,
    Chatbots,
    Analytics,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::LeadScoring, Feature::Chatbots, Feature::Analytics];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::LeadScoring => "lead_scoring",
            Feature::Chatbots => "chatbots",
            Feature::Analytics => "analytics",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Feature {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "lead_scoring" => Ok(Feature::LeadScoring),
            "chatbots" => Ok(Feature::Chatbots),
            "analytics" => Ok(Feature::Analytics),
            _ => Err(()),
        }
    }
}

/// A directory-side flag record; many per organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlag {
    pub organization_id: Uuid,
    pub feature_name: String,
    pub is_enabled: bool,
}

/// Resolved flags for one organization.
///
/// Built from scratch on every resolution; there is no incremental update.
/// Serializes as the flat map of effective values for every known feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<Feature, bool>",
    from = "BTreeMap<Feature, bool>"
)]
pub struct FeatureFlags {
    flags: BTreeMap<Feature, bool>,
    defaults: Option<BTreeMap<Feature, bool>>,
}

impl From<FeatureFlags> for BTreeMap<Feature, bool> {
    fn from(flags: FeatureFlags) -> Self {
        flags.effective()
    }
}

impl From<BTreeMap<Feature, bool>> for FeatureFlags {
    fn from(flags: BTreeMap<Feature, bool>) -> Self {
        Self {
            flags,
            defaults: None,
        }
    }
}

impl FeatureFlags {
    /// Build the store from one organization's records.
    ///
    /// Records naming features outside [`Feature`] are ignored. If the
    /// same feature appears twice, the last record wins.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a FeatureFlag>,
    {
        let mut flags = BTreeMap::new();
        for record in records {
            match record.feature_name.parse::<Feature>() {
                Ok(feature) => {
                    flags.insert(feature, record.is_enabled);
                }
                Err(()) => {
                    debug!(
                        organization_id = %record.organization_id,
                        feature_name = %record.feature_name,
                        "Ignoring unknown feature flag"
                    );
                }
            }
        }
        Self {
            flags,
            defaults: None,
        }
    }

    /// Attach an explicit default map consulted before the fail-open rule.
    pub fn with_defaults(mut self, defaults: BTreeMap<Feature, bool>) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// The fixed bundle for an admin browsing without an organization.
    pub fn admin_defaults() -> Self {
        let flags = Feature::ALL.iter().map(|f| (*f, true)).collect();
        Self {
            flags,
            defaults: None,
        }
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        if let Some(enabled) = self.flags.get(&feature) {
            return *enabled;
        }
        self.defaults
            .as_ref()
            .and_then(|defaults| defaults.get(&feature).copied())
            .unwrap_or(true)
    }

    /// String-keyed lookup. Unknown names are enabled.
    pub fn is_enabled_name(&self, name: &str) -> bool {
        name.parse::<Feature>()
            .map(|feature| self.is_enabled(feature))
            .unwrap_or(true)
    }

    /// Flags backed by an actual record (or the admin bundle).
    pub fn explicit(&self) -> &BTreeMap<Feature, bool> {
        &self.flags
    }

    /// Effective value of every known feature.
    pub fn effective(&self) -> BTreeMap<Feature, bool> {
        Feature::ALL
            .iter()
            .map(|f| (*f, self.is_enabled(*f)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, enabled: bool) -> FeatureFlag {
        FeatureFlag {
            organization_id: Uuid::nil(),
            feature_name: name.into(),
            is_enabled: enabled,
        }
    }

    #[test]
    fn absent_flags_fail_open() {
        let flags = FeatureFlags::from_records(std::iter::empty());
        for feature in Feature::ALL {
            assert!(flags.is_enabled(feature));
        }
    }

    #[test]
    fn records_override_fail_open() {
        let records = vec![record("chatbots", false), record("analytics", true)];
        let flags = FeatureFlags::from_records(&records);
        assert!(!flags.is_enabled(Feature::Chatbots));
        assert!(flags.is_enabled(Feature::Analytics));
        assert!(flags.is_enabled(Feature::LeadScoring));
    }

    #[test]
    fn explicit_defaults_apply_only_when_absent() {
        let records = vec![record("chatbots", true)];
        let defaults = BTreeMap::from([(Feature::Chatbots, false), (Feature::LeadScoring, false)]);
        let flags = FeatureFlags::from_records(&records).with_defaults(defaults);
        assert!(flags.is_enabled(Feature::Chatbots));
        assert!(!flags.is_enabled(Feature::LeadScoring));
        assert!(flags.is_enabled(Feature::Analytics));
    }

    #[test]
    fn unknown_records_are_ignored() {
        let records = vec![record("voice_agent", false)];
        let flags = FeatureFlags::from_records(&records);
        assert!(flags.explicit().is_empty());
        assert!(flags.is_enabled_name("voice_agent"));
    }

    #[test]
    fn serializes_as_flat_effective_map() {
        let records = vec![record("chatbots", false)];
        let flags = FeatureFlags::from_records(&records);
        let value = serde_json::to_value(&flags).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "lead_scoring": true,
                "chatbots": false,
                "analytics": true,
            })
        );

        let parsed: FeatureFlags = serde_json::from_value(value).unwrap();
        assert!(!parsed.is_enabled(Feature::Chatbots));
        assert_eq!(parsed.effective(), flags.effective());
    }

    #[test]
    fn admin_bundle_enables_everything() {
        let flags = FeatureFlags::admin_defaults();
        let expected = BTreeMap::from([
            (Feature::LeadScoring, true),
            (Feature::Chatbots, true),
            (Feature::Analytics, true),
        ]);
        assert_eq!(flags.explicit(), &expected);
        assert_eq!(flags.effective(), expected);
    }
}
