use flood_control_domain::{ConfigKey, PolicyName};

/// Stored values of every policy default, keyed by storage location.
pub(crate) fn default_values() -> impl Iterator<Item = (ConfigKey, i64)> {
    PolicyName::all().iter().flat_map(|name| {
        let policy = name.default_policy();
        [
            (name.limit_key(), i64::from(policy.limit().value())),
            (name.window_key(), i64::from(policy.window().seconds())),
        ]
    })
}
