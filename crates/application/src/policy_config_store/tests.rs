use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use flood_control_core::{AppError, AppResult};
use flood_control_domain::{
    ALLOWED_LIMITS, ALLOWED_WINDOWS, ConfigGroup, ConfigKey, FloodPolicy, PolicyName,
};
use tokio::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

use super::{PolicyConfigStore, PolicyUpdate};
use crate::flood_control_ports::{ConfigBackend, ConfigChangeSet};

#[derive(Default)]
struct FakeConfigBackend {
    values: Mutex<HashMap<ConfigKey, i64>>,
    commits: Mutex<Vec<ConfigGroup>>,
    failing_group: Option<ConfigGroup>,
}

impl FakeConfigBackend {
    fn seeded() -> Self {
        let mut values = HashMap::new();
        for name in PolicyName::all() {
            let policy = name.default_policy();
            values.insert(name.limit_key(), i64::from(policy.limit().value()));
            values.insert(name.window_key(), i64::from(policy.window().seconds()));
        }

        Self {
            values: Mutex::new(values),
            ..Self::default()
        }
    }

    fn failing_on(group: ConfigGroup) -> Self {
        Self {
            failing_group: Some(group),
            ..Self::seeded()
        }
    }
}

#[async_trait]
impl ConfigBackend for FakeConfigBackend {
    async fn read(&self, key: ConfigKey) -> AppResult<Option<i64>> {
        Ok(self.values.lock().await.get(&key).copied())
    }

    async fn commit(&self, changes: ConfigChangeSet) -> AppResult<()> {
        if self.failing_group == Some(changes.group()) {
            return Err(AppError::Unavailable("backend offline".to_owned()));
        }

        let mut values = self.values.lock().await;
        for (key, value) in changes.writes() {
            values.insert(*key, *value);
        }
        self.commits.lock().await.push(changes.group());

        Ok(())
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        self.0
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn store_with(backend: &Arc<FakeConfigBackend>) -> PolicyConfigStore {
    PolicyConfigStore::new(backend.clone())
}

fn policy_values(policy: FloodPolicy) -> (u32, u32) {
    (policy.limit().value(), policy.window().seconds())
}

#[tokio::test]
async fn set_policy_reads_back_and_leaves_other_policies_alone() {
    let backend = Arc::new(FakeConfigBackend::seeded());
    let store = store_with(&backend);

    let saved = store.set_policy("login_ip", 10, 300).await;
    assert!(saved.is_ok());

    let login_ip = store.get_policy("login_ip").await;
    assert!(login_ip.is_ok());
    assert_eq!(
        login_ip.map(policy_values).unwrap_or_default(),
        (10, 300)
    );

    let contact = store.set_policy("contact", 5, 0).await;
    assert!(contact.is_ok());
    assert!(contact.is_ok_and(|policy| policy.window().is_disabled()));

    let login_ip = store.get_policy("login_ip").await;
    assert_eq!(
        login_ip.map(policy_values).unwrap_or_default(),
        (10, 300)
    );

    let login_user = store.policy(PolicyName::LoginUser).await;
    assert_eq!(
        login_user.map(policy_values).unwrap_or_default(),
        (5, 21600)
    );
}

#[tokio::test]
async fn every_allowed_limit_is_accepted() {
    let backend = Arc::new(FakeConfigBackend::seeded());
    let store = store_with(&backend);

    for limit in ALLOWED_LIMITS {
        let saved = store.set_policy("login_user", *limit, 3600).await;
        assert!(saved.is_ok());

        let stored = store.get_policy("login_user").await;
        assert_eq!(
            stored.map(|policy| policy.limit().value()).unwrap_or_default(),
            *limit
        );
    }
}

#[tokio::test]
async fn every_allowed_window_including_disabled_is_accepted() {
    let backend = Arc::new(FakeConfigBackend::seeded());
    let store = store_with(&backend);

    for window in store.allowed_windows(true) {
        let saved = store.set_policy("contact", 5, window).await;
        assert!(saved.is_ok());
        assert_eq!(
            saved.map(|policy| policy.window().seconds()).unwrap_or(u32::MAX),
            window
        );
    }
}

#[tokio::test]
async fn out_of_domain_values_are_rejected_without_writes() {
    let backend = Arc::new(FakeConfigBackend::seeded());
    let store = store_with(&backend);

    for limit in [0, 11, 501] {
        let result = store.set_policy("login_ip", limit, 300).await;
        assert!(matches!(
            result,
            Err(AppError::InvalidValue { ref field, .. }) if field == "limit"
        ));
    }

    for window in [45, 99_999] {
        let result = store.set_policy("login_ip", 10, window).await;
        assert!(matches!(
            result,
            Err(AppError::InvalidValue { ref field, .. }) if field == "window"
        ));
    }

    assert!(backend.commits.lock().await.is_empty());
    let login_ip = store.get_policy("login_ip").await;
    assert_eq!(
        login_ip.map(policy_values).unwrap_or_default(),
        (50, 3600)
    );
}

#[tokio::test]
async fn unknown_policy_name_is_not_found() {
    let backend = Arc::new(FakeConfigBackend::seeded());
    let store = store_with(&backend);

    let read = store.get_policy("unknown_name").await;
    assert!(matches!(read, Err(AppError::NotFound(_))));

    let write = store.set_policy("unknown_name", 10, 300).await;
    assert!(matches!(write, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn partial_update_keeps_the_omitted_field() {
    let backend = Arc::new(FakeConfigBackend::seeded());
    let store = store_with(&backend);

    let updated = store
        .update_policy(
            PolicyName::LoginUser,
            PolicyUpdate {
                limit: Some(9),
                window: None,
            },
        )
        .await;

    assert_eq!(updated.map(policy_values).unwrap_or_default(), (9, 21600));
}

#[tokio::test]
async fn empty_update_performs_no_write() {
    let backend = Arc::new(FakeConfigBackend::seeded());
    let store = store_with(&backend);

    let updated = store
        .update_policy(PolicyName::Contact, PolicyUpdate::default())
        .await;

    assert!(updated.is_ok());
    assert!(backend.commits.lock().await.is_empty());
}

#[tokio::test]
async fn batch_commits_one_change_set_per_group() {
    let backend = Arc::new(FakeConfigBackend::seeded());
    let store = store_with(&backend);

    let updated = store
        .apply_updates(&[
            (PolicyName::Contact, PolicyUpdate::full(20, 600)),
            (PolicyName::LoginIp, PolicyUpdate::full(100, 900)),
            (PolicyName::LoginUser, PolicyUpdate::full(3, 1800)),
        ])
        .await;

    assert_eq!(updated.map(|policies| policies.len()).unwrap_or_default(), 3);
    assert_eq!(
        *backend.commits.lock().await,
        vec![ConfigGroup::UserFlood, ConfigGroup::ContactSettings]
    );
}

#[tokio::test]
async fn invalid_batch_entry_blocks_every_write() {
    let backend = Arc::new(FakeConfigBackend::seeded());
    let store = store_with(&backend);

    let result = store
        .apply_updates(&[
            (PolicyName::LoginIp, PolicyUpdate::full(10, 300)),
            (PolicyName::Contact, PolicyUpdate::full(11, 300)),
        ])
        .await;

    assert!(matches!(result, Err(AppError::InvalidValue { .. })));
    assert!(backend.commits.lock().await.is_empty());
}

#[tokio::test]
async fn later_group_failure_keeps_earlier_group_committed() {
    let backend = Arc::new(FakeConfigBackend::failing_on(ConfigGroup::ContactSettings));
    let store = store_with(&backend);

    let result = store
        .apply_updates(&[
            (PolicyName::LoginIp, PolicyUpdate::full(10, 300)),
            (PolicyName::Contact, PolicyUpdate::full(20, 600)),
        ])
        .await;
    assert!(matches!(result, Err(AppError::Unavailable(_))));

    let login_ip = store.get_policy("login_ip").await;
    assert_eq!(
        login_ip.map(policy_values).unwrap_or_default(),
        (10, 300)
    );
    let contact = store.get_policy("contact").await;
    assert_eq!(contact.map(policy_values).unwrap_or_default(), (5, 3600));
}

#[tokio::test]
async fn unseeded_or_corrupted_values_are_internal_errors() {
    let backend = Arc::new(FakeConfigBackend::default());
    let store = store_with(&backend);

    let unseeded = store.get_policy("contact").await;
    assert!(matches!(unseeded, Err(AppError::Internal(_))));

    backend
        .values
        .lock()
        .await
        .extend([
            (PolicyName::Contact.limit_key(), 11_i64),
            (PolicyName::Contact.window_key(), 60_i64),
        ]);
    let corrupted = store.get_policy("contact").await;
    assert!(matches!(corrupted, Err(AppError::Internal(_))));
}

#[test]
fn value_domains_are_exposed_in_order() {
    let store = PolicyConfigStore::new(Arc::new(FakeConfigBackend::default()));

    assert_eq!(store.allowed_limits(), ALLOWED_LIMITS);
    let windows = store.allowed_windows(true);
    assert_eq!(windows.first(), Some(&0));
    assert_eq!(&windows[1..], ALLOWED_WINDOWS);
    assert_eq!(store.allowed_windows(false), ALLOWED_WINDOWS);
    assert_eq!(store.list_policy_names().len(), 3);
}

#[test]
fn window_labels_are_readable() {
    let store = PolicyConfigStore::new(Arc::new(FakeConfigBackend::default()));

    assert_eq!(store.format_window(0), "None (disabled)");
    assert_eq!(store.format_window(60), "1 minute");
    assert_ne!(store.format_window(60), store.format_window(86400));

    let options = store.window_options(true);
    assert_eq!(options.len(), ALLOWED_WINDOWS.len() + 1);
    assert_eq!(options[0].label, "None (disabled)");
    assert_eq!(store.limit_options()[20].label, "500");
}

#[tokio::test]
async fn committed_updates_log_the_stored_policy_values() {
    let backend = Arc::new(FakeConfigBackend::seeded());
    let store = store_with(&backend);
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let updated = store
        .update_policy(
            PolicyName::LoginIp,
            PolicyUpdate {
                limit: Some(10),
                window: None,
            },
        )
        .await;
    assert!(updated.is_ok());

    let output = logs.contents();
    assert!(output.contains("flood control policy stored"));
    assert!(output.contains("group=user.flood"));
    assert!(output.contains("policy=login_ip"));
    assert!(output.contains("limit=10"));
    assert!(output.contains("window=3600"));
}
