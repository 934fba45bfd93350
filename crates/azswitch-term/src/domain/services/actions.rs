use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time;
use tokio_util::sync::CancellationToken;

use super::app_state::DIRECTORY_SWITCHED;
use super::app_state::SUBSCRIPTION_SWITCHED;
use crate::domain::models::AccountError;
use crate::domain::models::AccountService;
use crate::domain::models::AccountServiceBox;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Snapshot;

/// Deadlines applied to every action. Expiry is reported as a failure event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTimeouts {
    pub command: Duration,
    pub login: Duration,
}

impl Default for ActionTimeouts {
    fn default() -> ActionTimeouts {
        return ActionTimeouts {
            command: Duration::from_secs(60),
            login: Duration::from_secs(300),
        };
    }
}

async fn with_deadline<T>(
    operation: &str,
    deadline: Duration,
    fut: impl Future<Output = Result<T, AccountError>>,
) -> Result<T, AccountError> {
    match time::timeout(deadline, fut).await {
        Ok(res) => return res,
        Err(_) => {
            return Err(AccountError::operation_failed(format!(
                "{operation} timed out after {}s",
                deadline.as_secs()
            )));
        }
    }
}

/// Current account, subscriptions and tenants, in that order. The first
/// failure stops the remaining calls.
pub async fn load_all(service: &dyn AccountService) -> Result<Snapshot, AccountError> {
    let account = service.current_account().await?;
    let subscriptions = service.list_subscriptions().await?;
    let tenants = service.list_tenants().await?;

    return Ok(Snapshot {
        account,
        subscriptions,
        tenants,
    });
}

/// Runs one action to completion and returns the single event it produces.
pub async fn run_action(
    service: &dyn AccountService,
    action: Action,
    timeouts: ActionTimeouts,
) -> Event {
    match action {
        Action::LoadAll => {
            match with_deadline("loading account data", timeouts.command, load_all(service)).await {
                Ok(snapshot) => return Event::DataLoaded(snapshot),
                Err(err) => return Event::LoadFailed(err),
            }
        }
        Action::SwitchSubscription(id) => {
            let res = with_deadline(
                "switching subscription",
                timeouts.command,
                service.set_subscription(&id),
            )
            .await;
            match res {
                Ok(()) => return Event::SwitchSucceeded(SUBSCRIPTION_SWITCHED.to_string()),
                Err(err) => return Event::SwitchFailed(err),
            }
        }
        Action::SwitchTenant(id) => {
            let res = with_deadline(
                "directory login",
                timeouts.login,
                service.login_to_tenant(&id),
            )
            .await;
            match res {
                Ok(()) => return Event::SwitchSucceeded(DIRECTORY_SWITCHED.to_string()),
                Err(err) => return Event::SwitchFailed(err),
            }
        }
    }
}

pub struct ActionsService {}

impl ActionsService {
    /// Executes actions as independent tasks until cancelled or until the
    /// action channel closes. Each task reports exactly one event. Tasks still
    /// running at that point are aborted and never report.
    pub async fn start(
        service: AccountServiceBox,
        timeouts: ActionTimeouts,
        event_tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let mut workers: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(in_flight = workers.len(), "actions service cancelled");
                    workers.abort_all();
                    return Ok(());
                }
                action = rx.recv() => {
                    let Some(action) = action else {
                        tracing::debug!("action channel closed");
                        workers.abort_all();
                        return Ok(());
                    };

                    tracing::info!(?action, "dispatching action");
                    let worker_service = service.clone();
                    let worker_event_tx = event_tx.clone();
                    workers.spawn(async move {
                        let event = run_action(worker_service.as_ref(), action, timeouts).await;
                        tracing::info!(?event, "action finished");
                        if worker_event_tx.send(event).is_err() {
                            tracing::debug!("event receiver dropped, discarding completion");
                        }
                    });
                }
                Some(res) = workers.join_next(), if !workers.is_empty() => {
                    if let Err(err) = res {
                        if err.is_panic() {
                            tracing::error!(error = %err, "action worker panicked");
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::models::Account;
    use crate::domain::models::Subscription;
    use crate::domain::models::Tenant;

    struct MockAccountService {
        account: Result<Account, AccountError>,
        subscriptions: Result<Vec<Subscription>, AccountError>,
        tenants: Result<Vec<Tenant>, AccountError>,
        switch: Result<(), AccountError>,
        delay: Duration,
        calls: Mutex<Vec<String>>,
    }

    impl MockAccountService {
        fn ok() -> MockAccountService {
            return MockAccountService {
                account: Ok(Account {
                    id: "sub-1".to_string(),
                    tenant_id: "tid-1".to_string(),
                    ..Default::default()
                }),
                subscriptions: Ok(vec![Subscription {
                    id: "sub-1".to_string(),
                    is_default: true,
                    ..Default::default()
                }]),
                tenants: Ok(vec![Tenant {
                    tenant_id: "tid-1".to_string(),
                    ..Default::default()
                }]),
                switch: Ok(()),
                delay: Duration::ZERO,
                calls: Mutex::new(vec![]),
            };
        }

        fn calls(&self) -> Vec<String> {
            return self.calls.lock().unwrap().clone();
        }

        async fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
            if !self.delay.is_zero() {
                time::sleep(self.delay).await;
            }
        }
    }

    #[async_trait]
    impl AccountService for MockAccountService {
        async fn check_installed(&self) -> Result<(), AccountError> {
            return Ok(());
        }

        async fn current_account(&self) -> Result<Account, AccountError> {
            self.record("current_account".to_string()).await;
            return self.account.clone();
        }

        async fn list_subscriptions(&self) -> Result<Vec<Subscription>, AccountError> {
            self.record("list_subscriptions".to_string()).await;
            return self.subscriptions.clone();
        }

        async fn list_tenants(&self) -> Result<Vec<Tenant>, AccountError> {
            self.record("list_tenants".to_string()).await;
            return self.tenants.clone();
        }

        async fn set_subscription(&self, id_or_name: &str) -> Result<(), AccountError> {
            self.record(format!("set_subscription:{id_or_name}")).await;
            return self.switch.clone();
        }

        async fn login_to_tenant(&self, tenant_id: &str) -> Result<(), AccountError> {
            self.record(format!("login_to_tenant:{tenant_id}")).await;
            return self.switch.clone();
        }
    }

    #[tokio::test]
    async fn test_load_all_calls_in_order() {
        let service = MockAccountService::ok();

        let event = run_action(&service, Action::LoadAll, ActionTimeouts::default()).await;
        match event {
            Event::DataLoaded(snapshot) => {
                assert_eq!(snapshot.account.id, "sub-1");
                assert_eq!(snapshot.subscriptions.len(), 1);
                assert_eq!(snapshot.tenants.len(), 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(
            service.calls(),
            vec!["current_account", "list_subscriptions", "list_tenants"]
        );
    }

    #[tokio::test]
    async fn test_load_all_stops_at_first_failure() {
        let err = AccountError::operation_failed("azure CLI command failed: denied");
        let service = MockAccountService {
            subscriptions: Err(err.clone()),
            ..MockAccountService::ok()
        };

        let event = run_action(&service, Action::LoadAll, ActionTimeouts::default()).await;
        assert_eq!(event, Event::LoadFailed(err));
        assert_eq!(service.calls(), vec!["current_account", "list_subscriptions"]);
    }

    #[tokio::test]
    async fn test_load_all_reports_unauthenticated() {
        let service = MockAccountService {
            account: Err(AccountError::Unauthenticated),
            ..MockAccountService::ok()
        };

        let event = run_action(&service, Action::LoadAll, ActionTimeouts::default()).await;
        assert_eq!(event, Event::LoadFailed(AccountError::Unauthenticated));
        assert_eq!(service.calls(), vec!["current_account"]);
    }

    #[tokio::test]
    async fn test_switch_subscription() {
        let service = MockAccountService::ok();
        let event = run_action(
            &service,
            Action::SwitchSubscription("sub-2".to_string()),
            ActionTimeouts::default(),
        )
        .await;
        assert_eq!(event, Event::SwitchSucceeded(SUBSCRIPTION_SWITCHED.to_string()));
        assert_eq!(service.calls(), vec!["set_subscription:sub-2"]);

        let err = AccountError::operation_failed("azure CLI command failed: nope");
        let service = MockAccountService {
            switch: Err(err.clone()),
            ..MockAccountService::ok()
        };
        let event = run_action(
            &service,
            Action::SwitchSubscription("sub-2".to_string()),
            ActionTimeouts::default(),
        )
        .await;
        assert_eq!(event, Event::SwitchFailed(err));
    }

    #[tokio::test]
    async fn test_switch_tenant_logs_in() {
        let service = MockAccountService::ok();
        let event = run_action(
            &service,
            Action::SwitchTenant("tid-2".to_string()),
            ActionTimeouts::default(),
        )
        .await;
        assert_eq!(event, Event::SwitchSucceeded(DIRECTORY_SWITCHED.to_string()));
        assert_eq!(service.calls(), vec!["login_to_tenant:tid-2"]);
    }

    #[tokio::test]
    async fn test_deadline_expiry_is_a_failure() {
        let service = MockAccountService {
            delay: Duration::from_secs(30),
            ..MockAccountService::ok()
        };
        let timeouts = ActionTimeouts {
            command: Duration::from_millis(20),
            login: Duration::from_millis(20),
        };

        let event = run_action(&service, Action::LoadAll, timeouts).await;
        match event {
            Event::LoadFailed(AccountError::OperationFailed(message)) => {
                assert!(message.contains("timed out"));
            }
            other => panic!("unexpected event {other:?}"),
        }

        let event = run_action(&service, Action::SwitchTenant("tid-2".to_string()), timeouts).await;
        assert!(matches!(event, Event::SwitchFailed(_)));
    }

    #[tokio::test]
    async fn test_start_reports_completion_events() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
        let cancel = CancellationToken::new();

        let service: AccountServiceBox = Arc::new(MockAccountService::ok());
        let worker_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            ActionsService::start(
                service,
                ActionTimeouts::default(),
                event_tx,
                &mut action_rx,
                worker_cancel,
            )
            .await
        });

        action_tx.send(Action::LoadAll).unwrap();
        assert!(matches!(event_rx.recv().await, Some(Event::DataLoaded(_))));

        action_tx
            .send(Action::SwitchSubscription("sub-2".to_string()))
            .unwrap();
        assert_eq!(
            event_rx.recv().await,
            Some(Event::SwitchSucceeded(SUBSCRIPTION_SWITCHED.to_string()))
        );

        cancel.cancel();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_cancel_discards_in_flight_actions() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
        let cancel = CancellationToken::new();

        let mock = Arc::new(MockAccountService {
            delay: Duration::from_secs(30),
            ..MockAccountService::ok()
        });
        let service: AccountServiceBox = mock.clone();
        let worker_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            ActionsService::start(
                service,
                ActionTimeouts::default(),
                event_tx,
                &mut action_rx,
                worker_cancel,
            )
            .await
        });

        action_tx.send(Action::LoadAll).unwrap();
        while mock.calls().is_empty() {
            tokio::task::yield_now().await;
        }

        cancel.cancel();
        handle.await.unwrap().unwrap();

        // Every sender is gone once the aborted worker is dropped.
        assert_eq!(event_rx.recv().await, None);
    }
}
