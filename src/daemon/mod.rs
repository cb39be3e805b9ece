use std::path::PathBuf;

use accumulation::{tick_event::TickEvent, ticker::TickModule};
use anyhow::Result;
use config::AccumulatorConfig;
use processing::{log_observer::LoggingObserver, ProcessingModule};
use storage::{
    counter_storage::{CounterStorage, JsonCounterStorage},
    entities::DayCounts,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::utils::{
    clock::{Clock, DefaultClock},
    dir::data_file_path,
};

pub mod accumulation;
pub mod args;
pub mod config;
pub mod processing;
pub mod shutdown;
pub mod storage;

/// Represents the starting point for the daemon. Runs until Ctrl-C or until persisting fails.
pub async fn start_daemon(dir: PathBuf, config: AccumulatorConfig) -> Result<()> {
    let storage = JsonCounterStorage::new(data_file_path(&dir));
    let counts = storage
        .load()
        .await
        .inspect_err(|e| error!("Failed to load {:?}: {e:?}", storage.path()))?;
    info!(
        "Loaded {} days from {:?}, tracking with {:?}",
        counts.len(),
        storage.path(),
        config
    );

    let shutdown_token = CancellationToken::new();
    run_modules(storage, counts, &shutdown_token, config, DefaultClock).await
}

async fn run_modules<S: CounterStorage>(
    storage: S,
    counts: DayCounts,
    shutdown_token: &CancellationToken,
    config: AccumulatorConfig,
    clock: impl Clock,
) -> Result<()> {
    let (sender, receiver) = mpsc::channel::<TickEvent>(10);

    let ticker = create_ticker(sender, storage, counts, shutdown_token, &config, clock);
    let processor = ProcessingModule::new(receiver, LoggingObserver::new(config.unit));

    let (_, tick_result, ()) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        async {
            let result = ticker.run().await;
            shutdown_token.cancel();
            result
        },
        processor.run(),
    );

    if let Err(e) = &tick_result {
        error!("Tick module got an error {:?}", e);
    }
    tick_result
}

fn create_ticker<S: CounterStorage>(
    sender: mpsc::Sender<TickEvent>,
    storage: S,
    counts: DayCounts,
    shutdown_token: &CancellationToken,
    config: &AccumulatorConfig,
    clock: impl Clock,
) -> TickModule<S> {
    TickModule::new(
        sender,
        storage,
        counts,
        shutdown_token.clone(),
        config.unit,
        config.tick_interval,
        Box::new(clock),
    )
}

#[cfg(test)]
mod daemon_tests {
    use std::{fs, time::Duration};

    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    use crate::{
        daemon::{
            config::AccumulatorConfig,
            run_modules,
            storage::counter_storage::{CounterStorage, JsonCounterStorage},
        },
        utils::{clock::test_clock::TestClock, dir::data_file_path, logging::TEST_LOGGING},
    };

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 7, 4).unwrap()
    }

    /// Smoke test going through the real data file. Runs on real time so it takes a few seconds.
    #[tokio::test]
    async fn smoke_test_daemon() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let path = data_file_path(dir.path());
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, r#"{"2018-07-03": 12, "2018-07-04": 3}"#)?;

        let storage = JsonCounterStorage::new(path.clone());
        let counts = storage.load().await?;
        let shutdown_token = CancellationToken::new();
        let config = AccumulatorConfig::from_seconds(1, 1)?;

        let (_, result) = tokio::join!(
            async {
                tokio::time::sleep(Duration::from_millis(2500)).await;
                shutdown_token.cancel()
            },
            run_modules(
                storage,
                counts,
                &shutdown_token,
                config,
                TestClock::new(test_date())
            ),
        );
        result?;

        let stored = JsonCounterStorage::new(path).load().await?;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored.get(NaiveDate::from_ymd_opt(2018, 7, 3).unwrap()), 12);
        let today = stored.get(test_date());
        assert!((5..=6).contains(&today), "unexpected count {today}");

        Ok(())
    }
}
