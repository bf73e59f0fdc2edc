// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for per-thing workers and the tick driver.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{sleep, timeout};
use zthing::button::{ButtonConfig, GestureCode};
use zthing::event::ThingEvent;
use zthing::registry::ThingRegistry;
use zthing::runtime::{ThingInput, TickDriver, Worker};
use zthing::sensor::{NotifyMode, SensorConfig, from_fn};
use zthing::types::{Level, SensorType, SensorValue, Tick};
use zthing::Error;

fn fast_button(registry: &ThingRegistry) -> zthing::Handle {
    let config = ButtonConfig::default()
        .with_click_ticks(30)
        .with_press_ticks(20)
        .with_debounce_ticks(0);
    registry.create_button("btn", Some(config)).unwrap()
}

// ============================================================================
// Worker
// ============================================================================

mod worker {
    use super::*;

    #[tokio::test]
    async fn inputs_are_applied_in_order() {
        let registry = ThingRegistry::new();
        let handle = fast_button(&registry);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        registry
            .callbacks()
            .on_gesture(move |g| s.lock().push((g.tick, g.code)));

        let worker = Worker::spawn(registry.lookup(handle).unwrap());
        let tx = worker.sender();
        worker
            .send(ThingInput::Edge { pin: 0, level: Level::High, now: 0 })
            .await
            .unwrap();
        worker
            .send(ThingInput::Edge { pin: 0, level: Level::Low, now: 5 })
            .await
            .unwrap();
        for now in 6..=35 {
            worker.send(ThingInput::Tick(now)).await.unwrap();
        }
        worker.send(ThingInput::Close).await.unwrap();
        worker.join().await;

        assert_eq!(
            *seen.lock(),
            vec![
                (0, GestureCode::Down),
                (5, GestureCode::Up),
                (35, GestureCode::Click)
            ]
        );
        assert!(registry.lookup(handle).is_none());
        assert!(tx.send(ThingInput::Tick(36)).await.is_err());
    }

    #[tokio::test]
    async fn worker_stops_when_thing_closed_elsewhere() {
        let registry = ThingRegistry::new();
        let handle = fast_button(&registry);
        let worker = Worker::spawn(registry.lookup(handle).unwrap());

        registry.close(handle).unwrap();
        worker.send(ThingInput::Tick(1)).await.unwrap();
        let tx = worker.sender();
        timeout(Duration::from_secs(1), worker.join()).await.unwrap();

        let err = tx.try_send(ThingInput::Tick(2)).unwrap_err();
        assert!(matches!(err, tokio::sync::mpsc::error::TrySendError::Closed(_)));
    }

    #[tokio::test]
    async fn close_event_reaches_broadcast_subscribers() {
        let registry = ThingRegistry::new();
        let mut events = registry.subscribe();
        let handle = fast_button(&registry);
        let worker = Worker::spawn(registry.lookup(handle).unwrap());

        worker.send(ThingInput::Close).await.unwrap();
        worker.join().await;

        let created = events.recv().await.unwrap();
        assert!(matches!(created, ThingEvent::Created { .. }));
        let closed = events.recv().await.unwrap();
        assert_eq!(closed, ThingEvent::closed(handle, "btn"));
    }

    #[tokio::test]
    async fn try_send_after_stop_fails() {
        let registry = ThingRegistry::new();
        let handle = fast_button(&registry);
        let worker = Worker::spawn(registry.lookup(handle).unwrap());
        worker.send(ThingInput::Close).await.unwrap();
        sleep(Duration::from_millis(10)).await;

        assert!(matches!(
            worker.try_send(ThingInput::Tick(1)),
            Err(Error::ChannelClosed(_))
        ));
        assert!(matches!(
            worker.send(ThingInput::Tick(1)).await,
            Err(Error::ChannelClosed(_))
        ));
        worker.join().await;
    }

    #[tokio::test]
    async fn full_queue_is_not_reported_as_closed() {
        let registry = ThingRegistry::new();
        let handle = fast_button(&registry);
        // Current-thread runtime: the worker cannot drain until we yield.
        let worker = Worker::with_capacity(registry.lookup(handle).unwrap(), 1);

        worker.try_send(ThingInput::Tick(1)).unwrap();
        assert!(matches!(
            worker.try_send(ThingInput::Tick(2)),
            Err(Error::QueueFull)
        ));

        worker.send(ThingInput::Close).await.unwrap();
        worker.join().await;
        assert!(registry.lookup(handle).is_none());
    }
}

// ============================================================================
// Tick driver
// ============================================================================

mod tick_driver {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn polling_sensor_reads_on_driven_ticks() {
        let registry = ThingRegistry::new();
        let mut count = 0;
        let handle = registry
            .create_sensor(
                "counter",
                SensorType::Integer,
                Some(SensorConfig::default().with_notify_mode(NotifyMode::Always)),
                from_fn(move || {
                    count += 1;
                    Ok(SensorValue::Integer(count))
                }),
            )
            .unwrap();
        registry.sensor(handle).unwrap().set_polling(10).unwrap();

        let mut events = registry.subscribe();
        let worker = Worker::spawn(registry.lookup(handle).unwrap());
        let driver = TickDriver::spawn(Duration::from_millis(1), vec![worker.sender()]);

        let mut ticks: Vec<Tick> = Vec::new();
        while ticks.len() < 3 {
            let event = timeout(Duration::from_secs(1), events.recv())
                .await
                .unwrap()
                .unwrap();
            if let ThingEvent::StateUpdated(update) = event {
                let expected = i64::try_from(ticks.len()).unwrap() + 1;
                assert_eq!(update.value, SensorValue::Integer(expected));
                ticks.push(update.tick);
            }
        }
        assert_eq!(ticks, vec![10, 20, 30]);
        assert!(driver.now() >= 30);

        driver.stop();
        worker.send(ThingInput::Close).await.unwrap();
        worker.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn driver_ends_when_all_workers_stop() {
        let registry = ThingRegistry::new();
        let handle = fast_button(&registry);
        let worker = Worker::spawn(registry.lookup(handle).unwrap());
        let driver = TickDriver::spawn(Duration::from_millis(1), vec![worker.sender()]);

        sleep(Duration::from_millis(5)).await;
        worker.send(ThingInput::Close).await.unwrap();
        worker.join().await;
        sleep(Duration::from_millis(5)).await;

        assert!(driver.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn long_press_from_driven_ticks() {
        let registry = ThingRegistry::new();
        let handle = fast_button(&registry);
        let worker = Worker::spawn(registry.lookup(handle).unwrap());
        let driver = TickDriver::spawn(Duration::from_millis(1), vec![worker.sender()]);

        worker
            .send(ThingInput::Edge { pin: 0, level: Level::High, now: driver.now() })
            .await
            .unwrap();
        sleep(Duration::from_millis(30)).await;

        let button = registry.button(handle).unwrap();
        assert!(button.is_pressed().unwrap());
        assert!(button.press_duration().unwrap() >= 20);

        driver.stop();
        worker.send(ThingInput::Close).await.unwrap();
        worker.join().await;
        assert!(matches!(button.is_pressed(), Err(Error::Closed)));
    }
}
