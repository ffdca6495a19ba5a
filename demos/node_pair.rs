//! Two nodes on an in-process radio: a sensor reports readings and a
//! gateway answers with acknowledgments.
//!
//! Run with `RUST_LOG=peerlink=debug cargo run --example node_pair`
//! to see the messenger's own logs.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::Duration;

use peerlink::messenger::KindRouter;
use peerlink::transport::{LinkEvents, Transport, TransportError};
use peerlink::{MacAddress, Message, MessageKind, Messenger};
use tracing::{info, warn};

enum AirEvent {
    Frame {
        from: MacAddress,
        to: MacAddress,
        bytes: Vec<u8>,
    },
    Stop,
}

type Stations = Arc<RwLock<HashMap<MacAddress, Arc<dyn LinkEvents>>>>;

/// Radio that hands frames to a dispatcher thread.
struct ChannelRadio {
    local: MacAddress,
    air: Mutex<Sender<AirEvent>>,
}

impl Transport for ChannelRadio {
    fn local_address(&self) -> MacAddress {
        self.local
    }

    fn transmit(&self, destination: MacAddress, frame: &[u8]) -> Result<(), TransportError> {
        let air = self.air.lock().map_err(|_| TransportError::Busy)?;
        air.send(AirEvent::Frame {
            from: self.local,
            to: destination,
            bytes: frame.to_vec(),
        })
        .map_err(|_| TransportError::NotStarted)
    }
}

fn dispatch(rx: Receiver<AirEvent>, stations: Stations) {
    while let Ok(AirEvent::Frame { from, to, bytes }) = rx.recv() {
        let stations = stations.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        let receiver = stations.get(&to);
        if let Some(receiver) = receiver {
            receiver.on_receive(from, &bytes);
        }
        if let Some(sender) = stations.get(&from) {
            sender.on_send_complete(to, receiver.is_some());
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let (tx, rx) = mpsc::channel();
    let stations: Stations = Arc::default();
    let dispatcher = {
        let stations = Arc::clone(&stations);
        thread::spawn(move || dispatch(rx, stations))
    };

    let sensor_addr: MacAddress = "24:6F:28:00:00:01".parse()?;
    let gateway_addr: MacAddress = "24:6F:28:00:00:02".parse()?;

    let (acks_tx, acks_rx) = mpsc::channel::<MacAddress>();
    let acks_tx = Mutex::new(acks_tx);
    let router = KindRouter::new()
        .route(MessageKind::SensorData, move |source: MacAddress, message: &Message| {
            info!(%source, reading = message.payload_str(), "gateway got reading");
            if let Ok(acks) = acks_tx.lock() {
                let _ = acks.send(source);
            }
        })
        .fallback(|source: MacAddress, message: &Message| {
            warn!(%source, kind = %message.kind(), "gateway ignoring message");
        });

    let gateway = Arc::new(
        Messenger::builder(ChannelRadio {
            local: gateway_addr,
            air: Mutex::new(tx.clone()),
        })
        .on_message(router)
        .start()?,
    );
    let sensor = Arc::new(
        Messenger::builder(ChannelRadio {
            local: sensor_addr,
            air: Mutex::new(tx.clone()),
        })
        .on_message(|source: MacAddress, message: &Message| {
            info!(%source, kind = %message.kind(), "sensor got reply");
        })
        .on_send_complete(|destination: MacAddress, delivered: bool| {
            info!(%destination, delivered, "sensor send complete");
        })
        .start()?,
    );

    {
        let mut stations = stations.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        stations.insert(gateway_addr, Arc::clone(&gateway) as Arc<dyn LinkEvents>);
        stations.insert(sensor_addr, Arc::clone(&sensor) as Arc<dyn LinkEvents>);
    }

    sensor.register(gateway_addr, "Gateway")?;
    gateway.register(sensor_addr, "Sensor")?;

    for reading in [21.5, 21.7, 22.0] {
        sensor.send_sensor_data(gateway_addr, &format!(r#"{{"t":{reading}}}"#))?;
        let source = acks_rx.recv_timeout(Duration::from_secs(1))?;
        gateway.send_ack(source, r#"{"ok":true}"#)?;
    }
    sensor.send(gateway_addr, MessageKind::TimeSync, b"{}")?;
    thread::sleep(Duration::from_millis(50));

    sensor.log_peers();
    gateway.log_peers();
    info!(sensor = ?sensor.stats(), gateway = ?gateway.stats(), "done");

    stations.write().unwrap_or_else(std::sync::PoisonError::into_inner).clear();
    let _ = tx.send(AirEvent::Stop);
    dispatcher.join().map_err(|_| "dispatcher panicked")?;
    Ok(())
}
