use super::{Envelope, MqttSettings, Transport, TransportError};
use crate::message::{Message, ProtocolError};
use rumqttc::{AsyncClient, Event, Incoming, MqttOptions, QoS};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Channel carried over one MQTT topic, `scenelens/<channel>`.
///
/// Must be created inside a tokio runtime: the event loop is pumped by a
/// spawned task that forwards decoded messages into an inbox.
pub struct MqttTransport {
    origin: String,
    topic: String,
    client: AsyncClient,
    inbox: mpsc::UnboundedReceiver<Message>,
    pump: Option<JoinHandle<()>>,
}

pub fn topic_for(channel: &str) -> String {
    format!("scenelens/{channel}")
}

impl MqttTransport {
    pub fn connect(settings: &MqttSettings, channel: &str) -> Result<Self, TransportError> {
        let origin = Uuid::new_v4().to_string();
        let topic = topic_for(channel);

        let mut opts = MqttOptions::new(format!("scenelens-{origin}"), settings.host.clone(), settings.port);
        opts.set_keep_alive(Duration::from_secs(settings.keep_alive_secs));
        let (client, mut eventloop) = AsyncClient::new(opts, 64);
        client.try_subscribe(topic.clone(), QoS::AtLeastOnce)?;

        let (tx, inbox) = mpsc::unbounded_channel();
        let pump_topic = topic.clone();
        let pump_origin = origin.clone();
        let pump = tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Incoming::Publish(p))) if p.topic == pump_topic => {
                        match serde_json::from_slice::<Envelope>(&p.payload) {
                            Ok(envelope) if envelope.origin == pump_origin => {}
                            Ok(envelope) => {
                                if tx.send(envelope.message).is_err() {
                                    debug!("[mqtt] inbox dropped, stopping pump");
                                    return;
                                }
                            }
                            Err(e) => warn!("[mqtt] invalid payload on {}: {e}", p.topic),
                        }
                    }
                    Ok(Event::Incoming(Incoming::ConnAck(_))) => info!("[mqtt] connected, topic {pump_topic}"),
                    Ok(_) => {}
                    Err(e) => {
                        error!("[mqtt] connection error: {e:?}");
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            }
        });

        Ok(Self {
            origin,
            topic,
            client,
            inbox,
            pump: Some(pump),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl Transport for MqttTransport {
    fn post(&self, message: &Message) -> Result<(), TransportError> {
        if self.pump.is_none() {
            return Err(TransportError::Closed);
        }
        let envelope = Envelope {
            origin: self.origin.clone(),
            message: message.clone(),
        };
        let payload = serde_json::to_vec(&envelope).map_err(ProtocolError::from)?;
        self.client.try_publish(self.topic.clone(), QoS::AtLeastOnce, false, payload)?;
        Ok(())
    }

    async fn recv(&mut self) -> Option<Message> {
        self.inbox.recv().await
    }

    fn try_recv(&mut self) -> Option<Message> {
        self.inbox.try_recv().ok()
    }

    fn close(&mut self) {
        if let Some(pump) = self.pump.take() {
            if let Err(e) = self.client.try_disconnect() {
                debug!("[mqtt] disconnect: {e:?}");
            }
            pump.abort();
        }
        self.inbox.close();
    }

    fn is_open(&self) -> bool {
        self.pump.is_some()
    }
}

impl Drop for MqttTransport {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}
