use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rand::distributions::Distribution;

use crate::callback::InnerTransportCallback;
use crate::connection_ref::ConnectionRef;
use crate::core::callback::BoxedTransportCallback;
use crate::core::transport::ConnectionInterface;
use crate::core::transport::DataChannelState;
use crate::core::transport::SdpType;
use crate::core::transport::SessionDescription;
use crate::core::transport::TransportInterface;
use crate::error::Error;
use crate::error::Result;
use crate::ice_server::IceServer;
use crate::pool::Pool;

/// Max delay in ms on sending message
const DUMMY_DELAY_MAX: u64 = 100;
/// Min delay in ms on sending message
const DUMMY_DELAY_MIN: u64 = 0;
/// Config random delay when send message
const SEND_MESSAGE_DELAY: bool = true;
/// Config random delay when channel opening
const CHANNEL_OPEN_DELAY: bool = false;

/// The candidate a [DummyConnection] announces once its offer is answered.
pub const DUMMY_CANDIDATE: &str = "candidate:1 1 udp 2113667326 192.168.1.4 54321 typ host";

/// A dummy connection for local testing.
/// Implements the [ConnectionInterface] trait with no real network.
///
/// It scripts the events a browser peer connection would produce: a
/// negotiation request on creation, a trickled candidate and a data channel
/// open once the answer is applied. Outbound frames are recorded instead of
/// being sent anywhere.
pub struct DummyConnection {
    pub(crate) rand_id: String,
    channel_label: String,
    callback: Arc<InnerTransportCallback>,
    data_channel_state: Arc<Mutex<DataChannelState>>,
    sent_messages: Arc<Mutex<Vec<Bytes>>>,
}

/// [DummyTransport] manages all the [DummyConnection] and
/// provides methods to create, get and close connections.
pub struct DummyTransport {
    pool: Pool<DummyConnection>,
}

impl DummyConnection {
    fn new(label: &str, callback: Arc<InnerTransportCallback>) -> Self {
        Self {
            rand_id: random(0, 10000000000).to_string(),
            channel_label: label.to_string(),
            callback,
            data_channel_state: Arc::new(Mutex::new(DataChannelState::Connecting)),
            sent_messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    async fn set_data_channel_state(&self, state: DataChannelState) {
        let prev = {
            let mut data_channel_state = self.data_channel_state.lock().unwrap();

            if state == *data_channel_state {
                return;
            }

            std::mem::replace(&mut *data_channel_state, state)
        };

        match state {
            DataChannelState::Open => self.callback.on_data_channel_open().await,
            DataChannelState::Closed if prev == DataChannelState::Open => {
                self.callback.on_data_channel_close().await
            }
            _ => {}
        }
    }
}

impl DummyTransport {
    /// Create a new [DummyTransport] instance.
    pub fn new(ice_servers: &str) -> Self {
        let _ice_servers = IceServer::vec_from_str(ice_servers).unwrap();

        Self { pool: Pool::new() }
    }

    fn dummy_connection(&self, cid: &str) -> Result<Arc<DummyConnection>> {
        self.pool.connection(cid)?.upgrade()
    }

    /// The label the data channel of connection `cid` was created with.
    pub fn channel_label(&self, cid: &str) -> Result<String> {
        let conn = self.dummy_connection(cid)?;
        Ok(conn.channel_label.clone())
    }

    /// Frames that were sent over the data channel of connection `cid`,
    /// in sending order.
    pub fn sent_messages(&self, cid: &str) -> Result<Vec<Bytes>> {
        let conn = self.dummy_connection(cid)?;
        let sent_messages = conn.sent_messages.lock().unwrap();
        Ok(sent_messages.clone())
    }

    /// Deliver `msg` to the callback of connection `cid` as if the remote
    /// peer had sent it over the data channel.
    pub async fn emit_message(&self, cid: &str, msg: Bytes) -> Result<()> {
        let conn = self.dummy_connection(cid)?;
        conn.callback.on_message(&msg).await;
        Ok(())
    }

    /// Close the data channel of connection `cid` as if the remote peer had
    /// torn it down.
    pub async fn emit_data_channel_close(&self, cid: &str) -> Result<()> {
        let conn = self.dummy_connection(cid)?;
        conn.set_data_channel_state(DataChannelState::Closed).await;
        Ok(())
    }
}

#[async_trait]
impl ConnectionInterface for DummyConnection {
    type Sdp = SessionDescription;
    type Error = Error;

    async fn webrtc_create_offer(&self) -> Result<Self::Sdp> {
        Ok(SessionDescription {
            sdp_type: SdpType::Offer,
            sdp: format!("dummy offer {}", self.rand_id),
        })
    }

    async fn webrtc_accept_answer(&self, answer: Self::Sdp) -> Result<()> {
        if answer.sdp_type != SdpType::Answer {
            return Err(Error::RemoteSdpNotAnswer);
        }

        self.callback.on_ice_candidate(DUMMY_CANDIDATE).await;

        if CHANNEL_OPEN_DELAY {
            random_delay().await;
        }
        self.set_data_channel_state(DataChannelState::Open).await;

        Ok(())
    }

    async fn send_message(&self, msg: Bytes) -> Result<()> {
        if SEND_MESSAGE_DELAY {
            random_delay().await;
        }

        if self.data_channel_state() != DataChannelState::Open {
            return Err(Error::DataChannelNotOpen);
        }

        let mut sent_messages = self.sent_messages.lock().unwrap();
        sent_messages.push(msg);
        Ok(())
    }

    fn data_channel_state(&self) -> DataChannelState {
        *self.data_channel_state.lock().unwrap()
    }

    async fn close(&self) -> Result<()> {
        self.set_data_channel_state(DataChannelState::Closed).await;
        Ok(())
    }
}

#[async_trait]
impl TransportInterface for DummyTransport {
    type Connection = DummyConnection;
    type Sdp = SessionDescription;
    type Error = Error;

    async fn new_connection(
        &self,
        cid: &str,
        label: &str,
        callback: BoxedTransportCallback,
    ) -> Result<()> {
        if let Ok(existed_conn) = self.pool.connection(cid) {
            if matches!(
                existed_conn.data_channel_state(),
                DataChannelState::Connecting | DataChannelState::Open
            ) {
                return Err(Error::ConnectionAlreadyExists(cid.to_string()));
            }
        }

        let inner_callback = Arc::new(InnerTransportCallback::new(cid, callback));
        let conn = DummyConnection::new(label, inner_callback.clone());

        self.pool.safely_insert(cid, conn)?;
        inner_callback.on_negotiation_needed().await;
        Ok(())
    }

    fn connection(&self, cid: &str) -> Result<ConnectionRef<Self::Connection>> {
        self.pool.connection(cid)
    }

    fn connections(&self) -> Vec<(String, ConnectionRef<Self::Connection>)> {
        self.pool.connections()
    }

    fn connection_ids(&self) -> Vec<String> {
        self.pool.connection_ids()
    }

    async fn close_connection(&self, cid: &str) -> Result<()> {
        self.pool.safely_remove(cid).await
    }
}

async fn random_delay() {
    tokio::time::sleep(Duration::from_millis(random(
        DUMMY_DELAY_MIN,
        DUMMY_DELAY_MAX,
    )))
    .await;
}

fn random(low: u64, high: u64) -> u64 {
    let range = rand::distributions::Uniform::new(low, high);
    let mut rng = rand::thread_rng();
    range.sample(&mut rng)
}
