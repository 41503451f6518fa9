//! The client side of the privileged-worker channel.
//!
//! [`BrokerChannel`] multiplexes concurrent requests over one frame pair: a
//! router task matches inbound frames to in-flight requests by `op_id`,
//! delivering terminal replies through oneshot slots and progress frames
//! through per-operation senders.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use ferry_core::OpsError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::proto::{ClientFrame, WorkerFrame, WorkerReply, WorkerRequest};

/// Capacity of the frame channels the transport layer hands us.
pub const FRAME_CHANNEL_SIZE: usize = 100;

#[derive(Default)]
struct Shared {
    pending: DashMap<Uuid, oneshot::Sender<WorkerReply>>,
    progress: DashMap<Uuid, mpsc::Sender<f32>>,
    closed: AtomicBool,
}

/// A connected channel to the privileged worker.
///
/// Cloneable via `Arc`; every method takes `&self`. Once the worker side
/// hangs up the channel stays closed, all in-flight dispatches fail with
/// [`OpsError::ChannelClosed`], and callers fall back to local execution.
pub struct BrokerChannel {
    outbound: mpsc::Sender<ClientFrame>,
    shared: Arc<Shared>,
}

impl BrokerChannel {
    /// Wire up a channel over a frame pair and start its router task.
    pub fn connect(
        outbound: mpsc::Sender<ClientFrame>,
        mut inbound: mpsc::Receiver<WorkerFrame>,
    ) -> Arc<Self> {
        let shared = Arc::new(Shared::default());

        let router_shared = Arc::clone(&shared);
        tokio::spawn(async move {
            while let Some(frame) = inbound.recv().await {
                match frame {
                    WorkerFrame::Progress { op_id, percent } => {
                        if let Some(tx) = router_shared.progress.get(&op_id) {
                            // A stalled consumer only loses its own updates.
                            let _ = tx.try_send(percent.clamp(0.0, 100.0));
                        }
                    }
                    WorkerFrame::Completed(reply) => {
                        match router_shared.pending.remove(&reply.op_id) {
                            Some((_, slot)) => {
                                let _ = slot.send(reply);
                            }
                            None => {
                                warn!(op_id = %reply.op_id, "reply for unknown operation dropped");
                            }
                        }
                    }
                }
            }
            // Worker hung up. Fail everything still in flight.
            router_shared.closed.store(true, Ordering::SeqCst);
            router_shared.pending.clear();
            debug!("broker channel closed");
        });

        Arc::new(Self { outbound, shared })
    }

    /// Whether the worker side has hung up.
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst) || self.outbound.is_closed()
    }

    /// Send one request and await its terminal reply.
    pub async fn dispatch(&self, request: WorkerRequest) -> Result<WorkerReply, OpsError> {
        if self.is_closed() {
            return Err(OpsError::ChannelClosed);
        }

        let op_id = request.op_id;
        let (slot_tx, slot_rx) = oneshot::channel();
        self.shared.pending.insert(op_id, slot_tx);

        if self
            .outbound
            .send(ClientFrame::Request(request))
            .await
            .is_err()
        {
            self.shared.pending.remove(&op_id);
            return Err(OpsError::ChannelClosed);
        }

        // The slot sender is dropped without a value when the router drains
        // pending entries at teardown.
        slot_rx.await.map_err(|_| OpsError::ChannelClosed)
    }

    /// Route progress frames for `op_id` into `tx` until the guard drops.
    pub fn register_progress(
        self: &Arc<Self>,
        op_id: Uuid,
        tx: mpsc::Sender<f32>,
    ) -> ProgressGuard {
        self.shared.progress.insert(op_id, tx);
        ProgressGuard {
            channel: Arc::clone(self),
            op_id,
        }
    }

    /// Ask the worker to cancel an in-flight request. Advisory; the request
    /// still completes with a terminal reply.
    pub fn cancel(&self, op_id: Uuid) {
        let _ = self.outbound.try_send(ClientFrame::Cancel { op_id });
    }
}

/// Unregisters a progress route on drop.
pub struct ProgressGuard {
    channel: Arc<BrokerChannel>,
    op_id: Uuid,
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.channel.shared.progress.remove(&self.op_id);
    }
}
