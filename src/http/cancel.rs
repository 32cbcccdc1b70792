use tokio::sync::watch;

/// Generation counter shared by every request of one client.
///
/// Requests capture the generation current when they start; advancing the
/// counter supersedes all of them at once.
#[derive(Debug)]
pub(super) struct Cancellation {
    generation: watch::Sender<u64>,
}

impl Cancellation {
    pub(super) fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self { generation }
    }

    pub(super) fn token(&self) -> CancelToken {
        let receiver = self.generation.subscribe();
        let generation = *receiver.borrow();
        CancelToken {
            generation,
            receiver,
        }
    }

    /// Supersedes the current generation and returns the new one.
    pub(super) fn cancel(&self) -> u64 {
        let mut next = 0;
        self.generation.send_modify(|current| {
            *current = current.wrapping_add(1);
            next = *current;
        });
        next
    }

    pub(super) fn current(&self) -> u64 {
        *self.generation.borrow()
    }
}

#[derive(Debug)]
pub(super) struct CancelToken {
    generation: u64,
    receiver: watch::Receiver<u64>,
}

impl CancelToken {
    pub(super) const fn generation(&self) -> u64 {
        self.generation
    }

    pub(super) fn is_cancelled(&self) -> bool {
        *self.receiver.borrow() != self.generation
    }

    /// Resolves once a newer generation has been issued.
    pub(super) async fn cancelled(&mut self) {
        let generation = self.generation;
        if self
            .receiver
            .wait_for(|current| *current != generation)
            .await
            .is_err()
        {
            // Sender gone: the owning client was dropped, nothing can cancel us.
            std::future::pending::<()>().await;
        }
    }
}
