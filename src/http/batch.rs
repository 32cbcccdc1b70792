use futures_util::future::try_join_all;
use tokio::time::Instant;
use tracing::error;

use crate::error::ClientResult;

use super::RequestClient;
use super::request::RequestSpec;
use super::response::Dispatch;

impl RequestClient {
    /// Runs every request concurrently and returns the outcomes in input
    /// order.
    ///
    /// # Errors
    ///
    /// The first failing request fails the whole batch; outcomes of the
    /// other requests are discarded.
    pub async fn send_concurrent_requests(
        &self,
        requests: Vec<RequestSpec>,
    ) -> ClientResult<Vec<Dispatch>> {
        let started = Instant::now();
        let pending = requests.into_iter().map(|request| async move {
            self.make_request(
                request.method,
                &request.path,
                request.payload,
                &request.description,
                started,
                &request.options,
            )
            .await
        });

        try_join_all(pending).await.inspect_err(|err| {
            error!("Error sending concurrent requests: {}", err);
        })
    }
}
