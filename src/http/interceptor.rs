use super::{ApiResponse, OutgoingRequest};

/// Adjusts a request after headers and body are assembled and before it is
/// sent.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: &mut OutgoingRequest);
}

impl<F> RequestInterceptor for F
where
    F: Fn(&mut OutgoingRequest) + Send + Sync,
{
    fn intercept(&self, request: &mut OutgoingRequest) {
        (self)(request);
    }
}

/// Sees every buffered response before cookies are harvested and the call
/// returns.
pub trait ResponseInterceptor: Send + Sync {
    fn intercept(&self, response: &mut ApiResponse);
}

impl<F> ResponseInterceptor for F
where
    F: Fn(&mut ApiResponse) + Send + Sync,
{
    fn intercept(&self, response: &mut ApiResponse) {
        (self)(response);
    }
}
