use bytes::Bytes;

use crate::error::Result;

/// Sends one serialized request and returns the raw response document.
///
/// Implementations are blocking. One call is one request/response exchange;
/// the caller never expects an implementation to retry on its behalf, but an
/// implementation may apply its own timeout policy.
pub trait Transport {
    /// Deliver `request` and return the response body.
    fn send(&mut self, request: Bytes) -> Result<Bytes>;
}

impl<F> Transport for F
where
    F: FnMut(Bytes) -> Result<Bytes>,
{
    fn send(&mut self, request: Bytes) -> Result<Bytes> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    fn exchange<T: Transport>(transport: &mut T, payload: &'static [u8]) -> Result<Bytes> {
        transport.send(Bytes::from_static(payload))
    }

    #[test]
    fn closure_transport_echoes() {
        let mut calls = 0usize;
        let mut echo = |request: Bytes| {
            calls += 1;
            Ok(request)
        };
        let response = exchange(&mut echo, b"<GovTalkMessage/>").unwrap();
        assert_eq!(response.as_ref(), b"<GovTalkMessage/>");
        assert_eq!(calls, 1);
    }

    #[test]
    fn closure_transport_propagates_errors() {
        let mut failing = |_request: Bytes| Err(TransportError::Status { status: 503 });
        let err = exchange(&mut failing, b"x").unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 503 }));
    }

    #[test]
    fn boxed_closure_transport_dispatches() {
        let mut boxed: Box<dyn FnMut(Bytes) -> Result<Bytes>> =
            Box::new(|_request: Bytes| Ok(Bytes::from_static(b"ok")));
        assert_eq!(exchange(&mut boxed, b"x").unwrap().as_ref(), b"ok");
    }
}
