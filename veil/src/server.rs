//! HTTP listener

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use veil_core::server::{Handler, HandlerResponse};

/// Bind `addr` and serve `handler` until the process exits
pub async fn run(addr: &str, handler: Arc<dyn Handler>) -> veil_core::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| veil_core::Error::Server(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("🌐 Serving static files at http://{}", addr);
    serve(listener, handler).await
}

/// Accept loop over an already bound listener
pub async fn serve(listener: TcpListener, handler: Arc<dyn Handler>) -> veil_core::Result<()> {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Accept error: {}", e);
                continue;
            }
        };

        let io = TokioIo::new(stream);
        let handler = handler.clone();

        tokio::task::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(io, service_fn(move |req| handle_request(req, handler.clone())))
                .await
            {
                tracing::debug!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    handler: Arc<dyn Handler>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    // Static files never need the request body.
    let (parts, _body) = req.into_parts();
    let req = Request::from_parts(parts, ());

    let response = handler.handle(&req).await;
    tracing::debug!("{} {} -> {}", req.method(), req.uri().path(), response.status.as_u16());

    Ok(into_response(response, req.method() == Method::HEAD))
}

fn into_response(response: HandlerResponse, head: bool) -> Response<Full<Bytes>> {
    let body = if head {
        Bytes::new()
    } else {
        response.body.unwrap_or_default()
    };

    let mut builder = Response::builder().status(response.status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    match builder.body(Full::new(body)) {
        Ok(res) => res,
        Err(e) => {
            tracing::error!("❌ Failed to build response: {}", e);
            let mut res = Response::new(Full::new(Bytes::from_static(b"500 internal server error\n")));
            *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            res
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_response_copies_headers() {
        let response = HandlerResponse::with_body(StatusCode::OK, "hi").header("Content-Type", "text/plain");
        let res = into_response(response, false);
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["content-type"], "text/plain");
    }

    #[test]
    fn test_into_response_invalid_header_is_500() {
        let response = HandlerResponse::status(StatusCode::OK).header("Bad Header", "x");
        let res = into_response(response, false);
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
