//! Asynchronous query dispatch
//!
//! Turns a query into a transport request, sends it without blocking and
//! converts the transport response back into the client's [`Response`].

use crate::client::{EndpointRef, Query, Response, SearchClient};
use crate::error::Result;
use crate::events::{EventObserver, PostExecuteRequest, PreExecuteRequest};
use crate::network::translate::{from_transport_response, to_transport_request};
use crate::network::{AsyncTransport, BasicAuthTransport, ReqwestTransport};
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::debug;

/// Response that has been dispatched but not yet received.
///
/// Resolves exactly once. Nothing is sent until the future is first polled;
/// use [`PendingResponse::spawn`] to start the exchange on the tokio runtime
/// straight away. Dropping it cancels the request.
#[must_use = "a pending response does nothing unless awaited or spawned"]
pub struct PendingResponse {
    inner: BoxFuture<'static, Result<Response>>,
}

impl PendingResponse {
    fn new(inner: BoxFuture<'static, Result<Response>>) -> Self {
        Self { inner }
    }

    /// Drive the exchange on the current tokio runtime
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<Response>> {
        tokio::spawn(self.inner)
    }
}

impl Future for PendingResponse {
    type Output = Result<Response>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl std::fmt::Debug for PendingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingResponse").finish_non_exhaustive()
    }
}

/// Sends queries built by a [`SearchClient`] through an async transport
#[derive(Clone)]
pub struct AsyncQueryDispatcher {
    client: Arc<SearchClient>,
    transport: Option<Arc<dyn AsyncTransport>>,
    observer: Option<Arc<dyn EventObserver>>,
}

impl AsyncQueryDispatcher {
    /// Create a dispatcher that derives its transport from the client's
    /// configured HTTP connection
    pub fn new(client: impl Into<Arc<SearchClient>>) -> Self {
        Self {
            client: client.into(),
            transport: None,
            observer: None,
        }
    }

    /// Send through the given transport instead of the client's connection
    pub fn with_transport(mut self, transport: Arc<dyn AsyncTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Notify `observer` before and after every exchange
    pub fn with_observer(mut self, observer: Arc<dyn EventObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn client(&self) -> &SearchClient {
        &self.client
    }

    /// Dispatch a query to the client's default endpoint
    pub fn dispatch(&self, query: &dyn Query) -> Result<PendingResponse> {
        self.execute(query, None)
    }

    /// Dispatch a query to a specific endpoint, given by key or value
    pub fn dispatch_to<'a>(
        &self,
        query: &dyn Query,
        endpoint: impl Into<EndpointRef<'a>>,
    ) -> Result<PendingResponse> {
        self.execute(query, Some(endpoint.into()))
    }

    /// Dispatch several queries to the default endpoint and wait for all of
    /// them. Results come back in input order.
    pub async fn dispatch_all(&self, queries: &[&dyn Query]) -> Vec<Result<Response>> {
        let pending: Vec<_> = queries
            .iter()
            .map(|query| {
                let pending = self.dispatch(*query);
                async move { pending?.await }
            })
            .collect();

        debug!("Dispatching {} queries concurrently", pending.len());
        join_all(pending).await
    }

    fn transport(&self) -> Arc<dyn AsyncTransport> {
        match self.transport {
            Some(ref transport) => transport.clone(),
            None => Arc::new(
                ReqwestTransport::new(self.client.http_client().clone())
                    .http_errors(self.client.http_errors()),
            ),
        }
    }

    fn execute(&self, query: &dyn Query, endpoint: Option<EndpointRef<'_>>) -> Result<PendingResponse> {
        let mut transport = self.transport();
        let request = self.client.create_request(query)?;
        let endpoint = self.client.endpoint(endpoint)?;

        if let Some(ref observer) = self.observer {
            observer.pre_execute_request(&PreExecuteRequest {
                request: &request,
                endpoint: &endpoint,
            });
        }

        let native = to_transport_request(&request, &endpoint)?;

        // Scoped to this exchange only
        if let Some(credentials) = endpoint.authentication() {
            transport = Arc::new(BasicAuthTransport::new(transport, credentials));
        }

        debug!(
            "Dispatching {} query to {} {}",
            query.query_type(),
            native.method,
            native.url
        );

        let observer = self.observer.clone();
        let exchange = async move {
            let response = from_transport_response(transport.send(native).await?);

            if let Some(observer) = observer {
                observer.post_execute_request(&PostExecuteRequest {
                    request: &request,
                    endpoint: &endpoint,
                    response: &response,
                });
            }

            Ok(response)
        };

        Ok(PendingResponse::new(exchange.boxed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::query::{PingQuery, SelectQuery, UpdateQuery};
    use crate::client::{Endpoint, Request};
    use crate::error::Error;
    use crate::network::{TransportBody, TransportRequest, TransportResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    struct Sent {
        method: String,
        url: String,
        headers: Vec<(String, String)>,
        body: Option<Vec<u8>>,
    }

    /// Records requests and answers with a canned response
    struct FakeTransport {
        response: Option<TransportResponse>,
        sent: Mutex<Vec<Sent>>,
    }

    impl FakeTransport {
        fn replying(response: TransportResponse) -> Arc<Self> {
            Arc::new(Self {
                response: Some(response),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: None,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AsyncTransport for FakeTransport {
        async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
            let body = match request.body {
                TransportBody::Empty => None,
                TransportBody::Bytes(bytes) => Some(bytes),
                TransportBody::File(_) => Some(b"<file>".to_vec()),
            };
            self.sent.lock().unwrap().push(Sent {
                method: request.method.to_string(),
                url: request.url.to_string(),
                headers: request.headers,
                body,
            });

            match self.response {
                Some(ref response) => Ok(response.clone()),
                None => Err(Error::Status {
                    status: 503,
                    reason: "Service Unavailable".to_string(),
                    body: String::new(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl EventObserver for RecordingObserver {
        fn pre_execute_request(&self, event: &PreExecuteRequest<'_>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("pre {} {}", event.endpoint.key, event.request.handler));
        }

        fn post_execute_request(&self, event: &PostExecuteRequest<'_>) {
            self.events.lock().unwrap().push(format!(
                "post {} {} {}",
                event.endpoint.key,
                event.request.handler,
                event.response.status_code()
            ));
        }
    }

    fn ok_response() -> TransportResponse {
        TransportResponse::new(200, "OK")
            .version("1.1")
            .header("X-Test", "a, b")
            .body("hello")
    }

    fn client() -> SearchClient {
        SearchClient::default()
            .with_endpoint(Endpoint::new("books").core("books"))
            .with_endpoint(Endpoint::new("secure").credentials("reader", "hunter2"))
            .with_endpoint(Endpoint::new("half").credentials("reader", ""))
    }

    fn header<'a>(sent: &'a Sent, name: &str) -> Option<&'a str> {
        sent.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[tokio::test]
    async fn test_response_conversion() {
        let transport = FakeTransport::replying(ok_response());
        let dispatcher = AsyncQueryDispatcher::new(client()).with_transport(transport.clone());

        let response = dispatcher.dispatch(&PingQuery::new()).unwrap().await.unwrap();

        assert_eq!(response.status_line(), Some("HTTP/1.1 200 OK"));
        assert!(response.headers().iter().any(|h| h == "X-Test: a, b"));
        assert_eq!(response.body(), "hello");

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, "GET");
        assert_eq!(
            sent[0].url,
            "http://127.0.0.1:8983/solr/books/admin/ping?wt=json"
        );
        assert!(sent[0].body.is_none());
    }

    #[tokio::test]
    async fn test_get_default_content_type() {
        let transport = FakeTransport::replying(ok_response());
        let dispatcher = AsyncQueryDispatcher::new(client()).with_transport(transport.clone());

        dispatcher.dispatch(&SelectQuery::new()).unwrap().await.unwrap();

        assert_eq!(
            header(&transport.sent()[0], "Content-Type"),
            Some("application/x-www-form-urlencoded; charset=utf-8")
        );
    }

    #[tokio::test]
    async fn test_post_default_content_type() {
        struct BarePost;

        impl Query for BarePost {
            fn query_type(&self) -> crate::client::QueryType {
                crate::client::QueryType::Update
            }

            fn handler(&self) -> &str {
                "update"
            }

            fn build_request(&self) -> Result<Request> {
                Ok(Request::post("update").raw_data("<commit/>"))
            }
        }

        let transport = FakeTransport::replying(ok_response());
        let dispatcher = AsyncQueryDispatcher::new(client()).with_transport(transport.clone());

        dispatcher.dispatch(&BarePost).unwrap().await.unwrap();

        let sent = &transport.sent()[0];
        assert_eq!(sent.method, "POST");
        assert_eq!(header(sent, "Content-Type"), Some("application/xml; charset=utf-8"));
        assert_eq!(sent.body.as_deref(), Some(&b"<commit/>"[..]));
    }

    #[tokio::test]
    async fn test_update_query_keeps_its_content_type() {
        let transport = FakeTransport::replying(ok_response());
        let dispatcher = AsyncQueryDispatcher::new(client()).with_transport(transport.clone());

        let query = UpdateQuery::new().add_document([("id", "1")]).commit();
        dispatcher.dispatch(&query).unwrap().await.unwrap();

        assert_eq!(
            header(&transport.sent()[0], "Content-Type"),
            Some("text/xml; charset=utf-8")
        );
    }

    #[tokio::test]
    async fn test_basic_auth_with_complete_credentials() {
        let transport = FakeTransport::replying(ok_response());
        let dispatcher = AsyncQueryDispatcher::new(client()).with_transport(transport.clone());

        dispatcher
            .dispatch_to(&PingQuery::new(), "secure")
            .unwrap()
            .await
            .unwrap();

        // base64("reader:hunter2")
        assert_eq!(
            header(&transport.sent()[0], "Authorization"),
            Some("Basic cmVhZGVyOmh1bnRlcjI=")
        );
    }

    #[tokio::test]
    async fn test_no_auth_with_incomplete_credentials() {
        let transport = FakeTransport::replying(ok_response());
        let dispatcher = AsyncQueryDispatcher::new(client()).with_transport(transport.clone());

        dispatcher
            .dispatch_to(&PingQuery::new(), "half")
            .unwrap()
            .await
            .unwrap();
        let anonymous = Endpoint::new("anon").credentials("", "hunter2");
        dispatcher
            .dispatch_to(&PingQuery::new(), &anonymous)
            .unwrap()
            .await
            .unwrap();
        dispatcher.dispatch(&PingQuery::new()).unwrap().await.unwrap();

        for sent in transport.sent() {
            assert_eq!(header(&sent, "Authorization"), None);
        }
    }

    #[tokio::test]
    async fn test_auth_is_scoped_to_one_dispatch() {
        let transport = FakeTransport::replying(ok_response());
        let dispatcher = AsyncQueryDispatcher::new(client()).with_transport(transport.clone());

        dispatcher
            .dispatch_to(&PingQuery::new(), "secure")
            .unwrap()
            .await
            .unwrap();
        dispatcher.dispatch(&PingQuery::new()).unwrap().await.unwrap();

        let sent = transport.sent();
        assert!(header(&sent[0], "Authorization").is_some());
        assert!(header(&sent[1], "Authorization").is_none());
    }

    #[tokio::test]
    async fn test_observer_sees_pre_then_post() {
        let observer = Arc::new(RecordingObserver::default());
        let dispatcher = AsyncQueryDispatcher::new(client())
            .with_transport(FakeTransport::replying(ok_response()))
            .with_observer(observer.clone());

        let pending = dispatcher.dispatch(&PingQuery::new()).unwrap();
        assert_eq!(*observer.events.lock().unwrap(), vec!["pre books admin/ping"]);

        pending.await.unwrap();
        assert_eq!(
            *observer.events.lock().unwrap(),
            vec!["pre books admin/ping", "post books admin/ping 200"]
        );
    }

    #[tokio::test]
    async fn test_observer_skips_post_on_failure() {
        let observer = Arc::new(RecordingObserver::default());
        let dispatcher = AsyncQueryDispatcher::new(client())
            .with_transport(FakeTransport::failing())
            .with_observer(observer.clone());

        let result = dispatcher.dispatch(&PingQuery::new()).unwrap().await;

        assert!(matches!(result, Err(Error::Status { status: 503, .. })));
        assert_eq!(*observer.events.lock().unwrap(), vec!["pre books admin/ping"]);
    }

    #[tokio::test]
    async fn test_unknown_endpoint_fails_before_sending() {
        let transport = FakeTransport::replying(ok_response());
        let observer = Arc::new(RecordingObserver::default());
        let dispatcher = AsyncQueryDispatcher::new(client())
            .with_transport(transport.clone())
            .with_observer(observer.clone());

        let result = dispatcher.dispatch_to(&PingQuery::new(), "missing");

        assert!(matches!(result, Err(Error::UnknownEndpoint { .. })));
        assert!(transport.sent().is_empty());
        assert!(observer.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_header_is_reported() {
        struct BadHeader;

        impl Query for BadHeader {
            fn query_type(&self) -> crate::client::QueryType {
                crate::client::QueryType::Select
            }

            fn handler(&self) -> &str {
                "select"
            }

            fn build_request(&self) -> Result<Request> {
                Ok(Request::get("select").header("X-Broken"))
            }
        }

        let transport = FakeTransport::replying(ok_response());
        let dispatcher = AsyncQueryDispatcher::new(client()).with_transport(transport.clone());

        let result = dispatcher.dispatch(&BadHeader);
        assert!(matches!(result, Err(Error::MalformedHeader { .. })));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_all_keeps_order() {
        let transport = FakeTransport::replying(ok_response());
        let dispatcher = AsyncQueryDispatcher::new(client()).with_transport(transport.clone());

        let select = SelectQuery::new().query("title:rust");
        let ping = PingQuery::new();
        let empty_update = UpdateQuery::new();
        let queries: [&dyn Query; 3] = [&select, &ping, &empty_update];

        let results = dispatcher.dispatch_all(&queries).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(matches!(results[2], Err(Error::InvalidQuery { .. })));
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_spawned_dispatch() {
        let dispatcher = AsyncQueryDispatcher::new(client())
            .with_transport(FakeTransport::replying(ok_response()));

        let handle = dispatcher.dispatch(&PingQuery::new()).unwrap().spawn();
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.status_code(), 200);
    }
}
