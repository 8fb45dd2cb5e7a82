use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, Ready};
use tracing::warn;

use crate::error::AuthError;
use crate::verifier::{bearer_token, RemoteVerifier};

/// Auth delegation middleware.
///
/// Per request: absent bearer credential rejects immediately with no
/// authority call; otherwise the credential is verified remotely and the
/// resulting [`crate::Identity`] is attached to the request extensions for
/// the rest of that request. Both rejection kinds surface as 401; the
/// distinction between an unreachable authority and a rejected credential
/// lives in the logs.
pub struct RemoteAuth {
    verifier: Arc<RemoteVerifier>,
}

impl RemoteAuth {
    pub fn new(verifier: RemoteVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RemoteAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RemoteAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RemoteAuthService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct RemoteAuthService<S> {
    service: Rc<S>,
    verifier: Arc<RemoteVerifier>,
}

impl<S, B> Service<ServiceRequest> for RemoteAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let verifier = self.verifier.clone();

        Box::pin(async move {
            let token = match bearer_token(req.headers()) {
                Some(token) => token.to_owned(),
                None => return Err(AuthError::MissingCredential.into()),
            };

            match verifier.verify(&token).await {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    service.call(req).await
                }
                Err(e @ AuthError::AuthorityUnreachable(_)) => {
                    warn!(path = %req.path(), error = %e, "rejecting request: authority unreachable");
                    Err(e.into())
                }
                Err(e) => {
                    warn!(path = %req.path(), error = %e, "rejecting request: credential refused");
                    Err(e.into())
                }
            }
        })
    }
}
