use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, Ready};
use tracing::warn;

use crate::error::AuthError;
use crate::identity::{Identity, Role};

/// Role authorization middleware.
///
/// Consumes the [`Identity`] attached by [`crate::RemoteAuth`] and compares
/// its role against the route's allowed set. Fails closed: a missing
/// identity is 401, a role mismatch is 403, even for otherwise valid
/// credentials.
pub struct RequireRole {
    allowed: Rc<Vec<Role>>,
}

impl RequireRole {
    pub fn new(allowed: &[Role]) -> Self {
        Self {
            allowed: Rc::new(allowed.to_vec()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequireRoleService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleService<S> {
    service: Rc<S>,
    allowed: Rc<Vec<Role>>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
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
        let allowed = self.allowed.clone();
        let identity = req.extensions().get::<Identity>().cloned();

        Box::pin(async move {
            let Some(identity) = identity else {
                return Err(AuthError::MissingCredential.into());
            };

            if !allowed.contains(&identity.role) {
                warn!(
                    path = %req.path(),
                    role = %identity.role,
                    "role not in the allowed set for this route"
                );
                return Err(AuthError::RoleDenied.into());
            }

            service.call(req).await
        })
    }
}
