//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up the matching route for a method and path
//! - Return the matched route or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan over routes (tables are small)
//! - Literal templates are checked before parameterized ones
//! - Explicit `None` rather than a silent default route

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::error::RouteError;
use crate::http::request::RequestContext;
use crate::http::response::HandlerResult;
use crate::routing::matcher::{PathParams, PathTemplate};

/// Signature every route handler satisfies.
pub type Handler = dyn Fn(&RequestContext) -> HandlerResult + Send + Sync;

/// A (method, template) binding.
#[derive(Clone)]
pub struct Route {
    method: Method,
    template: PathTemplate,
    handler: Arc<Handler>,
}

impl Route {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Invoke the bound handler.
    pub fn call(&self, ctx: &RequestContext) -> HandlerResult {
        (self.handler)(ctx)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("template", &self.template.as_str())
            .finish_non_exhaustive()
    }
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: PathParams,
}

/// Immutable route table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Find the route for `method` and `path`.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route
                    .template
                    .captures(path)
                    .map(|params| RouteMatch { route, params })
            })
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Collects routes; errors surface once, from [`RouteTableBuilder::build`].
#[derive(Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
    error: Option<RouteError>,
}

impl RouteTableBuilder {
    /// Bind `handler` to `method` and `template`.
    pub fn route<F>(mut self, method: Method, template: &str, handler: F) -> Self
    where
        F: Fn(&RequestContext) -> HandlerResult + Send + Sync + 'static,
    {
        if self.error.is_some() {
            return self;
        }

        let template = match PathTemplate::parse(template) {
            Ok(t) => t,
            Err(e) => {
                self.error = Some(e);
                return self;
            }
        };

        if self
            .routes
            .iter()
            .any(|r| r.method == method && r.template == template)
        {
            self.error = Some(RouteError::Duplicate {
                method: method.to_string(),
                template: template.to_string(),
            });
            return self;
        }

        self.routes.push(Route {
            method,
            template,
            handler: Arc::new(handler),
        });
        self
    }

    pub fn get<F>(self, template: &str, handler: F) -> Self
    where
        F: Fn(&RequestContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.route(Method::GET, template, handler)
    }

    pub fn post<F>(self, template: &str, handler: F) -> Self
    where
        F: Fn(&RequestContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.route(Method::POST, template, handler)
    }

    /// Freeze the table. Stable sort keeps registration order among
    /// equally specific templates.
    pub fn build(self) -> Result<RouteTable, RouteError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut routes = self.routes;
        routes.sort_by_key(|r| r.template.param_count());
        Ok(RouteTable { routes })
    }
}
