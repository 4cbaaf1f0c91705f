use courier_core::{MethodNotAllowed, Raised, RouteNotFound};
use http::{Method, Uri};

/// No route matched the path
pub async fn route_not_found(uri: Uri) -> Raised {
    Raised::new(RouteNotFound::new(uri.path()))
}

/// A route matched the path but not the method
pub async fn method_not_allowed(method: Method, uri: Uri) -> Raised {
    Raised::new(MethodNotAllowed::new(method, uri.path()))
}
