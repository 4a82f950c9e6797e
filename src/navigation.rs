//! Navigation requests raised by the client layer.
//!
//! The only request today is "go back to the entry route" after the server
//! reports an expired session.

/// Route of the application's entry page.
pub const ENTRY_ROUTE: &str = "/";

/// Receives navigation requests. Implementations must not block.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, route: &str) {
        self(route)
    }
}

/// Logs navigation requests; for hosts without a router.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!("Navigation requested: {}", route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_closure_is_a_navigator() {
        let routes = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = routes.clone();
        let navigator = move |route: &str| sink.lock().unwrap().push(route.to_string());

        navigator.navigate("/");
        assert_eq!(routes.lock().unwrap().as_slice(), ["/"]);
    }
}
