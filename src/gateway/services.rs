use crate::error::Result;
use crate::models::ServiceDirection;

use super::client::Query;
use super::envelope::ResponseShape;
use super::resource::{Resource, RestResource};

impl RestResource for ServiceDirection {
    const PATH: &'static str = "services";
    const SHAPE: ResponseShape = ResponseShape::Enveloped;
}

impl Resource<'_, ServiceDirection> {
    pub async fn active(&self) -> Result<Vec<ServiceDirection>> {
        self.list(&Query::new().with("actif", true)).await
    }

    pub async fn search_text(&self, text: &str) -> Result<Vec<ServiceDirection>> {
        self.search(&Query::new().with("q", text)).await
    }

    pub async fn toggle(&self, id: i64) -> Result<ServiceDirection> {
        self.trigger(&id, "toggle").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::gateway::Gateway;
    use crate::session::SessionContext;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_service_endpoints_live_under_services() {
        let gateway = Gateway::new(&Config::default(), SessionContext::new()).unwrap();
        let services = gateway.services();
        assert!(services.url("").ends_with("/api/services"));
        assert!(services.url("/4/toggle").ends_with("/api/services/4/toggle"));
        assert_eq!(ServiceDirection::SHAPE, ResponseShape::Enveloped);
    }
}
