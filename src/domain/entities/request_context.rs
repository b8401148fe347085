use std::net::IpAddr;

/// Per-request correlation data, stored in the request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    /// Address of the connected peer
    pub client_ip: Option<IpAddr>,
    /// Raw `X-Forwarded-For` chain as sent by the client
    pub forwarded_for: Option<String>,
}

impl RequestContext {
    #[must_use]
    pub fn new(request_id: impl Into<String>) -> Self {
        Self { request_id: request_id.into(), client_ip: None, forwarded_for: None }
    }

    /// Connected peer followed by every hop of the forwarded-for chain
    #[must_use]
    pub fn remote_ip_list(&self) -> Vec<String> {
        let mut list: Vec<String> = self.client_ip.iter().map(ToString::to_string).collect();
        if let Some(chain) = &self.forwarded_for {
            list.extend(
                chain.split(',').map(str::trim).filter(|hop| !hop.is_empty()).map(String::from),
            );
        }
        list
    }
}
