//! HTTP protocol layer module
//!
//! Response builders and MIME detection shared by the proxy and static handlers.

pub mod mime;
pub mod response;

pub use response::{
    build_404_response, build_500_response, build_asset_response, build_preflight_response,
    build_proxied_response, build_proxy_error_response,
};
