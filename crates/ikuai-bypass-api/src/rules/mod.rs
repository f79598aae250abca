// Rule table endpoints
//
// One file per `/Action/call` table. Every add stamps the bypass comment;
// every delete only touches rows carrying it.

pub mod custom_isp;
pub mod ip_group;
pub mod stream_domain;
pub mod stream_ipport;
